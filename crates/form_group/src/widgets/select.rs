use serde_json::Value;

use super::RenderOnce;
use crate::descriptor::SelectOptions;
use crate::node::{Attrs, Handler, Node, el, span};
use crate::value::attr_string;

/// Dropdown control over a fixed set of options.
#[derive(Debug, Clone, Default)]
pub struct Select {
    id: Option<String>,
    described_by: Option<String>,
    value: Value,
    options: SelectOptions,
    on_change: Option<Handler>,
    attrs: Attrs,
}

impl Select {
    pub fn new(options: SelectOptions) -> Self {
        Self {
            options,
            ..Default::default()
        }
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn described_by(mut self, id: impl Into<String>) -> Self {
        self.described_by = Some(id.into());
        self
    }

    pub fn value(mut self, value: Value) -> Self {
        self.value = value;
        self
    }

    pub fn on_change(mut self, handler: Handler) -> Self {
        self.on_change = Some(handler);
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

impl RenderOnce for Select {
    fn render(self) -> Node {
        let selected = attr_string(&self.value);

        let options: Vec<Node> = self
            .options
            .into_iter()
            .map(|(value, label)| {
                let is_selected = selected.as_deref() == Some(value.as_str());
                el("option")
                    .attr("value", value)
                    .attr("selected", is_selected)
                    .child(label)
                    .into()
            })
            .collect();

        let select = el("select")
            .class("Select-input FormControl")
            .when_some(self.id, |this, id| this.id(id))
            .when_some(self.described_by, |this, id| this.attr("aria-describedby", id))
            .when_some(selected, |this, value| this.attr("value", value))
            .attrs(self.attrs)
            .when_some(self.on_change, |this, handler| this.on("change", handler))
            .children(options);

        span()
            .class("Select")
            .child(select)
            .child(el("i").class("icon fas fa-sort Select-caret"))
            .into()
    }
}
