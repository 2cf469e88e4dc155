use serde_json::Value;

use super::RenderOnce;
use crate::node::{Attrs, CLASS_NAME_KEY, Handler, Node, div, input, label};

/// Toggle control. Renders its own `<label>` around the checkbox, so the
/// caller's label content goes in as children.
#[derive(Debug, Clone, Default)]
pub struct Switch {
    state: bool,
    on_change: Option<Handler>,
    attrs: Attrs,
    children: Vec<Node>,
}

impl Switch {
    pub fn new(state: bool) -> Self {
        Self {
            state,
            ..Default::default()
        }
    }

    pub fn on_change(mut self, handler: Handler) -> Self {
        self.on_change = Some(handler);
        self
    }

    /// Passthrough attributes. `className` goes on the wrapper, the rest on the checkbox.
    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }
}

impl RenderOnce for Switch {
    fn render(mut self) -> Node {
        let class_name = self.attrs.shift_remove(CLASS_NAME_KEY);

        let checkbox = input()
            .attr("type", "checkbox")
            .attr("checked", self.state)
            .attrs(self.attrs)
            .when_some(self.on_change, |this, handler| this.on("change", handler));

        label()
            .class("Checkbox Checkbox--switch")
            .class(if self.state { "on" } else { "off" })
            .when_some(class_name.as_ref().and_then(Value::as_str), |this, c| {
                this.class(c)
            })
            .child(checkbox)
            .child(div().class("Checkbox-display"))
            .children(self.children)
            .into()
    }
}
