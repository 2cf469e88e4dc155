use serde_json::Value;

use super::RenderOnce;
use crate::node::{Attrs, Handler, Node, div, input, span};
use crate::value::{Binding, attr_string};

/// Text input for a CSS color with a swatch and a native picker next to it.
#[derive(Debug, Clone, Default)]
pub struct ColorPreviewInput {
    id: Option<String>,
    described_by: Option<String>,
    class: Option<String>,
    binding: Option<Binding>,
    attrs: Attrs,
}

impl ColorPreviewInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn described_by(mut self, id: impl Into<String>) -> Self {
        self.described_by = Some(id.into());
        self
    }

    /// Class list of the text input.
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn binding(mut self, binding: Option<Binding>) -> Self {
        self.binding = binding;
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

impl RenderOnce for ColorPreviewInput {
    fn render(self) -> Node {
        let color = self
            .binding
            .as_ref()
            .map(Binding::get)
            .and_then(|v| attr_string(&v))
            .unwrap_or_default();

        let text_input = input()
            .attr("type", "text")
            .when_some(self.class, |this, class| this.class(class))
            .when_some(self.id, |this, id| this.id(id))
            .when_some(self.described_by, |this, id| this.attr("aria-describedby", id))
            .attrs(self.attrs)
            .when_some(self.binding.as_ref(), |this, binding| this.bind(binding));

        let picker = input()
            .class("ColorInput-preview")
            .attr("type", "color")
            .attr("value", Value::String(color.clone()))
            .when_some(self.binding, |this, binding| {
                this.on("input", Handler::Bind(binding))
            });

        div()
            .class("ColorInput")
            .child(text_input)
            .child(
                span()
                    .class("ColorInput-icon")
                    .attr("style", format!("color: {color}")),
            )
            .child(picker)
            .into()
    }
}
