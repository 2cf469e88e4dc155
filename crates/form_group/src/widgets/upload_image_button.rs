use serde_json::Value;

use super::RenderOnce;
use crate::node::{Attrs, Handler, Node, div, el};
use crate::value::{Binding, attr_string, is_empty_value};

/// Image upload control. The binding is its value channel: the current value is
/// the stored image path, an upload writes the new path, removal writes `null`.
#[derive(Debug, Clone, Default)]
pub struct UploadImageButton {
    value: Option<Binding>,
    attrs: Attrs,
}

impl UploadImageButton {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(mut self, binding: Option<Binding>) -> Self {
        self.value = binding;
        self
    }

    pub fn attrs(mut self, attrs: Attrs) -> Self {
        self.attrs.extend(attrs);
        self
    }
}

impl RenderOnce for UploadImageButton {
    fn render(self) -> Node {
        let current = self.value.as_ref().map(Binding::get).unwrap_or(Value::Null);
        let preview = (!is_empty_value(&current))
            .then(|| attr_string(&current))
            .flatten();
        let has_image = preview.is_some();

        let upload = el("button")
            .class("Button")
            .attr("type", "button")
            .child(if has_image { "Change image" } else { "Upload" })
            .when_some(self.value.clone(), |this, binding| {
                this.on("change", Handler::Bind(binding))
            });

        let remove = has_image.then(|| {
            el("button")
                .class("Button Button--danger")
                .attr("type", "button")
                .child("Remove")
                .when_some(self.value.clone(), |this, binding| {
                    this.on(
                        "click",
                        Handler::callback(move |_| binding.set(Value::Null)),
                    )
                })
        });

        div()
            .class("ImageUpload UploadImageButton")
            .attrs(self.attrs)
            .when_some(preview, |this, src| {
                this.child(
                    el("img")
                        .class("ImageUpload-preview")
                        .attr("src", src)
                        .attr("alt", ""),
                )
            })
            .child(upload)
            .children(remove)
            .into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_binding_shows_only_upload() {
        let binding = Binding::new(Value::Null);
        let node = UploadImageButton::new().value(Some(binding.clone())).render();
        assert!(node.find_by_tag("img").is_none());
        let buttons = node.find_all(|e| e.tag == "button");
        assert_eq!(buttons.len(), 1);
        buttons[0].dispatch("change", "logo.png");
        assert_eq!(binding.get(), json!("logo.png"));
    }

    #[test]
    fn stored_image_can_be_removed() {
        let binding = Binding::new("logo.png");
        let node = UploadImageButton::new().value(Some(binding.clone())).render();
        assert_eq!(node.find_by_tag("img").and_then(|e| e.attr_str("src")), Some("logo.png"));
        let remove = node.find_by_class("Button--danger").expect("remove button");
        remove.dispatch("click", Value::Null);
        assert_eq!(binding.get(), Value::Null);
    }
}
