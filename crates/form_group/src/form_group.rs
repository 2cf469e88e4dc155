//! Field dispatcher.
//!
//! Given a [`FieldDescriptor`], pick its [`FieldBucket`], normalise the
//! attributes for that bucket and hand them to the matching widget:
//!
//! | bucket        | control              | wrapper                       |
//! |---------------|----------------------|-------------------------------|
//! | boolean       | [`Switch`]           | own `Form-group`, label inside the switch |
//! | select        | [`Select`]           | common                        |
//! | image-upload  | [`UploadImageButton`]| common                        |
//! | custom        | registry renderer    | none, renderer output as-is   |
//! | textarea      | `<textarea>`         | common                        |
//! | color-preview | [`ColorPreviewInput`]| common                        |
//! | generic-input | `<input type=…>`     | common                        |
//!
//! The common wrapper is a `div.Form-group` holding an optional `<label>`, an
//! optional help block and then the control.

use serde_json::Value;
use tracing::{debug, error};

use crate::bucket::FieldBucket;
use crate::descriptor::{DEFAULT_KEY, FieldDescriptor};
use crate::errors::{FieldError, Result};
use crate::ids::GeneratedIds;
use crate::node::{
    Attrs, CLASS_NAME_KEY, Handler, Node, class_list, div, input, label, textarea,
};
use crate::registry::{CustomFieldRegistry, FieldExtensions};
use crate::value::{attr_string, is_empty_value, is_truthy_setting};
use crate::widgets::{ColorPreviewInput, Select, Switch, UploadImageButton};

pub const FORM_GROUP_CLASS: &str = "Form-group";
pub const HELP_TEXT_CLASS: &str = "helpText";
pub const FORM_CONTROL_CLASS: &str = "FormControl";

/// One settings field bound to the extensions active for this render pass.
pub struct FormGroup<'a> {
    descriptor: &'a FieldDescriptor,
    extensions: &'a FieldExtensions,
}

impl<'a> FormGroup<'a> {
    pub fn new(descriptor: &'a FieldDescriptor, extensions: &'a FieldExtensions) -> Self {
        Self {
            descriptor,
            extensions,
        }
    }

    /// Registry of custom field types, rebuilt from the extension hooks on every call.
    pub fn custom_field_components(&self) -> CustomFieldRegistry {
        self.extensions.custom_field_components()
    }

    pub fn view(&self) -> Result<Node> {
        let registry = self.custom_field_components();
        render_field(self.descriptor, &registry)
    }
}

/// Render one field against an already-built registry.
pub fn render_field(descriptor: &FieldDescriptor, registry: &CustomFieldRegistry) -> Result<Node> {
    let field_type = descriptor.field_type().ok_or(FieldError::MissingType)?;
    let bucket = FieldBucket::classify(field_type, registry);
    debug!(field_type, %bucket, "dispatching settings field");

    let attrs = descriptor.forwarded_attrs(bucket.stripped_keys());

    let ids = GeneratedIds::generate();
    let control: Node = match bucket {
        FieldBucket::Boolean => render_boolean(descriptor, attrs),
        FieldBucket::Custom => {
            let render = registry.get(field_type).ok_or_else(|| {
                error!(field_type, "custom field classified but missing from registry");
                FieldError::UnregisteredCustomField(field_type.to_string())
            })?;
            render(descriptor)
        }
        FieldBucket::Select => render_select(descriptor, attrs, &ids),
        FieldBucket::ImageUpload => UploadImageButton::new()
            .value(descriptor.binding.clone())
            .attrs(attrs)
            .into(),
        FieldBucket::Textarea | FieldBucket::ColorPreview | FieldBucket::GenericInput => {
            render_form_control(bucket, field_type, descriptor, attrs, &ids)
        }
    };

    if bucket.uses_common_wrapper() {
        Ok(wrap(descriptor, &ids, control))
    } else {
        Ok(control)
    }
}

fn render_boolean(descriptor: &FieldDescriptor, attrs: Attrs) -> Node {
    let state = is_truthy_setting(&descriptor.value());

    let mut switch = Switch::new(state)
        .attrs(attrs)
        .children(descriptor.label.clone());
    if let Some(binding) = &descriptor.binding {
        switch = switch.on_change(Handler::Bind(binding.clone()));
    }

    div()
        .class(FORM_GROUP_CLASS)
        .child(switch)
        .when_some(descriptor.help.clone(), |this, help| {
            this.child(div().class(HELP_TEXT_CLASS).child(help))
        })
        .into()
}

fn render_select(descriptor: &FieldDescriptor, attrs: Attrs, ids: &GeneratedIds) -> Node {
    let bound = descriptor.value();
    let value = if is_empty_value(&bound) {
        descriptor
            .attrs
            .get(DEFAULT_KEY)
            .cloned()
            .unwrap_or(Value::Null)
    } else {
        bound
    };

    let mut select = Select::new(descriptor.select_options())
        .id(&ids.input_id)
        .described_by(&ids.help_text_id)
        .value(value)
        .attrs(attrs);
    if let Some(binding) = &descriptor.binding {
        select = select.on_change(Handler::Bind(binding.clone()));
    }
    select.into()
}

fn render_form_control(
    bucket: FieldBucket,
    field_type: &str,
    descriptor: &FieldDescriptor,
    mut attrs: Attrs,
    ids: &GeneratedIds,
) -> Node {
    attrs.shift_remove(CLASS_NAME_KEY);
    let class = class_list(FORM_CONTROL_CLASS, descriptor.class_name.as_deref());
    let binding = descriptor.binding.as_ref();

    match bucket {
        FieldBucket::Textarea => textarea()
            .class(class)
            .id(&ids.input_id)
            .attr("aria-describedby", ids.help_text_id.as_str())
            .attrs(attrs)
            .when_some(binding, |this, binding| {
                this.child(attr_string(&binding.get()).unwrap_or_default())
                    .on("input", Handler::Bind(binding.clone()))
            })
            .into(),
        FieldBucket::ColorPreview => ColorPreviewInput::new()
            .id(&ids.input_id)
            .described_by(&ids.help_text_id)
            .class(class)
            .binding(descriptor.binding.clone())
            .attrs(attrs)
            .into(),
        _ => input()
            .class(class)
            .id(&ids.input_id)
            .attr("aria-describedby", ids.help_text_id.as_str())
            .attr("type", field_type)
            .attrs(attrs)
            .when_some(binding, |this, binding| this.bind(binding))
            .into(),
    }
}

fn wrap(descriptor: &FieldDescriptor, ids: &GeneratedIds, control: Node) -> Node {
    div()
        .class(FORM_GROUP_CLASS)
        .when_some(descriptor.label.clone(), |this, content| {
            this.child(label().attr("for", ids.input_id.as_str()).child(content))
        })
        .when_some(descriptor.help.clone(), |this, help| {
            this.child(
                div()
                    .id(&ids.help_text_id)
                    .class(HELP_TEXT_CLASS)
                    .child(help),
            )
        })
        .child(control)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Element;
    use crate::value::Binding;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn render(descriptor: &FieldDescriptor) -> Node {
        render_field(descriptor, &CustomFieldRegistry::new()).expect("render")
    }

    fn wrapper(node: &Node) -> &Element {
        node.as_element().expect("wrapper element")
    }

    #[test]
    fn boolean_family_renders_a_switch_with_coerced_state() {
        for field_type in ["bool", "checkbox", "switch", "boolean"] {
            for (value, checked) in [
                (json!("0"), false),
                (json!("1"), true),
                (Value::Null, false),
                (json!(""), false),
                (json!(true), true),
            ] {
                let field = FieldDescriptor::new(field_type).binding(Binding::new(value.clone()));
                let node = render(&field);
                let checkbox = node.find_by_tag("input").expect("checkbox");
                assert_eq!(
                    checkbox.get_attr("checked"),
                    Some(&json!(checked)),
                    "{field_type} with {value}"
                );
            }
        }
    }

    #[test]
    fn boolean_label_lives_inside_the_switch() {
        let field = FieldDescriptor::new("bool")
            .label("Allow sign up")
            .help("Lets guests register");
        let node = render(&field);
        let group = wrapper(&node);
        assert!(group.has_class(FORM_GROUP_CLASS));
        assert_eq!(group.children.len(), 2);

        let switch = group.children[0].as_element().expect("switch");
        assert_eq!(switch.tag, "label");
        assert!(switch.has_class("Checkbox--switch"));
        assert_eq!(group.children[0].text_content(), "Allow sign up");
        assert!(switch.get_attr("for").is_none());

        let help = group.children[1].as_element().expect("help");
        assert!(help.has_class(HELP_TEXT_CLASS));
    }

    #[test]
    fn boolean_change_writes_binding() {
        let binding = Binding::new("0");
        let node = render(&FieldDescriptor::new("switch").binding(binding.clone()));
        node.find_by_tag("input").expect("checkbox").dispatch("change", true);
        assert_eq!(binding.get(), json!(true));
    }

    #[test]
    fn select_falls_back_to_default_and_strips_options() {
        let binding = Binding::new("");
        let field = FieldDescriptor::new("dropdown")
            .options([("en", "English"), ("de", "Deutsch")])
            .default_value("de")
            .attr("name", "locale")
            .binding(binding.clone());
        let node = render(&field);

        let select = node.find_by_tag("select").expect("select");
        assert_eq!(select.attr_str("value"), Some("de"));
        assert!(select.get_attr("options").is_none());
        assert!(select.get_attr("default").is_none());
        assert_eq!(select.attr_str("name"), Some("locale"));

        binding.set("en");
        let node = render(&field);
        assert_eq!(node.find_by_tag("select").and_then(|e| e.attr_str("value")), Some("en"));
    }

    #[test]
    fn select_change_writes_binding() {
        let binding = Binding::new("en");
        let field = FieldDescriptor::new("select")
            .options([("en", "English"), ("de", "Deutsch")])
            .binding(binding.clone());
        let node = render(&field);
        node.find_by_tag("select").expect("select").dispatch("change", "de");
        assert_eq!(binding.get(), json!("de"));
    }

    #[test]
    fn select_without_options_renders_empty() {
        let node = render(&FieldDescriptor::new("selectdropdown"));
        let select = node.find_by_tag("select").expect("select");
        assert!(select.children.is_empty());
        assert!(select.get_attr("value").is_none());
    }

    #[test]
    fn image_upload_never_forwards_value_attr() {
        let binding = Binding::new("logo.png");
        let field = FieldDescriptor::new("image-upload")
            .attr("value", "static.png")
            .attr("name", "logo")
            .binding(binding.clone());
        let node = render(&field);
        let upload = node.find_by_class("UploadImageButton").expect("upload");
        assert!(upload.get_attr("value").is_none());
        assert_eq!(upload.attr_str("name"), Some("logo"));
        assert_eq!(node.find_by_tag("img").and_then(|e| e.attr_str("src")), Some("logo.png"));
    }

    #[test]
    fn generic_input_uses_type_token_verbatim() {
        let binding = Binding::new("admin@example.com");
        let field = FieldDescriptor::new("email")
            .label("Mail from")
            .class_name("Wide")
            .binding(binding.clone());
        let node = render(&field);
        let control = node.find_by_tag("input").expect("input");
        assert_eq!(control.attr_str("type"), Some("email"));
        assert_eq!(control.attr_str("class"), Some("FormControl Wide"));
        assert_eq!(control.attr_str("value"), Some("admin@example.com"));

        control.dispatch("input", "new@example.com");
        assert_eq!(binding.get(), json!("new@example.com"));
    }

    #[test]
    fn label_and_help_link_to_generated_ids() {
        let field = FieldDescriptor::new("number").label("Per page").help("Between 1 and 50");
        let node = render(&field);
        let control = node.find_by_tag("input").expect("input");
        let input_id = control.attr_str("id").expect("id");
        let help_id = control.attr_str("aria-describedby").expect("described by");

        let group = wrapper(&node);
        let label = group.children[0].as_element().expect("label");
        assert_eq!(label.tag, "label");
        assert_eq!(label.attr_str("for"), Some(input_id));
        let help = group.children[1].as_element().expect("help");
        assert_eq!(help.attr_str("id"), Some(help_id));
        assert_eq!(group.children.len(), 3);
    }

    #[test]
    fn textarea_renders_binding_as_content() {
        let field = FieldDescriptor::new("textarea")
            .attr("rows", 5)
            .binding(Binding::new("line one"));
        let node = render(&field);
        let area = node.find_by_tag("textarea").expect("textarea");
        assert!(area.get_attr("type").is_none());
        assert_eq!(area.get_attr("rows"), Some(&json!(5)));
        assert_eq!(Node::Element(area.clone()).text_content(), "line one");
        assert!(area.has_class(FORM_CONTROL_CLASS));
    }

    #[test]
    fn color_preview_uses_dedicated_control() {
        let field = FieldDescriptor::new("color-preview").binding(Binding::new("#4d698e"));
        let node = render(&field);
        let color = node.find_by_class("ColorInput").expect("color input");
        let text = Node::Element(color.clone());
        let text = text.find(|e| e.attr_str("type") == Some("text")).expect("text input");
        assert!(text.has_class(FORM_CONTROL_CLASS));
        assert!(text.attr_str("id").is_some_and(|id| id.starts_with("field-")));
    }

    #[test]
    fn missing_type_is_rejected() {
        let err = render_field(&FieldDescriptor::default(), &CustomFieldRegistry::new())
            .expect_err("no type");
        assert!(matches!(err, FieldError::MissingType));
    }

    #[test]
    fn custom_renderer_receives_original_descriptor() {
        let mut registry = CustomFieldRegistry::new();
        registry.register("textarea", |d: &FieldDescriptor| {
            let keys: Vec<String> = d.attrs.keys().cloned().collect();
            div()
                .class("Custom")
                .attr("data-keys", keys.join(","))
                .when_some(d.label.clone(), |this, l| this.child(l))
                .into()
        });
        let field = FieldDescriptor::new("textarea")
            .label("Bio")
            .options([("a", "A")])
            .attr("value", "x");
        let node = render_field(&field, &registry).expect("render");
        let custom = node.as_element().expect("custom root");
        assert!(custom.has_class("Custom"));
        assert_eq!(custom.attr_str("data-keys"), Some("options,value"));
        assert!(node.find_by_class(FORM_GROUP_CLASS).is_none());
    }

    #[test]
    fn custom_registration_for_bool_is_ignored() {
        let mut registry = CustomFieldRegistry::new();
        registry.register("bool", |_| div().class("Custom").into());
        let node = render_field(&FieldDescriptor::new("bool"), &registry).expect("render");
        assert!(node.find_by_class("Custom").is_none());
        assert!(node.find_by_class("Checkbox--switch").is_some());
    }

    #[test]
    fn omitted_label_and_help_leave_only_the_control() {
        for field_type in ["select", "image-upload", "textarea", "color-preview", "url"] {
            let node = render(&FieldDescriptor::new(field_type));
            let group = wrapper(&node);
            assert_eq!(group.children.len(), 1, "{field_type}");
            assert!(node.find_by_tag("label").is_none(), "{field_type}");
            assert!(node.find_by_class(HELP_TEXT_CLASS).is_none(), "{field_type}");
        }
    }

    #[test]
    fn shared_label_wrapper_follows_bucket() {
        let mut registry = CustomFieldRegistry::new();
        registry.register("rating", |_| div().class("Rating").into());

        for field_type in ["bool", "select", "image-upload", "rating", "textarea", "color-preview", "url"] {
            let bucket = FieldBucket::classify(field_type, &registry);
            let field = FieldDescriptor::new(field_type).label("Label");
            let node = render_field(&field, &registry).expect("render");
            let first = wrapper(&node).children.first().and_then(Node::as_element);
            let linked_label = first.is_some_and(|e| e.tag == "label" && e.get_attr("for").is_some());
            assert_eq!(linked_label, bucket.uses_common_wrapper(), "{field_type}");
        }
    }

    #[test]
    fn form_group_view_consults_extensions() {
        let extensions = FieldExtensions::new().with(|registry| {
            registry.register("rating", |_| div().class("Rating").into());
        });
        let field = FieldDescriptor::new("rating");
        let node = FormGroup::new(&field, &extensions).view().expect("view");
        assert!(node.find_by_class("Rating").is_some());

        let plain = FormGroup::new(&field, &FieldExtensions::new()).view().expect("view");
        assert_eq!(
            plain.find_by_tag("input").and_then(|e| e.attr_str("type")),
            Some("rating")
        );
    }
}
