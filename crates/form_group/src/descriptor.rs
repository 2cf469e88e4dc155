//! Declarative description of one settings field.
//!
//! `type`, `label`, `help`, `className` and the binding are lifted into typed
//! fields. Every other key lives in [`FieldDescriptor::attrs`] and is forwarded
//! to the rendered control, minus the keys the chosen bucket strips (see
//! [`FieldBucket::stripped_keys`](crate::FieldBucket::stripped_keys)).
//!
//! ```ignore
//! let field = FieldDescriptor::new("select")
//!     .label("Default language")
//!     .help("Used for guests and new accounts")
//!     .options([("en", "English"), ("de", "Deutsch")])
//!     .default_value("en")
//!     .binding(state.binding("default_locale"));
//! ```

use indexmap::IndexMap;
use serde_json::Value;
use tracing::debug;

use crate::node::{Attrs, Node};
use crate::value::{Binding, attr_string};

pub const OPTIONS_KEY: &str = "options";
pub const DEFAULT_KEY: &str = "default";
pub const VALUE_KEY: &str = "value";

/// Select options keyed by submitted value; insertion order is display order.
pub type SelectOptions = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldDescriptor {
    pub field_type: Option<String>,
    pub label: Option<Node>,
    pub help: Option<Node>,
    pub class_name: Option<String>,
    pub binding: Option<Binding>,
    pub attrs: Attrs,
}

impl FieldDescriptor {
    pub fn new(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }

    pub fn label(mut self, label: impl Into<Node>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn help(mut self, help: impl Into<Node>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn class_name(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn binding(mut self, binding: Binding) -> Self {
        self.binding = Some(binding);
        self
    }

    /// Set a raw attribute forwarded to the rendered control.
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    pub fn options<K, L, I>(self, options: I) -> Self
    where
        K: Into<String>,
        L: Into<String>,
        I: IntoIterator<Item = (K, L)>,
    {
        let map: serde_json::Map<String, Value> = options
            .into_iter()
            .map(|(k, l)| (k.into(), Value::String(l.into())))
            .collect();
        self.attr(OPTIONS_KEY, Value::Object(map))
    }

    pub fn default_value(self, value: impl Into<Value>) -> Self {
        self.attr(DEFAULT_KEY, value)
    }

    pub fn field_type(&self) -> Option<&str> {
        self.field_type.as_deref()
    }

    /// Current bound value; `null` when the field is uncontrolled.
    pub fn value(&self) -> Value {
        self.binding.as_ref().map(Binding::get).unwrap_or(Value::Null)
    }

    /// Attributes to forward to the control, without `stripped` keys.
    /// `className` is re-added as a passthrough so leaf widgets can merge it.
    pub fn forwarded_attrs(&self, stripped: &[&str]) -> Attrs {
        let mut attrs: Attrs = self
            .attrs
            .iter()
            .filter(|(key, _)| !stripped.contains(&key.as_str()))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        if let Some(class_name) = &self.class_name {
            attrs.insert(
                crate::node::CLASS_NAME_KEY.into(),
                Value::String(class_name.clone()),
            );
        }
        attrs
    }

    /// Options of a select field. Anything other than a mapping yields no options.
    pub fn select_options(&self) -> SelectOptions {
        match self.attrs.get(OPTIONS_KEY) {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(value, label)| (value.clone(), attr_string(label).unwrap_or_default()))
                .collect(),
            Some(other) => {
                debug!(options = %other, "select options are not a mapping; rendering empty");
                SelectOptions::new()
            }
            None => {
                debug!("select field has no options; rendering empty");
                SelectOptions::new()
            }
        }
    }
}
