//! Settings panel: an ordered list of fields rendered against shared settings state.
//!
//! The panel owns no persistence. [`SettingsState`] hands out one [`Binding`]
//! per setting key and reports which keys differ from their initial values,
//! so whatever saves settings can pick up [`SettingsState::dirty`].
//!
//! A field that fails to render (missing type, inconsistent registry, a
//! panicking custom renderer) is replaced by an error placeholder; the other
//! fields still render.

use indexmap::IndexMap;
use serde_json::Value;
use std::any::Any;
use std::fmt;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::descriptor::FieldDescriptor;
use crate::form_group::{FORM_GROUP_CLASS, render_field};
use crate::node::{Node, div, el};
use crate::registry::{CustomFieldRegistry, FieldExtensions};
use crate::value::Binding;

pub const PANEL_CLASS: &str = "SettingsPanel";
pub const FIELD_ERROR_CLASS: &str = "Form-group--error";

/// Values of all settings shown on a panel.
#[derive(Debug, Clone, Default)]
pub struct SettingsState {
    initial: IndexMap<String, Value>,
    bindings: IndexMap<String, Binding>,
}

impl SettingsState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_values<K, I>(values: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut state = Self::new();
        for (key, value) in values {
            let key = key.into();
            state.bindings.insert(key.clone(), Binding::new(value.clone()));
            state.initial.insert(key, value);
        }
        state
    }

    /// Binding for `key`, created with a `null` initial value on first use.
    pub fn binding(&mut self, key: &str) -> Binding {
        if let Some(binding) = self.bindings.get(key) {
            return binding.clone();
        }
        let binding = Binding::default();
        self.initial.insert(key.to_string(), Value::Null);
        self.bindings.insert(key.to_string(), binding.clone());
        binding
    }

    pub fn get(&self, key: &str) -> Value {
        self.bindings.get(key).map(Binding::get).unwrap_or(Value::Null)
    }

    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        self.binding(key).set(value);
    }

    /// Settings whose current value differs from the initial one, in key order.
    pub fn dirty(&self) -> IndexMap<String, Value> {
        self.bindings
            .iter()
            .filter_map(|(key, binding)| {
                let current = binding.get();
                let initial = self.initial.get(key).unwrap_or(&Value::Null);
                (&current != initial).then(|| (key.clone(), current))
            })
            .collect()
    }

    pub fn is_changed(&self) -> bool {
        !self.dirty().is_empty()
    }

    /// Accept current values as the new baseline (after a successful save).
    pub fn commit(&mut self) {
        for (key, binding) in &self.bindings {
            self.initial.insert(key.clone(), binding.get());
        }
    }

    /// Write the initial values back into every binding.
    pub fn reset(&mut self) {
        for (key, binding) in &self.bindings {
            binding.set(self.initial.get(key).cloned().unwrap_or(Value::Null));
        }
    }
}

pub type PanelRenderer = Arc<dyn Fn(&mut SettingsState) -> Node + Send + Sync>;

#[derive(Clone)]
pub enum PanelEntry {
    /// A declarative field, bound to `setting` when given.
    Field {
        setting: Option<String>,
        descriptor: FieldDescriptor,
    },
    /// Free-form content rendered by a callback.
    Custom(PanelRenderer),
}

impl fmt::Debug for PanelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PanelEntry::Field {
                setting,
                descriptor,
            } => f
                .debug_struct("Field")
                .field("setting", setting)
                .field("type", &descriptor.field_type)
                .finish(),
            PanelEntry::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

/// A field that could not be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFailure {
    pub index: usize,
    pub setting: Option<String>,
    pub message: String,
}

#[derive(Debug, Clone)]
pub struct PanelView {
    pub node: Node,
    pub failures: Vec<FieldFailure>,
}

#[derive(Debug, Clone, Default)]
pub struct SettingsPanel {
    pub title: Option<String>,
    pub description: Option<String>,
    entries: Vec<PanelEntry>,
    extensions: FieldExtensions,
}

impl SettingsPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn extensions(mut self, extensions: FieldExtensions) -> Self {
        self.extensions = extensions;
        self
    }

    pub fn field(mut self, setting: impl Into<String>, descriptor: FieldDescriptor) -> Self {
        self.entries.push(PanelEntry::Field {
            setting: Some(setting.into()),
            descriptor,
        });
        self
    }

    /// A field not backed by a setting key (uses its own binding, if any).
    pub fn unbound_field(mut self, descriptor: FieldDescriptor) -> Self {
        self.entries.push(PanelEntry::Field {
            setting: None,
            descriptor,
        });
        self
    }

    pub fn custom(mut self, render: impl Fn(&mut SettingsState) -> Node + Send + Sync + 'static) -> Self {
        self.entries.push(PanelEntry::Custom(Arc::new(render)));
        self
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[PanelEntry] {
        &self.entries
    }

    /// Render every entry. The custom field registry is built once for the pass;
    /// if an extension hook panics, the pass continues with no custom field types.
    pub fn render(&self, state: &mut SettingsState) -> PanelView {
        let registry = catch_unwind(AssertUnwindSafe(|| self.extensions.custom_field_components()))
            .unwrap_or_else(|payload| {
                warn!(
                    message = %panic_message(payload),
                    "extension hook failed, rendering without custom fields"
                );
                CustomFieldRegistry::new()
            });
        let mut failures = Vec::new();
        let mut fields = Vec::with_capacity(self.entries.len());

        for (index, entry) in self.entries.iter().enumerate() {
            let (setting, outcome) = match entry {
                PanelEntry::Field {
                    setting,
                    descriptor,
                } => {
                    let mut descriptor = descriptor.clone();
                    if let Some(key) = setting {
                        if descriptor.binding.is_none() {
                            descriptor.binding = Some(state.binding(key));
                        }
                    }
                    let outcome = catch_unwind(AssertUnwindSafe(|| {
                        render_field(&descriptor, &registry)
                    }))
                    .map_err(panic_message)
                    .and_then(|rendered| rendered.map_err(|err| err.to_string()));
                    (setting.clone(), outcome)
                }
                PanelEntry::Custom(render) => {
                    let outcome = catch_unwind(AssertUnwindSafe(|| render(state)))
                        .map_err(panic_message);
                    (None, outcome)
                }
            };

            match outcome {
                Ok(node) => fields.push(node),
                Err(message) => {
                    warn!(index, setting = ?setting, %message, "settings field failed to render");
                    fields.push(error_placeholder(&message));
                    failures.push(FieldFailure {
                        index,
                        setting,
                        message,
                    });
                }
            }
        }

        debug!(
            entries = self.entries.len(),
            failed = failures.len(),
            "rendered settings panel"
        );

        let node = div()
            .class(PANEL_CLASS)
            .when_some(self.title.clone(), |this, title| {
                this.child(el("h3").child(title))
            })
            .when_some(self.description.clone(), |this, description| {
                this.child(el("p").class("helpText").child(description))
            })
            .children(fields)
            .into();

        PanelView { node, failures }
    }
}

fn error_placeholder(message: &str) -> Node {
    div()
        .class(FORM_GROUP_CLASS)
        .class(FIELD_ERROR_CLASS)
        .child(div().class("Alert Alert--error").child(message))
        .into()
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        format!("field renderer panicked: {s}")
    } else if let Some(s) = payload.downcast_ref::<String>() {
        format!("field renderer panicked: {s}")
    } else {
        "field renderer panicked".to_string()
    }
}
