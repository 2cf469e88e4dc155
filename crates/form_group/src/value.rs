//! Two-way value cell shared between a rendered field and the settings state.
//!
//! A [`Binding`] is read with [`Binding::get`] and written with [`Binding::set`].
//! Clones share the same cell, so a write through any clone is visible to the
//! next read through every other clone.

use serde_json::Value;
use std::fmt;
use std::sync::{Arc, RwLock};

#[derive(Clone, Default)]
pub struct Binding {
    cell: Arc<RwLock<Value>>,
}

impl Binding {
    pub fn new(initial: impl Into<Value>) -> Self {
        Self {
            cell: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Current value. A poisoned lock still yields the last written value.
    pub fn get(&self) -> Value {
        match self.cell.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    pub fn set(&self, value: impl Into<Value>) {
        let mut guard = self.cell.write().unwrap_or_else(|p| p.into_inner());
        *guard = value.into();
    }

    /// True when both handles point at the same cell.
    pub fn ptr_eq(&self, other: &Binding) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }
}

impl PartialEq for Binding {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Binding").field(&self.get()).finish()
    }
}

/// Loose emptiness used by settings values: `null`, `false`, `""` and `0` are empty.
/// Arrays and objects are never empty, even when they have no elements.
pub fn is_empty_value(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Checked state of a boolean setting. Settings are commonly persisted as strings,
/// so the literal `"0"` counts as off.
pub fn is_truthy_setting(value: &Value) -> bool {
    !is_empty_value(value) && value.as_str() != Some("0")
}

/// String form of a value for use in an HTML attribute. `None` for `null`.
pub fn attr_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
