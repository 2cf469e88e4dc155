//! Panel definitions loaded from TOML or JSON.
//!
//! ```toml
//! title = "Basics"
//! description = "General forum settings"
//!
//! [values]
//! forum_title = "Forge"
//! allow_sign_up = "1"
//!
//! [[fields]]
//! setting = "forum_title"
//! type = "text"
//! label = "Forum title"
//!
//! [[fields]]
//! setting = "default_locale"
//! type = "select"
//! label = "Default language"
//! default = "en"
//! options = { en = "English", de = "Deutsch" }
//! ```
//!
//! Keys other than `setting`, `type`, `label`, `help` and `className` are kept
//! verbatim as raw field attributes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::descriptor::FieldDescriptor;
use crate::errors::{FieldError, Result};
use crate::panel::{SettingsPanel, SettingsState};
use crate::registry::FieldExtensions;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PanelDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldEntry>,
    /// Initial setting values.
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub values: IndexMap<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub setting: Option<String>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    #[serde(rename = "className", default, skip_serializing_if = "Option::is_none")]
    pub class_name: Option<String>,
    #[serde(flatten)]
    pub attrs: IndexMap<String, Value>,
}

impl FieldEntry {
    pub fn to_descriptor(&self) -> FieldDescriptor {
        FieldDescriptor {
            field_type: self.field_type.clone(),
            label: self.label.clone().map(Into::into),
            help: self.help.clone().map(Into::into),
            class_name: self.class_name.clone(),
            binding: None,
            attrs: self.attrs.clone(),
        }
    }
}

impl PanelDefinition {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let definition: Self = toml::from_str(content)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        let definition: Self = serde_json::from_str(content)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Load a definition, choosing the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let definition = match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Self::from_toml_str(&content)?,
            Some("json") => Self::from_json_str(&content)?,
            _ => return Err(FieldError::UnsupportedFormat(path.to_path_buf())),
        };
        debug!(path = %path.display(), fields = definition.fields.len(), "loaded panel definition");
        Ok(definition)
    }

    /// Setting keys must be non-empty. A missing `type` is not checked here; the
    /// panel reports it per field at render time.
    pub fn validate(&self) -> Result<()> {
        for (index, field) in self.fields.iter().enumerate() {
            if field.setting.as_deref().is_some_and(|s| s.trim().is_empty()) {
                return Err(FieldError::InvalidDefinition(format!(
                    "field {index} has an empty setting key"
                )));
            }
        }
        Ok(())
    }

    pub fn to_panel(&self, extensions: FieldExtensions) -> SettingsPanel {
        let mut panel = SettingsPanel::new().extensions(extensions);
        panel.title = self.title.clone();
        panel.description = self.description.clone();
        self.fields.iter().fold(panel, |panel, field| match &field.setting {
            Some(setting) => panel.field(setting.clone(), field.to_descriptor()),
            None => panel.unbound_field(field.to_descriptor()),
        })
    }

    pub fn initial_state(&self) -> SettingsState {
        SettingsState::from_values(self.values.clone())
    }
}

/// Read a flat map of setting values from a TOML or JSON file.
pub fn load_values(path: impl AsRef<Path>) -> Result<IndexMap<String, Value>> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Ok(toml::from_str(&content)?),
        Some("json") => Ok(serde_json::from_str(&content)?),
        _ => Err(FieldError::UnsupportedFormat(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    const BASICS: &str = r#"
title = "Basics"

[values]
forum_title = "Forge"

[[fields]]
setting = "forum_title"
type = "text"
label = "Forum title"
className = "Wide"
maxlength = 64

[[fields]]
setting = "default_locale"
type = "select"
default = "en"
options = { en = "English", de = "Deutsch", fr = "Français" }
"#;

    #[test]
    fn toml_definition_keeps_extra_keys_as_attrs() {
        let definition = PanelDefinition::from_toml_str(BASICS).expect("parse");
        assert_eq!(definition.title.as_deref(), Some("Basics"));
        assert_eq!(definition.fields.len(), 2);

        let title = &definition.fields[0];
        assert_eq!(title.field_type.as_deref(), Some("text"));
        assert_eq!(title.class_name.as_deref(), Some("Wide"));
        assert_eq!(title.attrs.get("maxlength"), Some(&json!(64)));
        assert!(!title.attrs.contains_key("type"));
        assert!(!title.attrs.contains_key("setting"));

        let locale = definition.fields[1].to_descriptor();
        let order: Vec<String> = locale.select_options().keys().cloned().collect();
        assert_eq!(order, vec!["en", "de", "fr"]);
        assert_eq!(definition.values.get("forum_title"), Some(&json!("Forge")));
    }

    #[test]
    fn json_definition() {
        let definition = PanelDefinition::from_json_str(
            r#"{"fields": [{"setting": "allow_sign_up", "type": "bool", "label": "Allow sign up"}]}"#,
        )
        .expect("parse");
        assert_eq!(definition.fields[0].field_type.as_deref(), Some("bool"));
        assert!(definition.fields[0].attrs.is_empty());
    }

    #[test]
    fn empty_setting_key_is_rejected() {
        let err = PanelDefinition::from_toml_str("[[fields]]\nsetting = \"\"\ntype = \"text\"\n")
            .expect_err("invalid");
        assert!(matches!(err, FieldError::InvalidDefinition(_)));
    }

    #[test]
    fn load_picks_format_from_extension() {
        let dir = tempfile::tempdir().expect("tempdir");
        let toml_path = dir.path().join("basics.toml");
        fs::write(&toml_path, BASICS).expect("write");
        let definition = PanelDefinition::load(&toml_path).expect("load");
        assert_eq!(definition.fields.len(), 2);

        let yaml_path = dir.path().join("basics.yaml");
        fs::write(&yaml_path, "title: x").expect("write");
        assert!(matches!(
            PanelDefinition::load(&yaml_path),
            Err(FieldError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn definition_renders_with_initial_values() {
        let definition = PanelDefinition::from_toml_str(BASICS).expect("parse");
        let panel = definition.to_panel(FieldExtensions::new());
        let mut state = definition.initial_state();
        let view = panel.render(&mut state);
        assert!(view.failures.is_empty());

        let title = view.node.find(|e| e.attr_str("type") == Some("text")).expect("input");
        assert_eq!(title.attr_str("value"), Some("Forge"));
        assert_eq!(title.attr_str("class"), Some("FormControl Wide"));
        assert_eq!(title.get_attr("maxlength"), Some(&json!(64)));

        let select = view.node.find_by_tag("select").expect("select");
        assert_eq!(select.attr_str("value"), Some("en"));
    }

    #[test]
    fn definition_keys_cannot_inject_attributes() {
        let definition = PanelDefinition::from_json_str(
            r#"{"fields": [{"setting": "t", "type": "text", "x onfocus=alert(1) autofocus y": "1", "maxlength": 8}]}"#,
        )
        .expect("parse");
        let view = definition
            .to_panel(FieldExtensions::new())
            .render(&mut definition.initial_state());
        let html = view.node.to_html();
        assert!(!html.contains("onfocus"), "{html}");
        assert!(!html.contains("autofocus"), "{html}");
        assert!(html.contains("maxlength=\"8\""), "{html}");
    }

    #[test]
    fn values_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("values.json");
        fs::write(&path, r#"{"forum_title": "From file", "per_page": 20}"#).expect("write");
        let values = load_values(&path).expect("values");
        assert_eq!(values.get("per_page"), Some(&json!(20)));
    }
}
