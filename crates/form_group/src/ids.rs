use uuid::Uuid;

/// Mint a process-unique, DOM-safe id of the form `{prefix}-{32 hex chars}`.
pub fn unique_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}

/// Ids linking a field's control to its label and help text.
///
/// Regenerated on every render; nothing may rely on them being stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedIds {
    pub input_id: String,
    pub help_text_id: String,
}

impl GeneratedIds {
    pub fn generate() -> Self {
        Self {
            input_id: unique_id("field"),
            help_text_id: unique_id("field-help"),
        }
    }
}
