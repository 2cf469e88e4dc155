use std::path::PathBuf;
use thiserror::Error;

/// Result type for field rendering and panel loading.
pub type Result<T> = std::result::Result<T, FieldError>;

#[derive(Error, Debug)]
pub enum FieldError {
    #[error("field descriptor has no type")]
    MissingType,

    /// Classification routed to the custom bucket but the registry had no renderer
    /// for the key at lookup time.
    #[error("custom field type not registered: {0}")]
    UnregisteredCustomField(String),

    #[error("invalid panel definition: {0}")]
    InvalidDefinition(String),

    #[error("unsupported definition format: {0:?}")]
    UnsupportedFormat(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
