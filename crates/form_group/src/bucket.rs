//! Classification of a field's `type` token into a rendering path.

use strum::{AsRefStr, Display, EnumIter};

use crate::descriptor::{DEFAULT_KEY, OPTIONS_KEY, VALUE_KEY};
use crate::registry::CustomFieldRegistry;

pub const BOOLEAN_TYPES: &[&str] = &["bool", "checkbox", "switch", "boolean"];
pub const SELECT_TYPES: &[&str] = &["select", "dropdown", "selectdropdown"];
pub const IMAGE_UPLOAD_TYPE: &str = "image-upload";
pub const TEXTAREA_TYPE: &str = "textarea";
pub const COLOR_PREVIEW_TYPE: &str = "color-preview";

/// The rendering path chosen for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, AsRefStr, EnumIter)]
#[strum(serialize_all = "kebab-case")]
pub enum FieldBucket {
    Boolean,
    Select,
    ImageUpload,
    Custom,
    Textarea,
    ColorPreview,
    GenericInput,
}

impl FieldBucket {
    /// Classify a type token. First match wins:
    ///
    /// 1. boolean family
    /// 2. select family
    /// 3. `image-upload`
    /// 4. any key present in `registry`
    /// 5. `textarea`
    /// 6. `color-preview`
    /// 7. everything else is a plain `<input>` of that type
    ///
    /// Custom registrations therefore cannot shadow the first three rows but
    /// can shadow everything after them.
    pub fn classify(field_type: &str, registry: &CustomFieldRegistry) -> Self {
        if BOOLEAN_TYPES.contains(&field_type) {
            FieldBucket::Boolean
        } else if SELECT_TYPES.contains(&field_type) {
            FieldBucket::Select
        } else if field_type == IMAGE_UPLOAD_TYPE {
            FieldBucket::ImageUpload
        } else if registry.has(field_type) {
            FieldBucket::Custom
        } else if field_type == TEXTAREA_TYPE {
            FieldBucket::Textarea
        } else if field_type == COLOR_PREVIEW_TYPE {
            FieldBucket::ColorPreview
        } else {
            FieldBucket::GenericInput
        }
    }

    /// Descriptor keys that must not reach the rendered control as raw attributes.
    pub fn stripped_keys(self) -> &'static [&'static str] {
        match self {
            FieldBucket::Select => &[OPTIONS_KEY, DEFAULT_KEY],
            FieldBucket::ImageUpload => &[VALUE_KEY],
            FieldBucket::Boolean
            | FieldBucket::Custom
            | FieldBucket::Textarea
            | FieldBucket::ColorPreview
            | FieldBucket::GenericInput => &[],
        }
    }

    /// Whether the result goes through the shared label/help wrapper.
    pub fn uses_common_wrapper(self) -> bool {
        !matches!(self, FieldBucket::Boolean | FieldBucket::Custom)
    }
}
