//! Declarative settings-field renderer.
//!
//! A [`FieldDescriptor`] names a field kind through its `type` token. The
//! dispatcher in [`form_group`] classifies the token into a [`FieldBucket`],
//! normalises the descriptor's attributes for that bucket and renders the
//! matching control, wired to the field's [`Binding`], into a [`Node`] tree.
//!
//! Extensions add new field kinds through [`FieldExtensions`]; their hooks
//! populate a fresh [`CustomFieldRegistry`] on every render pass.
//!
//! - **Pure rendering**: no I/O, no persistence; writes reach a binding only
//!   when a rendered handler is dispatched
//! - **Fault isolation**: [`SettingsPanel`] renders a placeholder for a field
//!   that fails and keeps going

pub mod bucket;
pub mod config;
pub mod descriptor;
pub mod errors;
pub mod form_group;
pub mod ids;
pub mod node;
pub mod panel;
pub mod registry;
pub mod value;
pub mod widgets;

pub use bucket::FieldBucket;
pub use config::{FieldEntry, PanelDefinition};
pub use descriptor::{FieldDescriptor, SelectOptions};
pub use errors::{FieldError, Result};
pub use form_group::{FormGroup, render_field};
pub use ids::GeneratedIds;
pub use node::{Element, Handler, Node, class_list};
pub use panel::{FieldFailure, PanelEntry, PanelView, SettingsPanel, SettingsState};
pub use registry::{CustomFieldRegistry, CustomFieldRenderer, FieldExtensions, ItemList};
pub use value::Binding;
