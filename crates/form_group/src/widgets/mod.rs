//! Leaf controls used by the field dispatcher.
//!
//! Each widget is a small builder that renders itself once into a [`Node`].
//! They own their markup and nothing else: no value coercion, no attribute
//! stripping. That happens in [`crate::form_group`].

mod color_preview_input;
mod select;
mod switch;
mod upload_image_button;

pub use color_preview_input::ColorPreviewInput;
pub use select::Select;
pub use switch::Switch;
pub use upload_image_button::UploadImageButton;

use crate::node::Node;

/// A component that consumes itself to produce markup.
pub trait RenderOnce {
    fn render(self) -> Node;
}

macro_rules! impl_into_node {
    ($($widget:ty),* $(,)?) => {
        $(
            impl From<$widget> for Node {
                fn from(widget: $widget) -> Self {
                    widget.render()
                }
            }
        )*
    };
}

impl_into_node!(Switch, Select, UploadImageButton, ColorPreviewInput);
