//! Page-side state: the document model, the synchronizers that keep it in
//! line with the current selection, and the controller that drives them.

pub mod chooser;
pub mod controller;
pub mod dom;
pub mod manifest;
pub mod navigation;
pub mod placeholders;
pub mod visibility;

pub use chooser::{HandlerTable, OptionHandler};
pub use controller::{PageController, RenderReport};
pub use dom::{Document, NodeId, NodeSpec};
pub use manifest::{PageData, PageManifest};
pub use navigation::{build_outline, Heading, NavEntry, NavList};
pub use visibility::ValueChange;
