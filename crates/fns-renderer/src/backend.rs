//! Render backend trait for output-specific serialization.
//!
//! The renderer builds one document tree; backends decide what to produce
//! from it. [`HtmlBackend`](crate::HtmlBackend) serializes to an HTML
//! string for export, [`PreviewBackend`](crate::PreviewBackend) produces a
//! styled view tree for the host UI.

use crate::tree::Node;

/// Backend trait for turning a document tree into output.
pub trait RenderBackend {
    /// Rendered output type.
    type Output;

    /// Render the top-level nodes of a document.
    fn render(nodes: &[Node]) -> Self::Output;
}
