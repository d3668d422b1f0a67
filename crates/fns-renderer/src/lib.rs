//! Trait-based markdown renderer for vault notes.
//!
//! Notes are parsed once into a document tree; a [`RenderBackend`] then
//! produces the output:
//! - [`PreviewBackend`]: styled [`ViewNode`] tree for the host UI
//! - [`HtmlBackend`]: HTML fragment, wrapped by [`export_document`] into a
//!   standalone file
//!
//! [`NotePipeline`] runs the whole flow: embed rewrite with `fns-embed`,
//! rendering, and export assembly.
//!
//! # Example
//!
//! ```
//! use fns_embed::AttachmentContext;
//! use fns_renderer::NotePipeline;
//!
//! let context = AttachmentContext::new("https://sync.example.com", "notes").with_token("abc");
//! let pipeline = NotePipeline::new(context);
//!
//! let result = pipeline.export_html("# Trip\n\n![[clip.mp4]]");
//! assert_eq!(result.title.as_deref(), Some("Trip"));
//! assert!(result.output.contains("<video src="));
//! ```

mod backend;
mod export;
pub mod highlight;
mod html;
mod pipeline;
mod preview;
mod renderer;
mod state;
mod tree;
mod util;

pub use backend::RenderBackend;
pub use export::{
    DEFAULT_EXPORT_TITLE, EXPORT_STYLE, ExportDocument, export_document, export_file_name,
};
pub use html::HtmlBackend;
pub use pipeline::NotePipeline;
pub use preview::{PreviewBackend, ViewNode, walk};
pub use renderer::{MarkdownRenderer, RenderResult};
pub use fns_embed::escape_html;
pub use state::{TocEntry, slugify};
pub use tree::{Element, Node, elements, text_content};
