//! Obsidian attachment embed rewriting.
//!
//! Notes stored in a vault reference attachments with Obsidian's embed
//! syntax (`![[diagram.png]]`, `![[clip.mp4|Intro]]`, `![[photo.jpg|300]]`).
//! Standard Markdown renderers don't understand it, so before rendering the
//! note text is rewritten into portable Markdown whose links point at the
//! sync service's attachment endpoint.
//!
//! The pieces, leaf first:
//! - [`AttachmentKind`]: image/video/audio/file classification by extension
//! - [`resolve_link`]: short attachment name to vault-relative path
//! - [`FileUrl`]: authenticated `/api/file` retrieval URLs
//! - [`EmbedTransformer`]: the text rewrite itself
//!
//! # Example
//!
//! ```
//! use fns_embed::{AttachmentContext, EmbedTransformer};
//!
//! let context = AttachmentContext::new("https://sync.example.com", "notes")
//!     .with_token("abc");
//! let transformer = EmbedTransformer::new(&context);
//!
//! let markdown = transformer.transform("See ![[diagram.png]]");
//! assert_eq!(
//!     markdown,
//!     "See ![diagram.png](https://sync.example.com/api/file?vault=notes&path=diagram.png&token=abc)"
//! );
//! ```

mod context;
mod escape;
mod file_url;
mod kind;
mod link;
mod transform;

pub use context::AttachmentContext;
pub use escape::{escape_html, escape_markdown_text};
pub use file_url::{FILE_ENDPOINT, FileUrl, attachment_path_from_href};
pub use kind::AttachmentKind;
pub use link::{LinkMap, LinkMapError, load_link_map, parse_link_map, resolve_link};
pub use transform::{EmbedRef, EmbedTransformer, is_sized_image_html};
