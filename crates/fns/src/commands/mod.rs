//! CLI command implementations.

mod export;
mod note;
mod preview;
mod transform;

pub(crate) use export::ExportArgs;
pub(crate) use preview::PreviewArgs;
pub(crate) use transform::TransformArgs;
