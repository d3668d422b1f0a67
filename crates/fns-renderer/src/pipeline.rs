//! End-to-end note rendering: embed rewrite, then preview or export.

use std::borrow::Cow;

use chrono::{DateTime, Utc};
use fns_embed::{AttachmentContext, EmbedTransformer};

use crate::backend::RenderBackend;
use crate::export::{DEFAULT_EXPORT_TITLE, ExportDocument, export_document, export_file_name};
use crate::html::HtmlBackend;
use crate::preview::{PreviewBackend, ViewNode};
use crate::renderer::{MarkdownRenderer, RenderResult};

/// Renders raw vault notes for one attachment context.
///
/// Preview and export share the embed rewrite and the renderer rules, so
/// the same note yields the same attachment URLs in both.
#[derive(Clone, Debug)]
pub struct NotePipeline {
    context: AttachmentContext,
    gfm: bool,
    highlight: bool,
    export_title: String,
}

impl NotePipeline {
    #[must_use]
    pub fn new(context: AttachmentContext) -> Self {
        Self {
            context,
            gfm: true,
            highlight: true,
            export_title: DEFAULT_EXPORT_TITLE.to_owned(),
        }
    }

    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    #[must_use]
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Set the `<title>` of export documents whose note has no H1 heading.
    #[must_use]
    pub fn with_export_title(mut self, title: impl Into<String>) -> Self {
        self.export_title = title.into();
        self
    }

    #[must_use]
    pub fn context(&self) -> &AttachmentContext {
        &self.context
    }

    /// Rewrite attachment embeds into standard Markdown.
    pub fn transform<'t>(&self, text: &'t str) -> Cow<'t, str> {
        EmbedTransformer::new(&self.context).transform(text)
    }

    /// Render a note as a preview view tree.
    pub fn preview(&self, text: &str) -> RenderResult<Vec<ViewNode>> {
        self.render::<PreviewBackend>(text)
    }

    /// Render a note body as an HTML fragment.
    pub fn export_html(&self, text: &str) -> RenderResult<String> {
        self.render::<HtmlBackend>(text)
    }

    /// Render a note into a standalone HTML document stamped with `now`.
    ///
    /// The note's first H1 names the document, falling back to the export
    /// title.
    pub fn export(&self, text: &str, now: DateTime<Utc>) -> ExportDocument {
        let body = self.export_html(text);
        for warning in &body.warnings {
            tracing::warn!(warning = %warning, "Export rendered with warning");
        }
        let title = body
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| self.export_title.clone());
        let document = ExportDocument {
            file_name: export_file_name(now),
            html: export_document(&body.output, &title),
            title,
        };
        tracing::debug!(file_name = %document.file_name, bytes = document.html.len(), "Built export document");
        document
    }

    fn render<B: RenderBackend>(&self, text: &str) -> RenderResult<B::Output> {
        let markdown = self.transform(text);
        MarkdownRenderer::<B>::new()
            .with_gfm(self.gfm)
            .with_highlighting(self.highlight)
            .with_title_extraction()
            .render_markdown(&markdown)
    }
}
