//! Generic markdown renderer with pluggable backend.

use std::marker::PhantomData;

use fns_embed::{AttachmentKind, attachment_path_from_href, is_sized_image_html};
use pulldown_cmark::{CodeBlockKind, Event, Options, Parser, Tag, TagEnd};

use crate::backend::RenderBackend;
use crate::highlight;
use crate::state::{CodeBlockState, HeadingState, ImageState, TableState, TocEntry};
use crate::tree::{Element, Node};
use crate::util::{fence_language, heading_level_to_num, heading_tag};

/// Tag of the pseudo-element holding the top-level nodes while building.
const ROOT_TAG: &str = "root";

/// Result of rendering markdown.
#[derive(Clone, Debug)]
pub struct RenderResult<T> {
    /// Backend output.
    pub output: T,
    /// Title extracted from first H1 heading (if `extract_title` was enabled).
    pub title: Option<String>,
    /// Table of contents entries.
    pub toc: Vec<TocEntry>,
    /// Non-fatal issues, such as code blocks in languages without a grammar.
    pub warnings: Vec<String>,
}

/// Generic markdown renderer with pluggable backend.
///
/// Parser events are folded into a [`Node`] tree once; the backend then
/// turns the tree into its output. Rules that hold in every output live
/// here:
/// - links to video/audio attachments become `<video>`/`<audio>` players
/// - other links open in a new tab (`target="_blank" rel="noreferrer"`)
/// - images load lazily
/// - task list checkboxes are disabled
/// - fenced code in a known language is highlighted
/// - sized image embeds pass through as raw HTML; any other raw HTML is
///   kept as literal text
pub struct MarkdownRenderer<B: RenderBackend> {
    /// Open elements, innermost last. The first entry is the document root.
    stack: Vec<Element>,
    /// Code block rendering state.
    code: CodeBlockState,
    /// Table rendering state.
    table: TableState,
    /// Image alt text capture state.
    image: ImageState,
    /// Heading and title extraction state.
    heading: HeadingState,
    /// Pending image data (src, title) waiting for alt text.
    pending_image: Option<(String, String)>,
    /// Enable GitHub Flavored Markdown extensions.
    gfm: bool,
    /// Highlight fenced code blocks.
    highlight: bool,
    warnings: Vec<String>,
    /// Phantom data for the backend type.
    _backend: PhantomData<B>,
}

impl<B: RenderBackend> MarkdownRenderer<B> {
    /// Create a new renderer with GFM and highlighting enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            stack: vec![Element::new(ROOT_TAG)],
            code: CodeBlockState::default(),
            table: TableState::default(),
            image: ImageState::default(),
            heading: HeadingState::new(false),
            pending_image: None,
            gfm: true,
            highlight: true,
            warnings: Vec::new(),
            _backend: PhantomData,
        }
    }

    /// Enable title extraction from first H1 heading.
    ///
    /// The heading is still rendered but left out of the table of contents.
    #[must_use]
    pub fn with_title_extraction(mut self) -> Self {
        self.heading = HeadingState::new(true);
        self
    }

    /// Enable or disable GitHub Flavored Markdown extensions.
    ///
    /// When enabled (default), the parser supports:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable or disable syntax highlighting of fenced code blocks.
    #[must_use]
    pub fn with_highlighting(mut self, enabled: bool) -> Self {
        self.highlight = enabled;
        self
    }

    /// Get parser options based on GFM configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        if self.gfm {
            Options::ENABLE_TABLES | Options::ENABLE_STRIKETHROUGH | Options::ENABLE_TASKLISTS
        } else {
            Options::empty()
        }
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text directly using configured parser options.
    pub fn render_markdown(&mut self, markdown: &str) -> RenderResult<B::Output> {
        self.render(self.create_parser(markdown))
    }

    /// Render markdown events and return the result.
    pub fn render<'a, I>(&mut self, events: I) -> RenderResult<B::Output>
    where
        I: Iterator<Item = Event<'a>>,
    {
        for event in events {
            self.process_event(event);
        }

        while self.stack.len() > 1 {
            self.close();
        }
        let root = std::mem::replace(&mut self.stack[0], Element::new(ROOT_TAG));
        tracing::trace!(nodes = root.children.len(), "Built document tree");

        RenderResult {
            output: B::render(&root.children),
            title: self.heading.take_title(),
            toc: self.heading.take_toc(),
            warnings: std::mem::take(&mut self.warnings),
        }
    }

    fn process_event(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start_tag(tag),
            Event::End(tag) => self.end_tag(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) | Event::InlineHtml(html) => self.raw_html(&html),
            Event::SoftBreak => self.soft_break(),
            Event::HardBreak => self.leaf(Element::new("br")),
            Event::Rule => self.leaf(Element::new("hr")),
            Event::TaskListMarker(checked) => self.task_list_marker(checked),
            Event::FootnoteReference(_) | Event::InlineMath(_) | Event::DisplayMath(_) => {
                // Not supported
            }
        }
    }

    fn start_tag(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.open(Element::new("p")),
            Tag::Heading { level, .. } => {
                self.heading.start_heading(heading_level_to_num(level));
                self.open(Element::new(heading_tag(level)));
            }
            Tag::BlockQuote(_) => self.open(Element::new("blockquote")),
            Tag::CodeBlock(kind) => {
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => fence_language(&info),
                    CodeBlockKind::Indented => None,
                };
                self.code.start(lang);
            }
            Tag::List(Some(1)) => self.open(Element::new("ol")),
            Tag::List(Some(start)) => {
                self.open(Element::new("ol").with_attr("start", start.to_string()));
            }
            Tag::List(None) => self.open(Element::new("ul")),
            Tag::Item => self.open(Element::new("li")),
            Tag::FootnoteDefinition(_) | Tag::HtmlBlock | Tag::MetadataBlock(_) => {}
            Tag::DefinitionList => self.open(Element::new("dl")),
            Tag::DefinitionListTitle => self.open(Element::new("dt")),
            Tag::DefinitionListDefinition => self.open(Element::new("dd")),
            Tag::Table(alignments) => {
                self.table.start(alignments);
                self.open(Element::new("table"));
            }
            Tag::TableHead => {
                self.table.start_head();
                self.open(Element::new("thead"));
                self.open(Element::new("tr"));
            }
            Tag::TableRow => {
                self.table.start_row();
                self.open(Element::new("tr"));
            }
            Tag::TableCell => {
                let mut cell = Element::new(if self.table.is_in_head() { "th" } else { "td" });
                if let Some(style) = self.table.current_alignment_style() {
                    cell = cell.with_attr("style", style);
                }
                self.open(cell);
            }
            Tag::Emphasis => self.open_inline(Element::new("em")),
            Tag::Strong => self.open_inline(Element::new("strong")),
            Tag::Strikethrough => self.open_inline(Element::new("del")),
            Tag::Superscript => self.open_inline(Element::new("sup")),
            Tag::Subscript => self.open_inline(Element::new("sub")),
            Tag::Link {
                dest_url, title, ..
            } => self.open_inline(link_element(&dest_url, &title)),
            Tag::Image {
                dest_url, title, ..
            } => {
                // Alt text is collected until the matching end tag
                if !self.image.is_active() {
                    self.pending_image = Some((dest_url.into_string(), title.into_string()));
                }
                self.image.start();
            }
        }
    }

    fn end_tag(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph
            | TagEnd::BlockQuote(_)
            | TagEnd::List(_)
            | TagEnd::Item
            | TagEnd::DefinitionList
            | TagEnd::DefinitionListTitle
            | TagEnd::DefinitionListDefinition
            | TagEnd::TableRow => self.close(),
            TagEnd::Heading(_) => {
                let id = self.heading.complete_heading();
                if let Some(mut heading) = self.pop() {
                    if let Some(id) = id.filter(|id| !id.is_empty()) {
                        heading.set_attr("id", id);
                    }
                    self.append(heading.into());
                }
            }
            TagEnd::CodeBlock => {
                let (lang, content) = self.code.end();
                let block = self.code_block(lang.as_deref(), content);
                self.append(block.into());
            }
            TagEnd::FootnoteDefinition | TagEnd::HtmlBlock | TagEnd::MetadataBlock(_) => {}
            TagEnd::Table => {
                self.close(); // tbody
                self.close();
            }
            TagEnd::TableHead => {
                self.close(); // tr
                self.close();
                self.table.end_head();
                self.open(Element::new("tbody"));
            }
            TagEnd::TableCell => {
                self.close();
                self.table.next_cell();
            }
            TagEnd::Emphasis
            | TagEnd::Strong
            | TagEnd::Strikethrough
            | TagEnd::Superscript
            | TagEnd::Subscript => {
                if !self.image.is_active() {
                    self.close();
                }
            }
            TagEnd::Link => {
                if self.image.is_active() {
                    return;
                }
                if let Some(mut link) = self.pop() {
                    // Players replace the link text entirely
                    if matches!(link.tag, "video" | "audio") {
                        link.children.clear();
                    }
                    self.append(link.into());
                }
            }
            TagEnd::Image => {
                if let Some(alt) = self.image.end()
                    && let Some((src, title)) = self.pending_image.take()
                {
                    let mut img = Element::new("img")
                        .with_attr("src", src)
                        .with_attr("alt", alt);
                    if !title.is_empty() {
                        img = img.with_attr("title", title);
                    }
                    self.append(img.with_attr("loading", "lazy").into());
                }
            }
        }
    }

    fn text(&mut self, text: &str) {
        // Priority: code > image > heading > normal text
        if self.code.is_active() {
            self.code.push_str(text);
            return;
        }

        if self.image.is_active() {
            self.image.push_str(text);
            return;
        }

        if self.heading.is_active() {
            self.heading.push_text(text);
        }
        self.append(Node::Text(text.to_owned()));
    }

    fn inline_code(&mut self, code: &str) {
        if self.image.is_active() {
            self.image.push_str(code);
            return;
        }
        if self.heading.is_active() {
            self.heading.push_text(code);
        }
        self.leaf(Element::new("code").with_child(Node::Text(code.to_owned())));
    }

    fn raw_html(&mut self, html: &str) {
        if self.image.is_active() {
            return;
        }
        if is_sized_image_html(html) {
            self.append(Node::Html(html.to_owned()));
        } else {
            tracing::trace!(html, "Keeping raw HTML as text");
            self.text(html);
        }
    }

    fn soft_break(&mut self) {
        if self.image.is_active() {
            self.image.push_str(" ");
        } else {
            self.append(Node::Text("\n".to_owned()));
        }
    }

    fn task_list_marker(&mut self, checked: bool) {
        let mut input = Element::new("input").with_attr("type", "checkbox");
        if checked {
            input = input.with_attr("checked", "");
        }
        self.leaf(input.with_attr("disabled", ""));
    }

    fn code_block(&mut self, lang: Option<&str>, content: String) -> Element {
        let pre = Element::new("pre");
        let Some(lang) = lang else {
            return pre.with_child(code_element(None, content).into());
        };

        if self.highlight {
            if let Some(tokens) = highlight::highlight(lang, &content) {
                let mut code = Element::new("code").with_attr("class", format!("hljs language-{lang}"));
                code.children = tokens;
                return pre.with_child(code.into());
            }
            tracing::debug!(language = lang, "No grammar for code block language");
            self.warnings
                .push(format!("No syntax highlighting for language: {lang}"));
        }
        pre.with_child(code_element(Some(lang), content).into())
    }

    fn open(&mut self, element: Element) {
        self.stack.push(element);
    }

    /// Open an inline element unless alt text is being collected.
    fn open_inline(&mut self, element: Element) {
        if !self.image.is_active() {
            self.open(element);
        }
    }

    /// Pop the innermost open element. The root is never popped.
    fn pop(&mut self) -> Option<Element> {
        if self.stack.len() > 1 {
            self.stack.pop()
        } else {
            None
        }
    }

    /// Close the innermost open element into its parent.
    fn close(&mut self) {
        if let Some(element) = self.pop() {
            self.append(element.into());
        }
    }

    fn leaf(&mut self, element: Element) {
        if !self.image.is_active() {
            self.append(element.into());
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(parent) = self.stack.last_mut() {
            parent.push(node);
        }
    }
}

impl<B: RenderBackend> Default for MarkdownRenderer<B> {
    fn default() -> Self {
        Self::new()
    }
}

/// Link element for `href`, or a player when it targets video or audio.
fn link_element(href: &str, title: &str) -> Element {
    match AttachmentKind::from_path(&attachment_path_from_href(href)) {
        AttachmentKind::Video => Element::new("video")
            .with_attr("src", href)
            .with_attr("controls", ""),
        AttachmentKind::Audio => Element::new("audio")
            .with_attr("src", href)
            .with_attr("controls", ""),
        AttachmentKind::Image | AttachmentKind::File => {
            let mut link = Element::new("a").with_attr("href", href);
            if !title.is_empty() {
                link = link.with_attr("title", title);
            }
            link.with_attr("target", "_blank")
                .with_attr("rel", "noreferrer")
        }
    }
}

fn code_element(lang: Option<&str>, content: String) -> Element {
    let mut code = Element::new("code");
    if let Some(lang) = lang {
        code = code.with_attr("class", format!("language-{lang}"));
    }
    if !content.is_empty() {
        code.push(Node::Text(content));
    }
    code
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::HtmlBackend;

    fn render_html(markdown: &str) -> RenderResult<String> {
        MarkdownRenderer::<HtmlBackend>::new().render_markdown(markdown)
    }

    fn render_html_with_title(markdown: &str) -> RenderResult<String> {
        MarkdownRenderer::<HtmlBackend>::new()
            .with_title_extraction()
            .render_markdown(markdown)
    }

    #[test]
    fn test_html_basic_paragraph() {
        let result = render_html("Hello, world!");
        assert_eq!(result.output, "<p>Hello, world!</p>");
    }

    #[test]
    fn test_html_heading_with_id() {
        let result = render_html("## Section Title");
        assert_eq!(result.output, r#"<h2 id="section-title">Section Title</h2>"#);
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
        assert_eq!(result.toc[0].title, "Section Title");
        assert_eq!(result.toc[0].id, "section-title");
    }

    #[test]
    fn test_html_title_extraction() {
        let result = render_html_with_title("# My Title\n\nSome content\n\n## Section");

        assert_eq!(result.title, Some("My Title".to_owned()));
        assert!(result.output.contains(r#"<h1 id="my-title">My Title</h1>"#));
        assert_eq!(result.toc.len(), 1);
        assert_eq!(result.toc[0].level, 2);
    }

    #[test]
    fn test_duplicate_heading_ids() {
        let result = render_html("## FAQ\n\n## FAQ\n\n## FAQ");
        let ids: Vec<_> = result.toc.iter().map(|entry| entry.id.as_str()).collect();
        assert_eq!(ids, vec!["faq", "faq-1", "faq-2"]);
    }

    #[test]
    fn test_heading_with_inline_code() {
        let result = render_html("## Install `npm`");
        assert_eq!(
            result.output,
            r#"<h2 id="install-npm">Install <code>npm</code></h2>"#
        );
        assert_eq!(result.toc[0].title, "Install npm");
    }

    #[test]
    fn test_highlighted_code_block() {
        let result = render_html("```rust\nfn main() {}\n```");
        assert!(
            result
                .output
                .starts_with(r#"<pre><code class="hljs language-rust"><span class="hljs-"#),
            "{}",
            result.output
        );
        assert!(result.output.ends_with("</code></pre>"));
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_unknown_language_falls_back() {
        let result = render_html("```mermaid\ngraph TD; A-->B\n```");
        assert_eq!(
            result.output,
            r#"<pre><code class="language-mermaid">graph TD; A--&gt;B
</code></pre>"#
        );
        assert_eq!(result.warnings.len(), 1);
        assert!(result.warnings[0].contains("mermaid"));
    }

    #[test]
    fn test_highlighting_disabled() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_highlighting(false)
            .render_markdown("```rust\nlet x = 1;\n```");
        assert_eq!(
            result.output,
            "<pre><code class=\"language-rust\">let x = 1;\n</code></pre>"
        );
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_code_block_without_language() {
        let result = render_html("```\nplain text\n```");
        assert_eq!(result.output, "<pre><code>plain text\n</code></pre>");
    }

    #[test]
    fn test_indented_code_block() {
        let result = render_html("    indented <b>\n");
        assert_eq!(result.output, "<pre><code>indented &lt;b&gt;\n</code></pre>");
    }

    #[test]
    fn test_link_opens_new_tab() {
        let result = render_html("[site](https://example.com)");
        assert_eq!(
            result.output,
            r#"<p><a href="https://example.com" target="_blank" rel="noreferrer">site</a></p>"#
        );
    }

    #[test]
    fn test_link_title() {
        let result = render_html(r#"[site](https://example.com "Example")"#);
        assert!(result.output.contains(r#"title="Example""#));
    }

    #[test]
    fn test_video_link_becomes_player() {
        let result =
            render_html("[🎬 clip.mp4](http://api/api/file?vault=v&path=media%2Fclip.mp4&token=t)");
        assert_eq!(
            result.output,
            r#"<p><video src="http://api/api/file?vault=v&amp;path=media%2Fclip.mp4&amp;token=t" controls></video></p>"#
        );
    }

    #[test]
    fn test_audio_link_becomes_player() {
        let result = render_html("[🎵 Song](/api/file?vault=v&path=Song.MP3&token=t)");
        assert!(result.output.contains("<audio src="), "{}", result.output);
        assert!(!result.output.contains("Song</"));
    }

    #[test]
    fn test_plain_media_href_becomes_player() {
        let result = render_html("[intro](https://cdn.example.com/intro.webm)");
        assert_eq!(
            result.output,
            r#"<p><video src="https://cdn.example.com/intro.webm" controls></video></p>"#
        );
    }

    #[test]
    fn test_file_link_stays_link() {
        let result = render_html("[📎 report.pdf](/api/file?vault=v&path=report.pdf&token=t)");
        assert!(result.output.contains(r#"target="_blank""#));
        assert!(result.output.contains("📎 report.pdf</a>"));
    }

    #[test]
    fn test_html_image() {
        let result = render_html("![Alt text](image.png)");
        assert_eq!(
            result.output,
            r#"<p><img src="image.png" alt="Alt text" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_image_alt_ignores_formatting() {
        let result = render_html("![*big* `cat`](c.png \"Cat\")");
        assert_eq!(
            result.output,
            r#"<p><img src="c.png" alt="big cat" title="Cat" loading="lazy"></p>"#
        );
    }

    #[test]
    fn test_image_inside_link() {
        let result = render_html("[![badge](b.svg)](https://ci.example.com)");
        assert_eq!(
            result.output,
            r#"<p><a href="https://ci.example.com" target="_blank" rel="noreferrer"><img src="b.svg" alt="badge" loading="lazy"></a></p>"#
        );
    }

    #[test]
    fn test_sized_image_passthrough() {
        let result = render_html(r#"See <img src="x.png" alt="x.png" width="100" /> here"#);
        assert_eq!(
            result.output,
            r#"<p>See <img src="x.png" alt="x.png" width="100" /> here</p>"#
        );
    }

    #[test]
    fn test_other_inline_html_is_text() {
        let result = render_html(r#"Hi <img src=x onerror="alert(1)"> <b>there</b>"#);
        assert_eq!(
            result.output,
            "<p>Hi &lt;img src=x onerror=&quot;alert(1)&quot;&gt; &lt;b&gt;there&lt;/b&gt;</p>"
        );
    }

    #[test]
    fn test_html_block_is_text() {
        let result = render_html("<div onclick=\"x()\">raw</div>\n");
        assert!(!result.output.contains("<div"), "{}", result.output);
        assert!(result.output.contains("&lt;div"), "{}", result.output);
    }

    #[test]
    fn test_table() {
        let result = render_html("| A | B |\n|---|--:|\n| 1 | 2 |");
        assert_eq!(
            result.output,
            concat!(
                "<table><thead><tr><th>A</th><th style=\"text-align:right\">B</th></tr></thead>",
                "<tbody><tr><td>1</td><td style=\"text-align:right\">2</td></tr></tbody></table>"
            )
        );
    }

    #[test]
    fn test_gfm_disabled() {
        let result = MarkdownRenderer::<HtmlBackend>::new()
            .with_gfm(false)
            .render_markdown("~~old~~ - [ ] todo");
        assert!(!result.output.contains("<del>"));
        assert!(!result.output.contains("<input"));
    }

    #[test]
    fn test_strikethrough() {
        let result = render_html("~~deleted~~");
        assert_eq!(result.output, "<p><del>deleted</del></p>");
    }

    #[test]
    fn test_emphasis() {
        let result = render_html("*italic* and **bold**");
        assert_eq!(
            result.output,
            "<p><em>italic</em> and <strong>bold</strong></p>"
        );
    }

    #[test]
    fn test_lists() {
        let result = render_html("- Item 1\n- Item 2");
        assert_eq!(result.output, "<ul><li>Item 1</li><li>Item 2</li></ul>");

        let result = render_html("3. Third\n4. Fourth");
        assert_eq!(
            result.output,
            r#"<ol start="3"><li>Third</li><li>Fourth</li></ol>"#
        );
    }

    #[test]
    fn test_task_list() {
        let result = render_html("- [ ] Unchecked\n- [x] Checked");
        assert_eq!(
            result.output,
            concat!(
                r#"<ul><li><input type="checkbox" disabled>Unchecked</li>"#,
                r#"<li><input type="checkbox" checked disabled>Checked</li></ul>"#
            )
        );
    }

    #[test]
    fn test_blockquote_and_rule() {
        let result = render_html("> Note\n\n---");
        assert_eq!(result.output, "<blockquote><p>Note</p></blockquote><hr>");
    }

    #[test]
    fn test_breaks() {
        let result = render_html("a  \nb\nc");
        assert_eq!(result.output, "<p>a<br>b\nc</p>");
    }

    #[test]
    fn test_renderer_reusable() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::default();
        assert_eq!(renderer.render_markdown("one").output, "<p>one</p>");
        assert_eq!(renderer.render_markdown("two").output, "<p>two</p>");
    }

    #[test]
    fn test_heading_ids_restart_per_render() {
        let mut renderer = MarkdownRenderer::<HtmlBackend>::new().with_title_extraction();
        let first = renderer.render_markdown("# Notes\n\n## FAQ");
        let second = renderer.render_markdown("# Notes\n\n## FAQ");

        assert_eq!(first.output, second.output);
        assert_eq!(second.output, r#"<h1 id="notes">Notes</h1><h2 id="faq">FAQ</h2>"#);
        assert_eq!(second.title.as_deref(), Some("Notes"));
        assert_eq!(first.toc, second.toc);
    }
}
