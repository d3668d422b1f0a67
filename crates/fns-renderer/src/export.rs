//! Standalone HTML export documents.

use chrono::{DateTime, SecondsFormat, Utc};

use fns_embed::escape_html;

/// Default document title of exports.
pub const DEFAULT_EXPORT_TITLE: &str = "Export";

/// Stylesheet inlined into every export.
pub const EXPORT_STYLE: &str = r#"
body {
  margin: 0;
  font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", sans-serif;
  color: #222;
  line-height: 1.75;
}
main {
  max-width: 900px;
  margin: 0 auto;
  padding: 40px 20px;
}
img, video {
  max-width: 100%;
  border-radius: 10px;
}
audio {
  width: 100%;
}
pre {
  overflow-x: auto;
  background: #f6f8fa;
  border-radius: 10px;
  padding: 14px;
}
code {
  font-family: "SFMono-Regular", Menlo, Monaco, Consolas, monospace;
}
table {
  width: 100%;
  border-collapse: collapse;
}
th, td {
  border: 1px solid #e5e7eb;
  padding: 6px 10px;
  text-align: left;
}
blockquote {
  margin: 0;
  padding-left: 12px;
  border-left: 4px solid #e5e7eb;
  color: #6b7280;
}
.hljs-comment, .hljs-quote { color: #6b7280; }
.hljs-keyword, .hljs-selector-tag, .hljs-literal { color: #2563eb; }
.hljs-title, .hljs-section, .hljs-name { color: #16a34a; }
.hljs-string, .hljs-attr, .hljs-template-tag, .hljs-char { color: #b45309; }
.hljs-number, .hljs-built_in, .hljs-type { color: #9333ea; }
.hljs-strong { font-weight: bold; }
.hljs-emphasis { font-style: italic; }
"#;

/// Rendered export ready to be written to disk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExportDocument {
    /// Suggested file name, `note-<timestamp>.html`.
    pub file_name: String,
    /// Document `<title>`.
    pub title: String,
    /// Complete HTML document.
    pub html: String,
}

/// File name for an export created at `now`.
///
/// The ISO-8601 timestamp has `:` and `.` replaced with `-` so it is safe
/// on every filesystem.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use fns_renderer::export_file_name;
///
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 34, 56).unwrap();
/// assert_eq!(export_file_name(now), "note-2024-05-01T12-34-56-000Z.html");
/// ```
#[must_use]
pub fn export_file_name(now: DateTime<Utc>) -> String {
    let stamp = now
        .to_rfc3339_opts(SecondsFormat::Millis, true)
        .replace([':', '.'], "-");
    format!("note-{stamp}.html")
}

/// Wrap rendered body HTML into a standalone document.
#[must_use]
pub fn export_document(body: &str, title: &str) -> String {
    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8" />
<meta name="viewport" content="width=device-width, initial-scale=1" />
<title>{title}</title>
<style>{EXPORT_STYLE}</style>
</head>
<body><main>{body}</main></body>
</html>"#,
        title = escape_html(title),
    )
}
