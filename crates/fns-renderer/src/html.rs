//! HTML backend for markdown rendering.
//!
//! Serializes the document tree to an HTML fragment, used for exports.

use crate::backend::RenderBackend;
use fns_embed::escape_html;
use crate::tree::{BOOLEAN_ATTRIBUTES, Element, Node};

/// HTML render backend.
///
/// Text and attribute values are escaped, raw HTML nodes are written as-is
/// and void elements get no closing tag.
pub struct HtmlBackend;

impl RenderBackend for HtmlBackend {
    type Output = String;

    fn render(nodes: &[Node]) -> String {
        let mut out = String::with_capacity(4096);
        write_nodes(nodes, &mut out);
        out
    }
}

fn write_nodes(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(element) => write_element(element, out),
            Node::Text(text) => out.push_str(&escape_html(text)),
            Node::Html(html) => out.push_str(html),
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    out.push('<');
    out.push_str(element.tag);
    for (name, value) in &element.attrs {
        out.push(' ');
        out.push_str(name);
        if value.is_empty() && BOOLEAN_ATTRIBUTES.contains(name) {
            continue;
        }
        out.push_str("=\"");
        out.push_str(&escape_html(value));
        out.push('"');
    }
    out.push('>');

    if element.is_void() {
        return;
    }

    write_nodes(&element.children, out);
    out.push_str("</");
    out.push_str(element.tag);
    out.push('>');
}
