//! Preview backend producing a styled view tree for the host UI.

use std::collections::BTreeMap;

use crate::backend::RenderBackend;
use crate::tree::{Element, Node};

/// Class of the scroll container wrapped around tables.
const TABLE_WRAPPER_CLASS: &str = "my-4 overflow-x-auto";

const INLINE_CODE_CLASS: &str = "rounded bg-muted px-1.5 py-0.5 text-[0.9em]";
const BLOCK_CODE_CLASS: &str = "text-sm";

/// Node of a preview view tree.
///
/// Serializes (with the `serde` feature) as internally tagged JSON:
/// `{"type": "element", "tag": "p", "attrs": {...}, "children": [...]}`.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "lowercase")
)]
pub enum ViewNode {
    Element {
        tag: &'static str,
        attrs: BTreeMap<&'static str, String>,
        children: Vec<ViewNode>,
    },
    Text {
        value: String,
    },
    /// Raw HTML the host inserts verbatim.
    Html {
        value: String,
    },
}

impl ViewNode {
    /// Element tag, `None` for text and raw HTML.
    #[must_use]
    pub fn tag(&self) -> Option<&'static str> {
        match self {
            Self::Element { tag, .. } => Some(*tag),
            Self::Text { .. } | Self::Html { .. } => None,
        }
    }

    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Self::Element { attrs, .. } => attrs.get(name).map(String::as_str),
            Self::Text { .. } | Self::Html { .. } => None,
        }
    }

    #[must_use]
    pub fn children(&self) -> &[ViewNode] {
        match self {
            Self::Element { children, .. } => children,
            Self::Text { .. } | Self::Html { .. } => &[],
        }
    }

    /// Concatenated text of this node and its descendants.
    #[must_use]
    pub fn text_content(&self) -> String {
        match self {
            Self::Element { children, .. } => children.iter().map(Self::text_content).collect(),
            Self::Text { value } => value.clone(),
            Self::Html { .. } => String::new(),
        }
    }
}

/// Depth-first iterator over every node of a view tree.
pub fn walk(nodes: &[ViewNode]) -> impl Iterator<Item = &ViewNode> {
    let mut stack: Vec<&ViewNode> = nodes.iter().rev().collect();
    std::iter::from_fn(move || {
        let node = stack.pop()?;
        stack.extend(node.children().iter().rev());
        Some(node)
    })
}

/// Preview render backend.
///
/// Attaches presentation classes per element kind and wraps tables in a
/// horizontally scrollable container. Existing classes (such as a code
/// block's language) are kept after the presentation ones.
pub struct PreviewBackend;

impl RenderBackend for PreviewBackend {
    type Output = Vec<ViewNode>;

    fn render(nodes: &[Node]) -> Vec<ViewNode> {
        convert_nodes(nodes, false)
    }
}

fn convert_nodes(nodes: &[Node], in_pre: bool) -> Vec<ViewNode> {
    nodes.iter().map(|node| convert(node, in_pre)).collect()
}

fn convert(node: &Node, in_pre: bool) -> ViewNode {
    match node {
        Node::Element(element) => convert_element(element, in_pre),
        Node::Text(text) => ViewNode::Text {
            value: text.clone(),
        },
        Node::Html(html) => ViewNode::Html {
            value: html.clone(),
        },
    }
}

fn convert_element(element: &Element, in_pre: bool) -> ViewNode {
    let mut attrs: BTreeMap<&'static str, String> = element
        .attrs
        .iter()
        .map(|(name, value)| (*name, value.clone()))
        .collect();

    if let Some(class) = presentation_class(element, in_pre) {
        let merged = match attrs.get("class") {
            Some(existing) => format!("{class} {existing}"),
            None => class.to_owned(),
        };
        attrs.insert("class", merged);
    }

    let node = ViewNode::Element {
        tag: element.tag,
        attrs,
        children: convert_nodes(&element.children, in_pre || element.tag == "pre"),
    };

    if element.tag == "table" {
        ViewNode::Element {
            tag: "div",
            attrs: BTreeMap::from([("class", TABLE_WRAPPER_CLASS.to_owned())]),
            children: vec![node],
        }
    } else {
        node
    }
}

fn presentation_class(element: &Element, in_pre: bool) -> Option<&'static str> {
    let class = match element.tag {
        "h1" => "mt-8 mb-4 text-3xl font-bold first:mt-0",
        "h2" => "mt-7 mb-3 text-2xl font-semibold first:mt-0",
        "h3" => "mt-6 mb-3 text-xl font-semibold first:mt-0",
        "p" => "my-3 leading-7 text-foreground/90",
        "ul" => "my-3 list-disc pl-6",
        "ol" => "my-3 list-decimal pl-6",
        "li" => "my-1.5",
        "blockquote" => "my-4 border-l-4 border-border pl-4 text-muted-foreground",
        "hr" => "my-6 border-border",
        "table" => "w-full border-collapse text-sm",
        "thead" => "bg-muted/50",
        "th" => "border border-border px-3 py-2 text-left font-semibold",
        "td" => "border border-border px-3 py-2 align-top",
        "img" => "my-4 max-w-full rounded-lg border border-border/60",
        "video" => "my-4 w-full rounded-lg border border-border/60",
        "audio" => "my-4 w-full",
        "a" => "text-primary underline underline-offset-4 hover:opacity-80",
        "pre" => "my-4 overflow-x-auto rounded-lg border border-border/60 bg-muted/40 p-4",
        "code" if in_pre => BLOCK_CODE_CLASS,
        "code" => INLINE_CODE_CLASS,
        "input" if element.attr("type") == Some("checkbox") => "mr-2 accent-primary",
        _ => return None,
    };
    Some(class)
}
