//! Document tree shared by every render backend.
//!
//! The renderer turns pulldown-cmark events into this tree once; backends
//! only walk it. Attribute names and tags are static so the tree stays
//! cheap to build.

/// Node in a rendered document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    /// Unescaped text content.
    Text(String),
    /// Raw HTML passed through from the source.
    Html(String),
}

/// Element with attributes in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub attrs: Vec<(&'static str, String)>,
    pub children: Vec<Node>,
}

/// Elements rendered without a closing tag.
pub const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input"];

/// Attributes rendered by name alone when set.
pub const BOOLEAN_ATTRIBUTES: &[&str] = &["checked", "controls", "disabled"];

impl Element {
    #[must_use]
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute. Use an empty value for boolean attributes.
    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attrs.push((name, value.into()));
        self
    }

    /// Add a child node.
    #[must_use]
    pub fn with_child(mut self, node: Node) -> Self {
        self.push(node);
        self
    }

    /// Look up an attribute value.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value.
    pub fn set_attr(&mut self, name: &'static str, value: impl Into<String>) {
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Append a child, merging adjacent text and raw HTML runs.
    pub fn push(&mut self, node: Node) {
        let node = match (self.children.last_mut(), node) {
            (Some(Node::Text(last)), Node::Text(text)) => {
                last.push_str(&text);
                return;
            }
            (Some(Node::Html(last)), Node::Html(html)) => {
                last.push_str(&html);
                return;
            }
            (_, node) => node,
        };
        self.children.push(node);
    }

    #[must_use]
    pub fn is_void(&self) -> bool {
        VOID_ELEMENTS.contains(&self.tag)
    }

    /// Concatenated text of all descendants. Raw HTML is not included.
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// Concatenated text of a node list.
#[must_use]
pub fn text_content(nodes: &[Node]) -> String {
    let mut out = String::new();
    collect_text(nodes, &mut out);
    out
}

fn collect_text(nodes: &[Node], out: &mut String) {
    for node in nodes {
        match node {
            Node::Element(element) => collect_text(&element.children, out),
            Node::Text(text) => out.push_str(text),
            Node::Html(_) => {}
        }
    }
}

/// Depth-first iterator over every element of a node list.
pub fn elements(nodes: &[Node]) -> impl Iterator<Item = &Element> {
    let mut stack: Vec<&Node> = nodes.iter().rev().collect();
    std::iter::from_fn(move || {
        while let Some(node) = stack.pop() {
            if let Node::Element(element) = node {
                stack.extend(element.children.iter().rev());
                return Some(element);
            }
        }
        None
    })
}
