//! Syntax highlighting of fenced code blocks.
//!
//! Code is tokenized with syntect's bundled grammars and emitted as
//! `<span class="hljs-…">` nodes, using highlight.js class names so the
//! same stylesheet works for preview and export.

use std::sync::LazyLock;

use syntect::easy::ScopeRegionIterator;
use syntect::parsing::{ParseState, Scope, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::tree::{Element, Node};

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);

/// Whether a fence language has a bundled grammar.
#[must_use]
pub fn is_supported(language: &str) -> bool {
    find_syntax(language).is_some()
}

fn find_syntax(language: &str) -> Option<&'static SyntaxReference> {
    if language.is_empty() {
        return None;
    }
    SYNTAX_SET.find_syntax_by_token(language)
}

/// Highlight `code` as `language`.
///
/// Returns `None` when the language is unknown or the grammar fails on the
/// input. Concatenated text of the returned nodes always equals `code`.
#[must_use]
pub fn highlight(language: &str, code: &str) -> Option<Vec<Node>> {
    let syntax = find_syntax(language)?;
    let mut state = ParseState::new(syntax);
    let mut stack = ScopeStack::new();
    let mut out = Element::new("code");

    for line in LinesWithEndings::from(code) {
        let ops = match state.parse_line(line, &SYNTAX_SET) {
            Ok(ops) => ops,
            Err(e) => {
                tracing::debug!(language, error = %e, "Highlighting failed");
                return None;
            }
        };
        for (text, op) in ScopeRegionIterator::new(&ops, line) {
            if let Err(e) = stack.apply(op) {
                tracing::debug!(language, error = ?e, "Highlighting failed");
                return None;
            }
            if text.is_empty() {
                continue;
            }
            push_token(&mut out, token_class(stack.as_slice()), text);
        }
    }

    Some(out.children)
}

/// Append a token, extending the previous span when the class repeats.
fn push_token(out: &mut Element, class: Option<&'static str>, text: &str) {
    let Some(class) = class else {
        out.push(Node::Text(text.to_owned()));
        return;
    };
    if let Some(Node::Element(last)) = out.children.last_mut()
        && last.attr("class") == Some(class)
    {
        last.push(Node::Text(text.to_owned()));
        return;
    }
    out.push(
        Element::new("span")
            .with_attr("class", class)
            .with_child(Node::Text(text.to_owned()))
            .into(),
    );
}

/// Class for the innermost scope with a highlight.js equivalent.
fn token_class(scopes: &[Scope]) -> Option<&'static str> {
    scopes.iter().rev().find_map(|scope| {
        let name = scope.build_string();
        let mut atoms = name.split('.');
        let first = atoms.next().unwrap_or_default();
        let second = atoms.next().unwrap_or_default();
        scope_class(first, second)
    })
}

fn scope_class(first: &str, second: &str) -> Option<&'static str> {
    let class = match (first, second) {
        ("comment", _) => "hljs-comment",
        ("string", _) => "hljs-string",
        ("constant", "numeric") => "hljs-number",
        ("constant", "character") => "hljs-char",
        ("constant", _) => "hljs-literal",
        ("keyword", "operator") => "hljs-operator",
        ("keyword" | "storage", _) => "hljs-keyword",
        ("entity", "name") => "hljs-title",
        ("entity", "other") => "hljs-attr",
        ("support", "type" | "class") => "hljs-type",
        ("support", _) => "hljs-built_in",
        ("variable", "parameter") => "hljs-params",
        ("variable", "language") => "hljs-variable",
        ("markup", "heading") => "hljs-section",
        ("markup", "bold") => "hljs-strong",
        ("markup", "italic") => "hljs-emphasis",
        ("markup", "quote") => "hljs-quote",
        ("markup", "underline") => "hljs-link",
        _ => return None,
    };
    Some(class)
}
