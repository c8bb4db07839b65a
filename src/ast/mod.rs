//! AST module for cmdgram
//!
//! This module provides the positioned syntax tree produced by the parser: a
//! [`RootNode`] owning the program name, commands and options of one command
//! line, each node carrying the shared source text and its own [`Span`].

// ============================================================================
// IMPORTS
// ============================================================================

use serde::Serialize;

mod nodes;
mod tree;

pub use nodes::{CommandNode, OptionNode, OptionPrefix, RootNode, SourceText, ValueNode};
pub use tree::write_tree;

// ============================================================================
// SPANS
// ============================================================================

/// A `(position, length)` pair locating a substring of the original input.
///
/// Positions are byte offsets. A span produced by the lexer or parser always
/// satisfies `end() <= source.len()` for the text it was produced from.
///
/// # Examples
///
/// ```rust
/// use cmdgram::ast::Span;
/// let span = Span::new(5, 7);
/// assert_eq!(span.end(), 12);
/// assert_eq!(span.slice("tool --quiet"), Some("--quiet"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Span {
    pub position: usize,
    pub length: usize,
}

impl Span {
    pub const fn new(position: usize, length: usize) -> Self {
        Self { position, length }
    }

    /// Builds a span from a half-open byte range. An inverted range yields an
    /// empty span at `start`.
    pub fn from_range(start: usize, end: usize) -> Self {
        Self {
            position: start,
            length: end.saturating_sub(start),
        }
    }

    /// An empty span at `position`, used for "expected something here" errors.
    pub const fn point(position: usize) -> Self {
        Self {
            position,
            length: 0,
        }
    }

    pub const fn end(&self) -> usize {
        self.position + self.length
    }

    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    /// Returns true when `other` lies entirely inside this span.
    pub fn contains(&self, other: Span) -> bool {
        other.position >= self.position && other.end() <= self.end()
    }

    /// The smallest span covering both `self` and `other`.
    pub fn cover(self, other: Span) -> Span {
        let start = self.position.min(other.position);
        let end = self.end().max(other.end());
        Span::from_range(start, end)
    }

    /// The substring of `source` this span refers to, if it is in bounds.
    pub fn slice<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.position..self.end())
    }

    /// 1-based line and column (in characters) of the span start.
    pub fn line_col(&self, source: &str) -> (usize, usize) {
        let upto = source.get(..self.position).unwrap_or(source);
        let line = upto.matches('\n').count() + 1;
        let line_start = upto.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let col = upto[line_start..].chars().count() + 1;
        (line, col)
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}..{}", self.position, self.end())
    }
}

impl From<Span> for miette::SourceSpan {
    fn from(span: Span) -> Self {
        (span.position, span.length).into()
    }
}

// ============================================================================
// GENERIC NODE VIEW
// ============================================================================

/// A borrowed view over any node of the tree.
///
/// Consumers that need to treat nodes uniformly (span checks, traversal,
/// rendering) match on this instead of on the concrete node types.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AstNode<'a> {
    Root(&'a RootNode),
    Value(&'a ValueNode),
    Command(&'a CommandNode),
    Option(&'a OptionNode),
}

impl<'a> AstNode<'a> {
    pub fn span(&self) -> Span {
        match self {
            AstNode::Root(node) => node.span(),
            AstNode::Value(node) => node.span(),
            AstNode::Command(node) => node.span(),
            AstNode::Option(node) => node.span(),
        }
    }

    /// The exact source substring covered by this node.
    pub fn text(&self) -> &'a str {
        match self {
            AstNode::Root(node) => node.text(),
            AstNode::Value(node) => node.text(),
            AstNode::Command(node) => node.text(),
            AstNode::Option(node) => node.text(),
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            AstNode::Root(_) => "root",
            AstNode::Value(_) => "value",
            AstNode::Command(_) => "command",
            AstNode::Option(_) => "option",
        }
    }

    /// Direct children in source order.
    pub fn children(&self) -> Vec<AstNode<'a>> {
        match self {
            AstNode::Root(node) => {
                let mut children = vec![AstNode::Value(node.program())];
                children.extend(merge_in_source_order(node.commands(), node.options()));
                children
            }
            AstNode::Command(node) => merge_in_source_order(node.commands(), node.options()),
            AstNode::Option(node) => node.value().map(AstNode::Value).into_iter().collect(),
            AstNode::Value(_) => Vec::new(),
        }
    }

    /// Depth-first, pre-order traversal starting at this node.
    pub fn walk(&self, visit: &mut impl FnMut(AstNode<'a>)) {
        visit(*self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

fn merge_in_source_order<'a>(
    commands: &'a [CommandNode],
    options: &'a [OptionNode],
) -> Vec<AstNode<'a>> {
    let mut merged: Vec<AstNode<'a>> = commands
        .iter()
        .map(AstNode::Command)
        .chain(options.iter().map(AstNode::Option))
        .collect();
    merged.sort_by_key(|node| node.span().position);
    merged
}
