//! Concrete node types.
//!
//! Nodes are only built by the parser; fields are private so a tree cannot be
//! edited after construction.

use std::sync::Arc;

use serde::Serialize;

use super::Span;

/// Shared, read-only source text referenced by every node of one parse.
pub type SourceText = Arc<str>;

fn slice_of<'a>(source: &'a SourceText, span: Span) -> &'a str {
    span.slice(source).unwrap_or_default()
}

/// How an option was spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionPrefix {
    /// `-x`
    Short,
    /// `--name`
    Long,
}

impl OptionPrefix {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionPrefix::Short => "-",
            OptionPrefix::Long => "--",
        }
    }
}

// ============================================================================
// VALUE
// ============================================================================

/// A literal value: the program name or an option argument.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValueNode {
    #[serde(skip)]
    source: SourceText,
    span: Span,
    value: String,
    quoted: bool,
}

impl ValueNode {
    pub(crate) fn new(source: SourceText, span: Span, value: String, quoted: bool) -> Self {
        Self {
            source,
            span,
            value,
            quoted,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    /// The literal text, without surrounding quotes.
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// The exact source text, quotes included.
    pub fn text(&self) -> &str {
        slice_of(&self.source, self.span)
    }
}

// ============================================================================
// OPTION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionNode {
    #[serde(skip)]
    source: SourceText,
    span: Span,
    name: String,
    name_span: Span,
    prefix: OptionPrefix,
    value: Option<ValueNode>,
}

impl OptionNode {
    pub(crate) fn new(
        source: SourceText,
        name: String,
        name_span: Span,
        prefix: OptionPrefix,
        value: Option<ValueNode>,
    ) -> Self {
        let span = match &value {
            Some(value) => name_span.cover(value.span()),
            None => name_span,
        };
        Self {
            source,
            span,
            name,
            name_span,
            prefix,
            value,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Span of the option token itself (`--target`), excluding any value.
    pub fn name_span(&self) -> Span {
        self.name_span
    }

    pub fn prefix(&self) -> OptionPrefix {
        self.prefix
    }

    pub fn value(&self) -> Option<&ValueNode> {
        self.value.as_ref()
    }

    pub fn text(&self) -> &str {
        slice_of(&self.source, self.span)
    }
}

// ============================================================================
// COMMAND
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandNode {
    #[serde(skip)]
    source: SourceText,
    span: Span,
    name: String,
    commands: Vec<CommandNode>,
    options: Vec<OptionNode>,
}

impl CommandNode {
    /// `name_span` is the span of the command token; the node span grows to
    /// cover every child.
    pub(crate) fn new(
        source: SourceText,
        name: String,
        name_span: Span,
        commands: Vec<CommandNode>,
        options: Vec<OptionNode>,
    ) -> Self {
        let span = commands
            .iter()
            .map(CommandNode::span)
            .chain(options.iter().map(OptionNode::span))
            .fold(name_span, Span::cover);
        Self {
            source,
            span,
            name,
            commands,
            options,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn commands(&self) -> &[CommandNode] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionNode] {
        &self.options
    }

    pub fn text(&self) -> &str {
        slice_of(&self.source, self.span)
    }
}

// ============================================================================
// ROOT
// ============================================================================

/// One fully parsed command line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RootNode {
    #[serde(skip)]
    source: SourceText,
    span: Span,
    program: ValueNode,
    commands: Vec<CommandNode>,
    options: Vec<OptionNode>,
}

impl RootNode {
    /// The root always spans the whole input, leading and trailing
    /// whitespace included.
    pub(crate) fn new(
        source: SourceText,
        program: ValueNode,
        commands: Vec<CommandNode>,
        options: Vec<OptionNode>,
    ) -> Self {
        let span = Span::new(0, source.len());
        Self {
            source,
            span,
            program,
            commands,
            options,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// A cheap handle on the shared source text.
    pub fn source_text(&self) -> SourceText {
        Arc::clone(&self.source)
    }

    pub fn program(&self) -> &ValueNode {
        &self.program
    }

    pub fn commands(&self) -> &[CommandNode] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionNode] {
        &self.options
    }

    pub fn text(&self) -> &str {
        slice_of(&self.source, self.span)
    }

    /// Deepest command nesting in the tree; zero when there are no commands.
    pub fn command_depth(&self) -> usize {
        fn depth(commands: &[CommandNode]) -> usize {
            commands
                .iter()
                .map(|c| 1 + depth(c.commands()))
                .max()
                .unwrap_or(0)
        }
        depth(&self.commands)
    }
}
