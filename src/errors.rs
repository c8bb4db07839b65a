//! cmdgram Error Handling
//!
//! Fatal failures are split by phase: [`LexError`] and [`ParseError`] abort a
//! parse (wrapped together as [`SyntaxError`]), [`RuleDefinitionError`] aborts
//! building a rule set. [`CmdLineError`] is the umbrella type used by the
//! one-shot [`crate::validate`] entry point and the CLI.
//!
//! Every error implements [`miette::Diagnostic`] with a stable code, a label on
//! the offending span and a help message. Errors do not own the input text;
//! attach it with [`with_source`] when rendering.

use miette::{Diagnostic, LabeledSpan};
use std::fmt;
use thiserror::Error;

use crate::ast::Span;
use crate::validation::ValidationReport;

// ============================================================================
// LEXICAL ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexError {
    #[error("unterminated quotation: no closing {quote} before end of input")]
    UnterminatedQuote { quote: char, span: Span },

    #[error("malformed option '{text}': {reason}")]
    MalformedOption {
        text: String,
        reason: String,
        span: Span,
    },
}

impl LexError {
    pub fn span(&self) -> Span {
        match self {
            LexError::UnterminatedQuote { span, .. } | LexError::MalformedOption { span, .. } => {
                *span
            }
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            LexError::UnterminatedQuote { .. } => "unterminated_quote",
            LexError::MalformedOption { .. } => "malformed_option",
        }
    }

    fn primary_label(&self) -> String {
        match self {
            LexError::UnterminatedQuote { .. } => "quotation starts here".into(),
            LexError::MalformedOption { .. } => "malformed option".into(),
        }
    }

    fn help_text(&self) -> String {
        match self {
            LexError::UnterminatedQuote { quote, .. } => {
                format!("add a closing {} to end the quoted value", quote)
            }
            LexError::MalformedOption { .. } => {
                "options are written as -x, --name or --name=value".into()
            }
        }
    }
}

// ============================================================================
// STRUCTURAL ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: String,
        found: String,
        span: Span,
    },

    #[error("commands are nested deeper than the limit of {limit}")]
    NestingTooDeep { limit: usize, span: Span },
}

impl ParseError {
    pub fn span(&self) -> Span {
        match self {
            ParseError::UnexpectedToken { span, .. } | ParseError::NestingTooDeep { span, .. } => {
                *span
            }
        }
    }

    pub const fn code_suffix(&self) -> &'static str {
        match self {
            ParseError::UnexpectedToken { .. } => "unexpected_token",
            ParseError::NestingTooDeep { .. } => "nesting_too_deep",
        }
    }

    fn primary_label(&self) -> String {
        match self {
            ParseError::UnexpectedToken { .. } => "unexpected token".into(),
            ParseError::NestingTooDeep { .. } => "nested too deeply".into(),
        }
    }

    fn help_text(&self) -> Option<String> {
        match self {
            ParseError::UnexpectedToken { found, .. } if found.starts_with("quoted") => Some(
                "quoted values are only accepted as the program name or as option values".into(),
            ),
            ParseError::UnexpectedToken { .. } => None,
            ParseError::NestingTooDeep { .. } => {
                Some("raise the parser's max_depth if this nesting is intended".into())
            }
        }
    }
}

/// Any failure that prevents a well-formed tree from being built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
}

impl SyntaxError {
    pub fn span(&self) -> Span {
        match self {
            SyntaxError::Lex(e) => e.span(),
            SyntaxError::Parse(e) => e.span(),
        }
    }
}

// ============================================================================
// GRAMMAR DEFINITION ERRORS
// ============================================================================

/// Raised while building a [`crate::grammar::CmdLineRules`]. `path` names the
/// enclosing command rules, e.g. `remote add`, or `<root>` at the top level.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleDefinitionError {
    #[error("duplicate {what} rule '{name}' under {path}")]
    DuplicateRuleName {
        what: &'static str,
        name: String,
        path: String,
    },

    #[error("rule '{name}' under {path} can never be satisfied: {reason}")]
    UnsatisfiableRule {
        name: String,
        path: String,
        reason: String,
    },

    #[error("{what} rule under {path} has an empty name")]
    EmptyName { what: &'static str, path: String },
}

impl RuleDefinitionError {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            RuleDefinitionError::DuplicateRuleName { .. } => "duplicate_rule_name",
            RuleDefinitionError::UnsatisfiableRule { .. } => "unsatisfiable_rule",
            RuleDefinitionError::EmptyName { .. } => "empty_name",
        }
    }
}

// ============================================================================
// UMBRELLA
// ============================================================================

#[derive(Debug, Error)]
pub enum CmdLineError {
    #[error(transparent)]
    Syntax(#[from] SyntaxError),
    #[error(transparent)]
    Rules(#[from] RuleDefinitionError),
    #[error(transparent)]
    Validation(#[from] ValidationReport),
}

impl From<LexError> for CmdLineError {
    fn from(e: LexError) -> Self {
        CmdLineError::Syntax(e.into())
    }
}

impl From<ParseError> for CmdLineError {
    fn from(e: ParseError) -> Self {
        CmdLineError::Syntax(e.into())
    }
}

// ============================================================================
// DIAGNOSTIC IMPLEMENTATIONS
// ============================================================================

fn boxed<'a>(text: impl fmt::Display + 'a) -> Box<dyn fmt::Display + 'a> {
    Box::new(text)
}

fn single_label<'a>(
    label: String,
    span: Span,
) -> Option<Box<dyn Iterator<Item = LabeledSpan> + 'a>> {
    let labels = vec![LabeledSpan::new_with_span(Some(label), span)];
    Some(Box::new(labels.into_iter()))
}

impl Diagnostic for LexError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(boxed(format!("cmdgram::lex::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(boxed(self.help_text()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        single_label(self.primary_label(), self.span())
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(boxed(format!("cmdgram::parse::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_text().map(boxed)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        single_label(self.primary_label(), self.span())
    }
}

impl Diagnostic for SyntaxError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            SyntaxError::Lex(e) => e.code(),
            SyntaxError::Parse(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            SyntaxError::Lex(e) => e.help(),
            SyntaxError::Parse(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            SyntaxError::Lex(e) => e.labels(),
            SyntaxError::Parse(e) => e.labels(),
        }
    }
}

impl Diagnostic for RuleDefinitionError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(boxed(format!("cmdgram::rules::{}", self.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self {
            RuleDefinitionError::DuplicateRuleName { .. } => {
                "sibling rules must have distinct names and short aliases"
            }
            RuleDefinitionError::UnsatisfiableRule { .. } => {
                "relax the quantifier or remove the conflicting rule"
            }
            RuleDefinitionError::EmptyName { .. } => "give every rule a non-empty name",
        };
        Some(boxed(help))
    }
}

impl Diagnostic for CmdLineError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            CmdLineError::Syntax(e) => e.code(),
            CmdLineError::Rules(e) => e.code(),
            CmdLineError::Validation(e) => e.code(),
        }
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        match self {
            CmdLineError::Syntax(e) => e.help(),
            CmdLineError::Rules(e) => e.help(),
            CmdLineError::Validation(e) => e.help(),
        }
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        match self {
            CmdLineError::Syntax(e) => e.labels(),
            CmdLineError::Rules(e) => e.labels(),
            CmdLineError::Validation(e) => e.labels(),
        }
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        match self {
            CmdLineError::Validation(e) => e.source_code(),
            _ => None,
        }
    }

    fn related<'a>(&'a self) -> Option<Box<dyn Iterator<Item = &'a dyn Diagnostic> + 'a>> {
        match self {
            CmdLineError::Validation(e) => e.related(),
            _ => None,
        }
    }
}

// ============================================================================
// REPORTING HELPERS
// ============================================================================

/// Wraps an error into a [`miette::Report`] carrying the command line it was
/// produced from, so labels render against the input.
pub fn with_source<E>(error: E, source: &str) -> miette::Report
where
    E: Diagnostic + Send + Sync + 'static,
{
    miette::Report::new(error).with_source_code(source.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_namespaced_by_phase() {
        let lex = LexError::UnterminatedQuote {
            quote: '"',
            span: Span::new(5, 7),
        };
        let parse = ParseError::NestingTooDeep {
            limit: 2,
            span: Span::new(0, 1),
        };
        assert_eq!(
            lex.code().map(|c| c.to_string()).as_deref(),
            Some("cmdgram::lex::unterminated_quote")
        );
        assert_eq!(
            parse.code().map(|c| c.to_string()).as_deref(),
            Some("cmdgram::parse::nesting_too_deep")
        );
    }

    #[test]
    fn syntax_error_keeps_inner_span() {
        let err: SyntaxError = ParseError::UnexpectedToken {
            expected: "a command or an option".into(),
            found: "quoted value \"x\"".into(),
            span: Span::new(5, 3),
        }
        .into();
        assert_eq!(err.span(), Span::new(5, 3));
        assert!(err.help().is_some());
    }

    #[test]
    fn label_points_at_error_span() {
        let err = LexError::MalformedOption {
            text: "--".into(),
            reason: "missing option name".into(),
            span: Span::new(5, 2),
        };
        let labels: Vec<_> = err.labels().into_iter().flatten().collect();
        assert_eq!(labels.len(), 1);
        assert_eq!(labels[0].offset(), 5);
        assert_eq!(labels[0].len(), 2);
    }
}
