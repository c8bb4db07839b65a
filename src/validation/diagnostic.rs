//! Validation diagnostics
//!
//! A [`Diagnostic`] reports one rule violation found by the checker. Unlike the
//! fatal errors in [`crate::errors`], diagnostics are collected, never raised.

use std::fmt;

use miette::LabeledSpan;
use serde::Serialize;

use crate::ast::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    UnknownCommand,
    MissingCommand,
    DuplicateCommand,
    UnexpectedCommand,
    UnknownOption,
    MissingOption,
    DuplicateOption,
    MissingOptionValue,
    UnexpectedOptionValue,
}

impl DiagnosticKind {
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown_command",
            Self::MissingCommand => "missing_command",
            Self::DuplicateCommand => "duplicate_command",
            Self::UnexpectedCommand => "unexpected_command",
            Self::UnknownOption => "unknown_option",
            Self::MissingOption => "missing_option",
            Self::DuplicateOption => "duplicate_option",
            Self::MissingOptionValue => "missing_option_value",
            Self::UnexpectedOptionValue => "unexpected_option_value",
        }
    }

    /// Short text placed under the offending span.
    pub fn label(&self) -> &'static str {
        match self {
            Self::UnknownCommand => "unknown command",
            Self::MissingCommand => "expected here",
            Self::DuplicateCommand => "repeated here",
            Self::UnexpectedCommand => "not allowed here",
            Self::UnknownOption => "unknown option",
            Self::MissingOption => "expected here",
            Self::DuplicateOption => "repeated here",
            Self::MissingOptionValue => "needs a value",
            Self::UnexpectedOptionValue => "unexpected value",
        }
    }

}

/// One rule violation located in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    /// Name of the command or option concerned; `None` when the violation is
    /// about a set of commands rather than a named one.
    pub subject: Option<String>,
    pub span: Span,
    /// An earlier occurrence, for duplicates.
    pub related: Option<Span>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, subject: Option<String>, span: Span) -> Self {
        Self {
            kind,
            subject,
            span,
            related: None,
        }
    }

    pub fn with_related(mut self, span: Span) -> Self {
        self.related = Some(span);
        self
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Human-readable message for this diagnostic.
    pub fn message(&self) -> String {
        use DiagnosticKind::*;
        let name = self.subject.as_deref().unwrap_or("");
        match (self.kind, self.subject.is_some()) {
            (UnknownCommand, _) => format!("unknown command '{}'", name),
            (MissingCommand, true) => format!("missing required command '{}'", name),
            (MissingCommand, false) => "a command is required here".to_string(),
            (DuplicateCommand, _) => format!("command '{}' may only be given once", name),
            (UnexpectedCommand, true) => format!("command '{}' is not allowed here", name),
            (UnexpectedCommand, false) => "no further command is allowed here".to_string(),
            (UnknownOption, _) => format!("unknown option '{}'", name),
            (MissingOption, _) => format!("missing required option '{}'", name),
            (DuplicateOption, _) => format!("option '{}' may only be given once", name),
            (MissingOptionValue, _) => format!("option '{}' requires a value", name),
            (UnexpectedOptionValue, _) => format!("option '{}' does not take a value", name),
        }
    }
}

impl Diagnostic {
    /// Suggested fix, if there is an obvious one.
    pub fn help_text(&self) -> Option<String> {
        match (self.kind, self.subject()) {
            (DiagnosticKind::MissingOptionValue, Some(name)) => {
                Some(format!("pass a value, as in --{}=<value>", name))
            }
            (DiagnosticKind::DuplicateCommand | DiagnosticKind::DuplicateOption, _) => {
                Some("remove the repeated occurrence".to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for Diagnostic {}

impl miette::Diagnostic for Diagnostic {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!(
            "cmdgram::validation::{}",
            self.kind.code_suffix()
        )))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help_text().map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let mut labels = vec![LabeledSpan::new_with_span(
            Some(self.kind.label().to_string()),
            self.span,
        )];
        if let Some(first) = self.related {
            labels.push(LabeledSpan::new_with_span(
                Some("first given here".to_string()),
                first,
            ));
        }
        Some(Box::new(labels.into_iter()))
    }
}

// ============================================================================
// REPORTING
// ============================================================================

/// Accumulates diagnostics. The checker only ever appends; nothing returns early.
pub trait DiagnosticReporter {
    fn report(&mut self, diagnostic: Diagnostic);

    fn unknown_command(&mut self, name: &str, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::UnknownCommand,
            Some(name.into()),
            span,
        ));
    }

    fn missing_command(&mut self, name: Option<&str>, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::MissingCommand,
            name.map(Into::into),
            span,
        ));
    }

    fn duplicate_command(&mut self, name: &str, span: Span, first: Span) {
        self.report(
            Diagnostic::new(DiagnosticKind::DuplicateCommand, Some(name.into()), span)
                .with_related(first),
        );
    }

    fn unexpected_command(&mut self, name: Option<&str>, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::UnexpectedCommand,
            name.map(Into::into),
            span,
        ));
    }

    fn unknown_option(&mut self, name: &str, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::UnknownOption,
            Some(name.into()),
            span,
        ));
    }

    fn missing_option(&mut self, name: &str, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::MissingOption,
            Some(name.into()),
            span,
        ));
    }

    fn duplicate_option(&mut self, name: &str, span: Span, first: Span) {
        self.report(
            Diagnostic::new(DiagnosticKind::DuplicateOption, Some(name.into()), span)
                .with_related(first),
        );
    }

    fn missing_option_value(&mut self, name: &str, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::MissingOptionValue,
            Some(name.into()),
            span,
        ));
    }

    fn unexpected_option_value(&mut self, name: &str, span: Span) {
        self.report(Diagnostic::new(
            DiagnosticKind::UnexpectedOptionValue,
            Some(name.into()),
            span,
        ));
    }
}

impl DiagnosticReporter for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}
