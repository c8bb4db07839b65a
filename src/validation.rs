//! Validation of parsed command lines against declared rules.

pub mod checker;
pub mod diagnostic;

use std::fmt;

use miette::NamedSource;
use serde::Serialize;

pub use checker::check;
pub use diagnostic::{Diagnostic, DiagnosticKind, DiagnosticReporter};

/// Outcome of [`check`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "diagnostics", rename_all = "snake_case")]
pub enum ValidationResult {
    Valid,
    /// Every violation found, in source order. Never empty.
    Invalid(Vec<Diagnostic>),
}

impl ValidationResult {
    pub fn from_diagnostics(diagnostics: Vec<Diagnostic>) -> Self {
        if diagnostics.is_empty() {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(diagnostics)
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            ValidationResult::Valid => &[],
            ValidationResult::Invalid(diagnostics) => diagnostics,
        }
    }

    /// Converts into a `Result`, bundling the diagnostics with the checked
    /// input so they can be rendered by `miette`.
    pub fn into_result(self, source: &str) -> Result<(), ValidationReport> {
        match self {
            ValidationResult::Valid => Ok(()),
            ValidationResult::Invalid(diagnostics) => Err(ValidationReport::new(source, diagnostics)),
        }
    }
}

/// All diagnostics of one failed check, together with the input text.
#[derive(Debug)]
pub struct ValidationReport {
    source: NamedSource<String>,
    diagnostics: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn new(source: &str, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            source: NamedSource::new("command line", source.to_string()),
            diagnostics,
        }
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn source(&self) -> &str {
        self.source.inner()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.diagnostics.as_slice() {
            [only] => write!(f, "invalid command line: {}", only),
            many => write!(f, "invalid command line: {} problems found", many.len()),
        }
    }
}

impl std::error::Error for ValidationReport {}

impl miette::Diagnostic for ValidationReport {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new("cmdgram::validation"))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&self.source)
    }

    fn related<'a>(
        &'a self,
    ) -> Option<Box<dyn Iterator<Item = &'a dyn miette::Diagnostic> + 'a>> {
        Some(Box::new(
            self.diagnostics
                .iter()
                .map(|d| d as &dyn miette::Diagnostic),
        ))
    }
}
