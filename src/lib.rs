//! Command-line grammar engine.
//!
//! Parses a raw command line into a positioned tree and checks it against a
//! declared set of command and option rules.
//!
//! ```rust
//! use cmdgram::{CmdLineRules, CommandQuantifier, CommandRule, OptionRule};
//!
//! let rules = CmdLineRules::builder(CommandQuantifier::ZeroOrMultiple)
//!     .option(OptionRule::flag("verbose"))
//!     .command(CommandRule::new("build", CommandQuantifier::One).option(OptionRule::value("target")))
//!     .build()
//!     .unwrap();
//!
//! let root = cmdgram::validate("tool --verbose build --target=release", &rules).unwrap();
//! assert_eq!(root.commands()[0].name(), "build");
//!
//! let err = cmdgram::validate("tool deploy", &rules).unwrap_err();
//! assert!(matches!(err, cmdgram::CmdLineError::Validation(_)));
//! ```

pub mod ast;
pub mod cli;
pub mod errors;
pub mod grammar;
pub mod report;
pub mod syntax;
pub mod validation;

pub use crate::ast::{CommandNode, OptionNode, OptionPrefix, RootNode, Span, ValueNode};
pub use crate::errors::{CmdLineError, LexError, ParseError, RuleDefinitionError, SyntaxError};
pub use crate::grammar::{CmdLineRules, CommandQuantifier, CommandRule, OptionRule};
pub use crate::syntax::{parse, tokenize, Parser, ParserConfig};
pub use crate::validation::{check, Diagnostic, DiagnosticKind, ValidationReport, ValidationResult};

/// Parses and checks `source` in one step, returning the tree only if it
/// satisfies `rules`.
pub fn validate(source: &str, rules: &CmdLineRules) -> Result<RootNode, CmdLineError> {
    validate_with(&Parser::default(), source, rules)
}

/// Like [`validate`], with a configured parser.
pub fn validate_with(
    parser: &Parser,
    source: &str,
    rules: &CmdLineRules,
) -> Result<RootNode, CmdLineError> {
    let root = parser.parse(source)?;
    check(&root, rules).into_result(source)?;
    Ok(root)
}
