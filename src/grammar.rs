//! Grammar model
//!
//! Callers describe the command lines they accept by composing
//! [`CommandRule`]s and [`OptionRule`]s under a top-level
//! [`CommandQuantifier`]. A finished [`CmdLineRules`] has been checked for
//! duplicate names and contradictory quantifiers, is immutable, and can be
//! shared across threads to validate any number of parsed inputs.
//!
//! ```rust
//! use cmdgram::grammar::{CmdLineRules, CommandQuantifier, CommandRule, OptionRule};
//!
//! let rules = CmdLineRules::builder(CommandQuantifier::ZeroOrMultiple)
//!     .option(OptionRule::flag("verbose").short('v'))
//!     .command(
//!         CommandRule::new("build", CommandQuantifier::One)
//!             .option(OptionRule::value("target").required()),
//!     )
//!     .build()
//!     .unwrap();
//! assert_eq!(rules.commands().len(), 1);
//! ```

pub mod quantifier;
pub mod validators;

use serde::Serialize;
use tracing::debug;

pub use quantifier::CommandQuantifier;

use crate::ast::OptionPrefix;
use crate::errors::RuleDefinitionError;

// =====================
// Option rules
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionRule {
    name: String,
    short: Option<char>,
    required: bool,
    expects_value: bool,
    repeatable: bool,
}

impl OptionRule {
    pub fn new(name: impl Into<String>, required: bool, expects_value: bool) -> Self {
        Self {
            name: name.into(),
            short: None,
            required,
            expects_value,
            repeatable: false,
        }
    }

    /// An optional option that takes no value.
    pub fn flag(name: impl Into<String>) -> Self {
        Self::new(name, false, false)
    }

    /// An optional option that takes exactly one value.
    pub fn value(name: impl Into<String>) -> Self {
        Self::new(name, false, true)
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Allows the option to appear more than once at its level.
    pub fn repeatable(mut self) -> Self {
        self.repeatable = true;
        self
    }

    /// Adds a single-dash alias, so `-v` matches a rule named `verbose`.
    pub fn short(mut self, alias: char) -> Self {
        self.short = Some(alias);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn short_alias(&self) -> Option<char> {
        self.short
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn expects_value(&self) -> bool {
        self.expects_value
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    /// The full name matches in either spelling; the short alias only
    /// matches the single-dash spelling.
    pub fn matches(&self, name: &str, prefix: OptionPrefix) -> bool {
        if self.name == name {
            return true;
        }
        let mut chars = name.chars();
        match (self.short, prefix, chars.next(), chars.next()) {
            (Some(alias), OptionPrefix::Short, Some(c), None) => alias == c,
            _ => false,
        }
    }
}

// =====================
// Command rules
// =====================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandRule {
    name: String,
    quantifier: CommandQuantifier,
    subcommands: CommandQuantifier,
    commands: Vec<CommandRule>,
    options: Vec<OptionRule>,
}

impl CommandRule {
    /// `quantifier` governs how often this command may appear among its
    /// siblings. Nested commands default to [`CommandQuantifier::ZeroOrMultiple`]
    /// as a set; see [`CommandRule::subcommands`].
    pub fn new(name: impl Into<String>, quantifier: CommandQuantifier) -> Self {
        Self {
            name: name.into(),
            quantifier,
            subcommands: CommandQuantifier::ZeroOrMultiple,
            commands: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn command(mut self, rule: CommandRule) -> Self {
        self.commands.push(rule);
        self
    }

    pub fn option(mut self, rule: OptionRule) -> Self {
        self.options.push(rule);
        self
    }

    /// Sets how many sub-commands, of any name, may follow this command.
    pub fn subcommands(mut self, quantifier: CommandQuantifier) -> Self {
        self.subcommands = quantifier;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quantifier(&self) -> CommandQuantifier {
        self.quantifier
    }

    pub fn commands(&self) -> &[CommandRule] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionRule] {
        &self.options
    }

    /// The rules that apply inside an occurrence of this command.
    pub fn level(&self) -> RuleLevel<'_> {
        RuleLevel {
            quantifier: self.subcommands,
            commands: &self.commands,
            options: &self.options,
        }
    }
}

// =====================
// Rule sets
// =====================

/// One nesting level of rules: the set quantifier and the sibling rules.
#[derive(Debug, Clone, Copy)]
pub struct RuleLevel<'r> {
    pub quantifier: CommandQuantifier,
    pub commands: &'r [CommandRule],
    pub options: &'r [OptionRule],
}

impl<'r> RuleLevel<'r> {
    pub fn command(&self, name: &str) -> Option<&'r CommandRule> {
        self.commands.iter().find(|rule| rule.name == name)
    }

    pub fn option(&self, name: &str, prefix: OptionPrefix) -> Option<&'r OptionRule> {
        self.options
            .iter()
            .find(|rule| rule.name == name)
            .or_else(|| self.options.iter().find(|rule| rule.matches(name, prefix)))
    }
}

/// A validated, immutable grammar for one program's command line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CmdLineRules {
    quantifier: CommandQuantifier,
    commands: Vec<CommandRule>,
    options: Vec<OptionRule>,
}

impl CmdLineRules {
    pub fn new(
        quantifier: CommandQuantifier,
        commands: Vec<CommandRule>,
        options: Vec<OptionRule>,
    ) -> Result<Self, RuleDefinitionError> {
        let rules = Self {
            quantifier,
            commands,
            options,
        };
        validators::RuleValidators::validate(&rules)?;
        debug!(
            commands = rules.commands.len(),
            options = rules.options.len(),
            quantifier = %rules.quantifier,
            "built command-line rules"
        );
        Ok(rules)
    }

    pub fn builder(quantifier: CommandQuantifier) -> CmdLineRulesBuilder {
        CmdLineRulesBuilder {
            quantifier,
            commands: Vec::new(),
            options: Vec::new(),
        }
    }

    pub fn quantifier(&self) -> CommandQuantifier {
        self.quantifier
    }

    pub fn commands(&self) -> &[CommandRule] {
        &self.commands
    }

    pub fn options(&self) -> &[OptionRule] {
        &self.options
    }

    /// The top-level rules.
    pub fn level(&self) -> RuleLevel<'_> {
        RuleLevel {
            quantifier: self.quantifier,
            commands: &self.commands,
            options: &self.options,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CmdLineRulesBuilder {
    quantifier: CommandQuantifier,
    commands: Vec<CommandRule>,
    options: Vec<OptionRule>,
}

impl CmdLineRulesBuilder {
    pub fn command(mut self, rule: CommandRule) -> Self {
        self.commands.push(rule);
        self
    }

    pub fn option(mut self, rule: OptionRule) -> Self {
        self.options.push(rule);
        self
    }

    pub fn build(self) -> Result<CmdLineRules, RuleDefinitionError> {
        CmdLineRules::new(self.quantifier, self.commands, self.options)
    }
}
