use std::collections::HashSet;

use crate::errors::RuleDefinitionError;
use crate::grammar::{CmdLineRules, CommandQuantifier, CommandRule, RuleLevel};

const ROOT_PATH: &str = "<root>";

/// Construction-time checks for a rule tree.
/// Each validator covers one concern and stops at the first violation.
pub struct RuleValidators;

impl RuleValidators {
    /// Walks the whole tree, level by level, in declaration order.
    pub fn validate(rules: &CmdLineRules) -> Result<(), RuleDefinitionError> {
        Self::validate_level(rules.level(), &mut Vec::new())
    }

    fn validate_level<'r>(
        level: RuleLevel<'r>,
        path: &mut Vec<&'r str>,
    ) -> Result<(), RuleDefinitionError> {
        let location = display_path(path);
        Self::check_names(level, &location)?;
        Self::check_set_quantifier(level, &location)?;
        Self::check_set_is_reachable(level, path)?;

        for rule in level.commands {
            if rule.quantifier() == CommandQuantifier::Zero {
                Self::check_forbidden_command_is_empty(rule, &location)?;
                continue;
            }
            path.push(rule.name());
            Self::validate_level(rule.level(), path)?;
            path.pop();
        }
        Ok(())
    }

    /// Rejects empty names and duplicate sibling names or aliases.
    pub fn check_names(level: RuleLevel<'_>, path: &str) -> Result<(), RuleDefinitionError> {
        let mut commands = HashSet::new();
        for rule in level.commands {
            if rule.name().trim().is_empty() {
                return Err(RuleDefinitionError::EmptyName {
                    what: "command",
                    path: path.to_string(),
                });
            }
            if !commands.insert(rule.name()) {
                return Err(duplicate("command", rule.name(), path));
            }
        }

        let mut options = HashSet::new();
        for rule in level.options {
            if rule.name().trim().is_empty() {
                return Err(RuleDefinitionError::EmptyName {
                    what: "option",
                    path: path.to_string(),
                });
            }
            if !options.insert(rule.name().to_string()) {
                return Err(duplicate("option", rule.name(), path));
            }
        }

        // Aliases share the single-dash namespace with one-letter names.
        let mut aliases = HashSet::new();
        for rule in level.options {
            let Some(alias) = rule.short_alias() else {
                continue;
            };
            let spelled = alias.to_string();
            if !aliases.insert(alias) || (options.contains(&spelled) && rule.name() != spelled) {
                return Err(duplicate("option", &spelled, path));
            }
        }
        Ok(())
    }

    /// Rejects sibling quantifiers that the level's set quantifier can never admit.
    pub fn check_set_quantifier(
        level: RuleLevel<'_>,
        path: &str,
    ) -> Result<(), RuleDefinitionError> {
        let Some(max) = level.quantifier.max() else {
            return Ok(());
        };
        let mut demanded = 0;
        for rule in level
            .commands
            .iter()
            .filter(|rule| rule.quantifier().requires_presence())
        {
            demanded += 1;
            if demanded > max {
                return Err(RuleDefinitionError::UnsatisfiableRule {
                    name: rule.name().to_string(),
                    path: path.to_string(),
                    reason: format!(
                        "it requires {} occurrence(s) but {} allows {} command(s) in total",
                        rule.quantifier(),
                        path,
                        level.quantifier
                    ),
                });
            }
        }
        Ok(())
    }

    /// Rejects a set that demands a command while declaring none that may appear.
    /// `path` names the command owning the set; empty at the top level.
    pub fn check_set_is_reachable(
        level: RuleLevel<'_>,
        path: &[&str],
    ) -> Result<(), RuleDefinitionError> {
        let admissible = level
            .commands
            .iter()
            .any(|rule| rule.quantifier() != CommandQuantifier::Zero);
        if !level.quantifier.requires_presence() || admissible {
            return Ok(());
        }
        let (name, parent) = match path.split_last() {
            Some((name, parent)) => (name.to_string(), display_path(parent)),
            None => (ROOT_PATH.to_string(), ROOT_PATH.to_string()),
        };
        Err(RuleDefinitionError::UnsatisfiableRule {
            name,
            path: parent,
            reason: format!(
                "a command is required ({}) but no command rule may appear",
                level.quantifier
            ),
        })
    }

    /// A command quantified `Zero` may never appear, so nothing may be nested under it.
    pub fn check_forbidden_command_is_empty(
        rule: &CommandRule,
        path: &str,
    ) -> Result<(), RuleDefinitionError> {
        let nested_path = if path == ROOT_PATH {
            rule.name().to_string()
        } else {
            format!("{} {}", path, rule.name())
        };
        let reason = format!("command '{}' is quantified as zero", rule.name());

        if let Some(option) = rule.options().first() {
            return Err(RuleDefinitionError::UnsatisfiableRule {
                name: option.name().to_string(),
                path: nested_path,
                reason,
            });
        }
        if let Some(command) = rule.commands().first() {
            return Err(RuleDefinitionError::UnsatisfiableRule {
                name: command.name().to_string(),
                path: nested_path,
                reason,
            });
        }
        Ok(())
    }
}

fn duplicate(what: &'static str, name: &str, path: &str) -> RuleDefinitionError {
    RuleDefinitionError::DuplicateRuleName {
        what,
        name: name.to_string(),
        path: path.to_string(),
    }
}

fn display_path(path: &[&str]) -> String {
    if path.is_empty() {
        ROOT_PATH.to_string()
    } else {
        path.join(" ")
    }
}

#[cfg(test)]
mod tests {
    use crate::errors::RuleDefinitionError;
    use crate::grammar::{CmdLineRules, CommandQuantifier::*, CommandRule, OptionRule};

    #[test]
    fn duplicate_top_level_command() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("build", One))
            .command(CommandRule::new("build", ZeroOrOne))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleDefinitionError::DuplicateRuleName {
                what: "command",
                name: "build".into(),
                path: "<root>".into(),
            }
        );
    }

    #[test]
    fn duplicate_nested_option_reports_path() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(
                CommandRule::new("remote", ZeroOrOne).command(
                    CommandRule::new("add", ZeroOrOne)
                        .option(OptionRule::flag("force"))
                        .option(OptionRule::value("force")),
                ),
            )
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleDefinitionError::DuplicateRuleName {
                what: "option",
                name: "force".into(),
                path: "remote add".into(),
            }
        );
    }

    #[test]
    fn same_name_at_different_levels_is_fine() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("verbose"))
            .command(CommandRule::new("build", ZeroOrOne).option(OptionRule::flag("verbose")))
            .command(CommandRule::new("test", ZeroOrOne).command(CommandRule::new("build", One)))
            .build();
        assert!(rules.is_ok());
    }

    #[test]
    fn duplicate_short_alias() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("verbose").short('v'))
            .option(OptionRule::flag("version").short('v'))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::DuplicateRuleName { name, .. } if name == "v"));
    }

    #[test]
    fn option_alias_equal_to_its_own_name_is_allowed() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("q").short('q'))
            .build();
        assert!(rules.is_ok());
    }

    #[test]
    fn empty_names_are_rejected() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("  "))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::EmptyName { what: "option", .. }));
    }

    #[test]
    fn optional_option_under_zero_command_is_unsatisfiable() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("legacy", Zero).option(OptionRule::flag("fast")))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleDefinitionError::UnsatisfiableRule {
                name: "fast".into(),
                path: "legacy".into(),
                reason: "command 'legacy' is quantified as zero".into(),
            }
        );
    }

    #[test]
    fn bare_zero_command_is_allowed() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("legacy", Zero))
            .build();
        assert!(rules.is_ok());
    }

    #[test]
    fn required_command_under_zero_set() {
        let err = CmdLineRules::builder(Zero)
            .command(CommandRule::new("build", One))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::UnsatisfiableRule { name, .. } if name == "build"));
    }

    #[test]
    fn required_set_without_admissible_commands() {
        let err = CmdLineRules::builder(One)
            .command(CommandRule::new("legacy", Zero))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleDefinitionError::UnsatisfiableRule {
                name: "<root>".into(),
                path: "<root>".into(),
                reason: "a command is required (exactly one) but no command rule may appear".into(),
            }
        );

        let err = CmdLineRules::builder(OneOrMultiple).build().unwrap_err();
        assert!(matches!(err, RuleDefinitionError::UnsatisfiableRule { .. }));
    }

    #[test]
    fn nested_required_set_without_commands() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(
                CommandRule::new("remote", ZeroOrOne)
                    .command(CommandRule::new("add", ZeroOrOne).subcommands(One)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RuleDefinitionError::UnsatisfiableRule { name, path, .. } if name == "add" && path == "remote"
        ));
    }

    #[test]
    fn required_option_under_zero_command_is_unsatisfiable_too() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("legacy", Zero).option(OptionRule::value("mode").required()))
            .build()
            .unwrap_err();
        assert_eq!(
            err,
            RuleDefinitionError::UnsatisfiableRule {
                name: "mode".into(),
                path: "legacy".into(),
                reason: "command 'legacy' is quantified as zero".into(),
            }
        );
    }

    #[test]
    fn two_required_commands_under_single_command_set() {
        let err = CmdLineRules::builder(One)
            .command(CommandRule::new("build", One))
            .command(CommandRule::new("test", OneOrMultiple))
            .build()
            .unwrap_err();
        assert!(matches!(err, RuleDefinitionError::UnsatisfiableRule { name, .. } if name == "test"));
    }

    #[test]
    fn nested_set_quantifier_is_checked_too() {
        let err = CmdLineRules::builder(ZeroOrMultiple)
            .command(
                CommandRule::new("remote", ZeroOrOne)
                    .subcommands(ZeroOrOne)
                    .command(CommandRule::new("add", One))
                    .command(CommandRule::new("remove", One)),
            )
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            RuleDefinitionError::UnsatisfiableRule { name, path, .. } if name == "remove" && path == "remote"
        ));
    }
}
