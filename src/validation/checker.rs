//! Structural checker
//!
//! Reconciles a parsed tree with a [`CmdLineRules`] value one nesting level at
//! a time: the root against the top-level rules, then every recognized command
//! occurrence against its own rule's nested rules. Every violation found is
//! recorded; the final list is ordered by span start.
//!
//! A check is a pure function of its inputs and keeps no state between calls.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::ast::{CommandNode, OptionNode, RootNode, Span};
use crate::grammar::{CmdLineRules, CommandQuantifier, RuleLevel};
use crate::validation::diagnostic::{Diagnostic, DiagnosticReporter};
use crate::validation::ValidationResult;

/// Checks `root` against `rules`, reporting every violation at once.
pub fn check(root: &RootNode, rules: &CmdLineRules) -> ValidationResult {
    let mut diagnostics: Vec<Diagnostic> = Vec::new();
    check_level(
        root.span(),
        root.commands(),
        root.options(),
        rules.level(),
        &mut diagnostics,
    );
    // Stable: diagnostics sharing a start keep the order they were found in.
    diagnostics.sort_by_key(|d| d.span.position);
    debug!(
        diagnostics = diagnostics.len(),
        program = root.program().value(),
        "checked command line"
    );
    ValidationResult::from_diagnostics(diagnostics)
}

/// One level: `scope` is the span of the node owning `commands` and
/// `options`, used to locate "missing" diagnostics.
fn check_level(
    scope: Span,
    commands: &[CommandNode],
    options: &[OptionNode],
    level: RuleLevel<'_>,
    sink: &mut impl DiagnosticReporter,
) {
    trace!(
        scope = %scope,
        commands = commands.len(),
        options = options.len(),
        "checking level"
    );
    check_commands(scope, commands, level, sink);
    check_options(scope, options, level, sink);
}

fn check_commands(
    scope: Span,
    commands: &[CommandNode],
    level: RuleLevel<'_>,
    sink: &mut impl DiagnosticReporter,
) {
    let mut first_seen: HashMap<&str, Span> = HashMap::new();
    let mut admitted: Vec<&CommandNode> = Vec::new();

    for command in commands {
        let Some(rule) = level.command(command.name()) else {
            sink.unknown_command(command.name(), command.span());
            continue;
        };
        // A zero set forbids every known command, as does a zero rule.
        if level.quantifier == CommandQuantifier::Zero || rule.quantifier() == CommandQuantifier::Zero
        {
            sink.unexpected_command(Some(command.name()), command.span());
            continue;
        }

        match first_seen.get(command.name()) {
            Some(&first) if rule.quantifier().max() == Some(1) => {
                sink.duplicate_command(command.name(), command.span(), first);
            }
            Some(_) => admitted.push(command),
            None => {
                first_seen.insert(command.name(), command.span());
                admitted.push(command);
            }
        }

        check_level(
            command.span(),
            command.commands(),
            command.options(),
            rule.level(),
            sink,
        );
    }

    let mut named_missing = false;
    for rule in level.commands {
        if rule.quantifier().requires_presence() && !first_seen.contains_key(rule.name()) {
            sink.missing_command(Some(rule.name()), scope);
            named_missing = true;
        }
    }

    // The set quantifier counts commands that passed their own rule.
    match level.quantifier.max() {
        Some(max) if admitted.len() > max => {
            for command in &admitted[max..] {
                sink.unexpected_command(Some(command.name()), command.span());
            }
        }
        _ => {}
    }
    if admitted.len() < level.quantifier.min() && !named_missing {
        sink.missing_command(None, scope);
    }
}

fn check_options(
    scope: Span,
    options: &[OptionNode],
    level: RuleLevel<'_>,
    sink: &mut impl DiagnosticReporter,
) {
    let mut first_seen: HashMap<&str, Span> = HashMap::new();

    for option in options {
        let Some(rule) = level.option(option.name(), option.prefix()) else {
            sink.unknown_option(option.name(), option.span());
            continue;
        };

        match first_seen.get(rule.name()) {
            Some(&first) if !rule.is_repeatable() => {
                sink.duplicate_option(rule.name(), option.span(), first);
            }
            Some(_) => {}
            None => {
                first_seen.insert(rule.name(), option.span());
            }
        }

        match (rule.expects_value(), option.value()) {
            (true, None) => sink.missing_option_value(rule.name(), option.span()),
            (false, Some(value)) => sink.unexpected_option_value(rule.name(), value.span()),
            _ => {}
        }
    }

    for rule in level.options {
        if rule.is_required() && !first_seen.contains_key(rule.name()) {
            sink.missing_option(rule.name(), scope);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{CommandQuantifier::*, CommandRule, OptionRule};
    use crate::syntax::parse;
    use crate::validation::DiagnosticKind::{self, *};

    fn kinds(source: &str, rules: &CmdLineRules) -> Vec<(DiagnosticKind, Option<String>)> {
        let root = parse(source).unwrap();
        check(&root, rules)
            .diagnostics()
            .iter()
            .map(|d| (d.kind, d.subject.clone()))
            .collect()
    }

    fn build_rules(quantifier: CommandQuantifier) -> CmdLineRules {
        CmdLineRules::builder(quantifier)
            .option(OptionRule::flag("verbose").short('v'))
            .command(CommandRule::new("build", quantifier_for_build(quantifier)))
            .build()
            .unwrap()
    }

    fn quantifier_for_build(set: CommandQuantifier) -> CommandQuantifier {
        if set == Zero {
            ZeroOrOne
        } else {
            One
        }
    }

    #[test]
    fn zero_set_rejects_known_commands() {
        let rules = build_rules(Zero);
        assert_eq!(
            kinds("tool build", &rules),
            vec![(UnexpectedCommand, Some("build".into()))]
        );
    }

    #[test]
    fn zero_set_still_reports_unknown_commands() {
        let empty = CmdLineRules::builder(Zero).build().unwrap();
        assert_eq!(
            kinds("tool deploy", &empty),
            vec![(UnknownCommand, Some("deploy".into()))]
        );

        let rules = build_rules(Zero);
        assert_eq!(
            kinds("tool build --x=1 deploy", &rules),
            vec![
                (UnexpectedCommand, Some("build".into())),
                (UnknownCommand, Some("deploy".into())),
            ]
        );
    }

    #[test]
    fn zero_rule_rejects_its_command() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("legacy", Zero))
            .build()
            .unwrap();
        assert_eq!(
            kinds("tool legacy", &rules),
            vec![(UnexpectedCommand, Some("legacy".into()))]
        );
        assert!(kinds("tool", &rules).is_empty());
    }

    #[test]
    fn set_quantifier_limits_distinct_commands() {
        let rules = CmdLineRules::builder(ZeroOrOne)
            .command(CommandRule::new("build", ZeroOrOne))
            .command(CommandRule::new("test", ZeroOrOne))
            .build()
            .unwrap();
        assert_eq!(
            kinds("tool build --x=1 test", &rules)
                .into_iter()
                .filter(|(k, _)| *k == UnexpectedCommand)
                .collect::<Vec<_>>(),
            vec![(UnexpectedCommand, Some("test".into()))]
        );
    }

    #[test]
    fn set_level_missing_command_without_named_rule() {
        let rules = CmdLineRules::builder(One)
            .command(CommandRule::new("build", ZeroOrOne))
            .command(CommandRule::new("test", ZeroOrOne))
            .build()
            .unwrap();
        assert_eq!(kinds("tool", &rules), vec![(MissingCommand, None)]);
    }

    #[test]
    fn named_missing_command_suppresses_set_level_one() {
        let rules = build_rules(One);
        assert_eq!(
            kinds("tool", &rules),
            vec![(MissingCommand, Some("build".into()))]
        );
    }

    #[test]
    fn one_or_multiple_accepts_repeats() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("add", OneOrMultiple).option(OptionRule::value("path")))
            .build()
            .unwrap();
        assert!(kinds("tool add --path=a add --path=b", &rules).is_empty());
        assert_eq!(kinds("tool", &rules), vec![(MissingCommand, Some("add".into()))]);
    }

    #[test]
    fn zero_or_one_flags_extras() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("init", ZeroOrOne).option(OptionRule::flag("bare")))
            .build()
            .unwrap();
        assert!(kinds("tool", &rules).is_empty());
        assert_eq!(
            kinds("tool init --bare init --bare init", &rules),
            vec![
                (DuplicateCommand, Some("init".into())),
                (DuplicateCommand, Some("init".into())),
            ]
        );
    }

    #[test]
    fn nested_commands_are_checked_against_nested_rules() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(
                CommandRule::new("remote", ZeroOrOne)
                    .command(CommandRule::new("add", ZeroOrOne).option(OptionRule::flag("force")))
                    .option(OptionRule::flag("quiet")),
            )
            .build()
            .unwrap();
        assert!(kinds("tool remote add --force", &rules).is_empty());
        assert_eq!(
            kinds("tool remote rename --force", &rules),
            vec![(UnknownCommand, Some("rename".into()))]
        );
        assert_eq!(
            kinds("tool remote add --quiet", &rules),
            vec![(UnknownOption, Some("quiet".into()))]
        );
    }

    #[test]
    fn unknown_commands_are_not_descended_into() {
        let rules = build_rules(ZeroOrMultiple);
        assert_eq!(
            kinds("tool build deploy --anything", &rules),
            vec![(UnknownCommand, Some("deploy".into()))]
        );
    }

    #[test]
    fn options_by_alias_and_repetition() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("verbose").short('v').repeatable())
            .option(OptionRule::value("level").short('l'))
            .build()
            .unwrap();
        assert!(kinds("tool -v --verbose -v -l=3", &rules).is_empty());
        assert_eq!(
            kinds("tool --level=1 -l=2", &rules),
            vec![(DuplicateOption, Some("level".into()))]
        );
        assert_eq!(
            kinds("tool --l=2", &rules),
            vec![(UnknownOption, Some("l".into()))]
        );
    }

    #[test]
    fn value_arity_is_checked_per_occurrence() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .option(OptionRule::flag("dry-run"))
            .option(OptionRule::value("out").repeatable())
            .build()
            .unwrap();
        let root = parse("tool --dry-run=yes --out --out=a").unwrap();
        let result = check(&root, &rules);
        let diagnostics = result.diagnostics();
        assert_eq!(diagnostics.len(), 2);
        assert_eq!(diagnostics[0].kind, UnexpectedOptionValue);
        assert_eq!(diagnostics[0].span, Span::new(15, 3));
        assert_eq!(diagnostics[1].kind, MissingOptionValue);
        assert_eq!(diagnostics[1].span, Span::new(19, 5));
    }

    #[test]
    fn missing_option_is_located_at_its_scope() {
        let rules = CmdLineRules::builder(ZeroOrMultiple)
            .command(CommandRule::new("build", One).option(OptionRule::value("target").required()))
            .build()
            .unwrap();
        let root = parse("tool build").unwrap();
        let result = check(&root, &rules);
        assert_eq!(result.diagnostics().len(), 1);
        assert_eq!(result.diagnostics()[0].kind, MissingOption);
        assert_eq!(result.diagnostics()[0].span, Span::new(5, 5));
    }

    #[test]
    fn diagnostics_are_in_source_order() {
        let rules = build_rules(ZeroOrMultiple);
        let root = parse("tool --nope build --x build zap").unwrap();
        let result = check(&root, &rules);
        let positions: Vec<usize> = result
            .diagnostics()
            .iter()
            .map(|d| d.span.position)
            .collect();
        let mut sorted = positions.clone();
        sorted.sort();
        assert_eq!(positions, sorted);
        assert_eq!(positions.len(), 4);
    }
}
