use serde::Serialize;

/// How many times a command, or a set of sibling commands, may occur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommandQuantifier {
    Zero,
    ZeroOrOne,
    One,
    OneOrMultiple,
    #[default]
    ZeroOrMultiple,
}

impl CommandQuantifier {
    pub const fn min(&self) -> usize {
        match self {
            CommandQuantifier::One | CommandQuantifier::OneOrMultiple => 1,
            CommandQuantifier::Zero
            | CommandQuantifier::ZeroOrOne
            | CommandQuantifier::ZeroOrMultiple => 0,
        }
    }

    /// Upper bound, or `None` when unbounded.
    pub const fn max(&self) -> Option<usize> {
        match self {
            CommandQuantifier::Zero => Some(0),
            CommandQuantifier::ZeroOrOne | CommandQuantifier::One => Some(1),
            CommandQuantifier::OneOrMultiple | CommandQuantifier::ZeroOrMultiple => None,
        }
    }

    /// True when `count` occurrences satisfy this quantifier.
    pub fn is_satisfied(&self, count: usize) -> bool {
        count >= self.min() && self.max().map_or(true, |max| count <= max)
    }

    /// True when at least one occurrence is demanded.
    pub const fn requires_presence(&self) -> bool {
        self.min() > 0
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            CommandQuantifier::Zero => "zero",
            CommandQuantifier::ZeroOrOne => "zero or one",
            CommandQuantifier::One => "exactly one",
            CommandQuantifier::OneOrMultiple => "one or more",
            CommandQuantifier::ZeroOrMultiple => "any number",
        }
    }
}

impl std::fmt::Display for CommandQuantifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::CommandQuantifier::*;

    #[test]
    fn satisfaction_table() {
        let cases = [
            (Zero, [true, false, false]),
            (ZeroOrOne, [true, true, false]),
            (One, [false, true, false]),
            (OneOrMultiple, [false, true, true]),
            (ZeroOrMultiple, [true, true, true]),
        ];
        for (quantifier, expected) in cases {
            for (count, want) in expected.into_iter().enumerate() {
                assert_eq!(
                    quantifier.is_satisfied(count),
                    want,
                    "{quantifier:?} with {count} occurrences"
                );
            }
        }
    }

    #[test]
    fn unbounded_quantifiers_accept_large_counts() {
        assert!(OneOrMultiple.is_satisfied(1_000));
        assert!(ZeroOrMultiple.is_satisfied(1_000));
        assert!(!ZeroOrOne.is_satisfied(1_000));
    }

    #[test]
    fn presence() {
        assert!(One.requires_presence());
        assert!(OneOrMultiple.requires_presence());
        assert!(!ZeroOrOne.requires_presence());
    }
}
