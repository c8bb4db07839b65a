//! Indented text rendering of a parsed command line.

use std::fmt::{self, Write};

use super::{AstNode, RootNode};

const INDENT: &str = "  ";

/// Writes the tree one node per line, children indented under their parent.
/// This is also the `Display` form of [`RootNode`].
///
/// ```text
/// root 0..37
///   program tool 0..4
///   option --verbose 5..14
///   command build 15..37
///     option --target 21..37
///       value release 30..37
/// ```
pub fn write_tree(out: &mut impl Write, root: &RootNode) -> fmt::Result {
    write_node(out, AstNode::Root(root), 0)
}

fn write_node(out: &mut impl Write, node: AstNode<'_>, depth: usize) -> fmt::Result {
    let label = match node {
        AstNode::Root(_) => "root".to_string(),
        AstNode::Value(value) if depth == 1 => format!("program {}", value.value()),
        AstNode::Value(value) if value.is_quoted() => format!("value {:?}", value.value()),
        AstNode::Value(value) => format!("value {}", value.value()),
        AstNode::Command(command) => format!("command {}", command.name()),
        AstNode::Option(option) => {
            format!("option {}{}", option.prefix().as_str(), option.name())
        }
    };
    writeln!(out, "{}{} {}", INDENT.repeat(depth), label, node.span())?;
    for child in node.children() {
        write_node(out, child, depth + 1)?;
    }
    Ok(())
}

impl fmt::Display for RootNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_tree(f, self)
    }
}

#[cfg(test)]
mod tests {
    use crate::syntax::parse;

    #[test]
    fn quoted_values_are_shown_quoted() {
        let root = parse("tool --msg=\"a b\" run").unwrap();
        let expected = "root 0..20
  program tool 0..4
  option --msg 5..16
    value \"a b\" 11..16
  command run 17..20
";
        assert_eq!(root.to_string(), expected);
    }
}
