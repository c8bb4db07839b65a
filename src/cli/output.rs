//! Handles all user-facing output for the CLI.
//!
//! Writers are generic over [`WriteColor`] so the same code prints colored
//! text to a terminal and plain text into a buffer.

use std::io::{self, Write};

use serde::Serialize;
use termcolor::{Color, ColorSpec, WriteColor};

use crate::ast::RootNode;
use crate::syntax::{Token, TokenKind};

/// One line per token: span, kind, then the token's text.
pub fn write_tokens(out: &mut impl WriteColor, tokens: &[Token]) -> io::Result<()> {
    for token in tokens {
        let (kind, detail) = token_columns(token);
        write!(out, "{:<10} ", token.span.to_string())?;
        out.set_color(ColorSpec::new().set_fg(Some(kind_color(&token.kind))))?;
        write!(out, "{:<8}", kind)?;
        out.reset()?;
        writeln!(out, " {}", detail)?;
    }
    Ok(())
}

pub fn write_tree(out: &mut impl WriteColor, root: &RootNode) -> io::Result<()> {
    write!(out, "{}", root)
}

pub fn write_json(out: &mut impl Write, value: &impl Serialize) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)
}

fn token_columns(token: &Token) -> (&'static str, String) {
    match &token.kind {
        TokenKind::ProgramName(lit) => ("program", format!("{:?}", lit.text)),
        TokenKind::Command(name) => ("command", name.clone()),
        TokenKind::Option(opt) => {
            let mut detail = format!("{}{}", opt.prefix.as_str(), opt.name);
            if let Some(value) = &opt.value {
                detail.push_str(&format!(" = {:?}", value.literal.text));
            }
            ("option", detail)
        }
        TokenKind::Value(lit) => ("value", format!("{:?}", lit.text)),
    }
}

fn kind_color(kind: &TokenKind) -> Color {
    match kind {
        TokenKind::ProgramName(_) => Color::Magenta,
        TokenKind::Command(_) => Color::Green,
        TokenKind::Option(_) => Color::Cyan,
        TokenKind::Value(_) => Color::Yellow,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{parse, tokenize};
    use termcolor::NoColor;

    fn plain(write: impl FnOnce(&mut NoColor<Vec<u8>>) -> io::Result<()>) -> String {
        let mut out = NoColor::new(Vec::new());
        write(&mut out).unwrap();
        String::from_utf8(out.into_inner()).unwrap()
    }

    #[test]
    fn tokens_are_listed_with_spans() {
        let tokens = tokenize("tool build --target=release").unwrap();
        let text = plain(|out| write_tokens(out, &tokens));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "0..4       program  \"tool\"");
        assert_eq!(lines[1], "5..10      command  build");
        assert_eq!(lines[2], "11..27     option   --target = \"release\"");
    }

    #[test]
    fn json_tree_names_the_program() {
        let root = parse("tool -v").unwrap();
        let mut out = Vec::new();
        write_json(&mut out, &root).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(json["program"]["value"], "tool");
        assert_eq!(json["options"][0]["prefix"], "short");
    }
}
