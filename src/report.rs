//! Terminal rendering of validation diagnostics.
//!
//! Renders each [`Diagnostic`] as a header line followed by the offending line
//! of input with the span underlined:
//!
//! ```text
//! error[unknown_command] at 1:6: unknown command 'deploy'
//!
//! 1 | tool deploy
//!   |      ^----- unknown command
//! ```
//!
//! For `miette`-style output use [`crate::ValidationResult::into_result`] instead.

use std::io::{self, Write};

use termcolor::{Color, ColorSpec, WriteColor};
use unicode_width::UnicodeWidthStr;

use crate::ast::Span;
use crate::validation::Diagnostic;

// === Public API ===

/// Writes every diagnostic, then a one-line summary.
pub fn render_diagnostics(
    writer: &mut impl WriteColor,
    source: &str,
    diagnostics: &[Diagnostic],
) -> io::Result<()> {
    for diagnostic in diagnostics {
        render_diagnostic(writer, source, diagnostic)?;
        writeln!(writer)?;
    }
    if let Some(summary) = summary(diagnostics) {
        writer.set_color(ColorSpec::new().set_bold(true))?;
        writeln!(writer, "{}", summary)?;
        writer.reset()?;
    }
    Ok(())
}

pub fn render_diagnostic(
    writer: &mut impl WriteColor,
    source: &str,
    diagnostic: &Diagnostic,
) -> io::Result<()> {
    writer.set_color(ColorSpec::new().set_fg(Some(Color::Red)).set_bold(true))?;
    write!(writer, "error[{}]", diagnostic.kind.code_suffix())?;
    writer.reset()?;
    writeln!(writer, "{}", location(source, diagnostic))?;

    if let Some(snippet) = snippet(source, diagnostic.span, diagnostic.kind.label()) {
        writeln!(writer)?;
        write!(writer, "{}", snippet)?;
    }
    Ok(())
}

/// Same layout as [`render_diagnostics`], without color.
pub fn render_to_string(source: &str, diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diagnostic in diagnostics {
        out.push_str(&format!("error[{}]", diagnostic.kind.code_suffix()));
        out.push_str(&location(source, diagnostic));
        out.push('\n');
        if let Some(snippet) = snippet(source, diagnostic.span, diagnostic.kind.label()) {
            out.push('\n');
            out.push_str(&snippet);
        }
        out.push('\n');
    }
    if let Some(summary) = summary(diagnostics) {
        out.push_str(&summary);
        out.push('\n');
    }
    out
}

// === Formatting Helpers ===

/// The part of the header after the code: ` at line:col: message`.
fn location(source: &str, diagnostic: &Diagnostic) -> String {
    let (line, col) = diagnostic.span.line_col(source);
    format!(" at {}:{}: {}", line, col, diagnostic)
}

fn summary(diagnostics: &[Diagnostic]) -> Option<String> {
    match diagnostics.len() {
        0 => None,
        1 => Some("1 problem found".to_string()),
        n => Some(format!("{} problems found", n)),
    }
}

/// The input line holding the span start, with a pointer line under it.
/// Spans running past the end of that line are cut at the line end.
fn snippet(source: &str, span: Span, label: &str) -> Option<String> {
    let start = span.position.min(source.len());
    let line_start = source.get(..start)?.rfind('\n').map(|i| i + 1).unwrap_or(0);
    let line_end = source.get(start..)?
        .find('\n')
        .map(|i| start + i)
        .unwrap_or(source.len());
    let line_text = source.get(line_start..line_end)?;
    let (line_number, _) = span.line_col(source);

    let lead = source.get(line_start..start)?.width();
    let covered_end = span.end().clamp(start, line_end);
    let covered = source.get(start..covered_end)?.width().max(1);

    let gutter = line_number.to_string().len();
    let mut out = String::new();
    out.push_str(&format!("{:>gutter$} | {}\n", line_number, line_text));
    out.push_str(&format!("{:>gutter$} | ", ""));
    out.push_str(&" ".repeat(lead));
    out.push('^');
    out.push_str(&"-".repeat(covered - 1));
    out.push(' ');
    out.push_str(label);
    out.push('\n');
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::DiagnosticKind;

    #[test]
    fn underlines_the_span() {
        let diagnostic = Diagnostic::new(
            DiagnosticKind::UnknownCommand,
            Some("deploy".into()),
            Span::new(5, 6),
        );
        let output = render_to_string("tool deploy", &[diagnostic]);
        let expected = "error[unknown_command] at 1:6: unknown command 'deploy'

1 | tool deploy
  |      ^----- unknown command

1 problem found
";
        assert_eq!(output, expected);
    }

    #[test]
    fn colored_writer_matches_plain_rendering() {
        let diagnostics = vec![
            Diagnostic::new(DiagnosticKind::MissingCommand, Some("build".into()), Span::new(0, 11)),
            Diagnostic::new(DiagnosticKind::UnknownCommand, Some("deploy".into()), Span::new(5, 6)),
        ];
        let mut buffer = termcolor::Buffer::no_color();
        render_diagnostics(&mut buffer, "tool deploy", &diagnostics).unwrap();
        let written = String::from_utf8(buffer.into_inner()).unwrap();
        assert_eq!(written, render_to_string("tool deploy", &diagnostics));
        assert!(written.ends_with("\n2 problems found\n"));
    }

    #[test]
    fn nothing_to_render() {
        assert_eq!(render_to_string("tool", &[]), "");
    }

    #[test]
    fn empty_span_gets_a_single_caret() {
        let output = snippet("tool", Span::point(4), "here").unwrap();
        assert_eq!(output, "1 | tool\n  |     ^ here\n");
    }

    #[test]
    fn wide_characters_shift_the_pointer() {
        let source = "tool 日本 --x";
        let output = snippet(source, Span::new(12, 3), "unknown option").unwrap();
        assert_eq!(output.lines().nth(1), Some("  |           ^-- unknown option"));
    }

    #[test]
    fn pointer_stays_on_the_start_line() {
        let source = "tool build\n--target";
        let output = snippet(source, Span::new(5, 14), "x").unwrap();
        assert_eq!(output, "1 | tool build\n  |      ^---- x\n");
    }
}
