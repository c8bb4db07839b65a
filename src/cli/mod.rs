//! The cmdgram command-line interface.
//!
//! Each subcommand runs one phase of the library over a command line given as
//! a single argument and prints the result to stdout. Fatal syntax errors are
//! returned as `miette` reports carrying the input so their labels render
//! against it.

use std::io::IsTerminal;

use miette::IntoDiagnostic;
use termcolor::{ColorChoice, StandardStream};
use tracing::debug;

use crate::cli::args::{CmdgramArgs, Command};
use crate::errors::with_source;
use crate::syntax::{tokenize_with, Parser};

pub mod args;
pub mod output;

/// Runs the subcommand selected by `args`.
pub fn run(args: CmdgramArgs) -> miette::Result<()> {
    let config = args.syntax.parser_config();
    debug!(?config, "running cli");
    let color = if std::io::stdout().is_terminal() {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(color);

    match args.command {
        Command::Tokens { line } => {
            let tokens = tokenize_with(&line, config.lexer).map_err(|e| with_source(e, &line))?;
            output::write_tokens(&mut stdout, &tokens).into_diagnostic()
        }
        Command::Ast { line, json } => {
            let root = Parser::new(config)
                .parse(&line)
                .map_err(|e| with_source(e, &line))?;
            if json {
                output::write_json(&mut stdout, &root).into_diagnostic()
            } else {
                output::write_tree(&mut stdout, &root).into_diagnostic()
            }
        }
    }
}
