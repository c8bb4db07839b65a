//! Defines the command-line arguments and subcommands for the cmdgram CLI.

use clap::{Args, Parser, Subcommand};

use crate::syntax::{LexerConfig, OptionValueStyle, ParserConfig, DEFAULT_MAX_DEPTH};

/// The main CLI argument structure.
#[derive(Debug, Parser)]
#[command(
    name = "cmdgram",
    version,
    about = "Inspect how a command line is tokenized and parsed."
)]
pub struct CmdgramArgs {
    #[command(flatten)]
    pub syntax: SyntaxArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Flags shared by every subcommand; they map onto [`ParserConfig`].
#[derive(Debug, Clone, Args)]
pub struct SyntaxArgs {
    /// Character delimiting quoted values.
    #[arg(long, global = true, default_value_t = '"', value_parser = parse_quote)]
    pub quote: char,

    /// Let an option without `=value` take the following token as its value.
    #[arg(long, global = true)]
    pub next_token_values: bool,

    /// Maximum command nesting depth.
    #[arg(long, global = true, default_value_t = DEFAULT_MAX_DEPTH)]
    pub max_depth: usize,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the token stream, one token per line.
    Tokens {
        /// The command line to tokenize, program name included.
        #[arg(required = true)]
        line: String,
    },
    /// Show the syntax tree of a command line.
    Ast {
        /// The command line to parse, program name included.
        #[arg(required = true)]
        line: String,

        /// Print the tree as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl SyntaxArgs {
    pub fn parser_config(&self) -> ParserConfig {
        ParserConfig {
            lexer: LexerConfig { quote: self.quote },
            option_values: if self.next_token_values {
                OptionValueStyle::NextToken
            } else {
                OptionValueStyle::Attached
            },
            max_depth: self.max_depth,
        }
    }
}

/// A quote must be a single character that cannot start or split a word.
fn parse_quote(raw: &str) -> Result<char, String> {
    let mut chars = raw.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) if c.is_whitespace() || c == '-' || c == '=' => {
            Err(format!("'{}' cannot be used as a quote character", c))
        }
        (Some(c), None) => Ok(c),
        _ => Err("expected exactly one character".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_map_onto_parser_config() {
        let args = CmdgramArgs::try_parse_from([
            "cmdgram",
            "ast",
            "tool 'x'",
            "--quote",
            "'",
            "--next-token-values",
            "--max-depth",
            "4",
        ])
        .unwrap();
        let config = args.syntax.parser_config();
        assert_eq!(config.lexer.quote, '\'');
        assert_eq!(config.option_values, OptionValueStyle::NextToken);
        assert_eq!(config.max_depth, 4);
        assert!(matches!(args.command, Command::Ast { json: false, .. }));
    }

    #[test]
    fn defaults_match_parser_defaults() {
        let args = CmdgramArgs::try_parse_from(["cmdgram", "tokens", "tool"]).unwrap();
        assert_eq!(args.syntax.parser_config(), ParserConfig::default());
    }

    #[test]
    fn rejects_unusable_quote_characters() {
        assert!(parse_quote("-").is_err());
        assert!(parse_quote(" ").is_err());
        assert!(parse_quote("ab").is_err());
        assert_eq!(parse_quote("'"), Ok('\''));
    }
}
