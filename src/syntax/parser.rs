//! cmdgram Parser
//!
//! Builds exactly one [`RootNode`] from the token stream in a single forward
//! pass with one token of lookahead. The parser is purely structural: it knows
//! nothing about which commands or options exist.
//!
//! Token-level grammar:
//!
//! ```text
//! root    := PROGRAM (option | command)*
//! command := COMMAND command* option*
//! option  := OPTION value?
//! ```
//!
//! A command collects sub-commands until its first option. Once a command has
//! options, the next command token closes it and is handed back to the
//! enclosing level, so `tool build --release test` yields two sibling commands.

use std::sync::Arc;

use tracing::debug;

use crate::ast::{CommandNode, OptionNode, RootNode, SourceText, Span, ValueNode};
use crate::errors::{LexError, ParseError, SyntaxError};
use crate::syntax::lexer::{Lexer, LexerConfig, Literal, OptionToken, Token, TokenKind};

/// Default bound on command nesting, which also bounds recursion in the checker.
pub const DEFAULT_MAX_DEPTH: usize = 32;

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Where an option finds its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OptionValueStyle {
    /// Only `--name=value` forms carry a value.
    #[default]
    Attached,
    /// An option without an attached value also takes the following
    /// non-option token (`--name value`).
    NextToken,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    pub lexer: LexerConfig,
    pub option_values: OptionValueStyle,
    /// Maximum command nesting; top-level commands are at depth 1.
    pub max_depth: usize,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            lexer: LexerConfig::default(),
            option_values: OptionValueStyle::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

// ============================================================================
// PUBLIC API
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    pub fn new(config: ParserConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    pub fn parse(&self, source: &str) -> Result<RootNode, SyntaxError> {
        let shared: SourceText = Arc::from(source);
        let mut state = ParseState {
            tokens: Lexer::with_config(source, self.config.lexer),
            peeked: None,
            source: shared,
            config: self.config,
        };
        let root = state.parse_root()?;
        debug!(
            commands = root.commands().len(),
            options = root.options().len(),
            depth = root.command_depth(),
            "parsed command line"
        );
        Ok(root)
    }
}

/// Parses `source` with the default configuration.
pub fn parse(source: &str) -> Result<RootNode, SyntaxError> {
    Parser::default().parse(source)
}

// ============================================================================
// PARSE STATE
// ============================================================================

struct ParseState<'a> {
    tokens: Lexer<'a>,
    peeked: Option<Token>,
    source: SourceText,
    config: ParserConfig,
}

impl ParseState<'_> {
    fn peek(&mut self) -> Result<Option<&Token>, LexError> {
        if self.peeked.is_none() {
            self.peeked = self.tokens.next().transpose()?;
        }
        Ok(self.peeked.as_ref())
    }

    fn advance(&mut self) -> Result<Option<Token>, LexError> {
        match self.peeked.take() {
            Some(token) => Ok(Some(token)),
            None => self.tokens.next().transpose(),
        }
    }

    fn end_of_input(&self) -> Span {
        Span::point(self.source.len())
    }

    fn value_node(&self, literal: Literal, span: Span) -> ValueNode {
        ValueNode::new(Arc::clone(&self.source), span, literal.text, literal.quoted)
    }

    fn parse_root(&mut self) -> Result<RootNode, SyntaxError> {
        let program = match self.advance()? {
            Some(Token {
                kind: TokenKind::ProgramName(literal),
                span,
            }) => self.value_node(literal, span),
            Some(other) => return Err(unexpected("a program name", &other).into()),
            None => {
                return Err(ParseError::UnexpectedToken {
                    expected: "a program name".into(),
                    found: "end of input".into(),
                    span: self.end_of_input(),
                }
                .into())
            }
        };

        let mut commands = Vec::new();
        let mut options = Vec::new();
        while let Some(token) = self.advance()? {
            match token.kind {
                TokenKind::Option(option) => options.push(self.parse_option(option)?),
                TokenKind::Command(name) => commands.push(self.parse_command(name, token.span, 1)?),
                _ => return Err(unexpected("a command or an option", &token).into()),
            }
        }

        Ok(RootNode::new(
            Arc::clone(&self.source),
            program,
            commands,
            options,
        ))
    }

    fn parse_command(
        &mut self,
        name: String,
        name_span: Span,
        depth: usize,
    ) -> Result<CommandNode, SyntaxError> {
        if depth > self.config.max_depth {
            return Err(ParseError::NestingTooDeep {
                limit: self.config.max_depth,
                span: name_span,
            }
            .into());
        }

        let mut commands = Vec::new();
        let mut options = Vec::new();
        loop {
            let closes_here = match self.peek()? {
                None => true,
                Some(Token {
                    kind: TokenKind::Command(_),
                    ..
                }) => !options.is_empty(),
                Some(_) => false,
            };
            if closes_here {
                break;
            }
            let Some(token) = self.advance()? else {
                break;
            };
            match token.kind {
                TokenKind::Option(option) => options.push(self.parse_option(option)?),
                TokenKind::Command(sub) => {
                    commands.push(self.parse_command(sub, token.span, depth + 1)?)
                }
                _ => return Err(unexpected("a command or an option", &token).into()),
            }
        }

        Ok(CommandNode::new(
            Arc::clone(&self.source),
            name,
            name_span,
            commands,
            options,
        ))
    }

    fn parse_option(&mut self, option: OptionToken) -> Result<OptionNode, SyntaxError> {
        let value = match option.value {
            Some(attached) => Some(self.value_node(attached.literal, attached.span)),
            None if self.config.option_values == OptionValueStyle::NextToken => {
                self.take_next_value()?
            }
            None => None,
        };
        Ok(OptionNode::new(
            Arc::clone(&self.source),
            option.name,
            option.name_span,
            option.prefix,
            value,
        ))
    }

    /// Consumes the next token as an option value if it is a value or a bare word.
    fn take_next_value(&mut self) -> Result<Option<ValueNode>, SyntaxError> {
        let is_value = matches!(
            self.peek()?,
            Some(Token {
                kind: TokenKind::Value(_) | TokenKind::Command(_),
                ..
            })
        );
        if !is_value {
            return Ok(None);
        }
        let value = match self.advance()? {
            Some(Token {
                kind: TokenKind::Value(literal),
                span,
            }) => Some(self.value_node(literal, span)),
            Some(Token {
                kind: TokenKind::Command(text),
                span,
            }) => Some(self.value_node(
                Literal {
                    text,
                    quoted: false,
                },
                span,
            )),
            _ => None,
        };
        Ok(value)
    }
}

fn unexpected(expected: &str, found: &Token) -> ParseError {
    ParseError::UnexpectedToken {
        expected: expected.to_string(),
        found: found.describe(),
        span: found.span,
    }
}
