//! Command-line tokenizer.
//!
//! Splits raw text into spanned tokens. Whitespace outside quotes separates
//! tokens and is never emitted. The first token is always the program name;
//! after it, a word starting with `-` is an option, a word starting with the
//! quote character is a quoted value, and any other word is a command.
//!
//! The lexer is a lazy iterator. It stops after the first error, and can be
//! restarted from scratch by constructing a new one over the same text.

use serde::Serialize;
use tracing::trace;

use crate::ast::{OptionPrefix, Span};
use crate::errors::LexError;

// ============================================================================
// CONFIGURATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LexerConfig {
    /// Character delimiting quoted values.
    pub quote: char,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self { quote: '"' }
    }
}

// ============================================================================
// TOKENS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum TokenKind {
    ProgramName(Literal),
    Command(String),
    Option(OptionToken),
    Value(Literal),
}

/// Literal text of a value; quotes are stripped from `text`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    pub text: String,
    pub quoted: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionToken {
    pub name: String,
    /// Span of the dashes and name, without any `=value` part.
    pub name_span: Span,
    pub prefix: OptionPrefix,
    /// Value written in the same token, as in `--name=value`.
    pub value: Option<AttachedValue>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachedValue {
    pub literal: Literal,
    pub span: Span,
}

impl Token {
    /// Short human-readable description used in parse errors.
    pub fn describe(&self) -> String {
        match &self.kind {
            TokenKind::ProgramName(lit) => format!("program name '{}'", lit.text),
            TokenKind::Command(name) => format!("command '{}'", name),
            TokenKind::Option(opt) => format!("option '{}{}'", opt.prefix.as_str(), opt.name),
            TokenKind::Value(lit) if lit.quoted => format!("quoted value \"{}\"", lit.text),
            TokenKind::Value(lit) => format!("value '{}'", lit.text),
        }
    }
}

// ============================================================================
// LEXER
// ============================================================================

#[derive(Debug, Clone)]
pub struct Lexer<'a> {
    source: &'a str,
    config: LexerConfig,
    pos: usize,
    seen_program: bool,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self::with_config(source, LexerConfig::default())
    }

    pub fn with_config(source: &'a str, config: LexerConfig) -> Self {
        Self {
            source,
            config,
            pos: 0,
            seen_program: false,
            finished: false,
        }
    }

    pub fn source(&self) -> &'a str {
        self.source
    }

    fn rest(&self) -> &'a str {
        &self.source[self.pos..]
    }

    fn skip_whitespace(&mut self) {
        let rest = self.rest();
        let trimmed = rest.trim_start();
        self.pos += rest.len() - trimmed.len();
    }

    /// Byte offset of the first whitespace at or after `from`, or end of input.
    fn word_end(&self, from: usize) -> usize {
        self.source[from..]
            .find(char::is_whitespace)
            .map(|i| from + i)
            .unwrap_or(self.source.len())
    }

    fn read_quoted(&self, start: usize) -> Result<(Literal, Span), LexError> {
        let quote = self.config.quote;
        let body_start = start + quote.len_utf8();
        match self.source[body_start..].find(quote) {
            Some(offset) => {
                let body_end = body_start + offset;
                let literal = Literal {
                    text: self.source[body_start..body_end].to_string(),
                    quoted: true,
                };
                Ok((literal, Span::from_range(start, body_end + quote.len_utf8())))
            }
            None => Err(LexError::UnterminatedQuote {
                quote,
                span: Span::from_range(start, self.source.len()),
            }),
        }
    }

    fn lex_option(&self, start: usize) -> Result<Token, LexError> {
        let word = &self.source[start..self.word_end(start)];
        let (prefix, dashes) = if word.starts_with("--") {
            (OptionPrefix::Long, 2)
        } else {
            (OptionPrefix::Short, 1)
        };
        let name_start = start + dashes;
        let name_len = self.source[name_start..]
            .find(|c: char| c == '=' || c.is_whitespace())
            .unwrap_or(self.source.len() - name_start);
        let name_end = name_start + name_len;

        if name_len == 0 {
            return Err(LexError::MalformedOption {
                text: word.to_string(),
                reason: "missing option name".into(),
                span: Span::new(start, word.len()),
            });
        }

        let name = self.source[name_start..name_end].to_string();
        let name_span = Span::from_range(start, name_end);

        if !self.source[name_end..].starts_with('=') {
            return Ok(Token {
                kind: TokenKind::Option(OptionToken {
                    name,
                    name_span,
                    prefix,
                    value: None,
                }),
                span: name_span,
            });
        }

        let value_start = name_end + 1;
        let (literal, value_span) = if self.source[value_start..].starts_with(self.config.quote) {
            self.read_quoted(value_start)?
        } else {
            let value_end = self.word_end(value_start);
            if value_end == value_start {
                return Err(LexError::MalformedOption {
                    text: word.to_string(),
                    reason: "missing value after '='".into(),
                    span: Span::new(start, word.len()),
                });
            }
            let literal = Literal {
                text: self.source[value_start..value_end].to_string(),
                quoted: false,
            };
            (literal, Span::from_range(value_start, value_end))
        };

        Ok(Token {
            kind: TokenKind::Option(OptionToken {
                name,
                name_span,
                prefix,
                value: Some(AttachedValue {
                    literal,
                    span: value_span,
                }),
            }),
            span: name_span.cover(value_span),
        })
    }

    fn lex_token(&mut self) -> Result<Token, LexError> {
        let start = self.pos;
        let is_program = !self.seen_program;
        self.seen_program = true;

        let token = if self.rest().starts_with(self.config.quote) {
            let (literal, span) = self.read_quoted(start)?;
            let kind = if is_program {
                TokenKind::ProgramName(literal)
            } else {
                TokenKind::Value(literal)
            };
            Token { kind, span }
        } else if !is_program && self.rest().starts_with('-') {
            self.lex_option(start)?
        } else {
            let end = self.word_end(start);
            let text = self.source[start..end].to_string();
            let kind = if is_program {
                TokenKind::ProgramName(Literal {
                    text,
                    quoted: false,
                })
            } else {
                TokenKind::Command(text)
            };
            Token {
                kind,
                span: Span::from_range(start, end),
            }
        };

        self.pos = token.span.end();
        Ok(token)
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        self.skip_whitespace();
        if self.pos >= self.source.len() {
            self.finished = true;
            return None;
        }
        let result = self.lex_token();
        match &result {
            Ok(token) => trace!(token = %token.describe(), span = %token.span, "lexed token"),
            Err(err) => {
                trace!(error = %err, "lexing stopped");
                self.finished = true;
            }
        }
        Some(result)
    }
}

impl std::iter::FusedIterator for Lexer<'_> {}

/// Collects every token of `source`, failing on the first lexical error.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).collect()
}

pub fn tokenize_with(source: &str, config: LexerConfig) -> Result<Vec<Token>, LexError> {
    Lexer::with_config(source, config).collect()
}
