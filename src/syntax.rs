//! Syntax module for cmdgram
//!
//! Turns raw command-line text into a positioned tree: [`lexer`] produces the
//! token stream, [`parser`] assembles it into a [`crate::ast::RootNode`].

pub mod lexer;
pub mod parser;

pub use lexer::{tokenize, tokenize_with, Lexer, LexerConfig, Token, TokenKind};
pub use parser::{parse, OptionValueStyle, Parser, ParserConfig, DEFAULT_MAX_DEPTH};
