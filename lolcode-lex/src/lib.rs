//! Lexical analysis for LOLCODE source text.

pub mod cursor;
pub mod keywords;
pub mod lexer;
pub mod token;

pub use lexer::Lexer;
pub use token::{Token, TokenKind};
