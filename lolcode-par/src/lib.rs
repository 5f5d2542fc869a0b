//! The LOLCODE abstract syntax tree and its recursive-descent parser.

pub mod ast;
pub mod parser;

pub use ast::{Expr, Literal, Program, Stmt, TypeKeyword};
pub use parser::Parser;
