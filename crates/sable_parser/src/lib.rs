//! sable_parser: Recursive descent parser for sable expressions.
//!
//! Parses the token stream from the lexer into an [`Ast`](sable_ast::Ast)
//! whose nodes live in a dense, size-bucketed arena.

mod error;
mod parser;
mod precedence;

pub use error::SyntaxError;
pub use parser::{
    parse, ParseOptions, Parser, DEFAULT_MAX_NESTING_DEPTH, MAX_NESTING_DEPTH_CEILING,
};
pub use precedence::{get_binary_operator, OperatorPrecedence};
