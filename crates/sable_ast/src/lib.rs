//! sable_ast: token kinds, the dense node arena and the expression tree.
//!
//! Nodes never point at each other. Every reference is a [`Handle`] into the
//! [`AstArena`], a [`DenseList`] that stores each variant in a byte buffer
//! shared only with variants of the same payload size.

pub mod ast;
pub mod dense;
pub mod node;
pub mod token_kind;
pub mod visitor;

// Re-export key types
pub use ast::{Ast, AstArena};
pub use dense::{DenseList, Handle, LayoutError, MemoryFootprint, TaggedUnion};
pub use node::*;
pub use token_kind::TokenKind;
