//! sable_core: Core utilities for the sable compiler front end.
//!
//! Provides source files with precomputed line tables, the location types
//! derived from them, and string interning used throughout the pipeline.

pub mod intern;
pub mod text;

// Re-export commonly used types
pub use intern::{StringInterner, Symbol};
pub use text::{SourceError, SourceFile, SourceLocation, SourceSpan, TextPos};
