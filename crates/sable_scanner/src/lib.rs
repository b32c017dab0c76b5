//! sable_scanner: Codepoint scanner and lexer for sable source code.
//!
//! The [`Scanner`] walks a [`SourceFile`](sable_core::text::SourceFile) as
//! Unicode codepoints with 1-based line and column tracking. The [`Lexer`]
//! groups those codepoints into [`Token`]s:
//! - Maximal-munch one- and two-character operators
//! - `//` line comments, skipped as trivia
//! - Decimal digit runs, kept as text
//! - Double-quoted single-line string literals
//! - ASCII identifiers and the keyword set

mod char_codes;
mod lexer;
mod scanner;
mod token;

pub use lexer::Lexer;
pub use scanner::Scanner;
pub use token::Token;
