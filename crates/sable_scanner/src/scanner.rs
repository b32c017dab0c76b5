//! Codepoint cursor over a [`SourceFile`].
//!
//! The scanner walks the file one line at a time. It never exposes raw bytes:
//! `peek` and `consume` deal in whole `char`s, and running off the end of a
//! line moves on to the next one without the caller noticing.

use sable_core::text::{SourceFile, SourceLocation};

/// Forward-only codepoint cursor with 1-based line and column tracking.
pub struct Scanner<'src> {
    file: &'src SourceFile,
    /// Unconsumed text of the current line, including its newline.
    rest: &'src str,
    line: u32,
    /// Column of the next codepoint.
    column: u32,
}

impl<'src> Scanner<'src> {
    pub fn new(file: &'src SourceFile) -> Self {
        let mut scanner = Self {
            file,
            rest: line_text(file, 1),
            line: 1,
            column: 1,
        };
        scanner.skip_exhausted_lines();
        scanner
    }

    #[inline]
    pub fn file(&self) -> &'src SourceFile {
        self.file
    }

    /// The next codepoint, without consuming it.
    #[inline]
    pub fn peek(&self) -> Option<char> {
        self.rest.chars().next()
    }

    /// The codepoint after [`peek`](Self::peek), if it is on the same line.
    /// Every line but the last ends in `'\n'`, so this only comes up empty
    /// after a newline or at the end of input.
    #[inline]
    pub fn peek_second(&self) -> Option<char> {
        let mut chars = self.rest.chars();
        chars.next();
        chars.next()
    }

    /// Consume and return the next codepoint.
    pub fn consume(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.rest = &self.rest[ch.len_utf8()..];
        self.column += 1;
        self.skip_exhausted_lines();
        Some(ch)
    }

    /// Consume the next codepoint if it equals `expected`.
    #[inline]
    pub fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.consume();
            true
        } else {
            false
        }
    }

    /// Drop whatever is left of the current line, newline included.
    pub fn skip_line(&mut self) {
        self.rest = "";
        self.skip_exhausted_lines();
    }

    /// Position of the next codepoint.
    #[inline]
    pub fn location(&self) -> SourceLocation<'src> {
        SourceLocation::new(self.file, self.line, self.column)
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.rest.is_empty()
    }

    fn skip_exhausted_lines(&mut self) {
        while self.rest.is_empty() && self.line < self.file.line_count() {
            self.line += 1;
            self.column = 1;
            self.rest = line_text(self.file, self.line);
        }
    }
}

impl Iterator for Scanner<'_> {
    type Item = char;

    fn next(&mut self) -> Option<char> {
        self.consume()
    }
}

fn line_text(file: &SourceFile, line: u32) -> &str {
    file.get_line(line).unwrap_or_default()
}
