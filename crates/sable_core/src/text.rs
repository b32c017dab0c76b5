//! Source files and the location types derived from them.
//!
//! A [`SourceFile`] owns the full text of one compiland together with the
//! byte offset of every line start. Tokens, AST nodes and diagnostics refer
//! back into it through [`SourceLocation`] and [`SourceSpan`], which borrow the
//! file instead of copying its name around.

use std::fmt;

use thiserror::Error;

/// A byte offset into source text.
pub type TextPos = u32;

/// Errors raised while building or querying a [`SourceFile`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    #[error("{name} is not valid UTF-8 (first invalid byte at offset {offset})")]
    InvalidUtf8 { name: String, offset: usize },

    #[error("line {line} is out of range (file has {line_count} lines)")]
    LineOutOfRange { line: u32, line_count: u32 },
}

/// Immutable source text plus its line table.
///
/// Line `i` (0-based internally) spans `line_starts[i]..line_starts[i + 1]`,
/// and the last line runs to the end of the content. A new line starts at
/// byte 0 and immediately after every `'\n'`, so `"a\n"` has two lines, the
/// second one empty.
pub struct SourceFile {
    name: String,
    content: String,
    line_starts: Vec<TextPos>,
}

impl SourceFile {
    /// Build a source file from already-decoded text.
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        let content = content.into();
        let line_starts = compute_line_starts(&content);
        Self {
            name: name.into(),
            content,
            line_starts,
        }
    }

    /// Build a source file from raw bytes, rejecting invalid UTF-8.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, SourceError> {
        let name = name.into();
        if let Err(err) = simdutf8::compat::from_utf8(&bytes) {
            return Err(SourceError::InvalidUtf8 {
                name,
                offset: err.valid_up_to(),
            });
        }
        // SAFETY: the whole buffer was validated as UTF-8 just above.
        let content = unsafe { String::from_utf8_unchecked(bytes) };
        Ok(Self::new(name, content))
    }

    /// The name the file was loaded under (usually its path).
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text.
    #[inline]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Number of recorded lines. Always at least one.
    #[inline]
    pub fn line_count(&self) -> u32 {
        self.line_starts.len() as u32
    }

    /// Byte offsets of every line start, ascending, beginning with 0.
    pub fn line_starts(&self) -> &[TextPos] {
        &self.line_starts
    }

    /// Text of the 1-based line `line`, including its trailing newline
    /// (the final line may lack one).
    pub fn get_line(&self, line: u32) -> Result<&str, SourceError> {
        if line == 0 || line > self.line_count() {
            return Err(SourceError::LineOutOfRange {
                line,
                line_count: self.line_count(),
            });
        }
        let index = (line - 1) as usize;
        let start = self.line_starts[index] as usize;
        let end = self
            .line_starts
            .get(index + 1)
            .map_or(self.content.len(), |&next| next as usize);
        Ok(&self.content[start..end])
    }

    /// Location of the first column of a 1-based line.
    pub fn location(&self, line: u32, column: u32) -> SourceLocation<'_> {
        SourceLocation {
            file: self,
            line,
            column,
        }
    }
}

impl fmt::Debug for SourceFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceFile")
            .field("name", &self.name)
            .field("len", &self.content.len())
            .field("lines", &self.line_starts.len())
            .finish()
    }
}

fn compute_line_starts(content: &str) -> Vec<TextPos> {
    let mut line_starts = vec![0];
    line_starts.extend(memchr::memchr_iter(b'\n', content.as_bytes()).map(|i| (i + 1) as TextPos));
    line_starts
}

/// A 1-based line/column position inside a [`SourceFile`].
///
/// Columns count Unicode codepoints, not bytes.
#[derive(Clone, Copy)]
pub struct SourceLocation<'src> {
    pub file: &'src SourceFile,
    pub line: u32,
    pub column: u32,
}

impl<'src> SourceLocation<'src> {
    pub fn new(file: &'src SourceFile, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// Extend this location into a span highlighting `len` columns.
    #[inline]
    pub fn span(self, len: u32) -> SourceSpan<'src> {
        SourceSpan { start: self, len }
    }
}

impl PartialEq for SourceLocation<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.file, other.file) && self.line == other.line && self.column == other.column
    }
}

impl Eq for SourceLocation<'_> {}

impl fmt::Debug for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.name(), self.line, self.column)
    }
}

impl fmt::Display for SourceLocation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.name(), self.line, self.column)
    }
}

/// A highlighted run of columns on one line.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct SourceSpan<'src> {
    pub start: SourceLocation<'src>,
    /// Number of columns to underline. Zero is rendered as a single caret.
    pub len: u32,
}

impl<'src> SourceSpan<'src> {
    #[inline]
    pub fn file(&self) -> &'src SourceFile {
        self.start.file
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.start.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.start.column
    }
}

impl fmt::Debug for SourceSpan<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}+{}", self.start, self.len)
    }
}
