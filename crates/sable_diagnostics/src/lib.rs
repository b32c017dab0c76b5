//! sable_diagnostics: Diagnostic messages and error reporting infrastructure.
//!
//! The scanner, lexer and parser never print. They hand every problem to a
//! [`DiagnosticSink`], which in tests is usually a [`DiagnosticCollection`]
//! and in the command-line driver is rendered with [`render`].

mod render;

pub use render::{render, Renderer};

use sable_core::text::{SourceFile, SourceSpan};
use std::fmt;

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Warning => write!(f, "WARNING"),
            Severity::Info => write!(f, "INFO"),
        }
    }
}

/// A diagnostic message template with a code and severity.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    /// Stable numeric code. 1xxx are lexical, 2xxx are syntactic.
    pub code: u32,
    pub severity: Severity,
    /// The message template. May contain `{0}`, `{1}`, etc. placeholders.
    pub message: &'static str,
}

/// A realized diagnostic with its location and resolved message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic<'src> {
    pub severity: Severity,
    pub code: u32,
    pub span: SourceSpan<'src>,
    pub message: String,
    pub hint: Option<String>,
}

impl<'src> Diagnostic<'src> {
    pub fn new(span: SourceSpan<'src>, message: &DiagnosticMessage, args: &[&str]) -> Self {
        Self {
            severity: message.severity,
            code: message.code,
            span,
            message: format_message(message.message, args),
            hint: None,
        }
    }

    /// Attach a hint line shown under the source excerpt.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    #[inline]
    pub fn file(&self) -> &'src SourceFile {
        self.span.file()
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line()
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.span.column()
    }

    #[inline]
    pub fn highlight_len(&self) -> u32 {
        self.span.len
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

impl fmt::Display for Diagnostic<'_> {
    /// The single-line header form: `path:line:col - SEVERITY message`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {} {}", self.span.start, self.severity, self.message)
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// The one capability the front end writes through.
pub trait DiagnosticSink<'src> {
    fn report(&mut self, diagnostic: Diagnostic<'src>);
}

impl<'src, S: DiagnosticSink<'src> + ?Sized> DiagnosticSink<'src> for &mut S {
    fn report(&mut self, diagnostic: Diagnostic<'src>) {
        (**self).report(diagnostic);
    }
}

/// A collection of diagnostics accumulated during one front-end run.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection<'src> {
    diagnostics: Vec<Diagnostic<'src>>,
}

impl<'src> DiagnosticCollection<'src> {
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    pub fn add(&mut self, diagnostic: Diagnostic<'src>) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    /// Number of diagnostics carrying the given code.
    pub fn count_code(&self, code: u32) -> usize {
        self.diagnostics.iter().filter(|d| d.code == code).count()
    }

    pub fn diagnostics(&self) -> &[Diagnostic<'src>] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic<'src>> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn clear(&mut self) {
        self.diagnostics.clear();
    }

    /// Sort diagnostics by line and column, keeping report order for ties.
    pub fn sort(&mut self) {
        self.diagnostics
            .sort_by_key(|d| (d.span.start.line, d.span.start.column));
    }
}

impl<'src> DiagnosticSink<'src> for DiagnosticCollection<'src> {
    fn report(&mut self, diagnostic: Diagnostic<'src>) {
        self.add(diagnostic);
    }
}

// ============================================================================
// Diagnostic Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:expr, $severity:ident, $msg:expr) => {
            DiagnosticMessage { code: $code, severity: Severity::$severity, message: $msg }
        };
    }

    // ========================================================================
    // Lexical errors (1000-1099)
    // ========================================================================
    pub const INVALID_CHARACTER_OUTSIDE_STRING: DiagnosticMessage = diag!(1001, Error, "invalid character '{0}' outside string literal");
    pub const UNEXPECTED_CHARACTER: DiagnosticMessage = diag!(1002, Error, "unexpected character '{0}'");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(1003, Error, "unterminated string literal");

    // ========================================================================
    // Syntax errors (2000-2099)
    // ========================================================================
    pub const EXPECTED_EXPRESSION: DiagnosticMessage = diag!(2001, Error, "expected expression, found {0}");
    pub const EXPECTED_CLOSING_DELIMITER: DiagnosticMessage = diag!(2002, Error, "expected '{0}', found {1}");
    pub const UNCLOSED_DELIMITER: DiagnosticMessage = diag!(2003, Info, "unclosed '{0}' opened here");
    pub const EXPECTED_SELECTOR: DiagnosticMessage = diag!(2004, Error, "expected field name or one of '*', '&', '?', '!' after '.', found {0}");
    pub const INTEGER_LITERAL_TOO_LARGE: DiagnosticMessage = diag!(2005, Error, "integer literal '{0}' does not fit in 64 bits");
    pub const NESTED_TOO_DEEPLY: DiagnosticMessage = diag!(2006, Error, "expression nested too deeply (limit is {0})");
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::text::SourceFile;

    #[test]
    fn test_format_message() {
        let msg = format_message("expected '{0}', found {1}", &[")", "end of input"]);
        assert_eq!(msg, "expected ')', found end of input");
    }

    #[test]
    fn test_diagnostic_display_header() {
        let file = SourceFile::new("main.sb", "\"abc");
        let diag = Diagnostic::new(
            file.location(1, 1).span(4),
            &messages::UNTERMINATED_STRING_LITERAL,
            &[],
        );
        assert_eq!(diag.to_string(), "main.sb:1:1 - ERROR unterminated string literal");
        assert_eq!(diag.code, 1003);
        assert_eq!(diag.highlight_len(), 4);
        assert!(diag.is_error());
    }

    #[test]
    fn test_collection_is_a_sink() {
        let file = SourceFile::new("main.sb", "(1");
        let mut collection = DiagnosticCollection::new();
        assert!(collection.is_empty());

        let sink: &mut dyn DiagnosticSink<'_> = &mut collection;
        sink.report(Diagnostic::new(
            file.location(1, 3).span(1),
            &messages::EXPECTED_CLOSING_DELIMITER,
            &[")", "end of input"],
        ));
        sink.report(Diagnostic::new(
            file.location(1, 1).span(1),
            &messages::UNCLOSED_DELIMITER,
            &["("],
        ));

        assert_eq!(collection.len(), 2);
        assert_eq!(collection.error_count(), 1);
        assert!(collection.has_errors());
        assert_eq!(collection.count_code(2003), 1);
    }

    #[test]
    fn test_collection_sort() {
        let file = SourceFile::new("main.sb", "a\nb");
        let mut collection = DiagnosticCollection::new();
        collection.add(Diagnostic::new(file.location(2, 1).span(1), &messages::UNEXPECTED_CHARACTER, &["b"]));
        collection.add(Diagnostic::new(file.location(1, 1).span(1), &messages::UNEXPECTED_CHARACTER, &["a"]));
        collection.sort();
        assert_eq!(collection.diagnostics()[0].line(), 1);
        assert_eq!(collection.diagnostics()[1].line(), 2);
    }

    #[test]
    fn test_with_hint() {
        let file = SourceFile::new("main.sb", "x");
        let diag = Diagnostic::new(file.location(1, 1).span(1), &messages::UNEXPECTED_CHARACTER, &["x"])
            .with_hint("remove it");
        assert_eq!(diag.hint.as_deref(), Some("remove it"));
    }
}
