//! Token information produced by the lexer.

use std::fmt;

use sable_ast::TokenKind;
use sable_core::text::{SourceLocation, SourceSpan};

/// A classified, positioned lexical unit.
#[derive(Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// Line and column of the first codepoint.
    pub location: SourceLocation<'src>,
    /// Width in columns, quotes included for strings.
    pub width: u32,
    /// Identifier name, digits, string contents or the offending text of an
    /// invalid token. `None` for punctuation and keywords.
    pub text: Option<String>,
}

impl<'src> Token<'src> {
    pub fn new(kind: TokenKind, location: SourceLocation<'src>, width: u32) -> Self {
        Self {
            kind,
            location,
            width,
            text: None,
        }
    }

    pub fn with_text(mut self, text: String) -> Self {
        self.text = Some(text);
        self
    }

    /// The span a diagnostic about this token should underline.
    #[inline]
    pub fn span(&self) -> SourceSpan<'src> {
        self.location.span(self.width)
    }

    /// The payload text, or the fixed spelling of punctuation and keywords.
    pub fn text(&self) -> &str {
        match &self.text {
            Some(text) => text,
            None => self.kind.text().unwrap_or(""),
        }
    }

    /// How this token reads inside a diagnostic, e.g. `identifier 'x'`.
    pub fn describe(&self) -> String {
        match self.kind {
            TokenKind::Identifier | TokenKind::NumericLiteral | TokenKind::Invalid => {
                format!("{} '{}'", self.kind, self.text())
            }
            _ => self.kind.to_string(),
        }
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}@{}:{}", self.kind, self.location.line, self.location.column)?;
        if let Some(text) = &self.text {
            write!(f, "({text:?})")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_core::text::SourceFile;

    #[test]
    fn test_text_falls_back_to_spelling() {
        let file = SourceFile::new("t.sb", "or x");
        let keyword = Token::new(TokenKind::OrKeyword, file.location(1, 1), 2);
        assert_eq!(keyword.text(), "or");
        let ident = Token::new(TokenKind::Identifier, file.location(1, 4), 1).with_text("x".into());
        assert_eq!(ident.text(), "x");
        assert_eq!(ident.describe(), "identifier 'x'");
        assert_eq!(ident.span().len, 1);
    }
}
