//! The lexer: turns the scanner's codepoints into [`Token`]s.
//!
//! Outside string literals the grammar is ASCII-only. Problems are reported
//! through the diagnostic sink and surface as [`TokenKind::Invalid`] tokens;
//! the token sequence itself never stops early.

use sable_ast::TokenKind;
use sable_core::text::{SourceFile, SourceLocation};
use sable_diagnostics::{messages, Diagnostic, DiagnosticSink};
use unicode_xid::UnicodeXID;

use crate::char_codes::*;
use crate::scanner::Scanner;
use crate::token::Token;

/// Forward-only token stream over one [`SourceFile`].
///
/// A lexer cannot be rewound. Create a new one to scan the file again.
pub struct Lexer<'src, 'd> {
    scanner: Scanner<'src>,
    sink: &'d mut dyn DiagnosticSink<'src>,
    /// Scratch buffer for token text.
    buffer: String,
}

impl<'src, 'd> Lexer<'src, 'd> {
    pub fn new(file: &'src SourceFile, sink: &'d mut dyn DiagnosticSink<'src>) -> Self {
        Self {
            scanner: Scanner::new(file),
            sink,
            buffer: String::new(),
        }
    }

    #[inline]
    pub fn file(&self) -> &'src SourceFile {
        self.scanner.file()
    }

    /// Position of the next unconsumed codepoint. Once the input is
    /// exhausted this is the end of input.
    #[inline]
    pub fn location(&self) -> SourceLocation<'src> {
        self.scanner.location()
    }

    /// Forward a diagnostic to the sink this lexer reports into.
    pub fn report(&mut self, diagnostic: Diagnostic<'src>) {
        self.sink.report(diagnostic);
    }

    /// Produce the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Option<Token<'src>> {
        self.skip_trivia();
        let start = self.scanner.location();
        let ch = self.scanner.peek()?;

        let token = if ch.is_ascii() {
            self.scan_token(ch, start)
        } else {
            self.scan_non_ascii(ch, start)
        };
        tracing::trace!(kind = ?token.kind, line = start.line, column = start.column, "token");
        Some(token)
    }

    /// Skip whitespace and `//` comments. A run of comment lines separated
    /// only by whitespace is skipped in one pass.
    fn skip_trivia(&mut self) {
        loop {
            match self.scanner.peek() {
                Some(ch) if is_white_space(ch) => {
                    self.scanner.consume();
                }
                Some(SLASH) if self.scanner.peek_second() == Some(SLASH) => {
                    self.scanner.skip_line();
                }
                _ => break,
            }
        }
    }

    // ========================================================================
    // Dispatch
    // ========================================================================

    fn scan_token(&mut self, ch: char, start: SourceLocation<'src>) -> Token<'src> {
        self.scanner.consume();
        let kind = match ch {
            '(' => TokenKind::OpenParenToken,
            ')' => TokenKind::CloseParenToken,
            '[' => TokenKind::OpenBracketToken,
            ']' => TokenKind::CloseBracketToken,
            '{' => TokenKind::OpenBraceToken,
            '}' => TokenKind::CloseBraceToken,
            ',' => TokenKind::CommaToken,
            ':' => TokenKind::ColonToken,
            ';' => TokenKind::SemicolonToken,
            '?' => TokenKind::QuestionToken,
            '~' => TokenKind::TildeToken,
            '%' => TokenKind::PercentToken,
            '&' => TokenKind::AmpersandToken,
            '|' => TokenKind::BarToken,
            '^' => TokenKind::CaretToken,
            '/' => TokenKind::SlashToken,

            '.' => self.scan_pair('.', TokenKind::DotDotToken, TokenKind::DotToken),
            '+' => self.scan_pair('+', TokenKind::PlusPlusToken, TokenKind::PlusToken),
            '*' => self.scan_pair('*', TokenKind::AsteriskAsteriskToken, TokenKind::AsteriskToken),
            '-' => self.scan_pair('>', TokenKind::MinusGreaterThanToken, TokenKind::MinusToken),
            '=' => self.scan_pair('=', TokenKind::EqualsEqualsToken, TokenKind::EqualsToken),
            '!' => self.scan_pair('=', TokenKind::ExclamationEqualsToken, TokenKind::ExclamationToken),
            '<' => self.scan_less_than(),
            '>' => self.scan_greater_than(),

            DOUBLE_QUOTE => return self.scan_string(start),
            _ if is_digit(ch) => return self.scan_number(ch, start),
            _ if is_identifier_start(ch) => return self.scan_identifier(ch, start),

            _ => {
                let text = ch.to_string();
                self.report(Diagnostic::new(
                    start.span(1),
                    &messages::UNEXPECTED_CHARACTER,
                    &[text.escape_default().to_string().as_str()],
                ));
                return Token::new(TokenKind::Invalid, start, 1).with_text(text);
            }
        };
        let width = kind.text().map_or(1, |text| text.len() as u32);
        Token::new(kind, start, width)
    }

    /// Maximal munch for the two-character operators. The first character
    /// has already been consumed.
    #[inline]
    fn scan_pair(&mut self, second: char, pair: TokenKind, single: TokenKind) -> TokenKind {
        if self.scanner.eat(second) {
            pair
        } else {
            single
        }
    }

    fn scan_less_than(&mut self) -> TokenKind {
        if self.scanner.eat('=') {
            TokenKind::LessThanEqualsToken
        } else if self.scanner.eat('<') {
            TokenKind::LessThanLessThanToken
        } else {
            TokenKind::LessThanToken
        }
    }

    fn scan_greater_than(&mut self) -> TokenKind {
        if self.scanner.eat('=') {
            TokenKind::GreaterThanEqualsToken
        } else if self.scanner.eat('>') {
            TokenKind::GreaterThanGreaterThanToken
        } else {
            TokenKind::GreaterThanToken
        }
    }

    // ========================================================================
    // Literals and names
    // ========================================================================

    /// The opening quote has already been consumed. A string ends at the
    /// next `"` on the same line.
    fn scan_string(&mut self, start: SourceLocation<'src>) -> Token<'src> {
        self.buffer.clear();
        let mut width = 1;
        loop {
            match self.scanner.peek() {
                Some(DOUBLE_QUOTE) => {
                    self.scanner.consume();
                    width += 1;
                    return Token::new(TokenKind::StringLiteral, start, width)
                        .with_text(self.buffer.clone());
                }
                Some(ch) if !is_line_break(ch) => {
                    self.scanner.consume();
                    self.buffer.push(ch);
                    width += 1;
                }
                _ => break,
            }
        }

        self.report(
            Diagnostic::new(start.span(width), &messages::UNTERMINATED_STRING_LITERAL, &[])
                .with_hint("add a closing '\"' before the end of the line"),
        );
        Token::new(TokenKind::Invalid, start, width).with_text(self.buffer.clone())
    }

    /// Digits are kept as text; the parser decides what they mean.
    fn scan_number(&mut self, first: char, start: SourceLocation<'src>) -> Token<'src> {
        self.buffer.clear();
        self.buffer.push(first);
        while let Some(ch) = self.scanner.peek().filter(|&c| is_digit(c)) {
            self.scanner.consume();
            self.buffer.push(ch);
        }
        Token::new(TokenKind::NumericLiteral, start, self.buffer.len() as u32)
            .with_text(self.buffer.clone())
    }

    fn scan_identifier(&mut self, first: char, start: SourceLocation<'src>) -> Token<'src> {
        self.buffer.clear();
        self.buffer.push(first);
        while let Some(ch) = self.scanner.peek().filter(|&c| is_identifier_part(c)) {
            self.scanner.consume();
            self.buffer.push(ch);
        }
        let width = self.buffer.len() as u32;
        match TokenKind::from_keyword(&self.buffer) {
            Some(keyword) => Token::new(keyword, start, width),
            None => Token::new(TokenKind::Identifier, start, width).with_text(self.buffer.clone()),
        }
    }

    fn scan_non_ascii(&mut self, ch: char, start: SourceLocation<'src>) -> Token<'src> {
        self.scanner.consume();
        let text = ch.to_string();
        let mut diagnostic = Diagnostic::new(
            start.span(1),
            &messages::INVALID_CHARACTER_OUTSIDE_STRING,
            &[text.as_str()],
        );
        if ch.is_xid_start() {
            diagnostic = diagnostic.with_hint("identifiers must be ASCII");
        }
        self.report(diagnostic);
        Token::new(TokenKind::Invalid, start, 1).with_text(text)
    }
}

impl<'src> Iterator for Lexer<'src, '_> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Token<'src>> {
        self.next_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_diagnostics::DiagnosticCollection;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let file = SourceFile::new("t.sb", source);
        let mut diagnostics = DiagnosticCollection::new();
        let kinds = Lexer::new(&file, &mut diagnostics).map(|t| t.kind).collect();
        kinds
    }

    #[test]
    fn test_maximal_munch() {
        assert_eq!(
            kinds("== != >= <= -> ++ ** .. << >>"),
            [
                TokenKind::EqualsEqualsToken,
                TokenKind::ExclamationEqualsToken,
                TokenKind::GreaterThanEqualsToken,
                TokenKind::LessThanEqualsToken,
                TokenKind::MinusGreaterThanToken,
                TokenKind::PlusPlusToken,
                TokenKind::AsteriskAsteriskToken,
                TokenKind::DotDotToken,
                TokenKind::LessThanLessThanToken,
                TokenKind::GreaterThanGreaterThanToken,
            ]
        );
    }

    #[test]
    fn test_single_character_fallback() {
        assert_eq!(
            kinds("= ! > < - + * . /"),
            [
                TokenKind::EqualsToken,
                TokenKind::ExclamationToken,
                TokenKind::GreaterThanToken,
                TokenKind::LessThanToken,
                TokenKind::MinusToken,
                TokenKind::PlusToken,
                TokenKind::AsteriskToken,
                TokenKind::DotToken,
                TokenKind::SlashToken,
            ]
        );
    }

    #[test]
    fn test_three_char_runs_split_greedily() {
        assert_eq!(kinds("==="), [TokenKind::EqualsEqualsToken, TokenKind::EqualsToken]);
        assert_eq!(kinds("..."), [TokenKind::DotDotToken, TokenKind::DotToken]);
    }

    #[test]
    fn test_trailing_slash_is_not_a_comment() {
        assert_eq!(kinds("a /"), [TokenKind::Identifier, TokenKind::SlashToken]);
    }

    #[test]
    fn test_widths() {
        let file = SourceFile::new("t.sb", "while \"ab\" 123 >=");
        let mut diagnostics = DiagnosticCollection::new();
        let widths: Vec<u32> = Lexer::new(&file, &mut diagnostics).map(|t| t.width).collect();
        assert_eq!(widths, [5, 4, 3, 2]);
    }
}
