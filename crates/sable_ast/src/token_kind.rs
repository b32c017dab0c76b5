//! TokenKind enum - every lexical category the lexer can produce.

use std::fmt;

/// The kind of a lexical token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    /// A character no rule matched, or an unterminated string.
    Invalid,

    // Literals and names
    Identifier,
    NumericLiteral,
    StringLiteral,

    // Punctuation
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    OpenBraceToken,
    CloseBraceToken,
    CommaToken,
    DotToken,
    DotDotToken,
    ColonToken,
    SemicolonToken,
    QuestionToken,

    // Operators
    PlusToken,
    PlusPlusToken,
    MinusToken,
    MinusGreaterThanToken,
    AsteriskToken,
    AsteriskAsteriskToken,
    SlashToken,
    PercentToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    TildeToken,
    ExclamationToken,
    ExclamationEqualsToken,
    EqualsToken,
    EqualsEqualsToken,
    LessThanToken,
    LessThanEqualsToken,
    LessThanLessThanToken,
    GreaterThanToken,
    GreaterThanEqualsToken,
    GreaterThanGreaterThanToken,

    // Keywords
    StructKeyword,
    FnKeyword,
    OwnKeyword,
    ForKeyword,
    WhileKeyword,
    IfKeyword,
    InKeyword,
    AndKeyword,
    OrKeyword,
    ElseKeyword,
    BreakKeyword,
    ContinueKeyword,
    ReturnKeyword,
    LetKeyword,
    MutKeyword,
    EnumKeyword,
    UnionKeyword,
    TraitKeyword,
    TrueKeyword,
    FalseKeyword,
}

/// Every keyword spelling, in declaration order.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("struct", TokenKind::StructKeyword),
    ("fn", TokenKind::FnKeyword),
    ("own", TokenKind::OwnKeyword),
    ("for", TokenKind::ForKeyword),
    ("while", TokenKind::WhileKeyword),
    ("if", TokenKind::IfKeyword),
    ("in", TokenKind::InKeyword),
    ("and", TokenKind::AndKeyword),
    ("or", TokenKind::OrKeyword),
    ("else", TokenKind::ElseKeyword),
    ("break", TokenKind::BreakKeyword),
    ("continue", TokenKind::ContinueKeyword),
    ("return", TokenKind::ReturnKeyword),
    ("let", TokenKind::LetKeyword),
    ("mut", TokenKind::MutKeyword),
    ("enum", TokenKind::EnumKeyword),
    ("union", TokenKind::UnionKeyword),
    ("trait", TokenKind::TraitKeyword),
    ("true", TokenKind::TrueKeyword),
    ("false", TokenKind::FalseKeyword),
];

impl TokenKind {
    /// Map an identifier-shaped word to its keyword kind. Only exact,
    /// full-text matches count.
    pub fn from_keyword(text: &str) -> Option<TokenKind> {
        match text {
            "struct" => Some(TokenKind::StructKeyword),
            "fn" => Some(TokenKind::FnKeyword),
            "own" => Some(TokenKind::OwnKeyword),
            "for" => Some(TokenKind::ForKeyword),
            "while" => Some(TokenKind::WhileKeyword),
            "if" => Some(TokenKind::IfKeyword),
            "in" => Some(TokenKind::InKeyword),
            "and" => Some(TokenKind::AndKeyword),
            "or" => Some(TokenKind::OrKeyword),
            "else" => Some(TokenKind::ElseKeyword),
            "break" => Some(TokenKind::BreakKeyword),
            "continue" => Some(TokenKind::ContinueKeyword),
            "return" => Some(TokenKind::ReturnKeyword),
            "let" => Some(TokenKind::LetKeyword),
            "mut" => Some(TokenKind::MutKeyword),
            "enum" => Some(TokenKind::EnumKeyword),
            "union" => Some(TokenKind::UnionKeyword),
            "trait" => Some(TokenKind::TraitKeyword),
            "true" => Some(TokenKind::TrueKeyword),
            "false" => Some(TokenKind::FalseKeyword),
            _ => None,
        }
    }

    pub fn is_keyword(self) -> bool {
        self >= TokenKind::StructKeyword
    }

    /// The fixed spelling of punctuation, operators and keywords.
    pub fn text(self) -> Option<&'static str> {
        let text = match self {
            TokenKind::Invalid
            | TokenKind::Identifier
            | TokenKind::NumericLiteral
            | TokenKind::StringLiteral => return None,
            TokenKind::OpenParenToken => "(",
            TokenKind::CloseParenToken => ")",
            TokenKind::OpenBracketToken => "[",
            TokenKind::CloseBracketToken => "]",
            TokenKind::OpenBraceToken => "{",
            TokenKind::CloseBraceToken => "}",
            TokenKind::CommaToken => ",",
            TokenKind::DotToken => ".",
            TokenKind::DotDotToken => "..",
            TokenKind::ColonToken => ":",
            TokenKind::SemicolonToken => ";",
            TokenKind::QuestionToken => "?",
            TokenKind::PlusToken => "+",
            TokenKind::PlusPlusToken => "++",
            TokenKind::MinusToken => "-",
            TokenKind::MinusGreaterThanToken => "->",
            TokenKind::AsteriskToken => "*",
            TokenKind::AsteriskAsteriskToken => "**",
            TokenKind::SlashToken => "/",
            TokenKind::PercentToken => "%",
            TokenKind::AmpersandToken => "&",
            TokenKind::BarToken => "|",
            TokenKind::CaretToken => "^",
            TokenKind::TildeToken => "~",
            TokenKind::ExclamationToken => "!",
            TokenKind::ExclamationEqualsToken => "!=",
            TokenKind::EqualsToken => "=",
            TokenKind::EqualsEqualsToken => "==",
            TokenKind::LessThanToken => "<",
            TokenKind::LessThanEqualsToken => "<=",
            TokenKind::LessThanLessThanToken => "<<",
            TokenKind::GreaterThanToken => ">",
            TokenKind::GreaterThanEqualsToken => ">=",
            TokenKind::GreaterThanGreaterThanToken => ">>",
            keyword => return KEYWORDS.iter().find(|(_, k)| *k == keyword).map(|(s, _)| *s),
        };
        Some(text)
    }
}

impl fmt::Display for TokenKind {
    /// How the kind reads inside a diagnostic, e.g. `'('` or `identifier`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Invalid => write!(f, "invalid token"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::NumericLiteral => write!(f, "number"),
            TokenKind::StringLiteral => write!(f, "string literal"),
            other => match other.text() {
                Some(text) if other.is_keyword() => write!(f, "keyword '{text}'"),
                Some(text) => write!(f, "'{text}'"),
                None => write!(f, "{other:?}"),
            },
        }
    }
}
