//! Operator precedence tiers of the expression cascade.

use sable_ast::{BinaryOp, TokenKind};

/// Precedence tiers, ordered from loosest to tightest binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum OperatorPrecedence {
    LogicalOr = 0,
    LogicalAnd = 1,
    /// Prefix `!`.
    LogicalNot = 2,
    /// `== != < <= > >=`
    Comparison = 3,
    BitwiseOr = 4,
    BitwiseXor = 5,
    BitwiseAnd = 6,
    Shift = 7,
    Additive = 8,
    Multiplicative = 9,
    /// Prefix `-` and `~`.
    Unary = 10,
    /// `[ ]`, `( )` and `.` selectors.
    Postfix = 11,
}

impl OperatorPrecedence {
    pub const LOWEST: OperatorPrecedence = OperatorPrecedence::LogicalOr;

    /// The next tier up. `Postfix` is the tightest and maps to itself.
    pub fn tighter(self) -> OperatorPrecedence {
        match self {
            OperatorPrecedence::LogicalOr => OperatorPrecedence::LogicalAnd,
            OperatorPrecedence::LogicalAnd => OperatorPrecedence::LogicalNot,
            OperatorPrecedence::LogicalNot => OperatorPrecedence::Comparison,
            OperatorPrecedence::Comparison => OperatorPrecedence::BitwiseOr,
            OperatorPrecedence::BitwiseOr => OperatorPrecedence::BitwiseXor,
            OperatorPrecedence::BitwiseXor => OperatorPrecedence::BitwiseAnd,
            OperatorPrecedence::BitwiseAnd => OperatorPrecedence::Shift,
            OperatorPrecedence::Shift => OperatorPrecedence::Additive,
            OperatorPrecedence::Additive => OperatorPrecedence::Multiplicative,
            OperatorPrecedence::Multiplicative => OperatorPrecedence::Unary,
            OperatorPrecedence::Unary | OperatorPrecedence::Postfix => OperatorPrecedence::Postfix,
        }
    }
}

/// Get the binary operator and its tier for a given token kind.
pub fn get_binary_operator(kind: TokenKind) -> Option<(OperatorPrecedence, BinaryOp)> {
    let entry = match kind {
        TokenKind::OrKeyword => (OperatorPrecedence::LogicalOr, BinaryOp::Or),
        TokenKind::AndKeyword => (OperatorPrecedence::LogicalAnd, BinaryOp::And),
        TokenKind::EqualsEqualsToken => (OperatorPrecedence::Comparison, BinaryOp::Equal),
        TokenKind::ExclamationEqualsToken => (OperatorPrecedence::Comparison, BinaryOp::NotEqual),
        TokenKind::LessThanToken => (OperatorPrecedence::Comparison, BinaryOp::Less),
        TokenKind::LessThanEqualsToken => (OperatorPrecedence::Comparison, BinaryOp::LessEqual),
        TokenKind::GreaterThanToken => (OperatorPrecedence::Comparison, BinaryOp::Greater),
        TokenKind::GreaterThanEqualsToken => (OperatorPrecedence::Comparison, BinaryOp::GreaterEqual),
        TokenKind::BarToken => (OperatorPrecedence::BitwiseOr, BinaryOp::BitOr),
        TokenKind::CaretToken => (OperatorPrecedence::BitwiseXor, BinaryOp::BitXor),
        TokenKind::AmpersandToken => (OperatorPrecedence::BitwiseAnd, BinaryOp::BitAnd),
        TokenKind::LessThanLessThanToken => (OperatorPrecedence::Shift, BinaryOp::ShiftLeft),
        TokenKind::GreaterThanGreaterThanToken => (OperatorPrecedence::Shift, BinaryOp::ShiftRight),
        TokenKind::PlusToken => (OperatorPrecedence::Additive, BinaryOp::Add),
        TokenKind::MinusToken => (OperatorPrecedence::Additive, BinaryOp::Sub),
        TokenKind::PlusPlusToken => (OperatorPrecedence::Additive, BinaryOp::Concat),
        TokenKind::AsteriskToken => (OperatorPrecedence::Multiplicative, BinaryOp::Mul),
        TokenKind::SlashToken => (OperatorPrecedence::Multiplicative, BinaryOp::Div),
        TokenKind::PercentToken => (OperatorPrecedence::Multiplicative, BinaryOp::Mod),
        TokenKind::AsteriskAsteriskToken => (OperatorPrecedence::Multiplicative, BinaryOp::Repeat),
        _ => return None,
    };
    Some(entry)
}
