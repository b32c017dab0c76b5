//! Expression node payloads and the [`AstItem`] union stored in the arena.
//!
//! Every payload is a small `Copy` struct. Children are [`Handle`]s into the
//! same arena, names and string text are interned [`Symbol`]s, and call
//! arguments are a [`HandleRange`] into the tree's side list of handles.

use std::fmt;

use sable_core::intern::Symbol;

use crate::dense::{ByteReader, ByteWriter, Handle, Payload};
use crate::dense_union;

// ============================================================================
// Operators
// ============================================================================

/// Binary operators, grouped by the tier that parses them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum BinaryOp {
    Or,
    And,
    Equal,
    NotEqual,
    Less,
    LessEqual,
    Greater,
    GreaterEqual,
    BitOr,
    BitXor,
    BitAnd,
    ShiftLeft,
    ShiftRight,
    Add,
    Sub,
    Concat,
    Mul,
    Div,
    Mod,
    Repeat,
}

impl BinaryOp {
    const ALL: [BinaryOp; 20] = [
        BinaryOp::Or,
        BinaryOp::And,
        BinaryOp::Equal,
        BinaryOp::NotEqual,
        BinaryOp::Less,
        BinaryOp::LessEqual,
        BinaryOp::Greater,
        BinaryOp::GreaterEqual,
        BinaryOp::BitOr,
        BinaryOp::BitXor,
        BinaryOp::BitAnd,
        BinaryOp::ShiftLeft,
        BinaryOp::ShiftRight,
        BinaryOp::Add,
        BinaryOp::Sub,
        BinaryOp::Concat,
        BinaryOp::Mul,
        BinaryOp::Div,
        BinaryOp::Mod,
        BinaryOp::Repeat,
    ];

    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinaryOp::Or => "or",
            BinaryOp::And => "and",
            BinaryOp::Equal => "==",
            BinaryOp::NotEqual => "!=",
            BinaryOp::Less => "<",
            BinaryOp::LessEqual => "<=",
            BinaryOp::Greater => ">",
            BinaryOp::GreaterEqual => ">=",
            BinaryOp::BitOr => "|",
            BinaryOp::BitXor => "^",
            BinaryOp::BitAnd => "&",
            BinaryOp::ShiftLeft => "<<",
            BinaryOp::ShiftRight => ">>",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Concat => "++",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Mod => "%",
            BinaryOp::Repeat => "**",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum UnaryOp {
    /// `!`, the logical-not tier.
    Not,
    /// `-`
    Negate,
    /// `~`
    BitNot,
}

impl UnaryOp {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(UnaryOp::Not),
            1 => Some(UnaryOp::Negate),
            2 => Some(UnaryOp::BitNot),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            UnaryOp::Not => "!",
            UnaryOp::Negate => "-",
            UnaryOp::BitNot => "~",
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `.`-selectors that are not field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PrimitiveKind {
    /// `.*`
    Deref,
    /// `.&`
    AddressOf,
    /// `.?`
    CheckedUnwrap,
    /// `.!`
    UncheckedUnwrap,
}

impl PrimitiveKind {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(PrimitiveKind::Deref),
            1 => Some(PrimitiveKind::AddressOf),
            2 => Some(PrimitiveKind::CheckedUnwrap),
            3 => Some(PrimitiveKind::UncheckedUnwrap),
            _ => None,
        }
    }

    pub fn selector(self) -> &'static str {
        match self {
            PrimitiveKind::Deref => "*",
            PrimitiveKind::AddressOf => "&",
            PrimitiveKind::CheckedUnwrap => "?",
            PrimitiveKind::UncheckedUnwrap => "!",
        }
    }
}

fn decode_enum<T>(value: u8, from_u8: fn(u8) -> Option<T>, what: &str) -> T {
    match from_u8(value) {
        Some(op) => op,
        None => panic!("corrupt {what} {value} in payload"),
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// A contiguous run of handles in the tree's side list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct HandleRange {
    pub start: u32,
    pub len: u32,
}

impl HandleRange {
    pub const EMPTY: HandleRange = HandleRange { start: 0, len: 0 };

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_range(&self) -> std::ops::Range<usize> {
        self.start as usize..(self.start + self.len) as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoolLiteral {
    pub value: bool,
}

impl Payload for BoolLiteral {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.bool(self.value);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self { value: input.bool() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntLiteral {
    pub value: u64,
}

impl Payload for IntLiteral {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.u64(self.value);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self { value: input.u64() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringLiteral {
    /// Text between the quotes.
    pub text: Symbol,
}

impl Payload for StringLiteral {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.symbol(self.text);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self { text: input.symbol() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identifier {
    pub name: Symbol,
}

impl Payload for Identifier {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.symbol(self.name);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self { name: input.symbol() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Handle,
    pub rhs: Handle,
}

impl Payload for BinaryExpr {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.u8(self.op as u8);
        out.handle(self.lhs);
        out.handle(self.rhs);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            op: decode_enum(input.u8(), BinaryOp::from_u8, "binary operator"),
            lhs: input.handle(),
            rhs: input.handle(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Handle,
}

impl Payload for UnaryExpr {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.u8(self.op as u8);
        out.handle(self.operand);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            op: decode_enum(input.u8(), UnaryOp::from_u8, "unary operator"),
            operand: input.handle(),
        }
    }
}

/// `target[index]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArrayAccess {
    pub target: Handle,
    pub index: Handle,
}

impl Payload for ArrayAccess {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.handle(self.target);
        out.handle(self.index);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            target: input.handle(),
            index: input.handle(),
        }
    }
}

/// `callee(args...)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FunctionCall {
    pub callee: Handle,
    pub args: HandleRange,
}

impl Payload for FunctionCall {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.handle(self.callee);
        out.u32(self.args.start);
        out.u32(self.args.len);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            callee: input.handle(),
            args: HandleRange {
                start: input.u32(),
                len: input.u32(),
            },
        }
    }
}

/// `target.*`, `target.&`, `target.?` or `target.!`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrimitiveAccess {
    pub kind: PrimitiveKind,
    pub target: Handle,
}

impl Payload for PrimitiveAccess {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.u8(self.kind as u8);
        out.handle(self.target);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            kind: decode_enum(input.u8(), PrimitiveKind::from_u8, "primitive selector"),
            target: input.handle(),
        }
    }
}

/// `target.field`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldAccess {
    pub target: Handle,
    pub field: Symbol,
}

impl Payload for FieldAccess {
    fn encode(&self, out: &mut ByteWriter<'_>) {
        out.handle(self.target);
        out.symbol(self.field);
    }

    fn decode(input: &mut ByteReader<'_>) -> Self {
        Self {
            target: input.handle(),
            field: input.symbol(),
        }
    }
}

dense_union! {
    /// One expression node as stored in the arena.
    pub enum AstItem / AstTag {
        Bool(BoolLiteral) = 0,
        Int(IntLiteral) = 1,
        Str(StringLiteral) = 2,
        Identifier(Identifier) = 3,
        Binary(BinaryExpr) = 4,
        Unary(UnaryExpr) = 5,
        ArrayAccess(ArrayAccess) = 6,
        Call(FunctionCall) = 7,
        Primitive(PrimitiveAccess) = 8,
        Field(FieldAccess) = 9,
    }
}

impl AstItem {
    /// Child handles in source order. Call arguments live in the side list
    /// and are not included; see [`FunctionCall::args`].
    pub fn direct_children(&self) -> impl Iterator<Item = Handle> {
        let (a, b) = match *self {
            AstItem::Bool(_) | AstItem::Int(_) | AstItem::Str(_) | AstItem::Identifier(_) => {
                (None, None)
            }
            AstItem::Binary(n) => (Some(n.lhs), Some(n.rhs)),
            AstItem::Unary(n) => (Some(n.operand), None),
            AstItem::ArrayAccess(n) => (Some(n.target), Some(n.index)),
            AstItem::Call(n) => (Some(n.callee), None),
            AstItem::Primitive(n) => (Some(n.target), None),
            AstItem::Field(n) => (Some(n.target), None),
        };
        a.into_iter().chain(b)
    }
}
