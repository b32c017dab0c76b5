//! The sable expression parser.
//!
//! One-token-lookahead recursive descent over the precedence cascade in
//! [`OperatorPrecedence`]. Nodes are appended to an [`Ast`] as soon as they
//! are complete, so children always precede their parents in the arena.
//!
//! Parsing is fail-fast: the first syntax error is reported to the sink and
//! unwinds to [`Parser::parse_program`]. There is no recovery.

use sable_ast::*;
use sable_core::text::{SourceFile, SourceSpan};
use sable_diagnostics::{messages, Diagnostic, DiagnosticMessage, DiagnosticSink};
use sable_scanner::{Lexer, Token};

use crate::error::SyntaxError;
use crate::precedence::{get_binary_operator, OperatorPrecedence};

/// Default limit on expression nesting, to prevent stack overflow on deeply
/// nested input.
pub const DEFAULT_MAX_NESTING_DEPTH: u32 = 200;

/// Largest nesting limit that is safe on a 2 MiB thread stack. Each level
/// costs a dozen frames of the tier cascade; configured limits are clamped
/// to this.
pub const MAX_NESTING_DEPTH_CEILING: u32 = 500;

/// Knobs for one parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub max_nesting_depth: u32,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

/// The parser builds an [`Ast`] from the tokens of one source file.
pub struct Parser<'src, 'd> {
    lexer: Lexer<'src, 'd>,
    /// The lookahead token. `None` once the input is exhausted.
    current: Option<Token<'src>>,
    ast: Ast<'src>,
    options: ParseOptions,
    /// Tracks nesting depth against `options.max_nesting_depth`.
    depth: u32,
}

impl<'src, 'd> Parser<'src, 'd> {
    pub fn new(
        file: &'src SourceFile,
        sink: &'d mut dyn DiagnosticSink<'src>,
        options: ParseOptions,
    ) -> Self {
        let mut lexer = Lexer::new(file, sink);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            ast: Ast::new(),
            options,
            depth: 0,
        }
    }

    /// Parse expressions until the input is exhausted, recording each one as
    /// a root. Stops at the first syntax error.
    pub fn parse_program(&mut self) -> Result<(), SyntaxError> {
        tracing::debug!(file = self.lexer.file().name(), "parse start");
        while self.current.is_some() {
            let root = self.parse_expression()?;
            self.ast.push_root(root);
        }
        tracing::debug!(
            roots = self.ast.roots().len(),
            nodes = self.ast.node_count(),
            "parse done"
        );
        Ok(())
    }

    /// The tree built so far. After a failed parse this still holds every
    /// node that was completed, but only the roots committed before the
    /// error.
    pub fn ast(&self) -> &Ast<'src> {
        &self.ast
    }

    pub fn into_ast(self) -> Ast<'src> {
        self.ast
    }

    // ========================================================================
    // Token management
    // ========================================================================

    #[inline]
    fn current_kind(&self) -> Option<TokenKind> {
        self.current.as_ref().map(|t| t.kind)
    }

    #[inline]
    fn at(&self, kind: TokenKind) -> bool {
        self.current_kind() == Some(kind)
    }

    /// Take the lookahead token and fetch the next one.
    fn advance(&mut self) -> Token<'src> {
        match self.current.take() {
            Some(token) => {
                self.current = self.lexer.next_token();
                token
            }
            None => panic!("parser advanced past the end of input"),
        }
    }

    fn eat(&mut self, kind: TokenKind) -> Option<Token<'src>> {
        if self.at(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Span and description of the lookahead, for diagnostics.
    fn found(&self) -> (SourceSpan<'src>, String) {
        match &self.current {
            Some(token) => (token.span(), token.describe()),
            None => (self.lexer.location().span(0), "end of input".to_string()),
        }
    }

    fn error(&mut self, span: SourceSpan<'src>, message: &DiagnosticMessage, args: &[&str]) {
        self.lexer.report(Diagnostic::new(span, message, args));
    }

    /// An invalid lookahead was already reported by the lexer; fail without
    /// piling a second diagnostic on top.
    fn invalid_token_error(&self) -> Option<SyntaxError> {
        match &self.current {
            Some(token) if token.kind == TokenKind::Invalid => Some(SyntaxError::InvalidToken {
                line: token.location.line,
                column: token.location.column,
            }),
            _ => None,
        }
    }

    fn push(&mut self, item: AstItem, span: SourceSpan<'src>) -> Handle {
        self.ast.push(item, span)
    }

    /// Run `f` one nesting level deeper.
    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>,
    ) -> Result<T, SyntaxError> {
        self.depth += 1;
        if self.depth > self.options.max_nesting_depth {
            self.depth -= 1;
            let (span, _) = self.found();
            let limit = self.options.max_nesting_depth;
            self.error(span, &messages::NESTED_TOO_DEEPLY, &[limit.to_string().as_str()]);
            return Err(SyntaxError::NestingTooDeep {
                line: span.line(),
                column: span.column(),
                limit,
            });
        }
        let result = f(self);
        self.depth -= 1;
        result
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    pub fn parse_expression(&mut self) -> Result<Handle, SyntaxError> {
        self.nested(|p| p.parse_tier(OperatorPrecedence::LOWEST))
    }

    fn parse_tier(&mut self, tier: OperatorPrecedence) -> Result<Handle, SyntaxError> {
        match tier {
            OperatorPrecedence::LogicalNot => self.parse_logical_not(),
            OperatorPrecedence::Unary => self.parse_unary(),
            OperatorPrecedence::Postfix => self.parse_postfix(),
            _ => self.parse_binary(tier),
        }
    }

    /// Parse one left-associative binary tier: `a op b op c` folds as
    /// `(a op b) op c`.
    fn parse_binary(&mut self, tier: OperatorPrecedence) -> Result<Handle, SyntaxError> {
        let mut lhs = self.parse_tier(tier.tighter())?;

        while let Some(op) = self
            .current_kind()
            .and_then(get_binary_operator)
            .filter(|(t, _)| *t == tier)
            .map(|(_, op)| op)
        {
            let op_token = self.advance();
            let rhs = self.parse_tier(tier.tighter())?;
            lhs = self.push(AstItem::Binary(BinaryExpr { op, lhs, rhs }), op_token.span());
        }

        Ok(lhs)
    }

    fn parse_logical_not(&mut self) -> Result<Handle, SyntaxError> {
        match self.eat(TokenKind::ExclamationToken) {
            Some(op_token) => {
                let operand = self.nested(|p| p.parse_logical_not())?;
                Ok(self.push(
                    AstItem::Unary(UnaryExpr { op: UnaryOp::Not, operand }),
                    op_token.span(),
                ))
            }
            None => self.parse_tier(OperatorPrecedence::LogicalNot.tighter()),
        }
    }

    fn parse_unary(&mut self) -> Result<Handle, SyntaxError> {
        let op = match self.current_kind() {
            Some(TokenKind::MinusToken) => UnaryOp::Negate,
            Some(TokenKind::TildeToken) => UnaryOp::BitNot,
            _ => return self.parse_postfix(),
        };
        let op_token = self.advance();
        let operand = self.nested(|p| p.parse_unary())?;
        Ok(self.push(AstItem::Unary(UnaryExpr { op, operand }), op_token.span()))
    }

    /// A primary followed by any run of `[index]`, `(args)` and `.selector`.
    fn parse_postfix(&mut self) -> Result<Handle, SyntaxError> {
        let mut target = self.parse_primary()?;

        loop {
            target = match self.current_kind() {
                Some(TokenKind::OpenBracketToken) => self.parse_array_access(target)?,
                Some(TokenKind::OpenParenToken) => self.parse_call(target)?,
                Some(TokenKind::DotToken) => self.parse_selector(target)?,
                _ => break,
            };
        }

        Ok(target)
    }

    fn parse_array_access(&mut self, target: Handle) -> Result<Handle, SyntaxError> {
        let open = self.advance();
        let index = self.parse_expression()?;
        self.expect_closing(TokenKind::CloseBracketToken, &open)?;
        Ok(self.push(AstItem::ArrayAccess(ArrayAccess { target, index }), open.span()))
    }

    fn parse_call(&mut self, callee: Handle) -> Result<Handle, SyntaxError> {
        let open = self.advance();
        let mut args = Vec::new();
        if !self.at(TokenKind::CloseParenToken) {
            loop {
                args.push(self.parse_expression()?);
                if self.eat(TokenKind::CommaToken).is_none() {
                    break;
                }
            }
        }
        self.expect_closing(TokenKind::CloseParenToken, &open)?;
        let args = self.ast.push_list(&args);
        Ok(self.push(AstItem::Call(FunctionCall { callee, args }), open.span()))
    }

    fn parse_selector(&mut self, target: Handle) -> Result<Handle, SyntaxError> {
        let dot = self.advance();
        let kind = match self.current_kind() {
            Some(TokenKind::AsteriskToken) => Some(PrimitiveKind::Deref),
            Some(TokenKind::AmpersandToken) => Some(PrimitiveKind::AddressOf),
            Some(TokenKind::QuestionToken) => Some(PrimitiveKind::CheckedUnwrap),
            Some(TokenKind::ExclamationToken) => Some(PrimitiveKind::UncheckedUnwrap),
            Some(TokenKind::Identifier) => None,
            _ => {
                if let Some(err) = self.invalid_token_error() {
                    return Err(err);
                }
                let (span, found) = self.found();
                self.error(span, &messages::EXPECTED_SELECTOR, &[found.as_str()]);
                return Err(SyntaxError::ExpectedSelector {
                    line: span.line(),
                    column: span.column(),
                    found,
                });
            }
        };

        let selector = self.advance();
        let span = dot.location.span(dot.width + selector.width);
        let item = match kind {
            Some(kind) => AstItem::Primitive(PrimitiveAccess { kind, target }),
            None => {
                let field = self.ast.intern(selector.text());
                AstItem::Field(FieldAccess { target, field })
            }
        };
        Ok(self.push(item, span))
    }

    fn parse_primary(&mut self) -> Result<Handle, SyntaxError> {
        let item = match self.current_kind() {
            Some(TokenKind::TrueKeyword) => AstItem::Bool(BoolLiteral { value: true }),
            Some(TokenKind::FalseKeyword) => AstItem::Bool(BoolLiteral { value: false }),
            Some(TokenKind::NumericLiteral) => return self.parse_integer(),
            Some(TokenKind::StringLiteral) => {
                let token = self.advance();
                let text = self.ast.intern(token.text());
                return Ok(self.push(AstItem::Str(StringLiteral { text }), token.span()));
            }
            Some(TokenKind::Identifier) => {
                let token = self.advance();
                let name = self.ast.intern(token.text());
                return Ok(self.push(AstItem::Identifier(Identifier { name }), token.span()));
            }
            Some(TokenKind::OpenParenToken) => return self.parse_parenthesized(),
            _ => {
                if let Some(err) = self.invalid_token_error() {
                    return Err(err);
                }
                let (span, found) = self.found();
                self.error(span, &messages::EXPECTED_EXPRESSION, &[found.as_str()]);
                return Err(SyntaxError::ExpectedExpression {
                    line: span.line(),
                    column: span.column(),
                    found,
                });
            }
        };
        let token = self.advance();
        Ok(self.push(item, token.span()))
    }

    fn parse_integer(&mut self) -> Result<Handle, SyntaxError> {
        let token = self.advance();
        match token.text().parse::<u64>() {
            Ok(value) => Ok(self.push(AstItem::Int(IntLiteral { value }), token.span())),
            Err(_) => {
                let text = token.text().to_string();
                self.lexer.report(
                    Diagnostic::new(token.span(), &messages::INTEGER_LITERAL_TOO_LARGE, &[text.as_str()])
                        .with_hint(format!("the largest integer literal is {}", u64::MAX)),
                );
                Err(SyntaxError::IntegerTooLarge {
                    line: token.location.line,
                    column: token.location.column,
                    text,
                })
            }
        }
    }

    /// `( expr )`. Grouping adds no node of its own.
    fn parse_parenthesized(&mut self) -> Result<Handle, SyntaxError> {
        let open = self.advance();
        let inner = self.parse_expression()?;
        self.expect_closing(TokenKind::CloseParenToken, &open)?;
        Ok(inner)
    }

    /// Consume the delimiter closing `open`, or report the token found in its
    /// place together with a note at the opener.
    fn expect_closing(&mut self, close: TokenKind, open: &Token<'src>) -> Result<(), SyntaxError> {
        if self.eat(close).is_some() {
            return Ok(());
        }
        if let Some(err) = self.invalid_token_error() {
            return Err(err);
        }

        let (span, found) = self.found();
        let expected = close.text().unwrap_or_default();
        self.error(span, &messages::EXPECTED_CLOSING_DELIMITER, &[expected, found.as_str()]);
        self.error(open.span(), &messages::UNCLOSED_DELIMITER, &[open.text()]);

        Err(SyntaxError::UnclosedDelimiter {
            line: open.location.line,
            column: open.location.column,
            delimiter: open.text().chars().next().unwrap_or('('),
        })
    }
}

/// Parse a whole file with the given options.
///
/// Diagnostics go to `sink`. On failure the partially built tree is dropped;
/// use [`Parser`] directly to inspect it.
pub fn parse<'src>(
    file: &'src SourceFile,
    sink: &mut dyn DiagnosticSink<'src>,
    options: ParseOptions,
) -> Result<Ast<'src>, SyntaxError> {
    let mut parser = Parser::new(file, sink, options);
    parser.parse_program()?;
    Ok(parser.into_ast())
}
