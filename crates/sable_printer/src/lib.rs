//! sable_printer: AST to S-expression text.
//!
//! Renders parsed expressions in a fully parenthesized prefix form, e.g.
//! `true and 123 or false` prints as `(or (and true 123) false)`. Used by
//! `sablec --tree` and as the oracle in parser tests.
//!
//! | node | form |
//! |---|---|
//! | binary | `(op lhs rhs)` |
//! | unary | `(op operand)` |
//! | array access | `(index target index)` |
//! | call | `(call callee args...)` |
//! | primitive access | `(.* target)`, `(.& target)`, `(.? target)`, `(.! target)` |
//! | field access | `(. target field)` |

use sable_ast::visitor::for_each_child;
use sable_ast::{Ast, AstItem, Handle, PrimitiveKind};

/// The printer converts AST nodes to text.
pub struct Printer<'a, 'src> {
    output: String,
    ast: &'a Ast<'src>,
}

impl<'a, 'src> Printer<'a, 'src> {
    pub fn new(ast: &'a Ast<'src>) -> Self {
        Self {
            output: String::with_capacity(256),
            ast,
        }
    }

    /// Print one expression.
    pub fn print_node(&mut self, handle: Handle) -> String {
        self.output.clear();
        self.print_expression(handle);
        self.output.clone()
    }

    /// Print every root, one per line.
    pub fn print_roots(&mut self) -> String {
        self.output.clear();
        for &root in self.ast.roots() {
            self.print_expression(root);
            self.output.push('\n');
        }
        self.output.clone()
    }

    fn print_expression(&mut self, handle: Handle) {
        let ast = self.ast;
        let item = ast.get(handle);
        let head = match item {
            AstItem::Bool(n) => {
                self.output.push_str(if n.value { "true" } else { "false" });
                return;
            }
            AstItem::Int(n) => {
                self.output.push_str(&n.value.to_string());
                return;
            }
            AstItem::Str(n) => {
                self.write_string_literal(ast.resolve(n.text));
                return;
            }
            AstItem::Identifier(n) => {
                self.output.push_str(ast.resolve(n.name));
                return;
            }
            AstItem::Binary(n) => n.op.as_str(),
            AstItem::Unary(n) => n.op.as_str(),
            AstItem::ArrayAccess(_) => "index",
            AstItem::Call(_) => "call",
            AstItem::Primitive(n) => match n.kind {
                PrimitiveKind::Deref => ".*",
                PrimitiveKind::AddressOf => ".&",
                PrimitiveKind::CheckedUnwrap => ".?",
                PrimitiveKind::UncheckedUnwrap => ".!",
            },
            AstItem::Field(_) => ".",
        };

        self.output.push('(');
        self.output.push_str(head);
        for_each_child(ast, handle, |child| {
            self.output.push(' ');
            self.print_expression(child);
        });
        if let AstItem::Field(n) = item {
            self.output.push(' ');
            self.output.push_str(ast.resolve(n.field));
        }
        self.output.push(')');
    }

    fn write_string_literal(&mut self, text: &str) {
        self.output.push('"');
        for ch in text.chars() {
            match ch {
                '"' => self.output.push_str("\\\""),
                '\\' => self.output.push_str("\\\\"),
                _ => self.output.push(ch),
            }
        }
        self.output.push('"');
    }
}

/// Print one expression of `ast`.
pub fn print_node(ast: &Ast<'_>, handle: Handle) -> String {
    Printer::new(ast).print_node(handle)
}

/// Print every root of `ast`, one per line.
pub fn print_roots(ast: &Ast<'_>) -> String {
    Printer::new(ast).print_roots()
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::{
        BinaryExpr, BinaryOp, BoolLiteral, FieldAccess, FunctionCall, Identifier, IntLiteral,
        PrimitiveAccess, StringLiteral,
    };
    use sable_core::text::SourceFile;

    #[test]
    fn test_print_binary() {
        let file = SourceFile::new("t.sb", "true and 1");
        let span = file.location(1, 1).span(1);
        let mut ast = Ast::new();
        let t = ast.push(AstItem::Bool(BoolLiteral { value: true }), span);
        let one = ast.push(AstItem::Int(IntLiteral { value: 1 }), span);
        let and = ast.push(AstItem::Binary(BinaryExpr { op: BinaryOp::And, lhs: t, rhs: one }), span);
        assert_eq!(print_node(&ast, and), "(and true 1)");
    }

    #[test]
    fn test_print_postfix_chain() {
        let file = SourceFile::new("t.sb", "f().x.?");
        let span = file.location(1, 1).span(1);
        let mut ast = Ast::new();
        let name = ast.intern("f");
        let field = ast.intern("x");
        let f = ast.push(AstItem::Identifier(Identifier { name }), span);
        let args = ast.push_list(&[]);
        let call = ast.push(AstItem::Call(FunctionCall { callee: f, args }), span);
        let x = ast.push(AstItem::Field(FieldAccess { target: call, field }), span);
        let unwrap = ast.push(
            AstItem::Primitive(PrimitiveAccess { kind: PrimitiveKind::CheckedUnwrap, target: x }),
            span,
        );
        ast.push_root(unwrap);
        assert_eq!(print_roots(&ast), "(.? (. (call f) x))\n");
    }

    #[test]
    fn test_print_string_escapes() {
        let file = SourceFile::new("t.sb", "\"a\\b\"");
        let mut ast = Ast::new();
        let text = ast.intern("a\\b");
        let s = ast.push(AstItem::Str(StringLiteral { text }), file.location(1, 1).span(5));
        assert_eq!(print_node(&ast, s), "\"a\\\\b\"");
    }
}
