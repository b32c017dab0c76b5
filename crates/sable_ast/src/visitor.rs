//! AST visitor trait for traversing the expression tree.
//!
//! Provides both an `AstVisitor` trait for customizable traversal and
//! a `for_each_child` function for generic iteration over all children.

use crate::ast::Ast;
use crate::dense::Handle;
use crate::node::*;

/// A visitor over the nodes of an [`Ast`]. Implement the hooks you need;
/// default implementations walk into children in source order.
pub trait AstVisitor {
    fn visit(&mut self, ast: &Ast<'_>, handle: Handle) {
        match ast.get(handle) {
            AstItem::Bool(n) => self.visit_bool(n),
            AstItem::Int(n) => self.visit_int(n),
            AstItem::Str(n) => self.visit_string(ast, n),
            AstItem::Identifier(n) => self.visit_identifier(ast, n),
            AstItem::Binary(n) => self.visit_binary(ast, n),
            AstItem::Unary(n) => self.visit_unary(ast, n),
            AstItem::ArrayAccess(n) => self.visit_array_access(ast, n),
            AstItem::Call(n) => self.visit_call(ast, n),
            AstItem::Primitive(n) => self.visit_primitive(ast, n),
            AstItem::Field(n) => self.visit_field(ast, n),
        }
    }

    /// Visit every top-level expression.
    fn visit_roots(&mut self, ast: &Ast<'_>) {
        for &root in ast.roots() {
            self.visit(ast, root);
        }
    }

    // -- Leaves --

    fn visit_bool(&mut self, _node: BoolLiteral) {}

    fn visit_int(&mut self, _node: IntLiteral) {}

    fn visit_string(&mut self, _ast: &Ast<'_>, _node: StringLiteral) {}

    fn visit_identifier(&mut self, _ast: &Ast<'_>, _node: Identifier) {}

    // -- Operators --

    fn visit_binary(&mut self, ast: &Ast<'_>, node: BinaryExpr) {
        self.visit(ast, node.lhs);
        self.visit(ast, node.rhs);
    }

    fn visit_unary(&mut self, ast: &Ast<'_>, node: UnaryExpr) {
        self.visit(ast, node.operand);
    }

    // -- Postfix chain --

    fn visit_array_access(&mut self, ast: &Ast<'_>, node: ArrayAccess) {
        self.visit(ast, node.target);
        self.visit(ast, node.index);
    }

    fn visit_call(&mut self, ast: &Ast<'_>, node: FunctionCall) {
        self.visit(ast, node.callee);
        for &arg in ast.list(node.args) {
            self.visit(ast, arg);
        }
    }

    fn visit_primitive(&mut self, ast: &Ast<'_>, node: PrimitiveAccess) {
        self.visit(ast, node.target);
    }

    fn visit_field(&mut self, ast: &Ast<'_>, node: FieldAccess) {
        self.visit(ast, node.target);
    }
}

/// Call `f` on each child of `handle` in source order, call arguments
/// included.
pub fn for_each_child<F: FnMut(Handle)>(ast: &Ast<'_>, handle: Handle, mut f: F) {
    let item = ast.get(handle);
    for child in item.direct_children() {
        f(child);
    }
    if let AstItem::Call(call) = item {
        for &arg in ast.list(call.args) {
            f(arg);
        }
    }
}
