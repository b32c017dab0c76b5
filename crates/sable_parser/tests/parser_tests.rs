//! Parser integration tests.
//!
//! Verifies tree shapes through the S-expression printer, and the
//! diagnostics and errors of malformed input.

use sable_ast::{AstItem, AstTag, BinaryOp};
use sable_core::text::SourceFile;
use sable_diagnostics::{messages, DiagnosticCollection, Severity};
use sable_parser::{parse, ParseOptions, Parser, SyntaxError};
use sable_printer::print_roots;

/// Helper: parse source text and print every root, one per line.
fn print(source: &str) -> String {
    let file = SourceFile::new("test.sb", source);
    let mut diagnostics = DiagnosticCollection::new();
    let ast = match parse(&file, &mut diagnostics, ParseOptions::default()) {
        Ok(ast) => ast,
        Err(err) => panic!("{source:?} failed to parse: {err}"),
    };
    assert!(diagnostics.is_empty(), "{source:?}: {:?}", diagnostics.diagnostics());
    print_roots(&ast).trim_end().to_string()
}

/// Helper: parse source that must fail; return the error and (code, severity, line, column)
/// of every diagnostic.
fn parse_err(source: &str) -> (SyntaxError, Vec<(u32, Severity, u32, u32)>) {
    let file = SourceFile::new("test.sb", source);
    let mut diagnostics = DiagnosticCollection::new();
    let err = match parse(&file, &mut diagnostics, ParseOptions::default()) {
        Ok(_) => panic!("{source:?} parsed without error"),
        Err(err) => err,
    };
    let diags = diagnostics
        .diagnostics()
        .iter()
        .map(|d| (d.code, d.severity, d.line(), d.column()))
        .collect();
    (err, diags)
}

// ============================================================================
// Precedence
// ============================================================================

#[test]
fn test_and_binds_tighter_than_or() {
    assert_eq!(print("true and 123 or false"), "(or (and true 123) false)");
    assert_eq!(print("a or b and c"), "(or a (and b c))");
}

#[test]
fn test_or_and_structure() {
    let file = SourceFile::new("test.sb", "true and 123 or false");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();
    assert_eq!(ast.roots().len(), 1);

    let AstItem::Binary(or) = ast.get(ast.roots()[0]) else {
        panic!("root is not binary");
    };
    assert_eq!(or.op, BinaryOp::Or);
    let AstItem::Binary(and) = ast.get(or.lhs) else {
        panic!("lhs is not binary");
    };
    assert_eq!(and.op, BinaryOp::And);
    assert_eq!(ast.get(and.lhs).kind(), AstTag::Bool);
    assert_eq!(ast.get(and.rhs).kind(), AstTag::Int);
    assert_eq!(ast.get(or.rhs).kind(), AstTag::Bool);
}

#[test]
fn test_logical_not_sits_between_and_and_comparison() {
    assert_eq!(print("!a == b and c"), "(and (! (== a b)) c)");
    assert_eq!(print("!!a"), "(! (! a))");
}

#[test]
fn test_full_cascade() {
    assert_eq!(
        print("a == b | c ^ d & e << f + g * -h"),
        "(== a (| b (^ c (& d (<< e (+ f (* g (- h))))))))"
    );
    assert_eq!(
        print("-a * b + c << d & e ^ f | g < h"),
        "(< (| (^ (& (<< (+ (* (- a) b) c) d) e) f) g) h)"
    );
}

#[test]
fn test_tier_members() {
    assert_eq!(print("a ++ b - c"), "(- (++ a b) c)");
    assert_eq!(print("a ** b % c / d"), "(/ (% (** a b) c) d)");
    assert_eq!(print("a >> b"), "(>> a b)");
    assert_eq!(print("a != b"), "(!= a b)");
    assert_eq!(print("a <= b"), "(<= a b)");
    assert_eq!(print("a >= b"), "(>= a b)");
}

#[test]
fn test_same_tier_left_fold() {
    assert_eq!(print("a - b - c"), "(- (- a b) c)");
    assert_eq!(print("a + b - c + d"), "(+ (- (+ a b) c) d)");
    assert_eq!(print("a / b / c"), "(/ (/ a b) c)");
    assert_eq!(print("a or b or c"), "(or (or a b) c)");
    assert_eq!(print("a < b < c"), "(< (< a b) c)");
}

#[test]
fn test_parentheses_override_precedence() {
    assert_eq!(print("(a + b) * c"), "(* (+ a b) c)");
    assert_eq!(print("a - (b - c)"), "(- a (- b c))");
}

#[test]
fn test_prefix_operators() {
    assert_eq!(print("-~x"), "(- (~ x))");
    assert_eq!(print("--1"), "(- (- 1))");
    assert_eq!(print("-a.b"), "(- (. a b))");
}

// ============================================================================
// Postfix chains
// ============================================================================

#[test]
fn test_postfix_chain_builds_innermost_first() {
    let file = SourceFile::new("test.sb", "a.b[0](c)");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();

    let AstItem::Call(call) = ast.get(ast.roots()[0]) else {
        panic!("root is not a call");
    };
    let args = ast.list(call.args);
    assert_eq!(args.len(), 1);
    let AstItem::Identifier(c) = ast.get(args[0]) else {
        panic!("argument is not an identifier");
    };
    assert_eq!(ast.resolve(c.name), "c");

    let AstItem::ArrayAccess(index) = ast.get(call.callee) else {
        panic!("callee is not an array access");
    };
    assert!(matches!(ast.get(index.index), AstItem::Int(i) if i.value == 0));

    let AstItem::Field(field) = ast.get(index.target) else {
        panic!("indexed target is not a field access");
    };
    assert_eq!(ast.resolve(field.field), "b");
    let AstItem::Identifier(a) = ast.get(field.target) else {
        panic!("field target is not an identifier");
    };
    assert_eq!(ast.resolve(a.name), "a");

    assert_eq!(print("a.b[0](c)"), "(call (index (. a b) 0) c)");
}

#[test]
fn test_primitive_selectors() {
    assert_eq!(print("p.*"), "(.* p)");
    assert_eq!(print("p.&"), "(.& p)");
    assert_eq!(print("p.?"), "(.? p)");
    assert_eq!(print("p.!"), "(.! p)");
    assert_eq!(print("p.?.x.*"), "(.* (. (.? p) x))");
}

#[test]
fn test_calls() {
    assert_eq!(print("f()"), "(call f)");
    assert_eq!(print("f(1, g(2), \"s\")"), "(call f 1 (call g 2) \"s\")");
    assert_eq!(print("f(a)(b)"), "(call (call f a) b)");
    assert_eq!(print("m[i][j]"), "(index (index m i) j)");
}

#[test]
fn test_call_arguments_of_nested_calls_stay_separate() {
    let file = SourceFile::new("test.sb", "f(g(1, 2), 3)");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();
    let AstItem::Call(outer) = ast.get(ast.roots()[0]) else {
        panic!("root is not a call");
    };
    let outer_args = ast.list(outer.args);
    assert_eq!(outer_args.len(), 2);
    let AstItem::Call(inner) = ast.get(outer_args[0]) else {
        panic!("first argument is not a call");
    };
    assert_eq!(ast.list(inner.args).len(), 2);
}

// ============================================================================
// Literals and roots
// ============================================================================

#[test]
fn test_literals() {
    assert_eq!(print("true false"), "true\nfalse");
    assert_eq!(print("\"hi there\""), "\"hi there\"");
    assert_eq!(print("18446744073709551615"), "18446744073709551615");
}

#[test]
fn test_multiple_roots() {
    assert_eq!(print("a + b\nc\n// done\n"), "(+ a b)\nc");
}

#[test]
fn test_empty_program() {
    assert_eq!(print(""), "");
    assert_eq!(print("// only a comment"), "");
}

#[test]
fn test_identifiers_are_interned_once() {
    let file = SourceFile::new("test.sb", "x + x * x");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();
    assert_eq!(ast.interner().len(), 1);
}

#[test]
fn test_span_table_tracks_nodes() {
    let file = SourceFile::new("test.sb", "foo + 42");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();
    assert_eq!(ast.spans().len(), ast.node_count());

    let root = ast.roots()[0];
    let AstItem::Binary(sum) = ast.get(root) else {
        panic!("root is not binary");
    };
    let lhs = ast.span_of(sum.lhs).unwrap();
    assert_eq!((lhs.column(), lhs.len), (1, 3));
    let rhs = ast.span_of(sum.rhs).unwrap();
    assert_eq!((rhs.column(), rhs.len), (7, 2));
    assert_eq!(ast.span_of(root).unwrap().column(), 5);
}

#[test]
fn test_footprint_is_below_naive() {
    let file = SourceFile::new("test.sb", "a.b[0](c) + 1 and true or \"s\"");
    let mut diagnostics = DiagnosticCollection::new();
    let ast = parse(&file, &mut diagnostics, ParseOptions::default()).unwrap();
    let footprint = ast.memory_footprint();
    assert!(footprint.actual < footprint.naive);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_missing_close_paren_commits_no_root() {
    let file = SourceFile::new("test.sb", "(1");
    let mut diagnostics = DiagnosticCollection::new();
    let mut parser = Parser::new(&file, &mut diagnostics, ParseOptions::default());
    let err = parser.parse_program().unwrap_err();
    assert!(matches!(err, SyntaxError::UnclosedDelimiter { line: 1, column: 1, delimiter: '(' }));
    assert!(parser.ast().roots().is_empty());
    drop(parser);

    let diags = diagnostics.diagnostics();
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].code, messages::EXPECTED_CLOSING_DELIMITER.code);
    assert_eq!(diags[0].message, "expected ')', found end of input");
    assert_eq!(diags[0].column(), 3);
    assert_eq!(diags[1].code, messages::UNCLOSED_DELIMITER.code);
    assert_eq!(diags[1].severity, Severity::Info);
    assert_eq!(diags[1].column(), 1);
}

#[test]
fn test_missing_close_bracket_points_at_found_token() {
    let (err, diags) = parse_err("a[1 2");
    assert!(matches!(err, SyntaxError::UnclosedDelimiter { delimiter: '[', .. }));
    assert_eq!(
        diags,
        vec![
            (messages::EXPECTED_CLOSING_DELIMITER.code, Severity::Error, 1, 5),
            (messages::UNCLOSED_DELIMITER.code, Severity::Info, 1, 2),
        ]
    );
}

#[test]
fn test_unclosed_call() {
    let (err, diags) = parse_err("f(a, b");
    assert!(matches!(err, SyntaxError::UnclosedDelimiter { column: 2, .. }));
    assert_eq!(diags.len(), 2);
}

#[test]
fn test_earlier_roots_survive_a_later_error() {
    let file = SourceFile::new("test.sb", "a\nb +");
    let mut diagnostics = DiagnosticCollection::new();
    let mut parser = Parser::new(&file, &mut diagnostics, ParseOptions::default());
    assert!(parser.parse_program().is_err());
    assert_eq!(parser.ast().roots().len(), 1);
}

#[test]
fn test_expected_expression() {
    let (err, diags) = parse_err("1 + )");
    assert_eq!(
        err,
        SyntaxError::ExpectedExpression { line: 1, column: 5, found: "')'".to_string() }
    );
    assert_eq!(diags, vec![(messages::EXPECTED_EXPRESSION.code, Severity::Error, 1, 5)]);
}

#[test]
fn test_trailing_comma_in_call() {
    let (err, _) = parse_err("f(a,)");
    assert!(matches!(err, SyntaxError::ExpectedExpression { column: 5, .. }));
}

#[test]
fn test_keyword_is_not_an_expression() {
    let (err, _) = parse_err("while");
    assert_eq!(
        err,
        SyntaxError::ExpectedExpression { line: 1, column: 1, found: "keyword 'while'".to_string() }
    );
}

#[test]
fn test_bad_selector() {
    let (err, diags) = parse_err("a.1");
    assert!(matches!(err, SyntaxError::ExpectedSelector { column: 3, .. }));
    assert_eq!(diags, vec![(messages::EXPECTED_SELECTOR.code, Severity::Error, 1, 3)]);

    let (err, _) = parse_err("a.");
    assert!(matches!(err, SyntaxError::ExpectedSelector { .. }));
}

#[test]
fn test_integer_too_large() {
    let (err, diags) = parse_err("18446744073709551616");
    assert!(matches!(err, SyntaxError::IntegerTooLarge { ref text, .. } if text == "18446744073709551616"));
    assert_eq!(diags, vec![(messages::INTEGER_LITERAL_TOO_LARGE.code, Severity::Error, 1, 1)]);
}

#[test]
fn test_invalid_token_reports_once() {
    let (err, diags) = parse_err("1 + @");
    assert_eq!(err, SyntaxError::InvalidToken { line: 1, column: 5 });
    assert_eq!(diags, vec![(messages::UNEXPECTED_CHARACTER.code, Severity::Error, 1, 5)]);

    let (err, diags) = parse_err("\"abc");
    assert_eq!(err, SyntaxError::InvalidToken { line: 1, column: 1 });
    assert_eq!(diags.len(), 1);
}

// ============================================================================
// Nesting limit
// ============================================================================

#[test]
fn test_nesting_within_limit() {
    let source = format!("{}x{}", "(".repeat(50), ")".repeat(50));
    assert_eq!(print(&source), "x");
}

#[test]
fn test_nesting_limit() {
    let source = format!("{}x{}", "(".repeat(20), ")".repeat(20));
    let file = SourceFile::new("test.sb", source.as_str());
    let mut diagnostics = DiagnosticCollection::new();
    let options = ParseOptions { max_nesting_depth: 8 };
    let err = parse(&file, &mut diagnostics, options).unwrap_err();
    assert!(matches!(err, SyntaxError::NestingTooDeep { limit: 8, .. }));
    assert_eq!(diagnostics.count_code(messages::NESTED_TOO_DEEPLY.code), 1);
    assert_eq!(diagnostics.len(), 1);
}

#[test]
fn test_prefix_runs_count_toward_nesting() {
    let source = format!("{}x", "-".repeat(20));
    let file = SourceFile::new("test.sb", source.as_str());
    let mut diagnostics = DiagnosticCollection::new();
    let err = parse(&file, &mut diagnostics, ParseOptions { max_nesting_depth: 8 }).unwrap_err();
    assert!(matches!(err, SyntaxError::NestingTooDeep { .. }));
}
