// Integration tests for parsing whole programs

use treeform::parser::ast::{AstNode, Binding, BinOpKind, NodeRef, StmtList, EMPTY_STMT_LIST};
use treeform::parser::literal::LiteralValue;
use treeform::parser::location::SourceLocation;
use treeform::parser::{parse, ParseErrorKind};

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn parse_ok(source: &str) -> StmtList {
    init_logger();
    match parse(source) {
        Ok(program) => program,
        Err(e) => panic!("Parsing failed: {}", e),
    }
}

/// The single top-level statement of `source`
fn only_statement(source: &str) -> AstNode {
    let mut program = parse_ok(source);
    assert_eq!(program.statements.len(), 1, "Expected one statement");
    program.statements.remove(0)
}

fn bin_op(node: &AstNode) -> (BinOpKind, &AstNode, &AstNode) {
    match node {
        AstNode::BinOp(bin) => (bin.op, &bin.left, &bin.right),
        other => panic!("Expected binary operation, got {:?}", other),
    }
}

fn ident_name(node: &AstNode) -> &str {
    match node {
        AstNode::Ident(ident) => &ident.name,
        other => panic!("Expected identifier, got {:?}", other),
    }
}

#[test]
fn test_variable_declaration_in_class_and_function() {
    let class = only_statement("class A {\n    int f() {\n        int a = 1;\n    }\n}");
    let AstNode::ClassDecl(class) = class else {
        panic!("Expected class declaration");
    };
    assert_eq!(class.name.name, "A");
    assert!(class.access().is_empty());

    let AstNode::FuncDecl(func) = &class.body().statements[0] else {
        panic!("Expected function declaration");
    };
    let AstNode::StmtList(body) = func.body.as_ref() else {
        panic!("Expected function body");
    };
    assert_eq!(body.statements.len(), 1);

    let AstNode::VarDecl(decl) = &body.statements[0] else {
        panic!("Expected variable declaration");
    };
    assert_eq!(decl.ty.name, "int");
    assert_eq!(decl.bindings.len(), 1);
    let Binding::Init(assign) = &decl.bindings[0] else {
        panic!("Expected initialised binding");
    };
    assert_eq!(assign.target.name, "a");
    let AstNode::Literal(literal) = assign.value.as_ref() else {
        panic!("Expected literal");
    };
    assert_eq!(literal.text, "1");
    assert_eq!(literal.value, LiteralValue::Int(1));
    assert_eq!(decl.meta.location, Some(SourceLocation::new(3, 9)));
}

#[test]
fn test_addition_chain_is_left_associative() {
    let statement = only_statement("a = 1+2+3;");
    let AstNode::Assign(assign) = statement else {
        panic!("Expected assignment");
    };
    let (op, left, right) = bin_op(&assign.value);
    assert_eq!(op, BinOpKind::Add);
    assert_eq!(right.label(), "3");
    let (inner_op, inner_left, inner_right) = bin_op(left);
    assert_eq!(inner_op, BinOpKind::Add);
    assert_eq!(inner_left.label(), "1");
    assert_eq!(inner_right.label(), "2");
}

#[test]
fn test_every_repeated_level_folds_left() {
    for (source, kind) in [
        ("a * b / c;", BinOpKind::Div),
        ("a - b + c;", BinOpKind::Add),
        ("a && b && c;", BinOpKind::And),
        ("a || b || c;", BinOpKind::Or),
        ("a += b -= c;", BinOpKind::SubAssign),
    ] {
        let statement = only_statement(source);
        let (op, left, right) = bin_op(&statement);
        assert_eq!(op, kind, "{}", source);
        assert_eq!(ident_name(right), "c");
        let (_, inner_left, inner_right) = bin_op(left);
        assert_eq!(ident_name(inner_left), "a");
        assert_eq!(ident_name(inner_right), "b");
    }
}

#[test]
fn test_precedence_layers() {
    let statement = only_statement("a || b && c == d < e + f * g;");
    assert_eq!(statement.label(), "||");
    let (_, _, right) = bin_op(&statement);
    let (op, _, right) = bin_op(right);
    assert_eq!(op, BinOpKind::And);
    let (op, _, right) = bin_op(right);
    assert_eq!(op, BinOpKind::Eq);
    let (op, _, right) = bin_op(right);
    assert_eq!(op, BinOpKind::Lt);
    let (op, _, right) = bin_op(right);
    assert_eq!(op, BinOpKind::Add);
    let (op, _, _) = bin_op(right);
    assert_eq!(op, BinOpKind::Mul);
}

#[test]
fn test_empty_for_has_four_empty_children() {
    let statement = only_statement("for (;;) { }");
    let AstNode::For(node) = &statement else {
        panic!("Expected for statement");
    };
    assert!(std::ptr::eq(node.init(), &EMPTY_STMT_LIST));
    assert!(std::ptr::eq(node.cond(), &EMPTY_STMT_LIST));
    assert!(std::ptr::eq(node.step(), &EMPTY_STMT_LIST));
    let AstNode::StmtList(body) = node.body() else {
        panic!("Expected statement list body");
    };
    assert!(body.is_empty());

    let children = statement.children();
    assert_eq!(children.len(), 4);
    assert!(children.iter().all(|child| child.label() == "..."));
    assert_eq!(statement.tree(), vec!["for", "├ ...", "├ ...", "├ ...", "└ ..."]);
}

#[test]
fn test_relational_operators_do_not_chain() {
    init_logger();
    let err = parse("a > b > c;").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LexicalMismatch);
    assert_eq!(err.offset, 6);
    assert_eq!(err.location, SourceLocation::new(1, 7));
    assert_eq!(err.remainder, "> c;");
}

#[test]
fn test_equality_operators_do_not_chain() {
    init_logger();
    let err = parse("a == b != c;").unwrap_err();
    assert_eq!(err.offset, 7);
    assert_eq!(err.remainder, "!= c;");
    assert!(parse("a == (b != c);").is_ok());
    assert!(parse("a < b == c > d;").is_ok());
}

#[test]
fn test_trailing_garbage_is_incomplete_parse() {
    init_logger();
    let err = parse("class A { }\n}").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::IncompleteParse);
    assert_eq!(err.location, SourceLocation::new(2, 1));
}

#[test]
fn test_literal_errors_surface_at_literal() {
    init_logger();
    let err = parse("s = \"bad \\q escape\";").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LiteralEvaluation);
    assert_eq!(err.location, SourceLocation::new(1, 5));
}

#[test]
fn test_parse_is_deterministic() {
    let source = treeform::config::DEMO_PROGRAM;
    let first = parse_ok(source);
    let second = parse_ok(source);
    assert_eq!(first, second);
    assert_eq!(first.tree(), second.tree());
}

#[test]
fn test_sibling_positions_increase() {
    fn check(node: NodeRef<'_>) {
        let children = node.children();
        let located: Vec<SourceLocation> = children.iter().filter_map(|c| c.location()).collect();
        if let NodeRef::StmtList(_) = node {
            assert!(
                located.windows(2).all(|pair| pair[0] <= pair[1]),
                "Out of order: {:?}",
                located
            );
        }
        for child in children {
            check(child);
        }
    }

    let program = parse_ok(treeform::config::DEMO_PROGRAM);
    check(NodeRef::StmtList(&program));
}

#[test]
fn test_chain_segments_and_new() {
    let statement = only_statement("x = new A(1).b.c(d);");
    let AstNode::Assign(assign) = statement else {
        panic!("Expected assignment");
    };
    let AstNode::Chain(chain) = assign.value.as_ref() else {
        panic!("Expected chain");
    };
    assert_eq!(chain.segments.len(), 3);
    assert_eq!(assign.value.label(), ".");
}

#[test]
fn test_modifiers_on_functions_and_classes() {
    let class = only_statement("public class A { async private static void run(int n, A[] xs) { } }");
    let AstNode::ClassDecl(class) = class else {
        panic!("Expected class declaration");
    };
    assert_eq!(class.access().name, "public");
    let AstNode::FuncDecl(func) = &class.body().statements[0] else {
        panic!("Expected function declaration");
    };
    assert_eq!(func.is_async().name, "async");
    assert_eq!(func.access().name, "private");
    assert_eq!(func.is_static().name, "static");
    assert_eq!(func.return_type.name, "void");
    let types: Vec<&str> = func.params.iter().map(|p| p.ty.name.as_str()).collect();
    assert_eq!(types, vec!["int", "A[]"]);
}

#[test]
fn test_comments_between_tokens() {
    let statement = only_statement("a /* first */ = // second\n 1;");
    assert_eq!(statement.label(), "=");
    init_logger();
    let err = parse("a = 1; /* open").unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LexicalMismatch);
    assert_eq!(err.location, SourceLocation::new(1, 8));
}

/// Class with a bare block, a method and nested classes; the last line
/// closes one brace more than was opened.
const NESTED_CLASS_PROGRAM: &str = "private class A{
    {
    b();
    int a = 1+2+b().a.b();
    a = 1;
    }
    int a(int b){
        int a = a().b.c().c.v();
        int a = a();
        a();
    }
    public class A{
    class A{
    int a = 0, b = a, c;
    String a = 0, b = a, c;
    }
    }
    }
    }";

#[test]
fn test_class_level_block_holds_function_statements() {
    let class = only_statement("private class A {\n    {\n    b();\n    a = 1;\n    }\n}");
    let AstNode::ClassDecl(class) = class else {
        panic!("Expected class declaration");
    };
    let AstNode::StmtList(block) = &class.body().statements[0] else {
        panic!("Expected nested block");
    };
    let labels: Vec<String> = block.statements.iter().map(AstNode::label).collect();
    assert_eq!(labels, vec!["call", "="]);
}

#[test]
fn test_nested_class_program() {
    let source = NESTED_CLASS_PROGRAM.trim_end().trim_end_matches('}');
    let class = only_statement(source);
    let AstNode::ClassDecl(class) = class else {
        panic!("Expected class declaration");
    };
    assert_eq!(class.access().name, "private");
    let kinds: Vec<&str> = class
        .body()
        .statements
        .iter()
        .map(|s| s.as_node_ref().kind_name())
        .collect();
    assert_eq!(kinds, vec!["StmtList", "FuncDecl", "ClassDecl"]);

    let err = parse(NESTED_CLASS_PROGRAM).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::IncompleteParse);
    assert_eq!(err.location, SourceLocation::new(19, 5));
    assert_eq!(err.remainder, "}");
}

#[test]
fn test_deep_nesting_is_an_error_not_a_crash() {
    init_logger();
    let parens = format!("x = {}1{};", "(".repeat(200), ")".repeat(200));
    let err = parse(&parens).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LexicalMismatch);
    assert!(err.message.contains("nesting too deep"), "{}", err.message);

    let blocks = format!("{}x();{}", "{".repeat(600), "}".repeat(600));
    let err = parse(&blocks).unwrap_err();
    assert_eq!(err.kind, ParseErrorKind::LexicalMismatch);
    assert!(err.message.contains("nesting too deep"), "{}", err.message);

    let shallow = format!("x = {}1{};", "(".repeat(40), ")".repeat(40));
    assert!(parse(&shallow).is_ok());
}
