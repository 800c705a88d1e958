// Integration tests for tree rendering

use pretty_assertions::assert_eq;
use treeform::parser::ast::NodeRef;
use treeform::parser::parse;
use treeform::parser::render::{render_rows, LINE_ENDING};
use treeform::semantic::TypeDesc;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn count_lines(node: &NodeRef<'_>) -> usize {
    1 + node.children().iter().map(count_lines).sum::<usize>()
}

#[test]
fn test_function_tree() {
    init_logger();
    let program = parse("int f(int a) {\n    return a + 1;\n}").unwrap();
    let expected = vec![
        "...",
        "└ function",
        "  ├ ",
        "  │ └ ",
        "  │   └ ",
        "  │     └ int",
        "  │       └ f",
        "  ├ params",
        "  │ └ int",
        "  │   └ a",
        "  └ ...",
        "    └ return",
        "      └ +",
        "        ├ a",
        "        └ 1",
    ];
    assert_eq!(program.tree(), expected);
    assert_eq!(program.render_text(), expected.join(LINE_ENDING));
}

#[test]
fn test_class_tree_with_declarations() {
    init_logger();
    let program = parse("public class Main {\n    int a = 1, b;\n}").unwrap();
    assert_eq!(
        program.tree(),
        vec![
            "...",
            "└ class",
            "  ├ public",
            "  │ └ Main",
            "  └ ...",
            "    └ int",
            "      ├ =",
            "      │ ├ a",
            "      │ └ 1",
            "      └ b",
        ]
    );
}

#[test]
fn test_if_else_and_call_tree() {
    init_logger();
    let program = parse("if (x) { f(1, y); } else { return g(); }").unwrap();
    assert_eq!(
        program.tree(),
        vec![
            "...",
            "└ if",
            "  ├ x",
            "  ├ ...",
            "  │ └ call",
            "  │   ├ f",
            "  │   └ params",
            "  │     ├ 1",
            "  │     └ y",
            "  └ ...",
            "    └ return",
            "      └ call",
            "        ├ g",
            "        └ params",
        ]
    );
}

#[test]
fn test_line_count_matches_descendants() {
    init_logger();
    let program = parse(treeform::config::DEMO_PROGRAM).unwrap();
    let root = NodeRef::StmtList(&program);
    assert_eq!(program.tree().len(), count_lines(&root));

    for statement in &program.statements {
        let node = statement.as_node_ref();
        let lines = statement.tree();
        assert_eq!(lines.len(), count_lines(&node));
        assert_eq!(lines[0], node.label());
    }
}

#[test]
fn test_rows_carry_node_locations() {
    init_logger();
    let program = parse("a = 1;\nb = 2;").unwrap();
    let rows = render_rows(&NodeRef::StmtList(&program));
    let located: Vec<_> = rows
        .iter()
        .filter(|row| row.depth == 1)
        .map(|row| row.location.map(|l| (l.line, l.column)))
        .collect();
    assert_eq!(located, vec![Some((1, 1)), Some((2, 1))]);
}

#[test]
fn test_annotations_from_a_later_pass() {
    init_logger();
    let mut program = parse("x = 1;").unwrap();
    let assign = &mut program.statements[0];
    assign.set_resolved_type(TypeDesc::INT);
    for child in assign.child_nodes_mut() {
        child.set_resolved_type(TypeDesc::INT);
    }
    assert_eq!(program.tree(), vec!["...", "└ = : int", "  ├ x", "  └ 1 : int"]);
}
