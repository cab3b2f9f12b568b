//! End-to-end analysis of a complete program: builds the tree a parser
//! would produce, runs both passes, and checks the symbol table, the
//! rendered table dumps, and the diagnostic stream.

use cminus::analyzer::analyze;
use cminus::ast::{BinaryOp, ExpType, Node};
use cminus::symbols::{render_function_table, render_symbol_table, SymbolKind};

/// int sum(int a[], int n) {
///     int i; int s;
///     i = 0; s = 0;
///     while (i < n) { s = s + a[i]; i = i + 1; }
///     return s;
/// }
/// void main(void) {
///     int nums[3];
///     output(sum(nums, 3));
/// }
fn sum_program() -> Node {
    let while_body = Node::compound(
        None,
        Some(
            Node::assign(
                Node::var("s", None, 5),
                Node::binary(
                    BinaryOp::Plus,
                    Node::var("s", None, 5),
                    Node::var("a", Some(Node::var("i", None, 5)), 5),
                    5,
                ),
                5,
            )
            .with_sibling(Node::assign(
                Node::var("i", None, 6),
                Node::binary(
                    BinaryOp::Plus,
                    Node::var("i", None, 6),
                    Node::constant(1, 6),
                    6,
                ),
                6,
            )),
        ),
        4,
    );

    let sum_body = Node::compound(
        Some(
            Node::var_decl("i", ExpType::Integer, false, 2)
                .with_sibling(Node::var_decl("s", ExpType::Integer, false, 2)),
        ),
        Some(
            Node::assign(Node::var("i", None, 3), Node::constant(0, 3), 3)
                .with_sibling(Node::assign(Node::var("s", None, 3), Node::constant(0, 3), 3))
                .with_sibling(Node::while_stmt(
                    Some(Node::binary(
                        BinaryOp::Lt,
                        Node::var("i", None, 4),
                        Node::var("n", None, 4),
                        4,
                    )),
                    Some(while_body),
                    4,
                ))
                .with_sibling(Node::return_stmt(Some(Node::var("s", None, 7)), 7)),
        ),
        1,
    );

    let sum = Node::function(
        "sum",
        ExpType::Integer,
        Some(
            Node::param("a", ExpType::Integer, true, 1)
                .with_sibling(Node::param("n", ExpType::Integer, false, 1)),
        ),
        Some(sum_body),
        1,
    );

    let main = Node::function(
        "main",
        ExpType::Void,
        Some(Node::void_param(9)),
        Some(Node::compound(
            Some(Node::var_decl("nums", ExpType::Integer, true, 10)),
            Some(Node::call(
                "output",
                Some(Node::call(
                    "sum",
                    Some(Node::var("nums", None, 11).with_sibling(Node::constant(3, 11))),
                    11,
                )),
                11,
            )),
            9,
        )),
        9,
    );

    sum.with_sibling(main)
}

#[test]
fn clean_program_builds_a_full_symbol_table() {
    let mut program = sum_program();
    let analysis = analyze(&mut program).expect("analysis failed");
    assert!(!analysis.had_error, "{:?}", analysis.diagnostics);

    let table = &analysis.table;
    let global = analysis.global;

    // global, sum, main, while block
    let scopes = table.scope_preorder(global);
    let names: Vec<&str> = scopes.iter().map(|&s| table.scope(s).name.as_str()).collect();
    assert_eq!(names, vec!["global", "sum", "compound", "main"]);

    let sum = table.lookup(global, "sum").expect("sum missing");
    let entry = table.entry(sum);
    assert_eq!(entry.kind, SymbolKind::Function);
    assert_eq!(entry.ty, ExpType::Integer);
    assert_eq!(entry.param_count(), 2);
    assert!(entry.params[0].is_array);

    // Use lines accumulate behind the declaration line
    let i = table.lookup_local(scopes[1], "i").expect("i missing");
    assert_eq!(table.entry(i).lines, vec![2, 3, 4, 5, 6, 6]);
}

#[test]
fn table_dumps_render_every_declaration() {
    let mut program = sum_program();
    let analysis = analyze(&mut program).expect("analysis failed");

    let symbols = render_symbol_table(&analysis.table, analysis.global);
    assert!(symbols.contains("< Symbol Table >"));
    for name in ["input", "output", "sum", "main", "a", "n", "i", "s", "nums"] {
        let found = symbols.lines().any(|l| l.starts_with(name));
        assert!(found, "missing row for {}:\n{}", name, symbols);
    }
    assert!(symbols.contains("Integer Array"));

    let functions = render_function_table(&analysis.table, analysis.global);
    assert!(functions.contains("< Function Table >"));
    for name in ["input", "output", "sum", "main"] {
        let found = functions.lines().any(|l| l.starts_with(name));
        assert!(found, "missing row for {}:\n{}", name, functions);
    }
    // Parameterless functions show a Void row
    let input_row = functions.lines().find(|l| l.starts_with("input")).unwrap();
    assert!(input_row.ends_with("Void"));
}

#[test]
fn broken_program_reports_each_problem_once() {
    // void main(void) { int x; x = y; z(); }
    let body = Node::compound(
        Some(Node::var_decl("x", ExpType::Integer, false, 2)),
        Some(
            Node::assign(Node::var("x", None, 3), Node::var("y", None, 3), 3)
                .with_sibling(Node::call("z", None, 4)),
        ),
        1,
    );
    let mut program = Node::function(
        "main",
        ExpType::Void,
        Some(Node::void_param(1)),
        Some(body),
        1,
    );

    let analysis = analyze(&mut program).expect("analysis failed");
    assert!(analysis.had_error);

    let rendered: Vec<String> = analysis.diagnostics.iter().map(|d| d.to_string()).collect();
    assert_eq!(
        rendered,
        vec![
            "Undeclared error at line 3: 'y' undeclared",
            "Undeclared error at line 4: 'z' undeclared",
        ]
    );
}

#[test]
fn analysis_results_serialize() {
    let mut program = sum_program();
    let analysis = analyze(&mut program).expect("analysis failed");

    let json = serde_json::to_string(&analysis.diagnostics).unwrap();
    assert_eq!(json, "[]");

    // The annotated tree and the table both serialize for downstream tools
    let tree_json = serde_json::to_string(&program).unwrap();
    assert!(tree_json.contains("\"scope\""));
    let table_json = serde_json::to_string(&analysis.table).unwrap();
    assert!(table_json.contains("\"sum\""));
}
