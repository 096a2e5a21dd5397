//! Black-box scenarios against the public `styler_parser` facade only —
//! no access to crate-internal items, unlike `src/tests.rs`'s colocated
//! unit tests. Exercises the end-to-end scenarios from spec.md §8.3 plus a
//! handful of whole-file constructs spanning declarations, statements, and
//! expressions together.

use pretty_assertions::assert_eq;
use styler_parser::arena::NodeKind;
use styler_parser::{Parser, ParseResult, SyntaxTree};

fn parse_ok(source: &str) -> SyntaxTree {
    let tree = Parser::new(source).parse().expect("valid, non-empty input");
    match tree.result() {
        ParseResult::Success { .. } => tree,
        ParseResult::Failure { errors } => panic!("expected a successful parse, got {errors:?}"),
    }
}

#[test]
fn compilation_unit_root_spans_the_whole_file_and_is_text_round_trippable() {
    let source = "package com.example;\n\nclass Greeter {}\n";
    let tree = parse_ok(source);
    let ParseResult::Success { root } = tree.result() else {
        unreachable!()
    };
    let unit = tree.node(*root).unwrap();
    assert_eq!(unit.kind, NodeKind::CompilationUnit);
    assert_eq!(tree.text_of(*root).unwrap(), source);
}

#[test]
fn every_node_text_is_a_byte_for_byte_substring_of_the_source() {
    let source = "class A { void m() { int x = 1 + 2; } }\n";
    let tree = parse_ok(source);
    let ParseResult::Success { root } = tree.result() else {
        unreachable!()
    };

    fn check(tree: &SyntaxTree, id: styler_parser::arena::NodeId, source: &str) {
        let view = tree.node(id).unwrap();
        let text = tree.text_of(id).unwrap();
        assert_eq!(text, &source[view.start as usize..view.end as usize]);
        for &child in view.children() {
            check(tree, child, source);
        }
    }
    check(&tree, *root, source);
}

#[test]
fn a_full_class_with_constructor_field_and_method_parses_end_to_end() {
    let source = r#"
package com.example;

import java.util.List;

public class Greeter {
    private final String name;

    public Greeter(String name) {
        this.name = name;
    }

    public String greet() {
        return "Hello, " + name + "!";
    }
}
"#;
    let tree = parse_ok(source);
    assert!(tree.diagnostics().is_empty());

    let ParseResult::Success { root } = tree.result() else {
        unreachable!()
    };
    let unit = tree.node(*root).unwrap();
    let kinds: Vec<NodeKind> = unit.children().iter().map(|&id| tree.node(id).unwrap().kind).collect();
    assert_eq!(
        kinds,
        vec![
            NodeKind::PackageDeclaration,
            NodeKind::ImportDeclaration,
            NodeKind::ClassDeclaration,
        ]
    );
}

#[test]
fn switch_expression_with_arrow_rules_and_a_pattern_parses() {
    let source = r#"
class T {
    String describe(Object o) {
        return switch (o) {
            case Integer i when i > 0 -> "positive int";
            case Integer i -> "int";
            case String s -> "string: " + s;
            default -> "other";
        };
    }
}
"#;
    let tree = parse_ok(source);
    assert!(tree.diagnostics().is_empty());
}

#[test]
fn text_block_is_preserved_byte_for_byte() {
    let source = "class T { String s = \"\"\"\n    hello\n    world\n    \"\"\"; }\n";
    let tree = parse_ok(source);

    fn find(tree: &SyntaxTree, id: styler_parser::arena::NodeId) -> Option<styler_parser::arena::NodeId> {
        let view = tree.node(id).ok()?;
        if view.kind == NodeKind::TextBlockLiteral {
            return Some(id);
        }
        view.children().iter().find_map(|&c| find(tree, c))
    }

    let ParseResult::Success { root } = tree.result() else {
        panic!("expected success, got {:?}", tree.result());
    };
    let block_id = find(&tree, *root).expect("a text block literal node");
    let text = tree.text_of(block_id).unwrap();
    assert!(text.starts_with("\"\"\""));
    assert!(text.ends_with("\"\"\""));
    assert!(text.contains("hello\n    world"));
}

#[test]
fn record_with_sealed_hierarchy_and_pattern_matching_switch_parses_on_a_recent_version() {
    let source = r#"
sealed interface Shape permits Circle, Square {}
record Circle(double radius) implements Shape {}
record Square(double side) implements Shape {}

class Areas {
    double area(Shape shape) {
        return switch (shape) {
            case Circle(double r) -> Math.PI * r * r;
            case Square(double s) -> s * s;
        };
    }
}
"#;
    let tree = Parser::new(source)
        .with_version(styler_parser::LanguageVersion::LATEST)
        .parse()
        .expect("valid, non-empty input");
    match tree.result() {
        ParseResult::Success { .. } => {}
        ParseResult::Failure { errors } => panic!("expected success, got {errors:?}"),
    }
}

#[test]
fn diagnostics_carry_byte_offset_and_one_based_line_and_column() {
    let source = "class A {\n    void m( {\n    }\n}\n";
    let tree = Parser::new(source).parse().expect("valid, non-empty input");
    match tree.result() {
        ParseResult::Failure { errors } => {
            assert!(!errors.is_empty());
            let first = &errors[0];
            assert!(first.line() >= 1);
            assert!(first.column() >= 1);
        }
        ParseResult::Success { .. } => panic!("a missing `)` should be a diagnostic, not a silent success"),
    }
}
