//! Parses a small source file, walks the resulting arena printing every
//! node's kind and span, then prints any diagnostics. Mirrors the
//! teacher's own `examples/unused_vars.rs`: parse, inspect, print errors.

use styler_parser::arena::NodeId;
use styler_parser::{Parser, ParseResult, SyntaxTree};

fn main() {
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

    let tree = Parser::new(source).parse().expect("non-empty, size-bounded input");

    match tree.result() {
        ParseResult::Success { root } => {
            println!("parsed successfully, {} node(s) allocated", node_count(&tree));
            walk(&tree, *root, 0);
        }
        ParseResult::Failure { errors } => {
            eprintln!("parse failed with {} diagnostic(s):", errors.len());
            for error in errors.iter() {
                eprintln!("  {error}");
            }
        }
    }
}

fn node_count(tree: &SyntaxTree) -> usize {
    // There's no direct arena len() exposed through SyntaxTree; walk instead.
    fn count(tree: &SyntaxTree, id: NodeId) -> usize {
        let view = tree.node(id).unwrap();
        1 + view.children().iter().map(|&c| count(tree, c)).sum::<usize>()
    }
    match tree.result() {
        ParseResult::Success { root } => count(tree, *root),
        ParseResult::Failure { .. } => 0,
    }
}

fn walk(tree: &SyntaxTree, id: NodeId, depth: usize) {
    let view = tree.node(id).expect("id came from this same tree");
    let text = tree.text_of(id).unwrap();
    let snippet: String = text.chars().take(40).collect();
    println!(
        "{:indent$}{:?} [{}..{}) {:?}",
        "",
        view.kind,
        view.start,
        view.end,
        snippet,
        indent = depth * 2,
    );
    for &child in view.children() {
        walk(tree, child, depth + 1);
    }
}
