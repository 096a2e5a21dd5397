use criterion::*;
use styler_parser::Parser;

fn parse_source(source: &str) {
    let tree = Parser::new(source).parse().expect("valid, non-empty input");
    black_box(tree.result());
}

fn small_class() -> String {
    "package com.example;\n\nclass Point {\n    int x;\n    int y;\n\n    int sum() {\n        return x + y;\n    }\n}\n".to_string()
}

/// A class with a few dozen small methods, the kind of file a formatter
/// spends most of its time on.
fn medium_class() -> String {
    let mut source = String::from("package com.example;\n\nimport java.util.List;\nimport java.util.ArrayList;\n\nclass Widget {\n");
    for i in 0..40 {
        source.push_str(&format!(
            "    int compute{i}(int a, int b) {{\n        if (a > b) {{\n            return a - b;\n        }} else {{\n            return b - a;\n        }}\n    }}\n\n"
        ));
    }
    source.push_str("}\n");
    source
}

/// A deeply nested expression, stressing the precedence-climbing parser and
/// the recursion-depth counter without tripping the limit.
fn deeply_nested_expression() -> String {
    let mut source = String::from("class Deep {\n    int m() {\n        return ");
    for i in 0..400 {
        source.push_str(&format!("({i} + "));
    }
    source.push('0');
    for _ in 0..400 {
        source.push(')');
    }
    source.push_str(";\n    }\n}\n");
    source
}

fn bench_small_class(c: &mut Criterion) {
    let source = small_class();
    c.bench_function("small_class", move |b| b.iter(|| parse_source(&source)));
}

fn bench_medium_class(c: &mut Criterion) {
    let source = medium_class();
    c.bench_function("medium_class", move |b| b.iter(|| parse_source(&source)));
}

fn bench_deeply_nested_expression(c: &mut Criterion) {
    let source = deeply_nested_expression();
    c.bench_function("deeply_nested_expression", move |b| b.iter(|| parse_source(&source)));
}

criterion_group!(benches, bench_small_class, bench_medium_class, bench_deeply_nested_expression);
criterion_main!(benches);
