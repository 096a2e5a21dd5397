//! Module declarations: `[open] module M { requires ...; exports ...; }`
//! (spec.md §4.4's module import addition, SPEC_FULL.md §6.5). `module`,
//! `requires`, `exports`, `opens`, `uses`, `provides`, `with`, `to`,
//! `transitive`, and `open` are all contextual keywords, lexed as plain
//! identifiers and recognized here by spelling.

use crate::arena::{NodeId, NodeKind, PackageAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::package::qualified_name_text;

fn text_at(p: &ParserCore, n: usize, expected: &str) -> bool {
    p.nth_token(n)
        .map(|t| p.token_text(t).as_ref() == expected)
        .unwrap_or(false)
}

/// Whether a (possibly `open`) module declaration starts here. Only called
/// at the top of a compilation unit, where an identifier in this position
/// can't mean anything else.
pub(crate) fn is_module_declaration_start(p: &ParserCore) -> bool {
    if p.at(TokenKind::Identifier) && text_at(p, 0, "module") && matches!(p.peek_nth(1), TokenKind::Identifier) {
        return true;
    }
    p.at(TokenKind::Identifier)
        && text_at(p, 0, "open")
        && matches!(p.peek_nth(1), TokenKind::Identifier)
        && text_at(p, 1, "module")
        && matches!(p.peek_nth(2), TokenKind::Identifier)
}

pub(crate) fn module_declaration(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    if text_at(p, 0, "open") {
        p.bump(); // `open`
    }
    p.bump(); // `module`

    let (name, _) = qualified_name_text(p, p.current_start());
    p.expect(TokenKind::LBrace, "`{` to open a module body");

    let mut directives = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        let before = p.current_start();
        directives.push(module_directive(p)?);
        if p.current_start() == before {
            p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
            if p.at(TokenKind::Semicolon) {
                p.bump();
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}` to close a module body");

    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::ModuleDeclaration,
        start,
        end,
        PackageAttribute {
            qualified_name: name.into(),
        },
    )?;
    p.attach_children(node, &directives)?;
    Ok(node)
}

fn module_directive(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    if text_at(p, 0, "requires") {
        return requires_directive(p, start);
    }
    if text_at(p, 0, "exports") {
        return exports_or_opens_directive(p, start, true);
    }
    if text_at(p, 0, "opens") {
        return exports_or_opens_directive(p, start, false);
    }
    if text_at(p, 0, "uses") {
        return uses_directive(p, start);
    }
    if text_at(p, 0, "provides") {
        return provides_directive(p, start);
    }

    p.error(format!("expected a module directive, found {:?}", p.peek()));
    p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
    if p.at(TokenKind::Semicolon) {
        p.bump();
    }
    p.alloc(NodeKind::Error, start, p.current_start())
}

fn requires_directive(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    p.bump(); // `requires`
    loop {
        if p.at(TokenKind::Static) || text_at(p, 0, "transitive") {
            p.bump();
            continue;
        }
        break;
    }
    let (name, _) = qualified_name_text(p, p.current_start());
    p.expect(TokenKind::Semicolon, "`;` after a requires directive");
    let end = p.current_start();
    p.alloc_with_attr(
        NodeKind::ModuleRequiresDirective,
        start,
        end,
        PackageAttribute {
            qualified_name: name.into(),
        },
    )
}

fn exports_or_opens_directive(p: &mut ParserCore, start: u32, is_exports: bool) -> PResult<NodeId> {
    p.bump(); // `exports` / `opens`
    let (name, _) = qualified_name_text(p, p.current_start());

    let mut targets = Vec::new();
    if text_at(p, 0, "to") {
        p.bump();
        loop {
            targets.push(qualified_name_node(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::Semicolon, "`;` after a module directive");
    let end = p.current_start();

    let kind = if is_exports {
        NodeKind::ModuleExportsDirective
    } else {
        NodeKind::ModuleOpensDirective
    };
    let node = p.alloc_with_attr(
        kind,
        start,
        end,
        PackageAttribute {
            qualified_name: name.into(),
        },
    )?;
    p.attach_children(node, &targets)?;
    Ok(node)
}

fn uses_directive(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    p.bump(); // `uses`
    let (name, _) = qualified_name_text(p, p.current_start());
    p.expect(TokenKind::Semicolon, "`;` after a uses directive");
    let end = p.current_start();
    p.alloc_with_attr(
        NodeKind::ModuleUsesDirective,
        start,
        end,
        PackageAttribute {
            qualified_name: name.into(),
        },
    )
}

fn provides_directive(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    p.bump(); // `provides`
    let (name, _) = qualified_name_text(p, p.current_start());

    let mut implementations = Vec::new();
    if text_at(p, 0, "with") {
        p.bump();
        loop {
            implementations.push(qualified_name_node(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    } else {
        p.error("expected `with` in a provides directive".to_string());
    }
    p.expect(TokenKind::Semicolon, "`;` after a provides directive");
    let end = p.current_start();

    let node = p.alloc_with_attr(
        NodeKind::ModuleProvidesDirective,
        start,
        end,
        PackageAttribute {
            qualified_name: name.into(),
        },
    )?;
    p.attach_children(node, &implementations)?;
    Ok(node)
}

fn qualified_name_node(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let (_, end) = qualified_name_text(p, start);
    p.alloc(NodeKind::QualifiedName, start, end)
}
