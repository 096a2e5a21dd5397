//! `package` declarations (spec.md §3.5's `PackageAttribute`, §4.4).

use crate::arena::{NodeId, NodeKind, PackageAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

/// `package foo.bar.baz;`.
pub(crate) fn package_declaration(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `package`

    let name_start = p.current_start();
    let (qualified_name, name_end) = qualified_name_text(p, name_start);
    let name_node = p.alloc(NodeKind::QualifiedName, name_start, name_end)?;
    p.expect(TokenKind::Semicolon, "`;` after package declaration");

    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::PackageDeclaration,
        start,
        end,
        PackageAttribute {
            qualified_name: qualified_name.into(),
        },
    )?;
    p.attach_children(node, &[name_node])?;
    Ok(node)
}

/// Consumes a dotted identifier sequence (`a.b.c`) and returns its spelling
/// (re-sliced from `name_start` so escapes in any segment decode correctly)
/// along with the end offset of the last consumed identifier.
pub(crate) fn qualified_name_text(p: &mut ParserCore, name_start: u32) -> (String, u32) {
    let mut end = name_start;
    if let Some(tok) = p.expect(TokenKind::Identifier, "an identifier") {
        end = tok.end;
    }
    while p.at(TokenKind::Dot) && matches!(p.peek_nth(1), TokenKind::Identifier) {
        p.bump(); // `.`
        let tok = p.bump();
        end = tok.end;
    }
    (p.text_span(name_start, end).to_string(), end)
}
