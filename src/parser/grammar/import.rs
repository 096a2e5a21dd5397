//! `import` declarations: plain, static, wildcard, and module imports
//! (spec.md §3.5's `ImportAttribute`, SPEC_FULL.md's module-import addition).

use crate::arena::{ImportAttribute, NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::strategy::Feature;
use crate::token::TokenKind;

use super::package::qualified_name_text;

/// `import [static] a.b.C[.*];` or, from version 25, `import module M;`.
pub(crate) fn import_declaration(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `import`

    if is_module_import(p) {
        return module_import_declaration(p, start);
    }

    let is_static = if p.at(TokenKind::Static) {
        p.bump();
        true
    } else {
        false
    };

    let (mut name, _) = qualified_name_text(p, p.current_start());
    if p.at(TokenKind::Dot) && p.peek_nth(1) == TokenKind::Star {
        p.bump(); // `.`
        p.bump(); // `*`
        name.push_str(".*");
    }
    p.expect(TokenKind::Semicolon, "`;` after import declaration");
    let end = p.current_start();

    let kind = if is_static {
        NodeKind::StaticImportDeclaration
    } else {
        NodeKind::ImportDeclaration
    };
    p.alloc_with_attr(
        kind,
        start,
        end,
        ImportAttribute {
            qualified_name: name.into(),
            is_static,
        },
    )
}

/// `module` is a contextual keyword, lexed as `Identifier`; an import of a
/// module is recognized by `import module <name>;` specifically.
fn is_module_import(p: &ParserCore) -> bool {
    p.at(TokenKind::Identifier) && p.peek_nth(1) == TokenKind::Identifier
}

fn module_import_declaration(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    if !p.feature_enabled(Feature::ModuleImportDeclaration) {
        p.error("module import declarations are not available at this language version");
    }
    p.bump(); // `module`
    let (name, _) = qualified_name_text(p, p.current_start());
    p.expect(TokenKind::Semicolon, "`;` after module import declaration");
    let end = p.current_start();

    p.alloc_with_attr(
        NodeKind::ModuleImportDeclaration,
        start,
        end,
        ImportAttribute {
            qualified_name: name.into(),
            is_static: false,
        },
    )
}
