//! The top of the tree: an optional package declaration, imports, and then
//! either a module declaration or the file's type declarations (spec.md
//! §4.4, §6.5). From version 25, a file needs no enclosing type declaration
//! at all — top-level fields/methods are implicitly wrapped by the
//! compiler into an unnamed class (SPEC_FULL.md's compact source files).

use crate::arena::NodeId;
use crate::arena::NodeKind;
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::import::import_declaration;
use super::member::member_after_modifiers;
use super::modifiers::modifiers;
use super::module_decl;
use super::package::package_declaration;
use super::type_decl;

pub(crate) fn compilation_unit(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let mut children = Vec::new();

    if p.at(TokenKind::Package) {
        children.push(package_declaration(p)?);
    }

    while p.at(TokenKind::Import) {
        children.push(import_declaration(p)?);
    }

    if module_decl::is_module_declaration_start(p) {
        let mod_start = p.current_start();
        children.push(module_decl::module_declaration(p, mod_start)?);
        let end = p.current_start();
        let node = p.alloc(NodeKind::CompilationUnit, start, end)?;
        p.attach_children(node, &children)?;
        return Ok(node);
    }

    while !p.at_end() {
        if p.at(TokenKind::Semicolon) {
            p.bump(); // a stray top-level `;` is legal and carries no meaning
            continue;
        }

        let before = p.current_start();
        let decl_start = p.current_start();
        let (mods, is_final) = modifiers(p)?;

        if type_decl::is_type_declaration_start(p) {
            children.push(type_decl::type_declaration(p, mods, decl_start)?);
        } else if p.feature_enabled(crate::strategy::Feature::CompactSourceFile) {
            children.push(member_after_modifiers(p, mods, is_final, decl_start, false)?);
        } else {
            p.error(format!("expected a type declaration, found {:?}", p.peek()));
            p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
            if p.at(TokenKind::Semicolon) {
                p.bump();
            }
        }

        // A production that consumed nothing would spin forever; force
        // progress past whatever confused it.
        if p.current_start() == before {
            p.bump();
        }
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::CompilationUnit, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}
