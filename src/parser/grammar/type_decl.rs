//! Class, interface, enum, record, and annotation-type declarations: their
//! headers (type parameters, extends/implements/permits), enum constants,
//! and record components (spec.md §4.4-§4.5).

use crate::arena::{NodeId, NodeKind, ParameterAttribute, TypeDeclarationAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::{Token, TokenKind};

use super::expression::{anonymous_class_body, argument_list};
use super::member::class_member;
use super::modifiers::modifiers;
use super::ty::{type_parameter_list, type_ref};

/// Whether a type declaration starts here, once the caller has already
/// consumed any leading modifiers. `record` is a contextual keyword, so
/// recognizing it needs a short lookahead past the name to rule out an
/// ordinary method or field called `record`.
pub(crate) fn is_type_declaration_start(p: &ParserCore) -> bool {
    match p.peek() {
        TokenKind::Class | TokenKind::Interface | TokenKind::Enum => true,
        TokenKind::At => p.peek_nth(1) == TokenKind::Interface,
        TokenKind::Identifier => is_record_declaration_start(p),
        _ => false,
    }
}

fn is_record_declaration_start(p: &ParserCore) -> bool {
    if !p.feature_enabled(crate::strategy::Feature::Record) {
        return false;
    }
    if p.token_text(p.current_token()).as_ref() != "record" {
        return false;
    }
    matches!(p.peek_nth(1), TokenKind::Identifier) && matches!(p.peek_nth(2), TokenKind::LParen | TokenKind::Lt)
}

pub(crate) fn type_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = type_declaration_inner(p, mods, start);
    p.exit_depth();
    result
}

fn type_declaration_inner(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    match p.peek() {
        TokenKind::Class => class_declaration(p, mods, start),
        TokenKind::Interface => interface_declaration(p, mods, start),
        TokenKind::Enum => enum_declaration(p, mods, start),
        TokenKind::At => annotation_declaration(p, mods, start),
        _ => record_declaration(p, mods, start),
    }
}

fn class_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `class`
    let name_tok = p.expect(TokenKind::Identifier, "a class name");
    let type_params = if p.at(TokenKind::Lt) { Some(type_parameter_list(p)?) } else { None };

    let mut children = vec![mods];
    children.extend(type_params);

    if p.at(TokenKind::Extends) {
        children.push(extends_single(p)?);
    }
    if p.at(TokenKind::Implements) {
        children.push(implements_clause(p)?);
    }
    if p.feature_enabled(crate::strategy::Feature::SealedType) && peek_permits_keyword(p) {
        children.push(permits_clause(p)?);
    }
    children.extend(type_body(p, false)?);

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::ClassDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn interface_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `interface`
    let name_tok = p.expect(TokenKind::Identifier, "an interface name");
    let type_params = if p.at(TokenKind::Lt) { Some(type_parameter_list(p)?) } else { None };

    let mut children = vec![mods];
    children.extend(type_params);

    if p.at(TokenKind::Extends) {
        children.push(extends_multiple(p)?);
    }
    if p.feature_enabled(crate::strategy::Feature::SealedType) && peek_permits_keyword(p) {
        children.push(permits_clause(p)?);
    }
    children.extend(type_body(p, false)?);

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::InterfaceDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn enum_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `enum`
    let name_tok = p.expect(TokenKind::Identifier, "an enum name");

    let mut children = vec![mods];
    if p.at(TokenKind::Implements) {
        children.push(implements_clause(p)?);
    }

    p.expect(TokenKind::LBrace, "`{` to open an enum body");
    children.push(enum_constant_list(p)?);

    if p.at(TokenKind::Semicolon) {
        p.bump();
        while !p.at(TokenKind::RBrace) && !p.at_end() {
            let before = p.current_start();
            children.push(class_member(p, false)?);
            if p.current_start() == before {
                p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
                if p.at(TokenKind::Semicolon) {
                    p.bump();
                }
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}` to close an enum body");

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::EnumDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn enum_constant_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let mut constants = Vec::new();

    if !p.at(TokenKind::Semicolon) && !p.at(TokenKind::RBrace) {
        loop {
            constants.push(enum_constant(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                if p.at(TokenKind::Semicolon) || p.at(TokenKind::RBrace) {
                    break; // trailing comma before `;`/`}`
                }
                continue;
            }
            break;
        }
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::EnumConstantList, start, end)?;
    p.attach_children(node, &constants)?;
    Ok(node)
}

fn enum_constant(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let (mods, _is_final) = modifiers(p)?; // annotations only; no access modifiers apply here
    let name_tok = p.expect(TokenKind::Identifier, "an enum constant name");

    let mut children = vec![mods];
    if p.at(TokenKind::LParen) {
        children.push(argument_list(p)?);
    }
    if p.at(TokenKind::LBrace) {
        children.push(anonymous_class_body(p)?);
    }

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::EnumConstantDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn record_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `record`
    let name_tok = p.bump(); // name; already confirmed by is_record_declaration_start
    let type_params = if p.at(TokenKind::Lt) { Some(type_parameter_list(p)?) } else { None };
    let header = record_header(p)?;

    let mut children = vec![mods];
    children.extend(type_params);
    children.push(header);

    if p.at(TokenKind::Implements) {
        children.push(implements_clause(p)?);
    }
    children.extend(type_body(p, false)?);

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::RecordDeclaration, start, end, name_attribute(p, &Some(name_tok)))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn record_header(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::LParen, "`(` to open a record header");
    let mut components = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            components.push(record_component(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close a record header");

    let end = p.current_start();
    let node = p.alloc(NodeKind::RecordHeader, start, end)?;
    p.attach_children(node, &components)?;
    Ok(node)
}

fn record_component(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let (mods, is_final) = modifiers(p)?; // annotations on a record component
    let ty = type_ref(p)?;
    let is_varargs = if p.at(TokenKind::Ellipsis) {
        p.bump();
        true
    } else {
        false
    };
    let name_tok = p.expect(TokenKind::Identifier, "a record component name");

    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::RecordComponent,
        start,
        end,
        ParameterAttribute {
            name: name_tok.map(|t| p.token_text(&t).into_owned()).unwrap_or_default().into(),
            is_varargs,
            is_final,
            is_receiver: false,
        },
    )?;
    p.attach_children(node, &[mods, ty])?;
    Ok(node)
}

fn annotation_declaration(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `@`
    p.bump(); // `interface`
    let name_tok = p.expect(TokenKind::Identifier, "an annotation type name");

    let mut children = vec![mods];
    children.extend(type_body(p, true)?);

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::AnnotationDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

/// `{ member* }`. Not a node kind of its own: members attach directly to
/// the enclosing type declaration.
fn type_body(p: &mut ParserCore, in_annotation_type: bool) -> PResult<Vec<NodeId>> {
    p.expect(TokenKind::LBrace, "`{` to open a type body");
    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        let before = p.current_start();
        members.push(class_member(p, in_annotation_type)?);
        if p.current_start() == before {
            p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
            if p.at(TokenKind::Semicolon) {
                p.bump();
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}` to close a type body");
    Ok(members)
}

fn extends_single(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `extends`
    let ty = type_ref(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::ExtendsClause, start, end)?;
    p.attach_children(node, &[ty])?;
    Ok(node)
}

/// An interface may extend more than one superinterface.
fn extends_multiple(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `extends`
    let mut types = vec![type_ref(p)?];
    while p.at(TokenKind::Comma) {
        p.bump();
        types.push(type_ref(p)?);
    }
    let end = p.current_start();
    let node = p.alloc(NodeKind::ExtendsClause, start, end)?;
    p.attach_children(node, &types)?;
    Ok(node)
}

fn implements_clause(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `implements`
    let mut types = vec![type_ref(p)?];
    while p.at(TokenKind::Comma) {
        p.bump();
        types.push(type_ref(p)?);
    }
    let end = p.current_start();
    let node = p.alloc(NodeKind::ImplementsClause, start, end)?;
    p.attach_children(node, &types)?;
    Ok(node)
}

/// `permits` is a contextual keyword (version 17+ sealed types), so this
/// peeks the spelling rather than matching a dedicated `TokenKind`.
fn peek_permits_keyword(p: &ParserCore) -> bool {
    p.at(TokenKind::Identifier) && p.token_text(p.current_token()).as_ref() == "permits"
}

fn permits_clause(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `permits`
    let mut types = vec![type_ref(p)?];
    while p.at(TokenKind::Comma) {
        p.bump();
        types.push(type_ref(p)?);
    }
    let end = p.current_start();
    let node = p.alloc(NodeKind::PermitsClause, start, end)?;
    p.attach_children(node, &types)?;
    Ok(node)
}

fn name_attribute(p: &ParserCore, name_tok: &Option<Token>) -> TypeDeclarationAttribute {
    TypeDeclarationAttribute {
        name: name_tok
            .as_ref()
            .map(|t| p.token_text(t).into_owned())
            .unwrap_or_default()
            .into(),
    }
}
