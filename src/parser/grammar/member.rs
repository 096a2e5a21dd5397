//! Class, interface, enum, record, and annotation-type members: fields,
//! methods, constructors, initializers, and nested type declarations
//! (spec.md §4.4-§4.5).

use crate::arena::{NodeId, NodeKind, ParameterAttribute, TypeDeclarationAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::block::block;
use super::constructor::{constructor_declaration, parameter_list, throws_clause};
use super::modifiers::modifiers;
use super::statement::variable_declarator;
use super::ty::{type_parameter_list, type_ref};

/// `in_annotation_type` distinguishes `Type name();` (an annotation
/// element, which may carry a `default` value) from the identical-looking
/// zero-parameter abstract method signature everywhere else.
pub(crate) fn class_member(p: &mut ParserCore, in_annotation_type: bool) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = class_member_inner(p, in_annotation_type);
    p.exit_depth();
    result
}

fn class_member_inner(p: &mut ParserCore, in_annotation_type: bool) -> PResult<NodeId> {
    let start = p.current_start();

    if p.at(TokenKind::Semicolon) {
        p.bump();
        return p.alloc(NodeKind::EmptyStatement, start, p.current_start());
    }

    if p.at(TokenKind::LBrace) {
        return initializer(p, start, false);
    }
    if p.at(TokenKind::Static) && p.peek_nth(1) == TokenKind::LBrace {
        p.bump(); // `static`
        return initializer(p, start, true);
    }

    let (mods, is_final) = modifiers(p)?;
    member_after_modifiers(p, mods, is_final, start, in_annotation_type)
}

/// The shared tail of member parsing, once any leading modifiers are
/// already consumed. Also the entry point for a compact source file's
/// top-level members (SPEC_FULL.md §4.4), which have no enclosing type
/// declaration to parse modifiers through first. `is_final` reports
/// whether `mods` contains a `final` modifier, so a field's declarators
/// can carry it through to their own `ParameterAttribute`.
pub(crate) fn member_after_modifiers(
    p: &mut ParserCore,
    mods: NodeId,
    is_final: bool,
    start: u32,
    in_annotation_type: bool,
) -> PResult<NodeId> {
    if super::type_decl::is_type_declaration_start(p) {
        return super::type_decl::type_declaration(p, mods, start);
    }

    // Compact record constructor: `Name { ... }`, no parameter list at all.
    if p.at(TokenKind::Identifier) && p.peek_nth(1) == TokenKind::LBrace {
        return compact_constructor(p, mods, start);
    }

    let type_params = if p.at(TokenKind::Lt) {
        Some(type_parameter_list(p)?)
    } else {
        None
    };

    // A constructor has no return type: `Identifier (` immediately.
    if type_params.is_none() && p.at(TokenKind::Identifier) && p.peek_nth(1) == TokenKind::LParen {
        return constructor_declaration(p, mods, start);
    }

    let ty = if p.at(TokenKind::Void) {
        let tok = p.bump();
        p.alloc(NodeKind::PrimitiveType, tok.start, tok.end)?
    } else {
        type_ref(p)?
    };

    let name_tok = p.expect(TokenKind::Identifier, "a member name");

    if p.at(TokenKind::LParen) {
        return method_declaration(p, mods, type_params, ty, name_tok, start, in_annotation_type);
    }

    field_declaration(p, mods, is_final, ty, name_tok, start)
}

fn initializer(p: &mut ParserCore, start: u32, is_static: bool) -> PResult<NodeId> {
    let body = block(p)?;
    let end = p.current_start();
    let kind = if is_static {
        NodeKind::StaticInitializer
    } else {
        NodeKind::InstanceInitializer
    };
    let node = p.alloc(kind, start, end)?;
    p.attach_children(node, &[body])?;
    Ok(node)
}

#[allow(clippy::too_many_arguments)]
fn method_declaration(
    p: &mut ParserCore,
    mods: NodeId,
    type_params: Option<NodeId>,
    return_type: NodeId,
    name_tok: Option<crate::token::Token>,
    start: u32,
    in_annotation_type: bool,
) -> PResult<NodeId> {
    let params = parameter_list(p)?;

    let mut children = vec![mods];
    children.extend(type_params);
    children.push(return_type);
    children.push(params);

    if p.at(TokenKind::Throws) {
        children.push(throws_clause(p)?);
    }

    if in_annotation_type && is_default_value_clause(p) {
        p.bump(); // `default`
        children.push(super::annotation::annotation_value(p)?);
        p.expect(TokenKind::Semicolon, "`;` after annotation element default value");
        let end = p.current_start();
        let node = p.alloc_with_attr(
            NodeKind::AnnotationElementDeclaration,
            start,
            end,
            name_attribute(p, &name_tok),
        )?;
        p.attach_children(node, &children)?;
        return Ok(node);
    }

    if in_annotation_type {
        p.expect(TokenKind::Semicolon, "`;` after annotation element declaration");
        let end = p.current_start();
        let node = p.alloc_with_attr(
            NodeKind::AnnotationElementDeclaration,
            start,
            end,
            name_attribute(p, &name_tok),
        )?;
        p.attach_children(node, &children)?;
        return Ok(node);
    }

    if p.at(TokenKind::Semicolon) {
        p.bump(); // abstract/native/interface method with no body
    } else {
        children.push(block(p)?);
    }

    let end = p.current_start();
    let node = p.alloc_with_attr(NodeKind::MethodDeclaration, start, end, name_attribute(p, &name_tok))?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn is_default_value_clause(p: &ParserCore) -> bool {
    if !p.at(TokenKind::Identifier) {
        return false;
    }
    let token = p.current_token().clone();
    p.token_text(&token).as_ref() == "default"
}

fn field_declaration(
    p: &mut ParserCore,
    mods: NodeId,
    is_final: bool,
    ty: NodeId,
    name_tok: Option<crate::token::Token>,
    start: u32,
) -> PResult<NodeId> {
    let first = field_declarator_from_name(p, name_tok, is_final)?;
    let mut declarators = vec![first];
    while p.at(TokenKind::Comma) {
        p.bump();
        declarators.push(variable_declarator(p, is_final)?);
    }
    p.expect(TokenKind::Semicolon, "`;` after field declaration");

    let end = p.current_start();
    let node = p.alloc(NodeKind::FieldDeclaration, start, end)?;
    let mut children = vec![mods, ty];
    children.extend(declarators);
    p.attach_children(node, &children)?;
    Ok(node)
}

/// The first declarator's name is already consumed (needed earlier to
/// decide field vs method), so this mirrors `variable_declarator` from
/// that point rather than re-parsing the name.
fn field_declarator_from_name(
    p: &mut ParserCore,
    name_tok: Option<crate::token::Token>,
    is_final: bool,
) -> PResult<NodeId> {
    let start = name_tok.as_ref().map(|t| t.start).unwrap_or_else(|| p.current_start());

    while p.at(TokenKind::LBracket) && p.peek_nth(1) == TokenKind::RBracket {
        p.bump();
        p.bump();
    }

    let mut children = Vec::new();
    if p.at(TokenKind::Assign) {
        p.bump();
        if p.at(TokenKind::LBrace) {
            children.push(super::expression::array_initializer(p)?);
        } else {
            children.push(super::expression::expression(p)?);
        }
    }

    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::VariableDeclarator,
        start,
        end,
        ParameterAttribute {
            name: name_tok
                .map(|t| p.token_text(&t).into_owned())
                .unwrap_or_default()
                .into(),
            is_varargs: false,
            is_final,
            is_receiver: false,
        },
    )?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn compact_constructor(p: &mut ParserCore, mods: NodeId, start: u32) -> PResult<NodeId> {
    let name_tok = p.bump(); // record name
    let pos = p.current_start();
    let empty_params = p.alloc(NodeKind::ParameterList, pos, pos)?;
    let body = block(p)?;
    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::ConstructorDeclaration,
        start,
        end,
        ParameterAttribute {
            name: p.token_text(&name_tok).into_owned().into(),
            is_varargs: false,
            is_final: false,
            is_receiver: false,
        },
    )?;
    p.attach_children(node, &[mods, empty_params, body])?;
    Ok(node)
}

fn name_attribute(p: &ParserCore, name_tok: &Option<crate::token::Token>) -> TypeDeclarationAttribute {
    TypeDeclarationAttribute {
        name: name_tok
            .as_ref()
            .map(|t| p.token_text(t).into_owned())
            .unwrap_or_default()
            .into(),
    }
}
