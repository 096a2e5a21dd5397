//! Constructor declarations.
//!
//! The body is an ordinary statement sequence: whether code may precede the
//! explicit `this(...)`/`super(...)` call (the flexible constructor
//! prologue, version 25+) is a legality concern about what that code is
//! allowed to reference, not a different grammar shape, so it isn't
//! enforced here. `this(...)` and `super(...)` themselves parse as ordinary
//! unqualified calls (see `expression::maybe_unqualified_call`).

use crate::arena::{NodeId, NodeKind, ParameterAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::block::block;
use super::modifiers::modifiers;
use super::ty::type_ref;

/// Parses a constructor once the caller has confirmed `Identifier (` is
/// ahead (no return type, so it can't be a method).
pub(crate) fn constructor_declaration(
    p: &mut ParserCore,
    leading_modifiers: NodeId,
    start: u32,
) -> PResult<NodeId> {
    let name_tok = p.bump(); // constructor name (matches the enclosing type)
    let params = parameter_list(p)?;

    let mut children = vec![leading_modifiers, params];

    if p.at(TokenKind::Throws) {
        children.push(throws_clause(p)?);
    }

    children.push(block(p)?);

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
    p.attach_children(node, &children)?;
    Ok(node)
}

pub(crate) fn parameter_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::LParen, "`(` to open parameter list");
    let mut params = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            params.push(parameter(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close parameter list");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ParameterList, start, end)?;
    p.attach_children(node, &params)?;
    Ok(node)
}

fn parameter(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let (mods, is_final) = modifiers(p)?;
    let ty = type_ref(p)?;

    let is_varargs = if p.at(TokenKind::Ellipsis) {
        p.bump();
        true
    } else {
        false
    };

    let is_receiver = p.at(TokenKind::This);
    let name_tok = if is_receiver {
        p.bump();
        None
    } else {
        p.expect(TokenKind::Identifier, "a parameter name")
    };

    while p.at(TokenKind::LBracket) && p.peek_nth(1) == TokenKind::RBracket {
        p.bump();
        p.bump();
    }

    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::ParameterDeclaration,
        start,
        end,
        ParameterAttribute {
            name: name_tok
                .map(|t| p.token_text(&t).into_owned())
                .unwrap_or_else(|| "this".to_string())
                .into(),
            is_varargs,
            is_final,
            is_receiver,
        },
    )?;
    p.attach_children(node, &[mods, ty])?;
    Ok(node)
}

pub(crate) fn throws_clause(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `throws`
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
