//! Type references: primitive, reference/qualified, parameterized with
//! diamond, wildcard, array, union, and intersection types (spec.md §4.4).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

/// Whether `kind` can start a primitive type (used by the cast/class-literal
/// disambiguation in `expression.rs`).
pub(crate) fn is_primitive_start(kind: TokenKind) -> bool {
    is_primitive_keyword(kind)
}

fn is_primitive_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Boolean
            | TokenKind::Byte
            | TokenKind::Short
            | TokenKind::Int
            | TokenKind::Long
            | TokenKind::Char
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Void
    )
}

/// Entry point for a type reference, including trailing `[]` array
/// suffixes and `T1 & T2` intersection types (cast-expression context).
pub(crate) fn type_ref(p: &mut ParserCore) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = type_ref_inner(p);
    p.exit_depth();
    result
}

fn type_ref_inner(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let mut node = if is_primitive_keyword(p.peek()) {
        p.bump();
        p.alloc(NodeKind::PrimitiveType, start, p.current_start())?
    } else {
        reference_type(p)?
    };

    node = array_suffix(p, node, start)?;

    if p.at(TokenKind::Amp) {
        let mut members = vec![node];
        while p.at(TokenKind::Amp) {
            p.bump();
            members.push(type_ref(p)?);
        }
        let end = p.current_start();
        let intersection = p.alloc(NodeKind::IntersectionType, start, end)?;
        p.attach_children(intersection, &members)?;
        node = intersection;
    }

    Ok(node)
}

fn array_suffix(p: &mut ParserCore, mut element: NodeId, start: u32) -> PResult<NodeId> {
    while p.at(TokenKind::LBracket) && p.peek_nth(1) == TokenKind::RBracket {
        p.bump();
        p.bump();
        let end = p.current_start();
        let array = p.alloc(NodeKind::ArrayType, start, end)?;
        p.attach_children(array, &[element])?;
        element = array;
    }
    Ok(element)
}

/// `Foo`, `pkg.Foo`, `Foo<Bar>`, `Foo<>` (diamond), `List<? extends Foo>`.
fn reference_type(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::Identifier, "a type name");
    let mut node = p.alloc(NodeKind::ReferenceType, start, p.current_start())?;

    while p.at(TokenKind::Dot) && p.peek_nth(1) == TokenKind::Identifier {
        p.bump();
        p.bump();
        let end = p.current_start();
        let qualified = p.alloc(NodeKind::QualifiedType, start, end)?;
        p.attach_children(qualified, &[node])?;
        node = qualified;
    }

    if p.at(TokenKind::Lt) {
        node = type_argument_list(p, node, start)?;
    }

    Ok(node)
}

fn type_argument_list(p: &mut ParserCore, base: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `<`
    let mut args = Vec::new();

    if p.at(TokenKind::Gt) {
        p.bump(); // diamond `<>`
    } else {
        loop {
            args.push(type_argument(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
        close_angle_bracket(p);
    }

    let end = p.current_start();
    let list = p.alloc(NodeKind::TypeArgumentList, start, end)?;
    p.attach_children(list, &args)?;

    let param = p.alloc(NodeKind::ParameterizedType, start, end)?;
    p.attach_children(param, &[base, list])?;
    Ok(param)
}

fn type_argument(p: &mut ParserCore) -> PResult<NodeId> {
    if p.at(TokenKind::Question) {
        let start = p.current_start();
        p.bump();
        let mut children = Vec::new();
        if p.at(TokenKind::Extends) || p.at(TokenKind::Super) {
            p.bump();
            children.push(type_ref(p)?);
        }
        let end = p.current_start();
        let node = p.alloc(NodeKind::WildcardType, start, end)?;
        p.attach_children(node, &children)?;
        Ok(node)
    } else {
        type_ref(p)
    }
}

/// `<T, U extends Foo & Bar>` on a type or method declaration. Absent when
/// the declaration isn't generic, in which case callers simply don't call
/// this (there is no empty-list convention needed here, unlike `Modifiers`,
/// since a type/method without type parameters has no node for them at all).
pub(crate) fn type_parameter_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `<`
    let mut params = Vec::new();
    loop {
        params.push(type_parameter(p)?);
        if p.at(TokenKind::Comma) {
            p.bump();
            continue;
        }
        break;
    }
    close_angle_bracket(p);
    let end = p.current_start();
    let node = p.alloc(NodeKind::TypeParameterList, start, end)?;
    p.attach_children(node, &params)?;
    Ok(node)
}

fn type_parameter(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::Identifier, "a type parameter name");
    let mut bounds = Vec::new();
    if p.at(TokenKind::Extends) {
        p.bump();
        bounds.push(type_ref(p)?);
        while p.at(TokenKind::Amp) {
            p.bump();
            bounds.push(type_ref(p)?);
        }
    }
    let end = p.current_start();
    let node = p.alloc(NodeKind::TypeParameter, start, end)?;
    p.attach_children(node, &bounds)?;
    Ok(node)
}

/// `>>>`/`>>`/`>` are lexed as single compound tokens, so closing a nested
/// type argument list (`List<List<T>>`) needs to split one of those tokens
/// across two closes. [`ParserCore::consume_one_closing_angle`] tracks how
/// many `>`s a partially consumed compound token still owes.
fn close_angle_bracket(p: &mut ParserCore) {
    if !p.consume_one_closing_angle() {
        p.error("expected `>` to close type argument list".to_string());
    }
}
