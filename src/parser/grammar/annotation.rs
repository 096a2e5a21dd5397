//! Annotations: `@Name`, `@Name(value)`, `@Name(a = 1, b = 2)` (spec.md §4.4).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::expression::expression;
use super::package::qualified_name_text;

pub(crate) fn annotation(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `@`
    let (_, name_end) = qualified_name_text(p, p.current_start());
    let name = p.alloc(NodeKind::QualifiedName, start + 1, name_end)?;
    let mut children = vec![name];

    if p.at(TokenKind::LParen) {
        children.push(annotation_argument_list(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::Annotation, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn annotation_argument_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `(`
    let mut args = Vec::new();

    if !p.at(TokenKind::RParen) {
        loop {
            args.push(annotation_argument(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close annotation arguments");

    let end = p.current_start();
    let node = p.alloc(NodeKind::AnnotationArgumentList, start, end)?;
    p.attach_children(node, &args)?;
    Ok(node)
}

/// `name = value` or a bare `value` (the implicit `value` element shorthand).
fn annotation_argument(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let mut children = Vec::new();

    if p.at(TokenKind::Identifier) && p.peek_nth(1) == TokenKind::Assign {
        let name_tok = p.bump();
        children.push(p.alloc(NodeKind::Identifier, name_tok.start, name_tok.end)?);
        p.bump(); // `=`
    }
    children.push(annotation_value(p)?);

    let end = p.current_start();
    let node = p.alloc(NodeKind::AnnotationArgument, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

/// An annotation element value: a nested annotation, an `{ ... }` array of
/// values, or an ordinary (constant) expression.
pub(crate) fn annotation_value(p: &mut ParserCore) -> PResult<NodeId> {
    if p.at(TokenKind::At) {
        return annotation(p);
    }
    if p.at(TokenKind::LBrace) {
        let start = p.current_start();
        p.bump();
        let mut elements = Vec::new();
        if !p.at(TokenKind::RBrace) {
            loop {
                elements.push(annotation_value(p)?);
                if p.at(TokenKind::Comma) {
                    p.bump();
                    continue;
                }
                break;
            }
        }
        p.expect(TokenKind::RBrace, "`}` to close annotation array value");
        let end = p.current_start();
        let node = p.alloc(NodeKind::ArrayInitializer, start, end)?;
        p.attach_children(node, &elements)?;
        return Ok(node);
    }
    expression(p)
}
