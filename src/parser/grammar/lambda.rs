//! Lambda expressions: `x -> expr`, `(x, y) -> { ... }`, `() -> expr`
//! (spec.md §4.4).

use crate::arena::{NodeId, NodeKind, ParameterAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::block::block;
use super::expression::expression;
use super::ty::type_ref;

/// Lambdas are ambiguous with a parenthesized expression until the `->` is
/// seen, so this looks ahead for the `identifier ->`, `() ->`, or
/// `(params) ->` shapes without consuming anything.
pub(crate) fn is_lambda_start(p: &ParserCore) -> bool {
    if p.at(TokenKind::Identifier) && p.peek_nth(1) == TokenKind::Arrow {
        return true;
    }
    if !p.at(TokenKind::LParen) {
        return false;
    }
    let mut depth = 0i32;
    let mut i = 0usize;
    loop {
        match p.peek_nth(i) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return p.peek_nth(i + 1) == TokenKind::Arrow;
                }
            }
            TokenKind::Eof => return false,
            _ => {}
        }
        i += 1;
        if i > 128 {
            return false;
        }
    }
}

pub(crate) fn lambda_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let params = lambda_parameter_list(p)?;
    p.expect(TokenKind::Arrow, "`->` in lambda expression");

    let body = if p.at(TokenKind::LBrace) {
        block(p)?
    } else {
        expression(p)?
    };

    let end = p.current_start();
    let node = p.alloc(NodeKind::LambdaExpression, start, end)?;
    p.attach_children(node, &[params, body])?;
    Ok(node)
}

fn lambda_parameter_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    if p.at(TokenKind::Identifier) {
        // Single bare parameter: `x -> ...`.
        let tok = p.bump();
        let param = p.alloc_with_attr(
            NodeKind::ParameterDeclaration,
            tok.start,
            tok.end,
            ParameterAttribute {
                name: p.token_text(&tok).into_owned().into(),
                is_varargs: false,
                is_final: false,
                is_receiver: false,
            },
        )?;
        let list = p.alloc(NodeKind::LambdaParameterList, start, tok.end)?;
        p.attach_children(list, &[param])?;
        return Ok(list);
    }

    p.bump(); // `(`
    let mut params = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            params.push(lambda_parameter(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close lambda parameter list");

    let end = p.current_start();
    let list = p.alloc(NodeKind::LambdaParameterList, start, end)?;
    p.attach_children(list, &params)?;
    Ok(list)
}

/// A lambda parameter may be untyped (`x`) or explicitly typed (`Foo x`, or
/// `var x`, where `var` is lexed as an identifier and inferred by the
/// formatter downstream, not this parser).
fn lambda_parameter(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    if p.at(TokenKind::Identifier) && matches!(p.peek_nth(1), TokenKind::Comma | TokenKind::RParen) {
        let tok = p.bump();
        let node = p.alloc_with_attr(
            NodeKind::ParameterDeclaration,
            start,
            tok.end,
            ParameterAttribute {
                name: p.token_text(&tok).into_owned().into(),
                is_varargs: false,
                is_final: false,
                is_receiver: false,
            },
        )?;
        return Ok(node);
    }

    let ty = type_ref(p)?;
    let name_tok = p.expect(TokenKind::Identifier, "a lambda parameter name");
    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::ParameterDeclaration,
        start,
        end,
        ParameterAttribute {
            name: name_tok
                .map(|t| p.token_text(&t).into_owned())
                .unwrap_or_default()
                .into(),
            is_varargs: false,
            is_final: false,
            is_receiver: false,
        },
    )?;
    p.attach_children(node, &[ty])?;
    Ok(node)
}
