//! Modifier lists (`public`, `static`, `final`, annotations, ...) shared by
//! type declarations, members, and parameters (spec.md §4.4).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::annotation::annotation;

fn is_modifier_keyword(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Public
            | TokenKind::Private
            | TokenKind::Protected
            | TokenKind::Static
            | TokenKind::Final
            | TokenKind::Abstract
            | TokenKind::Native
            | TokenKind::Synchronized
            | TokenKind::Transient
            | TokenKind::Volatile
            | TokenKind::Strictfp
            | TokenKind::Default
    )
}

/// Parses zero or more modifiers (plain keywords, `sealed`/`non-sealed`, or
/// annotations) and returns one `Modifiers` node spanning them, even when
/// empty, so callers always have a uniform child to attach, alongside
/// whether `final` was among them (callers that build a sibling
/// `ParameterAttribute` need this to report `is_final` truthfully instead
/// of hardcoding it).
pub(crate) fn modifiers(p: &mut ParserCore) -> PResult<(NodeId, bool)> {
    let start = p.current_start();
    let mut children = Vec::new();
    let mut has_final = false;

    loop {
        if p.at(TokenKind::At) && p.peek_nth(1) != TokenKind::Interface {
            children.push(annotation(p)?);
            continue;
        }
        if is_modifier_keyword(p.peek()) {
            if p.at(TokenKind::Final) {
                has_final = true;
            }
            let tok = p.bump();
            children.push(p.alloc(NodeKind::Identifier, tok.start, tok.end)?);
            continue;
        }
        if peek_sealed_modifier(p) {
            children.push(consume_sealed_modifier(p)?);
            continue;
        }
        break;
    }

    let end = children
        .last()
        .map(|_| p.current_start())
        .unwrap_or(start);
    let node = p.alloc(NodeKind::Modifiers, start, end)?;
    p.attach_children(node, &children)?;
    Ok((node, has_final))
}

fn consume_sealed_modifier(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `sealed` or `non`
    if p.at(TokenKind::Minus) {
        p.bump(); // `-`
        p.bump(); // `sealed`
    }
    p.alloc(NodeKind::Identifier, start, p.current_start())
}

/// True if a "sealed" or "non-sealed" contextual modifier starts here
/// (version 17+). Both lex as plain identifiers (`non-sealed` is three
/// tokens: `non`, `-`, `sealed`), so this peeks spellings across tokens
/// rather than matching a single `TokenKind`.
pub(crate) fn peek_sealed_modifier(p: &ParserCore) -> bool {
    if !p.at(TokenKind::Identifier) {
        return false;
    }
    let token = p.current_token().clone();
    if p.token_text(&token).as_ref() == "sealed" {
        return true;
    }
    p.token_text(&token).as_ref() == "non"
        && p.peek_nth(1) == TokenKind::Minus
        && p.peek_nth(2) == TokenKind::Identifier
}
