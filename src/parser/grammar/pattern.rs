//! Patterns used by `instanceof` and `switch` (spec.md §4.4, version-gated
//! per SPEC_FULL.md: record deconstruction, unnamed `_` bindings, and
//! primitive type patterns).

use crate::arena::{NodeId, NodeKind, ParameterAttribute};
use crate::parser::{PResult, ParserCore};
use crate::strategy::Feature;
use crate::token::TokenKind;

use super::ty::type_ref;

/// A type pattern (`String s`), a record pattern (`Point(var x, var y)`),
/// or an unnamed pattern (`_`).
pub(crate) fn pattern(p: &mut ParserCore) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = pattern_inner(p);
    p.exit_depth();
    result
}

fn pattern_inner(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    let is_final = if p.at(TokenKind::Final) {
        p.bump();
        true
    } else {
        false
    };

    if p.at(TokenKind::Underscore) {
        if !p.feature_enabled(Feature::UnnamedPattern) {
            p.error("unnamed pattern variables (`_`) are not available at this language version");
        }
        p.bump();
        return p.alloc(NodeKind::UnnamedPattern, start, p.current_start());
    }

    if super::ty::is_primitive_start(p.peek()) && !p.feature_enabled(Feature::PrimitivePattern) {
        p.error("primitive type patterns are not available at this language version");
    }

    let ty = type_ref(p)?;

    if p.at(TokenKind::LParen) {
        return record_pattern(p, ty, start);
    }

    binding_pattern(p, ty, start, is_final)
}

fn binding_pattern(p: &mut ParserCore, ty: NodeId, start: u32, is_final: bool) -> PResult<NodeId> {
    if p.at(TokenKind::Underscore) {
        if !p.feature_enabled(Feature::UnnamedPattern) {
            p.error("unnamed pattern variables (`_`) are not available at this language version");
        }
        p.bump();
        let end = p.current_start();
        let node = p.alloc(NodeKind::TypePattern, start, end)?;
        p.attach_children(node, &[ty])?;
        return Ok(node);
    }

    let name_tok = p.expect(TokenKind::Identifier, "a pattern variable name");
    let end = p.current_start();
    let node = p.alloc_with_attr(
        NodeKind::TypePattern,
        start,
        end,
        ParameterAttribute {
            name: name_tok.map(|t| p.token_text(&t).into_owned()).unwrap_or_default().into(),
            is_varargs: false,
            is_final,
            is_receiver: false,
        },
    )?;
    p.attach_children(node, &[ty])?;
    Ok(node)
}

fn record_pattern(p: &mut ParserCore, ty: NodeId, start: u32) -> PResult<NodeId> {
    p.bump(); // `(`
    let mut components = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            components.push(pattern(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close record pattern components");

    let end = p.current_start();
    let list = p.alloc(NodeKind::RecordPatternComponentList, start, end)?;
    p.attach_children(list, &components)?;

    let node = p.alloc(NodeKind::RecordPattern, start, end)?;
    p.attach_children(node, &[ty, list])?;
    Ok(node)
}
