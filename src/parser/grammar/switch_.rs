//! `switch` as both a statement and an expression, with the classic
//! colon-labeled form and the modern arrow form (spec.md §4.4,
//! version-gated pattern labels per SPEC_FULL.md).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::strategy::Feature;
use crate::token::TokenKind;

use super::block::block;
use super::expression::expression;
use super::pattern::pattern;
use super::statement::statement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SwitchForm {
    Statement,
    Expression,
}

pub(crate) fn switch_expression_or_statement(p: &mut ParserCore, form: SwitchForm) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = switch_inner(p, form);
    p.exit_depth();
    result
}

fn switch_inner(p: &mut ParserCore, form: SwitchForm) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `switch`
    p.expect(TokenKind::LParen, "`(` after `switch`");
    let selector = expression(p)?;
    p.expect(TokenKind::RParen, "`)` after `switch` selector");

    let body = switch_block(p)?;

    let end = p.current_start();
    let kind = match form {
        SwitchForm::Statement => NodeKind::SwitchStatement,
        SwitchForm::Expression => NodeKind::SwitchExpression,
    };
    let node = p.alloc(kind, start, end)?;
    p.attach_children(node, &[selector, body])?;
    Ok(node)
}

fn switch_block(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::LBrace, "`{` to open `switch` body");

    let mut rules = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        rules.push(switch_rule(p)?);
    }
    p.expect(TokenKind::RBrace, "`}` to close `switch` body");

    let end = p.current_start();
    let node = p.alloc(NodeKind::SwitchBlock, start, end)?;
    p.attach_children(node, &rules)?;
    Ok(node)
}

/// One `case ...:`/`case ... ->` group (or `default`), including its guard
/// (`when`, a contextual keyword) and body.
fn switch_rule(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let label = switch_label(p)?;

    if p.at(TokenKind::Arrow) {
        p.bump();
        let body = if p.at(TokenKind::LBrace) {
            block(p)?
        } else if p.at(TokenKind::Throw) {
            throw_as_switch_body(p)?
        } else {
            let value = expression(p)?;
            p.expect(TokenKind::Semicolon, "`;` after `case ... ->` expression");
            value
        };
        let end = p.current_start();
        let node = p.alloc(NodeKind::SwitchRuleArrow, start, end)?;
        p.attach_children(node, &[label, body])?;
        return Ok(node);
    }

    p.expect(TokenKind::Colon, "`:` after `case`/`default`");
    let mut statements = Vec::new();
    while !matches!(p.peek(), TokenKind::Case | TokenKind::Default | TokenKind::RBrace) && !p.at_end() {
        statements.push(statement(p)?);
    }
    let end = p.current_start();
    let node = p.alloc(NodeKind::SwitchRuleColon, start, end)?;
    let mut children = vec![label];
    children.extend(statements);
    p.attach_children(node, &children)?;
    Ok(node)
}

fn throw_as_switch_body(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `throw`
    let value = expression(p)?;
    p.expect(TokenKind::Semicolon, "`;` after `throw` in switch rule");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ThrowStatement, start, end)?;
    p.attach_children(node, &[value])?;
    Ok(node)
}

/// `case <pattern or expr list>[ when guard]` or `default`.
fn switch_label(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    if p.at(TokenKind::Default) {
        p.bump();
        return p.alloc(NodeKind::SwitchLabel, start, p.current_start());
    }

    p.expect(TokenKind::Case, "`case` or `default`");
    let mut children = Vec::new();

    if p.at(TokenKind::NullLiteral) {
        let tok = p.bump();
        children.push(p.alloc(NodeKind::NullLiteral, tok.start, tok.end)?);
    } else if looks_like_pattern_label(p) {
        if !p.feature_enabled(Feature::PatternMatchingSwitch) {
            p.error("pattern labels in `switch` are not available at this language version");
        }
        children.push(pattern(p)?);
    } else {
        children.push(expression(p)?);
        while p.at(TokenKind::Comma) {
            p.bump();
            children.push(expression(p)?);
        }
    }

    if is_when_guard(p) {
        p.bump(); // `when`
        children.push(expression(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::SwitchLabel, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

/// A case label is a type pattern when it starts with a type name followed
/// by a binding identifier (or `(` for a record pattern), rather than a
/// plain constant expression.
fn looks_like_pattern_label(p: &ParserCore) -> bool {
    if super::ty::is_primitive_start(p.peek()) {
        return true;
    }
    if !p.at(TokenKind::Identifier) {
        return false;
    }
    let mut i = 1usize;
    while p.peek_nth(i) == TokenKind::Dot && p.peek_nth(i + 1) == TokenKind::Identifier {
        i += 2;
    }
    matches!(p.peek_nth(i), TokenKind::Identifier | TokenKind::LParen)
}

fn is_when_guard(p: &ParserCore) -> bool {
    if !p.at(TokenKind::Identifier) {
        return false;
    }
    let token = p.current_token().clone();
    p.token_text(&token).as_ref() == "when"
}
