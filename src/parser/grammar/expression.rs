//! Expression parsing via precedence climbing (spec.md §4.4's "standard
//! precedence-climbing/Pratt parser" guidance).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::lambda::{is_lambda_start, lambda_expression};
use super::pattern::pattern;
use super::switch_::{switch_expression_or_statement, SwitchForm};
use super::ty::type_ref;

/// Binding power of a binary operator; higher binds tighter. Mirrors Java's
/// operator precedence table from `*`/`/`/`%` (highest, among binary ops)
/// down to the conditional-or `||`.
fn binary_precedence(kind: TokenKind) -> Option<u8> {
    Some(match kind {
        TokenKind::Star | TokenKind::Slash | TokenKind::Percent => 12,
        TokenKind::Plus | TokenKind::Minus => 11,
        TokenKind::LShift | TokenKind::RShift | TokenKind::URShift => 10,
        TokenKind::Lt | TokenKind::Gt | TokenKind::Le | TokenKind::Ge | TokenKind::Instanceof => 9,
        TokenKind::EqEq | TokenKind::Ne => 8,
        TokenKind::Amp => 7,
        TokenKind::Caret => 6,
        TokenKind::Pipe => 5,
        TokenKind::AndAnd => 4,
        TokenKind::OrOr => 3,
        _ => return None,
    })
}

fn is_assignment_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assign
            | TokenKind::PlusAssign
            | TokenKind::MinusAssign
            | TokenKind::StarAssign
            | TokenKind::SlashAssign
            | TokenKind::AmpAssign
            | TokenKind::PipeAssign
            | TokenKind::CaretAssign
            | TokenKind::PercentAssign
            | TokenKind::LShiftAssign
            | TokenKind::RShiftAssign
            | TokenKind::URShiftAssign
    )
}

pub(crate) fn expression(p: &mut ParserCore) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = assignment_expression(p);
    p.exit_depth();
    result
}

fn assignment_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let lhs = conditional_expression(p)?;

    if is_assignment_operator(p.peek()) {
        p.bump();
        let rhs = assignment_expression(p)?;
        let end = p.current_start();
        let node = p.alloc(NodeKind::AssignmentExpression, start, end)?;
        p.attach_children(node, &[lhs, rhs])?;
        return Ok(node);
    }
    Ok(lhs)
}

/// `cond ? then : else`, right-associative.
fn conditional_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let condition = binary_expression(p, 0)?;

    if p.at(TokenKind::Question) {
        p.bump();
        let then_branch = expression(p)?;
        p.expect(TokenKind::Colon, "`:` in conditional expression");
        let else_branch = conditional_expression(p)?;
        let end = p.current_start();
        let node = p.alloc(NodeKind::ConditionalExpression, start, end)?;
        p.attach_children(node, &[condition, then_branch, else_branch])?;
        return Ok(node);
    }
    Ok(condition)
}

fn binary_expression(p: &mut ParserCore, min_precedence: u8) -> PResult<NodeId> {
    let start = p.current_start();
    let mut lhs = unary_expression(p)?;

    loop {
        let Some(prec) = binary_precedence(p.peek()) else {
            break;
        };
        if prec < min_precedence {
            break;
        }

        if p.at(TokenKind::Instanceof) {
            p.bump();
            let pat = pattern(p)?;
            let end = p.current_start();
            let node = p.alloc(NodeKind::InstanceofExpression, start, end)?;
            p.attach_children(node, &[lhs, pat])?;
            lhs = node;
            continue;
        }

        p.bump();
        let rhs = binary_expression(p, prec + 1)?;
        let end = p.current_start();
        let node = p.alloc(NodeKind::BinaryExpression, start, end)?;
        p.attach_children(node, &[lhs, rhs])?;
        lhs = node;
    }

    Ok(lhs)
}

fn is_unary_prefix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Bang
            | TokenKind::Tilde
            | TokenKind::PlusPlus
            | TokenKind::MinusMinus
    )
}

fn unary_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    if is_unary_prefix_operator(p.peek()) {
        p.bump();
        let operand = unary_expression(p)?;
        let end = p.current_start();
        let node = p.alloc(NodeKind::UnaryExpression, start, end)?;
        p.attach_children(node, &[operand])?;
        return Ok(node);
    }

    if p.at(TokenKind::LParen) && looks_like_cast(p) {
        return cast_expression(p);
    }

    postfix_expression(p)
}

/// `(Type) expr` vs a parenthesized expression: a cast's parenthesized
/// contents is a type, followed by a token that can start a unary
/// expression (spec.md §4.4's cast/parenthesized-expression disambiguation).
fn looks_like_cast(p: &ParserCore) -> bool {
    let mut depth = 0i32;
    let mut i = 0usize;
    loop {
        match p.peek_nth(i) {
            TokenKind::LParen => depth += 1,
            TokenKind::RParen => {
                depth -= 1;
                if depth == 0 {
                    return p.peek_nth(i + 1).is_unary_prefix_start();
                }
            }
            TokenKind::Eof => return false,
            kind if i == 1 => {
                if !(kind == TokenKind::Identifier || super::ty::is_primitive_start(kind)) {
                    return false;
                }
            }
            _ => {}
        }
        i += 1;
        if i > 64 {
            return false;
        }
    }
}

fn cast_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `(`
    let ty = type_ref(p)?;
    p.expect(TokenKind::RParen, "`)` to close cast");
    let operand = unary_expression(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::CastExpression, start, end)?;
    p.attach_children(node, &[ty, operand])?;
    Ok(node)
}

fn postfix_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let mut node = primary_expression(p)?;

    loop {
        node = match p.peek() {
            TokenKind::Dot if p.peek_nth(1) == TokenKind::New => {
                // Qualified object creation: Outer.new Inner(...)
                p.bump();
                object_creation(p, start, Some(node))?
            }
            TokenKind::Dot => {
                p.bump();
                method_call_or_field_access(p, node, start)?
            }
            TokenKind::LBracket => {
                p.bump();
                let index = expression(p)?;
                p.expect(TokenKind::RBracket, "`]` to close array access");
                let end = p.current_start();
                let access = p.alloc(NodeKind::ArrayAccess, start, end)?;
                p.attach_children(access, &[node, index])?;
                access
            }
            TokenKind::ColonColon => {
                p.bump();
                method_reference(p, node, start)?
            }
            TokenKind::PlusPlus | TokenKind::MinusMinus => {
                p.bump();
                let end = p.current_start();
                let postfix = p.alloc(NodeKind::PostfixExpression, start, end)?;
                p.attach_children(postfix, &[node])?;
                postfix
            }
            _ => break,
        };
    }

    Ok(node)
}

/// An unqualified call (`foo(...)`, `this(...)`, `super(...)`, the last two
/// being explicit constructor invocations) has no receiver, so its
/// `MethodInvocation` has only `[callee, args]` rather than the
/// `[receiver, name, args]` shape `method_call_or_field_access` produces.
fn maybe_unqualified_call(p: &mut ParserCore, callee: NodeId, start: u32) -> PResult<NodeId> {
    if !p.at(TokenKind::LParen) {
        return Ok(callee);
    }
    let args = argument_list(p)?;
    let end = p.current_start();
    let call = p.alloc(NodeKind::MethodInvocation, start, end)?;
    p.attach_children(call, &[callee, args])?;
    Ok(call)
}

fn method_call_or_field_access(p: &mut ParserCore, receiver: NodeId, start: u32) -> PResult<NodeId> {
    let name_start = p.current_start();
    let name_tok = p.expect(TokenKind::Identifier, "a member name");
    let name_end = name_tok.map(|t| t.end).unwrap_or(name_start);
    let name = p.alloc(NodeKind::Identifier, name_start, name_end)?;

    if p.at(TokenKind::LParen) {
        let args = argument_list(p)?;
        let end = p.current_start();
        let call = p.alloc(NodeKind::MethodInvocation, start, end)?;
        p.attach_children(call, &[receiver, name, args])?;
        Ok(call)
    } else {
        let end = p.current_start();
        let access = p.alloc(NodeKind::FieldAccess, start, end)?;
        p.attach_children(access, &[receiver, name])?;
        Ok(access)
    }
}

fn method_reference(p: &mut ParserCore, receiver: NodeId, start: u32) -> PResult<NodeId> {
    let name_start = p.current_start();
    let end = if p.at(TokenKind::New) {
        p.bump().end
    } else {
        p.expect(TokenKind::Identifier, "a method reference target")
            .map(|t| t.end)
            .unwrap_or(name_start)
    };
    let name = p.alloc(NodeKind::Identifier, name_start, end)?;
    let node = p.alloc(NodeKind::MethodReference, start, end)?;
    p.attach_children(node, &[receiver, name])?;
    Ok(node)
}

pub(crate) fn argument_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `(`
    let mut args = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            args.push(expression(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close argument list");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ArgumentList, start, end)?;
    p.attach_children(node, &args)?;
    Ok(node)
}

fn primary_expression(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    if is_lambda_start(p) {
        return lambda_expression(p);
    }

    match p.peek() {
        TokenKind::IntegerLiteral => literal(p, NodeKind::IntegerLiteral),
        TokenKind::LongLiteral => literal(p, NodeKind::LongLiteral),
        TokenKind::FloatLiteral => literal(p, NodeKind::FloatLiteral),
        TokenKind::DoubleLiteral => literal(p, NodeKind::DoubleLiteral),
        TokenKind::StringLiteral => literal(p, NodeKind::StringLiteral),
        TokenKind::TextBlock => literal(p, NodeKind::TextBlockLiteral),
        TokenKind::CharLiteral => literal(p, NodeKind::CharLiteral),
        TokenKind::BooleanLiteral => literal(p, NodeKind::BooleanLiteral),
        TokenKind::NullLiteral => literal(p, NodeKind::NullLiteral),
        TokenKind::This => {
            p.bump();
            let node = p.alloc(NodeKind::ThisExpression, start, p.current_start())?;
            maybe_unqualified_call(p, node, start)
        }
        TokenKind::Super => {
            p.bump();
            let node = p.alloc(NodeKind::SuperExpression, start, p.current_start())?;
            maybe_unqualified_call(p, node, start)
        }
        TokenKind::New => object_creation(p, start, None),
        TokenKind::Switch => switch_expression_or_statement(p, SwitchForm::Expression),
        TokenKind::LParen => {
            p.bump();
            let inner = expression(p)?;
            p.expect(TokenKind::RParen, "`)` to close parenthesized expression");
            let end = p.current_start();
            let node = p.alloc(NodeKind::ParenthesizedExpression, start, end)?;
            p.attach_children(node, &[inner])?;
            Ok(node)
        }
        TokenKind::Identifier => {
            if is_class_literal(p) {
                return class_literal(p, start);
            }
            p.bump();
            let node = p.alloc(NodeKind::Identifier, start, p.current_start())?;
            maybe_unqualified_call(p, node, start)
        }
        _ if super::ty::is_primitive_start(p.peek()) && p.peek_nth(1) == TokenKind::Dot => {
            class_literal(p, start)
        }
        _ => {
            p.error(format!("expected an expression, found {:?}", p.peek()));
            p.bump();
            p.alloc(NodeKind::Error, start, p.current_start())
        }
    }
}

fn literal(p: &mut ParserCore, kind: NodeKind) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump();
    p.alloc(kind, start, p.current_start())
}

/// `Foo.class`, `int.class`: an identifier or primitive type followed by
/// `.class`.
fn is_class_literal(p: &ParserCore) -> bool {
    p.peek_nth(1) == TokenKind::Dot && p.peek_nth(2) == TokenKind::Class
}

fn class_literal(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    p.bump(); // type name
    p.bump(); // `.`
    p.bump(); // `class`
    p.alloc(NodeKind::ClassLiteral, start, p.current_start())
}

fn object_creation(p: &mut ParserCore, start: u32, qualifier: Option<NodeId>) -> PResult<NodeId> {
    p.bump(); // `new`
    let ty = type_ref(p)?;

    if p.at(TokenKind::LBracket) {
        return array_creation(p, ty, start);
    }

    let args = argument_list(p)?;
    let mut children = Vec::new();
    children.extend(qualifier);
    children.push(ty);
    children.push(args);

    if p.at(TokenKind::LBrace) {
        children.push(anonymous_class_body(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::ObjectCreation, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn array_creation(p: &mut ParserCore, ty: NodeId, start: u32) -> PResult<NodeId> {
    let mut dimensions = Vec::new();
    while p.at(TokenKind::LBracket) {
        p.bump();
        if p.at(TokenKind::RBracket) {
            p.bump();
        } else {
            dimensions.push(expression(p)?);
            p.expect(TokenKind::RBracket, "`]` in array creation");
        }
    }

    let mut children = vec![ty];
    children.extend(dimensions);

    if p.at(TokenKind::LBrace) {
        children.push(array_initializer(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::ArrayCreation, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

pub(crate) fn array_initializer(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `{`
    let mut elements = Vec::new();
    if !p.at(TokenKind::RBrace) {
        loop {
            if p.at(TokenKind::LBrace) {
                elements.push(array_initializer(p)?);
            } else {
                elements.push(expression(p)?);
            }
            if p.at(TokenKind::Comma) {
                p.bump();
                if p.at(TokenKind::RBrace) {
                    break;
                }
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RBrace, "`}` to close array initializer");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ArrayInitializer, start, end)?;
    p.attach_children(node, &elements)?;
    Ok(node)
}

/// Also used for an enum constant's constant-specific class body, which has
/// identical shape.
pub(crate) fn anonymous_class_body(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `{`
    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        members.push(super::member::class_member(p, false)?);
    }
    p.expect(TokenKind::RBrace, "`}` to close anonymous class body");
    let end = p.current_start();
    let node = p.alloc(NodeKind::AnonymousClassBody, start, end)?;
    p.attach_children(node, &members)?;
    Ok(node)
}
