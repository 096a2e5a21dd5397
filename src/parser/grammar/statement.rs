//! Statements (spec.md §4.4): control flow, declarations, and the
//! expression-statement fallback.

use crate::arena::{NodeId, NodeKind, ParameterAttribute};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::block::block;
use super::expression::expression;
use super::modifiers::modifiers;
use super::switch_::{switch_expression_or_statement, SwitchForm};
use super::ty::type_ref;

pub(crate) fn statement(p: &mut ParserCore) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = statement_inner(p);
    p.exit_depth();
    result
}

fn statement_inner(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();

    match p.peek() {
        TokenKind::LBrace => block(p),
        TokenKind::Semicolon => {
            p.bump();
            p.alloc(NodeKind::EmptyStatement, start, p.current_start())
        }
        TokenKind::If => if_statement(p),
        TokenKind::While => while_statement(p),
        TokenKind::Do => do_while_statement(p),
        TokenKind::For => for_statement(p),
        TokenKind::Return => return_statement(p),
        TokenKind::Throw => throw_statement(p),
        TokenKind::Break => jump_statement(p, TokenKind::Break, NodeKind::BreakStatement),
        TokenKind::Continue => jump_statement(p, TokenKind::Continue, NodeKind::ContinueStatement),
        TokenKind::Try => try_statement(p),
        TokenKind::Synchronized => synchronized_statement(p),
        TokenKind::Assert => assert_statement(p),
        TokenKind::Switch => switch_statement(p),
        TokenKind::Identifier if p.peek_nth(1) == TokenKind::Colon => labeled_statement(p),
        _ if is_yield_statement(p) => yield_statement(p),
        _ if looks_like_local_var_decl(p) => local_variable_declaration(p),
        _ => expression_statement(p),
    }
}

fn if_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `if`
    p.expect(TokenKind::LParen, "`(` after `if`");
    let condition = expression(p)?;
    p.expect(TokenKind::RParen, "`)` after `if` condition");
    let then_branch = statement(p)?;

    let mut children = vec![condition, then_branch];
    if p.at(TokenKind::Else) {
        p.bump();
        children.push(statement(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::IfStatement, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn while_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `while`
    p.expect(TokenKind::LParen, "`(` after `while`");
    let condition = expression(p)?;
    p.expect(TokenKind::RParen, "`)` after `while` condition");
    let body = statement(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::WhileStatement, start, end)?;
    p.attach_children(node, &[condition, body])?;
    Ok(node)
}

fn do_while_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `do`
    let body = statement(p)?;
    p.expect(TokenKind::While, "`while` in `do`-`while` statement");
    p.expect(TokenKind::LParen, "`(` after `while`");
    let condition = expression(p)?;
    p.expect(TokenKind::RParen, "`)` after `while` condition");
    p.expect(TokenKind::Semicolon, "`;` after `do`-`while` statement");
    let end = p.current_start();
    let node = p.alloc(NodeKind::DoWhileStatement, start, end)?;
    p.attach_children(node, &[body, condition])?;
    Ok(node)
}

/// Classic `for (init; cond; update)` and enhanced `for (Type x : iterable)`,
/// disambiguated by whether a bare `:` follows a single declared variable.
fn for_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `for`
    p.expect(TokenKind::LParen, "`(` after `for`");

    if looks_like_enhanced_for(p) {
        return enhanced_for_rest(p, start);
    }

    let mut children = Vec::new();
    if !p.at(TokenKind::Semicolon) {
        if looks_like_local_var_decl(p) {
            children.push(local_variable_declaration_no_semi(p)?);
        } else {
            children.push(expression_statement_no_semi(p)?);
        }
    }
    p.expect(TokenKind::Semicolon, "`;` after `for` initializer");

    if !p.at(TokenKind::Semicolon) {
        children.push(expression(p)?);
    }
    p.expect(TokenKind::Semicolon, "`;` after `for` condition");

    if !p.at(TokenKind::RParen) {
        loop {
            children.push(expression(p)?);
            if p.at(TokenKind::Comma) {
                p.bump();
                continue;
            }
            break;
        }
    }
    p.expect(TokenKind::RParen, "`)` to close `for` header");

    children.push(statement(p)?);
    let end = p.current_start();
    let node = p.alloc(NodeKind::ForStatement, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn looks_like_enhanced_for(p: &ParserCore) -> bool {
    let mut depth = 0i32;
    let mut i = 0usize;
    loop {
        match p.peek_nth(i) {
            TokenKind::LBracket | TokenKind::Lt => depth += 1,
            TokenKind::RBracket => depth -= 1,
            TokenKind::Gt if depth > 0 => depth -= 1,
            TokenKind::Colon if depth == 0 => return true,
            TokenKind::Semicolon | TokenKind::Eof if depth <= 0 => return false,
            _ => {}
        }
        i += 1;
        if i > 256 {
            return false;
        }
    }
}

fn enhanced_for_rest(p: &mut ParserCore, start: u32) -> PResult<NodeId> {
    let decl_start = p.current_start();
    let is_final = if p.at(TokenKind::Final) {
        modifiers(p)?.1
    } else {
        false
    };
    let ty = type_ref(p)?;
    let name_tok = p.expect(TokenKind::Identifier, "a loop variable name");
    let var_end = p.current_start();
    let var = p.alloc_with_attr(
        NodeKind::ParameterDeclaration,
        decl_start,
        var_end,
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
    p.attach_children(var, &[ty])?;

    p.expect(TokenKind::Colon, "`:` in enhanced `for`");
    let iterable = expression(p)?;
    p.expect(TokenKind::RParen, "`)` to close enhanced `for` header");
    let body = statement(p)?;

    let end = p.current_start();
    let node = p.alloc(NodeKind::EnhancedForStatement, start, end)?;
    p.attach_children(node, &[var, iterable, body])?;
    Ok(node)
}

fn return_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `return`
    let mut children = Vec::new();
    if !p.at(TokenKind::Semicolon) {
        children.push(expression(p)?);
    }
    p.expect(TokenKind::Semicolon, "`;` after `return`");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ReturnStatement, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn throw_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `throw`
    let value = expression(p)?;
    p.expect(TokenKind::Semicolon, "`;` after `throw`");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ThrowStatement, start, end)?;
    p.attach_children(node, &[value])?;
    Ok(node)
}

fn jump_statement(p: &mut ParserCore, keyword: TokenKind, kind: NodeKind) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `break`/`continue`
    let mut children = Vec::new();
    if p.at(TokenKind::Identifier) {
        let tok = p.bump();
        children.push(p.alloc(NodeKind::Identifier, tok.start, tok.end)?);
    }
    p.expect(TokenKind::Semicolon, &format!("`;` after `{keyword:?}`"));
    let end = p.current_start();
    let node = p.alloc(kind, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn try_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `try`
    let mut children = Vec::new();

    if p.at(TokenKind::LParen) {
        children.push(resource_list(p)?);
    }

    children.push(block(p)?);

    while p.at(TokenKind::Catch) {
        children.push(catch_clause(p)?);
    }

    if p.at(TokenKind::Finally) {
        p.bump();
        children.push(block(p)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::TryStatement, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn resource_list(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `(`
    let mut resources = Vec::new();
    loop {
        if p.at(TokenKind::RParen) {
            break;
        }
        resources.push(resource(p)?);
        if p.at(TokenKind::Semicolon) {
            p.bump();
            continue;
        }
        break;
    }
    p.expect(TokenKind::RParen, "`)` to close try-with-resources list");
    let end = p.current_start();
    let node = p.alloc(NodeKind::ResourceList, start, end)?;
    p.attach_children(node, &resources)?;
    Ok(node)
}

fn resource(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    if looks_like_local_var_decl(p) {
        let is_final = if p.at(TokenKind::Final) {
            modifiers(p)?.1
        } else {
            false
        };
        let ty = type_ref(p)?;
        let name_tok = p.expect(TokenKind::Identifier, "a resource variable name");
        p.expect(TokenKind::Assign, "`=` in resource declaration");
        let initializer = expression(p)?;
        let end = p.current_start();
        let node = p.alloc_with_attr(
            NodeKind::Resource,
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
        p.attach_children(node, &[ty, initializer])?;
        Ok(node)
    } else {
        // An already-declared variable used as a resource directly.
        let value = expression(p)?;
        let end = p.current_start();
        let node = p.alloc(NodeKind::Resource, start, end)?;
        p.attach_children(node, &[value])?;
        Ok(node)
    }
}

fn catch_clause(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `catch`
    p.expect(TokenKind::LParen, "`(` after `catch`");

    let is_final = if p.at(TokenKind::Final) {
        modifiers(p)?.1
    } else {
        false
    };

    let ty_start = p.current_start();
    let mut types = vec![type_ref(p)?];
    while p.at(TokenKind::Pipe) {
        p.bump();
        types.push(type_ref(p)?);
    }
    let exception_type = if types.len() > 1 {
        let union = p.alloc(NodeKind::UnionType, ty_start, p.current_start())?;
        p.attach_children(union, &types)?;
        union
    } else {
        types[0]
    };

    let name_tok = p.expect(TokenKind::Identifier, "a caught exception name");
    p.expect(TokenKind::RParen, "`)` to close `catch` parameter");

    let param = p.alloc_with_attr(
        NodeKind::ParameterDeclaration,
        ty_start,
        p.current_start(),
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

    let body = block(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::CatchClause, start, end)?;
    p.attach_children(node, &[exception_type, param, body])?;
    Ok(node)
}

fn synchronized_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `synchronized`
    p.expect(TokenKind::LParen, "`(` after `synchronized`");
    let lock = expression(p)?;
    p.expect(TokenKind::RParen, "`)` after `synchronized` lock expression");
    let body = block(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::SynchronizedStatement, start, end)?;
    p.attach_children(node, &[lock, body])?;
    Ok(node)
}

fn assert_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `assert`
    let mut children = vec![expression(p)?];
    if p.at(TokenKind::Colon) {
        p.bump();
        children.push(expression(p)?);
    }
    p.expect(TokenKind::Semicolon, "`;` after `assert`");
    let end = p.current_start();
    let node = p.alloc(NodeKind::AssertStatement, start, end)?;
    p.attach_children(node, &children)?;
    Ok(node)
}

fn labeled_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let label_tok = p.bump();
    let label = p.alloc(NodeKind::Identifier, label_tok.start, label_tok.end)?;
    p.bump(); // `:`
    let body = statement(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::LabeledStatement, start, end)?;
    p.attach_children(node, &[label, body])?;
    Ok(node)
}

/// `yield` is a contextual keyword (lexed as `Identifier`); a `yield
/// expr;` statement is recognized only inside a switch expression's block,
/// which is exactly where this parser's switch handling calls `statement`.
fn is_yield_statement(p: &ParserCore) -> bool {
    if !p.at(TokenKind::Identifier) {
        return false;
    }
    let token = p.current_token().clone();
    p.token_text(&token).as_ref() == "yield" && !matches!(p.peek_nth(1), TokenKind::Semicolon | TokenKind::Dot)
}

fn yield_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.bump(); // `yield`
    let value = expression(p)?;
    p.expect(TokenKind::Semicolon, "`;` after `yield`");
    let end = p.current_start();
    let node = p.alloc(NodeKind::YieldStatement, start, end)?;
    p.attach_children(node, &[value])?;
    Ok(node)
}

fn switch_statement(p: &mut ParserCore) -> PResult<NodeId> {
    switch_expression_or_statement(p, SwitchForm::Statement)
}

fn local_variable_declaration(p: &mut ParserCore) -> PResult<NodeId> {
    let node = local_variable_declaration_no_semi(p)?;
    p.expect(TokenKind::Semicolon, "`;` after local variable declaration");
    Ok(node)
}

fn local_variable_declaration_no_semi(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let (mods, is_final) = modifiers(p)?;
    let ty = type_ref(p)?;

    let mut declarators = vec![variable_declarator(p, is_final)?];
    while p.at(TokenKind::Comma) {
        p.bump();
        declarators.push(variable_declarator(p, is_final)?);
    }

    let end = p.current_start();
    let node = p.alloc(NodeKind::LocalVariableDeclaration, start, end)?;
    let mut children = vec![mods, ty];
    children.extend(declarators);
    p.attach_children(node, &children)?;
    Ok(node)
}

pub(crate) fn variable_declarator(p: &mut ParserCore, is_final: bool) -> PResult<NodeId> {
    let start = p.current_start();
    let name_tok = p.expect(TokenKind::Identifier, "a variable name");

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
            children.push(expression(p)?);
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

fn expression_statement(p: &mut ParserCore) -> PResult<NodeId> {
    let node = expression_statement_no_semi(p)?;
    p.expect(TokenKind::Semicolon, "`;` after expression statement");
    Ok(node)
}

fn expression_statement_no_semi(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    let value = expression(p)?;
    let end = p.current_start();
    let node = p.alloc(NodeKind::ExpressionStatement, start, end)?;
    p.attach_children(node, &[value])?;
    Ok(node)
}

/// Whether the tokens ahead look like `[final] Type name` rather than an
/// expression. Scans without consuming: a type is a primitive keyword or a
/// dotted/generic/array identifier chain, immediately followed by an
/// identifier (the declared variable's name) rather than an operator.
fn looks_like_local_var_decl(p: &ParserCore) -> bool {
    let mut i = 0usize;
    if p.peek_nth(i) == TokenKind::Final {
        i += 1;
        while p.peek_nth(i) == TokenKind::At {
            i = skip_annotation(p, i);
        }
    }

    if super::ty::is_primitive_start(p.peek_nth(i)) {
        i += 1;
    } else if p.peek_nth(i) == TokenKind::Identifier {
        i += 1;
        loop {
            if p.peek_nth(i) == TokenKind::Dot && p.peek_nth(i + 1) == TokenKind::Identifier {
                i += 2;
                continue;
            }
            if p.peek_nth(i) == TokenKind::Lt {
                match skip_generic_args(p, i) {
                    Some(next) => i = next,
                    None => return false,
                }
                continue;
            }
            break;
        }
    } else {
        return false;
    }

    while p.peek_nth(i) == TokenKind::LBracket && p.peek_nth(i + 1) == TokenKind::RBracket {
        i += 2;
    }

    p.peek_nth(i) == TokenKind::Identifier
}

fn skip_annotation(p: &ParserCore, mut i: usize) -> usize {
    i += 1; // `@`
    i += 1; // name
    while p.peek_nth(i) == TokenKind::Dot && p.peek_nth(i + 1) == TokenKind::Identifier {
        i += 2;
    }
    if p.peek_nth(i) == TokenKind::LParen {
        let mut depth = 0i32;
        loop {
            match p.peek_nth(i) {
                TokenKind::LParen => depth += 1,
                TokenKind::RParen => {
                    depth -= 1;
                    i += 1;
                    if depth == 0 {
                        return i;
                    }
                    continue;
                }
                TokenKind::Eof => return i,
                _ => {}
            }
            i += 1;
        }
    }
    i
}

/// Skips a balanced `<...>` generic argument list starting at index `i`
/// (which must be `Lt`), returning the index just past it, or `None` if it
/// never closes before EOF.
fn skip_generic_args(p: &ParserCore, mut i: usize) -> Option<usize> {
    let mut depth = 0i32;
    loop {
        match p.peek_nth(i) {
            TokenKind::Lt => depth += 1,
            TokenKind::Gt => depth -= 1,
            TokenKind::RShift => depth -= 2,
            TokenKind::URShift => depth -= 3,
            TokenKind::Eof => return None,
            _ => {}
        }
        i += 1;
        if depth <= 0 {
            return Some(i);
        }
    }
}
