//! `{ ... }` blocks of statements (spec.md §4.4).

use crate::arena::{NodeId, NodeKind};
use crate::parser::{PResult, ParserCore};
use crate::token::TokenKind;

use super::statement::statement;

pub(crate) fn block(p: &mut ParserCore) -> PResult<NodeId> {
    p.enter_depth()?;
    let result = block_inner(p);
    p.exit_depth();
    result
}

fn block_inner(p: &mut ParserCore) -> PResult<NodeId> {
    let start = p.current_start();
    p.expect(TokenKind::LBrace, "`{` to open a block");

    let mut statements = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.at_end() {
        let before = p.current_start();
        statements.push(statement(p)?);
        // Guard against an unrecognized token that `statement` left in
        // place without consuming (a bug would otherwise spin forever).
        if p.current_start() == before {
            p.recover_until(&[TokenKind::Semicolon, TokenKind::RBrace]);
            if p.at(TokenKind::Semicolon) {
                p.bump();
            }
        }
    }
    p.expect(TokenKind::RBrace, "`}` to close a block");

    let end = p.current_start();
    let node = p.alloc(NodeKind::Block, start, end)?;
    p.attach_children(node, &statements)?;
    Ok(node)
}
