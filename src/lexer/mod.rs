//! The lexer (spec.md §4.2): turns source text into a flat token stream.
//!
//! Driven top-down by [`Lexer::tokenize`], which never backtracks: every
//! token kind is determined by looking at most a few logical characters
//! ahead. The escape preprocessor (`escape.rs`) runs first in one pass over
//! the whole source, so everything downstream can treat `\uXXXX` outside a
//! literal as an ordinary character.

mod cursor;
mod escape;
mod number;
mod string;
mod tables;

use crate::buffer::SourceBuffer;
use crate::diagnostic::Diagnostic;
use crate::token::{Token, TokenKind};

use cursor::Cursor;
use escape::EscapeTable;

pub(crate) struct LexResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
}

pub(crate) fn tokenize(buffer: &SourceBuffer) -> LexResult {
    let source = buffer.text();
    let (escapes, mut diagnostics) = EscapeTable::scan(source);
    let mut cursor = Cursor::new(source, &escapes);
    let mut tokens = Vec::new();

    while !cursor.is_at_end() {
        let Some(la) = cursor.peek_logical() else {
            break;
        };

        if la.ch.is_whitespace() {
            cursor.bump_logical();
            continue;
        }

        if la.ch == '/' && cursor.peek_nth_logical(1).map(|c| c.ch) == Some('/') {
            tokens.push(scan_line_comment(&mut cursor));
            continue;
        }
        if la.ch == '/' && cursor.peek_nth_logical(1).map(|c| c.ch) == Some('*') {
            tokens.push(scan_block_comment(&mut cursor, &mut diagnostics));
            continue;
        }

        if la.ch == '"'
            && cursor.peek_nth_logical(1).map(|c| c.ch) == Some('"')
            && cursor.peek_nth_logical(2).map(|c| c.ch) == Some('"')
        {
            tokens.push(string::scan_text_block(&mut cursor, &mut diagnostics));
            continue;
        }
        if la.ch == '"' {
            tokens.push(string::scan_string(&mut cursor, &mut diagnostics));
            continue;
        }
        if la.ch == '\'' {
            tokens.push(string::scan_char(&mut cursor, &mut diagnostics));
            continue;
        }

        if la.ch.is_ascii_digit()
            || (la.ch == '.' && cursor.peek_nth_logical(1).map(|c| c.ch.is_ascii_digit()).unwrap_or(false))
        {
            tokens.push(number::scan_number(&mut cursor, &mut diagnostics));
            continue;
        }

        if tables::is_ident_start(la.ch) {
            tokens.push(scan_identifier_or_keyword(&mut cursor));
            continue;
        }

        match scan_operator_or_separator(&mut cursor) {
            Some(tok) => tokens.push(tok),
            None => {
                let start = cursor.offset();
                cursor.bump_logical();
                diagnostics.push(Diagnostic::new(
                    start,
                    0,
                    0,
                    format!("unexpected character {:?}", la.ch),
                ));
                tokens.push(Token::new(TokenKind::Error, start, cursor.offset()));
            }
        }
    }

    tokens.push(Token::new(TokenKind::Eof, cursor.offset(), cursor.offset()));

    let diagnostics = diagnostics
        .into_iter()
        .map(|d| {
            let (line, column) = buffer.line_column(d.offset());
            Diagnostic::new(d.offset(), line, column, d.message().to_string())
        })
        .collect();

    LexResult { tokens, diagnostics }
}

fn scan_identifier_or_keyword(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.offset();
    let mut decoded = String::new();
    let mut any_escape = false;

    while let Some(la) = cursor.peek_logical() {
        if !tables::is_ident_continue(la.ch) {
            break;
        }
        if la.byte_len != la.ch.len_utf8() as u32 {
            any_escape = true;
        }
        decoded.push(la.ch);
        cursor.bump_logical();
    }

    let end = cursor.offset();
    let kind = tables::keyword_kind(&decoded).unwrap_or(TokenKind::Identifier);

    if any_escape {
        Token::with_decoded(kind, start, end, crate::bowstring::BowString::from(decoded.as_str()))
    } else {
        Token::new(kind, start, end)
    }
}

fn scan_line_comment(cursor: &mut Cursor<'_>) -> Token {
    let start = cursor.offset();
    cursor.bump_logical();
    cursor.bump_logical();
    while let Some(la) = cursor.peek_logical() {
        if la.ch == '\n' {
            break;
        }
        cursor.bump_logical();
    }
    Token::new(TokenKind::LineComment, start, cursor.offset())
}

fn scan_block_comment(cursor: &mut Cursor<'_>, diagnostics: &mut Vec<Diagnostic>) -> Token {
    let start = cursor.offset();
    cursor.bump_logical();
    cursor.bump_logical();
    let is_javadoc = cursor.peek_logical().map(|c| c.ch) == Some('*')
        && cursor.peek_nth_logical(1).map(|c| c.ch) != Some('/');

    loop {
        match cursor.peek_logical() {
            None => {
                diagnostics.push(Diagnostic::new(start, 0, 0, "unterminated block comment".to_string()));
                break;
            }
            Some(la) if la.ch == '*' && cursor.peek_nth_logical(1).map(|c| c.ch) == Some('/') => {
                cursor.bump_logical();
                cursor.bump_logical();
                break;
            }
            _ => {
                cursor.bump_logical();
            }
        }
    }

    let kind = if is_javadoc {
        TokenKind::JavadocComment
    } else {
        TokenKind::BlockComment
    };
    Token::new(kind, start, cursor.offset())
}

fn scan_operator_or_separator(cursor: &mut Cursor<'_>) -> Option<Token> {
    let start = cursor.offset();
    let b0 = cursor.peek_ascii()?;
    let b1 = cursor.peek_nth_ascii(1);
    let b2 = cursor.peek_nth_ascii(2);
    let b3 = cursor.peek_nth_ascii(3);

    let (kind, len) = match (b0, b1, b2, b3) {
        (b'>', Some(b'>'), Some(b'>'), Some(b'=')) => (TokenKind::URShiftAssign, 4),
        (b'>', Some(b'>'), Some(b'>'), _) => (TokenKind::URShift, 3),
        (b'<', Some(b'<'), Some(b'='), _) => (TokenKind::LShiftAssign, 3),
        (b'>', Some(b'>'), Some(b'='), _) => (TokenKind::RShiftAssign, 3),
        (b'.', Some(b'.'), Some(b'.'), _) => (TokenKind::Ellipsis, 3),
        (b'<', Some(b'<'), _, _) => (TokenKind::LShift, 2),
        (b'>', Some(b'>'), _, _) => (TokenKind::RShift, 2),
        (b'=', Some(b'='), _, _) => (TokenKind::EqEq, 2),
        (b'!', Some(b'='), _, _) => (TokenKind::Ne, 2),
        (b'<', Some(b'='), _, _) => (TokenKind::Le, 2),
        (b'>', Some(b'='), _, _) => (TokenKind::Ge, 2),
        (b'&', Some(b'&'), _, _) => (TokenKind::AndAnd, 2),
        (b'|', Some(b'|'), _, _) => (TokenKind::OrOr, 2),
        (b'+', Some(b'+'), _, _) => (TokenKind::PlusPlus, 2),
        (b'-', Some(b'-'), _, _) => (TokenKind::MinusMinus, 2),
        (b'+', Some(b'='), _, _) => (TokenKind::PlusAssign, 2),
        (b'-', Some(b'='), _, _) => (TokenKind::MinusAssign, 2),
        (b'*', Some(b'='), _, _) => (TokenKind::StarAssign, 2),
        (b'/', Some(b'='), _, _) => (TokenKind::SlashAssign, 2),
        (b'&', Some(b'='), _, _) => (TokenKind::AmpAssign, 2),
        (b'|', Some(b'='), _, _) => (TokenKind::PipeAssign, 2),
        (b'^', Some(b'='), _, _) => (TokenKind::CaretAssign, 2),
        (b'%', Some(b'='), _, _) => (TokenKind::PercentAssign, 2),
        (b'-', Some(b'>'), _, _) => (TokenKind::Arrow, 2),
        (b':', Some(b':'), _, _) => (TokenKind::ColonColon, 2),
        (b'(', ..) => (TokenKind::LParen, 1),
        (b')', ..) => (TokenKind::RParen, 1),
        (b'{', ..) => (TokenKind::LBrace, 1),
        (b'}', ..) => (TokenKind::RBrace, 1),
        (b'[', ..) => (TokenKind::LBracket, 1),
        (b']', ..) => (TokenKind::RBracket, 1),
        (b';', ..) => (TokenKind::Semicolon, 1),
        (b',', ..) => (TokenKind::Comma, 1),
        (b'.', ..) => (TokenKind::Dot, 1),
        (b'@', ..) => (TokenKind::At, 1),
        (b'=', ..) => (TokenKind::Assign, 1),
        (b'>', ..) => (TokenKind::Gt, 1),
        (b'<', ..) => (TokenKind::Lt, 1),
        (b'!', ..) => (TokenKind::Bang, 1),
        (b'~', ..) => (TokenKind::Tilde, 1),
        (b'?', ..) => (TokenKind::Question, 1),
        (b':', ..) => (TokenKind::Colon, 1),
        (b'+', ..) => (TokenKind::Plus, 1),
        (b'-', ..) => (TokenKind::Minus, 1),
        (b'*', ..) => (TokenKind::Star, 1),
        (b'/', ..) => (TokenKind::Slash, 1),
        (b'&', ..) => (TokenKind::Amp, 1),
        (b'|', ..) => (TokenKind::Pipe, 1),
        (b'^', ..) => (TokenKind::Caret, 1),
        (b'%', ..) => (TokenKind::Percent, 1),
        _ => return None,
    };

    for _ in 0..len {
        cursor.bump_ascii();
    }
    Some(Token::new(kind, start, start + len as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let buffer = SourceBuffer::new(source);
        tokenize(&buffer).tokens.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn tokenizes_empty_class_declaration() {
        assert_eq!(
            kinds("class Foo {}"),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn contextual_keywords_lex_as_identifiers() {
        assert_eq!(kinds("var"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("record"), vec![TokenKind::Identifier, TokenKind::Eof]);
        assert_eq!(kinds("yield"), vec![TokenKind::Identifier, TokenKind::Eof]);
    }

    #[test]
    fn distinguishes_shift_operators_from_generics() {
        assert_eq!(
            kinds(">>>="),
            vec![TokenKind::URShiftAssign, TokenKind::Eof]
        );
        assert_eq!(kinds(">>"), vec![TokenKind::RShift, TokenKind::Eof]);
    }

    #[test]
    fn line_comment_runs_to_end_of_line() {
        let buffer = SourceBuffer::new("// hi\nclass");
        let result = tokenize(&buffer);
        assert_eq!(result.tokens[0].kind, TokenKind::LineComment);
        assert_eq!(result.tokens[1].kind, TokenKind::Class);
    }

    #[test]
    fn javadoc_comment_is_distinguished_from_plain_block_comment() {
        let buffer = SourceBuffer::new("/** doc */ /* plain */");
        let result = tokenize(&buffer);
        assert_eq!(result.tokens[0].kind, TokenKind::JavadocComment);
        assert_eq!(result.tokens[1].kind, TokenKind::BlockComment);
    }

    #[test]
    fn escaped_keyword_spelling_still_classifies_as_keyword() {
        // `class` decodes to `class`; escapes don't let code spell a
        // keyword as an identifier (spec.md §4.1/§4.2 interaction).
        let source = "\\u0063lass Foo {}";
        let buffer = SourceBuffer::new(source);
        let result = tokenize(&buffer);
        assert_eq!(
            result.tokens.iter().map(|t| t.kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Class,
                TokenKind::Identifier,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::Eof,
            ]
        );

        // P8: a keyword token whose spelling was escaped must still expose
        // both its original bytes and its decoded value, and they must differ.
        let class_token = &result.tokens[0];
        assert_eq!(class_token.original_spelling(source), "\\u0063lass");
        assert_eq!(class_token.decoded_text(source), "class");
        assert_ne!(class_token.original_spelling(source), class_token.decoded_text(source));
    }

    #[test]
    fn unterminated_string_literal_is_reported() {
        let buffer = SourceBuffer::new("\"abc");
        let result = tokenize(&buffer);
        assert_eq!(result.diagnostics.len(), 1);
    }
}
