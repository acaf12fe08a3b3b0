//! Lexer for Laurel source text.
//!
//! Tokens carry their kind, an optional payload, and both a line/column
//! position and a byte span. Lexing is a logos pass over a raw token enum
//! followed by a conversion step that classifies words into keywords and
//! operators, parses numeric payloads, and appends the single `Eof` token.
//!
//! Whitespace and commas are separators and never reach the token stream.
//! Any character outside the language produces a fatal [`CompileError::Lex`]
//! for the unit.

mod raw;
mod token;

#[cfg(test)]
mod lexer_tests;

pub use token::{Token, TokenKind, TokenPayload};

use laurel_core::{LineIndex, Span};
use logos::Logos;

use crate::error::{CompileError, Result};
use raw::RawToken;

/// Tokenizes one unit's source. The result always ends with exactly one
/// `Eof` token, even for empty input.
pub fn lex(source: &str) -> Result<Vec<Token>> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::new();
    let mut lexer = RawToken::lexer(source);

    while let Some(item) = lexer.next() {
        let span = Span::new(lexer.span().start as u32, lexer.span().end as u32);
        let pos = index.pos(span.start);
        match item {
            Ok(rawtok) => tokens.push(convert(rawtok, span, pos)?),
            Err(()) => {
                return Err(CompileError::Lex {
                    pos,
                    message: format!(
                        "unexpected character `{}`",
                        &source[span.start as usize..span.end as usize]
                    ),
                });
            }
        }
    }

    let end = Span::empty(source.len() as u32);
    tokens.push(Token::new(
        TokenKind::Eof,
        TokenPayload::Empty,
        index.pos(end.start),
        end,
    ));
    Ok(tokens)
}

fn convert(rawtok: RawToken<'_>, span: Span, pos: laurel_core::SourcePos) -> Result<Token> {
    let (kind, payload) = match rawtok {
        RawToken::Word(word) => classify_word(word),
        RawToken::Number(text) => classify_number(text, pos)?,
        RawToken::Str(text) => {
            // Quotes are part of the span but not the payload.
            let inner = &text[1..text.len() - 1];
            (TokenKind::String, TokenPayload::Str(inner.to_owned()))
        }
        other => (raw::plain_kind(other), TokenPayload::Empty),
    };
    Ok(Token::new(kind, payload, pos, span))
}

/// Keywords and word-shaped operators win over identifiers.
fn classify_word(word: &str) -> (TokenKind, TokenPayload) {
    let kind = match word {
        "let" => TokenKind::Let,
        "func" => TokenKind::Func,
        "class" => TokenKind::Class,
        "struct" => TokenKind::Struct,
        "import" => TokenKind::Import,
        "match" => TokenKind::Match,
        "as" => TokenKind::As,
        "Array" => TokenKind::Array,
        "Fn" => TokenKind::Fn,
        "and" => TokenKind::And,
        "or" => TokenKind::Or,
        "nor" => TokenKind::Nor,
        "xor" => TokenKind::Xor,
        "xnor" => TokenKind::Xnor,
        "nand" => TokenKind::Nand,
        "not" => TokenKind::Not,
        _ => return (TokenKind::Identifier, TokenPayload::Str(word.to_owned())),
    };
    (kind, TokenPayload::Empty)
}

/// A dot anywhere makes it a float; `3.` is `3.0`. The raw rule already
/// guarantees at most one dot and at least one digit.
fn classify_number(text: &str, pos: laurel_core::SourcePos) -> Result<(TokenKind, TokenPayload)> {
    if text.contains('.') {
        let value: f64 = text.parse().map_err(|_| CompileError::Lex {
            pos,
            message: format!("malformed float literal `{text}`"),
        })?;
        Ok((TokenKind::Float, TokenPayload::Float(value)))
    } else {
        let value: i64 = text.parse().map_err(|_| CompileError::Lex {
            pos,
            message: format!("integer literal out of range `{text}`"),
        })?;
        Ok((TokenKind::Int, TokenPayload::Int(value)))
    }
}
