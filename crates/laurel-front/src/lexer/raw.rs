//! Raw logos token enum and its mapping onto [`TokenKind`].
//!
//! Words, numbers, and strings keep their source slice for the conversion
//! pass; everything else maps 1:1 to a fixed-lexeme kind.

use logos::Logos;

use super::token::TokenKind;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n,]+")]
pub(super) enum RawToken<'src> {
    // Two-character tokens first for clarity; logos picks the longest
    // match regardless of declaration order.
    #[token("->")]
    Arrow,
    #[token("::")]
    ColonColon,
    #[token(":.")]
    ColonDot,
    #[token(":=")]
    ColonEquals,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    BangEquals,
    #[token(">=")]
    GreaterEquals,
    #[token("<=")]
    LessEquals,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("=>")]
    FatArrow,

    #[token("#T")]
    True,
    #[token("#F")]
    False,
    #[token("#NIL")]
    Nil,

    #[token("@mut")]
    Mut,
    #[token("@pub")]
    Pub,
    #[token("@const")]
    Const,
    #[token("@opt")]
    Opt,

    #[token("(")]
    ParenOpen,
    #[token(")")]
    ParenClose,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[token("[")]
    BracketOpen,
    #[token("]")]
    BracketClose,
    #[token("\\")]
    Backslash,
    #[token("'")]
    SingleQuote,
    #[token(".")]
    Dot,
    #[token("&")]
    Ampersand,
    #[token("`")]
    Backtick,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token("$")]
    Dollar,
    #[token("@")]
    At,
    #[token("|")]
    Pipe,
    #[token("~")]
    Tilde,
    #[token("=")]
    Equals,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("^")]
    Caret,
    #[token("%")]
    Percent,
    #[token(">")]
    Greater,
    #[token("<")]
    Less,

    /// Double-quoted, no escapes, single line. The conversion pass strips
    /// the quotes into the payload.
    #[regex(r#""[^"\n]*""#)]
    Str(&'src str),

    /// Identifier or keyword; classified by the conversion pass.
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Word(&'src str),

    /// Optional sign, at most one dot, at least one digit. Longest-match
    /// means `-` directly followed by a digit or dot is part of the
    /// number, while a lone `-` stays the operator.
    #[regex(r"-?([0-9]+\.?[0-9]*|\.[0-9]+)")]
    Number(&'src str),
}

/// Maps payload-free raw tokens to their kind.
///
/// Panics on the payload-carrying variants; callers handle those first.
pub(super) fn plain_kind(rawtok: RawToken<'_>) -> TokenKind {
    match rawtok {
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::ColonColon => TokenKind::ColonColon,
        RawToken::ColonDot => TokenKind::ColonDot,
        RawToken::ColonEquals => TokenKind::ColonEquals,
        RawToken::EqualsEquals => TokenKind::EqualsEquals,
        RawToken::BangEquals => TokenKind::BangEquals,
        RawToken::GreaterEquals => TokenKind::GreaterEquals,
        RawToken::LessEquals => TokenKind::LessEquals,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::FatArrow => TokenKind::FatArrow,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Nil => TokenKind::Nil,
        RawToken::Mut => TokenKind::Mut,
        RawToken::Pub => TokenKind::Pub,
        RawToken::Const => TokenKind::Const,
        RawToken::Opt => TokenKind::Opt,
        RawToken::ParenOpen => TokenKind::ParenOpen,
        RawToken::ParenClose => TokenKind::ParenClose,
        RawToken::BraceOpen => TokenKind::BraceOpen,
        RawToken::BraceClose => TokenKind::BraceClose,
        RawToken::BracketOpen => TokenKind::BracketOpen,
        RawToken::BracketClose => TokenKind::BracketClose,
        RawToken::Backslash => TokenKind::Backslash,
        RawToken::SingleQuote => TokenKind::SingleQuote,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Ampersand => TokenKind::Ampersand,
        RawToken::Backtick => TokenKind::Backtick,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Dollar => TokenKind::Dollar,
        RawToken::At => TokenKind::At,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::Tilde => TokenKind::Tilde,
        RawToken::Equals => TokenKind::Equals,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Caret => TokenKind::Caret,
        RawToken::Percent => TokenKind::Percent,
        RawToken::Greater => TokenKind::Greater,
        RawToken::Less => TokenKind::Less,
        RawToken::Str(_) | RawToken::Word(_) | RawToken::Number(_) => {
            unreachable!("payload-carrying raw token in plain_kind")
        }
    }
}
