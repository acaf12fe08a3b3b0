//! Token model: closed kind set plus optional payload.
//!
//! Payload invariant: `Identifier` and `String` carry `Str`, `Int` carries
//! `Int`, `Float` carries `Float`, everything else carries `Empty`. The
//! lexer is the only producer and upholds this.

use laurel_core::{Modifier, SourcePos, Span};

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub payload: TokenPayload,
    pub pos: SourcePos,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, payload: TokenPayload, pos: SourcePos, span: Span) -> Self {
        Self {
            kind,
            payload,
            pos,
            span,
        }
    }

    /// The source slice this token covers. O(1) slice, exact round-trip.
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[std::ops::Range::<usize>::from(self.span)]
    }

    /// Identifier or string payload, if this token carries one.
    pub fn str_payload(&self) -> Option<&str> {
        match &self.payload {
            TokenPayload::Str(text) => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TokenPayload {
    Empty,
    Str(String),
    Int(i64),
    Float(f64),
}

/// Every token kind the lexer can produce, plus reserved punctuation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Syntactic
    ParenOpen,
    ParenClose,
    BraceOpen,
    BraceClose,
    BracketOpen,
    BracketClose,
    Comma,
    Backslash,
    SingleQuote,
    DoubleQuote,
    Dot,
    Ampersand,
    Backtick,
    Colon,
    Semicolon,
    Dollar,
    At,
    Pipe,
    Tilde,
    Equals,
    ColonColon,
    ColonDot,
    ColonEquals,
    Arrow,
    As,

    // Operation
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Percent,
    Greater,
    Less,
    PlusPlus,
    MinusMinus,
    GreaterEquals,
    LessEquals,
    BangEquals,
    EqualsEquals,
    And,
    Or,
    Nor,
    Xor,
    Xnor,
    Nand,
    Not,

    // Literal
    True,
    False,
    Float,
    Int,
    Identifier,
    String,
    Nil,

    // Definition
    Let,
    Func,
    Class,
    Struct,
    Import,

    // Built-in
    Match,
    Array,
    Fn,
    FatArrow,

    // Modifier
    Mut,
    Pub,
    Const,
    Opt,

    // Internal
    Eof,
}

impl TokenKind {
    /// Container tokens may only be consumed through the driver cursor's
    /// guarded consumers.
    pub fn is_container(&self) -> bool {
        matches!(
            self,
            TokenKind::ParenOpen
                | TokenKind::ParenClose
                | TokenKind::BraceOpen
                | TokenKind::BraceClose
                | TokenKind::BracketOpen
                | TokenKind::BracketClose
        )
    }

    pub fn is_operation(&self) -> bool {
        matches!(
            self,
            TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Caret
                | TokenKind::Percent
                | TokenKind::Greater
                | TokenKind::Less
                | TokenKind::PlusPlus
                | TokenKind::MinusMinus
                | TokenKind::GreaterEquals
                | TokenKind::LessEquals
                | TokenKind::BangEquals
                | TokenKind::EqualsEquals
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Nor
                | TokenKind::Xor
                | TokenKind::Xnor
                | TokenKind::Nand
                | TokenKind::Not
        )
    }

    pub fn is_literal(&self) -> bool {
        matches!(
            self,
            TokenKind::True
                | TokenKind::False
                | TokenKind::Float
                | TokenKind::Int
                | TokenKind::Identifier
                | TokenKind::String
                | TokenKind::Nil
        )
    }

    /// Access operators that make a literal defer to an F-expression.
    pub fn is_access_operator(&self) -> bool {
        matches!(
            self,
            TokenKind::Arrow | TokenKind::ColonColon | TokenKind::ColonDot | TokenKind::BracketOpen
        )
    }

    pub fn as_modifier(&self) -> Option<Modifier> {
        Some(match self {
            TokenKind::Mut => Modifier::Mutable,
            TokenKind::Pub => Modifier::Public,
            TokenKind::Const => Modifier::Const,
            TokenKind::Opt => Modifier::Optional,
            _ => return None,
        })
    }

    /// Human-readable name for error messages.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::ParenOpen => "`(`",
            TokenKind::ParenClose => "`)`",
            TokenKind::BraceOpen => "`{`",
            TokenKind::BraceClose => "`}`",
            TokenKind::BracketOpen => "`[`",
            TokenKind::BracketClose => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Backslash => "`\\`",
            TokenKind::SingleQuote => "`'`",
            TokenKind::DoubleQuote => "`\"`",
            TokenKind::Dot => "`.`",
            TokenKind::Ampersand => "`&`",
            TokenKind::Backtick => "backtick",
            TokenKind::Colon => "`:`",
            TokenKind::Semicolon => "`;`",
            TokenKind::Dollar => "`$`",
            TokenKind::At => "`@`",
            TokenKind::Pipe => "`|`",
            TokenKind::Tilde => "`~`",
            TokenKind::Equals => "`=`",
            TokenKind::ColonColon => "`::`",
            TokenKind::ColonDot => "`:.`",
            TokenKind::ColonEquals => "`:=`",
            TokenKind::Arrow => "`->`",
            TokenKind::As => "`as`",
            TokenKind::Plus => "`+`",
            TokenKind::Minus => "`-`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Caret => "`^`",
            TokenKind::Percent => "`%`",
            TokenKind::Greater => "`>`",
            TokenKind::Less => "`<`",
            TokenKind::PlusPlus => "`++`",
            TokenKind::MinusMinus => "`--`",
            TokenKind::GreaterEquals => "`>=`",
            TokenKind::LessEquals => "`<=`",
            TokenKind::BangEquals => "`!=`",
            TokenKind::EqualsEquals => "`==`",
            TokenKind::And => "`and`",
            TokenKind::Or => "`or`",
            TokenKind::Nor => "`nor`",
            TokenKind::Xor => "`xor`",
            TokenKind::Xnor => "`xnor`",
            TokenKind::Nand => "`nand`",
            TokenKind::Not => "`not`",
            TokenKind::True => "`#T`",
            TokenKind::False => "`#F`",
            TokenKind::Float => "float literal",
            TokenKind::Int => "integer literal",
            TokenKind::Identifier => "identifier",
            TokenKind::String => "string literal",
            TokenKind::Nil => "`#NIL`",
            TokenKind::Let => "`let`",
            TokenKind::Func => "`func`",
            TokenKind::Class => "`class`",
            TokenKind::Struct => "`struct`",
            TokenKind::Import => "`import`",
            TokenKind::Match => "`match`",
            TokenKind::Array => "`Array`",
            TokenKind::Fn => "`Fn`",
            TokenKind::FatArrow => "`=>`",
            TokenKind::Mut => "`@mut`",
            TokenKind::Pub => "`@pub`",
            TokenKind::Const => "`@const`",
            TokenKind::Opt => "`@opt`",
            TokenKind::Eof => "end of input",
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.describe())
    }
}
