//! Token cursors: the driver cursor and the speculative sub-cursor.
//!
//! The grammar matcher speculates over a [`SubCursor`], a copyable handle
//! with its own index; the driver cursor advances only during AST
//! construction. The driver refuses to consume container tokens through
//! the generic path so that bracket structure always goes through the
//! guarded consumers, which maintain depth counters.

use crate::error::{CompileError, Result};
use crate::lexer::{Token, TokenKind};

/// Copyable speculative view over the token buffer.
///
/// Reads saturate at the final `Eof` token, so lookahead never goes out of
/// bounds.
#[derive(Debug, Clone, Copy)]
pub struct SubCursor<'t> {
    tokens: &'t [Token],
    idx: usize,
}

impl<'t> SubCursor<'t> {
    pub(crate) fn new(tokens: &'t [Token], idx: usize) -> Self {
        debug_assert!(!tokens.is_empty(), "token stream must contain Eof");
        Self { tokens, idx }
    }

    pub fn index(&self) -> usize {
        self.idx
    }

    pub fn peek(&self) -> &'t Token {
        self.nth(self.idx)
    }

    /// 1-indexed lookahead: `peek_n(1)` is the current token.
    pub fn peek_n(&self, n: usize) -> &'t Token {
        debug_assert!(n >= 1, "peek_n is 1-indexed");
        self.nth(self.idx + n - 1)
    }

    pub fn kind(&self) -> TokenKind {
        self.peek().kind
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.kind() == kind
    }

    pub fn bump(&mut self) {
        if self.idx < self.tokens.len() - 1 {
            self.idx += 1;
        }
    }

    pub fn consume_n(&mut self, n: usize) {
        for _ in 0..n {
            self.bump();
        }
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn nth(&self, idx: usize) -> &'t Token {
        self.tokens
            .get(idx)
            .unwrap_or_else(|| self.tokens.last().expect("non-empty token stream"))
    }
}

/// The AST builder's cursor. Tokens are consumed exactly once through it.
#[derive(Debug)]
pub struct DriverCursor<'t> {
    tokens: &'t [Token],
    pos: usize,
    paren_depth: u32,
    brace_depth: u32,
    bracket_depth: u32,
}

impl<'t> DriverCursor<'t> {
    pub fn new(tokens: &'t [Token]) -> Result<Self> {
        match tokens.last() {
            Some(token) if token.kind == TokenKind::Eof => Ok(Self {
                tokens,
                pos: 0,
                paren_depth: 0,
                brace_depth: 0,
                bracket_depth: 0,
            }),
            _ => Err(CompileError::internal(
                "token stream does not end with Eof",
            )),
        }
    }

    pub fn index(&self) -> usize {
        self.pos
    }

    pub fn peek(&self) -> &'t Token {
        self.nth(self.pos)
    }

    /// 1-indexed lookahead, like [`SubCursor::peek_n`].
    pub fn peek_n(&self, n: usize) -> &'t Token {
        debug_assert!(n >= 1, "peek_n is 1-indexed");
        self.nth(self.pos + n - 1)
    }

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn at_eof(&self) -> bool {
        self.at(TokenKind::Eof)
    }

    /// Derives a speculative sub-cursor at the current position.
    pub fn sub(&self) -> SubCursor<'t> {
        SubCursor::new(self.tokens, self.pos)
    }

    /// Span of the most recently consumed token; empty at the start.
    pub fn last_span(&self) -> laurel_core::Span {
        if self.pos == 0 {
            laurel_core::Span::empty(0)
        } else {
            self.tokens[self.pos - 1].span
        }
    }

    /// Generic consumption. Containers and `Eof` are refused: a container
    /// reaching this path means the builder and the grammar tree disagree.
    pub fn consume(&mut self) -> Result<&'t Token> {
        let token = self.peek();
        if token.kind.is_container() {
            return Err(CompileError::internal(format!(
                "container token {} consumed through the generic path at {}",
                token.kind, token.pos
            )));
        }
        if token.kind == TokenKind::Eof {
            return Err(CompileError::internal("consume past end of input"));
        }
        self.pos += 1;
        Ok(token)
    }

    pub fn consume_n(&mut self, n: usize) -> Result<()> {
        for _ in 0..n {
            self.consume()?;
        }
        Ok(())
    }

    /// Consumes the current token, requiring `kind`.
    pub fn consume_kind(&mut self, kind: TokenKind) -> Result<&'t Token> {
        if !self.at(kind) {
            return Err(self.mismatch(kind.describe()));
        }
        self.consume()
    }

    pub fn consume_paren_open(&mut self) -> Result<&'t Token> {
        self.consume_container(TokenKind::ParenOpen)?;
        self.paren_depth += 1;
        Ok(self.nth(self.pos - 1))
    }

    pub fn consume_paren_close(&mut self) -> Result<&'t Token> {
        if self.paren_depth == 0 {
            return Err(CompileError::internal("unbalanced `)`"));
        }
        self.consume_container(TokenKind::ParenClose)?;
        self.paren_depth -= 1;
        Ok(self.nth(self.pos - 1))
    }

    pub fn consume_brace_open(&mut self) -> Result<&'t Token> {
        self.consume_container(TokenKind::BraceOpen)?;
        self.brace_depth += 1;
        Ok(self.nth(self.pos - 1))
    }

    pub fn consume_brace_close(&mut self) -> Result<&'t Token> {
        if self.brace_depth == 0 {
            return Err(CompileError::internal("unbalanced `}`"));
        }
        self.consume_container(TokenKind::BraceClose)?;
        self.brace_depth -= 1;
        Ok(self.nth(self.pos - 1))
    }

    pub fn consume_bracket_open(&mut self) -> Result<&'t Token> {
        self.consume_container(TokenKind::BracketOpen)?;
        self.bracket_depth += 1;
        Ok(self.nth(self.pos - 1))
    }

    pub fn consume_bracket_close(&mut self) -> Result<&'t Token> {
        if self.bracket_depth == 0 {
            return Err(CompileError::internal("unbalanced `]`"));
        }
        self.consume_container(TokenKind::BracketClose)?;
        self.bracket_depth -= 1;
        Ok(self.nth(self.pos - 1))
    }

    /// All containers balanced and all tokens handed out.
    pub fn balanced(&self) -> bool {
        self.paren_depth == 0 && self.brace_depth == 0 && self.bracket_depth == 0
    }

    pub(crate) fn mismatch(&self, expected: impl Into<String>) -> CompileError {
        let found = self.peek();
        CompileError::Parse {
            pos: found.pos,
            expected: expected.into(),
            found: found.kind.describe().to_owned(),
        }
    }

    fn consume_container(&mut self, kind: TokenKind) -> Result<()> {
        if !self.at(kind) {
            return Err(self.mismatch(kind.describe()));
        }
        self.pos += 1;
        Ok(())
    }

    fn nth(&self, idx: usize) -> &'t Token {
        self.tokens
            .get(idx)
            .unwrap_or_else(|| self.tokens.last().expect("non-empty token stream"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn sub_cursor_is_independent() {
        let tokens = lex("a b c").unwrap();
        let driver = DriverCursor::new(&tokens).unwrap();
        let mut sub = driver.sub();
        sub.bump();
        sub.bump();
        assert_eq!(sub.index(), 2);
        assert_eq!(driver.index(), 0);
    }

    #[test]
    fn sub_cursor_saturates_at_eof() {
        let tokens = lex("a").unwrap();
        let mut sub = SubCursor::new(&tokens, 0);
        sub.consume_n(10);
        assert_eq!(sub.kind(), TokenKind::Eof);
        assert_eq!(sub.peek_n(3).kind, TokenKind::Eof);
    }

    #[test]
    fn generic_consume_refuses_containers() {
        let tokens = lex("( a )").unwrap();
        let mut driver = DriverCursor::new(&tokens).unwrap();
        assert!(matches!(
            driver.consume(),
            Err(CompileError::Internal(_))
        ));
        driver.consume_paren_open().unwrap();
        driver.consume().unwrap();
        driver.consume_paren_close().unwrap();
        assert!(driver.balanced());
    }

    #[test]
    fn close_without_open_is_internal() {
        let tokens = lex(") a").unwrap();
        let mut driver = DriverCursor::new(&tokens).unwrap();
        assert!(matches!(
            driver.consume_paren_close(),
            Err(CompileError::Internal(_))
        ));
    }
}
