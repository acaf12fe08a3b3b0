//! Grammar matcher: tokens to shape-only [`GForm`](crate::parser::gform) trees.
//!
//! All recognizers run over a speculative [`SubCursor`] and follow one
//! discipline: `Ok(None)` means "no match" and the cursor is unchanged
//! (recognizers work on a copy and commit only on success); `Ok(Some(_))`
//! means the form matched and the cursor sits after it; `Err` is a definite
//! grammar violation and aborts the unit, cursor state undefined.
//!
//! Alternation is ordered; tie-breaks live in `expressions.rs`.

mod accessors;
mod expressions;
mod statements;
mod types;

#[cfg(test)]
mod matcher_tests;

use crate::error::{CompileError, Result};
use crate::lexer::TokenKind;
use crate::parser::cursor::SubCursor;
use crate::parser::gform::GExpr;

pub type MatchResult<T> = Result<Option<T>>;

/// Whether the expression being matched may consume `ident ->` namespace
/// hops. Denied only when re-matching a conditional's predicate, where
/// `->` is the then-arm marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NamespaceMode {
    Allow,
    Deny,
}

pub struct Matcher<'t> {
    pub(super) cur: SubCursor<'t>,
}

impl<'t> Matcher<'t> {
    pub fn new(cur: SubCursor<'t>) -> Self {
        Self { cur }
    }

    /// Final cursor position, for alignment checks against the driver.
    pub fn into_cursor(self) -> SubCursor<'t> {
        self.cur
    }

    pub(super) fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.cur.eat(kind) {
            Ok(())
        } else {
            Err(self.invalid(what))
        }
    }

    pub(super) fn invalid(&self, expected: &str) -> CompileError {
        CompileError::InvalidGrammar {
            pos: self.cur.peek().pos,
            expected: expected.to_owned(),
        }
    }

    pub(super) fn require_expression(&mut self) -> Result<GExpr> {
        self.require_expression_with(NamespaceMode::Allow)
    }

    pub(super) fn require_expression_with(&mut self, mode: NamespaceMode) -> Result<GExpr> {
        match self.match_expression_with(mode)? {
            Some(expr) => Ok(expr),
            None => Err(self.invalid("expression")),
        }
    }
}
