//! F-expression recognizer: namespace hops plus an access chain.

use crate::error::Result;
use crate::lexer::TokenKind;
use crate::parser::gform::{GAccess, GArg, GExpr};

use super::{MatchResult, Matcher, NamespaceMode};

impl Matcher<'_> {
    /// `( ident -> )* base ( :: ident [args] | :: ident | :. ident )*`
    ///
    /// The base is a bare identifier or a type token. An identity call
    /// (`:: ident` without brackets) is terminal; a type base is solitary.
    pub(super) fn match_fexpr(&mut self, mode: NamespaceMode) -> MatchResult<GExpr> {
        let save = self.cur;

        let mut namespace_depth = 0u32;
        if mode == NamespaceMode::Allow {
            // A hop is only a hop when a chain can continue after it;
            // `p -> 1` leaves the arrow for the conditional's then-arm.
            while self.cur.at(TokenKind::Identifier)
                && self.cur.peek_n(2).kind == TokenKind::Arrow
                && matches!(
                    self.cur.peek_n(3).kind,
                    TokenKind::Identifier | TokenKind::Fn | TokenKind::Array
                )
            {
                self.cur.consume_n(2);
                namespace_depth += 1;
            }
        }

        let mut accessors = Vec::new();
        if self.cur.at(TokenKind::Fn) || self.cur.at(TokenKind::Array) {
            self.cur.bump();
            accessors.push(GAccess::Type);
        } else if self.cur.at(TokenKind::Identifier) {
            self.cur.bump();
            accessors.push(GAccess::Identifier);
        } else if namespace_depth > 0 {
            return Err(self.invalid("identifier after `->`"));
        } else {
            self.cur = save;
            return Ok(None);
        }

        loop {
            match self.cur.kind() {
                TokenKind::ColonColon => {
                    if matches!(accessors.last(), Some(GAccess::FuncAccess)) {
                        return Err(self.invalid("end of access chain after identity call"));
                    }
                    if self.cur.peek_n(2).kind != TokenKind::Identifier {
                        return Err(self.invalid("function name after `::`"));
                    }
                    if self.cur.peek_n(3).kind == TokenKind::BracketOpen {
                        self.cur.consume_n(3);
                        let arguments = self.match_argument_list()?;
                        accessors.push(GAccess::FuncCall { arguments });
                    } else {
                        self.cur.consume_n(2);
                        accessors.push(GAccess::FuncAccess);
                    }
                }
                TokenKind::ColonDot => {
                    if matches!(accessors.last(), Some(GAccess::FuncAccess)) {
                        return Err(self.invalid("end of access chain after identity call"));
                    }
                    if self.cur.peek_n(2).kind != TokenKind::Identifier {
                        return Err(self.invalid("field name after `:.`"));
                    }
                    self.cur.consume_n(2);
                    accessors.push(GAccess::Identifier);
                }
                TokenKind::BracketOpen => {
                    return Err(self.invalid("`::` call syntax (indexing is not supported)"));
                }
                _ => break,
            }
        }

        if accessors.len() > 1 && accessors.iter().any(|a| matches!(a, GAccess::Type)) {
            return Err(self.invalid("type access to stand alone in its chain"));
        }

        Ok(Some(GExpr::M {
            namespace_depth,
            accessors,
        }))
    }

    /// Bracketed argument list, opening bracket already consumed.
    fn match_argument_list(&mut self) -> Result<Vec<GArg>> {
        let mut arguments = Vec::new();
        loop {
            if self.cur.eat(TokenKind::BracketClose) {
                break;
            }
            if self.cur.at(TokenKind::Eof) {
                return Err(self.invalid("`]` to close arguments"));
            }
            let mut modifiers = 0u32;
            while self.cur.kind().as_modifier().is_some() {
                self.cur.bump();
                modifiers += 1;
            }
            let expr = self.require_expression()?;
            arguments.push(GArg { modifiers, expr });
        }
        Ok(arguments)
    }
}
