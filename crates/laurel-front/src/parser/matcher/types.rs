//! Structural matching of type annotations.
//!
//! The matcher only validates shape; the builder parses the same tokens
//! into a `LangType`.

use crate::error::Result;
use crate::lexer::TokenKind;

use super::Matcher;

impl Matcher<'_> {
    /// `ident | Fn < Type* ; Type > | Array < Type >`
    pub(super) fn match_type(&mut self) -> Result<()> {
        match self.cur.kind() {
            TokenKind::Identifier => {
                self.cur.bump();
                Ok(())
            }
            TokenKind::Fn => {
                self.cur.bump();
                self.expect(TokenKind::Less, "`<` after `Fn`")?;
                while !self.cur.at(TokenKind::Semicolon) {
                    if self.cur.at(TokenKind::Eof) || self.cur.at(TokenKind::Greater) {
                        return Err(self.invalid("`;` before the return type"));
                    }
                    self.match_type()?;
                }
                self.cur.bump();
                self.match_type()?;
                self.expect(TokenKind::Greater, "`>` to close `Fn`")?;
                Ok(())
            }
            TokenKind::Array => {
                self.cur.bump();
                self.expect(TokenKind::Less, "`<` after `Array`")?;
                self.match_type()?;
                self.expect(TokenKind::Greater, "`>` to close `Array`")?;
                Ok(())
            }
            _ => Err(self.invalid("type")),
        }
    }
}
