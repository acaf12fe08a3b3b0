//! Statement recognizers: `let`, reassignment, `import`.

use crate::lexer::TokenKind;
use crate::parser::gform::GStmt;

use super::{MatchResult, Matcher};

impl Matcher<'_> {
    pub fn match_statement(&mut self) -> MatchResult<GStmt> {
        if let Some(stmt) = self.match_let()? {
            return Ok(Some(stmt));
        }
        if let Some(stmt) = self.match_reassign()? {
            return Ok(Some(stmt));
        }
        self.match_import()
    }

    /// `let { modifier } ident [ : Type ] = expr`
    ///
    /// Nothing else starts with `let`, so failures past the keyword are
    /// definite errors rather than no-match.
    fn match_let(&mut self) -> MatchResult<GStmt> {
        if !self.cur.eat(TokenKind::Let) {
            return Ok(None);
        }
        let mut modifiers = 0u32;
        while self.cur.kind().as_modifier().is_some() {
            self.cur.bump();
            modifiers += 1;
        }
        self.expect(TokenKind::Identifier, "identifier after `let`")?;
        let has_type = if self.cur.eat(TokenKind::Colon) {
            self.match_type()?;
            true
        } else {
            false
        };
        self.expect(TokenKind::Equals, "`=` in `let` binding")?;
        let expr = self.require_expression()?;
        Ok(Some(GStmt::Let {
            modifiers,
            has_type,
            expr,
        }))
    }

    /// `ident := expr`
    fn match_reassign(&mut self) -> MatchResult<GStmt> {
        if !(self.cur.at(TokenKind::Identifier)
            && self.cur.peek_n(2).kind == TokenKind::ColonEquals)
        {
            return Ok(None);
        }
        self.cur.consume_n(2);
        let expr = self.require_expression()?;
        Ok(Some(GStmt::Reassign { expr }))
    }

    /// `import ident [ as ident ]`
    fn match_import(&mut self) -> MatchResult<GStmt> {
        if !self.cur.eat(TokenKind::Import) {
            return Ok(None);
        }
        self.expect(TokenKind::Identifier, "namespace name after `import`")?;
        let has_alias = if self.cur.eat(TokenKind::As) {
            self.expect(TokenKind::Identifier, "alias after `as`")?;
            true
        } else {
            false
        };
        Ok(Some(GStmt::Import { has_alias }))
    }
}
