//! Type-annotation parsing into [`LangType`].
//!
//! The primitive table is case-sensitive; unknown names become user types.

use laurel_core::{LangType, Primitive};

use crate::error::Result;
use crate::lexer::TokenKind;

use super::Builder;

impl Builder<'_, '_> {
    /// `ident | Fn < Type* ; Type > | Array < Type >`
    pub(super) fn build_type(&mut self) -> Result<LangType> {
        match self.cur.peek().kind {
            TokenKind::Identifier => {
                let name = self.consume_identifier()?;
                Ok(match Primitive::from_name(&name) {
                    Some(primitive) => LangType::Primitive(primitive),
                    None => LangType::User(name),
                })
            }
            TokenKind::Fn => {
                self.cur.consume_kind(TokenKind::Fn)?;
                self.cur.consume_kind(TokenKind::Less)?;
                let mut params = Vec::new();
                while !self.cur.at(TokenKind::Semicolon) {
                    params.push(self.build_type()?);
                }
                self.cur.consume_kind(TokenKind::Semicolon)?;
                let ret = self.build_type()?;
                self.cur.consume_kind(TokenKind::Greater)?;
                Ok(LangType::function(params, ret))
            }
            TokenKind::Array => {
                self.cur.consume_kind(TokenKind::Array)?;
                self.cur.consume_kind(TokenKind::Less)?;
                let elem = self.build_type()?;
                self.cur.consume_kind(TokenKind::Greater)?;
                Ok(LangType::Array(Box::new(elem)))
            }
            _ => Err(self.cur.mismatch("type")),
        }
    }
}
