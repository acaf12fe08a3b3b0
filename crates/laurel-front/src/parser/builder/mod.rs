//! AST builder: re-consumes tokens from the driver cursor under the
//! guidance of a matched grammar form.
//!
//! The grammar matcher already validated shape, so every mismatch here is
//! an internal inconsistency surfaced as a `ParseError` with the offending
//! position.

mod expressions;
mod types;

use laurel_core::{LangType, ModifierSet, SourcePos, Span};

use crate::ast::{AstNode, MetaData, Statement, Symbol};
use crate::error::{CompileError, Result};
use crate::lexer::TokenKind;
use crate::parser::cursor::DriverCursor;
use crate::parser::gform::{GNode, GStmt};

pub struct Builder<'a, 't> {
    pub(super) cur: &'a mut DriverCursor<'t>,
}

impl<'a, 't> Builder<'a, 't> {
    pub fn new(cur: &'a mut DriverCursor<'t>) -> Self {
        Self { cur }
    }

    pub fn build_node(&mut self, form: &GNode) -> Result<AstNode> {
        Ok(match form {
            GNode::Stmt(stmt) => AstNode::Stmt(self.build_statement(stmt)?),
            GNode::Expr(expr) => AstNode::Expr(self.build_expression(expr)?),
        })
    }

    pub fn build_statement(&mut self, form: &GStmt) -> Result<Statement> {
        match form {
            GStmt::Let {
                modifiers,
                has_type,
                expr,
            } => {
                let (pos, span) = self.start();
                self.cur.consume_kind(TokenKind::Let)?;
                let mods = self.consume_modifiers(*modifiers)?;
                let symbol = Symbol::declared(self.consume_identifier()?);
                let declared = if *has_type {
                    self.cur.consume_kind(TokenKind::Colon)?;
                    self.build_type()?
                } else {
                    LangType::Undefined
                };
                self.cur.consume_kind(TokenKind::Equals)?;
                let value = self.build_expression(expr)?;
                let meta = MetaData::with_type(pos, span.cover(self.cur.last_span()), declared);
                Ok(Statement::Let {
                    symbol,
                    modifiers: mods,
                    value,
                    meta,
                })
            }
            GStmt::Reassign { expr } => {
                let (pos, span) = self.start();
                // Declaration site unknown until stage 2.
                let symbol = Symbol::unresolved(self.consume_identifier()?);
                self.cur.consume_kind(TokenKind::ColonEquals)?;
                let value = self.build_expression(expr)?;
                let meta = MetaData::new(pos, span.cover(self.cur.last_span()));
                Ok(Statement::Assign {
                    symbol,
                    value,
                    meta,
                })
            }
            GStmt::Import { has_alias } => {
                let (pos, span) = self.start();
                self.cur.consume_kind(TokenKind::Import)?;
                let path = self.consume_identifier()?;
                let alias = if *has_alias {
                    self.cur.consume_kind(TokenKind::As)?;
                    Some(self.consume_identifier()?)
                } else {
                    None
                };
                let meta = MetaData::new(pos, span.cover(self.cur.last_span()));
                Ok(Statement::Import { path, alias, meta })
            }
        }
    }

    pub(super) fn start(&self) -> (SourcePos, Span) {
        let token = self.cur.peek();
        (token.pos, token.span)
    }

    pub(super) fn consume_identifier(&mut self) -> Result<String> {
        let token = self.cur.consume_kind(TokenKind::Identifier)?;
        token
            .str_payload()
            .map(str::to_owned)
            .ok_or_else(|| CompileError::internal("identifier token without payload"))
    }

    pub(super) fn consume_modifiers(&mut self, count: u32) -> Result<ModifierSet> {
        let mut mods = ModifierSet::EMPTY;
        for _ in 0..count {
            let token = self.cur.consume()?;
            let modifier = token.kind.as_modifier().ok_or_else(|| {
                CompileError::internal(format!("expected modifier token, found {}", token.kind))
            })?;
            mods.insert(modifier);
        }
        Ok(mods)
    }
}
