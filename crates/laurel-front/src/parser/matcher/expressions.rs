//! Expression recognizers and the paren-form tie-breaks.
//!
//! Ordered alternation: block, paren form (lambda / conditional /
//! s-expression), bare lambda form, reserved `match`, v-expression,
//! f-expression.

use crate::error::Result;
use crate::lexer::TokenKind;
use crate::parser::gform::{GExpr, GLambdaForm, GNode, GOperation, GParam, GPredicateForm};

use super::{MatchResult, Matcher, NamespaceMode};

impl Matcher<'_> {
    pub fn match_expression(&mut self) -> MatchResult<GExpr> {
        self.match_expression_with(NamespaceMode::Allow)
    }

    pub(super) fn match_expression_with(&mut self, mode: NamespaceMode) -> MatchResult<GExpr> {
        if let Some(expr) = self.match_block()? {
            return Ok(Some(expr));
        }
        if let Some(expr) = self.match_paren_form()? {
            return Ok(Some(expr));
        }
        if let Some(expr) = self.match_bare_lambda_form()? {
            return Ok(Some(expr));
        }
        if self.cur.eat(TokenKind::Match) {
            // Reserved; the builder rejects it with a stub error.
            return Ok(Some(GExpr::Match));
        }
        if let Some(expr) = self.match_vexpr(mode)? {
            return Ok(Some(expr));
        }
        self.match_fexpr(mode)
    }

    /// `{ ( stmt | expr )* }`
    fn match_block(&mut self) -> MatchResult<GExpr> {
        if !self.cur.eat(TokenKind::BraceOpen) {
            return Ok(None);
        }
        let mut members = Vec::new();
        while !self.cur.eat(TokenKind::BraceClose) {
            if self.cur.at(TokenKind::Eof) {
                return Err(self.invalid("`}` to close block"));
            }
            if let Some(stmt) = self.match_statement()? {
                members.push(GNode::Stmt(stmt));
                continue;
            }
            if let Some(expr) = self.match_expression()? {
                members.push(GNode::Expr(expr));
                continue;
            }
            return Err(self.invalid("statement or expression in block"));
        }
        Ok(Some(GExpr::Block { members }))
    }

    /// Everything that opens with `(`: lambda expression, conditional,
    /// s-expression, grouping.
    fn match_paren_form(&mut self) -> MatchResult<GExpr> {
        if !self.cur.at(TokenKind::ParenOpen) {
            return Ok(None);
        }
        self.cur.bump();

        // `( =>` steals the form as a lambda before anything else runs.
        if self.cur.eat(TokenKind::FatArrow) {
            let has_type = if self.cur.eat(TokenKind::Colon) {
                self.match_type()?;
                true
            } else {
                false
            };
            let form = self.require_lambda_form()?;
            self.expect(TokenKind::ParenClose, "`)` to close lambda")?;
            return Ok(Some(GExpr::Lambda { has_type, form }));
        }

        // Operator head: plain s-expression; predicate arms after an
        // operator head are a definite error.
        if self.cur.kind().is_operation() {
            self.cur.bump();
            let operands = self.match_operand_list()?;
            if self.cur.at(TokenKind::Arrow) || self.cur.at(TokenKind::Colon) {
                return Err(
                    self.invalid("`)` (a predicate form requires an expression head)")
                );
            }
            self.expect(TokenKind::ParenClose, "`)` to close s-expression")?;
            return Ok(Some(GExpr::S {
                operation: Box::new(GOperation::Op),
                operands,
            }));
        }

        let head_start = self.cur;
        let head = self.require_expression()?;

        // `( p -> t : e )`: the head greedily read `p -> t` as a namespace
        // hop and now faces the else-marker. Re-match the head with
        // namespace hops denied so `->` reads as the then-arm.
        if matches!(head, GExpr::M { .. }) && self.cur.at(TokenKind::Colon) {
            self.cur = head_start;
            let predicate = self.require_expression_with(NamespaceMode::Deny)?;
            let form = match self.match_predicate_form()? {
                Some(form) => form,
                None => return Err(self.invalid("predicate form")),
            };
            self.expect(TokenKind::ParenClose, "`)` to close conditional")?;
            return Ok(Some(GExpr::Cond {
                predicate: Box::new(predicate),
                form,
            }));
        }

        if let Some(form) = self.match_predicate_form()? {
            self.expect(TokenKind::ParenClose, "`)` to close conditional")?;
            return Ok(Some(GExpr::Cond {
                predicate: Box::new(head),
                form,
            }));
        }

        let operands = self.match_operand_list()?;
        self.expect(TokenKind::ParenClose, "`)` to close s-expression")?;
        Ok(Some(GExpr::S {
            operation: Box::new(GOperation::Expr(head)),
            operands,
        }))
    }

    /// `[ -> expr ] [ : expr ]`, at least one arm.
    fn match_predicate_form(&mut self) -> MatchResult<GPredicateForm> {
        let mut form = GPredicateForm::default();
        if self.cur.eat(TokenKind::Arrow) {
            form.then = Some(Box::new(self.require_expression()?));
        }
        if self.cur.eat(TokenKind::Colon) {
            form.otherwise = Some(Box::new(self.require_expression()?));
        }
        if form.then.is_none() && form.otherwise.is_none() {
            Ok(None)
        } else {
            Ok(Some(form))
        }
    }

    fn match_operand_list(&mut self) -> Result<Vec<GExpr>> {
        let mut operands = Vec::new();
        while let Some(expr) = self.match_expression()? {
            operands.push(expr);
        }
        Ok(operands)
    }

    /// Bare `| params | body` outside a lambda expression.
    fn match_bare_lambda_form(&mut self) -> MatchResult<GExpr> {
        if !self.cur.at(TokenKind::Pipe) {
            return Ok(None);
        }
        let form = self.require_lambda_form()?;
        Ok(Some(GExpr::LambdaForm { form }))
    }

    pub(super) fn require_lambda_form(&mut self) -> Result<GLambdaForm> {
        self.expect(TokenKind::Pipe, "`|` to open parameters")?;
        let mut parameters = Vec::new();
        loop {
            let mut modifiers = 0u32;
            while self.cur.kind().as_modifier().is_some() {
                self.cur.bump();
                modifiers += 1;
            }
            if self.cur.eat(TokenKind::Identifier) {
                let has_type = if self.cur.eat(TokenKind::Colon) {
                    self.match_type()?;
                    true
                } else {
                    false
                };
                parameters.push(GParam {
                    modifiers,
                    has_type,
                });
            } else if modifiers > 0 {
                return Err(self.invalid("parameter name after modifiers"));
            } else {
                break;
            }
        }
        self.expect(TokenKind::Pipe, "`|` to close parameters")?;
        let expr = self.require_expression()?;
        Ok(GLambdaForm {
            parameters,
            expr: Box::new(expr),
        })
    }

    /// One literal or identifier token, unless an access operator follows;
    /// then the f-expression recognizer owns it.
    fn match_vexpr(&mut self, mode: NamespaceMode) -> MatchResult<GExpr> {
        if !self.cur.kind().is_literal() {
            return Ok(None);
        }
        let next = self.cur.peek_n(2).kind;
        let deferred = match mode {
            NamespaceMode::Allow => next.is_access_operator(),
            // `->` is the then-arm marker here, not an access operator.
            NamespaceMode::Deny => next.is_access_operator() && next != TokenKind::Arrow,
        };
        if deferred {
            return Ok(None);
        }
        self.cur.bump();
        Ok(Some(GExpr::V))
    }
}
