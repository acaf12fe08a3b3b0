//! Expression construction, one method per grammar-form variant.

use laurel_core::Primitive;

use crate::ast::{
    Access, Argument, AstNode, Expression, MetaData, Operation, Parameter, PredicateForm, Symbol,
    Value,
};
use crate::error::{CompileError, Result};
use crate::lexer::{TokenKind, TokenPayload};
use crate::parser::gform::{GAccess, GArg, GExpr, GLambdaForm, GOperation, GPredicateForm};

use super::Builder;

impl Builder<'_, '_> {
    pub fn build_expression(&mut self, form: &GExpr) -> Result<Expression> {
        match form {
            GExpr::V => self.build_value(),
            GExpr::Block { members } => self.build_block(members),
            GExpr::S {
                operation,
                operands,
            } => self.build_s_form(operation, operands),
            GExpr::Cond { predicate, form } => self.build_conditional(predicate, form),
            GExpr::Lambda { has_type, form } => self.build_lambda(*has_type, form),
            GExpr::LambdaForm { form } => {
                let (pos, span) = self.start();
                let (parameters, body) = self.build_lambda_form(form)?;
                let meta = MetaData::new(pos, span.cover(self.cur.last_span()));
                Ok(Expression::LExpr {
                    parameters,
                    body: Box::new(body),
                    bare: true,
                    meta,
                })
            }
            GExpr::M {
                namespace_depth,
                accessors,
            } => self.build_member(*namespace_depth, accessors),
            GExpr::Match => Err(CompileError::Parse {
                pos: self.cur.peek().pos,
                expected: "an implemented expression".to_owned(),
                found: "`match` (not supported yet)".to_owned(),
            }),
            GExpr::Iter => Err(CompileError::Parse {
                pos: self.cur.peek().pos,
                expected: "an implemented expression".to_owned(),
                found: "`iter` (not supported yet)".to_owned(),
            }),
        }
    }

    /// One literal or identifier token.
    fn build_value(&mut self) -> Result<Expression> {
        let token = self.cur.consume()?;
        let value = match token.kind {
            TokenKind::True => Value::Bool(true),
            TokenKind::False => Value::Bool(false),
            TokenKind::Nil => Value::Nil,
            TokenKind::Int => match token.payload {
                TokenPayload::Int(v) => Value::I64(v),
                _ => return Err(CompileError::internal("int token without payload")),
            },
            TokenKind::Float => match token.payload {
                TokenPayload::Float(v) => Value::F64(v),
                _ => return Err(CompileError::internal("float token without payload")),
            },
            TokenKind::Identifier => match token.str_payload() {
                Some(name) => Value::Identifier(Symbol::unresolved(name)),
                None => return Err(CompileError::internal("identifier token without payload")),
            },
            TokenKind::String => {
                return Err(CompileError::Parse {
                    pos: token.pos,
                    expected: "an implemented literal".to_owned(),
                    found: "string literal (not supported yet)".to_owned(),
                });
            }
            other => {
                return Err(CompileError::Parse {
                    pos: token.pos,
                    expected: "literal or identifier".to_owned(),
                    found: other.describe().to_owned(),
                });
            }
        };
        Ok(Expression::VExpr {
            value,
            meta: MetaData::new(token.pos, token.span),
        })
    }

    fn build_block(&mut self, members: &[crate::parser::gform::GNode]) -> Result<Expression> {
        let (pos, span) = self.start();
        self.cur.consume_brace_open()?;
        let mut built: Vec<AstNode> = Vec::with_capacity(members.len());
        for member in members {
            built.push(self.build_node(member)?);
        }
        self.cur.consume_brace_close()?;
        Ok(Expression::BExpr {
            members: built,
            meta: MetaData::new(pos, span.cover(self.cur.last_span())),
        })
    }

    /// `( op … )` builds an operator expression; `( expr … )` builds an
    /// application, or collapses to the inner expression when it is pure
    /// grouping.
    fn build_s_form(&mut self, operation: &GOperation, operands: &[GExpr]) -> Result<Expression> {
        let (pos, span) = self.start();
        self.cur.consume_paren_open()?;
        match operation {
            GOperation::Op => {
                let token = self.cur.consume()?;
                let mut op = operation_for(token.kind).ok_or_else(|| {
                    CompileError::internal(format!("expected operator token, found {}", token.kind))
                })?;
                let built = self.build_operands(operands)?;
                if op == Operation::Sub && built.len() == 1 {
                    op = Operation::Negate;
                }
                self.cur.consume_paren_close()?;
                Ok(Expression::OExpr {
                    op,
                    operands: built,
                    meta: MetaData::new(pos, span.cover(self.cur.last_span())),
                })
            }
            GOperation::Expr(head) => {
                let callee = self.build_expression(head)?;
                let built = self.build_operands(operands)?;
                self.cur.consume_paren_close()?;
                if built.is_empty() {
                    // Pure grouping: the parens contribute nothing.
                    return Ok(callee);
                }
                Ok(Expression::SExpr {
                    callee: Box::new(callee),
                    operands: built,
                    meta: MetaData::new(pos, span.cover(self.cur.last_span())),
                })
            }
        }
    }

    fn build_operands(&mut self, operands: &[GExpr]) -> Result<Vec<Expression>> {
        let mut built = Vec::with_capacity(operands.len());
        for operand in operands {
            built.push(self.build_expression(operand)?);
        }
        Ok(built)
    }

    fn build_conditional(&mut self, predicate: &GExpr, form: &GPredicateForm) -> Result<Expression> {
        let (pos, span) = self.start();
        self.cur.consume_paren_open()?;
        let predicate = self.build_expression(predicate)?;

        let (form_pos, form_span) = self.start();
        let then = match &form.then {
            Some(expr) => {
                self.cur.consume_kind(TokenKind::Arrow)?;
                Some(Box::new(self.build_expression(expr)?))
            }
            None => None,
        };
        let otherwise = match &form.otherwise {
            Some(expr) => {
                self.cur.consume_kind(TokenKind::Colon)?;
                Some(Box::new(self.build_expression(expr)?))
            }
            None => None,
        };
        let form = PredicateForm {
            then,
            otherwise,
            meta: MetaData::new(form_pos, form_span.cover(self.cur.last_span())),
        };

        self.cur.consume_paren_close()?;
        Ok(Expression::PExpr {
            predicate: Box::new(predicate),
            form,
            meta: MetaData::new(pos, span.cover(self.cur.last_span())),
        })
    }

    fn build_lambda(&mut self, has_type: bool, form: &GLambdaForm) -> Result<Expression> {
        let (pos, span) = self.start();
        self.cur.consume_paren_open()?;
        self.cur.consume_kind(TokenKind::FatArrow)?;
        let declared = if has_type {
            self.cur.consume_kind(TokenKind::Colon)?;
            self.build_type()?
        } else {
            laurel_core::LangType::Undefined
        };
        let (parameters, body) = self.build_lambda_form(form)?;
        self.cur.consume_paren_close()?;
        let meta = MetaData::with_type(pos, span.cover(self.cur.last_span()), declared);
        Ok(Expression::LExpr {
            parameters,
            body: Box::new(body),
            bare: false,
            meta,
        })
    }

    fn build_lambda_form(&mut self, form: &GLambdaForm) -> Result<(Vec<Parameter>, Expression)> {
        self.cur.consume_kind(TokenKind::Pipe)?;
        let mut parameters = Vec::with_capacity(form.parameters.len());
        for param in &form.parameters {
            let modifiers = self.consume_modifiers(param.modifiers)?;
            let token_pos = self.cur.peek().pos;
            let token_span = self.cur.peek().span;
            // Parameters are declarations.
            let symbol = Symbol::declared(self.consume_identifier()?);
            let ty = if param.has_type {
                self.cur.consume_kind(TokenKind::Colon)?;
                self.build_type()?
            } else {
                laurel_core::LangType::Undefined
            };
            parameters.push(Parameter {
                modifiers,
                symbol,
                ty,
                pos: token_pos,
                span: token_span,
            });
        }
        self.cur.consume_kind(TokenKind::Pipe)?;
        let body = self.build_expression(&form.expr)?;
        Ok((parameters, body))
    }

    fn build_member(&mut self, namespace_depth: u32, accessors: &[GAccess]) -> Result<Expression> {
        let (pos, span) = self.start();
        let mut chain: Vec<Access> = Vec::with_capacity(namespace_depth as usize + accessors.len());

        for _ in 0..namespace_depth {
            let name = self.consume_identifier()?;
            self.cur.consume_kind(TokenKind::Arrow)?;
            chain.push(Access::Namespace(Symbol::unresolved(name)));
        }

        for (i, accessor) in accessors.iter().enumerate() {
            match accessor {
                GAccess::Identifier if i == 0 => {
                    let name = self.consume_identifier()?;
                    // The matcher cannot see text; a solitary base named
                    // after a primitive is really a type access.
                    if accessors.len() == 1 && Primitive::from_name(&name).is_some() {
                        chain.push(Access::Type(Symbol::unresolved(name)));
                    } else {
                        chain.push(Access::Identifier(Symbol::unresolved(name)));
                    }
                }
                GAccess::Identifier => {
                    self.cur.consume_kind(TokenKind::ColonDot)?;
                    let name = self.consume_identifier()?;
                    chain.push(Access::Identifier(Symbol::unresolved(name)));
                }
                GAccess::Type => {
                    let token = self.cur.consume()?;
                    let name = match token.kind {
                        TokenKind::Fn => "Fn",
                        TokenKind::Array => "Array",
                        other => {
                            return Err(CompileError::internal(format!(
                                "expected type token, found {other}"
                            )));
                        }
                    };
                    chain.push(Access::Type(Symbol::unresolved(name)));
                }
                GAccess::FuncCall { arguments } => {
                    self.cur.consume_kind(TokenKind::ColonColon)?;
                    let name = self.consume_identifier()?;
                    self.cur.consume_bracket_open()?;
                    let args = self.build_arguments(arguments)?;
                    self.cur.consume_bracket_close()?;
                    chain.push(Access::FunctionCall(Symbol::unresolved(name), args));
                }
                GAccess::FuncAccess => {
                    self.cur.consume_kind(TokenKind::ColonColon)?;
                    let name = self.consume_identifier()?;
                    chain.push(Access::FunctionAccess(Symbol::unresolved(name)));
                }
            }
        }

        if chain.iter().any(|a| matches!(a, Access::Type(_))) && chain.len() > 1 {
            return Err(CompileError::Parse {
                pos,
                expected: "type access to stand alone".to_owned(),
                found: "access chain".to_owned(),
            });
        }

        Ok(Expression::MExpr {
            accessors: chain,
            meta: MetaData::new(pos, span.cover(self.cur.last_span())),
        })
    }

    fn build_arguments(&mut self, arguments: &[GArg]) -> Result<Vec<Argument>> {
        let mut built = Vec::with_capacity(arguments.len());
        for arg in arguments {
            let modifiers = self.consume_modifiers(arg.modifiers)?;
            let expression = self.build_expression(&arg.expr)?;
            built.push(Argument {
                modifiers,
                expression,
            });
        }
        Ok(built)
    }
}

fn operation_for(kind: TokenKind) -> Option<Operation> {
    Some(match kind {
        TokenKind::Plus => Operation::Add,
        TokenKind::Minus => Operation::Sub,
        TokenKind::Star => Operation::Mul,
        TokenKind::Slash => Operation::Div,
        TokenKind::Caret => Operation::Pow,
        TokenKind::Percent => Operation::Mod,
        TokenKind::Greater => Operation::Greater,
        TokenKind::Less => Operation::Less,
        TokenKind::PlusPlus => Operation::Increment,
        TokenKind::MinusMinus => Operation::Decrement,
        TokenKind::GreaterEquals => Operation::GreaterEq,
        TokenKind::LessEquals => Operation::LessEq,
        TokenKind::BangEquals => Operation::NotEq,
        TokenKind::EqualsEquals => Operation::Eq,
        TokenKind::And => Operation::And,
        TokenKind::Or => Operation::Or,
        TokenKind::Nor => Operation::Nor,
        TokenKind::Xor => Operation::Xor,
        TokenKind::Xnor => Operation::Xnor,
        TokenKind::Nand => Operation::Nand,
        TokenKind::Not => Operation::Not,
        _ => return None,
    })
}
