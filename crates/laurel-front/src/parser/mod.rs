//! Two-phase parser: grammar matching over a speculative sub-cursor, then
//! AST construction from the driver cursor.
//!
//! Per top-level construct, the matcher produces a shape-only `GForm` from
//! a sub-cursor derived at the driver's position; the builder then
//! re-consumes the same tokens. The two must land on the same index; any
//! drift is an internal error.

pub mod builder;
pub mod cursor;
pub mod gform;
pub mod matcher;


use crate::ast::{AstNode, CompilationUnit};
use crate::error::{CompileError, Result};
use crate::lexer::Token;

use builder::Builder;
use cursor::DriverCursor;
use matcher::Matcher;

/// Parses one unit's token stream into a compilation unit.
pub fn parse_unit(tokens: &[Token]) -> Result<CompilationUnit> {
    let mut driver = DriverCursor::new(tokens)?;
    let mut members = Vec::new();

    while !driver.at_eof() {
        let mut stmts = Matcher::new(driver.sub());
        if let Some(form) = stmts.match_statement()? {
            let expected = stmts.into_cursor().index();
            let built = Builder::new(&mut driver).build_statement(&form)?;
            check_alignment(&driver, expected)?;
            members.push(AstNode::Stmt(built));
            continue;
        }

        let mut exprs = Matcher::new(driver.sub());
        match exprs.match_expression()? {
            Some(form) => {
                let expected = exprs.into_cursor().index();
                let built = Builder::new(&mut driver).build_expression(&form)?;
                check_alignment(&driver, expected)?;
                members.push(AstNode::Expr(built));
            }
            None => {
                return Err(CompileError::InvalidGrammar {
                    pos: driver.peek().pos,
                    expected: "statement or expression".to_owned(),
                });
            }
        }
    }

    if !driver.balanced() {
        return Err(CompileError::internal("unbalanced containers after parse"));
    }
    Ok(CompilationUnit { members })
}

fn check_alignment(driver: &DriverCursor<'_>, expected: usize) -> Result<()> {
    if driver.index() != expected {
        return Err(CompileError::internal(format!(
            "parser drift: builder at token {}, matcher ended at {}",
            driver.index(),
            expected
        )));
    }
    Ok(())
}
