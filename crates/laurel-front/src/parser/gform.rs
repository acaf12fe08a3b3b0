//! Grammar forms: the shape-only intermediate between tokens and AST.
//!
//! A `GForm` records *what* syntactic shape was matched: counts and
//! booleans only. It carries no tokens and no source text; the AST builder
//! re-consumes the same tokens under its guidance. Trees are produced per
//! top-level construct and consumed immediately.

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GNode {
    Stmt(GStmt),
    Expr(GExpr),
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GStmt {
    Let {
        modifiers: u32,
        has_type: bool,
        expr: GExpr,
    },
    Reassign {
        expr: GExpr,
    },
    Import {
        has_alias: bool,
    },
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GExpr {
    /// `( head operands… )`; empty operands with an expression head is
    /// grouping.
    S {
        operation: Box<GOperation>,
        operands: Vec<GExpr>,
    },
    /// One literal or identifier token, consumed later by the builder.
    V,
    /// Namespace hops followed by an access chain.
    M {
        namespace_depth: u32,
        accessors: Vec<GAccess>,
    },
    Block {
        members: Vec<GNode>,
    },
    /// `( predicate -> then : else )` with at least one arm.
    Cond {
        predicate: Box<GExpr>,
        form: GPredicateForm,
    },
    /// `( => [: T] | params | body )`
    Lambda {
        has_type: bool,
        form: GLambdaForm,
    },
    /// Bare `| params | body`.
    LambdaForm {
        form: GLambdaForm,
    },
    Match,
    Iter,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GOperation {
    Expr(GExpr),
    /// The operator token is consumed later.
    Op,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GLambdaForm {
    pub parameters: Vec<GParam>,
    pub expr: Box<GExpr>,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GParam {
    pub modifiers: u32,
    pub has_type: bool,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum GAccess {
    /// Bare access base, or a `:.`-prefixed field access when not first.
    Identifier,
    /// `:: name [ args ]`
    FuncCall { arguments: Vec<GArg> },
    /// `:: name` with no bracket: identity access, always terminal.
    FuncAccess,
    /// `Fn` / `Array` in base position; solitary.
    Type,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GArg {
    pub modifiers: u32,
    pub expr: GExpr,
}

#[cfg_attr(test, derive(serde::Serialize))]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GPredicateForm {
    pub then: Option<Box<GExpr>>,
    pub otherwise: Option<Box<GExpr>>,
}
