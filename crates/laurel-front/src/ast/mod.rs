//! The typed AST: a sealed hierarchy built once per source construct.
//!
//! Nodes are read-only after construction except for the [`MetaData`] slot,
//! whose interior-mutable cells the resolver promotes (type, resolution,
//! recorded scope, implicit conversions). That keeps parent references
//! valid across both resolver stages and the graph free of cycles.

mod symbol;

pub use symbol::{Resolution, Symbol, SymbolLoc};

use std::cell::{Cell, RefCell};

use laurel_core::{LangType, ModifierSet, Primitive, SourcePos, Span};

use crate::env::ScopeId;

/// Metadata attached to every statement and expression.
#[derive(Debug)]
pub struct MetaData {
    pub pos: SourcePos,
    pub span: Span,
    ty: RefCell<LangType>,
    resolved: Cell<bool>,
    scope: Cell<Option<ScopeId>>,
    conversion: Cell<Option<Conversion>>,
}

impl MetaData {
    pub fn new(pos: SourcePos, span: Span) -> Self {
        Self {
            pos,
            span,
            ty: RefCell::new(LangType::Undefined),
            resolved: Cell::new(false),
            scope: Cell::new(None),
            conversion: Cell::new(None),
        }
    }

    pub fn with_type(pos: SourcePos, span: Span, ty: LangType) -> Self {
        let meta = Self::new(pos, span);
        *meta.ty.borrow_mut() = ty;
        meta
    }

    pub fn ty(&self) -> LangType {
        self.ty.borrow().clone()
    }

    pub fn set_ty(&self, ty: LangType) {
        *self.ty.borrow_mut() = ty;
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.get()
    }

    pub fn mark_resolved(&self) {
        self.resolved.set(true);
    }

    /// Scope allocated by stage 1 for block and lambda nodes; stage 2
    /// re-enters it instead of allocating a new one.
    pub fn scope(&self) -> Option<ScopeId> {
        self.scope.get()
    }

    pub fn record_scope(&self, scope: ScopeId) {
        self.scope.set(Some(scope));
    }

    pub fn conversion(&self) -> Option<Conversion> {
        self.conversion.get()
    }

    pub fn record_conversion(&self, conversion: Conversion) {
        self.conversion.set(Some(conversion));
    }
}

/// An implicit numeric conversion recorded by stage 2.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub from: Primitive,
    pub to: Primitive,
}

/// One source file's worth of top-level constructs.
#[derive(Debug, Default)]
pub struct CompilationUnit {
    pub members: Vec<AstNode>,
}

/// Top-level and block-level node: statement or expression only.
#[derive(Debug)]
pub enum AstNode {
    Stmt(Statement),
    Expr(Expression),
}

impl AstNode {
    pub fn meta(&self) -> &MetaData {
        match self {
            AstNode::Stmt(stmt) => stmt.meta(),
            AstNode::Expr(expr) => expr.meta(),
        }
    }
}

#[derive(Debug)]
pub enum Statement {
    Let {
        symbol: Symbol,
        modifiers: ModifierSet,
        value: Expression,
        meta: MetaData,
    },
    Assign {
        symbol: Symbol,
        value: Expression,
        meta: MetaData,
    },
    Import {
        path: String,
        alias: Option<String>,
        meta: MetaData,
    },
}

impl Statement {
    pub fn meta(&self) -> &MetaData {
        match self {
            Statement::Let { meta, .. }
            | Statement::Assign { meta, .. }
            | Statement::Import { meta, .. } => meta,
        }
    }
}

#[derive(Debug)]
pub enum Expression {
    /// `{ … }` block; its type is the last member expression's type, or
    /// `Nil` for a statement-only block.
    BExpr {
        members: Vec<AstNode>,
        meta: MetaData,
    },
    /// `( callee operands… )` with an expression callee.
    SExpr {
        callee: Box<Expression>,
        operands: Vec<Expression>,
        meta: MetaData,
    },
    /// `( op operands… )` with an operator head.
    OExpr {
        op: Operation,
        operands: Vec<Expression>,
        meta: MetaData,
    },
    /// Bare literal or identifier.
    VExpr { value: Value, meta: MetaData },
    /// Namespace hops plus an access chain, length >= 1.
    MExpr {
        accessors: Vec<Access>,
        meta: MetaData,
    },
    /// Lambda; `bare` distinguishes `| … |` from `( => … )`.
    LExpr {
        parameters: Vec<Parameter>,
        body: Box<Expression>,
        bare: bool,
        meta: MetaData,
    },
    /// Conditional s-expression.
    PExpr {
        predicate: Box<Expression>,
        form: PredicateForm,
        meta: MetaData,
    },
    /// Reserved.
    MatchExpr { meta: MetaData },
    /// Reserved.
    IterExpr { meta: MetaData },
}

impl Expression {
    pub fn meta(&self) -> &MetaData {
        match self {
            Expression::BExpr { meta, .. }
            | Expression::SExpr { meta, .. }
            | Expression::OExpr { meta, .. }
            | Expression::VExpr { meta, .. }
            | Expression::MExpr { meta, .. }
            | Expression::LExpr { meta, .. }
            | Expression::PExpr { meta, .. }
            | Expression::MatchExpr { meta }
            | Expression::IterExpr { meta } => meta,
        }
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, Expression::LExpr { .. })
    }
}

#[derive(Debug)]
pub struct PredicateForm {
    pub then: Option<Box<Expression>>,
    pub otherwise: Option<Box<Expression>>,
    pub meta: MetaData,
}

/// Literal values. String, array, and tuple literals are reserved.
#[derive(Debug)]
pub enum Value {
    Bool(bool),
    I64(i64),
    F64(f64),
    Identifier(Symbol),
    Nil,
}

/// Operator set mirroring the operation tokens, plus `Negate` for the
/// single-operand minus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
    Mod,
    Greater,
    Less,
    Increment,
    Decrement,
    GreaterEq,
    LessEq,
    NotEq,
    Eq,
    And,
    Or,
    Nor,
    Xor,
    Xnor,
    Nand,
    Not,
    Negate,
}

impl Operation {
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            Operation::Greater
                | Operation::Less
                | Operation::GreaterEq
                | Operation::LessEq
                | Operation::NotEq
                | Operation::Eq
        )
    }

    pub fn is_logic(&self) -> bool {
        matches!(
            self,
            Operation::And
                | Operation::Or
                | Operation::Nor
                | Operation::Xor
                | Operation::Xnor
                | Operation::Nand
                | Operation::Not
        )
    }

    pub fn is_arithmetic(&self) -> bool {
        matches!(
            self,
            Operation::Add
                | Operation::Sub
                | Operation::Mul
                | Operation::Div
                | Operation::Pow
                | Operation::Mod
                | Operation::Increment
                | Operation::Decrement
                | Operation::Negate
        )
    }
}

#[derive(Debug)]
pub struct Argument {
    pub modifiers: ModifierSet,
    pub expression: Expression,
}

#[derive(Debug)]
pub struct Parameter {
    pub modifiers: ModifierSet,
    pub symbol: Symbol,
    pub ty: LangType,
    pub pos: SourcePos,
    pub span: Span,
}

/// One element of a member-access chain.
#[derive(Debug)]
pub enum Access {
    /// A namespace hop (`name ->`).
    Namespace(Symbol),
    /// The access base or a `:.` field access.
    Identifier(Symbol),
    /// `:: name [ args ]`
    FunctionCall(Symbol, Vec<Argument>),
    /// `:: name`: identity access, terminal.
    FunctionAccess(Symbol),
    /// A type in base position; solitary.
    Type(Symbol),
}

impl Access {
    pub fn symbol(&self) -> &Symbol {
        match self {
            Access::Namespace(symbol)
            | Access::Identifier(symbol)
            | Access::FunctionCall(symbol, _)
            | Access::FunctionAccess(symbol)
            | Access::Type(symbol) => symbol,
        }
    }
}
