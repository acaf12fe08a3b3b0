//! Error taxonomy for the front-end.
//!
//! Everything fallible returns `Result<_, CompileError>`. Lex, parse, and
//! internal errors are fatal to their unit; resolution errors accumulate in
//! [`crate::Diagnostics`] and freeze the unit without aborting siblings.

use laurel_core::{LangType, SourcePos};

pub type Result<T> = std::result::Result<T, CompileError>;

#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    /// Invalid character or malformed number.
    #[error("lex error at {pos}: {message}")]
    Lex { pos: SourcePos, message: String },

    /// Token mismatch during AST construction.
    #[error("parse error at {pos}: expected {expected}, found {found}")]
    Parse {
        pos: SourcePos,
        expected: String,
        found: String,
    },

    /// Grammar-matcher rejection with a definite diagnosis.
    #[error("invalid grammar at {pos}: expected {expected}")]
    InvalidGrammar { pos: SourcePos, expected: String },

    /// A front-end invariant was violated.
    #[error("internal error: {0}")]
    Internal(String),

    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    #[error(transparent)]
    Io(#[from] IoError),
}

impl CompileError {
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        CompileError::Internal(message.into())
    }
}

/// Errors produced by the two resolver stages. Non-fatal: they are
/// collected per unit and reported together.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ResolutionError {
    #[error("undefined symbol `{name}`")]
    UndefinedSymbol {
        name: String,
        pos: SourcePos,
        suggestions: Vec<String>,
    },

    #[error("duplicate symbol `{name}`")]
    DuplicateSymbol {
        name: String,
        existing: SourcePos,
        new: SourcePos,
    },

    #[error("circular namespace dependency: {}", cycle.join(" -> "))]
    CircularDependency { cycle: Vec<String> },

    #[error("unresolved import `{path}`")]
    UnresolvedImport { path: String, pos: SourcePos },

    #[error("type mismatch: expected `{expected}`, found `{actual}`")]
    TypeMismatch {
        expected: LangType,
        actual: LangType,
        pos: SourcePos,
    },

    #[error("{kind} `{symbol}`")]
    AccessibilityViolation {
        symbol: String,
        pos: SourcePos,
        kind: AccessViolationKind,
    },

    #[error("symbol `{symbol}` is not assignable from scope `{scope}`")]
    ScopeViolation {
        symbol: String,
        scope: String,
        pos: SourcePos,
    },
}

impl ResolutionError {
    /// Position the error points at, when it has one.
    pub fn pos(&self) -> Option<SourcePos> {
        match self {
            ResolutionError::UndefinedSymbol { pos, .. }
            | ResolutionError::UnresolvedImport { pos, .. }
            | ResolutionError::TypeMismatch { pos, .. }
            | ResolutionError::AccessibilityViolation { pos, .. }
            | ResolutionError::ScopeViolation { pos, .. } => Some(*pos),
            ResolutionError::DuplicateSymbol { new, .. } => Some(*new),
            ResolutionError::CircularDependency { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessViolationKind {
    NotPublic,
    NotMutable,
    AssignToParameter,
}

impl std::fmt::Display for AccessViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            AccessViolationKind::NotPublic => "cannot access private symbol",
            AccessViolationKind::NotMutable => "cannot reassign immutable symbol",
            AccessViolationKind::AssignToParameter => "cannot reassign parameter",
        })
    }
}

/// IO failure surfaced unchanged from the source loader.
#[derive(Debug, thiserror::Error)]
#[error("io error on `{path}`: {source}")]
pub struct IoError {
    pub path: String,
    #[source]
    pub source: std::io::Error,
}

impl IoError {
    pub fn new(path: impl Into<String>, source: std::io::Error) -> Self {
        Self {
            path: path.into(),
            source,
        }
    }
}
