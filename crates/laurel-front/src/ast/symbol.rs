//! Symbols as the AST carries them: a name plus a promotable resolution.
//!
//! Symbols do not own their bindings. A resolved symbol carries only the
//! namespace and scope of the binding that satisfied it; the binding itself
//! lives in that namespace's symbol table.

use std::cell::Cell;

use crate::env::{NamespaceId, ScopeId};

/// Where a resolved symbol's binding lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymbolLoc {
    pub namespace: NamespaceId,
    pub scope: ScopeId,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// A use site waiting for stage 2.
    Unresolved,
    /// A declaration site; the binding location is fixed by stage 1.
    Declared,
    /// A use site satisfied by stage 2.
    Resolved(SymbolLoc),
}

#[derive(Debug, Clone)]
pub struct Symbol {
    pub name: String,
    resolution: Cell<Resolution>,
}

impl Symbol {
    /// A use-site symbol, pending stage 2.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolution: Cell::new(Resolution::Unresolved),
        }
    }

    /// A declaration-site symbol.
    pub fn declared(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            resolution: Cell::new(Resolution::Declared),
        }
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution.get()
    }

    pub fn is_resolved(&self) -> bool {
        !matches!(self.resolution.get(), Resolution::Unresolved)
    }

    /// Promotes a use site in place once its binding is found.
    pub fn resolve(&self, loc: SymbolLoc) {
        self.resolution.set(Resolution::Resolved(loc));
    }
}

impl std::fmt::Display for Symbol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)
    }
}
