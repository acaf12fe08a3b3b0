//! Per-namespace symbol tables.
//!
//! A table maps scope ids to name/binding maps. Bindings are owned here;
//! AST symbols carry only a location hint back to them. The fields stage 2
//! promotes (type, initialization, forward declaration) are interior-
//! mutable so promotion works through a shared environment reference.

use std::cell::{Cell, RefCell};

use indexmap::IndexMap;
use laurel_core::{LangType, Modifier, ModifierSet, SourcePos, Span};

use crate::unit::UnitId;

use super::ScopeId;

/// What kind of declaration produced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// `let` whose value is not a lambda.
    Field,
    /// `let` bound to a lambda.
    Function,
    /// Lambda parameter.
    Parameter,
}

#[derive(Debug)]
pub struct Binding {
    pub name: String,
    pub pos: SourcePos,
    pub span: Span,
    /// Unit the declaration came from, when known.
    pub unit: Option<UnitId>,
    pub modifiers: ModifierSet,
    pub kind: BindingKind,
    ty: RefCell<LangType>,
    initialized: Cell<bool>,
    forward: Cell<bool>,
}

impl Binding {
    pub fn new(
        name: impl Into<String>,
        pos: SourcePos,
        span: Span,
        modifiers: ModifierSet,
        kind: BindingKind,
        ty: LangType,
    ) -> Self {
        Self {
            name: name.into(),
            pos,
            span,
            unit: None,
            modifiers,
            kind,
            ty: RefCell::new(ty),
            initialized: Cell::new(false),
            forward: Cell::new(false),
        }
    }

    pub fn with_unit(mut self, unit: UnitId) -> Self {
        self.unit = Some(unit);
        self
    }

    pub fn ty(&self) -> LangType {
        self.ty.borrow().clone()
    }

    pub fn set_ty(&self, ty: LangType) {
        *self.ty.borrow_mut() = ty;
    }

    pub fn is_public(&self) -> bool {
        self.modifiers.contains(Modifier::Public)
    }

    pub fn is_mutable(&self) -> bool {
        self.modifiers.contains(Modifier::Mutable)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    pub fn mark_initialized(&self) {
        self.initialized.set(true);
    }

    /// Forward-declared bindings exist by name but their type is not yet
    /// trusted; stage 2 fills them in when their namespace is re-visited.
    pub fn is_forward_declared(&self) -> bool {
        self.forward.get()
    }

    pub fn mark_forward_declared(&self) {
        self.forward.set(true);
    }

    pub fn clear_forward_declared(&self) {
        self.forward.set(false);
    }
}

/// The prior declaration reported by a failed [`SymbolTable::insert`].
#[derive(Debug, Clone, Copy)]
pub struct DuplicateInfo {
    pub pos: SourcePos,
    pub span: Span,
    pub unit: Option<UnitId>,
}

#[derive(Debug)]
pub struct SymbolTable {
    scopes: IndexMap<ScopeId, IndexMap<String, Binding>>,
    next_scope: u32,
}

impl Default for SymbolTable {
    fn default() -> Self {
        let mut scopes = IndexMap::new();
        scopes.insert(ScopeId::ROOT, IndexMap::new());
        Self {
            scopes,
            next_scope: 1,
        }
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a fresh scope. Ids are never reused, even after `clear`.
    pub fn allocate_scope(&mut self) -> ScopeId {
        let id = ScopeId(self.next_scope);
        self.next_scope += 1;
        self.scopes.insert(id, IndexMap::new());
        id
    }

    /// Inserts a binding. On a name collision in the same scope the table
    /// is unchanged and the existing declaration site is returned.
    pub fn insert(&mut self, scope: ScopeId, binding: Binding) -> Result<(), DuplicateInfo> {
        let bindings = self.scopes.entry(scope).or_default();
        if let Some(existing) = bindings.get(&binding.name) {
            return Err(DuplicateInfo {
                pos: existing.pos,
                span: existing.span,
                unit: existing.unit,
            });
        }
        bindings.insert(binding.name.clone(), binding);
        Ok(())
    }

    pub fn get(&self, scope: ScopeId, name: &str) -> Option<&Binding> {
        self.scopes.get(&scope)?.get(name)
    }

    /// Searches the chain innermost-first and returns the first match.
    pub fn lookup(&self, chain: &[ScopeId], name: &str) -> Option<(ScopeId, &Binding)> {
        for &scope in chain.iter().rev() {
            if let Some(binding) = self.get(scope, name) {
                return Some((scope, binding));
            }
        }
        None
    }

    /// Drops a scope and its bindings.
    pub fn clear(&mut self, scope: ScopeId) {
        if scope == ScopeId::ROOT {
            if let Some(bindings) = self.scopes.get_mut(&ScopeId::ROOT) {
                bindings.clear();
            }
        } else {
            self.scopes.shift_remove(&scope);
        }
    }

    pub fn names_in(&self, scope: ScopeId) -> impl Iterator<Item = &str> {
        self.scopes
            .get(&scope)
            .into_iter()
            .flat_map(|bindings| bindings.keys().map(String::as_str))
    }

    pub fn bindings_in(&self, scope: ScopeId) -> impl Iterator<Item = &Binding> {
        self.scopes
            .get(&scope)
            .into_iter()
            .flat_map(|bindings| bindings.values())
    }

    /// All names visible from a chain, innermost first, for suggestions.
    pub fn visible_names(&self, chain: &[ScopeId]) -> Vec<&str> {
        let mut names = Vec::new();
        for &scope in chain.iter().rev() {
            names.extend(self.names_in(scope));
        }
        names
    }

    pub fn scope_count(&self) -> usize {
        self.scopes.len()
    }
}
