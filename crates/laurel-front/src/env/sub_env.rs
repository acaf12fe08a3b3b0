//! Per-namespace scope-stack view over the environment.
//!
//! A `SubEnv` is always anchored at its namespace's root scope, which
//! cannot be popped. Lookup searches the live scope chain innermost-first,
//! then ancestor namespaces' root scopes, then imports by visible name.

use crate::ast::SymbolLoc;

use super::{Binding, Environment, NamespaceId, ScopeId};

/// Where a lookup hit came from; cross-namespace hits are subject to
/// visibility checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Local,
    Parent,
    Import,
}

#[derive(Debug)]
pub struct Found<'e> {
    pub loc: SymbolLoc,
    pub binding: &'e Binding,
    pub origin: Origin,
}

#[derive(Debug, Clone)]
pub struct SubEnv<'e> {
    env: &'e Environment,
    namespace: NamespaceId,
    scopes: Vec<ScopeId>,
}

impl<'e> SubEnv<'e> {
    pub fn new(env: &'e Environment, namespace: NamespaceId) -> Self {
        Self {
            env,
            namespace,
            scopes: vec![ScopeId::ROOT],
        }
    }

    pub fn env(&self) -> &'e Environment {
        self.env
    }

    pub fn namespace(&self) -> NamespaceId {
        self.namespace
    }

    pub fn chain(&self) -> &[ScopeId] {
        &self.scopes
    }

    pub fn current_scope(&self) -> ScopeId {
        *self.scopes.last().expect("scope chain is never empty")
    }

    /// Depth of the scope stack; the root is depth 1.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub fn push_scope(&mut self, scope: ScopeId) {
        self.scopes.push(scope);
    }

    /// Pops the innermost scope. The root scope stays.
    pub fn pop_scope(&mut self) -> Option<ScopeId> {
        if self.scopes.len() > 1 {
            self.scopes.pop()
        } else {
            None
        }
    }

    /// Innermost binding for `name`: local chain, then ancestor namespace
    /// roots, then imports in registration order.
    pub fn lookup(&self, name: &str) -> Option<Found<'e>> {
        let namespace = self.env.namespace(self.namespace);
        if let Some((scope, binding)) = namespace.symbols.lookup(&self.scopes, name) {
            return Some(Found {
                loc: SymbolLoc {
                    namespace: self.namespace,
                    scope,
                },
                binding,
                origin: Origin::Local,
            });
        }

        let mut parent = namespace.parent;
        while let Some(ns) = parent {
            if let Some(found) = self.lookup_in_namespace(ns, name) {
                return Some(Found {
                    origin: Origin::Parent,
                    ..found
                });
            }
            parent = self.env.namespace(ns).parent;
        }

        for import in namespace.imports.iter() {
            if let Some(found) = self.lookup_in_namespace(import.target, name) {
                return Some(Found {
                    origin: Origin::Import,
                    ..found
                });
            }
        }

        None
    }

    /// Root-scope lookup in an arbitrary namespace, e.g. an access target.
    pub fn lookup_in_namespace(&self, ns: NamespaceId, name: &str) -> Option<Found<'e>> {
        let binding = self.env.namespace(ns).symbols.get(ScopeId::ROOT, name)?;
        Some(Found {
            loc: SymbolLoc {
                namespace: ns,
                scope: ScopeId::ROOT,
            },
            binding,
            origin: if ns == self.namespace {
                Origin::Local
            } else {
                Origin::Import
            },
        })
    }

    /// Resolves a namespace name as an access prefix: import visible name
    /// first, then a direct child, then the root name itself.
    pub fn resolve_namespace(&self, name: &str) -> Option<NamespaceId> {
        let namespace = self.env.namespace(self.namespace);
        if let Some(import) = namespace.imports.get(name) {
            return Some(import.target);
        }
        if let Some(child) = namespace.child(name) {
            return Some(child);
        }
        if name == super::environment::ROOT_NAME {
            return Some(self.env.root());
        }
        None
    }

    /// Names visible from here, for did-you-mean suggestions: local chain,
    /// ancestor roots, and import names.
    pub fn visible_names(&self) -> Vec<String> {
        let namespace = self.env.namespace(self.namespace);
        let mut names: Vec<String> = namespace
            .symbols
            .visible_names(&self.scopes)
            .into_iter()
            .map(str::to_owned)
            .collect();

        let mut parent = namespace.parent;
        while let Some(ns) = parent {
            let parent_ns = self.env.namespace(ns);
            names.extend(parent_ns.symbols.names_in(ScopeId::ROOT).map(str::to_owned));
            parent = parent_ns.parent;
        }

        names.extend(namespace.imports.names().map(str::to_owned));
        names
    }
}
