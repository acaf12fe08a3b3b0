//! The global environment: namespace registry and tree operations.

use crate::error::IoError;
use crate::loader::SourceLoader;
use crate::resolve::deps::DependencyGraph;
use crate::unit::{Unit, UnitId};

use super::{Namespace, NamespaceId};

pub const ROOT_NAME: &str = "main";

#[derive(Debug)]
pub struct Environment {
    namespaces: Vec<Namespace>,
    /// Import dependency graph, populated by resolver stage 1.
    pub(crate) deps: DependencyGraph,
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

impl Environment {
    /// A fresh environment containing only the `main` root namespace.
    pub fn new() -> Self {
        Self {
            namespaces: vec![Namespace::new(ROOT_NAME, NamespaceId(0), None)],
            deps: DependencyGraph::default(),
        }
    }

    pub fn root(&self) -> NamespaceId {
        NamespaceId(0)
    }

    pub fn len(&self) -> usize {
        self.namespaces.len()
    }

    pub fn namespace(&self, id: NamespaceId) -> &Namespace {
        &self.namespaces[id.index()]
    }

    pub fn namespace_mut(&mut self, id: NamespaceId) -> &mut Namespace {
        &mut self.namespaces[id.index()]
    }

    pub fn ids(&self) -> impl Iterator<Item = NamespaceId> + use<> {
        (0..self.namespaces.len() as u32).map(NamespaceId)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.namespaces.iter()
    }

    pub fn unit(&self, id: UnitId) -> &Unit {
        self.namespace(id.namespace)
            .module
            .get(id.index)
            .expect("invalid UnitId")
    }

    pub fn unit_mut(&mut self, id: UnitId) -> &mut Unit {
        self.namespace_mut(id.namespace)
            .module
            .get_mut(id.index)
            .expect("invalid UnitId")
    }

    /// Every unit id, in namespace then module order.
    pub fn unit_ids(&self) -> Vec<UnitId> {
        let mut ids = Vec::new();
        for ns in self.ids() {
            for index in 0..self.namespace(ns).module.len() as u32 {
                ids.push(UnitId {
                    namespace: ns,
                    index,
                });
            }
        }
        ids
    }

    /// Gets or creates a direct child of `parent`.
    pub fn add_namespace(&mut self, parent: NamespaceId, name: &str) -> NamespaceId {
        if let Some(existing) = self.namespace(parent).child(name) {
            return existing;
        }
        let id = NamespaceId(self.namespaces.len() as u32);
        self.namespaces.push(Namespace::new(name, id, Some(parent)));
        self.namespace_mut(parent)
            .children
            .insert(name.to_owned(), id);
        id
    }

    /// Gets or creates the namespace for a dotted path, rooted at `main`.
    /// A leading `main` segment is accepted and skipped.
    pub fn ensure_path(&mut self, path: &str) -> NamespaceId {
        let mut current = self.root();
        for segment in Self::segments(path) {
            current = self.add_namespace(current, segment);
        }
        current
    }

    /// Resolves a dotted path to an existing namespace.
    ///
    /// A path whose first segment is the root name is absolute. Otherwise
    /// the path is tried against the requester's children, then against
    /// each ancestor's children up to the root.
    pub fn resolve_path(&self, from: NamespaceId, path: &str) -> Option<NamespaceId> {
        let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        match segments.split_first() {
            None => None,
            Some((first, rest)) if *first == ROOT_NAME => self.walk(self.root(), rest),
            Some(_) => {
                let mut anchor = Some(from);
                while let Some(ns) = anchor {
                    if let Some(found) = self.walk(ns, &segments) {
                        return Some(found);
                    }
                    anchor = self.namespace(ns).parent;
                }
                None
            }
        }
    }

    fn walk(&self, from: NamespaceId, segments: &[&str]) -> Option<NamespaceId> {
        let mut current = from;
        for &segment in segments {
            current = self.namespace(current).child(segment)?;
        }
        Some(current)
    }

    /// Dotted path of a namespace from the root.
    pub fn path_of(&self, id: NamespaceId) -> String {
        let mut parts = Vec::new();
        let mut current = Some(id);
        while let Some(ns) = current {
            let namespace = self.namespace(ns);
            parts.push(namespace.name.as_str());
            current = namespace.parent;
        }
        parts.reverse();
        parts.join(".")
    }

    /// Builds the namespace tree and its units from a loader. IO stays in
    /// the loader and the `read` transform; this only shapes the tree.
    pub fn load_tree(&mut self, loader: &impl SourceLoader) -> Result<(), IoError> {
        for path in loader.namespaces()? {
            let ns = self.ensure_path(&path);
            for (name, origin) in loader.load(&path)? {
                self.namespace_mut(ns).module.push(Unit::new(name, origin));
            }
        }
        Ok(())
    }

    fn segments(path: &str) -> impl Iterator<Item = &str> {
        path.split('.')
            .filter(|s| !s.is_empty())
            .skip_while(|s| *s == ROOT_NAME)
    }
}
