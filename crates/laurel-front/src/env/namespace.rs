//! One node of the namespace tree.

use indexmap::IndexMap;
use laurel_core::{SourcePos, Span};

use crate::unit::{CompModule, UnitId};

use super::{NamespaceId, SymbolTable};

#[derive(Debug)]
pub struct Namespace {
    pub name: String,
    pub id: NamespaceId,
    pub parent: Option<NamespaceId>,
    pub children: IndexMap<String, NamespaceId>,
    pub module: CompModule,
    pub symbols: SymbolTable,
    pub imports: ImportTable,
}

impl Namespace {
    pub fn new(name: impl Into<String>, id: NamespaceId, parent: Option<NamespaceId>) -> Self {
        Self {
            name: name.into(),
            id,
            parent,
            children: IndexMap::new(),
            module: CompModule::default(),
            symbols: SymbolTable::new(),
            imports: ImportTable::default(),
        }
    }

    pub fn child(&self, name: &str) -> Option<NamespaceId> {
        self.children.get(name).copied()
    }
}

/// An import registered by stage 1, keyed by its visible name.
#[derive(Debug, Clone)]
pub struct Import {
    pub path: String,
    pub alias: Option<String>,
    pub target: NamespaceId,
    pub pos: SourcePos,
    pub span: Span,
    pub unit: UnitId,
}

impl Import {
    /// The name the import is reachable under: its alias, or its path name.
    pub fn visible_name(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.path)
    }
}

#[derive(Debug, Default)]
pub struct ImportTable {
    entries: IndexMap<String, Import>,
}

impl ImportTable {
    /// Registers an import under its visible name. A repeated name
    /// overwrites; the dependency edge was already recorded.
    pub fn insert(&mut self, import: Import) {
        self.entries.insert(import.visible_name().to_owned(), import);
    }

    pub fn get(&self, name: &str) -> Option<&Import> {
        self.entries.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Import> {
        self.entries.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
