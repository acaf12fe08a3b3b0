//! Namespace dependency graph.
//!
//! Nodes carry a tri-state color used by the cycle-detecting DFS. Edges
//! remember the import site that created them so cycle diagnostics can
//! point somewhere useful. All containers are insertion-ordered, which
//! makes cycle reports and the topological order deterministic.

use indexmap::IndexMap;
use laurel_core::Span;

use crate::env::NamespaceId;
use crate::unit::UnitId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    White,
    Gray,
    Black,
}

/// The import statement that created an edge.
#[derive(Debug, Clone, Copy)]
pub struct EdgeInfo {
    pub unit: UnitId,
    pub span: Span,
}

#[derive(Debug, Default)]
pub struct DependencyGraph {
    nodes: IndexMap<NamespaceId, Color>,
    edges: IndexMap<NamespaceId, IndexMap<NamespaceId, EdgeInfo>>,
}

impl DependencyGraph {
    /// Re-seeds the graph with a node set and no edges.
    pub fn reset(&mut self, nodes: impl IntoIterator<Item = NamespaceId>) {
        self.nodes.clear();
        self.edges.clear();
        for node in nodes {
            self.nodes.insert(node, Color::White);
        }
    }

    pub fn add_node(&mut self, node: NamespaceId) {
        self.nodes.entry(node).or_insert(Color::White);
    }

    /// Records `from` depending on `to`. Self-imports are ignored.
    pub fn add_edge(&mut self, from: NamespaceId, to: NamespaceId, info: EdgeInfo) {
        if from == to {
            return;
        }
        self.add_node(from);
        self.add_node(to);
        self.edges.entry(from).or_default().entry(to).or_insert(info);
    }

    pub fn edge(&self, from: NamespaceId, to: NamespaceId) -> Option<&EdgeInfo> {
        self.edges.get(&from)?.get(&to)
    }

    pub fn dependencies(&self, of: NamespaceId) -> impl Iterator<Item = NamespaceId> + '_ {
        self.edges
            .get(&of)
            .into_iter()
            .flat_map(|targets| targets.keys().copied())
    }

    /// Incoming-edge count of `node`, counting only edges from `within`.
    pub fn incoming_within(&self, node: NamespaceId, within: &[NamespaceId]) -> usize {
        within
            .iter()
            .filter(|&&from| from != node && self.edge(from, node).is_some())
            .count()
    }

    /// Three-color DFS. Every back edge yields the cycle from the
    /// re-visited node to the current one. Node colors are left Black.
    pub fn detect_cycles(&mut self) -> Vec<Vec<NamespaceId>> {
        for color in self.nodes.values_mut() {
            *color = Color::White;
        }
        let mut cycles = Vec::new();
        let mut path = Vec::new();
        let roots: Vec<NamespaceId> = self.nodes.keys().copied().collect();
        for node in roots {
            if self.nodes[&node] == Color::White {
                self.visit(node, &mut path, &mut cycles);
            }
        }
        cycles
    }

    fn visit(
        &mut self,
        node: NamespaceId,
        path: &mut Vec<NamespaceId>,
        cycles: &mut Vec<Vec<NamespaceId>>,
    ) {
        self.nodes.insert(node, Color::Gray);
        path.push(node);
        let targets: Vec<NamespaceId> = self.dependencies(node).collect();
        for next in targets {
            match self.nodes.get(&next).copied().unwrap_or(Color::White) {
                Color::White => self.visit(next, path, cycles),
                Color::Gray => {
                    let start = path
                        .iter()
                        .position(|&n| n == next)
                        .expect("gray node is on the path");
                    cycles.push(path[start..].to_vec());
                }
                Color::Black => {}
            }
        }
        path.pop();
        self.nodes.insert(node, Color::Black);
    }

    /// Dependencies-first order over all nodes. Back edges are skipped, so
    /// members of a cycle come out in a fixed, input-determined order.
    pub fn topo_order(&self) -> Vec<NamespaceId> {
        let mut state: IndexMap<NamespaceId, Color> =
            self.nodes.keys().map(|&n| (n, Color::White)).collect();
        let mut order = Vec::with_capacity(state.len());
        let roots: Vec<NamespaceId> = state.keys().copied().collect();
        for node in roots {
            self.postorder(node, &mut state, &mut order);
        }
        order
    }

    fn postorder(
        &self,
        node: NamespaceId,
        state: &mut IndexMap<NamespaceId, Color>,
        order: &mut Vec<NamespaceId>,
    ) {
        if state.get(&node).copied() != Some(Color::White) {
            return;
        }
        state.insert(node, Color::Gray);
        for next in self.dependencies(node) {
            self.postorder(next, state, order);
        }
        state.insert(node, Color::Black);
        order.push(node);
    }
}
