//! Shallow per-level storage: the nodes and edges registered directly on one graph level.

use crate::entity::{EdgeKey, NodeKey};
use crate::graph::Graph;
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

#[derive(Debug, Clone, Default)]
pub struct NodeCollection {
    nodes: IndexMap<String, NodeKey, FxBuildHasher>,
    edges: IndexMap<String, EdgeKey, FxBuildHasher>,
}

impl NodeCollection {
    pub fn add_node(&mut self, id: impl Into<String>, node: NodeKey) {
        self.nodes.insert(id.into(), node);
    }

    /// Drops `id` if it maps to `node`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str, node: NodeKey) -> bool {
        if self.nodes.get(id) != Some(&node) {
            return false;
        }
        self.nodes.shift_remove(id).is_some()
    }

    pub fn find_shallow(&self, id: &str) -> Option<NodeKey> {
        self.nodes.get(id).copied()
    }

    pub fn contains(&self, id: &str, node: NodeKey) -> bool {
        self.nodes.get(id) == Some(&node)
    }

    /// Registers `edge` under `id`, returning the edge previously registered under that id.
    pub fn add_edge(&mut self, id: impl Into<String>, edge: EdgeKey) -> Option<EdgeKey> {
        self.edges.insert(id.into(), edge)
    }

    pub fn find_edge(&self, id: &str) -> Option<EdgeKey> {
        self.edges.get(id).copied()
    }

    pub fn remove_edge(&mut self, id: &str, edge: EdgeKey) -> bool {
        if self.edges.get(id) != Some(&edge) {
            return false;
        }
        self.edges.shift_remove(id).is_some()
    }

    pub fn nodes_shallow(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.values().copied()
    }

    pub(crate) fn node_values(&self) -> indexmap::map::Values<'_, String, NodeKey> {
        self.nodes.values()
    }

    pub fn node_ids(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn registered_edges(&self) -> impl Iterator<Item = (&str, EdgeKey)> {
        self.edges.iter().map(|(id, e)| (id.as_str(), *e))
    }

    pub fn node_shallow_count(&self) -> usize {
        self.nodes.len()
    }

    /// Out- and self-edges of the shallow nodes; linear in the number of nodes.
    pub fn edge_count(&self, graph: &Graph) -> usize {
        self.nodes
            .values()
            .filter_map(|&n| graph.node(n))
            .map(|n| n.out_degree() + n.self_degree())
            .sum()
    }

    /// Edges adjacent to shallow nodes. In-edges are skipped so that each edge is reported once.
    pub fn edges<'a>(&'a self, graph: &'a Graph) -> impl Iterator<Item = EdgeKey> + 'a {
        self.nodes
            .values()
            .filter_map(move |&n| graph.node(n))
            .flat_map(|n| n.out_edges().iter().chain(n.self_edges().iter()).copied())
    }

    pub fn node_is_consistent(&self, graph: &Graph, n: NodeKey) -> bool {
        let Some(node) = graph.node(n) else {
            return false;
        };
        for &e in node.out_edges() {
            let Some(edge) = graph.edge(e) else {
                return false;
            };
            if edge.source() != n || edge.is_self_loop() {
                return false;
            }
        }
        for &e in node.in_edges() {
            let Some(edge) = graph.edge(e) else {
                return false;
            };
            if edge.target() != n || edge.is_self_loop() {
                return false;
            }
        }
        for &e in node.self_edges() {
            let Some(edge) = graph.edge(e) else {
                return false;
            };
            if !edge.is_self_loop() || edge.source() != n {
                return false;
            }
        }
        true
    }

    pub fn is_consistent(&self, graph: &Graph) -> bool {
        self.nodes
            .values()
            .all(|&n| self.node_is_consistent(graph, n))
    }
}
