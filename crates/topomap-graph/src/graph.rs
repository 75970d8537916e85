//! The hierarchical graph: one arena of nodes and edges, rooted at a top-level subgraph.
//!
//! Every graph level (the root and each nested subgraph) is a [`Node`] carrying a
//! [`Subgraph`] payload with its own shallow [`NodeCollection`]. Parent, source, target and
//! owner links are arena handles, so the hierarchy has no reference cycles.
//!
//! Node ids are unique among the nodes reachable from the root. Liveness is derived: a node
//! is live when every collection on its parent chain still maps its id to it.

pub mod alg;
mod traverse;

pub use traverse::{
    AllSuccessorsDepthFirst, AllSuccessorsWidthFirst, ClusteredComponents, NodesBreadthFirst,
};

use crate::attributes::{AttributeKind, Attributes};
use crate::collection::NodeCollection;
use crate::entity::{Edge, EdgeKey, Node, NodeKey};
use crate::error::{GraphError, Result};
use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;
use std::ops::Range;

type HashMap<K, V> = hashbrown::HashMap<K, V, FxBuildHasher>;
type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

pub type GroupCounts = IndexMap<usize, usize, FxBuildHasher>;

const ROOT: NodeKey = NodeKey(0);

/// Payload of a node that is itself a graph level.
#[derive(Debug, Clone, Default)]
pub struct Subgraph {
    pub(crate) collection: NodeCollection,
    pub(crate) version: u64,
    pub(crate) group_counts: GroupCounts,
    pub(crate) position_ranges: Vec<Range<usize>>,
}

impl Subgraph {
    pub fn collection(&self) -> &NodeCollection {
        &self.collection
    }

    /// Dirty counter. Bumped only through [`Graph::trigger_update`].
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn group_counts(&self) -> &GroupCounts {
        &self.group_counts
    }

    /// Half-open ranges of native vertex ids owned by this level. Each id `i` covers the
    /// coordinate-buffer slots `i * 2` and `i * 2 + 1`.
    pub fn position_ranges(&self) -> &[Range<usize>] {
        &self.position_ranges
    }
}

/// How an edge relates its endpoints when one of them is a subgraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToAncestor {
    /// Neither endpoint contains the other.
    None,
    /// The source is a subgraph containing the target.
    FromAncestor,
    /// The target is a subgraph containing the source.
    ToAncestor,
}

/// An edge with exactly one endpoint outside a subgraph's subtree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundaryEdge {
    pub edge: EdgeKey,
    /// The endpoint lying outside the subtree.
    pub node: NodeKey,
    /// True when the outside endpoint is the edge's source.
    pub attached_at_source: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementRef {
    Node(NodeKey),
    Edge(EdgeKey),
}

#[derive(Debug, Clone)]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    id_index: HashMap<String, NodeKey>,
}

impl Graph {
    pub fn new(root_id: impl Into<String>) -> Self {
        Self {
            nodes: vec![Node::subgraph(root_id)],
            edges: Vec::new(),
            id_index: HashMap::default(),
        }
    }

    pub fn root(&self) -> NodeKey {
        ROOT
    }

    pub fn node(&self, n: NodeKey) -> Option<&Node> {
        self.nodes.get(n.0)
    }

    pub fn node_mut(&mut self, n: NodeKey) -> Option<&mut Node> {
        self.nodes.get_mut(n.0)
    }

    pub fn edge(&self, e: EdgeKey) -> Option<&Edge> {
        self.edges.get(e.0)
    }

    pub fn edge_mut(&mut self, e: EdgeKey) -> Option<&mut Edge> {
        self.edges.get_mut(e.0)
    }

    pub fn node_id(&self, n: NodeKey) -> Option<&str> {
        self.node(n).map(Node::id)
    }

    pub fn subgraph(&self, g: NodeKey) -> Option<&Subgraph> {
        self.node(g)?.subgraph.as_deref()
    }

    fn sub(&self, g: NodeKey) -> Result<&Subgraph> {
        let node = self.node(g).ok_or(GraphError::UnknownNode(g))?;
        node.subgraph.as_deref().ok_or(GraphError::NotASubgraph(g))
    }

    fn sub_mut(&mut self, g: NodeKey) -> Result<&mut Subgraph> {
        let node = self.nodes.get_mut(g.0).ok_or(GraphError::UnknownNode(g))?;
        node.subgraph.as_deref_mut().ok_or(GraphError::NotASubgraph(g))
    }

    /// Whether `n` is reachable from the root through the collections on its parent chain.
    pub fn is_live(&self, n: NodeKey) -> bool {
        let mut cur = n;
        loop {
            if cur == ROOT {
                return true;
            }
            let Some(node) = self.node(cur) else {
                return false;
            };
            let Some(parent) = node.parent else {
                return false;
            };
            let Some(sub) = self.subgraph(parent) else {
                return false;
            };
            if !sub.collection.contains(&node.id, cur) {
                return false;
            }
            cur = parent;
        }
    }

    fn find_live(&self, id: &str) -> Option<NodeKey> {
        self.id_index
            .get(id)
            .copied()
            .filter(|&k| self.is_live(k))
    }

    /// Adds a detached node under `g`. Fails if `node`'s id is already taken: globally when
    /// `g` is reachable from the root, within `g`'s subtree otherwise.
    ///
    /// Does not bump the version.
    pub fn add_node(&mut self, g: NodeKey, mut node: Node) -> Result<NodeKey> {
        self.sub(g)?;
        let live = self.is_live(g);
        let taken = if live {
            self.find_live(&node.id).is_some()
        } else {
            self.find_node_recursive(g, &node.id).is_some()
        };
        if taken {
            return Err(GraphError::DuplicateNodeId { id: node.id });
        }

        let key = NodeKey(self.nodes.len());
        node.parent = Some(g);
        node.out_edges.clear();
        node.in_edges.clear();
        node.self_edges.clear();
        if let Some(sub) = node.subgraph.as_deref_mut() {
            sub.collection = NodeCollection::default();
        }
        self.sub_mut(g)?.collection.add_node(node.id.clone(), key);
        if live {
            self.id_index.insert(node.id.clone(), key);
        }
        self.nodes.push(node);
        Ok(key)
    }

    pub fn add_subgraph(&mut self, g: NodeKey, id: impl Into<String>) -> Result<NodeKey> {
        self.add_node(g, Node::subgraph(id))
    }

    /// Creates an edge registered in `g`'s collection. The source is looked up shallowly in
    /// `g`, the target in `other` when given (cross-namespace edges), otherwise in `g`.
    ///
    /// Returns `None` without mutating anything if an endpoint cannot be found. An existing
    /// edge with the same id in `g` is detached from its endpoints and replaced.
    pub fn set_edge(
        &mut self,
        g: NodeKey,
        id: impl Into<String>,
        source_id: &str,
        target_id: &str,
        other: Option<NodeKey>,
    ) -> Option<EdgeKey> {
        let source = self.find_node(g, source_id)?;
        let target = self.find_node(other.unwrap_or(g), target_id)?;
        let id = id.into();
        let key = EdgeKey(self.edges.len());

        let previous = self.sub_mut(g).ok()?.collection.add_edge(id.clone(), key);
        if let Some(prev) = previous {
            tracing::debug!(edge = %id, "replacing existing edge with the same id");
            self.detach_edge(prev);
        }

        self.edges.push(Edge {
            id,
            source,
            target,
            owner: g,
            attrs: Attributes::default(),
        });
        self.attach_edge(key);
        Some(key)
    }

    /// Registers `e` into its endpoints' edge sets.
    pub fn attach_edge(&mut self, e: EdgeKey) {
        let Some(edge) = self.edge(e) else {
            return;
        };
        let (s, t) = (edge.source, edge.target);
        if s != t {
            if let Some(n) = self.nodes.get_mut(s.0) {
                n.out_edges.insert(e);
            }
            if let Some(n) = self.nodes.get_mut(t.0) {
                n.in_edges.insert(e);
            }
        } else if let Some(n) = self.nodes.get_mut(s.0) {
            n.self_edges.insert(e);
        }
    }

    /// Unregisters `e` from its endpoints' edge sets. The owning collection keeps it.
    pub fn detach_edge(&mut self, e: EdgeKey) {
        let Some(edge) = self.edge(e) else {
            return;
        };
        let (s, t) = (edge.source, edge.target);
        if s != t {
            if let Some(n) = self.nodes.get_mut(s.0) {
                n.out_edges.shift_remove(&e);
            }
            if let Some(n) = self.nodes.get_mut(t.0) {
                n.in_edges.shift_remove(&e);
            }
        } else if let Some(n) = self.nodes.get_mut(s.0) {
            n.self_edges.shift_remove(&e);
        }
    }

    /// Detaches `e` and drops it from its owner's collection.
    pub fn remove_edge(&mut self, e: EdgeKey) {
        self.detach_edge(e);
        self.unregister_edge(e);
    }

    fn unregister_edge(&mut self, e: EdgeKey) {
        let Some(edge) = self.edge(e) else {
            return;
        };
        let (owner, id) = (edge.owner, edge.id.clone());
        if let Ok(sub) = self.sub_mut(owner) {
            sub.collection.remove_edge(&id, e);
        }
    }

    /// Detaches every edge touching `n` and removes `n` from `g` and from every subgraph
    /// below `g`. The node keeps its parent handle.
    pub fn remove_node(&mut self, g: NodeKey, n: NodeKey) {
        let Some(node) = self.nodes.get_mut(n.0) else {
            return;
        };
        let out = std::mem::take(&mut node.out_edges);
        let inc = std::mem::take(&mut node.in_edges);
        let selfs = std::mem::take(&mut node.self_edges);
        let id = node.id.clone();

        for &e in &out {
            if let Some(t) = self.edge(e).map(|edge| edge.target) {
                if let Some(tn) = self.nodes.get_mut(t.0) {
                    tn.in_edges.shift_remove(&e);
                }
            }
        }
        for &e in &inc {
            if let Some(s) = self.edge(e).map(|edge| edge.source) {
                if let Some(sn) = self.nodes.get_mut(s.0) {
                    sn.out_edges.shift_remove(&e);
                }
            }
        }
        for e in out.into_iter().chain(inc).chain(selfs) {
            self.unregister_edge(e);
        }

        let levels: Vec<NodeKey> = std::iter::once(g)
            .chain(self.subgraphs_breadth_first(g))
            .collect();
        for level in levels {
            if let Ok(sub) = self.sub_mut(level) {
                sub.collection.remove(&id, n);
            }
        }
        tracing::trace!(node = %id, "removed node");
    }

    /// Removes subgraph `s` from its parent and unregisters the edges leaving its subtree
    /// from their outside endpoints.
    pub fn remove_subgraph(&mut self, s: NodeKey) {
        if let Some(parent) = self.node(s).and_then(|n| n.parent) {
            self.remove_node(parent, s);
        }
        let boundary: Vec<BoundaryEdge> = self.out_going_edges(s).collect();
        for b in boundary {
            if let Some(outside) = self.nodes.get_mut(b.node.0) {
                if b.attached_at_source {
                    outside.out_edges.shift_remove(&b.edge);
                } else {
                    outside.in_edges.shift_remove(&b.edge);
                }
            }
            let owner = self.edge(b.edge).map(|e| e.owner);
            if let Some(owner) = owner {
                if owner != s && !self.is_ancestor(s, owner) {
                    self.unregister_edge(b.edge);
                }
            }
        }
    }

    /// Moves `n` (and its subtree) under `new_parent`.
    pub fn set_new_parent(&mut self, new_parent: NodeKey, n: NodeKey) -> Result<()> {
        self.sub(new_parent)?;
        let node = self.node(n).ok_or(GraphError::UnknownNode(n))?;
        if new_parent == n || self.is_ancestor(n, new_parent) {
            return Err(GraphError::CyclicParent {
                node: n,
                parent: new_parent,
            });
        }

        let subtree: Vec<NodeKey> = std::iter::once(n)
            .chain(self.nodes_breadth_first(n))
            .collect();
        let members: HashSet<NodeKey> = subtree.iter().copied().collect();
        let live = self.is_live(new_parent);
        for &k in &subtree {
            let Some(id) = self.node_id(k) else {
                continue;
            };
            let clash = if live {
                self.find_live(id)
            } else {
                self.find_node_recursive(new_parent, id)
            };
            if clash.is_some_and(|other| !members.contains(&other)) {
                return Err(GraphError::DuplicateNodeId { id: id.to_string() });
            }
        }

        let id = node.id.clone();
        if let Some(old) = node.parent {
            if let Ok(sub) = self.sub_mut(old) {
                sub.collection.remove(&id, n);
            }
        }
        if let Some(node) = self.nodes.get_mut(n.0) {
            node.parent = Some(new_parent);
        }
        self.sub_mut(new_parent)?.collection.add_node(id, n);
        if live {
            for k in subtree {
                if let Some(node) = self.nodes.get(k.0) {
                    self.id_index.insert(node.id.clone(), k);
                }
            }
        }
        Ok(())
    }

    /// Shallow lookup in `g`'s own collection.
    pub fn find_node(&self, g: NodeKey, id: &str) -> Option<NodeKey> {
        self.subgraph(g)?.collection.find_shallow(id)
    }

    /// Looks `id` up in `g` and every subgraph below it.
    pub fn find_node_recursive(&self, g: NodeKey, id: &str) -> Option<NodeKey> {
        if g == ROOT {
            return self.find_live(id);
        }
        if self.is_live(g) {
            return self.find_live(id).filter(|&k| self.is_ancestor(g, k));
        }
        let mut pending = vec![g];
        while let Some(level) = pending.pop() {
            let Some(sub) = self.subgraph(level) else {
                continue;
            };
            if let Some(found) = sub.collection.find_shallow(id) {
                return Some(found);
            }
            pending.extend(self.graphs(level));
        }
        None
    }

    pub fn find_edge(&self, g: NodeKey, id: &str) -> Option<EdgeKey> {
        self.subgraph(g)?.collection.find_edge(id)
    }

    /// Direct children of `g`, subgraphs included.
    pub fn shallow_nodes(&self, g: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.subgraph(g)
            .into_iter()
            .flat_map(|sub| sub.collection.nodes_shallow())
    }

    /// Every node below `g`; each node is yielded before its own descendants.
    pub fn nodes_breadth_first(&self, g: NodeKey) -> NodesBreadthFirst<'_> {
        NodesBreadthFirst::new(self, g)
    }

    pub fn subgraphs_breadth_first(&self, g: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes_breadth_first(g).filter(|&n| self.is_subgraph(n))
    }

    /// Direct child subgraphs of `g`.
    pub fn graphs(&self, g: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        self.shallow_nodes(g).filter(|&n| self.is_subgraph(n))
    }

    /// All direct children of a level, then each child subgraph's successors in turn.
    pub fn all_successors_width_first(&self, g: NodeKey) -> AllSuccessorsWidthFirst<'_> {
        AllSuccessorsWidthFirst::new(self, g)
    }

    /// Post-order: a subgraph is yielded after its whole subtree.
    pub fn all_successors_depth_first(&self, g: NodeKey) -> AllSuccessorsDepthFirst<'_> {
        AllSuccessorsDepthFirst::new(self, g)
    }

    /// Every node under `g` followed by its adjacent edges, then the edges of `g` itself.
    /// In-edges coming from inside `g` are skipped so each edge is reported once per node.
    pub fn all_elements(&self, g: NodeKey) -> impl Iterator<Item = ElementRef> + '_ {
        let own = self
            .node(g)
            .into_iter()
            .flat_map(|n| n.in_edges.iter().chain(&n.out_edges).chain(&n.self_edges))
            .map(|&e| ElementRef::Edge(e));
        self.all_successors_width_first(g)
            .flat_map(move |n| {
                let node = self.node(n);
                let selfs = node.into_iter().flat_map(|nd| nd.self_edges.iter());
                let outs = node.into_iter().flat_map(|nd| nd.out_edges.iter());
                let ins = node
                    .into_iter()
                    .flat_map(|nd| nd.in_edges.iter())
                    .filter(move |&&e| !self.edge_source_inside(g, e));
                std::iter::once(ElementRef::Node(n))
                    .chain(selfs.chain(outs).chain(ins).map(|&e| ElementRef::Edge(e)))
            })
            .chain(own)
    }

    pub fn shallow_edges(&self, g: NodeKey) -> impl Iterator<Item = EdgeKey> + '_ {
        self.subgraph(g)
            .into_iter()
            .flat_map(move |sub| sub.collection.edges(self))
    }

    /// Edges adjacent to any node under `g`, each reported once.
    pub fn deep_edges(&self, g: NodeKey) -> impl Iterator<Item = EdgeKey> + '_ {
        self.nodes_breadth_first(g)
            .filter_map(move |n| self.node(n))
            .flat_map(move |node| {
                let ins = node
                    .in_edges
                    .iter()
                    .filter(move |&&e| !self.edge_source_inside(g, e));
                node.out_edges
                    .iter()
                    .chain(&node.self_edges)
                    .chain(ins)
                    .copied()
            })
    }

    fn edge_source_inside(&self, g: NodeKey, e: EdgeKey) -> bool {
        self.edge(e).is_some_and(|edge| self.is_ancestor(g, edge.source))
    }

    /// Parent chain of `n`, nearest first.
    pub fn ancestors(&self, n: NodeKey) -> impl Iterator<Item = NodeKey> + '_ {
        std::iter::successors(self.node(n).and_then(|node| node.parent), move |&p| {
            self.node(p).and_then(|node| node.parent)
        })
    }

    /// Whether `g` appears on `n`'s parent chain.
    pub fn is_ancestor(&self, g: NodeKey, n: NodeKey) -> bool {
        self.ancestors(n).any(|a| a == g)
    }

    pub fn is_descendant_of(&self, n: NodeKey, g: NodeKey) -> bool {
        self.is_ancestor(g, n)
    }

    pub fn is_subgraph(&self, n: NodeKey) -> bool {
        self.node(n).is_some_and(Node::is_subgraph)
    }

    /// The ancestor of `n` (or `n` itself) whose parent is `g`.
    pub fn lift_node(&self, g: NodeKey, n: NodeKey) -> Option<NodeKey> {
        let mut cur = n;
        loop {
            let parent = self.node(cur)?.parent?;
            if parent == g {
                return Some(cur);
            }
            cur = parent;
        }
    }

    /// Edges with exactly one endpoint outside `g`'s subtree.
    pub fn out_going_edges(&self, g: NodeKey) -> impl Iterator<Item = BoundaryEdge> + '_ {
        std::iter::once(g)
            .chain(self.nodes_breadth_first(g))
            .filter_map(move |n| self.node(n))
            .flat_map(move |node| {
                let outs = node.out_edges.iter().filter_map(move |&e| {
                    let t = self.edge(e)?.target;
                    (t != g && !self.is_ancestor(g, t)).then_some(BoundaryEdge {
                        edge: e,
                        node: t,
                        attached_at_source: false,
                    })
                });
                let ins = node.in_edges.iter().filter_map(move |&e| {
                    let s = self.edge(e)?.source;
                    (s != g && !self.is_ancestor(g, s)).then_some(BoundaryEdge {
                        edge: e,
                        node: s,
                        attached_at_source: true,
                    })
                });
                outs.chain(ins)
            })
    }

    /// Connected components of `g`'s subtree over edges, subgraph membership and parent
    /// links. Each component is reported as its members whose parent is `g`.
    pub fn clustered_connected_components(&self, g: NodeKey) -> ClusteredComponents<'_> {
        ClusteredComponents::new(self, g)
    }

    pub fn shallow_connected_components(&self, g: NodeKey) -> Vec<Vec<NodeKey>> {
        alg::shallow_connected_components(self, g)
    }

    pub fn edge_to_ancestor(&self, e: EdgeKey) -> ToAncestor {
        let Some(edge) = self.edge(e) else {
            return ToAncestor::None;
        };
        if self.is_subgraph(edge.source) && self.is_descendant_of(edge.target, edge.source) {
            return ToAncestor::FromAncestor;
        }
        if self.is_subgraph(edge.target) && self.is_descendant_of(edge.source, edge.target) {
            return ToAncestor::ToAncestor;
        }
        ToAncestor::None
    }

    /// Whether the endpoints of `e` live on different graph levels.
    pub fn is_inter_graph_edge(&self, e: EdgeKey) -> bool {
        let Some(edge) = self.edge(e) else {
            return false;
        };
        let parent = |n: NodeKey| self.node(n).and_then(|node| node.parent);
        parent(edge.source) != parent(edge.target)
    }

    pub fn has_some_attr_on_index(&self, g: NodeKey, kind: AttributeKind) -> bool {
        self.nodes_breadth_first(g)
            .filter_map(|n| self.node(n))
            .any(|n| n.attrs.has(kind))
            || self
                .deep_edges(g)
                .filter_map(|e| self.edge(e))
                .any(|e| e.attrs.has(kind))
    }

    pub fn has_subgraphs(&self, g: NodeKey) -> bool {
        self.graphs(g).next().is_some()
    }

    pub fn no_empty_subgraphs(&self, g: NodeKey) -> bool {
        self.subgraphs_breadth_first(g)
            .all(|s| self.shallow_node_count(s) > 0)
    }

    pub fn is_empty(&self, g: NodeKey) -> bool {
        self.shallow_node_count(g) == 0
    }

    pub fn shallow_node_count(&self, g: NodeKey) -> usize {
        self.subgraph(g)
            .map_or(0, |sub| sub.collection.node_shallow_count())
    }

    pub fn node_count_deep(&self, g: NodeKey) -> usize {
        self.shallow_node_count(g)
            + self
                .graphs(g)
                .map(|s| self.node_count_deep(s))
                .sum::<usize>()
    }

    /// Out- and self-edges of `g`'s direct children.
    pub fn edge_count(&self, g: NodeKey) -> usize {
        self.subgraph(g)
            .map_or(0, |sub| sub.collection.edge_count(self))
    }

    pub fn deep_edges_count(&self, g: NodeKey) -> usize {
        self.nodes_breadth_first(g)
            .filter_map(|n| self.node(n))
            .map(|n| n.out_degree() + n.self_degree())
            .sum()
    }

    pub fn each_node_id_is_unique(&self, g: NodeKey) -> bool {
        let mut seen: HashSet<&str> = HashSet::default();
        self.nodes_breadth_first(g)
            .filter_map(|n| self.node_id(n))
            .all(|id| seen.insert(id))
    }

    /// Global check from the root: unique ids and endpoint-consistent edge sets everywhere.
    pub fn is_consistent(&self) -> bool {
        self.each_node_id_is_unique(ROOT)
            && self
                .nodes_breadth_first(ROOT)
                .all(|n| self.node_is_consistent(n))
    }

    pub fn node_is_consistent(&self, n: NodeKey) -> bool {
        let Some(node) = self.node(n) else {
            return false;
        };
        match self.subgraph(node.parent.unwrap_or(ROOT)) {
            Some(sub) => sub.collection.node_is_consistent(self, n),
            None => false,
        }
    }

    pub fn add_to_group(&mut self, g: NodeKey, group: usize) -> Result<()> {
        *self.sub_mut(g)?.group_counts.entry(group).or_insert(0) += 1;
        Ok(())
    }

    /// Decrements a group's member count. A count reaching zero keeps its entry.
    pub fn rm_from_group(&mut self, g: NodeKey, group: usize) -> Result<()> {
        if let Some(count) = self.sub_mut(g)?.group_counts.get_mut(&group) {
            *count = count.saturating_sub(1);
        }
        Ok(())
    }

    pub fn group_counts(&self, g: NodeKey) -> Option<&GroupCounts> {
        self.subgraph(g).map(Subgraph::group_counts)
    }

    pub fn position_ranges(&self, g: NodeKey) -> &[Range<usize>] {
        self.subgraph(g)
            .map(Subgraph::position_ranges)
            .unwrap_or_default()
    }

    /// Records a range of native vertex ids owned by `g`, merging it into the last range when
    /// contiguous.
    pub fn push_position_range(&mut self, g: NodeKey, range: Range<usize>) -> Result<()> {
        let ranges = &mut self.sub_mut(g)?.position_ranges;
        match ranges.last_mut() {
            Some(last) if last.end == range.start => last.end = range.end,
            _ => ranges.push(range),
        }
        Ok(())
    }

    /// Drops every node of `g` and its position ranges. On the root this also releases the
    /// arenas, invalidating every outstanding handle.
    pub fn reset_nodes(&mut self, g: NodeKey) -> Result<()> {
        if g == ROOT {
            self.nodes.truncate(1);
            self.edges.clear();
            self.id_index.clear();
            if let Some(root) = self.nodes.first_mut() {
                root.out_edges.clear();
                root.in_edges.clear();
                root.self_edges.clear();
            }
        }
        let sub = self.sub_mut(g)?;
        sub.collection = NodeCollection::default();
        sub.position_ranges.clear();
        Ok(())
    }

    /// [`Graph::reset_nodes`] plus group accounting. The version counter survives.
    pub fn reset(&mut self, g: NodeKey) -> Result<()> {
        self.reset_nodes(g)?;
        self.sub_mut(g)?.group_counts.clear();
        Ok(())
    }

    pub fn trigger_update(&mut self, g: NodeKey) -> Result<u64> {
        let sub = self.sub_mut(g)?;
        sub.version += 1;
        Ok(sub.version)
    }

    pub fn version(&self, g: NodeKey) -> u64 {
        self.subgraph(g).map_or(0, Subgraph::version)
    }

    /// Cheap dirty check: compares root version counters only, never structure.
    pub fn equals(&self, other: &Graph) -> bool {
        self.version(ROOT) == other.version(ROOT)
    }

    pub fn nodes_len(&self) -> usize {
        self.nodes.len()
    }

    pub fn edges_len(&self) -> usize {
        self.edges.len()
    }
}
