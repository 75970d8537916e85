//! Entities: attribute containers with a non-owning parent handle.

use crate::attributes::{Attribute, AttributeKind, Attributes, NodeData};
use crate::graph::Subgraph;
use indexmap::IndexSet;
use rustc_hash::FxBuildHasher;

pub(crate) type EdgeSet = IndexSet<EdgeKey, FxBuildHasher>;

/// Arena handle of a node (or subgraph) inside a [`Graph`](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeKey(pub(crate) usize);

impl NodeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Arena handle of an edge inside a [`Graph`](crate::Graph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey(pub(crate) usize);

impl EdgeKey {
    pub fn index(self) -> usize {
        self.0
    }
}

pub trait Entity {
    fn attrs(&self) -> &Attributes;

    fn attrs_mut(&mut self) -> &mut Attributes;

    fn parent(&self) -> Option<NodeKey>;

    fn get_attr(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.attrs().get(kind)
    }

    fn set_attr(&mut self, attr: Attribute) -> Option<Attribute> {
        self.attrs_mut().set(attr)
    }
}

/// A graph vertex. Created detached; becomes live once added to a graph.
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) id: String,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) out_edges: EdgeSet,
    pub(crate) in_edges: EdgeSet,
    pub(crate) self_edges: EdgeSet,
    pub(crate) attrs: Attributes,
    pub(crate) subgraph: Option<Box<Subgraph>>,
}

impl Node {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent: None,
            out_edges: EdgeSet::default(),
            in_edges: EdgeSet::default(),
            self_edges: EdgeSet::default(),
            attrs: Attributes::default(),
            subgraph: None,
        }
    }

    /// A node that is itself a graph level with an empty collection.
    pub fn subgraph(id: impl Into<String>) -> Self {
        let mut n = Self::new(id);
        n.subgraph = Some(Box::default());
        n
    }

    pub fn with_data(mut self, data: NodeData) -> Self {
        self.attrs.set(Attribute::Node(data));
        self
    }

    pub fn with_attr(mut self, attr: Attribute) -> Self {
        self.attrs.set(attr);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn out_edges(&self) -> &IndexSet<EdgeKey, FxBuildHasher> {
        &self.out_edges
    }

    pub fn in_edges(&self) -> &IndexSet<EdgeKey, FxBuildHasher> {
        &self.in_edges
    }

    pub fn self_edges(&self) -> &IndexSet<EdgeKey, FxBuildHasher> {
        &self.self_edges
    }

    pub fn out_degree(&self) -> usize {
        self.out_edges.len()
    }

    pub fn in_degree(&self) -> usize {
        self.in_edges.len()
    }

    pub fn self_degree(&self) -> usize {
        self.self_edges.len()
    }

    pub fn is_subgraph(&self) -> bool {
        self.subgraph.is_some()
    }

    pub fn as_subgraph(&self) -> Option<&Subgraph> {
        self.subgraph.as_deref()
    }

    pub fn data(&self) -> Option<&NodeData> {
        self.attrs.node_data()
    }
}

impl Entity for Node {
    fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    fn parent(&self) -> Option<NodeKey> {
        self.parent
    }
}

/// A directed connection between two nodes. Its parent is the graph level whose collection
/// registered it.
#[derive(Debug, Clone)]
pub struct Edge {
    pub(crate) id: String,
    pub(crate) source: NodeKey,
    pub(crate) target: NodeKey,
    pub(crate) owner: NodeKey,
    pub(crate) attrs: Attributes,
}

impl Edge {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> NodeKey {
        self.source
    }

    pub fn target(&self) -> NodeKey {
        self.target
    }

    pub fn owner(&self) -> NodeKey {
        self.owner
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }

    pub fn data(&self) -> Option<&crate::EdgeData> {
        self.attrs.edge_data()
    }
}

impl Entity for Edge {
    fn attrs(&self) -> &Attributes {
        &self.attrs
    }

    fn attrs_mut(&mut self) -> &mut Attributes {
        &mut self.attrs
    }

    fn parent(&self) -> Option<NodeKey> {
        Some(self.owner)
    }
}
