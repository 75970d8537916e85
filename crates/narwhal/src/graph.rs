use crate::error::{Error, Result};
use crate::geom::{Point, Size};
use rustc_hash::FxHashMap;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct Graph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl Graph {
    pub fn validate(&self) -> Result<()> {
        let mut parents: FxHashMap<&str, Option<&str>> = FxHashMap::default();
        for n in &self.nodes {
            if parents.insert(n.id.as_str(), n.parent.as_deref()).is_some() {
                return Err(Error::DuplicateNode {
                    node_id: n.id.clone(),
                });
            }
        }
        for n in &self.nodes {
            let Some(parent) = n.parent.as_deref() else {
                continue;
            };
            if !parents.contains_key(parent) {
                return Err(Error::UnknownParent {
                    node_id: n.id.clone(),
                    parent: parent.to_string(),
                });
            }
            let mut cur = Some(parent);
            let mut steps = 0usize;
            while let Some(p) = cur {
                steps += 1;
                if p == n.id || steps > self.nodes.len() {
                    return Err(Error::CyclicParent {
                        node_id: n.id.clone(),
                    });
                }
                cur = parents.get(p).copied().flatten();
            }
        }
        for e in &self.edges {
            if !parents.contains_key(e.source.as_str()) || !parents.contains_key(e.target.as_str())
            {
                return Err(Error::MissingEndpoint {
                    edge_id: e.id.clone(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    pub id: String,
    pub width: f64,
    pub height: f64,
    /// Cluster this node belongs to. Any node referenced as a parent becomes a cluster and is
    /// sized to enclose its members.
    pub parent: Option<String>,
}

impl Node {
    pub fn new(id: impl Into<String>, width: f64, height: f64) -> Self {
        Self {
            id: id.into(),
            width,
            height,
            parent: None,
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

#[derive(Debug, Clone)]
pub struct Edge {
    pub id: String,
    pub source: String,
    pub target: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutResult {
    /// Node and cluster centers.
    pub positions: BTreeMap<String, Point>,
    /// Final box sizes; clusters get the box enclosing their members.
    pub sizes: BTreeMap<String, Size>,
    pub ranks: BTreeMap<String, i32>,
    /// Position of each node within its rank.
    pub orders: BTreeMap<String, usize>,
    /// Routed polylines, from the source box boundary to the target box boundary. Self loops
    /// and edges touching a cluster are not routed.
    pub edges: BTreeMap<String, Vec<Point>>,
}
