//! Row ingestion: tabular node and edge records from the host's query results.

use crate::decompose::{PushPath, push_path};
use crate::error::Result;
use crate::scene::Scene;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;
use topomap_graph::{
    ArcStyle, Attribute, CoordRef, DataRecord, EdgeKey, GeomData, GraphError, Node, NodeData,
    NodeKey,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRow {
    pub id: String,
    /// Top-level subgraph holding the node; the root graph when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl NodeRow {
    pub fn new(id: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            id: id.into(),
            namespace: None,
            x,
            y,
            group: None,
            width: None,
            height: None,
            properties: Map::new(),
        }
    }

    pub fn in_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeRow {
    /// Explicit edge id; `source-target` when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub path: Vec<CoordRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    /// Namespace the target (and other path nodes) may be resolved in.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer: Option<usize>,
    #[serde(default)]
    pub row_index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_style: Option<ArcStyle>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub properties: Map<String, Value>,
}

impl EdgeRow {
    pub fn new(path: Vec<CoordRef>) -> Self {
        Self {
            path,
            ..Default::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn record(&self) -> DataRecord {
        DataRecord {
            row_index: Some(self.row_index),
            layer_name: self.layer_name.clone(),
            style: self.style.clone(),
            arc_style: self.arc_style.clone(),
            extra: self.properties.clone(),
        }
    }
}

/// Rows for one update cycle.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneInput {
    #[serde(default)]
    pub nodes: Vec<NodeRow>,
    #[serde(default)]
    pub edges: Vec<EdgeRow>,
}

impl Scene {
    /// The top-level subgraph named `id`, created on first use.
    pub fn namespace(&mut self, id: &str) -> Result<NodeKey> {
        let root = self.graph.root();
        match self.graph.find_node(root, id) {
            Some(k) if self.graph.is_subgraph(k) => Ok(k),
            Some(k) => Err(GraphError::NotASubgraph(k).into()),
            None => Ok(self.graph.add_subgraph(root, id)?),
        }
    }

    /// Looks a namespace up without creating it. `None` names the root graph.
    pub fn find_namespace(&self, id: Option<&str>) -> Option<NodeKey> {
        let root = self.graph.root();
        match id {
            None => Some(root),
            Some(id) => self
                .graph
                .find_node(root, id)
                .filter(|&k| self.graph.is_subgraph(k)),
        }
    }

    /// Adds a node row: allocates its native vertex id in the coordinate buffer, attaches
    /// [`NodeData`] and geometry, and updates group and position-range bookkeeping.
    ///
    /// A row whose id is already present anywhere in the scene is not added again: the existing
    /// node is returned and keeps its vertex, group count and position range. Fails when the
    /// row's namespace names a node that is not a subgraph.
    pub fn add_vertex(&mut self, row: &NodeRow) -> Result<NodeKey> {
        let root = self.graph.root();
        if let Some(existing) = self.graph.find_node_recursive(root, &row.id) {
            tracing::debug!(node = %row.id, "repeated node row reuses the existing node");
            return Ok(existing);
        }
        let g = match row.namespace.as_deref() {
            Some(ns) => self.namespace(ns)?,
            None => root,
        };
        let native_id = self.buffer.next_id();
        let layout = &self.config.layout;
        let geom = GeomData {
            center: Some([row.x, row.y]),
            width: row.width.unwrap_or(layout.node_width),
            height: row.height.unwrap_or(layout.node_height),
            curve: Vec::new(),
        };
        let node = Node::new(row.id.clone())
            .with_data(NodeData {
                native_id,
                group: row.group,
                properties: row.properties.clone(),
            })
            .with_attr(Attribute::Geometry(geom));

        let key = self.graph.add_node(g, node)?;
        self.buffer.push([row.x, row.y]);
        if let Some(group) = row.group {
            self.graph.add_to_group(g, group)?;
        }
        self.graph
            .push_position_range(g, native_id..native_id + 1)?;
        Ok(key)
    }

    /// Decomposes one edge row. Rows naming an unknown namespace are dropped.
    pub fn add_edge_row(&mut self, row: &EdgeRow) -> Vec<EdgeKey> {
        let Some(graph) = self.find_namespace(row.namespace.as_deref()) else {
            tracing::warn!(namespace = ?row.namespace, "edge row names an unknown namespace");
            return Vec::new();
        };
        let target_graph = match row.target_namespace.as_deref() {
            None => None,
            Some(ns) => match self.find_namespace(Some(ns)) {
                Some(g) => Some(g),
                None => {
                    tracing::warn!(namespace = ns, "edge row names an unknown target namespace");
                    return Vec::new();
                }
            },
        };
        push_path(
            self,
            PushPath {
                graph,
                target_graph,
                path: &row.path,
                layer: row.layer,
                edge_id: row.id.as_deref(),
                record: Arc::new(row.record()),
            },
        )
    }
}
