use crate::buffer::PositionBuffer;
use crate::config::SceneConfig;
use crate::error::{Error, Result};
use crate::geometry::{EdgesGeometry, edges_geometry};
use crate::layout::{LayoutEngine, run_layout};
use crate::rows::SceneInput;
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use topomap_graph::{EdgeKey, Graph, GraphError, NodeKey, Position};

pub const ROOT_ID: &str = "root";

/// Native vertex ids of one logical path, aligned with its sanitized path. Literal waypoints
/// map to `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VertexIds {
    pub native_ids: Vec<Option<usize>>,
    pub layer: Option<usize>,
}

/// Inline comment extracted from an annotated waypoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub text: String,
    /// Resolved hex colour.
    pub color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    /// Position of the waypoint in the raw path.
    pub index: usize,
    pub coords: Position,
    pub edge_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
}

/// Edge id to comments ordered by path index.
pub type CommentsData = IndexMap<String, BTreeMap<usize, Comment>>;

/// All state of one rendered topology: the graph, the flat coordinate buffer and the
/// per-path bookkeeping written by decomposition and read by layout and projection.
///
/// The stages borrow the scene mutably one after another; nothing here is shared across threads.
#[derive(Debug, Clone)]
pub struct Scene {
    pub(crate) graph: Graph,
    pub(crate) buffer: PositionBuffer,
    pub(crate) vertex_ids: Vec<VertexIds>,
    pub(crate) hyperedges: Vec<Vec<EdgeKey>>,
    pub(crate) comments: CommentsData,
    pub(crate) config: SceneConfig,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    pub fn new(config: SceneConfig) -> Self {
        Self {
            graph: Graph::new(ROOT_ID),
            buffer: PositionBuffer::new(),
            vertex_ids: Vec::new(),
            hyperedges: Vec::new(),
            comments: CommentsData::default(),
            config,
        }
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn graph_mut(&mut self) -> &mut Graph {
        &mut self.graph
    }

    pub fn root(&self) -> NodeKey {
        self.graph.root()
    }

    pub fn buffer(&self) -> &PositionBuffer {
        &self.buffer
    }

    pub fn buffer_mut(&mut self) -> &mut PositionBuffer {
        &mut self.buffer
    }

    pub fn vertex_ids(&self) -> &[VertexIds] {
        &self.vertex_ids
    }

    /// Edges realizing each logical path, indexed like [`Scene::vertex_ids`]. A slot is empty
    /// when no edge could be created for its path.
    pub fn hyperedges(&self) -> &[Vec<EdgeKey>] {
        &self.hyperedges
    }

    pub fn comments(&self) -> &CommentsData {
        &self.comments
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: SceneConfig) {
        self.config = config;
    }

    pub fn version(&self) -> u64 {
        self.graph.version(self.graph.root())
    }

    /// Discards every node, edge, buffer entry and comment. The version counter survives.
    pub fn reset(&mut self) -> Result<()> {
        let root = self.graph.root();
        self.graph.reset(root)?;
        self.buffer.clear();
        self.vertex_ids.clear();
        self.hyperedges.clear();
        self.comments.clear();
        Ok(())
    }

    /// One full update cycle: reset, ingest rows, optionally lay out, bump the version and
    /// project the edges.
    pub fn update(
        &mut self,
        input: &SceneInput,
        engine: Option<&dyn LayoutEngine>,
    ) -> Result<EdgesGeometry> {
        self.reset()?;
        for row in &input.nodes {
            match self.add_vertex(row) {
                Ok(_) => {}
                Err(Error::Graph(GraphError::NotASubgraph(_))) => {
                    tracing::warn!(
                        node = %row.id,
                        namespace = ?row.namespace,
                        "node row names a namespace that is a plain node; row skipped"
                    );
                }
                Err(err) => return Err(err),
            }
        }
        let mut created = 0usize;
        for row in &input.edges {
            created += self.add_edge_row(row).len();
        }
        tracing::debug!(
            nodes = input.nodes.len(),
            rows = input.edges.len(),
            edges = created,
            "scene populated"
        );

        if let Some(engine) = engine {
            let summary = run_layout(self, engine)?;
            tracing::debug!(?summary, "layout applied");
        }

        let root = self.graph.root();
        let version = self.graph.trigger_update(root)?;
        tracing::trace!(version, "scene version bumped");
        Ok(edges_geometry(self))
    }
}
