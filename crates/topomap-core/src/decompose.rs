//! Path decomposition: turning one parent path into the graph edges that realize it.

use crate::geometry::coords_convert;
use crate::scene::{Comment, Scene, VertexIds};
use crate::segregate::segregate_path;
use std::sync::Arc;
use topomap_graph::{
    Attribute, CoordRef, DataRecord, EdgeData, EdgeKey, Entity, Node, NodeKey,
};

/// One decomposition request.
#[derive(Debug, Clone)]
pub struct PushPath<'a> {
    /// Graph the source node (and by default every other node) is resolved in.
    pub graph: NodeKey,
    /// Second namespace for cross-namespace paths. Nodes missing from `graph` are looked up here.
    pub target_graph: Option<NodeKey>,
    pub path: &'a [CoordRef],
    pub layer: Option<usize>,
    pub edge_id: Option<&'a str>,
    pub record: Arc<DataRecord>,
}

/// Decomposes `req.path` into edges of the scene graph and returns the edges created.
///
/// Malformed paths are dropped rather than reported: the first and last elements must be
/// resolvable node ids, unknown intermediate nodes are skipped, and an edge id that already
/// exists makes the call a no-op. In logic mode a path through more than two nodes becomes one
/// synthetic edge per run (`id`, `id--1`, `id--2`, ...), all sharing the same record.
///
/// Inline comments are collected once both endpoints resolve and the path carries at least one
/// vertex id, even when the edge already exists.
pub fn push_path(scene: &mut Scene, req: PushPath<'_>) -> Vec<EdgeKey> {
    let path = req.path;
    let (Some(source_id), Some(target_id)) = (
        path.first().and_then(CoordRef::as_node_id),
        path.last().and_then(CoordRef::as_node_id),
    ) else {
        tracing::trace!(len = path.len(), "path does not start and end on node ids");
        return Vec::new();
    };
    let edge_id = req
        .edge_id
        .map(str::to_string)
        .unwrap_or_else(|| format!("{source_id}-{target_id}"));

    let graph = &scene.graph;
    let resolve = |id: &str| -> Option<(NodeKey, NodeKey)> {
        graph
            .find_node(req.graph, id)
            .map(|k| (k, req.graph))
            .or_else(|| {
                let other = req.target_graph?;
                graph.find_node(other, id).map(|k| (k, other))
            })
    };
    let (Some((_, source_home)), Some((_, target_home))) = (resolve(source_id), resolve(target_id))
    else {
        tracing::warn!(edge = %edge_id, source = source_id, target = target_id, "path endpoint not found");
        return Vec::new();
    };

    let logic = scene.config.mode.is_logic();
    let mut sanitized: Vec<CoordRef> = Vec::with_capacity(path.len());
    let mut native_ids: Vec<Option<usize>> = Vec::with_capacity(path.len());
    let mut homes: Vec<Option<NodeKey>> = Vec::with_capacity(path.len());
    let mut node_count = 0usize;
    for item in path {
        match item {
            CoordRef::Node(id) => match resolve(id) {
                Some((k, home)) => {
                    native_ids.push(graph.node(k).and_then(Node::data).map(|d| d.native_id));
                    homes.push(Some(home));
                    sanitized.push(item.clone());
                    node_count += 1;
                }
                None => {
                    tracing::warn!(edge = %edge_id, node = %id, "path references an unknown node");
                }
            },
            CoordRef::Point(_) if !logic => {
                native_ids.push(None);
                homes.push(None);
                sanitized.push(item.clone());
            }
            _ => {}
        }
    }

    if native_ids.iter().all(Option::is_none) {
        tracing::warn!(edge = %edge_id, "no vertex ids could be derived; path abandoned");
        return Vec::new();
    }

    extract_comments(scene, path, &req.record, &edge_id);
    if scene.graph.find_edge(source_home, &edge_id).is_some() {
        tracing::trace!(edge = %edge_id, "edge already exists");
        return Vec::new();
    }

    // Runs are resolved before the graph is mutated.
    let runs: Vec<(String, NodeKey, String, NodeKey, Vec<CoordRef>)> = if logic && node_count > 2
    {
        let coords = coords_convert(&sanitized, &native_ids, &scene.buffer);
        segregate_path(&sanitized, &coords)
            .runs
            .iter()
            .filter_map(|run| {
                let (first, last) = (run.first()?, run.last()?);
                Some((
                    first.node_id()?.to_string(),
                    homes.get(first.index).copied().flatten()?,
                    last.node_id()?.to_string(),
                    homes.get(last.index).copied().flatten()?,
                    run.iter().map(|c| c.item.clone()).collect(),
                ))
            })
            .collect()
    } else {
        Vec::new()
    };
    let segregated = logic && node_count > 2;

    let record_index = scene.vertex_ids.len();
    scene.vertex_ids.push(VertexIds {
        native_ids,
        layer: req.layer,
    });
    let data = EdgeData {
        edge_id: edge_id.clone(),
        record_index: Some(record_index),
        path: sanitized,
        sub_path: None,
        record: req.record,
        synthetic: false,
    };

    let mut created = Vec::new();
    if segregated {
        for (i, (start, start_home, end, end_home, sub_path)) in runs.into_iter().enumerate() {
            let id = if i == 0 {
                edge_id.clone()
            } else {
                format!("{edge_id}--{i}")
            };
            let other = (end_home != start_home).then_some(end_home);
            let Some(e) = scene.graph.set_edge(start_home, id, &start, &end, other) else {
                tracing::warn!(edge = %edge_id, run = i, "run endpoints not found");
                continue;
            };
            let run_data = EdgeData {
                sub_path: Some(sub_path),
                synthetic: true,
                ..data.clone()
            };
            if let Some(edge) = scene.graph.edge_mut(e) {
                edge.set_attr(Attribute::Edge(run_data));
            }
            created.push(e);
        }
    } else {
        let other = (target_home != source_home).then_some(target_home);
        match scene
            .graph
            .set_edge(source_home, edge_id.clone(), source_id, target_id, other)
        {
            Some(e) => {
                if let Some(edge) = scene.graph.edge_mut(e) {
                    edge.set_attr(Attribute::Edge(data));
                }
                created.push(e);
            }
            None => {
                tracing::warn!(edge = %edge_id, source = source_id, target = target_id, "edge endpoints not found; mixed namespaces?");
            }
        }
    }

    scene.hyperedges.push(created.clone());
    created
}

fn extract_comments(scene: &mut Scene, path: &[CoordRef], record: &DataRecord, edge_id: &str) {
    for (index, item) in path.iter().enumerate() {
        let Some(p) = item.as_waypoint() else {
            continue;
        };
        let Some(text) = &p.text else {
            continue;
        };
        let comment = Comment {
            text: text.clone(),
            color: scene.config.comments.resolve(p.color.as_deref()),
            layer_name: record.layer_name.clone(),
            index,
            coords: p.position(),
            edge_id: edge_id.to_string(),
            style: record.style.clone(),
        };
        scene
            .comments
            .entry(edge_id.to_string())
            .or_default()
            .insert(index, comment);
    }
}
