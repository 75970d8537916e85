//! Layout coordination.
//!
//! The scene graph is projected into a flat [`narwhal::Graph`], handed to a [`LayoutEngine`],
//! and the engine's output is written back: node centers into the coordinate buffer and node
//! geometry, ranks and orders into algorithm data, routed curves into edge geometry. Finally
//! every hyperedge path is rewritten so its literal waypoints follow the routed curves.

use crate::error::Result;
use crate::scene::Scene;
use topomap_graph::{
    AlgorithmData, Attribute, CoordRef, Edge, EdgeKey, Entity, GeomData, Graph, NodeKey,
    Position, Waypoint,
};

/// A black-box layout algorithm operating on the projected graph.
pub trait LayoutEngine {
    fn layout(&self, graph: &narwhal::Graph) -> Result<narwhal::LayoutResult>;
}

impl LayoutEngine for narwhal::Algorithm {
    fn layout(&self, graph: &narwhal::Graph) -> Result<narwhal::LayoutResult> {
        Ok(narwhal::layout(graph, self)?)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LayoutSummary {
    pub nodes: usize,
    pub edges: usize,
    /// Edges the engine returned a curve for.
    pub curves: usize,
    /// Hyperedge paths rewritten from the curves.
    pub paths: usize,
}

fn edge_layout_id(e: EdgeKey) -> String {
    format!("e{}", e.index())
}

/// Projects the live graph below the root. Returns the projection plus the handles in
/// projection order.
pub fn project(scene: &Scene) -> (narwhal::Graph, Vec<NodeKey>, Vec<EdgeKey>) {
    let graph = &scene.graph;
    let root = graph.root();
    let defaults = &scene.config.layout;

    let mut out = narwhal::Graph::default();
    let mut node_keys = Vec::new();
    for n in graph.nodes_breadth_first(root) {
        let Some(node) = graph.node(n) else {
            continue;
        };
        let (width, height) = if node.is_subgraph() {
            (0.0, 0.0)
        } else {
            match node.attrs().geometry() {
                Some(g) if g.width > 0.0 && g.height > 0.0 => (g.width, g.height),
                _ => (defaults.node_width, defaults.node_height),
            }
        };
        let mut projected = narwhal::Node::new(node.id(), width, height);
        if let Some(parent) = node.parent().filter(|&p| p != root) {
            if let Some(pid) = graph.node_id(parent) {
                projected = projected.with_parent(pid);
            }
        }
        out.nodes.push(projected);
        node_keys.push(n);
    }

    let mut edge_keys = Vec::new();
    for e in graph.deep_edges(root) {
        let Some(edge) = graph.edge(e) else {
            continue;
        };
        let (Some(s), Some(t)) = (graph.node_id(edge.source()), graph.node_id(edge.target())) else {
            continue;
        };
        out.edges.push(narwhal::Edge::new(edge_layout_id(e), s, t));
        edge_keys.push(e);
    }
    (out, node_keys, edge_keys)
}

/// Runs `engine` over the scene and writes its result back.
pub fn run_layout(scene: &mut Scene, engine: &dyn LayoutEngine) -> Result<LayoutSummary> {
    let (projected, node_keys, edge_keys) = project(scene);
    let result = engine.layout(&projected)?;
    let mut summary = LayoutSummary {
        nodes: node_keys.len(),
        edges: edge_keys.len(),
        ..Default::default()
    };

    for (n, pn) in node_keys.iter().zip(&projected.nodes) {
        let Some(center) = result.positions.get(&pn.id) else {
            continue;
        };
        let center: Position = [center.x, center.y];
        let size = result.sizes.get(&pn.id);
        let algo = AlgorithmData {
            rank: result.ranks.get(&pn.id).copied(),
            order: result.orders.get(&pn.id).copied(),
        };
        let Some(node) = scene.graph.node_mut(*n) else {
            continue;
        };
        if let Some(native) = node.data().map(|d| d.native_id) {
            scene.buffer.set(native, center);
        }
        let attrs = node.attrs_mut();
        match attrs.geometry_mut() {
            Some(g) => {
                g.center = Some(center);
                if let Some(size) = size {
                    g.width = size.width;
                    g.height = size.height;
                }
            }
            None => {
                attrs.set(Attribute::Geometry(GeomData {
                    center: Some(center),
                    width: size.map_or(0.0, |s| s.width),
                    height: size.map_or(0.0, |s| s.height),
                    curve: Vec::new(),
                }));
            }
        }
        attrs.set(Attribute::AlgorithmData(algo));
    }

    for &e in &edge_keys {
        let curve: Vec<Position> = match result.edges.get(&edge_layout_id(e)) {
            Some(pts) => {
                summary.curves += 1;
                pts.iter().map(|p| [p.x, p.y]).collect()
            }
            None => {
                tracing::trace!(edge = ?e, "layout produced no curve");
                Vec::new()
            }
        };
        if let Some(edge) = scene.graph.edge_mut(e) {
            edge.set_attr(Attribute::Geometry(GeomData {
                curve,
                ..Default::default()
            }));
        }
    }

    for idx in 0..scene.hyperedges.len() {
        let edges = scene.hyperedges[idx].clone();
        let Some(path) = edges
            .first()
            .and_then(|&e| scene.graph.edge(e))
            .and_then(Edge::data)
            .map(|d| d.path.clone())
        else {
            continue;
        };
        let polylines: Vec<Vec<Position>> = edges
            .iter()
            .map(|&e| smooth_polyline(&scene.graph, e))
            .collect();
        let old_ids = scene
            .vertex_ids
            .get(idx)
            .map(|v| v.native_ids.as_slice())
            .unwrap_or_default();
        let (new_path, new_ids) = replace_segments_with_polylines(&path, old_ids, &polylines);

        for &e in &edges {
            if let Some(data) = scene
                .graph
                .edge_mut(e)
                .and_then(|edge| edge.attrs_mut().edge_data_mut())
            {
                data.path = new_path.clone();
            }
        }
        if let Some(v) = scene.vertex_ids.get_mut(idx) {
            v.native_ids = new_ids;
        }
        summary.paths += 1;
    }

    Ok(summary)
}

/// The routed curve of `e` without its two boundary ports. Empty when the edge has no curve.
pub fn smooth_polyline(graph: &Graph, e: EdgeKey) -> Vec<Position> {
    let Some(curve) = graph
        .edge(e)
        .and_then(|edge| edge.attrs().geometry())
        .map(|g| g.curve.as_slice())
    else {
        return Vec::new();
    };
    if curve.len() < 2 {
        return Vec::new();
    }
    curve[1..curve.len() - 1].to_vec()
}

/// Keeps the node-id sentinels of `path` and replaces whatever lies between consecutive
/// sentinels with the matching polyline. Vertex ids follow the same rewrite; inserted points
/// have none.
///
/// With fewer than two sentinels the path is returned unchanged. A polyline count that does not
/// match the number of gaps is logged; missing polylines leave their gap empty.
pub fn replace_segments_with_polylines(
    path: &[CoordRef],
    native_ids: &[Option<usize>],
    polylines: &[Vec<Position>],
) -> (Vec<CoordRef>, Vec<Option<usize>>) {
    let sentinels: Vec<usize> = path
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_node())
        .map(|(i, _)| i)
        .collect();
    if sentinels.len() < 2 {
        return (path.to_vec(), native_ids.to_vec());
    }
    if polylines.len() != sentinels.len() - 1 {
        tracing::warn!(
            polylines = polylines.len(),
            gaps = sentinels.len() - 1,
            "polyline / segment mismatch"
        );
    }

    let id_at = |i: usize| native_ids.get(i).copied().flatten();
    let mut new_path = Vec::new();
    let mut new_ids = Vec::new();
    for (s, pair) in sentinels.windows(2).enumerate() {
        new_path.push(path[pair[0]].clone());
        new_ids.push(id_at(pair[0]));
        for &[x, y] in polylines.get(s).map(Vec::as_slice).unwrap_or_default() {
            new_path.push(CoordRef::Point(Waypoint::new(x, y)));
            new_ids.push(None);
        }
    }
    if let Some(&last) = sentinels.last() {
        new_path.push(path[last].clone());
        new_ids.push(id_at(last));
    }
    (new_path, new_ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaps_are_replaced_and_sentinels_kept() {
        let path = vec![
            CoordRef::node("A"),
            CoordRef::point(9.0, 9.0),
            CoordRef::node("B"),
            CoordRef::node("C"),
        ];
        let ids = vec![Some(0), None, Some(1), Some(2)];
        let polys = vec![vec![[1.0, 1.0], [2.0, 2.0]], vec![[3.0, 3.0]]];
        let (p, i) = replace_segments_with_polylines(&path, &ids, &polys);
        assert_eq!(
            p,
            vec![
                CoordRef::node("A"),
                CoordRef::point(1.0, 1.0),
                CoordRef::point(2.0, 2.0),
                CoordRef::node("B"),
                CoordRef::point(3.0, 3.0),
                CoordRef::node("C"),
            ]
        );
        assert_eq!(i, vec![Some(0), None, None, Some(1), None, Some(2)]);
    }

    #[test]
    fn fewer_than_two_sentinels_is_a_no_op() {
        let path = vec![CoordRef::node("A"), CoordRef::point(1.0, 1.0)];
        let ids = vec![Some(0), None];
        let (p, i) = replace_segments_with_polylines(&path, &ids, &[vec![[5.0, 5.0]]]);
        assert_eq!(p, path);
        assert_eq!(i, ids);
    }

    #[test]
    fn missing_polyline_empties_its_gap() {
        let path = vec![
            CoordRef::node("A"),
            CoordRef::node("B"),
            CoordRef::point(4.0, 4.0),
            CoordRef::node("C"),
        ];
        let (p, _) = replace_segments_with_polylines(&path, &[], &[vec![[1.0, 0.0]]]);
        assert_eq!(
            p,
            vec![
                CoordRef::node("A"),
                CoordRef::point(1.0, 0.0),
                CoordRef::node("B"),
                CoordRef::node("C"),
            ]
        );
    }
}
