//! Layered layout pipeline.
//!
//! Stages run over an index-based working graph that holds leaf nodes only:
//! cycle breaking, longest-path ranking, long-edge normalization into dummy chains,
//! barycenter ordering, coordinate assignment, then the rank-direction transform and routing.

mod acyclic;
mod coordinate_system;
mod normalize;
mod order;
mod position;
mod rank;
mod route;

use super::LayeredOptions;
use crate::error::Result;
use crate::geom::{self, Point, Rect, Size};
use crate::graph::{Graph, LayoutResult};
use rustc_hash::{FxHashMap, FxHashSet};

#[derive(Debug, Clone, Default)]
pub(crate) struct LayerNode {
    pub width: f64,
    pub height: f64,
    pub rank: i32,
    pub order: usize,
    pub x: f64,
    pub y: f64,
    pub dummy: bool,
}

/// An input edge that takes part in the layout.
#[derive(Debug, Clone)]
pub(crate) struct RoutedEdge {
    pub id: String,
    pub v: usize,
    pub w: usize,
    pub reversed: bool,
    /// Node indices from the oriented tail to the oriented head, dummies included.
    pub chain: Vec<usize>,
}

impl RoutedEdge {
    /// Endpoints after cycle breaking.
    pub fn oriented(&self) -> (usize, usize) {
        if self.reversed {
            (self.w, self.v)
        } else {
            (self.v, self.w)
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct LayerGraph {
    pub nodes: Vec<LayerNode>,
    /// Unit-span edges after normalization.
    pub edges: Vec<(usize, usize)>,
    pub succ: Vec<Vec<usize>>,
    pub pred: Vec<Vec<usize>>,
}

impl LayerGraph {
    pub fn rebuild_adjacency(&mut self) {
        self.succ = vec![Vec::new(); self.nodes.len()];
        self.pred = vec![Vec::new(); self.nodes.len()];
        for &(v, w) in &self.edges {
            self.succ[v].push(w);
            self.pred[w].push(v);
        }
    }
}

pub fn layout(graph: &Graph, opts: &LayeredOptions) -> Result<LayoutResult> {
    graph.validate()?;

    let clusters: FxHashSet<&str> = graph
        .nodes
        .iter()
        .filter_map(|n| n.parent.as_deref())
        .collect();

    let mut lg = LayerGraph::default();
    let mut index: FxHashMap<&str, usize> = FxHashMap::default();
    let mut leaves: Vec<&crate::graph::Node> = Vec::new();
    for n in &graph.nodes {
        if clusters.contains(n.id.as_str()) {
            continue;
        }
        let (width, height) = if opts.rank_dir.is_horizontal() {
            (n.height, n.width)
        } else {
            (n.width, n.height)
        };
        index.insert(n.id.as_str(), lg.nodes.len());
        lg.nodes.push(LayerNode {
            width,
            height,
            ..Default::default()
        });
        leaves.push(n);
    }

    let mut routed: Vec<RoutedEdge> = Vec::new();
    for e in &graph.edges {
        let (Some(&v), Some(&w)) = (index.get(e.source.as_str()), index.get(e.target.as_str()))
        else {
            tracing::trace!(edge = %e.id, "edge touches a cluster; not routed");
            continue;
        };
        if v == w {
            tracing::trace!(edge = %e.id, "self loop; not routed");
            continue;
        }
        routed.push(RoutedEdge {
            id: e.id.clone(),
            v,
            w,
            reversed: false,
            chain: Vec::new(),
        });
    }

    acyclic::run(lg.nodes.len(), &mut routed);
    rank::longest_path(&mut lg, &routed);
    normalize::run(&mut lg, &mut routed);
    let layers = order::run(&mut lg, opts.order_iterations);
    position::run(&mut lg, &layers, opts);
    coordinate_system::undo(&mut lg, opts.rank_dir);

    let mut out = LayoutResult::default();
    for (i, n) in leaves.iter().enumerate() {
        let ln = &lg.nodes[i];
        out.positions.insert(n.id.clone(), geom::point(ln.x, ln.y));
        out.sizes.insert(n.id.clone(), geom::size(n.width, n.height));
        out.ranks.insert(n.id.clone(), ln.rank);
        out.orders.insert(n.id.clone(), ln.order);
    }
    for e in &routed {
        out.edges
            .insert(e.id.clone(), route::polyline(&lg, e, opts.smoothing));
    }
    cluster_boxes(graph, &clusters, opts, &mut out);
    translate(&mut out);
    Ok(out)
}

/// Sizes each cluster to enclose every leaf below it, padded by half the node separation.
fn cluster_boxes(
    graph: &Graph,
    clusters: &FxHashSet<&str>,
    opts: &LayeredOptions,
    out: &mut LayoutResult,
) {
    let parent_of: FxHashMap<&str, &str> = graph
        .nodes
        .iter()
        .filter_map(|n| Some((n.id.as_str(), n.parent.as_deref()?)))
        .collect();
    let mut boxes: FxHashMap<&str, Rect> = FxHashMap::default();
    for n in &graph.nodes {
        if clusters.contains(n.id.as_str()) {
            continue;
        }
        let (Some(&c), Some(&s)) = (out.positions.get(&n.id), out.sizes.get(&n.id)) else {
            continue;
        };
        let leaf = geom::rect_around(c, s);
        let mut cur = parent_of.get(n.id.as_str()).copied();
        while let Some(p) = cur {
            boxes
                .entry(p)
                .and_modify(|r| *r = r.union(&leaf))
                .or_insert(leaf);
            cur = parent_of.get(p).copied();
        }
    }
    let pad = opts.node_sep / 2.0;
    for n in &graph.nodes {
        let Some(r) = boxes.get(n.id.as_str()) else {
            continue;
        };
        let r = r.inflate(pad, pad);
        out.positions.insert(n.id.clone(), r.center());
        out.sizes.insert(n.id.clone(), r.size);
    }
}

/// Shifts everything so that the top-left corner of the drawing sits at the origin.
fn translate(out: &mut LayoutResult) {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    for (id, c) in &out.positions {
        let s = out.sizes.get(id).copied().unwrap_or_else(Size::zero);
        min_x = min_x.min(c.x - s.width / 2.0);
        min_y = min_y.min(c.y - s.height / 2.0);
    }
    for p in out.edges.values().flatten() {
        min_x = min_x.min(p.x);
        min_y = min_y.min(p.y);
    }
    if !min_x.is_finite() || !min_y.is_finite() {
        return;
    }
    let shift = |p: &mut Point| {
        p.x -= min_x;
        p.y -= min_y;
    };
    out.positions.values_mut().for_each(shift);
    out.edges.values_mut().flatten().for_each(shift);
}
