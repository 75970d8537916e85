//! Whole-graph algorithms over one hierarchy level or subtree.

use super::{Graph, HashMap, HashSet};
use crate::entity::{EdgeKey, NodeKey};
use std::collections::VecDeque;
use std::hash::BuildHasher;

const PAGERANK_ITERATIONS: usize = 50;

/// Connected components seeded from `g`'s direct children, following edges in both
/// directions.
pub fn shallow_connected_components(graph: &Graph, g: NodeKey) -> Vec<Vec<NodeKey>> {
    let mut enqueued: HashSet<NodeKey> = HashSet::default();
    let mut out = Vec::new();
    for n in graph.shallow_nodes(g) {
        if !enqueued.insert(n) {
            continue;
        }
        let mut queue = VecDeque::from([n]);
        let mut nodes = Vec::new();
        while let Some(s) = queue.pop_front() {
            nodes.push(s);
            let Some(node) = graph.node(s) else {
                continue;
            };
            let targets = node
                .out_edges()
                .iter()
                .filter_map(|&e| graph.edge(e).map(|x| x.target()));
            let sources = node
                .in_edges()
                .iter()
                .filter_map(|&e| graph.edge(e).map(|x| x.source()));
            for neighbor in targets.chain(sources) {
                if enqueued.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }
        out.push(nodes);
    }
    out
}

/// PageRank over every node below `g`; `omega` is the probability of following a link.
/// Sources outside the subtree contribute nothing.
pub fn pagerank(graph: &Graph, g: NodeKey, omega: f64) -> HashMap<NodeKey, f64> {
    let n = graph.node_count_deep(g);
    if n == 0 {
        return HashMap::default();
    }
    let n = n as f64;
    let mut p: HashMap<NodeKey, f64> = graph
        .nodes_breadth_first(g)
        .map(|v| (v, 1.0 / n))
        .collect();

    for _ in 0..PAGERANK_ITERATIONS {
        let base = (1.0 - omega) / n;
        let mut q: HashMap<NodeKey, f64> = HashMap::default();
        for v in graph.nodes_breadth_first(g) {
            let mut qv = base;
            if let Some(node) = graph.node(v) {
                for &e in node.in_edges() {
                    let Some(u) = graph.edge(e).map(|edge| edge.source()) else {
                        continue;
                    };
                    let out_degree = graph.node(u).map_or(0, |u| u.out_degree());
                    if out_degree > 0 {
                        qv += omega * p.get(&u).copied().unwrap_or(0.0) / out_degree as f64;
                    }
                }
            }
            q.insert(v, qv);
        }
        p = q;
    }
    p
}

pub fn edge_nodes_belong_to_set<S: BuildHasher>(
    graph: &Graph,
    e: EdgeKey,
    set: &hashbrown::HashSet<NodeKey, S>,
) -> bool {
    graph
        .edge(e)
        .is_some_and(|edge| set.contains(&edge.source()) && set.contains(&edge.target()))
}
