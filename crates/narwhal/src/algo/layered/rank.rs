//! Longest-path ranking.
//!
//! Every node is placed one rank above its highest-ranked successor, sinks are then pulled
//! up next to their predecessors, and isolated nodes go to the first rank.

use super::{LayerGraph, RoutedEdge};
use std::collections::VecDeque;

pub fn longest_path(lg: &mut LayerGraph, edges: &[RoutedEdge]) {
    let n = lg.nodes.len();
    let mut succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut pred: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut indeg = vec![0usize; n];
    for e in edges {
        let (v, w) = e.oriented();
        succ[v].push(w);
        pred[w].push(v);
        indeg[w] += 1;
    }

    let mut queue: VecDeque<usize> = (0..n).filter(|&v| indeg[v] == 0).collect();
    let mut topo: Vec<usize> = Vec::with_capacity(n);
    while let Some(v) = queue.pop_front() {
        topo.push(v);
        for &w in &succ[v] {
            indeg[w] -= 1;
            if indeg[w] == 0 {
                queue.push_back(w);
            }
        }
    }

    let mut rank = vec![0i32; n];
    for &v in topo.iter().rev() {
        rank[v] = succ[v].iter().map(|&w| rank[w] - 1).min().unwrap_or(0);
    }
    for &v in &topo {
        if succ[v].is_empty() {
            if let Some(r) = pred[v].iter().map(|&u| rank[u] + 1).max() {
                rank[v] = r;
            }
        }
    }

    let min = rank.iter().copied().min().unwrap_or(0);
    for v in 0..n {
        let isolated = succ[v].is_empty() && pred[v].is_empty();
        lg.nodes[v].rank = if isolated { 0 } else { rank[v] - min };
    }
}
