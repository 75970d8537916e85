//! Crossing reduction by alternating barycenter sweeps.
//!
//! The initial order comes from a DFS over nodes sorted by rank. Each sweep reorders one layer
//! at a time against its fixed neighbour layer; the best order seen is kept and the loop stops
//! once four sweeps in a row fail to improve it.

use super::LayerGraph;
use rustc_hash::FxHashMap;

const MAX_STALE_SWEEPS: usize = 4;

pub fn run(lg: &mut LayerGraph, iterations: usize) -> Vec<Vec<usize>> {
    let n = lg.nodes.len();
    let Some(max_rank) = lg.nodes.iter().map(|v| v.rank.max(0) as usize).max() else {
        return Vec::new();
    };

    let mut layers: Vec<Vec<usize>> = vec![Vec::new(); max_rank + 1];
    let mut start: Vec<usize> = (0..n).collect();
    start.sort_by_key(|&v| lg.nodes[v].rank);

    fn dfs(v: usize, lg: &LayerGraph, visited: &mut [bool], layers: &mut [Vec<usize>]) {
        if visited[v] {
            return;
        }
        visited[v] = true;
        layers[lg.nodes[v].rank.max(0) as usize].push(v);
        for &w in &lg.succ[v] {
            dfs(w, lg, visited, layers);
        }
    }
    let mut visited = vec![false; n];
    for v in start {
        dfs(v, lg, &mut visited, &mut layers);
    }

    let mut best = layers.clone();
    let mut best_cc = cross_count(lg, &layers);
    let mut stale = 0usize;
    for i in 0..iterations {
        if best_cc == 0 {
            break;
        }
        if i % 2 == 0 {
            for r in 1..layers.len() {
                reorder(&mut layers, r, r - 1, &lg.pred);
            }
        } else {
            for r in (0..layers.len().saturating_sub(1)).rev() {
                reorder(&mut layers, r, r + 1, &lg.succ);
            }
        }
        let cc = cross_count(lg, &layers);
        if cc < best_cc {
            best = layers.clone();
            best_cc = cc;
            stale = 0;
        } else {
            stale += 1;
            if stale >= MAX_STALE_SWEEPS {
                break;
            }
        }
    }
    tracing::trace!(crossings = best_cc, "ordering settled");

    for layer in &best {
        for (i, &v) in layer.iter().enumerate() {
            lg.nodes[v].order = i;
        }
    }
    best
}

/// Sorts layer `r` by the mean position of each node's neighbours in layer `fixed`. Nodes
/// without neighbours keep their slot.
fn reorder(layers: &mut [Vec<usize>], r: usize, fixed: usize, neighbors: &[Vec<usize>]) {
    let pos: FxHashMap<usize, usize> = layers[fixed]
        .iter()
        .enumerate()
        .map(|(i, &v)| (v, i))
        .collect();

    let mut sortable: Vec<(f64, usize, usize)> = Vec::new();
    let mut unsortable: Vec<(usize, usize)> = Vec::new();
    for (i, &v) in layers[r].iter().enumerate() {
        let (sum, count) = neighbors[v]
            .iter()
            .filter_map(|u| pos.get(u))
            .fold((0.0, 0usize), |(s, c), &p| (s + p as f64, c + 1));
        if count == 0 {
            unsortable.push((i, v));
        } else {
            sortable.push((sum / count as f64, i, v));
        }
    }
    sortable.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

    let mut out: Vec<usize> = Vec::with_capacity(layers[r].len());
    let mut fixed_slots = unsortable.into_iter().peekable();
    let mut sorted = sortable.into_iter();
    loop {
        while let Some(&(slot, v)) = fixed_slots.peek() {
            if slot > out.len() {
                break;
            }
            out.push(v);
            fixed_slots.next();
        }
        match sorted.next() {
            Some((_, _, v)) => out.push(v),
            None => break,
        }
    }
    out.extend(fixed_slots.map(|(_, v)| v));
    layers[r] = out;
}

pub(crate) fn cross_count(lg: &LayerGraph, layers: &[Vec<usize>]) -> usize {
    layers
        .windows(2)
        .map(|pair| two_layer_cross_count(lg, &pair[0], &pair[1]))
        .sum()
}

/// Bilayer crossing count with an accumulator tree (Barth, Jünger and Mutzel).
fn two_layer_cross_count(lg: &LayerGraph, north: &[usize], south: &[usize]) -> usize {
    if south.is_empty() {
        return 0;
    }
    let south_pos: FxHashMap<usize, usize> =
        south.iter().enumerate().map(|(i, &v)| (v, i)).collect();

    let mut south_entries: Vec<usize> = Vec::new();
    for &v in north {
        let mut entries: Vec<usize> = lg.succ[v]
            .iter()
            .filter_map(|w| south_pos.get(w).copied())
            .collect();
        entries.sort_unstable();
        south_entries.extend(entries);
    }

    let mut first_index = 1usize;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let tree_size = 2 * first_index - 1;
    first_index -= 1;
    let mut tree = vec![0usize; tree_size];

    let mut cc = 0usize;
    for pos in south_entries {
        let mut index = pos + first_index;
        tree[index] += 1;
        let mut weight_sum = 0usize;
        while index > 0 {
            if index % 2 == 1 {
                weight_sum += tree[index + 1];
            }
            index = (index - 1) >> 1;
            tree[index] += 1;
        }
        cc += weight_sum;
    }
    cc
}
