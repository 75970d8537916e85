//! Coordinate assignment in top-to-bottom space.
//!
//! Ranks are stacked by their tallest member. Within a rank, nodes are first packed left to
//! right, then repeatedly nudged towards the median of their neighbours in the adjacent rank
//! while keeping the order and the minimum separation.

use super::{LayerGraph, LayeredOptions};

const BALANCE_PASSES: usize = 8;

pub fn run(lg: &mut LayerGraph, layers: &[Vec<usize>], opts: &LayeredOptions) {
    let mut y = 0.0;
    for layer in layers {
        let h = layer
            .iter()
            .map(|&v| lg.nodes[v].height)
            .fold(0.0, f64::max);
        for &v in layer {
            lg.nodes[v].y = y + h / 2.0;
        }
        y += h + opts.rank_sep;
    }

    for layer in layers {
        let mut prev: Option<usize> = None;
        for &v in layer {
            lg.nodes[v].x = match prev {
                Some(u) => lg.nodes[u].x + separation(lg, u, v, opts),
                None => 0.0,
            };
            prev = Some(v);
        }
    }

    for pass in 0..BALANCE_PASSES {
        if pass % 2 == 0 {
            for r in 1..layers.len() {
                balance(lg, &layers[r], true, opts);
            }
        } else {
            for r in (0..layers.len().saturating_sub(1)).rev() {
                balance(lg, &layers[r], false, opts);
            }
        }
    }
}

fn separation(lg: &LayerGraph, u: usize, v: usize, opts: &LayeredOptions) -> f64 {
    let (a, b) = (&lg.nodes[u], &lg.nodes[v]);
    let gap = if a.dummy && b.dummy {
        opts.node_sep / 2.0
    } else {
        opts.node_sep
    };
    (a.width + b.width) / 2.0 + gap
}

fn median(mut xs: Vec<f64>) -> Option<f64> {
    if xs.is_empty() {
        return None;
    }
    xs.sort_by(f64::total_cmp);
    let mid = xs.len() / 2;
    Some(if xs.len() % 2 == 1 {
        xs[mid]
    } else {
        (xs[mid - 1] + xs[mid]) / 2.0
    })
}

/// Moves the nodes of one layer towards their neighbour medians. The result is the mean of a
/// left-packed and a right-packed placement, both of which respect the separation, so the mean
/// does too.
fn balance(lg: &mut LayerGraph, layer: &[usize], from_above: bool, opts: &LayeredOptions) {
    if layer.is_empty() {
        return;
    }
    let desired: Vec<f64> = layer
        .iter()
        .map(|&v| {
            let neighbors = if from_above { &lg.pred[v] } else { &lg.succ[v] };
            median(neighbors.iter().map(|&u| lg.nodes[u].x).collect()).unwrap_or(lg.nodes[v].x)
        })
        .collect();
    let seps: Vec<f64> = layer
        .windows(2)
        .map(|pair| separation(lg, pair[0], pair[1], opts))
        .collect();

    let k = layer.len();
    let mut left = desired.clone();
    for i in 1..k {
        left[i] = desired[i].max(left[i - 1] + seps[i - 1]);
    }
    let mut right = desired.clone();
    for i in (0..k - 1).rev() {
        right[i] = desired[i].min(right[i + 1] - seps[i]);
    }
    for (i, &v) in layer.iter().enumerate() {
        lg.nodes[v].x = (left[i] + right[i]) / 2.0;
    }
}
