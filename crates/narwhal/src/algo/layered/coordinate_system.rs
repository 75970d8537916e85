//! Rank-direction transform.
//!
//! Layout runs top-to-bottom with box sizes already swapped for horizontal directions; this
//! maps the result into the requested direction.

use super::LayerGraph;
use crate::algo::RankDir;

pub fn undo(lg: &mut LayerGraph, dir: RankDir) {
    match dir {
        RankDir::BT | RankDir::RL => reverse_y(lg),
        RankDir::TB | RankDir::LR => {}
    }

    match dir {
        RankDir::LR | RankDir::RL => swap_xy(lg),
        RankDir::TB | RankDir::BT => {}
    }
}

fn reverse_y(lg: &mut LayerGraph) {
    for n in &mut lg.nodes {
        n.y = -n.y;
    }
}

fn swap_xy(lg: &mut LayerGraph) {
    for n in &mut lg.nodes {
        (n.x, n.y) = (n.y, n.x);
        (n.width, n.height) = (n.height, n.width);
    }
}
