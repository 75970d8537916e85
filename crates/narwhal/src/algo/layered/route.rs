use super::{LayerGraph, RoutedEdge};
use crate::geom::{self, Point};

/// Polyline of `e` from its source box boundary to its target box boundary, through its
/// dummy chain, smoothed with `smoothing` Chaikin passes.
pub fn polyline(lg: &LayerGraph, e: &RoutedEdge, smoothing: usize) -> Vec<Point> {
    let mut pts: Vec<Point> = e
        .chain
        .iter()
        .map(|&i| geom::point(lg.nodes[i].x, lg.nodes[i].y))
        .collect();
    if e.reversed {
        pts.reverse();
    }
    let n = pts.len();
    if n < 2 {
        return pts;
    }

    let (src, tgt) = (&lg.nodes[e.v], &lg.nodes[e.w]);
    pts[0] = geom::intersect_rect(pts[0], geom::size(src.width, src.height), pts[1]);
    pts[n - 1] = geom::intersect_rect(pts[n - 1], geom::size(tgt.width, tgt.height), pts[n - 2]);
    geom::chaikin(&pts, smoothing)
}
