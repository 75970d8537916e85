//! Split edges spanning several ranks into chains of unit-span edges through dummy nodes.

use super::{LayerGraph, LayerNode, RoutedEdge};

pub fn run(lg: &mut LayerGraph, edges: &mut [RoutedEdge]) {
    lg.edges.clear();
    for e in edges.iter_mut() {
        let (v, w) = e.oriented();
        let (rv, rw) = (lg.nodes[v].rank, lg.nodes[w].rank);
        let mut chain = vec![v];
        for r in rv + 1..rw {
            chain.push(lg.nodes.len());
            lg.nodes.push(LayerNode {
                rank: r,
                dummy: true,
                ..Default::default()
            });
        }
        chain.push(w);
        lg.edges
            .extend(chain.windows(2).map(|pair| (pair[0], pair[1])));
        e.chain = chain;
    }
    lg.rebuild_adjacency();
}
