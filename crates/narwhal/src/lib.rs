#![forbid(unsafe_code)]

//! Headless layered graph layout.
//!
//! `narwhal` takes a flat description of boxes, edges and optional cluster membership and
//! returns node centers plus routed, smoothed polylines for every edge it could route. It is
//! runtime-agnostic and has no notion of the caller's graph model.

pub mod algo;
pub mod error;
pub mod geom;
pub mod graph;

pub use algo::{Algorithm, LayeredOptions, RankDir};
pub use error::{Error, Result};
pub use geom::{Point, Size};
pub use graph::{Edge, Graph, LayoutResult, Node};

/// Headless layout entry point.
pub fn layout(graph: &Graph, algorithm: &Algorithm) -> Result<LayoutResult> {
    match algorithm {
        Algorithm::Layered(opts) => algo::layered::layout(graph, opts),
    }
}
