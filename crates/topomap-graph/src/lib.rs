#![forbid(unsafe_code)]

//! Hierarchical attributed graph model used by `topomap`.
//!
//! A [`Graph`] owns every node and edge of one topology in flat arenas. Subgraphs are nodes that
//! carry their own [`NodeCollection`], so "graphs containing graphs" are expressed through
//! [`NodeKey`] handles instead of owning pointers. Per-entity payloads live in a fixed
//! [`Attributes`] array addressed by [`AttributeKind`].

pub mod attributes;
pub mod collection;
pub mod entity;
pub mod error;
pub mod graph;
pub mod path;

pub use attributes::{
    AlgorithmData, Attribute, AttributeKind, Attributes, DrawingData, EdgeData, GeomData,
    NodeData, ViewerData,
};
pub use collection::NodeCollection;
pub use entity::{Edge, EdgeKey, Entity, Node, NodeKey};
pub use error::{GraphError, Result};
pub use graph::alg;
pub use graph::{BoundaryEdge, ElementRef, Graph, Subgraph, ToAncestor};
pub use path::{ArcConfig, ArcStyle, CoordRef, DataRecord, Position, Waypoint};
