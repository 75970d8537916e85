#![forbid(unsafe_code)]

//! Topology scene pipeline.
//!
//! A [`Scene`] is rebuilt once per update cycle: node rows become graph vertices with a slot in
//! the flat coordinate buffer, edge rows are decomposed into edges by [`push_path`], an optional
//! [`LayoutEngine`] positions everything, and [`edges_geometry`] projects the result into
//! GeoJSON-style line and arc features.

pub mod buffer;
pub mod config;
pub mod decompose;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod rows;
pub mod scene;
pub mod segregate;

pub use buffer::PositionBuffer;
pub use config::{
    ArcOptions, CommentOptions, CoordinateMode, DEFAULT_COMMENT_COLOR, LayoutConfig, RankDir,
    SceneConfig,
};
pub use decompose::{PushPath, push_path};
pub use error::{Error, Result};
pub use geometry::{
    ArcFeature, EdgesGeometry, LineFeature, LineProperties, MultiLineString, coords_convert,
    distance_2d, edges_geometry, geodesic_distance, geodesic_midpoint, midpoint, paraboloid,
};
pub use layout::{
    LayoutEngine, LayoutSummary, replace_segments_with_polylines, run_layout, smooth_polyline,
};
pub use rows::{EdgeRow, NodeRow, SceneInput};
pub use scene::{Comment, CommentsData, ROOT_ID, Scene, VertexIds};
pub use segregate::{GuidedCoord, Segregated, segregate_path};

pub use topomap_graph as graph;
