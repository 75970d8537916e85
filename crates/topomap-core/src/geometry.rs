//! Geometry projection: hyperedges to renderable line and arc features.

use crate::buffer::PositionBuffer;
use crate::config::CoordinateMode;
use crate::scene::{ROOT_ID, Scene};
use crate::segregate::segregate_path;
use indexmap::IndexMap;
use serde::Serialize;
use topomap_graph::{Attribute, CoordRef, DataRecord, Entity, Position, ViewerData};

/// Mean earth radius in metres.
pub const EARTH_RADIUS: f64 = 6_371_008.8;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MultiLineString {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub coordinates: Vec<Vec<Position>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineProperties {
    #[serde(flatten)]
    pub record: DataRecord,
    /// Id of the node the path starts at.
    pub loc_name: String,
    /// Path indices of every segregated run.
    pub segr_path: Vec<Vec<usize>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LineFeature {
    pub edge_id: String,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub geometry: MultiLineString,
    pub row_index: Option<usize>,
    pub properties: LineProperties,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcFeature {
    pub edge_id: String,
    pub source_position: Position,
    pub target_position: Position,
    /// Midpoint with the apex height as third component.
    pub mid_point: [f64; 3],
    pub properties: LineProperties,
}

/// Features bucketed by the id of the graph owning each path's source node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgesGeometry {
    pub lines: IndexMap<String, Vec<LineFeature>>,
    pub arcs: IndexMap<String, Vec<ArcFeature>>,
}

impl EdgesGeometry {
    pub fn line_count(&self) -> usize {
        self.lines.values().map(Vec::len).sum()
    }
}

/// Resolves each path element to coordinates: node references through the buffer, literal
/// waypoints as-is. The result stays aligned with `path`.
pub fn coords_convert(
    path: &[CoordRef],
    native_ids: &[Option<usize>],
    buffer: &PositionBuffer,
) -> Vec<Option<Position>> {
    path.iter()
        .enumerate()
        .map(|(i, item)| match item {
            CoordRef::Node(_) => native_ids
                .get(i)
                .copied()
                .flatten()
                .and_then(|id| buffer.get(id)),
            CoordRef::Point(p) => Some(p.position()),
            CoordRef::Opaque(_) => None,
        })
        .collect()
}

pub fn distance_2d(a: Position, b: Position) -> f64 {
    (b[0] - a[0]).hypot(b[1] - a[1])
}

/// Haversine distance in metres between two `[lng, lat]` positions in degrees.
pub fn geodesic_distance(a: Position, b: Position) -> f64 {
    let (lat1, lat2) = (a[1].to_radians(), b[1].to_radians());
    let dlat = lat2 - lat1;
    let dlng = (b[0] - a[0]).to_radians();
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Great-circle midpoint of two `[lng, lat]` positions.
pub fn geodesic_midpoint(a: Position, b: Position) -> Position {
    let (lng1, lat1) = (a[0].to_radians(), a[1].to_radians());
    let lat2 = b[1].to_radians();
    let dlng = (b[0] - a[0]).to_radians();

    let bx = lat2.cos() * dlng.cos();
    let by = lat2.cos() * dlng.sin();
    let lat = (lat1.sin() + lat2.sin()).atan2(((lat1.cos() + bx).powi(2) + by * by).sqrt());
    let lng = lng1 + by.atan2(lat1.cos() + bx);
    let lng = (lng.to_degrees() + 540.0).rem_euclid(360.0) - 180.0;
    [lng, lat.to_degrees()]
}

pub fn midpoint(a: Position, b: Position, mode: CoordinateMode) -> Position {
    match mode {
        CoordinateMode::Cartesian => [(a[0] + b[0]) / 2.0, (a[1] + b[1]) / 2.0],
        CoordinateMode::Geographic => geodesic_midpoint(a, b),
    }
}

fn distance(a: Position, b: Position, mode: CoordinateMode) -> f64 {
    match mode {
        CoordinateMode::Cartesian => distance_2d(a, b),
        CoordinateMode::Geographic => geodesic_distance(a, b),
    }
}

/// Height at `ratio` along a parabolic arc between `source_z` and `target_z`. The apex scales
/// with `distance * height_coef`; a zero scale interpolates linearly.
pub fn paraboloid(
    distance: f64,
    source_z: f64,
    target_z: f64,
    ratio: f64,
    height_coef: f64,
) -> f64 {
    let delta_z = target_z - source_z;
    let dh = distance * height_coef;
    if dh == 0.0 {
        return source_z + delta_z * ratio;
    }

    let unit_z = delta_z / dh;
    let p2 = unit_z * unit_z + 1.0;
    let (z0, r) = if delta_z < 0.0 {
        (target_z, 1.0 - ratio)
    } else {
        (source_z, ratio)
    };
    (r * (p2 - r)).sqrt() * dh + z0
}

/// Projects every hyperedge into one line feature and one arc feature and records each line's
/// index in the Viewer attribute of the hyperedge's edges.
///
/// Groups without edge data or without any resolvable coordinates are omitted.
pub fn edges_geometry(scene: &mut Scene) -> EdgesGeometry {
    let mode = scene.config.mode;
    let default_coef = scene.config.arc.height_coef;
    let mut out = EdgesGeometry::default();

    for idx in 0..scene.hyperedges.len() {
        let edges = scene.hyperedges[idx].clone();
        let Some(&first) = edges.first() else {
            continue;
        };
        let graph = &scene.graph;
        let Some(edge) = graph.edge(first) else {
            continue;
        };
        let Some(data) = edge.data() else {
            tracing::debug!(edge = edge.id(), "edge without data skipped");
            continue;
        };
        // Bucketed by the top-level subgraph containing the source node.
        let source = edge.source();
        let bucket = graph
            .lift_node(graph.root(), source)
            .filter(|&top| top != source)
            .and_then(|top| graph.node_id(top))
            .unwrap_or(ROOT_ID)
            .to_string();

        let native_ids = scene
            .vertex_ids
            .get(idx)
            .map(|v| v.native_ids.as_slice())
            .unwrap_or_default();
        let coords = coords_convert(&data.path, native_ids, &scene.buffer);
        let seg = segregate_path(&data.path, &coords);
        let mut coordinates = seg.coords();
        let mut segr_path = seg.indices();

        if coordinates.is_empty() {
            let ends = (
                coords.first().copied().flatten(),
                coords.last().copied().flatten(),
            );
            if let (Some(a), Some(b)) = ends {
                coordinates = vec![vec![a, b]];
                segr_path = vec![vec![0, coords.len() - 1]];
            }
        }

        if let Some(geom) = edge.attrs().geometry() {
            if geom.curve.is_empty() {
                tracing::warn!(edge = edge.id(), "missing layout curve");
            } else {
                // Node centers give way to the boundary ports of the routed curve.
                for run in &mut coordinates {
                    if run.len() > 3 {
                        *run = run[1..run.len() - 1].to_vec();
                    }
                }
            }
        }

        let (Some(source), Some(target)) = (
            coordinates.first().and_then(|r| r.first()).copied(),
            coordinates.last().and_then(|r| r.last()).copied(),
        ) else {
            tracing::debug!(edge = edge.id(), "no coordinates; feature omitted");
            continue;
        };

        let loc_name = data
            .path
            .first()
            .and_then(CoordRef::as_node_id)
            .unwrap_or_default()
            .to_string();
        let properties = LineProperties {
            record: (*data.record).clone(),
            loc_name,
            segr_path,
        };
        let edge_id = edge.id().to_string();

        let coef = data.record.arc_height().unwrap_or(default_coef);
        let peak = paraboloid(distance(source, target, mode), 0.0, 0.0, 0.5, coef);
        let [mx, my] = midpoint(source, target, mode);
        let arc = ArcFeature {
            edge_id: edge_id.clone(),
            source_position: source,
            target_position: target,
            mid_point: [mx, my, peak],
            properties: properties.clone(),
        };
        let line = LineFeature {
            edge_id,
            kind: "Feature",
            geometry: MultiLineString {
                kind: "MultiLineString",
                coordinates,
            },
            row_index: data.record.row_index,
            properties,
        };

        let lines = out.lines.entry(bucket.clone()).or_default();
        lines.push(line);
        let line_id = lines.len() - 1;
        out.arcs.entry(bucket).or_default().push(arc);

        for &e in &edges {
            let Some(edge) = scene.graph.edge_mut(e) else {
                continue;
            };
            match edge.attrs_mut().viewer_mut() {
                Some(v) => v.line_id = Some(line_id),
                None => {
                    edge.set_attr(Attribute::Viewer(ViewerData {
                        line_id: Some(line_id),
                        hidden: false,
                    }));
                }
            }
        }
    }

    out
}
