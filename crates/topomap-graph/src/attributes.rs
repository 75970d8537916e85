//! Attribute registry and the closed set of per-entity payload records.
//!
//! Each entity owns an [`Attributes`] array with one slot per [`AttributeKind`]. A slot either
//! holds the record variant matching its kind or is empty.

use crate::path::{CoordRef, DataRecord, Position};
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AttributeKind {
    Geometry = 0,
    Drawing = 1,
    AlgorithmData = 2,
    Viewer = 3,
    NodeData = 4,
    EdgeData = 5,
}

impl AttributeKind {
    pub const COUNT: usize = 6;

    pub const ALL: [AttributeKind; Self::COUNT] = [
        AttributeKind::Geometry,
        AttributeKind::Drawing,
        AttributeKind::AlgorithmData,
        AttributeKind::Viewer,
        AttributeKind::NodeData,
        AttributeKind::EdgeData,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Layout geometry. Nodes use `center`/`width`/`height`; edges use `curve`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GeomData {
    pub center: Option<Position>,
    pub width: f64,
    pub height: f64,
    /// Routed curve including both boundary ports.
    pub curve: Vec<Position>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DrawingData {
    pub label: Option<String>,
    pub color: Option<String>,
    pub line_width: Option<f64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlgorithmData {
    pub rank: Option<i32>,
    pub order: Option<usize>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewerData {
    /// Index of the rendered line feature within its namespace bucket.
    pub line_id: Option<usize>,
    pub hidden: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeData {
    /// Index into the flat coordinate buffer (`x = buf[id * 2]`, `y = buf[id * 2 + 1]`).
    pub native_id: usize,
    pub group: Option<usize>,
    pub properties: Map<String, Value>,
}

impl NodeData {
    pub fn new(native_id: usize) -> Self {
        Self {
            native_id,
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EdgeData {
    /// Identity of the logical connection (shared by all synthetic edges of a hyperedge).
    pub edge_id: String,
    /// Slot in the vertex-index buffer / hyperedge table.
    pub record_index: Option<usize>,
    /// The sanitized parent path of the whole logical connection.
    pub path: Vec<CoordRef>,
    /// The run this synthetic edge realizes, when the path was segregated.
    pub sub_path: Option<Vec<CoordRef>>,
    pub record: Arc<DataRecord>,
    pub synthetic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    Geometry(GeomData),
    Drawing(DrawingData),
    AlgorithmData(AlgorithmData),
    Viewer(ViewerData),
    Node(NodeData),
    Edge(EdgeData),
}

impl Attribute {
    pub fn kind(&self) -> AttributeKind {
        match self {
            Self::Geometry(_) => AttributeKind::Geometry,
            Self::Drawing(_) => AttributeKind::Drawing,
            Self::AlgorithmData(_) => AttributeKind::AlgorithmData,
            Self::Viewer(_) => AttributeKind::Viewer,
            Self::Node(_) => AttributeKind::NodeData,
            Self::Edge(_) => AttributeKind::EdgeData,
        }
    }
}

macro_rules! typed_slot {
    ($get:ident, $get_mut:ident, $kind:ident, $variant:ident, $ty:ty) => {
        pub fn $get(&self) -> Option<&$ty> {
            match self.get(AttributeKind::$kind) {
                Some(Attribute::$variant(v)) => Some(v),
                _ => None,
            }
        }

        pub fn $get_mut(&mut self) -> Option<&mut $ty> {
            match self.get_mut(AttributeKind::$kind) {
                Some(Attribute::$variant(v)) => Some(v),
                _ => None,
            }
        }
    };
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    slots: [Option<Attribute>; AttributeKind::COUNT],
}

impl Attributes {
    pub fn get(&self, kind: AttributeKind) -> Option<&Attribute> {
        self.slots[kind.index()].as_ref()
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> Option<&mut Attribute> {
        self.slots[kind.index()].as_mut()
    }

    /// Stores `attr` in the slot of its kind and returns the previous occupant.
    pub fn set(&mut self, attr: Attribute) -> Option<Attribute> {
        let idx = attr.kind().index();
        self.slots[idx].replace(attr)
    }

    pub fn take(&mut self, kind: AttributeKind) -> Option<Attribute> {
        self.slots[kind.index()].take()
    }

    pub fn has(&self, kind: AttributeKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    typed_slot!(geometry, geometry_mut, Geometry, Geometry, GeomData);
    typed_slot!(drawing, drawing_mut, Drawing, Drawing, DrawingData);
    typed_slot!(algorithm, algorithm_mut, AlgorithmData, AlgorithmData, AlgorithmData);
    typed_slot!(viewer, viewer_mut, Viewer, Viewer, ViewerData);
    typed_slot!(node_data, node_data_mut, NodeData, Node, NodeData);
    typed_slot!(edge_data, edge_data_mut, EdgeData, Edge, EdgeData);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_routes_record_to_its_registry_slot() {
        let mut attrs = Attributes::default();
        assert!(attrs.set(Attribute::Node(NodeData::new(7))).is_none());
        assert!(attrs.has(AttributeKind::NodeData));
        assert!(!attrs.has(AttributeKind::EdgeData));
        assert_eq!(attrs.node_data().map(|d| d.native_id), Some(7));

        let prev = attrs.set(Attribute::Node(NodeData::new(9)));
        assert!(matches!(prev, Some(Attribute::Node(d)) if d.native_id == 7));
    }

    #[test]
    fn typed_mut_accessor_never_creates_a_record() {
        let mut attrs = Attributes::default();
        assert!(attrs.viewer_mut().is_none());
        attrs.set(Attribute::Viewer(ViewerData::default()));
        if let Some(v) = attrs.viewer_mut() {
            v.line_id = Some(3);
        }
        assert_eq!(attrs.viewer().and_then(|v| v.line_id), Some(3));
    }

    #[test]
    fn drawing_slot_is_independent_of_geometry() {
        let mut attrs = Attributes::default();
        attrs.set(Attribute::Geometry(GeomData::default()));
        attrs.set(Attribute::Drawing(DrawingData {
            color: Some("#ff0000".into()),
            ..Default::default()
        }));
        assert!(attrs.geometry().is_some());
        assert_eq!(
            attrs.drawing().and_then(|d| d.color.as_deref()),
            Some("#ff0000")
        );
        assert!(matches!(
            attrs.take(AttributeKind::Drawing),
            Some(Attribute::Drawing(_))
        ));
        assert!(attrs.drawing().is_none());
        assert!(attrs.has(AttributeKind::Geometry));
    }

    #[test]
    fn registry_indices_are_dense() {
        for (i, kind) in AttributeKind::ALL.iter().enumerate() {
            assert_eq!(kind.index(), i);
        }
    }
}
