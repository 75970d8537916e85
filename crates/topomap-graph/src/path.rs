//! Path elements and the data record shared by all edges of one logical connection.
//!
//! Row data describes a connection as an ordered "parent path" mixing node ids and literal
//! waypoints. On the wire a waypoint is the tuple `[x, y, 0, text?, colorTag?]`; the optional
//! text and colour turn it into an inline comment.

use serde::de::Deserializer;
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A 2-D coordinate pair, `[x, y]` (or `[lng, lat]` in geographic mode).
pub type Position = [f64; 2];

#[derive(Debug, Clone, PartialEq)]
pub struct Waypoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub text: Option<String>,
    pub color: Option<String>,
}

impl Waypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: 0.0,
            text: None,
            color: None,
        }
    }

    pub fn with_comment(mut self, text: impl Into<String>, color: Option<&str>) -> Self {
        self.text = Some(text.into());
        self.color = color.map(str::to_string);
        self
    }

    pub fn position(&self) -> Position {
        [self.x, self.y]
    }

    /// Tuples longer than a bare coordinate pair may carry an annotation.
    pub fn is_annotated(&self) -> bool {
        self.text.is_some()
    }
}

/// One element of a parent path.
#[derive(Debug, Clone, PartialEq)]
pub enum CoordRef {
    Node(String),
    Point(Waypoint),
    /// Anything that is neither a string nor a numeric tuple. Kept so that element indices stay
    /// aligned with the source row; ignored by every consumer.
    Opaque(Value),
}

impl CoordRef {
    pub fn node(id: impl Into<String>) -> Self {
        Self::Node(id.into())
    }

    pub fn point(x: f64, y: f64) -> Self {
        Self::Point(Waypoint::new(x, y))
    }

    pub fn as_node_id(&self) -> Option<&str> {
        match self {
            Self::Node(id) => Some(id.as_str()),
            _ => None,
        }
    }

    pub fn as_waypoint(&self) -> Option<&Waypoint> {
        match self {
            Self::Point(p) => Some(p),
            _ => None,
        }
    }

    pub fn is_node(&self) -> bool {
        matches!(self, Self::Node(_))
    }

    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(id) => Self::Node(id),
            Value::Array(items) => match waypoint_from_tuple(&items) {
                Some(p) => Self::Point(p),
                None => Self::Opaque(Value::Array(items)),
            },
            other => Self::Opaque(other),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Self::Node(id) => Value::String(id.clone()),
            Self::Point(p) => {
                let mut items = vec![
                    Value::from(p.x),
                    Value::from(p.y),
                    Value::from(p.z),
                ];
                if p.text.is_some() || p.color.is_some() {
                    items.push(p.text.clone().map(Value::String).unwrap_or(Value::Null));
                }
                if let Some(color) = &p.color {
                    items.push(Value::String(color.clone()));
                }
                Value::Array(items)
            }
            Self::Opaque(v) => v.clone(),
        }
    }
}

fn waypoint_from_tuple(items: &[Value]) -> Option<Waypoint> {
    let x = items.first()?.as_f64()?;
    let y = items.get(1)?.as_f64()?;
    let z = items.get(2).and_then(Value::as_f64).unwrap_or(0.0);
    let text = items.get(3).and_then(Value::as_str).map(str::to_string);
    let color = items.get(4).and_then(Value::as_str).map(str::to_string);
    Some(Waypoint {
        x,
        y,
        z,
        text,
        color,
    })
}

impl<'de> Deserialize<'de> for CoordRef {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Value::deserialize(deserializer).map(Self::from_value)
    }
}

impl Serialize for CoordRef {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Node(id) => serializer.serialize_str(id),
            Self::Point(_) => {
                let Value::Array(items) = self.to_value() else {
                    return serializer.serialize_none();
                };
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in &items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Opaque(v) => v.serialize(serializer),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArcStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_config: Option<ArcConfig>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// The row-level record attached to a logical connection. Every synthetic edge produced from
/// the same path shares one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layer_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arc_style: Option<ArcStyle>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl DataRecord {
    pub fn arc_height(&self) -> Option<f64> {
        self.arc_style.as_ref()?.arc_config.as_ref()?.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn annotated_tuple_parses_into_waypoint() {
        let r: CoordRef = serde_json::from_value(json!([5, 5, 0, "note", "red"])).unwrap();
        let p = r.as_waypoint().unwrap();
        assert_eq!(p.position(), [5.0, 5.0]);
        assert_eq!(p.text.as_deref(), Some("note"));
        assert_eq!(p.color.as_deref(), Some("red"));
    }

    #[test]
    fn unknown_elements_are_kept_opaque() {
        let path: Vec<CoordRef> = serde_json::from_value(json!(["A", {"x": 1}, null, "B"])).unwrap();
        assert_eq!(path.len(), 4);
        assert!(matches!(path[1], CoordRef::Opaque(_)));
        assert!(matches!(path[2], CoordRef::Opaque(Value::Null)));
        assert_eq!(path[3].as_node_id(), Some("B"));
    }

    #[test]
    fn waypoint_serializes_back_to_tuple() {
        let r = CoordRef::Point(Waypoint::new(1.0, 2.0).with_comment("hi", None));
        assert_eq!(serde_json::to_value(&r).unwrap(), json!([1.0, 2.0, 0.0, "hi"]));
    }
}
