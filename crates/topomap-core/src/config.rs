//! Scene configuration.
//!
//! Every field has a default, so `{}` is a valid configuration. Unknown keys are ignored.

use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_COMMENT_COLOR: &str = "#4ec2fc";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoordinateMode {
    /// Logical (hierarchical) drawing in plain x/y units. Multi-hop paths are segregated.
    #[default]
    Cartesian,
    /// `[lng, lat]` positions; distances and midpoints are geodesic.
    Geographic,
}

impl CoordinateMode {
    pub fn is_logic(self) -> bool {
        matches!(self, Self::Cartesian)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankDir {
    TB,
    BT,
    LR,
    #[default]
    RL,
}

impl From<RankDir> for narwhal::RankDir {
    fn from(dir: RankDir) -> Self {
        match dir {
            RankDir::TB => Self::TB,
            RankDir::BT => Self::BT,
            RankDir::LR => Self::LR,
            RankDir::RL => Self::RL,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ArcOptions {
    /// Apex height as a fraction of the source-target distance, unless the row overrides it.
    pub height_coef: f64,
}

impl Default for ArcOptions {
    fn default() -> Self {
        Self { height_coef: 0.5 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub enabled: bool,
    pub rank_dir: RankDir,
    pub node_sep: f64,
    pub rank_sep: f64,
    /// Box size for nodes whose row carries none.
    pub node_width: f64,
    pub node_height: f64,
    pub order_iterations: usize,
    pub smoothing: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            rank_dir: RankDir::RL,
            node_sep: 40.0,
            rank_sep: 60.0,
            node_width: 40.0,
            node_height: 20.0,
            order_iterations: 24,
            smoothing: 2,
        }
    }
}

impl LayoutConfig {
    pub fn algorithm(&self) -> narwhal::Algorithm {
        narwhal::Algorithm::Layered(narwhal::LayeredOptions {
            rank_dir: self.rank_dir.into(),
            node_sep: self.node_sep,
            rank_sep: self.rank_sep,
            order_iterations: self.order_iterations,
            smoothing: self.smoothing,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentOptions {
    pub default_color: String,
    /// Colour tag to hex colour.
    pub colors: IndexMap<String, String>,
}

impl Default for CommentOptions {
    fn default() -> Self {
        Self {
            default_color: DEFAULT_COMMENT_COLOR.to_string(),
            colors: IndexMap::new(),
        }
    }
}

impl CommentOptions {
    /// Named tags go through the colour table; literal `#rrggbb` tags pass through.
    pub fn resolve(&self, tag: Option<&str>) -> String {
        let Some(tag) = tag else {
            return self.default_color.clone();
        };
        if let Some(hex) = self.colors.get(tag) {
            return hex.clone();
        }
        if tag.starts_with('#') {
            return tag.to_string();
        }
        self.default_color.clone()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SceneConfig {
    pub mode: CoordinateMode,
    pub arc: ArcOptions,
    pub layout: LayoutConfig,
    pub comments: CommentOptions,
}

impl SceneConfig {
    pub fn from_value(value: Value) -> Result<Self> {
        let cfg: Self = serde_json::from_value(value).map_err(|e| Error::Config {
            message: e.to_string(),
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(value)
    }

    pub fn validate(&self) -> Result<()> {
        let layout = &self.layout;
        let checks = [
            ("layout.nodeSep", layout.node_sep),
            ("layout.rankSep", layout.rank_sep),
            ("layout.nodeWidth", layout.node_width),
            ("layout.nodeHeight", layout.node_height),
            ("arc.heightCoef", self.arc.height_coef),
        ];
        for (name, v) in checks {
            if !v.is_finite() || v < 0.0 {
                return Err(Error::Config {
                    message: format!("`{name}` must be a finite non-negative number, got {v}"),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_object_yields_defaults() {
        let cfg = SceneConfig::from_value(json!({})).unwrap();
        assert_eq!(cfg, SceneConfig::default());
        assert_eq!(cfg.comments.default_color, DEFAULT_COMMENT_COLOR);
        assert_eq!(cfg.layout.rank_dir, RankDir::RL);
        assert!(cfg.mode.is_logic());
    }

    #[test]
    fn camel_case_keys_and_unknown_keys() {
        let cfg = SceneConfig::from_value(json!({
            "mode": "geographic",
            "arc": { "heightCoef": 0.25 },
            "layout": { "enabled": true, "rankDir": "TB", "nodeSep": 10 },
            "somethingElse": 1
        }))
        .unwrap();
        assert_eq!(cfg.mode, CoordinateMode::Geographic);
        assert_eq!(cfg.arc.height_coef, 0.25);
        assert!(cfg.layout.enabled);
        assert_eq!(cfg.layout.rank_dir, RankDir::TB);
        assert_eq!(cfg.layout.node_sep, 10.0);
        assert_eq!(cfg.layout.rank_sep, 60.0);
    }

    #[test]
    fn negative_spacing_is_rejected() {
        let err = SceneConfig::from_value(json!({ "layout": { "rankSep": -1 } })).unwrap_err();
        assert!(matches!(err, Error::Config { message } if message.contains("rankSep")));
    }

    #[test]
    fn colour_tags_resolve_through_the_table() {
        let mut opts = CommentOptions::default();
        opts.colors.insert("red".into(), "#f53636".into());
        assert_eq!(opts.resolve(Some("red")), "#f53636");
        assert_eq!(opts.resolve(Some("#123456")), "#123456");
        assert_eq!(opts.resolve(Some("teal")), DEFAULT_COMMENT_COLOR);
        assert_eq!(opts.resolve(None), DEFAULT_COMMENT_COLOR);
    }
}
