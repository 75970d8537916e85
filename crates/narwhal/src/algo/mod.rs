pub mod layered;

#[derive(Debug, Clone)]
pub enum Algorithm {
    /// Sugiyama-style layered layout: ranks, crossing reduction, coordinate assignment.
    Layered(LayeredOptions),
}

impl Default for Algorithm {
    fn default() -> Self {
        Self::Layered(LayeredOptions::default())
    }
}

/// Direction in which ranks grow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RankDir {
    #[default]
    TB,
    BT,
    LR,
    RL,
}

impl RankDir {
    pub fn is_horizontal(self) -> bool {
        matches!(self, Self::LR | Self::RL)
    }
}

#[derive(Debug, Clone)]
pub struct LayeredOptions {
    pub rank_dir: RankDir,
    /// Gap between neighbouring boxes within one rank.
    pub node_sep: f64,
    /// Gap between consecutive ranks.
    pub rank_sep: f64,
    /// Upper bound on crossing-reduction sweeps.
    pub order_iterations: usize,
    /// Chaikin passes applied to each routed polyline.
    pub smoothing: usize,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            rank_dir: RankDir::TB,
            node_sep: 40.0,
            rank_sep: 60.0,
            order_iterations: 24,
            smoothing: 2,
        }
    }
}
