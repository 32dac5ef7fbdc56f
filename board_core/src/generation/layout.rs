//! Level layout - places the nodes of every level along the lateral axis.

use board_rules::{BoardId, ConfigError};
use rand::Rng;
use tracing::debug;

use crate::error::{BoardError, Result};
use crate::graph::BoardGraph;

/// Lays out levels and nodes. Produces no edges.
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    /// Distance between neighbouring nodes before jitter.
    spacing: f64,

    /// Jitter bound; each coordinate moves by a uniform draw from `[-jitter, jitter]`.
    jitter: f64,
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new(1.0, 0.35)
    }
}

impl GraphBuilder {
    /// Create a builder with the given spacing and jitter bound.
    pub fn new(spacing: f64, jitter: f64) -> Self {
        Self { spacing, jitter }
    }

    /// Build one level per schedule entry. Node ids are handed out in level order,
    /// and within a level in ascending lateral order.
    pub fn build(&self, board_id: BoardId, schedule: &[usize], rng: &mut impl Rng) -> Result<BoardGraph> {
        if schedule.is_empty() {
            return Err(BoardError::InvalidConfig(ConfigError::EmptySchedule));
        }
        if let Some(level) = schedule.iter().position(|count| *count == 0) {
            return Err(BoardError::InvalidConfig(ConfigError::EmptyLevelCount { level }));
        }

        let mut graph = BoardGraph::new(board_id);
        for count in schedule {
            let laterals = self.lateral_positions(*count, rng);
            graph.push_level(&laterals);
        }

        debug!(
            levels = graph.level_count(),
            nodes = graph.node_count(),
            "laid out board levels"
        );
        Ok(graph)
    }

    /// Sorted lateral coordinates for a level of `count` nodes.
    ///
    /// A single node sits at 0. Otherwise coordinates are evenly spaced around 0,
    /// jittered, then sorted.
    pub fn lateral_positions(&self, count: usize, rng: &mut impl Rng) -> Vec<f64> {
        if count == 1 {
            return vec![0.0];
        }

        let center = (count as f64 - 1.0) / 2.0;
        let mut positions: Vec<f64> = (0..count)
            .map(|i| (i as f64 - center) * self.spacing + self.jitter_offset(rng))
            .collect();
        positions.sort_by(|a, b| a.total_cmp(b));
        positions
    }

    fn jitter_offset(&self, rng: &mut impl Rng) -> f64 {
        if self.jitter > 0.0 {
            rng.gen_range(-self.jitter..=self.jitter)
        } else {
            0.0
        }
    }
}
