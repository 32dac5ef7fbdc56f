//! Connection engine - wires each level to the next.
//!
//! For every level `L`:
//! 1. Each node draws one or two outgoing edges and links to that many of the
//!    nearest nodes on `L + 1`.
//! 2. Every node on `L + 1` left without an incoming edge is linked from its
//!    nearest node on `L`, regardless of how many edges that node already has.

use board_rules::{NodeId, DEFAULT_DOUBLE_EDGE_PROBABILITY};
use rand::Rng;
use tracing::debug;

use crate::error::{BoardError, Result};
use crate::graph::BoardGraph;

/// Creates directed edges between consecutive levels.
#[derive(Debug, Clone)]
pub struct ConnectionEngine {
    /// Probability that a node draws two outgoing edges instead of one.
    double_edge_probability: f64,
}

impl Default for ConnectionEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DOUBLE_EDGE_PROBABILITY)
    }
}

impl ConnectionEngine {
    /// Create an engine with the given double edge probability, clamped to `[0, 1]`.
    /// A non-finite probability falls back to the default.
    pub fn new(double_edge_probability: f64) -> Self {
        let double_edge_probability = if double_edge_probability.is_finite() {
            double_edge_probability.clamp(0.0, 1.0)
        } else {
            DEFAULT_DOUBLE_EDGE_PROBABILITY
        };
        Self { double_edge_probability }
    }

    /// Connect every level of `graph` to the next one.
    ///
    /// Fails on the first empty level instead of skipping it.
    pub fn connect(&self, graph: &mut BoardGraph, rng: &mut impl Rng) -> Result<()> {
        if let Some(level) = graph.levels().iter().position(|ids| ids.is_empty()) {
            return Err(BoardError::EmptyLevel { level });
        }

        let mut repairs = 0;
        for level in 0..graph.level_count().saturating_sub(1) {
            let current = graph.level_nodes(level).to_vec();
            let next = graph.level_nodes(level + 1).to_vec();

            for from in &current {
                let degree = if rng.gen_bool(self.double_edge_probability) { 2 } else { 1 };
                for to in nearest(graph, *from, &next).into_iter().take(degree) {
                    graph.add_edge(*from, to);
                }
            }

            for to in &next {
                if graph.in_degree(*to) > 0 {
                    continue;
                }
                if let Some(from) = nearest(graph, *to, &current).first().copied() {
                    graph.add_edge(from, *to);
                    repairs += 1;
                    debug!(level = level + 1, %from, %to, "linked orphan node");
                }
            }
        }

        debug!(repairs, "connected board levels");
        Ok(())
    }
}

/// `candidates` ordered by lateral distance to `origin`. Ties keep lateral order.
fn nearest(graph: &BoardGraph, origin: NodeId, candidates: &[NodeId]) -> Vec<NodeId> {
    let Some(origin) = graph.node(origin) else {
        return Vec::new();
    };

    let mut ranked: Vec<(f64, NodeId)> = candidates
        .iter()
        .filter_map(|id| graph.node(*id).map(|n| (origin.lateral_distance(n), *id)))
        .collect();
    ranked.sort_by(|a, b| a.0.total_cmp(&b.0));
    ranked.into_iter().map(|(_, id)| id).collect()
}
