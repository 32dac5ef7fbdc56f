//! Type assignment - gives every node a type, level by level.
//!
//! Per node, in ascending level order:
//! 1. Level 0 is always `Start`.
//! 2. The node's path memo is the union of each predecessor's type and memo.
//! 3. Boss and gambling levels force their type.
//! 4. Otherwise a weighted category draw picks from the drawable types missing
//!    from the memo, or from every drawable type when none are missing.
//!
//! A final repair pass makes sure both good subtypes appear somewhere on the board.
//! It may reintroduce a repeat on some path; coverage wins over uniqueness.

use board_rules::{BoardConfig, CategoryWeights, LevelKind, NodeCategory, NodeId, NodeType};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::graph::BoardGraph;

/// Good subtypes every board must contain at least once.
const REQUIRED_TYPES: [NodeType; 2] = [NodeType::Revive, NodeType::ResourceBoost];

/// A type overwritten by the repair pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Retype {
    pub node: NodeId,
    pub from: NodeType,
    pub to: NodeType,
}

/// What happened while typing a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypingReport {
    /// Nodes drawn from the full set because every drawable type was already on their paths.
    pub fallback: BTreeSet<NodeId>,

    /// Retypes made by the repair pass, in the order they were made.
    pub retyped: Vec<Retype>,
}

/// Assigns a [`NodeType`] to every node of a connected graph.
#[derive(Debug, Clone, Default)]
pub struct TypeAssignmentEngine {
    weights: CategoryWeights,
    boss_levels: BTreeSet<usize>,
    gambling_levels: BTreeSet<usize>,
}

impl TypeAssignmentEngine {
    /// Create an engine with the given category weights and no special levels.
    pub fn new(weights: CategoryWeights) -> Self {
        Self {
            weights,
            boss_levels: BTreeSet::new(),
            gambling_levels: BTreeSet::new(),
        }
    }

    /// Create an engine from a board configuration.
    pub fn from_config(config: &BoardConfig) -> Self {
        Self {
            weights: config.category_weights,
            boss_levels: config.boss_levels.clone(),
            gambling_levels: config.gambling_levels.clone(),
        }
    }

    /// Tag 1-based levels as boss levels.
    pub fn with_boss_levels(mut self, levels: impl IntoIterator<Item = usize>) -> Self {
        self.boss_levels = levels.into_iter().collect();
        self
    }

    /// Tag 1-based levels as gambling levels.
    pub fn with_gambling_levels(mut self, levels: impl IntoIterator<Item = usize>) -> Self {
        self.gambling_levels = levels.into_iter().collect();
        self
    }

    fn level_kind(&self, level_index: usize) -> LevelKind {
        LevelKind::for_level(level_index, &self.boss_levels, &self.gambling_levels)
    }

    /// Type every node, then run the coverage repair pass.
    pub fn assign(&self, graph: &mut BoardGraph, rng: &mut impl Rng) -> TypingReport {
        let mut report = TypingReport::default();

        for level in 0..graph.level_count() {
            for id in graph.level_nodes(level).to_vec() {
                if self.assign_node(graph, id, rng) {
                    report.fallback.insert(id);
                }
            }
        }

        self.repair_coverage(graph, &mut report);
        if !report.retyped.is_empty() {
            graph.refresh_incoming_path_types();
        }

        debug!(
            fallback = report.fallback.len(),
            retyped = report.retyped.len(),
            "assigned node types"
        );
        report
    }

    /// Type a single node whose predecessors are already typed.
    /// Returns true when the draw had to fall back to the full drawable set.
    pub(crate) fn assign_node(&self, graph: &mut BoardGraph, id: NodeId, rng: &mut impl Rng) -> bool {
        let Some(level) = graph.node(id).map(|n| n.level) else {
            return false;
        };

        if level == 0 {
            graph.set_incoming_path_types(id, BTreeSet::new());
            graph.set_type(id, NodeType::Start);
            return false;
        }

        let seen = graph.incoming_path_types(id);
        let (node_type, fallback) = match self.level_kind(level) {
            LevelKind::Boss => (NodeType::Boss, false),
            LevelKind::Gambling => (NodeType::Gambling, false),
            LevelKind::Normal => {
                let available: Vec<NodeType> = NodeType::DRAWABLE
                    .into_iter()
                    .filter(|t| !seen.contains(t))
                    .collect();
                (self.draw(&available, rng), available.is_empty())
            }
        };

        graph.set_incoming_path_types(id, seen);
        graph.set_type(id, node_type);
        fallback
    }

    /// Weighted category draw restricted to `eligible`.
    ///
    /// Categories without an eligible member drop out and the remaining weights are
    /// renormalized; the member is then picked uniformly. With no eligible drawable
    /// type the draw runs over every drawable type. If every remaining category
    /// weighs zero, the category is picked uniformly instead.
    pub fn draw(&self, eligible: &[NodeType], rng: &mut impl Rng) -> NodeType {
        let pool: Vec<NodeType> = if eligible.iter().any(NodeType::is_drawable) {
            eligible.iter().copied().filter(NodeType::is_drawable).collect()
        } else {
            NodeType::DRAWABLE.to_vec()
        };

        let categories: Vec<(NodeCategory, Vec<NodeType>)> = NodeCategory::ALL
            .into_iter()
            .map(|category| {
                let members = category
                    .members()
                    .iter()
                    .copied()
                    .filter(|t| pool.contains(t))
                    .collect::<Vec<_>>();
                (category, members)
            })
            .filter(|(_, members)| !members.is_empty())
            .collect();

        let total: f64 = categories.iter().map(|(c, _)| self.weights.weight(*c)).sum();
        let chosen = if total > 0.0 {
            let mut roll = rng.gen::<f64>() * total;
            let mut chosen = categories
                .iter()
                .rposition(|(c, _)| self.weights.weight(*c) > 0.0)
                .unwrap_or(0);
            for (index, (category, _)) in categories.iter().enumerate() {
                let weight = self.weights.weight(*category);
                if roll < weight {
                    chosen = index;
                    break;
                }
                roll -= weight;
            }
            chosen
        } else {
            rng.gen_range(0..categories.len())
        };

        let members = &categories[chosen].1;
        members[rng.gen_range(0..members.len())]
    }

    /// Make sure every required good subtype is on the board at least once.
    ///
    /// For each missing subtype, retype the first good node whose type is held more
    /// than once; failing that, the first neutral or bad node. Start, boss and gambling
    /// nodes are never touched.
    pub(crate) fn repair_coverage(&self, graph: &mut BoardGraph, report: &mut TypingReport) {
        for missing in REQUIRED_TYPES {
            if graph.count_of(missing) > 0 {
                continue;
            }

            match retype_candidate(graph) {
                Some(id) => {
                    let from = graph.node(id).map(|n| n.node_type).unwrap_or(NodeType::Unassigned);
                    graph.set_type(id, missing);
                    report.retyped.push(Retype {
                        node: id,
                        from,
                        to: missing,
                    });
                    debug!(node = %id, %from, to = %missing, "retyped node for coverage");
                }
                None => {
                    warn!(missing = %missing, "board has no node left to carry a required type");
                }
            }
        }
    }
}

fn retype_candidate(graph: &BoardGraph) -> Option<NodeId> {
    let nodes = graph.nodes();
    nodes
        .iter()
        .find(|n| {
            n.node_type.category() == Some(NodeCategory::Good) && graph.count_of(n.node_type) > 1
        })
        .or_else(|| {
            nodes.iter().find(|n| {
                matches!(
                    n.node_type.category(),
                    Some(NodeCategory::Neutral | NodeCategory::Bad)
                )
            })
        })
        .map(|n| n.id)
}
