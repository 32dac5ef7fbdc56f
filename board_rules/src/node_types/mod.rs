//! Node types, the categories they are drawn from, and category weights.

use serde::{Deserialize, Serialize};

/// Every type a board node can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeType {
    /// Transient sentinel before typing.
    Unassigned,
    /// Forced for every node on level 0.
    Start,

    // Good
    Revive,
    ResourceBoost,

    // Neutral
    Random,

    // Bad
    Combat,
    CoinFlip,

    // Special, forced by level tag
    Boss,
    Gambling,
}

impl NodeType {
    /// Types that can be produced by the weighted category draw.
    pub const DRAWABLE: [NodeType; 5] = [
        NodeType::Revive,
        NodeType::ResourceBoost,
        NodeType::Random,
        NodeType::Combat,
        NodeType::CoinFlip,
    ];

    /// Category of a drawable type. `None` for start, special and unassigned types.
    pub fn category(&self) -> Option<NodeCategory> {
        match self {
            NodeType::Revive | NodeType::ResourceBoost => Some(NodeCategory::Good),
            NodeType::Random => Some(NodeCategory::Neutral),
            NodeType::Combat | NodeType::CoinFlip => Some(NodeCategory::Bad),
            NodeType::Unassigned | NodeType::Start | NodeType::Boss | NodeType::Gambling => None,
        }
    }

    /// Whether the type is forced by position rather than drawn.
    pub fn is_fixed(&self) -> bool {
        matches!(self, NodeType::Start | NodeType::Boss | NodeType::Gambling)
    }

    /// Whether the type came out of the category draw.
    pub fn is_drawable(&self) -> bool {
        self.category().is_some()
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Grouping of drawable node types used for weighted selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NodeCategory {
    Good,
    Neutral,
    Bad,
}

impl NodeCategory {
    /// Categories in draw order.
    pub const ALL: [NodeCategory; 3] = [NodeCategory::Good, NodeCategory::Neutral, NodeCategory::Bad];

    /// Member types of this category.
    pub fn members(&self) -> &'static [NodeType] {
        match self {
            NodeCategory::Good => &[NodeType::Revive, NodeType::ResourceBoost],
            NodeCategory::Neutral => &[NodeType::Random],
            NodeCategory::Bad => &[NodeType::Combat, NodeType::CoinFlip],
        }
    }
}

/// Relative weights of the three categories.
///
/// Weights need not sum to 1.0; the draw renormalizes over the categories that
/// still have eligible members.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryWeights {
    pub good: f64,
    pub neutral: f64,
    pub bad: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            good: 0.3,
            neutral: 0.4,
            bad: 0.3,
        }
    }
}

impl CategoryWeights {
    /// Get the weight of a category.
    pub fn weight(&self, category: NodeCategory) -> f64 {
        match category {
            NodeCategory::Good => self.good,
            NodeCategory::Neutral => self.neutral,
            NodeCategory::Bad => self.bad,
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> f64 {
        self.good + self.neutral + self.bad
    }
}
