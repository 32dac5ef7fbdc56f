//! Per-node traversal status, as shown to the player.

use serde::{Deserialize, Serialize};

/// How a node relates to the player's progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeStatus {
    /// The player stands here.
    Current,
    /// Passed through earlier.
    Visited,
    /// Reachable with one move.
    Available,
    /// Not reachable right now.
    Locked,
}

impl NodeStatus {
    /// Whether a move to a node in this status would be accepted.
    pub fn is_selectable(&self) -> bool {
        matches!(self, NodeStatus::Available)
    }
}
