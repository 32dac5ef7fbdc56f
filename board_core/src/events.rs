//! Board events - what the traversal controller reports to rendering collaborators.

use board_rules::NodeId;
use serde::{Deserialize, Serialize};

/// A change in traversal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardEvent {
    /// The player spawned (or was restored) on a node.
    Started { node: NodeId, available: Vec<NodeId> },

    /// The player moved along an edge.
    Moved {
        from: NodeId,
        to: NodeId,
        /// Outgoing edges of `to` that have not been visited yet.
        available: Vec<NodeId>,
    },
}

impl BoardEvent {
    /// Node the player stands on after the event.
    pub fn current(&self) -> NodeId {
        match self {
            BoardEvent::Started { node, .. } => *node,
            BoardEvent::Moved { to, .. } => *to,
        }
    }

    /// Nodes to highlight after the event.
    pub fn available(&self) -> &[NodeId] {
        match self {
            BoardEvent::Started { available, .. } | BoardEvent::Moved { available, .. } => available,
        }
    }
}
