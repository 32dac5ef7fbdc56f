//! Node definitions - the vertices of the board graph.

use board_rules::{NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A single stop on the board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,

    /// Depth of the node, 0 for the start level.
    pub level: usize,

    /// Position within the level. Only used to decide which nodes are "nearest".
    pub lateral: f64,

    pub node_type: NodeType,

    /// Edges to nodes on `level + 1`.
    pub outgoing: BTreeSet<NodeId>,

    /// Every type seen on any path from the start to this node, this node excluded.
    pub types_on_incoming_paths: BTreeSet<NodeType>,
}

impl Node {
    /// Create an untyped node with no edges.
    pub fn new(id: NodeId, level: usize, lateral: f64) -> Self {
        Self {
            id,
            level,
            lateral,
            node_type: NodeType::Unassigned,
            outgoing: BTreeSet::new(),
            types_on_incoming_paths: BTreeSet::new(),
        }
    }

    /// Set the node type.
    pub fn with_type(mut self, node_type: NodeType) -> Self {
        self.node_type = node_type;
        self
    }

    /// Check if the node has an edge to `target`.
    pub fn connects_to(&self, target: NodeId) -> bool {
        self.outgoing.contains(&target)
    }

    /// Check if the node still carries the sentinel type.
    pub fn is_unassigned(&self) -> bool {
        self.node_type == NodeType::Unassigned
    }

    /// Absolute lateral distance to another node.
    pub fn lateral_distance(&self, other: &Node) -> f64 {
        (self.lateral - other.lateral).abs()
    }
}
