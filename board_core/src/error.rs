//! Error types for generation, traversal and restore.

use board_rules::{ConfigError, NodeId};

/// Fatal errors. Generation and restore are all-or-nothing: nothing is returned
/// when one of these is raised.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    #[error("invalid board configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("level {level} has no nodes")]
    EmptyLevel { level: usize },

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

/// Result type for board operations.
pub type Result<T> = std::result::Result<T, BoardError>;

/// Why a move request was rejected. The traversal state is unchanged in every case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("node {to} is not connected to the current node {from}")]
    NotConnected { from: NodeId, to: NodeId },

    #[error("node {0} has already been visited")]
    AlreadyVisited(NodeId),

    #[error("cannot move backward from level {from_level} to level {to_level}")]
    Backward { from_level: usize, to_level: usize },
}
