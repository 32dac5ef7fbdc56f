//! Board generation - builds a fully typed, connected board in three stages.
//!
//! 1. **Layout**: [`GraphBuilder`] places the nodes of each level on the lateral axis
//! 2. **Connection**: [`ConnectionEngine`] adds edges from every level to the next
//! 3. **Typing**: [`TypeAssignmentEngine`] types every node and repairs coverage
//!
//! Generation is all-or-nothing. The graph is owned by the generator until every
//! stage has run and is only then handed out.

mod connection;
mod layout;
mod typing;

pub use connection::*;
pub use layout::*;
pub use typing::*;

use board_rules::{BoardConfig, BoardId};
use rand::Rng;
use tracing::debug;

use crate::error::Result;
use crate::graph::BoardGraph;

/// Runs the three generation stages with parameters taken from a [`BoardConfig`].
#[derive(Debug, Clone)]
pub struct BoardGenerator {
    builder: GraphBuilder,
    connector: ConnectionEngine,
    typer: TypeAssignmentEngine,
    schedule: Vec<usize>,
}

impl BoardGenerator {
    /// Validate the configuration and set up every stage from it.
    pub fn new(config: &BoardConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            builder: GraphBuilder::new(config.lateral_spacing, config.jitter),
            connector: ConnectionEngine::new(config.double_edge_probability),
            typer: TypeAssignmentEngine::from_config(config),
            schedule: config.level_schedule.clone(),
        })
    }

    /// Generate a new board.
    pub fn generate(&self, board_id: BoardId, rng: &mut impl Rng) -> Result<(BoardGraph, TypingReport)> {
        let mut graph = self.builder.build(board_id, &self.schedule, rng)?;
        self.connector.connect(&mut graph, rng)?;
        let report = self.typer.assign(&mut graph, rng);

        debug!(board = %board_id, nodes = graph.node_count(), "generated board graph");
        Ok((graph, report))
    }
}
