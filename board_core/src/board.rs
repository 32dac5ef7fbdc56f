//! The board aggregate - a generated graph plus the traversal running on it.

use board_rules::{BoardConfig, BoardId, NodeId};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::info;

use crate::error::{MoveError, Result};
use crate::generation::{BoardGenerator, TypingReport};
use crate::graph::BoardGraph;
use crate::snapshot::BoardSnapshot;
use crate::traversal::TraversalController;

/// A playable board.
#[derive(Debug, Clone)]
pub struct Board {
    graph: Arc<BoardGraph>,
    traversal: TraversalController,
}

impl Board {
    /// Generate a board. Uses `config.seed` when set, entropy otherwise.
    pub fn generate(config: &BoardConfig) -> Result<Self> {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self::generate_with_rng(config, &mut rng).map(|(board, _)| board)
    }

    /// Generate a board from an injected random source.
    pub fn generate_with_rng(config: &BoardConfig, rng: &mut impl Rng) -> Result<(Self, TypingReport)> {
        let generator = BoardGenerator::new(config)?;
        let (graph, report) = generator.generate(BoardId::new(), rng)?;
        let graph = Arc::new(graph);
        let traversal = TraversalController::start(Arc::clone(&graph))?;

        info!(
            board = %graph.id(),
            levels = graph.level_count(),
            nodes = graph.node_count(),
            retyped = report.retyped.len(),
            "generated board"
        );
        Ok((Self { graph, traversal }, report))
    }

    /// Rebuild a board from a snapshot without generating anything.
    pub fn restore(snapshot: &BoardSnapshot) -> Result<Self> {
        let (graph, traversal) = snapshot.restore()?;
        Ok(Self { graph, traversal })
    }

    /// Capture the board for persistence.
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot::capture(&self.graph, &self.traversal)
    }

    /// The frozen graph.
    pub fn graph(&self) -> &Arc<BoardGraph> {
        &self.graph
    }

    pub fn traversal(&self) -> &TraversalController {
        &self.traversal
    }

    pub fn traversal_mut(&mut self) -> &mut TraversalController {
        &mut self.traversal
    }

    /// Forward a move request to the traversal controller.
    pub fn move_to(&mut self, target: NodeId) -> std::result::Result<(), MoveError> {
        self.traversal.move_to(target)
    }
}
