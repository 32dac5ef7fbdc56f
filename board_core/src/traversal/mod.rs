//! Traversal - moves the player across a frozen board.
//!
//! The controller owns the only mutable state of a running board: the current
//! node and the visited set. The graph itself is shared read-only.

mod status;

pub use status::*;

use board_rules::NodeId;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::debug;

use crate::error::{BoardError, MoveError, Result};
use crate::events::BoardEvent;
use crate::graph::BoardGraph;

/// Enforces forward, connected movement and tracks visited nodes.
///
/// Invariant: `current` is always in `visited`.
#[derive(Debug, Clone)]
pub struct TraversalController {
    graph: Arc<BoardGraph>,
    current: NodeId,
    visited: BTreeSet<NodeId>,

    /// Cache: outgoing edges of `current` minus `visited`.
    available: Vec<NodeId>,

    /// Events not yet drained by a collaborator.
    pending_events: Vec<BoardEvent>,
}

impl TraversalController {
    /// Spawn the player on the start node.
    pub fn start(graph: Arc<BoardGraph>) -> Result<Self> {
        let start = graph.start_node().ok_or(BoardError::EmptyLevel { level: 0 })?;
        Ok(Self::resume(graph, start, [start].into_iter().collect()))
    }

    /// Rebuild a controller from known state. Callers check that `current` is in `visited`.
    pub(crate) fn resume(graph: Arc<BoardGraph>, current: NodeId, visited: BTreeSet<NodeId>) -> Self {
        let mut controller = Self {
            graph,
            current,
            visited,
            available: Vec::new(),
            pending_events: Vec::new(),
        };
        controller.refresh_available();
        controller.pending_events.push(BoardEvent::Started {
            node: current,
            available: controller.available.clone(),
        });
        controller
    }

    /// Move the player to `target`.
    ///
    /// Checked in order: `target` must be an outgoing edge of the current node, must not
    /// be visited yet, and must not lie on an earlier level. Re-requesting the current
    /// node counts as a revisit. A rejected move changes nothing.
    pub fn move_to(&mut self, target: NodeId) -> std::result::Result<(), MoveError> {
        if let Err(err) = self.check_move(target) {
            debug!(from = %self.current, to = %target, error = %err, "rejected move");
            return Err(err);
        }

        let from = self.current;
        self.current = target;
        self.visited.insert(target);
        self.refresh_available();

        debug!(%from, to = %target, available = self.available.len(), "moved");
        self.pending_events.push(BoardEvent::Moved {
            from,
            to: target,
            available: self.available.clone(),
        });
        Ok(())
    }

    fn check_move(&self, target: NodeId) -> std::result::Result<(), MoveError> {
        if target == self.current {
            return Err(MoveError::AlreadyVisited(target));
        }

        let not_connected = MoveError::NotConnected {
            from: self.current,
            to: target,
        };
        let current = self.graph.node(self.current).ok_or(not_connected)?;
        if !current.connects_to(target) {
            return Err(not_connected);
        }
        let next = self.graph.node(target).ok_or(not_connected)?;

        if self.visited.contains(&target) {
            return Err(MoveError::AlreadyVisited(target));
        }

        if next.level < current.level {
            return Err(MoveError::Backward {
                from_level: current.level,
                to_level: next.level,
            });
        }

        Ok(())
    }

    fn refresh_available(&mut self) {
        self.available = self
            .graph
            .successors(self.current)
            .filter(|id| !self.visited.contains(id))
            .collect();
    }

    /// Nodes a move would currently be accepted for.
    pub fn available_moves(&self) -> &[NodeId] {
        &self.available
    }

    /// Node the player stands on.
    pub fn current_node(&self) -> NodeId {
        self.current
    }

    /// Every node the player has stood on, the current one included.
    pub fn visited(&self) -> &BTreeSet<NodeId> {
        &self.visited
    }

    /// The board being traversed.
    pub fn graph(&self) -> &Arc<BoardGraph> {
        &self.graph
    }

    /// Status of a node for highlighting.
    pub fn status_of(&self, id: NodeId) -> NodeStatus {
        if id == self.current {
            NodeStatus::Current
        } else if self.visited.contains(&id) {
            NodeStatus::Visited
        } else if self.available.contains(&id) {
            NodeStatus::Available
        } else {
            NodeStatus::Locked
        }
    }

    /// Whether the player has reached the last level.
    pub fn is_complete(&self) -> bool {
        self.graph
            .node(self.current)
            .map(|n| n.level + 1 == self.graph.level_count())
            .unwrap_or(false)
    }

    /// Take every event recorded since the last drain.
    pub fn drain_events(&mut self) -> Vec<BoardEvent> {
        std::mem::take(&mut self.pending_events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use board_rules::{BoardId, NodeType};

    /// Level 0: {0}, level 1: {1, 2}, level 2: {3}; 0 -> 1, 0 -> 2, 1 -> 3, 2 -> 3.
    fn diamond() -> Arc<BoardGraph> {
        let mut graph = BoardGraph::new(BoardId::nil());
        graph.push_level(&[0.0]);
        graph.push_level(&[-0.5, 0.5]);
        graph.push_level(&[0.0]);
        graph.add_edge(NodeId(0), NodeId(1));
        graph.add_edge(NodeId(0), NodeId(2));
        graph.add_edge(NodeId(1), NodeId(3));
        graph.add_edge(NodeId(2), NodeId(3));
        graph.set_type(NodeId(0), NodeType::Start);
        graph.set_type(NodeId(1), NodeType::Revive);
        graph.set_type(NodeId(2), NodeType::ResourceBoost);
        graph.set_type(NodeId(3), NodeType::Boss);
        Arc::new(graph)
    }

    #[test]
    fn test_start_on_level_zero() {
        let controller = TraversalController::start(diamond()).unwrap();
        assert_eq!(controller.current_node(), NodeId(0));
        assert!(controller.visited().contains(&NodeId(0)));
        assert_eq!(controller.available_moves(), &[NodeId(1), NodeId(2)]);
        assert!(!controller.is_complete());
    }

    #[test]
    fn test_start_requires_a_start_node() {
        let result = TraversalController::start(Arc::new(BoardGraph::new(BoardId::nil())));
        assert!(matches!(result, Err(BoardError::EmptyLevel { level: 0 })));
    }

    #[test]
    fn test_move_forward() {
        let mut controller = TraversalController::start(diamond()).unwrap();

        controller.move_to(NodeId(2)).unwrap();
        assert_eq!(controller.current_node(), NodeId(2));
        assert_eq!(controller.available_moves(), &[NodeId(3)]);
        assert_eq!(controller.status_of(NodeId(0)), NodeStatus::Visited);
        assert_eq!(controller.status_of(NodeId(1)), NodeStatus::Locked);
        assert_eq!(controller.status_of(NodeId(3)), NodeStatus::Available);

        controller.move_to(NodeId(3)).unwrap();
        assert!(controller.is_complete());
        assert!(controller.available_moves().is_empty());
        assert_eq!(controller.visited().len(), 3);
    }

    #[test]
    fn test_disconnected_target_rejected() {
        let mut controller = TraversalController::start(diamond()).unwrap();

        let result = controller.move_to(NodeId(3));
        assert_eq!(
            result,
            Err(MoveError::NotConnected {
                from: NodeId(0),
                to: NodeId(3)
            })
        );
        assert_eq!(controller.current_node(), NodeId(0));
        assert_eq!(controller.visited().len(), 1);

        assert!(matches!(
            controller.move_to(NodeId(42)),
            Err(MoveError::NotConnected { .. })
        ));
    }

    #[test]
    fn test_revisit_rejected() {
        let mut controller = TraversalController::start(diamond()).unwrap();

        controller.move_to(NodeId(1)).unwrap();
        assert_eq!(controller.move_to(NodeId(1)), Err(MoveError::AlreadyVisited(NodeId(1))));
        assert_eq!(controller.current_node(), NodeId(1));
        assert_eq!(controller.visited().len(), 2);
    }

    #[test]
    fn test_backward_edge_rejected() {
        // 0 -> 1 -> 3, and a regressive edge 3 -> 2.
        let mut graph = BoardGraph::new(BoardId::nil());
        graph.push_level(&[0.0]);
        graph.push_level(&[-0.5, 0.5]);
        graph.push_level(&[0.0]);
        graph.add_edge(NodeId(0), NodeId(1));
        graph.add_edge(NodeId(1), NodeId(3));
        graph.add_edge(NodeId(3), NodeId(2));
        let mut controller = TraversalController::start(Arc::new(graph)).unwrap();

        controller.move_to(NodeId(1)).unwrap();
        controller.move_to(NodeId(3)).unwrap();
        assert_eq!(
            controller.move_to(NodeId(2)),
            Err(MoveError::Backward {
                from_level: 2,
                to_level: 1
            })
        );
        assert_eq!(controller.current_node(), NodeId(3));
    }

    #[test]
    fn test_visited_edge_target_rejected() {
        // Same-level edges are allowed, but not back onto a visited node.
        let mut graph = BoardGraph::new(BoardId::nil());
        graph.push_level(&[0.0]);
        graph.push_level(&[-0.5, 0.5]);
        graph.add_edge(NodeId(0), NodeId(1));
        graph.add_edge(NodeId(1), NodeId(2));
        graph.add_edge(NodeId(2), NodeId(1));
        let mut controller = TraversalController::start(Arc::new(graph)).unwrap();

        controller.move_to(NodeId(1)).unwrap();
        controller.move_to(NodeId(2)).unwrap();
        assert_eq!(controller.move_to(NodeId(1)), Err(MoveError::AlreadyVisited(NodeId(1))));
    }

    #[test]
    fn test_events_are_drained() {
        let mut controller = TraversalController::start(diamond()).unwrap();
        controller.move_to(NodeId(1)).unwrap();
        let _ = controller.move_to(NodeId(2));

        let events = controller.drain_events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].current(), NodeId(0));
        assert_eq!(
            events[1],
            BoardEvent::Moved {
                from: NodeId(0),
                to: NodeId(1),
                available: vec![NodeId(3)],
            }
        );
        assert!(controller.drain_events().is_empty());
    }
}
