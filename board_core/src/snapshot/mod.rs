//! Snapshots - the serializable form of a board and its traversal state.
//!
//! A snapshot carries node ids, levels, lateral positions, types, edges, the visited
//! set and the current node. Restoring one rebuilds the graph and controller without
//! running generation again.

use board_rules::{BoardId, NodeId, NodeType};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::info;

use crate::error::{BoardError, Result};
use crate::graph::{BoardGraph, Node};
use crate::traversal::TraversalController;

/// One node as stored in a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub level: usize,
    pub lateral: f64,
    pub node_type: NodeType,
    pub outgoing: Vec<NodeId>,
}

impl From<&Node> for NodeRecord {
    fn from(node: &Node) -> Self {
        Self {
            id: node.id,
            level: node.level,
            lateral: node.lateral,
            node_type: node.node_type,
            outgoing: node.outgoing.iter().copied().collect(),
        }
    }
}

/// A saved board.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board_id: BoardId,
    pub nodes: Vec<NodeRecord>,
    pub visited: Vec<NodeId>,
    pub current: NodeId,
}

impl BoardSnapshot {
    /// Capture a graph and the traversal state running on it.
    pub fn capture(graph: &BoardGraph, traversal: &TraversalController) -> Self {
        Self {
            board_id: graph.id(),
            nodes: graph.nodes().iter().map(NodeRecord::from).collect(),
            visited: traversal.visited().iter().copied().collect(),
            current: traversal.current_node(),
        }
    }

    /// Encode as JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| BoardError::CorruptSnapshot(e.to_string()))
    }

    /// Decode from JSON. Malformed input is a corrupt snapshot.
    pub fn from_json(source: &str) -> Result<Self> {
        serde_json::from_str(source).map_err(|e| BoardError::CorruptSnapshot(e.to_string()))
    }

    /// Rebuild the graph and traversal state.
    pub fn restore(&self) -> Result<(Arc<BoardGraph>, TraversalController)> {
        let graph = Arc::new(self.restore_graph()?);

        let visited: BTreeSet<NodeId> = self.visited.iter().copied().collect();
        if let Some(missing) = visited.iter().find(|id| !graph.contains(**id)) {
            return Err(corrupt(format!("visited node {} does not exist", missing)));
        }
        if !graph.contains(self.current) {
            return Err(corrupt(format!("current node {} does not exist", self.current)));
        }
        if !visited.contains(&self.current) {
            return Err(corrupt(format!("current node {} is not visited", self.current)));
        }

        let traversal = TraversalController::resume(Arc::clone(&graph), self.current, visited);
        info!(board = %self.board_id, nodes = graph.node_count(), current = %self.current, "restored board");
        Ok((graph, traversal))
    }

    /// Rebuild only the graph.
    pub fn restore_graph(&self) -> Result<BoardGraph> {
        let mut records: Vec<&NodeRecord> = self.nodes.iter().collect();
        records.sort_by_key(|r| r.id);

        for (index, record) in records.iter().enumerate() {
            if record.id != NodeId(index) {
                return Err(corrupt(format!(
                    "node ids must run 0..{} without gaps, found {} at position {}",
                    records.len(),
                    record.id,
                    index
                )));
            }
            if record.level >= records.len() {
                return Err(corrupt(format!(
                    "node {} sits on level {} of a board with {} nodes",
                    record.id,
                    record.level,
                    records.len()
                )));
            }
            if record.node_type == NodeType::Unassigned {
                return Err(corrupt(format!("node {} has no type", record.id)));
            }
            if let Some(target) = record.outgoing.iter().find(|t| t.index() >= records.len()) {
                return Err(corrupt(format!(
                    "edge {} -> {} points to a missing node",
                    record.id, target
                )));
            }
        }

        let mut graph = BoardGraph::new(self.board_id);
        for record in records {
            let mut node = Node::new(record.id, record.level, record.lateral).with_type(record.node_type);
            node.outgoing = record.outgoing.iter().copied().collect();
            graph.push_node(node);
        }
        graph.rebuild_incoming();

        if graph.level_nodes(0).len() != 1 {
            return Err(corrupt(format!(
                "level 0 must hold exactly one node, found {}",
                graph.level_nodes(0).len()
            )));
        }
        graph
            .check_invariants()
            .map_err(|violation| corrupt(violation.to_string()))?;
        graph.refresh_incoming_path_types();

        Ok(graph)
    }
}

fn corrupt(message: String) -> BoardError {
    BoardError::CorruptSnapshot(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::BoardGenerator;
    use board_rules::BoardConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn generated() -> (Arc<BoardGraph>, TraversalController) {
        let config = BoardConfig::default();
        let generator = BoardGenerator::new(&config).unwrap();
        let (graph, _) = generator
            .generate(BoardId::new(), &mut StdRng::seed_from_u64(17))
            .unwrap();
        let graph = Arc::new(graph);
        let traversal = TraversalController::start(Arc::clone(&graph)).unwrap();
        (graph, traversal)
    }

    #[test]
    fn test_restore_reproduces_graph() {
        let (graph, traversal) = generated();
        let snapshot = BoardSnapshot::capture(&graph, &traversal);

        let (restored, restored_traversal) = snapshot.restore().unwrap();
        assert_eq!(*restored, *graph);
        assert_eq!(restored_traversal.current_node(), traversal.current_node());
        assert_eq!(restored_traversal.visited(), traversal.visited());
    }

    #[test]
    fn test_json_round_trip_after_moves() {
        let (graph, mut traversal) = generated();
        let first = traversal.available_moves()[0];
        traversal.move_to(first).unwrap();

        let json = BoardSnapshot::capture(&graph, &traversal).to_json().unwrap();
        let (restored, restored_traversal) = BoardSnapshot::from_json(&json).unwrap().restore().unwrap();

        assert_eq!(*restored, *graph);
        assert_eq!(restored_traversal.current_node(), first);
        assert_eq!(restored_traversal.available_moves(), traversal.available_moves());
    }

    #[test]
    fn test_missing_edge_target_is_corrupt() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        snapshot.nodes[0].outgoing.push(NodeId(10_000));

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_current_must_be_visited() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        snapshot.current = NodeId(1);

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_unknown_visited_node_is_corrupt() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        snapshot.visited.push(NodeId(999));

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_gap_in_ids_is_corrupt() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        snapshot.nodes.remove(3);

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_unassigned_node_is_corrupt() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        snapshot.nodes[5].node_type = NodeType::Unassigned;

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_out_of_range_level_is_corrupt() {
        let (graph, traversal) = generated();
        let mut snapshot = BoardSnapshot::capture(&graph, &traversal);
        let last = snapshot.nodes.len() - 1;
        snapshot.nodes[last].level = 1usize << 40;

        assert!(matches!(snapshot.restore(), Err(BoardError::CorruptSnapshot(_))));
    }

    #[test]
    fn test_malformed_json_is_corrupt() {
        assert!(matches!(
            BoardSnapshot::from_json("{\"board_id\": 3"),
            Err(BoardError::CorruptSnapshot(_))
        ));
    }
}
