//! Board graph - an arena of nodes indexed by [`NodeId`], grouped into levels.
//!
//! Edges always reference nodes by id, never by pointer. The generation stages are
//! the only code allowed to mutate a graph; once handed out it is frozen.

mod node;

pub use node::*;

use board_rules::{BoardId, NodeId, NodeType};
use std::collections::BTreeSet;

/// A structural invariant a finished board violates.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum GraphViolation {
    #[error("level {0} has no nodes")]
    EmptyLevel(usize),

    #[error("node {0} on level {1} has no incoming edge")]
    Orphan(NodeId, usize),

    #[error("node {0} on level {1} has no outgoing edge")]
    DeadEnd(NodeId, usize),

    #[error("edge {from} -> {to} does not lead to the next level")]
    LevelSkip { from: NodeId, to: NodeId },

    #[error("node {0} has no type")]
    Unassigned(NodeId),
}

/// The board: nodes in one owned vector, plus per-level membership and a reverse edge index.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardGraph {
    id: BoardId,

    /// All nodes; `nodes[i].id == NodeId(i)`.
    nodes: Vec<Node>,

    /// Index: level -> nodes on it, in ascending lateral order.
    levels: Vec<Vec<NodeId>>,

    /// Reverse index: node -> nodes with an edge into it.
    incoming: Vec<BTreeSet<NodeId>>,
}

impl BoardGraph {
    /// Create an empty graph.
    pub fn new(id: BoardId) -> Self {
        Self {
            id,
            nodes: Vec::new(),
            levels: Vec::new(),
            incoming: Vec::new(),
        }
    }

    /// Identifier of the board this graph belongs to.
    pub fn id(&self) -> BoardId {
        self.id
    }

    /// Append a level with one node per lateral coordinate. Returns the new level index.
    pub(crate) fn push_level(&mut self, laterals: &[f64]) -> usize {
        let level = self.levels.len();
        let mut ids = Vec::with_capacity(laterals.len());
        for lateral in laterals {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node::new(id, level, *lateral));
            self.incoming.push(BTreeSet::new());
            ids.push(id);
        }
        self.levels.push(ids);
        level
    }

    /// Insert an already built node. Ids must arrive dense and in order; call
    /// [`rebuild_incoming`](Self::rebuild_incoming) once every node is in.
    pub(crate) fn push_node(&mut self, node: Node) {
        while self.levels.len() <= node.level {
            self.levels.push(Vec::new());
        }
        self.levels[node.level].push(node.id);
        self.nodes.push(node);
        self.incoming.push(BTreeSet::new());
    }

    /// Rebuild the reverse edge index from every node's outgoing set.
    pub(crate) fn rebuild_incoming(&mut self) {
        for set in &mut self.incoming {
            set.clear();
        }
        for node in &self.nodes {
            for target in &node.outgoing {
                if let Some(set) = self.incoming.get_mut(target.index()) {
                    set.insert(node.id);
                }
            }
        }
    }

    /// Add a directed edge. Returns false if it already existed.
    pub(crate) fn add_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        let inserted = self.nodes[from.index()].outgoing.insert(to);
        self.incoming[to.index()].insert(from);
        inserted
    }

    /// Overwrite the type of a node.
    pub(crate) fn set_type(&mut self, id: NodeId, node_type: NodeType) {
        self.nodes[id.index()].node_type = node_type;
    }

    /// Store the path memo of a node.
    pub(crate) fn set_incoming_path_types(&mut self, id: NodeId, types: BTreeSet<NodeType>) {
        self.nodes[id.index()].types_on_incoming_paths = types;
    }

    /// Union of `{p.type} ∪ p.types_on_incoming_paths` over every predecessor `p`.
    pub fn incoming_path_types(&self, id: NodeId) -> BTreeSet<NodeType> {
        let mut types = BTreeSet::new();
        for predecessor in self.predecessors(id) {
            let node = &self.nodes[predecessor.index()];
            types.insert(node.node_type);
            types.extend(node.types_on_incoming_paths.iter().copied());
        }
        types
    }

    /// Recompute every node's path memo from the current types, level by level.
    pub(crate) fn refresh_incoming_path_types(&mut self) {
        for level in 0..self.levels.len() {
            for index in 0..self.levels[level].len() {
                let id = self.levels[level][index];
                let types = self.incoming_path_types(id);
                self.set_incoming_path_types(id, types);
            }
        }
    }

    /// Get node by ID.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Check if a node exists.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// All nodes, in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Total number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Per-level node ids.
    pub fn levels(&self) -> &[Vec<NodeId>] {
        &self.levels
    }

    /// Number of levels.
    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    /// Nodes on one level, empty if the level does not exist.
    pub fn level_nodes(&self, level: usize) -> &[NodeId] {
        self.levels.get(level).map(|v| v.as_slice()).unwrap_or(&[])
    }

    /// The node a player spawns on.
    pub fn start_node(&self) -> Option<NodeId> {
        self.level_nodes(0).first().copied()
    }

    /// Nodes with an edge into `id`.
    pub fn predecessors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.incoming
            .get(id.index())
            .into_iter()
            .flat_map(|set| set.iter().copied())
    }

    /// Nodes `id` has an edge to.
    pub fn successors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id)
            .into_iter()
            .flat_map(|node| node.outgoing.iter().copied())
    }

    /// Number of incoming edges of a node.
    pub fn in_degree(&self, id: NodeId) -> usize {
        self.incoming.get(id.index()).map(|set| set.len()).unwrap_or(0)
    }

    /// Number of nodes holding a type.
    pub fn count_of(&self, node_type: NodeType) -> usize {
        self.nodes.iter().filter(|n| n.node_type == node_type).count()
    }

    /// Ids of the nodes holding a type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> Vec<NodeId> {
        self.nodes
            .iter()
            .filter(|n| n.node_type == node_type)
            .map(|n| n.id)
            .collect()
    }

    /// Find the first violated structural invariant.
    pub fn check_invariants(&self) -> Result<(), GraphViolation> {
        let last = self.levels.len().saturating_sub(1);

        for (level, ids) in self.levels.iter().enumerate() {
            if ids.is_empty() {
                return Err(GraphViolation::EmptyLevel(level));
            }
            for id in ids {
                let node = &self.nodes[id.index()];
                if node.is_unassigned() {
                    return Err(GraphViolation::Unassigned(*id));
                }
                if level > 0 && self.in_degree(*id) == 0 {
                    return Err(GraphViolation::Orphan(*id, level));
                }
                if level < last && node.outgoing.is_empty() {
                    return Err(GraphViolation::DeadEnd(*id, level));
                }
                for target in &node.outgoing {
                    let leads_to_next = self
                        .node(*target)
                        .map(|t| t.level == level + 1)
                        .unwrap_or(false);
                    if !leads_to_next {
                        return Err(GraphViolation::LevelSkip {
                            from: *id,
                            to: *target,
                        });
                    }
                }
            }
        }

        Ok(())
    }
}
