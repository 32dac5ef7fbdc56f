//! # Board Core
//!
//! The engine of the board. This crate builds a leveled, branching and converging
//! node graph from `board_rules` configuration, types every node, and runs the
//! player's walk across it.
//!
//! ## Core Components
//!
//! - **graph**: Arena of nodes indexed by id, grouped into levels
//! - **generation**: Layout, connection and type assignment stages
//! - **traversal**: Forward-only, connected movement with visited tracking
//! - **snapshot**: Serializable board state and the restore path
//! - **events**: Traversal events for rendering collaborators
//!
//! ## Design Philosophy
//!
//! - **Arena, not pointers**: edges and path memos reference nodes by id
//! - **Explicit ownership**: stages are values passed to whoever owns the board; no globals
//! - **Injected randomness**: every stage draws from a caller-provided `Rng`

pub mod board;
pub mod error;
pub mod events;
pub mod generation;
pub mod graph;
pub mod snapshot;
pub mod traversal;

pub use board::*;
pub use error::*;
pub use events::*;
pub use generation::*;
pub use graph::*;
pub use snapshot::*;
pub use traversal::*;
