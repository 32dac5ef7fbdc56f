//! # Board Rules
//!
//! The rulebook crate - identifiers, node types, level tags and generator configuration.
//! This crate is the single source of truth for what a board may contain and does not
//! contain any graph algorithms or randomness.

pub mod config;
pub mod ids;
pub mod node_types;

pub use config::*;
pub use ids::*;
pub use node_types::*;
