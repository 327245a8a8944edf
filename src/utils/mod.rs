//! # Utilities Module
//!
//! Grid traversal helpers used across generation.

pub mod pathfinding;

pub use pathfinding::*;
