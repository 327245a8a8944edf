//! # Rendering Module
//!
//! Data the renderer needs from a finished room. Drawing itself happens
//! outside this crate.

pub mod autotile;

pub use autotile::*;
