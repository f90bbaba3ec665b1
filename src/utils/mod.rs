//! # Utilities Module
//!
//! Search utilities for pursuit movement and reachability checks.

pub mod pathfinding;

pub use self::pathfinding::*;
