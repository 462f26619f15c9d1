// Wed Feb 4 2026 - Jo
//! Component F: the depth-indexed, three-segment rolling hash.

pub mod engine;

pub use engine::{hash_step, hash_trace, PruningDepths};
