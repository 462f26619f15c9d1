// Thu Feb 5 2026 - Jo
//! Component D: the caller-navigable reverse call graph used by the search.

pub mod builder;
pub mod node;

pub use builder::{CallSiteLocation, ReverseCallGraph};
pub use node::{CallerEdgeRef, FunctionNode, NodeIndex};
