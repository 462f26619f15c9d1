// Fri Feb 6 2026 - Jo
use thiserror::Error;

/// Fatal argument validation failures.
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("pruning_depth_1 ({depth1}) must be strictly less than pruning_depth_2 ({depth2})")]
    NonIncreasingPruningDepths { depth1: usize, depth2: usize },
    #[error("pruning_depth_2 ({depth2}) must not exceed max_depth ({max_depth})")]
    PruningDepth2ExceedsMaxDepth { depth2: usize, max_depth: usize },
}
