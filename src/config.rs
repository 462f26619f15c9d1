// Thu Feb 5 2026 - Jo
use crate::filter::FilterConfig;
use crate::search::{SearchError, SearchParams};

/// Library-level configuration for one reconstruction run, independent of how
/// it was assembled (CLI, tests, or an embedding application). Validated once
/// at construction, then passed down by reference to every component that
/// needs it.
#[derive(Debug, Clone)]
pub struct ReconstructionConfig {
    pub search: SearchParams,
    pub filter: FilterConfig,
}

impl ReconstructionConfig {
    pub fn new(
        max_depth: usize,
        pruning_depth_1: usize,
        pruning_depth_2: usize,
        filter: FilterConfig,
    ) -> Result<Self, SearchError> {
        let search = SearchParams::validate(max_depth, pruning_depth_1, pruning_depth_2)?;
        Ok(Self { search, filter })
    }

    /// The depth limit traces are clipped to: identical to `max_depth`, since
    /// a single depth argument governs both the trace reader and the DFS
    /// bound.
    pub fn depth_limit(&self) -> usize {
        self.search.max_depth
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_invalid_depths_at_construction() {
        assert!(ReconstructionConfig::new(4, 3, 2, FilterConfig::new()).is_err());
    }

    #[test]
    fn depth_limit_matches_max_depth() {
        let cfg = ReconstructionConfig::new(10, 1, 2, FilterConfig::new()).unwrap();
        assert_eq!(cfg.depth_limit(), 10);
    }
}
