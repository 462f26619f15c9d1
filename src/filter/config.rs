// Tue Feb 3 2026 - Jo
use crate::cg::types::{FastIndexSet, Pc};
use bitflags::bitflags;
use once_cell::sync::Lazy;

bitflags! {
    /// The three boolean `Exclude*` toggles, bundled into one closed set of
    /// flags rather than three independent struct fields.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FilterFlags: u8 {
        /// Treat every UNKNOWN-target function as excluded.
        const EXCLUDE_UNKNOWN_INDIR_TARGETS = 0b001;
        /// Suppress edges into UNKNOWN-target functions from known-type call sites.
        const EXCLUDE_INDIR_CALLS_TO_UNKNOWN_TARGETS = 0b010;
        /// Suppress edges originating at UNKNOWN-typed indirect call sites.
        const EXCLUDE_UNKNOWN_INDIR_CALLS = 0b100;
    }
}

/// The filter-resolution input.
#[derive(Debug, Clone)]
pub struct FilterConfig {
    pub include_calls_to_functions_with_name: FastIndexSet<String>,
    pub exclude_funcs: FastIndexSet<Pc>,
    pub exclude_funcs_with_keyword_in_name: Vec<String>,
    pub flags: FilterFlags,
}

impl FilterConfig {
    pub fn new() -> Self {
        Self {
            include_calls_to_functions_with_name: FastIndexSet::default(),
            exclude_funcs: FastIndexSet::default(),
            exclude_funcs_with_keyword_in_name: Vec::new(),
            flags: FilterFlags::empty(),
        }
    }

    pub fn exclude_unknown_indir_targets(&self) -> bool {
        self.flags.contains(FilterFlags::EXCLUDE_UNKNOWN_INDIR_TARGETS)
    }

    pub fn exclude_indir_calls_to_unknown_targets(&self) -> bool {
        self.flags.contains(FilterFlags::EXCLUDE_INDIR_CALLS_TO_UNKNOWN_TARGETS)
    }

    pub fn exclude_unknown_indir_calls(&self) -> bool {
        self.flags.contains(FilterFlags::EXCLUDE_UNKNOWN_INDIR_CALLS)
    }
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// The default filter policy, preserved for compatibility: always include the
/// allocator family by name, drop sanitizer scaffolding by keyword, and
/// exclude every unknown-typed indirect edge.
pub static DEFAULT_FILTER: Lazy<FilterConfig> = Lazy::new(|| {
    let mut cfg = FilterConfig::new();
    for name in [
        "malloc",
        "calloc",
        "realloc",
        "free",
        "_Znwm",
        "_Znam",
        "_ZdlPv",
        "_ZdaPv",
        "_ZnwmRKSt9nothrow_t",
    ] {
        cfg.include_calls_to_functions_with_name.insert(name.to_string());
    }
    for keyword in ["asan", "interceptor", "@plt", "sanitizer", "__clang_call_terminate"] {
        cfg.exclude_funcs_with_keyword_in_name.push(keyword.to_string());
    }
    cfg.flags = FilterFlags::EXCLUDE_UNKNOWN_INDIR_TARGETS
        | FilterFlags::EXCLUDE_INDIR_CALLS_TO_UNKNOWN_TARGETS
        | FilterFlags::EXCLUDE_UNKNOWN_INDIR_CALLS;
    cfg
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_includes_allocator_family() {
        assert!(DEFAULT_FILTER
            .include_calls_to_functions_with_name
            .contains("malloc"));
        assert!(DEFAULT_FILTER.exclude_unknown_indir_targets());
    }
}
