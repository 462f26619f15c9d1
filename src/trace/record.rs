// Thu Feb 5 2026 - Jo
use crate::cg::types::Pc;

/// One (entry-name, hash, partial-trace) tuple recovered from sampler output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceRecord {
    pub entry_name: String,
    pub hash: u64,
    pub partial_trace: Vec<Pc>,
}

/// Counters accumulated while reading a trace file, surfaced as warnings.
#[derive(Debug, Clone, Copy, Default)]
pub struct ReadStats {
    pub dropped: usize,
    pub clipped: usize,
    pub duplicate_hashes: usize,
}
