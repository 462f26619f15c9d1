// Mon Feb 2 2026 - Jo
use ahash::RandomState;
use indexmap::{IndexMap, IndexSet};

/// A program counter: the address of an instruction in the loaded code image.
pub type Pc = u64;

/// Opaque tag partitioning indirect call sites and targets into compatibility classes.
pub type TypeId = u64;

/// Insertion-ordered map keyed by a fast, non-cryptographic hasher.
///
/// File order matters throughout this codebase (filter-resolution tie-breaks,
/// stable diagnostic ordering), so every multimap derived from the input dump
/// preserves it rather than reaching for a plain `HashMap`.
pub type FastIndexMap<K, V> = IndexMap<K, V, RandomState>;
pub type FastIndexSet<K> = IndexSet<K, RandomState>;

/// A statically possible call into a target: the owning caller and the call-site PC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallerEdge {
    pub caller: Pc,
    pub call_site: Pc,
}

impl CallerEdge {
    pub fn new(caller: Pc, call_site: Pc) -> Self {
        Self { caller, call_site }
    }
}
