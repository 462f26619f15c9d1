// Wed Feb 4 2026 - Jo
use crate::cg::types::Pc;

/// Depths at which the rolling hash freezes 16 bits of state into the
/// persistent "checkpoint" bits that the DFS reconstructor prunes against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PruningDepths {
    pub depth1: usize,
    pub depth2: usize,
}

impl PruningDepths {
    pub fn new(depth1: usize, depth2: usize) -> Self {
        Self { depth1, depth2 }
    }
}

/// `C = CRC32(H, PC)`: the hardware CRC32 primitive, realised with the CRC-32
/// (IEEE) implementation from `crc32fast`, seeded with the low 32 bits of `H`
/// and fed the 8 little-endian bytes of `PC`. This mirrors the `crc32`
/// instruction's own accumulator width (32-bit state, 64-bit data word,
/// zero-extended result) without needing runtime target-feature detection.
/// The polynomial is fixed and opaque to every caller, and it must never
/// change once traces have been recorded against it.
fn crc32_combine(state: u64, pc: Pc) -> u64 {
    let mut hasher = crc32fast::Hasher::new_with_initial(state as u32);
    hasher.update(&pc.to_le_bytes());
    hasher.finalize() as u64
}

/// One fold step of the rolling hash: combines the call-site PC at depth
/// `depth` into the running hash `hash`, publishing a checkpoint into the
/// high bits of the result when `depth` lands on a pruning depth.
pub fn hash_step(hash: u64, pc: Pc, depth: usize, depths: PruningDepths) -> u64 {
    let c = crc32_combine(hash, pc);
    if depth == depths.depth1 {
        c | (hash << 48)
    } else if depth == depths.depth2 {
        c | ((hash >> 48) << 48) | ((hash & 0xFFFF) << 32)
    } else {
        c | ((hash >> 32) << 32)
    }
}

/// Folds `hash_step` over an entire trace, innermost-first, starting from `0`.
pub fn hash_trace(trace: &[Pc], depths: PruningDepths) -> u64 {
    trace
        .iter()
        .enumerate()
        .fold(0u64, |hash, (depth, &pc)| hash_step(hash, pc, depth, depths))
}
