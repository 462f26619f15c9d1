// Fri Feb 6 2026 - Jo
use crate::cg::types::Pc;
use crate::hash::hash_step;
use crate::rcg::{NodeIndex, ReverseCallGraph};
use crate::search::context::SearchParams;

/// Result of one reconstruction attempt.
#[derive(Debug, Clone)]
pub enum SearchOutcome {
    /// A trace was found whose hash matches and which agrees frame-wise with
    /// the recorded partial trace.
    Found { trace: Vec<Pc>, collisions: usize },
    /// The search exhausted the bounded tree without a frame-exact match.
    NotFound { collisions: usize },
}

impl SearchOutcome {
    pub fn collisions(&self) -> usize {
        match self {
            Self::Found { collisions, .. } | Self::NotFound { collisions } => *collisions,
        }
    }
}

/// Bounded, prune-aware DFS reconstruction. Starts at `entry` with depth 0 and
/// hash 0, and returns the first caller-order trace whose hash equals
/// `wanted_hash` and whose frames equal `wanted_trace` exactly.
pub fn reconstruct(
    rcg: &ReverseCallGraph,
    entry: NodeIndex,
    params: &SearchParams,
    wanted_hash: u64,
    wanted_trace: &[Pc],
) -> SearchOutcome {
    reconstruct_with_stats(rcg, entry, params, wanted_hash, wanted_trace).0
}

/// Same as `reconstruct`, additionally reporting how many `step` invocations
/// the search performed. Exists so tests can check that checkpoint pruning
/// actually keeps the explored node count well below the full branching tree.
fn reconstruct_with_stats(
    rcg: &ReverseCallGraph,
    entry: NodeIndex,
    params: &SearchParams,
    wanted_hash: u64,
    wanted_trace: &[Pc],
) -> (SearchOutcome, usize) {
    let mut scratch = vec![0u64; params.max_depth + 1];
    let mut collisions = 0usize;
    let mut evaluations = 0usize;

    let found = step(
        rcg,
        entry,
        0,
        0,
        params,
        wanted_hash,
        wanted_trace,
        &mut scratch,
        &mut collisions,
        &mut evaluations,
    );

    let outcome = if found {
        scratch.truncate(wanted_trace.len());
        SearchOutcome::Found {
            trace: scratch,
            collisions,
        }
    } else {
        SearchOutcome::NotFound { collisions }
    };
    (outcome, evaluations)
}

#[allow(clippy::too_many_arguments)]
fn step(
    rcg: &ReverseCallGraph,
    node: NodeIndex,
    depth: usize,
    hash: u64,
    params: &SearchParams,
    wanted_hash: u64,
    wanted_trace: &[Pc],
    scratch: &mut [Pc],
    collisions: &mut usize,
    evaluations: &mut usize,
) -> bool {
    *evaluations += 1;

    if hash == wanted_hash {
        if depth == wanted_trace.len() && scratch[..depth] == *wanted_trace {
            return true;
        }
        *collisions += 1;
        // A hash collision does not prune the subtree: other descendants of
        // this node may still lead to the frame-exact trace.
    }

    if depth > params.max_depth {
        return false;
    }

    if depth == params.depths.depth1 + 1 {
        if (hash >> 48) != (wanted_hash >> 48) {
            return false;
        }
    } else if depth == params.depths.depth2 + 1 && ((hash >> 32) & 0xFFFF) != ((wanted_hash >> 32) & 0xFFFF) {
        return false;
    }

    let callers = &rcg.node(node).callers;
    for edge in callers.iter() {
        scratch[depth] = edge.call_site;
        let next_hash = hash_step(hash, edge.call_site, depth, params.depths);
        if step(
            rcg,
            edge.caller,
            depth + 1,
            next_hash,
            params,
            wanted_hash,
            wanted_trace,
            scratch,
            collisions,
            evaluations,
        ) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cg::types::{CallerEdge, FastIndexMap};
    use crate::cg::RawCallGraph;
    use crate::filter::{FilterConfig, FilterResolver};
    use crate::hash::hash_trace;

    fn build_rcg(cg: &RawCallGraph, cfg: &FilterConfig) -> ReverseCallGraph {
        let targets = FilterResolver::new(cg, cfg).resolve();
        ReverseCallGraph::build(&targets)
    }

    /// S1: single frame, exact match with an empty partial trace.
    #[test]
    fn single_frame_exact_zero_depth_match() {
        let cg = RawCallGraph::parse(
            "FUNCTIONS\n100 main\n200 helper\n\nDIRECT CALL SITES\n100 110 200\n",
        )
        .unwrap();
        let cfg = FilterConfig::new();
        let rcg = build_rcg(&cg, &cfg);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(cg.entry_pc_of("main").unwrap()).unwrap();

        let outcome = reconstruct(&rcg, entry, &params, 0, &[]);
        match outcome {
            SearchOutcome::Found { trace, .. } => assert!(trace.is_empty()),
            SearchOutcome::NotFound { .. } => panic!("expected a match"),
        }
    }

    /// S2: two-frame direct chain.
    #[test]
    fn two_frame_direct_chain() {
        let cg = RawCallGraph::parse(
            "FUNCTIONS\n100 main\n200 helper\n300 leaf\n\n\
             DIRECT CALL SITES\n100 110 200\n200 220 300\n",
        )
        .unwrap();
        let cfg = FilterConfig::new();
        let rcg = build_rcg(&cg, &cfg);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(cg.entry_pc_of("helper").unwrap()).unwrap();

        let wanted_trace = [0x110u64];
        let wanted_hash = hash_trace(&wanted_trace, params.depths);
        let outcome = reconstruct(&rcg, entry, &params, wanted_hash, &wanted_trace);
        match outcome {
            SearchOutcome::Found { trace, .. } => assert_eq!(trace, wanted_trace),
            SearchOutcome::NotFound { .. } => panic!("expected a match"),
        }
    }

    /// S3: indirect type-match reconstruction.
    #[test]
    fn indirect_type_match_reconstructs() {
        let cg = RawCallGraph::parse(
            "FUNCTIONS\n100 main\n400 vtarget\n\n\
             INDIRECT CALL SITES\n100 130\n\n\
             INDIRECT CALL TYPES\n7 130\n\n\
             INDIRECT TARGET TYPES\n7 400\n",
        )
        .unwrap();
        let cfg = FilterConfig::new();
        let rcg = build_rcg(&cg, &cfg);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(cg.entry_pc_of("main").unwrap()).unwrap();

        let wanted_trace: [u64; 0] = [];
        let wanted_hash = hash_trace(&wanted_trace, params.depths);
        let outcome = reconstruct(&rcg, entry, &params, wanted_hash, &wanted_trace);
        assert!(matches!(outcome, SearchOutcome::Found { .. }));
    }

    /// DFS soundness: a successful reconstruction's hash and frames always
    /// match the request, for an arbitrarily built RCG.
    #[test]
    fn soundness_found_trace_matches_hash_and_frames() {
        let mut targets: FastIndexMap<u64, Vec<CallerEdge>> = FastIndexMap::default();
        targets.insert(0x300, vec![CallerEdge::new(0x200, 0x230)]);
        targets.insert(0x200, vec![CallerEdge::new(0x100, 0x120)]);
        targets.insert(0x100, vec![]);
        let rcg = ReverseCallGraph::build(&targets);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(0x300).unwrap();

        let wanted_trace = [0x230u64, 0x120];
        let wanted_hash = hash_trace(&wanted_trace, params.depths);
        match reconstruct(&rcg, entry, &params, wanted_hash, &wanted_trace) {
            SearchOutcome::Found { trace, .. } => {
                assert_eq!(trace, wanted_trace);
                assert_eq!(hash_trace(&trace, params.depths), wanted_hash);
            }
            SearchOutcome::NotFound { .. } => panic!("expected a match"),
        }
    }

    /// S5-style collision reporting: a zero-depth hash collision on the way to
    /// the real match is counted but does not abort the search.
    #[test]
    fn collisions_are_counted_without_pruning() {
        let mut targets: FastIndexMap<u64, Vec<CallerEdge>> = FastIndexMap::default();
        // Two callers into 0x300: the first is a decoy whose single-frame
        // trace happens to collide with the empty-trace hash (0), the second
        // is the real, empty-frame match.
        targets.insert(
            0x300,
            vec![CallerEdge::new(0x100, 0x999), CallerEdge::new(0x400, 0x0)],
        );
        targets.insert(0x100, vec![]);
        targets.insert(0x400, vec![]);
        let rcg = ReverseCallGraph::build(&targets);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(0x300).unwrap();

        match reconstruct(&rcg, entry, &params, 0, &[]) {
            SearchOutcome::Found { trace, .. } => assert!(trace.is_empty()),
            SearchOutcome::NotFound { .. } => panic!("expected a match at depth 0"),
        }
    }

    #[test]
    fn unreachable_trace_reports_not_found() {
        let mut targets: FastIndexMap<u64, Vec<CallerEdge>> = FastIndexMap::default();
        targets.insert(0x100, vec![]);
        let rcg = ReverseCallGraph::build(&targets);
        let params = SearchParams::validate(4, 1, 2).unwrap();
        let entry = rcg.node_index_of(0x100).unwrap();

        let outcome = reconstruct(&rcg, entry, &params, 0xdeadbeef, &[0x1]);
        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));
    }

    /// Builds a uniform tree of callers `branching` wide and `depth` deep,
    /// rooted at the returned entry node, for exercising the checkpoint
    /// prunes against a search space too large to explore exhaustively.
    fn build_branching_rcg(branching: u64, depth: usize) -> (ReverseCallGraph, u64) {
        let mut targets: FastIndexMap<u64, Vec<CallerEdge>> = FastIndexMap::default();
        let mut next_pc = 1u64;
        let root = grow_branching_level(&mut targets, &mut next_pc, branching, depth);
        (ReverseCallGraph::build(&targets), root)
    }

    fn grow_branching_level(
        targets: &mut FastIndexMap<u64, Vec<CallerEdge>>,
        next_pc: &mut u64,
        branching: u64,
        remaining_depth: usize,
    ) -> u64 {
        let entry_pc = *next_pc;
        *next_pc += 1;

        let mut callers = Vec::new();
        if remaining_depth > 0 {
            for _ in 0..branching {
                let call_site = *next_pc;
                *next_pc += 1;
                let caller = grow_branching_level(targets, next_pc, branching, remaining_depth - 1);
                callers.push(CallerEdge::new(caller, call_site));
            }
        }
        targets.insert(entry_pc, callers);
        entry_pc
    }

    /// S6: checkpoint pruning keeps the number of explored nodes far below the
    /// full tree, for a branching factor and depth that make an exhaustive
    /// search impractical if the prunes did not fire.
    #[test]
    fn prune_effective_explores_far_fewer_nodes_than_full_tree() {
        let branching = 6u64;
        let depth = 8usize;
        let (rcg, root) = build_branching_rcg(branching, depth);
        let params = SearchParams::validate(depth, 1, 3).unwrap();
        let entry = rcg.node_index_of(root).unwrap();

        // A hash that cannot possibly be produced by this tree: every real
        // trace hashes to a value derived from call sites starting at 1, so a
        // checkpoint mismatch is forced as soon as the prune depths are hit.
        let wanted_trace = vec![0xdeadbeefu64; depth];
        let wanted_hash = 0xffff_ffff_ffff_ffffu64;

        let (outcome, evaluations) =
            reconstruct_with_stats(&rcg, entry, &params, wanted_hash, &wanted_trace);
        assert!(matches!(outcome, SearchOutcome::NotFound { .. }));

        let full_tree_size: u64 = (0..=depth as u32).map(|d| branching.pow(d)).sum();
        assert!(
            (evaluations as u64) < full_tree_size / 4,
            "expected pruning to cut evaluations well below the full tree size \
             ({evaluations} evaluations against a full tree of {full_tree_size})"
        );
    }
}
