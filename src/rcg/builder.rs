// Thu Feb 5 2026 - Jo
use crate::cg::types::{CallerEdge, FastIndexMap, Pc};
use crate::rcg::node::{CallerEdgeRef, FunctionNode, NodeIndex};

/// A call-site node's location for diagnostic lookups: which function table
/// entry owns it. Not touched by the hot DFS path; consulted only by
/// `TracePrinter` when it resolves a frame's owning function name.
#[derive(Debug, Clone, Copy)]
pub struct CallSiteLocation {
    pub caller: NodeIndex,
}

/// The caller-navigable reverse call graph: one `FunctionNode` per retained
/// function, each owning a contiguous array of caller edges.
///
/// Must never outlive the `RawCallGraph` it was built from: its edges encode
/// PCs only, but printing a name re-enters the `RawCallGraph`'s symbol table.
pub struct ReverseCallGraph {
    nodes: Vec<FunctionNode>,
    pc_to_index: FastIndexMap<Pc, NodeIndex>,
    call_site_index: FastIndexMap<Pc, CallSiteLocation>,
}

impl ReverseCallGraph {
    /// Flattens the filtered `target -> [CallerEdge]` relation into the dense
    /// node/edge layout searched by the DFS reconstructor. Also populates the
    /// `call_site_owner` secondary index consulted by `TracePrinter`.
    pub fn build(targets_to_callers: &FastIndexMap<Pc, Vec<CallerEdge>>) -> Self {
        let mut pc_to_index: FastIndexMap<Pc, NodeIndex> = FastIndexMap::default();
        for (index, &pc) in targets_to_callers.keys().enumerate() {
            pc_to_index.insert(pc, index);
        }

        let mut nodes: Vec<FunctionNode> = Vec::with_capacity(targets_to_callers.len());
        let mut call_site_index: FastIndexMap<Pc, CallSiteLocation> = FastIndexMap::default();

        for (&entry_pc, edges) in targets_to_callers {
            let self_index = pc_to_index[&entry_pc];
            let callers: Box<[CallerEdgeRef]> = edges
                .iter()
                .map(|edge| CallerEdgeRef {
                    call_site: edge.call_site,
                    // A caller not itself a retained target (e.g. it has no
                    // callers of its own) still needs a node to recurse into;
                    // such callers are present as empty-edge leaves because
                    // the filter resolver inserts a key for every retained
                    // function, caller or not.
                    caller: *pc_to_index
                        .get(&edge.caller)
                        .expect("caller pc missing from targets_to_callers keys"),
                })
                .collect();
            for edge in &edges[..] {
                call_site_index.insert(edge.call_site, CallSiteLocation { caller: self_index });
            }
            nodes.push(FunctionNode { entry_pc, callers });
        }

        Self {
            nodes,
            pc_to_index,
            call_site_index,
        }
    }

    pub fn node_index_of(&self, pc: Pc) -> Option<NodeIndex> {
        self.pc_to_index.get(&pc).copied()
    }

    pub fn node(&self, index: NodeIndex) -> &FunctionNode {
        &self.nodes[index]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn call_site_owner(&self, call_site: Pc) -> Option<NodeIndex> {
        self.call_site_index.get(&call_site).map(|loc| loc.caller)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cg::types::FastIndexMap;

    #[test]
    fn leaf_nodes_allocate_no_edges() {
        let mut targets: FastIndexMap<Pc, Vec<CallerEdge>> = FastIndexMap::default();
        targets.insert(0x100, vec![]);
        let rcg = ReverseCallGraph::build(&targets);
        let idx = rcg.node_index_of(0x100).unwrap();
        assert_eq!(rcg.node(idx).edge_count(), 0);
    }

    #[test]
    fn edges_resolve_to_caller_nodes() {
        let mut targets: FastIndexMap<Pc, Vec<CallerEdge>> = FastIndexMap::default();
        targets.insert(0x200, vec![CallerEdge::new(0x100, 0x110)]);
        targets.insert(0x100, vec![]);
        let rcg = ReverseCallGraph::build(&targets);
        let callee_idx = rcg.node_index_of(0x200).unwrap();
        let caller_idx = rcg.node_index_of(0x100).unwrap();
        let edge = rcg.node(callee_idx).callers[0];
        assert_eq!(edge.call_site, 0x110);
        assert_eq!(edge.caller, caller_idx);
    }
}
