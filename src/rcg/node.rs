// Thu Feb 5 2026 - Jo
use crate::cg::types::Pc;

/// Dense index into `ReverseCallGraph::nodes`. Using an index rather than a raw
/// pointer or `Rc` sidesteps the ownership-cycle concern entirely: the call
/// graph is cyclic at the PC level, but the RCG only ever holds handles into
/// one flat table.
pub type NodeIndex = usize;

/// One caller edge stored on the callee's `FunctionNode`: the call-site PC and
/// a handle to the `FunctionNode` that owns it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerEdgeRef {
    pub call_site: Pc,
    pub caller: NodeIndex,
}

/// One retained function, addressed by its entry PC, with its caller list as a
/// single contiguous allocation, owning its edges outright. A leaf function
/// (no callers) carries an empty boxed slice, which allocates nothing.
pub struct FunctionNode {
    pub entry_pc: Pc,
    pub callers: Box<[CallerEdgeRef]>,
}

impl FunctionNode {
    pub fn edge_count(&self) -> usize {
        self.callers.len()
    }
}
