// Tue Feb 3 2026 - Jo
use crate::cg::types::{CallerEdge, FastIndexMap, FastIndexSet, Pc, TypeId};
use crate::cg::RawCallGraph;
use crate::filter::config::FilterConfig;

/// Computes the filtered `target-pc -> [CallerEdge]` relation.
///
/// The resolver never fails: a filter that strips every caller of some entry
/// function just makes reconstruction from that entry impossible later, and
/// that surfaces as a DFS miss, not a resolver error.
pub struct FilterResolver<'cg> {
    cg: &'cg RawCallGraph,
    config: &'cg FilterConfig,
    effective_exclude_funcs: FastIndexSet<Pc>,
}

impl<'cg> FilterResolver<'cg> {
    pub fn new(cg: &'cg RawCallGraph, config: &'cg FilterConfig) -> Self {
        // Keyword exclusion only ever reaches named functions.
        let mut effective_exclude_funcs = config.exclude_funcs.clone();
        if !config.exclude_funcs_with_keyword_in_name.is_empty() {
            for (&pc, name) in &cg.func_addr_to_name {
                if config
                    .exclude_funcs_with_keyword_in_name
                    .iter()
                    .any(|kw| name.contains(kw.as_str()))
                {
                    effective_exclude_funcs.insert(pc);
                }
            }
        }
        Self {
            cg,
            config,
            effective_exclude_funcs,
        }
    }

    fn should_exclude_func(&self, pc: Pc) -> bool {
        if let Some(name) = self.cg.func_addr_to_name.get(&pc) {
            if self.config.include_calls_to_functions_with_name.contains(name.as_str()) {
                return false;
            }
        }
        if self.effective_exclude_funcs.contains(&pc) {
            return true;
        }
        if self.config.exclude_unknown_indir_targets()
            && self.cg.indir_target_unknown_type.contains(&pc)
        {
            return true;
        }
        false
    }

    /// Runs the resolution pass, returning the filtered `TargetsToCallers` map.
    pub fn resolve(&self) -> FastIndexMap<Pc, Vec<CallerEdge>> {
        let unknown_type_call_sites: Vec<CallerEdge> = if self.config.exclude_unknown_indir_calls() {
            Vec::new()
        } else {
            self.cg
                .indir_call_unknown_type
                .iter()
                .filter_map(|&call_site| {
                    let caller = self.cg.caller_of(call_site)?;
                    (!self.should_exclude_func(caller))
                        .then(|| CallerEdge::new(caller, call_site))
                })
                .collect()
        };

        let mut type_id_to_call_sites: FastIndexMap<TypeId, Vec<CallerEdge>> = FastIndexMap::default();
        for (&type_id, call_sites) in &self.cg.type_id_to_indir_calls {
            let edges: Vec<CallerEdge> = call_sites
                .iter()
                .filter_map(|&call_site| {
                    let caller = self.cg.caller_of(call_site)?;
                    (!self.should_exclude_func(caller))
                        .then(|| CallerEdge::new(caller, call_site))
                })
                .collect();
            if !edges.is_empty() {
                type_id_to_call_sites.insert(type_id, edges);
            }
        }

        let mut targets_to_callers: FastIndexMap<Pc, Vec<CallerEdge>> = FastIndexMap::default();

        for &func_pc in self.cg.func_addr_to_name.keys() {
            if self.should_exclude_func(func_pc) {
                continue;
            }
            let callers = targets_to_callers.entry(func_pc).or_default();

            let type_id = self.cg.indir_target_to_type_id.get(&func_pc).copied();
            let is_unknown_target = self.cg.indir_target_unknown_type.contains(&func_pc);
            let is_indir_target = type_id.is_some() || is_unknown_target;

            if is_indir_target {
                // (1) UNKNOWN-typed call site -> any indirect target.
                callers.extend(unknown_type_call_sites.iter().copied());

                match type_id {
                    // (2) known-typed target <- matching-typed call sites.
                    Some(type_id) => {
                        if let Some(edges) = type_id_to_call_sites.get(&type_id) {
                            callers.extend(edges.iter().copied());
                        }
                    }
                    // (3) UNKNOWN-typed target <- any known-typed call site.
                    None if !self.config.exclude_indir_calls_to_unknown_targets() => {
                        for edges in type_id_to_call_sites.values() {
                            callers.extend(edges.iter().copied());
                        }
                    }
                    None => {}
                }
            }
        }

        // (4) Direct edges.
        for (&caller, pairs) in &self.cg.func_addr_to_dir_call_sites {
            if self.should_exclude_func(caller) {
                continue;
            }
            for &(call_site, target) in pairs {
                if self.should_exclude_func(call_site) || self.should_exclude_func(target) {
                    continue;
                }
                targets_to_callers
                    .entry(target)
                    .or_default()
                    .push(CallerEdge::new(caller, call_site));
            }
        }

        targets_to_callers
    }
}
