// Mon Feb 2 2026 - Jo
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use memmap2::Mmap;

use crate::cg::error::CgError;
use crate::cg::tokenizer::{self, Sections, TargetTypeRecord};
use crate::cg::types::{FastIndexMap, FastIndexSet, Pc, TypeId};

/// The raw, unfiltered call graph recovered from the disassembler dump.
///
/// Built once at load time and never mutated afterwards, except for the
/// single filter-resolution pass that populates `targets_to_callers`.
pub struct RawCallGraph {
    pub type_id_to_indir_targets: FastIndexMap<TypeId, Vec<Pc>>,
    pub indir_target_to_type_id: FastIndexMap<Pc, TypeId>,
    pub indir_target_unknown_type: FastIndexSet<Pc>,
    pub targets_with_no_info: FastIndexSet<Pc>,

    pub type_id_to_indir_calls: FastIndexMap<TypeId, Vec<Pc>>,
    pub indir_call_to_type_id: FastIndexMap<Pc, TypeId>,
    pub indir_call_unknown_type: FastIndexSet<Pc>,

    pub func_addr_to_indir_call_sites: FastIndexMap<Pc, Vec<Pc>>,
    pub func_addr_to_dir_call_sites: FastIndexMap<Pc, Vec<(Pc, Pc)>>,

    pub dir_call_site_addrs: FastIndexSet<Pc>,
    pub indir_call_site_addrs: FastIndexSet<Pc>,

    pub func_addr_to_name: FastIndexMap<Pc, String>,
    pub func_name_to_addr: FastIndexMap<String, Pc>,
    pub call_site_to_caller: FastIndexMap<Pc, Pc>,
}

impl RawCallGraph {
    /// Parses `text` (the full contents of a call-graph dump) into a
    /// `RawCallGraph`, computing every derived index in one post-parse pass.
    pub fn parse(text: &str) -> Result<Self, CgError> {
        let sections = tokenizer::tokenize(text)?;
        Ok(Self::from_sections(sections))
    }

    /// Memory-maps `path` and parses it directly out of the mapping, without
    /// first copying the whole file into a heap-allocated `String`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CgError> {
        let file = File::open(path)?;
        let mmap = unsafe { Mmap::map(&file) }?;
        let text = std::str::from_utf8(&mmap)
            .map_err(|e| CgError::Io(std::io::Error::new(ErrorKind::InvalidData, e)))?;
        Self::parse(text)
    }

    fn from_sections(sections: Sections) -> Self {
        let mut type_id_to_indir_targets: FastIndexMap<TypeId, Vec<Pc>> = FastIndexMap::default();
        let mut indir_target_to_type_id: FastIndexMap<Pc, TypeId> = FastIndexMap::default();
        let mut indir_target_unknown_type: FastIndexSet<Pc> = FastIndexSet::default();
        for record in sections.indirect_target_types {
            match record {
                TargetTypeRecord::Unknown(pcs) => indir_target_unknown_type.extend(pcs),
                TargetTypeRecord::Typed(type_id, pcs) => {
                    for &pc in &pcs {
                        indir_target_to_type_id.insert(pc, type_id);
                    }
                    type_id_to_indir_targets.entry(type_id).or_default().extend(pcs);
                }
            }
        }

        let mut type_id_to_indir_calls: FastIndexMap<TypeId, Vec<Pc>> = FastIndexMap::default();
        let mut indir_call_to_type_id: FastIndexMap<Pc, TypeId> = FastIndexMap::default();
        for (type_id, call_sites) in sections.indirect_call_types {
            for &pc in &call_sites {
                indir_call_to_type_id.insert(pc, type_id);
            }
            type_id_to_indir_calls.entry(type_id).or_default().extend(call_sites);
        }

        let mut indir_call_site_addrs: FastIndexSet<Pc> = FastIndexSet::default();
        let mut func_addr_to_indir_call_sites: FastIndexMap<Pc, Vec<Pc>> = FastIndexMap::default();
        for (caller, call_sites) in sections.indirect_call_sites {
            indir_call_site_addrs.extend(call_sites.iter().copied());
            func_addr_to_indir_call_sites.insert(caller, call_sites);
        }

        let mut dir_call_site_addrs: FastIndexSet<Pc> = FastIndexSet::default();
        let mut func_addr_to_dir_call_sites: FastIndexMap<Pc, Vec<(Pc, Pc)>> = FastIndexMap::default();
        for (caller, pairs) in sections.direct_call_sites {
            dir_call_site_addrs.extend(pairs.iter().map(|(site, _)| *site));
            func_addr_to_dir_call_sites.insert(caller, pairs);
        }

        let mut func_addr_to_name: FastIndexMap<Pc, String> = FastIndexMap::default();
        for (pc, name) in sections.functions {
            func_addr_to_name.insert(pc, name);
        }

        // name -> pc: duplicate names, last wins.
        let mut func_name_to_addr: FastIndexMap<String, Pc> = FastIndexMap::default();
        for (&pc, name) in &func_addr_to_name {
            func_name_to_addr.insert(name.clone(), pc);
        }

        // Functions present in the symbol map but with no indirect-target info at all.
        let mut targets_with_no_info: FastIndexSet<Pc> = FastIndexSet::default();
        for &pc in func_addr_to_name.keys() {
            if !indir_target_to_type_id.contains_key(&pc) && !indir_target_unknown_type.contains(&pc) {
                targets_with_no_info.insert(pc);
            }
        }

        // Indirect call sites without a known type-id.
        let mut indir_call_unknown_type: FastIndexSet<Pc> = FastIndexSet::default();
        for &pc in &indir_call_site_addrs {
            if !indir_call_to_type_id.contains_key(&pc) {
                indir_call_unknown_type.insert(pc);
            }
        }

        // call-site -> owning caller, unioning direct and indirect call sites.
        let mut call_site_to_caller: FastIndexMap<Pc, Pc> = FastIndexMap::default();
        for (&caller, pairs) in &func_addr_to_dir_call_sites {
            for &(call_site, _target) in pairs {
                call_site_to_caller.insert(call_site, caller);
            }
        }
        for (&caller, call_sites) in &func_addr_to_indir_call_sites {
            for &call_site in call_sites {
                call_site_to_caller.insert(call_site, caller);
            }
        }

        Self {
            type_id_to_indir_targets,
            indir_target_to_type_id,
            indir_target_unknown_type,
            targets_with_no_info,
            type_id_to_indir_calls,
            indir_call_to_type_id,
            indir_call_unknown_type,
            func_addr_to_indir_call_sites,
            func_addr_to_dir_call_sites,
            dir_call_site_addrs,
            indir_call_site_addrs,
            func_addr_to_name,
            func_name_to_addr,
            call_site_to_caller,
        }
    }

    pub fn name_of(&self, pc: Pc) -> Option<&str> {
        self.func_addr_to_name.get(&pc).map(String::as_str)
    }

    pub fn entry_pc_of(&self, name: &str) -> Option<Pc> {
        self.func_name_to_addr.get(name).copied()
    }

    pub fn caller_of(&self, call_site: Pc) -> Option<Pc> {
        self.call_site_to_caller.get(&call_site).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RawCallGraph {
        let text = "\
FUNCTIONS
100 main
200 helper
400 vtarget

DIRECT CALL SITES
100 110 200

INDIRECT CALL SITES
100 130

INDIRECT CALL TYPES
7 130

INDIRECT TARGET TYPES
7 400
";
        RawCallGraph::parse(text).unwrap()
    }

    #[test]
    fn call_site_to_caller_is_total_over_known_sites() {
        let cg = sample();
        assert_eq!(cg.caller_of(0x110), Some(0x100));
        assert_eq!(cg.caller_of(0x130), Some(0x100));
    }

    #[test]
    fn targets_with_no_info_excludes_typed_and_unknown_targets() {
        let cg = sample();
        assert!(cg.targets_with_no_info.contains(&0x100));
        assert!(cg.targets_with_no_info.contains(&0x200));
        assert!(!cg.targets_with_no_info.contains(&0x400));
    }

    #[test]
    fn indir_call_unknown_type_excludes_typed_sites() {
        let cg = sample();
        assert!(!cg.indir_call_unknown_type.contains(&0x130));
    }

    #[test]
    fn duplicate_names_last_wins() {
        let text = "FUNCTIONS\n100 dup\n200 dup\n";
        let cg = RawCallGraph::parse(text).unwrap();
        assert_eq!(cg.entry_pc_of("dup"), Some(0x200));
    }
}
