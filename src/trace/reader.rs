// Thu Feb 5 2026 - Jo
use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use ahash::HashSet;
use log::warn;
use memmap2::Mmap;

use crate::cg::types::Pc;
use crate::cg::RawCallGraph;
use crate::hash::{hash_trace, PruningDepths};
use crate::rcg::ReverseCallGraph;
use crate::trace::error::TraceError;
use crate::trace::record::{ReadStats, TraceRecord};

const TRACE_LINE_PREFIX: &str = "ST:";

fn parse_pc(token: &str) -> Option<Pc> {
    u64::from_str_radix(token, 16).ok()
}

/// Parses every `ST:` line in `text` into a `TraceRecord`.
///
/// The innermost call site is resolved against `cg` to find the entry
/// function's name, then checked against the *filtered* `rcg`: a call site
/// whose owning function the filter excluded is treated as "absent from the
/// CG" for this purpose and the trace is dropped, even though it is still
/// present in the raw, unfiltered `cg`.
pub fn read_traces(
    text: &str,
    cg: &RawCallGraph,
    rcg: &ReverseCallGraph,
    depth_limit: usize,
    depths: PruningDepths,
) -> (Vec<TraceRecord>, ReadStats) {
    let mut records = Vec::new();
    let mut stats = ReadStats::default();
    let mut seen_hashes: HashSet<u64> = HashSet::default();

    for line in text.lines() {
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some(TRACE_LINE_PREFIX) => {}
            _ => continue,
        }

        let pcs: Vec<Pc> = tokens.filter_map(parse_pc).collect();
        let Some((&entry_call_site, rest)) = pcs.split_first() else {
            stats.dropped += 1;
            warn!("dropped trace: `ST:` line has no frames");
            continue;
        };

        let Some(caller_pc) = cg.caller_of(entry_call_site) else {
            stats.dropped += 1;
            warn!(
                "dropped trace: innermost call site {entry_call_site:#x} is not \
                 present in the call graph"
            );
            continue;
        };
        if rcg.node_index_of(caller_pc).is_none() {
            stats.dropped += 1;
            warn!(
                "dropped trace: caller at {caller_pc:#x} was excluded by the call-graph filter"
            );
            continue;
        }
        let Some(entry_name) = cg.name_of(caller_pc) else {
            stats.dropped += 1;
            warn!("dropped trace: caller at {caller_pc:#x} has no symbol");
            continue;
        };

        let partial_trace: Vec<Pc> = if rest.len() > depth_limit {
            stats.clipped += 1;
            warn!(
                "clipped trace at entry `{entry_name}`: {} frames exceeds max depth {depth_limit}",
                rest.len()
            );
            rest[..depth_limit].to_vec()
        } else {
            rest.to_vec()
        };

        let hash = hash_trace(&partial_trace, depths);
        if !seen_hashes.insert(hash) {
            stats.duplicate_hashes += 1;
        }

        records.push(TraceRecord {
            entry_name: entry_name.to_string(),
            hash,
            partial_trace,
        });
    }

    (records, stats)
}

/// Memory-maps `path` and reads its trace records directly out of the mapping.
pub fn load(
    path: impl AsRef<Path>,
    cg: &RawCallGraph,
    rcg: &ReverseCallGraph,
    depth_limit: usize,
    depths: PruningDepths,
) -> Result<(Vec<TraceRecord>, ReadStats), TraceError> {
    let file = File::open(path)?;
    let mmap = unsafe { Mmap::map(&file) }?;
    let text = std::str::from_utf8(&mmap)
        .map_err(|e| TraceError::Io(std::io::Error::new(ErrorKind::InvalidData, e)))?;
    Ok(read_traces(text, cg, rcg, depth_limit, depths))
}
