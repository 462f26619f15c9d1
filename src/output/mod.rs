// Mon Feb 9 2026 - Jo
//! Human-readable diagnostic rendering of stack traces and reconstruction results.
//!
//! None of this is consumed by downstream tools; it exists purely to make a
//! reconstruction run legible on a terminal.

use colored::Colorize;

use crate::cg::types::Pc;
use crate::cg::RawCallGraph;
use crate::rcg::ReverseCallGraph;
use crate::search::SearchOutcome;
use crate::trace::TraceRecord;

/// Formats a PC the way the rest of the diagnostic output does: lower-hex, no
/// `0x` padding beyond what the value needs.
pub fn format_pc(pc: Pc) -> String {
    format!("{pc:#x}")
}

/// Renders one stack trace frame-by-frame, resolving each call site's owning
/// function via the reverse call graph's call-site index first (the cheap
/// path, since that index already exists for the search), falling back to the
/// raw call graph for frames the filter excluded. Names always come from `cg`,
/// since the reverse graph only ever stores PCs.
pub struct TracePrinter<'cg> {
    cg: &'cg RawCallGraph,
    rcg: &'cg ReverseCallGraph,
}

impl<'cg> TracePrinter<'cg> {
    pub fn new(cg: &'cg RawCallGraph, rcg: &'cg ReverseCallGraph) -> Self {
        Self { cg, rcg }
    }

    fn caller_name_of(&self, call_site: Pc) -> &'cg str {
        let caller_entry_pc = self
            .rcg
            .call_site_owner(call_site)
            .map(|node| self.rcg.node(node).entry_pc)
            .or_else(|| self.cg.caller_of(call_site));
        caller_entry_pc
            .and_then(|caller| self.cg.name_of(caller))
            .unwrap_or("UNKNOWN_NAME")
    }

    pub fn render(&self, trace: &[Pc]) -> String {
        let mut out = format!("Stack Trace (length={}):\n", trace.len());
        for (i, &call_site) in trace.iter().enumerate() {
            let caller_name = self.caller_name_of(call_site);
            out.push_str(&format!(
                "  {i}: [{}] {caller_name}\n",
                format_pc(call_site)
            ));
        }
        out
    }
}

/// Renders a one-line, colourised summary for a completed reconstruction.
pub fn render_outcome(record: &TraceRecord, outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Found { trace, collisions } => {
            let mut line = format!(
                "{} entry={} hash={:#018x} frames={}",
                "SUCCESS".green().bold(),
                record.entry_name,
                record.hash,
                trace.len()
            );
            if *collisions > 0 {
                line.push_str(&format!(
                    " ({} incorrect reconstructions due to collisions)",
                    collisions
                ));
            }
            line
        }
        SearchOutcome::NotFound { collisions } => {
            let mut line = format!(
                "{} entry={} hash={:#018x}",
                "FAIL".red().bold(),
                record.entry_name,
                record.hash
            );
            if *collisions > 0 {
                line.push_str(&format!(" ({} hash collisions observed)", collisions));
            }
            line
        }
    }
}

/// Aggregate counters printed once after a full batch of reconstructions.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunSummary {
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub total_collisions: usize,
}

impl RunSummary {
    pub fn record(&mut self, outcome: &SearchOutcome) {
        self.attempted += 1;
        self.total_collisions += outcome.collisions();
        match outcome {
            SearchOutcome::Found { .. } => self.succeeded += 1,
            SearchOutcome::NotFound { .. } => self.failed += 1,
        }
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed, {} total collisions",
            self.attempted, self.succeeded, self.failed, self.total_collisions
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{FilterConfig, FilterResolver};

    #[test]
    fn trace_printer_resolves_caller_names_via_rcg() {
        let cg = RawCallGraph::parse(
            "FUNCTIONS\n100 main\n200 helper\n\nDIRECT CALL SITES\n100 110 200\n",
        )
        .unwrap();
        let targets = FilterResolver::new(&cg, &FilterConfig::new()).resolve();
        let rcg = ReverseCallGraph::build(&targets);
        let printer = TracePrinter::new(&cg, &rcg);
        let rendered = printer.render(&[0x110]);
        assert!(rendered.contains("main"));
    }

    #[test]
    fn trace_printer_falls_back_to_raw_cg_for_filtered_frames() {
        let cg = RawCallGraph::parse(
            "FUNCTIONS\n100 main\n200 helper\n\nDIRECT CALL SITES\n100 110 200\n",
        )
        .unwrap();
        let mut cfg = FilterConfig::new();
        cfg.exclude_funcs.insert(0x100);
        let targets = FilterResolver::new(&cg, &cfg).resolve();
        let rcg = ReverseCallGraph::build(&targets);
        // 0x100 is excluded, so the RCG's call-site index never learns about
        // 0x110; the printer must still resolve it through the raw graph.
        let printer = TracePrinter::new(&cg, &rcg);
        let rendered = printer.render(&[0x110]);
        assert!(rendered.contains("main"));
    }

    #[test]
    fn run_summary_counts_outcomes() {
        let mut summary = RunSummary::default();
        summary.record(&SearchOutcome::Found {
            trace: vec![],
            collisions: 1,
        });
        summary.record(&SearchOutcome::NotFound { collisions: 0 });
        assert_eq!(summary.attempted, 2);
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.total_collisions, 1);
    }
}
