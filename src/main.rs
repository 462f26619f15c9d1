// Mon Feb 9 2026 - Jo
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser;
use colored::Colorize;
use log::{info, warn};

use st_reconst::cg::RawCallGraph;
use st_reconst::config::ReconstructionConfig;
use st_reconst::error::AppError;
use st_reconst::filter::{FilterResolver, DEFAULT_FILTER};
use st_reconst::output::{render_outcome, RunSummary, TracePrinter};
use st_reconst::rcg::ReverseCallGraph;
use st_reconst::search::reconstruct;
use st_reconst::trace;
use st_reconst::ui::trace_progress_bar;

/// Reconstructs hash-compressed stack traces against a disassembler-derived call graph.
#[derive(Parser, Debug)]
#[command(name = "st-reconst")]
#[command(version)]
#[command(about = "Reconstruct sampled stack traces from a hash and a static call graph")]
struct Cli {
    /// File containing call-graph disassembly output (INDIRECT/DIRECT CALL SITES, FUNCTIONS sections)
    call_graph_file: PathBuf,

    /// File containing `ST:`-prefixed stack trace records to reconstruct
    traces_file: PathBuf,

    /// Maximum depth at which to clip traces and bound the reconstruction search
    max_depth: usize,

    /// First pruning checkpoint depth
    pruning_depth_1: usize,

    /// Second pruning checkpoint depth
    pruning_depth_2: usize,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Disable the progress bar
    #[arg(long)]
    no_progress: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let cg = RawCallGraph::load(&cli.call_graph_file)
        .map_err(AppError::from)
        .with_context(|| format!("loading call-graph file {}", cli.call_graph_file.display()))?;
    info!(
        "loaded call graph: {} functions, {} direct call sites, {} indirect call sites",
        cg.func_addr_to_name.len(),
        cg.dir_call_site_addrs.len(),
        cg.indir_call_site_addrs.len()
    );

    let config = ReconstructionConfig::new(
        cli.max_depth,
        cli.pruning_depth_1,
        cli.pruning_depth_2,
        DEFAULT_FILTER.clone(),
    )
    .map_err(AppError::from)?;

    let targets_to_callers = FilterResolver::new(&cg, &config.filter).resolve();
    let rcg = ReverseCallGraph::build(&targets_to_callers);
    info!("reverse call graph: {} retained functions", rcg.len());

    let (records, stats) = trace::load(&cli.traces_file, &cg, &rcg, config.depth_limit(), config.search.depths)
        .map_err(AppError::from)
        .with_context(|| format!("loading traces file {}", cli.traces_file.display()))?;
    if stats.clipped > 0 {
        warn!("{} stack traces were clipped to the max depth", stats.clipped);
    }
    if stats.dropped > 0 {
        warn!("{} stack traces were dropped (filtered or unresolvable frames)", stats.dropped);
    }
    if stats.duplicate_hashes > 0 {
        warn!("{} stack traces shared a hash with an earlier trace", stats.duplicate_hashes);
    }

    let printer = TracePrinter::new(&cg, &rcg);
    let bar = trace_progress_bar(records.len() as u64, !cli.no_progress);
    let mut summary = RunSummary::default();

    for record in &records {
        let Some(entry_pc) = cg.entry_pc_of(&record.entry_name) else {
            warn!("entry function `{}` has no known pc; skipping", record.entry_name);
            continue;
        };
        let Some(entry_idx) = rcg.node_index_of(entry_pc) else {
            warn!("entry function `{}` was filtered out of the reverse call graph", record.entry_name);
            continue;
        };

        eprintln!(
            "\nFuncName: {}\nStack trace hash: {:#018x}\n{}",
            record.entry_name,
            record.hash,
            printer.render(&record.partial_trace)
        );

        let outcome = reconstruct(&rcg, entry_idx, &config.search, record.hash, &record.partial_trace);
        eprintln!("{}", render_outcome(record, &outcome));
        summary.record(&outcome);

        if let Some(bar) = &bar {
            bar.inc(1);
        }
    }
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }

    eprintln!("\n{}", summary.to_string().bold());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.no_color {
        colored::control::set_override(false);
    }
    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err:#}", "ERROR:".red().bold());
            let code = err
                .downcast_ref::<AppError>()
                .map(AppError::exit_code)
                .unwrap_or(1);
            ExitCode::from(code as u8)
        }
    }
}
