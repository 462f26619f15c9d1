// Mon Feb 9 2026 - Jo
use indicatif::{ProgressBar, ProgressStyle};

/// Wraps `indicatif` with this tool's one progress shape: a bar over the
/// batch of traces being reconstructed. `None` is used instead of a no-op bar
/// when `--no-progress` is passed, so the hot loop never touches a terminal.
pub fn trace_progress_bar(total: u64, enabled: bool) -> Option<ProgressBar> {
    if !enabled || total == 0 {
        return None;
    }
    let bar = ProgressBar::new(total);
    bar.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓▒░ "),
    );
    Some(bar)
}
