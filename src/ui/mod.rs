// Mon Feb 9 2026 - Jo
//! Terminal presentation: progress bar over the trace batch.

pub mod progress;

pub use progress::trace_progress_bar;
