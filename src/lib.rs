// Mon Feb 2 2026 - Jo
pub mod cg;
pub mod config;
pub mod error;
pub mod filter;
pub mod hash;
pub mod output;
pub mod rcg;
pub mod search;
pub mod trace;
pub mod ui;

pub use cg::RawCallGraph;
pub use config::ReconstructionConfig;
pub use error::AppError;
pub use filter::{FilterConfig, DEFAULT_FILTER};
pub use rcg::ReverseCallGraph;
pub use search::{reconstruct, SearchOutcome};
