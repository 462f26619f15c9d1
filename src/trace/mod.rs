// Thu Feb 5 2026 - Jo
//! Component E: parse recorded (entry-name, hash, partial-trace) tuples.

pub mod error;
pub mod reader;
pub mod record;

pub use error::TraceError;
pub use reader::{load, read_traces};
pub use record::{ReadStats, TraceRecord};
