// Thu Feb 5 2026 - Jo
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TraceError {
    #[error("io error reading trace file: {0}")]
    Io(#[from] std::io::Error),
}
