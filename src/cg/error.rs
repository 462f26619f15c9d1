// Mon Feb 2 2026 - Jo
use thiserror::Error;

/// Fatal parse-time failures for the call-graph input file.
#[derive(Error, Debug)]
pub enum CgError {
    #[error("line {line}: duplicate section header {section:?}")]
    DuplicateSection { line: usize, section: &'static str },
    #[error("line {line}: expected a hex token, found {token:?}")]
    InvalidHex { line: usize, token: String },
    #[error("line {line}: expected a hex token, found end of line")]
    MissingHexToken { line: usize },
    #[error("line {line}: direct call site {call_site:#x} is missing its target pc")]
    TruncatedDirectPair { line: usize, call_site: u64 },
    #[error("line {line}: FUNCTIONS record is missing a name for pc {pc:#x}")]
    MissingFunctionName { line: usize, pc: u64 },
    #[error("io error reading call-graph file: {0}")]
    Io(#[from] std::io::Error),
}
