// Thu Feb 5 2026 - Jo
use thiserror::Error;

use crate::cg::CgError;
use crate::search::SearchError;
use crate::trace::TraceError;

/// Top-level error aggregating every subsystem's error enum, with an
/// exit-code mapping: `InputMalformed -> 2`, everything else -> 1.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("malformed call-graph input: {0}")]
    InputMalformed(#[from] CgError),
    #[error("invalid arguments: {0}")]
    ArgumentInvalid(#[from] SearchError),
    #[error(transparent)]
    Trace(#[from] TraceError),
}

impl AppError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::InputMalformed(_) => 2,
            Self::ArgumentInvalid(_) => 1,
            Self::Trace(_) => 1,
        }
    }
}
