//! Analysis error type.

use std::error::Error;
use std::fmt;

use aimscan_core::Cancelled;

use crate::config::ConfigError;

/// Errors from [`Analyzer`](crate::Analyzer) operations.
#[derive(Debug, PartialEq)]
pub enum AnalysisError {
    /// The cancel token was set before analysis finished.
    Cancelled,
    /// An evaluation thread panicked or produced no result.
    WorkerFailed {
        /// Description of the failure.
        reason: String,
    },
    /// The configuration was rejected.
    Config(ConfigError),
}

impl fmt::Display for AnalysisError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "analysis cancelled"),
            Self::WorkerFailed { reason } => write!(f, "evaluation worker failed: {reason}"),
            Self::Config(e) => write!(f, "config: {e}"),
        }
    }
}

impl Error for AnalysisError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for AnalysisError {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

impl From<Cancelled> for AnalysisError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
