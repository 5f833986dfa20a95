//! Analysis engine for decoded replays.
//!
//! Runs the detection rules for every player, folds rule confidences
//! into a weighted cheating probability, and reports per-player verdicts
//! with descriptive statistics. Rule evaluation runs sequentially or on
//! a scoped worker pool, with optional cooperative cancellation.
//! Calibration against known-clean players is available through the
//! [`SupportsCalibration`] capability.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod analyzer;
pub mod calibration;
pub mod config;
pub mod error;
pub mod metrics;
pub(crate) mod pool;
pub mod report;
pub mod statistics;
pub mod weights;

pub use analyzer::Analyzer;
pub use calibration::{CalibratedAnalyzer, Calibration, CalibrationProfile, SupportsCalibration};
pub use config::{AnalyzerConfig, ConfigError};
pub use error::AnalysisError;
pub use metrics::AnalysisMetrics;
pub use report::PlayerReport;
pub use statistics::{PlayerStatistics, TeamAverages};
pub use weights::WeightTable;
