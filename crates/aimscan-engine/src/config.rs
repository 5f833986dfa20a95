//! Analyzer configuration, validation, and error types.
//!
//! [`AnalyzerConfig`] is the builder-input for an
//! [`Analyzer`](crate::Analyzer). [`validate()`](AnalyzerConfig::validate)
//! runs when the analyzer is constructed.

use std::error::Error;
use std::fmt;

use crate::weights::WeightTable;

/// Default verdict threshold.
pub const DEFAULT_THRESHOLD: f32 = 0.7;

// ── AnalyzerConfig ────────────────────────────────────────────────

/// Configuration for rule evaluation and verdicts.
#[derive(Clone, Debug, PartialEq)]
pub struct AnalyzerConfig {
    /// A player is flagged when the aggregate reaches this value.
    /// Default: 0.7.
    pub threshold: f32,
    /// Number of evaluation threads. `None` = auto-detect
    /// (`available_parallelism / 2`, clamped to `[1, 16]`).
    /// `Some(1)` evaluates on the calling thread.
    pub worker_count: Option<usize>,
    /// Per-rule aggregation weights.
    pub weights: WeightTable,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            worker_count: None,
            weights: WeightTable::default(),
        }
    }
}

impl AnalyzerConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.max(1),
            None => {
                let cpus = std::thread::available_parallelism()
                    .map(|n| n.get())
                    .unwrap_or(2);
                (cpus / 2).clamp(1, 16)
            }
        }
    }

    /// Check the threshold, worker count, and weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.threshold.is_finite() || !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        if let Some(n) = self.worker_count {
            if n == 0 || n > MAX_WORKERS {
                return Err(ConfigError::InvalidWorkerCount { configured: n });
            }
        }
        self.weights.validate()
    }
}

/// Largest explicit worker count accepted.
pub const MAX_WORKERS: usize = 64;

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`AnalyzerConfig::validate()`].
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// Threshold is NaN, infinite, or outside `[0, 1]`.
    InvalidThreshold {
        /// The invalid value.
        value: f32,
    },
    /// A rule weight is not finite or outside `(0, 1]`.
    InvalidWeight {
        /// Rule the weight belongs to.
        rule: String,
        /// The invalid value.
        value: f32,
    },
    /// Worker count is zero or above [`MAX_WORKERS`].
    InvalidWorkerCount {
        /// The configured count.
        configured: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { value } => {
                write!(f, "threshold must be finite and within [0, 1], got {value}")
            }
            Self::InvalidWeight { rule, value } => {
                write!(f, "weight for '{rule}' must be within (0, 1], got {value}")
            }
            Self::InvalidWorkerCount { configured } => {
                write!(f, "worker_count {configured} must be within [1, {MAX_WORKERS}]")
            }
        }
    }
}

impl Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let c = AnalyzerConfig::default();
        assert_eq!(c.threshold, 0.7);
        assert!(c.validate().is_ok());
        let n = c.resolved_worker_count();
        assert!((1..=16).contains(&n));
    }

    #[test]
    fn bad_threshold_rejected() {
        for value in [f32::NAN, -0.1, 1.01] {
            let c = AnalyzerConfig {
                threshold: value,
                ..AnalyzerConfig::default()
            };
            assert!(matches!(
                c.validate(),
                Err(ConfigError::InvalidThreshold { .. })
            ));
        }
    }

    #[test]
    fn zero_workers_rejected() {
        let c = AnalyzerConfig {
            worker_count: Some(0),
            ..AnalyzerConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(ConfigError::InvalidWorkerCount { configured: 0 })
        );
    }

    #[test]
    fn explicit_workers_resolve_verbatim() {
        let c = AnalyzerConfig {
            worker_count: Some(3),
            ..AnalyzerConfig::default()
        };
        assert_eq!(c.resolved_worker_count(), 3);
    }

    #[test]
    fn error_messages_name_the_problem() {
        let e = ConfigError::InvalidWeight {
            rule: "Aim Lock Detection".into(),
            value: 2.0,
        };
        assert!(e.to_string().contains("Aim Lock Detection"));
    }
}
