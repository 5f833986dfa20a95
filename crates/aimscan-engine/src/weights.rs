//! Per-rule weights and the score aggregator.
//!
//! The aggregate is a weighted mean over **all** rule results:
//!
//! ```text
//! overall = Σ(confidence_i × weight_i) / Σ(weight_i)
//! ```
//!
//! Rules that flagged nothing still add their weight to the denominator,
//! so a single confident rule is diluted by the quiet ones.

use aimscan_core::DetectionResult;
use aimscan_rules::Rule;
use indexmap::IndexMap;

use crate::config::ConfigError;

/// Weight of a rule name absent from the table.
pub const UNKNOWN_RULE_WEIGHT: f32 = 0.5;

/// Rule weights keyed by rule display name.
///
/// # Examples
///
/// ```
/// use aimscan_core::DetectionResult;
/// use aimscan_engine::WeightTable;
///
/// let weights = WeightTable::default();
/// let mut snap = DetectionResult::empty("Snap Aim Detection", "");
/// snap.confidence = 1.0;
/// let other = DetectionResult::empty("Made Up Rule", "");
/// let overall = weights.aggregate(&[snap, other]);
/// assert!((overall - 1.0 / 1.5).abs() < 1e-6);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct WeightTable {
    weights: IndexMap<String, f32>,
}

impl Default for WeightTable {
    fn default() -> Self {
        let weights = Rule::ALL
            .iter()
            .map(|r| (r.name().to_string(), default_weight(*r)))
            .collect();
        Self { weights }
    }
}

fn default_weight(rule: Rule) -> f32 {
    match rule {
        Rule::SnapAim => 1.0,
        Rule::PrecisionAim => 0.8,
        Rule::ReactionTime => 0.9,
        Rule::AimConsistency => 0.7,
        Rule::TargetPriority => 0.6,
        Rule::Smoothness => 1.0,
        Rule::AimJitter => 0.8,
        Rule::AimLock => 1.0,
        Rule::VelocityPrediction => 0.9,
        Rule::PingPrediction => 0.8,
    }
}

impl WeightTable {
    /// Weight for `rule_name`, or [`UNKNOWN_RULE_WEIGHT`].
    pub fn weight(&self, rule_name: &str) -> f32 {
        self.weights
            .get(rule_name)
            .copied()
            .unwrap_or(UNKNOWN_RULE_WEIGHT)
    }

    /// Override or add a weight. Checked by [`validate`](Self::validate).
    pub fn set(&mut self, rule_name: impl Into<String>, weight: f32) {
        self.weights.insert(rule_name.into(), weight);
    }

    /// Builder-style [`set`](Self::set).
    pub fn with(mut self, rule_name: impl Into<String>, weight: f32) -> Self {
        self.set(rule_name, weight);
        self
    }

    /// `(rule name, weight)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> + '_ {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Number of explicit weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether the table has no explicit weights.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Every weight must be finite and in `(0, 1]`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (rule, &value) in &self.weights {
            if !value.is_finite() || value <= 0.0 || value > 1.0 {
                return Err(ConfigError::InvalidWeight {
                    rule: rule.clone(),
                    value,
                });
            }
        }
        Ok(())
    }

    /// Weighted mean confidence over `results`; 0 for no results.
    pub fn aggregate(&self, results: &[DetectionResult]) -> f32 {
        let mut weighted = 0.0f32;
        let mut total = 0.0f32;
        for r in results {
            let w = self.weight(&r.rule_name);
            weighted += r.confidence * w;
            total += w;
        }
        if total > 0.0 {
            weighted / total
        } else {
            0.0
        }
    }
}
