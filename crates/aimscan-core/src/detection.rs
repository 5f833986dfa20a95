//! Detection results and evidence.
//!
//! Severities are clamped into `[0, 1]` when an [`Evidence`] is created,
//! so a rule's confidence (the mean severity of its evidence) is always
//! in range and the aggregator never re-clamps.

use crate::math::ViewAngles;

/// Clamp a score into `[0, 1]`. NaN maps to 0.
///
/// # Examples
///
/// ```
/// use aimscan_core::clamp_unit;
///
/// assert_eq!(clamp_unit(1.7), 1.0);
/// assert_eq!(clamp_unit(-0.2), 0.0);
/// assert_eq!(clamp_unit(f32::NAN), 0.0);
/// ```
pub fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// One timestamped, severity-scored observation.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Evidence {
    /// Server time of the observation (ms).
    pub timestamp: i32,
    /// Human-readable description.
    pub description: String,
    /// Severity in `[0, 1]`.
    pub severity: f32,
    /// View angles at the time.
    pub view_angles: ViewAngles,
}

impl Evidence {
    /// Create evidence, clamping `severity` into `[0, 1]`.
    pub fn new(
        timestamp: i32,
        description: impl Into<String>,
        severity: f32,
        view_angles: ViewAngles,
    ) -> Self {
        Self {
            timestamp,
            description: description.into(),
            severity: clamp_unit(severity),
            view_angles,
        }
    }
}

/// Output of one detection rule for one player.
///
/// Every rule always yields a result; with no evidence the confidence
/// is exactly zero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DetectionResult {
    /// Display name of the rule (also the weight-table key).
    pub rule_name: String,
    /// What the rule looks for.
    pub description: String,
    /// Mean severity of `evidence`, or 0.
    pub confidence: f32,
    /// Flagged events in the order the rule scanned them.
    pub evidence: Vec<Evidence>,
}

impl DetectionResult {
    /// A zero-confidence result with no evidence.
    pub fn empty(rule_name: &str, description: &str) -> Self {
        Self {
            rule_name: rule_name.to_string(),
            description: description.to_string(),
            confidence: 0.0,
            evidence: Vec::new(),
        }
    }

    /// Build a result whose confidence is the mean severity of `evidence`.
    pub fn from_evidence(rule_name: &str, description: &str, evidence: Vec<Evidence>) -> Self {
        let confidence = if evidence.is_empty() {
            0.0
        } else {
            let sum: f32 = evidence.iter().map(|e| e.severity).sum();
            sum / evidence.len() as f32
        };
        Self {
            rule_name: rule_name.to_string(),
            description: description.to_string(),
            confidence,
            evidence,
        }
    }

    /// Whether the rule flagged anything.
    pub fn is_flagged(&self) -> bool {
        !self.evidence.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evidence_clamps_both_ends() {
        let hi = Evidence::new(0, "hi", 3.0, ViewAngles::default());
        let lo = Evidence::new(0, "lo", -1.0, ViewAngles::default());
        assert_eq!(hi.severity, 1.0);
        assert_eq!(lo.severity, 0.0);
    }

    #[test]
    fn confidence_is_mean_severity() {
        let ev = vec![
            Evidence::new(1, "a", 0.2, ViewAngles::default()),
            Evidence::new(2, "b", 0.6, ViewAngles::default()),
        ];
        let r = DetectionResult::from_evidence("Rule", "desc", ev);
        assert!((r.confidence - 0.4).abs() < 1e-6);
        assert!(r.is_flagged());
    }

    #[test]
    fn empty_is_zero() {
        let r = DetectionResult::from_evidence("Rule", "desc", Vec::new());
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r, DetectionResult::empty("Rule", "desc"));
    }
}
