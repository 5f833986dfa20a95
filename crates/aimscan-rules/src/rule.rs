//! The closed set of detection rules.

use std::fmt;

use aimscan_core::{AimSample, DetectionResult};

use crate::{
    consistency, jitter, lock, ping_prediction, precision, reaction, smoothness, snap,
    target_priority, velocity_prediction,
};

/// One detection rule.
///
/// Every rule is a pure function of a player's sample sequence. Rules
/// share no state, so any subset may be evaluated in any order or in
/// parallel.
///
/// # Examples
///
/// ```
/// use aimscan_rules::Rule;
///
/// let rule = Rule::from_name("Aim Lock Detection").unwrap();
/// assert_eq!(rule, Rule::AimLock);
/// let result = rule.evaluate(&[]);
/// assert_eq!(result.confidence, 0.0);
/// assert_eq!(result.rule_name, rule.name());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rule {
    /// Sudden, unnaturally fast view changes.
    SnapAim,
    /// Near-zero adjustment while firing.
    PrecisionAim,
    /// Turn-and-settle faster than human reaction.
    ReactionTime,
    /// Angular speed with too little variation.
    AimConsistency,
    /// Perfect tracking, precise switches, nearest-first selection.
    TargetPriority,
    /// Speed profiles that follow a simple curve.
    Smoothness,
    /// Holding still without hand tremor.
    AimJitter,
    /// View pinned to one direction.
    AimLock,
    /// Aim following an extrapolated enemy position.
    VelocityPrediction,
    /// Aim compensating for network latency.
    PingPrediction,
}

impl Rule {
    /// Every rule, in evaluation order.
    pub const ALL: [Rule; 10] = [
        Rule::SnapAim,
        Rule::PrecisionAim,
        Rule::ReactionTime,
        Rule::AimConsistency,
        Rule::TargetPriority,
        Rule::Smoothness,
        Rule::AimJitter,
        Rule::AimLock,
        Rule::VelocityPrediction,
        Rule::PingPrediction,
    ];

    /// Display name, also the weight-table key.
    pub fn name(self) -> &'static str {
        match self {
            Rule::SnapAim => snap::NAME,
            Rule::PrecisionAim => precision::NAME,
            Rule::ReactionTime => reaction::NAME,
            Rule::AimConsistency => consistency::NAME,
            Rule::TargetPriority => target_priority::NAME,
            Rule::Smoothness => smoothness::NAME,
            Rule::AimJitter => jitter::NAME,
            Rule::AimLock => lock::NAME,
            Rule::VelocityPrediction => velocity_prediction::NAME,
            Rule::PingPrediction => ping_prediction::NAME,
        }
    }

    /// What the rule looks for.
    pub fn description(self) -> &'static str {
        match self {
            Rule::SnapAim => snap::DESCRIPTION,
            Rule::PrecisionAim => precision::DESCRIPTION,
            Rule::ReactionTime => reaction::DESCRIPTION,
            Rule::AimConsistency => consistency::DESCRIPTION,
            Rule::TargetPriority => target_priority::DESCRIPTION,
            Rule::Smoothness => smoothness::DESCRIPTION,
            Rule::AimJitter => jitter::DESCRIPTION,
            Rule::AimLock => lock::DESCRIPTION,
            Rule::VelocityPrediction => velocity_prediction::DESCRIPTION,
            Rule::PingPrediction => ping_prediction::DESCRIPTION,
        }
    }

    /// Minimum sample count below which the rule returns an empty result.
    pub fn min_samples(self) -> usize {
        match self {
            Rule::SnapAim => snap::MIN_SAMPLES,
            Rule::PrecisionAim => precision::MIN_SAMPLES,
            Rule::ReactionTime => reaction::MIN_SAMPLES,
            Rule::AimConsistency => consistency::MIN_SAMPLES,
            Rule::TargetPriority => target_priority::MIN_SAMPLES,
            Rule::Smoothness => smoothness::MIN_SAMPLES,
            Rule::AimJitter => jitter::MIN_SAMPLES,
            Rule::AimLock => lock::MIN_SAMPLES,
            Rule::VelocityPrediction => velocity_prediction::MIN_SAMPLES,
            Rule::PingPrediction => ping_prediction::MIN_SAMPLES,
        }
    }

    /// Evaluate the rule over one player's samples.
    pub fn evaluate(self, samples: &[AimSample]) -> DetectionResult {
        match self {
            Rule::SnapAim => snap::evaluate(samples),
            Rule::PrecisionAim => precision::evaluate(samples),
            Rule::ReactionTime => reaction::evaluate(samples),
            Rule::AimConsistency => consistency::evaluate(samples),
            Rule::TargetPriority => target_priority::evaluate(samples),
            Rule::Smoothness => smoothness::evaluate(samples),
            Rule::AimJitter => jitter::evaluate(samples),
            Rule::AimLock => lock::evaluate(samples),
            Rule::VelocityPrediction => velocity_prediction::evaluate(samples),
            Rule::PingPrediction => ping_prediction::evaluate(samples),
        }
    }

    /// Look a rule up by its display name.
    pub fn from_name(name: &str) -> Option<Rule> {
        Rule::ALL.into_iter().find(|r| r.name() == name)
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Evaluate every rule in [`Rule::ALL`] order.
pub fn evaluate_all(samples: &[AimSample]) -> Vec<DetectionResult> {
    Rule::ALL.iter().map(|r| r.evaluate(samples)).collect()
}
