//! Precision aim: near-zero micro-adjustment while firing.

use aimscan_core::{angle_difference, AimSample, DetectionResult, Evidence};

use crate::runs::sample_runs;

/// Rule name.
pub const NAME: &str = "Precision Aim Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects unnaturally precise aim typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 10;
/// Minimum firing-run length.
pub const MIN_RUN: usize = 3;
/// Average adjustment below which a firing run is suspicious (degrees).
pub const PRECISION_THRESHOLD: f32 = 0.05;

/// Score every firing run of at least [`MIN_RUN`] samples by its mean
/// adjustment between consecutive samples.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    for run in sample_runs(samples, |s| s.is_firing, |_, _| true) {
        if run.len() < MIN_RUN {
            continue;
        }
        let total: f32 = run
            .windows(2)
            .map(|p| angle_difference(p[0].view_angles, p[1].view_angles))
            .sum();
        let avg = total / (run.len() - 1) as f32;
        if avg < PRECISION_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("precise aim: {avg:.4}° average adjustment while firing"),
                1.0 - avg / PRECISION_THRESHOLD,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}
