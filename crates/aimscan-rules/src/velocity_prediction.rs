//! Velocity prediction: aim that follows an extrapolated enemy position.
//!
//! For each triple `(prev, cur, next)` in a tracking run, the enemy
//! velocity from `prev` to `cur` is applied over the `cur` to `next`
//! interval with a negative prediction factor, and `next`'s view is
//! compared with the direction to that predicted point.

use aimscan_core::{
    angle_difference, view_angles_from_direction, AimSample, DetectionResult, Evidence,
};

use crate::runs::{pair_runs, PairStep, Run};

/// Rule name.
pub const NAME: &str = "Velocity Prediction Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects aimbot velocity prediction";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 10;
/// Minimum tracking-run length.
pub const MIN_RUN: usize = 5;
/// Mean correlation above which a run is flagged.
pub const PREDICTION_THRESHOLD: f32 = 0.8;
/// Angle error at which correlation reaches zero (degrees).
pub const CORRELATION_SPAN: f32 = 10.0;

/// Enemy displacement that counts as moving (units).
const MOVING_DISTANCE: f32 = 1.0;

/// Flag tracking runs whose mean prediction correlation exceeds
/// [`PREDICTION_THRESHOLD`]. Severity is the correlation.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let runs = pair_runs(samples, |prev, cur| match (prev.target, cur.target) {
        (Some(a), Some(b)) if a.position.distance(b.position) > MOVING_DISTANCE => {
            PairStep::Extend
        }
        _ => PairStep::Break,
    });

    let mut evidence = Vec::new();
    for run in runs.iter().filter(|r| r.len() >= MIN_RUN) {
        let score = prediction_score(run);
        if score > PREDICTION_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("velocity prediction: {score:.2} correlation with predicted positions"),
                score,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

fn prediction_score(run: &Run<'_>) -> f32 {
    let mut total = 0.0f32;
    let mut count = 0usize;
    for w in run.windows(3) {
        let (prev, cur, next) = (w[0], w[1], w[2]);
        let (Some(pe), Some(ce)) = (prev.enemy_position(), cur.enemy_position()) else {
            continue;
        };
        let dt1 = cur.elapsed_since(prev) as f32 / 1000.0;
        let dt2 = next.elapsed_since(cur) as f32 / 1000.0;
        if dt1 <= 0.0 || dt2 <= 0.0 {
            continue;
        }
        let velocity = (ce - pe) / dt1;
        let predicted = ce + velocity * -dt2;
        let aim = view_angles_from_direction(predicted - cur.position);
        let diff = angle_difference(next.view_angles, aim);
        total += (1.0 - diff / CORRELATION_SPAN).max(0.0);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}
