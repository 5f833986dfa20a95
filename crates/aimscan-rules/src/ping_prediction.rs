//! Ping prediction: aim that compensates for network latency.
//!
//! Latency is estimated from reaction-style closures inside each
//! firing-at-enemy run, then each sample's view is compared with the
//! enemy position shifted back by half that latency.

use aimscan_core::{
    angle_difference, view_angles_from_direction, AimSample, DetectionResult, Evidence, Vec3,
};

use crate::runs::sample_runs;

/// Rule name.
pub const NAME: &str = "Ping Prediction Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects aimbot ping compensation";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 10;
/// Minimum firing-at-enemy run length.
pub const MIN_RUN: usize = 5;
/// Mean correlation above which a run is flagged.
pub const PREDICTION_THRESHOLD: f32 = 0.75;
/// Angle error at which correlation reaches zero (degrees).
pub const CORRELATION_SPAN: f32 = 5.0;
/// Latency assumed when no closure is observed (ms).
pub const DEFAULT_PING_MS: f32 = 50.0;

/// Targeting errors bracketing a closure event (degrees).
const CLOSURE_FROM: f32 = 10.0;
const CLOSURE_TO: f32 = 5.0;

/// Flag firing-at-enemy runs whose mean ping-compensated correlation
/// exceeds [`PREDICTION_THRESHOLD`]. Severity is the correlation.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    let runs = sample_runs(
        samples,
        |s| s.is_firing && s.has_visible_enemy(),
        |_, _| true,
    );
    for run in runs.iter().filter(|r| r.len() >= MIN_RUN) {
        let score = prediction_score(run);
        if score > PREDICTION_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("ping prediction: {score:.2} correlation with compensated positions"),
                score,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

/// Mean elapsed time of closures from above [`CLOSURE_FROM`] to below
/// [`CLOSURE_TO`] two samples later, or [`DEFAULT_PING_MS`].
fn estimate_ping(run: &[AimSample]) -> f32 {
    let closures: Vec<i64> = run
        .windows(3)
        .filter(|w| {
            let before = w[0].angle_to_target().unwrap_or(0.0);
            let after = w[2].angle_to_target().unwrap_or(f32::MAX);
            after < CLOSURE_TO && before > CLOSURE_FROM
        })
        .map(|w| w[2].elapsed_since(&w[0]))
        .collect();
    if closures.is_empty() {
        DEFAULT_PING_MS
    } else {
        closures.iter().sum::<i64>() as f32 / closures.len() as f32
    }
}

fn prediction_score(run: &[AimSample]) -> f32 {
    let ping = estimate_ping(run);
    if ping <= 0.0 {
        return 0.0;
    }
    let factor = -(ping / 2.0) / 1000.0;

    let mut total = 0.0f32;
    let mut count = 0usize;
    for i in 1..run.len() {
        let (cur, next) = (&run[i - 1], &run[i]);
        if next.timestamp <= cur.timestamp {
            continue;
        }
        let Some(ce) = cur.enemy_position() else {
            continue;
        };
        let mut velocity = Vec3::ZERO;
        if i > 1 {
            let prev = &run[i - 2];
            let pdt = cur.elapsed_since(prev) as f32 / 1000.0;
            if let Some(pe) = prev.enemy_position().filter(|_| pdt > 0.0) {
                velocity = (ce - pe) / pdt;
            }
        }
        let predicted = ce + velocity * factor;
        let aim = view_angles_from_direction(predicted - cur.position);
        let diff = angle_difference(cur.view_angles, aim);
        total += (1.0 - diff / CORRELATION_SPAN).max(0.0);
        count += 1;
    }
    if count == 0 {
        0.0
    } else {
        total / count as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::SequenceBuilder;

    #[test]
    fn locked_fire_on_static_enemy_is_flagged() {
        let samples = SequenceBuilder::new(16)
            .firing(true)
            .enemy(Some(Vec3::new(100.0, 20.0, 600.0)))
            .track(12)
            .build();
        let result = evaluate(&samples);
        assert_eq!(result.evidence.len(), 1);
        assert!(result.confidence > 0.99);
    }

    #[test]
    fn compensation_lag_lowers_correlation() {
        let samples = SequenceBuilder::new(16)
            .firing(true)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .enemy_velocity(Vec3::new(5.0, 0.0, 0.0))
            .track(12)
            .build();
        let score = prediction_score(&samples);
        assert!(score > 0.75 && score < 1.0);
    }

    #[test]
    fn not_firing_is_clean() {
        let samples = SequenceBuilder::new(16)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .track(20)
            .build();
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn closures_set_the_ping() {
        let samples = SequenceBuilder::new(20)
            .firing(true)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .look(0.0, 30.0)
            .hold(2)
            .track(4)
            .build();
        // closures (0 -> 2) and (1 -> 3), 40ms each
        assert_eq!(estimate_ping(&samples), 40.0);
        let calm = SequenceBuilder::new(20)
            .firing(true)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .track(6)
            .build();
        assert_eq!(estimate_ping(&calm), DEFAULT_PING_MS);
    }
}
