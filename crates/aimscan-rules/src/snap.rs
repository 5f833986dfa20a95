//! Snap aim: sudden, unnaturally fast view changes.

use aimscan_core::{angle_difference, AimSample, DetectionResult, Evidence};

/// Rule name.
pub const NAME: &str = "Snap Aim Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects sudden, unnatural aim movements typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 2;
/// Angular speed above which a movement counts as a snap (degrees/ms).
pub const SPEED_THRESHOLD: f32 = 0.5;

/// Flag every consecutive pair whose angular speed exceeds
/// [`SPEED_THRESHOLD`]. Severity is `min(speed / 2, 1)`.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    for pair in samples.windows(2) {
        let (prev, cur) = (&pair[0], &pair[1]);
        let dt = cur.elapsed_since(prev);
        if dt <= 0 {
            continue;
        }
        let diff = angle_difference(prev.view_angles, cur.view_angles);
        let speed = diff / dt as f32;
        if speed > SPEED_THRESHOLD {
            evidence.push(Evidence::new(
                cur.timestamp,
                format!("aim snap: {diff:.2}° in {dt}ms ({speed:.2}°/ms)"),
                (speed / 2.0).min(1.0),
                cur.view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::SequenceBuilder;

    #[test]
    fn fast_turn_is_flagged() {
        let samples = SequenceBuilder::new(16).hold(5).turn(1, 0.0, 30.0).hold(5).build();
        let result = evaluate(&samples);
        assert_eq!(result.evidence.len(), 1);
        assert!((result.confidence - 0.9375).abs() < 1e-5);
        assert_eq!(result.evidence[0].timestamp, samples[5].timestamp);
    }

    #[test]
    fn very_fast_turn_saturates() {
        let samples = SequenceBuilder::new(10).hold(2).turn(1, 10.0, 60.0).build();
        let result = evaluate(&samples);
        assert_eq!(result.confidence, 1.0);
    }

    #[test]
    fn slow_movement_is_clean() {
        let samples = SequenceBuilder::new(16).turn(40, 0.1, 0.2).build();
        let result = evaluate(&samples);
        assert_eq!(result.confidence, 0.0);
        assert!(result.evidence.is_empty());
    }

    #[test]
    fn wraparound_is_a_small_step() {
        let samples = SequenceBuilder::new(16)
            .look(0.0, 179.0)
            .hold(1)
            .look(0.0, -179.0)
            .hold(1)
            .build();
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn single_sample_is_empty() {
        let samples = SequenceBuilder::new(16).hold(1).build();
        let result = evaluate(&samples);
        assert_eq!(result.rule_name, NAME);
        assert_eq!(result.confidence, 0.0);
    }
}
