//! Aim lock: the view pinned to one direction for an extended period.

use aimscan_core::{angle_delta, angle_difference, AimSample, DetectionResult, Evidence, ViewAngles};

/// Rule name.
pub const NAME: &str = "Aim Lock Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects aim lock behavior typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 10;
/// Minimum lock-run length.
pub const MIN_RUN: usize = 5;
/// Shortest lock worth flagging (ms).
pub const MIN_LOCK_DURATION_MS: i32 = 500;
/// Largest deviation from the reference direction (degrees).
pub const MAX_LOCK_VARIATION: f32 = 0.5;
/// Lock strength above which a run is flagged.
pub const STRENGTH_THRESHOLD: f32 = 0.7;

/// Flag lock runs lasting at least [`MIN_LOCK_DURATION_MS`] whose
/// strength exceeds [`STRENGTH_THRESHOLD`]. Severity is the strength.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    for run in lock_runs(samples) {
        let duration = run[run.len() - 1].elapsed_since(&run[0]);
        let strength = lock_strength(run);
        if duration >= i64::from(MIN_LOCK_DURATION_MS) && strength > STRENGTH_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("aim lock: {duration}ms, {strength:.2} strength"),
                strength,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

/// Runs of samples within [`MAX_LOCK_VARIATION`] of the run's first
/// sample. The sample that breaks a run starts the next one.
fn lock_runs(samples: &[AimSample]) -> Vec<&[AimSample]> {
    let mut runs = Vec::new();
    let mut start = 0;
    for i in 1..samples.len() {
        let reference = samples[start].view_angles;
        if angle_difference(reference, samples[i].view_angles) >= MAX_LOCK_VARIATION {
            if i - start >= MIN_RUN {
                runs.push(&samples[start..i]);
            }
            start = i;
        }
    }
    if samples.len() - start >= MIN_RUN {
        runs.push(&samples[start..]);
    }
    runs
}

/// `1 - mean distance from the run's center / MAX_LOCK_VARIATION`,
/// floored at zero. The center is the mean direction, averaged as
/// wrapped offsets from the first sample.
fn lock_strength(run: &[AimSample]) -> f32 {
    if run.len() < 3 {
        return 0.0;
    }
    let reference = run[0].view_angles;
    let n = run.len() as f32;
    let (sp, sy) = run.iter().fold((0.0f32, 0.0f32), |(sp, sy), s| {
        let (dp, dy) = angle_delta(reference, s.view_angles);
        (sp + dp, sy + dy)
    });
    let center = ViewAngles::new(reference.pitch + sp / n, reference.yaw + sy / n);
    let avg = run
        .iter()
        .map(|s| angle_difference(center, s.view_angles))
        .sum::<f32>()
        / n;
    (1.0 - avg / MAX_LOCK_VARIATION).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::SequenceBuilder;

    fn alternating(n: usize, interval: i32, offset: f32) -> Vec<AimSample> {
        let mut b = SequenceBuilder::new(interval);
        for i in 0..n {
            let yaw = if i % 2 == 0 { 10.0 } else { 10.0 + offset };
            b = b.look(0.0, yaw).hold(1);
        }
        b.build()
    }

    #[test]
    fn steady_lock_is_flagged() {
        let samples = alternating(12, 50, 0.2);
        let result = evaluate(&samples);
        assert_eq!(result.evidence.len(), 1);
        // center 10.1, mean distance 0.1
        assert!((result.evidence[0].severity - (1.0 - 0.1 / 0.5)).abs() < 1e-3);
        assert!(result.confidence > 0.0);
    }

    #[test]
    fn lock_of_exactly_min_duration_counts() {
        let samples = alternating(11, 50, 0.2);
        assert_eq!(samples[10].timestamp - samples[0].timestamp, 500);
        assert!(evaluate(&samples).is_flagged());
    }

    #[test]
    fn brief_lock_is_clean() {
        let samples = alternating(12, 20, 0.2);
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn loose_lock_is_clean() {
        // mean distance 0.2 from center gives strength 0.6
        let samples = alternating(12, 50, 0.4);
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn sweeping_aim_has_no_runs() {
        let samples = SequenceBuilder::new(50).turn(20, 0.0, 1.0).build();
        assert!(lock_runs(&samples).is_empty());
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn breaking_sample_starts_next_run() {
        let samples = SequenceBuilder::new(100)
            .hold(6)
            .look(0.0, 5.0)
            .hold(6)
            .build();
        let runs = lock_runs(&samples);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[1][0].timestamp, samples[6].timestamp);
    }
}
