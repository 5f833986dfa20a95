//! Smoothness analysis: movement whose speed profile follows a simple
//! mathematical curve.
//!
//! Each movement run's angular speeds are fitted three ways (linear
//! regression, constant-ratio decay, alternation) and the best fit is
//! the run's score.

use aimscan_core::{angle_difference, AimSample, DetectionResult, Evidence};

use crate::runs::{angular_speed, mean, pair_runs, population_std_dev, PairStep, Run};

/// Rule name.
pub const NAME: &str = "Smoothness Analysis";
/// Rule description.
pub const DESCRIPTION: &str = "Detects artificial smoothing typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 30;
/// Minimum movement-run length.
pub const MIN_RUN: usize = 10;
/// Fit score above which a run is suspicious.
pub const SCORE_THRESHOLD: f32 = 0.7;

/// Per-pair movement that keeps a run going (degrees).
const MOVEMENT_THRESHOLD: f32 = 0.1;
/// Minimum speed measurements per run.
const MIN_SPEEDS: usize = 5;
/// Score of an alternating speed profile.
const ALTERNATION_SCORE: f32 = 0.8;

/// Score every movement run and flag those above [`SCORE_THRESHOLD`].
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    for run in movement_runs(samples) {
        if run.len() < MIN_RUN {
            continue;
        }
        let score = run_score(&run);
        if score > SCORE_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("artificial smoothing: {score:.2} similarity to a curve"),
                score,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

fn movement_runs(samples: &[AimSample]) -> Vec<Run<'_>> {
    pair_runs(samples, |prev, cur| {
        if cur.timestamp <= prev.timestamp {
            PairStep::Skip
        } else if angle_difference(prev.view_angles, cur.view_angles) > MOVEMENT_THRESHOLD {
            PairStep::Extend
        } else {
            PairStep::Break
        }
    })
}

fn run_score(run: &[&AimSample]) -> f32 {
    let speeds: Vec<f32> = run
        .windows(2)
        .filter_map(|p| angular_speed(p[0], p[1]))
        .collect();
    if speeds.len() < MIN_SPEEDS {
        return 0.0;
    }
    linear_fit(&speeds)
        .max(decay_fit(&speeds))
        .max(alternation_fit(&speeds))
}

/// R² of a least-squares line through `(i, v[i])`.
fn linear_fit(v: &[f32]) -> f32 {
    let n = v.len() as f32;
    let (mut sx, mut sy, mut sxy, mut sx2) = (0.0f32, 0.0f32, 0.0f32, 0.0f32);
    for (i, &y) in v.iter().enumerate() {
        let x = i as f32;
        sx += x;
        sy += y;
        sxy += x * y;
        sx2 += x * x;
    }
    let denom = n * sx2 - sx * sx;
    if denom == 0.0 {
        return 0.0;
    }
    let slope = (n * sxy - sx * sy) / denom;
    let intercept = (sy - slope * sx) / n;
    let avg = sy / n;

    let (mut explained, mut residual) = (0.0f32, 0.0f32);
    for (i, &y) in v.iter().enumerate() {
        let predicted = intercept + slope * i as f32;
        explained += (predicted - avg) * (predicted - avg);
        residual += (y - predicted) * (y - predicted);
    }
    let total = explained + residual;
    if total > 0.0 {
        explained / total
    } else {
        0.0
    }
}

/// Consistency of successive ratios for a non-increasing profile.
fn decay_fit(v: &[f32]) -> f32 {
    if v.windows(2).any(|p| p[1] > p[0]) {
        return 0.0;
    }
    let ratios: Vec<f32> = v
        .windows(2)
        .filter(|p| p[0] > 0.0)
        .map(|p| p[1] / p[0])
        .collect();
    if ratios.len() < 3 {
        return 0.0;
    }
    let Some(avg) = mean(&ratios).filter(|m| *m > 0.0) else {
        return 0.0;
    };
    1.0 - (population_std_dev(&ratios, avg) / avg).min(1.0)
}

/// Fixed score when the profile changes direction at a moderate rate.
fn alternation_fit(v: &[f32]) -> f32 {
    if v.len() < 3 {
        return 0.0;
    }
    let mut rising = v[1] > v[0];
    let mut alternations = 0usize;
    for p in v[1..].windows(2) {
        let now = p[1] > p[0];
        if now != rising {
            alternations += 1;
            rising = now;
        }
    }
    let ratio = alternations as f32 / (v.len() - 2) as f32;
    if ratio > 0.3 && ratio < 0.7 {
        ALTERNATION_SCORE
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::SequenceBuilder;

    #[test]
    fn accelerating_sweep_is_flagged() {
        let mut b = SequenceBuilder::new(16).hold(20);
        for k in 0..12 {
            b = b.turn(1, 0.0, 1.0 + 0.25 * k as f32);
        }
        let samples = b.hold(5).build();
        let result = evaluate(&samples);
        assert_eq!(result.evidence.len(), 1);
        assert!(result.confidence > 0.95);
        assert_eq!(result.evidence[0].timestamp, samples[19].timestamp);
    }

    #[test]
    fn geometric_decay_fits() {
        let v = [1.0, 0.5, 0.25, 0.125, 0.0625, 0.03125];
        assert!((decay_fit(&v) - 1.0).abs() < 1e-5);
        assert_eq!(decay_fit(&[1.0, 2.0, 1.0, 0.5]), 0.0);
    }

    #[test]
    fn linear_fit_of_a_line_is_one() {
        let v: Vec<f32> = (0..10).map(|i| 0.1 + 0.05 * i as f32).collect();
        assert!((linear_fit(&v) - 1.0).abs() < 1e-4);
        assert_eq!(linear_fit(&[0.5; 8]), 0.0);
    }

    #[test]
    fn alternation_band() {
        // rise, rise, fall, fall, rise, rise, fall: 3 changes over 6
        let v = [1.0, 2.0, 3.0, 2.0, 1.0, 2.0, 3.0, 2.0];
        assert_eq!(alternation_fit(&v), ALTERNATION_SCORE);
        // strict zig-zag alternates every step
        let z = [1.0, 2.0, 1.0, 2.0, 1.0, 2.0];
        assert_eq!(alternation_fit(&z), 0.0);
    }

    #[test]
    fn stillness_has_no_runs() {
        let samples = SequenceBuilder::new(16).hold(40).build();
        assert!(!evaluate(&samples).is_flagged());
    }

    #[test]
    fn short_runs_are_ignored() {
        let samples = SequenceBuilder::new(16)
            .hold(10)
            .turn(6, 0.0, 2.0)
            .hold(10)
            .turn(6, 0.0, 2.0)
            .hold(10)
            .build();
        assert!(!evaluate(&samples).is_flagged());
    }
}
