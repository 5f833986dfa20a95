//! Aim jitter: holding still without the micro-movements a hand makes.

use aimscan_core::{angle_delta, angle_difference, AimSample, DetectionResult, Evidence};

use crate::runs::{pair_runs, PairStep, Run};

/// Rule name.
pub const NAME: &str = "Aim Jitter Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects unnaturally smooth aim lacking human micro-movements";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 30;
/// Minimum holding-run length.
pub const MIN_RUN: usize = 10;
/// Per-pair movement under which the player is holding still (degrees).
pub const HOLD_THRESHOLD: f32 = 0.5;
/// Jitter below which holding is suspicious (degrees).
pub const MIN_HUMAN_JITTER: f32 = 0.02;

/// Flag holding runs whose mean second difference of view angle falls
/// below [`MIN_HUMAN_JITTER`].
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let runs = pair_runs(samples, |prev, cur| {
        if angle_difference(prev.view_angles, cur.view_angles) < HOLD_THRESHOLD {
            PairStep::Extend
        } else {
            PairStep::Break
        }
    });

    let mut evidence = Vec::new();
    for run in runs.iter().filter(|r| r.len() >= MIN_RUN) {
        let amount = jitter(run);
        if amount < MIN_HUMAN_JITTER {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("stable aim: {amount:.4}° jitter"),
                1.0 - amount / MIN_HUMAN_JITTER,
                run[0].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

/// Mean magnitude of the change between successive wrapped angle deltas.
fn jitter(run: &Run<'_>) -> f32 {
    if run.len() < 3 {
        return f32::MAX;
    }
    let total: f32 = run
        .windows(3)
        .map(|w| {
            let (p1, y1) = angle_delta(w[0].view_angles, w[1].view_angles);
            let (p2, y2) = angle_delta(w[1].view_angles, w[2].view_angles);
            let (dp, dy) = (p2 - p1, y2 - y1);
            (dp * dp + dy * dy).sqrt()
        })
        .sum();
    total / (run.len() - 2) as f32
}
