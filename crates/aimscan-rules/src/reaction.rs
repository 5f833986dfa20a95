//! Reaction time: a large turn settling onto a target faster than a
//! human could react.

use aimscan_core::{angle_difference, AimSample, DetectionResult, Evidence};

/// Rule name.
pub const NAME: &str = "Reaction Time Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects reaction times faster than human capabilities";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 10;
/// Fastest plausible human reaction (ms).
pub const MIN_HUMAN_REACTION_MS: i32 = 150;
/// Turn that counts as a reaction (degrees).
pub const REACTION_TURN: f32 = 10.0;
/// Follow-up adjustment that counts as settled (degrees).
pub const SETTLE_THRESHOLD: f32 = 2.0;

/// Scan sample triples `(a, b, c)`: a turn of more than
/// [`REACTION_TURN`] from `a` to `b`, a settle below
/// [`SETTLE_THRESHOLD`] from `b` to `c`, and firing at `c`.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();
    for w in samples.windows(3) {
        let turn = angle_difference(w[0].view_angles, w[1].view_angles);
        let settle = angle_difference(w[1].view_angles, w[2].view_angles);
        if turn <= REACTION_TURN || settle >= SETTLE_THRESHOLD || !w[2].is_firing {
            continue;
        }
        let elapsed = w[2].elapsed_since(&w[0]);
        if elapsed > 0 && elapsed < i64::from(MIN_HUMAN_REACTION_MS) {
            evidence.push(Evidence::new(
                w[2].timestamp,
                format!("fast reaction: {elapsed}ms"),
                1.0 - elapsed as f32 / MIN_HUMAN_REACTION_MS as f32,
                w[2].view_angles,
            ));
        }
    }
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}
