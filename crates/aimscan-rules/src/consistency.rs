//! Aim consistency: angular speed that barely varies over a session.

use aimscan_core::{AimSample, DetectionResult, Evidence};

use crate::runs::{angular_speed, mean, population_std_dev};

/// Rule name.
pub const NAME: &str = "Aim Consistency Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects unnaturally consistent aim typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 30;
/// Minimum speed measurements.
pub const MIN_SPEEDS: usize = 10;
/// Coefficient of variation below which aim is suspicious.
pub const CV_THRESHOLD: f32 = 0.6;

/// Coefficient of variation of the session's angular speeds. A player
/// who never moves has no meaningful variation and is not scored.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }
    let speeds: Vec<f32> = samples
        .windows(2)
        .filter_map(|p| angular_speed(&p[0], &p[1]))
        .collect();
    if speeds.len() < MIN_SPEEDS {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }
    let Some(avg) = mean(&speeds).filter(|m| *m > 0.0) else {
        return DetectionResult::empty(NAME, DESCRIPTION);
    };

    let cv = population_std_dev(&speeds, avg) / avg;
    if cv >= CV_THRESHOLD {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }
    let mid = &samples[samples.len() / 2];
    let evidence = vec![Evidence::new(
        mid.timestamp,
        format!("consistent aim: CV={cv:.2}"),
        1.0 - cv / CV_THRESHOLD,
        mid.view_angles,
    )];
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}
