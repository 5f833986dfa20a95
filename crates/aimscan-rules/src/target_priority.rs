//! Target priority: perfect tracking, precise target switches, and
//! nearest-first target selection.
//!
//! Three independent event families feed one result:
//!
//! 1. tracking runs whose mean targeting error is below
//!    [`TRACKING_THRESHOLD`];
//! 2. target switches that land within [`SNAP_THRESHOLD`] at speed;
//! 3. one prioritization event when at least [`MIN_SWITCHES`] switches
//!    mostly picked the nearest visible enemy.
//!
//! Evidence from all three is merged in ascending timestamp order.

use aimscan_core::{angle_difference, AimSample, DetectionResult, Evidence, Vec3, ViewAngles};
use smallvec::SmallVec;

use crate::runs::sample_runs;

/// Rule name.
pub const NAME: &str = "Target Priority Detection";
/// Rule description.
pub const DESCRIPTION: &str = "Detects unnatural target selection patterns typical of aimbots";
/// Minimum samples to evaluate.
pub const MIN_SAMPLES: usize = 20;
/// Mean tracking error below which tracking is suspicious (degrees).
pub const TRACKING_THRESHOLD: f32 = 0.5;
/// Post-switch error below which a switch is suspicious (degrees).
pub const SNAP_THRESHOLD: f32 = 2.0;
/// Switch speed above which a switch is suspicious (degrees/ms).
pub const SNAP_SPEED: f32 = 0.2;
/// Nearest-first ratio above which selection is suspicious.
pub const PRIORITY_THRESHOLD: f32 = 0.8;
/// Minimum switches for the prioritization check.
pub const MIN_SWITCHES: usize = 5;

/// Targeting error under which a sample counts as tracking (degrees).
const TRACKING_CONE: f32 = 10.0;
/// Largest gap joining two tracking samples (ms).
const TRACKING_GAP_MS: i32 = 100;
/// Kept and analyzed tracking-run lengths.
const MIN_TRACKING_RUN: usize = 5;
const ANALYZED_TRACKING_RUN: usize = 10;
/// Enemy displacement that marks a different target (units).
const SWITCH_DISTANCE: f32 = 50.0;
/// Sample and time window searched for alternative targets.
const CANDIDATE_SPAN: usize = 30;
const CANDIDATE_WINDOW_MS: i32 = 500;
/// Enemies closer than this are the same candidate (units).
const CANDIDATE_MERGE: f32 = 50.0;

/// A sample where the nearest enemy changed relative to two samples back.
#[derive(Clone, Copy, Debug)]
struct Switch {
    index: usize,
    timestamp: i32,
    view_angles: ViewAngles,
    accuracy: f32,
    speed: f32,
}

/// Evaluate all three event families.
pub fn evaluate(samples: &[AimSample]) -> DetectionResult {
    if samples.len() < MIN_SAMPLES {
        return DetectionResult::empty(NAME, DESCRIPTION);
    }

    let mut evidence = Vec::new();

    for run in tracking_runs(samples) {
        if run.len() < ANALYZED_TRACKING_RUN {
            continue;
        }
        let error = run.iter().filter_map(AimSample::angle_to_target).sum::<f32>() / run.len() as f32;
        if error < TRACKING_THRESHOLD {
            evidence.push(Evidence::new(
                run[0].timestamp,
                format!("perfect enemy tracking: {error:.2}° average error"),
                1.0 - error / TRACKING_THRESHOLD,
                run[0].view_angles,
            ));
        }
    }

    let switches = target_switches(samples);
    for s in &switches {
        if s.accuracy < SNAP_THRESHOLD && s.speed > SNAP_SPEED {
            evidence.push(Evidence::new(
                s.timestamp,
                format!(
                    "target switch: {:.2}° accuracy at {:.2}°/ms",
                    s.accuracy, s.speed
                ),
                (1.0 - s.accuracy / SNAP_THRESHOLD) * (s.speed * 2.0).min(1.0),
                s.view_angles,
            ));
        }
    }

    if switches.len() >= MIN_SWITCHES {
        let score = prioritization_score(samples, &switches);
        if score > PRIORITY_THRESHOLD {
            let mid = &samples[samples.len() / 2];
            evidence.push(Evidence::new(
                mid.timestamp,
                format!("nearest-first target selection: {score:.2} correlation"),
                score,
                mid.view_angles,
            ));
        }
    }

    evidence.sort_by_key(|e| e.timestamp);
    DetectionResult::from_evidence(NAME, DESCRIPTION, evidence)
}

fn tracking_runs(samples: &[AimSample]) -> Vec<&[AimSample]> {
    let mut runs = sample_runs(
        samples,
        |s| s.angle_to_target().is_some_and(|a| a < TRACKING_CONE),
        |prev, cur| cur.elapsed_since(prev) <= i64::from(TRACKING_GAP_MS),
    );
    runs.retain(|r| r.len() >= MIN_TRACKING_RUN);
    runs
}

fn target_switches(samples: &[AimSample]) -> Vec<Switch> {
    let mut switches = Vec::new();
    for i in 2..samples.len() {
        let (before, cur) = (&samples[i - 2], &samples[i]);
        let (Some(old), Some(new)) = (before.target, cur.target) else {
            continue;
        };
        if old.position.distance(new.position) <= SWITCH_DISTANCE {
            continue;
        }
        let dt = cur.elapsed_since(before);
        let speed = if dt > 0 {
            angle_difference(before.view_angles, cur.view_angles) / dt as f32
        } else {
            0.0
        };
        switches.push(Switch {
            index: i,
            timestamp: cur.timestamp,
            view_angles: cur.view_angles,
            accuracy: new.angle_to_target.magnitude,
            speed,
        });
    }
    switches
}

/// Fraction of switches (after the first) whose chosen enemy was within
/// [`CANDIDATE_MERGE`] of the nearest candidate's distance.
fn prioritization_score(samples: &[AimSample], switches: &[Switch]) -> f32 {
    if switches.is_empty() {
        return 0.0;
    }
    let mut nearest_first = 0usize;
    for s in switches.iter().skip(1) {
        let Some(selected) = samples[s.index].target else {
            continue;
        };
        let candidates = candidates_near(samples, s.index);
        if candidates.len() <= 1 {
            continue;
        }
        let closest = candidates
            .iter()
            .map(|(_, d)| *d)
            .fold(f32::INFINITY, f32::min);
        if (selected.distance - closest).abs() < CANDIDATE_MERGE {
            nearest_first += 1;
        }
    }
    nearest_first as f32 / switches.len() as f32
}

/// Distinct visible enemies around `index`, as `(position, distance)`.
fn candidates_near(samples: &[AimSample], index: usize) -> SmallVec<[(Vec3, f32); 8]> {
    let at = &samples[index];
    let lo = index.saturating_sub(CANDIDATE_SPAN);
    let hi = (index + CANDIDATE_SPAN).min(samples.len());
    let mut found: SmallVec<[(Vec3, f32); 8]> = SmallVec::new();
    for sample in &samples[lo..hi] {
        if sample.elapsed_since(at).abs() > i64::from(CANDIDATE_WINDOW_MS) {
            continue;
        }
        let Some(target) = sample.target else {
            continue;
        };
        if found
            .iter()
            .all(|(p, _)| p.distance(target.position) >= CANDIDATE_MERGE)
        {
            found.push((target.position, target.distance));
        }
    }
    found
}
