//! Run extraction shared by the rules.
//!
//! A run is a scan-ordered group of samples that share some property
//! (firing, holding still, tracking a moving enemy). Rules extract runs,
//! drop the short ones, and score the rest.

use aimscan_core::{angle_difference, AimSample};

/// Samples of one pair-driven run, in scan order.
pub(crate) type Run<'a> = Vec<&'a AimSample>;

/// Decision for one consecutive sample pair in [`pair_runs`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum PairStep {
    /// The pair belongs to the current run.
    Extend,
    /// The pair closes the current run.
    Break,
    /// Ignore the pair entirely.
    Skip,
}

/// Maximal slices of consecutive samples satisfying `keep`.
///
/// A slice is also split between two kept samples when `joins(prev, cur)`
/// is false.
pub(crate) fn sample_runs<'a>(
    samples: &'a [AimSample],
    keep: impl Fn(&AimSample) -> bool,
    joins: impl Fn(&AimSample, &AimSample) -> bool,
) -> Vec<&'a [AimSample]> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (i, sample) in samples.iter().enumerate() {
        if !keep(sample) {
            if let Some(s) = start.take() {
                runs.push(&samples[s..i]);
            }
            continue;
        }
        match start {
            Some(s) if !joins(&samples[i - 1], sample) => {
                runs.push(&samples[s..i]);
                start = Some(i);
            }
            Some(_) => {}
            None => start = Some(i),
        }
    }
    if let Some(s) = start {
        runs.push(&samples[s..]);
    }
    runs
}

/// Runs built from consecutive pairs.
///
/// An `Extend` pair appends its second sample, and opens the run with the
/// first sample when the run is empty. A `Break` pair closes any open run.
pub(crate) fn pair_runs<'a>(
    samples: &'a [AimSample],
    step: impl Fn(&AimSample, &AimSample) -> PairStep,
) -> Vec<Run<'a>> {
    let mut runs = Vec::new();
    let mut current: Run<'a> = Vec::new();
    for pair in samples.windows(2) {
        match step(&pair[0], &pair[1]) {
            PairStep::Extend => {
                if current.is_empty() {
                    current.push(&pair[0]);
                }
                current.push(&pair[1]);
            }
            PairStep::Break => {
                if !current.is_empty() {
                    runs.push(std::mem::take(&mut current));
                }
            }
            PairStep::Skip => {}
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}

/// Wrap-aware angular speed from `prev` to `cur` in degrees/ms, or `None`
/// when time does not advance.
pub(crate) fn angular_speed(prev: &AimSample, cur: &AimSample) -> Option<f32> {
    let dt = cur.elapsed_since(prev);
    if dt <= 0 {
        return None;
    }
    Some(angle_difference(prev.view_angles, cur.view_angles) / dt as f32)
}

/// Arithmetic mean, or `None` for an empty slice.
pub(crate) fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

/// Population standard deviation around `mean`.
pub(crate) fn population_std_dev(values: &[f32], mean: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32;
    var.sqrt()
}
