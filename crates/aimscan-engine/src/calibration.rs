//! Baseline calibration from known-clean players.
//!
//! Calibration is a capability: only analyzers implementing
//! [`SupportsCalibration`] can be calibrated, and callers that need it
//! take the trait rather than probing at runtime. [`CalibratedAnalyzer`]
//! is the one implementation. It wraps an [`Analyzer`], seeds its
//! threshold from a [`CalibrationProfile`], and replaces it with a
//! data-driven one after [`calibrate`](SupportsCalibration::calibrate).

use indexmap::IndexMap;

use aimscan_core::{DetectionResult, PlayerRecord};

use crate::analyzer::Analyzer;
use crate::config::{AnalyzerConfig, ConfigError};
use crate::error::AnalysisError;
use crate::report::PlayerReport;

/// Bounds for a calibrated overall threshold.
const OVERALL_THRESHOLD_RANGE: (f32, f32) = (0.05, 0.95);

/// Standard deviations above the clean mean a baseline sits.
const BASELINE_SIGMAS: f32 = 2.0;

// ── CalibrationProfile ─────────────────────────────────────────────

/// Preset verdict thresholds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CalibrationProfile {
    /// Threshold 0.7.
    #[default]
    Default,
    /// Threshold 0.8, for skilled lobbies.
    Competitive,
    /// Threshold 0.6.
    Casual,
}

impl CalibrationProfile {
    /// The preset threshold.
    pub fn threshold(self) -> f32 {
        match self {
            Self::Default => 0.7,
            Self::Competitive => 0.8,
            Self::Casual => 0.6,
        }
    }

    /// Look up a profile by case-insensitive name. Unknown names map to
    /// [`Default`](Self::Default).
    pub fn from_name(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "competitive" => Self::Competitive,
            "casual" => Self::Casual,
            _ => Self::Default,
        }
    }
}

// ── Calibration ────────────────────────────────────────────────────

/// Baselines learned from clean players.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Calibration {
    /// Per-rule confidence baseline (mean + 2σ), keyed by rule name.
    pub rule_thresholds: IndexMap<String, f32>,
    /// Overall probability threshold, within `[0.05, 0.95]`.
    pub overall_threshold: f32,
    /// Clean players that contributed.
    pub players_used: usize,
}

impl Calibration {
    /// Baseline for `rule_name`, if the rule was seen during calibration.
    pub fn rule_threshold(&self, rule_name: &str) -> Option<f32> {
        self.rule_thresholds.get(rule_name).copied()
    }
}

// ── SupportsCalibration ────────────────────────────────────────────

/// Analyzers that can learn baselines from clean data.
pub trait SupportsCalibration {
    /// Learn baselines from `clean_players` and adopt the resulting
    /// overall threshold.
    ///
    /// With no usable players (none with enough samples) the current
    /// threshold is kept and the calibration records zero players.
    fn calibrate(&mut self, clean_players: &[PlayerRecord]) -> Result<&Calibration, AnalysisError>;

    /// The most recent calibration, if any.
    fn calibration(&self) -> Option<&Calibration>;
}

// ── CalibratedAnalyzer ─────────────────────────────────────────────

/// An [`Analyzer`] with a profile-seeded, calibratable threshold.
///
/// # Examples
///
/// ```
/// use aimscan_engine::{AnalyzerConfig, CalibratedAnalyzer, CalibrationProfile, SupportsCalibration};
/// use aimscan_test_utils::fixtures::roster;
///
/// let mut analyzer =
///     CalibratedAnalyzer::new(CalibrationProfile::Competitive, AnalyzerConfig::default())?;
/// assert_eq!(analyzer.threshold(), 0.8);
///
/// let clean = roster(1, 4, 0, 200);
/// let calibration = analyzer.calibrate(&clean)?;
/// assert_eq!(calibration.players_used, 4);
/// assert!((0.05..=0.95).contains(&analyzer.threshold()));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct CalibratedAnalyzer {
    profile: CalibrationProfile,
    analyzer: Analyzer,
    calibration: Option<Calibration>,
}

impl CalibratedAnalyzer {
    /// Create an analyzer whose threshold comes from `profile`,
    /// overriding `config.threshold`.
    pub fn new(profile: CalibrationProfile, config: AnalyzerConfig) -> Result<Self, ConfigError> {
        let config = AnalyzerConfig {
            threshold: profile.threshold(),
            ..config
        };
        Ok(Self {
            profile,
            analyzer: Analyzer::new(config)?,
            calibration: None,
        })
    }

    /// The seeding profile.
    pub fn profile(&self) -> CalibrationProfile {
        self.profile
    }

    /// The current verdict threshold.
    pub fn threshold(&self) -> f32 {
        self.analyzer.threshold()
    }

    /// The wrapped analyzer.
    pub fn analyzer(&self) -> &Analyzer {
        &self.analyzer
    }

    /// Evaluate every player with enough samples against the current
    /// threshold.
    pub fn analyze_players(
        &mut self,
        players: &[PlayerRecord],
    ) -> Result<Vec<PlayerReport>, AnalysisError> {
        self.analyzer.analyze_players(players)
    }

    /// Rules in `report` whose confidence exceeds their calibrated
    /// baseline. Empty before calibration.
    pub fn above_baseline<'r>(&self, report: &'r PlayerReport) -> Vec<&'r DetectionResult> {
        let Some(calibration) = &self.calibration else {
            return Vec::new();
        };
        report
            .results
            .iter()
            .filter(|r| {
                calibration
                    .rule_threshold(&r.rule_name)
                    .is_some_and(|t| r.confidence > t)
            })
            .collect()
    }
}

impl SupportsCalibration for CalibratedAnalyzer {
    fn calibrate(&mut self, clean_players: &[PlayerRecord]) -> Result<&Calibration, AnalysisError> {
        let reports = self.analyzer.analyze_players(clean_players)?;

        let mut confidences: IndexMap<String, Vec<f32>> = IndexMap::new();
        for result in reports.iter().flat_map(|r| &r.results) {
            confidences
                .entry(result.rule_name.clone())
                .or_default()
                .push(result.confidence);
        }
        let rule_thresholds: IndexMap<String, f32> = confidences
            .into_iter()
            .map(|(rule, values)| {
                let threshold = baseline(&values);
                log::debug!("baseline for '{rule}': {threshold:.3}");
                (rule, threshold)
            })
            .collect();

        let overall_threshold = if reports.is_empty() {
            log::warn!("calibration found no usable clean players; keeping threshold");
            self.analyzer.threshold()
        } else {
            let probabilities: Vec<f32> = reports.iter().map(|r| r.cheating_probability).collect();
            let (lo, hi) = OVERALL_THRESHOLD_RANGE;
            baseline(&probabilities).clamp(lo, hi)
        };
        self.analyzer.set_threshold(overall_threshold);
        log::info!(
            "calibrated from {} clean players: threshold {:.3}",
            reports.len(),
            overall_threshold
        );

        Ok(self.calibration.insert(Calibration {
            rule_thresholds,
            overall_threshold,
            players_used: reports.len(),
        }))
    }

    fn calibration(&self) -> Option<&Calibration> {
        self.calibration.as_ref()
    }
}

/// Mean plus two sample standard deviations (σ = 0 for one value).
fn baseline(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let n = values.len() as f32;
    let mean = values.iter().sum::<f32>() / n;
    let sd = if values.len() <= 1 {
        0.0
    } else {
        (values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / (n - 1.0)).sqrt()
    };
    mean + BASELINE_SIGMAS * sd
}
