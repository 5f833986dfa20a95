//! Rule evaluation and verdicts.
//!
//! [`Analyzer`] runs the detection rules over decoded players and folds
//! each player's results into a [`PlayerReport`]. With more than one
//! worker, every `(player, rule)` pair becomes an independent task on
//! the evaluation pool; otherwise rules run in order on the calling
//! thread. Both paths produce identical reports.
//!
//! # Cancellation
//!
//! An attached [`CancelToken`] is checked before each rule starts. A
//! cancelled call returns [`AnalysisError::Cancelled`] and no reports.

use std::time::Instant;

use aimscan_core::{AimSample, CancelToken, DetectionResult, PlayerRecord, MIN_PLAYER_SAMPLES};
use aimscan_demo::Replay;
use aimscan_rules::Rule;

use crate::config::{AnalyzerConfig, ConfigError};
use crate::error::AnalysisError;
use crate::metrics::AnalysisMetrics;
use crate::pool::{self, RuleOutcome};
use crate::report::PlayerReport;
use crate::statistics::{PlayerStatistics, TeamAverages};

// Compile-time assertion: Analyzer can be moved to another thread.
const _: fn() = || {
    fn assert_send<T: Send>() {}
    assert_send::<Analyzer>();
};

/// Evaluates detection rules and produces per-player verdicts.
///
/// # Examples
///
/// ```
/// use aimscan_engine::{Analyzer, AnalyzerConfig};
/// use aimscan_test_utils::fixtures::aimbot_aim;
/// use aimscan_core::PlayerRecord;
///
/// let mut analyzer = Analyzer::new(AnalyzerConfig::default())?;
/// let bot = PlayerRecord::with_samples(4, "bot", 2, aimbot_aim(7, 400));
/// let report = analyzer.analyze_player(&bot)?;
/// assert_eq!(report.results.len(), 10);
/// assert!(report.cheating_probability > 0.0);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct Analyzer {
    config: AnalyzerConfig,
    rules: Vec<Rule>,
    cancel: Option<CancelToken>,
    last_metrics: AnalysisMetrics,
}

impl Analyzer {
    /// Create an analyzer running all ten rules.
    ///
    /// Validates `config` first.
    pub fn new(config: AnalyzerConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            rules: Rule::ALL.to_vec(),
            cancel: None,
            last_metrics: AnalysisMetrics::default(),
        })
    }

    /// Attach a cancel token checked between rules.
    pub fn with_cancel(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Restrict evaluation to `rules`, evaluated in the given order.
    ///
    /// The aggregate only covers the rules that ran.
    pub fn with_rules(mut self, rules: &[Rule]) -> Self {
        self.rules = rules.to_vec();
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }

    /// The verdict threshold.
    pub fn threshold(&self) -> f32 {
        self.config.threshold
    }

    pub(crate) fn set_threshold(&mut self, threshold: f32) {
        self.config.threshold = threshold;
    }

    /// Rules evaluated, in result order.
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Metrics from the most recent analysis call.
    pub fn last_metrics(&self) -> &AnalysisMetrics {
        &self.last_metrics
    }

    /// Weighted aggregate confidence of `results`.
    pub fn cheating_probability(&self, results: &[DetectionResult]) -> f32 {
        self.config.weights.aggregate(results)
    }

    /// Evaluate every rule over one sample sequence on the calling thread.
    ///
    /// Returns no results for fewer than [`MIN_PLAYER_SAMPLES`] samples.
    pub fn evaluate(&mut self, samples: &[AimSample]) -> Result<Vec<DetectionResult>, AnalysisError> {
        let started = Instant::now();
        let mut metrics = AnalysisMetrics::default();
        let results = if samples.len() < MIN_PLAYER_SAMPLES {
            Vec::new()
        } else {
            metrics.players_analyzed = 1;
            self.evaluate_sequential(samples, &mut metrics)?
        };
        metrics.total_us = started.elapsed().as_micros() as u64;
        self.last_metrics = metrics;
        Ok(results)
    }

    /// Evaluate one player and build its report.
    ///
    /// A player below [`MIN_PLAYER_SAMPLES`] gets an empty, unflagged
    /// report.
    pub fn analyze_player(&mut self, player: &PlayerRecord) -> Result<PlayerReport, AnalysisError> {
        let results = self.evaluate(player.samples())?;
        let report = self.report(player, results);
        log_verdict(&report);
        Ok(report)
    }

    /// Evaluate every player with enough samples.
    ///
    /// Reports follow the input order; short players are skipped. With
    /// more than one configured worker the rules run in parallel. Each
    /// report carries the averages of its team across this batch.
    pub fn analyze_players(
        &mut self,
        players: &[PlayerRecord],
    ) -> Result<Vec<PlayerReport>, AnalysisError> {
        let started = Instant::now();
        let mut metrics = AnalysisMetrics::default();

        let eligible: Vec<&PlayerRecord> = players
            .iter()
            .filter(|p| {
                let keep = p.len() >= MIN_PLAYER_SAMPLES;
                if !keep {
                    log::debug!(
                        "skipping player {} ({}): {} samples",
                        p.client_id,
                        p.name,
                        p.len()
                    );
                }
                keep
            })
            .collect();

        let workers = self.config.resolved_worker_count();
        let all_results: Vec<Vec<DetectionResult>> = if workers > 1 && !eligible.is_empty() {
            let sample_sets: Vec<&[AimSample]> = eligible.iter().map(|p| p.samples()).collect();
            let outcomes =
                pool::evaluate_parallel(&sample_sets, &self.rules, workers, self.cancel.as_ref())?;
            outcomes
                .into_iter()
                .map(|row| collect_outcomes(&self.rules, row, &mut metrics))
                .collect()
        } else {
            eligible
                .iter()
                .map(|p| self.evaluate_sequential(p.samples(), &mut metrics))
                .collect::<Result<_, _>>()?
        };

        let mut reports: Vec<PlayerReport> = eligible
            .iter()
            .zip(all_results)
            .map(|(player, results)| {
                let report = self.report(player, results);
                log_verdict(&report);
                report
            })
            .collect();
        attach_team_averages(&mut reports);

        metrics.players_analyzed = reports.len() as u64;
        metrics.total_us = started.elapsed().as_micros() as u64;
        log::info!(
            "analyzed {} of {} players in {}us with {} worker(s): {} flagged",
            reports.len(),
            players.len(),
            metrics.total_us,
            workers,
            reports.iter().filter(|r| r.is_cheating).count()
        );
        self.last_metrics = metrics;
        Ok(reports)
    }

    /// Evaluate every retained player of a decoded replay.
    pub fn analyze_replay(&mut self, replay: &Replay) -> Result<Vec<PlayerReport>, AnalysisError> {
        self.analyze_players(replay.players())
    }

    fn evaluate_sequential(
        &self,
        samples: &[AimSample],
        metrics: &mut AnalysisMetrics,
    ) -> Result<Vec<DetectionResult>, AnalysisError> {
        let mut results = Vec::with_capacity(self.rules.len());
        for &rule in &self.rules {
            if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
                return Err(AnalysisError::Cancelled);
            }
            let outcome = pool::run_rule(rule, samples);
            metrics.record_rule(rule.name(), outcome.elapsed_us);
            results.push(outcome.result);
        }
        Ok(results)
    }

    fn report(&self, player: &PlayerRecord, results: Vec<DetectionResult>) -> PlayerReport {
        let cheating_probability = self.cheating_probability(&results);
        PlayerReport {
            player_id: player.client_id,
            name: player.name.clone(),
            team: player.team,
            is_cheating: !results.is_empty() && cheating_probability >= self.config.threshold,
            cheating_probability,
            results,
            statistics: PlayerStatistics::from_samples(player.samples()),
            team_averages: None,
        }
    }
}

fn attach_team_averages(reports: &mut [PlayerReport]) {
    let teams = TeamAverages::by_team(reports.iter().map(|r| (r.team, &r.statistics)));
    for report in reports.iter_mut() {
        report.team_averages = teams.get(&report.team).cloned();
    }
}

fn collect_outcomes(
    rules: &[Rule],
    row: Vec<RuleOutcome>,
    metrics: &mut AnalysisMetrics,
) -> Vec<DetectionResult> {
    rules
        .iter()
        .zip(row)
        .map(|(rule, outcome)| {
            metrics.record_rule(rule.name(), outcome.elapsed_us);
            outcome.result
        })
        .collect()
}

fn log_verdict(report: &PlayerReport) {
    log::debug!(
        "player {} ({}): probability {:.3}, {}, {} rule(s) with evidence",
        report.player_id,
        report.name,
        report.cheating_probability,
        if report.is_cheating { "suspicious" } else { "clean" },
        report.flagged_rules().count()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_test_utils::fixtures::{aimbot_aim, human_aim, roster};
    use aimscan_test_utils::{record, SequenceBuilder};

    fn sequential() -> Analyzer {
        Analyzer::new(AnalyzerConfig {
            worker_count: Some(1),
            ..AnalyzerConfig::default()
        })
        .unwrap()
    }

    #[test]
    fn invalid_config_rejected() {
        let config = AnalyzerConfig {
            threshold: 2.0,
            ..AnalyzerConfig::default()
        };
        assert!(matches!(
            Analyzer::new(config),
            Err(ConfigError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn short_player_gets_empty_report() {
        let mut analyzer = sequential();
        let player = record(3, "short", SequenceBuilder::new(16).hold(9).build());
        let report = analyzer.analyze_player(&player).unwrap();
        assert!(report.results.is_empty());
        assert_eq!(report.cheating_probability, 0.0);
        assert!(!report.is_cheating);
        assert_eq!(analyzer.last_metrics().players_analyzed, 0);
    }

    #[test]
    fn one_result_per_rule_in_order() {
        let mut analyzer = sequential();
        let results = analyzer.evaluate(&human_aim(5, 200)).unwrap();
        let names: Vec<&str> = results.iter().map(|r| r.rule_name.as_str()).collect();
        let expected: Vec<&str> = Rule::ALL.iter().map(|r| r.name()).collect();
        assert_eq!(names, expected);
        let m = analyzer.last_metrics();
        assert_eq!(m.players_analyzed, 1);
        assert_eq!(m.rule_us.len(), Rule::ALL.len());
    }

    #[test]
    fn rule_subset_respected() {
        let mut analyzer = sequential().with_rules(&[Rule::AimLock, Rule::SnapAim]);
        let results = analyzer.evaluate(&aimbot_aim(1, 120)).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].rule_name, Rule::AimLock.name());
        assert_eq!(results[1].rule_name, Rule::SnapAim.name());
    }

    #[test]
    fn parallel_and_sequential_agree() {
        let players = roster(11, 2, 2, 300);
        let mut seq = sequential();
        let mut par = Analyzer::new(AnalyzerConfig {
            worker_count: Some(4),
            ..AnalyzerConfig::default()
        })
        .unwrap();
        let a = seq.analyze_players(&players).unwrap();
        let b = par.analyze_players(&players).unwrap();
        assert_eq!(a, b);
        assert_eq!(par.last_metrics().players_analyzed, 4);
    }

    #[test]
    fn short_players_skipped_in_batch() {
        let mut players = roster(2, 1, 1, 100);
        players.insert(1, record(9, "lurker", SequenceBuilder::new(16).hold(4).build()));
        let reports = sequential().analyze_players(&players).unwrap();
        let ids: Vec<i32> = reports.iter().map(|r| r.player_id).collect();
        assert_eq!(ids, [players[0].client_id, players[2].client_id]);
    }

    #[test]
    fn reports_carry_their_team_averages() {
        let players = roster(4, 2, 1, 100);
        let reports = sequential().analyze_players(&players).unwrap();
        let humans = reports[0].team_averages.as_ref().unwrap();
        assert_eq!(humans.team, 1);
        assert_eq!(humans.players, 2);
        assert_eq!(reports[1].team_averages.as_ref(), Some(humans));
        let expected =
            (reports[0].statistics.firing_ratio + reports[1].statistics.firing_ratio) / 2.0;
        assert!((humans.statistics.firing_ratio - expected).abs() < 1e-6);

        let bots = reports[2].team_averages.as_ref().unwrap();
        assert_eq!(bots.players, 1);
        assert_eq!(bots.statistics, reports[2].statistics);

        let alone = sequential().analyze_player(&players[0]).unwrap();
        assert_eq!(alone.team_averages, None);
    }

    #[test]
    fn cancelled_token_stops_analysis() {
        let token = CancelToken::new();
        token.cancel();
        let mut analyzer = sequential().with_cancel(token);
        assert_eq!(
            analyzer.evaluate(&human_aim(1, 50)),
            Err(AnalysisError::Cancelled)
        );
    }

    #[test]
    fn threshold_decides_verdict() {
        let bot = record(2, "bot", aimbot_aim(3, 400));
        let mut lenient = Analyzer::new(AnalyzerConfig {
            threshold: 0.0,
            worker_count: Some(1),
            ..AnalyzerConfig::default()
        })
        .unwrap();
        let mut strict = Analyzer::new(AnalyzerConfig {
            threshold: 1.0,
            worker_count: Some(1),
            ..AnalyzerConfig::default()
        })
        .unwrap();
        let a = lenient.analyze_player(&bot).unwrap();
        let b = strict.analyze_player(&bot).unwrap();
        assert_eq!(a.cheating_probability, b.cheating_probability);
        assert!(a.is_cheating);
        assert!(b.cheating_probability < 1.0);
        assert!(!b.is_cheating);
    }
}
