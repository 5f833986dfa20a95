//! Analysis timing metrics.
//!
//! [`AnalysisMetrics`] captures timing for one analyzer run, for
//! profiling and run summaries.

/// Timing metrics collected during one analysis call.
///
/// All durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AnalysisMetrics {
    /// Wall-clock time for the whole call.
    pub total_us: u64,
    /// Cumulative per-rule evaluation time: `(rule name, microseconds)`.
    ///
    /// Summed across players and threads, so the total can exceed
    /// `total_us` under parallel evaluation.
    pub rule_us: Vec<(String, u64)>,
    /// Number of players evaluated.
    pub players_analyzed: u64,
}

impl AnalysisMetrics {
    /// Add `us` to the entry for `rule`, creating it if needed.
    pub(crate) fn record_rule(&mut self, rule: &str, us: u64) {
        match self.rule_us.iter_mut().find(|(name, _)| name == rule) {
            Some((_, total)) => *total += us,
            None => self.rule_us.push((rule.to_string(), us)),
        }
    }

    /// Cumulative time for `rule`, if it was evaluated.
    pub fn rule_time(&self, rule: &str) -> Option<u64> {
        self.rule_us
            .iter()
            .find(|(name, _)| name == rule)
            .map(|(_, us)| *us)
    }
}
