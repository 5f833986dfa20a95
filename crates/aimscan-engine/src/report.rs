//! Per-player analysis output.

use aimscan_core::DetectionResult;

use crate::statistics::{PlayerStatistics, TeamAverages};

/// The verdict and supporting detail for one player.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerReport {
    /// Client slot id.
    pub player_id: i32,
    /// Display name.
    pub name: String,
    /// Team number.
    pub team: i32,
    /// One result per evaluated rule, in rule order.
    pub results: Vec<DetectionResult>,
    /// Weighted aggregate of the rule confidences, in `[0, 1]`.
    pub cheating_probability: f32,
    /// `true` when the probability reached the analyzer threshold.
    pub is_cheating: bool,
    /// Descriptive aim statistics.
    pub statistics: PlayerStatistics,
    /// Means over the analyzed players of the same team, `None` when the
    /// team is unknown or the player was analyzed alone.
    pub team_averages: Option<TeamAverages>,
}

impl PlayerReport {
    /// Result for the rule with display name `rule_name`.
    pub fn result(&self, rule_name: &str) -> Option<&DetectionResult> {
        self.results.iter().find(|r| r.rule_name == rule_name)
    }

    /// Names of rules that produced evidence.
    pub fn flagged_rules(&self) -> impl Iterator<Item = &str> + '_ {
        self.results
            .iter()
            .filter(|r| r.is_flagged())
            .map(|r| r.rule_name.as_str())
    }
}
