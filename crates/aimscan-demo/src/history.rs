//! Bounded per-client position history.

use std::collections::VecDeque;

use aimscan_core::Vec3;

use crate::POSITION_HISTORY_CAPACITY;

/// Recent `(position, timestamp)` observations of one client.
///
/// Holds at most [`POSITION_HISTORY_CAPACITY`] entries; pushing into a
/// full history evicts the oldest entry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PositionHistory {
    team: i32,
    entries: VecDeque<(Vec3, i32)>,
}

impl PositionHistory {
    /// Create an empty history for a client on `team`.
    pub fn new(team: i32) -> Self {
        Self {
            team,
            entries: VecDeque::with_capacity(POSITION_HISTORY_CAPACITY),
        }
    }

    /// Team most recently observed for this client.
    pub fn team(&self) -> i32 {
        self.team
    }

    /// Change the team without recording a position.
    pub fn set_team(&mut self, team: i32) {
        self.team = team;
    }

    /// Record an observation, updating the team.
    pub fn push(&mut self, position: Vec3, timestamp: i32, team: i32) {
        if self.entries.len() == POSITION_HISTORY_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back((position, timestamp));
        self.team = team;
    }

    /// The latest observation at or before `timestamp`.
    pub fn latest_at(&self, timestamp: i32) -> Option<(Vec3, i32)> {
        self.entries
            .iter()
            .rev()
            .find(|(_, t)| *t <= timestamp)
            .copied()
    }

    /// Observations oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &(Vec3, i32)> + '_ {
        self.entries.iter()
    }

    /// Number of retained observations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evicts_oldest_first() {
        let mut h = PositionHistory::new(1);
        for t in 0..(POSITION_HISTORY_CAPACITY as i32 + 5) {
            h.push(Vec3::new(t as f32, 0.0, 0.0), t, 1);
        }
        assert_eq!(h.len(), POSITION_HISTORY_CAPACITY);
        assert_eq!(h.iter().next().map(|e| e.1), Some(5));
    }

    #[test]
    fn latest_at_ignores_future_entries() {
        let mut h = PositionHistory::new(2);
        h.push(Vec3::new(1.0, 0.0, 0.0), 100, 2);
        h.push(Vec3::new(2.0, 0.0, 0.0), 200, 2);
        assert_eq!(h.latest_at(50), None);
        assert_eq!(h.latest_at(150).map(|e| e.1), Some(100));
        assert_eq!(h.latest_at(200).map(|e| e.1), Some(200));
    }

    #[test]
    fn team_follows_latest_push() {
        let mut h = PositionHistory::new(1);
        h.push(Vec3::ZERO, 0, 2);
        assert_eq!(h.team(), 2);
        h.set_team(1);
        assert_eq!(h.team(), 1);
        assert_eq!(h.len(), 1);
    }
}
