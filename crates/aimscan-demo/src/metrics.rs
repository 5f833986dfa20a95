//! Decode-pass counters.
//!
//! [`DecodeMetrics`] is filled in while a demo is parsed and returned on
//! the [`Replay`](crate::Replay), for logging and benchmarks.

/// Counters collected during one decode.
///
/// Durations are in microseconds.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeMetrics {
    /// Wall-clock time for the whole decode, in microseconds.
    pub total_us: u64,
    /// Server command records read.
    pub server_commands: u64,
    /// Client command records read.
    pub client_commands: u64,
    /// Gamestate records read.
    pub gamestates: u64,
    /// Snapshot records read.
    pub snapshots: u64,
    /// Player config strings that created or updated a roster entry.
    pub config_strings_applied: u64,
    /// Entity records decoded (baselines and deltas).
    pub entities_decoded: u64,
    /// Samples appended to the recorder's record.
    pub samples_appended: u64,
    /// Samples dropped because their timestamp did not advance.
    pub samples_dropped: u64,
    /// Raw mouse-delta commands observed.
    pub mouse_deltas: u64,
    /// Players kept at finalization.
    pub players_retained: u64,
    /// Players dropped at finalization for having too few samples.
    pub players_dropped: u64,
}

impl DecodeMetrics {
    /// Total records read, EOF marker excluded.
    pub fn records(&self) -> u64 {
        self.server_commands + self.client_commands + self.gamestates + self.snapshots
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = DecodeMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.records(), 0);
        assert_eq!(m.samples_appended, 0);
        assert_eq!(m.players_retained, 0);
    }

    #[test]
    fn records_sums_kinds() {
        let m = DecodeMetrics {
            server_commands: 2,
            client_commands: 3,
            gamestates: 1,
            snapshots: 10,
            ..DecodeMetrics::default()
        };
        assert_eq!(m.records(), 16);
    }
}
