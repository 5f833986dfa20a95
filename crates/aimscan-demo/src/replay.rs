//! The parsed replay artifact.

use aimscan_core::PlayerRecord;

use crate::entity::EntityTable;
use crate::metrics::DecodeMetrics;
use crate::types::GameEvent;

/// Everything recovered from one successfully decoded demo.
///
/// Only players with at least [`MIN_PLAYER_SAMPLES`] samples are kept,
/// and their samples carry derived features.
///
/// [`MIN_PLAYER_SAMPLES`]: aimscan_core::MIN_PLAYER_SAMPLES
#[derive(Clone, Debug)]
pub struct Replay {
    pub(crate) protocol: i32,
    pub(crate) recorder_id: Option<i32>,
    pub(crate) players: Vec<PlayerRecord>,
    pub(crate) entities: EntityTable,
    pub(crate) events: Vec<GameEvent>,
    pub(crate) metrics: DecodeMetrics,
    pub(crate) terminated_by_eof: bool,
}

impl Replay {
    /// Protocol version from the header.
    pub fn protocol(&self) -> i32 {
        self.protocol
    }

    /// Client id of the recording player, if any snapshot was seen.
    pub fn recorder_id(&self) -> Option<i32> {
        self.recorder_id
    }

    /// The recording player's record, if it was retained.
    pub fn recorder(&self) -> Option<&PlayerRecord> {
        let id = self.recorder_id?;
        self.player(id)
    }

    /// Retained players in roster order.
    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// A retained player by client id.
    pub fn player(&self, client_id: i32) -> Option<&PlayerRecord> {
        self.players.iter().find(|p| p.client_id == client_id)
    }

    /// Entity table as left by the last record.
    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// Audit trail in stream order.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Decode counters.
    pub fn metrics(&self) -> &DecodeMetrics {
        &self.metrics
    }

    /// Whether the stream ended with an explicit EOF record.
    pub fn terminated_by_eof(&self) -> bool {
        self.terminated_by_eof
    }

    /// Consume the replay, keeping only the player records.
    pub fn into_players(self) -> Vec<PlayerRecord> {
        self.players
    }
}
