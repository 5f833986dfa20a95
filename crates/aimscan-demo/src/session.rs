//! Mutable state threaded through one decode.
//!
//! [`SessionState`] consumes records in stream order. Each record may
//! depend on state left by the previous one (the current timestamp, the
//! entity table, the roster, pending input), so records must be applied
//! strictly sequentially.

use aimscan_core::{
    forward_vector, AimSample, PlayerRecord, TargetInfo, Vec3, ViewAngles, MIN_PLAYER_SAMPLES,
};
use indexmap::IndexMap;
use log::{debug, trace};

use crate::command::{
    parse_client_command, parse_player_info, parse_server_command, player_slot, InputChange,
};
use crate::entity::EntityTable;
use crate::error::DemoError;
use crate::features::derive_features;
use crate::history::PositionHistory;
use crate::metrics::DecodeMetrics;
use crate::replay::Replay;
use crate::types::{
    EntityUpdate, GameEvent, GameEventKind, Gamestate, PlayerState, Record, Snapshot,
};
use crate::{ENEMY_VIEW_COS, ENEMY_VIEW_DISTANCE, RECORDER_DEFAULT_NAME};

/// Team value meaning "unassigned".
pub const TEAM_FREE: i32 = 0;

/// Team value for spectators, who are never enemies.
pub const TEAM_SPECTATOR: i32 = 3;

/// Recorder input carried forward from client commands.
///
/// A client command updates both the recorder's most recent sample and
/// this pending state; the next sample starts from it. The firing flag
/// persists until toggled again. A weapon override applies to the next
/// sample only, after which the snapshot's own weapon id takes over.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PendingInput {
    /// Whether the attack button is held.
    pub firing: bool,
    /// Weapon selected since the last sample, if any.
    pub weapon: Option<i32>,
}

/// Per-decode session tracker.
///
/// # Examples
///
/// ```
/// use aimscan_demo::{Record, SessionState};
///
/// let mut session = SessionState::new();
/// session
///     .apply_record(Record::ServerCommand {
///         sequence: 1,
///         text: r#"cs 546 "n\Bob\t\2""#.into(),
///     })
///     .unwrap();
/// assert_eq!(session.player(2).map(|p| p.name.as_str()), Some("Bob"));
/// ```
#[derive(Debug, Default)]
pub struct SessionState {
    timestamp: i32,
    entities: EntityTable,
    players: IndexMap<i32, PlayerRecord>,
    histories: IndexMap<i32, PositionHistory>,
    recorder: Option<i32>,
    pending: PendingInput,
    events: Vec<GameEvent>,
    metrics: DecodeMetrics,
}

impl SessionState {
    /// Create an empty session at timestamp 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current server time in milliseconds.
    pub fn timestamp(&self) -> i32 {
        self.timestamp
    }

    /// Client id of the recording player, once a snapshot has named it.
    pub fn recorder(&self) -> Option<i32> {
        self.recorder
    }

    /// Input state the next sample will start from.
    pub fn pending(&self) -> PendingInput {
        self.pending
    }

    /// The entity table.
    pub fn entities(&self) -> &EntityTable {
        &self.entities
    }

    /// Roster entry for a client.
    pub fn player(&self, client_id: i32) -> Option<&PlayerRecord> {
        self.players.get(&client_id)
    }

    /// Roster in creation order.
    pub fn players(&self) -> impl Iterator<Item = &PlayerRecord> + '_ {
        self.players.values()
    }

    /// Position history tracked for a client.
    pub fn history(&self, client_id: i32) -> Option<&PositionHistory> {
        self.histories.get(&client_id)
    }

    /// Counters so far.
    pub fn metrics(&self) -> &DecodeMetrics {
        &self.metrics
    }

    /// Audit trail so far.
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Apply one decoded record.
    pub fn apply_record(&mut self, record: Record) -> Result<(), DemoError> {
        match record {
            Record::ServerCommand { sequence, text } => {
                self.server_command(sequence, text);
                Ok(())
            }
            Record::ClientCommand { sequence, text } => {
                self.client_command(sequence, text);
                Ok(())
            }
            Record::Gamestate(gs) => self.gamestate(gs),
            Record::Snapshot(snap) => self.snapshot(snap),
            Record::Eof => Ok(()),
        }
    }

    fn push_event(&mut self, sequence: Option<i32>, kind: GameEventKind) {
        self.events.push(GameEvent {
            timestamp: self.timestamp,
            sequence,
            kind,
        });
    }

    fn server_command(&mut self, sequence: i32, text: String) {
        self.metrics.server_commands += 1;
        if let Some(update) = parse_server_command(&text) {
            self.apply_config_string(update.index, &update.payload);
        }
        self.push_event(Some(sequence), GameEventKind::ServerText(text));
    }

    /// Apply a config string. Returns `true` when it created or updated a
    /// roster entry.
    ///
    /// Only player slots with a non-empty name have an effect; the first
    /// such string for a slot creates the record, later ones update its
    /// name and (when present) team.
    pub fn apply_config_string(&mut self, index: i32, payload: &str) -> bool {
        let Some(client_id) = player_slot(index) else {
            return false;
        };
        let info = parse_player_info(payload);
        let Some(name) = info.name else {
            return false;
        };
        trace!("config string {index}: client {client_id} is {name:?}");
        match self.players.get_mut(&client_id) {
            Some(record) => {
                record.name = name;
                if let Some(team) = info.team {
                    record.team = team;
                }
            }
            None => {
                let team = info.team.unwrap_or(TEAM_FREE);
                self.players
                    .insert(client_id, PlayerRecord::new(client_id, name, team));
            }
        }
        self.metrics.config_strings_applied += 1;
        true
    }

    fn client_command(&mut self, sequence: i32, text: String) {
        self.metrics.client_commands += 1;
        let change = parse_client_command(&text);
        self.push_event(Some(sequence), GameEventKind::ClientText(text));
        if let Some(change) = change {
            self.apply_input(change, Some(sequence));
        }
    }

    /// Apply a recorder input change.
    ///
    /// Fire and weapon changes are written to the recorder's most recent
    /// sample and kept as pending state for the next one.
    pub fn apply_input(&mut self, change: InputChange, sequence: Option<i32>) {
        match change {
            InputChange::Fire(firing) => {
                self.pending.firing = firing;
                if let Some(sample) = self.recorder_last_sample() {
                    sample.is_firing = firing;
                }
                let kind = if firing {
                    GameEventKind::FireStart
                } else {
                    GameEventKind::FireEnd
                };
                self.push_event(sequence, kind);
            }
            InputChange::Weapon(weapon) => {
                self.pending.weapon = Some(weapon);
                if let Some(sample) = self.recorder_last_sample() {
                    sample.weapon_id = weapon;
                }
                self.push_event(sequence, GameEventKind::WeaponChange(weapon));
            }
            InputChange::MouseDelta { pitch, yaw } => {
                self.metrics.mouse_deltas += 1;
                self.push_event(sequence, GameEventKind::MouseDelta { pitch, yaw });
            }
        }
    }

    fn recorder_last_sample(&mut self) -> Option<&mut AimSample> {
        let id = self.recorder?;
        self.players.get_mut(&id)?.last_sample_mut()
    }

    fn gamestate(&mut self, gs: Gamestate) -> Result<(), DemoError> {
        self.metrics.gamestates += 1;
        self.entities.reset();
        self.timestamp = 0;
        self.push_event(Some(gs.sequence), GameEventKind::GamestateReset);
        for (index, value) in &gs.config_strings {
            self.apply_config_string(*index, value);
        }
        for update in gs.baselines {
            self.apply_entity(update)?;
        }
        Ok(())
    }

    /// Store an entity in the table and, for an opposing player, append
    /// its position to that client's history at the current timestamp.
    ///
    /// Every player update refreshes the team of an existing history, so
    /// a client that joins the recorder's team stops being a candidate.
    pub fn apply_entity(&mut self, update: EntityUpdate) -> Result<(), DemoError> {
        self.entities.set(update.index, update.state)?;
        self.metrics.entities_decoded += 1;
        let state = update.state;
        if state.is_player() {
            let client = i32::from(state.client_id);
            let team = i32::from(state.team);
            if self.is_opposing(client, team) {
                self.histories
                    .entry(client)
                    .or_insert_with(|| PositionHistory::new(team))
                    .push(state.position, self.timestamp, team);
            } else if let Some(history) = self.histories.get_mut(&client) {
                history.set_team(team);
            }
        }
        Ok(())
    }

    fn recorder_team(&self) -> i32 {
        self.recorder
            .and_then(|id| self.players.get(&id))
            .map_or(TEAM_FREE, |p| p.team)
    }

    /// Whether a client on `team` counts as an enemy of the recorder.
    ///
    /// The recorder never opposes itself and spectators oppose nobody.
    /// While the recorder's team is unknown every other player counts.
    pub fn is_opposing(&self, client_id: i32, team: i32) -> bool {
        if self.recorder == Some(client_id) || team == TEAM_SPECTATOR {
            return false;
        }
        let own = self.recorder_team();
        own == TEAM_FREE || team != own
    }

    fn snapshot(&mut self, snap: Snapshot) -> Result<(), DemoError> {
        self.metrics.snapshots += 1;
        self.timestamp = snap.server_time;
        let ps = snap.player_state;
        self.observe_recorder(ps.client_id);
        for update in snap.entities {
            self.apply_entity(update)?;
        }
        self.push_event(
            Some(snap.sequence),
            GameEventKind::Snapshot {
                position: ps.position,
                view_angles: ps.view_angles,
            },
        );
        self.record_sample(&ps);
        Ok(())
    }

    fn observe_recorder(&mut self, client_id: i32) {
        if self.recorder != Some(client_id) {
            if let Some(previous) = self.recorder {
                debug!("recording client changed from {previous} to {client_id}");
            }
            self.recorder = Some(client_id);
            self.histories.shift_remove(&client_id);
        }
        self.players
            .entry(client_id)
            .or_insert_with(|| PlayerRecord::new(client_id, RECORDER_DEFAULT_NAME, TEAM_FREE));
    }

    fn record_sample(&mut self, ps: &PlayerState) {
        let target = self.resolve_enemy(ps.position, ps.view_angles, self.timestamp);
        let sample = AimSample {
            timestamp: self.timestamp,
            position: ps.position,
            view_angles: ps.view_angles,
            is_firing: self.pending.firing,
            weapon_id: self.pending.weapon.take().unwrap_or(ps.weapon_id),
            health: ps.health,
            target,
            ..AimSample::default()
        };
        let timestamp = sample.timestamp;
        let Some(record) = self.players.get_mut(&ps.client_id) else {
            return;
        };
        if record.push_sample(sample) {
            self.metrics.samples_appended += 1;
        } else {
            self.metrics.samples_dropped += 1;
            debug!(
                "dropped sample at {timestamp}ms for client {}: time did not advance",
                ps.client_id
            );
        }
    }

    /// The nearest visible enemy from `position` looking along `angles`
    /// at time `timestamp`.
    ///
    /// A candidate's latest known position at or before `timestamp` must
    /// lie within [`ENEMY_VIEW_DISTANCE`] and inside the view cone
    /// (cosine above [`ENEMY_VIEW_COS`]). Ties keep the first tracked
    /// client.
    pub fn resolve_enemy(
        &self,
        position: Vec3,
        angles: ViewAngles,
        timestamp: i32,
    ) -> Option<TargetInfo> {
        let forward = forward_vector(angles);
        let mut best: Option<TargetInfo> = None;
        for (&client_id, history) in &self.histories {
            if !self.is_opposing(client_id, history.team()) {
                continue;
            }
            let Some((enemy, _)) = history.latest_at(timestamp) else {
                continue;
            };
            let offset = enemy - position;
            let distance = offset.length();
            if distance > ENEMY_VIEW_DISTANCE {
                continue;
            }
            let Some(direction) = offset.normalized() else {
                continue;
            };
            if forward.dot(direction) <= ENEMY_VIEW_COS {
                continue;
            }
            if best.map_or(true, |b| distance < b.distance) {
                best = Some(TargetInfo {
                    client_id,
                    position: enemy,
                    distance,
                    ..TargetInfo::default()
                });
            }
        }
        best
    }

    /// Finalize the session: drop players with fewer than
    /// [`MIN_PLAYER_SAMPLES`] samples and derive features for the rest.
    pub fn finish(mut self, protocol: i32, terminated_by_eof: bool) -> Replay {
        let mut players = Vec::with_capacity(self.players.len());
        for (_, mut record) in self.players {
            if record.len() < MIN_PLAYER_SAMPLES {
                self.metrics.players_dropped += 1;
                debug!(
                    "dropping client {} ({:?}): {} samples",
                    record.client_id,
                    record.name,
                    record.len()
                );
                continue;
            }
            derive_features(record.samples_mut());
            self.metrics.players_retained += 1;
            players.push(record);
        }
        Replay {
            protocol,
            recorder_id: self.recorder,
            players,
            entities: self.entities,
            events: self.events,
            metrics: self.metrics,
            terminated_by_eof,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::EntityState;
    use crate::ENTITY_TYPE_PLAYER;

    fn snapshot(time: i32, client: i32, yaw: f32, entities: Vec<EntityUpdate>) -> Record {
        Record::Snapshot(Snapshot {
            sequence: time,
            server_time: time,
            player_state: PlayerState {
                client_id: client,
                view_angles: ViewAngles::new(0.0, yaw),
                weapon_id: 3,
                health: 100,
                ..PlayerState::default()
            },
            entities,
        })
    }

    fn enemy(slot: usize, client: i16, team: u8, pos: Vec3) -> EntityUpdate {
        EntityUpdate {
            index: slot,
            state: EntityState {
                entity_type: ENTITY_TYPE_PLAYER,
                position: pos,
                client_id: client,
                team,
                ..EntityState::default()
            },
        }
    }

    fn client(text: &str) -> Record {
        Record::ClientCommand {
            sequence: 0,
            text: text.into(),
        }
    }

    #[test]
    fn first_snapshot_creates_recorder() {
        let mut s = SessionState::new();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        assert_eq!(s.recorder(), Some(0));
        let rec = s.player(0).unwrap();
        assert_eq!(rec.name, RECORDER_DEFAULT_NAME);
        assert_eq!(rec.len(), 1);
    }

    #[test]
    fn config_string_names_recorder_slot() {
        let mut s = SessionState::new();
        assert!(s.apply_config_string(544, r"n\Alice\t\1"));
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        assert_eq!(s.player(0).unwrap().name, "Alice");
        assert_eq!(s.players().count(), 1);
    }

    #[test]
    fn empty_name_does_not_create_player() {
        let mut s = SessionState::new();
        assert!(!s.apply_config_string(545, r"n\\t\1"));
        assert!(!s.apply_config_string(100, r"n\Bob"));
        assert_eq!(s.players().count(), 0);
    }

    #[test]
    fn fire_flags_last_sample_and_carries_forward() {
        let mut s = SessionState::new();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        s.apply_record(client("+attack")).unwrap();
        s.apply_record(snapshot(20, 0, 0.0, vec![])).unwrap();
        s.apply_record(client("-attack")).unwrap();
        let samples = s.player(0).unwrap().samples();
        assert!(samples[0].is_firing);
        assert!(!samples[1].is_firing);
        assert!(!s.pending().firing);
    }

    #[test]
    fn weapon_override_is_one_shot() {
        let mut s = SessionState::new();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        s.apply_record(client("weapon 9")).unwrap();
        s.apply_record(snapshot(20, 0, 0.0, vec![])).unwrap();
        s.apply_record(snapshot(30, 0, 0.0, vec![])).unwrap();
        let weapons: Vec<i32> = s
            .player(0)
            .unwrap()
            .samples()
            .iter()
            .map(|x| x.weapon_id)
            .collect();
        assert_eq!(weapons, vec![9, 9, 3]);
    }

    #[test]
    fn input_before_any_sample_is_pending_only() {
        let mut s = SessionState::new();
        s.apply_record(client("+attack")).unwrap();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        assert!(s.player(0).unwrap().samples()[0].is_firing);
    }

    #[test]
    fn non_advancing_snapshot_dropped() {
        let mut s = SessionState::new();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        s.apply_record(snapshot(10, 0, 0.0, vec![])).unwrap();
        s.apply_record(snapshot(5, 0, 0.0, vec![])).unwrap();
        assert_eq!(s.player(0).unwrap().len(), 1);
        assert_eq!(s.metrics().samples_dropped, 2);
    }

    #[test]
    fn enemy_in_view_becomes_target() {
        let mut s = SessionState::new();
        s.apply_config_string(544, r"n\Me\t\1");
        let ahead = enemy(5, 3, 2, Vec3::new(0.0, 0.0, 500.0));
        let closer_behind = enemy(6, 4, 2, Vec3::new(0.0, 0.0, -100.0));
        s.apply_record(snapshot(10, 0, 0.0, vec![ahead, closer_behind]))
            .unwrap();
        let target = s.player(0).unwrap().samples()[0].target.unwrap();
        assert_eq!(target.client_id, 3);
        assert!((target.distance - 500.0).abs() < 1e-3);
    }

    #[test]
    fn teammates_and_far_enemies_ignored() {
        let mut s = SessionState::new();
        s.apply_config_string(544, r"n\Me\t\1");
        let mate = enemy(5, 3, 1, Vec3::new(0.0, 0.0, 100.0));
        let far = enemy(6, 4, 2, Vec3::new(0.0, 0.0, 2500.0));
        s.apply_record(snapshot(10, 0, 0.0, vec![mate, far])).unwrap();
        assert!(s.player(0).unwrap().samples()[0].target.is_none());
        assert!(s.history(3).is_none());
    }

    #[test]
    fn enemy_switching_to_recorder_team_stops_being_a_target() {
        let mut s = SessionState::new();
        s.apply_config_string(544, r"n\Me\t\1");
        let pos = Vec3::new(0.0, 0.0, 500.0);
        s.apply_record(snapshot(10, 0, 0.0, vec![enemy(5, 3, 2, pos)]))
            .unwrap();
        s.apply_record(snapshot(20, 0, 0.0, vec![enemy(5, 3, 1, pos)]))
            .unwrap();
        let samples = s.player(0).unwrap().samples();
        assert_eq!(samples[0].target.map(|t| t.client_id), Some(3));
        assert!(samples[1].target.is_none());
        assert_eq!(s.history(3).map(PositionHistory::team), Some(1));

        s.apply_record(snapshot(30, 0, 0.0, vec![enemy(5, 3, 2, pos)]))
            .unwrap();
        let back = s.player(0).unwrap().samples()[2].target;
        assert_eq!(back.map(|t| t.client_id), Some(3));
    }

    #[test]
    fn nearest_of_visible_enemies_wins() {
        let mut s = SessionState::new();
        let a = enemy(5, 3, 2, Vec3::new(0.0, 0.0, 800.0));
        let b = enemy(6, 4, 2, Vec3::new(50.0, 0.0, 300.0));
        s.apply_record(snapshot(10, 0, 0.0, vec![a, b])).unwrap();
        let target = s.player(0).unwrap().samples()[0].target.unwrap();
        assert_eq!(target.client_id, 4);
    }

    #[test]
    fn gamestate_resets_clock_and_table() {
        let mut s = SessionState::new();
        let e = enemy(5, 3, 2, Vec3::new(0.0, 0.0, 100.0));
        s.apply_record(snapshot(500, 0, 0.0, vec![e])).unwrap();
        assert!(s.entities().get(5).unwrap().is_player());
        s.apply_record(Record::Gamestate(Gamestate::default()))
            .unwrap();
        assert_eq!(s.timestamp(), 0);
        assert!(!s.entities().get(5).unwrap().is_player());
    }

    #[test]
    fn finish_drops_short_players() {
        let mut s = SessionState::new();
        s.apply_config_string(549, r"n\Ghost\t\2");
        for t in 1..=12 {
            s.apply_record(snapshot(t * 10, 0, t as f32, vec![])).unwrap();
        }
        let replay = s.finish(84, true);
        assert_eq!(replay.players().len(), 1);
        assert_eq!(replay.metrics().players_dropped, 1);
        assert_eq!(replay.metrics().players_retained, 1);
        let samples = replay.players()[0].samples();
        assert!((samples[1].angular_velocity.yaw - 0.1).abs() < 1e-5);
    }
}
