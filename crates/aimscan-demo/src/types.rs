//! Data types for decoded demo records.

use aimscan_core::{Vec3, ViewAngles};

use crate::ENTITY_TYPE_PLAYER;

/// Record kind tag preceding every record in the stream.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum RecordTag {
    /// Server text command.
    ServerCommand = 1,
    /// Client text command.
    ClientCommand = 2,
    /// Full state checkpoint.
    Gamestate = 3,
    /// Per-tick player state and entity deltas.
    Snapshot = 4,
    /// End of demo.
    Eof = 5,
}

impl RecordTag {
    /// Decode a tag byte, or `None` for an unknown tag.
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            1 => Some(Self::ServerCommand),
            2 => Some(Self::ClientCommand),
            3 => Some(Self::Gamestate),
            4 => Some(Self::Snapshot),
            5 => Some(Self::Eof),
            _ => None,
        }
    }
}

/// The modeled fields of one entity record.
///
/// The 34 reserved bytes that follow these fields on the wire are skipped
/// on decode and written as zeros on encode.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EntityState {
    /// Entity type ([`ENTITY_TYPE_PLAYER`] for players).
    pub entity_type: u8,
    /// World position.
    pub position: Vec3,
    /// Orientation.
    pub angles: ViewAngles,
    /// Model index.
    pub model_index: i16,
    /// Owning client id (meaningful for player entities).
    pub client_id: i16,
    /// Team number.
    pub team: u8,
}

impl EntityState {
    /// Whether this entity is a player.
    pub fn is_player(&self) -> bool {
        self.entity_type == ENTITY_TYPE_PLAYER
    }
}

/// An entity record together with its table slot.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EntityUpdate {
    /// Table slot, validated to lie in `[0, MAX_ENTITIES)`.
    pub index: usize,
    /// The decoded entity.
    pub state: EntityState,
}

/// The modeled fields of the recording client's player state.
///
/// Followed on the wire by a 92-byte reserved region.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PlayerState {
    /// Client id of the recording player.
    pub client_id: i32,
    /// Time of the last processed user command.
    pub command_time: i32,
    /// Eye position.
    pub position: Vec3,
    /// Movement velocity.
    pub velocity: Vec3,
    /// View direction.
    pub view_angles: ViewAngles,
    /// Selected weapon.
    pub weapon_id: i32,
    /// Weapon state machine value.
    pub weapon_state: i32,
    /// Current health.
    pub health: i32,
    /// Maximum health.
    pub max_health: i32,
}

/// A full state checkpoint: config strings and entity baselines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Gamestate {
    /// Record sequence number.
    pub sequence: i32,
    /// `(index, value)` config-string pairs.
    pub config_strings: Vec<(i32, String)>,
    /// Entity baselines.
    pub baselines: Vec<EntityUpdate>,
}

/// One server tick as seen by the recording client.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Snapshot {
    /// Record sequence number.
    pub sequence: i32,
    /// Server time in milliseconds.
    pub server_time: i32,
    /// The recorder's player state.
    pub player_state: PlayerState,
    /// Entities changed since the previous snapshot.
    pub entities: Vec<EntityUpdate>,
}

/// One decoded record.
#[derive(Clone, Debug, PartialEq)]
pub enum Record {
    /// Server text command.
    ServerCommand {
        /// Record sequence number.
        sequence: i32,
        /// Command text.
        text: String,
    },
    /// Client text command.
    ClientCommand {
        /// Record sequence number.
        sequence: i32,
        /// Command text.
        text: String,
    },
    /// Full state checkpoint.
    Gamestate(Gamestate),
    /// Per-tick update.
    Snapshot(Snapshot),
    /// End of demo.
    Eof,
}

impl Record {
    /// The tag this record is encoded with.
    pub fn tag(&self) -> RecordTag {
        match self {
            Self::ServerCommand { .. } => RecordTag::ServerCommand,
            Self::ClientCommand { .. } => RecordTag::ClientCommand,
            Self::Gamestate(_) => RecordTag::Gamestate,
            Self::Snapshot(_) => RecordTag::Snapshot,
            Self::Eof => RecordTag::Eof,
        }
    }
}

/// One entry in a replay's audit trail.
#[derive(Clone, Debug, PartialEq)]
pub struct GameEvent {
    /// Session timestamp when the event was observed.
    pub timestamp: i32,
    /// Record sequence number, where the record carried one.
    pub sequence: Option<i32>,
    /// What happened.
    pub kind: GameEventKind,
}

/// The kinds of audit-trail events.
#[derive(Clone, Debug, PartialEq)]
pub enum GameEventKind {
    /// Server text command.
    ServerText(String),
    /// Client text command.
    ClientText(String),
    /// Gamestate checkpoint; entity table and clock were reset.
    GamestateReset,
    /// Snapshot of the recorder.
    Snapshot {
        /// Recorder position.
        position: Vec3,
        /// Recorder view angles.
        view_angles: ViewAngles,
    },
    /// The recorder started firing.
    FireStart,
    /// The recorder stopped firing.
    FireEnd,
    /// The recorder selected a weapon.
    WeaponChange(i32),
    /// Raw mouse movement reported by the client.
    MouseDelta {
        /// Pitch delta.
        pitch: f32,
        /// Yaw delta.
        yaw: f32,
    },
}
