//! Binary demo decoding and aim-sample reconstruction.
//!
//! Reads a recorded match ("demo") byte stream, replays its command
//! records through a session tracker, and returns a [`Replay`] holding a
//! chronological [`AimSample`](aimscan_core::AimSample) sequence for the
//! recording player with derived angular and targeting features.
//!
//! # Architecture
//!
//! - [`DemoReader`] validates the header and yields typed [`Record`]s
//! - [`SessionState`] threads timestamp, entity table, roster, and
//!   position histories through the record stream
//! - [`derive_features`] computes angular velocity, acceleration, and
//!   angle-to-target once decoding completes
//! - [`DemoParser`] drives all three and enforces all-or-nothing decoding
//! - [`DemoWriter`] encodes records, for fixtures and benchmarks
//!
//! # Format
//!
//! ```text
//! [MAGIC "ETLDEMO2"] [PROTOCOL i32]
//! [TAG u8][record] [TAG u8][record] ... [TAG 5 = EOF]
//! ```
//!
//! All multi-byte numbers are little-endian. Strings are NUL-terminated.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod codec;
pub mod command;
pub mod endian;
pub mod entity;
pub mod error;
pub mod features;
pub mod history;
pub mod metrics;
pub mod parser;
pub mod reader;
pub mod replay;
pub mod session;
pub mod types;
pub mod writer;

pub use command::{ConfigStringUpdate, InputChange};
pub use entity::EntityTable;
pub use error::DemoError;
pub use features::derive_features;
pub use history::PositionHistory;
pub use metrics::DecodeMetrics;
pub use parser::{parse, parse_file, DemoParser};
pub use reader::{DemoReader, RecordIter};
pub use replay::Replay;
pub use session::{PendingInput, SessionState};
pub use types::{
    EntityState, EntityUpdate, GameEvent, GameEventKind, Gamestate, PlayerState, Record,
    RecordTag, Snapshot,
};
pub use writer::DemoWriter;

/// Magic bytes at the start of every demo file.
pub const MAGIC: [u8; 8] = *b"ETLDEMO2";

/// Protocol version written by [`DemoWriter`] by default.
///
/// Decoding treats the version as informational and accepts any value.
pub const PROTOCOL_VERSION: i32 = 84;

/// Number of slots in the entity table.
pub const MAX_ENTITIES: usize = 1024;

/// Number of client slots.
pub const MAX_CLIENTS: i32 = 64;

/// First config-string index carrying per-player info.
///
/// Player slots occupy `[CS_PLAYERS, CS_PLAYERS + MAX_CLIENTS)`.
pub const CS_PLAYERS: i32 = 544;

/// Bytes in one encoded entity record, reserved region included.
pub const ENTITY_RECORD_SIZE: usize = 64;

/// Bytes in one encoded player-state record, reserved region included.
pub const PLAYER_STATE_SIZE: usize = 152;

/// Entity type value marking a player entity.
pub const ENTITY_TYPE_PLAYER: u8 = 1;

/// Maximum distance (world units) at which an enemy counts as visible.
pub const ENEMY_VIEW_DISTANCE: f32 = 2000.0;

/// Minimum cosine between view direction and enemy direction (~45° half-angle).
pub const ENEMY_VIEW_COS: f32 = 0.7;

/// Positions retained per client in a [`PositionHistory`].
pub const POSITION_HISTORY_CAPACITY: usize = 100;

/// Name given to the recording player when no config string names it.
pub const RECORDER_DEFAULT_NAME: &str = "DemoRecorder";
