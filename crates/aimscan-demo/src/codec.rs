//! Binary encode/decode for the demo format.
//!
//! All integers and floats are little-endian. Strings are NUL-terminated
//! with no length prefix. Entity and player-state records have a fixed
//! size; their reserved tails are skipped on read and zero-filled on write.

use std::io::{self, Read, Write};

use aimscan_core::{Vec3, ViewAngles};

use crate::error::DemoError;
use crate::types::*;
use crate::{ENTITY_RECORD_SIZE, MAGIC, MAX_ENTITIES, PLAYER_STATE_SIZE};

/// Modeled bytes at the start of an entity record.
pub const ENTITY_MODELED_SIZE: usize = 30;

/// Modeled bytes at the start of a player-state record.
pub const PLAYER_STATE_MODELED_SIZE: usize = 60;

/// Longest NUL-terminated string accepted before the stream is deemed corrupt.
pub const MAX_STRING_LEN: usize = 16 * 1024;

// ── Primitive writers ───────────────────────────────────────────

/// Write a single byte.
pub fn write_u8(w: &mut dyn Write, v: u8) -> Result<(), DemoError> {
    w.write_all(&[v])?;
    Ok(())
}

/// Write a little-endian i16.
pub fn write_i16_le(w: &mut dyn Write, v: i16) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian i32.
pub fn write_i32_le(w: &mut dyn Write, v: i32) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write a little-endian f32.
pub fn write_f32_le(w: &mut dyn Write, v: f32) -> Result<(), DemoError> {
    w.write_all(&v.to_le_bytes())?;
    Ok(())
}

/// Write three little-endian f32 components.
pub fn write_vec3(w: &mut dyn Write, v: Vec3) -> Result<(), DemoError> {
    write_f32_le(w, v.x)?;
    write_f32_le(w, v.y)?;
    write_f32_le(w, v.z)?;
    Ok(())
}

/// Write pitch, yaw, roll as little-endian f32.
pub fn write_angles(w: &mut dyn Write, a: ViewAngles) -> Result<(), DemoError> {
    write_f32_le(w, a.pitch)?;
    write_f32_le(w, a.yaw)?;
    write_f32_le(w, a.roll)?;
    Ok(())
}

/// Write a NUL-terminated string. Interior NULs are rejected.
pub fn write_cstring(w: &mut dyn Write, s: &str) -> Result<(), DemoError> {
    if s.as_bytes().contains(&0) {
        return Err(DemoError::InvalidString {
            detail: "string contains an interior NUL".into(),
        });
    }
    w.write_all(s.as_bytes())?;
    write_u8(w, 0)
}

/// Write `n` zero bytes.
pub fn write_zeros(w: &mut dyn Write, n: usize) -> Result<(), DemoError> {
    io::copy(&mut io::repeat(0).take(n as u64), w)?;
    Ok(())
}

// ── Primitive readers ───────────────────────────────────────────

fn read_array<const N: usize>(r: &mut dyn Read, what: &str) -> Result<[u8; N], DemoError> {
    let mut buf = [0u8; N];
    r.read_exact(&mut buf)
        .map_err(|e| DemoError::from_read(e, what))?;
    Ok(buf)
}

/// Read a single byte.
pub fn read_u8(r: &mut dyn Read) -> Result<u8, DemoError> {
    Ok(read_array::<1>(r, "u8")?[0])
}

/// Read a little-endian i16.
pub fn read_i16_le(r: &mut dyn Read) -> Result<i16, DemoError> {
    Ok(i16::from_le_bytes(read_array(r, "i16")?))
}

/// Read a little-endian i32.
pub fn read_i32_le(r: &mut dyn Read) -> Result<i32, DemoError> {
    Ok(i32::from_le_bytes(read_array(r, "i32")?))
}

/// Read a little-endian f32.
pub fn read_f32_le(r: &mut dyn Read) -> Result<f32, DemoError> {
    Ok(f32::from_le_bytes(read_array(r, "f32")?))
}

/// Read three little-endian f32 components.
pub fn read_vec3(r: &mut dyn Read) -> Result<Vec3, DemoError> {
    Ok(Vec3::new(read_f32_le(r)?, read_f32_le(r)?, read_f32_le(r)?))
}

/// Read pitch, yaw, roll as little-endian f32.
pub fn read_angles(r: &mut dyn Read) -> Result<ViewAngles, DemoError> {
    Ok(ViewAngles {
        pitch: read_f32_le(r)?,
        yaw: read_f32_le(r)?,
        roll: read_f32_le(r)?,
    })
}

/// Read a NUL-terminated string byte by byte.
///
/// Invalid UTF-8 is replaced lossily; a string longer than
/// [`MAX_STRING_LEN`] is an error.
pub fn read_cstring(r: &mut dyn Read) -> Result<String, DemoError> {
    let mut bytes = Vec::new();
    loop {
        let b = read_array::<1>(r, "string")?[0];
        if b == 0 {
            break;
        }
        if bytes.len() == MAX_STRING_LEN {
            return Err(DemoError::InvalidString {
                detail: format!("no terminator within {MAX_STRING_LEN} bytes"),
            });
        }
        bytes.push(b);
    }
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Skip exactly `n` bytes.
pub fn skip_bytes(r: &mut dyn Read, n: usize, what: &str) -> Result<(), DemoError> {
    let copied = io::copy(&mut (&mut *r).take(n as u64), &mut io::sink())?;
    if copied < n as u64 {
        return Err(DemoError::Truncated {
            detail: format!("stream ended in {what} ({copied} of {n} bytes)"),
        });
    }
    Ok(())
}

// ── Header encode/decode ────────────────────────────────────────

/// Encode the demo header (magic and protocol version).
pub fn encode_header(w: &mut dyn Write, protocol: i32) -> Result<(), DemoError> {
    w.write_all(&MAGIC)?;
    write_i32_le(w, protocol)
}

/// Decode and validate the demo header, returning the protocol version.
pub fn decode_header(r: &mut dyn Read) -> Result<i32, DemoError> {
    let magic: [u8; 8] = read_array(r, "magic")?;
    if magic != MAGIC {
        return Err(DemoError::InvalidMagic { found: magic });
    }
    read_i32_le(r)
}

// ── Fixed-layout records ────────────────────────────────────────

/// Encode one entity record, reserved tail included.
pub fn encode_entity(w: &mut dyn Write, e: &EntityState) -> Result<(), DemoError> {
    write_u8(w, e.entity_type)?;
    write_vec3(w, e.position)?;
    write_angles(w, e.angles)?;
    write_i16_le(w, e.model_index)?;
    write_i16_le(w, e.client_id)?;
    write_u8(w, e.team)?;
    write_zeros(w, ENTITY_RECORD_SIZE - ENTITY_MODELED_SIZE)
}

/// Decode one entity record, skipping its reserved tail.
pub fn decode_entity(r: &mut dyn Read) -> Result<EntityState, DemoError> {
    let state = EntityState {
        entity_type: read_u8(r)?,
        position: read_vec3(r)?,
        angles: read_angles(r)?,
        model_index: read_i16_le(r)?,
        client_id: read_i16_le(r)?,
        team: read_u8(r)?,
    };
    skip_bytes(r, ENTITY_RECORD_SIZE - ENTITY_MODELED_SIZE, "entity record")?;
    Ok(state)
}

/// Encode an `(i16 index, entity record)` pair.
pub fn encode_entity_update(w: &mut dyn Write, u: &EntityUpdate) -> Result<(), DemoError> {
    let index = i16::try_from(u.index)
        .ok()
        .filter(|_| u.index < MAX_ENTITIES)
        .ok_or(DemoError::EntityIndexOutOfRange {
            index: i32::try_from(u.index).unwrap_or(i32::MAX),
        })?;
    write_i16_le(w, index)?;
    encode_entity(w, &u.state)
}

/// Decode an `(i16 index, entity record)` pair, validating the index.
pub fn decode_entity_update(r: &mut dyn Read) -> Result<EntityUpdate, DemoError> {
    let raw = read_i16_le(r)?;
    let index = usize::try_from(raw)
        .ok()
        .filter(|&i| i < MAX_ENTITIES)
        .ok_or(DemoError::EntityIndexOutOfRange {
            index: i32::from(raw),
        })?;
    let state = decode_entity(r)?;
    Ok(EntityUpdate { index, state })
}

/// Encode the recorder's player state, reserved tail included.
pub fn encode_player_state(w: &mut dyn Write, ps: &PlayerState) -> Result<(), DemoError> {
    write_i32_le(w, ps.client_id)?;
    write_i32_le(w, ps.command_time)?;
    write_vec3(w, ps.position)?;
    write_vec3(w, ps.velocity)?;
    write_angles(w, ps.view_angles)?;
    write_i32_le(w, ps.weapon_id)?;
    write_i32_le(w, ps.weapon_state)?;
    write_i32_le(w, ps.health)?;
    write_i32_le(w, ps.max_health)?;
    write_zeros(w, PLAYER_STATE_SIZE - PLAYER_STATE_MODELED_SIZE)
}

/// Decode the recorder's player state, skipping its reserved tail.
pub fn decode_player_state(r: &mut dyn Read) -> Result<PlayerState, DemoError> {
    let ps = PlayerState {
        client_id: read_i32_le(r)?,
        command_time: read_i32_le(r)?,
        position: read_vec3(r)?,
        velocity: read_vec3(r)?,
        view_angles: read_angles(r)?,
        weapon_id: read_i32_le(r)?,
        weapon_state: read_i32_le(r)?,
        health: read_i32_le(r)?,
        max_health: read_i32_le(r)?,
    };
    skip_bytes(
        r,
        PLAYER_STATE_SIZE - PLAYER_STATE_MODELED_SIZE,
        "player state",
    )?;
    Ok(ps)
}

// ── Record encode/decode ────────────────────────────────────────

fn count_prefix(len: usize, what: &str) -> Result<i32, DemoError> {
    i32::try_from(len).map_err(|_| DemoError::Truncated {
        detail: format!("{what} count {len} does not fit the count prefix"),
    })
}

fn non_negative(count: i32, what: &str) -> Result<usize, DemoError> {
    usize::try_from(count).map_err(|_| DemoError::Truncated {
        detail: format!("negative {what} count {count}"),
    })
}

/// Encode a gamestate record, tag included.
pub fn encode_gamestate(w: &mut dyn Write, gs: &Gamestate) -> Result<(), DemoError> {
    write_u8(w, RecordTag::Gamestate as u8)?;
    write_i32_le(w, gs.sequence)?;
    write_i32_le(w, count_prefix(gs.config_strings.len(), "config string")?)?;
    for (index, value) in &gs.config_strings {
        let index = i16::try_from(*index).map_err(|_| DemoError::InvalidString {
            detail: format!("config string index {index} does not fit i16"),
        })?;
        write_i16_le(w, index)?;
        write_cstring(w, value)?;
    }
    write_i32_le(w, count_prefix(gs.baselines.len(), "baseline")?)?;
    for update in &gs.baselines {
        encode_entity_update(w, update)?;
    }
    Ok(())
}

/// Encode a snapshot record, tag included.
pub fn encode_snapshot(w: &mut dyn Write, snap: &Snapshot) -> Result<(), DemoError> {
    write_u8(w, RecordTag::Snapshot as u8)?;
    write_i32_le(w, snap.sequence)?;
    write_i32_le(w, snap.server_time)?;
    encode_player_state(w, &snap.player_state)?;
    let count = i16::try_from(snap.entities.len()).map_err(|_| DemoError::Truncated {
        detail: format!("{} entities do not fit an i16 count", snap.entities.len()),
    })?;
    write_i16_le(w, count)?;
    for update in &snap.entities {
        encode_entity_update(w, update)?;
    }
    Ok(())
}

/// Encode one record with its leading tag byte.
pub fn encode_record(w: &mut dyn Write, record: &Record) -> Result<(), DemoError> {
    match record {
        Record::ServerCommand { sequence, text } | Record::ClientCommand { sequence, text } => {
            write_u8(w, record.tag() as u8)?;
            write_i32_le(w, *sequence)?;
            write_cstring(w, text)
        }
        Record::Gamestate(gs) => encode_gamestate(w, gs),
        Record::Snapshot(snap) => encode_snapshot(w, snap),
        Record::Eof => write_u8(w, RecordTag::Eof as u8),
    }
}

/// Decode the body of a record whose tag has already been read.
pub fn decode_record_body(r: &mut dyn Read, tag: RecordTag) -> Result<Record, DemoError> {
    Ok(match tag {
        RecordTag::ServerCommand => Record::ServerCommand {
            sequence: read_i32_le(r)?,
            text: read_cstring(r)?,
        },
        RecordTag::ClientCommand => Record::ClientCommand {
            sequence: read_i32_le(r)?,
            text: read_cstring(r)?,
        },
        RecordTag::Gamestate => {
            let sequence = read_i32_le(r)?;
            let cs_count = non_negative(read_i32_le(r)?, "config string")?;
            let mut config_strings = Vec::new();
            for _ in 0..cs_count {
                let index = i32::from(read_i16_le(r)?);
                config_strings.push((index, read_cstring(r)?));
            }
            let baseline_count = non_negative(read_i32_le(r)?, "baseline")?;
            let mut baselines = Vec::new();
            for _ in 0..baseline_count {
                baselines.push(decode_entity_update(r)?);
            }
            Record::Gamestate(Gamestate {
                sequence,
                config_strings,
                baselines,
            })
        }
        RecordTag::Snapshot => {
            let sequence = read_i32_le(r)?;
            let server_time = read_i32_le(r)?;
            let player_state = decode_player_state(r)?;
            let count = non_negative(i32::from(read_i16_le(r)?), "entity")?;
            let mut entities = Vec::with_capacity(count);
            for _ in 0..count {
                entities.push(decode_entity_update(r)?);
            }
            Record::Snapshot(Snapshot {
                sequence,
                server_time,
                player_state,
                entities,
            })
        }
        RecordTag::Eof => Record::Eof,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn entity_record_is_fixed_size() {
        let mut buf = Vec::new();
        encode_entity(&mut buf, &EntityState::default()).unwrap();
        assert_eq!(buf.len(), ENTITY_RECORD_SIZE);
    }

    #[test]
    fn player_state_is_fixed_size() {
        let mut buf = Vec::new();
        encode_player_state(&mut buf, &PlayerState::default()).unwrap();
        assert_eq!(buf.len(), PLAYER_STATE_SIZE);
    }

    #[test]
    fn cstring_stops_at_nul() {
        let data = b"hello\0world\0";
        let mut r: &[u8] = data;
        assert_eq!(read_cstring(&mut r).unwrap(), "hello");
        assert_eq!(read_cstring(&mut r).unwrap(), "world");
    }

    #[test]
    fn unterminated_cstring_is_truncated() {
        let mut r: &[u8] = b"abc";
        assert!(matches!(
            read_cstring(&mut r),
            Err(DemoError::Truncated { .. })
        ));
    }

    #[test]
    fn interior_nul_rejected_on_write() {
        let mut buf = Vec::new();
        assert!(matches!(
            write_cstring(&mut buf, "a\0b"),
            Err(DemoError::InvalidString { .. })
        ));
    }

    #[test]
    fn negative_entity_index_rejected() {
        let mut buf = Vec::new();
        write_i16_le(&mut buf, -1).unwrap();
        encode_entity(&mut buf, &EntityState::default()).unwrap();
        let mut r = buf.as_slice();
        assert!(matches!(
            decode_entity_update(&mut r),
            Err(DemoError::EntityIndexOutOfRange { index: -1 })
        ));
    }

    #[test]
    fn index_past_table_rejected() {
        let mut buf = Vec::new();
        write_i16_le(&mut buf, 1024).unwrap();
        encode_entity(&mut buf, &EntityState::default()).unwrap();
        let mut r = buf.as_slice();
        assert!(matches!(
            decode_entity_update(&mut r),
            Err(DemoError::EntityIndexOutOfRange { index: 1024 })
        ));
    }

    #[test]
    fn bad_magic_reports_found_bytes() {
        let mut r: &[u8] = b"NOTADEMO\x54\0\0\0";
        match decode_header(&mut r) {
            Err(DemoError::InvalidMagic { found }) => assert_eq!(&found, b"NOTADEMO"),
            other => panic!("expected InvalidMagic, got {other:?}"),
        }
    }

    #[test]
    fn short_skip_is_truncated() {
        let mut r: &[u8] = &[0u8; 10];
        assert!(matches!(
            skip_bytes(&mut r, 20, "test"),
            Err(DemoError::Truncated { .. })
        ));
    }

    #[test]
    fn snapshot_record_roundtrip() {
        let snap = Snapshot {
            sequence: 7,
            server_time: 1234,
            player_state: PlayerState {
                client_id: 2,
                position: Vec3::new(1.0, 2.0, 3.0),
                view_angles: ViewAngles::new(5.0, 90.0),
                weapon_id: 8,
                health: 100,
                ..PlayerState::default()
            },
            entities: vec![EntityUpdate {
                index: 12,
                state: EntityState {
                    entity_type: 1,
                    position: Vec3::new(100.0, 0.0, 50.0),
                    client_id: 5,
                    team: 2,
                    ..EntityState::default()
                },
            }],
        };
        let record = Record::Snapshot(snap);
        let mut buf = Vec::new();
        encode_record(&mut buf, &record).unwrap();
        let mut r = &buf[1..];
        let decoded = decode_record_body(&mut r, RecordTag::Snapshot).unwrap();
        assert_eq!(decoded, record);
        assert!(r.is_empty());
    }

    proptest! {
        #[test]
        fn i32_roundtrip(v in any::<i32>()) {
            let mut buf = Vec::new();
            write_i32_le(&mut buf, v).unwrap();
            prop_assert_eq!(read_i32_le(&mut buf.as_slice()).unwrap(), v);
        }

        #[test]
        fn cstring_roundtrip(s in "[ -~]{0,64}") {
            let mut buf = Vec::new();
            write_cstring(&mut buf, &s).unwrap();
            prop_assert_eq!(read_cstring(&mut buf.as_slice()).unwrap(), s);
        }

        #[test]
        fn entity_roundtrip(
            ty in any::<u8>(),
            x in -8192.0f32..8192.0, y in -8192.0f32..8192.0, z in -8192.0f32..8192.0,
            client in any::<i16>(),
            team in 0u8..4,
        ) {
            let e = EntityState {
                entity_type: ty,
                position: Vec3::new(x, y, z),
                client_id: client,
                team,
                ..EntityState::default()
            };
            let mut buf = Vec::new();
            encode_entity(&mut buf, &e).unwrap();
            prop_assert_eq!(decode_entity(&mut buf.as_slice()).unwrap(), e);
        }
    }
}
