//! Benchmark profiles for the aimscan replay analyzer.
//!
//! Provides deterministic synthetic demos for benchmarks:
//!
//! - [`reference_match`]: one minute at 62.5 snapshots/s with 4 enemies
//! - [`stress_match`]: ten minutes with 12 enemies
//! - [`reference_player`]: the decoded recorder of [`reference_match`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use aimscan_core::{view_angles_from_direction, PlayerRecord, Vec3, ViewAngles};
use aimscan_demo::{
    parse, DemoError, DemoWriter, EntityState, EntityUpdate, Gamestate, PlayerState, Snapshot,
    CS_PLAYERS, ENTITY_TYPE_PLAYER,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Snapshot spacing in milliseconds.
pub const SNAPSHOT_INTERVAL_MS: i32 = 16;

/// Build a reference benchmark demo: 60s, 4 enemies.
pub fn reference_match(seed: u64) -> Result<Vec<u8>, DemoError> {
    synthetic_match(seed, 60_000, 4)
}

/// Build a stress benchmark demo: 600s, 12 enemies.
pub fn stress_match(seed: u64) -> Result<Vec<u8>, DemoError> {
    synthetic_match(seed, 600_000, 12)
}

/// Decode [`reference_match`] and return its recorder.
pub fn reference_player(seed: u64) -> Result<PlayerRecord, DemoError> {
    let bytes = reference_match(seed)?;
    let replay = parse(bytes.as_slice())?;
    replay
        .into_players()
        .into_iter()
        .next()
        .ok_or_else(|| DemoError::Truncated {
            detail: "reference match produced no recorder".into(),
        })
}

/// Generate a deterministic demo lasting `duration_ms`.
///
/// The recorder (client 0, team 1) wanders, periodically snaps onto the
/// nearest enemy and fires while tracking it. Enemies (clients 1..,
/// team 2) drift at random. Every fourth snapshot carries a mouse delta.
pub fn synthetic_match(seed: u64, duration_ms: i32, enemies: usize) -> Result<Vec<u8>, DemoError> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut w = DemoWriter::new(Vec::new())?;

    let mut positions: Vec<Vec3> = (0..enemies)
        .map(|_| {
            Vec3::new(
                rng.random_range(-800.0..800.0),
                rng.random_range(-40.0..40.0),
                rng.random_range(200.0..1600.0),
            )
        })
        .collect();

    let mut config_strings = vec![(CS_PLAYERS, r"n\Recorder\t\1".to_string())];
    for i in 0..enemies {
        config_strings.push((CS_PLAYERS + i as i32 + 1, format!(r"n\Enemy{i}\t\2")));
    }
    w.write_gamestate(&Gamestate {
        sequence: 0,
        config_strings,
        baselines: enemy_updates(&positions),
    })?;

    let mut view = ViewAngles::new(0.0, 0.0);
    let mut firing = false;
    let mut time = 1000;
    let end = time + duration_ms;
    let mut step = 0u32;
    while time < end {
        for p in positions.iter_mut() {
            *p = *p + Vec3::new(rng.random_range(-5.0..5.0), 0.0, rng.random_range(-5.0..5.0));
        }

        let engaging = step % 120 >= 60;
        if engaging {
            if let Some(nearest) = positions
                .iter()
                .copied()
                .min_by(|a, b| a.length().total_cmp(&b.length()))
            {
                view = view_angles_from_direction(nearest);
            }
        } else {
            view.yaw += rng.random_range(-1.0..1.0);
            view.pitch = (view.pitch + rng.random_range(-0.3..0.3)).clamp(-60.0, 60.0);
        }

        w.write_snapshot(&Snapshot {
            sequence: step as i32,
            server_time: time,
            player_state: PlayerState {
                client_id: 0,
                command_time: time,
                view_angles: view,
                weapon_id: 3,
                health: 100,
                max_health: 100,
                ..PlayerState::default()
            },
            entities: enemy_updates(&positions),
        })?;

        if engaging != firing {
            firing = engaging;
            w.write_client_command(step as i32, if firing { "+attack" } else { "-attack" })?;
        }
        if step % 4 == 0 {
            let (dx, dy) = (rng.random_range(-2.0..2.0f32), rng.random_range(-2.0..2.0f32));
            w.write_client_command(step as i32, &format!("mdelta {dx:.3} {dy:.3}"))?;
        }

        time += SNAPSHOT_INTERVAL_MS;
        step += 1;
    }
    w.finish()
}

fn enemy_updates(positions: &[Vec3]) -> Vec<EntityUpdate> {
    positions
        .iter()
        .enumerate()
        .map(|(i, &position)| EntityUpdate {
            index: i + 1,
            state: EntityState {
                entity_type: ENTITY_TYPE_PLAYER,
                position,
                client_id: i as i16 + 1,
                team: 2,
                ..EntityState::default()
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_match_is_deterministic() {
        assert_eq!(reference_match(42).unwrap(), reference_match(42).unwrap());
        assert_ne!(reference_match(42).unwrap(), reference_match(43).unwrap());
    }

    #[test]
    fn reference_player_has_every_snapshot() {
        let player = reference_player(7).unwrap();
        assert_eq!(player.client_id, 0);
        assert_eq!(player.name, "Recorder");
        assert_eq!(player.len(), (60_000 / SNAPSHOT_INTERVAL_MS) as usize);
        assert!(player.samples().iter().any(|s| s.is_firing));
        assert!(player.samples().iter().any(|s| s.has_visible_enemy()));
    }
}
