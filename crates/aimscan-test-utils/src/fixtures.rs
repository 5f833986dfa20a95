//! Seeded synthetic players.
//!
//! - [`human_aim`]: noisy, drifting aim with late, overshooting corrections.
//! - [`aimbot_aim`]: idle wander followed by instant snaps and exact tracking.
//! - [`retime`]: move a generated trace to another point on the server clock.
//!
//! Both are deterministic for a given seed.

use aimscan_core::{view_angles_from_direction, AimSample, PlayerRecord, Vec3, ViewAngles};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::{target_info, ENEMY_CLIENT_ID};

/// Sample spacing used by the generators, in milliseconds.
pub const FIXTURE_INTERVAL_MS: i32 = 16;

fn random_enemy(rng: &mut ChaCha8Rng) -> Vec3 {
    Vec3::new(
        rng.random_range(-600.0..600.0),
        rng.random_range(-50.0..50.0),
        rng.random_range(300.0..1500.0),
    )
}

fn push(
    samples: &mut Vec<AimSample>,
    t: i32,
    view: ViewAngles,
    firing: bool,
    enemy: Option<Vec3>,
) {
    samples.push(AimSample {
        timestamp: t,
        position: Vec3::ZERO,
        view_angles: view,
        is_firing: firing,
        weapon_id: 3,
        health: 100,
        target: enemy.map(|e| target_info(Vec3::ZERO, view, e, ENEMY_CLIENT_ID)),
        ..AimSample::default()
    });
}

/// Human-like aim: jittery wander with gradual, imprecise engagement.
pub fn human_aim(seed: u64, n: usize) -> Vec<AimSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n);
    let mut view = ViewAngles::new(0.0, 0.0);
    let mut enemy: Option<Vec3> = None;
    let mut t = 1000;

    for _ in 0..n {
        if enemy.is_none() && rng.random_bool(0.02) {
            enemy = Some(random_enemy(&mut rng));
        } else if enemy.is_some() && rng.random_bool(0.03) {
            enemy = None;
        }

        match enemy {
            Some(e) => {
                let want = view_angles_from_direction(e);
                let gain = rng.random_range(0.05..0.25);
                view.pitch += (want.pitch - view.pitch) * gain + rng.random_range(-0.6..0.6);
                view.yaw += (want.yaw - view.yaw) * gain + rng.random_range(-0.9..0.9);
            }
            None => {
                view.pitch += rng.random_range(-0.4..0.4);
                view.yaw += rng.random_range(-1.2..1.2);
            }
        }
        view.pitch = view.pitch.clamp(-85.0, 85.0);

        let firing = enemy.is_some() && rng.random_bool(0.4);
        push(&mut samples, t, view, firing, enemy);
        if let Some(e) = enemy.as_mut() {
            *e = *e + Vec3::new(rng.random_range(-4.0..4.0), 0.0, rng.random_range(-4.0..4.0));
        }
        t += FIXTURE_INTERVAL_MS + rng.random_range(-2..=2);
    }
    samples
}

/// Aimbot-like aim: snaps onto each new enemy within one sample and then
/// tracks it exactly while firing.
pub fn aimbot_aim(seed: u64, n: usize) -> Vec<AimSample> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(n);
    let mut view = ViewAngles::new(0.0, 0.0);
    let mut enemy: Option<Vec3> = None;
    let mut velocity = Vec3::ZERO;
    let mut t = 1000;

    for i in 0..n {
        if i % 40 == 0 {
            enemy = None;
        } else if i % 40 == 8 {
            enemy = Some(random_enemy(&mut rng));
            velocity = Vec3::new(rng.random_range(-6.0..6.0), 0.0, rng.random_range(-6.0..6.0));
        }

        let firing = match enemy {
            Some(e) => {
                view = view_angles_from_direction(e);
                true
            }
            None => {
                view.yaw += rng.random_range(-0.3..0.3);
                false
            }
        };
        push(&mut samples, t, view, firing, enemy);
        if let Some(e) = enemy.as_mut() {
            *e = *e + velocity;
        }
        t += FIXTURE_INTERVAL_MS;
    }
    samples
}

/// Shift `samples` so the first one lands on `start`, keeping the
/// spacing. Timestamps that would pass `i32::MAX` saturate there.
pub fn retime(samples: &mut [AimSample], start: i32) {
    let Some(first) = samples.first().map(|s| s.timestamp) else {
        return;
    };
    for s in samples.iter_mut() {
        let shifted = i64::from(start) + i64::from(s.timestamp) - i64::from(first);
        s.timestamp = shifted.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32;
    }
}

/// A roster of `humans` human-like players followed by `bots` aimbot
/// players, each with `n` samples. Client ids start at 1.
pub fn roster(seed: u64, humans: usize, bots: usize, n: usize) -> Vec<PlayerRecord> {
    let mut players = Vec::with_capacity(humans + bots);
    for i in 0..humans {
        let id = players.len() as i32 + 1;
        players.push(PlayerRecord::with_samples(
            id,
            format!("human{i}"),
            1,
            human_aim(seed.wrapping_add(id as u64), n),
        ));
    }
    for i in 0..bots {
        let id = players.len() as i32 + 1;
        players.push(PlayerRecord::with_samples(
            id,
            format!("bot{i}"),
            2,
            aimbot_aim(seed.wrapping_add(id as u64), n),
        ));
    }
    players
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generators_are_deterministic() {
        assert_eq!(human_aim(7, 200), human_aim(7, 200));
        assert_eq!(aimbot_aim(7, 200), aimbot_aim(7, 200));
        assert_ne!(human_aim(7, 200), human_aim(8, 200));
    }

    #[test]
    fn timestamps_strictly_increase() {
        for s in [human_aim(3, 300), aimbot_aim(3, 300)] {
            assert_eq!(s.len(), 300);
            assert!(s.windows(2).all(|w| w[1].timestamp > w[0].timestamp));
        }
    }

    #[test]
    fn retime_keeps_spacing_up_to_the_clock_limit() {
        let mut s = human_aim(2, 5);
        retime(&mut s, i32::MAX - 40);
        let times: Vec<i32> = s.iter().map(|s| s.timestamp).collect();
        assert_eq!(
            times,
            vec![i32::MAX - 40, i32::MAX - 24, i32::MAX - 8, i32::MAX, i32::MAX]
        );
        retime(&mut s, i32::MIN);
        assert_eq!(s[1].timestamp, i32::MIN + 16);
    }

    #[test]
    fn roster_keeps_every_sample() {
        let players = roster(1, 2, 1, 100);
        assert_eq!(players.len(), 3);
        assert!(players.iter().all(|p| p.len() == 100));
        assert_eq!(players[2].client_id, 3);
    }
}
