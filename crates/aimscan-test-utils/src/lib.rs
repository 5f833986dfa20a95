//! Test utilities and sample builders for aimscan development.
//!
//! [`SequenceBuilder`] scripts an aim trace step by step (hold still,
//! turn, track an enemy, toggle firing). The [`fixtures`] module provides
//! seeded synthetic players for determinism and pipeline tests.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use aimscan_core::{
    angle_delta, view_angles_from_direction, AimSample, AngularComponents, PlayerRecord,
    TargetInfo, Vec3, ViewAngles,
};

/// Client id given to scripted enemies.
pub const ENEMY_CLIENT_ID: i32 = 1;

/// Target geometry for a player at `from` looking along `view` with an
/// enemy at `enemy`.
pub fn target_info(from: Vec3, view: ViewAngles, enemy: Vec3, client_id: i32) -> TargetInfo {
    let aim = view_angles_from_direction(enemy - from);
    let (dp, dy) = angle_delta(aim, view);
    TargetInfo {
        client_id,
        position: enemy,
        distance: from.distance(enemy),
        target_angles: aim,
        angle_to_target: AngularComponents::from_axes(dp, dy),
    }
}

/// Wrap samples into a player record.
pub fn record(client_id: i32, name: &str, samples: Vec<AimSample>) -> PlayerRecord {
    PlayerRecord::with_samples(client_id, name, 1, samples)
}

/// Fluent builder for scripted aim sequences.
///
/// Every emitted sample advances the clock by the sample interval. An
/// enemy, when set, moves by its per-sample velocity after each sample.
#[derive(Clone, Debug)]
pub struct SequenceBuilder {
    interval: i32,
    time: i32,
    angles: ViewAngles,
    position: Vec3,
    firing: bool,
    weapon: i32,
    enemy: Option<Vec3>,
    enemy_velocity: Vec3,
    samples: Vec<AimSample>,
}

impl SequenceBuilder {
    pub fn new(interval_ms: i32) -> Self {
        Self {
            interval: interval_ms,
            time: 1000,
            angles: ViewAngles::default(),
            position: Vec3::ZERO,
            firing: false,
            weapon: 3,
            enemy: None,
            enemy_velocity: Vec3::ZERO,
            samples: Vec::new(),
        }
    }

    pub fn start_at(mut self, time: i32) -> Self {
        self.time = time;
        self
    }

    pub fn look(mut self, pitch: f32, yaw: f32) -> Self {
        self.angles = ViewAngles::new(pitch, yaw);
        self
    }

    pub fn firing(mut self, on: bool) -> Self {
        self.firing = on;
        self
    }

    pub fn weapon(mut self, weapon: i32) -> Self {
        self.weapon = weapon;
        self
    }

    pub fn enemy(mut self, position: Option<Vec3>) -> Self {
        self.enemy = position;
        self
    }

    /// Enemy displacement per emitted sample.
    pub fn enemy_velocity(mut self, velocity: Vec3) -> Self {
        self.enemy_velocity = velocity;
        self
    }

    /// Advance the clock without emitting.
    pub fn gap(mut self, ms: i32) -> Self {
        self.time += ms;
        self
    }

    /// Emit `n` samples at the current angles.
    pub fn hold(mut self, n: usize) -> Self {
        for _ in 0..n {
            self.emit();
        }
        self
    }

    /// Emit `n` samples, rotating by `(dpitch, dyaw)` before each.
    pub fn turn(mut self, n: usize, dpitch: f32, dyaw: f32) -> Self {
        for _ in 0..n {
            self.angles.pitch += dpitch;
            self.angles.yaw += dyaw;
            self.emit();
        }
        self
    }

    /// Emit `n` samples aimed exactly at the enemy.
    pub fn track(mut self, n: usize) -> Self {
        for _ in 0..n {
            if let Some(enemy) = self.enemy {
                self.angles = view_angles_from_direction(enemy - self.position);
            }
            self.emit();
        }
        self
    }

    fn emit(&mut self) {
        let target = self
            .enemy
            .map(|e| target_info(self.position, self.angles, e, ENEMY_CLIENT_ID));
        self.samples.push(AimSample {
            timestamp: self.time,
            position: self.position,
            view_angles: self.angles,
            is_firing: self.firing,
            weapon_id: self.weapon,
            health: 100,
            target,
            ..AimSample::default()
        });
        self.time += self.interval;
        if let Some(enemy) = self.enemy.as_mut() {
            *enemy = *enemy + self.enemy_velocity;
        }
    }

    pub fn build(self) -> Vec<AimSample> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_advances_clock() {
        let s = SequenceBuilder::new(10).start_at(0).hold(3).gap(100).hold(1).build();
        let times: Vec<i32> = s.iter().map(|x| x.timestamp).collect();
        assert_eq!(times, vec![0, 10, 20, 130]);
    }

    #[test]
    fn tracking_has_zero_error() {
        let s = SequenceBuilder::new(10)
            .enemy(Some(Vec3::new(100.0, 0.0, 500.0)))
            .enemy_velocity(Vec3::new(5.0, 0.0, 0.0))
            .track(5)
            .build();
        for x in &s {
            assert!(x.angle_to_target().unwrap() < 1e-3);
        }
    }
}
