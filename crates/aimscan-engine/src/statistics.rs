//! Descriptive per-player aim statistics.
//!
//! These are reported alongside the verdict and do not influence it.

use aimscan_core::{angle_difference, AimSample};
use indexmap::IndexMap;

/// Targeting error a closure starts above (degrees).
const CLOSURE_FROM: f32 = 10.0;
/// Targeting error a closure ends below (degrees).
const CLOSURE_TO: f32 = 5.0;
/// Enemy displacement that marks a target switch (units).
const SWITCH_DISTANCE: f32 = 50.0;

/// Summary of one player's aim behaviour.
///
/// Ratios are fractions in `[0, 1]`. Velocities are degrees/ms and
/// accelerations degrees/ms², taken from the derived sample features.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerStatistics {
    /// Mean angular speed.
    pub average_angular_velocity: f32,
    /// Peak angular speed.
    pub max_angular_velocity: f32,
    /// Population standard deviation of angular speed.
    pub angular_velocity_variability: f32,
    /// Mean angular acceleration magnitude.
    pub average_angular_acceleration: f32,
    /// Peak angular acceleration magnitude.
    pub max_angular_acceleration: f32,
    /// Mean view change between consecutive firing samples (degrees).
    pub average_micro_adjustment: f32,
    /// Share of samples with the attack button held.
    pub firing_ratio: f32,
    /// Most used weapon, ties going to the first seen.
    pub primary_weapon_id: i32,
    /// Share of samples holding [`primary_weapon_id`](Self::primary_weapon_id).
    pub primary_weapon_ratio: f32,
    /// Share of samples with a visible enemy.
    pub enemy_visibility_ratio: f32,
    /// Mean angle to target while an enemy is visible (degrees).
    pub average_targeting_error: f32,
    /// Mean time to close from far off target to on target (ms).
    pub average_reaction_time_ms: Option<f32>,
    /// Mean view speed across target switches.
    pub average_target_switch_speed: Option<f32>,
    /// Peak view speed across target switches.
    pub max_target_switch_speed: Option<f32>,
}

impl PlayerStatistics {
    /// Compute statistics over a player's samples.
    ///
    /// # Examples
    ///
    /// ```
    /// use aimscan_core::{AimSample, Vec3, ViewAngles};
    /// use aimscan_engine::PlayerStatistics;
    ///
    /// let mut a = AimSample::new(0, Vec3::ZERO, ViewAngles::new(0.0, 0.0));
    /// a.is_firing = true;
    /// let b = AimSample::new(10, Vec3::ZERO, ViewAngles::new(0.0, 1.0));
    /// let stats = PlayerStatistics::from_samples(&[a, b]);
    /// assert_eq!(stats.firing_ratio, 0.5);
    /// assert_eq!(stats.average_reaction_time_ms, None);
    /// ```
    pub fn from_samples(samples: &[AimSample]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }
        let n = samples.len() as f32;
        let mut stats = Self::default();

        let speeds: Vec<f32> = samples
            .iter()
            .skip(1)
            .map(|s| s.angular_velocity.magnitude)
            .collect();
        if let Some(avg) = mean(&speeds) {
            stats.average_angular_velocity = avg;
            stats.max_angular_velocity = speeds.iter().copied().fold(0.0, f32::max);
            stats.angular_velocity_variability = std_dev(&speeds, avg);
        }

        let accels: Vec<f32> = samples
            .iter()
            .skip(2)
            .map(|s| s.angular_acceleration.magnitude)
            .collect();
        if let Some(avg) = mean(&accels) {
            stats.average_angular_acceleration = avg;
            stats.max_angular_acceleration = accels.iter().copied().fold(0.0, f32::max);
        }

        let adjustments: Vec<f32> = samples
            .windows(2)
            .filter(|p| p[0].is_firing && p[1].is_firing)
            .map(|p| angle_difference(p[0].view_angles, p[1].view_angles))
            .collect();
        stats.average_micro_adjustment = mean(&adjustments).unwrap_or(0.0);

        stats.firing_ratio = samples.iter().filter(|s| s.is_firing).count() as f32 / n;

        let mut weapons: IndexMap<i32, usize> = IndexMap::new();
        for s in samples {
            *weapons.entry(s.weapon_id).or_insert(0) += 1;
        }
        let mut primary = (samples[0].weapon_id, 0usize);
        for (&weapon, &count) in &weapons {
            if count > primary.1 {
                primary = (weapon, count);
            }
        }
        stats.primary_weapon_id = primary.0;
        stats.primary_weapon_ratio = primary.1 as f32 / n;

        let errors: Vec<f32> = samples.iter().filter_map(AimSample::angle_to_target).collect();
        stats.enemy_visibility_ratio = errors.len() as f32 / n;
        stats.average_targeting_error = mean(&errors).unwrap_or(0.0);

        let reactions: Vec<f32> = samples
            .windows(3)
            .filter(|w| {
                let before = w[0].angle_to_target();
                let after = w[2].angle_to_target();
                matches!((before, after), (Some(b), Some(a)) if b > CLOSURE_FROM && a < CLOSURE_TO)
            })
            .map(|w| w[2].elapsed_since(&w[0]))
            .filter(|&elapsed| elapsed > 0)
            .map(|elapsed| elapsed as f32)
            .collect();
        stats.average_reaction_time_ms = mean(&reactions);

        let switches: Vec<f32> = samples
            .windows(3)
            .filter_map(|w| {
                let (old, new) = (w[0].enemy_position()?, w[2].enemy_position()?);
                let dt = w[2].elapsed_since(&w[0]);
                if old.distance(new) <= SWITCH_DISTANCE || dt <= 0 {
                    return None;
                }
                Some(angle_difference(w[0].view_angles, w[2].view_angles) / dt as f32)
            })
            .collect();
        stats.average_target_switch_speed = mean(&switches);
        stats.max_target_switch_speed = switches.iter().copied().reduce(f32::max);

        stats
    }
}

/// Per-team means of [`PlayerStatistics`], for comparing a player
/// against the rest of their team.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeamAverages {
    /// Team number.
    pub team: i32,
    /// Players averaged.
    pub players: usize,
    /// Field-wise means. Optional fields average the players that have a
    /// value and stay `None` when none do. The primary weapon is the one
    /// most players use, ties going to the first seen.
    pub statistics: PlayerStatistics,
}

impl TeamAverages {
    /// Average `members`, or `None` when there are none.
    pub fn from_statistics<'a>(
        team: i32,
        members: impl IntoIterator<Item = &'a PlayerStatistics>,
    ) -> Option<Self> {
        let members: Vec<&PlayerStatistics> = members.into_iter().collect();
        if members.is_empty() {
            return None;
        }
        let avg = |f: fn(&PlayerStatistics) -> f32| {
            members.iter().map(|m| f(m)).sum::<f32>() / members.len() as f32
        };
        let avg_some = |f: fn(&PlayerStatistics) -> Option<f32>| {
            let values: Vec<f32> = members.iter().filter_map(|m| f(m)).collect();
            mean(&values)
        };

        let mut weapons: IndexMap<i32, usize> = IndexMap::new();
        for m in &members {
            *weapons.entry(m.primary_weapon_id).or_insert(0) += 1;
        }
        let mut primary = (members[0].primary_weapon_id, 0usize);
        for (&weapon, &count) in &weapons {
            if count > primary.1 {
                primary = (weapon, count);
            }
        }

        let statistics = PlayerStatistics {
            average_angular_velocity: avg(|m| m.average_angular_velocity),
            max_angular_velocity: avg(|m| m.max_angular_velocity),
            angular_velocity_variability: avg(|m| m.angular_velocity_variability),
            average_angular_acceleration: avg(|m| m.average_angular_acceleration),
            max_angular_acceleration: avg(|m| m.max_angular_acceleration),
            average_micro_adjustment: avg(|m| m.average_micro_adjustment),
            firing_ratio: avg(|m| m.firing_ratio),
            primary_weapon_id: primary.0,
            primary_weapon_ratio: avg(|m| m.primary_weapon_ratio),
            enemy_visibility_ratio: avg(|m| m.enemy_visibility_ratio),
            average_targeting_error: avg(|m| m.average_targeting_error),
            average_reaction_time_ms: avg_some(|m| m.average_reaction_time_ms),
            average_target_switch_speed: avg_some(|m| m.average_target_switch_speed),
            max_target_switch_speed: avg_some(|m| m.max_target_switch_speed),
        };
        Some(Self {
            team,
            players: members.len(),
            statistics,
        })
    }

    /// Averages for every known team (non-zero) among `players`, given as
    /// `(team, statistics)` pairs, in first-seen team order.
    pub fn by_team<'a>(
        players: impl IntoIterator<Item = (i32, &'a PlayerStatistics)>,
    ) -> IndexMap<i32, TeamAverages> {
        let mut grouped: IndexMap<i32, Vec<&PlayerStatistics>> = IndexMap::new();
        for (team, stats) in players {
            if team != 0 {
                grouped.entry(team).or_default().push(stats);
            }
        }
        grouped
            .into_iter()
            .filter_map(|(team, members)| Some((team, Self::from_statistics(team, members)?)))
            .collect()
    }
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f32>() / values.len() as f32)
    }
}

fn std_dev(values: &[f32], mean: f32) -> f32 {
    let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use aimscan_core::Vec3;
    use aimscan_test_utils::SequenceBuilder;

    #[test]
    fn empty_is_default() {
        assert_eq!(PlayerStatistics::from_samples(&[]), PlayerStatistics::default());
    }

    #[test]
    fn ratios_and_weapon() {
        let samples = SequenceBuilder::new(16)
            .weapon(3)
            .hold(6)
            .weapon(8)
            .firing(true)
            .hold(4)
            .build();
        let s = PlayerStatistics::from_samples(&samples);
        assert_eq!(s.firing_ratio, 0.4);
        assert_eq!(s.primary_weapon_id, 3);
        assert_eq!(s.primary_weapon_ratio, 0.6);
        assert_eq!(s.enemy_visibility_ratio, 0.0);
        assert_eq!(s.average_micro_adjustment, 0.0);
        assert_eq!(s.average_target_switch_speed, None);
    }

    #[test]
    fn uses_derived_velocity() {
        let mut samples = SequenceBuilder::new(10).hold(3).build();
        samples[1].angular_velocity.magnitude = 2.0;
        samples[2].angular_velocity.magnitude = 4.0;
        let s = PlayerStatistics::from_samples(&samples);
        assert_eq!(s.average_angular_velocity, 3.0);
        assert_eq!(s.max_angular_velocity, 4.0);
        assert_eq!(s.angular_velocity_variability, 1.0);
    }

    #[test]
    fn durations_spanning_the_clock() {
        let mut samples = SequenceBuilder::new(20)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .look(0.0, 30.0)
            .hold(2)
            .track(4)
            .enemy(Some(Vec3::new(400.0, 0.0, 500.0)))
            .track(3)
            .build();
        samples[0].timestamp = i32::MIN;
        for (i, s) in samples.iter_mut().enumerate().skip(1) {
            s.timestamp = i32::MAX - 200 + 20 * i as i32;
        }
        let s = PlayerStatistics::from_samples(&samples);
        let reaction = s.average_reaction_time_ms.unwrap();
        assert!(reaction > 40.0 && reaction.is_finite());
        assert!(s.max_target_switch_speed.unwrap().is_finite());
    }

    #[test]
    fn team_averages_per_team() {
        let a = PlayerStatistics {
            firing_ratio: 0.2,
            primary_weapon_id: 3,
            average_reaction_time_ms: Some(200.0),
            ..PlayerStatistics::default()
        };
        let b = PlayerStatistics {
            firing_ratio: 0.6,
            primary_weapon_id: 8,
            ..PlayerStatistics::default()
        };
        let c = PlayerStatistics {
            firing_ratio: 1.0,
            primary_weapon_id: 8,
            average_reaction_time_ms: Some(100.0),
            ..PlayerStatistics::default()
        };
        let unknown = PlayerStatistics::default();
        let teams = TeamAverages::by_team([(1, &a), (2, &b), (0, &unknown), (1, &c)]);
        assert_eq!(teams.keys().copied().collect::<Vec<_>>(), [1, 2]);

        let red = &teams[&1];
        assert_eq!(red.players, 2);
        assert!((red.statistics.firing_ratio - 0.6).abs() < 1e-6);
        assert_eq!(red.statistics.average_reaction_time_ms, Some(150.0));
        assert_eq!(red.statistics.primary_weapon_id, 3);

        let blue = &teams[&2];
        assert_eq!(blue.players, 1);
        assert_eq!(blue.statistics.average_reaction_time_ms, None);
        assert_eq!(blue.statistics.primary_weapon_id, 8);

        assert_eq!(TeamAverages::from_statistics(1, Vec::<&PlayerStatistics>::new()), None);
    }

    #[test]
    fn reaction_and_switch() {
        let samples = SequenceBuilder::new(20)
            .enemy(Some(Vec3::new(0.0, 0.0, 500.0)))
            .look(0.0, 30.0)
            .hold(2)
            .track(4)
            .enemy(Some(Vec3::new(400.0, 0.0, 500.0)))
            .track(3)
            .build();
        let s = PlayerStatistics::from_samples(&samples);
        assert_eq!(s.average_reaction_time_ms, Some(40.0));
        assert!(s.max_target_switch_speed.unwrap() > 0.5);
        assert_eq!(s.enemy_visibility_ratio, 1.0);
    }
}
