//! Reconstructed aim samples and per-player records.

use crate::math::{Vec3, ViewAngles};

/// A pitch/yaw pair plus its combined Euclidean magnitude.
///
/// Used for angular velocity (degrees/ms), angular acceleration
/// (degrees/ms²), and angle-to-target (degrees).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AngularComponents {
    /// Pitch component.
    pub pitch: f32,
    /// Yaw component.
    pub yaw: f32,
    /// `sqrt(pitch² + yaw²)`.
    pub magnitude: f32,
}

impl AngularComponents {
    /// Build from the two axis components, computing the magnitude.
    pub fn from_axes(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch,
            yaw,
            magnitude: (pitch * pitch + yaw * yaw).sqrt(),
        }
    }
}

/// The nearest visible enemy at the instant of a sample.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetInfo {
    /// Client id of the enemy.
    pub client_id: i32,
    /// Last known enemy position at or before the sample time.
    pub position: Vec3,
    /// Distance from the sampled player to the enemy.
    pub distance: f32,
    /// View angles that would aim exactly at `position`.
    ///
    /// Filled in by the feature derivation pass.
    pub target_angles: ViewAngles,
    /// Wrap-aware deviation of the actual view from `target_angles`.
    ///
    /// Filled in by the feature derivation pass.
    pub angle_to_target: AngularComponents,
}

/// One reconstructed instant of a player's aim.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AimSample {
    /// Server time in milliseconds.
    pub timestamp: i32,
    /// Eye position.
    pub position: Vec3,
    /// View direction.
    pub view_angles: ViewAngles,
    /// Whether the attack button was held.
    pub is_firing: bool,
    /// Selected weapon.
    pub weapon_id: i32,
    /// Health at the time of the sample.
    pub health: i32,
    /// Per-axis angular velocity relative to the previous sample.
    pub angular_velocity: AngularComponents,
    /// Per-axis angular acceleration relative to the previous sample.
    pub angular_acceleration: AngularComponents,
    /// Nearest visible enemy, if any.
    pub target: Option<TargetInfo>,
}

impl AimSample {
    /// Create a sample with no derived metrics and no target.
    pub fn new(timestamp: i32, position: Vec3, view_angles: ViewAngles) -> Self {
        Self {
            timestamp,
            position,
            view_angles,
            ..Self::default()
        }
    }

    /// Whether an enemy was visible at this instant.
    pub fn has_visible_enemy(&self) -> bool {
        self.target.is_some()
    }

    /// Combined angle-to-target magnitude, if an enemy was visible.
    pub fn angle_to_target(&self) -> Option<f32> {
        self.target.map(|t| t.angle_to_target.magnitude)
    }

    /// Position of the nearest visible enemy, if any.
    pub fn enemy_position(&self) -> Option<Vec3> {
        self.target.map(|t| t.position)
    }

    /// Milliseconds from `earlier` to this sample, negative when
    /// `earlier` is actually later.
    ///
    /// Computed in `i64` so any pair of `i32` server times is representable.
    pub fn elapsed_since(&self, earlier: &AimSample) -> i64 {
        elapsed_ms(earlier.timestamp, self.timestamp)
    }
}

/// Milliseconds from `from` to `to` over the full `i32` range.
pub fn elapsed_ms(from: i32, to: i32) -> i64 {
    i64::from(to) - i64::from(from)
}

/// Identity and aim history of one player.
///
/// Sample timestamps are strictly increasing: [`push_sample`] refuses a
/// sample whose timestamp is not after the previous one.
///
/// [`push_sample`]: PlayerRecord::push_sample
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlayerRecord {
    /// Client slot id.
    pub client_id: i32,
    /// Display name.
    pub name: String,
    /// Team number (0 when unknown).
    pub team: i32,
    samples: Vec<AimSample>,
}

impl PlayerRecord {
    /// Create an empty record.
    pub fn new(client_id: i32, name: impl Into<String>, team: i32) -> Self {
        Self {
            client_id,
            name: name.into(),
            team,
            samples: Vec::new(),
        }
    }

    /// Create a record from an existing sample list, dropping any sample
    /// whose timestamp does not advance past its predecessor.
    pub fn with_samples(
        client_id: i32,
        name: impl Into<String>,
        team: i32,
        samples: impl IntoIterator<Item = AimSample>,
    ) -> Self {
        let mut record = Self::new(client_id, name, team);
        for sample in samples {
            record.push_sample(sample);
        }
        record
    }

    /// Append a sample. Returns `false` (and drops the sample) when its
    /// timestamp is not strictly after the last sample's.
    pub fn push_sample(&mut self, sample: AimSample) -> bool {
        if let Some(last) = self.samples.last() {
            if sample.timestamp <= last.timestamp {
                return false;
            }
        }
        self.samples.push(sample);
        true
    }

    /// The ordered sample sequence.
    pub fn samples(&self) -> &[AimSample] {
        &self.samples
    }

    /// Mutable access to the samples for in-place metric derivation.
    ///
    /// The slice cannot be resized, so the timestamp ordering holds as
    /// long as callers leave `timestamp` alone.
    pub fn samples_mut(&mut self) -> &mut [AimSample] {
        &mut self.samples
    }

    /// The most recently appended sample.
    pub fn last_sample_mut(&mut self) -> Option<&mut AimSample> {
        self.samples.last_mut()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Whether the record has no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
