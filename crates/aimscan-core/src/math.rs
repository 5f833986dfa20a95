//! Vector and view-angle math.
//!
//! View angles follow the game's convention: `pitch` is rotation about
//! the horizontal axis (positive looks down), `yaw` is rotation about the
//! vertical axis. All angles are in degrees. Direction vectors convert to
//! angles as `pitch = atan2(-dy, horizontal)` and `yaw = atan2(dx, dz)`;
//! [`forward_vector`] is the exact inverse of that mapping.

use std::ops::{Add, Div, Mul, Sub};

/// A position or direction in world units.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component (vertical).
    pub y: f32,
    /// Z component.
    pub z: f32,
}

impl Vec3 {
    /// The zero vector.
    pub const ZERO: Vec3 = Vec3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Construct a vector from its components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Dot product.
    pub fn dot(self, other: Vec3) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length.
    pub fn length(self) -> f32 {
        self.dot(self).sqrt()
    }

    /// Euclidean distance to `other`.
    pub fn distance(self, other: Vec3) -> f32 {
        (self - other).length()
    }

    /// Unit vector in the same direction, or `None` for a zero-length
    /// (or non-finite) vector.
    pub fn normalized(self) -> Option<Vec3> {
        let len = self.length();
        if len > f32::EPSILON && len.is_finite() {
            Some(self / len)
        } else {
            None
        }
    }
}

impl Add for Vec3 {
    type Output = Vec3;

    fn add(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vec3 {
    type Output = Vec3;

    fn sub(self, rhs: Vec3) -> Vec3 {
        Vec3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vec3 {
    type Output = Vec3;

    fn mul(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Div<f32> for Vec3 {
    type Output = Vec3;

    fn div(self, rhs: f32) -> Vec3 {
        Vec3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

/// A view direction in degrees.
///
/// `roll` is decoded and kept for completeness but never participates in
/// angle differences.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViewAngles {
    /// Vertical look angle.
    pub pitch: f32,
    /// Horizontal look angle.
    pub yaw: f32,
    /// Camera roll.
    pub roll: f32,
}

impl ViewAngles {
    /// Construct view angles with zero roll.
    pub const fn new(pitch: f32, yaw: f32) -> Self {
        Self {
            pitch,
            yaw,
            roll: 0.0,
        }
    }
}

/// Wrap an angle into `[-180, 180)`.
///
/// # Examples
///
/// ```
/// use aimscan_core::normalize_angle;
///
/// assert_eq!(normalize_angle(190.0), -170.0);
/// assert_eq!(normalize_angle(-350.0), 10.0);
/// assert_eq!(normalize_angle(45.0), 45.0);
/// ```
pub fn normalize_angle(angle: f32) -> f32 {
    (angle + 180.0).rem_euclid(360.0) - 180.0
}

/// Signed, wrap-normalized `(pitch, yaw)` change going from `from` to `to`.
pub fn angle_delta(from: ViewAngles, to: ViewAngles) -> (f32, f32) {
    (
        normalize_angle(to.pitch - from.pitch),
        normalize_angle(to.yaw - from.yaw),
    )
}

/// Wrap-aware angular distance between two view directions.
///
/// The Euclidean norm of the normalized pitch and yaw differences, so a
/// turn from yaw 179° to yaw -179° is 2°, not 358°.
///
/// # Examples
///
/// ```
/// use aimscan_core::{angle_difference, ViewAngles};
///
/// let a = ViewAngles::new(0.0, 179.0);
/// let b = ViewAngles::new(0.0, -179.0);
/// assert!((angle_difference(a, b) - 2.0).abs() < 1e-4);
/// ```
pub fn angle_difference(a: ViewAngles, b: ViewAngles) -> f32 {
    let (dp, dy) = angle_delta(a, b);
    (dp * dp + dy * dy).sqrt()
}

/// View angles that look exactly along `direction`.
///
/// Returns zero angles for a zero-length direction.
pub fn view_angles_from_direction(direction: Vec3) -> ViewAngles {
    if direction == Vec3::ZERO {
        return ViewAngles::default();
    }
    let horizontal = (direction.x * direction.x + direction.z * direction.z).sqrt();
    ViewAngles::new(
        (-direction.y).atan2(horizontal).to_degrees(),
        direction.x.atan2(direction.z).to_degrees(),
    )
}

/// Unit forward vector for the given view angles.
pub fn forward_vector(angles: ViewAngles) -> Vec3 {
    let pitch = angles.pitch.to_radians();
    let yaw = angles.yaw.to_radians();
    Vec3::new(
        pitch.cos() * yaw.sin(),
        -pitch.sin(),
        pitch.cos() * yaw.cos(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn normalize_handles_boundaries() {
        assert_eq!(normalize_angle(180.0), -180.0);
        assert_eq!(normalize_angle(-180.0), -180.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert_eq!(normalize_angle(540.0), -180.0);
    }

    #[test]
    fn angle_difference_wraps_yaw() {
        let a = ViewAngles::new(10.0, 350.0);
        let b = ViewAngles::new(10.0, 10.0);
        assert!((angle_difference(a, b) - 20.0).abs() < 1e-4);
    }

    #[test]
    fn angle_difference_ignores_roll() {
        let a = ViewAngles {
            pitch: 1.0,
            yaw: 2.0,
            roll: 0.0,
        };
        let b = ViewAngles {
            pitch: 1.0,
            yaw: 2.0,
            roll: 90.0,
        };
        assert_eq!(angle_difference(a, b), 0.0);
    }

    #[test]
    fn straight_ahead_is_zero_angles() {
        let angles = view_angles_from_direction(Vec3::new(0.0, 0.0, 10.0));
        assert!(angles.pitch.abs() < 1e-5);
        assert!(angles.yaw.abs() < 1e-5);
    }

    #[test]
    fn looking_down_is_positive_pitch() {
        let angles = view_angles_from_direction(Vec3::new(0.0, -1.0, 1.0));
        assert!((angles.pitch - 45.0).abs() < 1e-4);
    }

    #[test]
    fn zero_direction_gives_zero_angles() {
        assert_eq!(view_angles_from_direction(Vec3::ZERO), ViewAngles::default());
    }

    #[test]
    fn normalized_rejects_zero() {
        assert!(Vec3::ZERO.normalized().is_none());
        let n = Vec3::new(3.0, 0.0, 4.0).normalized().unwrap();
        assert!((n.length() - 1.0).abs() < 1e-6);
    }

    proptest! {
        #[test]
        fn normalize_stays_in_range(a in -10_000.0f32..10_000.0) {
            let n = normalize_angle(a);
            prop_assert!((-180.0..180.0).contains(&n));
        }

        #[test]
        fn forward_vector_inverts_direction_angles(
            pitch in -85.0f32..85.0,
            yaw in -179.0f32..179.0,
        ) {
            let fwd = forward_vector(ViewAngles::new(pitch, yaw));
            prop_assert!((fwd.length() - 1.0).abs() < 1e-4);
            let back = view_angles_from_direction(fwd);
            prop_assert!(angle_difference(back, ViewAngles::new(pitch, yaw)) < 1e-2);
        }

        #[test]
        fn angle_difference_is_symmetric(
            p1 in -90.0f32..90.0, y1 in -360.0f32..360.0,
            p2 in -90.0f32..90.0, y2 in -360.0f32..360.0,
        ) {
            let a = ViewAngles::new(p1, y1);
            let b = ViewAngles::new(p2, y2);
            prop_assert!((angle_difference(a, b) - angle_difference(b, a)).abs() < 1e-3);
        }
    }
}
