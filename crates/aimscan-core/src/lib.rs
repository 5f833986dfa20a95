//! Core types and angle math for the aimscan replay analyzer.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the data shared by the decoder, the detection rules, and the engine:
//! vectors and view angles, reconstructed aim samples, per-player
//! records, detection evidence, and the cooperative cancellation token.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod detection;
pub mod error;
pub mod math;
pub mod sample;

pub use cancel::CancelToken;
pub use detection::{clamp_unit, DetectionResult, Evidence};
pub use error::Cancelled;
pub use math::{
    angle_delta, angle_difference, forward_vector, normalize_angle, view_angles_from_direction,
    Vec3, ViewAngles,
};
pub use sample::{elapsed_ms, AimSample, AngularComponents, PlayerRecord, TargetInfo};

/// Minimum number of samples a player needs to be retained after decoding.
pub const MIN_PLAYER_SAMPLES: usize = 10;
