//! Heuristic aim-assistance detection rules.
//!
//! Ten independent rules, each a pure function from one player's
//! [`AimSample`](aimscan_core::AimSample) sequence to a
//! [`DetectionResult`](aimscan_core::DetectionResult):
//!
//! | Rule | Module | Minimum samples |
//! |---|---|---|
//! | Snap Aim | [`snap`] | 2 |
//! | Precision Aim | [`precision`] | 10 |
//! | Reaction Time | [`reaction`] | 10 |
//! | Aim Consistency | [`consistency`] | 30 |
//! | Target Priority | [`target_priority`] | 20 |
//! | Smoothness Analysis | [`smoothness`] | 30 |
//! | Aim Jitter | [`jitter`] | 30 |
//! | Aim Lock | [`lock`] | 10 |
//! | Velocity Prediction | [`velocity_prediction`] | 10 |
//! | Ping Prediction | [`ping_prediction`] | 10 |
//!
//! A rule with too little data returns a zero-confidence result with no
//! evidence; it never fails. Confidence is the mean severity of the
//! rule's evidence. [`Rule`] dispatches over the closed set.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod consistency;
pub mod jitter;
pub mod lock;
pub mod ping_prediction;
pub mod precision;
pub mod reaction;
pub mod rule;
pub(crate) mod runs;
pub mod smoothness;
pub mod snap;
pub mod target_priority;
pub mod velocity_prediction;

pub use rule::{evaluate_all, Rule};
