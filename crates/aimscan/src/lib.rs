//! aimscan: statistical aim-assistance detection for recorded FPS match demos.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! aimscan sub-crates. For most users, adding `aimscan` as a single dependency
//! is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use aimscan::prelude::*;
//! use aimscan::demo::{DemoWriter, Gamestate, PlayerState, Snapshot};
//!
//! // Record 40 snapshots of a player holding one direction.
//! let mut writer = DemoWriter::new(Vec::new())?;
//! writer.write_gamestate(&Gamestate::default())?;
//! for i in 0..40 {
//!     writer.write_snapshot(&Snapshot {
//!         sequence: i,
//!         server_time: 1000 + i * 16,
//!         player_state: PlayerState {
//!             view_angles: ViewAngles::new(0.0, 45.0),
//!             ..PlayerState::default()
//!         },
//!         entities: Vec::new(),
//!     })?;
//! }
//! let bytes = writer.finish()?;
//!
//! let replay = parse(bytes.as_slice())?;
//! let mut analyzer = Analyzer::new(AnalyzerConfig::default())?;
//! let reports = analyzer.analyze_replay(&replay)?;
//! assert_eq!(reports.len(), 1);
//! assert!(reports[0].result("Aim Lock Detection").unwrap().is_flagged());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `aimscan-core` | Vectors, view angles, aim samples, detection results, cancellation |
//! | [`demo`] | `aimscan-demo` | Demo decoding, session tracking, feature derivation, `DemoWriter` |
//! | [`rules`] | `aimscan-rules` | The ten detection rules |
//! | [`engine`] | `aimscan-engine` | Analyzer, score aggregation, statistics, calibration |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types and angle math (`aimscan-core`).
///
/// Contains [`types::AimSample`], [`types::PlayerRecord`],
/// [`types::DetectionResult`], and the [`types::CancelToken`].
pub use aimscan_core as types;

/// Demo decoding (`aimscan-demo`).
///
/// [`demo::parse`] turns a byte stream into a [`demo::Replay`];
/// [`demo::DemoWriter`] produces one.
pub use aimscan_demo as demo;

/// Detection rules (`aimscan-rules`).
///
/// Each rule is a pure function over one player's samples, dispatched
/// through [`rules::Rule`].
pub use aimscan_rules as rules;

/// Analysis engine (`aimscan-engine`).
///
/// [`engine::Analyzer`] for verdicts, [`engine::CalibratedAnalyzer`] for
/// baselines learned from clean players.
pub use aimscan_engine as engine;

/// Common imports for typical aimscan usage.
///
/// ```rust
/// use aimscan::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use aimscan_core::{
        AimSample, CancelToken, DetectionResult, Evidence, PlayerRecord, Vec3, ViewAngles,
    };

    // Decoding
    pub use aimscan_demo::{parse, parse_file, DemoError, DemoParser, Replay};

    // Rules
    pub use aimscan_rules::Rule;

    // Engine
    pub use aimscan_engine::{
        AnalysisError, Analyzer, AnalyzerConfig, CalibratedAnalyzer, CalibrationProfile,
        PlayerReport, SupportsCalibration, WeightTable,
    };
}
