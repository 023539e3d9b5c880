//! fastrack: a fast analytic estimator of tracking-detector resolution
//! and efficiency.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all fastrack sub-crates. For most users, adding `fastrack` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use fastrack::prelude::*;
//!
//! // Three silicon layers at 1.8, 2.4 and 3.0 cm.
//! let mut registry = LayerRegistry::new();
//! for (i, r) in [1.8, 2.4, 3.0].into_iter().enumerate() {
//!     registry
//!         .add_layer(LayerSpec::active(format!("ddd{}", i + 1), r, 0.0005, 0.0006, 0.0006, 0.98))
//!         .unwrap();
//! }
//! let geometry = registry.build().unwrap();
//!
//! let config = EngineConfig {
//!     cuts: GlobalCuts { min_hits: 3, min_correlated_hits: 3, max_fake_hits: 0 },
//!     ..EngineConfig::default()
//! };
//! let solver = Solver::new(geometry, config).unwrap();
//! let report = solver.solve(&ScanGrid::point(1.0, 0.0)).unwrap();
//!
//! let curve = report.curve(ReportMode::TrackerOnly, ResolutionQuantity::PtRelative);
//! assert_eq!(curve.len(), 1);
//! assert!(curve[0].value > 0.0);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `fastrack-core` | IDs, errors, particle kinematics, cuts, covariance |
//! | [`geometry`] | `fastrack-geometry` | Layer registry, frozen geometry, ITS3 preset |
//! | [`propagator`] | `fastrack-propagator` | Material budget, energy loss, Billoir fit |
//! | [`hitpattern`] | `fastrack-hitpattern` | Hit-pattern enumeration and aggregation |
//! | [`engine`] | `fastrack-engine` | Solver, scan grids, worker pool, result sink |
//! | [`report`] | `fastrack-report` | Tab-separated reports and fingerprints |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, errors, and traits (`fastrack-core`).
///
/// Contains [`types::ParticleSample`], [`types::GlobalCuts`],
/// [`types::TrackCovariance`], and the [`types::CovarianceSource`] trait.
pub use fastrack_core as types;

/// Detector geometry (`fastrack-geometry`).
///
/// Build layouts with [`geometry::LayerRegistry`] and freeze them into a
/// [`geometry::Geometry`]; [`geometry::Its3Config`] is the ITS3 preset.
pub use fastrack_geometry as geometry;

/// Material budget and covariance propagation (`fastrack-propagator`).
pub use fastrack_propagator as propagator;

/// Hit-pattern combinatorics (`fastrack-hitpattern`).
pub use fastrack_hitpattern as hitpattern;

/// Scan engine (`fastrack-engine`).
///
/// [`engine::Solver`] evaluates single samples or whole
/// [`engine::ScanGrid`]s on a worker pool.
pub use fastrack_engine as engine;

/// Report writing (`fastrack-report`).
pub use fastrack_report as report;

/// Common imports for typical fastrack usage.
///
/// ```rust
/// use fastrack::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use fastrack_core::{
        GlobalCuts, LayerId, ParameterResolution, ParticleSample, ResolutionQuantity,
        SampleIndex, TrackCovariance, TrackParameter,
    };

    // Errors
    pub use fastrack_core::{ConfigError, FitError};

    // Geometry
    pub use fastrack_geometry::{AuxDetectorSpec, Geometry, Its3Config, LayerRegistry, LayerSpec};

    // Propagator
    pub use fastrack_propagator::{FitOptions, MaterialBudget, TrackModel};

    // Engine
    pub use fastrack_engine::{
        CancelToken, EngineConfig, ParticleConfig, PtAxis, ReportMode, ScanGrid, ScanMetrics,
        ScanReport, Solver, Spacing, WorkerConfig,
    };

    // Report
    pub use fastrack_report::{report, ReportError};
}
