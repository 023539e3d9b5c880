//! Scan driver for the fastrack resolution estimator.
//!
//! A [`Solver`] binds a frozen [`Geometry`](fastrack_geometry::Geometry)
//! to an [`EngineConfig`] and evaluates (pt, η) samples:
//!
//! - [`Solver::evaluate`] runs one sample on the calling thread.
//! - [`Solver::solve`] and [`Solver::solve_with`] spread a [`ScanGrid`]
//!   over named worker threads. Workers share the solver read-only and
//!   report to a single collector, which owns the [`ResultSink`].
//!
//! Every sample yields a [`ScanEntry`] with a tracker-only outcome and,
//! when auxiliary detectors are configured, a combined outcome. Fit
//! failures stay per sample; configuration errors abort the scan.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod cancel;
pub mod config;
pub mod grid;
pub mod metrics;
mod pool;
pub mod result;
pub mod sink;
pub mod solver;

pub use cancel::CancelToken;
pub use config::{EngineConfig, ParticleConfig, WorkerConfig};
pub use fastrack_propagator::{FitOptions, SeedPrior};
pub use grid::{PtAxis, ScanGrid, ScanPoint, Spacing};
pub use metrics::ScanMetrics;
pub use result::{ReportMode, ResolutionResult, SampleFailure, SampleOutcome, ScanEntry};
pub use sink::{CurvePoint, ResultSink, ScanReport};
pub use solver::Solver;
