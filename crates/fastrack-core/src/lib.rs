//! Core types and traits for the fastrack resolution estimator.
//!
//! This is the leaf crate of the workspace. It defines the vocabulary
//! shared by the geometry, propagator, hit-pattern, and engine crates:
//! particle kinematics, global quality cuts, hit masks, the 5×5 track
//! covariance, error types, and the [`CovarianceSource`] trait through
//! which the combinatorics engine asks for restricted fits.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod covariance;
pub mod cuts;
pub mod error;
pub mod id;
pub mod mask;
pub mod particle;
pub mod traits;

pub use covariance::{ParameterResolution, ResolutionQuantity, TrackCovariance, TrackParameter};
pub use cuts::GlobalCuts;
pub use error::{ConfigError, FitError};
pub use id::{LayerId, SampleIndex};
pub use mask::{HitMask, MAX_SITES};
pub use particle::{ParticleSample, B2C};
pub use traits::CovarianceSource;
