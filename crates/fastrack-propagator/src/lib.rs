//! Material budget and covariance propagation for fastrack.
//!
//! [`MaterialBudget`] walks a [`Geometry`](fastrack_geometry::Geometry)
//! outwards for one particle sample and reports, per crossed layer, the
//! effective material, the local momentum after energy loss, and the
//! multiple-scattering contribution. [`TrackModel`] consumes that
//! traversal to build a global (Billoir) least-squares fit whose
//! information matrix is inverted once per hit subset.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod billoir;
pub mod eloss;
pub mod guard;
pub mod inverse;
pub mod material;
pub mod options;

pub use billoir::{Site, TrackModel};
pub use eloss::{bethe_bloch_solid, MIN_BETA_GAMMA};
pub use guard::CovarianceGuard;
pub use inverse::robust_inverse;
pub use material::{
    highland_theta0, BudgetPoint, Crossing, MaterialBudget, ScatteringContribution, Stop,
    Traversal,
};
pub use options::{FitOptions, SeedPrior};
