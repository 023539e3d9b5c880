//! Error types for the fastrack resolution estimator.
//!
//! Two families, matching the failure policy of the engine:
//!
//! - [`ConfigError`]: geometry, particle, cut, or scan configuration is
//!   unusable. Surfaced immediately and fails the whole run.
//! - [`FitError`]: a single (geometry, sample) evaluation could not produce
//!   a trustworthy covariance. Reported per sample; the scan continues.

use std::error::Error;
use std::fmt;

use crate::covariance::TrackParameter;

/// Errors detected while building a geometry or validating configuration.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigError {
    /// A layer with this name is already registered.
    DuplicateLayer {
        /// The duplicated name.
        name: String,
    },
    /// No layer with this name is registered.
    UnknownLayer {
        /// The name that was looked up.
        name: String,
    },
    /// The named layer is an auxiliary bulk detector and cannot be killed.
    LayerNotKillable {
        /// Name of the auxiliary detector.
        name: String,
    },
    /// A layer attribute is out of range.
    InvalidLayer {
        /// Name of the offending layer.
        name: String,
        /// Which attribute is wrong and why.
        reason: String,
    },
    /// Particle mass, field, momentum, or rapidity is unusable.
    InvalidParticle {
        /// Description of the violated invariant.
        reason: String,
    },
    /// Global cut values are inconsistent.
    InvalidCuts {
        /// Description of the inconsistency.
        reason: String,
    },
    /// The scan grid cannot produce any valid sample.
    InvalidScan {
        /// Description of the problem.
        reason: String,
    },
    /// Fit options (condition threshold, seed prior) are out of range.
    InvalidFitOptions {
        /// Description of the problem.
        reason: String,
    },
    /// More active layers than a hit mask can address.
    TooManyLayers {
        /// Number of layers requested.
        count: usize,
        /// Maximum supported.
        max: usize,
    },
    /// An auxiliary detector sits at or inside the outermost tracker layer.
    AuxiliaryInsideTracker {
        /// Name of the auxiliary detector.
        name: String,
        /// Its effective radius (cm).
        radius: f64,
        /// Radius of the outermost tracker layer (cm).
        tracker_radius: f64,
    },
    /// A worker thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLayer { name } => write!(f, "layer '{name}' already exists"),
            Self::UnknownLayer { name } => write!(f, "no layer named '{name}'"),
            Self::LayerNotKillable { name } => {
                write!(f, "layer '{name}' is an auxiliary detector and cannot be killed")
            }
            Self::InvalidLayer { name, reason } => write!(f, "invalid layer '{name}': {reason}"),
            Self::InvalidParticle { reason } => write!(f, "invalid particle: {reason}"),
            Self::InvalidCuts { reason } => write!(f, "invalid cuts: {reason}"),
            Self::InvalidScan { reason } => write!(f, "invalid scan grid: {reason}"),
            Self::InvalidFitOptions { reason } => write!(f, "invalid fit options: {reason}"),
            Self::TooManyLayers { count, max } => {
                write!(f, "{count} active layers exceeds the maximum of {max}")
            }
            Self::AuxiliaryInsideTracker {
                name,
                radius,
                tracker_radius,
            } => write!(
                f,
                "auxiliary detector '{name}' at r={radius} cm must lie outside \
                 the outermost tracker layer (r={tracker_radius} cm)"
            ),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {}

/// Errors from a single covariance evaluation.
///
/// Deterministic: the same geometry, sample, and hit mask always produce
/// the same error. There is no transient class and nothing to retry.
#[derive(Clone, Debug, PartialEq)]
pub enum FitError {
    /// Fewer than two measurements survive; the information matrix is
    /// singular by construction.
    Unconstrained {
        /// Number of usable measurements.
        measurements: usize,
    },
    /// The information matrix is too ill-conditioned to invert reliably.
    Singular {
        /// Observed condition number (`f64::INFINITY` if not positive definite).
        condition: f64,
        /// Configured threshold.
        threshold: f64,
    },
    /// The propagated covariance has a negative or non-finite variance.
    NumericalInvalid {
        /// The offending parameter.
        parameter: TrackParameter,
        /// The variance that was produced.
        variance: f64,
    },
}

impl fmt::Display for FitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unconstrained { measurements } => write!(
                f,
                "fit unconstrained: {measurements} usable measurement(s), at least 2 required"
            ),
            Self::Singular {
                condition,
                threshold,
            } => write!(
                f,
                "information matrix ill-conditioned: condition number {condition:e} \
                 exceeds {threshold:e}"
            ),
            Self::NumericalInvalid {
                parameter,
                variance,
            } => write!(f, "invalid variance {variance} for {parameter}"),
        }
    }
}

impl Error for FitError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_layer_display_names_layer() {
        let e = ConfigError::DuplicateLayer {
            name: "ddd1".into(),
        };
        assert_eq!(e.to_string(), "layer 'ddd1' already exists");
    }

    #[test]
    fn auxiliary_inside_tracker_display() {
        let e = ConfigError::AuxiliaryInsideTracker {
            name: "tpc".into(),
            radius: 10.0,
            tracker_radius: 40.5,
        };
        let msg = e.to_string();
        assert!(msg.contains("tpc"));
        assert!(msg.contains("40.5"));
    }

    #[test]
    fn unconstrained_display_reports_count() {
        let e = FitError::Unconstrained { measurements: 1 };
        assert!(e.to_string().contains("1 usable"));
    }

    #[test]
    fn numerical_invalid_display_names_parameter() {
        let e = FitError::NumericalInvalid {
            parameter: TrackParameter::QOverPt,
            variance: -1.0,
        };
        assert!(e.to_string().contains("q/pt"));
    }

    #[test]
    fn errors_are_std_errors() {
        fn takes_error(_: &dyn Error) {}
        takes_error(&ConfigError::InvalidCuts {
            reason: "x".into(),
        });
        takes_error(&FitError::Unconstrained { measurements: 0 });
    }
}
