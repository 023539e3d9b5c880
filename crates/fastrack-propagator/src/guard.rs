//! Output validation for propagated covariances.
//!
//! [`CovarianceGuard`] is the last step of every fit: it symmetrizes the
//! inverted matrix and refuses to hand out a covariance with a negative
//! or non-finite entry on the diagonal. A [`TrackCovariance`] can only be
//! obtained from the propagator through this guard.

use nalgebra::Matrix5;

use fastrack_core::{FitError, TrackCovariance, TrackParameter};

/// Gatekeeper turning a raw 5×5 matrix into a [`TrackCovariance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CovarianceGuard {
    pt: f64,
}

impl CovarianceGuard {
    /// Guard for fits of a track with transverse momentum `pt`.
    pub fn new(pt: f64) -> Self {
        Self { pt }
    }

    /// Symmetrize `matrix` and validate it.
    ///
    /// # Errors
    ///
    /// [`FitError::NumericalInvalid`] naming the first parameter whose
    /// variance is negative or non-finite, or whose row holds a
    /// non-finite covariance.
    pub fn accept(&self, matrix: Matrix5<f64>) -> Result<TrackCovariance, FitError> {
        let sym = (matrix + matrix.transpose()) * 0.5;
        for parameter in TrackParameter::ALL {
            let i = parameter.index();
            let variance = sym[(i, i)];
            if !variance.is_finite() || variance < 0.0 {
                return Err(FitError::NumericalInvalid {
                    parameter,
                    variance,
                });
            }
            if sym.row(i).iter().any(|v| !v.is_finite()) {
                return Err(FitError::NumericalInvalid {
                    parameter,
                    variance,
                });
            }
        }
        Ok(TrackCovariance::new(sym, self.pt))
    }
}
