//! Core abstraction traits.

use crate::covariance::TrackCovariance;
use crate::error::FitError;
use crate::mask::HitMask;

/// A track model that can be fitted with any subset of its measurements.
///
/// Implemented by the propagator's per-sample track model. The hit-pattern
/// engine only needs this seam, which keeps the combinatorics testable
/// against a mock.
///
/// # Contract
///
/// - `fit()` MUST be deterministic: the same mask yields the same result.
/// - Masks only address sites `0..site_count()`; higher bits are ignored.
pub trait CovarianceSource {
    /// Number of measurement sites the model exposes.
    fn site_count(&self) -> usize;

    /// Fit using only the sites set in `hits`.
    fn fit(&self, hits: HitMask) -> Result<TrackCovariance, FitError>;
}
