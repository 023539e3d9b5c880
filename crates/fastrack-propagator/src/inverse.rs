//! Conditioned inversion of the information matrix.

use nalgebra::{Matrix5, Vector5};

use fastrack_core::FitError;

/// Invert a symmetric information matrix, refusing ill-conditioned input.
///
/// The matrix is first Jacobi-scaled (unit diagonal) so that parameters
/// with very different units do not dominate the spectrum, then
/// eigen-decomposed. The condition number `λmax / λmin` of the scaled
/// matrix is compared against `max_condition`.
///
/// # Errors
///
/// [`FitError::Singular`] if a diagonal element is not positive, the
/// smallest eigenvalue is not positive (reported with an infinite
/// condition number), or the condition number exceeds `max_condition`.
pub fn robust_inverse(info: &Matrix5<f64>, max_condition: f64) -> Result<Matrix5<f64>, FitError> {
    let singular = |condition: f64| FitError::Singular {
        condition,
        threshold: max_condition,
    };

    let diag = info.diagonal();
    if diag.iter().any(|&d| !(d > 0.0) || !d.is_finite()) {
        return Err(singular(f64::INFINITY));
    }
    let scale: Vector5<f64> = diag.map(|d| 1.0 / d.sqrt());
    let scaling = Matrix5::from_diagonal(&scale);
    let scaled = scaling * info * scaling;
    let scaled = (scaled + scaled.transpose()) * 0.5;

    let eigen = scaled.symmetric_eigen();
    let lambda_min = eigen.eigenvalues.min();
    let lambda_max = eigen.eigenvalues.max();
    if !(lambda_min > 0.0) {
        return Err(singular(f64::INFINITY));
    }
    let condition = lambda_max / lambda_min;
    if !(condition <= max_condition) {
        return Err(singular(condition));
    }

    let inv_values = eigen.eigenvalues.map(|l| 1.0 / l);
    let inv_scaled =
        eigen.eigenvectors * Matrix5::from_diagonal(&inv_values) * eigen.eigenvectors.transpose();
    Ok(scaling * inv_scaled * scaling)
}
