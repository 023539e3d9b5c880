//! Mean ionisation energy loss in silicon.

/// `K = 4π N_A r_e² m_e c²` in GeV·cm²/g.
const K: f64 = 0.307_075e-3;
/// Electron mass (GeV/c²).
const ELECTRON_MASS: f64 = 0.511e-3;
/// Silicon density (g/cm³).
const DENSITY: f64 = 2.33;
/// Sternheimer density-effect boundaries in `ln(βγ)`.
const X0: f64 = 0.2 * 2.303;
const X1: f64 = 3.0 * 2.303;
/// Mean excitation energy (GeV).
const MEAN_EXCITATION: f64 = 173e-9;
/// Z/A of silicon.
const Z_OVER_A: f64 = 0.49848;

/// Lowest `βγ` at which the Bethe–Bloch formula is applied.
///
/// Below it the formula turns over and eventually goes negative; a
/// particle this slow stops in the next absorber it meets.
pub const MIN_BETA_GAMMA: f64 = 0.05;

/// Bethe–Bloch mean energy loss for a solid silicon-like absorber, in
/// GeV·cm²/g, as a function of `βγ = p/m`.
///
/// Includes the density-effect correction. The maximum energy transfer
/// is approximated as `2 m_e β²γ²`, valid for incident particles much
/// heavier than the electron. The result is never negative; callers
/// should not rely on it below [`MIN_BETA_GAMMA`].
pub fn bethe_bloch_solid(beta_gamma: f64) -> f64 {
    if beta_gamma.is_nan() || beta_gamma <= 0.0 {
        return 0.0;
    }
    let bg2 = beta_gamma * beta_gamma;
    let max_transfer = 2.0 * ELECTRON_MASS * bg2;

    let x = beta_gamma.ln();
    let plasma = (28.816e-9 * (DENSITY * Z_OVER_A).sqrt() / MEAN_EXCITATION).ln();
    let delta_half = if x > X1 {
        plasma + x - 0.5
    } else if x > X0 {
        let r = (X1 - x) / (X1 - X0);
        plasma + x - 0.5 + (0.5 - plasma - X0) * r * r * r
    } else {
        0.0
    };

    let log_arg = 2.0 * ELECTRON_MASS * bg2 * max_transfer / (MEAN_EXCITATION * MEAN_EXCITATION);
    let bracket = 0.5 * log_arg.ln() - bg2 / (1.0 + bg2) - delta_half;
    (K * Z_OVER_A * (1.0 + bg2) / bg2 * bracket).max(0.0)
}
