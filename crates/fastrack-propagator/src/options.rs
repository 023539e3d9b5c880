//! Fit configuration.

use nalgebra::Vector5;

use fastrack_core::ConfigError;

/// Weak Gaussian prior on the track state at the vertex.
///
/// Keeps the information matrix regular when measurements alone leave a
/// direction barely constrained (two-hit fits). The widths are large
/// enough that any fit with three or more measurements is insensitive
/// to them.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedPrior {
    /// σ(d_rφ) in cm. Default: 10.
    pub d_rphi: f64,
    /// σ(d_z) in cm. Default: 10.
    pub d_z: f64,
    /// σ(φ) in rad. Default: 1.
    pub phi: f64,
    /// σ(tan λ). Default: 1.
    pub tan_lambda: f64,
    /// σ(q/pt) relative to |q/pt|. Default: 10.
    pub q_over_pt_relative: f64,
}

impl Default for SeedPrior {
    fn default() -> Self {
        Self {
            d_rphi: 10.0,
            d_z: 10.0,
            phi: 1.0,
            tan_lambda: 1.0,
            q_over_pt_relative: 10.0,
        }
    }
}

impl SeedPrior {
    /// Diagonal of the prior information matrix for a track with the
    /// given `q/pt`.
    pub fn information(&self, q_over_pt: f64) -> Vector5<f64> {
        let sigma_k = self.q_over_pt_relative * q_over_pt.abs();
        Vector5::new(
            1.0 / (self.d_rphi * self.d_rphi),
            1.0 / (self.d_z * self.d_z),
            1.0 / (self.phi * self.phi),
            1.0 / (self.tan_lambda * self.tan_lambda),
            1.0 / (sigma_k * sigma_k),
        )
    }
}

/// Options of the Billoir fit.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FitOptions {
    /// Largest accepted condition number of the (Jacobi-scaled)
    /// information matrix. Default: 1e12.
    pub max_condition_number: f64,
    /// Seed prior added to the information matrix.
    pub seed: SeedPrior,
    /// Degrade momentum by Bethe–Bloch energy loss while traversing
    /// layers. Default: true.
    pub energy_loss: bool,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            max_condition_number: 1e12,
            seed: SeedPrior::default(),
            energy_loss: true,
        }
    }
}

impl FitOptions {
    /// Check the threshold is at least 1 and every prior width is finite
    /// and positive.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_condition_number >= 1.0) {
            return Err(ConfigError::InvalidFitOptions {
                reason: format!(
                    "max_condition_number must be >= 1, got {}",
                    self.max_condition_number
                ),
            });
        }
        let widths = [
            ("d_rphi", self.seed.d_rphi),
            ("d_z", self.seed.d_z),
            ("phi", self.seed.phi),
            ("tan_lambda", self.seed.tan_lambda),
            ("q_over_pt_relative", self.seed.q_over_pt_relative),
        ];
        for (name, w) in widths {
            if !w.is_finite() || w <= 0.0 {
                return Err(ConfigError::InvalidFitOptions {
                    reason: format!("seed prior {name} must be finite and positive, got {w}"),
                });
            }
        }
        Ok(())
    }
}
