//! Particle kinematics for one evaluation point.

use crate::error::ConfigError;

/// Curvature per unit field and inverse transverse momentum, in
/// `cm⁻¹ · T⁻¹ · GeV`.
///
/// A track of transverse momentum `pt` in a field `B` bends with
/// curvature `B2C * |B| / pt` (1/cm).
pub const B2C: f64 = 0.002_997_924_58;

/// A kinematic point under study.
///
/// `rapidity` is the pseudorapidity η of the track; the dip angle
/// follows as `tan λ = sinh η`. All quantities use GeV, cm, and Tesla.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleSample {
    /// Rest mass in GeV/c².
    pub mass: f64,
    /// Transverse momentum in GeV/c.
    pub pt: f64,
    /// Pseudorapidity.
    pub rapidity: f64,
    /// Solenoid field in Tesla. Sign is irrelevant for resolution.
    pub field: f64,
}

impl ParticleSample {
    /// Construct and validate a sample.
    pub fn new(mass: f64, pt: f64, rapidity: f64, field: f64) -> Result<Self, ConfigError> {
        let sample = Self {
            mass,
            pt,
            rapidity,
            field,
        };
        sample.validate()?;
        Ok(sample)
    }

    /// Check mass > 0, pt > 0, field ≠ 0, and all values finite.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mass.is_finite() || self.mass <= 0.0 {
            return Err(ConfigError::InvalidParticle {
                reason: format!("mass must be finite and positive, got {}", self.mass),
            });
        }
        if !self.pt.is_finite() || self.pt <= 0.0 {
            return Err(ConfigError::InvalidParticle {
                reason: format!("pt must be finite and positive, got {}", self.pt),
            });
        }
        if !self.rapidity.is_finite() {
            return Err(ConfigError::InvalidParticle {
                reason: format!("rapidity must be finite, got {}", self.rapidity),
            });
        }
        if !self.field.is_finite() || self.field == 0.0 {
            return Err(ConfigError::InvalidParticle {
                reason: format!("field must be finite and non-zero, got {}", self.field),
            });
        }
        Ok(())
    }

    /// `tan λ = sinh η`.
    pub fn tan_lambda(&self) -> f64 {
        self.rapidity.sinh()
    }

    /// Total momentum `p = pt · cosh η` (GeV/c).
    pub fn momentum(&self) -> f64 {
        self.pt * self.rapidity.cosh()
    }

    /// Total energy (GeV).
    pub fn energy(&self) -> f64 {
        let p = self.momentum();
        (p * p + self.mass * self.mass).sqrt()
    }

    /// Velocity `β = p / E`.
    pub fn beta(&self) -> f64 {
        self.momentum() / self.energy()
    }

    /// Signed inverse transverse momentum (positive charge assumed).
    pub fn q_over_pt(&self) -> f64 {
        1.0 / self.pt
    }

    /// Transverse curvature `1/R` in cm⁻¹.
    pub fn curvature(&self) -> f64 {
        B2C * self.field.abs() / self.pt
    }

    /// Radius of the transverse circle in cm.
    pub fn bending_radius(&self) -> f64 {
        1.0 / self.curvature()
    }

    /// Same particle at a different point of the scan grid.
    pub fn at(&self, pt: f64, rapidity: f64) -> Self {
        Self {
            pt,
            rapidity,
            ..*self
        }
    }
}
