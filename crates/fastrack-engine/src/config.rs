//! Engine configuration and validation.
//!
//! [`EngineConfig`] enumerates every recognised option with its default.
//! [`validate()`](EngineConfig::validate) runs once when a
//! [`Solver`](crate::Solver) is constructed; nothing is re-checked per
//! sample.

use fastrack_core::{ConfigError, GlobalCuts, ParticleSample};
use fastrack_propagator::FitOptions;

// ── ParticleConfig ─────────────────────────────────────────────────

/// Particle species and field shared by every sample of a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleConfig {
    /// Rest mass in GeV/c². Default: 0.14 (charged pion).
    pub mass: f64,
    /// Solenoid field in Tesla. Default: 0.5.
    pub field: f64,
    /// Pseudorapidity used when a scan grid lists none. Default: 0.5.
    pub avg_rapidity: f64,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            mass: 0.14,
            field: 0.5,
            avg_rapidity: 0.5,
        }
    }
}

impl ParticleConfig {
    /// The particle at one scan point.
    pub fn sample(&self, pt: f64, rapidity: f64) -> Result<ParticleSample, ConfigError> {
        ParticleSample::new(self.mass, pt, rapidity, self.field)
    }

    /// Check mass > 0, field ≠ 0, finite average rapidity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sample(1.0, self.avg_rapidity).map(|_| ())
    }
}

// ── WorkerConfig ───────────────────────────────────────────────────

/// Size of the sample-evaluation worker pool.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Number of worker threads. `None` = auto-detect
    /// (`available_parallelism`, clamped to `[1, 16]`).
    pub worker_count: Option<usize>,
}

impl WorkerConfig {
    /// Resolve the actual worker count, applying auto-detection if `None`.
    ///
    /// Explicit values are clamped to `[1, 64]`.
    pub fn resolved_worker_count(&self) -> usize {
        match self.worker_count {
            Some(n) => n.clamp(1, 64),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
                .clamp(1, 16),
        }
    }
}

// ── EngineConfig ───────────────────────────────────────────────────

/// Everything a [`Solver`](crate::Solver) needs besides the geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Particle species and field.
    pub particle: ParticleConfig,
    /// Track-quality cuts. Default: 4 hits, 4 correlated, 1 fake.
    pub cuts: GlobalCuts,
    /// Fit options (condition threshold, seed prior, energy loss).
    pub fit: FitOptions,
    /// Probability that a missed layer contributes a fake hit.
    /// Default: 0.
    pub fake_hit_probability: f64,
    /// Worker pool size.
    pub workers: WorkerConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            particle: ParticleConfig::default(),
            cuts: GlobalCuts::default(),
            fit: FitOptions::default(),
            fake_hit_probability: 0.0,
            workers: WorkerConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Check every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.particle.validate()?;
        self.cuts.validate()?;
        self.fit.validate()?;
        if !(0.0..=1.0).contains(&self.fake_hit_probability) {
            return Err(ConfigError::InvalidCuts {
                reason: format!(
                    "fake_hit_probability must be in [0, 1], got {}",
                    self.fake_hit_probability
                ),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_driver() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.particle.mass, 0.14);
        assert_eq!(cfg.particle.field, 0.5);
        assert_eq!(cfg.particle.avg_rapidity, 0.5);
        assert_eq!(cfg.cuts.min_hits, 4);
        assert_eq!(cfg.cuts.min_correlated_hits, 4);
        assert_eq!(cfg.cuts.max_fake_hits, 1);
        assert_eq!(cfg.fit.max_condition_number, 1e12);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn zero_field_rejected() {
        let cfg = EngineConfig {
            particle: ParticleConfig {
                field: 0.0,
                ..ParticleConfig::default()
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidParticle { .. })
        ));
    }

    #[test]
    fn inconsistent_cuts_rejected() {
        let cfg = EngineConfig {
            cuts: GlobalCuts {
                min_hits: 3,
                min_correlated_hits: 4,
                max_fake_hits: 1,
            },
            ..EngineConfig::default()
        };
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::InvalidCuts { .. })
        ));
    }

    #[test]
    fn fake_probability_range_checked() {
        let cfg = EngineConfig {
            fake_hit_probability: -0.1,
            ..EngineConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn worker_count_clamped() {
        let zero = WorkerConfig {
            worker_count: Some(0),
        };
        assert_eq!(zero.resolved_worker_count(), 1);
        let huge = WorkerConfig {
            worker_count: Some(1000),
        };
        assert_eq!(huge.resolved_worker_count(), 64);
        let auto = WorkerConfig::default().resolved_worker_count();
        assert!((1..=16).contains(&auto));
    }
}
