//! Kinematic scan grids.

use fastrack_core::{ConfigError, ParticleSample, SampleIndex};

use crate::config::ParticleConfig;

/// Largest number of points a scan can address with a [`SampleIndex`].
const MAX_SAMPLES: usize = u32::MAX as usize;

/// How transverse-momentum bins are spaced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spacing {
    /// Equal steps in `ln pt`.
    Log,
    /// Equal steps in `pt`.
    Linear,
}

/// Transverse-momentum axis of a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PtAxis {
    /// Lowest pt in GeV/c. Default: 0.05.
    pub min: f64,
    /// Highest pt in GeV/c. Default: 20.
    pub max: f64,
    /// Number of points, endpoints included. Default: 40.
    pub bins: usize,
    /// Point spacing. Default: [`Spacing::Log`].
    pub spacing: Spacing,
}

impl Default for PtAxis {
    fn default() -> Self {
        Self {
            min: 0.05,
            max: 20.0,
            bins: 40,
            spacing: Spacing::Log,
        }
    }
}

impl PtAxis {
    /// A single pt value.
    pub fn single(pt: f64) -> Self {
        Self {
            min: pt,
            max: pt,
            bins: 1,
            spacing: Spacing::Linear,
        }
    }

    /// Check `0 < min ≤ max`, both finite, and a bin count between one
    /// and the addressable maximum of `u32::MAX`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.min.is_finite() || !self.max.is_finite() || self.min <= 0.0 {
            return Err(ConfigError::InvalidScan {
                reason: format!(
                    "pt range must be finite and positive, got [{}, {}]",
                    self.min, self.max
                ),
            });
        }
        if self.max < self.min {
            return Err(ConfigError::InvalidScan {
                reason: format!("pt max {} is below pt min {}", self.max, self.min),
            });
        }
        if self.bins == 0 {
            return Err(ConfigError::InvalidScan {
                reason: "pt axis needs at least one bin".into(),
            });
        }
        if self.bins > MAX_SAMPLES {
            return Err(ConfigError::InvalidScan {
                reason: format!("{} pt bins exceed the addressable maximum", self.bins),
            });
        }
        Ok(())
    }

    /// The pt values, ascending.
    pub fn values(&self) -> Vec<f64> {
        if self.bins == 1 {
            return vec![self.min];
        }
        let last = (self.bins - 1) as f64;
        (0..self.bins)
            .map(|i| {
                let t = i as f64 / last;
                match self.spacing {
                    Spacing::Linear => self.min + t * (self.max - self.min),
                    Spacing::Log => self.min * (self.max / self.min).powf(t),
                }
            })
            .collect()
    }
}

/// One point of a scan.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanPoint {
    /// Position in the scan, rapidity-major.
    pub index: SampleIndex,
    /// Particle at this point.
    pub sample: ParticleSample,
}

/// The set of (pt, η) samples a scan evaluates.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScanGrid {
    /// Transverse-momentum axis.
    pub pt: PtAxis,
    /// Pseudorapidities. Empty means the configured average rapidity.
    pub rapidities: Vec<f64>,
}

impl ScanGrid {
    /// A single point.
    pub fn point(pt: f64, rapidity: f64) -> Self {
        Self {
            pt: PtAxis::single(pt),
            rapidities: vec![rapidity],
        }
    }

    /// Expand into scan points, rapidity-major and pt-minor.
    pub fn points(&self, particle: &ParticleConfig) -> Result<Vec<ScanPoint>, ConfigError> {
        self.pt.validate()?;
        let rapidities = if self.rapidities.is_empty() {
            vec![particle.avg_rapidity]
        } else {
            self.rapidities.clone()
        };
        let total = rapidities
            .len()
            .checked_mul(self.pt.bins)
            .filter(|&n| n <= MAX_SAMPLES)
            .ok_or_else(|| ConfigError::InvalidScan {
                reason: format!(
                    "{} rapidities x {} pt bins exceed the addressable maximum",
                    rapidities.len(),
                    self.pt.bins
                ),
            })?;
        let pts = self.pt.values();

        let mut points = Vec::with_capacity(total);
        for &eta in &rapidities {
            for &pt in &pts {
                let sample = particle.sample(pt, eta)?;
                points.push(ScanPoint {
                    index: SampleIndex(points.len() as u32),
                    sample,
                });
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_axis_endpoints() {
        let axis = PtAxis {
            min: 0.1,
            max: 10.0,
            bins: 3,
            spacing: Spacing::Log,
        };
        let v = axis.values();
        assert_eq!(v.len(), 3);
        assert!((v[0] - 0.1).abs() < 1e-12);
        assert!((v[1] - 1.0).abs() < 1e-12);
        assert!((v[2] - 10.0).abs() < 1e-9);
    }

    #[test]
    fn linear_axis_steps() {
        let axis = PtAxis {
            min: 1.0,
            max: 2.0,
            bins: 5,
            spacing: Spacing::Linear,
        };
        assert_eq!(axis.values(), vec![1.0, 1.25, 1.5, 1.75, 2.0]);
    }

    #[test]
    fn empty_rapidities_use_average() {
        let grid = ScanGrid {
            pt: PtAxis::single(1.0),
            rapidities: Vec::new(),
        };
        let pts = grid.points(&ParticleConfig::default()).unwrap();
        assert_eq!(pts.len(), 1);
        assert_eq!(pts[0].sample.rapidity, 0.5);
    }

    #[test]
    fn points_are_rapidity_major() {
        let grid = ScanGrid {
            pt: PtAxis {
                min: 1.0,
                max: 2.0,
                bins: 2,
                spacing: Spacing::Linear,
            },
            rapidities: vec![0.0, 1.0],
        };
        let pts = grid.points(&ParticleConfig::default()).unwrap();
        let pairs: Vec<_> = pts
            .iter()
            .map(|p| (p.sample.rapidity, p.sample.pt))
            .collect();
        assert_eq!(pairs, [(0.0, 1.0), (0.0, 2.0), (1.0, 1.0), (1.0, 2.0)]);
        assert_eq!(pts[3].index, SampleIndex(3));
    }

    #[test]
    fn invalid_axes_rejected() {
        for axis in [
            PtAxis {
                min: 0.0,
                ..PtAxis::default()
            },
            PtAxis {
                min: 5.0,
                max: 1.0,
                ..PtAxis::default()
            },
            PtAxis {
                bins: 0,
                ..PtAxis::default()
            },
        ] {
            assert!(matches!(
                axis.validate(),
                Err(ConfigError::InvalidScan { .. })
            ));
        }
    }

    #[test]
    fn oversized_grids_rejected_before_expansion() {
        let axis = PtAxis {
            bins: usize::MAX,
            ..PtAxis::default()
        };
        assert!(matches!(
            axis.validate(),
            Err(ConfigError::InvalidScan { .. })
        ));

        let grid = ScanGrid {
            pt: PtAxis {
                bins: u32::MAX as usize,
                ..PtAxis::default()
            },
            rapidities: vec![0.0, 0.5],
        };
        assert!(matches!(
            grid.points(&ParticleConfig::default()),
            Err(ConfigError::InvalidScan { .. })
        ));
    }

    #[test]
    fn nan_rapidity_rejected() {
        let grid = ScanGrid::point(1.0, f64::NAN);
        assert!(matches!(
            grid.points(&ParticleConfig::default()),
            Err(ConfigError::InvalidParticle { .. })
        ));
    }
}
