//! Auxiliary large-volume detectors (TPC, TRD).
//!
//! A bulk detector is represented by a single effective layer: one
//! measurement at a representative radius, with the per-sample resolution
//! reduced by the number of samples it integrates, and a small but
//! non-zero material budget. It is always active with efficiency 1.

use std::fmt;

use fastrack_core::ConfigError;

use crate::layer::{Layer, LayerKind, LayerSpec};

/// Which bulk detector an auxiliary layer stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AuxKind {
    /// Time projection chamber.
    Tpc,
    /// Transition radiation detector.
    Trd,
}

impl AuxKind {
    /// Registry name of the effective layer.
    pub fn layer_name(self) -> &'static str {
        match self {
            Self::Tpc => "tpc",
            Self::Trd => "trd",
        }
    }
}

impl fmt::Display for AuxKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.layer_name())
    }
}

/// Parameters of an auxiliary detector's effective layer.
#[derive(Clone, Debug, PartialEq)]
pub struct AuxDetectorSpec {
    /// Detector type.
    pub kind: AuxKind,
    /// Effective radius in cm.
    pub radius: f64,
    /// Total material of the effective layer (X/X0).
    pub x_over_x0: f64,
    /// Per-sample resolution in rφ (cm).
    pub resolution_rphi: f64,
    /// Per-sample resolution in z (cm).
    pub resolution_z: f64,
    /// Number of samples (pad rows, chamber layers) the detector provides.
    pub samples: u32,
}

impl AuxDetectorSpec {
    /// ALICE-like TPC: 159 pad rows between 85 and 245 cm, effective
    /// radius 160 cm, gas material of 5e-4 X0.
    pub fn tpc(resolution_rphi: f64, resolution_z: f64) -> Self {
        Self {
            kind: AuxKind::Tpc,
            radius: 160.0,
            x_over_x0: 5e-4,
            resolution_rphi,
            resolution_z,
            samples: 159,
        }
    }

    /// ALICE-like TRD: six chamber layers around 320 cm, 1e-3 X0 of
    /// effective material.
    pub fn trd(resolution_rphi: f64, resolution_z: f64) -> Self {
        Self {
            kind: AuxKind::Trd,
            radius: 320.0,
            x_over_x0: 1e-3,
            resolution_rphi,
            resolution_z,
            samples: 6,
        }
    }

    /// Resolution of the single effective measurement: `σ / √samples`.
    pub fn effective_resolution(&self) -> (f64, f64) {
        let n = f64::from(self.samples.max(1)).sqrt();
        (self.resolution_rphi / n, self.resolution_z / n)
    }

    pub(crate) fn to_layer(&self) -> Result<Layer, ConfigError> {
        if self.samples == 0 {
            return Err(ConfigError::InvalidLayer {
                name: self.kind.layer_name().into(),
                reason: "auxiliary detector needs at least one sample".into(),
            });
        }
        if self.x_over_x0 <= 0.0 {
            return Err(ConfigError::InvalidLayer {
                name: self.kind.layer_name().into(),
                reason: format!(
                    "auxiliary material must be non-zero, got {}",
                    self.x_over_x0
                ),
            });
        }
        let (rphi, z) = self.effective_resolution();
        let spec = LayerSpec::active(
            self.kind.layer_name(),
            self.radius,
            self.x_over_x0,
            rphi,
            z,
            1.0,
        );
        Layer::from_spec(spec, LayerKind::Auxiliary(self.kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tpc_effective_resolution_averages_rows() {
        let tpc = AuxDetectorSpec::tpc(0.1, 0.1);
        let (rphi, z) = tpc.effective_resolution();
        assert!((rphi - 0.1 / 159f64.sqrt()).abs() < 1e-15);
        assert_eq!(rphi, z);
    }

    #[test]
    fn aux_layer_is_always_active() {
        let layer = AuxDetectorSpec::trd(0.02, 2.5).to_layer().unwrap();
        assert!(layer.is_active());
        assert!(layer.is_auxiliary());
        assert_eq!(layer.efficiency(), 1.0);
        assert_eq!(layer.name(), "trd");
        assert!(layer.x_over_x0() > 0.0);
    }

    #[test]
    fn zero_material_rejected() {
        let mut spec = AuxDetectorSpec::tpc(0.1, 0.1);
        spec.x_over_x0 = 0.0;
        assert!(spec.to_layer().is_err());
    }

    #[test]
    fn zero_samples_rejected() {
        let mut spec = AuxDetectorSpec::tpc(0.1, 0.1);
        spec.samples = 0;
        assert!(spec.to_layer().is_err());
    }
}
