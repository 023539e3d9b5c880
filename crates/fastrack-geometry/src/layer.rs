//! Layer descriptions.

use fastrack_core::ConfigError;

use crate::auxiliary::AuxKind;

/// Intrinsic single-hit resolution of a measuring layer (cm).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolution {
    /// σ in the bending (rφ) direction.
    pub rphi: f64,
    /// σ along the beam (z).
    pub z: f64,
}

/// Where a layer comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayerKind {
    /// A discrete tracker surface (measuring or passive).
    Tracker,
    /// The effective layer of a bulk auxiliary detector.
    Auxiliary(AuxKind),
}

/// Input to [`LayerRegistry::add_layer`](crate::LayerRegistry::add_layer).
///
/// A layer without a resolution is passive: it contributes material only
/// and its efficiency is forced to zero.
#[derive(Clone, Debug, PartialEq)]
pub struct LayerSpec {
    /// Unique layer name.
    pub name: String,
    /// Radius in cm.
    pub radius: f64,
    /// Thickness in units of radiation length (X/X0).
    pub x_over_x0: f64,
    /// Areal density in g/cm². Default: 0.
    pub areal_density: f64,
    /// Hit resolution; `None` for passive material.
    pub resolution: Option<Resolution>,
    /// Single-hit efficiency in `[0, 1]`.
    pub efficiency: f64,
}

impl LayerSpec {
    /// A material-only layer (beam pipe, support foam, …).
    pub fn passive(name: impl Into<String>, radius: f64, x_over_x0: f64) -> Self {
        Self {
            name: name.into(),
            radius,
            x_over_x0,
            areal_density: 0.0,
            resolution: None,
            efficiency: 0.0,
        }
    }

    /// A measuring layer.
    pub fn active(
        name: impl Into<String>,
        radius: f64,
        x_over_x0: f64,
        resolution_rphi: f64,
        resolution_z: f64,
        efficiency: f64,
    ) -> Self {
        Self {
            name: name.into(),
            radius,
            x_over_x0,
            areal_density: 0.0,
            resolution: Some(Resolution {
                rphi: resolution_rphi,
                z: resolution_z,
            }),
            efficiency,
        }
    }

    /// Set the areal density (g/cm²) used for energy loss.
    #[must_use]
    pub fn with_areal_density(mut self, areal_density: f64) -> Self {
        self.areal_density = areal_density;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |reason: String| ConfigError::InvalidLayer {
            name: self.name.clone(),
            reason,
        };
        if self.name.trim().is_empty() {
            return Err(invalid("name must not be empty".into()));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(invalid(format!(
                "radius must be finite and non-negative, got {}",
                self.radius
            )));
        }
        if !self.x_over_x0.is_finite() || self.x_over_x0 < 0.0 {
            return Err(invalid(format!(
                "x_over_x0 must be finite and non-negative, got {}",
                self.x_over_x0
            )));
        }
        if !self.areal_density.is_finite() || self.areal_density < 0.0 {
            return Err(invalid(format!(
                "areal_density must be finite and non-negative, got {}",
                self.areal_density
            )));
        }
        if !(0.0..=1.0).contains(&self.efficiency) {
            return Err(invalid(format!(
                "efficiency must be in [0, 1], got {}",
                self.efficiency
            )));
        }
        if let Some(res) = self.resolution {
            for (label, v) in [("resolution_rphi", res.rphi), ("resolution_z", res.z)] {
                if !v.is_finite() || v <= 0.0 {
                    return Err(invalid(format!(
                        "{label} must be finite and positive, got {v}"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A validated layer.
///
/// Inside a [`Geometry`](crate::Geometry) layers are immutable; in a
/// registry the only permitted mutation is [`kill`](Layer::kill).
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    name: String,
    radius: f64,
    x_over_x0: f64,
    areal_density: f64,
    resolution: Option<Resolution>,
    efficiency: f64,
    killed: bool,
    kind: LayerKind,
}

impl Layer {
    pub(crate) fn from_spec(spec: LayerSpec, kind: LayerKind) -> Result<Self, ConfigError> {
        spec.validate()?;
        let efficiency = if spec.resolution.is_some() {
            spec.efficiency
        } else {
            0.0
        };
        Ok(Self {
            name: spec.name,
            radius: spec.radius,
            x_over_x0: spec.x_over_x0,
            areal_density: spec.areal_density,
            resolution: spec.resolution,
            efficiency,
            killed: false,
            kind,
        })
    }

    /// Remove the measurement; the material stays.
    pub(crate) fn kill(&mut self) {
        self.resolution = None;
        self.efficiency = 0.0;
        self.killed = true;
    }

    /// Unique name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Radius in cm.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Thickness in radiation lengths at normal incidence.
    pub fn x_over_x0(&self) -> f64 {
        self.x_over_x0
    }

    /// Areal density in g/cm² at normal incidence.
    pub fn areal_density(&self) -> f64 {
        self.areal_density
    }

    /// Hit resolution, `None` for passive or killed layers.
    pub fn resolution(&self) -> Option<Resolution> {
        self.resolution
    }

    /// Single-hit efficiency (0 for passive or killed layers).
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    /// Whether this layer produces a measurement.
    pub fn is_active(&self) -> bool {
        self.resolution.is_some()
    }

    /// Whether this layer was killed during setup.
    pub fn is_killed(&self) -> bool {
        self.killed
    }

    /// Tracker surface or auxiliary bulk detector.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Shorthand for `kind() != LayerKind::Tracker`.
    pub fn is_auxiliary(&self) -> bool {
        matches!(self.kind, LayerKind::Auxiliary(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_layer_has_zero_efficiency() {
        let mut spec = LayerSpec::passive("foam", 1.8, 0.0008);
        spec.efficiency = 0.7;
        let layer = Layer::from_spec(spec, LayerKind::Tracker).unwrap();
        assert!(!layer.is_active());
        assert_eq!(layer.efficiency(), 0.0);
    }

    #[test]
    fn kill_keeps_material() {
        let spec = LayerSpec::active("ddd1", 1.8, 0.0005, 6e-4, 6e-4, 0.98)
            .with_areal_density(1.1646e-2);
        let mut layer = Layer::from_spec(spec, LayerKind::Tracker).unwrap();
        layer.kill();
        assert!(!layer.is_active());
        assert!(layer.is_killed());
        assert_eq!(layer.efficiency(), 0.0);
        assert_eq!(layer.x_over_x0(), 0.0005);
        assert_eq!(layer.areal_density(), 1.1646e-2);
    }

    #[test]
    fn negative_radius_rejected() {
        let spec = LayerSpec::passive("bad", -1.0, 0.001);
        assert!(matches!(
            Layer::from_spec(spec, LayerKind::Tracker),
            Err(ConfigError::InvalidLayer { .. })
        ));
    }

    #[test]
    fn zero_resolution_rejected() {
        let spec = LayerSpec::active("bad", 1.0, 0.001, 0.0, 6e-4, 0.9);
        match Layer::from_spec(spec, LayerKind::Tracker) {
            Err(ConfigError::InvalidLayer { name, reason }) => {
                assert_eq!(name, "bad");
                assert!(reason.contains("resolution_rphi"));
            }
            other => panic!("expected InvalidLayer, got {other:?}"),
        }
    }

    #[test]
    fn efficiency_out_of_range_rejected() {
        let spec = LayerSpec::active("bad", 1.0, 0.001, 6e-4, 6e-4, 1.5);
        assert!(Layer::from_spec(spec, LayerKind::Tracker).is_err());
    }

    #[test]
    fn empty_name_rejected() {
        let spec = LayerSpec::passive("  ", 1.0, 0.001);
        assert!(Layer::from_spec(spec, LayerKind::Tracker).is_err());
    }
}
