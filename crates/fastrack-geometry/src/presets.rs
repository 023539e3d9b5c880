//! Preset detector layouts.

use fastrack_core::ConfigError;

use crate::auxiliary::AuxDetectorSpec;
use crate::geometry::Geometry;
use crate::layer::LayerSpec;
use crate::registry::LayerRegistry;

/// Radii of the seven measuring layers, inner barrel first.
const INNER_RADII: [f64; 3] = [1.8, 2.4, 3.0];
const OUTER_RADII: [f64; 4] = [19.4, 24.7, 35.3, 40.5];

/// Foam spacer offset per unit inner-barrel X/X0 (cm).
const FOAM_OFFSET_PER_X0: f64 = 9.370;
const FOAM_X_OVER_X0: f64 = 0.0008;

/// ALICE ITS3 upgrade: three bent-silicon inner layers with foam spacers
/// and four outer-barrel layers, behind a 1.6 cm beam pipe.
///
/// Every tunable is an explicit field; [`Default`] gives the reference
/// layout. Inner and outer barrel material and areal density are
/// configured independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Its3Config {
    /// Inner-barrel layer thickness, X/X0. Default: 0.0005.
    pub x0_ib: f64,
    /// Outer-barrel layer thickness, X/X0. Default: 0.0035.
    pub x0_ob: f64,
    /// Inner-barrel areal density, g/cm². Default: 1.1646e-2.
    pub xrho_ib: f64,
    /// Outer-barrel areal density, g/cm². Default: 1.1646e-1.
    pub xrho_ob: f64,
    /// Inner-barrel rφ resolution, cm. Default: 0.0006.
    pub res_rphi_ib: f64,
    /// Inner-barrel z resolution, cm. Default: 0.0006.
    pub res_z_ib: f64,
    /// Outer-barrel rφ resolution, cm. Default: 0.0006.
    pub res_rphi_ob: f64,
    /// Outer-barrel z resolution, cm. Default: 0.0006.
    pub res_z_ob: f64,
    /// Single-layer efficiency. Default: 0.98.
    pub efficiency: f64,
    /// 1-based indices of measuring layers (`ddd1`..`ddd7`) to kill.
    /// Default: none.
    pub layers_to_kill: Vec<u32>,
    /// Append a TPC with 0.1 cm resolution in both directions.
    /// Default: false.
    pub add_tpc: bool,
    /// Append a TRD with (0.02, 2.5) cm resolution. Default: false.
    pub add_trd: bool,
}

impl Default for Its3Config {
    fn default() -> Self {
        Self {
            x0_ib: 0.0005,
            x0_ob: 0.0035,
            xrho_ib: 1.1646e-2,
            xrho_ob: 1.1646e-1,
            res_rphi_ib: 0.0006,
            res_z_ib: 0.0006,
            res_rphi_ob: 0.0006,
            res_z_ob: 0.0006,
            efficiency: 0.98,
            layers_to_kill: Vec::new(),
            add_tpc: false,
            add_trd: false,
        }
    }
}

impl Its3Config {
    /// Number of measuring layers in the layout.
    pub const MEASURING_LAYERS: u32 = 7;

    /// Check the kill list. Layer attributes are validated when the
    /// registry is populated.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for &index in &self.layers_to_kill {
            if index == 0 || index > Self::MEASURING_LAYERS {
                return Err(ConfigError::UnknownLayer {
                    name: format!("ddd{index}"),
                });
            }
        }
        Ok(())
    }

    /// Populate a registry with the layout, kills applied.
    ///
    /// The registry stays open so callers can add further material or
    /// kill more layers before [`LayerRegistry::build`].
    pub fn registry(&self) -> Result<LayerRegistry, ConfigError> {
        self.validate()?;
        let mut reg = LayerRegistry::new();
        reg.add_layer(LayerSpec::passive("vertex", 0.0, 0.0))?;
        reg.add_layer(LayerSpec::passive("bpipe", 1.6, 0.0022))?;

        for (i, &r) in INNER_RADII.iter().enumerate() {
            let n = i + 1;
            reg.add_layer(
                LayerSpec::active(
                    format!("ddd{n}"),
                    r,
                    self.x0_ib,
                    self.res_rphi_ib,
                    self.res_z_ib,
                    self.efficiency,
                )
                .with_areal_density(self.xrho_ib),
            )?;
            reg.add_layer(LayerSpec::passive(
                format!("foam{n}"),
                r + FOAM_OFFSET_PER_X0 * self.x0_ib,
                FOAM_X_OVER_X0,
            ))?;
        }
        for (i, &r) in OUTER_RADII.iter().enumerate() {
            reg.add_layer(
                LayerSpec::active(
                    format!("ddd{}", INNER_RADII.len() + i + 1),
                    r,
                    self.x0_ob,
                    self.res_rphi_ob,
                    self.res_z_ob,
                    self.efficiency,
                )
                .with_areal_density(self.xrho_ob),
            )?;
        }

        for &index in &self.layers_to_kill {
            reg.kill_layer(&format!("ddd{index}"))?;
        }
        if self.add_tpc {
            reg.add_auxiliary(&AuxDetectorSpec::tpc(0.1, 0.1))?;
        }
        if self.add_trd {
            reg.add_auxiliary(&AuxDetectorSpec::trd(0.02, 2.5))?;
        }
        Ok(reg)
    }

    /// Build the frozen geometry.
    pub fn build(&self) -> Result<Geometry, ConfigError> {
        let geometry = self.registry()?.build()?;
        tracing::debug!(
            layers = geometry.len(),
            active = geometry.active_count(),
            killed = self.layers_to_kill.len(),
            "built ITS3 geometry"
        );
        Ok(geometry)
    }
}
