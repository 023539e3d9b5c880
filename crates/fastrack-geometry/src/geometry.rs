//! Immutable, radially ordered detector geometry.

use std::fmt;

use fastrack_core::LayerId;

use crate::layer::Layer;

/// A frozen detector layout.
///
/// Layers are stored in traversal order: tracker layers by ascending
/// radius, followed by auxiliary layers. A [`LayerId`] indexes that
/// order. `Geometry` is `Send + Sync` and is shared by reference across
/// worker threads during a scan.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    layers: Vec<Layer>,
}

impl Geometry {
    pub(crate) fn from_sorted(layers: Vec<Layer>) -> Self {
        Self { layers }
    }

    /// All layers in traversal order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Layer at a traversal position.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0 as usize)
    }

    /// Find a layer by name.
    pub fn find(&self, name: &str) -> Option<(LayerId, &Layer)> {
        self.layers
            .iter()
            .enumerate()
            .find(|(_, l)| l.name() == name)
            .map(|(i, l)| (LayerId(i as u32), l))
    }

    /// Every layer, in traversal order. Restartable.
    pub fn sorted_all_layers(&self) -> impl Iterator<Item = &Layer> + Clone + '_ {
        self.layers.iter()
    }

    /// Measuring layers only, in traversal order. Restartable.
    pub fn sorted_active_layers(&self) -> impl Iterator<Item = &Layer> + Clone + '_ {
        self.layers.iter().filter(|l| l.is_active())
    }

    /// Number of measuring layers, auxiliary included.
    pub fn active_count(&self) -> usize {
        self.sorted_active_layers().count()
    }

    /// Number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the geometry has no layers at all.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Whether a TPC or TRD effective layer is present.
    pub fn has_auxiliary(&self) -> bool {
        self.layers.iter().any(Layer::is_auxiliary)
    }

    /// Copy of this geometry without auxiliary detectors.
    pub fn tracker_only(&self) -> Self {
        Self {
            layers: self
                .layers
                .iter()
                .filter(|l| !l.is_auxiliary())
                .cloned()
                .collect(),
        }
    }

    /// Radius of the outermost non-auxiliary layer, 0 if there is none.
    pub fn outermost_tracker_radius(&self) -> f64 {
        self.layers
            .iter()
            .filter(|l| !l.is_auxiliary())
            .map(Layer::radius)
            .fold(0.0, f64::max)
    }

    /// Total normal-incidence material, X/X0.
    pub fn total_x_over_x0(&self) -> f64 {
        self.layers.iter().map(Layer::x_over_x0).sum()
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<10} {:>9} {:>9} {:>10} {:>10} {:>10} {:>6}",
            "layer", "r [cm]", "X/X0", "rho [g/cm2]", "s_rphi", "s_z", "eff"
        )?;
        for l in &self.layers {
            let (rphi, z) = match l.resolution() {
                Some(r) => (format!("{:.2e}", r.rphi), format!("{:.2e}", r.z)),
                None if l.is_killed() => ("killed".into(), "killed".into()),
                None => ("-".into(), "-".into()),
            };
            writeln!(
                f,
                "{:<10} {:>9.3} {:>9.2e} {:>10.3e} {:>10} {:>10} {:>6.3}",
                l.name(),
                l.radius(),
                l.x_over_x0(),
                l.areal_density(),
                rphi,
                z,
                l.efficiency()
            )?;
        }
        Ok(())
    }
}
