//! Mutable layer registry used during geometry setup.

use indexmap::IndexMap;

use fastrack_core::{ConfigError, MAX_SITES};

use crate::auxiliary::AuxDetectorSpec;
use crate::geometry::Geometry;
use crate::layer::{Layer, LayerKind, LayerSpec};

/// Ordered collection of layers keyed by name.
///
/// Layers may be added in any radial order. Kills are irreversible:
/// there is no operation that restores a killed measurement. Call
/// [`build`](Self::build) to freeze the registry into a [`Geometry`];
/// the registry is consumed, so nothing can mutate a geometry that
/// evaluation code is reading.
///
/// # Examples
///
/// ```
/// use fastrack_geometry::{LayerRegistry, LayerSpec};
///
/// let mut registry = LayerRegistry::new();
/// registry.add_layer(LayerSpec::active("l2", 2.4, 5e-4, 6e-4, 6e-4, 0.98)).unwrap();
/// registry.add_layer(LayerSpec::active("l1", 1.8, 5e-4, 6e-4, 6e-4, 0.98)).unwrap();
/// registry.add_layer(LayerSpec::passive("bpipe", 1.6, 0.0022)).unwrap();
/// registry.kill_layer("l2").unwrap();
///
/// let geometry = registry.build().unwrap();
/// let names: Vec<_> = geometry.sorted_all_layers().map(|l| l.name()).collect();
/// assert_eq!(names, ["bpipe", "l1", "l2"]);
/// assert_eq!(geometry.sorted_active_layers().count(), 1);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LayerRegistry {
    layers: IndexMap<String, Layer>,
}

impl LayerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tracker layer.
    ///
    /// Layers are identified by name until the registry is built;
    /// [`Geometry::find`] gives the radius-ordered id afterwards.
    ///
    /// # Errors
    ///
    /// [`ConfigError::DuplicateLayer`] if the name is taken,
    /// [`ConfigError::InvalidLayer`] if an attribute is out of range.
    pub fn add_layer(&mut self, spec: LayerSpec) -> Result<(), ConfigError> {
        let layer = Layer::from_spec(spec, LayerKind::Tracker)?;
        self.insert(layer)
    }

    /// Insert the effective layer of an auxiliary bulk detector.
    ///
    /// The layer is named after the detector kind (`"tpc"`, `"trd"`), so
    /// each kind can be added at most once.
    pub fn add_auxiliary(&mut self, spec: &AuxDetectorSpec) -> Result<(), ConfigError> {
        let layer = spec.to_layer()?;
        self.insert(layer)
    }

    fn insert(&mut self, layer: Layer) -> Result<(), ConfigError> {
        if self.layers.contains_key(layer.name()) {
            return Err(ConfigError::DuplicateLayer {
                name: layer.name().to_string(),
            });
        }
        self.layers.insert(layer.name().to_string(), layer);
        Ok(())
    }

    /// Remove the measurement of a tracker layer, keeping its material.
    ///
    /// Killing an already killed or passive layer is a no-op; passive
    /// layers are never marked killed.
    ///
    /// # Errors
    ///
    /// [`ConfigError::UnknownLayer`] if no layer has this name,
    /// [`ConfigError::LayerNotKillable`] for auxiliary detectors.
    pub fn kill_layer(&mut self, name: &str) -> Result<(), ConfigError> {
        let layer = self
            .layers
            .get_mut(name)
            .ok_or_else(|| ConfigError::UnknownLayer {
                name: name.to_string(),
            })?;
        if layer.is_auxiliary() {
            return Err(ConfigError::LayerNotKillable {
                name: name.to_string(),
            });
        }
        if layer.is_active() {
            layer.kill();
        }
        Ok(())
    }

    /// Look up a layer by name.
    pub fn get(&self, name: &str) -> Option<&Layer> {
        self.layers.get(name)
    }

    /// Number of registered layers, auxiliary included.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Layers in the order a propagator traverses them: tracker layers by
    /// ascending radius (ties keep insertion order), then auxiliary layers
    /// by ascending radius.
    ///
    /// The returned iterator is finite and cheap to clone; calling this
    /// again restarts the sequence.
    pub fn sorted_all_layers(&self) -> impl Iterator<Item = &Layer> + Clone + '_ {
        self.traversal_order()
            .into_iter()
            .map(move |i| &self.layers[i])
    }

    /// [`sorted_all_layers`](Self::sorted_all_layers) restricted to layers
    /// that produce a measurement.
    pub fn sorted_active_layers(&self) -> impl Iterator<Item = &Layer> + Clone + '_ {
        self.sorted_all_layers().filter(|l| l.is_active())
    }

    fn traversal_order(&self) -> Vec<usize> {
        let mut order: Vec<usize> = (0..self.layers.len()).collect();
        // Stable: equal radii keep insertion order.
        order.sort_by(|&a, &b| {
            let la = &self.layers[a];
            let lb = &self.layers[b];
            la.is_auxiliary()
                .cmp(&lb.is_auxiliary())
                .then(la.radius().total_cmp(&lb.radius()))
        });
        order
    }

    /// Freeze the registry into an immutable [`Geometry`].
    ///
    /// # Errors
    ///
    /// - [`ConfigError::AuxiliaryInsideTracker`] if an auxiliary detector is
    ///   not strictly outside every tracker layer.
    /// - [`ConfigError::TooManyLayers`] if more than [`MAX_SITES`] layers
    ///   are active.
    pub fn build(self) -> Result<Geometry, ConfigError> {
        let order = self.traversal_order();
        let mut slots: Vec<Option<Layer>> = self.layers.into_values().map(Some).collect();
        let layers: Vec<Layer> = order
            .into_iter()
            .filter_map(|i| slots[i].take())
            .collect();

        let tracker_radius = layers
            .iter()
            .filter(|l| !l.is_auxiliary())
            .map(|l| l.radius())
            .fold(0.0, f64::max);
        if let Some(aux) = layers
            .iter()
            .find(|l| l.is_auxiliary() && l.radius() <= tracker_radius)
        {
            return Err(ConfigError::AuxiliaryInsideTracker {
                name: aux.name().to_string(),
                radius: aux.radius(),
                tracker_radius,
            });
        }

        let active = layers.iter().filter(|l| l.is_active()).count();
        if active > MAX_SITES {
            return Err(ConfigError::TooManyLayers {
                count: active,
                max: MAX_SITES,
            });
        }

        for pair in layers.windows(2) {
            let both_active = pair[0].is_active() && pair[1].is_active();
            if both_active && pair[0].radius() == pair[1].radius() {
                tracing::warn!(
                    first = pair[0].name(),
                    second = pair[1].name(),
                    radius = pair[0].radius(),
                    "co-located active layers; resolution estimate will be optimistic"
                );
            }
        }

        Ok(Geometry::from_sorted(layers))
    }
}
