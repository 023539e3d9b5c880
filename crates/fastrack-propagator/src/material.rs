//! Material budget and multiple scattering along the outward traversal.
//!
//! [`MaterialBudget::traversal`] walks the geometry from the beam line
//! outwards, one [`Crossing`] per reached layer. Each crossing carries
//! the effective (incidence-corrected) material, the local momentum, the
//! Highland scattering angle, and the resulting rank-2
//! [`ScatteringContribution`] to the angular block of the track state.
//! The Billoir fit consumes the crossings in the same pass in which it
//! collects measurements.

use nalgebra::Matrix5;

use fastrack_core::{LayerId, ParticleSample, TrackParameter};
use fastrack_geometry::{Geometry, Layer};

use crate::eloss::{bethe_bloch_solid, MIN_BETA_GAMMA};

/// RMS plane-projected multiple-scattering angle (Highland).
///
/// `x_over_x0` is the traversed thickness in radiation lengths, `beta`
/// and `momentum` (GeV/c) describe the particle. Returns 0 for zero
/// material. The logarithmic correction is clamped so the angle never
/// becomes negative for vanishingly thin layers.
pub fn highland_theta0(x_over_x0: f64, beta: f64, momentum: f64) -> f64 {
    if x_over_x0 <= 0.0 || beta <= 0.0 || momentum <= 0.0 {
        return 0.0;
    }
    let log_term = (1.0 + 0.038 * x_over_x0.ln()).max(0.0);
    0.0136 / (beta * momentum) * x_over_x0.sqrt() * log_term
}

// ── Scattering contribution ────────────────────────────────────────

/// Process noise added by one scatterer.
///
/// A kink of RMS angle θ₀ perturbs the azimuth and the dip. Expressed in
/// the (φ, tan λ) parameters:
///
/// - `Var(δφ) = θ₀² (1 + tan²λ)`
/// - `Var(δtan λ) = θ₀² (1 + tan²λ)²`
///
/// The contribution is rank 2 in the 5-parameter state.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScatteringContribution {
    /// Variance of the azimuthal kink.
    pub var_phi: f64,
    /// Variance of the dip kink.
    pub var_tan_lambda: f64,
}

impl ScatteringContribution {
    /// Contribution of a scatterer of angle `theta0` for a track with dip
    /// `tan_lambda`.
    pub fn from_theta0(theta0: f64, tan_lambda: f64) -> Self {
        let sec2 = 1.0 + tan_lambda * tan_lambda;
        let t2 = theta0 * theta0;
        Self {
            var_phi: t2 * sec2,
            var_tan_lambda: t2 * sec2 * sec2,
        }
    }

    /// Whether the scatterer changes nothing.
    pub fn is_zero(&self) -> bool {
        self.var_phi == 0.0 && self.var_tan_lambda == 0.0
    }

    /// The contribution as a 5×5 matrix in state-vector order.
    pub fn covariance(&self) -> Matrix5<f64> {
        let mut m = Matrix5::zeros();
        let phi = TrackParameter::Phi.index();
        let tl = TrackParameter::TanLambda.index();
        m[(phi, phi)] = self.var_phi;
        m[(tl, tl)] = self.var_tan_lambda;
        m
    }
}

// ── Crossings ──────────────────────────────────────────────────────

/// One layer crossed by the outgoing track.
#[derive(Clone, Debug)]
pub struct Crossing<'a> {
    /// Position of the layer in the geometry.
    pub id: LayerId,
    /// The crossed layer.
    pub layer: &'a Layer,
    /// Transverse path length from the vertex, `2R asin(r / 2R)` (cm).
    pub path: f64,
    /// Ratio of traversed to normal-incidence thickness.
    pub incidence: f64,
    /// Effective thickness of this layer, X/X0.
    pub x_over_x0: f64,
    /// Effective areal density of this layer (g/cm²).
    pub areal_density: f64,
    /// Material traversed so far, this layer included, X/X0.
    pub cumulative_x_over_x0: f64,
    /// Momentum on entering the layer (GeV/c).
    pub momentum: f64,
    /// Velocity on entering the layer.
    pub beta: f64,
    /// Highland angle of this layer.
    pub theta0: f64,
    /// Energy deposited in the layer (GeV).
    pub energy_loss: f64,
    /// Momentum on leaving the layer; 0 if the particle stopped in it.
    pub momentum_after: f64,
    /// Process noise of this layer.
    pub scattering: ScatteringContribution,
}

/// Why a traversal ended before the last layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stop {
    /// The helix turns back before reaching this radius (`r ≥ 2R`).
    Curled {
        /// First unreachable radius (cm).
        radius: f64,
    },
    /// The particle lost all kinetic energy in this layer.
    Ranged {
        /// The layer the particle stopped in.
        layer: LayerId,
    },
}

// ── Budget ─────────────────────────────────────────────────────────

/// Material seen by one particle sample in one geometry.
#[derive(Clone, Copy, Debug)]
pub struct MaterialBudget<'a> {
    geometry: &'a Geometry,
    sample: ParticleSample,
    energy_loss: bool,
}

/// Cumulative material at a radial position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BudgetPoint {
    /// Effective X/X0 traversed up to and including this radius.
    pub x_over_x0: f64,
    /// Highland angle of the cumulative material at the local momentum.
    pub theta0: f64,
    /// Local momentum after the last crossed layer (GeV/c).
    pub momentum: f64,
    /// Whether the particle reaches this radius at all.
    pub reached: bool,
}

impl<'a> MaterialBudget<'a> {
    /// Budget for `sample` in `geometry`, with energy loss enabled.
    pub fn new(geometry: &'a Geometry, sample: ParticleSample) -> Self {
        Self {
            geometry,
            sample,
            energy_loss: true,
        }
    }

    /// Enable or disable the Bethe–Bloch momentum degradation.
    #[must_use]
    pub fn with_energy_loss(mut self, enabled: bool) -> Self {
        self.energy_loss = enabled;
        self
    }

    /// The particle sample at the vertex.
    pub fn sample(&self) -> &ParticleSample {
        &self.sample
    }

    /// Start a fresh outward traversal.
    pub fn traversal(&self) -> Traversal<'a> {
        Traversal {
            layers: self.geometry.layers().iter().enumerate(),
            mass: self.sample.mass,
            tan_lambda: self.sample.tan_lambda(),
            two_r: 2.0 * self.sample.bending_radius(),
            momentum: self.sample.momentum(),
            energy_loss: self.energy_loss,
            cumulative: 0.0,
            stop: None,
        }
    }

    /// Cumulative material and scattering angle at radius `r`.
    pub fn at_radius(&self, r: f64) -> BudgetPoint {
        let mut traversal = self.traversal();
        let mut point = BudgetPoint {
            x_over_x0: 0.0,
            theta0: 0.0,
            momentum: self.sample.momentum(),
            reached: true,
        };
        for crossing in traversal.by_ref() {
            if crossing.layer.radius() > r {
                return point.finish(self.sample.mass);
            }
            point.x_over_x0 = crossing.cumulative_x_over_x0;
            point.momentum = crossing.momentum_after;
        }
        point.reached = match traversal.stop() {
            Some(Stop::Curled { radius }) => r < radius,
            Some(Stop::Ranged { .. }) => point.momentum > 0.0,
            None => true,
        };
        point.finish(self.sample.mass)
    }

    /// Total effective material up to the point where the track ends.
    pub fn total_x_over_x0(&self) -> f64 {
        self.traversal()
            .last()
            .map_or(0.0, |c| c.cumulative_x_over_x0)
    }
}

impl BudgetPoint {
    fn finish(mut self, mass: f64) -> Self {
        let p = self.momentum;
        let beta = if p > 0.0 { p / (p * p + mass * mass).sqrt() } else { 0.0 };
        self.theta0 = highland_theta0(self.x_over_x0, beta, p);
        self
    }
}

// ── Traversal ──────────────────────────────────────────────────────

/// Lazy outward walk through the geometry.
///
/// Yields one [`Crossing`] per reached layer in traversal order. Ends
/// early when the helix curls back (`r ≥ 2R`) or the particle ranges
/// out; [`stop`](Self::stop) tells which.
#[derive(Clone, Debug)]
pub struct Traversal<'a> {
    layers: std::iter::Enumerate<std::slice::Iter<'a, Layer>>,
    mass: f64,
    tan_lambda: f64,
    two_r: f64,
    momentum: f64,
    energy_loss: bool,
    cumulative: f64,
    stop: Option<Stop>,
}

impl Traversal<'_> {
    /// Reason the traversal ended early, once it has.
    pub fn stop(&self) -> Option<Stop> {
        self.stop
    }
}

impl<'a> Iterator for Traversal<'a> {
    type Item = Crossing<'a>;

    fn next(&mut self) -> Option<Crossing<'a>> {
        if self.stop.is_some() {
            return None;
        }
        let (index, layer) = self.layers.next()?;
        let ratio = layer.radius() / self.two_r;
        if ratio >= 1.0 {
            self.stop = Some(Stop::Curled {
                radius: layer.radius(),
            });
            return None;
        }

        let path = self.two_r * ratio.asin();
        let incidence =
            (1.0 + self.tan_lambda * self.tan_lambda).sqrt() / (1.0 - ratio * ratio).sqrt();
        let x_over_x0 = layer.x_over_x0() * incidence;
        let areal_density = layer.areal_density() * incidence;
        self.cumulative += x_over_x0;

        let p = self.momentum;
        let energy = (p * p + self.mass * self.mass).sqrt();
        let beta = p / energy;
        let theta0 = highland_theta0(x_over_x0, beta, p);

        let mut energy_loss = 0.0;
        if self.energy_loss && areal_density > 0.0 {
            let beta_gamma = p / self.mass;
            energy_loss = bethe_bloch_solid(beta_gamma) * areal_density;
            let remaining = energy - energy_loss;
            let valid = beta_gamma >= MIN_BETA_GAMMA && energy_loss.is_finite();
            if valid && remaining > self.mass {
                // Momentum only ever decreases through material.
                self.momentum = (remaining * remaining - self.mass * self.mass).sqrt().min(p);
            } else {
                energy_loss = (energy - self.mass).max(0.0);
                self.momentum = 0.0;
                self.stop = Some(Stop::Ranged {
                    layer: LayerId(index as u32),
                });
                tracing::debug!(layer = layer.name(), momentum = p, "particle ranged out");
            }
        }

        Some(Crossing {
            id: LayerId(index as u32),
            layer,
            path,
            incidence,
            x_over_x0,
            areal_density,
            cumulative_x_over_x0: self.cumulative,
            momentum: p,
            beta,
            theta0,
            energy_loss,
            momentum_after: self.momentum,
            scattering: ScatteringContribution::from_theta0(theta0, self.tan_lambda),
        })
    }
}

#[cfg(test)]
mod tests {
    use fastrack_geometry::{LayerRegistry, LayerSpec};

    use super::*;

    fn geometry(layers: &[(f64, f64, f64)]) -> Geometry {
        let mut reg = LayerRegistry::new();
        for (i, &(r, x0, rho)) in layers.iter().enumerate() {
            reg.add_layer(LayerSpec::passive(format!("m{i}"), r, x0).with_areal_density(rho))
                .unwrap();
        }
        reg.build().unwrap()
    }

    fn pion(pt: f64, eta: f64) -> ParticleSample {
        ParticleSample::new(0.14, pt, eta, 0.5).unwrap()
    }

    #[test]
    fn highland_reference_value() {
        // 1 GeV, β ≈ 1, 1% X0: 13.6 mrad * 0.1 * (1 - 0.175) ≈ 1.12 mrad.
        let t = highland_theta0(0.01, 1.0, 1.0);
        assert!((t - 0.0013600 * (1.0 + 0.038 * 0.01f64.ln())).abs() < 1e-12);
        assert!(t > 1.1e-3 && t < 1.2e-3);
    }

    #[test]
    fn highland_zero_material() {
        assert_eq!(highland_theta0(0.0, 1.0, 1.0), 0.0);
    }

    #[test]
    fn highland_scales_inversely_with_momentum() {
        let a = highland_theta0(0.001, 1.0, 1.0);
        let b = highland_theta0(0.001, 1.0, 2.0);
        assert!((a / b - 2.0).abs() < 1e-12);
    }

    #[test]
    fn scattering_is_rank_two() {
        let s = ScatteringContribution::from_theta0(1e-3, 0.5);
        let m = s.covariance();
        assert_eq!(m.rank(1e-20), 2);
        assert!((s.var_tan_lambda / s.var_phi - 1.25).abs() < 1e-12);
    }

    #[test]
    fn normal_incidence_at_central_rapidity() {
        let g = geometry(&[(1.0, 0.01, 0.0)]);
        let budget = MaterialBudget::new(&g, pion(100.0, 0.0));
        let c = budget.traversal().next().unwrap();
        assert!((c.incidence - 1.0).abs() < 1e-6);
        assert!((c.path - 1.0).abs() < 1e-6);
    }

    #[test]
    fn forward_tracks_see_more_material() {
        let g = geometry(&[(1.0, 0.01, 0.0)]);
        let central = MaterialBudget::new(&g, pion(1.0, 0.0)).total_x_over_x0();
        let forward = MaterialBudget::new(&g, pion(1.0, 1.0)).total_x_over_x0();
        assert!((forward / central - 1.0f64.cosh()).abs() < 1e-3);
    }

    #[test]
    fn cumulative_material_is_additive() {
        let g = geometry(&[(1.0, 0.01, 0.0), (2.0, 0.02, 0.0), (3.0, 0.03, 0.0)]);
        let budget = MaterialBudget::new(&g, pion(1000.0, 0.0));
        let at = budget.at_radius(2.5);
        assert!((at.x_over_x0 - 0.03).abs() < 1e-6);
        assert!(at.reached);
        assert!(at.theta0 > 0.0);
        assert!((budget.total_x_over_x0() - 0.06).abs() < 1e-6);
        assert_eq!(budget.at_radius(0.5).x_over_x0, 0.0);
    }

    #[test]
    fn low_momentum_track_curls_before_outer_layer() {
        // R ≈ 6.7 cm at 10 MeV in 0.5 T: the 20 cm layer is unreachable.
        let g = geometry(&[(1.0, 0.001, 0.0), (20.0, 0.001, 0.0)]);
        let budget = MaterialBudget::new(&g, pion(0.01, 0.0));
        let mut t = budget.traversal();
        assert!(t.next().is_some());
        assert!(t.next().is_none());
        assert_eq!(t.stop(), Some(Stop::Curled { radius: 20.0 }));
        assert!(!budget.at_radius(25.0).reached);
    }

    #[test]
    fn energy_loss_reduces_momentum() {
        let g = geometry(&[(1.0, 0.01, 0.1), (2.0, 0.01, 0.1)]);
        let budget = MaterialBudget::new(&g, pion(0.5, 0.0));
        let crossings: Vec<_> = budget.traversal().collect();
        assert!(crossings[0].energy_loss > 0.0);
        assert!(crossings[1].momentum < crossings[0].momentum);
        assert!(crossings[1].theta0 > crossings[0].theta0);

        let no_loss = budget.with_energy_loss(false);
        let flat: Vec<_> = no_loss.traversal().collect();
        assert_eq!(flat[0].momentum, flat[1].momentum);
    }

    #[test]
    fn thick_absorber_stops_slow_particle() {
        let g = geometry(&[(1.0, 0.1, 50.0), (2.0, 0.01, 0.0)]);
        let budget = MaterialBudget::new(&g, pion(0.05, 0.0));
        let mut t = budget.traversal();
        let first = t.next().unwrap();
        assert_eq!(first.momentum_after, 0.0);
        assert!(t.next().is_none());
        assert_eq!(t.stop(), Some(Stop::Ranged { layer: LayerId(0) }));
    }

    #[test]
    fn sub_mev_particle_ranges_out_instead_of_gaining_momentum() {
        // R ≈ 0.33 cm at 0.5 MeV, so the layer sits well inside 2R.
        let g = geometry(&[(0.2, 0.001, 0.01)]);
        let budget = MaterialBudget::new(&g, pion(0.0005, 0.0));
        let mut t = budget.traversal();
        let c = t.next().unwrap();
        assert!(c.momentum_after <= c.momentum);
        assert!(c.energy_loss >= 0.0);
        assert_eq!(t.stop(), Some(Stop::Ranged { layer: LayerId(0) }));
    }

    #[test]
    fn slow_deuteron_stops_in_first_silicon_layer() {
        let g = fastrack_geometry::Its3Config::default().build().unwrap();
        let deuteron = ParticleSample::new(1.8756, 0.02, 0.5, 0.5).unwrap();
        let budget = MaterialBudget::new(&g, deuteron);
        let mut t = budget.traversal();
        let mut last = deuteron.momentum();
        for c in t.by_ref() {
            assert!(c.momentum <= last);
            assert!(c.momentum_after <= c.momentum, "{}: {c:?}", c.layer.name());
            last = c.momentum_after;
        }
        assert!(matches!(t.stop(), Some(Stop::Ranged { .. })));
    }
}
