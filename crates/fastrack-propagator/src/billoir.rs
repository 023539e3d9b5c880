//! Global least-squares (Billoir) covariance of the vertex track state.
//!
//! A [`TrackModel`] is built once per (geometry, particle sample) from a
//! single outward [`Traversal`](crate::Traversal). Reached measuring
//! layers become [`Site`]s; every layer with material becomes a
//! scatterer. A fit over any subset of sites then:
//!
//! 1. builds the linearised measurement rows in the bending plane
//!    `(d_rφ, φ, q/pt)` and the longitudinal plane `(d_z, tan λ)`,
//! 2. builds the residual covariance of each plane, intrinsic resolution
//!    on the diagonal plus the correlated multiple-scattering term of
//!    every scatterer crossed before both measurements,
//! 3. whitens the rows with the Cholesky factor of that covariance and
//!    sums them into one 5×5 information matrix,
//! 4. adds the seed prior and inverts once through
//!    [`robust_inverse`](crate::robust_inverse) and the
//!    [`CovarianceGuard`](crate::CovarianceGuard).
//!
//! Momentum loss changes the scattering angle of later layers but the
//! measurement rows use the vertex curvature.

use nalgebra::{DMatrix, Matrix5};
use smallvec::SmallVec;

use fastrack_core::{
    CovarianceSource, FitError, HitMask, LayerId, ParticleSample, TrackCovariance,
    TrackParameter, B2C,
};
use fastrack_geometry::Geometry;

use crate::guard::CovarianceGuard;
use crate::inverse::robust_inverse;
use crate::material::{MaterialBudget, Stop};
use crate::options::FitOptions;

/// A measurement site: one reached, measuring layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Site {
    /// Layer in the evaluated geometry.
    pub layer: LayerId,
    /// Layer radius (cm).
    pub radius: f64,
    /// Transverse path from the vertex (cm).
    pub path: f64,
    /// Intrinsic rφ resolution (cm).
    pub sigma_rphi: f64,
    /// Intrinsic z resolution (cm).
    pub sigma_z: f64,
    /// Hit efficiency.
    pub efficiency: f64,
    /// Whether the site is an auxiliary bulk detector.
    pub auxiliary: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Scatterer {
    path: f64,
    var_phi: f64,
    var_tan_lambda: f64,
}

#[derive(Clone, Copy)]
enum Plane {
    Bending,
    Longitudinal,
}

const BENDING_PARAMS: [TrackParameter; 3] = [
    TrackParameter::DRphi,
    TrackParameter::Phi,
    TrackParameter::QOverPt,
];
const LONGITUDINAL_PARAMS: [TrackParameter; 2] = [TrackParameter::DZ, TrackParameter::TanLambda];

type Selection = SmallVec<[usize; 16]>;

/// Fit model of one particle sample in one geometry.
///
/// Implements [`CovarianceSource`]: bit `i` of a [`HitMask`] selects
/// [`sites()[i]`](Self::sites).
#[derive(Clone, Debug)]
pub struct TrackModel {
    sample: ParticleSample,
    options: FitOptions,
    sites: Vec<Site>,
    scatterers: Vec<Scatterer>,
    stop: Option<Stop>,
    material: f64,
}

impl TrackModel {
    /// Traverse `geometry` with `sample` and collect sites and scatterers.
    pub fn new(geometry: &Geometry, sample: ParticleSample, options: FitOptions) -> Self {
        let budget = MaterialBudget::new(geometry, sample).with_energy_loss(options.energy_loss);
        let mut traversal = budget.traversal();
        let mut sites = Vec::new();
        let mut scatterers = Vec::new();
        let mut material = 0.0;

        for crossing in traversal.by_ref() {
            if let Some(res) = crossing.layer.resolution() {
                sites.push(Site {
                    layer: crossing.id,
                    radius: crossing.layer.radius(),
                    path: crossing.path,
                    sigma_rphi: res.rphi,
                    sigma_z: res.z,
                    efficiency: crossing.layer.efficiency(),
                    auxiliary: crossing.layer.is_auxiliary(),
                });
            }
            if !crossing.scattering.is_zero() {
                scatterers.push(Scatterer {
                    path: crossing.path,
                    var_phi: crossing.scattering.var_phi,
                    var_tan_lambda: crossing.scattering.var_tan_lambda,
                });
            }
            material = crossing.cumulative_x_over_x0;
        }

        Self {
            sample,
            options,
            sites,
            scatterers,
            stop: traversal.stop(),
            material,
        }
    }

    /// The particle sample at the vertex.
    pub fn sample(&self) -> &ParticleSample {
        &self.sample
    }

    /// Measurement sites in traversal order.
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Why the traversal ended early, if it did.
    pub fn stop(&self) -> Option<Stop> {
        self.stop
    }

    /// Effective material crossed by the track, X/X0.
    pub fn material(&self) -> f64 {
        self.material
    }

    /// Fit with every site hit.
    pub fn nominal(&self) -> Result<TrackCovariance, FitError> {
        self.fit(HitMask::full(self.sites.len()))
    }

    /// Information matrix (seed prior included) of the selected sites.
    ///
    /// # Errors
    ///
    /// [`FitError::Unconstrained`] for fewer than two selected sites.
    pub fn information(&self, hits: HitMask) -> Result<Matrix5<f64>, FitError> {
        let selection: Selection = hits
            .intersect(HitMask::full(self.sites.len()))
            .iter()
            .collect();
        if selection.len() < 2 {
            return Err(FitError::Unconstrained {
                measurements: selection.len(),
            });
        }

        let mut info = Matrix5::zeros();
        for (plane, params) in [
            (Plane::Bending, &BENDING_PARAMS[..]),
            (Plane::Longitudinal, &LONGITUDINAL_PARAMS[..]),
        ] {
            let block = self.plane_information(&selection, plane)?;
            for (a, pa) in params.iter().enumerate() {
                for (b, pb) in params.iter().enumerate() {
                    info[(pa.index(), pb.index())] += block[(a, b)];
                }
            }
        }

        let prior = self.options.seed.information(self.sample.q_over_pt());
        for p in TrackParameter::ALL {
            info[(p.index(), p.index())] += prior[p.index()];
        }
        Ok(info)
    }

    fn plane_information(
        &self,
        selection: &[usize],
        plane: Plane,
    ) -> Result<DMatrix<f64>, FitError> {
        let n = selection.len();
        let half_bend = 0.5 * B2C * self.sample.field.abs();
        let columns = match plane {
            Plane::Bending => 3,
            Plane::Longitudinal => 2,
        };

        let mut h = DMatrix::<f64>::zeros(n, columns);
        let mut v = DMatrix::<f64>::zeros(n, n);
        for (row, &i) in selection.iter().enumerate() {
            let site = &self.sites[i];
            let s = site.path;
            h[(row, 0)] = 1.0;
            h[(row, 1)] = s;
            let sigma = match plane {
                Plane::Bending => {
                    h[(row, 2)] = half_bend * s * s;
                    site.sigma_rphi
                }
                Plane::Longitudinal => site.sigma_z,
            };
            v[(row, row)] = sigma * sigma;
        }

        // Scatterers in front of both measurements correlate their residuals.
        for (a, &i) in selection.iter().enumerate() {
            let si = self.sites[i].path;
            for (b, &k) in selection.iter().enumerate().skip(a) {
                let sk = self.sites[k].path;
                let reach = si.min(sk);
                let mut cov = 0.0;
                for sc in self.scatterers.iter().take_while(|sc| sc.path < reach) {
                    let var = match plane {
                        Plane::Bending => sc.var_phi,
                        Plane::Longitudinal => sc.var_tan_lambda,
                    };
                    cov += (si - sc.path) * (sk - sc.path) * var;
                }
                v[(a, b)] += cov;
                if a != b {
                    v[(b, a)] += cov;
                }
            }
        }

        let singular = FitError::Singular {
            condition: f64::INFINITY,
            threshold: self.options.max_condition_number,
        };
        let chol = v.cholesky().ok_or_else(|| singular.clone())?;
        let w = chol.l().solve_lower_triangular(&h).ok_or(singular)?;
        Ok(w.tr_mul(&w))
    }
}

impl CovarianceSource for TrackModel {
    fn site_count(&self) -> usize {
        self.sites.len()
    }

    fn fit(&self, hits: HitMask) -> Result<TrackCovariance, FitError> {
        let info = self.information(hits)?;
        let cov = robust_inverse(&info, self.options.max_condition_number)?;
        CovarianceGuard::new(self.sample.pt).accept(cov)
    }
}

#[cfg(test)]
mod tests {
    use fastrack_geometry::{LayerRegistry, LayerSpec};

    use super::*;

    fn three_layers() -> Geometry {
        let mut reg = LayerRegistry::new();
        for (name, r) in [("l1", 1.8), ("l2", 2.4), ("l3", 3.0)] {
            reg.add_layer(LayerSpec::active(name, r, 5e-4, 6e-4, 6e-4, 0.98))
                .unwrap();
        }
        reg.build().unwrap()
    }

    fn pion(pt: f64) -> ParticleSample {
        ParticleSample::new(0.14, pt, 0.5, 0.5).unwrap()
    }

    #[test]
    fn three_layer_fit_is_finite() {
        let model = TrackModel::new(&three_layers(), pion(1.0), FitOptions::default());
        assert_eq!(model.site_count(), 3);
        let cov = model.nominal().unwrap();
        let sigma = cov.sigma_pt_over_pt();
        assert!(sigma.is_finite() && sigma > 0.0);
        assert!(cov.min_eigenvalue() >= 0.0);
    }

    #[test]
    fn one_site_is_unconstrained() {
        let model = TrackModel::new(&three_layers(), pion(1.0), FitOptions::default());
        assert_eq!(
            model.fit(HitMask::EMPTY.with(1)),
            Err(FitError::Unconstrained { measurements: 1 })
        );
        assert_eq!(
            model.fit(HitMask::EMPTY),
            Err(FitError::Unconstrained { measurements: 0 })
        );
    }

    #[test]
    fn bits_beyond_sites_are_ignored() {
        let model = TrackModel::new(&three_layers(), pion(1.0), FitOptions::default());
        let a = model.fit(HitMask::full(3)).unwrap();
        let b = model.fit(HitMask(u32::MAX)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn fewer_hits_never_help() {
        let model = TrackModel::new(&three_layers(), pion(0.3), FitOptions::default());
        let full = model.nominal().unwrap().resolution();
        let partial = model.fit(HitMask(0b011)).unwrap().resolution();
        assert!(partial.d_rphi >= full.d_rphi);
        assert!(partial.pt_relative >= full.pt_relative);
    }

    #[test]
    fn impact_parameter_improves_with_momentum() {
        let g = three_layers();
        let slow = TrackModel::new(&g, pion(0.2), FitOptions::default())
            .nominal()
            .unwrap();
        let fast = TrackModel::new(&g, pion(20.0), FitOptions::default())
            .nominal()
            .unwrap();
        assert!(fast.sigma(TrackParameter::DRphi) < slow.sigma(TrackParameter::DRphi));
    }

    #[test]
    fn tiny_condition_threshold_is_singular() {
        let opts = FitOptions {
            max_condition_number: 1.0,
            ..FitOptions::default()
        };
        let model = TrackModel::new(&three_layers(), pion(1.0), opts);
        assert!(matches!(model.nominal(), Err(FitError::Singular { .. })));
    }

    #[test]
    fn information_is_symmetric() {
        let model = TrackModel::new(&three_layers(), pion(1.0), FitOptions::default());
        let info = model.information(HitMask::full(3)).unwrap();
        assert!((info - info.transpose()).abs().max() <= 1e-9 * info.abs().max());
    }
}
