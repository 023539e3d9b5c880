//! The 5-parameter track covariance and derived resolutions.
//!
//! Parameters are expressed at the point of closest approach to the
//! beam line, in the order of [`TrackParameter`]. Lengths are in cm,
//! angles in radians, and `q/pt` in c/GeV.

use std::fmt;

use nalgebra::{Matrix5, RowVector5};

/// One component of the helix state vector.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrackParameter {
    /// Transverse impact parameter (cm).
    DRphi,
    /// Longitudinal impact parameter (cm).
    DZ,
    /// Azimuthal direction at the vertex (rad).
    Phi,
    /// Tangent of the dip angle.
    TanLambda,
    /// Charge over transverse momentum (c/GeV).
    QOverPt,
}

impl TrackParameter {
    /// All parameters in state-vector order.
    pub const ALL: [Self; 5] = [
        Self::DRphi,
        Self::DZ,
        Self::Phi,
        Self::TanLambda,
        Self::QOverPt,
    ];

    /// Row/column of this parameter in the covariance matrix.
    pub const fn index(self) -> usize {
        match self {
            Self::DRphi => 0,
            Self::DZ => 1,
            Self::Phi => 2,
            Self::TanLambda => 3,
            Self::QOverPt => 4,
        }
    }
}

impl fmt::Display for TrackParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::DRphi => "d_rphi",
            Self::DZ => "d_z",
            Self::Phi => "phi",
            Self::TanLambda => "tan_lambda",
            Self::QOverPt => "q/pt",
        };
        f.write_str(s)
    }
}

/// A reportable resolution quantity.
///
/// The five state parameters plus the relative transverse-momentum
/// resolution, which is what detector studies usually plot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResolutionQuantity {
    /// σ(d_rφ) in cm.
    DRphi,
    /// σ(d_z) in cm.
    DZ,
    /// σ(φ) in rad.
    Phi,
    /// σ(tan λ).
    TanLambda,
    /// σ(q/pt) in c/GeV.
    QOverPt,
    /// σ(pt)/pt.
    PtRelative,
}

impl ResolutionQuantity {
    /// All quantities in report column order.
    pub const ALL: [Self; 6] = [
        Self::PtRelative,
        Self::DRphi,
        Self::DZ,
        Self::Phi,
        Self::TanLambda,
        Self::QOverPt,
    ];

    /// Column label used by reports.
    pub fn label(self) -> &'static str {
        match self {
            Self::DRphi => "sigma_d_rphi_cm",
            Self::DZ => "sigma_d_z_cm",
            Self::Phi => "sigma_phi_rad",
            Self::TanLambda => "sigma_tan_lambda",
            Self::QOverPt => "sigma_q_over_pt",
            Self::PtRelative => "sigma_pt_over_pt",
        }
    }
}

/// Standard deviations of every reportable quantity.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterResolution {
    /// σ(d_rφ) in cm.
    pub d_rphi: f64,
    /// σ(d_z) in cm.
    pub d_z: f64,
    /// σ(φ) in rad.
    pub phi: f64,
    /// σ(tan λ).
    pub tan_lambda: f64,
    /// σ(q/pt) in c/GeV.
    pub q_over_pt: f64,
    /// σ(pt)/pt.
    pub pt_relative: f64,
}

impl ParameterResolution {
    /// All-zero resolution, the identity for weighted accumulation.
    pub const ZERO: Self = Self {
        d_rphi: 0.0,
        d_z: 0.0,
        phi: 0.0,
        tan_lambda: 0.0,
        q_over_pt: 0.0,
        pt_relative: 0.0,
    };

    /// Value of one quantity.
    pub fn get(&self, quantity: ResolutionQuantity) -> f64 {
        match quantity {
            ResolutionQuantity::DRphi => self.d_rphi,
            ResolutionQuantity::DZ => self.d_z,
            ResolutionQuantity::Phi => self.phi,
            ResolutionQuantity::TanLambda => self.tan_lambda,
            ResolutionQuantity::QOverPt => self.q_over_pt,
            ResolutionQuantity::PtRelative => self.pt_relative,
        }
    }

    /// `self + weight * other`, component-wise.
    #[must_use]
    pub fn add_weighted(&self, other: &Self, weight: f64) -> Self {
        Self {
            d_rphi: self.d_rphi + weight * other.d_rphi,
            d_z: self.d_z + weight * other.d_z,
            phi: self.phi + weight * other.phi,
            tan_lambda: self.tan_lambda + weight * other.tan_lambda,
            q_over_pt: self.q_over_pt + weight * other.q_over_pt,
            pt_relative: self.pt_relative + weight * other.pt_relative,
        }
    }

    /// Component-wise scaling.
    #[must_use]
    pub fn scaled(&self, factor: f64) -> Self {
        Self::ZERO.add_weighted(self, factor)
    }
}

/// Covariance of the track state at the vertex for one fit.
///
/// Produced by the propagator after validation: symmetric, finite, and
/// with non-negative diagonal.
#[derive(Clone, Debug, PartialEq)]
pub struct TrackCovariance {
    matrix: Matrix5<f64>,
    pt: f64,
}

impl TrackCovariance {
    /// Wrap a covariance matrix computed for a track of transverse
    /// momentum `pt`.
    pub fn new(matrix: Matrix5<f64>, pt: f64) -> Self {
        Self { matrix, pt }
    }

    /// The raw 5×5 matrix.
    pub fn matrix(&self) -> &Matrix5<f64> {
        &self.matrix
    }

    /// Transverse momentum the fit was evaluated at.
    pub fn pt(&self) -> f64 {
        self.pt
    }

    /// Diagonal element for one parameter.
    pub fn variance(&self, parameter: TrackParameter) -> f64 {
        let i = parameter.index();
        self.matrix[(i, i)]
    }

    /// Standard deviation of one parameter.
    pub fn sigma(&self, parameter: TrackParameter) -> f64 {
        self.variance(parameter).max(0.0).sqrt()
    }

    /// Standard deviation of a derived quantity with gradient `jacobian`
    /// with respect to the state vector: `√(J C Jᵀ)`.
    pub fn derived_sigma(&self, jacobian: &RowVector5<f64>) -> f64 {
        let var = (jacobian * self.matrix * jacobian.transpose())[(0, 0)];
        var.max(0.0).sqrt()
    }

    /// Relative transverse-momentum resolution `σ(pt)/pt = pt · σ(q/pt)`.
    pub fn sigma_pt_over_pt(&self) -> f64 {
        // d(pt)/d(q/pt) = -pt², divided by pt.
        let j = RowVector5::new(0.0, 0.0, 0.0, 0.0, self.pt);
        self.derived_sigma(&j)
    }

    /// Every reportable standard deviation.
    pub fn resolution(&self) -> ParameterResolution {
        ParameterResolution {
            d_rphi: self.sigma(TrackParameter::DRphi),
            d_z: self.sigma(TrackParameter::DZ),
            phi: self.sigma(TrackParameter::Phi),
            tan_lambda: self.sigma(TrackParameter::TanLambda),
            q_over_pt: self.sigma(TrackParameter::QOverPt),
            pt_relative: self.sigma_pt_over_pt(),
        }
    }

    /// Largest absolute asymmetry `|C_ij - C_ji|`.
    pub fn asymmetry(&self) -> f64 {
        (self.matrix - self.matrix.transpose()).abs().max()
    }

    /// Smallest eigenvalue of the (symmetrized) matrix.
    pub fn min_eigenvalue(&self) -> f64 {
        let sym = (self.matrix + self.matrix.transpose()) * 0.5;
        sym.symmetric_eigenvalues().min()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn diag(values: [f64; 5], pt: f64) -> TrackCovariance {
        TrackCovariance::new(
            Matrix5::from_diagonal(&nalgebra::Vector5::from(values)),
            pt,
        )
    }

    #[test]
    fn sigma_reads_diagonal() {
        let c = diag([4.0, 9.0, 1.0, 0.25, 0.01], 2.0);
        assert_eq!(c.sigma(TrackParameter::DRphi), 2.0);
        assert_eq!(c.sigma(TrackParameter::DZ), 3.0);
        assert_eq!(c.sigma(TrackParameter::TanLambda), 0.5);
    }

    #[test]
    fn pt_relative_scales_with_pt() {
        let c = diag([1.0, 1.0, 1.0, 1.0, 0.0001], 5.0);
        assert!((c.sigma_pt_over_pt() - 0.05).abs() < 1e-12);
    }

    #[test]
    fn derived_sigma_includes_correlation() {
        let mut m = Matrix5::identity();
        m[(0, 2)] = 0.5;
        m[(2, 0)] = 0.5;
        let c = TrackCovariance::new(m, 1.0);
        let j = RowVector5::new(1.0, 0.0, 1.0, 0.0, 0.0);
        // var = 1 + 1 + 2*0.5
        assert!((c.derived_sigma(&j) - 3.0f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn resolution_quantities_round_trip() {
        let c = diag([1.0, 4.0, 9.0, 16.0, 25.0], 1.0);
        let r = c.resolution();
        assert_eq!(r.get(ResolutionQuantity::DRphi), 1.0);
        assert_eq!(r.get(ResolutionQuantity::DZ), 2.0);
        assert_eq!(r.get(ResolutionQuantity::Phi), 3.0);
        assert_eq!(r.get(ResolutionQuantity::TanLambda), 4.0);
        assert_eq!(r.get(ResolutionQuantity::QOverPt), 5.0);
        assert_eq!(r.get(ResolutionQuantity::PtRelative), 5.0);
    }

    #[test]
    fn weighted_accumulation() {
        let a = ParameterResolution {
            d_rphi: 1.0,
            d_z: 2.0,
            phi: 3.0,
            tan_lambda: 4.0,
            q_over_pt: 5.0,
            pt_relative: 6.0,
        };
        let sum = ParameterResolution::ZERO
            .add_weighted(&a, 0.25)
            .add_weighted(&a, 0.75);
        assert_eq!(sum, a);
        assert_eq!(a.scaled(2.0).pt_relative, 12.0);
    }

    #[test]
    fn parameter_indices_are_dense() {
        for (i, p) in TrackParameter::ALL.iter().enumerate() {
            assert_eq!(p.index(), i);
        }
    }

    #[test]
    fn min_eigenvalue_of_identity() {
        let c = diag([1.0; 5], 1.0);
        assert!((c.min_eigenvalue() - 1.0).abs() < 1e-12);
        assert_eq!(c.asymmetry(), 0.0);
    }
}
