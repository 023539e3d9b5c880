//! Reusable detector layouts, particles, and numerical assertions.
//!
//! - [`three_layer_registry`] / [`three_layer_geometry`]: the minimal
//!   inner-barrel scenario, active layers at 1.8, 2.4 and 3.0 cm with
//!   6 µm resolution and 98% efficiency.
//! - [`its3_geometry`]: the default ITS3 preset.
//! - [`pion`]: a 0.14 GeV particle in 0.5 T at η = 0.5.

use fastrack_core::{ParticleSample, TrackCovariance};
use fastrack_geometry::{Geometry, Its3Config, LayerRegistry, LayerSpec};

pub const SCENARIO_RADII: [f64; 3] = [1.8, 2.4, 3.0];
pub const SCENARIO_RESOLUTION: f64 = 0.0006;
pub const SCENARIO_EFFICIENCY: f64 = 0.98;
pub const SCENARIO_X0: f64 = 0.0005;

/// Registry holding the three-layer scenario, still open for kills.
pub fn three_layer_registry() -> LayerRegistry {
    let mut reg = LayerRegistry::new();
    for (i, &r) in SCENARIO_RADII.iter().enumerate() {
        let spec = LayerSpec::active(
            format!("ddd{}", i + 1),
            r,
            SCENARIO_X0,
            SCENARIO_RESOLUTION,
            SCENARIO_RESOLUTION,
            SCENARIO_EFFICIENCY,
        );
        if let Err(e) = reg.add_layer(spec) {
            panic!("scenario layer rejected: {e}");
        }
    }
    reg
}

pub fn three_layer_geometry() -> Geometry {
    match three_layer_registry().build() {
        Ok(g) => g,
        Err(e) => panic!("scenario geometry rejected: {e}"),
    }
}

/// Three-layer scenario with every layer killed.
pub fn all_killed_geometry() -> Geometry {
    let mut reg = three_layer_registry();
    for name in ["ddd1", "ddd2", "ddd3"] {
        if let Err(e) = reg.kill_layer(name) {
            panic!("kill rejected: {e}");
        }
    }
    match reg.build() {
        Ok(g) => g,
        Err(e) => panic!("killed geometry rejected: {e}"),
    }
}

pub fn its3_geometry() -> Geometry {
    match Its3Config::default().build() {
        Ok(g) => g,
        Err(e) => panic!("ITS3 preset rejected: {e}"),
    }
}

pub fn its3_with_auxiliary() -> Geometry {
    let cfg = Its3Config {
        add_tpc: true,
        add_trd: true,
        ..Its3Config::default()
    };
    match cfg.build() {
        Ok(g) => g,
        Err(e) => panic!("ITS3+TPC+TRD preset rejected: {e}"),
    }
}

pub fn pion(pt: f64) -> ParticleSample {
    match ParticleSample::new(0.14, pt, 0.5, 0.5) {
        Ok(p) => p,
        Err(e) => panic!("pion rejected: {e}"),
    }
}

/// Panic unless `cov` is symmetric and positive semi-definite up to a
/// tolerance relative to its largest entry.
pub fn assert_psd(cov: &TrackCovariance, rel_tol: f64) {
    let scale = cov.matrix().abs().max().max(f64::MIN_POSITIVE);
    assert!(
        cov.asymmetry() <= rel_tol * scale,
        "asymmetric covariance: {} (scale {scale})",
        cov.asymmetry()
    );
    let min = cov.min_eigenvalue();
    assert!(
        min >= -rel_tol * scale,
        "covariance not PSD: min eigenvalue {min} (scale {scale})"
    );
}

/// Panic unless `a ≥ b` up to a relative tolerance.
pub fn assert_not_smaller(a: f64, b: f64, rel_tol: f64, what: &str) {
    assert!(
        a >= b * (1.0 - rel_tol),
        "{what}: expected {a} >= {b} (rel tol {rel_tol})"
    );
}
