//! Test utilities and mock types for fastrack development.
//!
//! Provides a [`MockFitter`] implementing [`CovarianceSource`] so the
//! hit-pattern combinatorics can be tested without the propagator, plus
//! reusable geometries and numerical assertions in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};

use nalgebra::{Matrix5, Vector5};

use fastrack_core::{CovarianceSource, FitError, HitMask, TrackCovariance};

/// Deterministic stand-in for a track model.
///
/// Each hit site contributes unit information to every parameter, so a
/// fit with `h` hits has covariance `diag(variance / h)`. Fewer than two
/// hits is [`FitError::Unconstrained`]; masks registered with
/// [`fail_on`](Self::fail_on) return [`FitError::Singular`].
pub struct MockFitter {
    sites: usize,
    variance: f64,
    pt: f64,
    failing: HashSet<HitMask>,
    calls: AtomicUsize,
}

impl MockFitter {
    pub fn new(sites: usize) -> Self {
        Self {
            sites,
            variance: 1.0,
            pt: 1.0,
            failing: HashSet::new(),
            calls: AtomicUsize::new(0),
        }
    }

    /// Per-site variance (default 1).
    pub fn with_variance(mut self, variance: f64) -> Self {
        self.variance = variance;
        self
    }

    /// Transverse momentum stamped on produced covariances (default 1).
    pub fn with_pt(mut self, pt: f64) -> Self {
        self.pt = pt;
        self
    }

    /// Make `mask` fail as ill-conditioned.
    pub fn fail_on(mut self, mask: HitMask) -> Self {
        self.failing.insert(mask);
        self
    }

    /// Number of `fit()` calls so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// The σ every parameter gets with `hits` hit sites.
    pub fn sigma_for(&self, hits: usize) -> f64 {
        (self.variance / hits as f64).sqrt()
    }
}

impl CovarianceSource for MockFitter {
    fn site_count(&self) -> usize {
        self.sites
    }

    fn fit(&self, hits: HitMask) -> Result<TrackCovariance, FitError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let hits = hits.intersect(HitMask::full(self.sites));
        if self.failing.contains(&hits) {
            return Err(FitError::Singular {
                condition: f64::INFINITY,
                threshold: 1e12,
            });
        }
        let n = hits.count();
        if n < 2 {
            return Err(FitError::Unconstrained { measurements: n });
        }
        let var = self.variance / n as f64;
        Ok(TrackCovariance::new(
            Matrix5::from_diagonal(&Vector5::repeat(var)),
            self.pt,
        ))
    }
}
