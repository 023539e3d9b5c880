//! Probability-weighted aggregation of per-pattern fits.

use fastrack_core::{CovarianceSource, ParameterResolution};

use crate::policy::PatternPolicy;
use crate::space::PatternSpace;

/// Expected performance of one sample over all hit patterns.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleAggregate {
    /// Probability that a candidate is found at all.
    pub reconstruction_probability: f64,
    /// Probability of a correctly reconstructed track.
    pub good_probability: f64,
    /// Probability of a fake track.
    pub fake_probability: f64,
    /// Good-track probability whose pattern fit failed; excluded from
    /// [`expected`](Self::expected).
    pub unfit_probability: f64,
    /// Good-weighted mean resolution over successfully fitted patterns;
    /// `None` when no good pattern could be fitted.
    pub expected: Option<ParameterResolution>,
    /// Patterns visited.
    pub patterns_evaluated: u64,
    /// Patterns skipped for zero probability.
    pub patterns_skipped: u64,
    /// Pattern fits that returned an error.
    pub fits_failed: u64,
}

/// Enumerate every pattern of `space`, classify it with `policy`, and
/// fit the good ones with `source`.
///
/// Fits are requested only for patterns with a non-zero chance of being
/// a good track. Results are deterministic for a deterministic source.
pub fn aggregate<S>(source: &S, space: &PatternSpace, policy: &PatternPolicy) -> SampleAggregate
where
    S: CovarianceSource + ?Sized,
{
    let mut out = SampleAggregate {
        reconstruction_probability: 0.0,
        good_probability: 0.0,
        fake_probability: 0.0,
        unfit_probability: 0.0,
        expected: None,
        patterns_evaluated: 0,
        patterns_skipped: 0,
        fits_failed: 0,
    };
    let mut weighted = ParameterResolution::ZERO;
    let mut fitted_weight = 0.0;

    let mut patterns = space.iter();
    for pattern in patterns.by_ref() {
        out.patterns_evaluated += 1;
        let verdict = policy.classify(pattern.hits, pattern.misses);
        out.reconstruction_probability += pattern.probability * verdict.found;
        out.fake_probability += pattern.probability * verdict.fake;
        if verdict.good <= 0.0 {
            continue;
        }
        let w = pattern.probability * verdict.good;
        out.good_probability += w;
        match source.fit(pattern.mask) {
            Ok(cov) => {
                weighted = weighted.add_weighted(&cov.resolution(), w);
                fitted_weight += w;
            }
            Err(_) => {
                out.unfit_probability += w;
                out.fits_failed += 1;
            }
        }
    }
    out.patterns_skipped = patterns.skipped();
    if fitted_weight > 0.0 {
        out.expected = Some(weighted.scaled(1.0 / fitted_weight));
    }
    out
}

#[cfg(test)]
mod tests {
    use fastrack_core::{GlobalCuts, HitMask};
    use fastrack_test_utils::MockFitter;

    use super::*;
    use crate::space::SiteEfficiency;

    fn cuts(min_hits: u32) -> GlobalCuts {
        GlobalCuts {
            min_hits,
            min_correlated_hits: min_hits,
            max_fake_hits: 1,
        }
    }

    #[test]
    fn certain_hits_reproduce_nominal_fit() {
        let space = PatternSpace::new([SiteEfficiency::tracker(1.0); 3]).unwrap();
        let policy = PatternPolicy::new(cuts(3), 0.0).unwrap();
        let fitter = MockFitter::new(3).with_variance(3.0);
        let agg = aggregate(&fitter, &space, &policy);
        assert_eq!(agg.patterns_evaluated, 1);
        assert_eq!(agg.reconstruction_probability, 1.0);
        assert_eq!(agg.expected.unwrap().phi, 1.0);
    }

    #[test]
    fn expected_resolution_is_weighted_mean() {
        // Three sites at 50%: need two hits.
        let space = PatternSpace::new([SiteEfficiency::tracker(0.5); 3]).unwrap();
        let policy = PatternPolicy::new(cuts(2), 0.0).unwrap();
        let fitter = MockFitter::new(3);
        let agg = aggregate(&fitter, &space, &policy);
        // P(3 hits) = 1/8, P(2 hits) = 3/8.
        assert!((agg.reconstruction_probability - 0.5).abs() < 1e-12);
        let expected = (0.125 * fitter.sigma_for(3) + 0.375 * fitter.sigma_for(2)) / 0.5;
        assert!((agg.expected.unwrap().d_rphi - expected).abs() < 1e-12);
        assert_eq!(fitter.calls(), 4);
    }

    #[test]
    fn unreachable_hit_requirement_gives_zero() {
        let space = PatternSpace::new([SiteEfficiency::tracker(0.98); 3]).unwrap();
        let policy = PatternPolicy::new(cuts(4), 0.0).unwrap();
        let fitter = MockFitter::new(3);
        let agg = aggregate(&fitter, &space, &policy);
        assert_eq!(agg.reconstruction_probability, 0.0);
        assert_eq!(agg.good_probability, 0.0);
        assert!(agg.expected.is_none());
        assert_eq!(fitter.calls(), 0);
    }

    #[test]
    fn failed_fits_are_accounted() {
        let space = PatternSpace::new([SiteEfficiency::tracker(0.5); 2]).unwrap();
        let policy = PatternPolicy::new(cuts(2), 0.0).unwrap();
        let fitter = MockFitter::new(2).fail_on(HitMask(0b11));
        let agg = aggregate(&fitter, &space, &policy);
        assert!((agg.good_probability - 0.25).abs() < 1e-12);
        assert!((agg.unfit_probability - 0.25).abs() < 1e-12);
        assert_eq!(agg.fits_failed, 1);
        assert!(agg.expected.is_none());
    }

    #[test]
    fn auxiliary_hits_do_not_satisfy_cuts() {
        let space = PatternSpace::new([
            SiteEfficiency::tracker(1.0),
            SiteEfficiency::auxiliary(),
            SiteEfficiency::auxiliary(),
        ])
        .unwrap();
        let policy = PatternPolicy::new(cuts(2), 0.0).unwrap();
        let agg = aggregate(&MockFitter::new(3), &space, &policy);
        assert_eq!(agg.reconstruction_probability, 0.0);
    }
}
