//! Track-quality classification of hit patterns.
//!
//! A candidate with `h` genuine hits and `m` missed counted layers picks
//! up `K ~ Binomial(m, f)` fake hits, `f` being the probability that a
//! missed layer still delivers a (wrong) cluster. Then:
//!
//! - found ⇔ `h + K ≥ min_hits`
//! - good ⇔ found ∧ `h ≥ min_correlated_hits` ∧ `K ≤ max_fake_hits`
//! - fake ⇔ found ∧ ¬good

use fastrack_core::{ConfigError, GlobalCuts};

/// Conditional probabilities of one pattern's outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Verdict {
    /// The candidate passes the total-hit requirement.
    pub found: f64,
    /// The candidate is a correctly reconstructed track.
    pub good: f64,
    /// The candidate is found but not good.
    pub fake: f64,
}

/// Cuts plus the fake-hit model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatternPolicy {
    cuts: GlobalCuts,
    fake_hit_probability: f64,
}

impl PatternPolicy {
    /// Validate and combine cuts with the per-layer fake-hit probability.
    pub fn new(cuts: GlobalCuts, fake_hit_probability: f64) -> Result<Self, ConfigError> {
        cuts.validate()?;
        if !(0.0..=1.0).contains(&fake_hit_probability) {
            return Err(ConfigError::InvalidCuts {
                reason: format!(
                    "fake_hit_probability must be in [0, 1], got {fake_hit_probability}"
                ),
            });
        }
        Ok(Self {
            cuts,
            fake_hit_probability,
        })
    }

    /// The configured cuts.
    pub fn cuts(&self) -> &GlobalCuts {
        &self.cuts
    }

    /// Per-missed-layer fake-hit probability.
    pub fn fake_hit_probability(&self) -> f64 {
        self.fake_hit_probability
    }

    /// Outcome probabilities for `hits` genuine hits and `misses` missed
    /// counted layers.
    pub fn classify(&self, hits: u32, misses: u32) -> Verdict {
        let correlated = hits >= self.cuts.min_correlated_hits;
        let needed = self.cuts.min_hits.saturating_sub(hits);
        let mut verdict = Verdict::default();
        for k in needed..=misses {
            let p = binomial(misses, k, self.fake_hit_probability);
            verdict.found += p;
            if correlated && k <= self.cuts.max_fake_hits {
                verdict.good += p;
            }
        }
        verdict.fake = (verdict.found - verdict.good).max(0.0);
        verdict
    }
}

/// `P(K = k)` for `K ~ Binomial(n, p)`.
fn binomial(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return 0.0;
    }
    // Exact at the boundaries so p ∈ {0, 1} yields indicator values.
    if p == 0.0 {
        return if k == 0 { 1.0 } else { 0.0 };
    }
    if p == 1.0 {
        return if k == n { 1.0 } else { 0.0 };
    }
    let mut coeff = 1.0;
    for i in 0..k {
        coeff *= f64::from(n - i) / f64::from(i + 1);
    }
    coeff * p.powi(k as i32) * (1.0 - p).powi((n - k) as i32)
}
