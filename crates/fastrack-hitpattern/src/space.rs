//! Enumeration of hit/miss patterns over measurement sites.
//!
//! Sites with efficiency strictly between 0 and 1 are *free* and span the
//! `2^F` patterns; sites with efficiency 0 or 1 are fixed misses or hits
//! and do not branch. A pattern is addressed by a counter over the
//! free sites, so iteration is a plain integer walk: lazy, finite, and
//! restartable.

use fastrack_core::{ConfigError, HitMask, MAX_SITES};

/// One measurement site as seen by the combinatorics.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SiteEfficiency {
    /// Probability that the site records a hit.
    pub efficiency: f64,
    /// Whether hits on this site count towards the track-quality cuts.
    /// Auxiliary detectors do not.
    pub counted: bool,
}

impl SiteEfficiency {
    /// A tracker site.
    pub fn tracker(efficiency: f64) -> Self {
        Self {
            efficiency,
            counted: true,
        }
    }

    /// An auxiliary site: always hit, never counted.
    pub fn auxiliary() -> Self {
        Self {
            efficiency: 1.0,
            counted: false,
        }
    }
}

/// A single hit/miss assignment and its probability.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitPattern {
    /// Sites carrying a hit.
    pub mask: HitMask,
    /// Product of `ε` over hit sites and `1 - ε` over missed sites.
    pub probability: f64,
    /// Counted sites with a hit.
    pub hits: u32,
    /// Counted sites without a hit.
    pub misses: u32,
}

/// The set of all hit patterns of one track model.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternSpace {
    sites: Vec<SiteEfficiency>,
    free: Vec<usize>,
    fixed_hits: HitMask,
    counted: HitMask,
}

impl PatternSpace {
    /// Build the space over `sites`, in site order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::TooManyLayers`] beyond [`MAX_SITES`] sites, and
    /// [`ConfigError::InvalidLayer`] for an efficiency outside `[0, 1]`.
    pub fn new(sites: impl IntoIterator<Item = SiteEfficiency>) -> Result<Self, ConfigError> {
        let sites: Vec<SiteEfficiency> = sites.into_iter().collect();
        if sites.len() > MAX_SITES {
            return Err(ConfigError::TooManyLayers {
                count: sites.len(),
                max: MAX_SITES,
            });
        }
        let mut free = Vec::new();
        let mut fixed_hits = HitMask::EMPTY;
        let mut counted = HitMask::EMPTY;
        for (i, site) in sites.iter().enumerate() {
            if !(0.0..=1.0).contains(&site.efficiency) {
                return Err(ConfigError::InvalidLayer {
                    name: format!("site {i}"),
                    reason: format!("efficiency must be in [0, 1], got {}", site.efficiency),
                });
            }
            if site.counted {
                counted = counted.with(i);
            }
            if site.efficiency >= 1.0 {
                fixed_hits = fixed_hits.with(i);
            } else if site.efficiency > 0.0 {
                free.push(i);
            }
        }
        Ok(Self {
            sites,
            free,
            fixed_hits,
            counted,
        })
    }

    /// Number of sites.
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    /// Number of sites whose outcome is uncertain.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Total number of patterns, `2^free_count()`.
    pub fn len(&self) -> u64 {
        1u64 << self.free.len()
    }

    /// Always false: the empty site set still has one pattern.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Sites that are hit in every pattern.
    pub fn fixed_hits(&self) -> HitMask {
        self.fixed_hits
    }

    /// Pattern with every site at efficiency > 0 hit.
    pub fn nominal(&self) -> HitMask {
        let mut mask = self.fixed_hits;
        for &i in &self.free {
            mask = mask.with(i);
        }
        mask
    }

    /// Pattern number `index` (bit `b` of `index` decides free site `b`).
    pub fn pattern(&self, index: u64) -> HitPattern {
        let mut mask = self.fixed_hits;
        let mut probability = 1.0;
        for (bit, &site) in self.free.iter().enumerate() {
            let eff = self.sites[site].efficiency;
            if index & (1u64 << bit) != 0 {
                mask = mask.with(site);
                probability *= eff;
            } else {
                probability *= 1.0 - eff;
            }
        }
        let hits = mask.intersect(self.counted).count() as u32;
        let misses = self.counted.count() as u32 - hits;
        HitPattern {
            mask,
            probability,
            hits,
            misses,
        }
    }

    /// Lazily enumerate every pattern with non-zero probability.
    pub fn iter(&self) -> PatternIter<'_> {
        PatternIter {
            space: self,
            next: 0,
            skipped: 0,
        }
    }
}

impl<'a> IntoIterator for &'a PatternSpace {
    type Item = HitPattern;
    type IntoIter = PatternIter<'a>;

    fn into_iter(self) -> PatternIter<'a> {
        self.iter()
    }
}

/// Iterator over the patterns of a [`PatternSpace`].
///
/// Patterns whose probability underflows to zero are skipped and
/// counted; see [`skipped`](Self::skipped).
#[derive(Clone, Debug)]
pub struct PatternIter<'a> {
    space: &'a PatternSpace,
    next: u64,
    skipped: u64,
}

impl PatternIter<'_> {
    /// Patterns skipped so far for having zero probability.
    pub fn skipped(&self) -> u64 {
        self.skipped
    }
}

impl Iterator for PatternIter<'_> {
    type Item = HitPattern;

    fn next(&mut self) -> Option<HitPattern> {
        while self.next < self.space.len() {
            let pattern = self.space.pattern(self.next);
            self.next += 1;
            if pattern.probability > 0.0 {
                return Some(pattern);
            }
            self.skipped += 1;
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.space.len() - self.next;
        (0, usize::try_from(remaining).ok())
    }
}
