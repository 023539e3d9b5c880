//! Global track-quality cuts.

use crate::error::ConfigError;
use crate::mask::MAX_SITES;

/// Track-quality requirements applied to every hit pattern.
///
/// Set once before evaluation and never mutated while a scan runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GlobalCuts {
    /// Minimum number of hits (genuine plus picked-up fakes) for a
    /// candidate to be found at all. Default: 4.
    pub min_hits: u32,
    /// Minimum number of genuine hits for a found candidate to count as a
    /// correctly reconstructed track. Default: 4.
    pub min_correlated_hits: u32,
    /// Maximum number of fake hits a correctly reconstructed track may
    /// carry; more makes it a fake track. Default: 1.
    pub max_fake_hits: u32,
}

impl Default for GlobalCuts {
    fn default() -> Self {
        Self {
            min_hits: 4,
            min_correlated_hits: 4,
            max_fake_hits: 1,
        }
    }
}

impl GlobalCuts {
    /// Validate cut consistency.
    ///
    /// Rejects counts above [`MAX_SITES`] and a correlated-hit requirement
    /// larger than the total-hit requirement.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let max = MAX_SITES as u32;
        for (label, value) in [
            ("min_hits", self.min_hits),
            ("min_correlated_hits", self.min_correlated_hits),
            ("max_fake_hits", self.max_fake_hits),
        ] {
            if value > max {
                return Err(ConfigError::InvalidCuts {
                    reason: format!("{label} = {value} exceeds the layer limit of {max}"),
                });
            }
        }
        if self.min_correlated_hits > self.min_hits {
            return Err(ConfigError::InvalidCuts {
                reason: format!(
                    "min_correlated_hits ({}) exceeds min_hits ({})",
                    self.min_correlated_hits, self.min_hits,
                ),
            });
        }
        Ok(())
    }
}
