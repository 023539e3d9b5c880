//! Bit-set of measurement sites marked as hit.

use std::fmt;

/// Maximum number of measurement sites a [`HitMask`] can address.
pub const MAX_SITES: usize = 32;

/// Which measurement sites of a track model carry a hit.
///
/// Bit `i` refers to the i-th measurement site in radius order (the
/// i-th reached active layer of the evaluated geometry), not to a layer
/// id of the full geometry.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HitMask(pub u32);

impl HitMask {
    /// No hits.
    pub const EMPTY: Self = Self(0);

    /// Every one of the first `n` sites hit.
    ///
    /// `n` is clamped to [`MAX_SITES`].
    pub fn full(n: usize) -> Self {
        match n {
            0 => Self::EMPTY,
            n if n >= MAX_SITES => Self(u32::MAX),
            n => Self((1u32 << n) - 1),
        }
    }

    /// Whether site `i` is hit.
    pub fn contains(self, i: usize) -> bool {
        i < MAX_SITES && self.0 & (1 << i) != 0
    }

    /// Copy with site `i` marked hit.
    #[must_use]
    pub fn with(self, i: usize) -> Self {
        debug_assert!(i < MAX_SITES);
        Self(self.0 | (1 << i))
    }

    /// Copy with site `i` marked missed.
    #[must_use]
    pub fn without(self, i: usize) -> Self {
        debug_assert!(i < MAX_SITES);
        Self(self.0 & !(1 << i))
    }

    /// Number of hit sites.
    pub fn count(self) -> usize {
        self.0.count_ones() as usize
    }

    /// Sites hit in both masks.
    #[must_use]
    pub fn intersect(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    /// Whether no site is hit.
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Indices of hit sites, ascending.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let i = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(i)
        })
    }
}

impl fmt::Debug for HitMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HitMask({:#b})", self.0)
    }
}
