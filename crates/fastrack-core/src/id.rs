//! Strongly-typed identifiers.

use std::fmt;

/// Identifies a layer within a built geometry.
///
/// `LayerId(n)` is the n-th layer in radius-ascending order. Ids are
/// assigned when the registry is frozen into a geometry and are not
/// stable across different builds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for LayerId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Position of a kinematic sample within a scan grid.
///
/// Samples are numbered rapidity-major, transverse-momentum-minor. The
/// result sink orders its output by this index regardless of which
/// worker finished first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SampleIndex(pub u32);

impl fmt::Display for SampleIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SampleIndex {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_order_numerically() {
        assert!(LayerId(1) < LayerId(2));
        assert!(SampleIndex(9) < SampleIndex(10));
    }

    #[test]
    fn display_is_bare_number() {
        assert_eq!(LayerId(7).to_string(), "7");
        assert_eq!(SampleIndex::from(3).to_string(), "3");
    }
}
