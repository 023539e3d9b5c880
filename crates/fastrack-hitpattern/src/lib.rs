//! Hit-pattern combinatorics for fastrack.
//!
//! Turns per-site efficiencies and global track-quality cuts into
//! reconstruction, fake-track, and expected-resolution figures by exact
//! enumeration of every hit/miss assignment:
//!
//! - [`PatternSpace`] enumerates patterns lazily over a bitmask counter.
//! - [`PatternPolicy`] classifies a pattern as found, good, or fake.
//! - [`aggregate`] asks a [`CovarianceSource`](fastrack_core::CovarianceSource)
//!   for the fit of every good pattern and forms the weighted means.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod aggregate;
pub mod policy;
pub mod space;

pub use aggregate::{aggregate, SampleAggregate};
pub use policy::{PatternPolicy, Verdict};
pub use space::{HitPattern, PatternIter, PatternSpace, SiteEfficiency};
