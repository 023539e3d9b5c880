//! Detector geometry for fastrack.
//!
//! Geometry is built in two phases:
//!
//! 1. A mutable [`LayerRegistry`] collects layers in any order, rejects
//!    duplicate names, and applies irreversible kills.
//! 2. [`LayerRegistry::build`] sorts the layers by radius, appends the
//!    auxiliary bulk detectors, validates the result, and freezes it into
//!    an immutable [`Geometry`] that evaluation code borrows.
//!
//! [`presets::Its3Config`] builds the ITS3 upgrade layout with every
//! tunable as an explicit field.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod auxiliary;
pub mod geometry;
pub mod layer;
pub mod presets;
pub mod registry;

pub use auxiliary::{AuxDetectorSpec, AuxKind};
pub use geometry::Geometry;
pub use layer::{Layer, LayerKind, LayerSpec, Resolution};
pub use presets::Its3Config;
pub use registry::LayerRegistry;
