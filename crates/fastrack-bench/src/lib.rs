//! Benchmark profiles for the fastrack resolution estimator.
//!
//! Provides pre-built detector and scan profiles for benchmarks and
//! examples:
//!
//! - [`reference_profile`]: default ITS3 layout, 40 log-spaced pt bins at
//!   the average rapidity
//! - [`stress_profile`]: ITS3 plus TPC and TRD over a 100 × 5 grid, every
//!   sample evaluated in both modes

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use fastrack_core::ConfigError;
use fastrack_engine::{EngineConfig, PtAxis, ScanGrid, Spacing};
use fastrack_geometry::{Geometry, Its3Config};

/// A detector, engine configuration, and grid ready to scan.
pub struct Profile {
    /// Frozen detector layout.
    pub geometry: Geometry,
    /// Engine configuration.
    pub config: EngineConfig,
    /// Scan points.
    pub grid: ScanGrid,
}

/// Default ITS3 layout over the default pt axis.
pub fn reference_profile() -> Result<Profile, ConfigError> {
    Ok(Profile {
        geometry: Its3Config::default().build()?,
        config: EngineConfig::default(),
        grid: ScanGrid::default(),
    })
}

/// ITS3 with TPC and TRD over 100 pt bins and 5 rapidities.
pub fn stress_profile() -> Result<Profile, ConfigError> {
    let its3 = Its3Config {
        add_tpc: true,
        add_trd: true,
        ..Its3Config::default()
    };
    Ok(Profile {
        geometry: its3.build()?,
        config: EngineConfig::default(),
        grid: ScanGrid {
            pt: PtAxis {
                min: 0.05,
                max: 50.0,
                bins: 100,
                spacing: Spacing::Log,
            },
            rapidities: vec![0.0, 0.25, 0.5, 0.75, 1.0],
        },
    })
}
