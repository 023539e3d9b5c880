//! Plain-text reports of fastrack resolution scans.
//!
//! [`report`] writes the curves of one [`ReportMode`] as a tab-separated
//! table that spreadsheet and plotting tools read directly:
//!
//! ```text
//! # fastrack report v1
//! # mode: tracker-only
//! # samples: 40
//! # fingerprint: 0x1b3f09c2e45a7d10
//! pt  eta  sigma_pt_over_pt  ...  reached_layers  x_over_x0
//! 0.05  0.5  0.0213  ...
//! # failed sample 7 (pt=..., eta=...): ...
//! ```
//!
//! The fingerprint is [`report_hash`] of the reported outcomes, so two
//! reports of the same scan can be compared without diffing the rows.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod hash;
pub mod writer;

use std::io::Write;

use fastrack_engine::{ReportMode, ScanReport};

pub use error::ReportError;
pub use hash::report_hash;
pub use writer::{CurveWriter, ReportHeader};

/// Current table format version.
pub const FORMAT_VERSION: u8 = 1;

/// Write the `mode` curves of `scan` to `destination`.
///
/// Rows follow scan order. Failed samples are written as comment lines
/// in place.
///
/// # Errors
///
/// - [`ReportError::MissingAuxiliary`] for [`ReportMode::Combined`] on a
///   scan without auxiliary detectors.
/// - [`ReportError::EmptyReport`] when no sample completed.
/// - [`ReportError::Io`] from the destination.
pub fn report<W: Write>(
    scan: &ScanReport,
    mode: ReportMode,
    destination: W,
) -> Result<(), ReportError> {
    if mode == ReportMode::Combined && !scan.has_combined() {
        return Err(ReportError::MissingAuxiliary);
    }
    if scan.entries().is_empty() {
        return Err(ReportError::EmptyReport);
    }

    let header = ReportHeader {
        mode,
        samples: scan.entries().len(),
        fingerprint: report_hash(scan, mode),
    };
    let mut writer = CurveWriter::new(destination, &header)?;
    for outcome in scan.entries().iter().filter_map(|e| e.outcome(mode)) {
        match outcome {
            Ok(r) => writer.write_result(r)?,
            Err(f) => writer.write_failure(f)?,
        }
    }
    writer.flush()
}
