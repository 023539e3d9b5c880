//! Per-sample evaluation results.

use std::fmt;

use fastrack_core::{FitError, ParameterResolution, SampleIndex};

/// Which geometry a result was computed on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ReportMode {
    /// Tracker layers only.
    TrackerOnly,
    /// Tracker plus auxiliary bulk detectors.
    Combined,
}

impl fmt::Display for ReportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TrackerOnly => "tracker-only",
            Self::Combined => "combined",
        })
    }
}

/// Resolution figures of one (pt, η) sample in one geometry.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolutionResult {
    /// Position in the scan.
    pub index: SampleIndex,
    /// Transverse momentum (GeV/c).
    pub pt: f64,
    /// Pseudorapidity.
    pub rapidity: f64,
    /// Resolution with every reached layer hit.
    pub nominal: ParameterResolution,
    /// Good-track-weighted mean resolution over hit patterns; `None`
    /// when no pattern yields a good, fittable track.
    pub expected: Option<ParameterResolution>,
    /// Probability that a track candidate is found.
    pub reconstruction_probability: f64,
    /// Probability of a correctly reconstructed track.
    pub good_probability: f64,
    /// Probability of a fake track.
    pub fake_probability: f64,
    /// Good-track probability lost to failed pattern fits.
    pub unfit_probability: f64,
    /// Measuring layers the track reaches.
    pub reached_layers: usize,
    /// Effective material crossed, X/X0.
    pub material: f64,
}

/// A sample whose nominal fit failed.
#[derive(Clone, Debug, PartialEq)]
pub struct SampleFailure {
    /// Position in the scan.
    pub index: SampleIndex,
    /// Transverse momentum (GeV/c).
    pub pt: f64,
    /// Pseudorapidity.
    pub rapidity: f64,
    /// Why the fit failed.
    pub error: FitError,
}

impl fmt::Display for SampleFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "sample {} (pt={}, eta={}): {}",
            self.index, self.pt, self.rapidity, self.error
        )
    }
}

/// Outcome of evaluating one sample in one geometry.
pub type SampleOutcome = Result<ResolutionResult, SampleFailure>;

/// Both outcomes of one scan point.
#[derive(Clone, Debug, PartialEq)]
pub struct ScanEntry {
    /// Position in the scan.
    pub index: SampleIndex,
    /// Outcome on the tracker-only geometry.
    pub tracker: SampleOutcome,
    /// Outcome on the combined geometry, present only when auxiliary
    /// detectors are configured.
    pub combined: Option<SampleOutcome>,
}

impl ScanEntry {
    /// Outcome for a mode. Without auxiliary detectors the combined
    /// mode has no outcome.
    pub fn outcome(&self, mode: ReportMode) -> Option<&SampleOutcome> {
        match mode {
            ReportMode::TrackerOnly => Some(&self.tracker),
            ReportMode::Combined => self.combined.as_ref(),
        }
    }
}
