//! Result collection and curve extraction.
//!
//! [`ResultSink`] is owned by the collector side of a scan; workers never
//! touch it. Entries arrive in completion order and are stored by scan
//! index, so the finished [`ScanReport`] is ordered regardless of how
//! the work was scheduled.

use fastrack_core::{ResolutionQuantity, SampleIndex};

use crate::metrics::{SampleMetrics, ScanMetrics};
use crate::result::{ReportMode, ResolutionResult, SampleFailure, ScanEntry};

/// Accumulates scan entries.
#[derive(Debug)]
pub struct ResultSink {
    slots: Vec<Option<ScanEntry>>,
    cancelled: Vec<SampleIndex>,
    has_auxiliary: bool,
    metrics: ScanMetrics,
}

impl ResultSink {
    /// Sink for a scan of `samples` points.
    pub fn new(samples: usize, has_auxiliary: bool) -> Self {
        Self {
            slots: vec![None; samples],
            cancelled: Vec::new(),
            has_auxiliary,
            metrics: ScanMetrics::default(),
        }
    }

    /// Store a completed entry. Entries outside the scan are ignored.
    pub fn append(&mut self, entry: ScanEntry) {
        self.metrics.samples_evaluated += 1;
        let i = entry.index.0 as usize;
        if let Some(slot) = self.slots.get_mut(i) {
            *slot = Some(entry);
        }
    }

    pub(crate) fn append_with_metrics(&mut self, entry: ScanEntry, metrics: &SampleMetrics) {
        self.metrics.absorb(metrics);
        self.append(entry);
    }

    /// Record that a point was dropped by cancellation.
    pub fn cancel(&mut self, index: SampleIndex) {
        self.metrics.samples_cancelled += 1;
        self.cancelled.push(index);
    }

    /// Number of entries stored so far.
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Whether nothing has been stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Freeze into a report, stamping wall-clock time and pool size.
    pub fn finish(mut self, total_us: u64, worker_count: usize) -> ScanReport {
        self.metrics.total_us = total_us;
        self.metrics.worker_count = worker_count;
        self.cancelled.sort();
        ScanReport {
            entries: self.slots.into_iter().flatten().collect(),
            cancelled: self.cancelled,
            has_auxiliary: self.has_auxiliary,
            metrics: self.metrics,
        }
    }
}

/// One point of a resolution or efficiency curve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurvePoint {
    /// Transverse momentum (GeV/c).
    pub pt: f64,
    /// Pseudorapidity.
    pub rapidity: f64,
    /// Curve value.
    pub value: f64,
}

/// Ordered results of a finished scan.
#[derive(Clone, Debug)]
pub struct ScanReport {
    entries: Vec<ScanEntry>,
    cancelled: Vec<SampleIndex>,
    has_auxiliary: bool,
    metrics: ScanMetrics,
}

impl ScanReport {
    /// Completed entries, by scan index.
    pub fn entries(&self) -> &[ScanEntry] {
        &self.entries
    }

    /// Points dropped by cancellation, ascending.
    pub fn cancelled(&self) -> &[SampleIndex] {
        &self.cancelled
    }

    /// Whether every scan point completed.
    pub fn is_complete(&self) -> bool {
        self.cancelled.is_empty()
    }

    /// Whether combined (tracker + auxiliary) results exist.
    pub fn has_combined(&self) -> bool {
        self.has_auxiliary
    }

    /// Scan metrics.
    pub fn metrics(&self) -> &ScanMetrics {
        &self.metrics
    }

    /// Successful results of one mode, ordered.
    pub fn results(&self, mode: ReportMode) -> impl Iterator<Item = &ResolutionResult> + '_ {
        self.entries
            .iter()
            .filter_map(move |e| e.outcome(mode)?.as_ref().ok())
    }

    /// Failed samples of one mode, ordered.
    pub fn failures(&self, mode: ReportMode) -> impl Iterator<Item = &SampleFailure> + '_ {
        self.entries
            .iter()
            .filter_map(move |e| e.outcome(mode)?.as_ref().err())
    }

    /// Nominal resolution of `quantity` against pt.
    pub fn curve(&self, mode: ReportMode, quantity: ResolutionQuantity) -> Vec<CurvePoint> {
        self.results(mode)
            .map(|r| point(r, r.nominal.get(quantity)))
            .collect()
    }

    /// Expected (pattern-weighted) resolution of `quantity` against pt.
    /// Samples without a good track are left out.
    pub fn expected_curve(
        &self,
        mode: ReportMode,
        quantity: ResolutionQuantity,
    ) -> Vec<CurvePoint> {
        self.results(mode)
            .filter_map(|r| Some(point(r, r.expected?.get(quantity))))
            .collect()
    }

    /// Reconstruction probability against pt.
    pub fn efficiency_curve(&self, mode: ReportMode) -> Vec<CurvePoint> {
        self.results(mode)
            .map(|r| point(r, r.reconstruction_probability))
            .collect()
    }

    /// Fake-track probability against pt.
    pub fn fake_curve(&self, mode: ReportMode) -> Vec<CurvePoint> {
        self.results(mode)
            .map(|r| point(r, r.fake_probability))
            .collect()
    }
}

fn point(r: &ResolutionResult, value: f64) -> CurvePoint {
    CurvePoint {
        pt: r.pt,
        rapidity: r.rapidity,
        value,
    }
}
