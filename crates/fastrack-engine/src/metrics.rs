//! Per-scan performance metrics.

/// Timing and counting metrics collected during one scan.
///
/// Durations are in microseconds. Pattern counters sum over both
/// evaluation modes when auxiliary detectors are present.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScanMetrics {
    /// Wall-clock time for the whole scan.
    pub total_us: u64,
    /// Scan points whose evaluation completed.
    pub samples_evaluated: u64,
    /// Evaluations (per mode) whose nominal fit failed.
    pub samples_failed: u64,
    /// Scan points dropped because the scan was cancelled.
    pub samples_cancelled: u64,
    /// Hit patterns visited.
    pub patterns_evaluated: u64,
    /// Hit patterns skipped for zero probability.
    pub patterns_skipped: u64,
    /// Pattern fits that failed.
    pub pattern_fits_failed: u64,
    /// Worker threads used.
    pub worker_count: usize,
}

impl ScanMetrics {
    pub(crate) fn absorb(&mut self, other: &SampleMetrics) {
        self.patterns_evaluated += other.patterns_evaluated;
        self.patterns_skipped += other.patterns_skipped;
        self.pattern_fits_failed += other.fits_failed;
        self.samples_failed += other.failed_modes;
    }
}

/// Counters of a single scan point.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct SampleMetrics {
    pub patterns_evaluated: u64,
    pub patterns_skipped: u64,
    pub fits_failed: u64,
    pub failed_modes: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_metrics_are_zero() {
        let m = ScanMetrics::default();
        assert_eq!(m.total_us, 0);
        assert_eq!(m.samples_evaluated, 0);
        assert_eq!(m.samples_failed, 0);
        assert_eq!(m.samples_cancelled, 0);
        assert_eq!(m.patterns_evaluated, 0);
        assert_eq!(m.worker_count, 0);
    }

    #[test]
    fn absorb_accumulates() {
        let mut m = ScanMetrics::default();
        let s = SampleMetrics {
            patterns_evaluated: 8,
            patterns_skipped: 1,
            fits_failed: 2,
            failed_modes: 1,
        };
        m.absorb(&s);
        m.absorb(&s);
        assert_eq!(m.patterns_evaluated, 16);
        assert_eq!(m.patterns_skipped, 2);
        assert_eq!(m.pattern_fits_failed, 4);
        assert_eq!(m.samples_failed, 2);
    }
}
