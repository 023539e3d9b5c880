//! The scan driver.
//!
//! A [`Solver`] owns a frozen geometry and a validated configuration.
//! [`evaluate`](Solver::evaluate) runs one (pt, η) sample on the calling
//! thread; [`solve`](Solver::solve) fans a whole [`ScanGrid`] out over a
//! scoped worker pool and collects the entries into a [`ScanReport`].
//!
//! # Failure policy
//!
//! - A [`ConfigError`] (bad grid, unusable site set, thread spawn
//!   failure) aborts the whole scan.
//! - A [`FitError`](fastrack_core::FitError) of the nominal fit fails
//!   only that sample in that mode; it is recorded as a
//!   [`SampleFailure`] and the scan continues.

use std::thread;
use std::time::Instant;

use fastrack_core::{ConfigError, SampleIndex};
use fastrack_geometry::Geometry;
use fastrack_hitpattern::{aggregate, PatternPolicy, PatternSpace, SiteEfficiency};
use fastrack_propagator::TrackModel;

use crate::cancel::CancelToken;
use crate::config::EngineConfig;
use crate::grid::{ScanGrid, ScanPoint};
use crate::metrics::SampleMetrics;
use crate::pool::{worker_loop, WorkerReply};
use crate::result::{ReportMode, ResolutionResult, SampleFailure, SampleOutcome, ScanEntry};
use crate::sink::{ResultSink, ScanReport};

/// Evaluates scan points against one detector geometry.
///
/// Immutable after construction and shared by reference with every
/// worker of a scan.
#[derive(Debug)]
pub struct Solver {
    config: EngineConfig,
    policy: PatternPolicy,
    tracker: Geometry,
    combined: Option<Geometry>,
}

impl Solver {
    /// Validate `config` and prepare the evaluation geometries.
    ///
    /// When `geometry` carries auxiliary detectors, a tracker-only copy
    /// is derived and every sample is evaluated in both modes.
    ///
    /// # Errors
    ///
    /// Any [`ConfigError`] from [`EngineConfig::validate`].
    pub fn new(geometry: Geometry, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let policy = PatternPolicy::new(config.cuts, config.fake_hit_probability)?;
        let (tracker, combined) = if geometry.has_auxiliary() {
            (geometry.tracker_only(), Some(geometry))
        } else {
            (geometry, None)
        };
        Ok(Self {
            config,
            policy,
            tracker,
            combined,
        })
    }

    /// The validated configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The pattern classification policy.
    pub fn policy(&self) -> &PatternPolicy {
        &self.policy
    }

    /// Geometry evaluated in `mode`, if that mode is available.
    pub fn geometry(&self, mode: ReportMode) -> Option<&Geometry> {
        match mode {
            ReportMode::TrackerOnly => Some(&self.tracker),
            ReportMode::Combined => self.combined.as_ref(),
        }
    }

    /// Whether samples are also evaluated with auxiliary detectors.
    pub fn has_combined(&self) -> bool {
        self.combined.is_some()
    }

    /// Evaluate a single sample on the calling thread.
    ///
    /// # Errors
    ///
    /// [`ConfigError::InvalidParticle`] for an unusable (pt, η), or a
    /// site set the pattern enumeration cannot address.
    pub fn evaluate(&self, pt: f64, rapidity: f64) -> Result<ScanEntry, ConfigError> {
        let sample = self.config.particle.sample(pt, rapidity)?;
        let point = ScanPoint {
            index: SampleIndex(0),
            sample,
        };
        self.evaluate_point(point).map(|(entry, _)| entry)
    }

    pub(crate) fn evaluate_point(
        &self,
        point: ScanPoint,
    ) -> Result<(ScanEntry, SampleMetrics), ConfigError> {
        let mut metrics = SampleMetrics::default();
        let tracker =
            self.evaluate_in(&self.tracker, ReportMode::TrackerOnly, point, &mut metrics)?;
        let combined = match &self.combined {
            Some(geometry) => Some(self.evaluate_in(
                geometry,
                ReportMode::Combined,
                point,
                &mut metrics,
            )?),
            None => None,
        };
        Ok((
            ScanEntry {
                index: point.index,
                tracker,
                combined,
            },
            metrics,
        ))
    }

    fn evaluate_in(
        &self,
        geometry: &Geometry,
        mode: ReportMode,
        point: ScanPoint,
        metrics: &mut SampleMetrics,
    ) -> Result<SampleOutcome, ConfigError> {
        let sample = point.sample;
        let model = TrackModel::new(geometry, sample, self.config.fit);

        let nominal = match model.nominal() {
            Ok(cov) => cov.resolution(),
            Err(error) => {
                tracing::warn!(
                    pt = sample.pt,
                    eta = sample.rapidity,
                    %mode,
                    %error,
                    "nominal fit failed"
                );
                metrics.failed_modes += 1;
                return Ok(Err(SampleFailure {
                    index: point.index,
                    pt: sample.pt,
                    rapidity: sample.rapidity,
                    error,
                }));
            }
        };

        let space = PatternSpace::new(model.sites().iter().map(|site| {
            if site.auxiliary {
                SiteEfficiency::auxiliary()
            } else {
                SiteEfficiency::tracker(site.efficiency)
            }
        }))?;
        let agg = aggregate(&model, &space, &self.policy);
        metrics.patterns_evaluated += agg.patterns_evaluated;
        metrics.patterns_skipped += agg.patterns_skipped;
        metrics.fits_failed += agg.fits_failed;

        tracing::debug!(
            pt = sample.pt,
            eta = sample.rapidity,
            %mode,
            reconstruction = agg.reconstruction_probability,
            "sample evaluated"
        );

        Ok(Ok(ResolutionResult {
            index: point.index,
            pt: sample.pt,
            rapidity: sample.rapidity,
            nominal,
            expected: agg.expected,
            reconstruction_probability: agg.reconstruction_probability,
            good_probability: agg.good_probability,
            fake_probability: agg.fake_probability,
            unfit_probability: agg.unfit_probability,
            reached_layers: model.sites().iter().filter(|s| !s.auxiliary).count(),
            material: model.material(),
        }))
    }

    /// Evaluate every point of `grid`.
    pub fn solve(&self, grid: &ScanGrid) -> Result<ScanReport, ConfigError> {
        self.solve_with(grid, &CancelToken::new())
    }

    /// Evaluate every point of `grid`, stopping early once `cancel` fires.
    ///
    /// Points not completed before cancellation are listed in
    /// [`ScanReport::cancelled`]; none of their results reach the report.
    ///
    /// # Errors
    ///
    /// An invalid grid, a worker spawn failure, or a configuration
    /// problem exposed by any point. Per-sample fit failures are not
    /// errors here.
    pub fn solve_with(
        &self,
        grid: &ScanGrid,
        cancel: &CancelToken,
    ) -> Result<ScanReport, ConfigError> {
        let start = Instant::now();
        let points = grid.points(&self.config.particle)?;
        let worker_count = self
            .config
            .workers
            .resolved_worker_count()
            .min(points.len())
            .max(1);
        let mut sink = ResultSink::new(points.len(), self.has_combined());
        let abort = CancelToken::new();

        thread::scope(|scope| -> Result<(), ConfigError> {
            // Created inside the scope so an early return closes the task
            // channel before the scope joins its workers.
            let (task_tx, task_rx) = crossbeam_channel::bounded::<ScanPoint>(worker_count * 2);
            let (reply_tx, reply_rx) = crossbeam_channel::unbounded::<WorkerReply>();

            for i in 0..worker_count {
                let tasks = task_rx.clone();
                let replies = reply_tx.clone();
                let abort = &abort;
                thread::Builder::new()
                    .name(format!("fastrack-worker-{i}"))
                    .spawn_scoped(scope, move || {
                        worker_loop(self, tasks, replies, || {
                            cancel.is_cancelled() || abort.is_cancelled()
                        })
                    })
                    .map_err(|e| ConfigError::ThreadSpawnFailed {
                        reason: format!("fastrack-worker-{i}: {e}"),
                    })?;
            }
            drop(task_rx);
            drop(reply_tx);

            let mut fed = 0;
            for point in &points {
                if cancel.is_cancelled() || task_tx.send(*point).is_err() {
                    break;
                }
                fed += 1;
            }
            drop(task_tx);
            for point in &points[fed..] {
                sink.cancel(point.index);
            }

            let mut failure = None;
            for reply in reply_rx.iter() {
                match reply {
                    WorkerReply::Done { entry, metrics } => {
                        sink.append_with_metrics(entry, &metrics);
                    }
                    WorkerReply::Cancelled(index) => sink.cancel(index),
                    WorkerReply::Failed(e) => {
                        abort.cancel();
                        failure.get_or_insert(e);
                    }
                }
            }
            failure.map_or(Ok(()), Err)
        })?;

        let total_us = start.elapsed().as_micros() as u64;
        let report = sink.finish(total_us, worker_count);
        let m = report.metrics();
        tracing::info!(
            samples = points.len(),
            workers = worker_count,
            elapsed_us = total_us,
            failures = m.samples_failed,
            cancelled = m.samples_cancelled,
            "scan finished"
        );
        Ok(report)
    }
}
