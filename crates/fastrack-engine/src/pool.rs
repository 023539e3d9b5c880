//! Sample-evaluation worker loop.
//!
//! Each worker receives [`ScanPoint`]s over a bounded crossbeam channel,
//! evaluates them against the shared read-only [`Solver`], and sends a
//! [`WorkerReply`] back over the single collector channel. Workers never
//! touch the result sink.

use crossbeam_channel::{Receiver, Sender};

use fastrack_core::{ConfigError, SampleIndex};

use crate::grid::ScanPoint;
use crate::metrics::SampleMetrics;
use crate::result::ScanEntry;
use crate::solver::Solver;

/// What a worker reports for one scan point.
#[derive(Debug)]
pub(crate) enum WorkerReply {
    /// Evaluation completed before any cancellation.
    Done {
        entry: ScanEntry,
        metrics: SampleMetrics,
    },
    /// The point was skipped or its result discarded.
    Cancelled(SampleIndex),
    /// The point exposed a configuration problem; the scan must abort.
    Failed(ConfigError),
}

/// Main loop of a worker thread. Runs until the task channel closes.
///
/// `stopped` is polled before each point and again after evaluating it,
/// so a result computed across a cancellation is reported as cancelled.
pub(crate) fn worker_loop<F>(
    solver: &Solver,
    tasks: Receiver<ScanPoint>,
    replies: Sender<WorkerReply>,
    stopped: F,
) where
    F: Fn() -> bool,
{
    for point in tasks.iter() {
        let reply = if stopped() {
            WorkerReply::Cancelled(point.index)
        } else {
            match solver.evaluate_point(point) {
                Ok(_) if stopped() => WorkerReply::Cancelled(point.index),
                Ok((entry, metrics)) => WorkerReply::Done { entry, metrics },
                Err(e) => WorkerReply::Failed(e),
            }
        };
        if replies.send(reply).is_err() {
            break;
        }
    }
}
