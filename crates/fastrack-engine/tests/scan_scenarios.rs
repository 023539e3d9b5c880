//! End-to-end scans over the fixture geometries.

use std::thread;
use std::time::Duration;

use proptest::prelude::*;

use fastrack_core::{FitError, GlobalCuts, ResolutionQuantity, SampleIndex};
use fastrack_engine::{
    CancelToken, EngineConfig, PtAxis, ReportMode, SampleFailure, ScanGrid, Solver, Spacing,
    WorkerConfig,
};
use fastrack_test_utils::fixtures::{
    all_killed_geometry, assert_not_smaller, its3_with_auxiliary, three_layer_geometry,
    SCENARIO_EFFICIENCY,
};

fn three_hit_cuts() -> EngineConfig {
    EngineConfig {
        cuts: GlobalCuts {
            min_hits: 3,
            min_correlated_hits: 3,
            max_fake_hits: 0,
        },
        ..EngineConfig::default()
    }
}

fn with_workers(config: EngineConfig, n: usize) -> EngineConfig {
    EngineConfig {
        workers: WorkerConfig {
            worker_count: Some(n),
        },
        ..config
    }
}

fn log_grid(bins: usize) -> ScanGrid {
    ScanGrid {
        pt: PtAxis {
            min: 0.1,
            max: 10.0,
            bins,
            spacing: Spacing::Log,
        },
        rapidities: vec![0.0, 0.8],
    }
}

// ── Three-layer scenario ───────────────────────────────────────────

#[test]
fn three_layers_give_finite_resolution_at_1_gev() {
    let solver = Solver::new(three_layer_geometry(), three_hit_cuts()).unwrap();
    let report = solver.solve(&ScanGrid::point(1.0, 0.5)).unwrap();
    assert_eq!(report.entries().len(), 1);

    let result = report.results(ReportMode::TrackerOnly).next().unwrap();
    let sigma_pt = result.nominal.get(ResolutionQuantity::PtRelative);
    assert!(sigma_pt.is_finite() && sigma_pt > 0.0);

    let all_hit = SCENARIO_EFFICIENCY.powi(3);
    assert!((result.reconstruction_probability - all_hit).abs() < 1e-12);
    assert!((result.good_probability - all_hit).abs() < 1e-12);
    assert_eq!(result.fake_probability, 0.0);
    assert!(result.expected.is_some());
}

#[test]
fn too_few_layers_for_the_cuts_never_reconstruct() {
    let solver = Solver::new(three_layer_geometry(), EngineConfig::default()).unwrap();
    let entry = solver.evaluate(1.0, 0.5).unwrap();
    let result = entry.tracker.unwrap();
    assert_eq!(result.reconstruction_probability, 0.0);
    assert_eq!(result.good_probability, 0.0);
    assert!(result.expected.is_none());
    // The nominal fit itself does not depend on the cuts.
    assert!(result.nominal.get(ResolutionQuantity::DRphi).is_finite());
}

#[test]
fn killed_layers_fail_each_sample_and_scan_continues() {
    let solver = Solver::new(all_killed_geometry(), three_hit_cuts()).unwrap();
    let report = solver.solve(&log_grid(4)).unwrap();
    assert_eq!(report.entries().len(), 8);
    assert_eq!(report.results(ReportMode::TrackerOnly).count(), 0);
    assert_eq!(report.metrics().samples_failed, 8);
    for failure in report.failures(ReportMode::TrackerOnly) {
        assert_eq!(failure.error, FitError::Unconstrained { measurements: 0 });
    }
    assert!(report
        .curve(ReportMode::TrackerOnly, ResolutionQuantity::PtRelative)
        .is_empty());
}

#[test]
fn curling_track_fails_while_stiff_track_succeeds() {
    let solver = Solver::new(three_layer_geometry(), three_hit_cuts()).unwrap();
    let grid = ScanGrid {
        pt: PtAxis {
            min: 0.001,
            max: 1.0,
            bins: 2,
            spacing: Spacing::Linear,
        },
        rapidities: vec![0.0],
    };
    let report = solver.solve(&grid).unwrap();
    let entries = report.entries();
    assert_eq!(entries.len(), 2);
    assert!(matches!(
        entries[0].tracker,
        Err(SampleFailure {
            error: FitError::Unconstrained { .. },
            ..
        })
    ));
    assert!(entries[1].tracker.is_ok());
    let curve = report.curve(ReportMode::TrackerOnly, ResolutionQuantity::DRphi);
    assert_eq!(curve.len(), 1);
    assert_eq!(curve[0].pt, 1.0);
}

// ── Determinism ────────────────────────────────────────────────────

#[test]
fn repeated_scans_are_identical() {
    let grid = log_grid(6);
    let a = Solver::new(three_layer_geometry(), with_workers(three_hit_cuts(), 1))
        .unwrap()
        .solve(&grid)
        .unwrap();
    let b = Solver::new(three_layer_geometry(), with_workers(three_hit_cuts(), 4))
        .unwrap()
        .solve(&grid)
        .unwrap();
    assert_eq!(a.entries(), b.entries());
    assert_eq!(a.metrics().patterns_evaluated, b.metrics().patterns_evaluated);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(12))]

    #[test]
    fn scan_matches_serial_evaluation(bins in 1usize..6, workers in 1usize..5) {
        let solver = Solver::new(three_layer_geometry(), with_workers(three_hit_cuts(), workers))
            .unwrap();
        let grid = log_grid(bins);
        let report = solver.solve(&grid).unwrap();
        let points = grid.points(&solver.config().particle).unwrap();
        prop_assert_eq!(report.entries().len(), points.len());
        for (entry, point) in report.entries().iter().zip(&points) {
            prop_assert_eq!(entry.index, point.index);
            let serial = solver.evaluate(point.sample.pt, point.sample.rapidity).unwrap();
            let (got, want) = (entry.tracker.as_ref().unwrap(), serial.tracker.as_ref().unwrap());
            prop_assert_eq!(got.nominal, want.nominal);
            prop_assert_eq!(got.reconstruction_probability, want.reconstruction_probability);
        }
    }
}

// ── Cancellation ───────────────────────────────────────────────────

#[test]
fn cancelled_before_start_yields_nothing() {
    let solver = Solver::new(three_layer_geometry(), three_hit_cuts()).unwrap();
    let cancel = CancelToken::new();
    cancel.cancel();
    let report = solver.solve_with(&log_grid(5), &cancel).unwrap();
    assert!(report.entries().is_empty());
    assert_eq!(report.cancelled().len(), 10);
    assert_eq!(report.metrics().samples_cancelled, 10);
    assert!(!report.is_complete());
}

#[test]
fn cancellation_mid_scan_keeps_only_complete_entries() {
    let geometry = its3_with_auxiliary();
    let config = with_workers(EngineConfig::default(), 2);
    let grid = ScanGrid {
        pt: PtAxis {
            min: 0.1,
            max: 10.0,
            bins: 60,
            spacing: Spacing::Log,
        },
        rapidities: vec![0.0, 0.5, 1.0],
    };
    let full = Solver::new(geometry.clone(), config.clone())
        .unwrap()
        .solve(&grid)
        .unwrap();

    let solver = Solver::new(geometry, config).unwrap();
    let cancel = CancelToken::new();
    let report = thread::scope(|scope| {
        let trigger = cancel.clone();
        scope.spawn(move || {
            thread::sleep(Duration::from_millis(5));
            trigger.cancel();
        });
        solver.solve_with(&grid, &cancel).unwrap()
    });

    assert_eq!(report.entries().len() + report.cancelled().len(), 180);
    for entry in report.entries() {
        assert_eq!(entry, &full.entries()[entry.index.0 as usize]);
        assert!(entry.combined.is_some());
    }
    for index in report.cancelled() {
        assert!(report.entries().iter().all(|e| e.index != *index));
    }
}

// ── Auxiliary detectors ────────────────────────────────────────────

#[test]
fn auxiliary_detectors_improve_momentum_resolution() {
    let solver = Solver::new(its3_with_auxiliary(), EngineConfig::default()).unwrap();
    let report = solver.solve(&log_grid(5)).unwrap();
    assert!(report.has_combined());

    let tracker = report.curve(ReportMode::TrackerOnly, ResolutionQuantity::PtRelative);
    let combined = report.curve(ReportMode::Combined, ResolutionQuantity::PtRelative);
    assert_eq!(tracker.len(), 10);
    assert_eq!(combined.len(), 10);
    for (t, c) in tracker.iter().zip(&combined) {
        assert_eq!((t.pt, t.rapidity), (c.pt, c.rapidity));
        assert_not_smaller(t.value, c.value, 1e-9, "tracker-only vs combined sigma(pt)/pt");
    }
    let at_1gev = tracker
        .iter()
        .zip(&combined)
        .find(|(t, _)| (t.pt - 1.0).abs() < 1e-9)
        .unwrap();
    assert!(at_1gev.1.value < at_1gev.0.value);
}

#[test]
fn tracker_only_scan_has_no_combined_curves() {
    let solver = Solver::new(three_layer_geometry(), three_hit_cuts()).unwrap();
    let report = solver.solve(&log_grid(2)).unwrap();
    assert!(!report.has_combined());
    assert!(report
        .efficiency_curve(ReportMode::Combined)
        .is_empty());
    assert_eq!(report.entries()[0].index, SampleIndex(0));
}
