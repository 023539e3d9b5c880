//! ITS3 resolution scan example.
//!
//! Demonstrates: ITS3 preset with TPC and TRD → Solver → scan over pt →
//! print tracker-only vs combined momentum resolution → write the
//! combined report to stdout.

use fastrack_core::ResolutionQuantity;
use fastrack_engine::{EngineConfig, ReportMode, ScanGrid, Solver};
use fastrack_geometry::Its3Config;

fn main() {
    tracing_subscriber::fmt::init();

    println!("=== fastrack ITS3 scan ===\n");

    let its3 = Its3Config {
        add_tpc: true,
        add_trd: true,
        ..Its3Config::default()
    };
    let geometry = its3.build().unwrap();
    println!("{geometry}");

    let solver = Solver::new(geometry, EngineConfig::default()).unwrap();
    let report = solver.solve(&ScanGrid::default()).unwrap();

    let tracker = report.curve(ReportMode::TrackerOnly, ResolutionQuantity::PtRelative);
    let combined = report.curve(ReportMode::Combined, ResolutionQuantity::PtRelative);
    let efficiency = report.efficiency_curve(ReportMode::TrackerOnly);

    println!(
        "{:>10} {:>14} {:>14} {:>10}",
        "pt", "its3", "its3+tpc+trd", "eff"
    );
    for ((t, c), e) in tracker.iter().zip(&combined).zip(&efficiency) {
        println!(
            "{:>10.4} {:>14.5e} {:>14.5e} {:>10.4}",
            t.pt, t.value, c.value, e.value
        );
    }

    for failure in report.failures(ReportMode::TrackerOnly) {
        tracing::warn!(%failure, "excluded from curves");
    }

    let m = report.metrics();
    println!(
        "\n{} samples, {} patterns, {} workers, {:.1} ms\n",
        m.samples_evaluated,
        m.patterns_evaluated,
        m.worker_count,
        m.total_us as f64 / 1000.0
    );

    fastrack_report::report(&report, ReportMode::Combined, std::io::stdout().lock()).unwrap();
}
