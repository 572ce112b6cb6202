//! End-to-end saturation tests against the public API

use zenheat::{CpuReport, SaturationConfig, effective_worker_count, saturate};

#[test]
fn capability_probe_is_stable() {
    let first = CpuReport::probe();
    let second = CpuReport::probe();
    assert_eq!(first, second, "probe must be deterministic on an unchanged processor");
}

#[test]
fn core_count_is_plausible() {
    let report = CpuReport::probe();
    if report.logical_cores != 0 {
        let platform = num_cpus::get() as u32;
        assert!(report.logical_cores >= 1);
        assert!(
            report.logical_cores <= platform.max(1) * 8,
            "cpuid reported {} logical cores, platform reports {platform}",
            report.logical_cores
        );
    }
}

#[test]
fn worker_count_resolution_never_yields_zero() {
    assert!(effective_worker_count(0) >= 1);
    assert_eq!(effective_worker_count(3), 3);
}

#[test]
fn full_run_on_probed_core_count() {
    // The full default budget runs for ~1s per core; a small budget
    // exercises the same spawn/join path without the wall-clock cost.
    let workers = effective_worker_count(0);
    let config = SaturationConfig::new().workers(workers).iterations(10_000);
    saturate(&config).expect("saturation run should complete without error");
}

#[test]
fn single_worker_run() {
    let config = SaturationConfig::new().workers(1).iterations(10_000);
    saturate(&config).expect("single-worker run should complete");
}
