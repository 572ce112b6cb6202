//! CPU heater driver: probe capabilities, then saturate every logical core.
//!
//! A bare run does a single saturation pass. `--minutes N` repeats passes
//! until N minutes of wall-clock time have elapsed. `--require-vector`
//! refuses to run on processors without the wide-vector extension.

use std::process::exit;
use std::time::{Duration, Instant};

use zenheat::{CpuReport, SaturationConfig, saturate};

#[derive(Debug, Clone, PartialEq, Eq)]
struct Cli {
    minutes: u64,
    workers: u32,
    iterations: Option<u64>,
    require_vector: bool,
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            minutes: 0,
            workers: 0,
            iterations: None,
            require_vector: false,
        }
    }
}

/// Parse driver arguments; `None` means unusable input
fn parse_args(args: impl Iterator<Item = String>) -> Option<Cli> {
    let mut cli = Cli::default();
    let mut args = args;
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--require-vector" => cli.require_vector = true,
            "--minutes" => cli.minutes = args.next()?.parse().ok()?,
            "--workers" => cli.workers = args.next()?.parse().ok()?,
            "--iterations" => cli.iterations = Some(args.next()?.parse().ok()?),
            _ => return None,
        }
    }
    Some(cli)
}

/// Wall-clock budget for the pass loop; absurd minute counts saturate
/// instead of overflowing the seconds multiply.
fn run_budget(minutes: u64) -> Duration {
    Duration::from_secs(minutes.saturating_mul(60))
}

fn usage() -> ! {
    eprintln!("usage: zenheat [--minutes N] [--workers N] [--iterations N] [--require-vector]");
    exit(2);
}

fn main() {
    env_logger::init();

    let cli = parse_args(std::env::args().skip(1)).unwrap_or_else(|| usage());

    let report = CpuReport::probe();
    if report.has_wide_vector {
        println!("The CPU has wide-vector (AVX2) instructions");
    } else {
        println!("The CPU doesn't have wide-vector (AVX2) instructions; using the scalar path");
    }
    println!("Logical cores (CPUID): {}", report.logical_cores);

    if cli.require_vector && !report.has_wide_vector {
        eprintln!("zenheat: --require-vector given but the wide-vector extension is absent");
        exit(1);
    }

    let mut config = SaturationConfig::new().workers(cli.workers);
    if let Some(iterations) = cli.iterations {
        config = config.iterations(iterations);
    }

    let result = if cli.minutes == 0 {
        saturate(&config)
    } else {
        let budget = run_budget(cli.minutes);
        let start = Instant::now();
        let mut result = Ok(());
        while start.elapsed() < budget {
            result = saturate(&config);
            if result.is_err() {
                break;
            }
        }
        result
    };

    if let Err(err) = result {
        eprintln!("zenheat: {err}");
        exit(1);
    }
}
