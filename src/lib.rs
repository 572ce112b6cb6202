//! # zenheat
//!
//! CPU capability probing and wide-vector load generation.
//!
//! This crate does two things: it reads the running processor's wide-vector
//! (AVX2) support flag and advertised logical core count directly via CPUID,
//! and it saturates the machine by spawning one worker thread per logical
//! core, each running a fixed-budget 32-lane vector-addition hot loop.
//!
//! ## Quick Start
//!
//! ```no_run
//! use zenheat::{CpuReport, SaturationConfig, saturate};
//!
//! let report = CpuReport::probe();
//! println!(
//!     "wide-vector: {}, logical cores: {}",
//!     report.has_wide_vector, report.logical_cores
//! );
//!
//! // One worker per logical core, default iteration budget.
//! saturate(&SaturationConfig::new()).unwrap();
//! ```
//!
//! ## Notes
//!
//! The hot loop dispatches to AVX2 at runtime when the extension is present
//! and falls back to a scalar rendition otherwise, so `saturate` works on
//! any machine — it just generates less heat per worker without the vector
//! path. The per-worker iteration budget is tunable via
//! [`SaturationConfig::iterations`]; the default approximates one second of
//! work per worker on the reference hardware.

mod config;
mod cpu;
mod error;
mod heat;

pub use config::{DEFAULT_ITERATIONS, SaturationConfig};
pub use cpu::{CpuReport, effective_worker_count, logical_core_count, wide_vector_supported};
pub use error::{Error, Result};
pub use heat::{LANES, hot_loop, hot_loop_scalar, saturate};

/// Run one saturation pass with default settings
///
/// Equivalent to `saturate(&SaturationConfig::new())`: one worker per
/// logical core, default iteration budget, blocks until every worker has
/// completed.
pub fn saturate_auto() -> Result<()> {
    saturate(&SaturationConfig::new())
}
