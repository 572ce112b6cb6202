//! Saturation run configuration

/// Configuration for a saturation run
#[derive(Debug, Clone)]
pub struct SaturationConfig {
    /// Number of worker threads (0 = one per logical core)
    pub(crate) workers: u32,
    /// Outer hot-loop iterations per worker
    pub(crate) iterations: u64,
}

/// Default per-worker outer-iteration budget
///
/// Tuned empirically to roughly one second of wall-clock work per worker
/// on the reference hardware. Only the order of magnitude matters; use
/// [`SaturationConfig::iterations`] to retune for other machines.
pub const DEFAULT_ITERATIONS: u64 = 82_000_000_002;

impl Default for SaturationConfig {
    fn default() -> Self {
        Self {
            workers: 0,
            iterations: DEFAULT_ITERATIONS,
        }
    }
}

impl SaturationConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of worker threads
    ///
    /// 0 means automatic (one worker per logical core, probed via CPUID
    /// with a platform fallback).
    pub fn workers(mut self, workers: u32) -> Self {
        self.workers = workers;
        self
    }

    /// Set the per-worker outer-iteration budget
    ///
    /// Each outer iteration performs ten 32-lane vector additions.
    pub fn iterations(mut self, iterations: u64) -> Self {
        self.iterations = iterations;
        self
    }
}
