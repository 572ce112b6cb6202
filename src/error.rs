//! Error types for zenheat

/// Error type for saturation runs
///
/// Capability queries never fail; the absence of a CPU feature is normal
/// information, not a fault. The only fatal surface is worker creation.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Creating a worker thread failed
    ///
    /// Propagated immediately: silently running fewer workers than asked
    /// would change the load profile the caller requested.
    #[error("failed to spawn worker {worker}: {source}")]
    Spawn {
        /// Zero-based index of the worker that could not be created
        worker: u32,
        /// Underlying OS error
        #[source]
        source: std::io::Error,
    },

    /// A worker panicked before it could be joined
    #[error("worker {worker} panicked")]
    WorkerPanicked {
        /// Zero-based index of the worker
        worker: u32,
    },
}

/// Result type for zenheat operations
pub type Result<T, E = Error> = core::result::Result<T, E>;
