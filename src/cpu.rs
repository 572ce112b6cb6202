//! CPU capability probing
//!
//! Direct CPUID reads on x86_64: the wide-vector (AVX2) feature bit from
//! leaf 7 and the logical processor count field from leaf 1. Every call
//! re-issues the query; nothing is cached.

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::{__cpuid, __cpuid_count};

/// Capability flags read from the running processor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CpuReport {
    /// Whether the wide-vector (AVX2) instruction extension is present
    pub has_wide_vector: bool,
    /// Logical core count as advertised by CPUID leaf 1 (0 = unknown)
    pub logical_cores: u32,
}

impl CpuReport {
    /// Probe the running processor
    pub fn probe() -> Self {
        Self {
            has_wide_vector: wide_vector_supported(),
            logical_cores: logical_core_count(),
        }
    }
}

/// Check whether the processor supports the wide-vector (AVX2) extension
///
/// Issues CPUID with the extended-features selector (leaf 7, subleaf 0)
/// and inspects EBX bit 5. Never fails: a missing feature reports `false`,
/// as does any non-x86_64 target.
pub fn wide_vector_supported() -> bool {
    #[cfg(target_arch = "x86_64")]
    {
        // Leaf 7 is only defined when the basic leaf range reaches it.
        let max_leaf = unsafe { __cpuid(0) }.eax;
        if max_leaf < 7 {
            return false;
        }
        let ebx = unsafe { __cpuid_count(7, 0) }.ebx;
        log::debug!("cpuid leaf 7 ebx={ebx:#010x}");
        (ebx >> 5) & 1 == 1
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        false
    }
}

/// Read the logical core count advertised by the processor
///
/// Issues CPUID with the basic-feature selector (leaf 1) and extracts
/// EBX[23:16], the maximum number of addressable logical processors.
/// Returns 0 for "unknown"; callers are expected to substitute a
/// platform-reported count in that case (see [`effective_worker_count`]).
pub fn logical_core_count() -> u32 {
    #[cfg(target_arch = "x86_64")]
    {
        let ebx = unsafe { __cpuid(1) }.ebx;
        log::debug!("cpuid leaf 1 ebx={ebx:#010x}");
        (ebx >> 16) & 0xff
    }

    #[cfg(not(target_arch = "x86_64"))]
    {
        0
    }
}

/// CPUID leaf-1 counts beyond this multiple of the platform count are
/// treated as unusable (the field reports addressable IDs, not cores)
const PLAUSIBILITY_FACTOR: u32 = 8;

/// Resolve a requested worker count to a usable one
///
/// A request of 0 means "one worker per logical core": the CPUID count is
/// used when it is non-zero and plausible against the platform-reported
/// count, otherwise the platform count itself. Always returns at least 1.
pub fn effective_worker_count(requested: u32) -> u32 {
    let platform = (num_cpus::get() as u32).max(1);
    resolve_worker_count(requested, logical_core_count(), platform)
}

fn resolve_worker_count(requested: u32, probed: u32, platform: u32) -> u32 {
    if requested != 0 {
        return requested;
    }
    if probed == 0 || probed > platform.saturating_mul(PLAUSIBILITY_FACTOR) {
        log::debug!(
            "cpuid core count {probed} unusable, falling back to platform count {platform}"
        );
        return platform.max(1);
    }
    probed
}
