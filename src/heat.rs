//! Vectorized load generation
//!
//! Each worker runs a fixed-budget hot loop: a 32-lane 8-bit accumulator
//! receives ten unrolled additions of an all-ones vector per outer
//! iteration. Lanes wrap modulo 256 independently (no cross-lane carry);
//! the wraparound is intentional. The final lanes are returned so an
//! optimizing compiler cannot discard the loop as dead code.
//!
//! The AVX2 path uses archmage tokens for runtime CPU feature detection,
//! with a scalar fallback when the wide-vector extension is absent.

use std::thread;

use crate::config::SaturationConfig;
use crate::cpu;
use crate::error::{Error, Result};

#[cfg(target_arch = "x86_64")]
use archmage::{Desktop64, SimdToken, arcane};

#[cfg(target_arch = "x86_64")]
use core::arch::x86_64::*;

#[cfg(target_arch = "wasm32")]
use archmage::{SimdToken, Wasm128Token, arcane};

#[cfg(target_arch = "wasm32")]
use core::arch::wasm32::*;

/// Number of independent 8-bit lanes in the accumulator
pub const LANES: usize = 32;

/// Additions of the all-ones vector per outer iteration
const UNROLL: u64 = 10;

/// AVX2 hot loop: ten unrolled 32-lane byte additions per outer iteration
///
/// # Arguments
/// * `token` - Proof that AVX2+FMA are available
/// * `iterations` - Outer-iteration budget
///
/// Returns the final accumulator lanes.
#[cfg(target_arch = "x86_64")]
#[arcane]
pub fn hot_loop_avx2(_token: Desktop64, iterations: u64) -> [u8; LANES] {
    let ones = _mm256_set1_epi8(1);
    let mut acc = _mm256_setzero_si256();

    for _ in 0..iterations {
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
        acc = _mm256_add_epi8(acc, ones);
    }

    bytemuck::cast(acc)
}

/// wasm128 hot loop — two 16-lane accumulators cover the 32 lanes
#[cfg(target_arch = "wasm32")]
#[arcane]
pub fn hot_loop_wasm128(_token: Wasm128Token, iterations: u64) -> [u8; LANES] {
    let ones = u8x16_splat(1);
    let mut lo = u8x16_splat(0);
    let mut hi = u8x16_splat(0);

    for _ in 0..iterations {
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
        lo = i8x16_add(lo, ones);
        hi = i8x16_add(hi, ones);
    }

    let mut out = [0u8; LANES];
    out[0..8].copy_from_slice(&i64x2_extract_lane::<0>(lo).to_ne_bytes());
    out[8..16].copy_from_slice(&i64x2_extract_lane::<1>(lo).to_ne_bytes());
    out[16..24].copy_from_slice(&i64x2_extract_lane::<0>(hi).to_ne_bytes());
    out[24..32].copy_from_slice(&i64x2_extract_lane::<1>(hi).to_ne_bytes());
    out
}

/// Scalar fallback hot loop (for testing and non-AVX2 systems)
pub fn hot_loop_scalar(iterations: u64) -> [u8; LANES] {
    let mut acc = [0u8; LANES];

    for _ in 0..iterations {
        for _ in 0..UNROLL {
            for lane in acc.iter_mut() {
                *lane = lane.wrapping_add(1);
            }
        }
    }

    acc
}

/// Runtime-dispatched hot loop
///
/// Automatically selects the AVX2, wasm128, or scalar implementation based
/// on CPU features.
pub fn hot_loop(iterations: u64) -> [u8; LANES] {
    #[cfg(target_arch = "x86_64")]
    if let Some(token) = Desktop64::summon() {
        return hot_loop_avx2(token, iterations);
    }

    #[cfg(target_arch = "wasm32")]
    if let Some(token) = Wasm128Token::summon() {
        return hot_loop_wasm128(token, iterations);
    }

    hot_loop_scalar(iterations)
}

/// Spawn `workers` threads running the hot loop and join them all
///
/// Returns one byte per worker (lane 0 of its final accumulator). Spawn
/// failure aborts the run immediately rather than proceeding with fewer
/// workers than asked.
pub(crate) fn run_workers(workers: u32, iterations: u64) -> Result<Vec<u8>> {
    let mut handles = Vec::with_capacity(workers as usize);
    for i in 0..workers {
        let handle = thread::Builder::new()
            .name(format!("zenheat-worker-{i}"))
            .spawn(move || hot_loop(iterations)[0])
            .map_err(|source| Error::Spawn { worker: i, source })?;
        handles.push(handle);
    }

    let mut results = Vec::with_capacity(handles.len());
    for (i, handle) in handles.into_iter().enumerate() {
        let byte = handle.join().map_err(|_| Error::WorkerPanicked {
            worker: i as u32,
        })?;
        results.push(byte);
    }

    Ok(results)
}

/// Run a saturation pass: one hot loop per worker, join all, return
///
/// Blocks until every worker has completed. Workers share no state; the
/// only side effect is CPU consumption on `workers` execution units for
/// the duration of the loop. The per-worker result bytes are discarded.
pub fn saturate(config: &SaturationConfig) -> Result<()> {
    let workers = cpu::effective_worker_count(config.workers);
    log::info!(
        "saturating {workers} workers, {} iterations each",
        config.iterations
    );
    let results = run_workers(workers, config.iterations)?;
    log::debug!("all {} workers joined", results.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Expected lane value after `iterations` outer iterations
    fn expected_lane(iterations: u64) -> u8 {
        ((iterations * UNROLL) % 256) as u8
    }

    #[test]
    fn dispatch_matches_scalar() {
        for iterations in [0, 1, 7, 25, 26, 100, 1000] {
            assert_eq!(
                hot_loop(iterations),
                hot_loop_scalar(iterations),
                "mismatch at {iterations} iterations"
            );
        }
    }

    #[test]
    fn lanes_wrap_independently() {
        // 25 iterations = 250 additions (no wrap yet); 26 = 260 (wrapped).
        for iterations in [0, 1, 25, 26, 52, 1000] {
            let lanes = hot_loop(iterations);
            let want = expected_lane(iterations);
            for (i, &lane) in lanes.iter().enumerate() {
                assert_eq!(
                    lane, want,
                    "lane {i} diverged after {iterations} iterations"
                );
            }
        }
    }

    #[test]
    fn scalar_lanes_wrap_independently() {
        let lanes = hot_loop_scalar(26);
        assert_eq!(lanes, [4u8; LANES], "260 additions must wrap to 4");
    }

    #[test]
    fn worker_count_is_exact() {
        for n in [1u32, 2, 8] {
            let results = run_workers(n, 100).unwrap();
            // One joined result per worker proves every worker ran to
            // completion before run_workers returned.
            assert_eq!(results.len(), n as usize);
        }
    }

    #[test]
    fn workers_are_independent() {
        let solo = run_workers(1, 123).unwrap();
        let crowd = run_workers(8, 123).unwrap();
        for &byte in solo.iter().chain(crowd.iter()) {
            assert_eq!(byte, expected_lane(123));
        }
    }

    #[test]
    fn saturate_returns_after_completion() {
        let config = SaturationConfig::new().workers(2).iterations(500);
        saturate(&config).unwrap();
    }
}
