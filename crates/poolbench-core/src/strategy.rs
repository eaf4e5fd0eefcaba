//! The two allocation strategies under comparison.
//!
//! Both loops write the low byte of the iteration index at offset 0 and the
//! next byte at offset `size / 2`, then add the two bytes read back into a
//! running total. Equal inputs must give equal totals.

use std::hint::black_box;

use serde::Serialize;

use poolbench_memory::BufferPool;

/// How each iteration obtains its buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Fresh zeroed allocation every iteration.
    Unpooled,
    /// Scoped rent from a [`BufferPool`].
    Pooled,
}

impl Strategy {
    /// Short name used in reports.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Unpooled => "unpooled",
            Self::Pooled => "pooled",
        }
    }
}

/// Bytes written for iteration `i`: bits 0-7 and bits 8-15.
#[inline]
#[allow(clippy::cast_possible_truncation)]
fn sample_bytes(i: usize) -> (u8, u8) {
    (i as u8, (i >> 8) as u8)
}

#[inline]
fn touch(buffer: &mut [u8], half: usize, i: usize) -> u64 {
    let (low, high) = sample_bytes(i);
    buffer[0] = low;
    buffer[half] = high;
    u64::from(buffer[0]) + u64::from(buffer[half])
}

/// Allocate a fresh zeroed buffer of `size` bytes per iteration.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn unpooled_loop(size: usize, iterations: usize) -> u64 {
    assert!(size > 0, "buffer size must be non-zero");
    let half = size / 2;
    let mut total = 0u64;
    for i in 0..iterations {
        let mut buffer = vec![0u8; size];
        total += touch(&mut buffer, half, i);
        black_box(&mut buffer);
    }
    total
}

/// Rent a buffer of at least `size` bytes from `pool` per iteration.
///
/// The buffer goes back to the pool at the end of each iteration, also when
/// the body panics.
///
/// # Panics
///
/// Panics if `size` is zero.
pub fn pooled_loop(pool: &BufferPool, size: usize, iterations: usize) -> u64 {
    assert!(size > 0, "buffer size must be non-zero");
    let half = size / 2;
    let mut total = 0u64;
    for i in 0..iterations {
        let mut buffer = pool.acquire(size);
        total += touch(&mut buffer, half, i);
        black_box(&mut *buffer);
    }
    total
}

/// Checksum either loop must produce, computed without allocating.
#[must_use]
pub fn expected_checksum(size: usize, iterations: usize) -> u64 {
    (0..iterations)
        .map(|i| {
            let (low, high) = sample_bytes(i);
            if size / 2 == 0 {
                // Both writes hit offset 0; the high byte is read twice.
                2 * u64::from(high)
            } else {
                u64::from(low) + u64::from(high)
            }
        })
        .sum()
}

/// Run `strategy` for `iterations` at `size`.
pub fn run_strategy(strategy: Strategy, pool: &BufferPool, size: usize, iterations: usize) -> u64 {
    match strategy {
        Strategy::Unpooled => unpooled_loop(size, iterations),
        Strategy::Pooled => pooled_loop(pool, size, iterations),
    }
}
