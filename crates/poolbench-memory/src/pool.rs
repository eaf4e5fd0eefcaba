//! Byte buffer pool with power-of-two size classes.

use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

/// Smallest size class handed out by the pool.
pub const MIN_CLASS_SIZE: usize = 16;

/// Default largest buffer the pool retains (16 MiB).
pub const DEFAULT_MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Default number of retained buffers per size class.
pub const DEFAULT_MAX_PER_CLASS: usize = 32;

/// Pool of reusable byte buffers, organized by size class (power of 2).
///
/// Buffers handed out are at least as long as requested and are never
/// cleared, so callers must not assume zeroed contents.
pub struct BufferPool {
    pools: Mutex<HashMap<usize, Vec<Vec<u8>>>>,
    max_buffer_size: usize,
    max_per_class: usize,
    stats: AtomicPoolStats,
}

impl BufferPool {
    /// Create a new pool.
    #[must_use]
    pub fn new(max_buffer_size: usize, max_per_class: usize) -> Self {
        Self {
            pools: Mutex::new(HashMap::new()),
            max_buffer_size,
            max_per_class,
            stats: AtomicPoolStats::new(),
        }
    }

    /// Borrow a buffer of at least `min_size` bytes, returned on drop.
    pub fn acquire(&self, min_size: usize) -> PooledBuffer<'_> {
        PooledBuffer {
            buffer: Some(self.rent(min_size)),
            pool: self,
        }
    }

    /// Take a buffer of at least `min_size` bytes out of the pool.
    ///
    /// The caller is responsible for handing it back with [`release`](Self::release).
    pub fn rent(&self, min_size: usize) -> Vec<u8> {
        let Some(class) = self.pooled_class(min_size) else {
            self.stats.record_miss();
            return vec![0; min_size];
        };

        if let Some(buffer) = self.pools.lock().get_mut(&class).and_then(Vec::pop) {
            self.stats.record_hit();
            return buffer;
        }
        self.stats.record_miss();
        vec![0; class]
    }

    /// Return a buffer to the pool.
    ///
    /// Buffers whose length is not a pooled size class, or whose class is
    /// already full, are dropped.
    pub fn release(&self, buffer: Vec<u8>) {
        let len = buffer.len();
        if !self.is_pooled_class(len) {
            tracing::debug!(len, "evicting buffer outside pooled size classes");
            self.stats.record_eviction();
            return;
        }

        let mut pools = self.pools.lock();
        let pool = pools.entry(len).or_default();
        if pool.len() < self.max_per_class {
            pool.push(buffer);
            self.stats.record_return();
        } else {
            drop(pools);
            tracing::debug!(len, "evicting buffer, size class full");
            self.stats.record_eviction();
        }
    }

    /// Compute size class (round up to next power of 2, at least 16 bytes).
    #[must_use]
    pub fn size_class(size: usize) -> usize {
        size.max(MIN_CLASS_SIZE).next_power_of_two()
    }

    /// Size class serving `size`, if that class is small enough to retain.
    fn pooled_class(&self, size: usize) -> Option<usize> {
        size.max(MIN_CLASS_SIZE)
            .checked_next_power_of_two()
            .filter(|&class| class <= self.max_buffer_size)
    }

    fn is_pooled_class(&self, len: usize) -> bool {
        len >= MIN_CLASS_SIZE && len <= self.max_buffer_size && len.is_power_of_two()
    }

    /// Largest buffer size this pool retains.
    #[must_use]
    pub fn max_buffer_size(&self) -> usize {
        self.max_buffer_size
    }

    /// Get total number of pooled buffers.
    #[must_use]
    pub fn total_pooled(&self) -> usize {
        self.pools.lock().values().map(Vec::len).sum()
    }

    /// Get total bytes held by pooled buffers.
    #[must_use]
    pub fn pooled_bytes(&self) -> usize {
        self.pools
            .lock()
            .iter()
            .map(|(class, buffers)| class * buffers.len())
            .sum()
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }

    /// Reset pool statistics counters.
    pub fn reset_stats(&self) {
        self.stats.reset();
    }

    /// Clear all pooled buffers, releasing memory.
    pub fn clear(&self) {
        self.pools.lock().clear();
    }

    /// Pre-populate the size class for `size` with the given number of buffers.
    pub fn warm(&self, size: usize, count: usize) {
        let Some(class) = self.pooled_class(size) else {
            return;
        };
        let mut pools = self.pools.lock();
        let pool = pools.entry(class).or_default();
        let to_add = count
            .saturating_sub(pool.len())
            .min(self.max_per_class.saturating_sub(pool.len()));
        for _ in 0..to_add {
            pool.push(vec![0; class]);
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_BUFFER_SIZE, DEFAULT_MAX_PER_CLASS)
    }
}

/// A buffer borrowed from a [`BufferPool`], handed back when dropped.
pub struct PooledBuffer<'a> {
    buffer: Option<Vec<u8>>,
    pool: &'a BufferPool,
}

impl PooledBuffer<'_> {
    /// Usable length of the buffer, which may exceed the requested size.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buffer.as_ref().map_or(0, Vec::len)
    }
}

impl Deref for PooledBuffer<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or_default()
    }
}

impl DerefMut for PooledBuffer<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.buffer.as_deref_mut().unwrap_or_default()
    }
}

impl Drop for PooledBuffer<'_> {
    fn drop(&mut self) {
        if let Some(buffer) = self.buffer.take() {
            self.pool.release(buffer);
        }
    }
}
