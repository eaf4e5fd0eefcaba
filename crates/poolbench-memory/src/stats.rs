//! Atomic pool statistics for lock-free usage tracking.

use std::sync::atomic::{AtomicU64, Ordering};

/// Statistics for buffer pool usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PoolStats {
    /// Number of cache hits (served from a pooled buffer).
    pub hits: u64,
    /// Number of cache misses (freshly allocated).
    pub misses: u64,
    /// Number of returned buffers that were dropped instead of pooled.
    pub evictions: u64,
    /// Number of buffers handed out.
    pub rented: u64,
    /// Number of buffers handed back, including ones never rented out.
    pub returned: u64,
    /// Rented buffers not yet handed back.
    pub in_use: u64,
}

impl PoolStats {
    /// Buffers currently held by callers.
    #[must_use]
    pub fn outstanding(&self) -> u64 {
        self.in_use
    }
}

/// Atomic pool statistics for lock-free updates.
pub struct AtomicPoolStats {
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
    rented: AtomicU64,
    returned: AtomicU64,
    in_use: AtomicU64,
}

impl AtomicPoolStats {
    /// Create new zeroed stats.
    pub fn new() -> Self {
        Self {
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
            rented: AtomicU64::new(0),
            returned: AtomicU64::new(0),
            in_use: AtomicU64::new(0),
        }
    }

    /// Take a snapshot of current stats.
    pub fn snapshot(&self) -> PoolStats {
        PoolStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            evictions: self.evictions.load(Ordering::Relaxed),
            rented: self.rented.load(Ordering::Relaxed),
            returned: self.returned.load(Ordering::Relaxed),
            in_use: self.in_use.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters. The in-use gauge tracks live buffers and is kept.
    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
        self.evictions.store(0, Ordering::Relaxed);
        self.rented.store(0, Ordering::Relaxed);
        self.returned.store(0, Ordering::Relaxed);
    }

    /// Record a rent served from the pool.
    pub fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
        self.rented.fetch_add(1, Ordering::Relaxed);
        self.in_use.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rent that had to allocate.
    pub fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
        self.rented.fetch_add(1, Ordering::Relaxed);
        self.in_use.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a buffer handed back and kept.
    pub fn record_return(&self) {
        self.returned.fetch_add(1, Ordering::Relaxed);
        self.release_in_use();
    }

    /// Record a buffer handed back and dropped.
    pub fn record_eviction(&self) {
        self.evictions.fetch_add(1, Ordering::Relaxed);
        self.returned.fetch_add(1, Ordering::Relaxed);
        self.release_in_use();
    }

    /// Buffers the pool never handed out leave the gauge at zero.
    fn release_in_use(&self) {
        let _ = self
            .in_use
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }
}

impl Default for AtomicPoolStats {
    fn default() -> Self {
        Self::new()
    }
}
