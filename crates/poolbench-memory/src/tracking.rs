//! Counting global allocator.
//!
//! [`TrackingAllocator`] forwards to an inner allocator and maintains
//! process-wide counters, split into a small and a large tier at
//! [`LARGE_OBJECT_THRESHOLD`]. Install it with `#[global_allocator]` in the
//! final binary; without it every counter stays at zero.
#![allow(unsafe_code)]

use std::alloc::{GlobalAlloc, Layout, System};
use std::sync::atomic::{AtomicU64, Ordering};

/// Allocations of at least this many bytes are counted in the large tier.
pub const LARGE_OBJECT_THRESHOLD: usize = 85_000;

/// Number of size tiers tracked.
pub const TIER_COUNT: usize = 2;

/// Display names of the tiers, in index order.
pub const TIER_NAMES: [&str; TIER_COUNT] = ["small", "large"];

static ALLOCATIONS: [AtomicU64; TIER_COUNT] = [AtomicU64::new(0), AtomicU64::new(0)];
static DEALLOCATIONS: [AtomicU64; TIER_COUNT] = [AtomicU64::new(0), AtomicU64::new(0)];
static BYTES_ALLOCATED: AtomicU64 = AtomicU64::new(0);
static BYTES_FREED: AtomicU64 = AtomicU64::new(0);

/// Tier index for an allocation of `size` bytes.
#[must_use]
pub fn tier_of(size: usize) -> usize {
    usize::from(size >= LARGE_OBJECT_THRESHOLD)
}

/// Point-in-time copy of the allocator counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapStats {
    /// Allocations per tier since process start.
    pub allocations: [u64; TIER_COUNT],
    /// Deallocations per tier since process start.
    pub deallocations: [u64; TIER_COUNT],
    /// Total bytes ever allocated.
    pub bytes_allocated: u64,
    /// Total bytes ever freed.
    pub bytes_freed: u64,
}

impl HeapStats {
    /// Bytes currently live on the heap.
    #[must_use]
    pub fn live_bytes(&self) -> u64 {
        self.bytes_allocated.saturating_sub(self.bytes_freed)
    }
}

/// Read the current allocator counters.
#[must_use]
pub fn heap_stats() -> HeapStats {
    let load = |counters: &[AtomicU64; TIER_COUNT]| {
        [
            counters[0].load(Ordering::Relaxed),
            counters[1].load(Ordering::Relaxed),
        ]
    };
    // Freed is read first so live bytes never underflow against a racing free.
    let bytes_freed = BYTES_FREED.load(Ordering::Relaxed);
    HeapStats {
        deallocations: load(&DEALLOCATIONS),
        allocations: load(&ALLOCATIONS),
        bytes_allocated: BYTES_ALLOCATED.load(Ordering::Relaxed),
        bytes_freed,
    }
}

/// Global allocator wrapper that counts every allocation and deallocation.
pub struct TrackingAllocator<A = System> {
    inner: A,
}

impl TrackingAllocator<System> {
    /// Wrap the system allocator.
    #[must_use]
    pub const fn system() -> Self {
        Self { inner: System }
    }
}

impl<A> TrackingAllocator<A> {
    /// Wrap an arbitrary allocator.
    pub const fn new(inner: A) -> Self {
        Self { inner }
    }
}

fn record_alloc(size: usize) {
    ALLOCATIONS[tier_of(size)].fetch_add(1, Ordering::Relaxed);
    BYTES_ALLOCATED.fetch_add(size as u64, Ordering::Relaxed);
}

fn record_dealloc(size: usize) {
    DEALLOCATIONS[tier_of(size)].fetch_add(1, Ordering::Relaxed);
    BYTES_FREED.fetch_add(size as u64, Ordering::Relaxed);
}

// SAFETY: every call is forwarded unchanged to `inner`; the counters are
// atomics and never allocate.
unsafe impl<A: GlobalAlloc> GlobalAlloc for TrackingAllocator<A> {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn alloc_zeroed(&self, layout: Layout) -> *mut u8 {
        let ptr = unsafe { self.inner.alloc_zeroed(layout) };
        if !ptr.is_null() {
            record_alloc(layout.size());
        }
        ptr
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { self.inner.dealloc(ptr, layout) };
        record_dealloc(layout.size());
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let new_ptr = unsafe { self.inner.realloc(ptr, layout, new_size) };
        if !new_ptr.is_null() {
            record_dealloc(layout.size());
            record_alloc(new_size);
        }
        new_ptr
    }
}
