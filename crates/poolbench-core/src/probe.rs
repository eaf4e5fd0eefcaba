//! Collector-equivalent statistics and the forced-collection hook.

use serde::Serialize;

use poolbench_memory::tracking::{heap_stats, TIER_COUNT, TIER_NAMES};

/// Reclamation counters per tier, captured at one instant.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CollectorSnapshot {
    /// Counter per tier, in [`TIER_NAMES`] order.
    pub tiers: [u64; TIER_COUNT],
}

impl CollectorSnapshot {
    /// Create a snapshot from raw counters.
    #[must_use]
    pub fn new(tiers: [u64; TIER_COUNT]) -> Self {
        Self { tiers }
    }

    /// Per-tier `end - self`, saturating at zero.
    #[must_use]
    pub fn delta(&self, end: &Self) -> Self {
        let mut tiers = [0; TIER_COUNT];
        for (out, (start, end)) in tiers.iter_mut().zip(self.tiers.iter().zip(end.tiers)) {
            *out = end.saturating_sub(*start);
        }
        Self { tiers }
    }

    /// Tier names paired with their counters.
    pub fn named(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        TIER_NAMES.iter().copied().zip(self.tiers.iter().copied())
    }
}

/// Source of collector statistics and heap size for the harness.
pub trait MemoryProbe {
    /// Current reclamation counters.
    fn snapshot(&self) -> CollectorSnapshot;

    /// Bytes currently live on the heap.
    fn heap_bytes(&self) -> u64;

    /// Force a full reclamation pass. No-op where nothing is deferred.
    fn force_collect(&mut self) {}
}

/// Probe backed by the counting global allocator.
///
/// Deallocations stand in for collections: a tier counts every block of that
/// size class handed back to the system. A successful `realloc` counts as a
/// reclamation of the old block plus a fresh allocation, so growing
/// collections inflate the reclamation counts. Reports zeros unless
/// [`TrackingAllocator`](poolbench_memory::TrackingAllocator) is installed.
#[derive(Debug, Default, Clone, Copy)]
pub struct TrackingProbe;

impl MemoryProbe for TrackingProbe {
    fn snapshot(&self) -> CollectorSnapshot {
        CollectorSnapshot::new(heap_stats().deallocations)
    }

    fn heap_bytes(&self) -> u64 {
        heap_stats().live_bytes()
    }
}
