//! # poolbench-memory
//!
//! Memory plumbing for the pool benchmark.
//!
//! Provides a size-classed byte buffer pool with scoped acquisition, pool
//! usage statistics, and a counting global allocator that stands in for
//! collector statistics.
#![warn(missing_docs)]

pub mod pool;
pub mod stats;
pub mod tracking;

pub use pool::{BufferPool, PooledBuffer};
pub use stats::PoolStats;
pub use tracking::{heap_stats, HeapStats, TrackingAllocator};
