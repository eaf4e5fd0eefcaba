//! Property-based tests for the buffer pool.

use proptest::prelude::*;

use poolbench_memory::BufferPool;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every acquired buffer is at least as large as requested, whatever
    /// sizes were released before.
    #[test]
    fn acquire_covers_requested_size(
        released in prop::collection::vec(1usize..200_000, 0..8),
        requested in 0usize..2_000_000,
    ) {
        let pool = BufferPool::default();
        for size in released {
            pool.release(pool.rent(size));
        }
        let buffer = pool.acquire(requested);
        prop_assert!(buffer.len() >= requested);
        prop_assert_eq!(buffer.len(), buffer.capacity());
    }

    /// Acquire and release stay balanced over any request sequence.
    #[test]
    fn outstanding_returns_to_zero(sizes in prop::collection::vec(0usize..300_000, 1..32)) {
        let pool = BufferPool::default();
        let held: Vec<_> = sizes.iter().map(|&size| pool.acquire(size)).collect();
        prop_assert_eq!(pool.stats().outstanding(), sizes.len() as u64);
        drop(held);
        prop_assert_eq!(pool.stats().outstanding(), 0);
    }
}
