//! Paired measurement of the unpooled and pooled strategies.
//!
//! A run prints the configuration, warms both strategies at both sizes, then
//! measures each size class in turn. Every measurement settles the heap,
//! snapshots the probe, times a single pass of one strategy and snapshots
//! again.

use std::io::Write;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, error, info};

use poolbench_memory::BufferPool;

use crate::config::{BenchmarkConfig, SizeClass};
use crate::errors::BenchError;
use crate::probe::{CollectorSnapshot, MemoryProbe, TrackingProbe};
use crate::report;
use crate::strategy::{run_strategy, Strategy};

/// Measurement of one strategy at one size.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    /// Strategy measured.
    pub strategy: Strategy,
    /// Wall time of the timed pass.
    pub elapsed: Duration,
    /// Reclamations per tier during the pass.
    pub collections: CollectorSnapshot,
    /// Change in live heap bytes over the pass.
    pub heap_delta_bytes: i64,
    /// Sum of sampled buffer bytes.
    pub checksum: u64,
}

impl RunResult {
    /// Elapsed time in whole milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> u128 {
        self.elapsed.as_millis()
    }
}

/// Both strategies measured at one size class.
#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    /// Size class measured.
    pub class: SizeClass,
    /// Section label, e.g. `SOH (64KB)`.
    pub label: String,
    /// Buffer size in bytes.
    pub size: usize,
    /// Fresh allocation per iteration.
    pub unpooled: RunResult,
    /// Pool reuse per iteration.
    pub pooled: RunResult,
}

impl Comparison {
    /// Whether both strategies did the same work.
    #[must_use]
    pub fn checksums_match(&self) -> bool {
        self.unpooled.checksum == self.pooled.checksum
    }
}

/// Benchmark driver owning its pool and memory probe.
pub struct Harness<P = TrackingProbe> {
    config: BenchmarkConfig,
    pool: BufferPool,
    probe: P,
}

impl Harness<TrackingProbe> {
    /// Harness with a default pool, reading the tracking allocator.
    pub fn new(config: BenchmarkConfig) -> Result<Self, BenchError> {
        Self::with_probe(config, BufferPool::default(), TrackingProbe)
    }
}

impl<P: MemoryProbe> Harness<P> {
    /// Harness with an explicit pool and probe.
    pub fn with_probe(
        config: BenchmarkConfig,
        pool: BufferPool,
        probe: P,
    ) -> Result<Self, BenchError> {
        config.validate()?;
        Ok(Self {
            config,
            pool,
            probe,
        })
    }

    /// The configuration being run.
    #[must_use]
    pub fn config(&self) -> &BenchmarkConfig {
        &self.config
    }

    /// The pool used by the pooled strategy.
    #[must_use]
    pub fn pool(&self) -> &BufferPool {
        &self.pool
    }

    /// The memory probe.
    #[must_use]
    pub fn probe(&self) -> &P {
        &self.probe
    }

    /// Print the configuration, warm up, and compare both size classes.
    pub fn run_all<W: Write>(&mut self, out: &mut W) -> Result<Vec<Comparison>, BenchError> {
        report::write_header(out, &self.config)?;

        writeln!(out, "Warming up...")?;
        self.warm_up();
        writeln!(out, "Warm-up complete.")?;
        writeln!(out)?;

        let mut comparisons = Vec::with_capacity(2);
        for class in SizeClass::ALL {
            if class != SizeClass::Small {
                writeln!(out)?;
            }
            let comparison = self.run_comparison(class);
            report::write_comparison(out, &comparison)?;
            comparisons.push(comparison);
        }
        Ok(comparisons)
    }

    /// Run both strategies at both sizes with short iteration counts.
    pub fn warm_up(&self) {
        for class in SizeClass::ALL {
            let size = self.config.size_of(class);
            let iterations = self.config.warmup_iterations(class);
            debug!(size, iterations, "warm-up pass");
            for strategy in [Strategy::Unpooled, Strategy::Pooled] {
                run_strategy(strategy, &self.pool, size, iterations);
            }
        }
    }

    /// Measure the unpooled then the pooled strategy at the configured
    /// size of `class`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn run_comparison(&mut self, class: SizeClass) -> Comparison {
        let size = self.config.size_of(class);
        let label = report::size_label(class, size);
        let unpooled = self.measure(Strategy::Unpooled, size);
        let pooled = self.measure(Strategy::Pooled, size);

        let comparison = Comparison {
            class,
            label,
            size,
            unpooled,
            pooled,
        };
        if comparison.checksums_match() {
            info!(
                label = %comparison.label,
                unpooled_ms = comparison.unpooled.elapsed_ms() as u64,
                pooled_ms = comparison.pooled.elapsed_ms() as u64,
                "comparison finished"
            );
        } else {
            error!(
                label = %comparison.label,
                unpooled = comparison.unpooled.checksum,
                pooled = comparison.pooled.checksum,
                "checksum mismatch between strategies"
            );
        }
        comparison
    }

    /// Two consecutive forced collections.
    fn settle(&mut self) {
        debug!("settling heap before measurement");
        self.probe.force_collect();
        self.probe.force_collect();
    }

    #[allow(clippy::cast_possible_wrap, clippy::cast_possible_truncation)]
    fn measure(&mut self, strategy: Strategy, size: usize) -> RunResult {
        self.settle();
        let start_snapshot = self.probe.snapshot();
        let start_heap = self.probe.heap_bytes();

        let timer = Instant::now();
        let checksum = run_strategy(strategy, &self.pool, size, self.config.iterations);
        let elapsed = timer.elapsed();

        let end_snapshot = self.probe.snapshot();
        let end_heap = self.probe.heap_bytes();

        RunResult {
            strategy,
            elapsed,
            collections: start_snapshot.delta(&end_snapshot),
            heap_delta_bytes: end_heap as i64 - start_heap as i64,
            checksum,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    /// Probe whose counters advance on every read.
    #[derive(Default)]
    struct CountingProbe {
        collects: usize,
        reads: Cell<u64>,
    }

    impl MemoryProbe for CountingProbe {
        fn snapshot(&self) -> CollectorSnapshot {
            let n = self.reads.get() + 1;
            self.reads.set(n);
            CollectorSnapshot::new([n, 2 * n])
        }

        fn heap_bytes(&self) -> u64 {
            1024 * 1024 * self.reads.get()
        }

        fn force_collect(&mut self) {
            self.collects += 1;
        }
    }

    fn small_config() -> BenchmarkConfig {
        BenchmarkConfig {
            iterations: 300,
            small_size: 4096,
            large_size: 131_072,
            warmup_small_iterations: 10,
            warmup_large_iterations: 2,
        }
    }

    #[test]
    fn rejects_invalid_config() {
        let config = BenchmarkConfig {
            large_size: 0,
            ..small_config()
        };
        assert!(matches!(
            Harness::new(config),
            Err(BenchError::Config(_))
        ));
    }

    #[test]
    fn comparison_settles_twice_per_strategy() {
        let mut harness =
            Harness::with_probe(small_config(), BufferPool::default(), CountingProbe::default())
                .unwrap();
        let comparison = harness.run_comparison(SizeClass::Small);
        assert_eq!(harness.probe().collects, 4);
        assert!(comparison.checksums_match());
        assert_eq!(comparison.unpooled.strategy, Strategy::Unpooled);
        assert_eq!(comparison.pooled.strategy, Strategy::Pooled);
    }

    #[test]
    fn deltas_come_from_probe() {
        let mut harness =
            Harness::with_probe(small_config(), BufferPool::default(), CountingProbe::default())
                .unwrap();
        let comparison = harness.run_comparison(SizeClass::Small);
        // Each measurement reads the snapshot twice, one step apart.
        assert_eq!(comparison.unpooled.collections.tiers, [1, 2]);
        assert_eq!(comparison.pooled.collections.tiers, [1, 2]);
        assert_eq!(comparison.unpooled.heap_delta_bytes, 1024 * 1024);
    }

    #[test]
    fn warm_up_populates_pool() {
        let harness = Harness::new(small_config()).unwrap();
        harness.warm_up();
        assert_eq!(harness.pool().total_pooled(), 2);
        assert_eq!(harness.pool().stats().outstanding(), 0);
    }

    #[test]
    fn run_all_reports_both_sizes() {
        let mut harness = Harness::new(small_config()).unwrap();
        let mut out = Vec::new();
        let comparisons = harness.run_all(&mut out).unwrap();
        assert_eq!(comparisons.len(), 2);
        assert_eq!(comparisons[0].label, "SOH (4KB)");
        assert_eq!(comparisons[1].label, "LOH (128KB)");

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Warming up..."));
        assert!(text.contains("Warm-up complete."));
        let soh = text.find("=== SOH (4KB) test ===").unwrap();
        let loh = text.find("=== LOH (128KB) test ===").unwrap();
        assert!(soh < loh);
        assert_eq!(text.matches("checksum match: true").count(), 2);
    }

    #[test]
    fn labels_follow_class_order_not_threshold() {
        let config = BenchmarkConfig {
            iterations: 20,
            small_size: 100_000,
            large_size: 2_000_000,
            warmup_small_iterations: 1,
            warmup_large_iterations: 1,
        };
        let mut harness = Harness::new(config).unwrap();
        let comparisons = harness.run_all(&mut std::io::sink()).unwrap();
        assert_eq!(comparisons[0].label, "SOH (97KB)");
        assert_eq!(comparisons[0].class, SizeClass::Small);
        assert_eq!(comparisons[1].label, "LOH (1MB)");
        assert_eq!(comparisons[1].class, SizeClass::Large);
    }

    #[test]
    fn comparison_uses_configured_size() {
        let mut harness = Harness::new(small_config()).unwrap();
        let comparison = harness.run_comparison(SizeClass::Large);
        assert_eq!(comparison.size, 131_072);
        assert_eq!(comparison.label, "LOH (128KB)");
        assert!(comparison.checksums_match());
    }

    #[test]
    fn pooled_pass_reuses_warm_buffer() {
        let mut harness = Harness::new(small_config()).unwrap();
        harness.warm_up();
        harness.pool().reset_stats();
        harness.run_comparison(SizeClass::Small);
        let stats = harness.pool().stats();
        assert_eq!(stats.misses, 0);
        assert_eq!(stats.hits, 300);
    }
}
