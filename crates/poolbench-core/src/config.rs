//! Benchmark configuration.

use serde::Serialize;

use crate::constants::{
    DEFAULT_ITERATIONS, LARGE_BUFFER_SIZE, SMALL_BUFFER_SIZE, WARMUP_LARGE_ITERATIONS,
    WARMUP_SMALL_ITERATIONS,
};
use crate::errors::BenchError;

/// The two measured buffer sizes, in measurement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
    /// Below the large-object threshold ("SOH-like").
    Small,
    /// At or above the large-object threshold ("LOH-like").
    Large,
}

impl SizeClass {
    /// Both classes, small first.
    pub const ALL: [Self; 2] = [Self::Small, Self::Large];

    /// Heap name used in section labels.
    #[must_use]
    pub fn heap_name(self) -> &'static str {
        match self {
            Self::Small => "SOH",
            Self::Large => "LOH",
        }
    }
}

/// Parameters of one benchmark run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BenchmarkConfig {
    /// Measured iterations per strategy and size class.
    pub iterations: usize,
    /// Small ("SOH-like") buffer size in bytes.
    pub small_size: usize,
    /// Large ("LOH-like") buffer size in bytes.
    pub large_size: usize,
    /// Warm-up iterations at the small size.
    pub warmup_small_iterations: usize,
    /// Warm-up iterations at the large size.
    pub warmup_large_iterations: usize,
}

impl BenchmarkConfig {
    /// Buffer size in bytes for `class`.
    #[must_use]
    pub fn size_of(&self, class: SizeClass) -> usize {
        match class {
            SizeClass::Small => self.small_size,
            SizeClass::Large => self.large_size,
        }
    }

    /// Warm-up iterations for `class`.
    #[must_use]
    pub fn warmup_iterations(&self, class: SizeClass) -> usize {
        match class {
            SizeClass::Small => self.warmup_small_iterations,
            SizeClass::Large => self.warmup_large_iterations,
        }
    }

    /// Check that every loop in the run can execute.
    pub fn validate(&self) -> Result<(), BenchError> {
        if self.small_size == 0 || self.large_size == 0 {
            return Err(BenchError::Config("buffer sizes must be non-zero".into()));
        }
        if self.iterations == 0 {
            return Err(BenchError::Config("iteration count must be at least 1".into()));
        }
        Ok(())
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            small_size: SMALL_BUFFER_SIZE,
            large_size: LARGE_BUFFER_SIZE,
            warmup_small_iterations: WARMUP_SMALL_ITERATIONS,
            warmup_large_iterations: WARMUP_LARGE_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = BenchmarkConfig::default();
        assert_eq!(config.iterations, 5_000_000);
        assert_eq!(config.size_of(SizeClass::Small), 65_536);
        assert_eq!(config.size_of(SizeClass::Large), 1_048_576);
        assert_eq!(SizeClass::ALL, [SizeClass::Small, SizeClass::Large]);
        assert_eq!(config.warmup_small_iterations, 1000);
        assert_eq!(config.warmup_large_iterations, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_zero_size() {
        let config = BenchmarkConfig {
            small_size: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }

    #[test]
    fn rejects_zero_iterations() {
        let config = BenchmarkConfig {
            iterations: 0,
            ..BenchmarkConfig::default()
        };
        assert!(matches!(config.validate(), Err(BenchError::Config(_))));
    }
}
