//! # poolbench-core
//!
//! Benchmark harness comparing per-iteration allocation with pooled buffer
//! reuse at a small and a large size class.

pub mod config;
pub mod constants;
pub mod errors;
pub mod harness;
pub mod probe;
pub mod report;
pub mod strategy;

pub use config::{BenchmarkConfig, SizeClass};
pub use errors::BenchError;
pub use harness::{Comparison, Harness, RunResult};
pub use probe::{CollectorSnapshot, MemoryProbe, TrackingProbe};
pub use strategy::Strategy;
