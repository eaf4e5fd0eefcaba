//! Application configuration from CLI flags and environment.

use clap::{Parser, ValueEnum};

use poolbench_core::constants::{
    DEFAULT_ITERATIONS, LARGE_BUFFER_SIZE, SMALL_BUFFER_SIZE, WARMUP_LARGE_ITERATIONS,
    WARMUP_SMALL_ITERATIONS,
};
use poolbench_core::BenchmarkConfig;

/// Report format on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report.
    Text,
    /// Comparisons as a JSON array.
    Json,
}

/// poolbench — compare per-iteration allocation with pooled buffer reuse.
#[derive(Parser, Debug)]
#[command(name = "poolbench", version, about)]
pub struct AppConfig {
    /// Measured iterations per strategy and size class.
    #[arg(short = 'n', long, default_value_t = DEFAULT_ITERATIONS, env = "POOLBENCH_ITERATIONS")]
    pub iterations: usize,

    /// Small buffer size in bytes.
    #[arg(long, default_value_t = SMALL_BUFFER_SIZE, env = "POOLBENCH_SMALL_SIZE")]
    pub small_size: usize,

    /// Large buffer size in bytes.
    #[arg(long, default_value_t = LARGE_BUFFER_SIZE, env = "POOLBENCH_LARGE_SIZE")]
    pub large_size: usize,

    /// Output format.
    #[arg(long, value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Exit with an error status when checksums differ.
    #[arg(long)]
    pub strict: bool,

    /// Verbose logging on stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl AppConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Benchmark parameters; warm-up counts are fixed.
    #[must_use]
    pub fn benchmark_config(&self) -> BenchmarkConfig {
        BenchmarkConfig {
            iterations: self.iterations,
            small_size: self.small_size,
            large_size: self.large_size,
            warmup_small_iterations: WARMUP_SMALL_ITERATIONS,
            warmup_large_iterations: WARMUP_LARGE_ITERATIONS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_uses_defaults() {
        let config = AppConfig::try_parse_from(["poolbench"]).unwrap();
        assert_eq!(config.benchmark_config(), BenchmarkConfig::default());
        assert_eq!(config.format, OutputFormat::Text);
        assert!(!config.strict);
    }

    #[test]
    fn overrides() {
        let config = AppConfig::try_parse_from([
            "poolbench",
            "-n",
            "1000",
            "--small-size",
            "4096",
            "--format",
            "json",
            "--strict",
        ])
        .unwrap();
        let bench = config.benchmark_config();
        assert_eq!(bench.iterations, 1000);
        assert_eq!(bench.small_size, 4096);
        assert_eq!(bench.large_size, LARGE_BUFFER_SIZE);
        assert_eq!(config.format, OutputFormat::Json);
        assert!(config.strict);
    }

    #[test]
    fn rejects_non_numeric_iterations() {
        assert!(AppConfig::try_parse_from(["poolbench", "-n", "many"]).is_err());
    }
}
