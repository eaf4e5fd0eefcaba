//! Application entry point and dispatch.

use std::io::{self, Write};

use anyhow::Result;

use poolbench_core::constants::exit_codes;
use poolbench_core::{BenchError, Comparison, Harness};

use crate::config::{AppConfig, OutputFormat};

/// Run the benchmark and return the process exit code.
pub fn run(config: &AppConfig) -> i32 {
    match execute(config) {
        Ok(()) => exit_codes::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            err.downcast_ref::<BenchError>()
                .map_or(exit_codes::ERROR_GENERIC, BenchError::exit_code)
        }
    }
}

fn execute(config: &AppConfig) -> Result<()> {
    let mut harness = Harness::new(config.benchmark_config())?;
    let stdout = io::stdout();
    let mut out = stdout.lock();

    let comparisons = match config.format {
        OutputFormat::Text => harness.run_all(&mut out)?,
        OutputFormat::Json => {
            let comparisons = harness.run_all(&mut io::sink())?;
            serde_json::to_writer_pretty(&mut out, &comparisons)?;
            writeln!(out)?;
            comparisons
        }
    };
    out.flush()?;

    if config.strict {
        check_checksums(&comparisons)?;
    }
    Ok(())
}

/// Fail on the first comparison whose checksums differ.
pub fn check_checksums(comparisons: &[Comparison]) -> Result<(), BenchError> {
    match comparisons.iter().find(|c| !c.checksums_match()) {
        Some(c) => Err(BenchError::Mismatch {
            label: c.label.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use poolbench_core::{CollectorSnapshot, RunResult, SizeClass, Strategy};

    use super::*;

    fn comparison(unpooled: u64, pooled: u64) -> Comparison {
        let run = |strategy, checksum| RunResult {
            strategy,
            elapsed: Duration::ZERO,
            collections: CollectorSnapshot::default(),
            heap_delta_bytes: 0,
            checksum,
        };
        Comparison {
            class: SizeClass::Large,
            label: "LOH (1MB)".into(),
            size: 1_048_576,
            unpooled: run(Strategy::Unpooled, unpooled),
            pooled: run(Strategy::Pooled, pooled),
        }
    }

    #[test]
    fn strict_check_passes_on_match() {
        assert!(check_checksums(&[comparison(1, 1), comparison(2, 2)]).is_ok());
    }

    #[test]
    fn strict_check_reports_label() {
        let err = check_checksums(&[comparison(1, 1), comparison(2, 3)]).unwrap_err();
        assert!(matches!(err, BenchError::Mismatch { ref label } if label == "LOH (1MB)"));
        assert_eq!(err.exit_code(), exit_codes::ERROR_MISMATCH);
    }
}
