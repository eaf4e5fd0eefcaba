//! Text report formatting.

use std::io::{self, Write};

use crate::config::{BenchmarkConfig, SizeClass};
use crate::constants::{KIB, MIB};
use crate::harness::{Comparison, RunResult};

/// Separator printed under the header block.
pub const RULE: &str = "--------------------------------------------------";

/// Format a number with thousand separators.
#[must_use]
pub fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    for (i, c) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

/// Scale a byte count to whole MB, KB or bytes.
#[must_use]
pub fn human_size(bytes: usize) -> String {
    if bytes >= MIB {
        format!("{} MB", bytes / MIB)
    } else if bytes >= KIB {
        format!("{} KB", bytes / KIB)
    } else {
        format!("{bytes} B")
    }
}

/// Section label for a size class, e.g. `SOH (64KB)`.
#[must_use]
pub fn size_label(class: SizeClass, size: usize) -> String {
    format!("{} ({})", class.heap_name(), human_size(size).replace(' ', ""))
}

/// Heap delta truncated to whole megabytes.
#[must_use]
#[allow(clippy::cast_possible_wrap, clippy::cast_precision_loss)]
pub fn heap_delta_mb(bytes: i64) -> f64 {
    (bytes / MIB as i64) as f64
}

/// Write the title and configuration block.
pub fn write_header<W: Write>(out: &mut W, config: &BenchmarkConfig) -> io::Result<()> {
    writeln!(out, "Buffer pool benchmark (small/large buffers + reclamation stats)")?;
    writeln!(out, "Iterations: {}", format_number(config.iterations as u64))?;
    writeln!(
        out,
        "Small buffer size: {} bytes ({})",
        format_number(config.small_size as u64),
        human_size(config.small_size)
    )?;
    writeln!(
        out,
        "Large buffer size: {} bytes ({})",
        format_number(config.large_size as u64),
        human_size(config.large_size)
    )?;
    writeln!(out, "{RULE}")?;
    writeln!(out)
}

/// One result line for a strategy.
#[must_use]
pub fn format_run(run: &RunResult) -> String {
    let tag = format!("[{}]", run.strategy.name());
    let reclaims = run
        .collections
        .named()
        .map(|(name, count)| format!("{name}={count}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{tag:<10} elapsed: {} ms | reclaims: {reclaims} | heap delta: {:.1} MB",
        run.elapsed_ms(),
        heap_delta_mb(run.heap_delta_bytes)
    )
}

/// Verification line comparing both checksums.
#[must_use]
pub fn format_verification(comparison: &Comparison) -> String {
    let matched = comparison.checksums_match();
    let line = format!(
        "checksum match: {matched} (unpooled={}, pooled={})",
        comparison.unpooled.checksum, comparison.pooled.checksum
    );
    if matched {
        line
    } else {
        format!("{line} <-- MISMATCH")
    }
}

/// Write the section for one size class.
pub fn write_comparison<W: Write>(out: &mut W, comparison: &Comparison) -> io::Result<()> {
    writeln!(out, "=== {} test ===", comparison.label)?;
    writeln!(out, "{}", format_run(&comparison.unpooled))?;
    writeln!(out, "{}", format_run(&comparison.pooled))?;
    writeln!(out, "{}", format_verification(comparison))
}
