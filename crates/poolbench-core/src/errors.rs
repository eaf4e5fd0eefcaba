//! Error types for the benchmark harness.

/// Errors that can abort a benchmark run.
#[derive(Debug, thiserror::Error)]
pub enum BenchError {
    /// The configuration cannot be run.
    #[error("configuration error: {0}")]
    Config(String),

    /// Writing the report failed.
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),

    /// Pooled and unpooled checksums differed.
    #[error("checksum mismatch between strategies in {label}")]
    Mismatch {
        /// Size class label of the failing comparison.
        label: String,
    },
}

impl BenchError {
    /// Exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        use crate::constants::exit_codes;
        match self {
            Self::Config(_) => exit_codes::ERROR_CONFIG,
            Self::Io(_) => exit_codes::ERROR_GENERIC,
            Self::Mismatch { .. } => exit_codes::ERROR_MISMATCH,
        }
    }
}
