//! Default benchmark parameters and exit codes.

/// Measured iterations per strategy and size class.
pub const DEFAULT_ITERATIONS: usize = 5_000_000;

/// Small buffer size (64 KB), below the large-object threshold.
pub const SMALL_BUFFER_SIZE: usize = 65_536;

/// Large buffer size (1 MB), above the large-object threshold.
pub const LARGE_BUFFER_SIZE: usize = 1_048_576;

/// Warm-up iterations for the small size class.
pub const WARMUP_SMALL_ITERATIONS: usize = 1_000;

/// Warm-up iterations for the large size class.
pub const WARMUP_LARGE_ITERATIONS: usize = 100;

/// Bytes per kibibyte.
pub const KIB: usize = 1024;

/// Bytes per mebibyte.
pub const MIB: usize = 1024 * 1024;

/// Process exit codes.
pub mod exit_codes {
    /// Successful execution.
    pub const SUCCESS: i32 = 0;
    /// Generic error.
    pub const ERROR_GENERIC: i32 = 1;
    /// Checksums differed between strategies (strict mode only).
    pub const ERROR_MISMATCH: i32 = 3;
    /// Invalid configuration.
    pub const ERROR_CONFIG: i32 = 4;
}
