//! CLI command implementations

pub mod generate;
pub mod processors;
pub mod validate;

mod reporting;

/// Exit status for invalid input or configuration.
pub const EXIT_INVALID: u8 = 1;

/// Exit status for a failed round.
pub const EXIT_ROUND_FAILED: u8 = 2;
