//! aptgen End-to-End Test Infrastructure
//!
//! Integration tests for generation sessions:
//!
//! - Generation: manifest -> generated sources
//! - Failure atomicity: failed rounds leave no new files
//! - **Determinism**: byte-identical output across clean runs
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p aptgen-tests
//! ```

pub mod fixtures;
pub mod harness;

pub use fixtures::{marked, ManifestFixture};
pub use harness::TestHarness;
