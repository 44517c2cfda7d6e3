//! aptgen CLI library.
//!
//! Provides the processor registry, the per-round generation driver,
//! multi-round sessions, the built-in processors, and the command
//! implementations behind the `aptgen` binary.

pub mod commands;
pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod processors;
pub mod registry;
pub mod session;

pub use context::RoundContext;
pub use driver::{GenerationDriver, RoundInput, RoundOutcome};
pub use error::{ConfigurationError, HandlerError, RoundError, SessionError};
pub use registry::{Processor, ProcessorRegistry};
pub use session::{Session, SessionOutcome, DEFAULT_MAX_ROUNDS};
