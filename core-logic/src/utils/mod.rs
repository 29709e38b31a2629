//! # Utilities Module
//!
//! Internal utility modules for the core-logic crate.
//! These modules are marked as `pub(crate)` to enforce API boundaries.

pub(crate) mod clock;
pub(crate) mod entropy;
pub(crate) mod logger;

pub use clock::SystemClock;
pub use entropy::ThreadEntropy;
pub use logger::{setup_logger, setup_logger_with_file, RESULT_TARGET};
