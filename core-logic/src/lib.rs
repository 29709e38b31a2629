//! # Core Logic - Shared Utilities for the Loot Pipeline
//!
//! This crate provides the pieces shared by every pipeline component:
//! error taxonomy, configuration primitives, time and randomness seams,
//! and logging setup.
//!
//! ## Modules
//!
//! - [`config`] - Deploy environment, chain settings and secrets
//! - [`error`] - Typed error handling with thiserror
//! - [`traits`] - `Clock` and `EntropySource` seams
//! - [`utils`] - System implementations of the seams and the logger

pub mod config;
pub mod error;
pub mod traits;
pub(crate) mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use config::{ChainConfig, DeployEnvironment, Secret};
pub use error::{
    ConfigError, InferenceError, MetadataError, MintError, PipelineError, UpstreamError,
};
pub use traits::{Clock, EntropySource};

pub use utils::{setup_logger, setup_logger_with_file, SystemClock, ThreadEntropy, RESULT_TARGET};
