//! # Core Error Types
//!
//! Centralized error definitions for the loot pipeline.
//! Malformed stat strings are not represented here: the parser drops them
//! silently instead of failing.

use thiserror::Error;

/// Unified error type for a single pipeline run.
///
/// Every variant aborts the request. Metadata registration failures that are
/// tolerated never reach this type; they stay inside the publish report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Config(ConfigError),

    #[error(transparent)]
    Upstream(UpstreamError),

    #[error(transparent)]
    Inference(InferenceError),

    #[error(transparent)]
    Metadata(MetadataError),

    #[error(transparent)]
    Mint(MintError),

    #[error("Inference submission returned no job identifier")]
    NoJobIdentifier,

    #[error("Daily mint limit of {limit} reached for {address}")]
    DailyLimitExceeded { address: String, limit: u32 },

    #[error("Invalid request: {reason}")]
    InvalidRequest { reason: String },
}

impl From<ConfigError> for PipelineError {
    fn from(e: ConfigError) -> Self {
        PipelineError::Config(e)
    }
}

impl From<UpstreamError> for PipelineError {
    fn from(e: UpstreamError) -> Self {
        PipelineError::Upstream(e)
    }
}

impl From<InferenceError> for PipelineError {
    fn from(e: InferenceError) -> Self {
        PipelineError::Inference(e)
    }
}

impl From<MetadataError> for PipelineError {
    fn from(e: MetadataError) -> Self {
        PipelineError::Metadata(e)
    }
}

impl From<MintError> for PipelineError {
    fn from(e: MintError) -> Self {
        PipelineError::Mint(e)
    }
}

/// Configuration-related errors, raised once at startup.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid RPC URL format: '{url}'")]
    InvalidRpcUrl { url: String },

    #[error("Missing required configuration field: '{field}'")]
    MissingField { field: String },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}

/// Failures talking to a collaborator service (loot, inference, metadata, indexer).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Request to {endpoint} failed: {reason}")]
    Transport { endpoint: String, reason: String },

    #[error("HTTP error {status_code} from {endpoint}")]
    HttpStatus { status_code: u16, endpoint: String },

    #[error("Invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },
}

impl UpstreamError {
    pub fn transport(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        UpstreamError::Transport {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }

    pub fn invalid_response(endpoint: impl Into<String>, reason: impl std::fmt::Display) -> Self {
        UpstreamError::InvalidResponse {
            endpoint: endpoint.into(),
            reason: reason.to_string(),
        }
    }
}

/// Terminal outcomes of an inference job other than success.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InferenceError {
    #[error("Inference job {job_id} failed")]
    Failed { job_id: String },

    #[error("Inference job {job_id} still pending after {attempts} status checks")]
    TimedOut { job_id: String, attempts: u32 },

    #[error("Inference job {job_id} succeeded without images")]
    NoImages { job_id: String },
}

/// Metadata publishing failures. Which of these abort the pipeline is decided
/// by the publisher, not by the variant.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MetadataError {
    #[error("Token registration failed: {0}")]
    TokenRegistration(UpstreamError),

    #[error("Asset registration failed: {0}")]
    AssetRegistration(UpstreamError),

    #[error("Image download failed: {0}")]
    ImageFetch(UpstreamError),

    #[error("Asset upload failed: {0}")]
    Upload(UpstreamError),
}

/// On-chain mint failures. None of these are retried.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MintError {
    #[error("Invalid address '{address}'")]
    InvalidAddress { address: String },

    #[error("Failed to open wallet session: {reason}")]
    Session { reason: String },

    #[error("Failed to encode mint call: {reason}")]
    Encoding { reason: String },

    #[error("Mint transaction submission failed: {reason}")]
    Submission { reason: String },
}
