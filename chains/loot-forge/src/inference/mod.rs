//! Text-to-image inference: job submission and status polling.

use async_trait::async_trait;
use core_logic::UpstreamError;
use serde::{Deserialize, Serialize};

pub mod client;
pub mod poller;

pub use client::InferenceClient;
pub use poller::{InferencePoller, PollConfig, PollState};

pub const PROMPT_SUFFIX: &str = "single object on black background no people";
pub const SCHEDULER: &str = "EulerDiscreteScheduler";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Pending,
    Succeeded,
    Failed,
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Pending)
    }
}

impl From<String> for JobStatus {
    // queued, in-progress and anything unknown all mean "not done yet"
    fn from(status: String) -> Self {
        match status.as_str() {
            "succeeded" => JobStatus::Succeeded,
            "failed" => JobStatus::Failed,
            _ => JobStatus::Pending,
        }
    }
}

impl<'de> Deserialize<'de> for JobStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer).map(JobStatus::from)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InferenceImage {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InferenceJob {
    pub id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub images: Vec<InferenceImage>,
}

/// Request body parameters for a `txt2img` job.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InferenceParameters {
    pub num_samples: u32,
    pub quality_boost_scale: u32,
    pub quality_boost: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub disable_merging: bool,
    pub hide_results: bool,
    pub reference_adain: bool,
    pub intermediate_images: bool,
    pub scheduler: String,
    pub reference_attn: bool,
    pub prompt: String,
}

impl InferenceParameters {
    pub fn txt2img(subject: &str) -> Self {
        Self {
            num_samples: 1,
            quality_boost_scale: 4,
            quality_boost: false,
            kind: "txt2img".to_string(),
            disable_merging: false,
            hide_results: false,
            reference_adain: false,
            intermediate_images: false,
            scheduler: SCHEDULER.to_string(),
            reference_attn: false,
            prompt: format!("{} {}", subject, PROMPT_SUFFIX),
        }
    }
}

#[async_trait]
pub trait InferenceApi: Send + Sync {
    /// Returns the new job's id.
    async fn create_inference(&self, parameters: &InferenceParameters)
        -> Result<String, UpstreamError>;

    async fn get_inference(&self, job_id: &str) -> Result<InferenceJob, UpstreamError>;
}
