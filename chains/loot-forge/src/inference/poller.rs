//! Inference job polling.
//!
//! ```text
//! Submitted ──▶ Pending ──▶ Succeeded(images)
//!     │           │  ▲
//!     │           └──┘ every `interval`
//!     └───────────┴──▶ Failed
//! ```
//!
//! The loop is bounded by [`PollConfig::max_attempts`]; running out of
//! attempts yields [`InferenceError::TimedOut`].

use super::{InferenceApi, InferenceImage, InferenceJob, JobStatus};
use core_logic::{Clock, InferenceError, UpstreamError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_attempts: 120,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollState {
    Submitted,
    Pending,
    Succeeded(Vec<InferenceImage>),
    Failed,
}

impl PollState {
    /// Applies one status observation.
    ///
    /// A failed fetch leaves the state unchanged. Only non-terminal states are
    /// ever advanced, so a stale value can never end the loop.
    pub fn advance(self, observed: Result<InferenceJob, UpstreamError>) -> Self {
        match observed {
            Ok(job) => match job.status {
                JobStatus::Succeeded => PollState::Succeeded(job.images),
                JobStatus::Failed => PollState::Failed,
                JobStatus::Pending => PollState::Pending,
            },
            Err(_) => self,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, PollState::Succeeded(_) | PollState::Failed)
    }
}

pub struct InferencePoller {
    api: Arc<dyn InferenceApi>,
    clock: Arc<dyn Clock>,
    config: PollConfig,
}

impl InferencePoller {
    pub fn new(api: Arc<dyn InferenceApi>, clock: Arc<dyn Clock>, config: PollConfig) -> Self {
        Self { api, clock, config }
    }

    pub fn config(&self) -> PollConfig {
        self.config
    }

    /// Polls `job_id` until it succeeds, fails or the attempt budget is spent.
    pub async fn wait_for_images(
        &self,
        job_id: &str,
    ) -> Result<Vec<InferenceImage>, InferenceError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut state = PollState::Submitted;

        for attempt in 1..=max_attempts {
            if attempt > 1 {
                self.clock.sleep(self.config.interval).await;
            }

            let observed = self.api.get_inference(job_id).await;
            if let Err(e) = &observed {
                warn!(
                    "Status check {}/{} for job {} failed: {}",
                    attempt, max_attempts, job_id, e
                );
            }

            state = match state.advance(observed) {
                PollState::Succeeded(images) => {
                    info!(
                        "Inference job {} succeeded after {} checks",
                        job_id, attempt
                    );
                    return Ok(images);
                }
                PollState::Failed => {
                    warn!("Inference job {} failed after {} checks", job_id, attempt);
                    return Err(InferenceError::Failed {
                        job_id: job_id.to_string(),
                    });
                }
                pending => {
                    debug!("Inference job {} status: {:?}", job_id, pending);
                    pending
                }
            };
        }

        warn!(
            "Inference job {} still not finished after {} checks, giving up",
            job_id, max_attempts
        );
        Err(InferenceError::TimedOut {
            job_id: job_id.to_string(),
            attempts: max_attempts,
        })
    }
}
