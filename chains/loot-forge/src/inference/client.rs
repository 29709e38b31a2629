use super::{InferenceApi, InferenceParameters};
use std::sync::Arc;
use tracing::{error, info};

/// Submits generation jobs. Failures degrade to `None` rather than an error;
/// callers must check before polling.
pub struct InferenceClient {
    api: Arc<dyn InferenceApi>,
}

impl InferenceClient {
    pub fn new(api: Arc<dyn InferenceApi>) -> Self {
        Self { api }
    }

    pub async fn submit(&self, subject: &str) -> Option<String> {
        let parameters = InferenceParameters::txt2img(subject);

        match self.api.create_inference(&parameters).await {
            Ok(job_id) => {
                info!("Inference job {} submitted for '{}'", job_id, subject);
                Some(job_id)
            }
            Err(e) => {
                error!("Inference submission for '{}' failed: {}", subject, e);
                None
            }
        }
    }
}
