use super::send_json;
use crate::inference::{InferenceApi, InferenceJob, InferenceParameters};
use async_trait::async_trait;
use core_logic::{Secret, UpstreamError};
use reqwest::Client;
use serde::{Deserialize, Serialize};

pub const SCENARIO_BASE_URL: &str = "https://api.cloud.scenario.com/v1";

#[derive(Serialize)]
struct CreateInferenceBody<'a> {
    parameters: &'a InferenceParameters,
}

#[derive(Deserialize)]
struct CreatedInference {
    id: String,
}

#[derive(Deserialize)]
struct InferenceEnvelope<T> {
    inference: T,
}

/// Scenario txt2img client bound to a single model.
pub struct ScenarioApi {
    client: Client,
    base_url: String,
    model_id: String,
    api_key: Secret,
}

impl ScenarioApi {
    pub fn new(client: Client, base_url: &str, model_id: &str, api_key: Secret) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id: model_id.to_string(),
            api_key,
        }
    }

    fn inferences_url(&self) -> String {
        format!("{}/models/{}/inferences", self.base_url, self.model_id)
    }

    fn authorization(&self) -> String {
        format!("Basic {}", self.api_key.expose())
    }
}

#[async_trait]
impl InferenceApi for ScenarioApi {
    async fn create_inference(
        &self,
        parameters: &InferenceParameters,
    ) -> Result<String, UpstreamError> {
        let request = self
            .client
            .post(self.inferences_url())
            .header("Authorization", self.authorization())
            .json(&CreateInferenceBody { parameters });

        let envelope: InferenceEnvelope<CreatedInference> =
            send_json(request, "inference").await?;
        Ok(envelope.inference.id)
    }

    async fn get_inference(&self, job_id: &str) -> Result<InferenceJob, UpstreamError> {
        let request = self
            .client
            .get(format!("{}/{}", self.inferences_url(), job_id))
            .header("Authorization", self.authorization());

        let envelope: InferenceEnvelope<InferenceJob> = send_json(request, "inference").await?;
        Ok(envelope.inference)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inference::JobStatus;
    use crate::services::parse_body;

    #[test]
    fn test_urls_and_auth() {
        let api = ScenarioApi::new(
            Client::new(),
            "https://api.cloud.scenario.com/v1/",
            "model_abc",
            Secret::new("a2V5OnNlY3JldA=="),
        );
        assert_eq!(
            api.inferences_url(),
            "https://api.cloud.scenario.com/v1/models/model_abc/inferences"
        );
        assert_eq!(api.authorization(), "Basic a2V5OnNlY3JldA==");
    }

    #[test]
    fn test_request_body_wraps_parameters() {
        let parameters = InferenceParameters::txt2img("Fury");
        let body = serde_json::to_value(CreateInferenceBody {
            parameters: &parameters,
        })
        .unwrap();
        assert_eq!(body["parameters"]["numSamples"], 1);
        assert_eq!(body["parameters"]["qualityBoostScale"], 4);
    }

    #[test]
    fn test_envelopes() {
        let created: InferenceEnvelope<CreatedInference> = parse_body(
            br#"{"inference":{"id":"inf_1","status":"queued"}}"#,
            "inference",
        )
        .unwrap();
        assert_eq!(created.inference.id, "inf_1");

        let job: InferenceEnvelope<InferenceJob> = parse_body(
            br#"{"inference":{"id":"inf_1","status":"succeeded","images":[{"url":"https://cdn.example.com/1.png"}]}}"#,
            "inference",
        )
        .unwrap();
        assert_eq!(job.inference.status, JobStatus::Succeeded);
        assert_eq!(job.inference.images.len(), 1);

        assert!(parse_body::<InferenceEnvelope<CreatedInference>>(b"{}", "inference").is_err());
    }
}
