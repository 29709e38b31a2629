//! HTTP clients for the collaborator services.
//!
//! Each client implements one of the pipeline's service traits so the
//! orchestrator never sees `reqwest` directly.

use anyhow::{Context, Result};
use core_logic::UpstreamError;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

pub mod indexer_api;
pub mod inference_api;
pub mod loot_api;
pub mod metadata_api;

pub use indexer_api::IndexerHttpApi;
pub use inference_api::ScenarioApi;
pub use loot_api::LootApi;
pub use metadata_api::MetadataHttpApi;

/// Shared client for every service. Requests have no overall deadline unless
/// `timeout` is set.
pub fn build_http_client(timeout: Option<Duration>) -> Result<Client> {
    let mut builder = Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_idle_timeout(Duration::from_secs(30));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder.build().context("Failed to build HTTP client")
}

pub(crate) fn check_status(status: StatusCode, endpoint: &str) -> Result<(), UpstreamError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(UpstreamError::HttpStatus {
            status_code: status.as_u16(),
            endpoint: endpoint.to_string(),
        })
    }
}

pub(crate) fn parse_body<T: DeserializeOwned>(body: &[u8], endpoint: &str) -> Result<T, UpstreamError> {
    serde_json::from_slice(body).map_err(|e| UpstreamError::invalid_response(endpoint, e))
}

/// Sends the request and returns the raw body of a 2xx response.
pub(crate) async fn send_for_bytes(
    request: RequestBuilder,
    endpoint: &str,
) -> Result<Vec<u8>, UpstreamError> {
    let response = request
        .send()
        .await
        .map_err(|e| UpstreamError::transport(endpoint, e))?;
    check_status(response.status(), endpoint)?;

    let body = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::transport(endpoint, e))?;
    Ok(body.to_vec())
}

pub(crate) async fn send_json<T: DeserializeOwned>(
    request: RequestBuilder,
    endpoint: &str,
) -> Result<T, UpstreamError> {
    let body = send_for_bytes(request, endpoint).await?;
    parse_body(&body, endpoint)
}
