use super::{send_for_bytes, send_json};
use crate::metadata::{AssetRecord, ImageSource, ImageUpload, MetadataApi, TokenRecord};
use async_trait::async_trait;
use core_logic::{Secret, UpstreamError};
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateTokenBody<'a> {
    project_id: u64,
    collection_id: u64,
    token: &'a TokenRecord,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateAssetBody<'a> {
    project_id: u64,
    asset: &'a AssetRecord,
}

#[derive(Deserialize)]
struct CreatedAsset {
    asset: AssetId,
}

#[derive(Deserialize)]
struct AssetId {
    id: u64,
}

#[derive(Deserialize)]
struct UploadedAsset {
    url: String,
}

/// Collections service client plus plain image downloads.
pub struct MetadataHttpApi {
    client: Client,
    base_url: String,
    jwt: Secret,
}

impl MetadataHttpApi {
    pub fn new(client: Client, base_url: &str, jwt: Secret) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            jwt,
        }
    }

    fn rpc_url(&self, method: &str) -> String {
        format!("{}/rpc/Collections/{}", self.base_url, method)
    }

    fn upload_url(&self, project_id: u64, collection_id: u64, upload: &ImageUpload) -> String {
        format!(
            "{}/projects/{}/collections/{}/tokens/{}/upload/{}",
            self.base_url, project_id, collection_id, upload.token_id, upload.asset_id
        )
    }
}

#[async_trait]
impl MetadataApi for MetadataHttpApi {
    async fn create_token(
        &self,
        project_id: u64,
        collection_id: u64,
        token: &TokenRecord,
    ) -> Result<(), UpstreamError> {
        let request = self
            .client
            .post(self.rpc_url("CreateToken"))
            .bearer_auth(self.jwt.expose())
            .json(&CreateTokenBody {
                project_id,
                collection_id,
                token,
            });

        send_for_bytes(request, "metadata/CreateToken").await?;
        Ok(())
    }

    async fn create_asset(
        &self,
        project_id: u64,
        asset: &AssetRecord,
    ) -> Result<u64, UpstreamError> {
        let request = self
            .client
            .post(self.rpc_url("CreateAsset"))
            .bearer_auth(self.jwt.expose())
            .json(&CreateAssetBody { project_id, asset });

        let created: CreatedAsset = send_json(request, "metadata/CreateAsset").await?;
        Ok(created.asset.id)
    }

    async fn upload_asset(
        &self,
        project_id: u64,
        collection_id: u64,
        upload: ImageUpload,
    ) -> Result<String, UpstreamError> {
        let url = self.upload_url(project_id, collection_id, &upload);
        debug!("Uploading {} bytes to {}", upload.bytes.len(), url);

        let part = Part::bytes(upload.bytes)
            .file_name(upload.file_name)
            .mime_str("image/png")
            .map_err(|e| UpstreamError::transport("metadata/upload", e))?;
        let form = Form::new().part("file", part);

        let request = self
            .client
            .put(url)
            .bearer_auth(self.jwt.expose())
            .multipart(form);

        let uploaded: UploadedAsset = send_json(request, "metadata/upload").await?;
        Ok(uploaded.url)
    }
}

#[async_trait]
impl ImageSource for MetadataHttpApi {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, UpstreamError> {
        send_for_bytes(self.client.get(url), "image").await
    }
}
