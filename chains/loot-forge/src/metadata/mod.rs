//! NFT metadata registration and image upload.

use crate::loot::Attribute;
use async_trait::async_trait;
use core_logic::UpstreamError;
use serde::{Deserialize, Serialize};

pub mod ids;
pub mod publisher;

pub use ids::TokenIdentifiers;
pub use publisher::{MetadataPublisher, MetadataSettings, PublishReport, StepOutcome};

pub const DEFAULT_DESCRIPTION: &str = "A free AI treasure chest mini-game";
pub const IMAGE_METADATA_FIELD: &str = "image";
pub const IMAGE_FILE_NAME: &str = "image.png";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRecord {
    pub token_id: String,
    pub name: String,
    pub description: String,
    pub decimals: u8,
    pub attributes: Vec<Attribute>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    pub id: u64,
    pub collection_id: u64,
    pub token_id: String,
    pub metadata_field: String,
}

/// Where a published image ended up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublishedAsset {
    pub url: String,
    #[serde(rename = "tokenID")]
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub token_id: String,
    pub asset_id: u64,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[async_trait]
pub trait MetadataApi: Send + Sync {
    async fn create_token(
        &self,
        project_id: u64,
        collection_id: u64,
        token: &TokenRecord,
    ) -> Result<(), UpstreamError>;

    /// Returns the id the service assigned to the asset.
    async fn create_asset(&self, project_id: u64, asset: &AssetRecord)
        -> Result<u64, UpstreamError>;

    /// Returns the public URL of the uploaded file.
    async fn upload_asset(
        &self,
        project_id: u64,
        collection_id: u64,
        upload: ImageUpload,
    ) -> Result<String, UpstreamError>;
}

/// Downloads rendered images by URL.
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch_image(&self, url: &str) -> Result<Vec<u8>, UpstreamError>;
}
