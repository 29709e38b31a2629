use super::{
    AssetRecord, ImageSource, ImageUpload, MetadataApi, PublishedAsset, TokenIdentifiers,
    TokenRecord, DEFAULT_DESCRIPTION, IMAGE_FILE_NAME, IMAGE_METADATA_FIELD,
};
use crate::loot::Attribute;
use core_logic::{EntropySource, MetadataError};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Result of one publishing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome<T> {
    Ok(T),
    /// Logged and tolerated; publishing continued.
    NonFatal(MetadataError),
    /// Aborts the pipeline.
    Fatal(MetadataError),
}

impl<T> StepOutcome<T> {
    pub fn is_ok(&self) -> bool {
        matches!(self, StepOutcome::Ok(_))
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, StepOutcome::Fatal(_))
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            StepOutcome::Ok(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReport {
    pub identifiers: TokenIdentifiers,
    pub token: StepOutcome<()>,
    pub asset: StepOutcome<u64>,
    pub upload: StepOutcome<PublishedAsset>,
}

impl PublishReport {
    pub fn into_result(self) -> Result<PublishedAsset, MetadataError> {
        match self.upload {
            StepOutcome::Ok(asset) => Ok(asset),
            StepOutcome::NonFatal(e) | StepOutcome::Fatal(e) => Err(e),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataSettings {
    pub project_id: u64,
    pub collection_id: u64,
    pub description: String,
}

impl MetadataSettings {
    pub fn new(project_id: u64, collection_id: u64) -> Self {
        Self {
            project_id,
            collection_id,
            description: DEFAULT_DESCRIPTION.to_string(),
        }
    }
}

pub struct MetadataPublisher {
    api: Arc<dyn MetadataApi>,
    images: Arc<dyn ImageSource>,
    entropy: Arc<dyn EntropySource>,
    settings: MetadataSettings,
}

impl MetadataPublisher {
    pub fn new(
        api: Arc<dyn MetadataApi>,
        images: Arc<dyn ImageSource>,
        entropy: Arc<dyn EntropySource>,
        settings: MetadataSettings,
    ) -> Self {
        Self {
            api,
            images,
            entropy,
            settings,
        }
    }

    /// Registers token and asset records, then uploads the image.
    ///
    /// Only the upload step can be fatal.
    pub async fn publish(
        &self,
        name: &str,
        attributes: &[Attribute],
        image_url: &str,
    ) -> PublishReport {
        let identifiers = TokenIdentifiers::generate(self.entropy.as_ref());
        let token = self.register_token(&identifiers, name, attributes).await;
        let asset = self.register_asset(&identifiers).await;

        // fall back to the locally derived id when registration did not answer
        let asset_id = asset.value().copied().unwrap_or(identifiers.asset_id);
        let upload = self.upload_image(&identifiers, asset_id, image_url).await;

        PublishReport {
            identifiers,
            token,
            asset,
            upload,
        }
    }

    async fn register_token(
        &self,
        identifiers: &TokenIdentifiers,
        name: &str,
        attributes: &[Attribute],
    ) -> StepOutcome<()> {
        let record = TokenRecord {
            token_id: identifiers.token_id.clone(),
            name: name.to_string(),
            description: self.settings.description.clone(),
            decimals: 0,
            attributes: attributes.to_vec(),
        };

        match self
            .api
            .create_token(self.settings.project_id, self.settings.collection_id, &record)
            .await
        {
            Ok(()) => StepOutcome::Ok(()),
            Err(e) => {
                warn!("Error creating token {}: {}", identifiers.token_id, e);
                StepOutcome::NonFatal(MetadataError::TokenRegistration(e))
            }
        }
    }

    async fn register_asset(&self, identifiers: &TokenIdentifiers) -> StepOutcome<u64> {
        let record = AssetRecord {
            id: identifiers.asset_id,
            collection_id: self.settings.collection_id,
            token_id: identifiers.token_id.clone(),
            metadata_field: IMAGE_METADATA_FIELD.to_string(),
        };

        match self.api.create_asset(self.settings.project_id, &record).await {
            Ok(asset_id) => StepOutcome::Ok(asset_id),
            Err(e) => {
                warn!("Error creating asset {}: {}", identifiers.asset_id, e);
                StepOutcome::NonFatal(MetadataError::AssetRegistration(e))
            }
        }
    }

    async fn upload_image(
        &self,
        identifiers: &TokenIdentifiers,
        asset_id: u64,
        image_url: &str,
    ) -> StepOutcome<PublishedAsset> {
        let bytes = match self.images.fetch_image(image_url).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Failed to fetch image from {}: {}", image_url, e);
                return StepOutcome::Fatal(MetadataError::ImageFetch(e));
            }
        };

        let upload = ImageUpload {
            token_id: identifiers.token_id.clone(),
            asset_id,
            file_name: IMAGE_FILE_NAME.to_string(),
            bytes,
        };

        match self
            .api
            .upload_asset(self.settings.project_id, self.settings.collection_id, upload)
            .await
        {
            Ok(url) => {
                info!("Uploaded image for token {} to {}", identifiers.token_id, url);
                StepOutcome::Ok(PublishedAsset {
                    url,
                    token_id: identifiers.token_id.clone(),
                })
            }
            Err(e) => {
                error!("Error uploading image for token {}: {}", identifiers.token_id, e);
                StepOutcome::Fatal(MetadataError::Upload(e))
            }
        }
    }
}
