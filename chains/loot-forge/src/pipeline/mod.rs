//! # Pipeline Orchestrator
//!
//! Sequences the components for one incoming request:
//!
//! - generation: loot → inference submit → poll → metadata publish
//! - mint: allowance check → on-chain mint
//!
//! Steps run strictly one after another; there is no shared state between
//! requests.

use crate::config::LootForgeConfig;
use crate::inference::{InferenceApi, InferenceClient, InferencePoller, PollConfig};
use crate::loot::{GeneratedLoot, LootGenerator, LootSource};
use crate::metadata::{ImageSource, MetadataApi, MetadataPublisher, MetadataSettings};
use crate::mint::{
    IndexerApi, MintExecutor, MintRateLimiter, MintRequest, MintSigner, SessionSigner,
};
use crate::services::{
    build_http_client, IndexerHttpApi, LootApi, MetadataHttpApi, ScenarioApi,
};
use anyhow::Context;
use core_logic::{
    Clock, EntropySource, InferenceError, PipelineError, SystemClock, ThreadEntropy,
    RESULT_TARGET,
};
use ethers::types::Address;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// Request body at the system boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PipelineRequest {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "tokenID", default)]
    pub token_id: Option<TokenIdInput>,
    #[serde(default)]
    pub mint: bool,
}

/// Token ids arrive either as JSON numbers or decimal strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum TokenIdInput {
    Number(u64),
    Text(String),
}

impl TokenIdInput {
    pub fn as_decimal(&self) -> String {
        match self {
            TokenIdInput::Number(n) => n.to_string(),
            TokenIdInput::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationResponse {
    pub loot: GeneratedLoot,
    pub image: String,
    pub name: String,
    #[serde(rename = "tokenID")]
    pub token_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MintResponse {
    #[serde(rename = "txnHash")]
    pub txn_hash: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PipelineResponse {
    Minted(MintResponse),
    Generated(GenerationResponse),
}

/// Collaborator handles, one per external service.
#[derive(Clone)]
pub struct PipelineServices {
    pub loot: Arc<dyn LootSource>,
    pub inference: Arc<dyn InferenceApi>,
    pub metadata: Arc<dyn MetadataApi>,
    pub images: Arc<dyn ImageSource>,
    pub indexer: Arc<dyn IndexerApi>,
    pub signer: Arc<dyn MintSigner>,
    pub clock: Arc<dyn Clock>,
    pub entropy: Arc<dyn EntropySource>,
}

/// Everything the pipeline needs from configuration, fixed at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub poll: PollConfig,
    pub metadata: MetadataSettings,
    pub contract: Address,
    pub daily_mint_limit: u32,
    pub history_page_size: u32,
    /// Exempt from the daily allowance.
    pub admin: Option<Address>,
}

pub struct PipelineOrchestrator {
    generator: LootGenerator,
    inference: InferenceClient,
    poller: InferencePoller,
    publisher: MetadataPublisher,
    limiter: MintRateLimiter,
    executor: MintExecutor,
    admin: Option<Address>,
}

impl PipelineOrchestrator {
    pub fn new(services: PipelineServices, settings: PipelineSettings) -> Self {
        let contract_hex = format!("{:?}", settings.contract);

        Self {
            generator: LootGenerator::new(services.loot, services.entropy.clone()),
            inference: InferenceClient::new(services.inference.clone()),
            poller: InferencePoller::new(services.inference, services.clock.clone(), settings.poll),
            publisher: MetadataPublisher::new(
                services.metadata,
                services.images,
                services.entropy,
                settings.metadata,
            ),
            limiter: MintRateLimiter::new(
                services.indexer,
                services.clock,
                &contract_hex,
                settings.daily_mint_limit,
            )
            .with_page_size(settings.history_page_size),
            executor: MintExecutor::new(services.signer, settings.contract),
            admin: settings.admin,
        }
    }

    /// Wires the HTTP clients and the wallet session described by `config`.
    pub fn connect(config: &LootForgeConfig) -> anyhow::Result<Self> {
        let settings = config.pipeline_settings()?;
        let client = build_http_client(config.http_timeout())?;

        let metadata = Arc::new(MetadataHttpApi::new(
            client.clone(),
            config.metadata_base_url(),
            config.metadata.jwt_access_key.clone(),
        ));
        let signer = SessionSigner::open(&config.chain, &config.keys.signing_key)
            .context("Failed to open wallet session")?;

        let services = PipelineServices {
            loot: Arc::new(LootApi::new(client.clone(), config.loot_url.clone())),
            inference: Arc::new(ScenarioApi::new(
                client.clone(),
                &config.inference.base_url,
                &config.inference.model_id,
                config.inference.api_key.clone(),
            )),
            metadata: metadata.clone(),
            images: metadata,
            indexer: Arc::new(IndexerHttpApi::new(
                client,
                &config.chain.indexer_url(),
                config.project_access_key().clone(),
            )),
            signer: Arc::new(signer),
            clock: Arc::new(SystemClock),
            entropy: Arc::new(ThreadEntropy),
        };

        info!(
            "Pipeline ready: {:?} environment, chain {} ({}), contract {:?}",
            config.environment, config.chain.handle, config.chain.chain_id, settings.contract
        );
        Ok(Self::new(services, settings))
    }

    pub async fn handle(&self, request: PipelineRequest) -> Result<PipelineResponse, PipelineError> {
        if !request.mint {
            return self.generate().await.map(PipelineResponse::Generated);
        }

        let address = request
            .address
            .as_deref()
            .ok_or_else(|| PipelineError::InvalidRequest {
                reason: "mint requires an address".to_string(),
            })?;
        let token_id = request
            .token_id
            .as_ref()
            .ok_or_else(|| PipelineError::InvalidRequest {
                reason: "mint requires a tokenID".to_string(),
            })?;

        let mint_request = MintRequest::parse(address, &token_id.as_decimal())?;
        self.mint(&mint_request).await.map(PipelineResponse::Minted)
    }

    pub async fn generate(&self) -> Result<GenerationResponse, PipelineError> {
        let loot = self.generator.generate().await?;
        let token_name = loot.token_name();

        let job_id = self
            .inference
            .submit(&loot.loot.name)
            .await
            .ok_or(PipelineError::NoJobIdentifier)?;

        let images = self.poller.wait_for_images(&job_id).await?;
        let image_url = images
            .first()
            .map(|image| image.url.clone())
            .ok_or_else(|| InferenceError::NoImages {
                job_id: job_id.clone(),
            })?;

        let report = self
            .publisher
            .publish(&token_name, &loot.attributes, &image_url)
            .await;
        if !report.token.is_ok() || !report.asset.is_ok() {
            warn!(
                "Metadata registration for token {} was incomplete",
                report.identifiers.token_id
            );
        }
        let published = report.into_result()?;

        info!(
            target: RESULT_TARGET,
            "Generation SUCCESS: '{}' token {} image {}",
            token_name, published.token_id, published.url
        );

        Ok(GenerationResponse {
            name: loot.loot.name.clone(),
            loot,
            image: published.url,
            token_id: published.token_id,
        })
    }

    pub async fn mint(&self, request: &MintRequest) -> Result<MintResponse, PipelineError> {
        if !self.is_admin(&request.address) {
            self.ensure_allowance(&request.address).await?;
        }

        let tx_hash = self.executor.mint(request).await?;
        let txn_hash = format!("{:?}", tx_hash);

        info!(
            target: RESULT_TARGET,
            "Mint SUCCESS: token {} to {:?} tx {}",
            request.token_id, request.address, txn_hash
        );

        Ok(MintResponse { txn_hash })
    }

    pub async fn has_daily_mint_allowance(&self, address: &Address) -> Result<bool, PipelineError> {
        Ok(self
            .limiter
            .has_daily_mint_allowance(&format!("{:?}", address))
            .await?)
    }

    async fn ensure_allowance(&self, address: &Address) -> Result<(), PipelineError> {
        if self.has_daily_mint_allowance(address).await? {
            return Ok(());
        }

        warn!(
            target: RESULT_TARGET,
            "Mint FAILED: {:?} reached the daily limit of {}",
            address,
            self.limiter.daily_limit()
        );
        Err(PipelineError::DailyLimitExceeded {
            address: format!("{:?}", address),
            limit: self.limiter.daily_limit(),
        })
    }

    fn is_admin(&self, address: &Address) -> bool {
        self.admin.as_ref() == Some(address)
    }
}
