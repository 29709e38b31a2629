#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use core_logic::testing::{FixedEntropy, ManualClock};
use core_logic::{MintError, UpstreamError};
use ethers::types::{Address, Bytes, H256};
use loot_forge::inference::{InferenceApi, InferenceJob, InferenceParameters, PollConfig};
use loot_forge::loot::{LootPayload, LootSource};
use loot_forge::metadata::{
    AssetRecord, ImageSource, ImageUpload, MetadataApi, MetadataSettings, TokenRecord,
};
use loot_forge::mint::rate_limiter::ZERO_ADDRESS;
use loot_forge::mint::{IndexerApi, MintSigner, TransactionPage};
use loot_forge::{PipelineServices, PipelineSettings};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

pub const CONTRACT: &str = "0x00000000000000000000000000000000000c0ffe";
pub const MINTER: &str = "0x00000000000000000000000000000000000000aa";
pub const ADMIN: &str = "0x00000000000000000000000000000000000000ad";

pub fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap()
}

pub fn hours_ago(hours: i64) -> String {
    (now() - Duration::hours(hours)).to_rfc3339()
}

pub fn upstream(status_code: u16) -> UpstreamError {
    UpstreamError::HttpStatus {
        status_code,
        endpoint: "fake".to_string(),
    }
}

pub fn loot_payload() -> serde_json::Value {
    serde_json::json!({
        "armor": {
            "category": "Helm",
            "name": "Iron",
            "type": "Cap",
            "tier": "Common",
            "main_stats": ["Armor +10"],
            "stats": []
        },
        "weapon": {
            "category": "Blade",
            "name": "Fury",
            "type": "Sword",
            "tier": "Epic",
            "main_stats": ["Damage: 10-20"],
            "stats": ["Crit Chance 5%"]
        }
    })
}

pub struct FakeLoot(pub serde_json::Value);

#[async_trait]
impl LootSource for FakeLoot {
    async fn fetch_loot(&self) -> Result<LootPayload, UpstreamError> {
        serde_json::from_value(self.0.clone()).map_err(|e| UpstreamError::invalid_response("loot", e))
    }
}

/// Replays a fixed list of job statuses; the last one repeats.
pub struct ScriptedInference {
    pub job_id: Option<String>,
    statuses: Mutex<VecDeque<&'static str>>,
    pub prompts: Mutex<Vec<String>>,
    pub fetches: Mutex<u32>,
}

impl ScriptedInference {
    pub fn new(job_id: Option<&str>, statuses: &[&'static str]) -> Self {
        Self {
            job_id: job_id.map(str::to_string),
            statuses: Mutex::new(statuses.iter().copied().collect()),
            prompts: Mutex::new(Vec::new()),
            fetches: Mutex::new(0),
        }
    }

    pub fn fetch_count(&self) -> u32 {
        *self.fetches.lock().unwrap()
    }
}

#[async_trait]
impl InferenceApi for ScriptedInference {
    async fn create_inference(
        &self,
        parameters: &InferenceParameters,
    ) -> Result<String, UpstreamError> {
        self.prompts.lock().unwrap().push(parameters.prompt.clone());
        self.job_id.clone().ok_or_else(|| upstream(503))
    }

    async fn get_inference(&self, job_id: &str) -> Result<InferenceJob, UpstreamError> {
        *self.fetches.lock().unwrap() += 1;
        let mut statuses = self.statuses.lock().unwrap();
        let status = if statuses.len() > 1 {
            statuses.pop_front().unwrap()
        } else {
            statuses.front().copied().unwrap_or("queued")
        };

        let images = if status == "succeeded" {
            serde_json::json!([{ "url": "https://cdn.example.com/render.png" }])
        } else {
            serde_json::json!([])
        };
        Ok(serde_json::from_value(serde_json::json!({
            "id": job_id,
            "status": status,
            "images": images
        }))
        .unwrap())
    }
}

#[derive(Default)]
pub struct RecordingMetadata {
    pub fail_token: bool,
    pub fail_upload: bool,
    pub tokens: Mutex<Vec<TokenRecord>>,
    pub assets: Mutex<Vec<AssetRecord>>,
    pub uploads: Mutex<Vec<ImageUpload>>,
}

#[async_trait]
impl MetadataApi for RecordingMetadata {
    async fn create_token(
        &self,
        _project_id: u64,
        _collection_id: u64,
        token: &TokenRecord,
    ) -> Result<(), UpstreamError> {
        self.tokens.lock().unwrap().push(token.clone());
        if self.fail_token {
            Err(upstream(500))
        } else {
            Ok(())
        }
    }

    async fn create_asset(&self, _project_id: u64, asset: &AssetRecord) -> Result<u64, UpstreamError> {
        self.assets.lock().unwrap().push(asset.clone());
        Ok(asset.id)
    }

    async fn upload_asset(
        &self,
        _project_id: u64,
        _collection_id: u64,
        upload: ImageUpload,
    ) -> Result<String, UpstreamError> {
        let url = format!("https://metadata.example.com/{}/image.png", upload.token_id);
        self.uploads.lock().unwrap().push(upload);
        if self.fail_upload {
            Err(upstream(500))
        } else {
            Ok(url)
        }
    }
}

pub struct StaticImages;

#[async_trait]
impl ImageSource for StaticImages {
    async fn fetch_image(&self, _url: &str) -> Result<Vec<u8>, UpstreamError> {
        Ok(vec![0x89, b'P', b'N', b'G'])
    }
}

/// Serves pre-built history pages in order and records each cursor it saw.
#[derive(Default)]
pub struct ScriptedIndexer {
    pages: Mutex<VecDeque<serde_json::Value>>,
    pub cursors: Mutex<Vec<Option<serde_json::Value>>>,
}

impl ScriptedIndexer {
    pub fn new(pages: Vec<serde_json::Value>) -> Self {
        Self {
            pages: Mutex::new(pages.into()),
            cursors: Mutex::new(Vec::new()),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.cursors.lock().unwrap().len()
    }
}

#[async_trait]
impl IndexerApi for ScriptedIndexer {
    async fn transaction_history(
        &self,
        _account: &str,
        _page_size: u32,
        after: Option<&serde_json::Value>,
    ) -> Result<TransactionPage, UpstreamError> {
        self.cursors.lock().unwrap().push(after.cloned());
        let page = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| serde_json::json!({ "page": { "more": false }, "transactions": [] }));
        serde_json::from_value(page).map_err(|e| UpstreamError::invalid_response("indexer", e))
    }
}

pub fn mint_tx(timestamp: String, contract: &str) -> serde_json::Value {
    serde_json::json!({
        "timestamp": timestamp,
        "transfers": [{ "from": ZERO_ADDRESS, "contractAddress": contract }]
    })
}

pub fn transfer_tx(timestamp: String, from: &str) -> serde_json::Value {
    serde_json::json!({
        "timestamp": timestamp,
        "transfers": [{ "from": from, "contractAddress": CONTRACT }]
    })
}

pub fn page(transactions: Vec<serde_json::Value>, after: Option<i64>) -> serde_json::Value {
    serde_json::json!({
        "page": {
            "more": after.is_some(),
            "after": after.map(|id| serde_json::json!({ "id": id }))
        },
        "transactions": transactions
    })
}

#[derive(Default)]
pub struct RecordingSigner {
    pub fail: bool,
    pub sent: Mutex<Vec<(Address, Bytes)>>,
}

#[async_trait]
impl MintSigner for RecordingSigner {
    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<H256, MintError> {
        self.sent.lock().unwrap().push((to, data));
        if self.fail {
            Err(MintError::Submission {
                reason: "nonce too low".to_string(),
            })
        } else {
            Ok(H256::from_low_u64_be(0x1234))
        }
    }
}

/// In-memory collaborators for one orchestrator, kept so tests can inspect them.
pub struct Harness {
    pub loot: Arc<FakeLoot>,
    pub inference: Arc<ScriptedInference>,
    pub metadata: Arc<RecordingMetadata>,
    pub indexer: Arc<ScriptedIndexer>,
    pub signer: Arc<RecordingSigner>,
    pub clock: Arc<ManualClock>,
    pub entropy: Arc<FixedEntropy>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            loot: Arc::new(FakeLoot(loot_payload())),
            inference: Arc::new(ScriptedInference::new(
                Some("job-1"),
                &["queued", "in-progress", "succeeded"],
            )),
            metadata: Arc::new(RecordingMetadata::default()),
            indexer: Arc::new(ScriptedIndexer::default()),
            signer: Arc::new(RecordingSigner::default()),
            clock: Arc::new(ManualClock::new(now())),
            entropy: Arc::new(FixedEntropy::always(false)),
        }
    }

    pub fn services(&self) -> PipelineServices {
        PipelineServices {
            loot: self.loot.clone(),
            inference: self.inference.clone(),
            metadata: self.metadata.clone(),
            images: Arc::new(StaticImages),
            indexer: self.indexer.clone(),
            signer: self.signer.clone(),
            clock: self.clock.clone(),
            entropy: self.entropy.clone(),
        }
    }
}

pub fn settings(daily_mint_limit: u32, admin: Option<&str>) -> PipelineSettings {
    PipelineSettings {
        poll: PollConfig {
            interval: std::time::Duration::from_secs(5),
            max_attempts: 10,
        },
        metadata: MetadataSettings::new(7, 11),
        contract: CONTRACT.parse().unwrap(),
        daily_mint_limit,
        history_page_size: 50,
        admin: admin.map(|a| a.parse().unwrap()),
    }
}
