use crate::inference::PollConfig;
use crate::metadata::{MetadataSettings, DEFAULT_DESCRIPTION};
use crate::mint::rate_limiter::HISTORY_PAGE_SIZE;
use crate::pipeline::PipelineSettings;
use crate::services::inference_api::SCENARIO_BASE_URL;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use core_logic::{ChainConfig, ConfigError, DeployEnvironment, Secret};
use ethers::types::Address;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

pub const DEFAULT_LOOT_URL: &str = "https://flask-production-2641.up.railway.app/";
pub const ENV_PREFIX: &str = "LOOT_FORGE";

#[derive(Debug, Deserialize, Clone)]
pub struct InferenceSection {
    #[serde(default = "default_inference_url")]
    pub base_url: String,
    pub model_id: String,
    /// Pre-encoded Basic credential.
    #[serde(default)]
    pub api_key: Secret,
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,
    #[serde(default = "default_poll_attempts")]
    pub max_poll_attempts: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetadataSection {
    pub project_id: u64,
    pub collection_id: u64,
    /// Overrides the environment's default metadata host.
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_description")]
    pub description: String,
    #[serde(default)]
    pub jwt_access_key: Secret,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct KeySection {
    #[serde(default)]
    pub signing_key: Secret,
    #[serde(default)]
    pub project_access_key_dev: Secret,
    #[serde(default)]
    pub project_access_key_prod: Secret,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LootForgeConfig {
    #[serde(default)]
    pub environment: DeployEnvironment,
    pub chain: ChainConfig,
    pub contract_address: String,
    #[serde(default)]
    pub admin_address: Option<String>,
    #[serde(default = "default_daily_limit")]
    pub daily_mint_limit: u32,
    #[serde(default = "default_page_size")]
    pub history_page_size: u32,
    #[serde(default = "default_loot_url")]
    pub loot_url: String,
    #[serde(default)]
    pub http_timeout_secs: Option<u64>,
    pub inference: InferenceSection,
    pub metadata: MetadataSection,
    #[serde(default)]
    pub keys: KeySection,
}

fn default_inference_url() -> String {
    SCENARIO_BASE_URL.to_string()
}

fn default_poll_interval() -> u64 {
    5
}

fn default_poll_attempts() -> u32 {
    120
}

fn default_description() -> String {
    DEFAULT_DESCRIPTION.to_string()
}

fn default_daily_limit() -> u32 {
    5
}

fn default_page_size() -> u32 {
    HISTORY_PAGE_SIZE
}

fn default_loot_url() -> String {
    DEFAULT_LOOT_URL.to_string()
}

fn missing(field: &str) -> ConfigError {
    ConfigError::MissingField {
        field: field.to_string(),
    }
}

fn parse_address(field: &str, value: &str) -> Result<Address, ConfigError> {
    Address::from_str(value.trim()).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}

impl LootForgeConfig {
    /// Reads the TOML file, then applies `LOOT_FORGE_*` environment overrides
    /// (nested keys joined with `__`, e.g. `LOOT_FORGE_KEYS__SIGNING_KEY`).
    pub fn load(path: &str) -> Result<Self> {
        let settings = Config::builder()
            .add_source(File::with_name(path))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .with_context(|| format!("Failed to read config from {}", path))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| anyhow::anyhow!(e))?;
        config.validate().context("Invalid configuration")?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Url::parse(&self.chain.rpc_endpoint).map_err(|_| ConfigError::InvalidRpcUrl {
            url: self.chain.rpc_endpoint.clone(),
        })?;
        if self.chain.handle.trim().is_empty() {
            return Err(missing("chain.handle"));
        }

        parse_address("contract_address", &self.contract_address)?;
        if let Some(admin) = &self.admin_address {
            parse_address("admin_address", admin)?;
        }

        if self.inference.model_id.trim().is_empty() {
            return Err(missing("inference.model_id"));
        }
        if self.inference.api_key.is_empty() {
            return Err(missing("inference.api_key"));
        }
        if self.inference.max_poll_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "inference.max_poll_attempts".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.history_page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "history_page_size".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }

        if self.metadata.jwt_access_key.is_empty() {
            return Err(missing("metadata.jwt_access_key"));
        }
        if self.keys.signing_key.is_empty() {
            return Err(missing("keys.signing_key"));
        }
        if self.project_access_key().is_empty() {
            let field = if self.environment.is_dev() {
                "keys.project_access_key_dev"
            } else {
                "keys.project_access_key_prod"
            };
            return Err(missing(field));
        }

        Ok(())
    }

    pub fn project_access_key(&self) -> &Secret {
        match self.environment {
            DeployEnvironment::Dev => &self.keys.project_access_key_dev,
            DeployEnvironment::Prod => &self.keys.project_access_key_prod,
        }
    }

    pub fn metadata_base_url(&self) -> &str {
        self.metadata
            .base_url
            .as_deref()
            .unwrap_or_else(|| self.environment.metadata_base_url())
    }

    pub fn http_timeout(&self) -> Option<Duration> {
        self.http_timeout_secs.map(Duration::from_secs)
    }

    pub fn poll_config(&self) -> PollConfig {
        PollConfig {
            interval: Duration::from_secs(self.inference.poll_interval_secs),
            max_attempts: self.inference.max_poll_attempts,
        }
    }

    pub fn pipeline_settings(&self) -> Result<PipelineSettings, ConfigError> {
        let admin = self
            .admin_address
            .as_deref()
            .map(|admin| parse_address("admin_address", admin))
            .transpose()?;

        Ok(PipelineSettings {
            poll: self.poll_config(),
            metadata: MetadataSettings {
                project_id: self.metadata.project_id,
                collection_id: self.metadata.collection_id,
                description: self.metadata.description.clone(),
            },
            contract: parse_address("contract_address", &self.contract_address)?,
            daily_mint_limit: self.daily_mint_limit,
            history_page_size: self.history_page_size,
            admin,
        })
    }
}
