use super::send_json;
use crate::loot::{LootPayload, LootSource};
use async_trait::async_trait;
use core_logic::UpstreamError;
use reqwest::Client;
use tracing::debug;

/// Loot roll endpoint. One GET returns both an armor and a weapon.
pub struct LootApi {
    client: Client,
    url: String,
}

impl LootApi {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }
}

#[async_trait]
impl LootSource for LootApi {
    async fn fetch_loot(&self) -> Result<LootPayload, UpstreamError> {
        debug!("Fetching loot from {}", self.url);
        send_json(self.client.get(&self.url), "loot").await
    }
}
