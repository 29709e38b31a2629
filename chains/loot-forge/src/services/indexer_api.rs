use super::send_json;
use crate::mint::{IndexerApi, TransactionPage};
use async_trait::async_trait;
use core_logic::{Secret, UpstreamError};
use reqwest::Client;
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryFilter<'a> {
    account_address: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct HistoryPage<'a> {
    page_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    after: Option<&'a serde_json::Value>,
}

#[derive(Serialize)]
struct HistoryRequest<'a> {
    filter: HistoryFilter<'a>,
    page: HistoryPage<'a>,
}

/// Hosted chain indexer, queried for per-account transaction history.
pub struct IndexerHttpApi {
    client: Client,
    base_url: String,
    access_key: Secret,
}

impl IndexerHttpApi {
    pub fn new(client: Client, base_url: &str, access_key: Secret) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_key,
        }
    }

    fn history_url(&self) -> String {
        format!("{}/rpc/Indexer/GetTransactionHistory", self.base_url)
    }
}

#[async_trait]
impl IndexerApi for IndexerHttpApi {
    async fn transaction_history(
        &self,
        account: &str,
        page_size: u32,
        after: Option<&serde_json::Value>,
    ) -> Result<TransactionPage, UpstreamError> {
        let body = HistoryRequest {
            filter: HistoryFilter {
                account_address: account,
            },
            page: HistoryPage { page_size, after },
        };

        let request = self
            .client
            .post(self.history_url())
            .header("X-Access-Key", self.access_key.expose())
            .json(&body);

        send_json(request, "indexer").await
    }
}
