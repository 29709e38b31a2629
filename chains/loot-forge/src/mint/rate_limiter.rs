//! # Daily Mint Allowance
//!
//! Counts mint events for one address over the trailing 24 hours using the
//! chain indexer's transaction history. History arrives newest first, so
//! paging stops at the first record outside the window.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use core_logic::{Clock, UpstreamError};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const ZERO_ADDRESS: &str = "0x0000000000000000000000000000000000000000";
pub const HISTORY_PAGE_SIZE: u32 = 50;
pub const MINT_WINDOW_HOURS: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferRecord {
    pub from: String,
    pub contract_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: String,
    #[serde(default)]
    pub transfers: Vec<TransferRecord>,
}

/// Pagination state returned with each page. `after` is an opaque cursor.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PageInfo {
    #[serde(default)]
    pub after: Option<serde_json::Value>,
    #[serde(default)]
    pub more: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct TransactionPage {
    #[serde(default)]
    pub page: PageInfo,
    #[serde(default)]
    pub transactions: Vec<TransactionRecord>,
}

#[async_trait]
pub trait IndexerApi: Send + Sync {
    async fn transaction_history(
        &self,
        account: &str,
        page_size: u32,
        after: Option<&serde_json::Value>,
    ) -> Result<TransactionPage, UpstreamError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WindowPosition {
    Inside,
    Future,
    Expired,
}

fn window_position(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> WindowPosition {
    let age = now - timestamp;
    if age <= Duration::zero() {
        WindowPosition::Future
    } else if age < Duration::hours(MINT_WINDOW_HOURS) {
        WindowPosition::Inside
    } else {
        WindowPosition::Expired
    }
}

pub struct MintRateLimiter {
    indexer: Arc<dyn IndexerApi>,
    clock: Arc<dyn Clock>,
    contract: String,
    daily_limit: u32,
    page_size: u32,
}

impl MintRateLimiter {
    pub fn new(
        indexer: Arc<dyn IndexerApi>,
        clock: Arc<dyn Clock>,
        contract: &str,
        daily_limit: u32,
    ) -> Self {
        Self {
            indexer,
            clock,
            contract: contract.to_lowercase(),
            daily_limit,
            page_size: HISTORY_PAGE_SIZE,
        }
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn daily_limit(&self) -> u32 {
        self.daily_limit
    }

    /// Zero-address origin into the collectible contract.
    pub fn is_mint_event(&self, record: &TransactionRecord) -> bool {
        record.transfers.first().is_some_and(|transfer| {
            transfer.from.eq_ignore_ascii_case(ZERO_ADDRESS)
                && transfer.contract_address.to_lowercase() == self.contract
        })
    }

    pub async fn count_recent_mints(&self, address: &str) -> Result<u32, UpstreamError> {
        let now = self.clock.now();
        let mut after: Option<serde_json::Value> = None;
        let mut count = 0u32;
        let mut pages = 0u32;

        loop {
            let page = self
                .indexer
                .transaction_history(address, self.page_size, after.as_ref())
                .await?;
            pages += 1;

            let mut reached_cutoff = false;
            for record in &page.transactions {
                let timestamp = match DateTime::parse_from_rfc3339(&record.timestamp) {
                    Ok(ts) => ts.with_timezone(&Utc),
                    Err(e) => {
                        warn!(
                            "Skipping transaction with bad timestamp '{}': {}",
                            record.timestamp, e
                        );
                        continue;
                    }
                };

                match window_position(timestamp, now) {
                    WindowPosition::Inside => {
                        if self.is_mint_event(record) {
                            count += 1;
                        }
                    }
                    WindowPosition::Future => {}
                    WindowPosition::Expired => {
                        reached_cutoff = true;
                        break;
                    }
                }
            }

            if reached_cutoff || !page.page.more {
                break;
            }
            match page.page.after {
                Some(cursor) if !cursor.is_null() => after = Some(cursor),
                _ => break,
            }
        }

        debug!(
            "Counted {} mints for {} across {} history pages",
            count, address, pages
        );
        Ok(count)
    }

    pub async fn has_daily_mint_allowance(&self, address: &str) -> Result<bool, UpstreamError> {
        let count = self.count_recent_mints(address).await?;
        let allowed = count < self.daily_limit;
        info!(
            "Address {} minted {}/{} in the last {}h (allowed: {})",
            address, count, self.daily_limit, MINT_WINDOW_HOURS, allowed
        );
        Ok(allowed)
    }
}
