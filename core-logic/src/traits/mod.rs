use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::time::Duration;

/// Wall clock plus the only suspension point that is not a network call.
#[async_trait]
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;

    async fn sleep(&self, duration: Duration);
}

/// Randomness used for loot variant selection and token id generation.
pub trait EntropySource: Send + Sync {
    /// Fair coin. `true` picks the armor variant.
    fn coin_flip(&self) -> bool;

    fn fill_bytes(&self, dest: &mut [u8]);
}
