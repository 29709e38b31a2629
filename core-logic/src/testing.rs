//! Deterministic stand-ins for [`Clock`] and [`EntropySource`].
//!
//! Enabled for downstream test suites with the `testing` feature.

use crate::traits::{Clock, EntropySource};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

/// Clock that never blocks. `sleep` records the request and advances `now`.
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
    sleeps: Mutex<Vec<Duration>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
            sleeps: Mutex::new(Vec::new()),
        }
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(|e| e.into_inner());
        *now += chrono::Duration::from_std(by).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

#[async_trait]
impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap_or_else(|e| e.into_inner())
    }

    async fn sleep(&self, duration: Duration) {
        self.sleeps
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(duration);
        self.advance(duration);
    }
}

/// Scripted coin flips and a fixed byte pattern.
///
/// Once the scripted flips run out, `coin_flip` keeps returning the last one.
#[derive(Debug)]
pub struct FixedEntropy {
    flips: Mutex<VecDeque<bool>>,
    last_flip: Mutex<bool>,
    bytes: Vec<u8>,
}

impl FixedEntropy {
    pub fn new(flips: impl IntoIterator<Item = bool>, bytes: Vec<u8>) -> Self {
        Self {
            flips: Mutex::new(flips.into_iter().collect()),
            last_flip: Mutex::new(false),
            bytes,
        }
    }

    /// Always picks armor (`true`) or weapon (`false`).
    pub fn always(flip: bool) -> Self {
        Self::new([flip], vec![0x42; 20])
    }
}

impl EntropySource for FixedEntropy {
    fn coin_flip(&self) -> bool {
        let mut last = self.last_flip.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(next) = self
            .flips
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
        {
            *last = next;
        }
        *last
    }

    fn fill_bytes(&self, dest: &mut [u8]) {
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = if self.bytes.is_empty() {
                0
            } else {
                self.bytes[i % self.bytes.len()]
            };
        }
    }
}
