use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

const DEV_METADATA_URL: &str = "https://dev-metadata.sequence.app";
const PROD_METADATA_URL: &str = "https://metadata.sequence.app";

/// Deployment target. Resolved once at startup and never switched afterwards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeployEnvironment {
    #[default]
    Dev,
    Prod,
}

impl DeployEnvironment {
    pub fn metadata_base_url(&self) -> &'static str {
        match self {
            DeployEnvironment::Dev => DEV_METADATA_URL,
            DeployEnvironment::Prod => PROD_METADATA_URL,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, DeployEnvironment::Dev)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Network handle used by the hosted indexer, e.g. `arbitrum-nova`.
    pub handle: String,
    pub rpc_endpoint: String,
    pub chain_id: u64,
}

impl ChainConfig {
    pub fn indexer_url(&self) -> String {
        format!("https://{}-indexer.sequence.app", self.handle)
    }
}

/// A credential loaded from config or the environment.
///
/// Debug output is redacted and the buffer is wiped on drop.
#[derive(Clone, Default, PartialEq, Eq, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "Secret(<empty>)")
        } else {
            write!(f, "Secret(***)")
        }
    }
}
