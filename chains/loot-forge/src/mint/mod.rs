//! On-chain minting and the daily per-address allowance.

use async_trait::async_trait;
use core_logic::MintError;
use ethers::types::{Address, Bytes, H256, U256};
use std::str::FromStr;

pub mod executor;
pub mod rate_limiter;

pub use executor::{encode_mint_call, MintExecutor, SessionSigner};
pub use rate_limiter::{IndexerApi, MintRateLimiter, TransactionPage, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintRequest {
    pub address: Address,
    pub token_id: U256,
}

impl MintRequest {
    /// Builds a request from boundary strings. The token id is decimal.
    pub fn parse(address: &str, token_id: &str) -> Result<Self, MintError> {
        let address = Address::from_str(address.trim()).map_err(|_| MintError::InvalidAddress {
            address: address.to_string(),
        })?;
        let token_id = U256::from_dec_str(token_id.trim()).map_err(|e| MintError::Encoding {
            reason: format!("token id '{}': {}", token_id, e),
        })?;
        Ok(Self { address, token_id })
    }
}

/// Transaction-capable signer bound to one chain.
#[async_trait]
pub trait MintSigner: Send + Sync {
    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<H256, MintError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_mint_request() {
        let request =
            MintRequest::parse("0x00000000000000000000000000000000000000aa", "12345").unwrap();
        assert_eq!(request.token_id, U256::from(12345));
        assert_eq!(request.address, Address::from_low_u64_be(0xaa));
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(
            MintRequest::parse("not-an-address", "1"),
            Err(MintError::InvalidAddress { .. })
        ));
        assert!(matches!(
            MintRequest::parse("0x00000000000000000000000000000000000000aa", "abc"),
            Err(MintError::Encoding { .. })
        ));
    }
}
