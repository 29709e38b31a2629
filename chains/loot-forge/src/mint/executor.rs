use super::{MintRequest, MintSigner};
use async_trait::async_trait;
use core_logic::{ChainConfig, MintError, Secret};
use ethers::abi::{parse_abi, Token};
use ethers::prelude::*;
use reqwest::Client;
use std::sync::Arc;
use tracing::{error, info};
use url::Url;

/// ERC-1155 mint entry point exposed by the collectible contract.
pub const MINT_SIGNATURE: &str =
    "function mint(address to, uint256 tokenId, uint256 amount, bytes data)";

/// ABI-encodes `mint(to, tokenId, 1, "")`.
pub fn encode_mint_call(request: &MintRequest) -> Result<Bytes, MintError> {
    let abi = parse_abi(&[MINT_SIGNATURE]).map_err(|e| MintError::Encoding {
        reason: e.to_string(),
    })?;
    let function = abi.function("mint").map_err(|e| MintError::Encoding {
        reason: e.to_string(),
    })?;

    let data = function
        .encode_input(&[
            Token::Address(request.address),
            Token::Uint(request.token_id),
            Token::Uint(U256::one()),
            Token::Bytes(Vec::new()),
        ])
        .map_err(|e| MintError::Encoding {
            reason: e.to_string(),
        })?;

    Ok(Bytes::from(data))
}

pub struct MintExecutor {
    signer: Arc<dyn MintSigner>,
    contract: Address,
}

impl MintExecutor {
    pub fn new(signer: Arc<dyn MintSigner>, contract: Address) -> Self {
        Self { signer, contract }
    }

    /// Submits one mint. Failures are logged and returned, never retried.
    pub async fn mint(&self, request: &MintRequest) -> Result<H256, MintError> {
        let data = encode_mint_call(request)?;

        match self.signer.send_transaction(self.contract, data).await {
            Ok(tx_hash) => {
                info!(
                    "Mint of token {} to {:?} submitted: {:?}",
                    request.token_id, request.address, tx_hash
                );
                Ok(tx_hash)
            }
            Err(e) => {
                error!(
                    "Mint of token {} to {:?} failed: {}",
                    request.token_id, request.address, e
                );
                Err(e)
            }
        }
    }
}

/// Wallet session for the server's signing key on the configured chain.
pub struct SessionSigner {
    client: SignerMiddleware<Provider<Http>, LocalWallet>,
}

impl SessionSigner {
    pub fn open(chain: &ChainConfig, signing_key: &Secret) -> Result<Self, MintError> {
        let url = Url::parse(&chain.rpc_endpoint).map_err(|e| MintError::Session {
            reason: format!("invalid RPC URL '{}': {}", chain.rpc_endpoint, e),
        })?;
        let provider = Provider::new(Http::new_with_client(url, Client::new()));

        let wallet = signing_key
            .expose()
            .trim()
            .parse::<LocalWallet>()
            .map_err(|e| MintError::Session {
                reason: format!("invalid signing key: {}", e),
            })?
            .with_chain_id(chain.chain_id);

        info!(
            "Opened wallet session for {:?} on chain {}",
            wallet.address(),
            chain.chain_id
        );

        Ok(Self {
            client: SignerMiddleware::new(provider, wallet),
        })
    }

    pub fn address(&self) -> Address {
        self.client.address()
    }
}

#[async_trait]
impl MintSigner for SessionSigner {
    async fn send_transaction(&self, to: Address, data: Bytes) -> Result<H256, MintError> {
        let tx = Eip1559TransactionRequest::new()
            .from(self.client.address())
            .to(to)
            .data(data);

        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| MintError::Submission {
                reason: e.to_string(),
            })?;

        Ok(pending.tx_hash())
    }
}
