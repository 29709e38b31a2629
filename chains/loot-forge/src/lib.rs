//! Loot Forge - loot generation, AI artwork and NFT minting
//!
//! One request either produces a new collectible or mints an existing one:
//!
//! - **Generation**: roll a loot item, derive its attribute list, render an
//!   image through the inference service, then register token metadata and
//!   upload the image.
//! - **Mint**: check the caller's trailing 24h allowance against the chain
//!   indexer, then submit an ERC-1155 `mint` through the server wallet.
//!
//! # Architecture
//!
//! - **[`loot`]**: stat string parsing and attribute assembly
//! - **[`inference`]**: job submission and the bounded status poller
//! - **[`metadata`]**: token id generation and the publishing steps
//! - **[`mint`]**: mint call encoding, wallet session and the daily limiter
//! - **[`services`]**: `reqwest` clients for the collaborator APIs
//! - **[`pipeline`]**: the orchestrator that sequences a request
//!
//! Every external collaborator sits behind an `async_trait` seam, so the
//! pipeline can be driven entirely by in-memory fakes.
//!
//! # Quick Start
//!
//! ```bash
//! cargo run -p loot-forge -- generate
//! cargo run -p loot-forge -- allowance --address 0x...
//! cargo run -p loot-forge -- request --json '{"address":"0x...","tokenID":"1","mint":true}'
//! ```

pub mod config;
pub mod inference;
pub mod loot;
pub mod metadata;
pub mod mint;
pub mod pipeline;
pub mod services;

pub use config::LootForgeConfig;
pub use pipeline::{
    PipelineOrchestrator, PipelineRequest, PipelineResponse, PipelineServices, PipelineSettings,
};
