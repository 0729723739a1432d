//! Mochimo mesh SDK: transaction construction, one-time signing, and
//! submission.
//!
//! The SDK turns a transfer intent (sender, receiver, amount, fee) into
//! a submitted, signed transaction by combining:
//! - **Transport** ([`transport::MeshClient`]) for mesh node communication
//! - **Signing** ([`signer::OtsSigner`] behind a consuming
//!   [`signer::OneTimeSigner`] handle) for the WOTS+ one-time signature
//! - **The pipeline** ([`TransferPipeline`]) driving the Construction API
//!   step sequence and enforcing its invariants
//!
//! # Usage
//!
//! ```no_run
//! use config::NetworkConfig;
//! use sdk::{Sdk, SdkConfig, TransferRequest};
//! use sdk_core::types::AccountIdentifier;
//! use sdk_core::Network;
//! use signer::OneTimeSigner;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example(sender_key: impl signer::OtsSigner) -> Result<(), sdk::SdkError> {
//! let cancel = CancellationToken::new();
//! let sdk = Sdk::new(
//!     SdkConfig {
//!         network: NetworkConfig::for_network(Network::Mainnet),
//!         mesh: transport::MeshConfig::default(),
//!     },
//!     cancel.clone(),
//! )?;
//!
//! // Check the node is reachable and learn its capabilities.
//! let node = sdk.initialize().await?;
//! println!("node {}", node.options.version.node_version);
//!
//! // One pipeline per transfer; the signer handle is spent by run().
//! let pipeline = sdk.transfer(
//!     OneTimeSigner::new(sender_key),
//!     "..fresh change public key hex..",
//!     TransferRequest {
//!         destination: AccountIdentifier::new("..receiver.."),
//!         amount: 300_000_000,
//!         fee: 1_000,
//!     },
//! )?;
//!
//! let mut status = pipeline.subscribe();
//! let txid = pipeline.run().await?;
//! assert!(status.borrow_and_update().is_terminal());
//! println!("submitted {}", txid.hash);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod ledger;
pub mod operations;
pub mod status;

pub use error::SdkError;
pub use ledger::LedgerApi;
pub use operations::{TransferPipeline, TransferRequest};
pub use status::PipelineStatus;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use config::NetworkConfig;
use signer::{OneTimeSigner, OtsSigner, Sha256Hasher};
use transport::types::{NetworkOptionsResponse, NetworkStatusResponse};
use transport::{MeshClient, MeshConfig};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// SDK configuration.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    /// Network the SDK talks to.
    pub network: NetworkConfig,
    /// HTTP transport settings.
    pub mesh: MeshConfig,
}

/// Node state learned from [`Sdk::initialize`].
#[derive(Debug, Clone)]
pub struct NodeInfo {
    /// Current tip and genesis block.
    pub status: NetworkStatusResponse,
    /// Supported operations and the node's error catalog.
    pub options: NetworkOptionsResponse,
}

// ---------------------------------------------------------------------------
// Sdk
// ---------------------------------------------------------------------------

struct SdkInner {
    config: SdkConfig,
    client: MeshClient,
    cancel: CancellationToken,
}

/// The SDK entry point.
///
/// `Clone`-able (wraps an `Arc`). The mesh client inside is read-only
/// after construction and safe for concurrent use by any number of
/// transfer pipelines.
#[derive(Clone)]
pub struct Sdk {
    inner: Arc<SdkInner>,
}

impl std::fmt::Debug for Sdk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sdk")
            .field("client", &self.inner.client)
            .finish()
    }
}

impl Sdk {
    /// Creates a new SDK instance. No network I/O happens during
    /// construction.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::Transport`] if the HTTP client cannot be
    /// built from the given configuration.
    pub fn new(config: SdkConfig, cancel: CancellationToken) -> Result<Self, SdkError> {
        let client = MeshClient::new(config.network, config.mesh.clone())?;
        Ok(Self {
            inner: Arc::new(SdkInner {
                config,
                client,
                cancel,
            }),
        })
    }

    /// Returns the SDK configuration.
    pub fn config(&self) -> &SdkConfig {
        &self.inner.config
    }

    /// Returns the mesh client.
    pub fn client(&self) -> &MeshClient {
        &self.inner.client
    }

    /// Checks whether the SDK has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancel.is_cancelled()
    }

    /// Fetch tip and capabilities from the node.
    ///
    /// The two reads are independent, so they fan out concurrently and
    /// join before returning -- the only sanctioned parallelism in the
    /// SDK. Everything downstream of a transfer is strictly sequential.
    pub async fn initialize(&self) -> Result<NodeInfo, SdkError> {
        let (status, options) = tokio::try_join!(
            self.inner.client.network_status(),
            self.inner.client.network_options(),
        )?;
        Ok(NodeInfo { status, options })
    }

    /// Creates a single-use transfer pipeline.
    ///
    /// `change_address` must be the hex public key of a fresh one-time
    /// key. The pipeline shares this SDK's mesh client and cancellation
    /// token; cancelling the token aborts the pipeline at the next step
    /// boundary.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::AddressCollision`] if `sender` and
    /// `change_address` share an address.
    pub fn transfer<S: OtsSigner>(
        &self,
        sender: OneTimeSigner<S>,
        change_address: impl Into<String>,
        request: TransferRequest,
    ) -> Result<TransferPipeline<MeshClient, S, Sha256Hasher>, SdkError> {
        TransferPipeline::new(
            self.inner.client.clone(),
            sender,
            change_address,
            request,
            self.inner.config.network.currency(),
            Sha256Hasher,
            self.inner.cancel.clone(),
        )
    }
}
