//! HTTP client for the mesh Construction API.
//!
//! [`MeshClient`] wraps one remote endpoint. Each method is a single POST
//! of a JSON body containing at minimum the `network_identifier`, plus
//! path-specific fields. The client performs no interpretation of
//! ledger-specific error codes -- a non-2xx status or an unparseable
//! body surfaces as a [`MeshError`] carrying the raw response text, and
//! the caller decides what it means.
//!
//! # Example
//!
//! ```no_run
//! use config::NetworkConfig;
//! use sdk_core::Network;
//! use transport::{MeshClient, MeshConfig};
//!
//! # async fn example() -> Result<(), transport::MeshError> {
//! let client = MeshClient::new(
//!     NetworkConfig::for_network(Network::Mainnet),
//!     MeshConfig::default(),
//! )?;
//!
//! let status = client.network_status().await?;
//! println!("tip: {:?}", status.current_block_identifier);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use config::{constants, NetworkConfig};
use sdk_core::types::{
    AccountIdentifier, BlockIdentifier, NetworkIdentifier, Operation, PublicKey, Signature,
};

use crate::types::*;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from the mesh HTTP transport layer.
#[derive(Debug, thiserror::Error)]
pub enum MeshError {
    /// The client could not be constructed (bad timeout, TLS setup).
    #[error("invalid mesh client configuration: {0}")]
    InvalidConfig(String),

    /// The HTTP request failed before a response arrived (DNS, connect,
    /// timeout).
    #[error("mesh request failed: {0}")]
    Request(#[source] reqwest::Error),

    /// The node answered with a non-2xx status. The raw body is kept
    /// intact for diagnostics; ledger error payloads are not interpreted
    /// here.
    #[error("mesh API error: status={status} body={body}")]
    Api {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },

    /// The response was 2xx but could not be parsed as the expected JSON.
    #[error("mesh response parse error: status={status} body={body}")]
    Decode {
        /// HTTP status of the response.
        status: StatusCode,
        /// Raw response body.
        body: String,
    },
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Configuration for the mesh HTTP transport.
///
/// All timeouts have sensible defaults. Adjust based on network
/// conditions and node SLAs.
#[derive(Debug, Clone)]
pub struct MeshConfig {
    /// TCP + TLS handshake timeout. Default: 10 s.
    pub connect_timeout: Duration,

    /// Per-request timeout. Default: 30 s.
    pub request_timeout: Duration,

    /// `User-Agent` header sent with every request.
    pub user_agent: &'static str,
}

impl Default for MeshConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_millis(constants::DEFAULT_CONNECT_TIMEOUT_MS),
            request_timeout: Duration::from_millis(constants::DEFAULT_REQUEST_TIMEOUT_MS),
            user_agent: concat!("mesh-sdk-rs/", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl MeshConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> MeshConfigBuilder {
        MeshConfigBuilder::default()
    }
}

/// Builder for [`MeshConfig`].
#[derive(Debug, Default)]
pub struct MeshConfigBuilder {
    connect_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
    user_agent: Option<&'static str>,
}

impl MeshConfigBuilder {
    /// Sets the TCP + TLS connection timeout.
    pub fn connect_timeout(mut self, d: Duration) -> Self {
        self.connect_timeout = Some(d);
        self
    }

    /// Sets the per-request timeout.
    pub fn request_timeout(mut self, d: Duration) -> Self {
        self.request_timeout = Some(d);
        self
    }

    /// Sets the `User-Agent` header.
    pub fn user_agent(mut self, ua: &'static str) -> Self {
        self.user_agent = Some(ua);
        self
    }

    /// Builds the configuration, falling back to defaults for unset fields.
    pub fn build(self) -> MeshConfig {
        let defaults = MeshConfig::default();
        MeshConfig {
            connect_timeout: self.connect_timeout.unwrap_or(defaults.connect_timeout),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            user_agent: self.user_agent.unwrap_or(defaults.user_agent),
        }
    }
}

// ---------------------------------------------------------------------------
// MeshClient
// ---------------------------------------------------------------------------

/// Typed client for one mesh API endpoint.
///
/// Owns the network identifier and base URL, both fixed at construction.
/// All methods take `&self`; the client is safe to share across
/// concurrent transfer pipelines.
#[derive(Debug, Clone)]
pub struct MeshClient {
    http: reqwest::Client,
    base_url: String,
    network: NetworkIdentifier,
}

impl MeshClient {
    /// Creates a client for a built-in network configuration.
    pub fn new(network: NetworkConfig, config: MeshConfig) -> Result<Self, MeshError> {
        Self::with_base_url(network.api_url, network.network_identifier(), config)
    }

    /// Creates a client against an explicit base URL (e.g. a local node).
    pub fn with_base_url(
        base_url: impl Into<String>,
        network: NetworkIdentifier,
        config: MeshConfig,
    ) -> Result<Self, MeshError> {
        let http = reqwest::Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.request_timeout)
            .user_agent(config.user_agent)
            .build()
            .map_err(|e| MeshError::InvalidConfig(e.to_string()))?;

        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }

        Ok(Self {
            http,
            base_url,
            network,
        })
    }

    /// The network identifier sent with every request.
    pub fn network_identifier(&self) -> &NetworkIdentifier {
        &self.network
    }

    /// The base URL requests are addressed to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// POST a JSON body and decode the JSON response.
    async fn post<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<R, MeshError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(url = %url, "mesh_request_start");

        let response = self
            .http
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                error!(url = %url, error = %e, "mesh_http_send_error");
                MeshError::Request(e)
            })?;

        let status = response.status();
        let text = response.text().await.map_err(MeshError::Request)?;

        if !status.is_success() {
            error!(url = %url, status = %status, body = %text, "mesh_api_error");
            return Err(MeshError::Api { status, body: text });
        }

        serde_json::from_str(&text).map_err(|e| {
            error!(url = %url, status = %status, error = %e, "mesh_json_parse_error");
            MeshError::Decode { status, body: text }
        })
    }

    fn network_body(&self) -> NetworkRequest {
        NetworkRequest {
            network_identifier: self.network.clone(),
        }
    }

    // -----------------------------------------------------------------------
    // Data API
    // -----------------------------------------------------------------------

    /// `/network/status` -- current tip and genesis block.
    pub async fn network_status(&self) -> Result<NetworkStatusResponse, MeshError> {
        self.post("/network/status", &self.network_body()).await
    }

    /// `/network/options` -- supported operation types and error catalog.
    pub async fn network_options(&self) -> Result<NetworkOptionsResponse, MeshError> {
        self.post("/network/options", &self.network_body()).await
    }

    /// `/block` -- fetch a block by index and/or hash.
    pub async fn block(&self, identifier: BlockIdentifier) -> Result<BlockResponse, MeshError> {
        self.post(
            "/block",
            &BlockRequest {
                network_identifier: self.network.clone(),
                block_identifier: identifier,
            },
        )
        .await
    }

    /// `/account/balance` -- balance of one account at the current tip.
    pub async fn account_balance(
        &self,
        address: &str,
    ) -> Result<AccountBalanceResponse, MeshError> {
        self.post(
            "/account/balance",
            &AccountBalanceRequest {
                network_identifier: self.network.clone(),
                account_identifier: AccountIdentifier::new(address),
            },
        )
        .await
    }

    /// `/mempool` -- transaction identifiers currently in the mempool.
    pub async fn mempool(&self) -> Result<MempoolResponse, MeshError> {
        self.post("/mempool", &self.network_body()).await
    }

    // -----------------------------------------------------------------------
    // Construction API
    // -----------------------------------------------------------------------

    /// `/construction/derive` -- resolve a public key to an account.
    pub async fn derive(
        &self,
        public_key_hex: &str,
        curve_type: &str,
    ) -> Result<DeriveResponse, MeshError> {
        self.post(
            "/construction/derive",
            &DeriveRequest {
                network_identifier: self.network.clone(),
                public_key: PublicKey {
                    hex_bytes: public_key_hex.to_owned(),
                    curve_type: curve_type.to_owned(),
                },
            },
        )
        .await
    }

    /// `/construction/preprocess` -- required signers and metadata options.
    pub async fn preprocess(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
    ) -> Result<PreprocessResponse, MeshError> {
        self.post(
            "/construction/preprocess",
            &PreprocessRequest {
                network_identifier: self.network.clone(),
                operations,
                metadata,
            },
        )
        .await
    }

    /// `/construction/metadata` -- ledger state needed to finish building
    /// the transaction (source balance, nonce, suggested fee).
    pub async fn metadata(
        &self,
        options: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> Result<MetadataResponse, MeshError> {
        self.post(
            "/construction/metadata",
            &MetadataRequest {
                network_identifier: self.network.clone(),
                options,
                public_keys,
            },
        )
        .await
    }

    /// `/construction/payloads` -- unsigned transaction plus one signing
    /// payload per required signer.
    pub async fn payloads(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> Result<PayloadsResponse, MeshError> {
        self.post(
            "/construction/payloads",
            &PayloadsRequest {
                network_identifier: self.network.clone(),
                operations,
                metadata,
                public_keys,
            },
        )
        .await
    }

    /// `/construction/parse` -- decode a (signed or unsigned) transaction
    /// back into its operation list.
    pub async fn parse(
        &self,
        transaction_hex: &str,
        signed: bool,
    ) -> Result<ParseResponse, MeshError> {
        self.post(
            "/construction/parse",
            &ParseRequest {
                network_identifier: self.network.clone(),
                signed,
                transaction: transaction_hex.to_owned(),
            },
        )
        .await
    }

    /// `/construction/combine` -- merge signatures into the unsigned
    /// transaction, producing signed bytes.
    pub async fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: Vec<Signature>,
    ) -> Result<CombineResponse, MeshError> {
        self.post(
            "/construction/combine",
            &CombineRequest {
                network_identifier: self.network.clone(),
                unsigned_transaction: unsigned_transaction.to_owned(),
                signatures,
            },
        )
        .await
    }

    /// `/construction/hash` -- transaction identifier of signed bytes,
    /// without submitting.
    pub async fn hash(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifierResponse, MeshError> {
        self.post(
            "/construction/hash",
            &SignedTransactionRequest {
                network_identifier: self.network.clone(),
                signed_transaction: signed_transaction.to_owned(),
            },
        )
        .await
    }

    /// `/construction/submit` -- broadcast signed bytes to the network.
    pub async fn submit(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifierResponse, MeshError> {
        self.post(
            "/construction/submit",
            &SignedTransactionRequest {
                network_identifier: self.network.clone(),
                signed_transaction: signed_transaction.to_owned(),
            },
        )
        .await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use sdk_core::Network;

    fn client() -> MeshClient {
        MeshClient::new(
            NetworkConfig::for_network(Network::Mainnet),
            MeshConfig::default(),
        )
        .expect("default config is valid")
    }

    #[test]
    fn base_url_has_no_trailing_slash() {
        let client = MeshClient::with_base_url(
            "http://localhost:8080///",
            NetworkConfig::MAINNET.network_identifier(),
            MeshConfig::default(),
        )
        .unwrap();
        assert_eq!(client.base_url(), "http://localhost:8080");
    }

    #[test]
    fn network_identifier_is_fixed_at_construction() {
        let client = client();
        assert_eq!(client.network_identifier().blockchain, "mochimo");
        assert_eq!(client.network_identifier().network, "mainnet");
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = MeshConfig::builder()
            .request_timeout(Duration::from_secs(5))
            .build();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(
            config.connect_timeout,
            Duration::from_millis(constants::DEFAULT_CONNECT_TIMEOUT_MS)
        );
    }

    #[test]
    fn api_error_display_keeps_raw_body() {
        let err = MeshError::Api {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            body: r#"{"code":12,"message":"bad signature"}"#.into(),
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("bad signature"));
    }
}
