//! Request and response bodies for the mesh Construction API.
//!
//! Every request embeds the `network_identifier`; path-specific fields
//! follow. Optional fields are omitted from the wire entirely rather
//! than serialized as `null`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use sdk_core::types::{
    AccountIdentifier, Amount, Block, BlockIdentifier, NetworkIdentifier, Operation, PublicKey,
    Signature, SigningPayload, TransactionIdentifier,
};

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Body for `/network/status`, `/network/options`, and `/mempool`.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkRequest {
    pub network_identifier: NetworkIdentifier,
}

/// Body for `/block`.
#[derive(Debug, Clone, Serialize)]
pub struct BlockRequest {
    pub network_identifier: NetworkIdentifier,
    pub block_identifier: BlockIdentifier,
}

/// Body for `/account/balance`.
#[derive(Debug, Clone, Serialize)]
pub struct AccountBalanceRequest {
    pub network_identifier: NetworkIdentifier,
    pub account_identifier: AccountIdentifier,
}

/// Body for `/construction/derive`.
#[derive(Debug, Clone, Serialize)]
pub struct DeriveRequest {
    pub network_identifier: NetworkIdentifier,
    pub public_key: PublicKey,
}

/// Body for `/construction/preprocess`.
#[derive(Debug, Clone, Serialize)]
pub struct PreprocessRequest {
    pub network_identifier: NetworkIdentifier,
    pub operations: Vec<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

/// Body for `/construction/metadata`.
#[derive(Debug, Clone, Serialize)]
pub struct MetadataRequest {
    pub network_identifier: NetworkIdentifier,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<PublicKey>>,
}

/// Body for `/construction/payloads`.
#[derive(Debug, Clone, Serialize)]
pub struct PayloadsRequest {
    pub network_identifier: NetworkIdentifier,
    pub operations: Vec<Operation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_keys: Option<Vec<PublicKey>>,
}

/// Body for `/construction/parse`.
#[derive(Debug, Clone, Serialize)]
pub struct ParseRequest {
    pub network_identifier: NetworkIdentifier,
    /// Whether `transaction` is a signed transaction.
    pub signed: bool,
    /// Hex-encoded transaction bytes.
    pub transaction: String,
}

/// Body for `/construction/combine`.
#[derive(Debug, Clone, Serialize)]
pub struct CombineRequest {
    pub network_identifier: NetworkIdentifier,
    pub unsigned_transaction: String,
    pub signatures: Vec<Signature>,
}

/// Body for `/construction/hash` and `/construction/submit`.
#[derive(Debug, Clone, Serialize)]
pub struct SignedTransactionRequest {
    pub network_identifier: NetworkIdentifier,
    pub signed_transaction: String,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Response from `/network/status`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkStatusResponse {
    pub current_block_identifier: BlockIdentifier,
    /// Milliseconds since the Unix epoch.
    pub current_block_timestamp: u64,
    pub genesis_block_identifier: BlockIdentifier,
}

/// Version advertised in `/network/options`.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeVersion {
    pub rosetta_version: String,
    pub node_version: String,
}

/// An operation status the node may assign.
#[derive(Debug, Clone, Deserialize)]
pub struct OperationStatus {
    pub status: String,
    pub successful: bool,
}

/// An error the node may return, from its advertised catalog.
#[derive(Debug, Clone, Deserialize)]
pub struct NodeError {
    pub code: u32,
    pub message: String,
    pub retriable: bool,
}

/// Supported operations and error catalog from `/network/options`.
#[derive(Debug, Clone, Deserialize)]
pub struct Allow {
    pub operation_types: Vec<String>,
    pub operation_statuses: Vec<OperationStatus>,
    pub errors: Vec<NodeError>,
}

/// Response from `/network/options`.
#[derive(Debug, Clone, Deserialize)]
pub struct NetworkOptionsResponse {
    pub version: NodeVersion,
    pub allow: Allow,
}

/// Response from `/block`.
#[derive(Debug, Clone, Deserialize)]
pub struct BlockResponse {
    pub block: Option<Block>,
}

/// Response from `/account/balance`.
#[derive(Debug, Clone, Deserialize)]
pub struct AccountBalanceResponse {
    pub block_identifier: BlockIdentifier,
    pub balances: Vec<Amount>,
}

/// Response from `/mempool`.
#[derive(Debug, Clone, Deserialize)]
pub struct MempoolResponse {
    pub transaction_identifiers: Vec<TransactionIdentifier>,
}

/// Response from `/construction/derive`.
#[derive(Debug, Clone, Deserialize)]
pub struct DeriveResponse {
    pub account_identifier: AccountIdentifier,
}

/// Response from `/construction/preprocess`.
#[derive(Debug, Clone, Deserialize)]
pub struct PreprocessResponse {
    /// Opaque options blob to feed into `/construction/metadata`.
    pub options: Option<Value>,
    /// Accounts whose public keys the payloads step needs.
    pub required_public_keys: Option<Vec<AccountIdentifier>>,
}

/// Response from `/construction/metadata`.
#[derive(Debug, Clone, Deserialize)]
pub struct MetadataResponse {
    /// Ledger-supplied state: source balance, nonce, block-to-live.
    pub metadata: Value,
    pub suggested_fee: Option<Vec<Amount>>,
}

/// Response from `/construction/payloads`.
#[derive(Debug, Clone, Deserialize)]
pub struct PayloadsResponse {
    /// Hex-encoded unsigned transaction bytes.
    pub unsigned_transaction: String,
    /// One payload per required signer.
    pub payloads: Vec<SigningPayload>,
}

/// Response from `/construction/parse`.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseResponse {
    pub operations: Vec<Operation>,
    pub account_identifier_signers: Option<Vec<AccountIdentifier>>,
    pub metadata: Option<Value>,
}

/// Response from `/construction/combine`.
#[derive(Debug, Clone, Deserialize)]
pub struct CombineResponse {
    /// Hex-encoded signed transaction bytes.
    pub signed_transaction: String,
}

/// Response from `/construction/hash` and `/construction/submit`.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionIdentifierResponse {
    pub transaction_identifier: TransactionIdentifier,
    pub metadata: Option<Value>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
