//! Construction API seam between the pipeline and the transport.
//!
//! [`LedgerApi`] is a trait so tests can swap in a mock node and assert
//! on call order without any network. [`transport::MeshClient`] is the
//! concrete implementation that speaks HTTP/JSON to a mesh endpoint.

use std::future::Future;

use serde_json::Value;

use sdk_core::types::{Operation, PublicKey, Signature};
use transport::types::{
    CombineResponse, DeriveResponse, MetadataResponse, ParseResponse, PayloadsResponse,
    PreprocessResponse, TransactionIdentifierResponse,
};
use transport::{MeshClient, MeshError};

/// The subset of the Construction API the transfer pipeline drives.
///
/// Implementations must be stateless across calls: every method is one
/// remote procedure, and all multi-step state lives in the pipeline.
pub trait LedgerApi: Send + Sync {
    /// Resolve a public key to a ledger account.
    fn derive(
        &self,
        public_key_hex: &str,
        curve_type: &str,
    ) -> impl Future<Output = Result<DeriveResponse, MeshError>> + Send;

    /// Obtain required signers and the opaque metadata options blob.
    fn preprocess(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
    ) -> impl Future<Output = Result<PreprocessResponse, MeshError>> + Send;

    /// Fetch ledger-supplied construction state (balance, nonce, fee).
    fn metadata(
        &self,
        options: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> impl Future<Output = Result<MetadataResponse, MeshError>> + Send;

    /// Request unsigned transaction bytes plus signing payloads.
    fn payloads(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> impl Future<Output = Result<PayloadsResponse, MeshError>> + Send;

    /// Decode a transaction back into its operation list.
    fn parse(
        &self,
        transaction_hex: &str,
        signed: bool,
    ) -> impl Future<Output = Result<ParseResponse, MeshError>> + Send;

    /// Merge signatures with the unsigned transaction.
    fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: Vec<Signature>,
    ) -> impl Future<Output = Result<CombineResponse, MeshError>> + Send;

    /// Transaction identifier of signed bytes, without submitting.
    fn hash(
        &self,
        signed_transaction: &str,
    ) -> impl Future<Output = Result<TransactionIdentifierResponse, MeshError>> + Send;

    /// Broadcast signed bytes.
    fn submit(
        &self,
        signed_transaction: &str,
    ) -> impl Future<Output = Result<TransactionIdentifierResponse, MeshError>> + Send;
}

impl LedgerApi for MeshClient {
    async fn derive(
        &self,
        public_key_hex: &str,
        curve_type: &str,
    ) -> Result<DeriveResponse, MeshError> {
        MeshClient::derive(self, public_key_hex, curve_type).await
    }

    async fn preprocess(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
    ) -> Result<PreprocessResponse, MeshError> {
        MeshClient::preprocess(self, operations, metadata).await
    }

    async fn metadata(
        &self,
        options: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> Result<MetadataResponse, MeshError> {
        MeshClient::metadata(self, options, public_keys).await
    }

    async fn payloads(
        &self,
        operations: Vec<Operation>,
        metadata: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> Result<PayloadsResponse, MeshError> {
        MeshClient::payloads(self, operations, metadata, public_keys).await
    }

    async fn parse(&self, transaction_hex: &str, signed: bool) -> Result<ParseResponse, MeshError> {
        MeshClient::parse(self, transaction_hex, signed).await
    }

    async fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: Vec<Signature>,
    ) -> Result<CombineResponse, MeshError> {
        MeshClient::combine(self, unsigned_transaction, signatures).await
    }

    async fn hash(&self, signed_transaction: &str) -> Result<TransactionIdentifierResponse, MeshError> {
        MeshClient::hash(self, signed_transaction).await
    }

    async fn submit(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifierResponse, MeshError> {
        MeshClient::submit(self, signed_transaction).await
    }
}
