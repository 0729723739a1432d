//! End-to-end pipeline tests against a mock mesh node.
//!
//! The mock implements [`sdk::LedgerApi`] in memory: it echoes derived
//! accounts, serves a configurable balance, assembles unsigned bytes in
//! the real positional layout, and records every call so tests can
//! assert on ordering and on which steps were never reached.

use std::sync::{Arc, Mutex};

use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;

use sdk::operations::transfer::conserves_value;
use sdk::{LedgerApi, PipelineStatus, SdkError, TransferPipeline, TransferRequest};
use sdk_core::types::{
    AccountIdentifier, Currency, Operation, PublicKey, Signature, SigningPayload,
    TransactionIdentifier,
};
use sdk_core::wire::{WOTS_ADDRESS_LEN, WOTS_SIGNATURE_LEN};
use signer::{Hasher, OneTimeSigner, OtsSigner, Sha256Hasher, SignerError};
use transport::types::{
    CombineResponse, DeriveResponse, MetadataResponse, ParseResponse, PayloadsResponse,
    PreprocessResponse, TransactionIdentifierResponse,
};
use transport::MeshError;

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn sender_address() -> String {
    "aa".repeat(WOTS_ADDRESS_LEN)
}

fn destination_address() -> String {
    "bb".repeat(WOTS_ADDRESS_LEN)
}

fn change_address() -> String {
    "cc".repeat(WOTS_ADDRESS_LEN)
}

fn mcm() -> Currency {
    Currency {
        symbol: "MCM".into(),
        decimals: 9,
    }
}

struct MockSigner {
    address: String,
}

impl OtsSigner for MockSigner {
    fn address_hex(&self) -> String {
        self.address.clone()
    }

    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, SignerError> {
        // A fixed-size fake signature seeded from the digest.
        let mut sig = vec![0x5A; WOTS_SIGNATURE_LEN];
        sig[..digest.len()].copy_from_slice(digest);
        Ok(sig)
    }
}

fn mock_sender() -> OneTimeSigner<MockSigner> {
    OneTimeSigner::new(MockSigner {
        address: sender_address(),
    })
}

// ---------------------------------------------------------------------------
// MockLedger
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MockInner {
    balance: u64,
    fail_submit: bool,
    tamper_payload: bool,
    calls: Mutex<Vec<String>>,
    captured_operations: Mutex<Option<Vec<Operation>>>,
}

#[derive(Clone)]
struct MockLedger {
    inner: Arc<MockInner>,
}

impl MockLedger {
    fn new(balance: u64) -> Self {
        Self {
            inner: Arc::new(MockInner {
                balance,
                ..Default::default()
            }),
        }
    }

    fn failing_submit(balance: u64) -> Self {
        Self {
            inner: Arc::new(MockInner {
                balance,
                fail_submit: true,
                ..Default::default()
            }),
        }
    }

    fn tampering_payloads(balance: u64) -> Self {
        Self {
            inner: Arc::new(MockInner {
                balance,
                tamper_payload: true,
                ..Default::default()
            }),
        }
    }

    fn record(&self, call: &str) {
        self.inner.calls.lock().unwrap().push(call.to_owned());
    }

    fn calls(&self) -> Vec<String> {
        self.inner.calls.lock().unwrap().clone()
    }

    fn captured_operations(&self) -> Vec<Operation> {
        self.inner
            .captured_operations
            .lock()
            .unwrap()
            .clone()
            .expect("payloads step captured operations")
    }

    /// Build unsigned transaction bytes in the real positional layout
    /// from the submitted operations.
    fn unsigned_from_operations(operations: &[Operation]) -> String {
        let address = |op: &Operation| {
            hex::decode(&op.account.as_ref().unwrap().address).expect("valid address hex")
        };
        let value = |op: &Operation| -> u64 {
            op.amount.as_ref().unwrap().value.parse().expect("positive value")
        };

        let mut bytes = Vec::new();
        bytes.extend_from_slice(&address(&operations[0]));
        bytes.extend_from_slice(&address(&operations[1]));
        bytes.extend_from_slice(&address(&operations[2]));
        bytes.extend_from_slice(&value(&operations[1]).to_be_bytes());
        bytes.extend_from_slice(&value(&operations[2]).to_be_bytes());
        bytes.extend_from_slice(&value(&operations[3]).to_be_bytes());
        hex::encode(bytes)
    }

    fn unsigned(&self) -> String {
        Self::unsigned_from_operations(&self.captured_operations())
    }
}

impl LedgerApi for MockLedger {
    async fn derive(
        &self,
        public_key_hex: &str,
        _curve_type: &str,
    ) -> Result<DeriveResponse, MeshError> {
        self.record("derive");
        Ok(DeriveResponse {
            account_identifier: AccountIdentifier::new(public_key_hex),
        })
    }

    async fn preprocess(
        &self,
        operations: Vec<Operation>,
        _metadata: Option<Value>,
    ) -> Result<PreprocessResponse, MeshError> {
        self.record("preprocess");
        assert_eq!(operations.len(), 3, "preprocess takes the skeleton set");
        Ok(PreprocessResponse {
            options: Some(json!({ "transfer": true })),
            required_public_keys: Some(vec![operations[0].account.clone().unwrap()]),
        })
    }

    async fn metadata(
        &self,
        options: Option<Value>,
        public_keys: Option<Vec<PublicKey>>,
    ) -> Result<MetadataResponse, MeshError> {
        self.record("metadata");
        assert!(options.is_some(), "preprocess options must be forwarded");
        assert_eq!(public_keys.map(|k| k.len()), Some(1));
        Ok(MetadataResponse {
            metadata: json!({
                "source_balance": self.inner.balance.to_string(),
                "block_to_live": 0,
            }),
            suggested_fee: None,
        })
    }

    async fn payloads(
        &self,
        operations: Vec<Operation>,
        _metadata: Option<Value>,
        _public_keys: Option<Vec<PublicKey>>,
    ) -> Result<PayloadsResponse, MeshError> {
        self.record("payloads");
        let unsigned = Self::unsigned_from_operations(&operations);
        let account = operations[0].account.clone();
        *self.inner.captured_operations.lock().unwrap() = Some(operations);

        let mut payload_hex = unsigned.clone();
        if self.inner.tamper_payload {
            let last = payload_hex.pop().unwrap();
            payload_hex.push(if last == '0' { '1' } else { '0' });
        }

        Ok(PayloadsResponse {
            unsigned_transaction: unsigned,
            payloads: vec![SigningPayload {
                hex_bytes: payload_hex,
                account_identifier: account,
                signature_type: Some("wotsp".into()),
            }],
        })
    }

    async fn parse(&self, transaction_hex: &str, signed: bool) -> Result<ParseResponse, MeshError> {
        self.record(if signed { "parse_signed" } else { "parse_unsigned" });
        assert!(!transaction_hex.is_empty());
        Ok(ParseResponse {
            operations: self.captured_operations(),
            account_identifier_signers: None,
            metadata: None,
        })
    }

    async fn combine(
        &self,
        unsigned_transaction: &str,
        signatures: Vec<Signature>,
    ) -> Result<CombineResponse, MeshError> {
        self.record("combine");
        assert_eq!(signatures.len(), 1);
        assert_eq!(
            signatures[0].signing_payload.hex_bytes, unsigned_transaction,
            "signature must bind the unsigned bytes"
        );
        Ok(CombineResponse {
            signed_transaction: format!("{unsigned_transaction}{}", signatures[0].hex_bytes),
        })
    }

    async fn hash(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifierResponse, MeshError> {
        self.record("hash");
        // Deterministic digest of the input so identical bytes always
        // produce the identical identifier.
        let digest = Sha256Hasher.hash(signed_transaction.as_bytes());
        Ok(TransactionIdentifierResponse {
            transaction_identifier: TransactionIdentifier {
                hash: hex::encode(digest),
            },
            metadata: None,
        })
    }

    async fn submit(
        &self,
        signed_transaction: &str,
    ) -> Result<TransactionIdentifierResponse, MeshError> {
        self.record("submit");
        if self.inner.fail_submit {
            return Err(MeshError::Api {
                status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
                body: r#"{"code":12,"message":"bad signature"}"#.into(),
            });
        }
        let digest = Sha256Hasher.hash(signed_transaction.as_bytes());
        Ok(TransactionIdentifierResponse {
            transaction_identifier: TransactionIdentifier {
                hash: hex::encode(digest),
            },
            metadata: None,
        })
    }
}

// ---------------------------------------------------------------------------
// Pipeline construction helper
// ---------------------------------------------------------------------------

fn pipeline(
    ledger: MockLedger,
    amount: u64,
    fee: u64,
) -> Result<TransferPipeline<MockLedger, MockSigner, Sha256Hasher>, SdkError> {
    TransferPipeline::new(
        ledger,
        mock_sender(),
        change_address(),
        TransferRequest {
            destination: AccountIdentifier::new(destination_address()),
            amount,
            fee,
        },
        mcm(),
        Sha256Hasher,
        CancellationToken::new(),
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Sender == change address fails at construction, before any call.
#[tokio::test]
async fn address_collision_fails_before_any_network_call() {
    let ledger = MockLedger::new(1_000_000_000);
    let result = TransferPipeline::new(
        ledger.clone(),
        mock_sender(),
        sender_address(),
        TransferRequest {
            destination: AccountIdentifier::new(destination_address()),
            amount: 1,
            fee: 1,
        },
        mcm(),
        Sha256Hasher,
        CancellationToken::new(),
    );
    assert!(matches!(result, Err(SdkError::AddressCollision)));
    assert!(ledger.calls().is_empty(), "no network call may happen");
}

/// Balance 1 MCM, amount 0.3 MCM, fee 1000 nano: change is 699_999_000
/// and the full sequence runs in strict order.
#[tokio::test]
async fn happy_path_builds_signs_and_submits() {
    let ledger = MockLedger::new(1_000_000_000);
    let pipeline = pipeline(ledger.clone(), 300_000_000, 1_000).unwrap();
    let mut status = pipeline.subscribe();

    let txid = pipeline.run().await.expect("transfer succeeds");
    assert!(!txid.hash.is_empty());
    assert_eq!(*status.borrow_and_update(), PipelineStatus::Done);

    let operations = ledger.captured_operations();
    assert_eq!(operations.len(), 4);
    let values: Vec<&str> = operations
        .iter()
        .map(|op| op.amount.as_ref().unwrap().value.as_str())
        .collect();
    assert_eq!(values, ["-1000000000", "300000000", "699999000", "1000"]);
    assert!(conserves_value(&operations));

    assert_eq!(
        ledger.calls(),
        [
            "derive",
            "derive",
            "preprocess",
            "metadata",
            "payloads",
            "parse_unsigned",
            "combine",
            "parse_signed",
            "submit",
        ]
    );
}

/// Balance 500, amount 500, fee 1: insufficient funds is reported before
/// payloads is ever requested.
#[tokio::test]
async fn insufficient_funds_aborts_before_payloads() {
    let ledger = MockLedger::new(500);
    let pipeline = pipeline(ledger.clone(), 500, 1).unwrap();
    let mut status = pipeline.subscribe();

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(
        err,
        SdkError::InsufficientFunds {
            balance: 500,
            required: 501,
        }
    ));
    assert_eq!(*status.borrow_and_update(), PipelineStatus::Failed);
    assert!(
        !ledger.calls().iter().any(|c| c == "payloads"),
        "payloads must not be requested after a funds failure"
    );
}

/// A signing payload differing from the unsigned transaction by one
/// character stops the pipeline before combine.
#[tokio::test]
async fn payload_mismatch_aborts_before_combine() {
    let ledger = MockLedger::tampering_payloads(1_000_000_000);
    let pipeline = pipeline(ledger.clone(), 300_000_000, 1_000).unwrap();

    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, SdkError::PayloadMismatch));
    assert!(
        !ledger.calls().iter().any(|c| c == "combine"),
        "nothing may be combined from an unverified payload"
    );
}

/// A 500 on submit surfaces the remote message and ends in Failed.
#[tokio::test]
async fn submit_rejection_surfaces_remote_body() {
    let ledger = MockLedger::failing_submit(1_000_000_000);
    let pipeline = pipeline(ledger.clone(), 300_000_000, 1_000).unwrap();
    let mut status = pipeline.subscribe();

    let err = pipeline.run().await.unwrap_err();
    assert!(err.to_string().contains("bad signature"));
    assert_eq!(*status.borrow_and_update(), PipelineStatus::Failed);
}

/// Hashing the same signed bytes twice yields the same identifier.
#[tokio::test]
async fn construction_hash_is_idempotent() {
    let ledger = MockLedger::new(0);
    let signed = "ab".repeat(8792);
    let first = LedgerApi::hash(&ledger, &signed).await.unwrap();
    let second = LedgerApi::hash(&ledger, &signed).await.unwrap();
    assert_eq!(
        first.transaction_identifier.hash,
        second.transaction_identifier.hash
    );
}

/// A cancellation token that fired before run() aborts without a single
/// network call; the pipeline never resumes.
#[tokio::test]
async fn cancellation_is_terminal() {
    let ledger = MockLedger::new(1_000_000_000);
    let cancel = CancellationToken::new();
    let pipeline = TransferPipeline::new(
        ledger.clone(),
        mock_sender(),
        change_address(),
        TransferRequest {
            destination: AccountIdentifier::new(destination_address()),
            amount: 1,
            fee: 1,
        },
        mcm(),
        Sha256Hasher,
        cancel.clone(),
    )
    .unwrap();
    let mut status = pipeline.subscribe();

    cancel.cancel();
    let err = pipeline.run().await.unwrap_err();
    assert!(matches!(err, SdkError::Cancelled));
    assert_eq!(*status.borrow_and_update(), PipelineStatus::Failed);
    assert!(ledger.calls().is_empty());
}
