//! Single-use transfer pipeline: intent in, submitted transaction out.
//!
//! # Protocol sequence
//!
//! The pipeline drives the Construction API in a strict order, each step
//! consuming state produced by the previous one:
//!
//! 1. **Derive**: resolve sender and change public keys to accounts.
//! 2. **Preprocess**: submit a skeletal zero-valued operation set to
//!    learn the required signers and metadata options.
//! 3. **Metadata**: fetch the source balance. The node is the *only*
//!    balance source; it is never computed client-side.
//! 4. **BuildOperations**: compute `change = balance - amount - fee` and
//!    assemble the four operations (source debit, destination credit,
//!    change credit, fee).
//! 5. **Payloads**: request unsigned transaction bytes and the signing
//!    payload.
//! 6. **ParseUnsigned**: decode the unsigned bytes remotely and confirm
//!    they match intent -- never sign unverified bytes.
//! 7. **Sign**: hash the unsigned bytes and spend the one-time signer.
//! 8. **Combine**: merge the signature into signed bytes.
//! 9. **ParseSigned**: confirm the signed bytes still encode the intent,
//!    both via remote parse and via the local wire codec.
//! 10. **Submit**: broadcast; success yields the transaction identifier.
//!
//! # Single use
//!
//! A pipeline is constructed per intended transfer and consumed by
//! [`TransferPipeline::run`]. Every failure is terminal: the one-time
//! key behind the signer must not be offered a second variant of the
//! same transaction, so retries require a fresh pipeline built from
//! fresh key material and a fresh balance snapshot.

use serde_json::Value;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

use config::constants::{FEE_ACCOUNT_ADDRESS, OP_FEE, OP_TRANSFER, SIGNATURE_SCHEME};
use sdk_core::types::{
    AccountIdentifier, Amount, Currency, Operation, OperationIdentifier, PublicKey, Signature,
    TransactionIdentifier,
};
use sdk_core::wire::{SignedTransaction, WireError, WOTS_ADDRESS_LEN};
use signer::{Hasher, OneTimeSigner, OtsSigner};

use crate::error::SdkError;
use crate::ledger::LedgerApi;
use crate::status::{PipelineStatus, StatusEmitter};

// ---------------------------------------------------------------------------
// TransferRequest
// ---------------------------------------------------------------------------

/// A transfer intent: who receives how much, at what fee.
#[derive(Debug, Clone)]
pub struct TransferRequest {
    /// Receiving account. For tagged accounts the tag rides in the
    /// account metadata.
    pub destination: AccountIdentifier,
    /// Amount credited to the destination, in atomic units.
    pub amount: u64,
    /// Transaction fee, in atomic units.
    pub fee: u64,
}

// ---------------------------------------------------------------------------
// TransferPipeline
// ---------------------------------------------------------------------------

/// Single-use orchestrator for one transfer.
///
/// Generic over the ledger seam, the signer backend, and the hash
/// function so tests can run the full sequence against a mock node.
///
/// # Type Parameters
///
/// - `L`: Construction API access (mesh client or mock)
/// - `S`: one-time signer backend
/// - `H`: the ledger's designated hash function
pub struct TransferPipeline<L, S, H> {
    ledger: L,
    sender: OneTimeSigner<S>,
    change_address: String,
    request: TransferRequest,
    currency: Currency,
    fee_address: String,
    hasher: H,
    cancel: CancellationToken,
    status: StatusEmitter,
}

impl<L, S, H> TransferPipeline<L, S, H>
where
    L: LedgerApi,
    S: OtsSigner,
    H: Hasher,
{
    /// Creates a pipeline for one transfer.
    ///
    /// `change_address` is the hex public key of a *fresh* one-time key
    /// that will receive the leftover balance.
    ///
    /// # Errors
    ///
    /// Returns [`SdkError::AddressCollision`] if the sender and change
    /// keys share an address. Spending the full balance back to the
    /// sender's own one-time address would burn the key, so this is
    /// fatal before any network call.
    pub fn new(
        ledger: L,
        sender: OneTimeSigner<S>,
        change_address: impl Into<String>,
        request: TransferRequest,
        currency: Currency,
        hasher: H,
        cancel: CancellationToken,
    ) -> Result<Self, SdkError> {
        let change_address = change_address.into();
        if sender.address_hex().eq_ignore_ascii_case(&change_address) {
            return Err(SdkError::AddressCollision);
        }

        Ok(Self {
            ledger,
            sender,
            change_address,
            request,
            currency,
            fee_address: FEE_ACCOUNT_ADDRESS.to_owned(),
            hasher,
            cancel,
            status: StatusEmitter::new(),
        })
    }

    /// Overrides the fee account address.
    ///
    /// The default is the ledger's empty-address fee-burn convention
    /// ([`config::constants::FEE_ACCOUNT_ADDRESS`]).
    pub fn fee_address(mut self, address: impl Into<String>) -> Self {
        self.fee_address = address.into();
        self
    }

    /// Observe status transitions.
    ///
    /// The channel is one-way: the pipeline publishes, observers read.
    /// The receiver always holds the most recent status.
    pub fn subscribe(&self) -> watch::Receiver<PipelineStatus> {
        self.status.subscribe()
    }

    /// Runs the pipeline to completion, consuming it.
    ///
    /// On success returns the submitted transaction identifier and the
    /// status channel reads [`PipelineStatus::Done`]; on any failure the
    /// channel reads [`PipelineStatus::Failed`] and the error names the
    /// step that aborted. Either way the pipeline is spent.
    pub async fn run(self) -> Result<TransactionIdentifier, SdkError> {
        let status = self.status.clone();
        match self.execute().await {
            Ok(id) => {
                status.set(PipelineStatus::Done);
                Ok(id)
            }
            Err(e) => {
                error!(error = %e, "transfer_pipeline_failed");
                status.set(PipelineStatus::Failed);
                Err(e)
            }
        }
    }

    async fn execute(self) -> Result<TransactionIdentifier, SdkError> {
        let Self {
            ledger,
            sender,
            change_address,
            request,
            currency,
            fee_address,
            hasher,
            cancel,
            status,
        } = self;

        // Cancellation between steps is terminal; the sequence never
        // resumes mid-flight.
        let advance = |s: PipelineStatus| -> Result<(), SdkError> {
            if cancel.is_cancelled() {
                return Err(SdkError::Cancelled);
            }
            status.set(s);
            Ok(())
        };

        // 1. Derive -- two sequential calls, both accounts are needed
        // for operation construction.
        advance(PipelineStatus::Derive)?;
        let sender_address = sender.address_hex();
        let source = ledger
            .derive(&sender_address, SIGNATURE_SCHEME)
            .await?
            .account_identifier;
        let change_account = ledger
            .derive(&change_address, SIGNATURE_SCHEME)
            .await?
            .account_identifier;

        // 2. Preprocess with zero-valued placeholders.
        advance(PipelineStatus::Preprocess)?;
        let skeleton = skeleton_operations(&source, &request.destination, &change_account, &currency);
        let preprocessed = ledger.preprocess(skeleton, None).await?;

        // 3. Metadata: the node's balance snapshot is authoritative.
        advance(PipelineStatus::Metadata)?;
        let public_keys = resolve_public_keys(
            preprocessed.required_public_keys.as_deref(),
            &sender_address,
        );
        let metadata = ledger
            .metadata(preprocessed.options, Some(public_keys.clone()))
            .await?;
        let balance = extract_source_balance(&metadata.metadata)?;

        // 4. BuildOperations: change = balance - amount - fee.
        advance(PipelineStatus::BuildOperations)?;
        let required = u128::from(request.amount) + u128::from(request.fee);
        if u128::from(balance) < required {
            return Err(SdkError::InsufficientFunds {
                balance,
                required: request.amount.saturating_add(request.fee),
            });
        }
        let change_total = balance - request.amount - request.fee;
        let intended = build_transfer_operations(
            &source,
            &request.destination,
            &change_account,
            request.amount,
            change_total,
            request.fee,
            &currency,
            &fee_address,
        );
        debug_assert!(conserves_value(&intended));
        debug!(
            amount = request.amount,
            change = change_total,
            fee = request.fee,
            "transfer_operations_built"
        );

        // 5. Payloads.
        advance(PipelineStatus::Payloads)?;
        let payloads = ledger
            .payloads(
                intended.clone(),
                Some(metadata.metadata.clone()),
                Some(public_keys),
            )
            .await?;
        let unsigned = payloads.unsigned_transaction;
        let payload = match payloads.payloads.as_slice() {
            [payload] => payload.clone(),
            other => return Err(SdkError::SignerCount(other.len())),
        };

        // 6. ParseUnsigned: never sign on unverified bytes.
        advance(PipelineStatus::ParseUnsigned)?;
        let parsed = ledger.parse(&unsigned, false).await?;
        verify_intent(&intended, &parsed.operations, "unsigned")?;

        // 7. Sign. The payload must equal the unsigned transaction hex
        // byte for byte; the signer handle is spent here.
        advance(PipelineStatus::Sign)?;
        if payload.hex_bytes != unsigned {
            return Err(SdkError::PayloadMismatch);
        }
        let unsigned_bytes = hex::decode(&unsigned).map_err(|_| SdkError::Wire(WireError::BadHex))?;
        let digest = hasher.hash(&unsigned_bytes);
        let signature_bytes = sender.sign_once(&digest)?;
        let signature = Signature {
            signing_payload: payload,
            public_key: PublicKey {
                hex_bytes: sender_address.clone(),
                curve_type: SIGNATURE_SCHEME.to_owned(),
            },
            signature_type: SIGNATURE_SCHEME.to_owned(),
            hex_bytes: hex::encode(signature_bytes),
        };

        // 8. Combine.
        advance(PipelineStatus::Combine)?;
        let signed = ledger.combine(&unsigned, vec![signature]).await?.signed_transaction;

        // 9. ParseSigned: remote decode plus local positional decode.
        advance(PipelineStatus::ParseSigned)?;
        let parsed = ledger.parse(&signed, true).await?;
        verify_intent(&intended, &parsed.operations, "signed")?;
        verify_signed_wire(
            &signed,
            &sender_address,
            &request.destination.address,
            &change_address,
            request.amount,
            change_total,
            request.fee,
        )?;

        // 10. Submit.
        advance(PipelineStatus::Submit)?;
        let submitted = ledger.submit(&signed).await?;
        debug!(
            hash = %submitted.transaction_identifier.hash,
            "transfer_submitted"
        );
        Ok(submitted.transaction_identifier)
    }
}

// ---------------------------------------------------------------------------
// Operation construction
// ---------------------------------------------------------------------------

fn operation(
    index: u64,
    op_type: &str,
    account: &AccountIdentifier,
    value: String,
    currency: &Currency,
) -> Operation {
    Operation {
        operation_identifier: OperationIdentifier { index },
        op_type: op_type.to_owned(),
        status: None,
        account: Some(account.clone()),
        amount: Some(Amount {
            value,
            currency: currency.clone(),
        }),
    }
}

/// The zero-valued three-operation placeholder set sent to preprocess.
fn skeleton_operations(
    source: &AccountIdentifier,
    destination: &AccountIdentifier,
    change: &AccountIdentifier,
    currency: &Currency,
) -> Vec<Operation> {
    vec![
        operation(0, OP_TRANSFER, source, "0".into(), currency),
        operation(1, OP_TRANSFER, destination, "0".into(), currency),
        operation(2, OP_TRANSFER, change, "0".into(), currency),
    ]
}

/// Build the four operations of a transfer, in fixed order:
/// source debit, destination credit, change credit, fee.
///
/// The source debit spends the full balance, `amount + change + fee` --
/// a one-time address is always emptied completely.
#[allow(clippy::too_many_arguments)]
pub fn build_transfer_operations(
    source: &AccountIdentifier,
    destination: &AccountIdentifier,
    change: &AccountIdentifier,
    amount: u64,
    change_total: u64,
    fee: u64,
    currency: &Currency,
    fee_address: &str,
) -> Vec<Operation> {
    let debit = u128::from(amount) + u128::from(change_total) + u128::from(fee);
    vec![
        operation(0, OP_TRANSFER, source, format!("-{debit}"), currency),
        operation(1, OP_TRANSFER, destination, amount.to_string(), currency),
        operation(2, OP_TRANSFER, change, change_total.to_string(), currency),
        operation(
            3,
            OP_FEE,
            &AccountIdentifier::new(fee_address),
            fee.to_string(),
            currency,
        ),
    ]
}

/// Whether a four-operation transfer conserves value:
/// `|source debit| == destination + change + fee`.
pub fn conserves_value(operations: &[Operation]) -> bool {
    let values: Option<Vec<i128>> = operations
        .iter()
        .map(|op| op.amount.as_ref().and_then(Amount::value_i128))
        .collect();
    match values.as_deref() {
        Some([debit, credits @ ..]) if *debit <= 0 => {
            credits.iter().sum::<i128>() == debit.unsigned_abs() as i128
        }
        _ => false,
    }
}

// ---------------------------------------------------------------------------
// Verification helpers
// ---------------------------------------------------------------------------

/// Map the node's required-signer accounts to public keys.
///
/// On this ledger an account address *is* the one-time public key, so
/// the mapping is direct. Falls back to the sender key when the node
/// does not name its requirements.
fn resolve_public_keys(
    required: Option<&[AccountIdentifier]>,
    sender_address: &str,
) -> Vec<PublicKey> {
    let to_key = |address: &str| PublicKey {
        hex_bytes: address.to_owned(),
        curve_type: SIGNATURE_SCHEME.to_owned(),
    };
    match required {
        Some(accounts) if !accounts.is_empty() => {
            accounts.iter().map(|a| to_key(&a.address)).collect()
        }
        _ => vec![to_key(sender_address)],
    }
}

/// Pull the authoritative source balance out of the metadata blob.
///
/// Accepts both decimal-string and native-number encodings; nodes have
/// shipped both.
fn extract_source_balance(metadata: &Value) -> Result<u64, SdkError> {
    let field = metadata
        .get("source_balance")
        .ok_or(SdkError::MissingMetadata("source_balance"))?;
    match field {
        Value::String(s) => s
            .parse()
            .map_err(|_| SdkError::MissingMetadata("source_balance")),
        Value::Number(n) => n
            .as_u64()
            .ok_or(SdkError::MissingMetadata("source_balance")),
        _ => Err(SdkError::MissingMetadata("source_balance")),
    }
}

/// Compare decoded operations against the intended ones.
///
/// Types, accounts, and values must match per index; node-assigned
/// status strings are ignored.
fn verify_intent(
    intended: &[Operation],
    decoded: &[Operation],
    stage: &'static str,
) -> Result<(), SdkError> {
    let mismatch = || SdkError::OperationMismatch { stage };

    if intended.len() != decoded.len() {
        return Err(mismatch());
    }
    for (want, got) in intended.iter().zip(decoded) {
        if want.op_type != got.op_type {
            return Err(mismatch());
        }
        let (want_account, got_account) = match (&want.account, &got.account) {
            (Some(w), Some(g)) => (w, g),
            _ => return Err(mismatch()),
        };
        if !want_account.address.eq_ignore_ascii_case(&got_account.address) {
            return Err(mismatch());
        }
        let (want_value, got_value) = match (&want.amount, &got.amount) {
            (Some(w), Some(g)) => (w.value_i128(), g.value_i128()),
            _ => return Err(mismatch()),
        };
        match (want_value, got_value) {
            (Some(w), Some(g)) if w == g => {}
            _ => return Err(mismatch()),
        }
    }
    Ok(())
}

/// Decode the signed bytes through the fixed positional layout and
/// confirm the amounts and addresses survived the combine step.
///
/// The destination is only byte-compared when the intent carries a full
/// one-time address; a tagged destination resolves node-side.
fn verify_signed_wire(
    signed_hex: &str,
    sender_address: &str,
    destination_address: &str,
    change_address: &str,
    amount: u64,
    change_total: u64,
    fee: u64,
) -> Result<(), SdkError> {
    let tx = SignedTransaction::decode_hex(signed_hex)?;
    let mismatch = SdkError::OperationMismatch { stage: "signed" };

    if tx.send_total != amount || tx.change_total != change_total || tx.fee_total != fee {
        return Err(mismatch);
    }

    let decode_address = |hex_str: &str| hex::decode(hex_str).map_err(|_| SdkError::Wire(WireError::BadHex));

    if tx.source != decode_address(sender_address)? {
        return Err(SdkError::OperationMismatch { stage: "signed" });
    }
    if tx.change != decode_address(change_address)? {
        return Err(SdkError::OperationMismatch { stage: "signed" });
    }
    if destination_address.len() == 2 * WOTS_ADDRESS_LEN
        && tx.destination != decode_address(destination_address)?
    {
        return Err(SdkError::OperationMismatch { stage: "signed" });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
