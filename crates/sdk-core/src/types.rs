//! Rosetta-style data model for the Mochimo mesh API.
//!
//! These types mirror the JSON bodies exchanged with a mesh node. Field
//! names match the wire exactly (snake_case, `type` renamed). Monetary
//! values travel as signed decimal strings, never native numbers, so no
//! precision is lost on amounts above 2^53.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Network / account identifiers
// ---------------------------------------------------------------------------

/// Identifies the ledger a request is addressed to.
///
/// Immutable and fixed per client instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkIdentifier {
    /// Blockchain name, e.g. `"mochimo"`.
    pub blockchain: String,
    /// Network name, e.g. `"mainnet"`.
    pub network: String,
}

/// A ledger account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountIdentifier {
    /// Hex-encoded account address (for Mochimo, the full WOTS+ public key).
    pub address: String,
    /// Ledger-specific metadata, e.g. the persistent account tag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<AccountMetadata>,
}

impl AccountIdentifier {
    /// An account with no metadata.
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            metadata: None,
        }
    }
}

/// Metadata attached to an [`AccountIdentifier`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountMetadata {
    /// Persistent account tag, distinct from the one-time address.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// A currency definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    /// Currency symbol, e.g. `"MCM"`.
    pub symbol: String,
    /// Number of decimal places in the atomic unit.
    pub decimals: u32,
}

/// A signed monetary amount.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Amount {
    /// Signed decimal string in atomic units. Debits are negative.
    pub value: String,
    /// The currency of `value`.
    pub currency: Currency,
}

impl Amount {
    /// Parse `value` as a signed integer.
    ///
    /// Returns `None` if the string is not a valid decimal integer.
    pub fn value_i128(&self) -> Option<i128> {
        self.value.parse().ok()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Position of an operation within a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationIdentifier {
    /// Zero-based index. A Mochimo transfer has exactly four operations
    /// in fixed order: source debit, destination credit, change credit,
    /// fee debit.
    pub index: u64,
}

/// One leg of value movement within a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operation {
    pub operation_identifier: OperationIdentifier,
    /// Operation type, e.g. `"TRANSFER"` or `"FEE"`.
    #[serde(rename = "type")]
    pub op_type: String,
    /// Execution status. Absent when constructing (not yet on chain).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account: Option<AccountIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Amount>,
}

// ---------------------------------------------------------------------------
// Blocks / transactions
// ---------------------------------------------------------------------------

/// Reference to a block by index and/or hash.
///
/// Both fields are optional but at least one must be present in any
/// reference to a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockIdentifier {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hash: Option<String>,
}

impl BlockIdentifier {
    /// Whether this reference names a block at all.
    pub fn is_populated(&self) -> bool {
        self.index.is_some() || self.hash.is_some()
    }
}

/// Identifies a transaction by hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionIdentifier {
    pub hash: String,
}

/// A transaction envelope: identifier plus its operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_identifier: TransactionIdentifier,
    pub operations: Vec<Operation>,
}

/// A block envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub block_identifier: BlockIdentifier,
    pub parent_block_identifier: BlockIdentifier,
    /// Milliseconds since the Unix epoch.
    pub timestamp: u64,
    pub transactions: Vec<Transaction>,
}

// ---------------------------------------------------------------------------
// Keys / signatures
// ---------------------------------------------------------------------------

/// A public key with its signature-scheme tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    /// Hex-encoded public key bytes.
    pub hex_bytes: String,
    /// Signature-scheme tag. For Mochimo this is the fixed string
    /// `"wotsp"` -- not an elliptic curve.
    pub curve_type: String,
}

/// Bytes a signer must sign, bound to the account that signs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningPayload {
    /// Hex-encoded payload. Must equal the unsigned-transaction hex
    /// byte for byte.
    pub hex_bytes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_identifier: Option<AccountIdentifier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_type: Option<String>,
}

/// A produced signature, bound to the payload it signs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    pub signing_payload: SigningPayload,
    pub public_key: PublicKey,
    pub signature_type: String,
    /// Hex-encoded signature bytes.
    pub hex_bytes: String,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operation_type_field_renames_on_the_wire() {
        let op = Operation {
            operation_identifier: OperationIdentifier { index: 0 },
            op_type: "TRANSFER".into(),
            status: None,
            account: Some(AccountIdentifier::new("ab")),
            amount: Some(Amount {
                value: "-100".into(),
                currency: Currency {
                    symbol: "MCM".into(),
                    decimals: 9,
                },
            }),
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(json["type"], "TRANSFER");
        assert!(json.get("status").is_none(), "None fields must be omitted");
        assert_eq!(json["amount"]["value"], "-100");
    }

    #[test]
    fn amount_value_parses_as_signed() {
        let amount = Amount {
            value: "-1000000000".into(),
            currency: Currency {
                symbol: "MCM".into(),
                decimals: 9,
            },
        };
        assert_eq!(amount.value_i128(), Some(-1_000_000_000));
    }

    #[test]
    fn block_identifier_populated() {
        let empty = BlockIdentifier {
            index: None,
            hash: None,
        };
        assert!(!empty.is_populated());
        let by_index = BlockIdentifier {
            index: Some(7),
            hash: None,
        };
        assert!(by_index.is_populated());
    }
}
