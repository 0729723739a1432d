//! Fixed binary layout of a signed Mochimo transaction.
//!
//! A signed transaction is a plain concatenation of fixed-size fields.
//! The format is positional -- no length prefixes, no delimiters -- so a
//! decoder must reject any blob whose length differs from the expected
//! total rather than misparse it.
//!
//! Layout (byte offsets):
//!
//! | field               | offset | length |
//! |---------------------|--------|--------|
//! | source address      |      0 |   2208 |
//! | destination address |   2208 |   2208 |
//! | change address      |   4416 |   2208 |
//! | send total (BE)     |   6624 |      8 |
//! | change total (BE)   |   6632 |      8 |
//! | fee total (BE)      |   6640 |      8 |
//! | WOTS+ signature     |   6648 |   2144 |

use std::fmt;

// ---------------------------------------------------------------------------
// Layout constants
// ---------------------------------------------------------------------------

/// Length of a WOTS+ address (the full one-time public key) in bytes.
pub const WOTS_ADDRESS_LEN: usize = 2208;

/// Length of each big-endian amount field in bytes.
pub const AMOUNT_LEN: usize = 8;

/// Length of a WOTS+ signature in bytes.
pub const WOTS_SIGNATURE_LEN: usize = 2144;

/// Total length of a signed transaction: three addresses, three amounts,
/// one signature. 8792 bytes.
pub const SIGNED_TX_LEN: usize = 3 * WOTS_ADDRESS_LEN + 3 * AMOUNT_LEN + WOTS_SIGNATURE_LEN;

const DST_OFFSET: usize = WOTS_ADDRESS_LEN;
const CHG_OFFSET: usize = 2 * WOTS_ADDRESS_LEN;
const SEND_OFFSET: usize = 3 * WOTS_ADDRESS_LEN;
const CHANGE_OFFSET: usize = SEND_OFFSET + AMOUNT_LEN;
const FEE_OFFSET: usize = CHANGE_OFFSET + AMOUNT_LEN;
const SIG_OFFSET: usize = FEE_OFFSET + AMOUNT_LEN;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from decoding a signed transaction blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The blob length does not match [`SIGNED_TX_LEN`].
    BadLength { expected: usize, actual: usize },

    /// The hex string could not be decoded to bytes.
    BadHex,
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BadLength { expected, actual } => {
                write!(f, "bad transaction length: expected {expected}, got {actual}")
            }
            Self::BadHex => write!(f, "invalid hex encoding"),
        }
    }
}

impl std::error::Error for WireError {}

// ---------------------------------------------------------------------------
// SignedTransaction
// ---------------------------------------------------------------------------

/// The decoded fields of a signed transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Source WOTS+ address (2208 bytes).
    pub source: Vec<u8>,
    /// Destination WOTS+ address (2208 bytes).
    pub destination: Vec<u8>,
    /// Change WOTS+ address (2208 bytes).
    pub change: Vec<u8>,
    /// Amount sent to the destination, in atomic units.
    pub send_total: u64,
    /// Amount returned to the change address, in atomic units.
    pub change_total: u64,
    /// Transaction fee, in atomic units.
    pub fee_total: u64,
    /// WOTS+ signature (2144 bytes).
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    /// Decode a signed transaction from raw bytes.
    ///
    /// Rejects any blob whose length is not exactly [`SIGNED_TX_LEN`];
    /// a truncated or padded blob never silently misparses.
    pub fn decode(bytes: &[u8]) -> Result<Self, WireError> {
        if bytes.len() != SIGNED_TX_LEN {
            return Err(WireError::BadLength {
                expected: SIGNED_TX_LEN,
                actual: bytes.len(),
            });
        }

        let read_u64 = |offset: usize| {
            let mut buf = [0u8; AMOUNT_LEN];
            buf.copy_from_slice(&bytes[offset..offset + AMOUNT_LEN]);
            u64::from_be_bytes(buf)
        };

        Ok(Self {
            source: bytes[..DST_OFFSET].to_vec(),
            destination: bytes[DST_OFFSET..CHG_OFFSET].to_vec(),
            change: bytes[CHG_OFFSET..SEND_OFFSET].to_vec(),
            send_total: read_u64(SEND_OFFSET),
            change_total: read_u64(CHANGE_OFFSET),
            fee_total: read_u64(FEE_OFFSET),
            signature: bytes[SIG_OFFSET..].to_vec(),
        })
    }

    /// Decode a signed transaction from a hex string.
    pub fn decode_hex(hex_str: &str) -> Result<Self, WireError> {
        let bytes = hex::decode(hex_str).map_err(|_| WireError::BadHex)?;
        Self::decode(&bytes)
    }

    /// Encode back to the positional byte layout.
    ///
    /// The inverse of [`SignedTransaction::decode`] for well-formed
    /// field lengths. Field lengths are not re-validated here; a value
    /// produced by `decode` always round-trips.
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(SIGNED_TX_LEN);
        out.extend_from_slice(&self.source);
        out.extend_from_slice(&self.destination);
        out.extend_from_slice(&self.change);
        out.extend_from_slice(&self.send_total.to_be_bytes());
        out.extend_from_slice(&self.change_total.to_be_bytes());
        out.extend_from_slice(&self.fee_total.to_be_bytes());
        out.extend_from_slice(&self.signature);
        out
    }

    /// Hex-encoded form of [`SignedTransaction::encode`].
    pub fn encode_hex(&self) -> String {
        hex::encode(self.encode())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
