//! SDK error types.
//!
//! [`SdkError`] is the unified error type for all SDK operations. Every
//! variant is terminal for the pipeline that produced it: there is no
//! partial-success state and no automatic retry, because retrying would
//! mean offering the same one-time key a second message.

use std::fmt;

use sdk_core::wire::WireError;
use signer::SignerError;
use transport::MeshError;

// ---------------------------------------------------------------------------
// SdkError
// ---------------------------------------------------------------------------

/// Errors from SDK operations.
#[derive(Debug)]
pub enum SdkError {
    /// The SDK has been shut down (cancellation token fired). The
    /// pipeline never resumes mid-sequence after cancellation.
    Cancelled,

    /// Sender and change accounts resolve to the same address. Fatal at
    /// construction time, before any network call.
    AddressCollision,

    /// The computed change would be negative: `balance < amount + fee`.
    /// Reported before any network mutation call.
    InsufficientFunds {
        /// Source balance reported by the node.
        balance: u64,
        /// `amount + fee` the transfer would need.
        required: u64,
    },

    /// The node's metadata response is missing a required field.
    MissingMetadata(&'static str),

    /// The node returned an unexpected number of signing payloads.
    SignerCount(usize),

    /// A signing payload's bytes differ from the unsigned transaction.
    /// Signing never proceeds on unverified bytes.
    PayloadMismatch,

    /// Operations decoded from a transaction diverge from the intended
    /// operations.
    OperationMismatch {
        /// Which parse check failed: `"unsigned"` or `"signed"`.
        stage: &'static str,
    },

    /// The signed transaction bytes do not match the fixed wire layout.
    Wire(WireError),

    /// The signing backend failed.
    Signing(SignerError),

    /// A mesh API call failed. Carries the raw response for diagnostics.
    Transport(MeshError),
}

impl fmt::Display for SdkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Cancelled => write!(f, "operation cancelled"),
            Self::AddressCollision => {
                write!(f, "sender and change accounts must not share an address")
            }
            Self::InsufficientFunds { balance, required } => {
                write!(f, "insufficient funds: balance {balance} < required {required}")
            }
            Self::MissingMetadata(field) => {
                write!(f, "node metadata is missing required field '{field}'")
            }
            Self::SignerCount(n) => {
                write!(f, "expected exactly 1 signing payload, node returned {n}")
            }
            Self::PayloadMismatch => {
                write!(f, "signing payload does not match the unsigned transaction bytes")
            }
            Self::OperationMismatch { stage } => {
                write!(f, "{stage} transaction does not decode to the intended operations")
            }
            Self::Wire(e) => write!(f, "wire decode failed: {e}"),
            Self::Signing(e) => write!(f, "signing failed: {e}"),
            Self::Transport(e) => write!(f, "transport failed: {e}"),
        }
    }
}

impl std::error::Error for SdkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Wire(e) => Some(e),
            Self::Signing(e) => Some(e),
            Self::Transport(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MeshError> for SdkError {
    fn from(e: MeshError) -> Self {
        Self::Transport(e)
    }
}

impl From<WireError> for SdkError {
    fn from(e: WireError) -> Self {
        Self::Wire(e)
    }
}

impl From<SignerError> for SdkError {
    fn from(e: SignerError) -> Self {
        Self::Signing(e)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_error_keeps_remote_body_in_display() {
        let err = SdkError::Transport(MeshError::Api {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: r#"{"code":12,"message":"bad signature"}"#.into(),
        });
        assert!(err.to_string().contains("bad signature"));
    }

    #[test]
    fn insufficient_funds_names_both_sides() {
        let err = SdkError::InsufficientFunds {
            balance: 500,
            required: 501,
        };
        let text = err.to_string();
        assert!(text.contains("500"));
        assert!(text.contains("501"));
    }
}
