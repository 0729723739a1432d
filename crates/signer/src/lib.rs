//! Signing abstractions for the Mochimo mesh SDK.
//!
//! This crate provides:
//!
//! - [`OtsSigner`] trait -- one-time-signature signing (zero dependencies)
//! - [`Hasher`] trait -- the ledger's designated digest function
//! - [`OneTimeSigner`] -- a consuming handle that makes key reuse a
//!   compile-time error
//! - [`Sha256Hasher`] -- concrete hasher behind the default `sha2` feature
//!
//! # Design
//!
//! The base traits have **zero dependencies**. The SDK pipeline accesses
//! all cryptographic operations through them, so alternate signature
//! schemes can be substituted without touching the pipeline.
//!
//! A WOTS+ private key may safely sign exactly one message; signing two
//! different payloads with the same key breaks the scheme's security
//! guarantee. [`OneTimeSigner::sign_once`] takes `self` by value, so a
//! second sign with the same handle does not compile.

#[cfg(feature = "sha2")]
mod sha256;

#[cfg(feature = "sha2")]
pub use sha256::Sha256Hasher;

pub mod one_time;

pub use one_time::OneTimeSigner;

use std::fmt;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors from a signing backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignerError {
    /// The backend could not produce a signature (e.g. locked key store).
    SigningFailed(String),

    /// The digest has an unexpected length for this scheme.
    BadDigest { expected: usize, actual: usize },
}

impl fmt::Display for SignerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SigningFailed(reason) => write!(f, "signing failed: {reason}"),
            Self::BadDigest { expected, actual } => {
                write!(f, "bad digest length: expected {expected}, got {actual}")
            }
        }
    }
}

impl std::error::Error for SignerError {}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// One-time-signature signing capability.
///
/// Implementations own the WOTS+ key material and handle the signing
/// mathematics; the SDK only sees hex addresses and signature bytes.
/// The one-time discipline is enforced by [`OneTimeSigner`], not here --
/// wrap any `OtsSigner` before handing it to a pipeline.
pub trait OtsSigner: Send + Sync {
    /// Hex-encoded public address of this key (for Mochimo, the full
    /// 2208-byte WOTS+ public key).
    fn address_hex(&self) -> String;

    /// Sign a message digest, returning the raw signature bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails (e.g. HSM timeout, locked
    /// key store) or the digest length is wrong for the scheme.
    fn sign(&self, digest: &[u8]) -> Result<Vec<u8>, SignerError>;
}

/// The ledger's designated hash function. Deterministic and pure.
pub trait Hasher: Send + Sync {
    /// Hash arbitrary bytes to a digest.
    fn hash(&self, bytes: &[u8]) -> Vec<u8>;
}
