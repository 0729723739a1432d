//! Consuming signer handle enforcing the one-time-signature discipline.

use crate::{OtsSigner, SignerError};

/// A signer handle that can sign exactly once.
///
/// [`sign_once`](OneTimeSigner::sign_once) takes `self` by value and
/// returns the signature; the handle is gone afterwards. Reusing the
/// same key against a second payload is therefore a compile-time error,
/// not a runtime convention.
///
/// Retrying a failed transfer requires constructing a new handle from
/// fresh key material -- which is exactly the property the underlying
/// signature scheme demands.
#[derive(Debug)]
pub struct OneTimeSigner<S> {
    inner: S,
}

impl<S: OtsSigner> OneTimeSigner<S> {
    /// Wrap a signer in a single-use handle.
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    /// Hex-encoded public address of the wrapped key.
    ///
    /// Reading the address does not consume the handle.
    pub fn address_hex(&self) -> String {
        self.inner.address_hex()
    }

    /// Sign a digest, consuming the handle.
    ///
    /// On failure the handle is still consumed: a backend that failed
    /// mid-sign may have leaked part of the one-time key, so the key
    /// must not be offered a second message.
    pub fn sign_once(self, digest: &[u8]) -> Result<Vec<u8>, SignerError> {
        self.inner.sign(digest)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
