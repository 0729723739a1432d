//! SHA-256 hasher, the digest function Mochimo designates for signing
//! payloads.

use sha2::{Digest, Sha256};

use crate::Hasher;

/// SHA-256 implementation of [`Hasher`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher for Sha256Hasher {
    fn hash(&self, bytes: &[u8]) -> Vec<u8> {
        Sha256::digest(bytes).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_digest() {
        // SHA-256 of the empty string, from FIPS 180-4 test vectors.
        let digest = Sha256Hasher.hash(b"");
        assert_eq!(
            hex::encode(digest),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn deterministic() {
        let a = Sha256Hasher.hash(b"mochimo");
        let b = Sha256Hasher.hash(b"mochimo");
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }
}
