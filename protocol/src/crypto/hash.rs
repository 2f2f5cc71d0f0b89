//! SHA-256 digest helpers.
//!
//! PULSAR hashes exactly two kinds of bytes: network passphrases (to derive
//! the 32-byte network identifier that anchors every signature payload) and
//! canonical transaction payloads (to produce the digest that is signed and
//! later used as the transaction hash). Both use plain SHA-256.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input, returned as a `Vec<u8>`.
///
/// # Example
///
/// ```
/// use pulsar_protocol::crypto::sha256;
///
/// let digest = sha256(b"pulsar");
/// assert_eq!(digest.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().to_vec()
}

/// Compute the SHA-256 hash and return a fixed-size array.
///
/// Same digest as [`sha256`], without the heap allocation. This is the
/// variant the transaction layer uses, since network identifiers and
/// transaction hashes propagate as `[u8; 32]`.
pub fn sha256_array(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let digest = hasher.finalize();
    let mut out = [0u8; 32];
    out.copy_from_slice(&digest);
    out
}
