//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations. Two concerns
//! live here and nothing else:
//!
//! - **Ed25519** signing and verification (`keys`), via `ed25519-dalek`.
//!   Deterministic signatures, 32-byte keys, 64-byte signatures.
//! - **SHA-256** digests (`hash`), via `sha2`. Network identifiers and
//!   transaction hashes are SHA-256 of canonical wire bytes.
//!
//! The wire-model layer treats both as opaque contracts: it hands bytes to
//! a signer and gets a signature back, or hands bytes to the hasher and
//! gets a 32-byte digest back. Nothing in this module knows what a
//! transaction is.

pub mod hash;
pub mod keys;

pub use hash::{sha256, sha256_array};
pub use keys::{PulsarKeypair, PulsarPublicKey, PulsarSignature};
