// Copyright (c) 2026 ALAS Technology. MIT License.
// See LICENSE for details.

//! # PULSAR Protocol - Wire Model Library
//!
//! Typed representations of PULSAR ledger-protocol values and their
//! canonical binary wire encoding. This crate is the layer between "I
//! want to pay this account" and the exact bytes a validator will accept:
//! transaction assembly, validity preconditions, fee and threshold
//! derivation, signature-payload composition, and result decoding.
//!
//! ## Architecture
//!
//! - **xdr** - the codec contract: big-endian, 4-byte-aligned primitives,
//!   discriminated unions, optionals. Everything else is built on it.
//! - **crypto** - Ed25519 keys and SHA-256 digests, wrapped thin.
//! - **account** - account ids, muxed accounts, signer keys, addresses.
//! - **transaction** - the interesting part: assembly of current and
//!   legacy shapes, precondition normalization, fee bumps, the canonical
//!   signature payload, and result interpretation.
//! - **config** - every protocol-fixed constant, in one place.
//!
//! ## Design Rules
//!
//! 1. Model values are immutable; mutators are copy-on-write and return
//!    a new value. The one exception is an envelope collecting
//!    signatures, which appends in place because signatures are not part
//!    of the signed value. There is no shared state anywhere in this
//!    crate.
//! 2. Length bounds are enforced at construction, so encoding never
//!    fails. Decoding validates everything, because the input is the
//!    network.
//! 3. What is signed is exactly what is transmitted. The one place that
//!    rewrites a transaction (legacy-shape normalization) exists so both
//!    shapes sign byte-identically, and it lives in exactly one module.

pub mod account;
pub mod config;
pub mod crypto;
pub mod transaction;
pub mod xdr;
