// Path: crates/crypto/src/lib.rs
//! # Albatross Core Crypto Crate Lints
//!
//! This crate enforces a strict set of lints to ensure high-quality,
//! panic-free, and well-documented code. Panics are disallowed in non-test
//! code to promote robust error handling.
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]
//! # Albatross Core Cryptography
//!
//! Ed25519 transaction keys, BLS12-381 voting keys, ES256 (P-256) WebAuthn
//! keys, the `SignatureProof` wire type, hashing, key derivation and the
//! Merkle tree used for multi-signature key sets.

pub mod algorithms;
pub mod error;
pub mod merkle;
pub mod sign;

pub use algorithms::hash::{blake2b, sha256, sha512};
pub use merkle::{MerklePath, MerkleTree};
pub use sign::proof::{ProofSignature, SignatureProof, SignerKey, WebauthnFields};
