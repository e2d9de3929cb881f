// Path: crates/api/src/lib.rs

//! # Albatross Core API Crate Lints
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
        clippy::todo,
        clippy::unimplemented,
        clippy::indexing_slicing
    )
)]
//! # Albatross Core API
//!
//! The stable traits shared by the key, signature and transaction crates.

/// Defines unified traits for cryptographic primitives.
pub mod crypto;
/// Re-exports all core error types from the central `nimiq-types` crate.
pub mod error;

/// A curated set of the most commonly used traits and types.
pub mod prelude {
    pub use crate::crypto::{SerializableKey, Signature, SigningKey, SigningKeyPair, VerifyingKey};
    pub use crate::error::{CryptoError, ErrorCode, TransactionError};
}
