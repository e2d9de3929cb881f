// Path: crates/crypto/src/error.rs
//! Local error types for the `nimiq-crypto` crate.

// Re-export the canonical error type from the API crate.
pub use nimiq_api::error::CryptoError;
