// Path: crates/crypto/src/algorithms/mod.rs
//! Hash functions and password-based key derivation.

pub mod hash;
pub mod kdf;
