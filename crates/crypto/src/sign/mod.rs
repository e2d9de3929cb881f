// Path: crates/crypto/src/sign/mod.rs
//! Signature schemes and the `SignatureProof` wire type.

pub mod bls;
pub mod eddsa;
pub mod es256;
pub mod proof;
