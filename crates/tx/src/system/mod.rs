// Path: crates/tx/src/system/mod.rs
//! Signing and stateless verification of transactions.

pub mod signing;
pub mod validation;
