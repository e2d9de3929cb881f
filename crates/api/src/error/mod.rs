// Path: crates/api/src/error/mod.rs
// Re-export all core error types from the central types crate.
pub use nimiq_types::error::{
    AddressError, CodecError, CoreError, CryptoError, ErrorCode, TransactionError, ValidationError,
};
pub use nimiq_types::Result;
