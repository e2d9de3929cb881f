// Path: crates/types/src/app/mod.rs
//! Application-level data structures shared by every crate.

/// Account kinds and transaction flag bits.
pub mod account;
/// The canonical `Address` and its hex / user-friendly encodings.
pub mod address;
/// Network identifiers.
pub mod network;

pub use account::{AccountType, TransactionFlags};
pub use address::{Address, ADDRESS_LEN};
pub use network::NetworkId;
