// Path: crates/tx/src/lib.rs
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]
//! # Albatross Transactions
//!
//! The `Transaction` entity with its canonical basic and extended wire
//! formats, the `TransactionBuilder` for common transaction shapes, parsers
//! for vesting, HTLC and staking contract data, and stateless verification.

pub mod builder;
pub mod contracts;
pub mod system;
pub mod transaction;

pub use builder::TransactionBuilder;
pub use system::signing::TransactionSigner;
pub use system::validation::verify_transaction;
pub use transaction::plain::PlainTransaction;
pub use transaction::{Transaction, TransactionFormat, TransactionParams};
