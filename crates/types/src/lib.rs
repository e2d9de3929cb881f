// Path: crates/types/src/lib.rs
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::indexing_slicing
    )
)]

//! # Albatross Core Types
//!
//! This crate is the foundational library of the workspace, containing the
//! canonical binary codec, the `Address` type, account and network
//! identifiers, the consensus `Policy` arithmetic, configuration objects and
//! every error enum used across the other crates.
//!
//! ## Architectural Role
//!
//! As the base crate, `nimiq-types` has minimal dependencies and is itself a
//! dependency for every other crate in the workspace. Keeping the shared
//! definitions here prevents circular dependencies between the crypto and
//! transaction crates.

/// A top-level, crate-wide `Result` type alias with a default error type.
pub type Result<T, E = crate::error::CoreError> = std::result::Result<T, E>;

/// Application-level data structures: `Address`, `AccountType`, `NetworkId`.
pub mod app;
/// The canonical, big-endian binary codec used for every wire format.
pub mod codec;
/// Network configuration structures (`NetworkConfig`, `GenesisInfo`).
pub mod config;
/// A unified set of all error types used across the workspace.
pub mod error;
/// Block, batch and epoch arithmetic plus protocol constants.
pub mod policy;
