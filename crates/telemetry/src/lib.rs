// Path: crates/telemetry/src/lib.rs
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

//! # Albatross Core Telemetry
//!
//! Installs the global `tracing` subscriber used by binaries and tests that
//! exercise the core primitives. Library crates only emit events; `log`
//! records from the crypto crate are bridged into the same pipeline.

/// The initialization routines for global structured logging.
pub mod init;

pub use init::{init_test_tracing, init_tracing, init_with, LogFormat, TelemetryConfig};
