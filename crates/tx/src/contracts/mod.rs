// Path: crates/tx/src/contracts/mod.rs
//! Parsers for the data and proofs of transactions touching contracts.
//!
//! Every parser is a pure function of its input bytes. Layout mismatches
//! surface as [`TransactionError::MalformedData`].

pub mod htlc;
pub mod staking;
pub mod vesting;

use nimiq_crypto::sign::proof::PlainSignatureProof;
use nimiq_crypto::SignatureProof;
use nimiq_types::codec::Decode;
use nimiq_types::error::{CodecError, TransactionError};
use serde::Serialize;

pub use htlc::{HtlcContract, HtlcProof, PlainHtlcData, PlainHtlcProof};
pub use staking::{
    IncomingStakingTransactionData, OutgoingStakingTransactionData, PlainStakingData,
    StakingContract,
};
pub use vesting::{PlainVestingData, VestingContract};

/// Runs `parse` over all of `bytes`, rejecting leftovers.
pub(crate) fn parse_exact<T>(
    bytes: &[u8],
    what: &str,
    parse: impl FnOnce(&mut &[u8]) -> Result<T, CodecError>,
) -> Result<T, TransactionError> {
    let mut reader = bytes;
    let value =
        parse(&mut reader).map_err(|e| TransactionError::MalformedData(format!("{what}: {e}")))?;
    if !reader.is_empty() {
        return Err(TransactionError::MalformedData(format!(
            "{what}: {} trailing bytes",
            reader.len()
        )));
    }
    Ok(value)
}

/// Parses a proof field that holds exactly one `SignatureProof`.
pub(crate) fn parse_signature_proof(
    bytes: &[u8],
    what: &str,
) -> Result<SignatureProof, TransactionError> {
    parse_exact(bytes, what, SignatureProof::decode)
}

/// Plain view of recipient data, by recipient kind.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum PlainContractData {
    /// Vesting creation data.
    Vesting(PlainVestingData),
    /// HTLC creation data.
    Htlc(PlainHtlcData),
    /// Incoming staking data.
    Staking(PlainStakingData),
}

/// Plain view of a proof, by sender kind.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(untagged)]
pub enum PlainContractProof {
    /// A single `SignatureProof` (basic, vesting and staking senders).
    Signature(PlainSignatureProof),
    /// An HTLC resolution proof.
    Htlc(PlainHtlcProof),
}
