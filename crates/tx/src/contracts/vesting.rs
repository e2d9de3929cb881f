// Path: crates/tx/src/contracts/vesting.rs
//! Vesting contract creation data.
//!
//! Three layouts exist, distinguished by length:
//!
//! | size | fields |
//! |------|--------|
//! | 28 | `owner ‖ time_step` |
//! | 44 | `owner ‖ start_time ‖ time_step ‖ step_amount` |
//! | 52 | `owner ‖ start_time ‖ time_step ‖ step_amount ‖ total_amount` |
//!
//! Omitted amounts default to the transaction value, an omitted start time to 0.

use super::{parse_exact, parse_signature_proof};
use bytes::BufMut;
use nimiq_crypto::sign::proof::PlainSignatureProof;
use nimiq_types::app::Address;
use nimiq_types::codec::Decode;
use nimiq_types::error::TransactionError;
use serde::Serialize;

const SHORT_SIZE: usize = 28;
const MEDIUM_SIZE: usize = 44;
const FULL_SIZE: usize = 52;

/// Parameters of a vesting contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VestingContract {
    /// The account allowed to withdraw.
    pub owner: Address,
    /// Timestamp (ms) at which vesting starts.
    pub start_time: u64,
    /// Interval (ms) between releases.
    pub time_step: u64,
    /// Amount released per step.
    pub step_amount: u64,
    /// Total amount locked.
    pub total_amount: u64,
}

impl VestingContract {
    /// Parses creation data for a transaction moving `tx_value`.
    pub fn parse_data(data: &[u8], tx_value: u64) -> Result<Self, TransactionError> {
        parse_exact(data, "vesting data", |reader| {
            let owner = Address::decode(reader)?;
            match data.len() {
                SHORT_SIZE => Ok(Self {
                    owner,
                    start_time: 0,
                    time_step: u64::decode(reader)?,
                    step_amount: tx_value,
                    total_amount: tx_value,
                }),
                MEDIUM_SIZE | FULL_SIZE => {
                    let start_time = u64::decode(reader)?;
                    let time_step = u64::decode(reader)?;
                    let step_amount = u64::decode(reader)?;
                    let total_amount = if data.len() == FULL_SIZE {
                        u64::decode(reader)?
                    } else {
                        tx_value
                    };
                    Ok(Self {
                        owner,
                        start_time,
                        time_step,
                        step_amount,
                        total_amount,
                    })
                }
                other => Err(nimiq_types::error::CodecError::Invalid(format!(
                    "{other} bytes, expected {SHORT_SIZE}, {MEDIUM_SIZE} or {FULL_SIZE}"
                ))),
            }
        })
    }

    /// The shortest layout that parses back to `self` for `tx_value`.
    pub fn to_data(&self, tx_value: u64) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FULL_SIZE);
        buf.put_slice(self.owner.as_bytes());
        if self.start_time == 0 && self.step_amount == tx_value && self.total_amount == tx_value {
            buf.put_u64(self.time_step);
            return buf;
        }
        buf.put_u64(self.start_time);
        buf.put_u64(self.time_step);
        buf.put_u64(self.step_amount);
        if self.total_amount != tx_value {
            buf.put_u64(self.total_amount);
        }
        buf
    }

    /// Plain view of creation data.
    pub fn data_to_plain(data: &[u8], tx_value: u64) -> Result<PlainVestingData, TransactionError> {
        let contract = Self::parse_data(data, tx_value)?;
        Ok(PlainVestingData {
            owner: contract.owner.to_user_friendly(true),
            start_time: contract.start_time,
            time_step: contract.time_step,
            step_amount: contract.step_amount,
            total_amount: contract.total_amount,
        })
    }

    /// Plain view of an outgoing proof: the owner's signature proof.
    pub fn proof_to_plain(proof: &[u8]) -> Result<PlainSignatureProof, TransactionError> {
        Ok(parse_signature_proof(proof, "vesting proof")?.to_plain())
    }
}

/// Plain vesting creation data.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlainVestingData {
    /// User-friendly owner address.
    pub owner: String,
    /// Start timestamp (ms).
    pub start_time: u64,
    /// Release interval (ms).
    pub time_step: u64,
    /// Amount per release.
    pub step_amount: u64,
    /// Total locked amount.
    pub total_amount: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Address {
        Address::new([0x11; 20])
    }

    #[test]
    fn short_layout_defaults_to_value() {
        let mut data = owner().as_bytes().to_vec();
        data.extend_from_slice(&1_000u64.to_be_bytes());
        let contract = VestingContract::parse_data(&data, 5_000).unwrap();
        assert_eq!(contract.owner, owner());
        assert_eq!(contract.start_time, 0);
        assert_eq!(contract.time_step, 1_000);
        assert_eq!(contract.step_amount, 5_000);
        assert_eq!(contract.total_amount, 5_000);
        assert_eq!(contract.to_data(5_000), data);
    }

    #[test]
    fn medium_and_full_layouts() {
        let contract = VestingContract {
            owner: owner(),
            start_time: 10,
            time_step: 20,
            step_amount: 30,
            total_amount: 90,
        };
        let medium = contract.to_data(90);
        assert_eq!(medium.len(), MEDIUM_SIZE);
        assert_eq!(VestingContract::parse_data(&medium, 90).unwrap(), contract);

        let full = contract.to_data(100);
        assert_eq!(full.len(), FULL_SIZE);
        assert_eq!(VestingContract::parse_data(&full, 100).unwrap(), contract);
    }

    #[test]
    fn other_lengths_are_malformed() {
        for len in [0, 20, 27, 29, 45, 53] {
            assert!(matches!(
                VestingContract::parse_data(&vec![0u8; len], 1),
                Err(TransactionError::MalformedData(_))
            ));
        }
    }

    #[test]
    fn plain_data_uses_user_friendly_owner() {
        let data = VestingContract {
            owner: owner(),
            start_time: 0,
            time_step: 7,
            step_amount: 3,
            total_amount: 3,
        }
        .to_data(3);
        let plain = VestingContract::data_to_plain(&data, 3).unwrap();
        assert_eq!(plain.owner, owner().to_user_friendly(true));
        let json = serde_json::to_value(&plain).unwrap();
        assert_eq!(json["timeStep"], 7);
    }

    #[test]
    fn proof_must_be_exactly_one_signature_proof() {
        let proof = nimiq_crypto::SignatureProof::default().to_bytes();
        assert!(VestingContract::proof_to_plain(&proof).is_ok());
        let mut long = proof.clone();
        long.push(0);
        assert!(matches!(
            VestingContract::proof_to_plain(&long),
            Err(TransactionError::MalformedData(_))
        ));
    }
}
