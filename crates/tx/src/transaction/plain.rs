// Path: crates/tx/src/transaction/plain.rs
//! JSON-friendly view of a transaction.
//!
//! Byte fields are kept as hex in `raw` and, when the account kind defines a
//! layout for them, decoded into `details`. Details are output only; reading
//! a plain transaction back uses the raw bytes.

use super::{Transaction, TransactionFormat};
use crate::contracts::{
    HtlcContract, PlainContractData, PlainContractProof, PlainStakingData, StakingContract,
    VestingContract,
};
use nimiq_crypto::SignatureProof;
use nimiq_types::app::{AccountType, Address, NetworkId, TransactionFlags};
use nimiq_types::codec::from_bytes_canonical;
use nimiq_types::config::GenesisInfo;
use nimiq_types::error::{CodecError, TransactionError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A byte field in hex plus its decoded form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(bound(serialize = "D: Serialize", deserialize = ""))]
pub struct PlainField<D> {
    /// Lowercase hex of the bytes.
    pub raw: String,
    /// The decoded bytes, if the account kind defines a layout.
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub details: Option<D>,
}

impl<D> PlainField<D> {
    fn new(raw: &[u8], details: Option<D>) -> Self {
        Self {
            raw: hex::encode(raw),
            details,
        }
    }

    fn bytes(&self) -> Result<Vec<u8>, TransactionError> {
        hex::decode(&self.raw)
            .map_err(|e| CodecError::Invalid(format!("hex field: {e}")).into())
    }
}

/// A [`Transaction`] in plain form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlainTransaction {
    /// Hex content hash.
    pub transaction_hash: String,
    /// `basic` or `extended`.
    pub format: TransactionFormat,
    /// User-friendly sender address.
    pub sender: String,
    /// Kind of the sender account.
    pub sender_type: AccountType,
    /// User-friendly recipient address.
    pub recipient: String,
    /// Kind of the recipient account.
    pub recipient_type: AccountType,
    /// Amount in luna.
    pub value: u64,
    /// Fee in luna.
    pub fee: u64,
    /// Fee divided by the serialized size.
    pub fee_per_byte: f64,
    /// First valid block height.
    pub validity_start_height: u32,
    /// Estimated timestamp of the first valid block, when genesis is known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validity_start_timestamp: Option<u64>,
    /// The network.
    pub network: NetworkId,
    /// Raw flag bits.
    pub flags: u8,
    /// Data read by the sender account.
    pub sender_data: PlainField<PlainStakingData>,
    /// Data read by the recipient account.
    pub data: PlainField<PlainContractData>,
    /// The serialized proof.
    pub proof: PlainField<PlainContractProof>,
    /// Serialized size in bytes.
    pub size: usize,
}

impl Transaction {
    /// The plain view, with timestamps estimated from `genesis` if given.
    pub fn to_plain(&self, genesis: Option<&GenesisInfo>) -> PlainTransaction {
        PlainTransaction {
            transaction_hash: self.hash(),
            format: self.format(),
            sender: self.sender.to_user_friendly(true),
            sender_type: self.sender_type,
            recipient: self.recipient.to_user_friendly(true),
            recipient_type: self.recipient_type,
            value: self.value,
            fee: self.fee,
            fee_per_byte: self.fee_per_byte(),
            validity_start_height: self.validity_start_height,
            validity_start_timestamp: genesis
                .map(|g| g.estimate_timestamp(self.validity_start_height)),
            network: self.network_id,
            flags: self.flags.bits(),
            sender_data: PlainField::new(&self.sender_data, self.sender_data_details()),
            data: PlainField::new(&self.data, self.data_details()),
            proof: PlainField::new(&self.proof, self.proof_details()),
            size: self.serialized_size(),
        }
    }

    /// Rebuilds a transaction from its plain view. `details` are ignored.
    pub fn from_plain(plain: &PlainTransaction) -> Result<Self, TransactionError> {
        let mut tx = Self::new_basic(
            Address::from_str(&plain.sender)?,
            Address::from_str(&plain.recipient)?,
            plain.value,
            plain.fee,
            plain.validity_start_height,
            plain.network,
        );
        tx.sender_type = plain.sender_type;
        tx.recipient_type = plain.recipient_type;
        tx.flags = TransactionFlags::from_bits(plain.flags).ok_or(CodecError::UnknownDiscriminant {
            ty: "TransactionFlags",
            value: u64::from(plain.flags),
        })?;
        tx.set_data(plain.data.bytes()?)?;
        tx.set_sender_data(plain.sender_data.bytes()?)?;
        tx.set_proof(plain.proof.bytes()?)?;
        Ok(tx)
    }

    fn data_details(&self) -> Option<PlainContractData> {
        let creation = self.flags.contains(TransactionFlags::CONTRACT_CREATION);
        match self.recipient_type {
            AccountType::Vesting if creation => VestingContract::data_to_plain(&self.data, self.value)
                .ok()
                .map(PlainContractData::Vesting),
            AccountType::Htlc if creation => HtlcContract::data_to_plain(&self.data)
                .ok()
                .map(PlainContractData::Htlc),
            AccountType::Staking => StakingContract::data_to_plain(&self.data)
                .ok()
                .map(PlainContractData::Staking),
            _ => None,
        }
    }

    fn sender_data_details(&self) -> Option<PlainStakingData> {
        match self.sender_type {
            AccountType::Staking => StakingContract::sender_data_to_plain(&self.sender_data).ok(),
            _ => None,
        }
    }

    fn proof_details(&self) -> Option<PlainContractProof> {
        match self.sender_type {
            AccountType::Htlc => HtlcContract::proof_to_plain(&self.proof)
                .ok()
                .map(PlainContractProof::Htlc),
            _ => from_bytes_canonical::<SignatureProof>(&self.proof)
                .ok()
                .map(|p| PlainContractProof::Signature(p.to_plain())),
        }
    }
}
