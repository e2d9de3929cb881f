// Path: crates/tx/src/transaction/mod.rs
//! The `Transaction` entity and its canonical encodings.
//!
//! A transaction has two wire formats. The compact *basic* format is used
//! whenever both accounts are basic, there is no recipient or sender data,
//! no flags, and the proof is an Ed25519 single signature by the sender:
//!
//! `0x00 ‖ public key ‖ recipient ‖ value ‖ fee ‖ validity start ‖ network ‖ signature`
//!
//! Everything else uses the *extended* format, `0x01 ‖ content ‖ u16 proof
//! length ‖ proof`, where the content is the byte string that is hashed and
//! signed:
//!
//! `u16 data length ‖ data ‖ sender ‖ sender type ‖ recipient ‖ recipient type
//! ‖ value ‖ fee ‖ validity start ‖ network ‖ flags ‖ u16 sender data length ‖
//! sender data`

pub mod plain;

use crate::contracts::htlc::HtlcContract;
use crate::contracts::vesting::VestingContract;
use crate::system::signing::TransactionSigner;
use bytes::BufMut;
use nimiq_crypto::sign::eddsa::{Ed25519PublicKey, Ed25519Signature};
use nimiq_crypto::{blake2b, ProofSignature, SignatureProof, SignerKey};
use nimiq_types::app::{AccountType, Address, NetworkId, TransactionFlags};
use nimiq_types::codec::{
    check_var_len, from_bytes_canonical, put_var_bytes, read_u8, read_var_bytes,
    to_bytes_canonical, var_bytes_len, Decode, Encode,
};
use nimiq_types::error::{CodecError, TransactionError, ValidationError};
use nimiq_types::policy::Policy;
use serde::{Deserialize, Serialize};

/// Encoded size of a basic-format transaction.
pub const BASIC_TRANSACTION_SIZE: usize = 138;

/// Encoded size of the content without data and sender data.
const CONTENT_FIXED_SIZE: usize = 2 + 20 + 1 + 20 + 1 + 8 + 8 + 4 + 1 + 1 + 2;

/// The wire format a transaction serializes to.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum TransactionFormat {
    /// Compact single-signature format.
    Basic = 0,
    /// General format.
    Extended = 1,
}

impl TransactionFormat {
    /// The stable lowercase name used in plain objects.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Extended => "extended",
        }
    }
}

/// Construction parameters for [`Transaction::new`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransactionParams {
    /// The paying account.
    pub sender: Address,
    /// Kind of the paying account.
    pub sender_type: AccountType,
    /// Data interpreted by the sender account.
    pub sender_data: Vec<u8>,
    /// The receiving account. Replaced by the derived contract address when
    /// `flags` contains `CONTRACT_CREATION`.
    pub recipient: Address,
    /// Kind of the receiving account.
    pub recipient_type: AccountType,
    /// Data interpreted by the recipient account.
    pub data: Vec<u8>,
    /// Amount moved, in luna.
    pub value: u64,
    /// Fee paid, in luna.
    pub fee: u64,
    /// Flag bits.
    pub flags: TransactionFlags,
    /// First block height at which the transaction is valid.
    pub validity_start_height: u32,
    /// Network the transaction is bound to.
    pub network_id: NetworkId,
}

impl Default for TransactionParams {
    fn default() -> Self {
        Self {
            sender: Address::default(),
            sender_type: AccountType::Basic,
            sender_data: Vec::new(),
            recipient: Address::default(),
            recipient_type: AccountType::Basic,
            data: Vec::new(),
            value: 0,
            fee: 0,
            flags: TransactionFlags::empty(),
            validity_start_height: 0,
            network_id: NetworkId::MainAlbatross,
        }
    }
}

/// A value transfer or contract interaction between two accounts.
///
/// The byte fields are only reachable through setters, which keep each of
/// them within its `u16` length prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    /// The paying account.
    pub sender: Address,
    /// Kind of the paying account.
    pub sender_type: AccountType,
    sender_data: Vec<u8>,
    /// The receiving account.
    pub recipient: Address,
    /// Kind of the receiving account.
    pub recipient_type: AccountType,
    data: Vec<u8>,
    /// Amount moved, in luna.
    pub value: u64,
    /// Fee paid, in luna.
    pub fee: u64,
    /// Flag bits.
    pub flags: TransactionFlags,
    /// First block height at which the transaction is valid.
    pub validity_start_height: u32,
    /// Network the transaction is bound to.
    pub network_id: NetworkId,
    proof: Vec<u8>,
}

impl Transaction {
    /// Creates an unsigned transaction, checking the construction rules.
    pub fn new(params: TransactionParams) -> Result<Self, TransactionError> {
        check_var_len(params.data.len())
            .map_err(|_| ValidationError::DataTooLong(params.data.len()))?;
        check_var_len(params.sender_data.len())
            .map_err(|_| ValidationError::SenderDataTooLong(params.sender_data.len()))?;

        let flags = params.flags;
        if flags.contains(TransactionFlags::CONTRACT_CREATION | TransactionFlags::SIGNALING) {
            return Err(ValidationError::InvalidFlags(flags.bits()).into());
        }

        let mut tx = Self {
            sender: params.sender,
            sender_type: params.sender_type,
            sender_data: params.sender_data,
            recipient: params.recipient,
            recipient_type: params.recipient_type,
            data: params.data,
            value: params.value,
            fee: params.fee,
            flags,
            validity_start_height: params.validity_start_height,
            network_id: params.network_id,
            proof: Vec::new(),
        };

        if flags.contains(TransactionFlags::CONTRACT_CREATION) {
            tx.check_contract_creation_data()?;
            tx.recipient = tx.contract_creation_address();
        }
        if flags.contains(TransactionFlags::SIGNALING) && tx.data.is_empty() {
            return Err(ValidationError::EmptySignalingData.into());
        }
        Ok(tx)
    }

    /// A basic-to-basic transfer without data.
    pub fn new_basic(
        sender: Address,
        recipient: Address,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Self {
        Self {
            sender,
            sender_type: AccountType::Basic,
            sender_data: Vec::new(),
            recipient,
            recipient_type: AccountType::Basic,
            data: Vec::new(),
            value,
            fee,
            flags: TransactionFlags::empty(),
            validity_start_height,
            network_id,
            proof: Vec::new(),
        }
    }

    pub(crate) fn check_contract_creation_data(&self) -> Result<(), TransactionError> {
        let parsed = match self.recipient_type {
            AccountType::Vesting => VestingContract::parse_data(&self.data, self.value).map(drop),
            AccountType::Htlc => HtlcContract::parse_data(&self.data).map(drop),
            _ => return Err(ValidationError::InvalidContractCreationRecipientType.into()),
        };
        parsed.map_err(|e| ValidationError::InvalidContractCreationData(e.to_string()).into())
    }

    /// The bytes that are hashed and signed.
    pub fn serialize_content(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.content_len());
        self.encode_content(&mut buf);
        buf
    }

    fn content_len(&self) -> usize {
        CONTENT_FIXED_SIZE + self.data.len() + self.sender_data.len()
    }

    fn encode_content<B: BufMut>(&self, buf: &mut B) {
        put_var_bytes(buf, &self.data);
        self.sender.encode(buf);
        self.sender_type.encode(buf);
        self.recipient.encode(buf);
        self.recipient_type.encode(buf);
        buf.put_u64(self.value);
        buf.put_u64(self.fee);
        buf.put_u32(self.validity_start_height);
        self.network_id.encode(buf);
        self.flags.encode(buf);
        put_var_bytes(buf, &self.sender_data);
    }

    /// The full wire encoding.
    pub fn serialize(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }

    /// Parses a full wire encoding; trailing bytes are an error.
    pub fn deserialize(bytes: &[u8]) -> Result<Self, TransactionError> {
        Ok(from_bytes_canonical(bytes)?)
    }

    /// Length of [`Transaction::serialize`] in bytes.
    pub fn serialized_size(&self) -> usize {
        self.encoded_len()
    }

    /// Blake2b-256 of the content.
    pub fn hash_bytes(&self) -> [u8; 32] {
        blake2b(self.serialize_content())
    }

    /// Lowercase hex of [`Transaction::hash_bytes`], without a prefix.
    pub fn hash(&self) -> String {
        hex::encode(self.hash_bytes())
    }

    /// The parsed proof, if it is a well-formed `SignatureProof`.
    pub fn signature_proof(&self) -> Option<SignatureProof> {
        from_bytes_canonical(&self.proof).ok()
    }

    fn basic_parts(&self) -> Option<(Ed25519PublicKey, Ed25519Signature)> {
        if self.sender_type != AccountType::Basic
            || self.recipient_type != AccountType::Basic
            || !self.data.is_empty()
            || !self.sender_data.is_empty()
            || !self.flags.is_empty()
        {
            return None;
        }
        match self.signature_proof()? {
            SignatureProof::SingleSig {
                key: SignerKey::Ed25519(key),
                signature: ProofSignature::Ed25519(signature),
            } if key.to_address() == self.sender => Some((key, signature)),
            _ => None,
        }
    }

    /// The format [`Transaction::serialize`] will use.
    pub fn format(&self) -> TransactionFormat {
        if self.basic_parts().is_some() {
            TransactionFormat::Basic
        } else {
            TransactionFormat::Extended
        }
    }

    /// Data interpreted by the recipient account.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Data interpreted by the sender account.
    pub fn sender_data(&self) -> &[u8] {
        &self.sender_data
    }

    /// The serialized proof authorizing the sender side.
    pub fn proof(&self) -> &[u8] {
        &self.proof
    }

    /// Replaces the recipient data.
    pub fn set_data(&mut self, data: Vec<u8>) -> Result<(), TransactionError> {
        check_var_len(data.len()).map_err(|_| ValidationError::DataTooLong(data.len()))?;
        self.data = data;
        Ok(())
    }

    /// Replaces the sender data.
    pub fn set_sender_data(&mut self, sender_data: Vec<u8>) -> Result<(), TransactionError> {
        check_var_len(sender_data.len())
            .map_err(|_| ValidationError::SenderDataTooLong(sender_data.len()))?;
        self.sender_data = sender_data;
        Ok(())
    }

    /// Replaces the serialized proof.
    pub fn set_proof(&mut self, proof: Vec<u8>) -> Result<(), TransactionError> {
        check_var_len(proof.len()).map_err(|_| ValidationError::ProofTooLong(proof.len()))?;
        self.proof = proof;
        Ok(())
    }

    /// Stores `proof` as the transaction proof.
    pub fn set_signature_proof(&mut self, proof: &SignatureProof) -> Result<(), TransactionError> {
        self.set_proof(proof.to_bytes())
    }

    /// Signs the transaction with `signer`, see [`TransactionSigner`].
    pub fn sign<S: TransactionSigner + ?Sized>(&mut self, signer: &S) -> Result<(), TransactionError> {
        signer.sign_transaction(self)
    }

    /// Stateless verification, see [`crate::system::validation::verify_transaction`].
    pub fn verify(&self, network_id: Option<NetworkId>) -> Result<(), TransactionError> {
        crate::system::validation::verify_transaction(self, network_id)
    }

    /// Whether the transaction may be included in the block at `block_height`.
    pub fn is_valid_at(&self, block_height: u32) -> bool {
        let start = u64::from(self.validity_start_height);
        let height = u64::from(block_height);
        start <= height && height < start + u64::from(Policy::TRANSACTION_VALIDITY_WINDOW_BLOCKS)
    }

    /// The address a contract created by this transaction lives at: the
    /// first 20 bytes of the content hash, computed with the recipient set to
    /// [`Address::CONTRACT_CREATION`].
    pub fn contract_creation_address(&self) -> Address {
        let mut tx = self.clone();
        tx.recipient = Address::CONTRACT_CREATION;
        Address::from_digest(&tx.hash_bytes())
    }

    /// Fee divided by the serialized size.
    pub fn fee_per_byte(&self) -> f64 {
        self.fee as f64 / self.serialized_size() as f64
    }

    /// Total amount leaving the sender, `None` on overflow.
    pub fn total_value(&self) -> Option<u64> {
        self.value.checked_add(self.fee)
    }
}

impl Encode for Transaction {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        match self.basic_parts() {
            Some((key, signature)) => {
                buf.put_u8(TransactionFormat::Basic as u8);
                key.encode(buf);
                self.recipient.encode(buf);
                buf.put_u64(self.value);
                buf.put_u64(self.fee);
                buf.put_u32(self.validity_start_height);
                self.network_id.encode(buf);
                signature.encode(buf);
            }
            None => {
                buf.put_u8(TransactionFormat::Extended as u8);
                self.encode_content(buf);
                put_var_bytes(buf, &self.proof);
            }
        }
    }

    fn encoded_len(&self) -> usize {
        match self.format() {
            TransactionFormat::Basic => BASIC_TRANSACTION_SIZE,
            TransactionFormat::Extended => 1 + self.content_len() + var_bytes_len(&self.proof),
        }
    }
}

impl Decode for Transaction {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        match read_u8(reader)? {
            0 => {
                let key = Ed25519PublicKey::decode(reader)?;
                let recipient = Address::decode(reader)?;
                let value = u64::decode(reader)?;
                let fee = u64::decode(reader)?;
                let validity_start_height = u32::decode(reader)?;
                let network_id = NetworkId::decode(reader)?;
                let signature = Ed25519Signature::decode(reader)?;
                let mut tx = Self::new_basic(
                    key.to_address(),
                    recipient,
                    value,
                    fee,
                    validity_start_height,
                    network_id,
                );
                tx.proof = SignatureProof::from_ed25519(key, signature).to_bytes();
                Ok(tx)
            }
            1 => Ok(Self {
                data: read_var_bytes(reader)?,
                sender: Address::decode(reader)?,
                sender_type: AccountType::decode(reader)?,
                recipient: Address::decode(reader)?,
                recipient_type: AccountType::decode(reader)?,
                value: u64::decode(reader)?,
                fee: u64::decode(reader)?,
                validity_start_height: u32::decode(reader)?,
                network_id: NetworkId::decode(reader)?,
                flags: TransactionFlags::decode(reader)?,
                sender_data: read_var_bytes(reader)?,
                proof: read_var_bytes(reader)?,
            }),
            other => Err(CodecError::UnknownDiscriminant {
                ty: "TransactionFormat",
                value: u64::from(other),
            }),
        }
    }
}
