// Path: crates/tx/src/contracts/staking.rs
//! Staking contract operations.
//!
//! Incoming operations live in the recipient data of a transaction to
//! [`Address::STAKING_CONTRACT`]: a discriminant byte followed by the
//! operation's fields. Every operation except `AddStake` ends with an inner
//! [`SignatureProof`] by the validator or staker key, computed over the
//! transaction content with that inner proof replaced by the all-zero
//! placeholder.
//!
//! Outgoing operations (`DeleteValidator`, `RemoveStake`) are a single byte of
//! sender data; their authorization is the regular transaction proof.

use super::{parse_exact, parse_signature_proof};
use crate::transaction::Transaction;
use bytes::BufMut;
use nimiq_crypto::sign::bls::{BlsPublicKey, BlsSignature};
use nimiq_crypto::sign::eddsa::Ed25519PublicKey;
use nimiq_crypto::sign::proof::PlainSignatureProof;
use nimiq_crypto::SignatureProof;
use nimiq_types::app::{Address, TransactionFlags};
use nimiq_types::codec::{read_u8, to_bytes_canonical, Decode, Encode};
use nimiq_types::error::{CodecError, TransactionError, ValidationError};
use nimiq_types::policy::Policy;
use serde::Serialize;

/// An operation sent to the staking contract.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingStakingTransactionData {
    /// Registers a validator, locking [`Policy::VALIDATOR_DEPOSIT`].
    CreateValidator {
        /// Key signing micro blocks.
        signing_key: Ed25519PublicKey,
        /// BLS key voting on macro blocks.
        voting_key: BlsPublicKey,
        /// Account receiving the rewards.
        reward_address: Address,
        /// Free-form signal.
        signal_data: Option<[u8; 32]>,
        /// The voting key's signature over itself.
        proof_of_knowledge: BlsSignature,
        /// Signature by the validator's cold key.
        proof: SignatureProof,
    },
    /// Changes validator parameters; `None` leaves a field unchanged.
    UpdateValidator {
        /// Replacement signing key.
        new_signing_key: Option<Ed25519PublicKey>,
        /// Replacement voting key.
        new_voting_key: Option<BlsPublicKey>,
        /// Replacement reward address.
        new_reward_address: Option<Address>,
        /// Replacement signal; `Some(None)` clears it.
        new_signal_data: Option<Option<[u8; 32]>>,
        /// Proof of knowledge for the new voting key.
        new_proof_of_knowledge: Option<BlsSignature>,
        /// Signature by the validator's cold key.
        proof: SignatureProof,
    },
    /// Stops a validator from producing blocks.
    DeactivateValidator {
        /// The validator.
        validator_address: Address,
        /// Signature by the validator's signing key.
        proof: SignatureProof,
    },
    /// Resumes an inactive validator.
    ReactivateValidator {
        /// The validator.
        validator_address: Address,
        /// Signature by the validator's signing key.
        proof: SignatureProof,
    },
    /// Permanently retires a validator ahead of deletion.
    RetireValidator {
        /// Signature by the validator's cold key.
        proof: SignatureProof,
    },
    /// Registers a staker funded by the transaction value.
    CreateStaker {
        /// Validator to delegate to.
        delegation: Option<Address>,
        /// Signature by the staker key.
        proof: SignatureProof,
    },
    /// Adds the transaction value to an existing staker.
    AddStake {
        /// The staker credited.
        staker_address: Address,
    },
    /// Changes a staker's delegation.
    UpdateStaker {
        /// New validator to delegate to.
        new_delegation: Option<Address>,
        /// Whether inactive stake becomes active again.
        reactivate_all_stake: bool,
        /// Signature by the staker key.
        proof: SignatureProof,
    },
    /// Moves stake between the active and inactive balance.
    SetActiveStake {
        /// The resulting active balance.
        new_active_balance: u64,
        /// Signature by the staker key.
        proof: SignatureProof,
    },
    /// Retires inactive stake so it can be removed.
    RetireStake {
        /// Amount retired.
        retire_stake: u64,
        /// Signature by the staker key.
        proof: SignatureProof,
    },
}

impl IncomingStakingTransactionData {
    /// Parses complete recipient data.
    pub fn parse(data: &[u8]) -> Result<Self, TransactionError> {
        parse_exact(data, "staking data", Self::decode)
    }

    /// Serializes the operation.
    pub fn to_data(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }

    fn discriminant(&self) -> u8 {
        match self {
            Self::CreateValidator { .. } => 0,
            Self::UpdateValidator { .. } => 1,
            Self::DeactivateValidator { .. } => 2,
            Self::ReactivateValidator { .. } => 3,
            Self::RetireValidator { .. } => 4,
            Self::CreateStaker { .. } => 5,
            Self::AddStake { .. } => 6,
            Self::UpdateStaker { .. } => 7,
            Self::SetActiveStake { .. } => 8,
            Self::RetireStake { .. } => 9,
        }
    }

    /// Whether the operation is a zero-value signal. Only the operations
    /// that move funds into the contract are not.
    pub fn is_signaling(&self) -> bool {
        !matches!(
            self,
            Self::CreateValidator { .. } | Self::CreateStaker { .. } | Self::AddStake { .. }
        )
    }

    /// The inner proof, absent for `AddStake`.
    pub fn proof(&self) -> Option<&SignatureProof> {
        match self {
            Self::CreateValidator { proof, .. }
            | Self::UpdateValidator { proof, .. }
            | Self::DeactivateValidator { proof, .. }
            | Self::ReactivateValidator { proof, .. }
            | Self::RetireValidator { proof }
            | Self::CreateStaker { proof, .. }
            | Self::UpdateStaker { proof, .. }
            | Self::SetActiveStake { proof, .. }
            | Self::RetireStake { proof, .. } => Some(proof),
            Self::AddStake { .. } => None,
        }
    }

    fn proof_mut(&mut self) -> Option<&mut SignatureProof> {
        match self {
            Self::CreateValidator { proof, .. }
            | Self::UpdateValidator { proof, .. }
            | Self::DeactivateValidator { proof, .. }
            | Self::ReactivateValidator { proof, .. }
            | Self::RetireValidator { proof }
            | Self::CreateStaker { proof, .. }
            | Self::UpdateStaker { proof, .. }
            | Self::SetActiveStake { proof, .. }
            | Self::RetireStake { proof, .. } => Some(proof),
            Self::AddStake { .. } => None,
        }
    }

    /// Replaces the inner proof. `AddStake` has none to replace.
    pub fn set_proof(&mut self, new_proof: SignatureProof) -> Result<(), TransactionError> {
        match self.proof_mut() {
            Some(proof) => {
                *proof = new_proof;
                Ok(())
            }
            None => Err(TransactionError::Unsupported(
                "add-stake carries no inner proof".to_string(),
            )),
        }
    }

    /// The bytes the inner proof signs: the content of `tx` with this
    /// operation, inner proof zeroed, as recipient data.
    pub fn signing_content(&self, tx: &Transaction) -> Result<Vec<u8>, TransactionError> {
        let mut placeholder = self.clone();
        // AddStake has no proof; its data is already the signing form.
        if let Some(proof) = placeholder.proof_mut() {
            *proof = SignatureProof::default();
        }
        let mut unsigned = tx.clone();
        unsigned.set_data(placeholder.to_data())?;
        Ok(unsigned.serialize_content())
    }

    /// Checks the operation against the transaction carrying it.
    pub fn verify(&self, tx: &Transaction) -> Result<(), TransactionError> {
        if self.is_signaling() != tx.flags.contains(TransactionFlags::SIGNALING) {
            return Err(ValidationError::SignalingMismatch.into());
        }

        match self {
            Self::CreateValidator {
                voting_key,
                proof_of_knowledge,
                ..
            } => {
                if tx.value != Policy::VALIDATOR_DEPOSIT {
                    return Err(ValidationError::InvalidForRecipient(format!(
                        "validator deposit must be {} luna",
                        Policy::VALIDATOR_DEPOSIT
                    ))
                    .into());
                }
                verify_proof_of_knowledge(voting_key, proof_of_knowledge)?;
            }
            Self::UpdateValidator {
                new_signing_key,
                new_voting_key,
                new_reward_address,
                new_signal_data,
                new_proof_of_knowledge,
                ..
            } => {
                if new_signing_key.is_none()
                    && new_voting_key.is_none()
                    && new_reward_address.is_none()
                    && new_signal_data.is_none()
                {
                    return Err(ValidationError::InvalidForRecipient(
                        "update-validator changes nothing".to_string(),
                    )
                    .into());
                }
                match (new_voting_key, new_proof_of_knowledge) {
                    (Some(key), Some(pok)) => verify_proof_of_knowledge(key, pok)?,
                    (None, None) => {}
                    _ => {
                        return Err(ValidationError::InvalidForRecipient(
                            "a new voting key needs a matching proof of knowledge".to_string(),
                        )
                        .into())
                    }
                }
            }
            _ => {}
        }

        if let Some(proof) = self.proof() {
            if !proof.verify(&self.signing_content(tx)?) {
                tracing::debug!(
                    operation = self.discriminant(),
                    "staking inner proof does not verify"
                );
                return Err(TransactionError::InvalidSignature);
            }
        }
        Ok(())
    }

    /// Plain, JSON-friendly view.
    pub fn to_plain(&self) -> PlainStakingData {
        let uf = |a: &Address| a.to_user_friendly(true);
        let proof = |p: &SignatureProof| p.to_plain();
        match self {
            Self::CreateValidator {
                signing_key,
                voting_key,
                reward_address,
                signal_data,
                proof_of_knowledge,
                proof: p,
            } => PlainStakingData::CreateValidator {
                signing_key: signing_key.to_string(),
                voting_key: hex::encode(voting_key.compress()),
                reward_address: uf(reward_address),
                signal_data: signal_data.map(hex::encode),
                proof_of_knowledge: hex::encode(proof_of_knowledge.compress()),
                proof: proof(p),
            },
            Self::UpdateValidator {
                new_signing_key,
                new_voting_key,
                new_reward_address,
                new_signal_data,
                new_proof_of_knowledge,
                proof: p,
            } => PlainStakingData::UpdateValidator {
                new_signing_key: new_signing_key.map(|k| k.to_string()),
                new_voting_key: new_voting_key.map(|k| hex::encode(k.compress())),
                new_reward_address: new_reward_address.as_ref().map(uf),
                new_signal_data: new_signal_data.map(|s| s.map(hex::encode)),
                new_proof_of_knowledge: new_proof_of_knowledge.map(|s| hex::encode(s.compress())),
                proof: proof(p),
            },
            Self::DeactivateValidator {
                validator_address,
                proof: p,
            } => PlainStakingData::DeactivateValidator {
                validator: uf(validator_address),
                proof: proof(p),
            },
            Self::ReactivateValidator {
                validator_address,
                proof: p,
            } => PlainStakingData::ReactivateValidator {
                validator: uf(validator_address),
                proof: proof(p),
            },
            Self::RetireValidator { proof: p } => {
                PlainStakingData::RetireValidator { proof: proof(p) }
            }
            Self::CreateStaker {
                delegation,
                proof: p,
            } => PlainStakingData::CreateStaker {
                delegation: delegation.as_ref().map(uf),
                proof: proof(p),
            },
            Self::AddStake { staker_address } => PlainStakingData::AddStake {
                staker: uf(staker_address),
            },
            Self::UpdateStaker {
                new_delegation,
                reactivate_all_stake,
                proof: p,
            } => PlainStakingData::UpdateStaker {
                new_delegation: new_delegation.as_ref().map(uf),
                reactivate_all_stake: *reactivate_all_stake,
                proof: proof(p),
            },
            Self::SetActiveStake {
                new_active_balance,
                proof: p,
            } => PlainStakingData::SetActiveStake {
                new_active_balance: *new_active_balance,
                proof: proof(p),
            },
            Self::RetireStake {
                retire_stake,
                proof: p,
            } => PlainStakingData::RetireStake {
                retire_stake: *retire_stake,
                proof: proof(p),
            },
        }
    }
}

fn verify_proof_of_knowledge(
    voting_key: &BlsPublicKey,
    proof_of_knowledge: &BlsSignature,
) -> Result<(), TransactionError> {
    if voting_key.verify_proof_of_knowledge(proof_of_knowledge) {
        Ok(())
    } else {
        Err(TransactionError::InvalidProof(
            "voting key proof of knowledge does not verify".to_string(),
        ))
    }
}

impl Encode for IncomingStakingTransactionData {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.discriminant());
        match self {
            Self::CreateValidator {
                signing_key,
                voting_key,
                reward_address,
                signal_data,
                proof_of_knowledge,
                proof,
            } => {
                signing_key.encode(buf);
                voting_key.encode(buf);
                reward_address.encode(buf);
                signal_data.encode(buf);
                proof_of_knowledge.encode(buf);
                proof.encode(buf);
            }
            Self::UpdateValidator {
                new_signing_key,
                new_voting_key,
                new_reward_address,
                new_signal_data,
                new_proof_of_knowledge,
                proof,
            } => {
                new_signing_key.encode(buf);
                new_voting_key.encode(buf);
                new_reward_address.encode(buf);
                new_signal_data.encode(buf);
                new_proof_of_knowledge.encode(buf);
                proof.encode(buf);
            }
            Self::DeactivateValidator {
                validator_address,
                proof,
            }
            | Self::ReactivateValidator {
                validator_address,
                proof,
            } => {
                validator_address.encode(buf);
                proof.encode(buf);
            }
            Self::RetireValidator { proof } => proof.encode(buf),
            Self::CreateStaker { delegation, proof } => {
                delegation.encode(buf);
                proof.encode(buf);
            }
            Self::AddStake { staker_address } => staker_address.encode(buf),
            Self::UpdateStaker {
                new_delegation,
                reactivate_all_stake,
                proof,
            } => {
                new_delegation.encode(buf);
                reactivate_all_stake.encode(buf);
                proof.encode(buf);
            }
            Self::SetActiveStake {
                new_active_balance: amount,
                proof,
            }
            | Self::RetireStake {
                retire_stake: amount,
                proof,
            } => {
                amount.encode(buf);
                proof.encode(buf);
            }
        }
    }

    fn encoded_len(&self) -> usize {
        let fields = match self {
            Self::CreateValidator {
                signing_key,
                voting_key,
                reward_address,
                signal_data,
                proof_of_knowledge,
                ..
            } => {
                signing_key.encoded_len()
                    + voting_key.encoded_len()
                    + reward_address.encoded_len()
                    + signal_data.encoded_len()
                    + proof_of_knowledge.encoded_len()
            }
            Self::UpdateValidator {
                new_signing_key,
                new_voting_key,
                new_reward_address,
                new_signal_data,
                new_proof_of_knowledge,
                ..
            } => {
                new_signing_key.encoded_len()
                    + new_voting_key.encoded_len()
                    + new_reward_address.encoded_len()
                    + new_signal_data.encoded_len()
                    + new_proof_of_knowledge.encoded_len()
            }
            Self::DeactivateValidator {
                validator_address, ..
            }
            | Self::ReactivateValidator {
                validator_address, ..
            } => validator_address.encoded_len(),
            Self::RetireValidator { .. } => 0,
            Self::CreateStaker { delegation, .. } => delegation.encoded_len(),
            Self::AddStake { staker_address } => staker_address.encoded_len(),
            Self::UpdateStaker { new_delegation, .. } => new_delegation.encoded_len() + 1,
            Self::SetActiveStake { .. } | Self::RetireStake { .. } => 8,
        };
        1 + fields + self.proof().map_or(0, Encode::encoded_len)
    }
}

impl Decode for IncomingStakingTransactionData {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        Ok(match read_u8(reader)? {
            0 => Self::CreateValidator {
                signing_key: Decode::decode(reader)?,
                voting_key: Decode::decode(reader)?,
                reward_address: Decode::decode(reader)?,
                signal_data: Decode::decode(reader)?,
                proof_of_knowledge: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            1 => Self::UpdateValidator {
                new_signing_key: Decode::decode(reader)?,
                new_voting_key: Decode::decode(reader)?,
                new_reward_address: Decode::decode(reader)?,
                new_signal_data: Decode::decode(reader)?,
                new_proof_of_knowledge: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            2 => Self::DeactivateValidator {
                validator_address: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            3 => Self::ReactivateValidator {
                validator_address: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            4 => Self::RetireValidator {
                proof: Decode::decode(reader)?,
            },
            5 => Self::CreateStaker {
                delegation: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            6 => Self::AddStake {
                staker_address: Decode::decode(reader)?,
            },
            7 => Self::UpdateStaker {
                new_delegation: Decode::decode(reader)?,
                reactivate_all_stake: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            8 => Self::SetActiveStake {
                new_active_balance: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            9 => Self::RetireStake {
                retire_stake: Decode::decode(reader)?,
                proof: Decode::decode(reader)?,
            },
            other => {
                return Err(CodecError::UnknownDiscriminant {
                    ty: "IncomingStakingTransactionData",
                    value: u64::from(other),
                })
            }
        })
    }
}

/// An operation withdrawing from the staking contract, carried in sender data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum OutgoingStakingTransactionData {
    /// Withdraws the deposit of a retired, inactive validator.
    DeleteValidator = 0,
    /// Withdraws retired stake.
    RemoveStake = 1,
}

impl OutgoingStakingTransactionData {
    /// Parses complete sender data.
    pub fn parse(sender_data: &[u8]) -> Result<Self, TransactionError> {
        parse_exact(sender_data, "staking sender data", Self::decode)
    }

    /// Serializes the operation.
    pub fn to_data(self) -> Vec<u8> {
        vec![self as u8]
    }

    /// Plain, JSON-friendly view.
    pub fn to_plain(self) -> PlainStakingData {
        match self {
            Self::DeleteValidator => PlainStakingData::DeleteValidator,
            Self::RemoveStake => PlainStakingData::RemoveStake,
        }
    }
}

impl Encode for OutgoingStakingTransactionData {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(*self as u8);
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for OutgoingStakingTransactionData {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        match read_u8(reader)? {
            0 => Ok(Self::DeleteValidator),
            1 => Ok(Self::RemoveStake),
            other => Err(CodecError::UnknownDiscriminant {
                ty: "OutgoingStakingTransactionData",
                value: u64::from(other),
            }),
        }
    }
}

/// Plain views of the staking contract's data and proofs.
pub struct StakingContract;

impl StakingContract {
    /// Plain view of incoming recipient data.
    pub fn data_to_plain(data: &[u8]) -> Result<PlainStakingData, TransactionError> {
        Ok(IncomingStakingTransactionData::parse(data)?.to_plain())
    }

    /// Plain view of outgoing sender data.
    pub fn sender_data_to_plain(sender_data: &[u8]) -> Result<PlainStakingData, TransactionError> {
        Ok(OutgoingStakingTransactionData::parse(sender_data)?.to_plain())
    }

    /// Plain view of an outgoing proof.
    pub fn proof_to_plain(proof: &[u8]) -> Result<PlainSignatureProof, TransactionError> {
        Ok(parse_signature_proof(proof, "staking proof")?.to_plain())
    }
}

/// Plain staking operation, tagged by `type`.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
#[allow(missing_docs)]
pub enum PlainStakingData {
    CreateValidator {
        signing_key: String,
        voting_key: String,
        reward_address: String,
        signal_data: Option<String>,
        proof_of_knowledge: String,
        proof: PlainSignatureProof,
    },
    UpdateValidator {
        new_signing_key: Option<String>,
        new_voting_key: Option<String>,
        new_reward_address: Option<String>,
        /// Absent: unchanged. `null`: cleared.
        #[serde(skip_serializing_if = "Option::is_none")]
        new_signal_data: Option<Option<String>>,
        new_proof_of_knowledge: Option<String>,
        proof: PlainSignatureProof,
    },
    DeactivateValidator {
        validator: String,
        proof: PlainSignatureProof,
    },
    ReactivateValidator {
        validator: String,
        proof: PlainSignatureProof,
    },
    RetireValidator {
        proof: PlainSignatureProof,
    },
    CreateStaker {
        delegation: Option<String>,
        proof: PlainSignatureProof,
    },
    AddStake {
        staker: String,
    },
    UpdateStaker {
        new_delegation: Option<String>,
        reactivate_all_stake: bool,
        proof: PlainSignatureProof,
    },
    SetActiveStake {
        new_active_balance: u64,
        proof: PlainSignatureProof,
    },
    RetireStake {
        retire_stake: u64,
        proof: PlainSignatureProof,
    },
    DeleteValidator,
    RemoveStake,
}
