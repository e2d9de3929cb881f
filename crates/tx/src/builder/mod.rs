// Path: crates/tx/src/builder/mod.rs
//! Constructors for the common transaction shapes.
//!
//! Every function returns an unsigned [`Transaction`]. Staking operations are
//! addressed to [`Address::STAKING_CONTRACT`] with the inner proof left as
//! the placeholder; [`Transaction::sign`] fills it with the same key, or
//! [`crate::system::signing::sign_inner_proof`] can fill it with a different
//! one first.

use crate::contracts::htlc::HtlcContract;
use crate::contracts::staking::{IncomingStakingTransactionData, OutgoingStakingTransactionData};
use crate::contracts::vesting::VestingContract;
use crate::transaction::{Transaction, TransactionParams};
use nimiq_api::crypto::SigningKeyPair;
use nimiq_crypto::algorithms::hash::HashAlgorithm;
use nimiq_crypto::sign::bls::BlsKeyPair;
use nimiq_crypto::sign::eddsa::Ed25519PublicKey;
use nimiq_crypto::SignatureProof;
use nimiq_types::app::{AccountType, Address, NetworkId, TransactionFlags};
use nimiq_types::error::{TransactionError, ValidationError};
use nimiq_types::policy::Policy;

/// Stateless facade over [`Transaction::new`].
pub struct TransactionBuilder;

impl TransactionBuilder {
    /// A basic transfer.
    pub fn new_basic(
        sender: Address,
        recipient: Address,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::new_basic_with_data(
            sender,
            recipient,
            Vec::new(),
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// A basic transfer carrying a message in `data`.
    pub fn new_basic_with_data(
        sender: Address,
        recipient: Address,
        data: Vec<u8>,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Transaction::new(TransactionParams {
            sender,
            recipient,
            data,
            value,
            fee,
            validity_start_height,
            network_id,
            ..TransactionParams::default()
        })
    }

    /// Creates a vesting contract owned by `owner`, funded with `value`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_create_vesting(
        sender: Address,
        owner: Address,
        start_time: u64,
        time_step: u64,
        step_amount: u64,
        total_amount: u64,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        let contract = VestingContract {
            owner,
            start_time,
            time_step,
            step_amount,
            total_amount,
        };
        Self::contract_creation(
            sender,
            AccountType::Vesting,
            contract.to_data(value),
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Creates an HTLC funded with `value`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_create_htlc(
        sender: Address,
        htlc_sender: Address,
        htlc_recipient: Address,
        hash_algorithm: HashAlgorithm,
        hash_root: Vec<u8>,
        hash_count: u8,
        timeout: u64,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        let contract = HtlcContract {
            sender: htlc_sender,
            recipient: htlc_recipient,
            hash_algorithm,
            hash_root,
            hash_count,
            timeout,
        };
        Self::contract_creation(
            sender,
            AccountType::Htlc,
            contract.to_data(),
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    fn contract_creation(
        sender: Address,
        recipient_type: AccountType,
        data: Vec<u8>,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Transaction::new(TransactionParams {
            sender,
            recipient: Address::CONTRACT_CREATION,
            recipient_type,
            data,
            value,
            fee,
            flags: TransactionFlags::CONTRACT_CREATION,
            validity_start_height,
            network_id,
            ..TransactionParams::default()
        })
    }

    /// Registers `sender` as a staker, staking `value`.
    pub fn new_create_staker(
        sender: Address,
        delegation: Option<Address>,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::CreateStaker {
                delegation,
                proof: SignatureProof::default(),
            },
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Adds `value` to the stake of `staker_address`.
    pub fn new_add_stake(
        sender: Address,
        staker_address: Address,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::AddStake { staker_address },
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Changes the delegation of the staker `sender`.
    pub fn new_update_staker(
        sender: Address,
        new_delegation: Option<Address>,
        reactivate_all_stake: bool,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::UpdateStaker {
                new_delegation,
                reactivate_all_stake,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Sets the active balance of the staker `sender`.
    pub fn new_set_active_stake(
        sender: Address,
        new_active_balance: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::SetActiveStake {
                new_active_balance,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Retires `retire_stake` of the inactive balance of the staker `sender`.
    pub fn new_retire_stake(
        sender: Address,
        retire_stake: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::RetireStake {
                retire_stake,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Pays retired stake out to `recipient`. The proof must be signed by
    /// the staker key.
    pub fn new_remove_stake(
        recipient: Address,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::outgoing_staking(
            recipient,
            OutgoingStakingTransactionData::RemoveStake,
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Registers a validator, paying [`Policy::VALIDATOR_DEPOSIT`]. The proof
    /// of knowledge is computed from `voting_key_pair`.
    #[allow(clippy::too_many_arguments)]
    pub fn new_create_validator(
        sender: Address,
        reward_address: Address,
        signing_key: Ed25519PublicKey,
        voting_key_pair: &BlsKeyPair,
        signal_data: Option<[u8; 32]>,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::CreateValidator {
                signing_key,
                voting_key: voting_key_pair.public_key(),
                reward_address,
                signal_data,
                proof_of_knowledge: voting_key_pair.proof_of_knowledge()?,
                proof: SignatureProof::default(),
            },
            Policy::VALIDATOR_DEPOSIT,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Updates validator parameters; `None` leaves a field unchanged.
    #[allow(clippy::too_many_arguments)]
    pub fn new_update_validator(
        sender: Address,
        new_reward_address: Option<Address>,
        new_signing_key: Option<Ed25519PublicKey>,
        new_voting_key_pair: Option<&BlsKeyPair>,
        new_signal_data: Option<Option<[u8; 32]>>,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        let new_proof_of_knowledge = new_voting_key_pair
            .map(BlsKeyPair::proof_of_knowledge)
            .transpose()?;
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::UpdateValidator {
                new_signing_key,
                new_voting_key: new_voting_key_pair.map(|k| k.public_key()),
                new_reward_address,
                new_signal_data,
                new_proof_of_knowledge,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Deactivates `validator_address`. The inner proof must be signed by
    /// the validator's signing key.
    pub fn new_deactivate_validator(
        sender: Address,
        validator_address: Address,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::DeactivateValidator {
                validator_address,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Reactivates `validator_address`.
    pub fn new_reactivate_validator(
        sender: Address,
        validator_address: Address,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::ReactivateValidator {
                validator_address,
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Retires the validator signing the inner proof.
    pub fn new_retire_validator(
        sender: Address,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Self::incoming_staking(
            sender,
            IncomingStakingTransactionData::RetireValidator {
                proof: SignatureProof::default(),
            },
            0,
            fee,
            validity_start_height,
            network_id,
        )
    }

    /// Pays the deposit of a retired validator out to `recipient`, minus
    /// `fee`. The proof must be signed by the validator's cold key.
    pub fn new_delete_validator(
        recipient: Address,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        let value = Policy::VALIDATOR_DEPOSIT
            .checked_sub(fee)
            .filter(|v| *v > 0)
            .ok_or(ValidationError::ZeroValue)?;
        Self::outgoing_staking(
            recipient,
            OutgoingStakingTransactionData::DeleteValidator,
            value,
            fee,
            validity_start_height,
            network_id,
        )
    }

    fn incoming_staking(
        sender: Address,
        data: IncomingStakingTransactionData,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        let flags = if data.is_signaling() {
            TransactionFlags::SIGNALING
        } else {
            TransactionFlags::empty()
        };
        Transaction::new(TransactionParams {
            sender,
            recipient: Address::STAKING_CONTRACT,
            recipient_type: AccountType::Staking,
            data: data.to_data(),
            value,
            fee,
            flags,
            validity_start_height,
            network_id,
            ..TransactionParams::default()
        })
    }

    fn outgoing_staking(
        recipient: Address,
        data: OutgoingStakingTransactionData,
        value: u64,
        fee: u64,
        validity_start_height: u32,
        network_id: NetworkId,
    ) -> Result<Transaction, TransactionError> {
        Transaction::new(TransactionParams {
            sender: Address::STAKING_CONTRACT,
            sender_type: AccountType::Staking,
            sender_data: data.to_data(),
            recipient,
            value,
            fee,
            validity_start_height,
            network_id,
            ..TransactionParams::default()
        })
    }
}
