// Path: crates/tx/src/system/validation.rs

//! Stateless transaction verification.
//!
//! Everything here is a pure function of the transaction bytes: sizes, value
//! rules, the contract creation address, the recipient and sender contract
//! data, and every signature in the proof. Checks that need account state
//! (balances, vesting schedules, staker registries) are out of scope.

use crate::contracts::htlc::HtlcProof;
use crate::contracts::parse_signature_proof;
use crate::contracts::staking::{IncomingStakingTransactionData, OutgoingStakingTransactionData};
use crate::transaction::Transaction;
use nimiq_crypto::SignatureProof;
use nimiq_types::app::{AccountType, Address, NetworkId, TransactionFlags};
use nimiq_types::error::{ErrorCode, TransactionError, ValidationError};
use nimiq_types::policy::Policy;

/// Verifies `tx`, optionally requiring it to belong to `network_id`.
///
/// Failures are logged at debug level with the transaction hash and the
/// stable error code.
pub fn verify_transaction(
    tx: &Transaction,
    network_id: Option<NetworkId>,
) -> Result<(), TransactionError> {
    let result = verify_unlogged(tx, network_id);
    if let Err(e) = &result {
        tracing::debug!(
            tx_hash = %tx.hash(),
            code = e.code(),
            error = %e,
            "transaction rejected"
        );
    }
    result
}

fn verify_unlogged(tx: &Transaction, network_id: Option<NetworkId>) -> Result<(), TransactionError> {
    if let Some(expected) = network_id {
        if expected != tx.network_id {
            return Err(TransactionError::NetworkMismatch {
                expected,
                got: tx.network_id,
            });
        }
    }

    let size = tx.serialized_size();
    if size > Policy::MAX_TRANSACTION_SIZE {
        return Err(TransactionError::TooLarge {
            size,
            max: Policy::MAX_TRANSACTION_SIZE,
        });
    }

    verify_value(tx)?;

    let creation = tx.flags.contains(TransactionFlags::CONTRACT_CREATION);
    if tx.sender == tx.recipient && !creation {
        return Err(ValidationError::SenderEqualsRecipient.into());
    }

    let content = tx.serialize_content();
    verify_recipient(tx)?;
    verify_sender(tx, &content)
}

fn verify_value(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.flags.contains(TransactionFlags::CONTRACT_CREATION | TransactionFlags::SIGNALING) {
        return Err(ValidationError::InvalidFlags(tx.flags.bits()).into());
    }
    if tx.flags.contains(TransactionFlags::SIGNALING) {
        if tx.value != 0 {
            return Err(ValidationError::NonZeroSignalingValue.into());
        }
        if tx.data().is_empty() {
            return Err(ValidationError::EmptySignalingData.into());
        }
    } else if tx.value == 0 {
        return Err(ValidationError::ZeroValue.into());
    }
    tx.total_value().ok_or(ValidationError::ValueOverflow)?;
    Ok(())
}

fn verify_recipient(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.flags.contains(TransactionFlags::CONTRACT_CREATION) {
        tx.check_contract_creation_data()?;
        if tx.recipient != tx.contract_creation_address() {
            return Err(ValidationError::InvalidContractCreationAddress.into());
        }
        return Ok(());
    }

    match tx.recipient_type {
        AccountType::Basic => {
            if tx.flags.contains(TransactionFlags::SIGNALING) {
                return Err(ValidationError::InvalidForRecipient(
                    "signaling is only accepted by the staking contract".to_string(),
                )
                .into());
            }
            Ok(())
        }
        AccountType::Vesting | AccountType::Htlc => Err(ValidationError::InvalidForRecipient(
            format!(
                "{} contracts only accept their creation transaction",
                tx.recipient_type
            ),
        )
        .into()),
        AccountType::Staking => {
            if tx.recipient != Address::STAKING_CONTRACT {
                return Err(ValidationError::InvalidForRecipient(
                    "recipient is not the staking contract".to_string(),
                )
                .into());
            }
            IncomingStakingTransactionData::parse(tx.data())?.verify(tx)
        }
    }
}

fn verify_sender(tx: &Transaction, content: &[u8]) -> Result<(), TransactionError> {
    match tx.sender_type {
        AccountType::Basic => {
            reject_sender_data(tx)?;
            let proof = proof_of(tx)?;
            verify_signature_proof(&proof, content)?;
            if !proof.is_signed_by(&tx.sender) {
                return Err(TransactionError::SignerMismatch);
            }
            Ok(())
        }
        AccountType::Vesting => {
            reject_sender_data(tx)?;
            verify_signature_proof(&proof_of(tx)?, content)
        }
        AccountType::Htlc => {
            reject_sender_data(tx)?;
            let proof = HtlcProof::parse(tx.proof())
                .map_err(|e| TransactionError::InvalidProof(e.to_string()))?;
            proof.verify(content)
        }
        AccountType::Staking => {
            if tx.sender != Address::STAKING_CONTRACT {
                return Err(ValidationError::InvalidForSender(
                    "sender is not the staking contract".to_string(),
                )
                .into());
            }
            OutgoingStakingTransactionData::parse(tx.sender_data())?;
            verify_signature_proof(&proof_of(tx)?, content)
        }
    }
}

fn reject_sender_data(tx: &Transaction) -> Result<(), TransactionError> {
    if tx.sender_data().is_empty() {
        Ok(())
    } else {
        Err(ValidationError::InvalidForSender(format!(
            "{} accounts take no sender data",
            tx.sender_type
        ))
        .into())
    }
}

fn proof_of(tx: &Transaction) -> Result<SignatureProof, TransactionError> {
    if tx.proof().is_empty() {
        return Err(TransactionError::InvalidProof("missing proof".to_string()));
    }
    parse_signature_proof(tx.proof(), "proof")
        .map_err(|e| TransactionError::InvalidProof(e.to_string()))
}

fn verify_signature_proof(proof: &SignatureProof, content: &[u8]) -> Result<(), TransactionError> {
    if proof.verify(content) {
        Ok(())
    } else {
        Err(TransactionError::InvalidSignature)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::htlc::HtlcContract;
    use crate::transaction::TransactionParams;
    use nimiq_api::crypto::SigningKeyPair;
    use nimiq_crypto::algorithms::hash::HashAlgorithm;
    use nimiq_crypto::sign::eddsa::{Ed25519KeyPair, Ed25519PrivateKey};

    fn alice() -> Ed25519KeyPair {
        Ed25519KeyPair::from_private_key(&Ed25519PrivateKey::from_seed([1; 32]))
    }

    fn bob() -> Ed25519KeyPair {
        Ed25519KeyPair::from_private_key(&Ed25519PrivateKey::from_seed([2; 32]))
    }

    fn signed_basic(value: u64) -> Transaction {
        let mut tx = Transaction::new_basic(
            alice().address(),
            bob().address(),
            value,
            1,
            100,
            NetworkId::TestAlbatross,
        );
        tx.sign(&alice()).unwrap();
        tx
    }

    #[test]
    fn signed_basic_transaction_verifies() {
        let tx = signed_basic(10);
        assert!(verify_transaction(&tx, None).is_ok());
        assert!(verify_transaction(&tx, Some(NetworkId::TestAlbatross)).is_ok());
    }

    #[test]
    fn network_mismatch_is_reported() {
        let tx = signed_basic(10);
        assert!(matches!(
            verify_transaction(&tx, Some(NetworkId::MainAlbatross)),
            Err(TransactionError::NetworkMismatch {
                expected: NetworkId::MainAlbatross,
                got: NetworkId::TestAlbatross
            })
        ));
    }

    #[test]
    fn value_rules() {
        let tx = signed_basic(0);
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(ValidationError::ZeroValue))
        ));

        let tx = signed_basic(u64::MAX);
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(ValidationError::ValueOverflow))
        ));
    }

    #[test]
    fn self_transfer_is_rejected() {
        let mut tx = Transaction::new_basic(
            alice().address(),
            alice().address(),
            5,
            0,
            1,
            NetworkId::TestAlbatross,
        );
        tx.sign(&alice()).unwrap();
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(
                ValidationError::SenderEqualsRecipient
            ))
        ));
    }

    #[test]
    fn missing_or_foreign_proof_is_rejected() {
        let unsigned = Transaction::new_basic(
            alice().address(),
            bob().address(),
            5,
            0,
            1,
            NetworkId::TestAlbatross,
        );
        assert!(matches!(
            verify_transaction(&unsigned, None),
            Err(TransactionError::InvalidProof(_))
        ));

        let mut foreign = unsigned.clone();
        foreign.sign(&bob()).unwrap();
        assert!(matches!(
            verify_transaction(&foreign, None),
            Err(TransactionError::SignerMismatch)
        ));

        let mut tampered = signed_basic(10);
        tampered.value = 11;
        assert!(matches!(
            verify_transaction(&tampered, None),
            Err(TransactionError::InvalidSignature)
        ));
    }

    #[test]
    fn htlc_creation_address_is_enforced() {
        let contract = HtlcContract {
            sender: alice().address(),
            recipient: bob().address(),
            hash_algorithm: HashAlgorithm::Blake2b,
            hash_root: HashAlgorithm::Blake2b.hash(b"secret"),
            hash_count: 1,
            timeout: 1_000,
        };
        let mut tx = Transaction::new(TransactionParams {
            sender: alice().address(),
            recipient_type: AccountType::Htlc,
            data: contract.to_data(),
            value: 100,
            flags: TransactionFlags::CONTRACT_CREATION,
            network_id: NetworkId::TestAlbatross,
            ..TransactionParams::default()
        })
        .unwrap();
        tx.sign(&alice()).unwrap();
        assert!(verify_transaction(&tx, None).is_ok());

        tx.recipient = bob().address();
        tx.sign(&alice()).unwrap();
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(
                ValidationError::InvalidContractCreationAddress
            ))
        ));
    }

    #[test]
    fn contracts_reject_plain_incoming_transfers() {
        let mut tx = signed_basic(10);
        tx.recipient_type = AccountType::Vesting;
        tx.sign(&alice()).unwrap();
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(ValidationError::InvalidForRecipient(_)))
        ));
    }

    #[test]
    fn basic_sender_takes_no_sender_data() {
        let mut tx = signed_basic(10);
        tx.set_sender_data(vec![1]).unwrap();
        tx.sign(&alice()).unwrap();
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::Validation(ValidationError::InvalidForSender(_)))
        ));
    }

    #[test]
    fn oversized_transaction_is_rejected() {
        let mut tx = signed_basic(10);
        tx.set_data(vec![0; usize::from(u16::MAX)]).unwrap();
        tx.set_sender_data(vec![0; usize::from(u16::MAX)]).unwrap();
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::TooLarge { .. })
        ));
    }

    #[test]
    fn vesting_sender_needs_a_valid_signature() {
        let mut tx = Transaction::new(TransactionParams {
            sender: Address::new([0x42; 20]),
            sender_type: AccountType::Vesting,
            recipient: alice().address(),
            value: 5,
            network_id: NetworkId::TestAlbatross,
            ..TransactionParams::default()
        })
        .unwrap();
        let key = alice();
        let proof = SignatureProof::from_ed25519(
            key.public_key(),
            key.sign(&tx.serialize_content()).unwrap(),
        );
        tx.set_signature_proof(&proof).unwrap();
        assert!(verify_transaction(&tx, None).is_ok());

        tx.fee = 1;
        assert!(matches!(
            verify_transaction(&tx, None),
            Err(TransactionError::InvalidSignature)
        ));
    }
}
