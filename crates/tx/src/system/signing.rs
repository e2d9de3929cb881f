// Path: crates/tx/src/system/signing.rs

//! Producing transaction proofs.

use crate::contracts::staking::IncomingStakingTransactionData;
use crate::transaction::Transaction;
use nimiq_api::crypto::SigningKeyPair;
use nimiq_crypto::sign::eddsa::Ed25519KeyPair;
use nimiq_crypto::SignatureProof;
use nimiq_types::app::AccountType;
use nimiq_types::error::TransactionError;

/// Something that can authorize a transaction by writing its proof.
pub trait TransactionSigner {
    /// Signs `tx` in place.
    fn sign_transaction(&self, tx: &mut Transaction) -> Result<(), TransactionError>;
}

impl TransactionSigner for Ed25519KeyPair {
    /// Writes a single-signature proof over the transaction content.
    ///
    /// For staking operations whose inner proof is still the placeholder, the
    /// inner proof is signed first, since it is part of the signed content.
    /// HTLC proofs carry more than a signature and are built with
    /// [`crate::contracts::HtlcProof`] instead.
    fn sign_transaction(&self, tx: &mut Transaction) -> Result<(), TransactionError> {
        if tx.sender_type == AccountType::Htlc {
            return Err(TransactionError::Unsupported(
                "htlc proofs are built with HtlcProof".to_string(),
            ));
        }
        if tx.recipient_type == AccountType::Staking {
            sign_inner_proof(self, tx)?;
        }
        let signature = self.sign(&tx.serialize_content())?;
        tx.set_signature_proof(&SignatureProof::from_ed25519(self.public_key(), signature))
    }
}

/// Fills the placeholder inner proof of a staking operation with a signature
/// by `key_pair`. Operations without an inner proof, or with one already
/// present, are left unchanged.
pub fn sign_inner_proof(
    key_pair: &Ed25519KeyPair,
    tx: &mut Transaction,
) -> Result<(), TransactionError> {
    let mut data = IncomingStakingTransactionData::parse(tx.data())?;
    match data.proof() {
        Some(proof) if *proof == SignatureProof::default() => {}
        _ => return Ok(()),
    }
    let signature = key_pair.sign(&data.signing_content(tx)?)?;
    data.set_proof(SignatureProof::from_ed25519(key_pair.public_key(), signature))?;
    tx.set_data(data.to_data())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::TransactionParams;
    use nimiq_crypto::sign::eddsa::Ed25519PrivateKey;
    use nimiq_types::app::{Address, NetworkId, TransactionFlags};

    fn key(seed: u8) -> Ed25519KeyPair {
        Ed25519KeyPair::from_private_key(&Ed25519PrivateKey::from_seed([seed; 32]))
    }

    fn retire_validator_tx(sender: &Ed25519KeyPair) -> Transaction {
        Transaction::new(TransactionParams {
            sender: sender.address(),
            recipient: Address::STAKING_CONTRACT,
            recipient_type: AccountType::Staking,
            data: IncomingStakingTransactionData::RetireValidator {
                proof: SignatureProof::default(),
            }
            .to_data(),
            fee: 10,
            flags: TransactionFlags::SIGNALING,
            network_id: NetworkId::UnitAlbatross,
            ..TransactionParams::default()
        })
        .unwrap()
    }

    #[test]
    fn staking_signing_fills_inner_then_outer_proof() {
        let sender = key(4);
        let mut tx = retire_validator_tx(&sender);
        tx.sign(&sender).unwrap();

        let data = IncomingStakingTransactionData::parse(tx.data()).unwrap();
        let inner = data.proof().unwrap();
        assert!(inner.is_signed_by(&sender.address()));
        assert!(inner.verify(&data.signing_content(&tx).unwrap()));
        assert!(tx.verify(Some(NetworkId::UnitAlbatross)).is_ok());
    }

    #[test]
    fn existing_inner_proof_is_kept() {
        let validator = key(5);
        let fee_payer = key(6);
        let mut tx = retire_validator_tx(&fee_payer);
        sign_inner_proof(&validator, &mut tx).unwrap();
        tx.sign(&fee_payer).unwrap();

        let data = IncomingStakingTransactionData::parse(tx.data()).unwrap();
        assert!(data.proof().unwrap().is_signed_by(&validator.address()));
        assert!(tx.verify(None).is_ok());
    }

    #[test]
    fn htlc_sender_is_unsupported() {
        let mut tx = Transaction::new_basic(
            Address::new([1; 20]),
            Address::new([2; 20]),
            1,
            0,
            0,
            NetworkId::UnitAlbatross,
        );
        tx.sender_type = AccountType::Htlc;
        assert!(matches!(
            tx.sign(&key(1)),
            Err(TransactionError::Unsupported(_))
        ));
    }
}
