// Path: crates/tx/src/contracts/htlc.rs
//! Hashed time-locked contracts.
//!
//! Creation data: `sender ‖ recipient ‖ hash algorithm ‖ hash root ‖ hash count
//! ‖ timeout`. The root is 32 bytes for Blake2b and SHA-256 and 64 bytes for
//! SHA-512.
//!
//! Outgoing proofs start with a type byte:
//! - `1` regular transfer: `algorithm ‖ depth ‖ root ‖ pre-image ‖ proof`
//! - `2` early resolve: `recipient proof ‖ sender proof`
//! - `3` timeout resolve: `sender proof`

use super::parse_exact;
use bytes::BufMut;
use nimiq_crypto::algorithms::hash::HashAlgorithm;
use nimiq_crypto::sign::proof::PlainSignatureProof;
use nimiq_crypto::SignatureProof;
use nimiq_types::app::Address;
use nimiq_types::codec::{read_bytes, read_u8, to_bytes_canonical, Decode, Encode};
use nimiq_types::error::{CodecError, TransactionError};
use serde::Serialize;

fn read_algorithm(reader: &mut &[u8]) -> Result<HashAlgorithm, CodecError> {
    let byte = read_u8(reader)?;
    HashAlgorithm::try_from(byte).map_err(|_| CodecError::UnknownDiscriminant {
        ty: "HashAlgorithm",
        value: u64::from(byte),
    })
}

fn read_hash(reader: &mut &[u8], algorithm: HashAlgorithm) -> Result<Vec<u8>, CodecError> {
    read_bytes(reader, algorithm.digest_size())
}

fn algorithm_name(algorithm: HashAlgorithm) -> &'static str {
    match algorithm {
        HashAlgorithm::Blake2b => "blake2b",
        HashAlgorithm::Sha256 => "sha256",
        HashAlgorithm::Sha512 => "sha512",
    }
}

/// HTLC creation parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HtlcContract {
    /// The account refunded on timeout.
    pub sender: Address,
    /// The account that can claim with a pre-image.
    pub recipient: Address,
    /// Algorithm of the hash chain.
    pub hash_algorithm: HashAlgorithm,
    /// Root of the hash chain.
    pub hash_root: Vec<u8>,
    /// Number of hash steps the funds are split into.
    pub hash_count: u8,
    /// Timestamp (ms) after which the sender can reclaim.
    pub timeout: u64,
}

impl HtlcContract {
    /// Parses creation data.
    pub fn parse_data(data: &[u8]) -> Result<Self, TransactionError> {
        let contract = parse_exact(data, "htlc data", |reader| {
            let sender = Address::decode(reader)?;
            let recipient = Address::decode(reader)?;
            let hash_algorithm = read_algorithm(reader)?;
            Ok(Self {
                sender,
                recipient,
                hash_algorithm,
                hash_root: read_hash(reader, hash_algorithm)?,
                hash_count: read_u8(reader)?,
                timeout: u64::decode(reader)?,
            })
        })?;
        if contract.hash_count == 0 {
            return Err(TransactionError::MalformedData(
                "htlc data: hash count must be at least 1".to_string(),
            ));
        }
        Ok(contract)
    }

    /// Serializes the creation data.
    pub fn to_data(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(2 * 20 + 1 + self.hash_root.len() + 1 + 8);
        self.sender.encode(&mut buf);
        self.recipient.encode(&mut buf);
        buf.put_u8(u8::from(self.hash_algorithm));
        buf.put_slice(&self.hash_root);
        buf.put_u8(self.hash_count);
        buf.put_u64(self.timeout);
        buf
    }

    /// Plain view of creation data.
    pub fn data_to_plain(data: &[u8]) -> Result<PlainHtlcData, TransactionError> {
        let contract = Self::parse_data(data)?;
        Ok(PlainHtlcData {
            sender: contract.sender.to_user_friendly(true),
            recipient: contract.recipient.to_user_friendly(true),
            hash_algorithm: algorithm_name(contract.hash_algorithm).to_string(),
            hash_root: hex::encode(&contract.hash_root),
            hash_count: contract.hash_count,
            timeout: contract.timeout,
        })
    }

    /// Plain view of an outgoing proof.
    pub fn proof_to_plain(proof: &[u8]) -> Result<PlainHtlcProof, TransactionError> {
        Ok(HtlcProof::parse(proof)?.to_plain())
    }
}

/// Proof authorizing funds to leave an HTLC.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum HtlcProof {
    /// The recipient claims with a pre-image of the hash chain.
    RegularTransfer {
        /// Algorithm of the hash chain.
        hash_algorithm: HashAlgorithm,
        /// Number of times the pre-image is hashed to reach the root.
        hash_depth: u8,
        /// The hash root the pre-image leads to.
        hash_root: Vec<u8>,
        /// The revealed pre-image.
        pre_image: Vec<u8>,
        /// The recipient's signature proof.
        signature_proof: SignatureProof,
    },
    /// Both parties agree to release the funds before the timeout.
    EarlyResolve {
        /// Signature proof of the HTLC recipient.
        htlc_recipient_proof: SignatureProof,
        /// Signature proof of the HTLC sender.
        htlc_sender_proof: SignatureProof,
    },
    /// The sender reclaims after the timeout.
    TimeoutResolve {
        /// Signature proof of the HTLC sender.
        htlc_sender_proof: SignatureProof,
    },
}

impl HtlcProof {
    /// Parses a complete proof field.
    pub fn parse(proof: &[u8]) -> Result<Self, TransactionError> {
        parse_exact(proof, "htlc proof", Self::decode)
    }

    /// Serializes the proof. A regular transfer whose root or pre-image is
    /// not one digest of its algorithm long is rejected, since it would not
    /// parse back.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TransactionError> {
        if let Self::RegularTransfer {
            hash_algorithm,
            hash_root,
            pre_image,
            ..
        } = self
        {
            let size = hash_algorithm.digest_size();
            if hash_root.len() != size || pre_image.len() != size {
                return Err(TransactionError::InvalidProof(format!(
                    "{} root and pre-image must be {size} bytes, got {} and {}",
                    algorithm_name(*hash_algorithm),
                    hash_root.len(),
                    pre_image.len()
                )));
            }
        }
        Ok(to_bytes_canonical(self))
    }

    /// Every signature proof contained, in wire order.
    pub fn signature_proofs(&self) -> Vec<&SignatureProof> {
        match self {
            Self::RegularTransfer {
                signature_proof, ..
            } => vec![signature_proof],
            Self::EarlyResolve {
                htlc_recipient_proof,
                htlc_sender_proof,
            } => vec![htlc_recipient_proof, htlc_sender_proof],
            Self::TimeoutResolve { htlc_sender_proof } => vec![htlc_sender_proof],
        }
    }

    /// Checks the signatures over `content` and, for a regular transfer,
    /// that hashing the pre-image `hash_depth` times yields the root.
    pub fn verify(&self, content: &[u8]) -> Result<(), TransactionError> {
        if let Self::RegularTransfer {
            hash_algorithm,
            hash_depth,
            hash_root,
            pre_image,
            ..
        } = self
        {
            let mut digest = pre_image.clone();
            for _ in 0..*hash_depth {
                digest = hash_algorithm.hash(&digest);
            }
            if digest != *hash_root {
                return Err(TransactionError::InvalidProof(
                    "pre-image does not hash to the hash root".to_string(),
                ));
            }
        }
        if self.signature_proofs().iter().all(|p| p.verify(content)) {
            Ok(())
        } else {
            Err(TransactionError::InvalidSignature)
        }
    }

    /// Plain, JSON-friendly view.
    pub fn to_plain(&self) -> PlainHtlcProof {
        match self {
            Self::RegularTransfer {
                hash_algorithm,
                hash_depth,
                hash_root,
                pre_image,
                signature_proof,
            } => PlainHtlcProof::RegularTransfer {
                hash_algorithm: algorithm_name(*hash_algorithm).to_string(),
                hash_depth: *hash_depth,
                hash_root: hex::encode(hash_root),
                pre_image: hex::encode(pre_image),
                signer: signature_proof.compute_signer().to_user_friendly(true),
                signature_proof: signature_proof.to_plain(),
            },
            Self::EarlyResolve {
                htlc_recipient_proof,
                htlc_sender_proof,
            } => PlainHtlcProof::EarlyResolve {
                htlc_recipient_proof: htlc_recipient_proof.to_plain(),
                htlc_sender_proof: htlc_sender_proof.to_plain(),
            },
            Self::TimeoutResolve { htlc_sender_proof } => PlainHtlcProof::TimeoutResolve {
                htlc_sender_proof: htlc_sender_proof.to_plain(),
            },
        }
    }
}

impl Encode for HtlcProof {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Self::RegularTransfer {
                hash_algorithm,
                hash_depth,
                hash_root,
                pre_image,
                signature_proof,
            } => {
                buf.put_u8(1);
                buf.put_u8(u8::from(*hash_algorithm));
                buf.put_u8(*hash_depth);
                buf.put_slice(hash_root);
                buf.put_slice(pre_image);
                signature_proof.encode(buf);
            }
            Self::EarlyResolve {
                htlc_recipient_proof,
                htlc_sender_proof,
            } => {
                buf.put_u8(2);
                htlc_recipient_proof.encode(buf);
                htlc_sender_proof.encode(buf);
            }
            Self::TimeoutResolve { htlc_sender_proof } => {
                buf.put_u8(3);
                htlc_sender_proof.encode(buf);
            }
        }
    }

    fn encoded_len(&self) -> usize {
        1 + match self {
            Self::RegularTransfer {
                hash_root,
                pre_image,
                signature_proof,
                ..
            } => 2 + hash_root.len() + pre_image.len() + signature_proof.encoded_len(),
            Self::EarlyResolve {
                htlc_recipient_proof,
                htlc_sender_proof,
            } => htlc_recipient_proof.encoded_len() + htlc_sender_proof.encoded_len(),
            Self::TimeoutResolve { htlc_sender_proof } => htlc_sender_proof.encoded_len(),
        }
    }
}

impl Decode for HtlcProof {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        match read_u8(reader)? {
            1 => {
                let hash_algorithm = read_algorithm(reader)?;
                Ok(Self::RegularTransfer {
                    hash_algorithm,
                    hash_depth: read_u8(reader)?,
                    hash_root: read_hash(reader, hash_algorithm)?,
                    pre_image: read_hash(reader, hash_algorithm)?,
                    signature_proof: SignatureProof::decode(reader)?,
                })
            }
            2 => Ok(Self::EarlyResolve {
                htlc_recipient_proof: SignatureProof::decode(reader)?,
                htlc_sender_proof: SignatureProof::decode(reader)?,
            }),
            3 => Ok(Self::TimeoutResolve {
                htlc_sender_proof: SignatureProof::decode(reader)?,
            }),
            other => Err(CodecError::UnknownDiscriminant {
                ty: "HtlcProof",
                value: u64::from(other),
            }),
        }
    }
}

/// Plain HTLC creation data.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlainHtlcData {
    /// User-friendly refund address.
    pub sender: String,
    /// User-friendly claim address.
    pub recipient: String,
    /// `blake2b`, `sha256` or `sha512`.
    pub hash_algorithm: String,
    /// Hex hash root.
    pub hash_root: String,
    /// Number of hash steps.
    pub hash_count: u8,
    /// Timeout timestamp (ms).
    pub timeout: u64,
}

/// Plain HTLC proof.
#[derive(Serialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum PlainHtlcProof {
    /// A claim with a pre-image.
    RegularTransfer {
        /// Hash algorithm name.
        hash_algorithm: String,
        /// Hashing depth.
        hash_depth: u8,
        /// Hex hash root.
        hash_root: String,
        /// Hex pre-image.
        pre_image: String,
        /// User-friendly signer address.
        signer: String,
        /// The signature proof.
        signature_proof: PlainSignatureProof,
    },
    /// A joint early release.
    EarlyResolve {
        /// Proof of the HTLC recipient.
        htlc_recipient_proof: PlainSignatureProof,
        /// Proof of the HTLC sender.
        htlc_sender_proof: PlainSignatureProof,
    },
    /// A refund after the timeout.
    TimeoutResolve {
        /// Proof of the HTLC sender.
        htlc_sender_proof: PlainSignatureProof,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use nimiq_api::crypto::SigningKeyPair;
    use nimiq_crypto::sign::eddsa::{Ed25519KeyPair, Ed25519PrivateKey};

    fn keypair(seed: u8) -> Ed25519KeyPair {
        Ed25519KeyPair::from_private_key(&Ed25519PrivateKey::from_seed([seed; 32]))
    }

    fn sample(algorithm: HashAlgorithm) -> HtlcContract {
        HtlcContract {
            sender: Address::new([1; 20]),
            recipient: Address::new([2; 20]),
            hash_algorithm: algorithm,
            hash_root: algorithm.hash(b"secret"),
            hash_count: 1,
            timeout: 1_700_000_000_000,
        }
    }

    #[test]
    fn data_lengths_follow_the_algorithm() {
        for (algorithm, len) in [
            (HashAlgorithm::Blake2b, 82),
            (HashAlgorithm::Sha256, 82),
            (HashAlgorithm::Sha512, 114),
        ] {
            let contract = sample(algorithm);
            let data = contract.to_data();
            assert_eq!(data.len(), len);
            assert_eq!(HtlcContract::parse_data(&data).unwrap(), contract);
        }
    }

    #[test]
    fn malformed_data_is_rejected() {
        let mut data = sample(HashAlgorithm::Sha256).to_data();
        data.push(0);
        assert!(matches!(
            HtlcContract::parse_data(&data),
            Err(TransactionError::MalformedData(_))
        ));

        let mut unknown = sample(HashAlgorithm::Sha256).to_data();
        unknown[40] = 2;
        assert!(HtlcContract::parse_data(&unknown).is_err());

        let mut zero_count = sample(HashAlgorithm::Blake2b).to_data();
        zero_count[73] = 0;
        assert!(HtlcContract::parse_data(&zero_count).is_err());
    }

    #[test]
    fn regular_transfer_checks_pre_image_and_signature() {
        let recipient = keypair(9);
        let content = b"transaction content";
        let signature_proof = nimiq_crypto::SignatureProof::from_ed25519(
            recipient.public_key(),
            recipient.sign(content).unwrap(),
        );
        let pre_image = HashAlgorithm::Sha256.hash(b"secret");
        let root = HashAlgorithm::Sha256.hash(&HashAlgorithm::Sha256.hash(&pre_image));
        let proof = HtlcProof::RegularTransfer {
            hash_algorithm: HashAlgorithm::Sha256,
            hash_depth: 2,
            hash_root: root,
            pre_image: pre_image.clone(),
            signature_proof: signature_proof.clone(),
        };
        let parsed = HtlcProof::parse(&proof.to_bytes().unwrap()).unwrap();
        assert_eq!(parsed, proof);
        assert!(parsed.verify(content).is_ok());
        assert!(matches!(
            parsed.verify(b"other content"),
            Err(TransactionError::InvalidSignature)
        ));

        let wrong_depth = HtlcProof::RegularTransfer {
            hash_algorithm: HashAlgorithm::Sha256,
            hash_depth: 1,
            hash_root: HashAlgorithm::Sha256.hash(b"nope"),
            pre_image,
            signature_proof,
        };
        assert!(matches!(
            wrong_depth.verify(content),
            Err(TransactionError::InvalidProof(_))
        ));
    }

    #[test]
    fn early_and_timeout_resolve_roundtrip() {
        let a = keypair(1);
        let b = keypair(2);
        let content = b"c";
        let proof_a =
            nimiq_crypto::SignatureProof::from_ed25519(a.public_key(), a.sign(content).unwrap());
        let proof_b =
            nimiq_crypto::SignatureProof::from_ed25519(b.public_key(), b.sign(content).unwrap());

        let early = HtlcProof::EarlyResolve {
            htlc_recipient_proof: proof_a.clone(),
            htlc_sender_proof: proof_b,
        };
        let bytes = early.to_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 2 * 97);
        assert!(HtlcProof::parse(&bytes).unwrap().verify(content).is_ok());

        let timeout = HtlcProof::TimeoutResolve {
            htlc_sender_proof: proof_a,
        };
        assert_eq!(HtlcProof::parse(&timeout.to_bytes().unwrap()).unwrap(), timeout);
        let plain = serde_json::to_value(HtlcContract::proof_to_plain(&timeout.to_bytes().unwrap()).unwrap())
            .unwrap();
        assert_eq!(plain["type"], "timeout-resolve");
        assert!(plain["htlcSenderProof"].is_object());
    }

    #[test]
    fn regular_transfer_with_mismatched_digest_lengths_is_not_encoded() {
        let signer = keypair(3);
        let signature_proof = nimiq_crypto::SignatureProof::from_ed25519(
            signer.public_key(),
            signer.sign(b"c").unwrap(),
        );
        let pre_image = HashAlgorithm::Sha512.hash(b"secret");
        let short_root = HtlcProof::RegularTransfer {
            hash_algorithm: HashAlgorithm::Sha512,
            hash_depth: 1,
            hash_root: HashAlgorithm::Sha256.hash(&pre_image),
            pre_image: pre_image.clone(),
            signature_proof: signature_proof.clone(),
        };
        assert!(matches!(
            short_root.to_bytes(),
            Err(TransactionError::InvalidProof(_))
        ));

        let short_pre_image = HtlcProof::RegularTransfer {
            hash_algorithm: HashAlgorithm::Sha512,
            hash_depth: 1,
            hash_root: HashAlgorithm::Sha512.hash(b"x"),
            pre_image: b"x".to_vec(),
            signature_proof: signature_proof.clone(),
        };
        assert!(short_pre_image.to_bytes().is_err());

        let valid = HtlcProof::RegularTransfer {
            hash_algorithm: HashAlgorithm::Sha512,
            hash_depth: 1,
            hash_root: HashAlgorithm::Sha512.hash(&pre_image),
            pre_image,
            signature_proof,
        };
        let bytes = valid.to_bytes().unwrap();
        assert_eq!(bytes.len(), 1 + 1 + 1 + 64 + 64 + 97);
        assert_eq!(HtlcProof::parse(&bytes).unwrap(), valid);
    }

    #[test]
    fn unknown_proof_type_is_malformed() {
        assert!(matches!(
            HtlcProof::parse(&[4]),
            Err(TransactionError::MalformedData(_))
        ));
    }
}
