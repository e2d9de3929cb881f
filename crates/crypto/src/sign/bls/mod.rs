// Path: crates/crypto/src/sign/bls/mod.rs
//! BLS12-381 validator voting keys.
//!
//! - Signatures in G1 (48 bytes compressed)
//! - Public keys in G2 (96 bytes compressed)
//! - Messages hashed to G1 with `hash_to_curve` (SSWU, XMD:SHA-256)
//!
//! A validator proves possession of its voting key by signing the compressed
//! public key itself; that signature is the key's proof of knowledge.

use crate::error::CryptoError;
use bls12_381::hash_to_curve::{ExpandMsgXmd, HashToCurve};
use bls12_381::{pairing, G1Affine, G1Projective, G2Affine, G2Projective, Scalar};
use nimiq_api::crypto::{SerializableKey, Signature, SigningKey, SigningKeyPair, VerifyingKey};
use nimiq_types::codec::{read_array, Decode, Encode};
use nimiq_types::error::CodecError;
use rand::rngs::OsRng;
use rand::RngCore;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a secret key in bytes.
pub const SECRET_KEY_SIZE: usize = 32;
/// Size of a compressed public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 96;
/// Size of a compressed signature in bytes.
pub const SIGNATURE_SIZE: usize = 48;

// Domain Separation Tag for Hashing
const BLS_DST: &[u8] = b"BLS_SIG_BLS12381G1_XMD:SHA-256_SSWU_RO_NUL_";

fn hash_to_g1(message: &[u8]) -> G1Projective {
    <G1Projective as HashToCurve<ExpandMsgXmd<sha2_09::Sha256>>>::hash_to_curve(message, BLS_DST)
}

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(bytes).map_err(|_| CryptoError::InvalidLength {
        expected: N,
        got: bytes.len(),
    })
}

/// A BLS secret key together with its public key.
#[derive(Clone)]
pub struct BlsKeyPair {
    public_key: BlsPublicKey,
    secret_key: BlsPrivateKey,
}

/// A compressed-G2 voting public key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsPublicKey(pub G2Affine);

/// A BLS secret scalar. Wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BlsPrivateKey(Scalar);

/// A compressed-G1 signature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlsSignature(pub G1Affine);

impl BlsKeyPair {
    /// Generates a key pair from `OsRng`.
    pub fn generate() -> Result<Self, CryptoError> {
        let mut wide = [0u8; 64];
        OsRng.fill_bytes(&mut wide);
        let secret_key = BlsPrivateKey(Scalar::from_bytes_wide(&wide));
        wide.zeroize();
        Ok(Self::from_private_key(&secret_key))
    }

    /// Builds the key pair of an existing secret key.
    pub fn from_private_key(secret_key: &BlsPrivateKey) -> Self {
        Self {
            public_key: BlsPublicKey::derive(secret_key),
            secret_key: secret_key.clone(),
        }
    }

    /// Signs the compressed public key, proving possession of the secret key.
    pub fn proof_of_knowledge(&self) -> Result<BlsSignature, CryptoError> {
        self.secret_key.sign(&self.public_key.to_bytes())
    }
}

impl fmt::Debug for BlsKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlsKeyPair")
            .field("public_key", &self.public_key.to_hex())
            .finish_non_exhaustive()
    }
}

impl SigningKeyPair for BlsKeyPair {
    type PublicKey = BlsPublicKey;
    type PrivateKey = BlsPrivateKey;
    type Signature = BlsSignature;

    fn public_key(&self) -> Self::PublicKey {
        self.public_key
    }

    fn private_key(&self) -> Self::PrivateKey {
        self.secret_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        self.secret_key.sign(message)
    }
}

impl BlsPublicKey {
    /// `sk · G2`.
    pub fn derive(secret_key: &BlsPrivateKey) -> Self {
        Self(G2Affine::from(G2Projective::generator() * secret_key.0))
    }

    /// Checks a proof of knowledge produced by [`BlsKeyPair::proof_of_knowledge`].
    pub fn verify_proof_of_knowledge(&self, proof: &BlsSignature) -> bool {
        self.verify(&self.to_bytes(), proof)
    }

    /// The 96-byte compressed encoding.
    pub fn compress(&self) -> [u8; PUBLIC_KEY_SIZE] {
        self.0.to_compressed()
    }
}

impl VerifyingKey for BlsPublicKey {
    type Signature = BlsSignature;

    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool {
        if bool::from(self.0.is_identity()) {
            return false;
        }
        let msg_point = G1Affine::from(hash_to_g1(message));
        // e(sig, g2) == e(H(m), pk)
        pairing(&signature.0, &G2Affine::generator()) == pairing(&msg_point, &self.0)
    }
}

impl SerializableKey for BlsPublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.compress().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr = to_array::<PUBLIC_KEY_SIZE>(bytes)?;
        Option::from(G2Affine::from_compressed(&arr))
            .map(Self)
            .ok_or_else(|| CryptoError::InvalidKey("invalid G2 point".to_string()))
    }
}

impl BlsPrivateKey {
    /// The public key of this secret key.
    pub fn public_key(&self) -> BlsPublicKey {
        BlsPublicKey::derive(self)
    }
}

impl SigningKey for BlsPrivateKey {
    type Signature = BlsSignature;

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        // Sig = sk * H(m)
        Ok(BlsSignature(G1Affine::from(hash_to_g1(message) * self.0)))
    }
}

impl SerializableKey for BlsPrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_bytes().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr = to_array::<SECRET_KEY_SIZE>(bytes)?;
        Option::from(Scalar::from_bytes(&arr))
            .map(Self)
            .ok_or_else(|| CryptoError::InvalidKey("scalar out of range".to_string()))
    }
}

impl fmt::Debug for BlsPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlsPrivateKey(..)")
    }
}

impl BlsSignature {
    /// The 48-byte compressed encoding.
    pub fn compress(&self) -> [u8; SIGNATURE_SIZE] {
        self.0.to_compressed()
    }
}

impl SerializableKey for BlsSignature {
    fn to_bytes(&self) -> Vec<u8> {
        self.compress().to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        let arr = to_array::<SIGNATURE_SIZE>(bytes)?;
        Option::from(G1Affine::from_compressed(&arr))
            .map(Self)
            .ok_or_else(|| CryptoError::InvalidSignature("invalid G1 point".to_string()))
    }
}

impl Signature for BlsSignature {}

impl Encode for BlsPublicKey {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.compress());
    }

    fn encoded_len(&self) -> usize {
        PUBLIC_KEY_SIZE
    }
}

impl Decode for BlsPublicKey {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes = read_array::<PUBLIC_KEY_SIZE>(reader)?;
        Self::from_bytes(&bytes).map_err(|e| CodecError::Invalid(e.to_string()))
    }
}

impl Encode for BlsSignature {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.compress());
    }

    fn encoded_len(&self) -> usize {
        SIGNATURE_SIZE
    }
}

impl Decode for BlsSignature {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes = read_array::<SIGNATURE_SIZE>(reader)?;
        Self::from_bytes(&bytes).map_err(|e| CodecError::Invalid(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bls_sign_verify() {
        let keypair = BlsKeyPair::generate().unwrap();
        let message = b"voting on the next macro block";
        let signature = keypair.sign(message).unwrap();

        assert!(keypair.public_key().verify(message, &signature));
        assert!(!keypair.public_key().verify(b"wrong", &signature));

        let other = BlsKeyPair::generate().unwrap();
        assert!(!other.public_key().verify(message, &signature));
    }

    #[test]
    fn test_serialization_sizes_and_roundtrip() {
        let keypair = BlsKeyPair::generate().unwrap();
        let pk_bytes = keypair.public_key().to_bytes();
        let sk_bytes = keypair.private_key().to_bytes();
        let sig_bytes = keypair.sign(b"m").unwrap().to_bytes();
        assert_eq!(pk_bytes.len(), PUBLIC_KEY_SIZE);
        assert_eq!(sk_bytes.len(), SECRET_KEY_SIZE);
        assert_eq!(sig_bytes.len(), SIGNATURE_SIZE);

        assert_eq!(
            BlsPublicKey::from_bytes(&pk_bytes).unwrap(),
            keypair.public_key()
        );
        let restored = BlsPrivateKey::from_bytes(&sk_bytes).unwrap();
        assert_eq!(restored.public_key(), keypair.public_key());
        assert_eq!(
            BlsSignature::from_bytes(&sig_bytes).unwrap(),
            keypair.sign(b"m").unwrap()
        );
    }

    #[test]
    fn test_signing_is_deterministic() {
        let keypair = BlsKeyPair::generate().unwrap();
        assert_eq!(keypair.sign(b"m").unwrap(), keypair.sign(b"m").unwrap());
    }

    #[test]
    fn test_proof_of_knowledge() {
        let keypair = BlsKeyPair::generate().unwrap();
        let proof = keypair.proof_of_knowledge().unwrap();
        assert!(keypair.public_key().verify_proof_of_knowledge(&proof));

        let other = BlsKeyPair::generate().unwrap();
        assert!(!other.public_key().verify_proof_of_knowledge(&proof));
    }

    #[test]
    fn test_malformed_bytes_rejected() {
        assert!(matches!(
            BlsPublicKey::from_bytes(&[0u8; 95]),
            Err(CryptoError::InvalidLength {
                expected: 96,
                got: 95
            })
        ));
        assert!(matches!(
            BlsSignature::from_bytes(&[0x11u8; 48]),
            Err(CryptoError::InvalidSignature(_))
        ));
        assert!(matches!(
            BlsPrivateKey::from_bytes(&[0xffu8; 32]),
            Err(CryptoError::InvalidKey(_))
        ));
    }
}
