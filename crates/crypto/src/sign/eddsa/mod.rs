// Path: crates/crypto/src/sign/eddsa/mod.rs
//! Ed25519 transaction keys, backed by `ed25519-dalek`.
//!
//! Keys and signatures are kept as raw byte arrays so that placeholder values
//! (the all-zero key and signature used while computing staking inner proofs)
//! can be represented. A public key that is not a valid curve point simply
//! never verifies. Verification is strict: small-order keys and signature
//! points are rejected.

use crate::error::CryptoError;
use ed25519_dalek::Signer;
use nimiq_api::crypto::{SerializableKey, Signature, SigningKey, SigningKeyPair, VerifyingKey};
use nimiq_types::app::Address;
use nimiq_types::codec::{read_array, Decode, Encode};
use nimiq_types::error::CodecError;
use rand::rngs::OsRng;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Size of a private key seed in bytes.
pub const PRIVATE_KEY_SIZE: usize = 32;
/// Size of a public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;
/// Size of a signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

fn to_array<const N: usize>(bytes: &[u8]) -> Result<[u8; N], CryptoError> {
    <[u8; N]>::try_from(bytes).map_err(|_| CryptoError::InvalidLength {
        expected: N,
        got: bytes.len(),
    })
}

/// Ed25519 key pair implementation
#[derive(Clone)]
pub struct Ed25519KeyPair {
    public_key: Ed25519PublicKey,
    private_key: Ed25519PrivateKey,
}

/// Ed25519 signature implementation
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ed25519Signature([u8; SIGNATURE_SIZE]);

/// Ed25519 public key implementation
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Ed25519PublicKey([u8; PUBLIC_KEY_SIZE]);

/// Ed25519 private key implementation. The seed is wiped on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Ed25519PrivateKey([u8; PRIVATE_KEY_SIZE]);

impl Ed25519KeyPair {
    /// Generate a new Ed25519 key pair
    pub fn generate() -> Result<Self, CryptoError> {
        let signing_key = ed25519_dalek::SigningKey::generate(&mut OsRng);
        Ok(Self::from_private_key(&Ed25519PrivateKey(
            signing_key.to_bytes(),
        )))
    }

    /// Create from an existing private key
    pub fn from_private_key(private_key: &Ed25519PrivateKey) -> Self {
        Self {
            public_key: Ed25519PublicKey::derive(private_key),
            private_key: private_key.clone(),
        }
    }

    /// The address controlled by this key pair.
    pub fn address(&self) -> Address {
        self.public_key.to_address()
    }
}

impl fmt::Debug for Ed25519KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ed25519KeyPair")
            .field("public_key", &self.public_key)
            .finish_non_exhaustive()
    }
}

impl SigningKeyPair for Ed25519KeyPair {
    type PublicKey = Ed25519PublicKey;
    type PrivateKey = Ed25519PrivateKey;
    type Signature = Ed25519Signature;

    fn public_key(&self) -> Self::PublicKey {
        self.public_key
    }

    fn private_key(&self) -> Self::PrivateKey {
        self.private_key.clone()
    }

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        self.private_key.sign(message)
    }
}

impl Ed25519PublicKey {
    /// Derives the public key of `private_key`.
    pub fn derive(private_key: &Ed25519PrivateKey) -> Self {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&private_key.0);
        Self(signing_key.verifying_key().to_bytes())
    }

    /// Wraps raw key bytes without checking that they are a curve point.
    pub const fn from_array(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw public key bytes
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// `Address(Blake2b-256(key)[..20])`.
    pub fn to_address(&self) -> Address {
        Address::from_key_material(&self.0)
    }
}

impl VerifyingKey for Ed25519PublicKey {
    type Signature = Ed25519Signature;

    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool {
        let Ok(key) = ed25519_dalek::VerifyingKey::from_bytes(&self.0) else {
            return false;
        };
        let signature = ed25519_dalek::Signature::from_bytes(&signature.0);
        key.verify_strict(message, &signature).is_ok()
    }
}

impl SerializableKey for Ed25519PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        to_array(bytes).map(Self)
    }
}

impl fmt::Debug for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for Ed25519PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Ed25519PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Ed25519PublicKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<&Ed25519PrivateKey> for Ed25519PublicKey {
    fn from(private_key: &Ed25519PrivateKey) -> Self {
        Self::derive(private_key)
    }
}

impl Encode for Ed25519PublicKey {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn encoded_len(&self) -> usize {
        PUBLIC_KEY_SIZE
    }
}

impl Decode for Ed25519PublicKey {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_array(reader).map(Self)
    }
}

impl Serialize for Ed25519PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Ed25519PrivateKey {
    /// Generates a fresh random seed.
    pub fn generate() -> Self {
        Self(ed25519_dalek::SigningKey::generate(&mut OsRng).to_bytes())
    }

    /// Wraps a raw 32-byte seed.
    pub const fn from_seed(seed: [u8; PRIVATE_KEY_SIZE]) -> Self {
        Self(seed)
    }

    /// Get the raw private key seed bytes (32 bytes)
    pub fn as_bytes(&self) -> &[u8; PRIVATE_KEY_SIZE] {
        &self.0
    }

    /// Get the public key corresponding to this private key
    pub fn public_key(&self) -> Ed25519PublicKey {
        Ed25519PublicKey::derive(self)
    }
}

impl SigningKey for Ed25519PrivateKey {
    type Signature = Ed25519Signature;

    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError> {
        let signing_key = ed25519_dalek::SigningKey::from_bytes(&self.0);
        Ok(Ed25519Signature(signing_key.sign(message).to_bytes()))
    }
}

impl SerializableKey for Ed25519PrivateKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        to_array(bytes).map(Self)
    }
}

impl fmt::Debug for Ed25519PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Ed25519PrivateKey(..)")
    }
}

impl FromStr for Ed25519PrivateKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl Ed25519Signature {
    /// Wraps raw signature bytes.
    pub const fn from_array(bytes: [u8; SIGNATURE_SIZE]) -> Self {
        Self(bytes)
    }

    /// Get the raw signature bytes
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }
}

impl Default for Ed25519Signature {
    fn default() -> Self {
        Self([0u8; SIGNATURE_SIZE])
    }
}

impl SerializableKey for Ed25519Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        to_array(bytes).map(Self)
    }
}

impl Signature for Ed25519Signature {}

impl fmt::Debug for Ed25519Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ed25519Signature({})", hex::encode(self.0))
    }
}

impl FromStr for Ed25519Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Ed25519Signature {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl Encode for Ed25519Signature {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn encoded_len(&self) -> usize {
        SIGNATURE_SIZE
    }
}

impl Decode for Ed25519Signature {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_array(reader).map(Self)
    }
}

impl Serialize for Ed25519Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Ed25519Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests;
