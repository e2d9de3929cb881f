// Path: crates/crypto/src/sign/es256/mod.rs
//! ES256 (ECDSA over P-256 with SHA-256) keys used by WebAuthn authenticators.
//!
//! Only verification is supported; the private half lives in the
//! authenticator. Public keys are kept in 33-byte compressed SEC1 form and
//! signatures as 64-byte `r ‖ s`.

use crate::error::CryptoError;
use nimiq_api::crypto::{SerializableKey, Signature, VerifyingKey};
use nimiq_types::app::Address;
use nimiq_types::codec::{read_array, Decode, Encode};
use nimiq_types::error::CodecError;
use p256::ecdsa::signature::Verifier;
use p256::pkcs8::DecodePublicKey;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Size of a compressed public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 33;
/// Size of an uncompressed SEC1 public key in bytes.
pub const UNCOMPRESSED_PUBLIC_KEY_SIZE: usize = 65;
/// Size of a raw `r ‖ s` signature in bytes.
pub const SIGNATURE_SIZE: usize = 64;

/// A P-256 public key in compressed SEC1 form.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Es256PublicKey([u8; PUBLIC_KEY_SIZE]);

/// A P-256 ECDSA signature as raw `r ‖ s`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Es256Signature([u8; SIGNATURE_SIZE]);

impl Es256PublicKey {
    fn from_verifying_key(key: &p256::ecdsa::VerifyingKey) -> Result<Self, CryptoError> {
        let point = key.to_encoded_point(true);
        <[u8; PUBLIC_KEY_SIZE]>::try_from(point.as_bytes())
            .map(Self)
            .map_err(|_| CryptoError::InvalidKey("identity point".to_string()))
    }

    fn verifying_key(&self) -> Result<p256::ecdsa::VerifyingKey, CryptoError> {
        p256::ecdsa::VerifyingKey::from_sec1_bytes(&self.0)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))
    }

    /// Parses a raw SEC1 point, compressed (33 bytes) or uncompressed (65 bytes).
    pub fn from_raw(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != PUBLIC_KEY_SIZE && bytes.len() != UNCOMPRESSED_PUBLIC_KEY_SIZE {
            return Err(CryptoError::InvalidLength {
                expected: PUBLIC_KEY_SIZE,
                got: bytes.len(),
            });
        }
        let key = p256::ecdsa::VerifyingKey::from_sec1_bytes(bytes)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::from_verifying_key(&key)
    }

    /// Parses a DER `SubjectPublicKeyInfo`, as exported by WebAuthn attestation.
    pub fn from_spki(der: &[u8]) -> Result<Self, CryptoError> {
        let key = p256::ecdsa::VerifyingKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidKey(e.to_string()))?;
        Self::from_verifying_key(&key)
    }

    /// The compressed key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }

    /// `Address(Blake2b-256(compressed key)[..20])`.
    pub fn to_address(&self) -> Address {
        Address::from_key_material(&self.0)
    }
}

impl VerifyingKey for Es256PublicKey {
    type Signature = Es256Signature;

    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool {
        let Ok(key) = self.verifying_key() else {
            return false;
        };
        let Ok(sig) = p256::ecdsa::Signature::from_slice(&signature.0) else {
            return false;
        };
        // Authenticators are not required to emit low-S signatures.
        let sig = sig.normalize_s().unwrap_or(sig);
        key.verify(message, &sig).is_ok()
    }
}

impl SerializableKey for Es256PublicKey {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_raw(bytes)
    }
}

impl fmt::Debug for Es256PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Es256PublicKey({})", hex::encode(self.0))
    }
}

impl fmt::Display for Es256PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl FromStr for Es256PublicKey {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Es256PublicKey {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_raw(bytes)
    }
}

impl Encode for Es256PublicKey {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn encoded_len(&self) -> usize {
        PUBLIC_KEY_SIZE
    }
}

impl Decode for Es256PublicKey {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes = read_array::<PUBLIC_KEY_SIZE>(reader)?;
        Self::from_raw(&bytes).map_err(|e| CodecError::Invalid(e.to_string()))
    }
}

impl Serialize for Es256PublicKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Es256PublicKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

impl Es256Signature {
    fn from_ecdsa(signature: &p256::ecdsa::Signature) -> Self {
        let mut out = [0u8; SIGNATURE_SIZE];
        out.copy_from_slice(&signature.to_bytes());
        Self(out)
    }

    /// Parses a raw 64-byte `r ‖ s` signature.
    pub fn from_raw(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != SIGNATURE_SIZE {
            return Err(CryptoError::InvalidLength {
                expected: SIGNATURE_SIZE,
                got: bytes.len(),
            });
        }
        let signature = p256::ecdsa::Signature::from_slice(bytes)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok(Self::from_ecdsa(&signature))
    }

    /// Parses an ASN.1 DER signature, the form WebAuthn assertions carry.
    pub fn from_der(der: &[u8]) -> Result<Self, CryptoError> {
        let signature = p256::ecdsa::Signature::from_der(der)
            .map_err(|e| CryptoError::InvalidSignature(e.to_string()))?;
        Ok(Self::from_ecdsa(&signature))
    }

    /// The raw `r ‖ s` bytes.
    pub fn as_bytes(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.0
    }
}

impl SerializableKey for Es256Signature {
    fn to_bytes(&self) -> Vec<u8> {
        self.0.to_vec()
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError> {
        Self::from_raw(bytes)
    }
}

impl Signature for Es256Signature {}

impl fmt::Debug for Es256Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Es256Signature({})", hex::encode(self.0))
    }
}

impl FromStr for Es256Signature {
    type Err = CryptoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<&[u8]> for Es256Signature {
    type Error = CryptoError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_raw(bytes)
    }
}

impl Encode for Es256Signature {
    fn encode<B: bytes::BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn encoded_len(&self) -> usize {
        SIGNATURE_SIZE
    }
}

impl Decode for Es256Signature {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let bytes = read_array::<SIGNATURE_SIZE>(reader)?;
        Self::from_raw(&bytes).map_err(|e| CodecError::Invalid(e.to_string()))
    }
}

impl Serialize for Es256Signature {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Es256Signature {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).map_err(serde::de::Error::custom)
    }
}
