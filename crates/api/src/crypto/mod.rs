// Path: crates/api/src/crypto/mod.rs
//! Defines unified traits for cryptographic primitives.

use crate::error::CryptoError;
use zeroize::Zeroizing;

/// A trait for any key or signature that can be serialized to and from bytes.
pub trait SerializableKey {
    /// Converts the key to its canonical byte encoding.
    fn to_bytes(&self) -> Vec<u8>;

    /// Creates a key from its canonical byte encoding.
    fn from_bytes(bytes: &[u8]) -> Result<Self, CryptoError>
    where
        Self: Sized;

    /// The lowercase hex encoding of [`SerializableKey::to_bytes`].
    fn to_hex(&self) -> String {
        let bytes = Zeroizing::new(self.to_bytes());
        hex::encode(&*bytes)
    }

    /// Parses the hex encoding of the canonical bytes.
    fn from_hex(s: &str) -> Result<Self, CryptoError>
    where
        Self: Sized,
    {
        let bytes = Zeroizing::new(
            hex::decode(s.trim()).map_err(|e| CryptoError::InvalidFormat(e.to_string()))?,
        );
        Self::from_bytes(&bytes)
    }
}

/// A trait for a key pair used in a signature algorithm.
pub trait SigningKeyPair {
    /// The public key type used for verification.
    type PublicKey: VerifyingKey<Signature = Self::Signature>;
    /// The private key type used for signing.
    type PrivateKey: SigningKey<Signature = Self::Signature>;
    /// The signature type produced.
    type Signature: Signature;

    /// Gets the public key.
    fn public_key(&self) -> Self::PublicKey;
    /// Gets the private key.
    fn private_key(&self) -> Self::PrivateKey;
    /// Signs a message with the private key.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A trait for a public key used for signature verification.
pub trait VerifyingKey: SerializableKey {
    /// The signature type that this key can verify.
    type Signature: Signature;
    /// Verifies a signature against a message. A mismatch is `false`, never an error.
    fn verify(&self, message: &[u8], signature: &Self::Signature) -> bool;
}

/// A trait for a private key used for signing operations.
pub trait SigningKey: SerializableKey {
    /// The signature type that this key produces.
    type Signature: Signature;
    /// Signs a message.
    fn sign(&self, message: &[u8]) -> Result<Self::Signature, CryptoError>;
}

/// A marker trait for a cryptographic signature.
pub trait Signature: SerializableKey {}
