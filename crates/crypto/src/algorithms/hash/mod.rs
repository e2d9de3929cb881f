// Path: crates/crypto/src/algorithms/hash/mod.rs
//! Cryptographic hash functions: Blake2b-256, SHA-256 and SHA-512.

use crate::error::CryptoError;
use blake2::digest::consts::U32;
use blake2::Blake2b;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256, Sha512};

/// Hash function trait
pub trait HashFunction {
    /// Hash a message and return the digest
    fn hash(&self, message: &[u8]) -> Vec<u8>;

    /// Get the digest size in bytes
    fn digest_size(&self) -> usize;

    /// Get the name of the hash function
    fn name(&self) -> &str;
}

/// Blake2b with a 256-bit digest, the hash behind addresses, transaction
/// hashes and Merkle trees.
#[derive(Default, Clone)]
pub struct Blake2bHash;

impl HashFunction for Blake2bHash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        blake2b(message).to_vec()
    }

    fn digest_size(&self) -> usize {
        32
    }

    fn name(&self) -> &str {
        "Blake2b-256"
    }
}

/// SHA-256 hash function implementation
#[derive(Default, Clone)]
pub struct Sha256Hash;

impl HashFunction for Sha256Hash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        sha256(message).to_vec()
    }

    fn digest_size(&self) -> usize {
        32 // 256 bits = 32 bytes
    }

    fn name(&self) -> &str {
        "SHA-256"
    }
}

/// SHA-512 hash function implementation
#[derive(Default, Clone)]
pub struct Sha512Hash;

impl HashFunction for Sha512Hash {
    fn hash(&self, message: &[u8]) -> Vec<u8> {
        sha512(message).to_vec()
    }

    fn digest_size(&self) -> usize {
        64 // 512 bits = 64 bytes
    }

    fn name(&self) -> &str {
        "SHA-512"
    }
}

/// Blake2b-256 of any type that can be referenced as bytes
pub fn blake2b<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    Blake2b::<U32>::digest(data.as_ref()).into()
}

/// SHA-256 of any type that can be referenced as bytes
pub fn sha256<T: AsRef<[u8]>>(data: T) -> [u8; 32] {
    Sha256::digest(data.as_ref()).into()
}

/// SHA-512 of any type that can be referenced as bytes
pub fn sha512<T: AsRef<[u8]>>(data: T) -> [u8; 64] {
    let mut out = [0u8; 64];
    out.copy_from_slice(&Sha512::digest(data.as_ref()));
    out
}

/// The hash algorithms a hashed time-locked contract may commit to.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum HashAlgorithm {
    /// Blake2b-256.
    Blake2b = 1,
    /// SHA-256.
    Sha256 = 3,
    /// SHA-512.
    Sha512 = 4,
}

impl HashAlgorithm {
    /// The hash function implementing this algorithm.
    pub fn hasher(&self) -> Box<dyn HashFunction> {
        match self {
            Self::Blake2b => Box::new(Blake2bHash),
            Self::Sha256 => Box::new(Sha256Hash),
            Self::Sha512 => Box::new(Sha512Hash),
        }
    }

    /// Hashes `data` with this algorithm.
    pub fn hash(&self, data: &[u8]) -> Vec<u8> {
        self.hasher().hash(data)
    }

    /// The digest size in bytes.
    pub fn digest_size(&self) -> usize {
        self.hasher().digest_size()
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = CryptoError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Blake2b),
            3 => Ok(Self::Sha256),
            4 => Ok(Self::Sha512),
            other => Err(CryptoError::Unsupported(format!(
                "hash algorithm {other}"
            ))),
        }
    }
}

impl From<HashAlgorithm> for u8 {
    fn from(algorithm: HashAlgorithm) -> Self {
        algorithm as u8
    }
}
