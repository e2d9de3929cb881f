// Path: crates/crypto/src/algorithms/kdf.rs
//! Message authentication and password-based key derivation.
//!
//! Argon2 runs with a fixed memory cost of 512 KiB and a single lane; only the
//! number of passes and the output length are chosen by the caller.

use crate::error::CryptoError;
use argon2::{Algorithm, Argon2, Params, Version};
use hmac::{Hmac, Mac};
use sha2::Sha512;
use zeroize::Zeroizing;

/// Argon2 memory cost in KiB.
pub const ARGON2_MEMORY_COST: u32 = 512;
/// Argon2 degree of parallelism.
pub const ARGON2_PARALLELISM: u32 = 1;

type HmacSha512 = Hmac<Sha512>;

/// HMAC-SHA512 of `data` under `key`.
pub fn hmac_sha512(key: &[u8], data: &[u8]) -> Result<[u8; 64], CryptoError> {
    let mut mac = HmacSha512::new_from_slice(key)
        .map_err(|e| CryptoError::InvalidParameter(format!("HMAC key: {e}")))?;
    mac.update(data);
    let mut out = [0u8; 64];
    out.copy_from_slice(&mac.finalize().into_bytes());
    Ok(out)
}

fn check_params(iterations: u32, key_len: usize) -> Result<(), CryptoError> {
    if iterations == 0 {
        return Err(CryptoError::InvalidParameter(
            "iterations must be at least 1".to_string(),
        ));
    }
    if key_len == 0 {
        return Err(CryptoError::InvalidParameter(
            "key length must be at least 1".to_string(),
        ));
    }
    Ok(())
}

/// PBKDF2 with HMAC-SHA512.
pub fn pbkdf2_sha512(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    check_params(iterations, key_len)?;
    let mut out = Zeroizing::new(vec![0u8; key_len]);
    pbkdf2::pbkdf2::<HmacSha512>(password, salt, iterations, &mut out)
        .map_err(|e| CryptoError::InvalidParameter(format!("PBKDF2: {e}")))?;
    Ok(out)
}

fn argon2(
    algorithm: Algorithm,
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    check_params(iterations, key_len)?;
    let params = Params::new(
        ARGON2_MEMORY_COST,
        iterations,
        ARGON2_PARALLELISM,
        Some(key_len),
    )
    .map_err(|e| CryptoError::InvalidParameter(format!("Argon2 params: {e}")))?;
    let mut out = Zeroizing::new(vec![0u8; key_len]);
    Argon2::new(algorithm, Version::V0x13, params)
        .hash_password_into(password, salt, &mut out)
        .map_err(|e| CryptoError::InvalidParameter(format!("Argon2: {e}")))?;
    Ok(out)
}

/// Argon2d key derivation.
pub fn argon2d(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    argon2(Algorithm::Argon2d, password, salt, iterations, key_len)
}

/// Argon2id key derivation.
pub fn argon2id(
    password: &[u8],
    salt: &[u8],
    iterations: u32,
    key_len: usize,
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    argon2(Algorithm::Argon2id, password, salt, iterations, key_len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hmac_sha512_rfc4231_case_2() {
        let mac = hmac_sha512(b"Jefe", b"what do ya want for nothing?").unwrap();
        assert_eq!(
            hex::encode(mac),
            "164b7a7bfcf819e2e395fbe73b56e0a387bd64222e831fd610270cd7ea250554\
             9758bf75c05a994a6d034f65f8f0e6fdcaeab1a34d4a6b4b636e070a38bce737"
        );
    }

    #[test]
    fn pbkdf2_is_deterministic_and_sized() {
        let a = pbkdf2_sha512(b"password", b"salt", 2, 48).unwrap();
        let b = pbkdf2_sha512(b"password", b"salt", 2, 48).unwrap();
        assert_eq!(a.len(), 48);
        assert_eq!(*a, *b);
        let c = pbkdf2_sha512(b"password", b"salt", 3, 48).unwrap();
        assert_ne!(*a, *c);
    }

    #[test]
    fn pbkdf2_sha512_one_iteration_vector() {
        let key = pbkdf2_sha512(b"password", b"salt", 1, 64).unwrap();
        assert_eq!(
            hex::encode(&*key),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
             c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
        );
    }

    #[test]
    fn argon2_variants_differ() {
        let d = argon2d(b"password", b"somesalt", 1, 32).unwrap();
        let id = argon2id(b"password", b"somesalt", 1, 32).unwrap();
        assert_eq!(d.len(), 32);
        assert_ne!(*d, *id);
        assert_eq!(*d, *argon2d(b"password", b"somesalt", 1, 32).unwrap());
    }

    #[test]
    fn zero_parameters_are_rejected() {
        for result in [
            pbkdf2_sha512(b"p", b"salt", 0, 32),
            pbkdf2_sha512(b"p", b"salt", 1, 0),
            argon2d(b"p", b"somesalt", 0, 32),
            argon2id(b"p", b"somesalt", 1, 0),
        ] {
            assert!(matches!(result, Err(CryptoError::InvalidParameter(_))));
        }
    }
}
