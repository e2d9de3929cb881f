// Path: crates/crypto/src/sign/eddsa/tests/mod.rs
use super::*;

const RFC8032_SEED: &str = "9d61b19deffd5a60ba844af492ec2cc44449c5697b326919703bac031cae7f60";

#[test]
fn test_keypair_generation() {
    let keypair = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair.sign(message).unwrap();

    let public_key = keypair.public_key();
    assert!(public_key.verify(message, &signature));
}

#[test]
fn test_serialization_roundtrip() {
    let keypair = Ed25519KeyPair::generate().unwrap();

    let public_bytes = keypair.public_key().to_bytes();
    let private_bytes = keypair.private_key().to_bytes();
    assert_eq!(public_bytes.len(), PUBLIC_KEY_SIZE);
    assert_eq!(private_bytes.len(), PRIVATE_KEY_SIZE);

    let public_key = Ed25519PublicKey::from_bytes(&public_bytes).unwrap();
    let private_key = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();
    assert_eq!(public_key, private_key.public_key());
}

#[test]
fn test_rfc8032_vector() {
    let private_key: Ed25519PrivateKey = RFC8032_SEED.parse().unwrap();
    let keypair = Ed25519KeyPair::from_private_key(&private_key);
    assert_eq!(
        keypair.public_key().to_hex(),
        "d75a980182b10ab7d54bfed3c964073a0ee172f3daa62325af021a68f707511a"
    );
    let signature = keypair.sign(b"").unwrap();
    assert_eq!(
        signature.to_hex(),
        "e5564300c360ac729086e2cc806e828a84877f1eb8e5d974d873e06522490155\
         5fb8821590a33bacc61e39701cf9b46bd25bf5f0595bbe24655141438e7a100b"
    );
    assert!(keypair.public_key().verify(b"", &signature));
}

#[test]
fn test_zero_seed_derivation() {
    let private_key = Ed25519PrivateKey::from_seed([0u8; 32]);
    let public_key = Ed25519PublicKey::derive(&private_key);
    assert_eq!(
        public_key.to_hex(),
        "3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29"
    );
    assert_eq!(
        public_key.to_address().to_hex(),
        "689dae2f77b048dcc08e14d73104ea14222b5be1"
    );
}

#[test]
fn test_sign_verify_with_loaded_keys() {
    let original_keypair = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message for persistence";
    let original_sig = original_keypair.sign(message).unwrap();

    let private_bytes = original_keypair.private_key().to_bytes();
    let loaded_private = Ed25519PrivateKey::from_bytes(&private_bytes).unwrap();
    let reconstructed_keypair = Ed25519KeyPair::from_private_key(&loaded_private);
    let new_sig = reconstructed_keypair.sign(message).unwrap();

    // Ed25519 signatures are deterministic.
    assert_eq!(original_sig, new_sig);
    assert!(reconstructed_keypair.public_key().verify(message, &original_sig));
}

#[test]
fn test_wrong_signature_fails() {
    let keypair1 = Ed25519KeyPair::generate().unwrap();
    let keypair2 = Ed25519KeyPair::generate().unwrap();
    let message = b"Test message";

    let signature = keypair1.sign(message).unwrap();
    assert!(!keypair2.public_key().verify(message, &signature));
    assert!(!keypair1.public_key().verify(b"Other message", &signature));

    let mut tampered = *signature.as_bytes();
    tampered[0] ^= 0x01;
    assert!(!keypair1
        .public_key()
        .verify(message, &Ed25519Signature::from_array(tampered)));
}

#[test]
fn test_placeholder_key_never_verifies() {
    let key = Ed25519PublicKey::default();
    assert!(!key.verify(b"data", &Ed25519Signature::default()));
}

#[test]
fn test_length_checks() {
    assert_eq!(
        Ed25519PublicKey::from_bytes(&[0u8; 31]).unwrap_err(),
        CryptoError::InvalidLength {
            expected: 32,
            got: 31
        }
    );
    assert!(Ed25519Signature::from_bytes(&[0u8; 63]).is_err());
    assert!(Ed25519PrivateKey::from_bytes(&[0u8; 33]).is_err());
    assert!(matches!(
        "zz".parse::<Ed25519PublicKey>(),
        Err(CryptoError::InvalidFormat(_))
    ));
}

#[test]
fn test_public_key_ordering_is_bytewise() {
    let low = Ed25519PublicKey::from_array([0u8; 32]);
    let mut high_bytes = [0u8; 32];
    high_bytes[0] = 1;
    let high = Ed25519PublicKey::from_array(high_bytes);
    assert!(low < high);
}

#[test]
fn test_serde_uses_hex() {
    let key = Ed25519KeyPair::generate().unwrap().public_key();
    let json = serde_json::to_string(&key).unwrap();
    assert_eq!(json, format!("\"{}\"", key.to_hex()));
    assert_eq!(serde_json::from_str::<Ed25519PublicKey>(&json).unwrap(), key);
}
