// Path: crates/crypto/src/sign/proof/tests.rs
use super::*;
use base64::Engine as _;
use crate::sign::eddsa::{Ed25519KeyPair, Ed25519PrivateKey};
use crate::sign::es256::test_support;
use nimiq_api::crypto::SigningKeyPair;
use nimiq_types::codec::from_bytes_canonical;

fn ed_keypair(seed: u8) -> Ed25519KeyPair {
    Ed25519KeyPair::from_private_key(&Ed25519PrivateKey::from_seed([seed; 32]))
}

fn client_data(kind: &str, data: &[u8]) -> Vec<u8> {
    serde_json::json!({
        "type": kind,
        "challenge": URL_SAFE_NO_PAD.encode(data),
        "origin": "https://wallet.example",
        "crossOrigin": false,
    })
    .to_string()
    .into_bytes()
}

fn webauthn_proof(data: &[u8], kind: &str) -> SignatureProof {
    let signer = test_support::authenticator(11);
    let fields = WebauthnFields::new(vec![0x49; 37], client_data(kind, data)).unwrap();
    let signature = test_support::sign(&signer, &fields.signed_payload());
    SignatureProof::webauthn_single_sig(
        test_support::public_key(&signer),
        signature,
        fields.authenticator_data().to_vec(),
        fields.client_data_json().to_vec(),
    )
    .unwrap()
}

#[test]
fn single_sig_verifies_and_has_fixed_size() {
    let keypair = ed_keypair(1);
    let signature = keypair.sign(b"data").unwrap();
    let proof = SignatureProof::single_sig(keypair.public_key(), signature).unwrap();

    assert!(proof.verify(b"data"));
    assert!(!proof.verify(b"other"));
    assert!(proof.is_signed_by(&keypair.address()));
    assert!(proof.is_ed25519_single_sig());

    let bytes = proof.to_bytes();
    assert_eq!(bytes.len(), SINGLE_SIG_SIZE);
    assert_eq!(bytes[0], 0x00);
    assert_eq!(from_bytes_canonical::<SignatureProof>(&bytes).unwrap(), proof);
}

#[test]
fn es256_single_sig_size() {
    let signer = test_support::authenticator(4);
    let signature = test_support::sign(&signer, b"data");
    let proof = SignatureProof::single_sig(test_support::public_key(&signer), signature).unwrap();
    assert!(proof.verify(b"data"));
    let bytes = proof.to_bytes();
    assert_eq!(bytes.len(), ES256_SINGLE_SIG_SIZE);
    assert_eq!(bytes[0], 0x01);
    assert_eq!(from_bytes_canonical::<SignatureProof>(&bytes).unwrap(), proof);
}

#[test]
fn mismatched_algorithms_are_rejected() {
    let keypair = ed_keypair(1);
    let es_signature = test_support::sign(&test_support::authenticator(4), b"data");
    assert!(matches!(
        SignatureProof::single_sig(keypair.public_key(), es_signature),
        Err(CryptoError::InvalidSignature(_))
    ));
}

#[test]
fn default_is_zero_placeholder() {
    let bytes = SignatureProof::default().to_bytes();
    assert_eq!(bytes, vec![0u8; SINGLE_SIG_SIZE]);
    assert!(!SignatureProof::default().verify(b"anything"));
}

#[test]
fn multi_sig_signer_is_key_set_address() {
    let keys: Vec<Ed25519KeyPair> = (1..=3).map(ed_keypair).collect();
    let set: Vec<SignerKey> = keys.iter().map(|k| k.public_key().into()).collect();
    let signature = keys[1].sign(b"data").unwrap();
    let proof = SignatureProof::multi_sig(keys[1].public_key(), &set, signature).unwrap();

    assert!(proof.verify(b"data"));
    assert!(proof.is_multisig());
    assert_eq!(proof.to_bytes()[0], FLAG_MULTISIG << 4);
    let multisig_address = SignatureProof::multisig_address(&set).unwrap();
    assert_eq!(proof.compute_signer(), multisig_address);
    assert!(!proof.is_signed_by(&keys[1].address()));

    let decoded = from_bytes_canonical::<SignatureProof>(&proof.to_bytes()).unwrap();
    assert_eq!(decoded, proof);
    assert_eq!(decoded.compute_signer(), multisig_address);
}

#[test]
fn multi_sig_key_set_is_canonicalized() {
    let keys: Vec<SignerKey> = (1..=3).map(|s| ed_keypair(s).public_key().into()).collect();
    let signer = ed_keypair(2);
    let signature = signer.sign(b"data").unwrap();

    let forward = SignatureProof::multi_sig(signer.public_key(), &keys, signature).unwrap();
    let mut shuffled = vec![keys[2], keys[0], keys[1], keys[0]];
    let backward = SignatureProof::multi_sig(signer.public_key(), &shuffled, signature).unwrap();
    assert_eq!(forward.to_bytes(), backward.to_bytes());

    shuffled.reverse();
    assert_eq!(
        SignatureProof::multisig_address(&shuffled).unwrap(),
        SignatureProof::multisig_address(&keys).unwrap()
    );
}

#[test]
fn multi_sig_errors() {
    let signer = ed_keypair(1);
    let signature = signer.sign(b"data").unwrap();
    assert_eq!(
        SignatureProof::multi_sig(signer.public_key(), &[], signature).unwrap_err(),
        CryptoError::EmptyKeySet
    );
    let others: Vec<SignerKey> = vec![ed_keypair(2).public_key().into()];
    assert_eq!(
        SignatureProof::multi_sig(signer.public_key(), &others, signature).unwrap_err(),
        CryptoError::SignerNotInKeySet
    );
}

#[test]
fn webauthn_single_sig_verifies_challenge_and_payload() {
    let proof = webauthn_proof(b"tx content", WEBAUTHN_GET);
    assert!(proof.is_webauthn());
    assert!(proof.verify(b"tx content"));
    assert!(!proof.verify(b"different content"));

    let bytes = proof.to_bytes();
    assert_eq!(bytes[0], ALGORITHM_ES256 | (FLAG_WEBAUTHN << 4));
    assert_eq!(bytes.len(), proof.encoded_len());
    assert_eq!(from_bytes_canonical::<SignatureProof>(&bytes).unwrap(), proof);
}

#[test]
fn webauthn_wrong_type_is_rejected() {
    let proof = webauthn_proof(b"tx content", "webauthn.create");
    assert!(!proof.verify(b"tx content"));
}

#[test]
fn webauthn_multi_sig_roundtrip() {
    let signer = test_support::authenticator(21);
    let key = test_support::public_key(&signer);
    let set: Vec<SignerKey> = vec![
        key.into(),
        test_support::public_key(&test_support::authenticator(22)).into(),
    ];
    let fields = WebauthnFields::new(vec![7; 40], client_data(WEBAUTHN_GET, b"m")).unwrap();
    let signature = test_support::sign(&signer, &fields.signed_payload());
    let proof = SignatureProof::webauthn_multi_sig(
        key,
        &set,
        signature,
        fields.authenticator_data().to_vec(),
        fields.client_data_json().to_vec(),
    )
    .unwrap();

    assert!(proof.verify(b"m"));
    assert_eq!(
        proof.compute_signer(),
        SignatureProof::multisig_address(&set).unwrap()
    );
    let bytes = proof.to_bytes();
    assert_eq!(bytes[0], 0x31);
    assert_eq!(from_bytes_canonical::<SignatureProof>(&bytes).unwrap(), proof);
}

#[test]
fn webauthn_fields_are_validated() {
    let json = client_data(WEBAUTHN_GET, b"m");
    assert!(matches!(
        WebauthnFields::new(vec![0; 36], json.clone()),
        Err(CryptoError::InvalidFormat(_))
    ));
    assert!(matches!(
        WebauthnFields::new(vec![0; 37], br#"{"type":"webauthn.get"}"#.to_vec()),
        Err(CryptoError::InvalidFormat(_))
    ));
    assert!(matches!(
        WebauthnFields::new(vec![0; 37], b"not json".to_vec()),
        Err(CryptoError::InvalidFormat(_))
    ));
    assert!(WebauthnFields::new(vec![0; 37], json).is_ok());
}

#[test]
fn unknown_discriminants_are_rejected() {
    let mut bytes = SignatureProof::default().to_bytes();
    bytes[0] = 0x02;
    assert!(matches!(
        from_bytes_canonical::<SignatureProof>(&bytes),
        Err(CodecError::UnknownDiscriminant { value: 2, .. })
    ));
    bytes[0] = 0x40;
    assert!(matches!(
        from_bytes_canonical::<SignatureProof>(&bytes),
        Err(CodecError::UnknownDiscriminant { value: 0x40, .. })
    ));
}

#[test]
fn plain_view() {
    let keypair = ed_keypair(1);
    let proof = SignatureProof::from_ed25519(keypair.public_key(), keypair.sign(b"x").unwrap());
    let plain = proof.to_plain();
    assert_eq!(plain.signature_type, "ed25519");
    assert_eq!(plain.public_key, keypair.public_key().to_hex());
    assert_eq!(plain.signer, keypair.address().to_user_friendly(true));
    let json = serde_json::to_value(&plain).unwrap();
    assert_eq!(json["type"], "ed25519");
    assert!(json.get("merklePath").is_none());
    assert!(json.get("authenticatorData").is_none());
}
