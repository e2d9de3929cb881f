// Path: crates/crypto/src/sign/proof/mod.rs
//! `SignatureProof`: who signed, with which key, and how that key relates to
//! the signing address.
//!
//! Wire layout: a discriminant byte `algorithm | flags << 4` (algorithm 0 is
//! Ed25519, 1 is ES256; flag bit 0 marks WebAuthn, bit 1 multi-signature),
//! the signer key, the Merkle path of the key within its set (multi-sig
//! only), the 64-byte signature and, for WebAuthn, the `u16`-prefixed
//! authenticator data and client data JSON.

use crate::algorithms::hash::sha256;
use crate::error::CryptoError;
use crate::merkle::{MerklePath, MerkleTree};
use crate::sign::eddsa::{Ed25519PublicKey, Ed25519Signature};
use crate::sign::es256::{Es256PublicKey, Es256Signature};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use bytes::BufMut;
use nimiq_api::crypto::{SerializableKey, VerifyingKey};
use nimiq_types::app::Address;
use nimiq_types::codec::{
    check_var_len, put_var_bytes, read_u8, read_var_bytes, to_bytes_canonical, var_bytes_len,
    Decode, Encode,
};
use nimiq_types::error::CodecError;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Serialized size of an Ed25519 single-signature proof.
pub const SINGLE_SIG_SIZE: usize = 97;
/// Serialized size of an ES256 single-signature proof.
pub const ES256_SINGLE_SIG_SIZE: usize = 98;
/// Minimum WebAuthn authenticator data: RP id hash, flags and counter.
pub const MIN_AUTHENTICATOR_DATA_SIZE: usize = 37;
/// The client data `type` of an assertion.
pub const WEBAUTHN_GET: &str = "webauthn.get";

const ALGORITHM_ED25519: u8 = 0;
const ALGORITHM_ES256: u8 = 1;
const FLAG_WEBAUTHN: u8 = 0b01;
const FLAG_MULTISIG: u8 = 0b10;

/// The public key inside a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SignerKey {
    /// An Ed25519 key.
    Ed25519(Ed25519PublicKey),
    /// A P-256 WebAuthn key.
    Es256(Es256PublicKey),
}

impl SignerKey {
    /// The algorithm nibble of the proof discriminant.
    pub fn algorithm(&self) -> u8 {
        match self {
            Self::Ed25519(_) => ALGORITHM_ED25519,
            Self::Es256(_) => ALGORITHM_ES256,
        }
    }

    /// Raw key bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(key) => key.to_bytes(),
            Self::Es256(key) => key.to_bytes(),
        }
    }

    /// The address of a single-key account holding this key.
    pub fn to_address(&self) -> Address {
        match self {
            Self::Ed25519(key) => key.to_address(),
            Self::Es256(key) => key.to_address(),
        }
    }

    /// Verifies `signature` over `message`. Mismatched algorithms never verify.
    pub fn verify(&self, message: &[u8], signature: &ProofSignature) -> bool {
        match (self, signature) {
            (Self::Ed25519(key), ProofSignature::Ed25519(sig)) => key.verify(message, sig),
            (Self::Es256(key), ProofSignature::Es256(sig)) => key.verify(message, sig),
            _ => false,
        }
    }

    fn decode_for(algorithm: u8, reader: &mut &[u8]) -> Result<Self, CodecError> {
        match algorithm {
            ALGORITHM_ED25519 => Ed25519PublicKey::decode(reader).map(Self::Ed25519),
            _ => Es256PublicKey::decode(reader).map(Self::Es256),
        }
    }
}

impl Ord for SignerKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_bytes().cmp(&other.to_bytes())
    }
}

impl PartialOrd for SignerKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl From<Ed25519PublicKey> for SignerKey {
    fn from(key: Ed25519PublicKey) -> Self {
        Self::Ed25519(key)
    }
}

impl From<Es256PublicKey> for SignerKey {
    fn from(key: Es256PublicKey) -> Self {
        Self::Es256(key)
    }
}

impl Encode for SignerKey {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Self::Ed25519(key) => key.encode(buf),
            Self::Es256(key) => key.encode(buf),
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Self::Ed25519(key) => key.encoded_len(),
            Self::Es256(key) => key.encoded_len(),
        }
    }
}

/// The signature inside a proof.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ProofSignature {
    /// An Ed25519 signature.
    Ed25519(Ed25519Signature),
    /// A P-256 ECDSA signature.
    Es256(Es256Signature),
}

impl ProofSignature {
    /// The algorithm nibble matching [`SignerKey::algorithm`].
    pub fn algorithm(&self) -> u8 {
        match self {
            Self::Ed25519(_) => ALGORITHM_ED25519,
            Self::Es256(_) => ALGORITHM_ES256,
        }
    }

    /// Raw signature bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Self::Ed25519(sig) => sig.to_bytes(),
            Self::Es256(sig) => sig.to_bytes(),
        }
    }

    fn decode_for(algorithm: u8, reader: &mut &[u8]) -> Result<Self, CodecError> {
        match algorithm {
            ALGORITHM_ED25519 => Ed25519Signature::decode(reader).map(Self::Ed25519),
            _ => Es256Signature::decode(reader).map(Self::Es256),
        }
    }
}

impl From<Ed25519Signature> for ProofSignature {
    fn from(sig: Ed25519Signature) -> Self {
        Self::Ed25519(sig)
    }
}

impl From<Es256Signature> for ProofSignature {
    fn from(sig: Es256Signature) -> Self {
        Self::Es256(sig)
    }
}

impl Encode for ProofSignature {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        match self {
            Self::Ed25519(sig) => sig.encode(buf),
            Self::Es256(sig) => sig.encode(buf),
        }
    }

    fn encoded_len(&self) -> usize {
        match self {
            Self::Ed25519(sig) => sig.encoded_len(),
            Self::Es256(sig) => sig.encoded_len(),
        }
    }
}

#[derive(Deserialize)]
struct ClientData {
    #[serde(rename = "type")]
    kind: String,
    challenge: String,
}

/// The WebAuthn assertion data a signature was produced over.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WebauthnFields {
    authenticator_data: Vec<u8>,
    client_data_json: Vec<u8>,
}

impl WebauthnFields {
    /// Validates and wraps assertion data.
    ///
    /// The authenticator data must hold at least the RP id hash, flags and
    /// counter; the client data must be a JSON object with string `type` and
    /// `challenge` members. Both must fit a `u16` length prefix.
    pub fn new(authenticator_data: Vec<u8>, client_data_json: Vec<u8>) -> Result<Self, CryptoError> {
        if authenticator_data.len() < MIN_AUTHENTICATOR_DATA_SIZE {
            return Err(CryptoError::InvalidFormat(format!(
                "authenticator data is {} bytes, need at least {MIN_AUTHENTICATOR_DATA_SIZE}",
                authenticator_data.len()
            )));
        }
        check_var_len(authenticator_data.len())
            .and(check_var_len(client_data_json.len()))
            .map_err(|e| CryptoError::InvalidFormat(e.to_string()))?;
        serde_json::from_slice::<ClientData>(&client_data_json)
            .map_err(|e| CryptoError::InvalidFormat(format!("client data: {e}")))?;
        Ok(Self {
            authenticator_data,
            client_data_json,
        })
    }

    /// Raw authenticator data.
    pub fn authenticator_data(&self) -> &[u8] {
        &self.authenticator_data
    }

    /// Raw client data JSON.
    pub fn client_data_json(&self) -> &[u8] {
        &self.client_data_json
    }

    /// `authenticator_data ‖ SHA-256(client_data_json)`, the bytes the
    /// authenticator actually signs.
    pub fn signed_payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(self.authenticator_data.len() + 32);
        payload.extend_from_slice(&self.authenticator_data);
        payload.extend_from_slice(&sha256(&self.client_data_json));
        payload
    }

    /// Whether the client data asserts `data` as its challenge.
    pub fn challenge_matches(&self, data: &[u8]) -> bool {
        let client_data = match serde_json::from_slice::<ClientData>(&self.client_data_json) {
            Ok(client_data) => client_data,
            Err(e) => {
                log::warn!("Rejecting WebAuthn proof with unreadable client data: {e}");
                return false;
            }
        };
        if client_data.kind != WEBAUTHN_GET {
            log::warn!(
                "Rejecting WebAuthn proof with client data type {:?}",
                client_data.kind
            );
            return false;
        }
        if client_data.challenge != URL_SAFE_NO_PAD.encode(data) {
            log::warn!("Rejecting WebAuthn proof whose challenge does not match the signed data");
            return false;
        }
        true
    }
}

impl Encode for WebauthnFields {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        put_var_bytes(buf, &self.authenticator_data);
        put_var_bytes(buf, &self.client_data_json);
    }

    fn encoded_len(&self) -> usize {
        var_bytes_len(&self.authenticator_data) + var_bytes_len(&self.client_data_json)
    }
}

impl Decode for WebauthnFields {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let authenticator_data = read_var_bytes(reader)?;
        let client_data_json = read_var_bytes(reader)?;
        Self::new(authenticator_data, client_data_json)
            .map_err(|e| CodecError::Invalid(e.to_string()))
    }
}

/// Proof that a transaction (or any message) was signed on behalf of an address.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignatureProof {
    /// One key, one signature.
    SingleSig {
        /// The signing key.
        key: SignerKey,
        /// Signature over the data.
        signature: ProofSignature,
    },
    /// One key out of a set whose Merkle root defines the address.
    MultiSig {
        /// The signing key.
        key: SignerKey,
        /// Path of `key` within the sorted key set.
        merkle_path: MerklePath,
        /// Signature over the data.
        signature: ProofSignature,
    },
    /// A single key behind a WebAuthn authenticator.
    WebauthnSingleSig {
        /// The signing key.
        key: SignerKey,
        /// Signature over the WebAuthn payload.
        signature: ProofSignature,
        /// The assertion data.
        webauthn: WebauthnFields,
    },
    /// A WebAuthn key out of a multi-signature key set.
    WebauthnMultiSig {
        /// The signing key.
        key: SignerKey,
        /// Path of `key` within the sorted key set.
        merkle_path: MerklePath,
        /// Signature over the WebAuthn payload.
        signature: ProofSignature,
        /// The assertion data.
        webauthn: WebauthnFields,
    },
}

fn check_algorithms(key: &SignerKey, signature: &ProofSignature) -> Result<(), CryptoError> {
    if key.algorithm() != signature.algorithm() {
        return Err(CryptoError::InvalidSignature(
            "signature algorithm does not match the signer key".to_string(),
        ));
    }
    Ok(())
}

/// Sorts and de-duplicates a key set and returns its serialized members.
fn canonical_key_set(public_keys: &[SignerKey]) -> Result<Vec<Vec<u8>>, CryptoError> {
    if public_keys.is_empty() {
        return Err(CryptoError::EmptyKeySet);
    }
    let mut keys: Vec<Vec<u8>> = public_keys.iter().map(SignerKey::to_bytes).collect();
    keys.sort();
    keys.dedup();
    Ok(keys)
}

/// Builds the signer's path over the canonical key set.
///
/// Both failure modes of an unusable key set surface separately: an empty set
/// is [`CryptoError::EmptyKeySet`], a signer outside a non-empty set is
/// [`CryptoError::SignerNotInKeySet`].
fn merkle_path_for(signer_key: &SignerKey, public_keys: &[SignerKey]) -> Result<MerklePath, CryptoError> {
    let keys = canonical_key_set(public_keys)?;
    MerklePath::build(&keys, &signer_key.to_bytes()).ok_or(CryptoError::SignerNotInKeySet)
}

impl Default for SignatureProof {
    /// The all-zero Ed25519 single-signature placeholder.
    fn default() -> Self {
        Self::SingleSig {
            key: SignerKey::Ed25519(Ed25519PublicKey::default()),
            signature: ProofSignature::Ed25519(Ed25519Signature::default()),
        }
    }
}

impl SignatureProof {
    /// An Ed25519 single-signature proof.
    pub fn from_ed25519(key: Ed25519PublicKey, signature: Ed25519Signature) -> Self {
        Self::SingleSig {
            key: SignerKey::Ed25519(key),
            signature: ProofSignature::Ed25519(signature),
        }
    }

    /// A single-signature proof.
    pub fn single_sig(
        key: impl Into<SignerKey>,
        signature: impl Into<ProofSignature>,
    ) -> Result<Self, CryptoError> {
        let (key, signature) = (key.into(), signature.into());
        check_algorithms(&key, &signature)?;
        Ok(Self::SingleSig { key, signature })
    }

    /// A multi-signature proof for `signer_key` out of `public_keys`.
    pub fn multi_sig(
        signer_key: impl Into<SignerKey>,
        public_keys: &[SignerKey],
        signature: impl Into<ProofSignature>,
    ) -> Result<Self, CryptoError> {
        let (key, signature) = (signer_key.into(), signature.into());
        check_algorithms(&key, &signature)?;
        let merkle_path = merkle_path_for(&key, public_keys)?;
        Ok(Self::MultiSig {
            key,
            merkle_path,
            signature,
        })
    }

    /// A WebAuthn single-signature proof.
    pub fn webauthn_single_sig(
        key: impl Into<SignerKey>,
        signature: impl Into<ProofSignature>,
        authenticator_data: Vec<u8>,
        client_data_json: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        let (key, signature) = (key.into(), signature.into());
        check_algorithms(&key, &signature)?;
        Ok(Self::WebauthnSingleSig {
            key,
            signature,
            webauthn: WebauthnFields::new(authenticator_data, client_data_json)?,
        })
    }

    /// A WebAuthn multi-signature proof.
    pub fn webauthn_multi_sig(
        signer_key: impl Into<SignerKey>,
        public_keys: &[SignerKey],
        signature: impl Into<ProofSignature>,
        authenticator_data: Vec<u8>,
        client_data_json: Vec<u8>,
    ) -> Result<Self, CryptoError> {
        let (key, signature) = (signer_key.into(), signature.into());
        check_algorithms(&key, &signature)?;
        let merkle_path = merkle_path_for(&key, public_keys)?;
        Ok(Self::WebauthnMultiSig {
            key,
            merkle_path,
            signature,
            webauthn: WebauthnFields::new(authenticator_data, client_data_json)?,
        })
    }

    /// The address of the multi-signature account over `public_keys`.
    pub fn multisig_address(public_keys: &[SignerKey]) -> Result<Address, CryptoError> {
        let keys = canonical_key_set(public_keys)?;
        Ok(Address::from_digest(&MerkleTree::compute_root(&keys)))
    }

    /// The signer key.
    pub fn key(&self) -> &SignerKey {
        match self {
            Self::SingleSig { key, .. }
            | Self::MultiSig { key, .. }
            | Self::WebauthnSingleSig { key, .. }
            | Self::WebauthnMultiSig { key, .. } => key,
        }
    }

    /// The signature.
    pub fn signature(&self) -> &ProofSignature {
        match self {
            Self::SingleSig { signature, .. }
            | Self::MultiSig { signature, .. }
            | Self::WebauthnSingleSig { signature, .. }
            | Self::WebauthnMultiSig { signature, .. } => signature,
        }
    }

    /// The Merkle path, for multi-signature proofs.
    pub fn merkle_path(&self) -> Option<&MerklePath> {
        match self {
            Self::MultiSig { merkle_path, .. } | Self::WebauthnMultiSig { merkle_path, .. } => {
                Some(merkle_path)
            }
            _ => None,
        }
    }

    /// The assertion data, for WebAuthn proofs.
    pub fn webauthn(&self) -> Option<&WebauthnFields> {
        match self {
            Self::WebauthnSingleSig { webauthn, .. } | Self::WebauthnMultiSig { webauthn, .. } => {
                Some(webauthn)
            }
            _ => None,
        }
    }

    /// Whether this is a multi-signature proof.
    pub fn is_multisig(&self) -> bool {
        self.merkle_path().is_some()
    }

    /// Whether the signature was produced by a WebAuthn authenticator.
    pub fn is_webauthn(&self) -> bool {
        self.webauthn().is_some()
    }

    /// Whether this is an Ed25519 single-signature proof, the only kind a
    /// basic-format transaction can carry.
    pub fn is_ed25519_single_sig(&self) -> bool {
        matches!(
            self,
            Self::SingleSig {
                key: SignerKey::Ed25519(_),
                ..
            }
        )
    }

    fn discriminant(&self) -> u8 {
        let mut flags = 0;
        if self.is_webauthn() {
            flags |= FLAG_WEBAUTHN;
        }
        if self.is_multisig() {
            flags |= FLAG_MULTISIG;
        }
        self.key().algorithm() | (flags << 4)
    }

    /// Checks the signature over `data`. A mismatch is `false`.
    pub fn verify(&self, data: &[u8]) -> bool {
        match self.webauthn() {
            None => self.key().verify(data, self.signature()),
            Some(webauthn) => {
                webauthn.challenge_matches(data)
                    && self
                        .key()
                        .verify(&webauthn.signed_payload(), self.signature())
            }
        }
    }

    /// The address this proof signs for.
    pub fn compute_signer(&self) -> Address {
        match self.merkle_path() {
            None => self.key().to_address(),
            Some(path) => Address::from_digest(&path.compute_root(&self.key().to_bytes())),
        }
    }

    /// Whether this proof signs for `address`.
    pub fn is_signed_by(&self, address: &Address) -> bool {
        self.compute_signer() == *address
    }

    /// The serialized proof.
    pub fn to_bytes(&self) -> Vec<u8> {
        to_bytes_canonical(self)
    }

    /// Hex of [`SignatureProof::to_bytes`].
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    /// Plain, JSON-friendly view.
    pub fn to_plain(&self) -> PlainSignatureProof {
        let algorithm = match self.key() {
            SignerKey::Ed25519(_) => "ed25519",
            SignerKey::Es256(_) => "es256",
        };
        PlainSignatureProof {
            signature_type: algorithm.to_string(),
            public_key: hex::encode(self.key().to_bytes()),
            merkle_path: self
                .merkle_path()
                .map(|path| {
                    path.nodes()
                        .iter()
                        .map(|node| PlainMerklePathNode {
                            left: node.left,
                            hash: hex::encode(node.hash),
                        })
                        .collect()
                })
                .unwrap_or_default(),
            signature: hex::encode(self.signature().to_bytes()),
            authenticator_data: self.webauthn().map(|w| hex::encode(w.authenticator_data())),
            client_data_json: self
                .webauthn()
                .map(|w| String::from_utf8_lossy(w.client_data_json()).into_owned()),
            signer: self.compute_signer().to_user_friendly(true),
        }
    }
}

impl Encode for SignatureProof {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.discriminant());
        self.key().encode(buf);
        if let Some(path) = self.merkle_path() {
            path.encode(buf);
        }
        self.signature().encode(buf);
        if let Some(webauthn) = self.webauthn() {
            webauthn.encode(buf);
        }
    }

    fn encoded_len(&self) -> usize {
        1 + self.key().encoded_len()
            + self.merkle_path().map_or(0, Encode::encoded_len)
            + self.signature().encoded_len()
            + self.webauthn().map_or(0, Encode::encoded_len)
    }
}

impl Decode for SignatureProof {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let discriminant = read_u8(reader)?;
        let algorithm = discriminant & 0x0f;
        let flags = discriminant >> 4;
        if algorithm > ALGORITHM_ES256 || flags & !(FLAG_WEBAUTHN | FLAG_MULTISIG) != 0 {
            return Err(CodecError::UnknownDiscriminant {
                ty: "SignatureProof",
                value: u64::from(discriminant),
            });
        }
        let key = SignerKey::decode_for(algorithm, reader)?;
        let merkle_path = if flags & FLAG_MULTISIG != 0 {
            Some(MerklePath::decode(reader)?)
        } else {
            None
        };
        let signature = ProofSignature::decode_for(algorithm, reader)?;
        let webauthn = if flags & FLAG_WEBAUTHN != 0 {
            Some(WebauthnFields::decode(reader)?)
        } else {
            None
        };
        Ok(match (merkle_path, webauthn) {
            (None, None) => Self::SingleSig { key, signature },
            (Some(merkle_path), None) => Self::MultiSig {
                key,
                merkle_path,
                signature,
            },
            (None, Some(webauthn)) => Self::WebauthnSingleSig {
                key,
                signature,
                webauthn,
            },
            (Some(merkle_path), Some(webauthn)) => Self::WebauthnMultiSig {
                key,
                merkle_path,
                signature,
                webauthn,
            },
        })
    }
}

/// A Merkle path node in plain form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlainMerklePathNode {
    /// Whether the sibling is on the left.
    pub left: bool,
    /// Hex sibling hash.
    pub hash: String,
}

/// A [`SignatureProof`] in plain form.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PlainSignatureProof {
    /// `ed25519` or `es256`.
    #[serde(rename = "type")]
    pub signature_type: String,
    /// Hex signer key.
    pub public_key: String,
    /// Path within the key set; empty for single-signature proofs.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merkle_path: Vec<PlainMerklePathNode>,
    /// Hex signature.
    pub signature: String,
    /// Hex authenticator data, for WebAuthn proofs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authenticator_data: Option<String>,
    /// Client data JSON, for WebAuthn proofs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_data_json: Option<String>,
    /// User-friendly address the proof signs for.
    pub signer: String,
}

#[cfg(test)]
mod tests;
