// Path: crates/types/src/app/address.rs

//! Defines the canonical 20-byte `Address` and its two text forms.
//!
//! The hex form is the 40-character lowercase encoding of the raw bytes. The
//! user-friendly form is `NQ`, two IBAN check digits and 32 Base32 symbols,
//! grouped in blocks of four when printed with spaces.

use crate::codec::{read_array, Decode, Encode};
use crate::error::{AddressError, CodecError};
use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use bytes::BufMut;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

const COUNTRY_CODE: &str = "NQ";
const USER_FRIENDLY_LEN: usize = 36;
const BASE32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKLMNPQRSTUVXY";

/// An account address: the first 20 bytes of a Blake2b-256 digest.
///
/// Ordering and equality are byte-lexicographic.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Address([u8; ADDRESS_LEN]);

impl Address {
    /// The address of the staking contract.
    pub const STAKING_CONTRACT: Address =
        Address([0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);

    /// The placeholder recipient used while deriving contract creation addresses.
    pub const CONTRACT_CREATION: Address = Address([0u8; ADDRESS_LEN]);

    /// Wraps 20 raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Derives the address of arbitrary key material (a serialized public key
    /// or a Merkle root of keys).
    pub fn from_key_material(material: &[u8]) -> Self {
        Self::from_digest(&Blake2b::<U32>::digest(material))
    }

    /// Truncates a 32-byte digest (for example a Merkle root) to an address.
    pub fn from_digest(digest: &[u8]) -> Self {
        let mut out = [0u8; ADDRESS_LEN];
        out.iter_mut().zip(digest.iter()).for_each(|(o, d)| *o = *d);
        Self(out)
    }

    /// Parses exactly 20 raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, AddressError> {
        <[u8; ADDRESS_LEN]>::try_from(bytes)
            .map(Self)
            .map_err(|_| AddressError::InvalidLength {
                expected: ADDRESS_LEN,
                got: bytes.len(),
            })
    }

    /// Parses the 40-character hex form, case-insensitively.
    pub fn from_hex(s: &str) -> Result<Self, AddressError> {
        if s.len() != ADDRESS_LEN * 2 {
            return Err(AddressError::InvalidFormat(format!(
                "expected {} hex characters, got {}",
                ADDRESS_LEN * 2,
                s.len()
            )));
        }
        let bytes = hex::decode(s).map_err(|e| AddressError::InvalidFormat(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Parses the `NQ..` user-friendly form. Whitespace is ignored and the
    /// input is upper-cased before the check digits are verified.
    pub fn from_user_friendly(s: &str) -> Result<Self, AddressError> {
        let normalized: String = s
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_uppercase();

        if !normalized.starts_with(COUNTRY_CODE) {
            return Err(AddressError::InvalidFormat(
                "missing NQ country code".to_string(),
            ));
        }
        if normalized.len() != USER_FRIENDLY_LEN {
            return Err(AddressError::InvalidLength {
                expected: USER_FRIENDLY_LEN,
                got: normalized.len(),
            });
        }

        let check = normalized.get(2..4).unwrap_or_default();
        let payload = normalized.get(4..).unwrap_or_default();
        if !check.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddressError::InvalidFormat(
                "check digits must be numeric".to_string(),
            ));
        }
        if let Some(bad) = payload.chars().find(|c| !is_base32_symbol(*c)) {
            return Err(AddressError::InvalidFormat(format!(
                "invalid base32 symbol '{bad}'"
            )));
        }

        let expected = check_digits(payload);
        if expected != check {
            return Err(AddressError::ChecksumMismatch {
                expected,
                got: check.to_string(),
            });
        }

        Self::from_bytes(&base32_decode(payload))
    }

    /// The raw address bytes.
    pub fn as_bytes(&self) -> &[u8; ADDRESS_LEN] {
        &self.0
    }

    /// The 40-character lowercase hex form.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// The user-friendly form, optionally grouped in blocks of four.
    pub fn to_user_friendly(&self, with_spaces: bool) -> String {
        let payload = base32_encode(&self.0);
        let compact = format!("{COUNTRY_CODE}{}{payload}", check_digits(&payload));
        if !with_spaces {
            return compact;
        }
        compact
            .as_bytes()
            .chunks(4)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

fn is_base32_symbol(c: char) -> bool {
    c.is_ascii() && BASE32_ALPHABET.contains(&(c as u8))
}

fn base32_symbol(index: u32) -> char {
    BASE32_ALPHABET
        .get((index & 0x1f) as usize)
        .map_or('0', |b| char::from(*b))
}

fn base32_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 8 / 5 + 1);
    let mut shift: u32 = 3;
    let mut carry: u32 = 0;
    for &byte in bytes {
        let byte = u32::from(byte);
        out.push(base32_symbol(carry | (byte >> shift)));
        if shift > 5 {
            shift -= 5;
            out.push(base32_symbol(byte >> shift));
        }
        shift = 5 - shift;
        carry = byte << shift;
        shift = 8 - shift;
    }
    if shift != 3 {
        out.push(base32_symbol(carry));
    }
    out
}

fn base32_decode(symbols: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(symbols.len() * 5 / 8);
    let mut shift: i32 = 8;
    let mut carry: u32 = 0;
    for c in symbols.bytes() {
        let symbol = BASE32_ALPHABET
            .iter()
            .position(|s| *s == c)
            .map_or(0, |p| p as u32);
        shift -= 5;
        if shift > 0 {
            carry |= symbol << shift;
        } else if shift < 0 {
            out.push(((carry | (symbol >> -shift)) & 0xff) as u8);
            shift += 8;
            carry = (symbol << shift) & 0xff;
        } else {
            out.push(((carry | symbol) & 0xff) as u8);
            shift = 8;
            carry = 0;
        }
    }
    if shift != 8 && carry != 0 {
        out.push((carry & 0xff) as u8);
    }
    out
}

/// The two IBAN check digits for a Base32 payload.
fn check_digits(payload: &str) -> String {
    let remainder = iban_check(&format!("{payload}{COUNTRY_CODE}00"));
    format!("{:02}", 98 - remainder)
}

/// Maps letters to `code - 55`, then reduces the digit string mod 97 in
/// chunks of six digits.
fn iban_check(s: &str) -> u64 {
    let digits: String = s
        .chars()
        .map(|c| {
            if c.is_ascii_digit() {
                c.to_string()
            } else {
                u32::from(c.to_ascii_uppercase()).saturating_sub(55).to_string()
            }
        })
        .collect();

    let mut remainder: u64 = 0;
    for chunk in digits.as_bytes().chunks(6) {
        let chunk = std::str::from_utf8(chunk).unwrap_or_default();
        let width = chunk.len() as u32;
        let value = chunk.parse::<u64>().unwrap_or_default();
        remainder = (remainder * 10u64.pow(width) + value) % 97;
    }
    remainder
}

impl FromStr for Address {
    type Err = AddressError;

    /// Accepts either the hex or the user-friendly form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.len() == ADDRESS_LEN * 2 && trimmed.bytes().all(|b| b.is_ascii_hexdigit()) {
            Self::from_hex(trimmed)
        } else {
            Self::from_user_friendly(trimmed)
        }
    }
}

impl TryFrom<&[u8]> for Address {
    type Error = AddressError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl From<[u8; ADDRESS_LEN]> for Address {
    fn from(bytes: [u8; ADDRESS_LEN]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_user_friendly(true))
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_user_friendly(false))
    }
}

impl Encode for Address {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_slice(&self.0);
    }

    fn encoded_len(&self) -> usize {
        ADDRESS_LEN
    }
}

impl Decode for Address {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        read_array(reader).map(Self)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_user_friendly(true))
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZERO_SEED_ADDRESS_HEX: &str = "689dae2f77b048dcc08e14d73104ea14222b5be1";
    const ZERO_SEED_ADDRESS_UF: &str = "NQ17 D2ES UBTP N14D RG4E 2KBK 217A 2GH2 NNY1";

    #[test]
    fn well_known_addresses() {
        assert_eq!(
            Address::CONTRACT_CREATION.to_user_friendly(true),
            "NQ07 0000 0000 0000 0000 0000 0000 0000 0000"
        );
        assert_eq!(
            Address::STAKING_CONTRACT.to_user_friendly(true),
            "NQ77 0000 0000 0000 0000 0000 0000 0000 0001"
        );
        assert_eq!(
            Address::new([0xff; 20]).to_user_friendly(false),
            "NQ18YYYYYYYYYYYYYYYYYYYYYYYYYYYYYYYY"
        );
    }

    #[test]
    fn hex_and_user_friendly_agree() {
        let from_hex = Address::from_hex(ZERO_SEED_ADDRESS_HEX).unwrap();
        let from_uf = Address::from_user_friendly(ZERO_SEED_ADDRESS_UF).unwrap();
        assert_eq!(from_hex, from_uf);
        assert_eq!(from_hex.to_user_friendly(true), ZERO_SEED_ADDRESS_UF);
        assert_eq!(from_uf.to_hex(), ZERO_SEED_ADDRESS_HEX);
    }

    #[test]
    fn user_friendly_parsing_is_lenient_about_case_and_spaces() {
        let compact = ZERO_SEED_ADDRESS_UF.replace(' ', "").to_lowercase();
        let parsed = Address::from_user_friendly(&compact).unwrap();
        assert_eq!(parsed.to_hex(), ZERO_SEED_ADDRESS_HEX);
        assert_eq!(Address::from_str(&compact).unwrap(), parsed);
        assert_eq!(
            Address::from_str(&ZERO_SEED_ADDRESS_HEX.to_uppercase()).unwrap(),
            parsed
        );
    }

    #[test]
    fn roundtrip_over_patterned_bytes() {
        for seed in 0u8..=255 {
            let bytes: [u8; 20] = std::array::from_fn(|i| seed.wrapping_mul(31).wrapping_add(i as u8 * 7));
            let address = Address::new(bytes);
            let uf = address.to_user_friendly(true);
            assert_eq!(Address::from_user_friendly(&uf).unwrap(), address);
            assert_eq!(Address::from_hex(&address.to_hex()).unwrap(), address);
        }
    }

    #[test]
    fn single_character_corruption_is_rejected() {
        let compact = ZERO_SEED_ADDRESS_UF.replace(' ', "");
        for position in 2..compact.len() {
            for replacement in BASE32_ALPHABET.iter().map(|b| char::from(*b)) {
                let mut chars: Vec<char> = compact.chars().collect();
                // Swapping a digit for a letter changes the width of the IBAN
                // digit string, which mod 97 only catches with high probability.
                if chars[position] == replacement
                    || chars[position].is_ascii_digit() != replacement.is_ascii_digit()
                {
                    continue;
                }
                chars[position] = replacement;
                let corrupted: String = chars.into_iter().collect();
                let err = Address::from_user_friendly(&corrupted).unwrap_err();
                assert!(
                    matches!(err, AddressError::ChecksumMismatch { .. }),
                    "{corrupted} gave {err:?}"
                );
            }
        }
    }

    #[test]
    fn digit_letter_swaps_are_almost_always_rejected() {
        // A letter expands to two IBAN digits, so mod 97 lets a few through.
        let slipped_through = [
            "NQ17D2ESUBTP914DRG4E2KBK217A2GH2NNY1",
            "NQ17D2ESUBTPNA4DRG4E2KBK217A2GH2NNY1",
            "NQ17D2ESUBTPN14DRGRE2KBK217A2GH2NNY1",
            "NQ17D2ESUBTPN14DRG4E2KBK217AMGH2NNY1",
        ];
        let original = Address::from_hex(ZERO_SEED_ADDRESS_HEX).unwrap();
        let compact = ZERO_SEED_ADDRESS_UF.replace(' ', "");
        let mut swaps = 0;
        let mut accepted = Vec::new();
        for position in 2..compact.len() {
            for replacement in BASE32_ALPHABET.iter().map(|b| char::from(*b)) {
                let mut chars: Vec<char> = compact.chars().collect();
                if chars[position].is_ascii_digit() == replacement.is_ascii_digit() {
                    continue;
                }
                chars[position] = replacement;
                let corrupted: String = chars.into_iter().collect();
                swaps += 1;
                if let Ok(address) = Address::from_user_friendly(&corrupted) {
                    assert_ne!(address, original);
                    accepted.push(corrupted);
                }
            }
        }
        assert_eq!(swaps, 496);
        assert_eq!(accepted, slipped_through);
    }

    #[test]
    fn distinguishes_error_categories() {
        assert!(matches!(
            Address::from_bytes(&[0u8; 19]).unwrap_err(),
            AddressError::InvalidLength { expected: 20, got: 19 }
        ));
        assert!(matches!(
            Address::from_hex("zz9dae2f77b048dcc08e14d73104ea14222b5be1").unwrap_err(),
            AddressError::InvalidFormat(_)
        ));
        assert!(matches!(
            Address::from_user_friendly("NQ17 D2ES UBTP N14D RG4E 2KBK 217A 2GH2 NNYI").unwrap_err(),
            AddressError::InvalidFormat(_)
        ));
        assert!(matches!(
            Address::from_user_friendly("DE17 D2ES UBTP N14D RG4E 2KBK 217A 2GH2 NNY1").unwrap_err(),
            AddressError::InvalidFormat(_)
        ));
        assert!(matches!(
            Address::from_user_friendly("NQ17 D2ES UBTP").unwrap_err(),
            AddressError::InvalidLength { .. }
        ));
    }

    #[test]
    fn ordering_is_bytewise() {
        let a = Address::new([0u8; 20]);
        let mut raw = [0u8; 20];
        raw[19] = 1;
        let b = Address::new(raw);
        assert!(a < b);
        assert_eq!(b, Address::STAKING_CONTRACT);
    }

    #[test]
    fn key_material_derivation() {
        let pk = hex::decode("3b6a27bcceb6a42d62a3a8d02a6f0d73653215771de243a63ac048a18b59da29")
            .unwrap();
        assert_eq!(
            Address::from_key_material(&pk).to_hex(),
            ZERO_SEED_ADDRESS_HEX
        );
    }

    #[test]
    fn serde_uses_user_friendly_form() {
        let address = Address::from_hex(ZERO_SEED_ADDRESS_HEX).unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, format!("\"{ZERO_SEED_ADDRESS_UF}\""));
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, address);
    }
}
