// Path: crates/types/src/app/account.rs

//! Account kinds and transaction flag bits.

use crate::codec::{read_u8, Decode, Encode};
use crate::error::{CodecError, CoreError};
use bitflags::bitflags;
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of account on either side of a transaction.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum AccountType {
    /// A plain account controlled by a single key or multi-sig key set.
    #[default]
    Basic = 0,
    /// A vesting contract releasing funds over time.
    Vesting = 1,
    /// A hashed time-locked contract.
    Htlc = 2,
    /// The staking contract.
    Staking = 3,
}

impl AccountType {
    /// The stable lowercase name used in plain objects.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Vesting => "vesting",
            Self::Htlc => "htlc",
            Self::Staking => "staking",
        }
    }
}

impl TryFrom<u8> for AccountType {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Basic),
            1 => Ok(Self::Vesting),
            2 => Ok(Self::Htlc),
            3 => Ok(Self::Staking),
            other => Err(CoreError::UnknownAccountType(other)),
        }
    }
}

impl From<AccountType> for u8 {
    fn from(t: AccountType) -> Self {
        t as u8
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Encode for AccountType {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for AccountType {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let value = read_u8(reader)?;
        Self::try_from(value).map_err(|_| CodecError::UnknownDiscriminant {
            ty: "AccountType",
            value: u64::from(value),
        })
    }
}

bitflags! {
    /// Flag bits carried by extended transactions.
    #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
    pub struct TransactionFlags: u8 {
        /// The transaction creates a new contract at the derived address.
        const CONTRACT_CREATION = 0b0000_0001;
        /// The transaction carries a zero-value signal to the staking contract.
        const SIGNALING = 0b0000_0010;
    }
}

impl Encode for TransactionFlags {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.bits());
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for TransactionFlags {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let bits = read_u8(reader)?;
        Self::from_bits(bits).ok_or(CodecError::UnknownDiscriminant {
            ty: "TransactionFlags",
            value: u64::from(bits),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{from_bytes_canonical, to_bytes_canonical};

    #[test]
    fn account_type_discriminants() {
        for (t, v) in [
            (AccountType::Basic, 0u8),
            (AccountType::Vesting, 1),
            (AccountType::Htlc, 2),
            (AccountType::Staking, 3),
        ] {
            assert_eq!(to_bytes_canonical(&t), vec![v]);
            assert_eq!(from_bytes_canonical::<AccountType>(&[v]).unwrap(), t);
        }
        assert!(matches!(
            AccountType::try_from(4),
            Err(CoreError::UnknownAccountType(4))
        ));
    }

    #[test]
    fn flags_reject_undefined_bits() {
        let both = TransactionFlags::CONTRACT_CREATION | TransactionFlags::SIGNALING;
        assert_eq!(to_bytes_canonical(&both), vec![0b11]);
        assert!(from_bytes_canonical::<TransactionFlags>(&[0b100]).is_err());
    }
}
