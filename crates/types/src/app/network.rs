// Path: crates/types/src/app/network.rs

//! Network identifiers used for replay protection.

use crate::codec::{read_u8, Decode, Encode};
use crate::error::{CodecError, CoreError};
use bytes::BufMut;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A known network. Transactions commit to the network they are valid on.
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
#[serde(rename_all = "kebab-case")]
#[repr(u8)]
pub enum NetworkId {
    /// Legacy proof-of-work test network.
    Test = 1,
    /// Legacy proof-of-work development network.
    Dev = 2,
    /// Legacy bounty network.
    Bounty = 3,
    /// Network used by unit tests of the legacy chain.
    Dummy = 4,
    /// Albatross test network.
    TestAlbatross = 5,
    /// Albatross development network.
    DevAlbatross = 6,
    /// Albatross unit-test network.
    UnitAlbatross = 7,
    /// Albatross main network.
    MainAlbatross = 24,
    /// Legacy proof-of-work main network.
    Main = 42,
}

impl NetworkId {
    /// All known networks.
    pub const ALL: [NetworkId; 9] = [
        Self::Test,
        Self::Dev,
        Self::Bounty,
        Self::Dummy,
        Self::TestAlbatross,
        Self::DevAlbatross,
        Self::UnitAlbatross,
        Self::MainAlbatross,
        Self::Main,
    ];

    /// The kebab-case network name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Test => "test",
            Self::Dev => "dev",
            Self::Bounty => "bounty",
            Self::Dummy => "dummy",
            Self::TestAlbatross => "test-albatross",
            Self::DevAlbatross => "dev-albatross",
            Self::UnitAlbatross => "unit-albatross",
            Self::MainAlbatross => "main-albatross",
            Self::Main => "main",
        }
    }
}

impl TryFrom<u8> for NetworkId {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|id| u8::from(*id) == value)
            .ok_or(CoreError::UnknownNetworkId(value))
    }
}

impl From<NetworkId> for u8 {
    fn from(id: NetworkId) -> Self {
        id as u8
    }
}

impl FromStr for NetworkId {
    type Err = CoreError;

    /// Accepts either the kebab-case name or the numeric id.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(n) = s.parse::<u8>() {
            return Self::try_from(n);
        }
        Self::ALL
            .into_iter()
            .find(|id| id.name() == s)
            .ok_or_else(|| CoreError::Config(format!("unknown network '{s}'")))
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Encode for NetworkId {
    fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(u8::from(*self));
    }

    fn encoded_len(&self) -> usize {
        1
    }
}

impl Decode for NetworkId {
    fn decode(reader: &mut &[u8]) -> Result<Self, CodecError> {
        let value = read_u8(reader)?;
        Self::try_from(value).map_err(|_| CodecError::UnknownDiscriminant {
            ty: "NetworkId",
            value: u64::from(value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_roundtrip_through_u8_and_name() {
        for id in NetworkId::ALL {
            assert_eq!(NetworkId::try_from(u8::from(id)).unwrap(), id);
            assert_eq!(id.name().parse::<NetworkId>().unwrap(), id);
        }
        assert_eq!(u8::from(NetworkId::TestAlbatross), 5);
        assert_eq!(u8::from(NetworkId::MainAlbatross), 24);
    }

    #[test]
    fn unknown_id_is_rejected() {
        assert!(matches!(
            NetworkId::try_from(9),
            Err(CoreError::UnknownNetworkId(9))
        ));
        assert!("nowhere".parse::<NetworkId>().is_err());
    }
}
