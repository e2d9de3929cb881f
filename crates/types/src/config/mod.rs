// Path: crates/types/src/config/mod.rs

//! Network configuration shared by wallets and nodes.

use crate::app::NetworkId;
use crate::error::CoreError;
use crate::policy::Policy;
use serde::{Deserialize, Serialize};

/// Genesis parameters used to turn block heights into wall-clock estimates.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GenesisInfo {
    /// Height of the genesis block.
    pub block_number: u32,
    /// Timestamp of the genesis block in milliseconds since the Unix epoch.
    pub timestamp: u64,
}

impl GenesisInfo {
    /// Estimates the timestamp of `block_number`, assuming one block every
    /// `Policy::BLOCK_SEPARATION_TIME` milliseconds. Heights before genesis
    /// are estimated backwards.
    pub fn estimate_timestamp(&self, block_number: u32) -> u64 {
        let separation = Policy::BLOCK_SEPARATION_TIME;
        if block_number >= self.block_number {
            let blocks = u64::from(block_number - self.block_number);
            self.timestamp.saturating_add(blocks.saturating_mul(separation))
        } else {
            let blocks = u64::from(self.block_number - block_number);
            self.timestamp.saturating_sub(blocks.saturating_mul(separation))
        }
    }
}

/// Configuration of the network a client talks to.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct NetworkConfig {
    /// The network transactions are built for and verified against.
    #[serde(default = "default_network_id")]
    pub network_id: NetworkId,
    /// Height of the genesis block.
    #[serde(default = "default_genesis_block_number")]
    pub genesis_block_number: u32,
    /// Timestamp of the genesis block in milliseconds.
    #[serde(default)]
    pub genesis_timestamp: u64,
}

fn default_network_id() -> NetworkId {
    NetworkId::MainAlbatross
}
fn default_genesis_block_number() -> u32 {
    Policy::GENESIS_BLOCK_NUMBER
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            network_id: default_network_id(),
            genesis_block_number: default_genesis_block_number(),
            genesis_timestamp: 0,
        }
    }
}

impl NetworkConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        Ok(toml::from_str(s)?)
    }

    /// The genesis parameters of this network.
    pub fn genesis_info(&self) -> GenesisInfo {
        GenesisInfo {
            block_number: self.genesis_block_number,
            timestamp: self.genesis_timestamp,
        }
    }
}
