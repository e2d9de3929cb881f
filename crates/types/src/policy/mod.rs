// Path: crates/types/src/policy/mod.rs

//! Protocol constants and the block / batch / epoch arithmetic built on them.
//!
//! A batch is `BLOCKS_PER_BATCH` blocks ending in a macro block. An epoch is
//! `BATCHES_PER_EPOCH` batches ending in an election block, which is always
//! the last macro block of the epoch. Heights below the genesis block are
//! treated as the genesis block.

/// Namespace for protocol constants and pure height arithmetic.
#[derive(Debug, Clone, Copy)]
pub struct Policy;

impl Policy {
    /// Protocol version.
    pub const VERSION: u16 = 1;
    /// Number of validator slots.
    pub const SLOTS: u16 = 512;
    /// Slots needed for a quorum: `ceil(2 * SLOTS / 3)`.
    pub const TWO_F_PLUS_ONE: u16 = (2 * Self::SLOTS).div_ceil(3);
    /// Slots needed to guarantee one honest participant: `ceil(SLOTS / 3)`.
    pub const F_PLUS_ONE: u16 = Self::SLOTS.div_ceil(3);
    /// Blocks per batch, including the closing macro block.
    pub const BLOCKS_PER_BATCH: u32 = 60;
    /// Batches per epoch, including the closing election batch.
    pub const BATCHES_PER_EPOCH: u16 = 720;
    /// Blocks per epoch.
    pub const BLOCKS_PER_EPOCH: u32 = Self::BLOCKS_PER_BATCH * Self::BATCHES_PER_EPOCH as u32;
    /// Height of the genesis block.
    pub const GENESIS_BLOCK_NUMBER: u32 = 0;
    /// Target time between two blocks, in milliseconds.
    pub const BLOCK_SEPARATION_TIME: u64 = 1000;
    /// Number of blocks a transaction stays valid after its validity start height.
    pub const TRANSACTION_VALIDITY_WINDOW_BLOCKS: u32 = 7200;
    /// Maximum serialized size of a transaction in bytes.
    pub const MAX_TRANSACTION_SIZE: usize = 100_000;
    /// Number of epochs a deactivated validator stays jailed.
    pub const JAIL_EPOCHS: u32 = 8;
    /// Number of blocks after an offense during which it can be reported.
    pub const REPORTING_WINDOW_BLOCKS: u32 = Self::BLOCKS_PER_EPOCH;
    /// Minimum number of epochs a history node keeps.
    pub const MIN_EPOCHS_STORED: u32 = 1;
    /// Deposit locked by a validator, in luna.
    pub const VALIDATOR_DEPOSIT: u64 = 1_000_000_000;
    /// Total supply cap, in luna.
    pub const TOTAL_SUPPLY: u64 = 2_100_000_000_000_000;
    /// Per-millisecond decay of the outstanding emission.
    pub const SUPPLY_DECAY: f64 = 0.999_999_999_996_026_4;
    /// Decay base applied to the squared batch delay in milliseconds.
    pub const BLOCKS_DELAY_DECAY: f64 = 0.999_999_999_99;
    /// Reward fraction paid out regardless of batch delay.
    pub const MINIMUM_REWARDS_PERCENTAGE: f64 = 0.5;

    fn offset(block_number: u32) -> u32 {
        block_number.max(Self::GENESIS_BLOCK_NUMBER) - Self::GENESIS_BLOCK_NUMBER
    }

    /// The epoch containing `block_number`.
    pub fn epoch_at(block_number: u32) -> u32 {
        Self::offset(block_number) / Self::BLOCKS_PER_EPOCH
    }

    /// The position of `block_number` inside its epoch.
    pub fn epoch_index_at(block_number: u32) -> u32 {
        Self::offset(block_number) % Self::BLOCKS_PER_EPOCH
    }

    /// The batch containing `block_number`.
    pub fn batch_at(block_number: u32) -> u32 {
        Self::offset(block_number) / Self::BLOCKS_PER_BATCH
    }

    /// The position of `block_number` inside its batch.
    pub fn batch_index_at(block_number: u32) -> u32 {
        Self::offset(block_number) % Self::BLOCKS_PER_BATCH
    }

    /// Whether `block_number` closes an epoch.
    pub fn is_election_block_at(block_number: u32) -> bool {
        Self::epoch_index_at(block_number) == Self::BLOCKS_PER_EPOCH - 1
    }

    /// Whether `block_number` closes a batch.
    pub fn is_macro_block_at(block_number: u32) -> bool {
        Self::batch_index_at(block_number) == Self::BLOCKS_PER_BATCH - 1
    }

    /// Whether `block_number` is a micro block.
    pub fn is_micro_block_at(block_number: u32) -> bool {
        !Self::is_macro_block_at(block_number)
    }

    /// Whether `block_number` opens an epoch.
    pub fn is_first_block_of_epoch(block_number: u32) -> bool {
        Self::epoch_index_at(block_number) == 0
    }

    /// Whether `block_number` lies in the first batch of its epoch.
    pub fn first_batch_of_epoch(block_number: u32) -> bool {
        Self::epoch_index_at(block_number) < Self::BLOCKS_PER_BATCH
    }

    /// The first block of `epoch`, if representable.
    pub fn first_block_of(epoch: u32) -> Option<u32> {
        epoch
            .checked_mul(Self::BLOCKS_PER_EPOCH)?
            .checked_add(Self::GENESIS_BLOCK_NUMBER)
    }

    /// The first block of `batch`, if representable.
    pub fn first_block_of_batch(batch: u32) -> Option<u32> {
        batch
            .checked_mul(Self::BLOCKS_PER_BATCH)?
            .checked_add(Self::GENESIS_BLOCK_NUMBER)
    }

    /// The election block closing `epoch`, if representable.
    pub fn election_block_of(epoch: u32) -> Option<u32> {
        Self::first_block_of(epoch.checked_add(1)?)?.checked_sub(1)
    }

    /// The macro block closing `batch`, if representable.
    pub fn macro_block_of(batch: u32) -> Option<u32> {
        Self::first_block_of_batch(batch.checked_add(1)?)?.checked_sub(1)
    }

    /// The first election block strictly after `block_number`.
    pub fn election_block_after(block_number: u32) -> Option<u32> {
        let epoch = Self::epoch_at(block_number);
        if Self::is_election_block_at(block_number) {
            Self::election_block_of(epoch.checked_add(1)?)
        } else {
            Self::election_block_of(epoch)
        }
    }

    /// The last election block strictly before `block_number`.
    pub fn election_block_before(block_number: u32) -> Option<u32> {
        let epoch = Self::epoch_at(block_number).checked_sub(1)?;
        Self::election_block_of(epoch)
    }

    /// The last election block at or before `block_number`.
    pub fn last_election_block(block_number: u32) -> Option<u32> {
        if Self::is_election_block_at(block_number) {
            Some(block_number)
        } else {
            Self::election_block_before(block_number)
        }
    }

    /// The first macro block strictly after `block_number`.
    pub fn macro_block_after(block_number: u32) -> Option<u32> {
        let batch = Self::batch_at(block_number);
        if Self::is_macro_block_at(block_number) {
            Self::macro_block_of(batch.checked_add(1)?)
        } else {
            Self::macro_block_of(batch)
        }
    }

    /// The last macro block strictly before `block_number`.
    pub fn macro_block_before(block_number: u32) -> Option<u32> {
        let batch = Self::batch_at(block_number).checked_sub(1)?;
        Self::macro_block_of(batch)
    }

    /// The last macro block at or before `block_number`.
    pub fn last_macro_block(block_number: u32) -> Option<u32> {
        if Self::is_macro_block_at(block_number) {
            Some(block_number)
        } else {
            Self::macro_block_before(block_number)
        }
    }

    /// The last block in which an offense at `block_number` can be reported.
    pub fn last_block_of_reporting_window(block_number: u32) -> u32 {
        block_number.saturating_add(Self::REPORTING_WINDOW_BLOCKS)
    }

    /// The first block after the reporting window of an offense at `block_number`.
    pub fn block_after_reporting_window(block_number: u32) -> u32 {
        Self::last_block_of_reporting_window(block_number).saturating_add(1)
    }

    /// The first block after a jail period starting at `block_number`.
    pub fn block_after_jail(block_number: u32) -> u32 {
        block_number
            .saturating_add(Self::JAIL_EPOCHS.saturating_mul(Self::BLOCKS_PER_EPOCH))
            .saturating_add(1)
    }

    /// The circulating supply at `current_time`, given the supply and
    /// timestamp (ms) of the genesis block.
    pub fn supply_at(genesis_supply: u64, genesis_time: u64, current_time: u64) -> u64 {
        if current_time <= genesis_time || genesis_supply >= Self::TOTAL_SUPPLY {
            return genesis_supply.min(Self::TOTAL_SUPPLY);
        }
        let elapsed = (current_time - genesis_time) as f64;
        let outstanding = (Self::TOTAL_SUPPLY - genesis_supply) as f64;
        let remaining = (outstanding * Self::SUPPLY_DECAY.powf(elapsed)) as u64;
        Self::TOTAL_SUPPLY.saturating_sub(remaining)
    }

    /// The fraction of batch rewards paid out after a delay of `delay_ms`.
    pub fn batch_delay_penalty(delay_ms: u64) -> f64 {
        let delay = delay_ms as f64;
        let penalty = (1.0 - Self::MINIMUM_REWARDS_PERCENTAGE)
            * Self::BLOCKS_DELAY_DECAY.powf(delay * delay)
            + Self::MINIMUM_REWARDS_PERCENTAGE;
        penalty.clamp(Self::MINIMUM_REWARDS_PERCENTAGE, 1.0)
    }
}

#[cfg(test)]
mod tests;
