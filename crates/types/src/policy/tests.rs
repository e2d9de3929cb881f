//! Tests for the policy arithmetic.

use super::Policy;

const G: u32 = Policy::GENESIS_BLOCK_NUMBER;
const B: u32 = Policy::BLOCKS_PER_BATCH;
const E: u32 = Policy::BATCHES_PER_EPOCH as u32;

#[test]
fn derived_constants() {
    assert_eq!(Policy::BLOCKS_PER_EPOCH, 43_200);
    assert_eq!(Policy::TWO_F_PLUS_ONE, 342);
    assert_eq!(Policy::F_PLUS_ONE, 171);
    assert_eq!(Policy::REPORTING_WINDOW_BLOCKS, Policy::BLOCKS_PER_EPOCH);
    assert_eq!(Policy::TOTAL_SUPPLY, 21 * 10u64.pow(14));
}

#[test]
fn boundary_arithmetic() {
    assert!(Policy::is_macro_block_at(G + B - 1));
    assert!(!Policy::is_macro_block_at(G + B));
    assert!(Policy::is_micro_block_at(G + B));
    assert!(Policy::is_election_block_at(G + B * E - 1));
    assert!(!Policy::is_election_block_at(G + B - 1));
    assert_eq!(Policy::epoch_at(G), 0);
    assert_eq!(Policy::batch_index_at(G + B - 1), B - 1);
    assert_eq!(Policy::epoch_at(G + B * E), 1);
    assert_eq!(Policy::epoch_index_at(G + B * E + 5), 5);
    assert_eq!(Policy::batch_at(G + 2 * B), 2);
}

#[test]
fn election_blocks_are_macro_blocks() {
    for epoch in 0..4 {
        let election = Policy::election_block_of(epoch).unwrap();
        assert!(Policy::is_election_block_at(election));
        assert!(Policy::is_macro_block_at(election));
    }
}

#[test]
fn epoch_edges() {
    assert!(Policy::is_first_block_of_epoch(G));
    assert!(Policy::is_first_block_of_epoch(G + B * E));
    assert!(!Policy::is_first_block_of_epoch(G + 1));
    assert!(Policy::first_batch_of_epoch(G + B - 1));
    assert!(!Policy::first_batch_of_epoch(G + B));
}

#[test]
fn inverse_lookups() {
    assert_eq!(Policy::first_block_of(0), Some(G));
    assert_eq!(Policy::first_block_of(2), Some(G + 2 * B * E));
    assert_eq!(Policy::first_block_of_batch(3), Some(G + 3 * B));
    assert_eq!(Policy::election_block_of(0), Some(G + B * E - 1));
    assert_eq!(Policy::macro_block_of(0), Some(G + B - 1));
    assert_eq!(Policy::first_block_of(u32::MAX), None);
    assert_eq!(Policy::macro_block_of(u32::MAX), None);
    assert_eq!(Policy::election_block_of(u32::MAX / 2), None);
}

#[test]
fn seeking_functions() {
    let first_macro = G + B - 1;
    assert_eq!(Policy::macro_block_after(G), Some(first_macro));
    assert_eq!(Policy::macro_block_after(first_macro), Some(first_macro + B));
    assert_eq!(Policy::macro_block_before(first_macro), None);
    assert_eq!(Policy::macro_block_before(first_macro + 1), Some(first_macro));
    assert_eq!(Policy::last_macro_block(first_macro), Some(first_macro));
    assert_eq!(Policy::last_macro_block(first_macro + 7), Some(first_macro));
    assert_eq!(Policy::last_macro_block(G), None);

    let first_election = G + B * E - 1;
    assert_eq!(Policy::election_block_after(G), Some(first_election));
    assert_eq!(
        Policy::election_block_after(first_election),
        Some(first_election + B * E)
    );
    assert_eq!(Policy::election_block_before(first_election), None);
    assert_eq!(
        Policy::election_block_before(first_election + 1),
        Some(first_election)
    );
    assert_eq!(
        Policy::last_election_block(first_election + B * E),
        Some(first_election + B * E)
    );
    assert_eq!(
        Policy::last_election_block(first_election + 10),
        Some(first_election)
    );
}

#[test]
fn reporting_window_and_jail() {
    let h = G + 1234;
    assert_eq!(
        Policy::last_block_of_reporting_window(h),
        h + Policy::BLOCKS_PER_EPOCH
    );
    assert_eq!(
        Policy::block_after_reporting_window(h),
        h + Policy::BLOCKS_PER_EPOCH + 1
    );
    assert_eq!(
        Policy::block_after_jail(h),
        h + Policy::JAIL_EPOCHS * Policy::BLOCKS_PER_EPOCH + 1
    );
    assert_eq!(Policy::block_after_jail(u32::MAX), u32::MAX);
}

#[test]
fn supply_curve() {
    let genesis_supply = 1_000_000_000_000_000;
    assert_eq!(Policy::supply_at(genesis_supply, 1_000, 1_000), genesis_supply);
    assert_eq!(Policy::supply_at(genesis_supply, 1_000, 500), genesis_supply);

    let one_year = 365 * 24 * 3600 * 1000u64;
    let after_year = Policy::supply_at(genesis_supply, 0, one_year);
    let after_two = Policy::supply_at(genesis_supply, 0, 2 * one_year);
    assert!(after_year > genesis_supply);
    assert!(after_two > after_year);
    assert!(after_two < Policy::TOTAL_SUPPLY);

    // Roughly 11.8% of the outstanding emission is released per year.
    let released = (after_year - genesis_supply) as f64;
    let outstanding = (Policy::TOTAL_SUPPLY - genesis_supply) as f64;
    let fraction = released / outstanding;
    assert!((0.11..0.13).contains(&fraction), "fraction {fraction}");
}

#[test]
fn batch_delay_penalty_curve() {
    assert_eq!(Policy::batch_delay_penalty(0), 1.0);
    let mut previous = 1.0;
    for delay in [1_000u64, 10_000, 100_000, 300_000, 1_000_000] {
        let penalty = Policy::batch_delay_penalty(delay);
        assert!(penalty <= previous);
        assert!(penalty >= Policy::MINIMUM_REWARDS_PERCENTAGE);
        previous = penalty;
    }
    assert!(
        (Policy::batch_delay_penalty(u64::MAX) - Policy::MINIMUM_REWARDS_PERCENTAGE).abs() < 1e-9
    );
}
