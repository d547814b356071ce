//! Determinism verification tests
//!
//! The engine has no randomness: identical configuration must reproduce
//! identical record streams, down to the bit.

use bargain_core::{
    build_driver, AgentConfig, AllocationPolicy, DriverError, History, Preset, SimConfig,
    UtilityPolicy,
};
use bargain_events::RoundRecord;

fn scenario(preset: Preset) -> SimConfig {
    let mut config = SimConfig {
        peasant: AgentConfig::new(0.6, 0.2, 0.1),
        elite: AgentConfig::new(0.3, 0.2, 0.2),
        policy: preset.config(),
        ..SimConfig::default()
    };
    config.simulation.rounds = 100;
    config.simulation.scale = 0.01;
    config
}

fn run(config: &SimConfig) -> Vec<RoundRecord> {
    let mut driver = build_driver(config).expect("valid scenario");
    let mut history = History::new();
    driver
        .run(config.simulation.rounds, &mut history)
        .expect("run completes");
    history.into_records()
}

fn bits(records: &[RoundRecord]) -> Vec<[u64; 8]> {
    records
        .iter()
        .map(|r| {
            [
                r.utilities.peasant.to_bits(),
                r.utilities.elite.to_bits(),
                r.peasant.p.to_bits(),
                r.peasant.rho.to_bits(),
                r.peasant.v.to_bits(),
                r.elite.p.to_bits(),
                r.elite.rho.to_bits(),
                r.elite.v.to_bits(),
            ]
        })
        .collect()
}

/// Two runs of the winner-take-all scenario produce bit-identical sequences
#[test]
fn test_winner_take_all_determinism() {
    let config = scenario(Preset::WinnerTakeAll);
    assert_eq!(config.policy.utility_policy, UtilityPolicy::MaxThreatNash);
    assert_eq!(config.policy.allocation_policy, AllocationPolicy::WinnerTakeAll);

    let first = run(&config);
    let second = run(&config);

    assert_eq!(first.len(), 100);
    assert_eq!(bits(&first), bits(&second), "Runs should be bit-identical");
    assert_eq!(first, second);
}

/// Runs to completion or to the first failing round
fn run_until_failure(config: &SimConfig) -> (Vec<RoundRecord>, Option<u64>) {
    let mut driver = build_driver(config).expect("valid scenario");
    let mut history = History::new();
    let failed_at = match driver.run(config.simulation.rounds, &mut history) {
        Ok(_) => None,
        Err(DriverError::Model { round, .. }) => Some(round),
        Err(other) => panic!("unexpected error: {}", other),
    };
    (history.into_records(), failed_at)
}

/// Every preset is deterministic, including where a run collapses
#[test]
fn test_all_presets_determinism() {
    for preset in Preset::ALL {
        let config = scenario(preset);
        let (first, first_failure) = run_until_failure(&config);
        let (second, second_failure) = run_until_failure(&config);
        assert_eq!(bits(&first), bits(&second), "{} should be deterministic", preset);
        assert_eq!(first_failure, second_failure);
    }
}

/// Different presets lead to different trajectories
#[test]
fn test_presets_diverge() {
    let gated = run(&scenario(Preset::ThreatGated));
    let damped = run(&scenario(Preset::DampedThreatGated));
    let winner = run(&scenario(Preset::WinnerTakeAll));

    assert_ne!(bits(&gated), bits(&damped));
    assert_ne!(bits(&gated), bits(&winner));
}

/// A run split into chunks matches a single uninterrupted run
#[test]
fn test_chunked_run_matches_single_run() {
    let config = scenario(Preset::WinnerTakeAll);
    let whole = run(&config);

    let mut driver = build_driver(&config).unwrap();
    let mut history = History::new();
    for _ in 0..4 {
        driver.run(25, &mut history).unwrap();
    }

    assert_eq!(bits(history.records()), bits(&whole));
}
