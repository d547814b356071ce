//! Sample data fixtures for testing.
//!
//! Enable the `test-fixtures` feature to access these helpers.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // bargain-events = { path = "../bargain-events", features = ["test-fixtures"] }
//!
//! use bargain_events::fixtures;
//!
//! let records = fixtures::sample_records();
//! ```

use crate::{AgentSnapshot, RoundRecord};

/// Returns sample round records from the fixtures file.
///
/// Contains 4 threat-gated rounds: agreement, agreement, conflict, agreement.
/// Realized utilities sum to 0.7 (peasant) and 0.4 (elite).
pub fn sample_records() -> Vec<RoundRecord> {
    let jsonl = include_str!("../tests/fixtures/sample_rounds.jsonl");
    jsonl
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| {
            RoundRecord::from_jsonl(l).unwrap_or_else(|e| {
                panic!("Failed to parse record line: {}\nError: {}", l, e)
            })
        })
        .collect()
}

/// Initial peasant state the sample records start from.
pub fn sample_initial_peasant() -> AgentSnapshot {
    AgentSnapshot::new(0.6, 0.2, 0.1)
}

/// Initial elite state the sample records start from.
pub fn sample_initial_elite() -> AgentSnapshot {
    AgentSnapshot::new(0.3, 0.2, 0.2)
}
