//! Run Statistics
//!
//! Accumulates a [`RunSummary`] from round records as they are produced.

use std::fs;
use std::path::Path;

use bargain_events::{AgentSnapshot, RealizedUtilities, RoundRecord, RunSummary};

/// Incremental summary over a stream of round records
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    summary: RunSummary,
    gated_rounds: u64,
}

impl SummaryBuilder {
    pub fn new(initial_peasant: AgentSnapshot, initial_elite: AgentSnapshot) -> Self {
        Self {
            summary: RunSummary::empty(initial_peasant, initial_elite),
            gated_rounds: 0,
        }
    }

    pub fn observe(&mut self, record: &RoundRecord) {
        let s = &mut self.summary;
        s.rounds += 1;
        s.cumulative_utility.peasant += record.utilities.peasant;
        s.cumulative_utility.elite += record.utilities.elite;
        s.final_utility = Some(record.utilities);
        s.final_peasant = record.peasant;
        s.final_elite = record.elite;

        match record.agreement {
            Some(true) => {
                s.agreements += 1;
                self.gated_rounds += 1;
            }
            Some(false) => {
                s.conflicts += 1;
                self.gated_rounds += 1;
                if s.first_conflict_round.is_none() {
                    s.first_conflict_round = Some(record.round);
                }
            }
            None => {}
        }
    }

    pub fn build(mut self) -> RunSummary {
        let s = &mut self.summary;
        if s.rounds > 0 {
            let n = s.rounds as f64;
            s.mean_utility = RealizedUtilities::new(
                s.cumulative_utility.peasant / n,
                s.cumulative_utility.elite / n,
            );
        }
        if self.gated_rounds > 0 {
            s.agreement_rate = Some(s.agreements as f64 / self.gated_rounds as f64);
        }
        self.summary
    }
}

/// Summarizes a complete record stream
pub fn summarize(
    initial_peasant: AgentSnapshot,
    initial_elite: AgentSnapshot,
    records: &[RoundRecord],
) -> RunSummary {
    let mut builder = SummaryBuilder::new(initial_peasant, initial_elite);
    for record in records {
        builder.observe(record);
    }
    builder.build()
}

/// Writes the summary as pretty-printed JSON
pub fn write_summary(summary: &RunSummary, path: impl AsRef<Path>) -> std::io::Result<()> {
    let json = serde_json::to_string_pretty(summary)?;
    fs::write(path, json)
}
