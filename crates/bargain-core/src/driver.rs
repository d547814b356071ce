//! Simulation Driver
//!
//! Owns the two agents for a run, plays a fixed number of rounds and hands
//! every post-round record to a [`Reporter`]. Presentation (plots, tables)
//! lives behind that trait.

use bargain_events::{RoundRecord, RunSummary};
use thiserror::Error;

use crate::components::agent::Agent;
use crate::error::BargainError;
use crate::output::stats::SummaryBuilder;
use crate::systems::step::Engine;

/// Sink for round records
pub trait Reporter {
    fn record(&mut self, record: &RoundRecord) -> std::io::Result<()>;

    /// Called once after the last round
    fn finish(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Keeps the full time series in memory
#[derive(Debug, Clone, Default)]
pub struct History {
    records: Vec<RoundRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[RoundRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<RoundRecord> {
        self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Realized (peasant, elite) utilities in round order
    pub fn utility_series(&self) -> Vec<(f64, f64)> {
        self.records
            .iter()
            .map(|r| (r.utilities.peasant, r.utilities.elite))
            .collect()
    }
}

impl Reporter for History {
    fn record(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        self.records.push(record.clone());
        Ok(())
    }
}

/// Forwards every record to two reporters
pub struct Tee<'a> {
    first: &'a mut dyn Reporter,
    second: &'a mut dyn Reporter,
}

impl<'a> Tee<'a> {
    pub fn new(first: &'a mut dyn Reporter, second: &'a mut dyn Reporter) -> Self {
        Self { first, second }
    }
}

impl Reporter for Tee<'_> {
    fn record(&mut self, record: &RoundRecord) -> std::io::Result<()> {
        self.first.record(record)?;
        self.second.record(record)
    }

    fn finish(&mut self) -> std::io::Result<()> {
        self.first.finish()?;
        self.second.finish()
    }
}

/// Errors that abort a run
#[derive(Debug, Error)]
pub enum DriverError {
    #[error("round {round}: {source}")]
    Model {
        round: u64,
        #[source]
        source: BargainError,
    },

    #[error("failed to record round {round}: {source}")]
    Report {
        round: u64,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to finish reporting: {0}")]
    Finish(#[source] std::io::Error),
}

/// Round loop over one peasant/elite pair
#[derive(Debug, Clone)]
pub struct Driver {
    engine: Engine,
    peasant: Agent,
    elite: Agent,
    round: u64,
}

impl Driver {
    pub fn new(engine: Engine, peasant: Agent, elite: Agent) -> Self {
        Self {
            engine,
            peasant,
            elite,
            round: 0,
        }
    }

    pub fn peasant(&self) -> &Agent {
        &self.peasant
    }

    pub fn elite(&self) -> &Agent {
        &self.elite
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Rounds played so far
    pub fn round(&self) -> u64 {
        self.round
    }

    /// Plays one round and returns its record.
    ///
    /// The agents only advance when the round succeeds.
    pub fn advance(&mut self) -> Result<RoundRecord, BargainError> {
        let outcome = self.engine.step(&self.peasant, &self.elite)?;

        let record = RoundRecord::new(
            self.round,
            outcome.peasant.snapshot(),
            outcome.elite.snapshot(),
            outcome.utilities(),
            outcome.agreement,
        )
        .with_investments(
            outcome.peasant_investment.into(),
            outcome.elite_investment.into(),
        );

        tracing::debug!(
            round = self.round,
            peasant_utility = outcome.peasant_utility,
            elite_utility = outcome.elite_utility,
            outcome = record.outcome_label(),
            peasant_invested = record.peasant_investment.total(),
            elite_invested = record.elite_investment.total(),
            "Round complete"
        );

        self.peasant = outcome.peasant;
        self.elite = outcome.elite;
        self.round += 1;
        Ok(record)
    }

    /// Plays `rounds` rounds, forwarding each record to `reporter`.
    pub fn run(
        &mut self,
        rounds: u64,
        reporter: &mut dyn Reporter,
    ) -> Result<RunSummary, DriverError> {
        let policy = self.engine.policy();
        tracing::info!(
            rounds,
            scale = self.engine.scale(),
            formula = %policy.bargaining_formula,
            utility = %policy.utility_policy,
            decision = %policy.decision_policy,
            allocation = %policy.allocation_policy,
            "Starting run"
        );

        let mut summary = SummaryBuilder::new(self.peasant.snapshot(), self.elite.snapshot());

        for _ in 0..rounds {
            let round = self.round;
            let record = self
                .advance()
                .map_err(|source| DriverError::Model { round, source })?;
            reporter
                .record(&record)
                .map_err(|source| DriverError::Report { round, source })?;
            summary.observe(&record);
        }
        reporter.finish().map_err(DriverError::Finish)?;

        let summary = summary.build();
        tracing::info!(
            rounds = summary.rounds,
            agreements = summary.agreements,
            conflicts = summary.conflicts,
            "Run complete"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::policy::Preset;
    use std::io;

    fn driver(preset: Preset) -> Driver {
        let engine = Engine::new(preset.config(), 0.01).unwrap();
        Driver::new(
            engine,
            Agent::new(0.6, 0.2, 0.1).unwrap(),
            Agent::new(0.3, 0.2, 0.2).unwrap(),
        )
    }

    struct FailingReporter {
        fail_at: u64,
    }

    impl Reporter for FailingReporter {
        fn record(&mut self, record: &RoundRecord) -> io::Result<()> {
            if record.round == self.fail_at {
                Err(io::Error::new(io::ErrorKind::Other, "disk full"))
            } else {
                Ok(())
            }
        }
    }

    #[test]
    fn test_run_records_every_round() {
        let mut driver = driver(Preset::ThreatGated);
        let mut history = History::new();

        let summary = driver.run(25, &mut history).unwrap();

        assert_eq!(history.len(), 25);
        assert_eq!(summary.rounds, 25);
        assert_eq!(driver.round(), 25);
        for (i, record) in history.records().iter().enumerate() {
            assert_eq!(record.round, i as u64);
            assert!(record.agreement.is_some());
        }
        let last = history.records().last().unwrap();
        assert_eq!(last.peasant, driver.peasant().snapshot());
        assert_eq!(last.elite, driver.elite().snapshot());
    }

    #[test]
    fn test_records_chain_state() {
        let mut driver = driver(Preset::WinnerTakeAll);
        let mut history = History::new();
        driver.run(10, &mut history).unwrap();

        // each round's state is the previous round's state plus its investment
        for pair in history.records().windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            assert_eq!(next.peasant.p, prev.peasant.p + next.peasant_investment.dp);
            assert_eq!(next.peasant.rho, prev.peasant.rho + next.peasant_investment.drho);
            assert_eq!(next.elite.v, prev.elite.v + next.elite_investment.dv);
        }
    }

    #[test]
    fn test_run_can_continue() {
        let mut once = driver(Preset::DampedThreatGated);
        let mut full = History::new();
        once.run(20, &mut full).unwrap();

        let mut twice = driver(Preset::DampedThreatGated);
        let mut first = History::new();
        let mut second = History::new();
        twice.run(12, &mut first).unwrap();
        twice.run(8, &mut second).unwrap();

        let mut joined = first.into_records();
        joined.extend(second.into_records());
        assert_eq!(joined, full.into_records());
    }

    #[test]
    fn test_reporter_failure_aborts_run() {
        let mut driver = driver(Preset::Cooperative);
        let mut reporter = FailingReporter { fail_at: 3 };

        let err = driver.run(10, &mut reporter).unwrap_err();

        assert!(matches!(err, DriverError::Report { round: 3, .. }));
        assert!(err.to_string().contains("disk full"));
    }

    #[test]
    fn test_model_failure_reports_round() {
        // negative cooperative payoff with a large scale collapses the peasant
        let engine = Engine::new(Preset::Cooperative.config(), 10.0).unwrap();
        let mut driver = Driver::new(
            engine,
            Agent::new(1.0, 0.2, 0.01).unwrap(),
            Agent::new(0.2, 0.4, 5.0).unwrap(),
        );
        let mut history = History::new();

        let err = driver.run(5, &mut history).unwrap_err();

        assert!(matches!(
            err,
            DriverError::Model { round: 0, source: BargainError::InvalidState { .. } }
        ));
        assert!(history.is_empty());
        assert_eq!(driver.round(), 0);
        assert_eq!(driver.peasant(), &Agent::new(1.0, 0.2, 0.01).unwrap());
    }

    #[test]
    fn test_tee_forwards_to_both() {
        let mut driver = driver(Preset::ThreatGated);
        let mut a = History::new();
        let mut b = History::new();

        driver.run(4, &mut Tee::new(&mut a, &mut b)).unwrap();

        assert_eq!(a.len(), 4);
        assert_eq!(a.records(), b.records());
        assert_eq!(a.utility_series().len(), 4);
    }
}
