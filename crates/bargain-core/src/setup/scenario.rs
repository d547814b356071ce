//! Scenario construction and initial-state reporting.

use serde::Serialize;

use crate::components::agent::Agent;
use crate::config::{ConfigError, SimConfig};
use crate::driver::Driver;
use crate::error::BargainError;
use crate::systems::decision::Payoffs;
use crate::systems::step::Engine;

/// Builds a ready-to-run driver from `config`.
pub fn build_driver(config: &SimConfig) -> Result<Driver, ConfigError> {
    config.validate()?;
    let (peasant, elite) = create_agents(config)?;
    let engine = Engine::new(config.policy, config.simulation.scale)
        .map_err(|source| ConfigError::Invalid { section: "policy", source })?;
    Ok(Driver::new(engine, peasant, elite))
}

/// Creates the initial peasant and elite.
pub fn create_agents(config: &SimConfig) -> Result<(Agent, Agent), ConfigError> {
    let peasant = config
        .peasant
        .to_agent()
        .map_err(|source| ConfigError::Invalid { section: "peasant", source })?;
    let elite = config
        .elite
        .to_agent()
        .map_err(|source| ConfigError::Invalid { section: "elite", source })?;
    Ok((peasant, elite))
}

/// Payoffs of one party at the start of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PartyPayoffs {
    pub nash: f64,
    pub threat: f64,
    pub util: f64,
}

/// Both parties' starting payoffs under the configured policy
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InitialPayoffs {
    pub peasant: PartyPayoffs,
    pub elite: PartyPayoffs,
}

/// Evaluates both agents against each other before any round is played.
pub fn initial_payoffs(config: &SimConfig) -> Result<InitialPayoffs, BargainError> {
    let peasant = config.peasant.to_agent()?;
    let elite = config.elite.to_agent()?;
    let policy = &config.policy;

    let party = |agent: &Agent, other: &Agent| {
        let payoffs = Payoffs::of(agent, other, policy);
        PartyPayoffs {
            nash: payoffs.nash,
            threat: payoffs.threat,
            util: agent.util(other, policy.bargaining_formula, policy.utility_policy),
        }
    };

    Ok(InitialPayoffs {
        peasant: party(&peasant, &elite),
        elite: party(&elite, &peasant),
    })
}
