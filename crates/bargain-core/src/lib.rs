//! Peasant/Elite Bargaining Engine
//!
//! Two agents with productivity, resilience and coercive capacity bargain
//! every round, realize either a cooperative or a threat payoff, and
//! reinvest part of it into their own attributes. The historical model
//! variants are presets over one configurable engine.

pub mod components;
pub mod config;
pub mod driver;
pub mod error;
pub mod output;
pub mod policy;
pub mod setup;
pub mod systems;

pub use components::*;
pub use config::{default_config_toml, AgentConfig, ConfigError, SimConfig, SimulationConfig};
pub use driver::{Driver, DriverError, History, Reporter, Tee};
pub use error::BargainError;
pub use policy::{
    AllocationPolicy, BargainingFormula, DecisionPolicy, PolicyConfig, Preset, UtilityPolicy,
};
pub use systems::{allocate, decide, step, Decision, Engine, Investment, Payoffs, StepOutcome};

// Re-export setup functions explicitly
pub use setup::{build_driver, create_agents, initial_payoffs, InitialPayoffs, PartyPayoffs};
