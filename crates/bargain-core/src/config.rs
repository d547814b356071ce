//! Configuration loading for a simulation run.
//!
//! Runs are described by a TOML file. Every section is optional and falls
//! back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::components::agent::Agent;
use crate::error::BargainError;
use crate::policy::PolicyConfig;

/// Complete run configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    /// Round count and reinvestment scale
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Initial peasant state
    #[serde(default = "AgentConfig::default_peasant")]
    pub peasant: AgentConfig,
    /// Initial elite state
    #[serde(default = "AgentConfig::default_elite")]
    pub elite: AgentConfig,
    /// Formula and policy selection
    #[serde(default)]
    pub policy: PolicyConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            peasant: AgentConfig::default_peasant(),
            elite: AgentConfig::default_elite(),
            policy: PolicyConfig::default(),
        }
    }
}

impl SimConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parses configuration from a TOML string.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Serializes the configuration as TOML.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Checks everything the engine would reject, before any round runs.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.peasant.to_agent().map_err(|e| ConfigError::invalid("peasant", e))?;
        self.elite.to_agent().map_err(|e| ConfigError::invalid("elite", e))?;
        self.policy.validate().map_err(|e| ConfigError::invalid("policy", e))?;
        let scale = self.simulation.scale;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ConfigError::invalid(
                "simulation",
                BargainError::configuration(format!("scale must be finite and > 0, got {}", scale)),
            ));
        }
        Ok(())
    }
}

/// Run length settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Number of rounds to play
    pub rounds: u64,
    /// Fraction of realized utility reinvested each round
    pub scale: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rounds: 100,
            scale: 0.01,
        }
    }
}

/// Initial state of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    pub p: f64,
    pub rho: f64,
    pub v: f64,
}

impl AgentConfig {
    pub fn new(p: f64, rho: f64, v: f64) -> Self {
        Self { p, rho, v }
    }

    pub fn default_peasant() -> Self {
        Self::new(0.6, 0.2, 0.1)
    }

    pub fn default_elite() -> Self {
        Self::new(0.3, 0.2, 0.2)
    }

    pub fn to_agent(&self) -> Result<Agent, BargainError> {
        Agent::new(self.p, self.rho, self.v)
    }
}

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// IO error reading config file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Error parsing TOML config, including unknown policy names
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    /// Parsed, but not runnable
    #[error("invalid [{section}] section: {source}")]
    Invalid {
        section: &'static str,
        #[source]
        source: BargainError,
    },
}

impl ConfigError {
    fn invalid(section: &'static str, source: BargainError) -> Self {
        ConfigError::Invalid { section, source }
    }
}

/// Generates a default configuration file content.
pub fn default_config_toml() -> String {
    r#"# Bargaining simulation configuration

[simulation]
rounds = 100
scale = 0.01

[peasant]
p = 0.6
rho = 0.2
v = 0.1

[elite]
p = 0.3
rho = 0.2
v = 0.2

[policy]
# productivity_weighted | resilience_weighted
bargaining_formula = "resilience_weighted"
# nash_only | max_threat_nash
utility_policy = "max_threat_nash"
# always_cooperate | threat_gated_joint | per_party_max
decision_policy = "per_party_max"
# proportional_gradient | winner_take_all
allocation_policy = "winner_take_all"
# scales the resilience marginal under proportional_gradient
resilience_damping = 1.0
"#
    .to_string()
}
