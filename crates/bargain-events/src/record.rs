//! Round Records
//!
//! One record per simulated round: post-update agent state, realized
//! utilities, the agreement flag and what each agent invested.

use serde::{Deserialize, Serialize};

/// State of one agent after a round
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentSnapshot {
    /// Productivity
    pub p: f64,
    /// Resilience
    pub rho: f64,
    /// Coercive capacity
    pub v: f64,
}

impl AgentSnapshot {
    pub fn new(p: f64, rho: f64, v: f64) -> Self {
        Self { p, rho, v }
    }
}

/// Utility each party realized in a round
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RealizedUtilities {
    pub peasant: f64,
    pub elite: f64,
}

impl RealizedUtilities {
    pub fn new(peasant: f64, elite: f64) -> Self {
        Self { peasant, elite }
    }
}

/// Increments applied to an agent's fields by its investment
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentSnapshot {
    pub dp: f64,
    pub drho: f64,
    pub dv: f64,
}

impl InvestmentSnapshot {
    pub fn new(dp: f64, drho: f64, dv: f64) -> Self {
        Self { dp, drho, dv }
    }

    /// Sum of all three increments
    pub fn total(&self) -> f64 {
        self.dp + self.drho + self.dv
    }
}

/// A single round of the simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    /// Zero-based round index
    pub round: u64,
    /// Peasant state after investing
    pub peasant: AgentSnapshot,
    /// Elite state after investing
    pub elite: AgentSnapshot,
    /// Realized utilities, computed from the pre-round state
    pub utilities: RealizedUtilities,
    /// Joint agreement flag; only threat-gated decisions produce one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement: Option<bool>,
    #[serde(default)]
    pub peasant_investment: InvestmentSnapshot,
    #[serde(default)]
    pub elite_investment: InvestmentSnapshot,
}

impl RoundRecord {
    pub fn new(
        round: u64,
        peasant: AgentSnapshot,
        elite: AgentSnapshot,
        utilities: RealizedUtilities,
        agreement: Option<bool>,
    ) -> Self {
        Self {
            round,
            peasant,
            elite,
            utilities,
            agreement,
            peasant_investment: InvestmentSnapshot::default(),
            elite_investment: InvestmentSnapshot::default(),
        }
    }

    pub fn with_investments(mut self, peasant: InvestmentSnapshot, elite: InvestmentSnapshot) -> Self {
        self.peasant_investment = peasant;
        self.elite_investment = elite;
        self
    }

    /// Short label for annotating plots
    pub fn outcome_label(&self) -> &'static str {
        match self.agreement {
            Some(true) => "agreement",
            Some(false) => "conflict",
            None => "unconditional",
        }
    }

    /// Serializes the record as a single JSON line.
    pub fn to_jsonl(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserializes a record from a JSON line.
    pub fn from_jsonl(line: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(line)
    }
}
