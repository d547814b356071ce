//! Decision Rules
//!
//! Picks each party's realized utility for a round. All payoffs are read
//! from the state both agents had when the round started.

use crate::components::agent::Agent;
use crate::policy::{DecisionPolicy, PolicyConfig};

/// Cooperative and conflict payoff of one party against the other
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Payoffs {
    pub nash: f64,
    pub threat: f64,
}

impl Payoffs {
    pub fn of(agent: &Agent, other: &Agent, policy: &PolicyConfig) -> Self {
        Self {
            nash: agent.nash(other, policy.bargaining_formula),
            threat: agent.threat(other),
        }
    }

    /// Strictly better off cooperating
    pub fn prefers_agreement(&self) -> bool {
        self.nash > self.threat
    }
}

/// Realized utilities for one round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Decision {
    pub peasant: f64,
    pub elite: f64,
    /// Set only by the threat-gated rule
    pub agreement: Option<bool>,
}

/// Applies the configured decision rule.
///
/// Callers must have validated both agents; this only evaluates formulas.
pub fn decide(peasant: &Agent, elite: &Agent, policy: &PolicyConfig) -> Decision {
    match policy.decision_policy {
        DecisionPolicy::AlwaysCooperate => Decision {
            peasant: peasant.nash(elite, policy.bargaining_formula),
            elite: elite.nash(peasant, policy.bargaining_formula),
            agreement: None,
        },
        DecisionPolicy::ThreatGatedJoint => {
            let p = Payoffs::of(peasant, elite, policy);
            let e = Payoffs::of(elite, peasant, policy);
            // a single dissenting party forces conflict on both
            let agreed = p.prefers_agreement() && e.prefers_agreement();
            if agreed {
                Decision { peasant: p.nash, elite: e.nash, agreement: Some(true) }
            } else {
                Decision { peasant: p.threat, elite: e.threat, agreement: Some(false) }
            }
        }
        DecisionPolicy::PerPartyMax => Decision {
            peasant: peasant.util(elite, policy.bargaining_formula, policy.utility_policy),
            elite: elite.util(peasant, policy.bargaining_formula, policy.utility_policy),
            agreement: None,
        },
    }
}
