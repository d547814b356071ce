//! Agent Component
//!
//! One bargaining party: productivity `p`, resilience `rho` and coercive
//! capacity `v`. Every payoff formula divides by a `v`, so all three fields
//! are kept strictly positive and finite; construction and investment both
//! refuse to produce anything else.

use bargain_events::AgentSnapshot;
use serde::{Deserialize, Serialize};

use crate::error::BargainError;
use crate::policy::{BargainingFormula, PolicyConfig, UtilityPolicy};
use crate::systems::allocation::{allocate, Investment};

/// One of the three fields an agent can invest in
///
/// Declaration order is the winner-take-all tie-break order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Attribute {
    Productivity,
    Resilience,
    Coercion,
}

impl Attribute {
    /// Tie-break priority: p, then rho, then v
    pub const PRIORITY: [Attribute; 3] = [
        Attribute::Productivity,
        Attribute::Resilience,
        Attribute::Coercion,
    ];

    pub fn field_name(&self) -> &'static str {
        match self {
            Attribute::Productivity => "p",
            Attribute::Resilience => "rho",
            Attribute::Coercion => "v",
        }
    }
}

/// Partial derivatives of `nash` with respect to the agent's own fields
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Marginals {
    pub dudp: f64,
    pub dudrho: f64,
    pub dudv: f64,
}

impl Marginals {
    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Productivity => self.dudp,
            Attribute::Resilience => self.dudrho,
            Attribute::Coercion => self.dudv,
        }
    }

    pub fn sum(&self) -> f64 {
        self.dudp + self.dudrho + self.dudv
    }

    /// Copy with the resilience marginal scaled by `factor`
    pub fn with_resilience_damping(mut self, factor: f64) -> Self {
        self.dudrho *= factor;
        self
    }

    /// Largest marginal; ties go to the earlier entry of [`Attribute::PRIORITY`]
    pub fn largest(&self) -> Attribute {
        let mut best = Attribute::PRIORITY[0];
        for attribute in &Attribute::PRIORITY[1..] {
            if self.get(*attribute) > self.get(best) {
                best = *attribute;
            }
        }
        best
    }
}

/// A bargaining party
///
/// Not deserializable directly; go through [`AgentSnapshot`] and `TryFrom`
/// so the positivity check always runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Agent {
    p: f64,
    rho: f64,
    v: f64,
}

fn check_positive(field: &'static str, value: f64) -> Result<(), BargainError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(BargainError::InvalidState { field, value })
    }
}

impl Agent {
    /// Creates an agent, rejecting any field that is not strictly positive.
    pub fn new(p: f64, rho: f64, v: f64) -> Result<Self, BargainError> {
        let agent = Self { p, rho, v };
        agent.validate()?;
        Ok(agent)
    }

    pub fn p(&self) -> f64 {
        self.p
    }

    pub fn rho(&self) -> f64 {
        self.rho
    }

    pub fn v(&self) -> f64 {
        self.v
    }

    pub fn get(&self, attribute: Attribute) -> f64 {
        match attribute {
            Attribute::Productivity => self.p,
            Attribute::Resilience => self.rho,
            Attribute::Coercion => self.v,
        }
    }

    /// Checks the positivity invariant
    pub fn validate(&self) -> Result<(), BargainError> {
        for attribute in Attribute::PRIORITY {
            check_positive(attribute.field_name(), self.get(attribute))?;
        }
        Ok(())
    }

    /// Payoff this agent can guarantee by defecting into conflict
    pub fn threat(&self, other: &Agent) -> f64 {
        self.rho * self.p / other.v
    }

    /// Cooperative payoff: half the joint surplus, adjusted by each side's
    /// ratio against the other's coercive capacity
    pub fn nash(&self, other: &Agent, formula: BargainingFormula) -> f64 {
        let (own_ratio, other_ratio) = match formula {
            BargainingFormula::ProductivityWeighted => (self.p / other.v, other.p / self.v),
            BargainingFormula::ResilienceWeighted => (self.rho / other.v, other.rho / self.v),
        };
        0.5 * (self.p * (1.0 + own_ratio) + other.p * (1.0 - other_ratio))
    }

    /// The payoff this agent evaluates its position by
    pub fn util(&self, other: &Agent, formula: BargainingFormula, policy: UtilityPolicy) -> f64 {
        let nash = self.nash(other, formula);
        match policy {
            UtilityPolicy::NashOnly => nash,
            UtilityPolicy::MaxThreatNash => self.threat(other).max(nash),
        }
    }

    pub fn dudp(&self, other: &Agent) -> f64 {
        0.5 * (1.0 + self.rho / other.v)
    }

    pub fn dudrho(&self, other: &Agent) -> f64 {
        0.5 * self.p / other.v
    }

    pub fn dudv(&self, other: &Agent) -> f64 {
        0.5 * other.rho * other.p / (self.v * self.v)
    }

    pub fn marginals(&self, other: &Agent) -> Marginals {
        Marginals {
            dudp: self.dudp(other),
            dudrho: self.dudrho(other),
            dudv: self.dudv(other),
        }
    }

    /// Spreads `amount` over this agent's fields according to `policy`.
    ///
    /// Only `self` changes. On error `self` is left untouched, including when
    /// a negative amount would push a field to zero or below.
    pub fn invest(
        &mut self,
        other: &Agent,
        amount: f64,
        policy: &PolicyConfig,
    ) -> Result<Investment, BargainError> {
        self.validate()?;
        other.validate()?;

        let investment = allocate(
            &self.marginals(other),
            amount,
            policy.allocation_policy,
            policy.resilience_damping,
        )?;

        let updated = Agent {
            p: self.p + investment.dp,
            rho: self.rho + investment.drho,
            v: self.v + investment.dv,
        };
        updated.validate()?;
        *self = updated;
        Ok(investment)
    }

    pub fn snapshot(&self) -> AgentSnapshot {
        AgentSnapshot::new(self.p, self.rho, self.v)
    }
}

impl From<&Agent> for AgentSnapshot {
    fn from(agent: &Agent) -> Self {
        agent.snapshot()
    }
}

impl TryFrom<AgentSnapshot> for Agent {
    type Error = BargainError;

    fn try_from(snapshot: AgentSnapshot) -> Result<Self, Self::Error> {
        Agent::new(snapshot.p, snapshot.rho, snapshot.v)
    }
}
