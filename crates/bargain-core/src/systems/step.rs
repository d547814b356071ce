//! Round Step
//!
//! One simultaneous move: both realized utilities come from the pre-round
//! state, then each agent invests its own scaled utility against the
//! other's pre-round state. The step works on copies, so a failed round
//! leaves the caller's agents exactly as they were.

use bargain_events::RealizedUtilities;

use crate::components::agent::Agent;
use crate::error::BargainError;
use crate::policy::PolicyConfig;
use crate::systems::allocation::Investment;
use crate::systems::decision::decide;

/// Result of a single round
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutcome {
    pub peasant_utility: f64,
    pub elite_utility: f64,
    pub agreement: Option<bool>,
    /// Peasant after investing
    pub peasant: Agent,
    /// Elite after investing
    pub elite: Agent,
    pub peasant_investment: Investment,
    pub elite_investment: Investment,
}

impl StepOutcome {
    pub fn utilities(&self) -> RealizedUtilities {
        RealizedUtilities::new(self.peasant_utility, self.elite_utility)
    }
}

/// A validated policy and reinvestment scale
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Engine {
    policy: PolicyConfig,
    scale: f64,
}

impl Engine {
    /// Creates an engine; `scale` must be finite and > 0.
    pub fn new(policy: PolicyConfig, scale: f64) -> Result<Self, BargainError> {
        policy.validate()?;
        if !scale.is_finite() || scale <= 0.0 {
            return Err(BargainError::configuration(format!(
                "scale must be finite and > 0, got {}",
                scale
            )));
        }
        Ok(Self { policy, scale })
    }

    pub fn policy(&self) -> &PolicyConfig {
        &self.policy
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Plays one round from the given state.
    pub fn step(&self, peasant: &Agent, elite: &Agent) -> Result<StepOutcome, BargainError> {
        peasant.validate()?;
        elite.validate()?;

        let decision = decide(peasant, elite, &self.policy);

        let mut next_peasant = *peasant;
        let mut next_elite = *elite;
        // both invest against the other's pre-round state
        let peasant_investment =
            next_peasant.invest(elite, self.scale * decision.peasant, &self.policy)?;
        let elite_investment =
            next_elite.invest(peasant, self.scale * decision.elite, &self.policy)?;

        if decision.peasant < 0.0 || decision.elite < 0.0 {
            tracing::warn!(
                peasant_utility = decision.peasant,
                elite_utility = decision.elite,
                "Negative realized utility, agent state shrinks"
            );
        }

        Ok(StepOutcome {
            peasant_utility: decision.peasant,
            elite_utility: decision.elite,
            agreement: decision.agreement,
            peasant: next_peasant,
            elite: next_elite,
            peasant_investment,
            elite_investment,
        })
    }
}

/// Plays one round with an ad-hoc engine.
pub fn step(
    peasant: &Agent,
    elite: &Agent,
    scale: f64,
    policy: &PolicyConfig,
) -> Result<StepOutcome, BargainError> {
    Engine::new(*policy, scale)?.step(peasant, elite)
}
