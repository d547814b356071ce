//! Policy Configuration
//!
//! The four historical model variants differ only in which formula, utility
//! rule, decision rule and allocation rule they use. Each choice is an enum
//! here, and each variant is a [`Preset`] over those enums.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::BargainError;

/// Damping applied to the resilience marginal in the damped variant
pub const DAMPED_RESILIENCE: f64 = 0.1;

/// Which variable multiplies the resilience-to-coercion ratio inside `nash`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BargainingFormula {
    /// `p_i*(1 + p_i/v_j) + p_j*(1 - p_j/v_i)`
    ProductivityWeighted,
    /// `p_i*(1 + rho_i/v_j) + p_j*(1 - rho_j/v_i)`
    #[default]
    ResilienceWeighted,
}

/// What an agent's `util` returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UtilityPolicy {
    /// Always the cooperative payoff
    NashOnly,
    /// Whichever of threat and cooperative payoff is larger
    #[default]
    MaxThreatNash,
}

/// How realized utilities are chosen each round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionPolicy {
    /// Both parties realize `nash` unconditionally
    AlwaysCooperate,
    /// Agreement only if both prefer `nash` to `threat`, otherwise both take `threat`
    ThreatGatedJoint,
    /// Each party independently realizes its own `util`
    #[default]
    PerPartyMax,
}

/// How a scaled gain is spread over an agent's fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AllocationPolicy {
    /// Share proportional to each marginal utility
    ProportionalGradient,
    /// Whole amount to the largest marginal utility
    #[default]
    WinnerTakeAll,
}

impl BargainingFormula {
    pub const ALL: [BargainingFormula; 2] = [
        BargainingFormula::ProductivityWeighted,
        BargainingFormula::ResilienceWeighted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BargainingFormula::ProductivityWeighted => "productivity_weighted",
            BargainingFormula::ResilienceWeighted => "resilience_weighted",
        }
    }
}

impl UtilityPolicy {
    pub const ALL: [UtilityPolicy; 2] = [UtilityPolicy::NashOnly, UtilityPolicy::MaxThreatNash];

    pub fn as_str(&self) -> &'static str {
        match self {
            UtilityPolicy::NashOnly => "nash_only",
            UtilityPolicy::MaxThreatNash => "max_threat_nash",
        }
    }
}

impl DecisionPolicy {
    pub const ALL: [DecisionPolicy; 3] = [
        DecisionPolicy::AlwaysCooperate,
        DecisionPolicy::ThreatGatedJoint,
        DecisionPolicy::PerPartyMax,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionPolicy::AlwaysCooperate => "always_cooperate",
            DecisionPolicy::ThreatGatedJoint => "threat_gated_joint",
            DecisionPolicy::PerPartyMax => "per_party_max",
        }
    }
}

impl AllocationPolicy {
    pub const ALL: [AllocationPolicy; 2] = [
        AllocationPolicy::ProportionalGradient,
        AllocationPolicy::WinnerTakeAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AllocationPolicy::ProportionalGradient => "proportional_gradient",
            AllocationPolicy::WinnerTakeAll => "winner_take_all",
        }
    }
}

/// Looks up `name` among the snake_case names of `all`
fn parse_named<T: Copy>(
    all: &[T],
    name: &str,
    kind: &str,
    as_str: impl Fn(&T) -> &'static str,
) -> Result<T, BargainError> {
    all.iter()
        .copied()
        .find(|candidate| as_str(candidate) == name)
        .ok_or_else(|| {
            let known: Vec<&str> = all.iter().map(&as_str).collect();
            BargainError::configuration(format!(
                "unknown {} '{}' (expected one of: {})",
                kind,
                name,
                known.join(", ")
            ))
        })
}

impl FromStr for BargainingFormula {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Self::ALL, s, "bargaining formula", Self::as_str)
    }
}

impl FromStr for UtilityPolicy {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Self::ALL, s, "utility policy", Self::as_str)
    }
}

impl FromStr for DecisionPolicy {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Self::ALL, s, "decision policy", Self::as_str)
    }
}

impl FromStr for AllocationPolicy {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Self::ALL, s, "allocation policy", Self::as_str)
    }
}

impl fmt::Display for BargainingFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UtilityPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for DecisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for AllocationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Complete policy selection for one engine
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub bargaining_formula: BargainingFormula,
    pub utility_policy: UtilityPolicy,
    pub decision_policy: DecisionPolicy,
    pub allocation_policy: AllocationPolicy,
    /// Multiplier on the resilience marginal; only read by proportional allocation
    pub resilience_damping: f64,
}

impl Default for PolicyConfig {
    fn default() -> Self {
        Preset::WinnerTakeAll.config()
    }
}

impl PolicyConfig {
    pub fn new(
        bargaining_formula: BargainingFormula,
        utility_policy: UtilityPolicy,
        decision_policy: DecisionPolicy,
        allocation_policy: AllocationPolicy,
    ) -> Self {
        Self {
            bargaining_formula,
            utility_policy,
            decision_policy,
            allocation_policy,
            resilience_damping: 1.0,
        }
    }

    pub fn with_formula(mut self, formula: BargainingFormula) -> Self {
        self.bargaining_formula = formula;
        self
    }

    pub fn with_utility(mut self, policy: UtilityPolicy) -> Self {
        self.utility_policy = policy;
        self
    }

    pub fn with_decision(mut self, policy: DecisionPolicy) -> Self {
        self.decision_policy = policy;
        self
    }

    pub fn with_allocation(mut self, policy: AllocationPolicy) -> Self {
        self.allocation_policy = policy;
        self
    }

    pub fn with_resilience_damping(mut self, damping: f64) -> Self {
        self.resilience_damping = damping;
        self
    }

    /// Rejects parameter values and combinations the engine cannot run.
    pub fn validate(&self) -> Result<(), BargainError> {
        if !self.resilience_damping.is_finite() || self.resilience_damping <= 0.0 {
            return Err(BargainError::configuration(format!(
                "resilience_damping must be finite and > 0, got {}",
                self.resilience_damping
            )));
        }
        // per_party_max realizes `util`; under nash_only it is always_cooperate in disguise
        if self.decision_policy == DecisionPolicy::PerPartyMax
            && self.utility_policy == UtilityPolicy::NashOnly
        {
            return Err(BargainError::configuration(
                "per_party_max requires utility_policy = max_threat_nash",
            ));
        }
        Ok(())
    }
}

/// Named configuration reproducing one historical model variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Productivity-weighted surplus, everyone always cooperates
    Cooperative,
    /// Joint agreement gated on threat payoffs, proportional reinvestment
    ThreatGated,
    /// As `ThreatGated`, with the resilience marginal damped
    DampedThreatGated,
    /// Each party takes its better payoff and reinvests in one channel
    WinnerTakeAll,
}

impl Preset {
    pub const ALL: [Preset; 4] = [
        Preset::Cooperative,
        Preset::ThreatGated,
        Preset::DampedThreatGated,
        Preset::WinnerTakeAll,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Cooperative => "cooperative",
            Preset::ThreatGated => "threat_gated",
            Preset::DampedThreatGated => "damped_threat_gated",
            Preset::WinnerTakeAll => "winner_take_all",
        }
    }

    pub fn config(&self) -> PolicyConfig {
        use AllocationPolicy::*;
        use BargainingFormula::*;
        use DecisionPolicy::*;
        use UtilityPolicy::*;

        match self {
            // the earliest variant took dudp as 0.5 * (1 + p_i/v_j); the engine's
            // dudp uses rho_i, so proportional shares here differ from that run
            Preset::Cooperative => {
                PolicyConfig::new(ProductivityWeighted, NashOnly, AlwaysCooperate, ProportionalGradient)
            }
            Preset::ThreatGated => {
                PolicyConfig::new(ResilienceWeighted, NashOnly, ThreatGatedJoint, ProportionalGradient)
            }
            Preset::DampedThreatGated => {
                PolicyConfig::new(ResilienceWeighted, NashOnly, ThreatGatedJoint, ProportionalGradient)
                    .with_resilience_damping(DAMPED_RESILIENCE)
            }
            Preset::WinnerTakeAll => {
                PolicyConfig::new(ResilienceWeighted, MaxThreatNash, PerPartyMax, WinnerTakeAll)
            }
        }
    }
}

impl FromStr for Preset {
    type Err = BargainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_named(&Self::ALL, s, "preset", Self::as_str)
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        for preset in Preset::ALL {
            assert!(preset.config().validate().is_ok(), "{} should validate", preset);
        }
    }

    #[test]
    fn test_damped_preset_only_changes_damping() {
        let plain = Preset::ThreatGated.config();
        let damped = Preset::DampedThreatGated.config();

        assert_eq!(damped.resilience_damping, DAMPED_RESILIENCE);
        assert_eq!(damped.with_resilience_damping(1.0), plain);
    }

    #[test]
    fn test_parse_names_round_trip_through_display() {
        for formula in BargainingFormula::ALL {
            assert_eq!(formula.to_string().parse::<BargainingFormula>().unwrap(), formula);
        }
        for policy in DecisionPolicy::ALL {
            assert_eq!(policy.to_string().parse::<DecisionPolicy>().unwrap(), policy);
        }
        for preset in Preset::ALL {
            assert_eq!(preset.to_string().parse::<Preset>().unwrap(), preset);
        }
    }

    #[test]
    fn test_unknown_name_is_configuration_error() {
        let err = "majority_vote".parse::<DecisionPolicy>().unwrap_err();
        match err {
            BargainError::Configuration(msg) => {
                assert!(msg.contains("majority_vote"));
                assert!(msg.contains("threat_gated_joint"));
            }
            other => panic!("expected configuration error, got {:?}", other),
        }
        assert!("".parse::<AllocationPolicy>().is_err());
        assert!("Nash_Only".parse::<UtilityPolicy>().is_err());
    }

    #[test]
    fn test_invalid_damping_rejected() {
        for damping in [0.0, -0.1, f64::NAN, f64::INFINITY] {
            let config = Preset::ThreatGated.config().with_resilience_damping(damping);
            assert!(
                matches!(config.validate(), Err(BargainError::Configuration(_))),
                "damping {} should be rejected",
                damping
            );
        }
    }

    #[test]
    fn test_per_party_max_requires_max_utility() {
        let config = Preset::WinnerTakeAll.config().with_utility(UtilityPolicy::NashOnly);
        assert!(matches!(config.validate(), Err(BargainError::Configuration(_))));
    }

    #[test]
    fn test_serde_names_match_as_str() {
        assert_eq!(
            serde_json::to_string(&DecisionPolicy::ThreatGatedJoint).unwrap(),
            r#""threat_gated_joint""#
        );
        assert_eq!(
            serde_json::to_string(&BargainingFormula::ProductivityWeighted).unwrap(),
            r#""productivity_weighted""#
        );
        assert_eq!(
            serde_json::to_string(&Preset::DampedThreatGated).unwrap(),
            r#""damped_threat_gated""#
        );
    }
}
