//! Run Summary
//!
//! Aggregate statistics over a complete run, written once at the end.

use serde::{Deserialize, Serialize};

use crate::{AgentSnapshot, RealizedUtilities};

/// Overall statistics for one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub rounds: u64,
    /// Rounds that ended in a joint agreement
    pub agreements: u64,
    /// Rounds that fell back to threat payoffs
    pub conflicts: u64,
    /// Share of gated rounds that reached agreement; absent when no round was gated
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agreement_rate: Option<f64>,
    pub cumulative_utility: RealizedUtilities,
    pub mean_utility: RealizedUtilities,
    /// Utilities realized in the last round played
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_utility: Option<RealizedUtilities>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_conflict_round: Option<u64>,
    pub initial_peasant: AgentSnapshot,
    pub initial_elite: AgentSnapshot,
    pub final_peasant: AgentSnapshot,
    pub final_elite: AgentSnapshot,
}

impl RunSummary {
    /// Summary of a run with no rounds yet
    pub fn empty(peasant: AgentSnapshot, elite: AgentSnapshot) -> Self {
        Self {
            rounds: 0,
            agreements: 0,
            conflicts: 0,
            agreement_rate: None,
            cumulative_utility: RealizedUtilities::default(),
            mean_utility: RealizedUtilities::default(),
            final_utility: None,
            first_conflict_round: None,
            initial_peasant: peasant,
            initial_elite: elite,
            final_peasant: peasant,
            final_elite: elite,
        }
    }
}
