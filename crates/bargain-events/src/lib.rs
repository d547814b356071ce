//! Shared record types and serialization for the bargaining simulation.
//!
//! This crate contains pure data structures with no simulation logic.
//! The engine emits them, downstream plotting and analysis tools consume them.

pub mod record;
pub mod summary;

#[cfg(feature = "test-fixtures")]
pub mod fixtures;

// Re-export record types
pub use record::{AgentSnapshot, InvestmentSnapshot, RealizedUtilities, RoundRecord};

// Re-export summary types
pub use summary::RunSummary;
