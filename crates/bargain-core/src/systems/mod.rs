//! Model Systems
//!
//! Allocation of gains, the per-round decision rule, and the round step that
//! ties them together.

pub mod allocation;
pub mod decision;
pub mod step;

// Re-export commonly used systems
pub use allocation::{allocate, Investment};
pub use decision::{decide, Decision, Payoffs};
pub use step::{step, Engine, StepOutcome};
