//! Model Components
//!
//! The bargaining agent and the quantities derived from its state.

pub mod agent;

pub use agent::*;
