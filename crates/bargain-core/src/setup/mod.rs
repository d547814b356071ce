//! Run Setup
//!
//! Builds agents, engine and driver from a validated configuration.

pub mod scenario;

pub use scenario::*;
