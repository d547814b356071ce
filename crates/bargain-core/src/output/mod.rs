//! Output
//!
//! JSON Lines round logging and end-of-run statistics.

pub mod logger;
pub mod stats;

pub use logger::{read_records, JsonlReporter};
pub use stats::{write_summary, SummaryBuilder};
