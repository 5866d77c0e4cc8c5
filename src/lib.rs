//! detect-sp - Simpson's Paradox detection over tabular data
//!
//! Computes aggregate and per-subgroup trends for pairs of variables and
//! flags the subgroups whose trend reverses the aggregate one. Trend types
//! and paradox definitions are pluggable.

pub mod cli;
pub mod config;
pub mod csv_output;
pub mod dataset;
pub mod engine;
pub mod error;
pub mod json_output;
pub mod matrix;
pub mod results;
pub mod reversal;
pub mod stats;
pub mod trend;

pub use error::{ErrorKind, Result, SpError};
