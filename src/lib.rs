//! dcaval - periodic dollar-cost-average valuation
//!
//! This library aligns a date window onto a weekday, samples it at a fixed
//! cadence, prices each sample date and values a fixed quantity of the
//! asset, accumulating a running total.

pub mod config;
pub mod error;
pub mod pipeline;
pub mod pricing;
pub mod reports;
pub mod schedule;
pub mod utils;
pub mod valuation;

pub use error::{DcaError, Result};
