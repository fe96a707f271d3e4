//! Error handling for dcaval
//!
//! Library operations return [`DcaError`]; the binary wraps them in
//! `anyhow` for context chaining at the command boundary.

use chrono::NaiveDate;
use thiserror::Error;

use crate::pricing::PriceError;
use crate::valuation::ValuationError;

/// Core error types for a valuation run
#[derive(Error, Debug)]
pub enum DcaError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("aligned window is empty: start {start} falls after end {end}")]
    AlignmentDegenerate { start: NaiveDate, end: NaiveDate },

    #[error("price lookup failed for {date}")]
    PriceLookup {
        date: NaiveDate,
        #[source]
        source: PriceError,
    },

    #[error(transparent)]
    Valuation(#[from] ValuationError),

    #[error("failed to write report")]
    SinkWrite(#[from] std::io::Error),
}

impl DcaError {
    pub fn config(message: impl Into<String>) -> Self {
        DcaError::Configuration(message.into())
    }
}

/// Result type alias for library operations
pub type Result<T> = std::result::Result<T, DcaError>;
