// Pricing module - price sources for sample dates

pub mod http;
pub mod table;
pub mod throttle;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

pub use http::HttpPriceSource;
pub use table::PriceTable;
pub use throttle::{Throttle, Throttled};

/// Why a price could not be resolved
#[derive(Error, Debug)]
pub enum PriceError {
    #[error("no recorded price for {asset} on {date}")]
    NotFound { asset: String, date: NaiveDate },

    #[error("price source unavailable: {0}")]
    Transient(String),
}

/// Anything that can price an asset on a calendar day.
///
/// Calls are made one at a time, in sample order.
pub trait PriceSource {
    fn fetch(&mut self, asset: &str, date: NaiveDate) -> Result<Decimal, PriceError>;
}

impl<S: PriceSource + ?Sized> PriceSource for Box<S> {
    fn fetch(&mut self, asset: &str, date: NaiveDate) -> Result<Decimal, PriceError> {
        (**self).fetch(asset, date)
    }
}

/// Parse a price from its textual form without going through `f64`.
///
/// Accepts plain decimals and scientific notation (`1.5e-7`).
pub fn parse_decimal(raw: &str) -> Option<Decimal> {
    let raw = raw.trim();
    raw.parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(raw).ok())
}
