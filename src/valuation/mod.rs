//! Valuation accumulation
//!
//! Walks the sample dates in order, prices each one and turns the price into
//! a position value for a fixed quantity, keeping a running total.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;

/// Fractional digits kept on every computed value
pub const VALUE_SCALE: u32 = 5;

/// One priced sample
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub price: Decimal,
    pub value: Decimal,
}

/// Ordered price points and their summed value
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValuationReport {
    pub points: Vec<PricePoint>,
    pub total_value: Decimal,
}

impl Default for ValuationReport {
    fn default() -> Self {
        Self {
            points: Vec::new(),
            total_value: at_value_scale(Decimal::ZERO),
        }
    }
}

impl ValuationReport {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}

/// Arithmetic failures while accumulating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValuationError {
    #[error("value overflowed on {date}")]
    Overflow { date: NaiveDate },
}

/// `price * quantity` rounded half-to-even to five fractional digits, or
/// `None` when the product does not fit in a `Decimal`.
pub fn value_of(price: Decimal, quantity: Decimal) -> Option<Decimal> {
    price
        .checked_mul(quantity)
        .map(|value| at_value_scale(value.round_dp(VALUE_SCALE)))
}

fn at_value_scale(mut value: Decimal) -> Decimal {
    value.rescale(VALUE_SCALE);
    value
}

/// Price every date in order and accumulate the values.
///
/// The first lookup failure aborts the walk and is returned as-is; no partial
/// report is produced. An overflowing value or total aborts the same way with
/// [`ValuationError::Overflow`]. Dates are neither sorted nor deduplicated, so
/// a repeated date is priced and counted again.
pub fn accumulate<F, E>(
    dates: &[NaiveDate],
    mut price_of: F,
    quantity: Decimal,
) -> Result<ValuationReport, E>
where
    F: FnMut(NaiveDate) -> Result<Decimal, E>,
    E: From<ValuationError>,
{
    let mut report = ValuationReport::default();

    for &date in dates {
        let price = price_of(date)?;
        let value = value_of(price, quantity).ok_or(ValuationError::Overflow { date })?;
        debug!("Priced {} at {}: value {}", date, price, value);

        report.total_value = report
            .total_value
            .checked_add(value)
            .ok_or(ValuationError::Overflow { date })?;
        report.points.push(PricePoint { date, price, value });
    }

    Ok(report)
}
