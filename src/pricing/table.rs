use chrono::NaiveDate;
use csv::{ReaderBuilder, Trim};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use std::io::Read;
use std::path::Path;
use tracing::info;

use super::{parse_decimal, PriceError, PriceSource};
use crate::error::{DcaError, Result};

#[derive(Debug, Deserialize)]
struct CsvRecord {
    date: String,
    price: String,
    #[serde(default)]
    asset: Option<String>,
}

/// Offline price source backed by a CSV file.
///
/// The file needs a header with `date` and `price` columns and may carry an
/// `asset` column; rows without an asset apply to every asset. Dates are read
/// with the configured format, falling back to ISO `YYYY-MM-DD`.
#[derive(Debug, Clone, Default)]
pub struct PriceTable {
    prices: HashMap<(String, NaiveDate), Decimal>,
}

impl PriceTable {
    pub fn load<P: AsRef<Path>>(path: P, date_format: &str) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|e| {
            DcaError::config(format!("failed to open price table {}: {}", path.display(), e))
        })?;
        let table = Self::from_reader(file, date_format)?;
        info!("Loaded {} prices from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, date_format: &str) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .trim(Trim::All)
            .from_reader(reader);

        let mut table = Self::default();
        for (index, result) in reader.deserialize().enumerate() {
            let line = index + 2;
            let record: CsvRecord = result
                .map_err(|e| DcaError::config(format!("price table line {}: {}", line, e)))?;

            let date = NaiveDate::parse_from_str(&record.date, date_format)
                .or_else(|_| NaiveDate::parse_from_str(&record.date, "%Y-%m-%d"))
                .map_err(|_| {
                    DcaError::config(format!(
                        "price table line {}: invalid date '{}'",
                        line, record.date
                    ))
                })?;
            let price = parse_decimal(&record.price).ok_or_else(|| {
                DcaError::config(format!(
                    "price table line {}: invalid price '{}'",
                    line, record.price
                ))
            })?;

            table.insert(record.asset.as_deref().unwrap_or(""), date, price);
        }
        Ok(table)
    }

    pub fn insert(&mut self, asset: &str, date: NaiveDate, price: Decimal) {
        self.prices.insert((asset.to_string(), date), price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    fn lookup(&self, asset: &str, date: NaiveDate) -> Option<Decimal> {
        self.prices
            .get(&(asset.to_string(), date))
            .or_else(|| self.prices.get(&(String::new(), date)))
            .copied()
    }
}

impl PriceSource for PriceTable {
    fn fetch(&mut self, asset: &str, date: NaiveDate) -> std::result::Result<Decimal, PriceError> {
        self.lookup(asset, date).ok_or_else(|| PriceError::NotFound {
            asset: asset.to_string(),
            date,
        })
    }
}
