use chrono::NaiveDate;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use super::{parse_decimal, PriceError, PriceSource};
use crate::error::{DcaError, Result};

const USER_AGENT: &str = concat!("dcaval/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Historical price lookups against a JSON HTTP API.
///
/// The endpoint is a URL template. `{asset}` and `{date}` are replaced by the
/// asset identifier and the formatted date; the positional form `{}` is also
/// understood, asset first and date second, e.g.
/// `https://api.coingecko.com/api/v3/coins/{}/history?date={}`.
///
/// The price is read from `market_data.current_price.<currency>`.
pub struct HttpPriceSource {
    client: Client,
    endpoint: String,
    date_format: String,
    currency: String,
}

impl HttpPriceSource {
    pub fn new(
        endpoint: impl Into<String>,
        date_format: impl Into<String>,
        currency: impl Into<String>,
    ) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| DcaError::config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            date_format: date_format.into(),
            currency: currency.into().to_lowercase(),
        })
    }

    /// The request URL for one asset/date pair
    pub fn url_for(&self, asset: &str, date: NaiveDate) -> String {
        let date_text = date.format(&self.date_format).to_string();
        expand_template(&self.endpoint, asset, &date_text)
    }
}

impl PriceSource for HttpPriceSource {
    fn fetch(&mut self, asset: &str, date: NaiveDate) -> std::result::Result<Decimal, PriceError> {
        let url = self.url_for(asset, date);
        info!("Fetching price for {} on {}", asset, date);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .map_err(|e| PriceError::Transient(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(PriceError::NotFound {
                asset: asset.to_string(),
                date,
            });
        }
        if !status.is_success() {
            return Err(PriceError::Transient(format!(
                "price API returned error status: {}",
                status
            )));
        }

        let body = response
            .text()
            .map_err(|e| PriceError::Transient(format!("failed to read response body: {}", e)))?;

        match extract_price(&body, &self.currency)? {
            Some(price) => Ok(price),
            None => Err(PriceError::NotFound {
                asset: asset.to_string(),
                date,
            }),
        }
    }
}

/// Fill `{asset}`/`{date}` (or positional `{}` `{}`) in an endpoint template.
pub fn expand_template(template: &str, asset: &str, date: &str) -> String {
    template
        .replace("{asset}", asset)
        .replace("{date}", date)
        .replacen("{}", asset, 1)
        .replacen("{}", date, 1)
}

/// Read `market_data.current_price.<currency>` from a response body.
///
/// `Ok(None)` means the body is well-formed but carries no price for the day.
pub fn extract_price(
    body: &str,
    currency: &str,
) -> std::result::Result<Option<Decimal>, PriceError> {
    let json: Value = serde_json::from_str(body)
        .map_err(|e| PriceError::Transient(format!("failed to parse price response: {}", e)))?;

    let raw = match json
        .get("market_data")
        .and_then(|m| m.get("current_price"))
        .and_then(|p| p.get(currency))
    {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let text = match raw {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => {
            return Err(PriceError::Transient(format!(
                "unexpected price value: {}",
                other
            )))
        }
    };

    parse_decimal(&text)
        .map(Some)
        .ok_or_else(|| PriceError::Transient(format!("invalid price value: {}", text)))
}
