use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};
use tracing::debug;

use super::{PriceError, PriceSource};

/// Polling delay the public price API tolerates between requests
pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_secs(41);

/// Minimum-interval throttle for sequential calls to a shared API.
///
/// The interval is measured from the end of the previous call, so the first
/// call never waits. A zero interval disables waiting entirely.
#[derive(Debug, Clone)]
pub struct Throttle {
    min_interval: Duration,
    last_call: Option<Instant>,
}

impl Throttle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: None,
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Block until the interval since the last recorded call has elapsed.
    pub fn wait(&self) {
        if self.min_interval.is_zero() {
            return;
        }
        if let Some(last) = self.last_call {
            let elapsed = last.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                debug!("Throttling next request for {:?}", remaining);
                std::thread::sleep(remaining);
            }
        }
    }

    /// Record that a call just finished.
    pub fn record(&mut self) {
        self.last_call = Some(Instant::now());
    }
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(DEFAULT_REQUEST_INTERVAL)
    }
}

/// A price source whose calls are spaced by a [`Throttle`]
pub struct Throttled<S> {
    inner: S,
    throttle: Throttle,
}

impl<S: PriceSource> Throttled<S> {
    pub fn new(inner: S, throttle: Throttle) -> Self {
        Self { inner, throttle }
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: PriceSource> PriceSource for Throttled<S> {
    fn fetch(&mut self, asset: &str, date: NaiveDate) -> Result<Decimal, PriceError> {
        self.throttle.wait();
        let result = self.inner.fetch(asset, date);
        self.throttle.record();
        result
    }
}
