//! Sample-date scheduling
//!
//! Turns a raw date window into the ordered list of dates at which prices
//! are sampled: optional weekday alignment of the window bounds, then a
//! fixed-cadence walk from the start.

pub mod align;
pub mod sequence;

use chrono::{NaiveDate, Weekday};
use serde::Serialize;

pub use align::{align, align_optional};
pub use sequence::generate;

/// Default number of days between samples
pub const DEFAULT_CYCLE_DAYS: i64 = 7;

/// A `(start, end)` pair of calendar days.
///
/// `start <= end` is expected but not enforced here; alignment can invert a
/// narrow window and callers decide how to treat that.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Signed number of days from `start` to `end`
    pub fn day_span(&self) -> i64 {
        (self.end - self.start).num_days()
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }
}

/// Map a weekday index (Monday = 0 .. Sunday = 6) to a `chrono::Weekday`.
pub fn weekday_from_index(index: u8) -> Option<Weekday> {
    match index {
        0 => Some(Weekday::Mon),
        1 => Some(Weekday::Tue),
        2 => Some(Weekday::Wed),
        3 => Some(Weekday::Thu),
        4 => Some(Weekday::Fri),
        5 => Some(Weekday::Sat),
        6 => Some(Weekday::Sun),
        _ => None,
    }
}
