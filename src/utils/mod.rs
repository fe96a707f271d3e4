//! Utility functions for formatting and common operations
//!
//! Centralized formatting of dates and monetary amounts for log lines and
//! terminal output.

use chrono::NaiveDate;
use rust_decimal::Decimal;

/// Long human-readable date: "Tue, 04 Jan 2022"
///
/// # Examples
/// ```
/// use dcaval::utils::pretty_date;
/// use chrono::NaiveDate;
///
/// let date = NaiveDate::from_ymd_opt(2022, 1, 4).unwrap();
/// assert_eq!(pretty_date(date), "Tue, 04 Jan 2022");
/// ```
pub fn pretty_date(date: NaiveDate) -> String {
    date.format("%a, %d %b %Y").to_string()
}

/// Format an amount with `,` thousands separators, keeping its scale.
///
/// # Arguments
/// * `value` - The decimal value to format
/// * `width` - Minimum width for padding (0 for no padding, right-aligned)
///
/// # Examples
/// ```
/// use dcaval::utils::format_amount_with_width;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount_with_width(dec!(1234567.50000), 0), "1,234,567.50000");
/// assert_eq!(format_amount_with_width(dec!(-12), 6), "   -12");
/// ```
pub fn format_amount_with_width(value: Decimal, width: usize) -> String {
    let is_negative = value < Decimal::ZERO;
    let formatted = value.abs().to_string();
    let (integer_part, fraction) = match formatted.split_once('.') {
        Some((int, frac)) => (int.to_string(), Some(frac.to_string())),
        None => (formatted.clone(), None),
    };

    let with_separators: String = integer_part
        .chars()
        .rev()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 3 == 0 {
                vec![',', c]
            } else {
                vec![c]
            }
        })
        .collect::<Vec<_>>()
        .into_iter()
        .rev()
        .collect();

    let sign = if is_negative { "-" } else { "" };
    let result = match fraction {
        Some(frac) => format!("{}{}.{}", sign, with_separators, frac),
        None => format!("{}{}", sign, with_separators),
    };

    if width > 0 && result.len() < width {
        format!("{:>width$}", result, width = width)
    } else {
        result
    }
}

/// Amount followed by its currency code: "1,234.50000 USD"
///
/// # Examples
/// ```
/// use dcaval::utils::format_amount;
/// use rust_decimal_macros::dec;
///
/// assert_eq!(format_amount(dec!(150.00000), "usd"), "150.00000 USD");
/// ```
pub fn format_amount(value: Decimal, currency: &str) -> String {
    format!(
        "{} {}",
        format_amount_with_width(value, 0),
        currency.to_uppercase()
    )
}
