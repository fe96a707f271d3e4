//! Output formatting module for CLI display
//!
//! This module handles all terminal output formatting, separating
//! the concerns of valuation from presentation.

use chrono::{Datelike, NaiveDate};
use colored::Colorize;
use dcaval::utils::{format_amount, format_amount_with_width};
use dcaval::valuation::ValuationReport;
use serde::Serialize;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

/// Format a valuation report for JSON output
pub fn format_report_json(
    report: &ValuationReport,
    asset: &str,
    currency: &str,
    date_format: &str,
) -> String {
    #[derive(Serialize)]
    struct JsonPoint {
        date: String,
        price: String,
        value: String,
    }

    #[derive(Serialize)]
    struct JsonReport<'a> {
        asset: &'a str,
        currency: String,
        points: Vec<JsonPoint>,
        total_value: String,
    }

    let points = report
        .points
        .iter()
        .map(|p| JsonPoint {
            date: p.date.format(date_format).to_string(),
            price: p.price.to_string(),
            value: p.value.to_string(),
        })
        .collect();

    let json_report = JsonReport {
        asset,
        currency: currency.to_uppercase(),
        points,
        total_value: report.total_value.to_string(),
    };

    serde_json::to_string_pretty(&json_report)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a valuation report for terminal table output
pub fn format_report_table(
    report: &ValuationReport,
    asset: &str,
    currency: &str,
    date_format: &str,
) -> String {
    #[derive(Tabled)]
    struct Row {
        #[tabled(rename = "Date")]
        date: String,
        #[tabled(rename = "Price")]
        price: String,
        #[tabled(rename = "Value")]
        value: String,
    }

    let mut output = format!(
        "\n{} {} valuation ({} samples)\n\n",
        "📈".cyan().bold(),
        asset,
        report.len()
    );

    if report.is_empty() {
        output.push_str(&format!("{}\n", "No samples in window".yellow()));
        return output;
    }

    let rows: Vec<Row> = report
        .points
        .iter()
        .map(|p| Row {
            date: p.date.format(date_format).to_string(),
            price: format_amount_with_width(p.price, 0),
            value: format_amount_with_width(p.value, 0),
        })
        .collect();

    let table = Table::new(rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..)).with(Alignment::right()))
        .to_string();
    output.push_str(&table);
    output.push_str(&format!(
        "\n\n{} {}\n",
        "Total:".bold(),
        format_amount(report.total_value, currency).green().bold()
    ));
    output
}

/// Format a list of sample dates for JSON output
pub fn format_dates_json(dates: &[NaiveDate], date_format: &str) -> String {
    let formatted: Vec<String> = dates
        .iter()
        .map(|d| d.format(date_format).to_string())
        .collect();
    serde_json::to_string_pretty(&formatted)
        .unwrap_or_else(|e| format!(r#"{{"error": "JSON serialization failed: {}"}}"#, e))
}

/// Format a list of sample dates, one per line with its weekday
pub fn format_dates_list(dates: &[NaiveDate], date_format: &str) -> String {
    let mut output = String::new();
    for (i, date) in dates.iter().enumerate() {
        output.push_str(&format!(
            "{:>4}  {}  {}\n",
            i + 1,
            date.format(date_format),
            date.weekday().to_string().dimmed()
        ));
    }
    output.push_str(&format!(
        "\n{} {} sample dates\n",
        "✓".green(),
        dates.len()
    ));
    output
}
