use csv::WriterBuilder;
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use tracing::info;

use super::ReportSink;
use crate::error::{DcaError, Result};
use crate::valuation::ValuationReport;

/// Appends valuation reports to a CSV file.
///
/// Each report is a header, one `date,price,value` row per sample and a
/// trailing `#sum:` line. The whole block is rendered first and appended in
/// one write, so a failed run never leaves rows behind.
#[derive(Debug, Clone)]
pub struct CsvReportSink {
    path: PathBuf,
    date_format: String,
    currency: String,
}

impl CsvReportSink {
    pub fn new(path: impl Into<PathBuf>, date_format: impl Into<String>, currency: &str) -> Self {
        Self {
            path: path.into(),
            date_format: date_format.into(),
            currency: currency.to_uppercase(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ReportSink for CsvReportSink {
    fn write(&mut self, report: &ValuationReport) -> Result<()> {
        let mut block = render_report(report, &self.date_format, &self.currency)?;

        let mut file = OpenOptions::new()
            .read(true)
            .create(true)
            .append(true)
            .open(&self.path)?;
        if !ends_with_newline(&mut file)? {
            block.insert(0, b'\n');
        }
        file.write_all(&block)?;
        file.flush()?;

        info!(
            "Wrote {} rows to {}",
            report.len(),
            self.path.display()
        );
        Ok(())
    }
}

/// Render one report block as bytes.
pub fn render_report(report: &ValuationReport, date_format: &str, currency: &str) -> Result<Vec<u8>> {
    let mut writer = WriterBuilder::new().has_headers(false).from_writer(Vec::new());

    writer
        .write_record([
            "date".to_string(),
            format!("price{}", currency),
            format!("value{}", currency),
        ])
        .map_err(csv_to_io)?;
    for point in &report.points {
        writer
            .write_record([
                point.date.format(date_format).to_string(),
                point.price.to_string(),
                point.value.to_string(),
            ])
            .map_err(csv_to_io)?;
    }

    let mut block = writer
        .into_inner()
        .map_err(|e| DcaError::SinkWrite(e.into_error()))?;
    writeln!(block, "#sum: {}{}", report.total_value, currency)?;
    Ok(block)
}

/// True for an empty file or one whose last byte is `\n`.
///
/// Older reports end with a `#sum:` line that has no line break.
fn ends_with_newline(file: &mut File) -> std::io::Result<bool> {
    if file.metadata()?.len() == 0 {
        return Ok(true);
    }
    let mut last = [0u8; 1];
    file.seek(SeekFrom::End(-1))?;
    file.read_exact(&mut last)?;
    Ok(last[0] == b'\n')
}

fn csv_to_io(err: csv::Error) -> DcaError {
    DcaError::SinkWrite(std::io::Error::other(err))
}
