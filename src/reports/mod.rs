// Reports module - valuation report sinks

pub mod sink;

pub use sink::{render_report, CsvReportSink};

use crate::error::Result;
use crate::valuation::ValuationReport;

/// Destination for a finished valuation report.
///
/// Called once per run, after every sample has been priced.
pub trait ReportSink {
    fn write(&mut self, report: &ValuationReport) -> Result<()>;
}

/// Keeps written reports in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    pub reports: Vec<ValuationReport>,
}

impl ReportSink for MemorySink {
    fn write(&mut self, report: &ValuationReport) -> Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }
}
