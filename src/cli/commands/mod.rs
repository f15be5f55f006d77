mod convert;
mod fetch;
mod merge;

pub use convert::run_convert;
pub use fetch::run_fetch;
pub use merge::run_merge;

use crate::error::Result;
use crate::report::BatchReport;
use std::path::Path;

/// Print the summary, write the optional JSON report and turn failures into
/// an error.
fn finish_report(report: BatchReport, report_path: Option<&Path>) -> Result<()> {
    report.print_summary();
    if let Some(path) = report_path {
        report.write_json(path)?;
        tracing::info!("Wrote report to {}", path.display());
    }
    report.into_result()
}
