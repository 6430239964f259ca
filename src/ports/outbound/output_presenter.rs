use crate::compliance::domain::ScanReport;
use crate::shared::Result;

/// OutputPresenter port for delivering the finished report
///
/// # Errors
/// Implementations return an error if serialization or writing fails. This is
/// the only stage after scanning that can fail the run.
pub trait OutputPresenter {
    fn present(&self, report: &ScanReport) -> Result<()>;
}
