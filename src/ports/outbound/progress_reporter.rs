/// ProgressReporter port for operator feedback during a scan
///
/// Reporting never affects the report contents. Implementations must be
/// `Send + Sync` because repositories are scanned concurrently.
pub trait ProgressReporter: Send + Sync {
    /// Reports a free-form progress message
    fn report(&self, message: &str);

    /// Announces a phase that will process `total` repositories
    fn start_phase(&self, phase: &str, total: usize);

    /// Marks one repository of the current phase as done
    fn advance(&self, repository: &str);

    /// Closes the current phase
    fn finish_phase(&self, message: &str);

    /// Reports a degraded result that did not stop the run
    fn report_warning(&self, message: &str);
}
