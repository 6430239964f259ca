use crate::compliance::domain::{BuildSummary, CoverageSummary, LastSuccessfulBuild};
use crate::shared::Result;
use async_trait::async_trait;

/// CiServerClient port for the continuous-integration host
#[async_trait]
pub trait CiServerClient: Send + Sync {
    /// Build record of the job's last successful build
    async fn get_build_summary(&self, build: &LastSuccessfulBuild) -> Result<BuildSummary>;

    /// Line coverage of the job's last successful build
    ///
    /// # Returns
    /// `None` when the build published no coverage report
    async fn get_coverage(&self, build: &LastSuccessfulBuild) -> Result<Option<CoverageSummary>>;
}
