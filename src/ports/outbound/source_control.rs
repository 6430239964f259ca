use crate::compliance::domain::{
    BranchProtection, CommitStatus, PullRequestCounts, RepositoryRef,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::HashSet;

/// SourceControlClient port for the source-control host
///
/// Implementations must be `Send + Sync`; scanners share one client across
/// concurrently scanned repositories.
#[async_trait]
pub trait SourceControlClient: Send + Sync {
    /// Looks up a single repository of an organization
    ///
    /// # Returns
    /// `None` when the repository does not exist or is not visible to the token
    async fn get_repository(&self, org: &str, name: &str) -> Result<Option<RepositoryRef>>;

    /// Lists every repository of an organization, following pagination
    async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>>;

    /// Fetches a file from the repository's default branch
    ///
    /// # Returns
    /// `None` when the file does not exist
    async fn get_raw_file(&self, repo: &RepositoryRef, path: &str) -> Result<Option<String>>;

    /// Latest commit on the default branch and the first status posted on it
    async fn get_latest_commit_status(&self, repo: &RepositoryRef) -> Result<CommitStatus>;

    async fn get_pull_request_counts(&self, repo: &RepositoryRef) -> Result<PullRequestCounts>;

    /// Protection settings of the default branch
    ///
    /// # Returns
    /// `None` when the branch is unprotected
    async fn get_branch_protection(&self, repo: &RepositoryRef)
        -> Result<Option<BranchProtection>>;

    /// Resolves the repositories to scan across all organizations
    ///
    /// With a non-empty whitelist each named repository is looked up in every
    /// organization; otherwise every repository of every organization is listed.
    /// Lookup failures are logged and skipped. Results are deduplicated by full name
    /// and keep discovery order.
    async fn list_repositories(
        &self,
        orgs: &[String],
        whitelist: &[String],
    ) -> Result<Vec<RepositoryRef>> {
        let mut seen = HashSet::new();
        let mut repositories = Vec::new();

        for org in orgs {
            if whitelist.is_empty() {
                match self.list_org_repositories(org).await {
                    Ok(found) => repositories.extend(found),
                    Err(e) => tracing::warn!(org = %org, error = %e, "Failed to list repositories"),
                }
                continue;
            }

            for name in whitelist {
                match self.get_repository(org, name).await {
                    Ok(Some(repo)) => repositories.push(repo),
                    Ok(None) => tracing::debug!(org = %org, repo = %name, "Repository not found"),
                    Err(e) => tracing::warn!(
                        org = %org,
                        repo = %name,
                        error = %e,
                        "Failed to fetch repository"
                    ),
                }
            }
        }

        repositories.retain(|repo| seen.insert(repo.full_name().to_string()));
        Ok(repositories)
    }
}
