use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use sbom_scanner::prelude::*;

/// Mock SourceControlClient for testing
///
/// Repositories are registered per organization; every other lookup
/// succeeds with fixed data unless configured to fail.
#[derive(Default)]
pub struct MockSourceControl {
    pub repositories: HashMap<String, Vec<RepositoryRef>>,
    pub files: HashMap<String, String>,
    pub commit_status: Option<CommitStatus>,
    pub failing_pull_requests: HashSet<String>,
    pub unprotected: HashSet<String>,
    pub calls: AtomicUsize,
}

impl MockSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repository(mut self, org: &str, name: &str) -> Self {
        self.repositories
            .entry(org.to_string())
            .or_default()
            .push(RepositoryRef::new(org, name, "main", false));
        self
    }

    /// Registers a file at `path` of `full_name`'s default branch
    pub fn with_file(mut self, full_name: &str, path: &str, content: &str) -> Self {
        self.files
            .insert(format!("{}:{}", full_name, path), content.to_string());
        self
    }

    pub fn with_commit_target(mut self, target_url: &str) -> Self {
        self.commit_status = Some(CommitStatus {
            commit_sha: "4f2a9c1".to_string(),
            commit_time: Some("2024-05-01T09:00:00Z".to_string()),
            commit_status_state: Some("success".to_string()),
            commit_status_time: Some("2024-05-01T09:12:00Z".to_string()),
            commit_status_context: Some("continuous-integration/jenkins/branch".to_string()),
            commit_status_target_url: Some(target_url.to_string()),
        });
        self
    }

    pub fn with_failing_pull_requests(mut self, full_name: &str) -> Self {
        self.failing_pull_requests.insert(full_name.to_string());
        self
    }

    pub fn with_unprotected_branch(mut self, full_name: &str) -> Self {
        self.unprotected.insert(full_name.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl SourceControlClient for MockSourceControl {
    async fn get_repository(&self, org: &str, name: &str) -> Result<Option<RepositoryRef>> {
        self.record_call();
        Ok(self
            .repositories
            .get(org)
            .and_then(|repos| repos.iter().find(|r| r.name() == name).cloned()))
    }

    async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>> {
        self.record_call();
        Ok(self.repositories.get(org).cloned().unwrap_or_default())
    }

    async fn get_raw_file(&self, repo: &RepositoryRef, path: &str) -> Result<Option<String>> {
        self.record_call();
        Ok(self
            .files
            .get(&format!("{}:{}", repo.full_name(), path))
            .cloned())
    }

    async fn get_latest_commit_status(&self, repo: &RepositoryRef) -> Result<CommitStatus> {
        self.record_call();
        self.commit_status
            .clone()
            .ok_or_else(|| anyhow::anyhow!("No commits on {}", repo.default_branch()))
    }

    async fn get_pull_request_counts(&self, repo: &RepositoryRef) -> Result<PullRequestCounts> {
        self.record_call();
        if self.failing_pull_requests.contains(repo.full_name()) {
            anyhow::bail!("search API returned status 403 Forbidden");
        }
        Ok(PullRequestCounts { open: 3, total: 57 })
    }

    async fn get_branch_protection(
        &self,
        repo: &RepositoryRef,
    ) -> Result<Option<BranchProtection>> {
        self.record_call();
        if self.unprotected.contains(repo.full_name()) {
            return Ok(None);
        }
        Ok(Some(BranchProtection {
            required_approving_review_count: 2,
            required_status_checks: vec!["ci/build".to_string()],
            allow_force_pushes: false,
        }))
    }
}
