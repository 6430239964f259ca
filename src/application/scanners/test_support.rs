//! In-memory collaborators shared by the scanner and use case tests.

use crate::compliance::domain::{
    ApplicationQuery, ApplicationRecord, BranchProtection, BuildSummary, CommitStatus,
    CoverageSummary, LastSuccessfulBuild, PullRequestCounts, RepositoryRef, ScaProject,
    Workspace,
};
use crate::ports::outbound::{
    CiServerClient, ProgressReporter, SecurityPlatformClient, SourceControlClient,
};
use crate::shared::Result;
use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

pub fn repo(name: &str) -> RepositoryRef {
    RepositoryRef::new("acme", name, "main", false)
}

#[derive(Default)]
pub struct FakeSourceControl {
    pub org_repos: HashMap<String, Vec<RepositoryRef>>,
    pub failing_orgs: HashSet<String>,
    pub files: HashMap<(String, String), String>,
    pub failing_files: HashSet<String>,
    pub commit_status: Option<CommitStatus>,
    pub pull_requests: Option<PullRequestCounts>,
    /// Outer `None` fails the call; inner `None` is an unprotected branch
    pub protection: Option<Option<BranchProtection>>,
    pub calls: AtomicUsize,
}

impl FakeSourceControl {
    /// A host where every fetch succeeds for the given repositories.
    pub fn healthy(org: &str, repos: Vec<RepositoryRef>) -> Self {
        let mut org_repos = HashMap::new();
        org_repos.insert(org.to_string(), repos);
        Self {
            org_repos,
            commit_status: Some(CommitStatus {
                commit_sha: "abc123".to_string(),
                commit_time: Some("2024-05-01T10:00:00Z".to_string()),
                commit_status_state: Some("success".to_string()),
                commit_status_time: Some("2024-05-01T10:05:00Z".to_string()),
                commit_status_context: Some("continuous-integration/jenkins/branch".to_string()),
                commit_status_target_url: Some(
                    "https://ci.acme.dev/job/acme/job/billing/job/main/12/display/redirect"
                        .to_string(),
                ),
            }),
            pull_requests: Some(PullRequestCounts { open: 2, total: 40 }),
            protection: Some(Some(BranchProtection {
                required_approving_review_count: 1,
                required_status_checks: vec!["ci".to_string()],
                allow_force_pushes: false,
            })),
            ..Self::default()
        }
    }

    pub fn with_file(mut self, repo: &str, path: &str, content: &str) -> Self {
        self.files.insert(
            (format!("acme/{}", repo), path.to_string()),
            content.to_string(),
        );
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
impl SourceControlClient for FakeSourceControl {
    async fn get_repository(&self, org: &str, name: &str) -> Result<Option<RepositoryRef>> {
        self.record_call();
        if self.failing_orgs.contains(org) {
            anyhow::bail!("HTTP 502 for {}/{}", org, name);
        }
        Ok(self
            .org_repos
            .get(org)
            .and_then(|repos| repos.iter().find(|r| r.name() == name).cloned()))
    }

    async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>> {
        self.record_call();
        if self.failing_orgs.contains(org) {
            anyhow::bail!("HTTP 502 listing {}", org);
        }
        Ok(self.org_repos.get(org).cloned().unwrap_or_default())
    }

    async fn get_raw_file(&self, repo: &RepositoryRef, path: &str) -> Result<Option<String>> {
        self.record_call();
        if self.failing_files.contains(path) {
            anyhow::bail!("connection reset fetching {}", path);
        }
        Ok(self
            .files
            .get(&(repo.full_name().to_string(), path.to_string()))
            .cloned())
    }

    async fn get_latest_commit_status(&self, _repo: &RepositoryRef) -> Result<CommitStatus> {
        self.record_call();
        self.commit_status
            .clone()
            .ok_or_else(|| anyhow::anyhow!("HTTP 500"))
    }

    async fn get_pull_request_counts(&self, _repo: &RepositoryRef) -> Result<PullRequestCounts> {
        self.record_call();
        self.pull_requests
            .ok_or_else(|| anyhow::anyhow!("HTTP 403 rate limited"))
    }

    async fn get_branch_protection(
        &self,
        _repo: &RepositoryRef,
    ) -> Result<Option<BranchProtection>> {
        self.record_call();
        self.protection
            .clone()
            .ok_or_else(|| anyhow::anyhow!("HTTP 500"))
    }
}

#[derive(Default)]
pub struct FakeSecurityPlatform {
    pub applications: Vec<ApplicationRecord>,
    pub fail_search: bool,
    pub workspaces: Option<Vec<Workspace>>,
    pub projects: HashMap<String, Vec<ScaProject>>,
    pub searches: Mutex<Vec<ApplicationQuery>>,
    pub workspace_calls: AtomicUsize,
}

#[async_trait]
impl SecurityPlatformClient for FakeSecurityPlatform {
    async fn search_applications(
        &self,
        query: &ApplicationQuery,
    ) -> Result<Vec<ApplicationRecord>> {
        self.searches.lock().unwrap().push(query.clone());
        if self.fail_search {
            anyhow::bail!("HTTP 401 Unauthorized");
        }
        // Wildcard semantics: substring match, case-insensitive
        let needle = query.name.clone().unwrap_or_default().to_lowercase();
        Ok(self
            .applications
            .iter()
            .filter(|app| app.profile.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>> {
        self.workspace_calls.fetch_add(1, Ordering::SeqCst);
        self.workspaces
            .clone()
            .ok_or_else(|| anyhow::anyhow!("HTTP 503"))
    }

    async fn get_projects(&self, workspace_id: &str) -> Result<Vec<ScaProject>> {
        Ok(self.projects.get(workspace_id).cloned().unwrap_or_default())
    }

    fn sca_ui_host(&self) -> &str {
        "sca.analysiscenter.veracode.com"
    }
}

#[derive(Default)]
pub struct FakeCiServer {
    pub build: Option<BuildSummary>,
    pub coverage: Option<Option<CoverageSummary>>,
    pub requested: Mutex<Vec<String>>,
}

#[async_trait]
impl CiServerClient for FakeCiServer {
    async fn get_build_summary(&self, build: &LastSuccessfulBuild) -> Result<BuildSummary> {
        self.requested.lock().unwrap().push(build.build_info_url());
        self.build
            .clone()
            .ok_or_else(|| anyhow::anyhow!("HTTP 404"))
    }

    async fn get_coverage(&self, build: &LastSuccessfulBuild) -> Result<Option<CoverageSummary>> {
        self.requested.lock().unwrap().push(build.coverage_url());
        self.coverage.ok_or_else(|| anyhow::anyhow!("HTTP 404"))
    }
}

#[derive(Default)]
pub struct RecordingReporter {
    pub messages: Mutex<Vec<String>>,
}

impl RecordingReporter {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().unwrap().clone()
    }
}

impl ProgressReporter for RecordingReporter {
    fn report(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn start_phase(&self, phase: &str, total: usize) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("start {} ({})", phase, total));
    }

    fn advance(&self, repository: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("done {}", repository));
    }

    fn finish_phase(&self, message: &str) {
        self.messages.lock().unwrap().push(message.to_string());
    }

    fn report_warning(&self, message: &str) {
        self.messages
            .lock()
            .unwrap()
            .push(format!("warning: {}", message));
    }
}
