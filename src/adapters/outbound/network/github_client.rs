use super::http::{build_client, read_json, send_with_retry, HttpSettings};
use crate::compliance::domain::{
    BranchProtection, CommitStatus, PullRequestCounts, RepositoryRef,
};
use crate::ports::outbound::SourceControlClient;
use crate::shared::Result;
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::Deserialize;

const PAGE_SIZE: usize = 100;
/// Upper bound on organization listing pages
const MAX_PAGES: usize = 100;
const API_VERSION: &str = "2022-11-28";

#[derive(Debug, Deserialize)]
struct GithubOwner {
    login: String,
}

#[derive(Debug, Deserialize)]
struct GithubRepository {
    name: String,
    owner: GithubOwner,
    #[serde(default)]
    default_branch: Option<String>,
    #[serde(default)]
    private: bool,
}

impl From<GithubRepository> for RepositoryRef {
    fn from(repo: GithubRepository) -> Self {
        RepositoryRef::new(
            repo.owner.login,
            repo.name,
            repo.default_branch.unwrap_or_else(|| "main".to_string()),
            repo.private,
        )
    }
}

#[derive(Debug, Deserialize)]
struct GitActor {
    #[serde(default)]
    date: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitCommitDetail {
    #[serde(default)]
    author: Option<GitActor>,
}

#[derive(Debug, Deserialize)]
struct GithubCommit {
    sha: String,
    commit: GitCommitDetail,
}

#[derive(Debug, Deserialize)]
struct GithubStatus {
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    context: Option<String>,
    #[serde(default)]
    target_url: Option<String>,
    #[serde(default)]
    created_at: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchCount {
    total_count: u64,
}

#[derive(Debug, Default, Deserialize)]
struct ReviewRules {
    #[serde(default)]
    required_approving_review_count: u32,
}

#[derive(Debug, Deserialize)]
struct StatusCheck {
    context: String,
}

#[derive(Debug, Default, Deserialize)]
struct StatusCheckRules {
    /// Deprecated by GitHub, still filled for classic protection rules
    #[serde(default)]
    contexts: Vec<String>,
    #[serde(default)]
    checks: Vec<StatusCheck>,
}

impl StatusCheckRules {
    /// Union of `checks` and `contexts`, in first-seen order
    fn into_required_checks(self) -> Vec<String> {
        let mut required: Vec<String> = Vec::new();
        let names = self
            .checks
            .into_iter()
            .map(|check| check.context)
            .chain(self.contexts);
        for name in names {
            if !required.contains(&name) {
                required.push(name);
            }
        }
        required
    }
}

#[derive(Debug, Default, Deserialize)]
struct EnabledFlag {
    #[serde(default)]
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct GithubProtection {
    #[serde(default)]
    required_pull_request_reviews: Option<ReviewRules>,
    #[serde(default)]
    required_status_checks: Option<StatusCheckRules>,
    #[serde(default)]
    allow_force_pushes: Option<EnabledFlag>,
}

impl From<GithubProtection> for BranchProtection {
    fn from(protection: GithubProtection) -> Self {
        BranchProtection {
            required_approving_review_count: protection
                .required_pull_request_reviews
                .unwrap_or_default()
                .required_approving_review_count,
            required_status_checks: protection
                .required_status_checks
                .unwrap_or_default()
                .into_required_checks(),
            allow_force_pushes: protection.allow_force_pushes.unwrap_or_default().enabled,
        }
    }
}

/// GithubClient adapter for the GitHub REST API and raw content host
pub struct GithubClient {
    client: reqwest::Client,
    api_url: String,
    raw_url: String,
    token: Option<String>,
    retries: u32,
}

impl GithubClient {
    /// Creates a client for the given API and raw-content base URLs
    ///
    /// # Arguments
    /// * `api_url` - REST API base, e.g. `https://api.github.com`
    /// * `raw_url` - Raw content base, e.g. `https://raw.githubusercontent.com`
    /// * `token` - Access token; anonymous requests are heavily rate limited
    pub fn new(
        api_url: &str,
        raw_url: &str,
        token: Option<String>,
        http: &HttpSettings,
    ) -> Result<Self> {
        Ok(Self {
            client: build_client(http)?,
            api_url: api_url.trim_end_matches('/').to_string(),
            raw_url: raw_url.trim_end_matches('/').to_string(),
            token: token.filter(|t| !t.is_empty()),
            retries: http.retries,
        })
    }

    fn api(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    async fn send(&self, url: &str, accept: &'static str) -> Result<reqwest::Response> {
        send_with_retry(self.retries, url, || {
            let mut request = self
                .client
                .get(url)
                .header("Accept", accept)
                .header("X-GitHub-Api-Version", API_VERSION);
            if let Some(token) = &self.token {
                request = request.bearer_auth(token);
            }
            Ok(request)
        })
        .await
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self.send(url, "application/vnd.github+json").await?;
        read_json(response, url).await
    }

    async fn search_count(&self, query: &str) -> Result<u64> {
        let url = self.api(&format!(
            "/search/issues?q={}&per_page=1",
            urlencoding::encode(query)
        ));
        let result: SearchCount = self.get_json(&url).await?;
        Ok(result.total_count)
    }
}

#[async_trait]
impl SourceControlClient for GithubClient {
    async fn get_repository(&self, org: &str, name: &str) -> Result<Option<RepositoryRef>> {
        let url = self.api(&format!(
            "/repos/{}/{}",
            urlencoding::encode(org),
            urlencoding::encode(name)
        ));
        let response = self.send(&url, "application/vnd.github+json").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let repo: GithubRepository = read_json(response, &url).await?;
        Ok(Some(repo.into()))
    }

    async fn list_org_repositories(&self, org: &str) -> Result<Vec<RepositoryRef>> {
        let mut repositories = Vec::new();
        let mut exhausted = false;

        for page in 1..=MAX_PAGES {
            let url = self.api(&format!(
                "/orgs/{}/repos?per_page={}&page={}",
                urlencoding::encode(org),
                PAGE_SIZE,
                page
            ));
            let batch: Vec<GithubRepository> = self.get_json(&url).await?;
            let short_page = batch.len() < PAGE_SIZE;
            repositories.extend(batch.into_iter().map(RepositoryRef::from));
            if short_page {
                exhausted = true;
                break;
            }
        }
        if !exhausted {
            tracing::warn!(
                org = %org,
                max_pages = MAX_PAGES,
                "Repository listing truncated at page limit; results are incomplete"
            );
        }

        tracing::info!(org = %org, count = repositories.len(), "Listed organization repositories");
        Ok(repositories)
    }

    async fn get_raw_file(&self, repo: &RepositoryRef, path: &str) -> Result<Option<String>> {
        let url = format!(
            "{}/{}/{}/{}",
            self.raw_url,
            repo.full_name(),
            repo.default_branch(),
            path.trim_start_matches('/')
        );
        tracing::debug!(url = %url, "Fetching raw file");

        let response = self.send(&url, "application/vnd.github.raw").await?;
        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            status if status.is_success() => Ok(Some(response.text().await?)),
            status => anyhow::bail!("{} returned status {}", url, status),
        }
    }

    async fn get_latest_commit_status(&self, repo: &RepositoryRef) -> Result<CommitStatus> {
        let url = self.api(&format!(
            "/repos/{}/commits?sha={}&per_page=1",
            repo.full_name(),
            urlencoding::encode(repo.default_branch())
        ));
        let commits: Vec<GithubCommit> = self.get_json(&url).await?;
        let Some(commit) = commits.into_iter().next() else {
            anyhow::bail!("No commits on {}", repo.default_branch());
        };

        let mut status = CommitStatus {
            commit_sha: commit.sha,
            commit_time: commit.commit.author.and_then(|a| a.date),
            ..CommitStatus::default()
        };

        let url = self.api(&format!(
            "/repos/{}/commits/{}/statuses",
            repo.full_name(),
            status.commit_sha
        ));
        let statuses: Vec<GithubStatus> = self.get_json(&url).await?;
        // Only the first status is reported, even when several systems post
        if let Some(first) = statuses.into_iter().next() {
            status.commit_status_state = first.state;
            status.commit_status_time = first.created_at;
            status.commit_status_context = first.context;
            status.commit_status_target_url = first.target_url;
        }
        Ok(status)
    }

    async fn get_pull_request_counts(&self, repo: &RepositoryRef) -> Result<PullRequestCounts> {
        let base = format!("repo:{} is:pr archived:false draft:false", repo.full_name());
        let total = self.search_count(&base).await?;
        let open = self
            .search_count(&format!(
                "repo:{} is:pr is:open archived:false draft:false",
                repo.full_name()
            ))
            .await?;
        Ok(PullRequestCounts { open, total })
    }

    async fn get_branch_protection(
        &self,
        repo: &RepositoryRef,
    ) -> Result<Option<BranchProtection>> {
        let url = self.api(&format!(
            "/repos/{}/branches/{}/protection",
            repo.full_name(),
            urlencoding::encode(repo.default_branch())
        ));
        let response = self.send(&url, "application/vnd.github+json").await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let protection: GithubProtection = read_json(response, &url).await?;
        Ok(Some(protection.into()))
    }
}
