use super::http::{build_client, read_json, send_with_retry, HttpSettings};
use crate::compliance::domain::{BuildSummary, CoverageSummary, LastSuccessfulBuild, TestCounts};
use crate::ports::outbound::CiServerClient;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use serde::Deserialize;

const TEST_RESULT_ACTION: &str = "hudson.tasks.junit.TestResultAction";
const SONAR_ACTION: &str = "hudson.plugins.sonar.action.SonarAnalysisAction";
const LINE_COVERAGE: &str = "Lines";

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BuildAction {
    #[serde(rename = "_class", default)]
    class: Option<String>,
    #[serde(default)]
    total_count: Option<u64>,
    #[serde(default)]
    skip_count: Option<u64>,
    #[serde(default)]
    fail_count: Option<u64>,
    #[serde(default)]
    skipped: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct BuildRecord {
    /// Build start, in epoch milliseconds
    #[serde(default)]
    timestamp: Option<i64>,
    #[serde(default)]
    duration: Option<i64>,
    // Actions the requester may not see are serialized as `{}` or null
    #[serde(default)]
    actions: Vec<Option<BuildAction>>,
}

#[derive(Debug, Deserialize)]
struct CoverageElement {
    name: String,
    #[serde(default)]
    ratio: f64,
    #[serde(default)]
    denominator: f64,
}

#[derive(Debug, Deserialize)]
struct CoverageResults {
    #[serde(default)]
    elements: Vec<CoverageElement>,
}

#[derive(Debug, Deserialize)]
struct CoverageReport {
    results: Option<CoverageResults>,
}

fn summarize_build(record: BuildRecord) -> BuildSummary {
    let mut summary = BuildSummary {
        finished_at: record
            .timestamp
            .map(|started| started + record.duration.unwrap_or(0))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        ..BuildSummary::default()
    };

    for action in record.actions.into_iter().flatten() {
        match action.class.as_deref() {
            Some(TEST_RESULT_ACTION) => {
                summary.tests = Some(TestCounts {
                    total: action.total_count.unwrap_or(0),
                    skipped: action.skip_count.unwrap_or(0),
                    failed: action.fail_count.unwrap_or(0),
                });
            }
            Some(SONAR_ACTION) => summary.sonar_skipped = Some(action.skipped.unwrap_or(false)),
            _ => {}
        }
    }
    summary
}

fn summarize_coverage(report: CoverageReport) -> Option<CoverageSummary> {
    report
        .results?
        .elements
        .into_iter()
        .find(|element| element.name == LINE_COVERAGE)
        .map(|lines| CoverageSummary {
            line_ratio: lines.ratio,
            lines_analyzed: lines.denominator.max(0.0) as u64,
        })
}

/// JenkinsClient adapter for the Jenkins JSON API
///
/// Authenticates every request with HTTP basic auth.
pub struct JenkinsClient {
    client: reqwest::Client,
    username: String,
    token: String,
    retries: u32,
}

impl JenkinsClient {
    pub fn new(username: String, token: String, http: &HttpSettings) -> Result<Self> {
        Ok(Self {
            client: build_client(http)?,
            username,
            token,
            retries: http.retries,
        })
    }

    async fn send(&self, url: &str) -> Result<reqwest::Response> {
        send_with_retry(self.retries, url, || {
            Ok(self
                .client
                .get(url)
                .basic_auth(&self.username, Some(&self.token))
                .header("Accept", "application/json"))
        })
        .await
    }
}

#[async_trait]
impl CiServerClient for JenkinsClient {
    async fn get_build_summary(&self, build: &LastSuccessfulBuild) -> Result<BuildSummary> {
        let url = build.build_info_url();
        let response = self.send(&url).await?;
        let record: BuildRecord = read_json(response, &url).await?;
        Ok(summarize_build(record))
    }

    async fn get_coverage(&self, build: &LastSuccessfulBuild) -> Result<Option<CoverageSummary>> {
        let url = build.coverage_url();
        let response = self.send(&url).await?;
        // Jobs without the coverage plugin answer 404
        if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!(url = %url, "No coverage report published");
            return Ok(None);
        }
        let report: CoverageReport = read_json(response, &url).await?;
        Ok(summarize_coverage(report))
    }
}
