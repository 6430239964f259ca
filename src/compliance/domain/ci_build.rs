use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

const REDIRECT_SUFFIX: &str = "/display/redirect";

/// Points at the last successful build of a CI job.
///
/// Derived from a commit status target URL of the form
/// `https://<host>/job/<org>/job/<repo>/job/<branch>/<build>/display/redirect`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastSuccessfulBuild {
    job_url: String,
}

impl LastSuccessfulBuild {
    /// Returns `None` when the URL does not look like a job build URL.
    pub fn from_status_url(target_url: &str) -> Option<Self> {
        let without_query = target_url
            .split(['?', '#'])
            .next()
            .unwrap_or(target_url);
        let trimmed = without_query.trim_end_matches('/');
        let trimmed = trimmed.strip_suffix(REDIRECT_SUFFIX).unwrap_or(trimmed);

        let (scheme, rest) = trimmed.split_once("://")?;
        let mut segments: Vec<&str> = rest.split('/').filter(|s| !s.is_empty()).collect();

        // Drop the trailing build number or build alias
        if let Some(last) = segments.last() {
            if last.chars().all(|c| c.is_ascii_digit())
                || matches!(
                    *last,
                    "lastBuild" | "lastSuccessfulBuild" | "lastCompletedBuild" | "lastStableBuild"
                )
            {
                segments.pop();
            }
        }

        // host, then at least one `job/<name>` pair
        if segments.len() < 3 || segments[segments.len() - 2] != "job" {
            return None;
        }

        Some(Self {
            job_url: format!("{}://{}", scheme, segments.join("/")),
        })
    }

    pub fn build_url(&self) -> String {
        format!("{}/lastSuccessfulBuild/", self.job_url)
    }

    pub fn build_info_url(&self) -> String {
        format!("{}api/json", self.build_url())
    }

    pub fn coverage_url(&self) -> String {
        format!("{}cobertura/api/json?depth=2", self.build_url())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TestCounts {
    pub total: u64,
    pub skipped: u64,
    pub failed: u64,
}

/// Facts extracted from the last successful build record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BuildSummary {
    pub finished_at: Option<DateTime<Utc>>,
    pub tests: Option<TestCounts>,
    /// `Some(skipped)` when a code-quality analysis action is attached
    pub sonar_skipped: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CoverageSummary {
    pub line_ratio: f64,
    pub lines_analyzed: u64,
}

/// CI health fields reported per repository.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct CiBuildPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_successful_build_date: Option<String>,
    pub test_results_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_total_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_skip_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_fail_count: Option<u64>,
    pub sonar_available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sonar_skipped: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_percent: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coverage_lines_analyzed: Option<u64>,
}

impl CiBuildPayload {
    pub fn apply_build(&mut self, build: &BuildSummary) {
        self.last_successful_build_date = build
            .finished_at
            .map(|t| t.to_rfc3339_opts(SecondsFormat::Millis, true));

        if let Some(tests) = build.tests {
            self.test_results_available = tests.total > 0;
            self.test_total_count = Some(tests.total);
            self.test_skip_count = Some(tests.skipped);
            self.test_fail_count = Some(tests.failed);
        }

        if let Some(skipped) = build.sonar_skipped {
            self.sonar_available = true;
            self.sonar_skipped = Some(skipped);
        }
    }

    pub fn apply_coverage(&mut self, coverage: &CoverageSummary) {
        self.coverage_percent = Some(coverage.line_ratio);
        self.coverage_lines_analyzed = Some(coverage.lines_analyzed);
    }
}
