use async_trait::async_trait;
use std::sync::Mutex;
use sbom_scanner::prelude::*;

/// Mock CiServerClient for testing that records requested URLs
#[derive(Default)]
pub struct MockCiServer {
    pub build: Option<BuildSummary>,
    pub coverage: Option<CoverageSummary>,
    pub requested: Mutex<Vec<String>>,
}

impl MockCiServer {
    pub fn new(build: BuildSummary, coverage: Option<CoverageSummary>) -> Self {
        Self {
            build: Some(build),
            coverage,
            requested: Mutex::new(Vec::new()),
        }
    }

    pub fn requested_urls(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl CiServerClient for MockCiServer {
    async fn get_build_summary(&self, build: &LastSuccessfulBuild) -> Result<BuildSummary> {
        let url = build.build_info_url();
        self.requested.lock().unwrap().push(url.clone());
        self.build
            .clone()
            .ok_or_else(|| anyhow::anyhow!("{} returned status 404 Not Found", url))
    }

    async fn get_coverage(&self, build: &LastSuccessfulBuild) -> Result<Option<CoverageSummary>> {
        self.requested.lock().unwrap().push(build.coverage_url());
        Ok(self.coverage)
    }
}
