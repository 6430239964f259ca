use super::scanner::{Scanner, ScannerKind};
use crate::compliance::domain::{
    CiBuildPayload, FragmentPayload, LastSuccessfulBuild, ManifestPayload, RepositoryRef,
    ScanFragment, ScannerMessage,
};
use crate::ports::outbound::CiServerClient;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// CiBuildScanner reports build, test and coverage health from the CI host
///
/// The job is found through the target URL of the default branch's commit
/// status, so this scanner depends on the manifest fragment.
pub struct CiBuildScanner {
    ci_server: Arc<dyn CiServerClient>,
}

impl CiBuildScanner {
    pub fn new(ci_server: Arc<dyn CiServerClient>) -> Self {
        Self { ci_server }
    }
}

#[async_trait]
impl Scanner for CiBuildScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::CiBuild
    }

    fn empty_fragment(&self) -> ScanFragment {
        ScanFragment::new(self.name(), FragmentPayload::CiBuild(CiBuildPayload::default()))
    }

    async fn scan(
        &self,
        repo: &RepositoryRef,
        manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment> {
        let mut fragment = self.empty_fragment();

        let build = manifest
            .and_then(|m| m.commit_status_target_url())
            .filter(|url| url.contains("/job/"))
            .and_then(LastSuccessfulBuild::from_status_url);
        let Some(build) = build else {
            tracing::info!(repo = %repo.full_name(), "No CI job url available");
            fragment.push_message(ScannerMessage::info("No CI job url available"));
            return Ok(fragment);
        };

        let (summary, coverage) = futures::join!(
            self.ci_server.get_build_summary(&build),
            self.ci_server.get_coverage(&build),
        );

        let mut payload = CiBuildPayload::default();
        let mut messages = Vec::new();

        match summary {
            Ok(summary) => payload.apply_build(&summary),
            Err(e) => messages.push(ScannerMessage::warning(format!(
                "Failed to retrieve build data from {}: {:#}",
                build.build_info_url(),
                e
            ))),
        }

        match coverage {
            Ok(Some(coverage)) => payload.apply_coverage(&coverage),
            Ok(None) => {}
            Err(e) => messages.push(ScannerMessage::warning(format!(
                "Failed to retrieve coverage data from {}: {:#}",
                build.coverage_url(),
                e
            ))),
        }

        for message in &messages {
            tracing::warn!(repo = %repo.full_name(), scanner = self.name(), "{}", message.message);
        }

        Ok(ScanFragment::new(self.name(), FragmentPayload::CiBuild(payload)).with_messages(messages))
    }
}
