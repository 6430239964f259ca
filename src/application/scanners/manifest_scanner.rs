use super::scanner::{Scanner, ScannerKind};
use crate::compliance::domain::{
    BranchGovernance, FragmentPayload, ManifestPayload, RepositoryManifest, RepositoryRef,
    ScanFragment, ScannerMessage,
};
use crate::compliance::services::DockerfileInspector;
use crate::ports::outbound::SourceControlClient;
use crate::shared::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// ManifestScanner discovers a repository's inventory and governance posture
///
/// The five lookups (manifest document, Dockerfile, default-branch status,
/// pull requests, branch protection) are guarded independently: each failure
/// becomes one warning and the remaining fields are still reported.
pub struct ManifestScanner {
    source_control: Arc<dyn SourceControlClient>,
    manifest_path: String,
    dockerfile_path: String,
}

impl ManifestScanner {
    pub fn new(
        source_control: Arc<dyn SourceControlClient>,
        manifest_path: impl Into<String>,
        dockerfile_path: impl Into<String>,
    ) -> Self {
        Self {
            source_control,
            manifest_path: manifest_path.into(),
            dockerfile_path: dockerfile_path.into(),
        }
    }

    fn warn(&self, repo: &RepositoryRef, messages: &mut Vec<ScannerMessage>, message: String) {
        tracing::warn!(repo = %repo.full_name(), scanner = self.name(), "{}", message);
        messages.push(ScannerMessage::warning(message));
    }
}

#[async_trait]
impl Scanner for ManifestScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Manifest
    }

    fn empty_fragment(&self) -> ScanFragment {
        ScanFragment::new(
            self.name(),
            FragmentPayload::Manifest(ManifestPayload::default()),
        )
    }

    async fn scan(
        &self,
        repo: &RepositoryRef,
        _manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment> {
        let client = self.source_control.as_ref();
        let (manifest_file, dockerfile, status, pull_requests, protection) = futures::join!(
            client.get_raw_file(repo, &self.manifest_path),
            client.get_raw_file(repo, &self.dockerfile_path),
            client.get_latest_commit_status(repo),
            client.get_pull_request_counts(repo),
            client.get_branch_protection(repo),
        );

        let mut payload = ManifestPayload::default();
        let mut messages = Vec::new();
        payload.github.is_private = Some(repo.is_private());

        match manifest_file {
            Ok(Some(content)) => match RepositoryManifest::from_yaml(&content) {
                Ok(manifest) => payload.manifest = Some(manifest),
                Err(e) => self.warn(repo, &mut messages, format!("{:#}", e)),
            },
            Ok(None) => self.warn(repo, &mut messages, "Manifest document not found".to_string()),
            Err(e) => self.warn(
                repo,
                &mut messages,
                format!("Failed to retrieve manifest document: {:#}", e),
            ),
        }

        match dockerfile {
            Ok(Some(content)) => match DockerfileInspector::inspect(&content) {
                Some(info) => payload.dockerfile = Some(info),
                None => self.warn(
                    repo,
                    &mut messages,
                    "Dockerfile has no FROM directive".to_string(),
                ),
            },
            Ok(None) => self.warn(repo, &mut messages, "Dockerfile not found".to_string()),
            Err(e) => self.warn(
                repo,
                &mut messages,
                format!("Failed to retrieve Dockerfile: {:#}", e),
            ),
        }

        match status {
            Ok(status) => payload.github.master_status = Some(status),
            Err(e) => self.warn(
                repo,
                &mut messages,
                format!("Failed to retrieve master commit status: {:#}", e),
            ),
        }

        match pull_requests {
            Ok(counts) => {
                payload.github.open_pr_count = Some(counts.open);
                payload.github.total_pr_count = Some(counts.total);
            }
            Err(e) => self.warn(
                repo,
                &mut messages,
                format!("Failed to retrieve pull request count: {:#}", e),
            ),
        }

        match protection {
            Ok(protection) => payload
                .github
                .apply_governance(BranchGovernance::derive(protection.as_ref())),
            Err(e) => self.warn(
                repo,
                &mut messages,
                format!("Failed to retrieve branch protection information: {:#}", e),
            ),
        }

        Ok(ScanFragment::new(self.name(), FragmentPayload::Manifest(payload)).with_messages(messages))
    }
}
