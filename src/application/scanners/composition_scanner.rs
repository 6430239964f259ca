use super::scanner::{Scanner, ScannerKind};
use crate::compliance::domain::{
    CompositionComponentRecord, CompositionScanPayload, FragmentPayload, ManifestPayload,
    RepositoryRef, ScaProject, ScanFragment, ScannerMessage, Workspace,
};
use crate::compliance::policies::{classify_composition_scan, parse_remote_timestamp, Cutoff};
use crate::ports::outbound::SecurityPlatformClient;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

enum WorkspaceState {
    Pending,
    Unresolved(String),
    Resolved {
        workspace: Workspace,
        projects: Vec<ScaProject>,
    },
}

/// CompositionScanner reports dependency-scan posture of each declared component
///
/// The configured workspace and its project list are resolved once in
/// `initialize`; scans only read the resolved state. When resolution fails
/// every component is reported `Missing` and the fragment carries the reason.
pub struct CompositionScanner {
    platform: Arc<dyn SecurityPlatformClient>,
    cutoff: Cutoff,
    workspace_name: Option<String>,
    state: WorkspaceState,
}

impl CompositionScanner {
    pub fn new(
        platform: Arc<dyn SecurityPlatformClient>,
        cutoff: Cutoff,
        workspace_name: Option<String>,
    ) -> Self {
        Self {
            platform,
            cutoff,
            workspace_name,
            state: WorkspaceState::Pending,
        }
    }

    async fn resolve_workspace(&self, name: &str) -> std::result::Result<WorkspaceState, String> {
        let workspaces = self
            .platform
            .get_workspaces()
            .await
            .map_err(|e| format!("Failed to retrieve workspaces: {:#}", e))?;

        let workspace = workspaces
            .into_iter()
            .find(|w| w.name == name)
            .ok_or_else(|| format!("Workspace '{}' not found", name))?;

        let projects = self
            .platform
            .get_projects(&workspace.id)
            .await
            .map_err(|e| format!("Failed to retrieve projects of workspace '{}': {:#}", name, e))?;

        tracing::info!(
            workspace = %workspace.name,
            projects = projects.len(),
            "Resolved composition-analysis workspace"
        );
        Ok(WorkspaceState::Resolved {
            workspace,
            projects,
        })
    }

    fn build_record(
        &self,
        component_name: &str,
        workspace: &Workspace,
        project: &ScaProject,
    ) -> CompositionComponentRecord {
        // A project that was never scanned counts as long outdated
        let scanned_at = project
            .last_scan_date
            .as_deref()
            .and_then(parse_remote_timestamp)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        CompositionComponentRecord {
            component_name: component_name.to_string(),
            status: classify_composition_scan(
                &self.cutoff,
                Some(scanned_at),
                project.vulnerability_issues_count,
            ),
            last_scan_date: project.last_scan_date.clone(),
            library_issues_count: Some(project.library_issues_count),
            license_issues_count: Some(project.license_issues_count),
            vulnerability_issue_count: Some(project.vulnerability_issues_count),
            profile_url: Some(format!(
                "https://{}/workspaces/{}/projects/{}/issues",
                self.platform.sca_ui_host(),
                workspace.site_id,
                project.site_id
            )),
        }
    }
}

#[async_trait]
impl Scanner for CompositionScanner {
    fn kind(&self) -> ScannerKind {
        ScannerKind::Composition
    }

    async fn initialize(&mut self) -> Result<()> {
        self.state = match self.workspace_name.as_deref() {
            None => WorkspaceState::Unresolved(
                "No composition-analysis workspace configured".to_string(),
            ),
            Some(name) => match self.resolve_workspace(name).await {
                Ok(state) => state,
                Err(reason) => {
                    tracing::warn!(scanner = self.name(), "{}", reason);
                    WorkspaceState::Unresolved(reason)
                }
            },
        };
        Ok(())
    }

    fn empty_fragment(&self) -> ScanFragment {
        ScanFragment::new(
            self.name(),
            FragmentPayload::Composition(CompositionScanPayload::default()),
        )
    }

    async fn scan(
        &self,
        repo: &RepositoryRef,
        manifest: Option<&ManifestPayload>,
    ) -> Result<ScanFragment> {
        let declared = manifest.map(|m| m.components()).unwrap_or_default();
        let mut messages = Vec::new();

        let components = match &self.state {
            WorkspaceState::Resolved {
                workspace,
                projects,
            } => declared
                .iter()
                .map(|component| {
                    let project_name = component.sca_project_name(repo.full_name());
                    match projects.iter().find(|p| p.name == project_name) {
                        Some(project) => self.build_record(&component.name, workspace, project),
                        None => CompositionComponentRecord::missing(&component.name),
                    }
                })
                .collect(),
            WorkspaceState::Unresolved(reason) => {
                if !declared.is_empty() {
                    messages.push(ScannerMessage::warning(reason.clone()));
                }
                declared
                    .iter()
                    .map(|component| CompositionComponentRecord::missing(&component.name))
                    .collect()
            }
            WorkspaceState::Pending => {
                anyhow::bail!("Scanner '{}' was not initialized", self.name())
            }
        };

        Ok(ScanFragment::new(
            self.name(),
            FragmentPayload::Composition(CompositionScanPayload { components }),
        )
        .with_messages(messages))
    }
}
