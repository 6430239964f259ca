use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use sbom_scanner::prelude::*;

/// Mock SecurityPlatformClient for testing
#[derive(Default)]
pub struct MockSecurityPlatform {
    pub applications: Vec<ApplicationRecord>,
    pub workspaces: Vec<Workspace>,
    pub projects: Vec<(String, ScaProject)>,
    pub should_fail: bool,
    pub search_calls: AtomicUsize,
    pub workspace_calls: AtomicUsize,
}

impl MockSecurityPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_application(mut self, application: ApplicationRecord) -> Self {
        self.applications.push(application);
        self
    }

    pub fn with_workspace(mut self, id: &str, name: &str, site_id: &str) -> Self {
        self.workspaces.push(Workspace {
            id: id.to_string(),
            name: name.to_string(),
            site_id: site_id.to_string(),
        });
        self
    }

    pub fn with_project(mut self, workspace_id: &str, project: ScaProject) -> Self {
        self.projects.push((workspace_id.to_string(), project));
        self
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub fn workspace_call_count(&self) -> usize {
        self.workspace_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SecurityPlatformClient for MockSecurityPlatform {
    async fn search_applications(&self, query: &ApplicationQuery) -> Result<Vec<ApplicationRecord>> {
        self.search_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("applications API returned status 401 Unauthorized");
        }
        let needle = query.name.as_deref().unwrap_or_default().to_lowercase();
        Ok(self
            .applications
            .iter()
            .filter(|app| app.profile.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>> {
        self.workspace_calls.fetch_add(1, Ordering::SeqCst);
        if self.should_fail {
            anyhow::bail!("workspaces API returned status 401 Unauthorized");
        }
        Ok(self.workspaces.clone())
    }

    async fn get_projects(&self, workspace_id: &str) -> Result<Vec<ScaProject>> {
        Ok(self
            .projects
            .iter()
            .filter(|(id, _)| id == workspace_id)
            .map(|(_, project)| project.clone())
            .collect())
    }

    fn sca_ui_host(&self) -> &str {
        "sca.analysiscenter.veracode.com"
    }
}
