use crate::compliance::domain::{ApplicationQuery, ApplicationRecord, ScaProject, Workspace};
use crate::shared::Result;
use async_trait::async_trait;

/// SecurityPlatformClient port for the security-scanning platform
///
/// Every call is authenticated with a freshly signed request.
/// Paged endpoints are followed to the last page.
#[async_trait]
pub trait SecurityPlatformClient: Send + Sync {
    async fn search_applications(&self, query: &ApplicationQuery)
        -> Result<Vec<ApplicationRecord>>;

    async fn get_workspaces(&self) -> Result<Vec<Workspace>>;

    async fn get_projects(&self, workspace_id: &str) -> Result<Vec<ScaProject>>;

    /// Host of the composition-analysis web UI, used for profile links
    fn sca_ui_host(&self) -> &str;
}
