/// ScannerSettings - Per-scanner options resolved from the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannerSettings {
    /// Path of the manifest document inside each repository
    pub manifest_filename: String,
    pub dockerfile_path: String,
    /// Prefix of static-analysis application profile links
    pub static_profile_base_url: String,
    /// Name of the composition-analysis workspace holding the projects
    pub sca_workspace: Option<String>,
}

impl Default for ScannerSettings {
    fn default() -> Self {
        Self {
            manifest_filename: "manifest.yml".to_string(),
            dockerfile_path: "Dockerfile".to_string(),
            static_profile_base_url: "https://analysiscenter.veracode.com/auth/index.jsp#"
                .to_string(),
            sca_workspace: None,
        }
    }
}
