use serde::Serialize;

/// Static-analysis posture of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum StaticScanStatus {
    Missing,
    Compliant,
    Outdated,
    Noncompliant,
}

/// Software-composition-analysis posture of one component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CompositionScanStatus {
    Missing,
    #[serde(rename = "OK")]
    Ok,
    Outdated,
    Vulnerable,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticComponentRecord {
    pub component_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veracode_app_name: Option<String>,
    /// Exact application name on the platform, which may differ in case
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veracode_app_name_actual: Option<String>,
    pub veracode_status: StaticScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_static_scan_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_static_scan_result: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_compliance_check: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub veracode_app_profile_url: Option<String>,
}

impl StaticComponentRecord {
    pub fn missing(component_name: impl Into<String>, app_name: Option<String>) -> Self {
        Self {
            component_name: component_name.into(),
            veracode_app_name: app_name,
            veracode_app_name_actual: None,
            veracode_status: StaticScanStatus::Missing,
            last_static_scan_date: None,
            last_static_scan_result: None,
            last_compliance_check: None,
            veracode_app_profile_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionComponentRecord {
    pub component_name: String,
    pub status: CompositionScanStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_scan_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub library_issues_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_issues_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vulnerability_issue_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_url: Option<String>,
}

impl CompositionComponentRecord {
    pub fn missing(component_name: impl Into<String>) -> Self {
        Self {
            component_name: component_name.into(),
            status: CompositionScanStatus::Missing,
            last_scan_date: None,
            library_issues_count: None,
            license_issues_count: None,
            vulnerability_issue_count: None,
            profile_url: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct StaticScanPayload {
    pub components: Vec<StaticComponentRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct CompositionScanPayload {
    pub components: Vec<CompositionComponentRecord>,
}
