//! Records returned by the security-scanning platform.
//!
//! Shapes follow the platform's JSON; every field the scanners do not strictly
//! need is defaulted so partial payloads still deserialize.

use crate::compliance::policies::parse_remote_timestamp;
use serde::{Deserialize, Deserializer};

pub const STATIC_SCAN_TYPE: &str = "STATIC";

/// Search parameters for the application listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationQuery {
    /// Wildcard name match on the platform side
    pub name: Option<String>,
}

impl ApplicationQuery {
    pub fn by_name(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PolicyResult {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub policy_compliance_status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationProfile {
    pub name: String,
    #[serde(default)]
    pub policies: Vec<PolicyResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationScan {
    #[serde(default)]
    pub scan_type: String,
    #[serde(default)]
    pub modified_date: String,
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApplicationRecord {
    #[serde(default)]
    pub guid: String,
    pub profile: ApplicationProfile,
    #[serde(default)]
    pub app_profile_url: String,
    #[serde(default)]
    pub last_policy_compliance_check_date: Option<String>,
    #[serde(default)]
    pub scans: Vec<ApplicationScan>,
}

impl ApplicationRecord {
    /// Most recently modified static scan; unparsable dates rank last.
    pub fn latest_static_scan(&self) -> Option<&ApplicationScan> {
        self.scans
            .iter()
            .filter(|scan| scan.scan_type.eq_ignore_ascii_case(STATIC_SCAN_TYPE))
            .max_by_key(|scan| parse_remote_timestamp(&scan.modified_date))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Workspace {
    #[serde(deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "id_string")]
    pub site_id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ScaProject {
    #[serde(default, deserialize_with = "id_string")]
    pub id: String,
    pub name: String,
    #[serde(default, deserialize_with = "id_string")]
    pub site_id: String,
    #[serde(default)]
    pub last_scan_date: Option<String>,
    #[serde(default)]
    pub library_issues_count: u64,
    #[serde(default)]
    pub license_issues_count: u64,
    #[serde(default)]
    pub vulnerability_issues_count: u64,
}

/// Identifiers come back as strings on some endpoints and numbers on others.
fn id_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
