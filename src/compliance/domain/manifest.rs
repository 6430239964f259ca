use super::repository::{BranchGovernance, CommitStatus};
use crate::shared::Result;
use anyhow::Context;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

/// Kind of a declared or inferred technology.
///
/// Manifests in the wild use more than the two well-known kinds, so anything
/// else is kept verbatim instead of rejecting the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TechnologyKind {
    Language,
    Framework,
    Other(String),
}

impl From<String> for TechnologyKind {
    fn from(value: String) -> Self {
        match value.to_lowercase().as_str() {
            "language" => TechnologyKind::Language,
            "framework" => TechnologyKind::Framework,
            _ => TechnologyKind::Other(value),
        }
    }
}

impl From<TechnologyKind> for String {
    fn from(kind: TechnologyKind) -> Self {
        match kind {
            TechnologyKind::Language => "language".to_string(),
            TechnologyKind::Framework => "framework".to_string(),
            TechnologyKind::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Technology {
    #[serde(rename = "type")]
    pub kind: TechnologyKind,
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, deserialize_with = "scalar_string")]
    pub version: String,
}

impl Technology {
    pub fn language(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            kind: TechnologyKind::Language,
            name: name.into(),
            version: version.into(),
        }
    }
}

/// One deployable unit declared in a repository manifest.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentManifest {
    #[serde(default, deserialize_with = "scalar_string")]
    pub component_key: String,
    #[serde(deserialize_with = "scalar_string")]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root_directory: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub component_id: Option<String>,
    /// Application name on the static-analysis platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veracode_app: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_relic_app: Option<String>,
    /// Path below the repository used as the SCA project name suffix
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub veracode_sca_root: Option<String>,
    #[serde(default)]
    pub technologies: Vec<Technology>,
}

impl ComponentManifest {
    /// Declared static-analysis application name, ignoring blank values.
    pub fn security_app_name(&self) -> Option<&str> {
        self.veracode_app
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// SCA project name: `<owner>/<repo>[/<sca root>]`.
    pub fn sca_project_name(&self, repository_full_name: &str) -> String {
        match self
            .veracode_sca_root
            .as_deref()
            .map(|root| root.trim_matches('/'))
            .filter(|root| !root.is_empty())
        {
            Some(root) => format!("{}/{}", repository_full_name, root),
            None => repository_full_name.to_string(),
        }
    }
}

/// The per-repository declarative manifest document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RepositoryManifest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_type: Option<String>,
    #[serde(default)]
    pub components: Vec<ComponentManifest>,
    /// Top-level keys this tool does not interpret, carried into the report as-is.
    #[serde(flatten, serialize_with = "serialize_extra")]
    pub extra: BTreeMap<String, serde_yaml_ng::Value>,
}

fn serialize_extra<S>(
    extra: &BTreeMap<String, serde_yaml_ng::Value>,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.collect_map(extra.iter().map(|(key, value)| (key, yaml_to_json(value))))
}

/// Converts YAML into JSON, rendering non-string mapping keys as text.
fn yaml_to_json(value: &serde_yaml_ng::Value) -> serde_json::Value {
    use serde_json::Value as Json;
    use serde_yaml_ng::Value as Yaml;

    match value {
        Yaml::Null => Json::Null,
        Yaml::Bool(b) => Json::Bool(*b),
        Yaml::Number(n) => {
            if let Some(i) = n.as_i64() {
                Json::from(i)
            } else if let Some(u) = n.as_u64() {
                Json::from(u)
            } else {
                n.as_f64()
                    .and_then(serde_json::Number::from_f64)
                    .map_or(Json::Null, Json::Number)
            }
        }
        Yaml::String(s) => Json::String(s.clone()),
        Yaml::Sequence(items) => Json::Array(items.iter().map(yaml_to_json).collect()),
        Yaml::Mapping(map) => Json::Object(
            map.iter()
                .map(|(key, value)| (yaml_key(key), yaml_to_json(value)))
                .collect(),
        ),
        Yaml::Tagged(tagged) => yaml_to_json(&tagged.value),
    }
}

fn yaml_key(key: &serde_yaml_ng::Value) -> String {
    use serde_yaml_ng::Value as Yaml;

    match key {
        Yaml::String(s) => s.clone(),
        Yaml::Number(n) => n.to_string(),
        Yaml::Bool(b) => b.to_string(),
        Yaml::Null => "null".to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|text| text.trim_end().to_string())
            .unwrap_or_default(),
    }
}

impl RepositoryManifest {
    pub fn from_yaml(content: &str) -> Result<Self> {
        // An empty document deserializes to unit, not a mapping
        if content.trim().is_empty() {
            anyhow::bail!("Manifest document is empty");
        }
        serde_yaml_ng::from_str(content).context("Failed to parse manifest document")
    }
}

/// Base image information inferred from a container build file.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DockerfileInfo {
    pub base_image: String,
    pub base_version: String,
    pub technologies: Vec<Technology>,
}

/// Source-control facts about a repository, as reported under `github`.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct GithubInfo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub master_status: Option<CommitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_pr_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pr_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_private: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub has_main_branch_protection: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_branch_min_approvals: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_branch_req_status_checks: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub main_branch_allow_force: Option<bool>,
}

impl GithubInfo {
    pub fn apply_governance(&mut self, governance: BranchGovernance) {
        self.has_main_branch_protection = Some(governance.has_protection);
        self.main_branch_min_approvals = Some(governance.min_approvals);
        self.main_branch_req_status_checks = Some(governance.requires_status_checks);
        self.main_branch_allow_force = Some(governance.allows_force_push);
    }
}

/// Scanner-specific part of the manifest fragment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ManifestPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest: Option<RepositoryManifest>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dockerfile: Option<DockerfileInfo>,
    pub github: GithubInfo,
}

impl ManifestPayload {
    /// Declared components; empty when no manifest document was found.
    pub fn components(&self) -> &[ComponentManifest] {
        self.manifest
            .as_ref()
            .map(|m| m.components.as_slice())
            .unwrap_or(&[])
    }

    pub fn commit_status_target_url(&self) -> Option<&str> {
        self.github
            .master_status
            .as_ref()
            .and_then(|status| status.commit_status_target_url.as_deref())
    }
}

/// YAML turns `version: 3.9` into a float; accept any scalar as text.
fn scalar_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Scalar {
        Text(String),
        Integer(i64),
        Float(f64),
        Flag(bool),
        Null(()),
    }

    Ok(match Scalar::deserialize(deserializer)? {
        Scalar::Text(s) => s,
        Scalar::Integer(i) => i.to_string(),
        Scalar::Float(f) => f.to_string(),
        Scalar::Flag(b) => b.to_string(),
        Scalar::Null(()) => String::new(),
    })
}
