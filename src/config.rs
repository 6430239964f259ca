//! Configuration file support for sbom-scanner.
//!
//! Provides YAML-based configuration through `sbom-scanner.config.yml` files
//! and resolves the effective settings of a run. Command-line flags and
//! environment variables win over the file, which wins over built-in defaults.

use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::adapters::outbound::network::HttpSettings;
use crate::application::dto::{ScanRequest, ScannerSettings};
use crate::application::scanners::ScannerKind;
use crate::cli::Args;
use crate::shared::error::ScanError;
use crate::shared::Result;

pub const CONFIG_FILENAME: &str = "sbom-scanner.config.yml";

const DEFAULT_GITHUB_URL: &str = "https://github.com";
const DEFAULT_GITHUB_RAW_URL: &str = "https://raw.githubusercontent.com";
const PUBLIC_GITHUB_API_URL: &str = "https://api.github.com";
const DEFAULT_OUTPUT: &str = "sbom.json";
const DEFAULT_VERACODE_API_HOST: &str = "api.veracode.com";
const DEFAULT_SCA_UI_HOST: &str = "sca.analysiscenter.veracode.com";
const DEFAULT_CONCURRENCY: usize = 4;

/// Top-level configuration file schema.
///
/// List values accept either a YAML sequence or a comma-separated string.
#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default, deserialize_with = "string_list")]
    pub organizations: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_list")]
    pub repository_whitelist: Option<Vec<String>>,
    #[serde(default, deserialize_with = "string_list")]
    pub scanners: Option<Vec<String>>,
    pub output: Option<PathBuf>,
    pub manifest_filename: Option<String>,
    pub dockerfile_path: Option<String>,
    pub github_url: Option<String>,
    pub github_raw_url: Option<String>,
    pub github_api_url: Option<String>,
    pub token: Option<String>,
    pub jenkins_user: Option<String>,
    pub jenkins_token: Option<String>,
    pub veracode_api_id: Option<String>,
    pub veracode_api_key: Option<String>,
    pub veracode_api_host: Option<String>,
    pub veracode_sca_ui_host: Option<String>,
    pub veracode_sca_workspace: Option<String>,
    pub veracode_profile_base_url: Option<String>,
    pub concurrency: Option<usize>,
    pub http_timeout_secs: Option<u64>,
    pub http_retries: Option<u32>,
    /// Captures unknown fields for warnings.
    #[serde(flatten)]
    pub unknown_fields: BTreeMap<String, serde_yaml_ng::Value>,
}

fn string_list<'de, D>(deserializer: D) -> std::result::Result<Option<Vec<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum List {
        Many(Vec<String>),
        Joined(String),
    }

    Ok(Option::<List>::deserialize(deserializer)?.map(|list| match list {
        List::Many(items) => clean_list(items),
        List::Joined(joined) => split_list(&joined),
    }))
}

/// Splits a comma-separated value, dropping blank entries.
pub fn split_list(value: &str) -> Vec<String> {
    clean_list(value.split(',').map(str::to_string))
}

fn clean_list(items: impl IntoIterator<Item = String>) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

/// Load config from an explicit path. Returns an error if the file is not found.
pub fn load_config_from_path(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path).map_err(|e| ScanError::ConfigFile {
        path: path.to_path_buf(),
        details: format!("{}\n\n💡 Hint: Check that the file exists and is readable.", e),
    })?;

    let config: ConfigFile =
        serde_yaml_ng::from_str(&content).map_err(|e| ScanError::ConfigFile {
            path: path.to_path_buf(),
            details: format!(
                "{}\n\n💡 Hint: Ensure the file contains valid YAML syntax.",
                e
            ),
        })?;

    warn_unknown_fields(&config);
    tracing::debug!(path = %path.display(), "Loaded config file");

    Ok(config)
}

/// Auto-discover config in a directory. Returns `None` silently if not found.
pub fn discover_config(dir: &Path) -> Result<Option<ConfigFile>> {
    let config_path = dir.join(CONFIG_FILENAME);

    if !config_path.exists() {
        return Ok(None);
    }

    let config = load_config_from_path(&config_path)?;
    tracing::info!(path = %config_path.display(), "Auto-discovered config file");
    Ok(Some(config))
}

/// Warn about unknown fields in the config file.
fn warn_unknown_fields(config: &ConfigFile) {
    for key in config.unknown_fields.keys() {
        tracing::warn!(key = %key, "Unknown config field will be ignored");
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GithubSettings {
    pub url: String,
    pub raw_url: String,
    pub api_url: String,
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JenkinsCredentials {
    pub user: String,
    pub token: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VeracodeSettings {
    pub api_id: String,
    pub api_key: String,
    pub api_host: String,
    pub sca_ui_host: String,
}

/// Effective settings of one run
#[derive(Debug, Clone)]
pub struct Settings {
    pub organizations: Vec<String>,
    pub repository_whitelist: Vec<String>,
    pub scanners: Vec<ScannerKind>,
    pub output: PathBuf,
    pub concurrency: usize,
    pub github: GithubSettings,
    /// Present only when both user and token are set
    pub jenkins: Option<JenkinsCredentials>,
    /// Present only when both API id and key are set
    pub veracode: Option<VeracodeSettings>,
    pub scanner_settings: ScannerSettings,
    pub http: HttpSettings,
}

/// Picks the first non-blank value.
fn pick(cli: Option<&String>, file: Option<&String>) -> Option<String> {
    cli.into_iter()
        .chain(file)
        .map(|value| value.trim())
        .find(|value| !value.is_empty())
        .map(str::to_string)
}

fn pick_list(cli: &[String], file: Option<&Vec<String>>) -> Vec<String> {
    let cli = clean_list(cli.iter().cloned());
    if !cli.is_empty() {
        return cli;
    }
    file.cloned().unwrap_or_default()
}

/// REST API base for a source-control web URL
///
/// The public host has a dedicated API host; self-hosted installations serve
/// the API under `/api/v3`.
pub fn derive_api_url(github_url: &str) -> String {
    let trimmed = github_url.trim_end_matches('/');
    let host = trimmed
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);
    if host == "github.com" || host == "www.github.com" {
        PUBLIC_GITHUB_API_URL.to_string()
    } else {
        format!("{}/api/v3", trimmed)
    }
}

fn parse_scanners(names: &[String]) -> Result<Vec<ScannerKind>> {
    names
        .iter()
        .map(|name| ScannerKind::from_str(name).map_err(anyhow::Error::from))
        .collect()
}

impl Settings {
    /// Resolves the effective settings from flags, environment and config file
    ///
    /// # Errors
    /// Returns `ScanError::UnknownScanner` for an unrecognized scanner name
    pub fn resolve(args: &Args, file: Option<ConfigFile>) -> Result<Self> {
        let file = file.unwrap_or_default();

        let scanners = parse_scanners(&pick_list(&args.scanners, file.scanners.as_ref()))?;

        let github_url = pick(args.github_url.as_ref(), file.github_url.as_ref())
            .unwrap_or_else(|| DEFAULT_GITHUB_URL.to_string());
        let github = GithubSettings {
            raw_url: pick(args.github_raw_url.as_ref(), file.github_raw_url.as_ref())
                .unwrap_or_else(|| DEFAULT_GITHUB_RAW_URL.to_string()),
            api_url: pick(args.github_api_url.as_ref(), file.github_api_url.as_ref())
                .unwrap_or_else(|| derive_api_url(&github_url)),
            token: pick(args.token.as_ref(), file.token.as_ref()),
            url: github_url,
        };

        let jenkins = match (
            pick(args.jenkins_user.as_ref(), file.jenkins_user.as_ref()),
            pick(args.jenkins_token.as_ref(), file.jenkins_token.as_ref()),
        ) {
            (Some(user), Some(token)) => Some(JenkinsCredentials { user, token }),
            _ => None,
        };

        let veracode = match (
            pick(args.veracode_api_id.as_ref(), file.veracode_api_id.as_ref()),
            pick(args.veracode_api_key.as_ref(), file.veracode_api_key.as_ref()),
        ) {
            (Some(api_id), Some(api_key)) => Some(VeracodeSettings {
                api_id,
                api_key,
                api_host: pick(args.veracode_api_host.as_ref(), file.veracode_api_host.as_ref())
                    .unwrap_or_else(|| DEFAULT_VERACODE_API_HOST.to_string()),
                sca_ui_host: pick(
                    args.veracode_sca_ui_host.as_ref(),
                    file.veracode_sca_ui_host.as_ref(),
                )
                .unwrap_or_else(|| DEFAULT_SCA_UI_HOST.to_string()),
            }),
            _ => None,
        };

        let defaults = ScannerSettings::default();
        let scanner_settings = ScannerSettings {
            manifest_filename: pick(
                args.manifest_filename.as_ref(),
                file.manifest_filename.as_ref(),
            )
            .unwrap_or(defaults.manifest_filename),
            dockerfile_path: pick(args.dockerfile_path.as_ref(), file.dockerfile_path.as_ref())
                .unwrap_or(defaults.dockerfile_path),
            static_profile_base_url: pick(None, file.veracode_profile_base_url.as_ref())
                .unwrap_or(defaults.static_profile_base_url),
            sca_workspace: pick(
                args.veracode_sca_workspace.as_ref(),
                file.veracode_sca_workspace.as_ref(),
            ),
        };

        let http_defaults = HttpSettings::default();
        let http = HttpSettings {
            timeout: file
                .http_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(http_defaults.timeout),
            retries: file.http_retries.unwrap_or(http_defaults.retries),
        };

        Ok(Self {
            organizations: pick_list(&args.organizations, file.organizations.as_ref()),
            repository_whitelist: pick_list(
                &args.repository_whitelist,
                file.repository_whitelist.as_ref(),
            ),
            scanners,
            output: args
                .output
                .clone()
                .or(file.output)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT)),
            concurrency: args
                .concurrency
                .map(usize::from)
                .or(file.concurrency)
                .unwrap_or(DEFAULT_CONCURRENCY),
            github,
            jenkins,
            veracode,
            scanner_settings,
            http,
        })
    }

    pub fn scan_request(&self) -> ScanRequest {
        ScanRequest::new(
            self.organizations.clone(),
            self.repository_whitelist.clone(),
            self.scanners.clone(),
            self.concurrency,
        )
    }
}
