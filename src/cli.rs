use crate::logging::LogFormat;
use clap::Parser;
use std::path::PathBuf;

/// Audit every repository of one or more organizations and write a JSON compliance report
#[derive(Parser, Debug, Default)]
#[command(name = "sbom-scanner")]
#[command(version)]
#[command(
    about = "Audit build health, coverage and security-scan posture across organizations",
    long_about = None
)]
pub struct Args {
    /// Path to a YAML config file (defaults to ./sbom-scanner.config.yml when present)
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Organizations to scan, comma separated
    #[arg(long, value_delimiter = ',', value_name = "ORG")]
    pub organizations: Vec<String>,

    /// Repository names to restrict the scan to, comma separated
    #[arg(long, value_delimiter = ',', value_name = "REPO")]
    pub repository_whitelist: Vec<String>,

    /// Extra scanners to run after the manifest scanner: veracode, veracode_sca, jenkins
    #[arg(short, long, value_delimiter = ',', value_name = "SCANNER")]
    pub scanners: Vec<String>,

    /// Report file path; `-` writes the report to stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Manifest document looked up at the root of each repository
    #[arg(long, value_name = "FILE")]
    pub manifest_filename: Option<String>,

    /// Dockerfile looked up in each repository
    #[arg(long, value_name = "FILE")]
    pub dockerfile_path: Option<String>,

    /// Source-control web URL
    #[arg(long, value_name = "URL")]
    pub github_url: Option<String>,

    /// Raw-content URL
    #[arg(long, value_name = "URL")]
    pub github_raw_url: Option<String>,

    /// REST API URL (derived from --github-url when omitted)
    #[arg(long, value_name = "URL")]
    pub github_api_url: Option<String>,

    /// Source-control access token
    #[arg(long, env = "GITHUB_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    #[arg(long, env = "JENKINS_USER")]
    pub jenkins_user: Option<String>,

    #[arg(long, env = "JENKINS_TOKEN", hide_env_values = true)]
    pub jenkins_token: Option<String>,

    #[arg(long, env = "VERACODE_API_ID")]
    pub veracode_api_id: Option<String>,

    /// Hex-encoded API secret
    #[arg(long, env = "VERACODE_API_KEY", hide_env_values = true)]
    pub veracode_api_key: Option<String>,

    /// Security platform API host
    #[arg(long, value_name = "HOST")]
    pub veracode_api_host: Option<String>,

    /// Host of the SCA web UI used in profile links
    #[arg(long, value_name = "HOST")]
    pub veracode_sca_ui_host: Option<String>,

    /// SCA workspace holding the organization's projects
    #[arg(long, value_name = "NAME")]
    pub veracode_sca_workspace: Option<String>,

    /// Repositories scanned concurrently within a phase
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    pub concurrency: Option<u16>,

    /// Diagnostic log format
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
