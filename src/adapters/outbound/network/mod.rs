/// Network adapters for the source-control, CI and security-platform APIs
mod github_client;
mod http;
mod jenkins_client;
mod veracode_client;

pub use github_client::GithubClient;
pub use http::HttpSettings;
pub use jenkins_client::JenkinsClient;
pub use veracode_client::VeracodeClient;
