use crate::shared::Result;
use anyhow::Context;
use serde::de::DeserializeOwned;
use std::time::Duration;

/// Base delay between retries; attempt `n` waits `n` times this.
const RETRY_BASE_DELAY_MS: u64 = 250;

/// Transport options shared by every HTTP adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpSettings {
    pub timeout: Duration,
    /// Extra attempts after the first for transport errors and 5xx responses
    pub retries: u32,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            retries: 2,
        }
    }
}

/// Builds the client used by one adapter.
pub fn build_client(settings: &HttpSettings) -> Result<reqwest::Client> {
    let user_agent = format!("sbom-scanner/{}", env!("CARGO_PKG_VERSION"));
    reqwest::Client::builder()
        .timeout(settings.timeout)
        .user_agent(user_agent)
        .build()
        .context("Failed to build HTTP client")
}

/// Sends an idempotent request, retrying transport errors and 5xx responses
///
/// `request` is called once per attempt so per-request headers such as
/// signatures are regenerated.
///
/// # Returns
/// The first response that is not a server error. 4xx responses are returned
/// as-is for the caller to interpret.
pub async fn send_with_retry<F>(retries: u32, url: &str, request: F) -> Result<reqwest::Response>
where
    F: Fn() -> Result<reqwest::RequestBuilder>,
{
    let mut attempt: u32 = 0;
    loop {
        attempt += 1;
        let outcome = request()?.send().await;

        let failure = match outcome {
            Ok(response) if !response.status().is_server_error() => return Ok(response),
            Ok(response) => anyhow::anyhow!("{} returned status {}", url, response.status()),
            Err(e) => anyhow::Error::new(e).context(format!("Request to {} failed", url)),
        };

        if attempt > retries {
            return Err(failure);
        }
        tracing::debug!(url, attempt, error = %failure, "Retrying request");
        tokio::time::sleep(Duration::from_millis(RETRY_BASE_DELAY_MS * attempt as u64)).await;
    }
}

/// Decodes a successful JSON response; any other status is an error.
pub async fn read_json<T: DeserializeOwned>(response: reqwest::Response, url: &str) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        anyhow::bail!("{} returned status {}", url, status);
    }
    response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to decode response from {}", url))
}
