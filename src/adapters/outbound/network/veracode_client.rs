use super::http::{build_client, read_json, send_with_retry, HttpSettings};
use crate::compliance::domain::{ApplicationQuery, ApplicationRecord, ScaProject, Workspace};
use crate::compliance::services::RequestSigner;
use crate::ports::outbound::SecurityPlatformClient;
use crate::shared::error::ScanError;
use crate::shared::Result;
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::future::Future;

const APPLICATION_PAGE_SIZE: usize = 50;
const SCA_PAGE_SIZE: usize = 100;
/// Upper bound on pages fetched for one listing
const MAX_PAGES: u32 = 200;

#[derive(Debug, Default, Deserialize)]
struct PageInfo {
    #[serde(default)]
    total_pages: u32,
    #[serde(default)]
    total_elements: u64,
}

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Embedded<T> {
    #[serde(default, alias = "applications", alias = "workspaces", alias = "projects")]
    items: Vec<T>,
}

/// One page of a HAL listing; `_embedded` is omitted when the page is empty
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
struct Page<T> {
    #[serde(default)]
    page: PageInfo,
    #[serde(rename = "_embedded")]
    embedded: Option<Embedded<T>>,
}

impl<T> Page<T> {
    fn into_items(self) -> Vec<T> {
        self.embedded.map(|e| e.items).unwrap_or_default()
    }
}

fn application_path(query: &ApplicationQuery, page: u32) -> String {
    let mut path = format!(
        "/appsec/v1/applications?size={}&page={}",
        APPLICATION_PAGE_SIZE, page
    );
    if let Some(name) = &query.name {
        path.push_str(&format!("&name={}", urlencoding::encode(name)));
    }
    path
}

/// VeracodeClient adapter for the static-analysis and SCA REST APIs
///
/// Every request carries a freshly signed `Authorization` header, regenerated
/// on retries so each attempt gets its own nonce.
pub struct VeracodeClient {
    client: reqwest::Client,
    signer: RequestSigner,
    api_host: String,
    sca_ui_host: String,
    retries: u32,
}

impl VeracodeClient {
    /// Creates a client for the given API host
    ///
    /// # Errors
    /// Returns `ScanError::InvalidApiKey` when the key is not valid hex
    pub fn new(
        api_id: &str,
        api_key: &str,
        api_host: &str,
        sca_ui_host: &str,
        http: &HttpSettings,
    ) -> Result<Self> {
        let signer = RequestSigner::new(api_id, api_key).map_err(|e| ScanError::InvalidApiKey {
            details: e.to_string(),
        })?;

        Ok(Self {
            client: build_client(http)?,
            signer,
            api_host: bare_host(api_host),
            sca_ui_host: bare_host(sca_ui_host),
            retries: http.retries,
        })
    }

    async fn get_page<T: DeserializeOwned>(&self, path: &str) -> Result<Page<T>> {
        let url = format!("https://{}{}", self.api_host, path);
        let response = send_with_retry(self.retries, &url, || {
            let authorization = self.signer.authorization_header(&self.api_host, path, "GET")?;
            Ok(self
                .client
                .get(&url)
                .header("Authorization", authorization)
                .header("Accept", "application/json"))
        })
        .await?;
        read_json(response, &url).await
    }

    /// Follows a zero-based listing until its last page
    async fn get_all<T, F>(&self, path_for_page: F) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        F: Fn(u32) -> String + Send,
    {
        collect_pages(move |page| {
            let path = path_for_page(page);
            async move { self.get_page::<T>(&path).await }
        })
        .await
    }
}

/// Fetches pages `0..total_pages`, stopping early at `MAX_PAGES`.
async fn collect_pages<T, F, Fut>(mut fetch_page: F) -> Result<Vec<T>>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = Result<Page<T>>>,
{
    let mut items = Vec::new();
    let mut page = 0;
    loop {
        let result = fetch_page(page).await?;
        let total_pages = result.page.total_pages;
        tracing::debug!(
            page,
            total_pages,
            total_elements = result.page.total_elements,
            "Fetched listing page"
        );
        items.extend(result.into_items());

        page += 1;
        if page >= total_pages {
            break;
        }
        if page >= MAX_PAGES {
            tracing::warn!(
                fetched_pages = page,
                total_pages,
                "Listing truncated at page limit; results are incomplete"
            );
            break;
        }
    }
    Ok(items)
}

/// Strips any scheme and trailing slash so the host can be signed.
fn bare_host(host: &str) -> String {
    let host = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"))
        .unwrap_or(host);
    host.trim_end_matches('/').to_string()
}

#[async_trait]
impl SecurityPlatformClient for VeracodeClient {
    async fn search_applications(&self, query: &ApplicationQuery) -> Result<Vec<ApplicationRecord>> {
        self.get_all(|page| application_path(query, page)).await
    }

    async fn get_workspaces(&self) -> Result<Vec<Workspace>> {
        self.get_all(|page| {
            format!("/srcclr/v3/workspaces?size={}&page={}", SCA_PAGE_SIZE, page)
        })
        .await
    }

    async fn get_projects(&self, workspace_id: &str) -> Result<Vec<ScaProject>> {
        let workspace = urlencoding::encode(workspace_id).into_owned();
        self.get_all(|page| {
            format!(
                "/srcclr/v3/workspaces/{}/projects?type=agent&size={}&page={}",
                workspace, SCA_PAGE_SIZE, page
            )
        })
        .await
    }

    fn sca_ui_host(&self) -> &str {
        &self.sca_ui_host
    }
}
