use log::debug;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tokio::sync::Semaphore;
use url::Url;

use crate::auth::Token;
use crate::error::{CheckerError, Result};

pub(super) const PAGE_SIZE: usize = 100;
const NEXT_PAGE_HEADER: &str = "x-next-page";
pub const DEFAULT_MAX_CONCURRENT_REQUESTS: usize = 32;

/// Everything the REST client needs, resolved up front by the caller.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub token: Option<Token>,
    /// Skip TLS certificate verification for self-hosted instances.
    pub accept_invalid_certs: bool,
    /// Repository file holding the per-branch version.
    pub manifest_path: String,
    pub max_concurrent_requests: usize,
}

impl ClientSettings {
    pub fn new(base_url: impl Into<String>, token: Option<Token>) -> Self {
        Self {
            base_url: base_url.into(),
            token,
            accept_invalid_certs: false,
            manifest_path: "package.json".to_string(),
            max_concurrent_requests: DEFAULT_MAX_CONCURRENT_REQUESTS,
        }
    }
}

/// Body of a successful response plus the pagination cursor, if any.
pub(super) struct Page {
    pub body: String,
    pub next_page: Option<u32>,
}

pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: Option<Token>,
    pub(super) manifest_path: String,
    semaphore: Arc<Semaphore>,
}

impl GitLabClient {
    pub fn new(settings: ClientSettings) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("gitlab-checker/", env!("CARGO_PKG_VERSION")))
            .danger_accept_invalid_certs(settings.accept_invalid_certs)
            .build()
            .map_err(|e| CheckerError::Config(format!("Failed to create HTTP client: {e}")))?;

        let mut base = Url::parse(&settings.base_url)
            .map_err(|e| CheckerError::Config(format!("Invalid base URL: {e}")))?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let api_url = base
            .join("api/v4/")
            .map_err(|e| CheckerError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token: settings.token,
            manifest_path: settings.manifest_path,
            semaphore: Arc::new(Semaphore::new(settings.max_concurrent_requests.max(1))),
        })
    }

    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    pub fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(token) = &self.token {
            request.bearer_auth(token.as_str())
        } else {
            request
        }
    }

    pub(super) fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| CheckerError::Config(format!("Invalid endpoint URL '{path}': {e}")))
    }

    pub(super) async fn fetch(&self, url: Url) -> Result<Page> {
        let url_text = url.to_string();
        self.execute(url, false).await?.ok_or(CheckerError::ApiError {
            status: StatusCode::NOT_FOUND.as_u16(),
            message: format!("{url_text} not found"),
        })
    }

    /// Like `fetch`, but a 404 is reported as `None` instead of an error.
    pub(super) async fn fetch_optional(&self, url: Url) -> Result<Option<Page>> {
        self.execute(url, true).await
    }

    async fn execute(&self, url: Url, allow_missing: bool) -> Result<Option<Page>> {
        // One permit per request, held until the body has been read
        let _permit = self
            .semaphore
            .acquire()
            .await
            .map_err(|e| CheckerError::Config(format!("Request limiter closed: {e}")))?;

        debug!("GET {url}");
        let response = self.auth_request(self.client.get(url)).send().await?;
        let status = response.status();

        if allow_missing && status == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(CheckerError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        let next_page = response
            .headers()
            .get(NEXT_PAGE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse().ok());

        let body = response.text().await?;

        Ok(Some(Page { body, next_page }))
    }

    /// Fetches every page of a list endpoint, following `X-Next-Page`.
    pub(super) async fn get_all<T>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let mut url = self.endpoint(path)?;
            {
                let mut pairs = url.query_pairs_mut();
                for (key, value) in query {
                    pairs.append_pair(key, value);
                }
                pairs
                    .append_pair("per_page", &PAGE_SIZE.to_string())
                    .append_pair("page", &page.to_string());
            }

            let fetched = self.fetch(url).await?;
            let batch: Vec<T> = decode(&fetched.body, what)?;
            items.extend(batch);

            match fetched.next_page {
                Some(next) if next > page => page = next,
                _ => break,
            }
        }

        Ok(items)
    }
}

pub(super) fn decode<T: DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body).map_err(|e| CheckerError::decode(what, e))
}
