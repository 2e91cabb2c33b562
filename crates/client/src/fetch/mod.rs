//! Document fetch gateway.
//!
//! ### Contract
//! - `fetch(url, headers)` returns the status code and body text, or a
//!   transport failure. A non-success status is a normal response here;
//!   callers decide what it means for their page.
//! - No caching, no retries: every call is exactly one request.
//!
//! ### HTTP implementation
//! - Max redirects: 5
//! - Max body bytes: 5MB (configurable)
//! - Configured headers merged under per-call headers
//! - Default `Accept` unless a merged header sets one

pub mod url;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, header};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

pub use self::url::{UrlError, canonicalize, fill_template, page_url, path_segment, search_query};

use gamescrape_core::{AppConfig, Error};

const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8";

/// Request headers, name to value.
pub type Headers = BTreeMap<String, String>;

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: ::url::Url,
    /// HTTP status code
    pub status: u16,
    /// Response body, decoded lossily as UTF-8
    pub body: String,
}

impl FetchResponse {
    pub fn new(url: ::url::Url, status: u16, body: impl Into<String>) -> Self {
        Self { url, status, body: body.into() }
    }

    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Gateway issuing one request per call.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetch a page, returning its status and body.
    async fn fetch(&self, url: &::url::Url, headers: &Headers) -> Result<FetchResponse, Error>;
}

/// Configuration for the HTTP fetcher.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 20s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Headers sent with every request
    pub headers: Headers,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for FetchConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            user_agent: config.user_agent.clone(),
            max_bytes: config.max_bytes,
            timeout: config.timeout(),
            max_redirects: 5,
            headers: config.headers.clone(),
        }
    }
}

/// `reqwest`-backed fetcher.
pub struct HttpFetcher {
    http: Client,
    config: FetchConfig,
}

impl HttpFetcher {
    /// Create a new fetcher with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET request for `url` carrying the configured and per-call headers.
    fn request(&self, url: &::url::Url, headers: &Headers) -> RequestBuilder {
        let mut merged = self.config.headers.clone();
        merged.extend(headers.iter().map(|(k, v)| (k.clone(), v.clone())));

        let mut request = self.http.get(url.as_str());
        if !merged.keys().any(|name| name.eq_ignore_ascii_case(header::ACCEPT.as_str())) {
            request = request.header(header::ACCEPT, DEFAULT_ACCEPT);
        }
        for (name, value) in &merged {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }

    fn too_large(&self, len: usize) -> Error {
        Error::FetchTooLarge(format!("{} bytes exceeds {}", len, self.config.max_bytes))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &::url::Url, headers: &Headers) -> Result<FetchResponse, Error> {
        let start = Instant::now();

        let response = self.request(url, headers).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Transport(format!("timeout fetching {}", url))
            } else {
                Error::Transport(format!("network error: {}", e))
            }
        })?;

        let status = response.status();

        if let Some(len) = response.content_length()
            && len as usize > self.config.max_bytes
        {
            return Err(self.too_large(len as usize));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| Error::Transport(format!("failed to read response: {}", e)))?;

        if bytes.len() > self.config.max_bytes {
            return Err(self.too_large(bytes.len()));
        }

        tracing::debug!(
            url = %url,
            status = status.as_u16(),
            bytes = bytes.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fetched page"
        );

        Ok(FetchResponse::new(url.clone(), status.as_u16(), String::from_utf8_lossy(&bytes)))
    }
}
