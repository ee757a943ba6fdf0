//! HTTP client for retailer listing pages
//!
//! One attempt per request, bounded by the configured timeout. Retailers see
//! the client only through [`PageFetcher`], so tests can hand them fixture
//! pages instead of talking to the network.

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::infrastructure::config::HttpConfig;
use crate::infrastructure::errors::FetchError;

/// Anything that can GET a page and hand back its body
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch_html_string(&self, url: &str) -> Result<String, FetchError>;
}

/// Configuration for HTTP client behavior
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    /// Request timeout in seconds
    pub timeout_seconds: u64,
    /// User agent string
    pub user_agent: String,
    /// Whether to follow redirects
    pub follow_redirects: bool,
}

impl HttpClientConfig {
    pub fn from_http_config(http_config: &HttpConfig) -> Self {
        Self {
            timeout_seconds: http_config.request_timeout_seconds,
            user_agent: http_config.user_agent.clone(),
            follow_redirects: http_config.follow_redirects,
        }
    }
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self::from_http_config(&HttpConfig::default())
    }
}

/// `reqwest`-backed [`PageFetcher`]
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self, FetchError> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()?;

        Ok(Self { client, config })
    }

    pub fn from_http_config(http_config: &HttpConfig) -> Result<Self, FetchError> {
        Self::with_config(HttpClientConfig::from_http_config(http_config))
    }
}

#[async_trait]
impl PageFetcher for HttpClient {
    async fn fetch_html_string(&self, url: &str) -> Result<String, FetchError> {
        info!("🌐 HTTP GET: {}", url);
        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                error!("⏱️ No response within {}s: {}", self.config.timeout_seconds, url);
            }
            FetchError::from(e)
        })?;

        let status = response.status();
        if !status.is_success() {
            error!("❌ HTTP error {}: {}", status, url);
            return Err(FetchError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let html_content = response.text().await?;
        if html_content.is_empty() {
            return Err(FetchError::EmptyBody {
                url: url.to_string(),
            });
        }

        debug!("Fetched {} bytes from {}", html_content.len(), url);
        Ok(html_content)
    }
}
