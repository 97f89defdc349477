//! HTTP fetching for strip pages, plus the latest-date probe.
//!
//! ### Strip pages
//! Strip URLs are `base_url` + `YYYY-MM-DD`. A fetch is a single attempt
//! with a hard timeout; there is no retry layer.
//!
//! ### Latest-date probe
//! Requesting today's URL makes the source redirect to the most recent
//! published strip when today's does not exist yet. The date segment of
//! the final URL after redirects is the latest published date. The probe
//! and the target-page fetch run concurrently via [`StripFetcher::fetch_with_probe`].

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use std::time::{Duration, Instant};
use url::Url;

use strips_core::Error;
use strips_core::dates::{self, URL_DATE_FMT};

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// Base URL strip dates are appended to (default: "https://dilbert.com/strip/")
    pub base_url: String,

    /// User agent string (default: "strips-mcp/0.1")
    pub user_agent: String,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            base_url: "https://dilbert.com/strip/".to_string(),
            user_agent: "strips-mcp/0.1".to_string(),
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
        }
    }
}

/// Source of strip pages and the latest published date.
///
/// The resolver only talks to this trait, so tests can swap the network
/// out for canned pages.
#[async_trait]
pub trait StripFetcher: Send + Sync {
    /// Fetch the page body for the strip on `date`.
    async fn fetch_strip(&self, date: NaiveDate) -> Result<String, Error>;

    /// Determine the latest published strip date.
    async fn probe_latest(&self) -> Result<NaiveDate, Error>;

    /// Fetch the target page and probe the latest date concurrently.
    ///
    /// Both results are required, so the first failure fails the pair.
    async fn fetch_with_probe(&self, date: NaiveDate) -> Result<(String, NaiveDate), Error> {
        tokio::try_join!(self.fetch_strip(date), self.probe_latest())
    }
}

/// HTTP fetch client for the strip source.
pub struct FetchClient {
    http: Client,
    base: Url,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let base = Url::parse(&config.base_url)
            .map_err(|e| Error::FetchFailed(format!("invalid base URL {:?}: {e}", config.base_url)))?;
        if base.cannot_be_a_base() || !base.path().ends_with('/') {
            return Err(Error::FetchFailed(format!(
                "base URL {:?} must end with '/' so dates append as a path segment",
                config.base_url
            )));
        }

        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, base, config })
    }

    /// URL of the strip page for a date.
    pub fn strip_url(&self, date: NaiveDate) -> Url {
        // The base is validated in new(), and a date segment is plain ASCII.
        self.base
            .join(&date.format(URL_DATE_FMT).to_string())
            .expect("date segment joins onto validated base")
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    async fn get_page(&self, url: Url) -> Result<reqwest::Response, Error> {
        let response = self
            .http
            .get(url.clone())
            .header("Accept", "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .map_err(|e| Error::FetchFailed(format!("request for {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::FetchFailed(format!("status {} for {}", status.as_u16(), response.url())));
        }

        Ok(response)
    }
}

#[async_trait]
impl StripFetcher for FetchClient {
    async fn fetch_strip(&self, date: NaiveDate) -> Result<String, Error> {
        let start = Instant::now();
        let url = self.strip_url(date);
        let response = self.get_page(url.clone()).await?;
        let final_url = response.url().clone();

        let body = response
            .text()
            .await
            .map_err(|e| Error::FetchFailed(format!("failed to read response body: {e}")))?;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            start.elapsed().as_millis(),
            body.len()
        );

        Ok(body)
    }

    async fn probe_latest(&self) -> Result<NaiveDate, Error> {
        let url = self.strip_url(dates::today_utc());
        let response = self.get_page(url).await?;
        let final_url = response.url().clone();

        let segment = final_url
            .path_segments()
            .and_then(|mut segments| segments.next_back())
            .unwrap_or_default();
        let latest = NaiveDate::parse_from_str(segment, URL_DATE_FMT).map_err(|_| {
            Error::MalformedPage(format!("latest-date probe landed on {final_url}, which has no date segment"))
        })?;

        tracing::debug!("latest strip probe resolved to {latest}");
        Ok(latest)
    }
}
