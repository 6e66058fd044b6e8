use crate::config::constants::FETCH_TIMEOUT_SECS;
use crate::network::errors::ExtractionError;
use crate::network::identity::BrowserIdentity;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Body of a fetched page plus the URL it was finally served from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after any GET redirects reqwest followed
    pub final_url: String,
    pub body: String,
}

// * The HTML Fetcher: a single GET per call, no retries.
// * Markup is returned as-is; parsing tolerance belongs to the scraper.
// ! No cookie jar: calls must not share storefront sessions.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    inner: Client,
}

impl PageFetcher {
    // * Initializes the client with the desktop Chrome identity.
    pub fn new(timeout: Duration) -> Result<Self, ExtractionError> {
        let identity = BrowserIdentity::desktop_chrome();

        let client = Client::builder()
            .default_headers(identity.headers())
            .gzip(true)
            .brotli(true)
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::NetworkError(format!("client setup failed: {e}")))?;

        Ok(Self { inner: client })
    }

    pub fn with_default_timeout() -> Result<Self, ExtractionError> {
        Self::new(Duration::from_secs(FETCH_TIMEOUT_SECS))
    }

    // * Fetches a URL and returns the body of a 2xx response with its final URL.
    // * Short links that refuse HEAD still get expanded here through GET redirects.
    pub async fn fetch(&self, url: &str) -> Result<FetchedPage, ExtractionError> {
        let resp = self
            .inner
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractionError::from_reqwest(&e))?;

        let status = resp.status();
        let final_url = resp.url().to_string();
        if !status.is_success() {
            debug!(url, status = status.as_u16(), "Fetch rejected by server");
            return Err(ExtractionError::HttpError {
                status_code: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ExtractionError::from_reqwest(&e))?;

        debug!(url, final_url = %final_url, bytes = body.len(), "Fetched page");
        Ok(FetchedPage { final_url, body })
    }
}
