// * Link Resolver
// * Expands short/affiliate links by walking HEAD redirects by hand so the hop
// * count is observable and capped.

use crate::config::constants::{MAX_REDIRECTS, RESOLVE_TIMEOUT_SECS};
use crate::engine::normalization::parse_absolute_url;
use crate::network::errors::ExtractionError;
use crate::network::identity::BrowserIdentity;
use crate::ops::telemetry;
use reqwest::header::LOCATION;
use reqwest::redirect::Policy;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct LinkResolver {
    inner: Client,
    max_redirects: usize,
}

impl LinkResolver {
    pub fn new(timeout: Duration, max_redirects: usize) -> Result<Self, ExtractionError> {
        let identity = BrowserIdentity::desktop_chrome();

        // ! Redirects must not be followed by reqwest itself, we count hops here.
        let client = Client::builder()
            .default_headers(identity.headers())
            .redirect(Policy::none())
            .timeout(timeout)
            .build()
            .map_err(|e| ExtractionError::NetworkError(format!("client setup failed: {e}")))?;

        Ok(Self {
            inner: client,
            max_redirects,
        })
    }

    pub fn with_defaults() -> Result<Self, ExtractionError> {
        Self::new(Duration::from_secs(RESOLVE_TIMEOUT_SECS), MAX_REDIRECTS)
    }

    pub fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    // * Returns the final destination of `url`.
    // * Network failures fall back to the original URL; only a malformed input
    // * or an exceeded redirect cap produce an error.
    pub async fn resolve(&self, url: &str) -> Result<String, ExtractionError> {
        let mut current = parse_absolute_url(url)?;
        let mut followed = 0usize;

        loop {
            let resp = match self.inner.head(current.clone()).send().await {
                Ok(resp) => resp,
                Err(e) => {
                    warn!(
                        url,
                        hop = followed,
                        error = %ExtractionError::from_reqwest(&e),
                        "Redirect traversal failed, keeping original URL"
                    );
                    return Ok(url.to_string());
                }
            };

            if !resp.status().is_redirection() {
                debug!(url, resolved = %current, hops = followed, "Link resolved");
                return Ok(current.to_string());
            }

            // * A 3xx without a usable Location is the end of the chain
            let location = match resp.headers().get(LOCATION).and_then(|v| v.to_str().ok()) {
                Some(loc) if !loc.trim().is_empty() => loc.trim().to_string(),
                _ => return Ok(current.to_string()),
            };

            if followed == self.max_redirects {
                warn!(url, limit = self.max_redirects, "Redirect cap exceeded");
                return Err(ExtractionError::TooManyRedirects(self.max_redirects));
            }

            // * Location may be relative to the current hop
            current = match current.join(&location) {
                Ok(next) => next,
                Err(_) => {
                    warn!(url, location = %location, "Unparsable Location header");
                    return Ok(current.to_string());
                }
            };
            followed += 1;
            telemetry::record_redirect_followed();
        }
    }

    // * Best-effort form used by the heuristic strategy: any failure yields the input.
    pub async fn resolve_or_original(&self, url: &str) -> String {
        match self.resolve(url).await {
            Ok(resolved) => resolved,
            Err(e) => {
                warn!(url, error = %e, kind = e.kind(), "Link resolution degraded to original URL");
                url.to_string()
            }
        }
    }
}
