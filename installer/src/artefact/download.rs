//! Artefact retrieval over HTTP.
//!
//! Provides a trait-based abstraction for fetching a tool's single-file
//! payload, enabling dependency injection for testing. Payloads are held in
//! memory; nothing touches the disk until the bytes have been verified.

use std::time::Duration;

/// Default network timeout for a payload download.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Trait for fetching artefact payloads.
///
/// Abstractions allow tests to mock HTTP behaviour without network access.
///
/// # Examples
///
/// ```
/// use git_plugins_installer::artefact::download::{DEFAULT_FETCH_TIMEOUT, HttpFetcher};
///
/// let fetcher = HttpFetcher::new(DEFAULT_FETCH_TIMEOUT);
/// // Use fetcher.fetch("https://...") in production
/// ```
#[cfg_attr(test, mockall::automock)]
pub trait ArtefactFetcher: Send + Sync {
    /// Fetch the complete payload at `url`.
    ///
    /// A single attempt is made; there are no retries.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::NotFound`] for a missing resource and
    /// [`FetchError::Network`] for any other failure.
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Errors arising from artefact fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request failed or the server answered with an error status.
    #[error("download failed for {url}: {reason}")]
    Network {
        /// The URL that was requested.
        url: String,
        /// A human-readable description of the failure.
        reason: String,
    },

    /// The requested artefact was not found (HTTP 404).
    #[error("artefact not found: {url}")]
    NotFound {
        /// The URL that returned 404.
        url: String,
    },
}

/// HTTP-based fetcher using `ureq`.
pub struct HttpFetcher {
    agent: ureq::Agent,
}

impl HttpFetcher {
    /// Create a fetcher whose requests time out after `timeout`.
    #[must_use]
    pub fn new(timeout: Duration) -> Self {
        let config = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build();
        Self {
            agent: ureq::Agent::new_with_config(config),
        }
    }
}

impl ArtefactFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        log::debug!("fetching {url}");
        let response = self
            .agent
            .get(url)
            .call()
            .map_err(|e| map_ureq_error(url, &e))?;
        let bytes = response
            .into_body()
            .read_to_vec()
            .map_err(|e| map_ureq_error(url, &e))?;
        log::debug!("fetched {} bytes from {url}", bytes.len());
        Ok(bytes)
    }
}

/// Map a ureq error to a [`FetchError`].
fn map_ureq_error(url: &str, err: &ureq::Error) -> FetchError {
    match err {
        ureq::Error::StatusCode(404) => FetchError::NotFound {
            url: url.to_owned(),
        },
        other => FetchError::Network {
            url: url.to_owned(),
            reason: other.to_string(),
        },
    }
}
