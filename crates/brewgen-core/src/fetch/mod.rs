//! Digest fetching: download an asset and return the SHA-256 of its body.
//!
//! `CurlFetcher` uses libcurl's easy interface and runs in the calling thread;
//! the coordinator calls it from `spawn_blocking`.

mod error;
mod headers;

pub use error::FetchError;

use crate::checksum::StreamingSha256;
use headers::FinalHeaders;
use std::time::Duration;

/// Default `User-Agent` for API and download requests (GitHub rejects requests without one).
pub const DEFAULT_USER_AGENT: &str = concat!("brewgen/", env!("CARGO_PKG_VERSION"));

/// Retrieves a resource and returns the lowercase hex SHA-256 of its full body.
///
/// Implementations block; they must be shareable across fetch tasks.
pub trait DigestFetcher: Send + Sync {
    fn fetch_digest(&self, url: &str) -> Result<String, FetchError>;
}

/// Curl options shared by the release resolver and the asset fetcher.
#[derive(Debug, Clone)]
pub struct HttpOptions {
    pub user_agent: String,
    /// Overall deadline per request. `None` waits indefinitely.
    pub timeout: Option<Duration>,
    /// Deadline for establishing the connection. `None` uses libcurl's default.
    pub connect_timeout: Option<Duration>,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
            connect_timeout: None,
        }
    }
}

impl HttpOptions {
    pub(crate) fn apply(&self, easy: &mut curl::easy::Easy) -> Result<(), curl::Error> {
        easy.follow_location(true)?;
        easy.max_redirections(10)?;
        easy.useragent(&self.user_agent)?;
        if let Some(t) = self.connect_timeout {
            easy.connect_timeout(t)?;
        }
        if let Some(t) = self.timeout {
            easy.timeout(t)?;
        }
        Ok(())
    }
}

/// Downloads with a single GET per asset and hashes the body as it streams in.
#[derive(Debug, Clone, Default)]
pub struct CurlFetcher {
    opts: HttpOptions,
}

impl CurlFetcher {
    pub fn new(opts: HttpOptions) -> Self {
        Self { opts }
    }
}

impl DigestFetcher for CurlFetcher {
    fn fetch_digest(&self, url: &str) -> Result<String, FetchError> {
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        self.opts.apply(&mut easy)?;

        let mut headers = FinalHeaders::default();
        let mut body = StreamingSha256::new();
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            headers.feed(data);
            true
        })?;
        transfer.write_function(|data| {
            body.update(data);
            Ok(data.len())
        })?;
        let performed = transfer.perform();
        drop(transfer);

        if let Err(e) = performed {
            if e.is_partial_file() {
                return Err(FetchError::Read {
                    received: body.len(),
                    expected: headers.content_length(),
                });
            }
            return Err(FetchError::Network(e));
        }

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(FetchError::Http { status });
        }
        if let Some(expected) = headers.content_length() {
            if body.len() != expected {
                return Err(FetchError::Read {
                    received: body.len(),
                    expected: Some(expected),
                });
            }
        }

        tracing::debug!(url, bytes = body.len(), "asset downloaded");
        Ok(body.finish_hex())
    }
}
