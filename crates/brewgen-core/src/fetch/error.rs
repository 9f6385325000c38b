//! Digest fetch error type.

use thiserror::Error;

/// Failure of a single asset download. No variant is retried.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Curl reported an error (DNS, connect, TLS, timeout, reset...).
    #[error("network: {0}")]
    Network(#[source] curl::Error),

    /// The final response (after redirects) had a non-2xx status.
    #[error("HTTP {status}")]
    Http { status: u32 },

    /// The body could not be fully drained; hashing a truncated body would
    /// produce a wrong checksum in the formula.
    #[error("incomplete body: received {received} bytes{}", expected_suffix(.expected))]
    Read { received: u64, expected: Option<u64> },
}

fn expected_suffix(expected: &Option<u64>) -> String {
    match expected {
        Some(n) => format!(" of {}", n),
        None => String::new(),
    }
}

impl From<curl::Error> for FetchError {
    fn from(e: curl::Error) -> Self {
        FetchError::Network(e)
    }
}
