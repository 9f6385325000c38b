//! SHA-256 helpers shared by the fetcher and tests.

use sha2::{Digest, Sha256};

/// Compute SHA-256 of an in-memory buffer and return the digest as lowercase hex.
pub fn sha256_hex(data: &[u8]) -> String {
    hex::encode(Sha256::digest(data))
}

/// Incremental SHA-256 over a body delivered in chunks (e.g. from libcurl's write callback).
#[derive(Default)]
pub struct StreamingSha256 {
    hasher: Sha256,
    len: u64,
}

impl StreamingSha256 {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&mut self, chunk: &[u8]) {
        self.hasher.update(chunk);
        self.len += chunk.len() as u64;
    }

    /// Bytes fed so far.
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn finish_hex(self) -> String {
        hex::encode(self.hasher.finalize())
    }
}
