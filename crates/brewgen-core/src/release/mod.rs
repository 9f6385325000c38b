//! Release resolution: find the latest release of a repository and its assets.
//!
//! The pipeline only depends on the `ReleaseResolver` trait; `GithubResolver`
//! is the implementation used by the CLI.

mod github;
mod parse;

pub use github::{GithubResolver, DEFAULT_GITHUB_API_URL};

use thiserror::Error;

/// One downloadable file attached to a release, as listed by the hosting API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseAsset {
    pub name: String,
    pub download_url: String,
}

/// The most recent release of a repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LatestRelease {
    pub tag: String,
    pub assets: Vec<ReleaseAsset>,
}

impl LatestRelease {
    /// Version string used in the formula: the tag without a leading `v`.
    pub fn version(&self) -> &str {
        version_from_tag(&self.tag)
    }
}

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("listing releases: {0}")]
    Network(#[from] curl::Error),

    #[error("listing releases for {url} returned HTTP {status}")]
    Http { url: String, status: u32 },

    #[error("decoding release listing: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no releases for {owner}/{repo}")]
    NoReleases { owner: String, repo: String },
}

/// Looks up the latest release of `owner/repo`.
pub trait ReleaseResolver: Send + Sync {
    fn latest_release(&self, owner: &str, repo: &str) -> Result<LatestRelease, ResolveError>;
}

/// Strips one leading `v` from a tag (`v1.2.3` -> `1.2.3`).
pub fn version_from_tag(tag: &str) -> &str {
    tag.strip_prefix('v').unwrap_or(tag)
}
