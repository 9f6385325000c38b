//! GitHub REST implementation of `ReleaseResolver`.

use crate::fetch::HttpOptions;

use super::parse::parse_latest;
use super::{LatestRelease, ReleaseResolver, ResolveError};

pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Lists releases via `GET {api_url}/repos/{owner}/{repo}/releases?per_page=1`.
///
/// Unauthenticated; blocks the calling thread.
#[derive(Debug, Clone)]
pub struct GithubResolver {
    api_url: String,
    opts: HttpOptions,
}

impl GithubResolver {
    pub fn new(api_url: impl Into<String>, opts: HttpOptions) -> Self {
        Self {
            api_url: api_url.into(),
            opts,
        }
    }

    pub fn releases_url(&self, owner: &str, repo: &str) -> String {
        format!(
            "{}/repos/{}/{}/releases?per_page=1",
            self.api_url.trim_end_matches('/'),
            owner,
            repo
        )
    }
}

impl Default for GithubResolver {
    fn default() -> Self {
        Self::new(DEFAULT_GITHUB_API_URL, HttpOptions::default())
    }
}

impl ReleaseResolver for GithubResolver {
    fn latest_release(&self, owner: &str, repo: &str) -> Result<LatestRelease, ResolveError> {
        let url = self.releases_url(owner, repo);
        tracing::debug!(%url, "listing releases");

        let mut easy = curl::easy::Easy::new();
        easy.url(&url)?;
        self.opts.apply(&mut easy)?;
        let mut list = curl::easy::List::new();
        list.append("Accept: application/vnd.github+json")?;
        list.append("X-GitHub-Api-Version: 2022-11-28")?;
        easy.http_headers(list)?;

        let mut body = Vec::new();
        let mut transfer = easy.transfer();
        transfer.write_function(|data| {
            body.extend_from_slice(data);
            Ok(data.len())
        })?;
        let performed = transfer.perform();
        drop(transfer);
        performed?;

        let status = easy.response_code()?;
        if !(200..300).contains(&status) {
            return Err(ResolveError::Http { url, status });
        }

        let release = parse_latest(&body, owner, repo)?;
        tracing::info!(
            owner,
            repo,
            tag = %release.tag,
            assets = release.assets.len(),
            "resolved latest release"
        );
        Ok(release)
    }
}
