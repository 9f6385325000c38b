//! Decode the GitHub "list releases" JSON response.

use serde::Deserialize;

use super::{LatestRelease, ReleaseAsset, ResolveError};

#[derive(Debug, Deserialize)]
struct GithubRelease {
    tag_name: String,
    #[serde(default)]
    assets: Vec<GithubAsset>,
}

#[derive(Debug, Deserialize)]
struct GithubAsset {
    #[serde(default)]
    name: String,
    browser_download_url: String,
}

/// Returns the first (most recent) release of a listing, or `NoReleases` if it is empty.
pub(crate) fn parse_latest(
    body: &[u8],
    owner: &str,
    repo: &str,
) -> Result<LatestRelease, ResolveError> {
    let releases: Vec<GithubRelease> = serde_json::from_slice(body)?;
    let Some(latest) = releases.into_iter().next() else {
        return Err(ResolveError::NoReleases {
            owner: owner.to_string(),
            repo: repo.to_string(),
        });
    };
    Ok(LatestRelease {
        tag: latest.tag_name,
        assets: latest
            .assets
            .into_iter()
            .map(|a| ReleaseAsset {
                name: a.name,
                download_url: a.browser_download_url,
            })
            .collect(),
    })
}
