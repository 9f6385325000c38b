//! Fan-out/fan-in of asset digests.
//!
//! One blocking fetch task per release asset, all launched at once (release
//! asset counts are small). Each task hands its digest back through its join
//! handle; only the coordinator writes into the result map, and only after
//! every task has finished.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Instant;
use tokio::task::JoinSet;

use crate::asset::{AssetDescriptor, FormatError};
use crate::error::BrewError;
use crate::fetch::{DigestFetcher, FetchError};
use crate::release::ReleaseAsset;

/// What to do when one asset cannot be downloaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Fail the whole run; no formula is produced.
    #[default]
    Abort,
    /// Log a warning and leave that classifier out of the formula.
    Skip,
}

impl fmt::Display for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailurePolicy::Abort => write!(f, "abort"),
            FailurePolicy::Skip => write!(f, "skip"),
        }
    }
}

impl FromStr for FailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "abort" => Ok(FailurePolicy::Abort),
            "skip" => Ok(FailurePolicy::Skip),
            other => Err(format!("unknown failure policy {:?} (expected abort or skip)", other)),
        }
    }
}

/// Builds a descriptor per asset, rejecting malformed names and colliding classifiers.
pub fn describe_assets(assets: &[ReleaseAsset]) -> Result<Vec<AssetDescriptor>, FormatError> {
    let mut seen: HashMap<String, &str> = HashMap::with_capacity(assets.len());
    let mut out = Vec::with_capacity(assets.len());
    for asset in assets {
        let d = AssetDescriptor::from_release_asset(&asset.name, &asset.download_url)?;
        if let Some(first) = seen.insert(d.classifier.clone(), asset.name.as_str()) {
            return Err(FormatError::DuplicateClassifier {
                classifier: d.classifier,
                first: first.to_string(),
                second: asset.name.clone(),
            });
        }
        out.push(d);
    }
    Ok(out)
}

/// An asset left out of the formula under [`FailurePolicy::Skip`].
#[derive(Debug)]
pub struct SkippedAsset {
    pub classifier: String,
    pub url: String,
    pub error: FetchError,
}

/// Result of a fan-out: hashed assets plus whatever `Skip` dropped.
#[derive(Debug, Default)]
pub struct FetchReport {
    /// Hashed assets keyed by classifier; every entry has its digest recorded.
    pub assets: BTreeMap<String, AssetDescriptor>,
    /// Failed assets in listing order. Always empty under `Abort`.
    pub skipped: Vec<SkippedAsset>,
}

/// Downloads and hashes every asset concurrently and returns them keyed by classifier.
///
/// All names are validated before the first download starts. The call returns
/// only after every fetch task has completed; there is no early cancellation.
/// Every descriptor in the returned map has its digest recorded.
pub async fn fetch_all(
    assets: &[ReleaseAsset],
    fetcher: Arc<dyn DigestFetcher>,
    policy: FailurePolicy,
) -> Result<BTreeMap<String, AssetDescriptor>, BrewError> {
    fetch_report(assets, fetcher, policy).await.map(|r| r.assets)
}

/// Like [`fetch_all`], but also reports the assets omitted under `Skip`.
pub async fn fetch_report(
    assets: &[ReleaseAsset],
    fetcher: Arc<dyn DigestFetcher>,
    policy: FailurePolicy,
) -> Result<FetchReport, BrewError> {
    let mut descriptors = describe_assets(assets)?;
    if descriptors.is_empty() {
        tracing::warn!("release has no assets");
        return Ok(FetchReport::default());
    }

    let started = Instant::now();
    tracing::info!(count = descriptors.len(), %policy, "fetching assets");

    let mut join_set = JoinSet::new();
    for (index, d) in descriptors.iter().enumerate() {
        let fetcher = Arc::clone(&fetcher);
        let url = d.url.clone();
        join_set.spawn_blocking(move || {
            tracing::debug!(%url, "downloading");
            (index, fetcher.fetch_digest(&url))
        });
    }

    let mut results: Vec<Option<Result<String, FetchError>>> =
        descriptors.iter().map(|_| None).collect();
    let mut task_failure: Option<String> = None;
    while let Some(joined) = join_set.join_next().await {
        match joined {
            Ok((index, res)) => results[index] = Some(res),
            Err(e) => {
                tracing::error!("fetch task join: {}", e);
                task_failure.get_or_insert_with(|| e.to_string());
            }
        }
    }
    if let Some(msg) = task_failure {
        return Err(BrewError::Task(msg));
    }

    let mut skipped = Vec::new();
    for (d, res) in descriptors.iter_mut().zip(results) {
        match res {
            Some(Ok(digest)) => {
                tracing::debug!(classifier = %d.classifier, sha256 = %digest, "asset hashed");
                d.record_digest(digest)?;
            }
            Some(Err(source)) => match policy {
                FailurePolicy::Abort => {
                    return Err(BrewError::Fetch {
                        classifier: d.classifier.clone(),
                        url: d.url.clone(),
                        source,
                    });
                }
                FailurePolicy::Skip => {
                    tracing::warn!(
                        classifier = %d.classifier,
                        url = %d.url,
                        "skipping asset: {}",
                        source
                    );
                    skipped.push(SkippedAsset {
                        classifier: d.classifier.clone(),
                        url: d.url.clone(),
                        error: source,
                    });
                }
            },
            None => {
                return Err(BrewError::Task(format!("no result for {}", d.classifier)));
            }
        }
    }
    let mut assets_by_classifier = BTreeMap::new();
    for d in descriptors.into_iter().filter(AssetDescriptor::is_complete) {
        assets_by_classifier.insert(d.classifier.clone(), d);
    }

    tracing::info!(
        hashed = assets_by_classifier.len(),
        skipped = skipped.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "assets fetched"
    );
    Ok(FetchReport {
        assets: assets_by_classifier,
        skipped,
    })
}
