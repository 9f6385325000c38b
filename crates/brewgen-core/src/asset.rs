//! Asset descriptors: one downloadable artifact of a release, keyed by classifier.
//!
//! Release assets are expected to be named `<name>.<classifier>.<ext>`, e.g.
//! `span.amd64-linux.zip`; the middle segment addresses the asset in the formula.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("asset name not in the pattern <name>.<classifier>.<ext>: {0}")]
    BadName(String),

    #[error("asset has no name and its URL has no filename: {0}")]
    NoFilename(String),

    #[error("classifier {classifier} used by both {first} and {second}")]
    DuplicateClassifier {
        classifier: String,
        first: String,
        second: String,
    },

    #[error("digest for {0} already recorded")]
    DigestAlreadySet(String),
}

/// A downloadable artifact of a release. `sha256` is `None` until its fetch completes
/// and can be recorded exactly once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetDescriptor {
    pub classifier: String,
    pub url: String,
    sha256: Option<String>,
}

impl AssetDescriptor {
    /// Builds a descriptor from a release asset's name and download URL.
    ///
    /// An empty `name` falls back to the last path segment of `url`.
    pub fn from_release_asset(name: &str, url: &str) -> Result<Self, FormatError> {
        let filename = if name.is_empty() {
            filename_from_url_path(url).ok_or_else(|| FormatError::NoFilename(url.to_string()))?
        } else {
            name.to_string()
        };
        let classifier = classifier_from_filename(&filename)?;
        Ok(Self {
            classifier,
            url: url.to_string(),
            sha256: None,
        })
    }

    pub fn sha256(&self) -> Option<&str> {
        self.sha256.as_deref()
    }

    pub fn is_complete(&self) -> bool {
        self.sha256.as_deref().is_some_and(|d| !d.is_empty())
    }

    /// Records the digest. A second call fails and leaves the first digest in place.
    pub fn record_digest(&mut self, sha256: String) -> Result<(), FormatError> {
        if self.sha256.is_some() {
            return Err(FormatError::DigestAlreadySet(self.classifier.clone()));
        }
        self.sha256 = Some(sha256);
        Ok(())
    }
}

/// Extracts `<classifier>` from `<name>.<classifier>.<ext>`.
pub fn classifier_from_filename(filename: &str) -> Result<String, FormatError> {
    let parts: Vec<&str> = filename.split('.').collect();
    match parts.as_slice() {
        [_, classifier, _] if !classifier.is_empty() => Ok((*classifier).to_string()),
        _ => Err(FormatError::BadName(filename.to_string())),
    }
}

/// Last non-empty path segment of a URL, ignoring query and fragment.
fn filename_from_url_path(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let segment = parsed.path().split('/').filter(|s| !s.is_empty()).last()?;
    if segment == "." || segment == ".." {
        return None;
    }
    Some(segment.to_string())
}
