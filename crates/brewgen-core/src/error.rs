//! Error taxonomy for the formula pipeline.
//!
//! Each stage has its own error type; `BrewError` is what the pipeline and
//! coordinator hand back to the caller. Nothing in the core exits the process.

use thiserror::Error;

pub use crate::asset::FormatError;
pub use crate::fetch::FetchError;
pub use crate::release::ResolveError;

#[derive(Debug, Error)]
pub enum BrewError {
    /// Release listing failed or the repository has no releases. Raised before any
    /// fetch starts.
    #[error("release resolution failed")]
    Resolution(#[from] ResolveError),

    /// An asset name does not follow `<name>.<classifier>.<ext>`, or classifiers collide.
    #[error("malformed release asset")]
    Format(#[from] FormatError),

    /// Downloading or hashing one asset failed.
    #[error("fetching {classifier} from {url}")]
    Fetch {
        classifier: String,
        url: String,
        #[source]
        source: FetchError,
    },

    /// The formula template failed to compile or referenced an undefined value.
    #[error("formula template")]
    Template(#[from] minijinja::Error),

    /// A fetch task panicked or was cancelled before reporting a result.
    #[error("fetch task failed: {0}")]
    Task(String),
}

impl BrewError {
    /// Short category label used in log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            BrewError::Resolution(_) => "resolution",
            BrewError::Format(_) => "format",
            BrewError::Fetch { .. } => "fetch",
            BrewError::Template(_) => "template",
            BrewError::Task(_) => "task",
        }
    }
}
