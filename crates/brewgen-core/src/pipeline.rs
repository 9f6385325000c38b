//! End-to-end formula generation: resolve the latest release, hash its assets,
//! assemble `ReleaseMetadata`.

use std::sync::Arc;

use crate::coordinator::{fetch_report, FailurePolicy, SkippedAsset};
use crate::error::BrewError;
use crate::fetch::DigestFetcher;
use crate::formula::{self, ReleaseMetadata};
use crate::release::ReleaseResolver;

/// Repository identity plus the formula fields the release doesn't provide.
#[derive(Debug, Clone)]
pub struct FormulaRequest {
    pub owner: String,
    pub repo: String,
    pub name: String,
    pub binary: String,
    pub description: String,
    /// Defaults to the repository's GitHub page.
    pub homepage: Option<String>,
}

impl FormulaRequest {
    pub fn homepage(&self) -> String {
        self.homepage
            .clone()
            .unwrap_or_else(|| format!("https://github.com/{}/{}", self.owner, self.repo))
    }
}

/// A rendered formula and the assets it had to leave out.
#[derive(Debug)]
pub struct Formula {
    pub text: String,
    /// Non-empty only under [`FailurePolicy::Skip`].
    pub skipped: Vec<SkippedAsset>,
}

pub struct Pipeline {
    resolver: Arc<dyn ReleaseResolver>,
    fetcher: Arc<dyn DigestFetcher>,
    policy: FailurePolicy,
}

impl Pipeline {
    pub fn new(
        resolver: Arc<dyn ReleaseResolver>,
        fetcher: Arc<dyn DigestFetcher>,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            resolver,
            fetcher,
            policy,
        }
    }

    /// Resolves the latest release and hashes every asset. Fails before any
    /// download if the release cannot be resolved.
    pub async fn collect(&self, req: &FormulaRequest) -> Result<ReleaseMetadata, BrewError> {
        self.collect_with_skips(req).await.map(|(meta, _)| meta)
    }

    async fn collect_with_skips(
        &self,
        req: &FormulaRequest,
    ) -> Result<(ReleaseMetadata, Vec<SkippedAsset>), BrewError> {
        let resolver = Arc::clone(&self.resolver);
        let (owner, repo) = (req.owner.clone(), req.repo.clone());
        let release = tokio::task::spawn_blocking(move || resolver.latest_release(&owner, &repo))
            .await
            .map_err(|e| BrewError::Task(e.to_string()))??;

        let report = fetch_report(&release.assets, Arc::clone(&self.fetcher), self.policy).await?;
        let meta = ReleaseMetadata {
            name: req.name.clone(),
            binary: req.binary.clone(),
            description: req.description.clone(),
            homepage: req.homepage(),
            version: release.version().to_string(),
            assets: report.assets,
        };
        Ok((meta, report.skipped))
    }

    /// Compiles `template_src`, then `collect`s and renders. A template with a
    /// syntax error fails before anything is resolved or fetched.
    pub async fn render(
        &self,
        req: &FormulaRequest,
        template_src: &str,
    ) -> Result<Formula, BrewError> {
        formula::check_template(template_src)?;
        let (meta, skipped) = self.collect_with_skips(req).await?;
        let text = formula::render_formula(template_src, &meta)?;
        Ok(Formula { text, skipped })
    }
}
