//! `brewgen generate` – resolve the latest release, hash its assets, render the formula.

use anyhow::{Context, Result};
use brewgen_core::config::BrewgenConfig;
use brewgen_core::fetch::CurlFetcher;
use brewgen_core::formula::DEFAULT_TEMPLATE;
use brewgen_core::pipeline::{FormulaRequest, Pipeline};
use brewgen_core::release::GithubResolver;
use std::fs;
use std::io::Write;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::cli::GenerateArgs;

pub async fn run_generate(
    cfg: &BrewgenConfig,
    owner: Option<&str>,
    repo: Option<&str>,
    args: &GenerateArgs,
) -> Result<()> {
    let (owner, repo) = resolve_repo(cfg, owner, repo)?;
    let template = load_template(args.template.as_deref())?;

    let mut http = cfg.http_options();
    if let Some(secs) = args.timeout {
        http.timeout = Some(Duration::from_secs(secs));
    }
    let policy = args.on_fetch_error.unwrap_or(cfg.on_fetch_error);

    let pipeline = Pipeline::new(
        Arc::new(GithubResolver::new(cfg.github_api_url.clone(), http.clone())),
        Arc::new(CurlFetcher::new(http)),
        policy,
    );
    let req = FormulaRequest {
        owner,
        repo,
        name: args.name.clone(),
        binary: args.binary.clone(),
        description: args.description.clone(),
        homepage: args.homepage.clone(),
    };
    tracing::info!(owner = %req.owner, repo = %req.repo, %policy, "generating formula");

    let formula = match pipeline.render(&req, &template).await {
        Ok(formula) => formula,
        Err(e) => {
            tracing::error!(kind = e.kind(), "formula generation failed: {}", e);
            return Err(anyhow::Error::new(e)
                .context(format!("generate formula for {}/{}", req.owner, req.repo)));
        }
    };

    for skipped in &formula.skipped {
        eprintln!(
            "brewgen warning: formula has no {} entry ({}): {}",
            skipped.classifier, skipped.url, skipped.error
        );
    }

    // Nothing is written unless rendering succeeded.
    match &args.output {
        Some(path) => {
            fs::write(path, &formula.text).with_context(|| format!("write {}", path.display()))?;
            tracing::info!("wrote formula to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(formula.text.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

/// Owner from the flag or config, repo from the flag.
pub(crate) fn resolve_repo(
    cfg: &BrewgenConfig,
    owner: Option<&str>,
    repo: Option<&str>,
) -> Result<(String, String)> {
    let owner = owner
        .map(str::to_string)
        .or_else(|| cfg.default_owner.clone())
        .context("no repository owner: pass --owner or set default_owner in config.toml")?;
    let repo = repo.context("--repo is required")?.to_string();
    if owner.is_empty() || repo.is_empty() {
        anyhow::bail!("repository owner and name must not be empty");
    }
    Ok((owner, repo))
}

/// Source of the template at `path`, or the built-in one.
pub(crate) fn load_template(path: Option<&Path>) -> Result<String> {
    match path {
        Some(p) => {
            fs::read_to_string(p).with_context(|| format!("read template {}", p.display()))
        }
        None => Ok(DEFAULT_TEMPLATE.to_string()),
    }
}
