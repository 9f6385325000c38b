//! CLI for brewgen.

mod commands;

use anyhow::Result;
use brewgen_core::config;
use brewgen_core::coordinator::FailurePolicy;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use commands::{run_completions, run_config, run_generate, run_man};

/// Top-level CLI for brewgen.
#[derive(Debug, Parser)]
#[command(name = "brewgen")]
#[command(about = "brewgen: Homebrew formula generator for GitHub releases", long_about = None)]
pub struct Cli {
    /// Repository owner. Falls back to `default_owner` in config.toml.
    #[arg(long, global = true)]
    pub owner: Option<String>,

    /// Repository name.
    #[arg(long, global = true)]
    pub repo: Option<String>,

    /// Read configuration from this file instead of ~/.config/brewgen/config.toml.
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Generate a formula for the latest release.
    #[command(visible_alias = "gen")]
    Generate(GenerateArgs),

    /// Print shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },

    /// Print the man page.
    Man,

    /// Manage the configuration file.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write a default config file (to --config if given).
    Init {
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the config file location.
    Path,
}

#[derive(Debug, Args)]
pub struct GenerateArgs {
    /// Name of the formula.
    #[arg(long)]
    pub name: String,

    /// Name of the binary installed by the formula.
    #[arg(long = "bin")]
    pub binary: String,

    /// Description of the binary.
    #[arg(long = "desc")]
    pub description: String,

    /// Homepage (default: the repository's GitHub page).
    #[arg(long)]
    pub homepage: Option<String>,

    /// Formula template file (default: built-in macOS/Linux template).
    #[arg(long, value_name = "PATH")]
    pub template: Option<PathBuf>,

    /// Write the formula here instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// What to do when an asset download fails: abort or skip.
    #[arg(long, value_name = "POLICY")]
    pub on_fetch_error: Option<FailurePolicy>,

    /// Per-asset download deadline in seconds (default: no deadline).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();

        match &cli.command {
            CliCommand::Completions { shell } => run_completions(*shell),
            CliCommand::Man => run_man(),
            CliCommand::Config(cmd) => run_config(cmd, cli.config.as_deref()),
            CliCommand::Generate(args) => {
                let cfg = match &cli.config {
                    Some(path) => config::load_from(path)?,
                    None => config::load()?,
                };
                tracing::debug!("loaded config: {:?}", cfg);
                run_generate(&cfg, cli.owner.as_deref(), cli.repo.as_deref(), args).await
            }
        }
    }
}

#[cfg(test)]
mod tests;
