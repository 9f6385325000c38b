//! `brewgen config init|path` – the only commands that write or locate config.toml.

use anyhow::Result;
use brewgen_core::config;
use std::path::{Path, PathBuf};

use crate::cli::ConfigCommand;

pub fn run_config(cmd: &ConfigCommand, explicit: Option<&Path>) -> Result<()> {
    let path = target_path(explicit)?;
    match cmd {
        ConfigCommand::Init { force } => {
            if config::init_at(&path, *force)? {
                println!("Wrote default config to {}", path.display());
            } else {
                println!("Config already exists at {} (use --force to overwrite)", path.display());
            }
        }
        ConfigCommand::Path => println!("{}", path.display()),
    }
    Ok(())
}

fn target_path(explicit: Option<&Path>) -> Result<PathBuf> {
    match explicit {
        Some(p) => Ok(p.to_path_buf()),
        None => config::config_path(),
    }
}
