// src/config/validate.rs

use std::path::Path;

use anyhow::{anyhow, Result};

use crate::config::model::ConfigFile;

/// Run basic semantic validation against a loaded configuration.
///
/// This checks:
/// - `build.cmd` is non-empty
/// - `build.limit >= 1` and `build.minor_interval >= 1`
/// - at least one watched extension, none empty or dotted
/// - `paths.state_file` / `paths.header_file` are relative, non-empty paths
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    validate_build(cfg)?;
    validate_paths(cfg)?;
    validate_watch(cfg)?;
    Ok(())
}

fn validate_build(cfg: &ConfigFile) -> Result<()> {
    if cfg.build.cmd.trim().is_empty() {
        return Err(anyhow!("[build].cmd must be a non-empty command"));
    }
    if cfg.build.limit == 0 {
        return Err(anyhow!("[build].limit must be >= 1 (got 0)"));
    }
    if cfg.build.minor_interval == 0 {
        return Err(anyhow!("[build].minor_interval must be >= 1 (got 0)"));
    }
    Ok(())
}

fn validate_paths(cfg: &ConfigFile) -> Result<()> {
    for (key, value) in [
        ("state_file", &cfg.paths.state_file),
        ("header_file", &cfg.paths.header_file),
    ] {
        if value.is_empty() {
            return Err(anyhow!("[paths].{key} must be a non-empty path"));
        }
        if Path::new(value).is_absolute() {
            return Err(anyhow!(
                "[paths].{key} must be relative to the watch root (got {value:?})"
            ));
        }
    }
    Ok(())
}

fn validate_watch(cfg: &ConfigFile) -> Result<()> {
    if cfg.watch.extensions.is_empty() {
        return Err(anyhow!(
            "[watch].extensions must list at least one extension"
        ));
    }
    for ext in &cfg.watch.extensions {
        if ext.is_empty() || ext.starts_with('.') {
            return Err(anyhow!(
                "[watch].extensions entries must be bare extensions like \"c\" (got {ext:?})"
            ));
        }
    }
    Ok(())
}
