//! Configuration file handling
//!
//! The CLI reads the same `vitrine.toml` the site uses. When no path is
//! given, `vitrine.toml` in the working directory is used if present,
//! otherwise defaults apply.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use vitrine_site::SiteConfig;

/// Default configuration file name
pub const CONFIG_FILE: &str = "vitrine.toml";

/// Load the site configuration from `path`, or from the default location
pub fn load(path: Option<&Path>) -> Result<SiteConfig> {
    let path: PathBuf = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from(CONFIG_FILE);
            if !default.exists() {
                debug!("No {} found, using defaults", CONFIG_FILE);
                return Ok(SiteConfig::default());
            }
            default
        }
    };

    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let config = SiteConfig::from_toml_str(&content)
        .with_context(|| format!("Failed to load {}", path.display()))?;

    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}
