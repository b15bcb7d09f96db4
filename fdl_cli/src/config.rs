//! TOML configuration holding the festival listing URL.

use std::{fs::read_to_string, path::Path};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Contents of the configuration file.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// The festival listing URL to fetch.
    pub url: String,
}

impl Config {
    /// Read and parse the configuration file at `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let text = read_to_string(path)
            .with_context(|| format!("cannot read configuration file {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("cannot parse configuration file {}", path.display()))?;
        Ok(config)
    }
}
