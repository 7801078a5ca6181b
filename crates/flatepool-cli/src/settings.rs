//! Service configuration for the CLI: TOML file plus command line overrides

use anyhow::{Context, Result};
use flatepool_types::{CompressionLevel, ServiceConfig};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Command line values that take precedence over the configuration file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Compression level (0-9)
    pub level: Option<u32>,
    /// Decompressed output ceiling in bytes
    pub max_output: Option<usize>,
    /// Remove the decompressed output ceiling
    pub no_output_limit: bool,
}

/// Load configuration from a TOML file
///
/// Keys missing from the file keep their default values.
pub fn load_from_file(path: &Path) -> Result<ServiceConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: ServiceConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse TOML config {}", path.display()))?;
    debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Save configuration as TOML
pub fn save_to_file(config: &ServiceConfig, path: &Path) -> Result<()> {
    fs::write(path, to_toml(config)?)
        .with_context(|| format!("Failed to write config file {}", path.display()))
}

/// Render configuration as TOML
pub fn to_toml(config: &ServiceConfig) -> Result<String> {
    toml::to_string_pretty(config).context("Failed to serialize configuration")
}

/// Build the effective configuration
pub fn resolve(path: Option<&Path>, overrides: &Overrides) -> Result<ServiceConfig> {
    let mut config = match path {
        Some(path) => load_from_file(path)?,
        None => ServiceConfig::default(),
    };

    if let Some(level) = overrides.level {
        config.level = CompressionLevel::new(level)?;
    }
    if overrides.no_output_limit {
        config.max_decompressed_size = None;
    } else if let Some(limit) = overrides.max_output {
        config.max_decompressed_size = Some(limit);
    }

    config.validate()?;
    Ok(config)
}
