//! tint.toml configuration

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tint_theming::{ConverterConfiguration, ParseOptions};
use tint_tokens::{DecodingContext, ProcessingOptions};

pub const CONFIG_FILE: &str = "tint.toml";

/// Project configuration (tint.toml)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TintConfig {
    /// Output shape and unsupported-token handling
    pub converter: ConverterConfiguration,

    /// Pipeline options applied before conversion
    pub processing: ProcessingOptions,
}

impl TintConfig {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let config: TintConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        Ok(config)
    }

    /// Load `tint.toml` from `dir` if present, defaults otherwise
    pub fn discover(dir: &Path) -> Result<Self> {
        let config_path = dir.join(CONFIG_FILE);
        if !config_path.exists() {
            tracing::debug!("no {} in {}, using defaults", CONFIG_FILE, dir.display());
            return Ok(Self::default());
        }
        Self::load(&config_path)
    }

    pub fn into_parse_options(self, base_path: Option<PathBuf>) -> ParseOptions {
        ParseOptions {
            decoding: DecodingContext { base_path },
            processing: self.processing,
            converter: self.converter,
        }
    }
}
