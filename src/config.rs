use anyhow::{bail, Context, Result};
use chrono::DateTime;
use serde::Deserialize;
use std::path::Path;

use crate::extract::PdfBackend;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub metadata: MetadataConfig,
    #[serde(default)]
    pub extract: ExtractConfig,
}

/// Fixed metadata stamped on every record of a run.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct MetadataConfig {
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,
    #[serde(default = "default_instrument_type")]
    pub instrument_type: String,
    #[serde(default = "default_doc_status")]
    pub doc_status: String,
    #[serde(default = "default_effective_from")]
    pub effective_from: String,
    #[serde(default = "default_effective_to")]
    pub effective_to: String,
    #[serde(default = "default_mime")]
    pub mime: String,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            jurisdiction: default_jurisdiction(),
            instrument_type: default_instrument_type(),
            doc_status: default_doc_status(),
            effective_from: default_effective_from(),
            effective_to: default_effective_to(),
            mime: default_mime(),
        }
    }
}

fn default_language() -> String {
    "bs".to_string()
}
fn default_jurisdiction() -> String {
    "BIH".to_string()
}
fn default_instrument_type() -> String {
    "regulation".to_string()
}
fn default_doc_status() -> String {
    "active".to_string()
}
fn default_effective_from() -> String {
    "2015-03-01T00:00:00Z".to_string()
}
fn default_effective_to() -> String {
    "2099-12-31T23:59:59Z".to_string()
}
fn default_mime() -> String {
    "application/pdf".to_string()
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtractConfig {
    #[serde(default)]
    pub backend: PdfBackend,
}

/// Load and validate a TOML config file.
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    config.validate()?;
    Ok(config)
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let m = &self.metadata;
        for (name, value) in [
            ("language", &m.language),
            ("jurisdiction", &m.jurisdiction),
            ("instrument_type", &m.instrument_type),
            ("doc_status", &m.doc_status),
            ("mime", &m.mime),
        ] {
            if value.trim().is_empty() {
                bail!("metadata.{} must not be empty", name);
            }
        }

        let from = DateTime::parse_from_rfc3339(&m.effective_from).with_context(|| {
            format!("metadata.effective_from is not RFC 3339: {}", m.effective_from)
        })?;
        let to = DateTime::parse_from_rfc3339(&m.effective_to).with_context(|| {
            format!("metadata.effective_to is not RFC 3339: {}", m.effective_to)
        })?;
        if from > to {
            bail!("metadata.effective_from must not be after metadata.effective_to");
        }

        Ok(())
    }
}
