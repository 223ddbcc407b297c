//! Corpus layout configuration.
//!
//! Describes which subdirectories of a distribution hold utterance tables,
//! the language label stamped on each section's records, and the output stem
//! for the emitted STM files. Defaults match the LDC2022E01-style layout the
//! tools were written for; an alternate layout can be supplied as TOML via
//! `--config`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub corpus: CorpusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CorpusConfig {
    /// Channel identifier stamped on every STM record
    pub channel_id: String,
    /// Corpus sections prepared per invocation, in order
    pub sections: Vec<SectionConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Subdirectory of the distribution root holding the utterance tables
    pub tables: String,
    /// Output stem under the STM destination directory
    pub output_stem: String,
    /// Language label for every record; also selects the normalization rules
    pub label: String,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            channel_id: "1".to_string(),
            sections: vec![
                SectionConfig {
                    tables: "data/translations/ta".to_string(),
                    output_stem: "st-aeb2eng".to_string(),
                    label: "<eng>".to_string(),
                },
                SectionConfig {
                    tables: "data/transcripts/ta".to_string(),
                    output_stem: "asr-aeb".to_string(),
                    label: "<aeb>".to_string(),
                },
            ],
        }
    }
}

impl Config {
    /// Load configuration from an explicit path, or fall back to the
    /// built-in distribution layout.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded config from {:?}", path);
        Ok(config)
    }
}
