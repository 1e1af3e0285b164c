//! Optional TOML configuration.
//!
//! ```toml
//! [layout]
//! line_bucket = 2.0
//!
//! [analysis]
//! provider = "ollama"
//! ollama_model = "llama3.1"
//! ```

use std::path::Path;

use pdf::LayoutConfig;
use serde::{Deserialize, Serialize};

use crate::prelude::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Gemini,
    Ollama,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub provider: Provider,
    /// Gemini models, tried in order until one answers.
    pub models: Vec<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub chunk_size: usize,
    pub premium_sample: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            provider: Provider::Gemini,
            models: vec![
                "gemini-2.5-pro".to_string(),
                "gemini-1.5-pro".to_string(),
                "gemini-1.5-flash".to_string(),
            ],
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llama3.1".to_string(),
            chunk_size: riskmark_core::analysis::CHUNK_CHARS,
            premium_sample: riskmark_core::analysis::PREMIUM_SAMPLE_CHARS,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub layout: LayoutConfig,
    pub analysis: AnalysisConfig,
}

impl Config {
    /// Load the file at `path`, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };

        let raw = std::fs::read_to_string(path)
            .with_context(|| f!("Failed to read config file {}", path.display()))?;
        let config = Self::parse(&raw).map_err(|message| Error::Config {
            path: path.display().to_string(),
            message,
        })?;

        log::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    fn parse(raw: &str) -> std::result::Result<Self, String> {
        let config: Self = toml::from_str(raw).map_err(|e| e.to_string())?;
        if config.analysis.chunk_size == 0 {
            return Err("analysis.chunk_size must be greater than zero".to_string());
        }
        if config.analysis.provider == Provider::Gemini && config.analysis.models.is_empty() {
            return Err("analysis.models must name at least one Gemini model".to_string());
        }
        config.layout.validate()?;
        Ok(config)
    }
}
