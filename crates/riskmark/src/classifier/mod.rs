//! Language-model backends that answer classification prompts.

use crate::config::{AnalysisConfig, Provider};
use crate::error::Error;

pub mod gemini;
pub mod ollama;

pub use gemini::GeminiClient;
pub use ollama::OllamaClassifier;

/// Command-line overrides for the configured classifier.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ClassifierOptions {
    /// Classification provider (overrides the config file)
    #[arg(long, value_enum)]
    pub provider: Option<Provider>,

    /// Google API key for Gemini
    #[arg(long, env = "GOOGLE_API_KEY", hide_env_values = true)]
    pub google_api_key: Option<String>,

    /// Ollama base URL
    #[arg(long, env = "OLLAMA_URL")]
    pub ollama_url: Option<String>,

    /// Ollama model name
    #[arg(long, env = "OLLAMA_MODEL")]
    pub ollama_model: Option<String>,
}

impl ClassifierOptions {
    /// Layer the overrides on top of the file configuration.
    pub fn apply(&self, mut config: AnalysisConfig) -> AnalysisConfig {
        if let Some(provider) = self.provider {
            config.provider = provider;
        }
        if let Some(url) = &self.ollama_url {
            config.ollama_url = url.clone();
        }
        if let Some(model) = &self.ollama_model {
            config.ollama_model = model.clone();
        }
        config
    }
}

#[derive(Debug)]
pub enum ClassifierBackend {
    Gemini(GeminiClient),
    Ollama(OllamaClassifier),
    /// Fixed answers computed from the prompt.
    #[cfg(test)]
    Canned(fn(&str) -> String),
}

impl ClassifierBackend {
    pub fn from_config(config: &AnalysisConfig, api_key: Option<String>) -> Result<Self, Error> {
        match config.provider {
            Provider::Gemini => {
                let api_key = api_key
                    .filter(|key| !key.trim().is_empty())
                    .ok_or(Error::MissingApiKey)?;
                Ok(Self::Gemini(GeminiClient::new(api_key, config.models.clone())))
            }
            Provider::Ollama => Ok(Self::Ollama(OllamaClassifier::new(
                &config.ollama_url,
                &config.ollama_model,
            )?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Self::Gemini(client) => format!("gemini ({})", client.current_model()),
            Self::Ollama(client) => format!("ollama ({})", client.model()),
            #[cfg(test)]
            Self::Canned(_) => "canned".to_string(),
        }
    }

    /// Send one prompt and return the model's raw text answer.
    pub async fn complete(&self, prompt: &str) -> Result<String, Error> {
        log::debug!("sending {} char prompt to {}", prompt.len(), self.describe());
        match self {
            Self::Gemini(client) => client.complete(prompt).await,
            Self::Ollama(client) => client.complete(prompt).await,
            #[cfg(test)]
            Self::Canned(answer) => Ok(answer(prompt)),
        }
    }
}
