use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers::ollama;

use crate::error::Error;

const SYSTEM_PREAMBLE: &str = "\
You are an insurance policy analyst.
You answer with raw JSON only. No markdown fences. No explanations.";

pub struct OllamaClassifier {
    client: ollama::Client,
    model: String,
}

impl std::fmt::Debug for OllamaClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OllamaClassifier")
            .field("model", &self.model)
            .finish()
    }
}

impl OllamaClassifier {
    pub fn new(ollama_url: &str, model: &str) -> Result<Self, Error> {
        use rig::client::Nothing;

        let client = ollama::Client::builder()
            .api_key(Nothing)
            .base_url(ollama_url)
            .build()
            .map_err(|e| Error::Classifier(format!("Failed to create Ollama client: {}", e)))?;

        Ok(Self {
            client,
            model: model.to_string(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let agent = self
            .client
            .agent(&self.model)
            .preamble(SYSTEM_PREAMBLE)
            .build();

        agent
            .prompt(prompt)
            .await
            .map_err(|e| Error::Classifier(format!("{}: {}", self.model, e)))
    }
}
