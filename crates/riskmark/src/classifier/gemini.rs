use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::Error;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// Concatenated text parts of the first candidate.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text.trim().to_string())
        }
    }
}

/// Gemini `generateContent` client that walks a list of models until one
/// answers, then sticks with it.
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    models: Vec<String>,
    preferred: AtomicUsize,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("models", &self.models)
            .field("current", &self.current_model())
            .finish()
    }
}

impl GeminiClient {
    pub fn new(api_key: String, models: Vec<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            models,
            preferred: AtomicUsize::new(0),
        }
    }

    pub fn current_model(&self) -> &str {
        let index = self.preferred.load(Ordering::Relaxed);
        self.models.get(index).map(String::as_str).unwrap_or_default()
    }

    async fn generate(&self, model: &str, prompt: &str) -> Result<String, Error> {
        let url = format!("{}/models/{}:generateContent", GEMINI_API_BASE, model);
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| Error::Classifier(format!("{}: {}", model, e)))?;

        if !response.status().is_success() {
            return Err(Error::Classifier(format!(
                "{}: HTTP {}",
                model,
                response.status()
            )));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|e| Error::Classifier(format!("{}: {}", model, e)))?;

        parsed
            .text()
            .ok_or_else(|| Error::Classifier(format!("{}: empty response", model)))
    }

    pub async fn complete(&self, prompt: &str) -> Result<String, Error> {
        let start = self.preferred.load(Ordering::Relaxed);
        let mut last_error = String::from("no models configured");

        for (index, model) in self.models.iter().enumerate().skip(start) {
            match self.generate(model, prompt).await {
                Ok(text) => {
                    if index != start {
                        log::info!("switching to Gemini model {}", model);
                        self.preferred.store(index, Ordering::Relaxed);
                    }
                    return Ok(text);
                }
                Err(err) => {
                    log::warn!("Gemini model {} failed: {}", model, err);
                    last_error = err.to_string();
                }
            }
        }

        Err(Error::NoModelAvailable(last_error))
    }
}
