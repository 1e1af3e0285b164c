#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Invalid configuration {path}: {message}")]
    Config { path: String, message: String },

    #[error("GOOGLE_API_KEY is not set")]
    MissingApiKey,

    #[error("Classifier request failed: {0}")]
    Classifier(String),

    #[error("All models failed. Last error: {0}")]
    NoModelAvailable(String),
}
