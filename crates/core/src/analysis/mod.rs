//! Risk classification payloads.
//!
//! Everything here is pure: prompt text goes out, model text comes back and
//! is turned into validated [`ClassifiedSentence`]s and a [`PremiumEstimate`].
//! The shell owns the network calls.

pub mod chunk;
pub mod extract;
pub mod premium;
pub mod prompt;
pub mod types;
pub mod validate;

pub use chunk::{chunk_text, dedupe_sentences, prefix_chars, CHUNK_CHARS};
pub use extract::{extract_json, strip_code_fence, JsonShape};
pub use premium::{fallback_premium, normalize_premium, premium_after_error};
pub use prompt::{build_premium_prompt, build_sentence_prompt, PREMIUM_SAMPLE_CHARS};
pub use types::*;
pub use validate::{parse_response, parse_sentences, ClassificationError, EntryIssue};

/// Parse one chunk's raw model answer into validated sentences.
pub fn parse_sentence_response(response: &str) -> Result<Vec<ClassifiedSentence>, ClassificationError> {
    let value = extract_json(response, JsonShape::Array)?;
    parse_sentences(&value)
}

/// Parse the raw premium answer. `sample` is the text the model was shown.
pub fn parse_premium_response(response: &str, sample: &str) -> Result<PremiumEstimate, ClassificationError> {
    let value = extract_json(response, JsonShape::Object)?;
    if !value.is_object() {
        return Err(ClassificationError::InvalidPremium(format!(
            "expected an object, got {}",
            validate::kind(&value)
        )));
    }
    Ok(normalize_premium(&value, sample))
}
