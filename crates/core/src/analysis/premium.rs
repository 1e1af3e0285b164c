use serde_json::Value;

use super::chunk::prefix_chars;
use super::types::{Confidence, PremiumEstimate};

pub const DEFAULT_CURRENCY: &str = "INR";
pub const DEFAULT_NOTES: &str = "Premium estimation completed";
pub const MISSING_PREMIUM_NOTES: &str =
    "Estimated using default rates for policy type (premium not found in document)";

/// Characters inspected when the premium call itself failed.
pub const ERROR_SAMPLE_CHARS: usize = 1000;

/// Keyword-based monthly premium, in INR.
fn default_rate(sample: &str) -> f64 {
    let lower = sample.to_lowercase();
    if lower.contains("public liability") {
        2000.0
    } else if lower.contains("health") || lower.contains("medical") {
        3000.0
    } else {
        2500.0
    }
}

/// Low-confidence estimate derived from policy keywords.
pub fn fallback_premium(sample: &str, notes: impl Into<String>) -> PremiumEstimate {
    PremiumEstimate {
        monthly_premium: Some(default_rate(sample)),
        currency: Some(DEFAULT_CURRENCY.to_string()),
        confidence: Confidence::Low,
        notes: notes.into(),
    }
}

/// Estimate used when the premium request failed outright.
pub fn premium_after_error(policy_text: &str, error: &str) -> PremiumEstimate {
    fallback_premium(
        prefix_chars(policy_text, ERROR_SAMPLE_CHARS),
        format!("Default estimate provided due to analysis error: {}", error),
    )
}

fn string_field(raw: &Value, key: &str) -> Option<String> {
    raw.get(key).and_then(Value::as_str).map(str::to_string)
}

/// Turn the model's premium object into a complete estimate.
///
/// `sample` is the policy text the model saw; it drives the fallback
/// rate when `monthlyPremium` is missing or null.
pub fn normalize_premium(raw: &Value, sample: &str) -> PremiumEstimate {
    let currency = string_field(raw, "currency").unwrap_or_else(|| DEFAULT_CURRENCY.to_string());

    let Some(monthly) = raw.get("monthlyPremium").and_then(Value::as_f64) else {
        log::info!("model returned no premium, using default rate");
        return PremiumEstimate {
            currency: Some(currency),
            ..fallback_premium(sample, MISSING_PREMIUM_NOTES)
        };
    };

    let confidence = match raw.get("confidence").and_then(Value::as_str) {
        Some("high") => Confidence::High,
        Some("medium") => Confidence::Medium,
        _ => Confidence::Low,
    };

    PremiumEstimate {
        monthly_premium: Some(monthly),
        currency: Some(currency),
        confidence,
        notes: string_field(raw, "notes").unwrap_or_else(|| DEFAULT_NOTES.to_string()),
    }
}
