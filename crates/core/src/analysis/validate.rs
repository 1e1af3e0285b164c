//! Fail-fast validation of classification payloads.
//!
//! Every entry is checked and every problem is collected; a single bad
//! entry rejects the whole batch. Nothing is defaulted or dropped silently.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::types::{ClassificationResponse, ClassifiedSentence, PremiumEstimate, RiskLevel};

/// Problem found in one entry of a sentence batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryIssue {
    pub index: usize,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum ClassificationError {
    #[error("classification payload must be a JSON object")]
    NotAnObject,
    #[error("'sentences' must be a JSON array, got {0}")]
    NotAnArray(&'static str),
    #[error("{} invalid sentence entries: {}", .0.len(), describe(.0))]
    InvalidEntries(Vec<EntryIssue>),
    #[error("invalid premium estimate: {0}")]
    InvalidPremium(String),
    #[error("no JSON {0} found in model response")]
    UnparsableResponse(&'static str),
}

fn describe(issues: &[EntryIssue]) -> String {
    issues
        .iter()
        .map(|issue| format!("#{}: {}", issue.index, issue.message))
        .collect::<Vec<_>>()
        .join("; ")
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Validate one entry, appending every problem found to `issues`.
fn check_entry(index: usize, entry: &Value, issues: &mut Vec<EntryIssue>) -> Option<ClassifiedSentence> {
    let mut problem = |message: String| issues.push(EntryIssue { index, message });

    let Some(obj) = entry.as_object() else {
        problem(format!("expected an object, got {}", kind(entry)));
        return None;
    };

    let sentence = match obj.get("sentence") {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Some(Value::String(_)) => {
            problem("'sentence' is blank".to_string());
            None
        }
        Some(other) => {
            problem(format!("'sentence' must be a string, got {}", kind(other)));
            None
        }
        None => {
            problem("missing 'sentence'".to_string());
            None
        }
    };

    let canonical = [RiskLevel::High, RiskLevel::Medium, RiskLevel::Favorable];
    let color = match obj.get("color") {
        Some(Value::String(c)) => {
            let lower = c.to_ascii_lowercase();
            if canonical.iter().any(|level| level.color() == lower) {
                Some(lower)
            } else {
                problem(format!("unsupported color '{}'", c));
                None
            }
        }
        Some(other) => {
            problem(format!("'color' must be a string, got {}", kind(other)));
            None
        }
        None => {
            problem("missing 'color'".to_string());
            None
        }
    };

    let risk_level = match obj.get("riskLevel") {
        Some(Value::String(level)) => {
            let parsed = RiskLevel::parse(level);
            if parsed.is_none() {
                problem(format!("unsupported riskLevel '{}'", level));
            }
            parsed
        }
        Some(other) => {
            problem(format!("'riskLevel' must be a string, got {}", kind(other)));
            None
        }
        None => {
            problem("missing 'riskLevel'".to_string());
            None
        }
    };

    Some(ClassifiedSentence {
        sentence: sentence?,
        color: color?,
        risk_level: risk_level?,
    })
}

/// Validate a JSON array of classified sentences.
pub fn parse_sentences(value: &Value) -> Result<Vec<ClassifiedSentence>, ClassificationError> {
    let entries = value
        .as_array()
        .ok_or_else(|| ClassificationError::NotAnArray(kind(value)))?;

    let mut issues = Vec::new();
    let sentences: Vec<ClassifiedSentence> = entries
        .iter()
        .enumerate()
        .filter_map(|(index, entry)| check_entry(index, entry, &mut issues))
        .collect();

    if !issues.is_empty() {
        log::warn!("rejecting classification batch: {} issues", issues.len());
        return Err(ClassificationError::InvalidEntries(issues));
    }

    Ok(sentences)
}

/// Validate a full `{premiumEstimate, sentences}` payload.
pub fn parse_response(value: &Value) -> Result<ClassificationResponse, ClassificationError> {
    let obj = value.as_object().ok_or(ClassificationError::NotAnObject)?;

    let sentences = parse_sentences(obj.get("sentences").unwrap_or(&Value::Null))?;

    let premium_estimate = match obj.get("premiumEstimate") {
        None | Some(Value::Null) => None,
        Some(raw) => Some(
            serde_json::from_value::<PremiumEstimate>(raw.clone())
                .map_err(|e| ClassificationError::InvalidPremium(e.to_string()))?,
        ),
    };

    Ok(ClassificationResponse {
        premium_estimate,
        sentences,
    })
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_valid_batch() {
        let value = json!([
            {"sentence": "  War is excluded.  ", "color": "#e74c3c", "riskLevel": "high"},
            {"sentence": "Cashless claims.", "color": "#27AE60", "riskLevel": "favorable"},
        ]);

        let sentences = parse_sentences(&value).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[0].sentence, "War is excluded.");
        assert_eq!(sentences[1].color, "#27ae60");
    }

    #[test]
    fn test_empty_batch_is_valid() {
        assert!(parse_sentences(&json!([])).unwrap().is_empty());
    }

    #[test]
    fn test_non_array_rejected() {
        let err = parse_sentences(&json!({"sentence": "x"})).unwrap_err();
        assert!(matches!(err, ClassificationError::NotAnArray("an object")));
    }

    #[test]
    fn test_one_bad_entry_rejects_whole_batch_with_all_issues() {
        let value = json!([
            {"sentence": "Fine.", "color": "#e74c3c", "riskLevel": "high"},
            {"color": "#e74c3c", "riskLevel": "high"},
            {"sentence": "No level.", "color": "#f39c12"},
            "just a string",
            {"sentence": "   ", "color": "blue", "riskLevel": "severe"},
        ]);

        let ClassificationError::InvalidEntries(issues) = parse_sentences(&value).unwrap_err()
        else {
            panic!("expected InvalidEntries");
        };

        let indexes: Vec<usize> = issues.iter().map(|i| i.index).collect();
        assert_eq!(indexes, vec![1, 2, 3, 4, 4, 4]);
        assert!(issues[0].message.contains("missing 'sentence'"));
        assert!(issues[1].message.contains("missing 'riskLevel'"));
        assert!(issues[2].message.contains("a string"));
    }

    #[test]
    fn test_error_message_lists_issues() {
        let err = parse_sentences(&json!([{"sentence": 3, "color": "#e74c3c", "riskLevel": "high"}]))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "1 invalid sentence entries: #0: 'sentence' must be a string, got a number"
        );
    }

    #[test]
    fn test_parse_full_response() {
        let value = json!({
            "premiumEstimate": {
                "monthlyPremium": 2400.0,
                "currency": "INR",
                "confidence": "medium",
                "notes": "Derived from sum insured."
            },
            "sentences": [
                {"sentence": "Pre-existing diseases are excluded.", "color": "#e74c3c", "riskLevel": "high"}
            ]
        });

        let response = parse_response(&value).unwrap();
        let premium = response.premium_estimate.unwrap();
        assert_eq!(premium.monthly_premium, Some(2400.0));
        assert_eq!(response.sentences[0].risk_level, RiskLevel::High);
    }

    #[test]
    fn test_response_with_null_premium() {
        let response = parse_response(&json!({"premiumEstimate": null, "sentences": []})).unwrap();
        assert!(response.premium_estimate.is_none());
    }

    #[test]
    fn test_response_missing_sentences() {
        let err = parse_response(&json!({"premiumEstimate": null})).unwrap_err();
        assert!(matches!(err, ClassificationError::NotAnArray("null")));
    }

    #[test]
    fn test_response_bad_premium() {
        let value = json!({"premiumEstimate": {"confidence": "certain"}, "sentences": []});
        assert!(matches!(
            parse_response(&value),
            Err(ClassificationError::InvalidPremium(_))
        ));
    }

    #[test]
    fn test_response_must_be_object() {
        assert!(matches!(
            parse_response(&json!([])),
            Err(ClassificationError::NotAnObject)
        ));
    }
}
