use serde::{Deserialize, Serialize};

use crate::highlight::{HighlightRule, RuleError};

pub const HIGH_RISK_COLOR: &str = "#e74c3c";
pub const MEDIUM_RISK_COLOR: &str = "#f39c12";
pub const FAVORABLE_COLOR: &str = "#27ae60";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Favorable,
}

impl RiskLevel {
    pub fn color(self) -> &'static str {
        match self {
            RiskLevel::High => HIGH_RISK_COLOR,
            RiskLevel::Medium => MEDIUM_RISK_COLOR,
            RiskLevel::Favorable => FAVORABLE_COLOR,
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "high" => Some(RiskLevel::High),
            "medium" => Some(RiskLevel::Medium),
            "favorable" => Some(RiskLevel::Favorable),
            _ => None,
        }
    }
}

/// One sentence of the policy with its risk classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSentence {
    pub sentence: String,
    pub color: String,
    pub risk_level: RiskLevel,
}

impl ClassifiedSentence {
    /// Classifier sentences always match case-insensitively.
    pub fn to_rule(&self) -> Result<HighlightRule, RuleError> {
        HighlightRule::new(self.sentence.as_str(), &self.color, false)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PremiumEstimate {
    pub monthly_premium: Option<f64>,
    pub currency: Option<String>,
    pub confidence: Confidence,
    pub notes: String,
}

/// The classification collaborator's full answer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResponse {
    pub premium_estimate: Option<PremiumEstimate>,
    pub sentences: Vec<ClassifiedSentence>,
}

impl ClassificationResponse {
    /// Highlight rules in sentence order, which is also their precedence.
    pub fn to_rules(&self) -> Result<Vec<HighlightRule>, RuleError> {
        self.sentences.iter().map(ClassifiedSentence::to_rule).collect()
    }
}
