use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Background color of a highlight: one of the named tokens or a
/// `#RRGGBB` literal (stored lowercase).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum HighlightColor {
    Red,
    Green,
    Yellow,
    Hex(String),
}

impl HighlightColor {
    /// `#RRGGBB` form of the color, named tokens included.
    pub fn hex(&self) -> &str {
        match self {
            HighlightColor::Red => "#e74c3c",
            HighlightColor::Green => "#27ae60",
            HighlightColor::Yellow => "#f39c12",
            HighlightColor::Hex(hex) => hex,
        }
    }

    /// Red, green and blue channels. Channels missing from a malformed
    /// `Hex` read as zero.
    pub fn rgb(&self) -> (u8, u8, u8) {
        let hex = self.hex().trim_start_matches('#');
        let channel = |i: usize| {
            hex.get(i..i + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .unwrap_or(0)
        };
        (channel(0), channel(2), channel(4))
    }
}

impl FromStr for HighlightColor {
    type Err = RuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "red" => Ok(HighlightColor::Red),
            "green" => Ok(HighlightColor::Green),
            "yellow" => Ok(HighlightColor::Yellow),
            hex if is_hex_color(hex) => Ok(HighlightColor::Hex(hex.to_string())),
            _ => Err(RuleError::UnknownColor(s.to_string())),
        }
    }
}

fn is_hex_color(s: &str) -> bool {
    s.len() == 7 && s.starts_with('#') && s[1..].chars().all(|c| c.is_ascii_hexdigit())
}

impl TryFrom<String> for HighlightColor {
    type Error = RuleError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<HighlightColor> for String {
    fn from(color: HighlightColor) -> Self {
        color.to_string()
    }
}

impl fmt::Display for HighlightColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HighlightColor::Red => write!(f, "red"),
            HighlightColor::Green => write!(f, "green"),
            HighlightColor::Yellow => write!(f, "yellow"),
            HighlightColor::Hex(hex) => write!(f, "{}", hex),
        }
    }
}

/// A validated directive to highlight every occurrence of `text`.
///
/// Construct through [`HighlightRule::new`] or [`validate_rules`]; the text is
/// guaranteed to contain at least one non-whitespace character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HighlightRule {
    text: String,
    color: HighlightColor,
    case_sensitive: bool,
}

impl HighlightRule {
    pub fn new(
        text: impl Into<String>,
        color: &str,
        case_sensitive: bool,
    ) -> Result<Self, RuleError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RuleError::EmptyText);
        }
        Ok(Self {
            text,
            color: color.parse()?,
            case_sensitive,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> &HighlightColor {
        &self.color
    }

    pub fn case_sensitive(&self) -> bool {
        self.case_sensitive
    }
}

/// An unvalidated rule as it arrives over the wire.
///
/// Any JSON value deserializes into a `RawRule`; field types are checked by
/// [`validate_rules`] so that one malformed entry cannot sink its batch.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Value")]
pub struct RawRule {
    pub text: Value,
    pub color: Value,
    pub case_sensitive: Value,
}

impl RawRule {
    pub fn new(text: &str, color: &str, case_sensitive: bool) -> Self {
        Self {
            text: Value::from(text),
            color: Value::from(color),
            case_sensitive: Value::from(case_sensitive),
        }
    }

    fn check(self) -> Result<HighlightRule, RuleError> {
        let text = match self.text {
            Value::String(text) => text,
            Value::Null => return Err(RuleError::MissingField("text")),
            _ => return Err(RuleError::WrongType("text", "a string")),
        };
        let color = match self.color {
            Value::String(color) => color,
            Value::Null => return Err(RuleError::MissingField("color")),
            _ => return Err(RuleError::WrongType("color", "a string")),
        };
        let case_sensitive = match self.case_sensitive {
            Value::Bool(flag) => flag,
            Value::Null => false,
            _ => return Err(RuleError::WrongType("caseSensitive", "a boolean")),
        };
        HighlightRule::new(text, &color, case_sensitive)
    }
}

impl From<Value> for RawRule {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::default();
        };
        let mut take = |key: &str| fields.remove(key).unwrap_or(Value::Null);
        Self {
            text: take("text"),
            color: take("color"),
            case_sensitive: take("caseSensitive"),
        }
    }
}

/// Why a rule was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule text is empty or whitespace-only")]
    EmptyText,
    #[error("rule is missing '{0}'")]
    MissingField(&'static str),
    #[error("rule field '{0}' must be {1}")]
    WrongType(&'static str, &'static str),
    #[error("unknown color '{0}' (expected red, green, yellow or #RRGGBB)")]
    UnknownColor(String),
    #[error("rule pattern could not be compiled: {0}")]
    Pattern(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RejectedRule {
    /// Position of the rule in the submitted list.
    pub index: usize,
    pub message: String,
}

/// Outcome of validating a batch of rules. Rejections never affect the
/// accepted rules, which keep their submission order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RuleValidation {
    pub accepted: Vec<HighlightRule>,
    pub rejected: Vec<RejectedRule>,
}

/// Validate every rule, keeping the good ones and reporting the rest.
pub fn validate_rules(raw: Vec<RawRule>) -> RuleValidation {
    let mut validation = RuleValidation::default();

    for (index, rule) in raw.into_iter().enumerate() {
        let checked = rule
            .check()
            .and_then(|rule| super::matcher::Matcher::new(&rule).map(|_| rule));
        match checked {
            Ok(rule) => validation.accepted.push(rule),
            Err(err) => {
                log::warn!("rejected highlight rule #{}: {}", index, err);
                validation.rejected.push(RejectedRule {
                    index,
                    message: err.to_string(),
                });
            }
        }
    }

    validation
}

/// A half-open byte range `[start, end)` of the document with a color.
///
/// Offsets are UTF-8 byte offsets and always fall on character boundaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub color: HighlightColor,
}

/// One located occurrence of a rule.
pub type MatchSpan = Span;

/// A span after overlap resolution; a list of these never overlaps.
pub type MergedSpan = Span;

/// A contiguous piece of the document. Concatenating a segment list in
/// order yields the document exactly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub highlighted: bool,
    pub color: Option<HighlightColor>,
}

impl Segment {
    pub fn plain(text: &str) -> Self {
        Self {
            text: text.to_string(),
            highlighted: false,
            color: None,
        }
    }

    pub fn highlighted(text: &str, color: HighlightColor) -> Self {
        Self {
            text: text.to_string(),
            highlighted: true,
            color: Some(color),
        }
    }
}
