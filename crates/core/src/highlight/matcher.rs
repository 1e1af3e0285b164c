//! Whitespace-tolerant rule matching.
//!
//! A rule's text is matched literally except that every whitespace run in it
//! matches any non-empty whitespace run (newlines included) in the document.
//! This absorbs the difference between geometric spacing in reconstructed
//! text and the sentence text supplied by the classifier.

use regex::{Regex, RegexBuilder};

use super::types::{HighlightRule, MatchSpan, RuleError};

/// Compiled form of a [`HighlightRule`].
#[derive(Debug, Clone)]
pub struct Matcher {
    regex: Regex,
}

/// Escape `text` for the regex engine, turning whitespace runs into `\s+`.
pub fn whitespace_tolerant_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() * 2);
    let mut in_whitespace = false;

    for ch in text.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                pattern.push_str(r"\s+");
                in_whitespace = true;
            }
        } else {
            let mut buf = [0u8; 4];
            pattern.push_str(&regex::escape(ch.encode_utf8(&mut buf)));
            in_whitespace = false;
        }
    }

    pattern
}

impl Matcher {
    pub fn new(rule: &HighlightRule) -> Result<Self, RuleError> {
        let regex = RegexBuilder::new(&whitespace_tolerant_pattern(rule.text()))
            .case_insensitive(!rule.case_sensitive())
            .build()
            .map_err(|e| RuleError::Pattern(e.to_string()))?;
        Ok(Self { regex })
    }

    /// Byte ranges of all non-overlapping occurrences, scanning left to right
    /// and resuming after each match.
    pub fn find_all(&self, document: &str) -> Vec<(usize, usize)> {
        let mut ranges = Vec::new();
        let mut pos = 0;

        while pos <= document.len() {
            let Some(m) = self.regex.find_at(document, pos) else {
                break;
            };
            if m.is_empty() {
                // Nothing to highlight; step over one character to make progress.
                pos = document[m.end()..]
                    .chars()
                    .next()
                    .map_or(document.len() + 1, |c| m.end() + c.len_utf8());
                continue;
            }
            ranges.push((m.start(), m.end()));
            pos = m.end();
        }

        ranges
    }
}

/// Locate every occurrence of every rule, sorted by ascending start.
///
/// The sort is stable: spans that start at the same offset stay in rule
/// order, then occurrence order. That order is the precedence consumed by
/// [`merge_spans`](super::merge::merge_spans).
pub fn find_matches(document: &str, rules: &[HighlightRule]) -> Result<Vec<MatchSpan>, RuleError> {
    let mut spans = Vec::new();

    for rule in rules {
        let matcher = Matcher::new(rule)?;
        let before = spans.len();
        spans.extend(
            matcher
                .find_all(document)
                .into_iter()
                .map(|(start, end)| MatchSpan {
                    start,
                    end,
                    color: rule.color().clone(),
                }),
        );
        log::debug!(
            "rule {:?} matched {} times",
            rule.text(),
            spans.len() - before
        );
    }

    spans.sort_by_key(|span| span.start);
    Ok(spans)
}
