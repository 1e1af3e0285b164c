//! Prompt builders for the two classification calls.

use super::chunk::prefix_chars;
use super::types::{FAVORABLE_COLOR, HIGH_RISK_COLOR, MEDIUM_RISK_COLOR};

/// Characters of policy text sent for premium estimation.
pub const PREMIUM_SAMPLE_CHARS: usize = 5000;

/// Prompt asking for a `PremiumEstimate` JSON object.
pub fn build_premium_prompt(policy_text: &str, sample_chars: usize) -> String {
    let sample = prefix_chars(policy_text, sample_chars);

    format!(
        r#"You are an insurance policy analyst. Estimate the monthly premium of the policy below.

If the policy states its premium, use that figure. Otherwise approximate it from the
coverage type, coverage limits, deductibles or excess amounts, and typical market rates
for comparable policies in the same region. Always give a number for monthlyPremium.

Reference ranges in India: public liability cover usually costs 500 to 5000 INR per month,
health cover 1000 to 10000 INR per month.

Confidence:
- "high" when the premium is stated in the policy
- "medium" when it follows from clear coverage details
- "low" when only the policy type is known

Respond with raw JSON only, no prose and no code fences, shaped exactly like:
{{
  "monthlyPremium": <number>,
  "currency": "<ISO currency code such as INR or USD>",
  "confidence": "<high|medium|low>",
  "notes": "<one or two sentences on how the figure was reached>"
}}

Policy text:
{sample}"#
    )
}

/// Prompt asking for a JSON array of classified sentences from one chunk.
pub fn build_sentence_prompt(chunk: &str, part: usize, total: usize) -> String {
    let marker = if total > 1 {
        format!(" (Part {} of {})", part, total)
    } else {
        String::new()
    };

    format!(
        r#"You are an insurance policy analyst. Read the policy text{marker} below and pick out the
sentences that matter to the policyholder.

Classify each picked sentence as one of:
- "high": exclusions, penalties, hard limitations or other unfavorable terms. Color {HIGH_RISK_COLOR}.
- "medium": conditions, obligations or moderate limitations. Color {MEDIUM_RISK_COLOR}.
- "favorable": benefits, protections and rights of the policyholder. Color {FAVORABLE_COLOR}.

Copy every sentence verbatim from the text, keeping its wording, punctuation and
capitalization. Do not paraphrase. A sentence that wraps across lines keeps its line breaks.

Respond with raw JSON only, no prose and no code fences: an array whose elements look like
{{"sentence": "<exact text>", "color": "<hex color>", "riskLevel": "<high|medium|favorable>"}}
Respond with [] when nothing in this text qualifies.

Policy text{marker}:
{chunk}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_premium_prompt_uses_prefix_only() {
        let text = format!("{}{}", "a".repeat(PREMIUM_SAMPLE_CHARS), "TAIL");
        let prompt = build_premium_prompt(&text, PREMIUM_SAMPLE_CHARS);
        assert!(!prompt.contains("TAIL"));
        assert!(prompt.contains("\"monthlyPremium\""));
    }

    #[test]
    fn test_sentence_prompt_part_marker() {
        let single = build_sentence_prompt("Some text.", 1, 1);
        assert!(!single.contains("(Part"));

        let multi = build_sentence_prompt("Some text.", 2, 3);
        assert!(multi.contains("policy text (Part 2 of 3) below"));
        assert!(multi.contains("Policy text (Part 2 of 3):\nSome text."));
    }

    #[test]
    fn test_sentence_prompt_names_colors() {
        let prompt = build_sentence_prompt("x", 1, 1);
        for color in [HIGH_RISK_COLOR, MEDIUM_RISK_COLOR, FAVORABLE_COLOR] {
            assert!(prompt.contains(color));
        }
    }
}
