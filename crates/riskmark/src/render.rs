//! Terminal rendering of segments.
//!
//! Highlighted segments get a true-color background and a `[n]` suffix with
//! their segment index, so a reader can refer back to them.

use colored::Colorize;
use riskmark_core::analysis::{Confidence, PremiumEstimate};
use riskmark_core::highlight::{RejectedRule, Segment};

pub fn render_segments(segments: &[Segment]) -> String {
    let mut out = String::new();

    for (index, segment) in segments.iter().enumerate() {
        match (&segment.color, segment.highlighted) {
            (Some(color), true) => {
                let (r, g, b) = color.rgb();
                out.push_str(&segment.text.on_truecolor(r, g, b).black().to_string());
                out.push_str(&format!("[{}]", index).bright_black().to_string());
            }
            _ => out.push_str(&segment.text),
        }
    }

    out
}

pub fn render_premium(premium: &PremiumEstimate) -> String {
    let amount = match premium.monthly_premium {
        Some(amount) => format!(
            "{:.2} {}",
            amount,
            premium.currency.as_deref().unwrap_or_default()
        ),
        None => "unknown".to_string(),
    };
    let confidence = match premium.confidence {
        Confidence::High => "high".green(),
        Confidence::Medium => "medium".yellow(),
        Confidence::Low => "low".red(),
    };

    format!(
        "{} {} ({} confidence)\n{}",
        "Monthly premium:".bold().cyan(),
        amount.trim_end().bright_white(),
        confidence,
        premium.notes.bright_black()
    )
}

pub fn render_rejected(rejected: &RejectedRule) -> String {
    format!(
        "{} rule #{}: {}",
        "skipped".yellow(),
        rejected.index,
        rejected.message
    )
}

#[cfg(test)]
mod tests {
    use riskmark_core::highlight::HighlightColor;

    use super::*;

    fn plain_output() {
        colored::control::set_override(false);
    }

    #[test]
    fn test_segments_get_index_suffix() {
        plain_output();
        let segments = vec![
            Segment::plain("Cover ends if "),
            Segment::highlighted("premium is unpaid", HighlightColor::Red),
            Segment::plain(" for 30 days."),
        ];

        assert_eq!(
            render_segments(&segments),
            "Cover ends if premium is unpaid[1] for 30 days."
        );
    }

    #[test]
    fn test_plain_document_is_unchanged() {
        plain_output();
        let segments = vec![Segment::plain("nothing to see")];
        assert_eq!(render_segments(&segments), "nothing to see");
    }

    #[test]
    fn test_premium_line() {
        plain_output();
        let premium = PremiumEstimate {
            monthly_premium: Some(2500.0),
            currency: Some("INR".to_string()),
            confidence: Confidence::Low,
            notes: "Default rate.".to_string(),
        };
        assert_eq!(
            render_premium(&premium),
            "Monthly premium: 2500.00 INR (low confidence)\nDefault rate."
        );
    }

    #[test]
    fn test_rejected_line() {
        plain_output();
        let rejected = RejectedRule {
            index: 2,
            message: "rule text is empty or whitespace-only".to_string(),
        };
        assert_eq!(
            render_rejected(&rejected),
            "skipped rule #2: rule text is empty or whitespace-only"
        );
    }
}
