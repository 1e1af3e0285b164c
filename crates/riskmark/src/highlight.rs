use std::path::{Path, PathBuf};

use riskmark_core::highlight::{validate_rules, RawRule, RejectedRule, Segment};
use serde::Serialize;

use crate::config::Config;
use crate::prelude::{eprintln, println, *};
use crate::render::{render_rejected, render_segments};

#[derive(Debug, clap::Args)]
pub struct Options {
    /// Path to the PDF file
    pub path: PathBuf,

    /// JSON file with an array of {text, color, caseSensitive?} rules
    #[arg(long)]
    pub rules: PathBuf,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
pub struct HighlightOutput {
    pub segments: Vec<Segment>,
    pub rejected: Vec<RejectedRule>,
}

pub async fn run(options: Options, global: crate::Global, config: Config) -> Result<()> {
    let raw_rules = read_rules(&options.rules)?;
    let text = crate::text::read_document(&options.path, &config.layout)?;

    if global.verbose {
        eprintln!("Rules: {}", raw_rules.len());
        eprintln!("Document length: {} chars", text.chars().count());
    }

    let output = highlight_text(&text, raw_rules)?;

    if options.json {
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    for rejected in &output.rejected {
        eprintln!("{}", render_rejected(rejected));
    }
    println!("{}", render_segments(&output.segments));
    Ok(())
}

pub fn read_rules(path: &Path) -> Result<Vec<RawRule>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| f!("Failed to read rules file {}", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| f!("Rules file {} is not a JSON array of rules", path.display()))
}

/// Validate `raw_rules` and segment `text` with the accepted ones.
pub fn highlight_text(text: &str, raw_rules: Vec<RawRule>) -> Result<HighlightOutput> {
    let validation = validate_rules(raw_rules);
    let segments = riskmark_core::highlight::highlight(text, &validation.accepted)?;

    log::info!(
        "{} rules accepted, {} rejected, {} segments",
        validation.accepted.len(),
        validation.rejected.len(),
        segments.len()
    );

    Ok(HighlightOutput {
        segments,
        rejected: validation.rejected,
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_read_rules_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r##"[{{"text": "excluded", "color": "red"}}, {{"text": "Cashless", "color": "#27ae60", "caseSensitive": true}}]"##
        )
        .unwrap();

        let rules = read_rules(file.path()).unwrap();
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].case_sensitive, serde_json::Value::Null);
        assert_eq!(rules[1].case_sensitive, serde_json::Value::Bool(true));
    }

    #[test]
    fn test_malformed_rule_in_file_does_not_sink_the_batch() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"text": "excluded", "color": "red"}}, {{"text": "war"}}, {{"text": 5, "color": "red"}}]"#
        )
        .unwrap();

        let rules = read_rules(file.path()).unwrap();
        let output = highlight_text("War risks are excluded.", rules).unwrap();

        let rejected: Vec<usize> = output.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![1, 2]);
        assert!(output.rejected[0].message.contains("color"));
        assert_eq!(output.segments[1].text, "excluded");
        assert!(output.segments[1].highlighted);
    }

    #[test]
    fn test_rules_file_must_be_array() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"text": "x"}}"#).unwrap();
        assert!(read_rules(file.path()).is_err());
    }

    #[test]
    fn test_bad_rules_are_reported_and_good_rules_apply() {
        let rules = vec![
            RawRule::new("   ", "red", false),
            RawRule::new("war", "purple", false),
            RawRule::new("flood damage", "yellow", false),
        ];

        let output = highlight_text("Covers Flood\n  Damage only.", rules).unwrap();

        let rejected: Vec<usize> = output.rejected.iter().map(|r| r.index).collect();
        assert_eq!(rejected, vec![0, 1]);
        assert_eq!(output.segments.len(), 3);
        assert_eq!(output.segments[1].text, "Flood\n  Damage");
    }
}
