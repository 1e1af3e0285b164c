//! Highlight pipeline: rules -> match spans -> merged spans -> segments.
//!
//! ```text
//! document + rules --find_matches--> MatchSpan[] (sorted by start)
//!                  --merge_spans---> MergedSpan[] (non-overlapping, later wins)
//!                  --segment-------> Segment[] (lossless partition)
//! ```

pub mod matcher;
pub mod merge;
pub mod segment;
pub mod types;

pub use matcher::{find_matches, Matcher};
pub use merge::merge_spans;
pub use segment::segment;
pub use types::*;

/// Run the whole pipeline. Rule order is precedence order: where matches of
/// two rules overlap, the one appearing later in `rules` wins.
pub fn highlight(document: &str, rules: &[HighlightRule]) -> Result<Vec<Segment>, RuleError> {
    let matches = find_matches(document, rules)?;
    let merged = merge_spans(&matches);
    Ok(segment(document, &merged))
}
