//! Geometric text reconstruction.
//!
//! Turns each page's [`PositionedTextItem`]s into plain text lines. Only
//! visual position is used: items are bucketed into lines by quantized Y,
//! lines are emitted top to bottom, items left to right, and whitespace is
//! synthesized from horizontal offsets.
//!
//! ```text
//! items  ->  line groups (key = round(y / bucket))  ->  lines  ->  page text  ->  document
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::PositionedTextItem;

/// Tunables of the reconstruction heuristics.
///
/// The defaults are empirically chosen for typical 72dpi page space and can
/// be overridden per document type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Width of a line bucket in page units.
    pub line_bucket: f32,
    /// Page units per leading indentation space.
    pub indent_width: f32,
    /// Gaps wider than this get proportional spacing.
    pub wide_gap: f32,
    /// Page units per space for wide gaps.
    pub space_width: f32,
    /// Gaps at or below this join items without a separator.
    pub min_gap: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            line_bucket: 2.0,
            indent_width: 6.0,
            wide_gap: 5.0,
            space_width: 5.0,
            min_gap: 1.0,
        }
    }
}

/// Use `value` as a divisor only when it is finite and positive.
fn divisor(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

impl LayoutConfig {
    /// Check the tunables before use.
    ///
    /// Bucket, indent and space widths must be finite and positive, and
    /// `min_gap` may not exceed `wide_gap`.
    pub fn validate(&self) -> Result<(), String> {
        let divisors = [
            ("line_bucket", self.line_bucket),
            ("indent_width", self.indent_width),
            ("space_width", self.space_width),
        ];
        for (name, value) in divisors {
            if !value.is_finite() || value <= 0.0 {
                return Err(format!("layout.{name} must be a positive number, got {value}"));
            }
        }
        if !self.wide_gap.is_finite() || !self.min_gap.is_finite() {
            return Err("layout.wide_gap and layout.min_gap must be finite".to_string());
        }
        if self.min_gap > self.wide_gap {
            return Err(format!(
                "layout.min_gap ({}) must not exceed layout.wide_gap ({})",
                self.min_gap, self.wide_gap
            ));
        }
        Ok(())
    }

    /// Bucket index of a baseline. Ties round toward positive infinity so
    /// that the same Y always lands in the same bucket regardless of sign.
    pub fn line_key(&self, y: f32) -> i64 {
        let bucket = divisor(self.line_bucket, Self::default().line_bucket);
        (y / bucket + 0.5).floor() as i64
    }

    /// Spaces placed before the first item of a line.
    pub fn indent_spaces(&self, x: f32) -> usize {
        let width = divisor(self.indent_width, Self::default().indent_width);
        (x / width).floor().max(0.0) as usize
    }

    /// Spaces placed between two items separated by `gap` page units.
    pub fn gap_spaces(&self, gap: f32) -> usize {
        if gap > self.wide_gap {
            let width = divisor(self.space_width, Self::default().space_width);
            ((gap / width).floor() as usize).max(1)
        } else if gap > self.min_gap {
            1
        } else {
            0
        }
    }
}

fn is_usable(item: &PositionedTextItem) -> bool {
    !item.text.is_empty() && item.x.is_finite() && item.y.is_finite() && item.width.is_finite()
}

/// Group a page's items into lines keyed by bucketed Y.
///
/// Each group is ordered by ascending X; items with equal X keep their
/// input order. Unusable items (empty text, non-finite geometry) are dropped.
pub fn group_lines<'a>(
    items: &'a [PositionedTextItem],
    config: &LayoutConfig,
) -> BTreeMap<i64, Vec<&'a PositionedTextItem>> {
    let mut groups: BTreeMap<i64, Vec<&PositionedTextItem>> = BTreeMap::new();

    for item in items.iter().filter(|item| is_usable(item)) {
        groups.entry(config.line_key(item.y)).or_default().push(item);
    }

    for line in groups.values_mut() {
        line.sort_by(|a, b| a.x.total_cmp(&b.x));
    }

    groups
}

/// Render one line of X-ordered items, without the trailing newline.
pub fn render_line(items: &[&PositionedTextItem], config: &LayoutConfig) -> String {
    let mut line = String::new();
    let mut last_x_end: Option<f32> = None;

    for item in items {
        let spaces = match last_x_end {
            None => config.indent_spaces(item.x),
            Some(end) => config.gap_spaces(item.x - end),
        };
        line.push_str(&" ".repeat(spaces));
        line.push_str(&item.text);
        last_x_end = Some(item.x + item.width);
    }

    line
}

/// Reconstruct one page: lines top to bottom, each terminated by `\n`.
///
/// A page without usable items yields an empty string.
pub fn reconstruct_page(items: &[PositionedTextItem], config: &LayoutConfig) -> String {
    let groups = group_lines(items, config);

    let mut page = String::new();
    // PDF Y grows upward, so the highest key is the top line.
    for line in groups.values().rev() {
        page.push_str(&render_line(line, config));
        page.push('\n');
    }
    page
}

/// Reconstruct a whole document from its pages, in order.
///
/// Every page but the last is followed by one blank line; the result is
/// trimmed of leading and trailing whitespace.
pub fn reconstruct(pages: &[Vec<PositionedTextItem>], config: &LayoutConfig) -> String {
    let mut document = String::new();

    for (index, items) in pages.iter().enumerate() {
        document.push_str(&reconstruct_page(items, config));
        if index + 1 < pages.len() {
            document.push('\n');
        }
    }

    log::debug!(
        "reconstructed {} pages into {} chars",
        pages.len(),
        document.len()
    );
    document.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(text: &str, x: f32, y: f32, width: f32) -> PositionedTextItem {
        PositionedTextItem {
            text: text.to_string(),
            x,
            y,
            width,
        }
    }

    fn page_of(text: &str, y: f32) -> Vec<PositionedTextItem> {
        vec![item(text, 0.0, y, 10.0)]
    }

    #[test]
    fn test_wide_gap_gets_proportional_spaces() {
        let items = vec![item("Hello", 0.0, 100.0, 30.0), item("World", 40.0, 100.0, 30.0)];
        let text = reconstruct(&[items], &LayoutConfig::default());
        assert_eq!(text, "Hello  World");
    }

    #[test]
    fn test_small_gap_gets_single_space() {
        let items = vec![item("Sum", 0.0, 100.0, 18.0), item("insured", 21.0, 100.0, 40.0)];
        assert_eq!(reconstruct(&[items], &LayoutConfig::default()), "Sum insured");
    }

    #[test]
    fn test_touching_items_join_without_space() {
        let items = vec![
            item("Exclu", 0.0, 100.0, 25.0),
            item("sion", 26.0, 100.0, 20.0),
            item("s", 45.0, 100.0, 5.0),
        ];
        assert_eq!(reconstruct(&[items], &LayoutConfig::default()), "Exclusions");
    }

    #[test]
    fn test_gap_exactly_at_threshold_is_single_space() {
        let config = LayoutConfig::default();
        assert_eq!(config.gap_spaces(5.0), 1);
        assert_eq!(config.gap_spaces(5.1), 1);
        assert_eq!(config.gap_spaces(10.0), 2);
        assert_eq!(config.gap_spaces(1.0), 0);
        assert_eq!(config.gap_spaces(-3.0), 0);
    }

    #[test]
    fn test_indentation_from_x_offset() {
        let page = reconstruct_page(&[item("Clause", 36.0, 100.0, 30.0)], &LayoutConfig::default());
        assert_eq!(page, "      Clause\n");

        let page = reconstruct_page(&[item("Clause", 5.9, 100.0, 30.0)], &LayoutConfig::default());
        assert_eq!(page, "Clause\n");
    }

    #[test]
    fn test_lines_ordered_top_to_bottom() {
        let items = vec![
            item("bottom", 0.0, 100.0, 30.0),
            item("top", 0.0, 700.0, 15.0),
            item("middle", 0.0, 400.0, 30.0),
        ];
        assert_eq!(
            reconstruct_page(&items, &LayoutConfig::default()),
            "top\nmiddle\nbottom\n"
        );
    }

    #[test]
    fn test_items_within_bucket_share_a_line() {
        let items = vec![item("right", 50.0, 100.4, 25.0), item("left", 0.0, 99.6, 20.0)];
        let groups = group_lines(&items, &LayoutConfig::default());
        assert_eq!(groups.len(), 1);
        let line = groups.values().next().unwrap();
        assert_eq!(line[0].text, "left");
        assert_eq!(line[1].text, "right");
    }

    #[test]
    fn test_bucket_boundary_may_split_close_items() {
        // 100.9 / 2 = 50.45 and 101.1 / 2 = 50.55 round to different buckets.
        let items = vec![item("a", 0.0, 100.9, 5.0), item("b", 10.0, 101.1, 5.0)];
        assert_eq!(group_lines(&items, &LayoutConfig::default()).len(), 2);
    }

    #[test]
    fn test_equal_x_keeps_input_order() {
        let items = vec![item("first", 10.0, 50.0, 0.0), item("second", 10.0, 50.0, 0.0)];
        let line = reconstruct_page(&items, &LayoutConfig::default());
        assert_eq!(line, " firstsecond\n");
    }

    #[test]
    fn test_unusable_items_are_skipped() {
        let items = vec![
            item("A", 0.0, 100.0, 5.0),
            item("", 20.0, 100.0, 5.0),
            item("ghost", f32::NAN, 100.0, 5.0),
            item("B", 7.0, 100.0, 5.0),
        ];
        // B is measured against A, not the dropped items.
        assert_eq!(reconstruct(&[items], &LayoutConfig::default()), "A B");
    }

    #[test]
    fn test_empty_page_yields_empty_text() {
        assert_eq!(reconstruct_page(&[], &LayoutConfig::default()), "");
    }

    #[test]
    fn test_pages_joined_by_blank_line() {
        let pages = vec![page_of("A", 100.0), page_of("B", 100.0)];
        assert_eq!(reconstruct(&pages, &LayoutConfig::default()), "A\n\nB");
    }

    #[test]
    fn test_empty_middle_page_keeps_separator() {
        let pages = vec![page_of("A", 100.0), Vec::new(), page_of("C", 100.0)];
        assert_eq!(reconstruct(&pages, &LayoutConfig::default()), "A\n\n\nC");
    }

    #[test]
    fn test_document_is_trimmed() {
        let pages = vec![page_of("  padded", 100.0), Vec::new()];
        assert_eq!(reconstruct(&pages, &LayoutConfig::default()), "padded");
        assert_eq!(reconstruct(&[], &LayoutConfig::default()), "");
    }

    #[test]
    fn test_custom_config_changes_spacing() {
        let config = LayoutConfig {
            space_width: 2.0,
            ..LayoutConfig::default()
        };
        let items = vec![item("a", 0.0, 10.0, 10.0), item("b", 20.0, 10.0, 10.0)];
        assert_eq!(reconstruct(&[items], &config), "a     b");
    }

    #[test]
    fn test_line_key_rounds_half_up() {
        let config = LayoutConfig::default();
        assert_eq!(config.line_key(99.0), 50);
        assert_eq!(config.line_key(100.9), 50);
        assert_eq!(config.line_key(-1.0), 0);
    }

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LayoutConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_unusable_tunables_are_rejected() {
        let zero_indent = LayoutConfig {
            indent_width: 0.0,
            ..LayoutConfig::default()
        };
        assert!(zero_indent.validate().unwrap_err().contains("indent_width"));

        let nan_bucket = LayoutConfig {
            line_bucket: f32::NAN,
            ..LayoutConfig::default()
        };
        assert!(nan_bucket.validate().unwrap_err().contains("line_bucket"));

        let inverted = LayoutConfig {
            min_gap: 8.0,
            wide_gap: 2.0,
            ..LayoutConfig::default()
        };
        assert!(inverted.validate().unwrap_err().contains("min_gap"));
    }

    #[test]
    fn test_zero_divisors_fall_back_to_defaults() {
        let config = LayoutConfig {
            line_bucket: 0.0,
            indent_width: 0.0,
            space_width: -1.0,
            ..LayoutConfig::default()
        };
        let items = vec![
            item("Title", 12.0, 700.0, 25.0),
            item("Body", 0.0, 680.0, 20.0),
            item("text", 30.0, 680.0, 20.0),
        ];
        assert_eq!(reconstruct_page(&items, &config), "  Title\nBody  text\n");
    }
}
