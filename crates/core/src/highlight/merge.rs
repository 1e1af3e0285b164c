use super::types::{MatchSpan, MergedSpan};

/// Resolve overlapping spans into a sorted, non-overlapping list.
///
/// `spans` must be sorted by `start`. A single left-to-right sweep lets the
/// later span win wherever two spans overlap: the earlier span keeps only
/// the part before the later one starts, and the later span's color covers
/// the union of both ends.
pub fn merge_spans(spans: &[MatchSpan]) -> Vec<MergedSpan> {
    debug_assert!(spans.windows(2).all(|w| w[0].start <= w[1].start));

    let mut merged = Vec::with_capacity(spans.len());
    let mut iter = spans.iter();

    let mut current = match iter.next() {
        Some(span) => span.clone(),
        None => return merged,
    };

    for next in iter {
        if next.start >= current.end {
            merged.push(std::mem::replace(&mut current, next.clone()));
            continue;
        }

        if next.start > current.start {
            merged.push(MergedSpan {
                start: current.start,
                end: next.start,
                color: current.color.clone(),
            });
        }

        current = MergedSpan {
            start: next.start,
            end: current.end.max(next.end),
            color: next.color.clone(),
        };
    }

    merged.push(current);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightColor::{self, Green, Red, Yellow};

    fn span(start: usize, end: usize, color: HighlightColor) -> MatchSpan {
        MatchSpan { start, end, color }
    }

    fn assert_non_overlapping(spans: &[MergedSpan]) {
        for (i, a) in spans.iter().enumerate() {
            for b in &spans[i + 1..] {
                assert!(a.end <= b.start, "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn test_empty_input() {
        assert!(merge_spans(&[]).is_empty());
    }

    #[test]
    fn test_disjoint_spans_pass_through() {
        let spans = vec![span(0, 3, Red), span(3, 5, Green), span(8, 9, Yellow)];
        assert_eq!(merge_spans(&spans), spans);
    }

    #[test]
    fn test_later_span_wins_overlap_and_prefix_survives() {
        let merged = merge_spans(&[span(0, 10, Red), span(5, 15, Green)]);
        assert_eq!(merged, vec![span(0, 5, Red), span(5, 15, Green)]);
    }

    #[test]
    fn test_contained_later_span_takes_the_tail() {
        let merged = merge_spans(&[span(0, 20, Red), span(5, 10, Green)]);
        assert_eq!(merged, vec![span(0, 5, Red), span(5, 20, Green)]);
    }

    #[test]
    fn test_same_start_later_input_wins() {
        let merged = merge_spans(&[span(4, 6, Red), span(4, 12, Yellow)]);
        assert_eq!(merged, vec![span(4, 12, Yellow)]);

        let merged = merge_spans(&[span(4, 12, Yellow), span(4, 6, Red)]);
        assert_eq!(merged, vec![span(4, 12, Red)]);
    }

    #[test]
    fn test_chain_of_overlaps() {
        let merged = merge_spans(&[span(0, 6, Red), span(2, 8, Green), span(4, 10, Yellow)]);
        assert_eq!(
            merged,
            vec![span(0, 2, Red), span(2, 4, Green), span(4, 10, Yellow)]
        );
        assert_non_overlapping(&merged);
    }

    #[test]
    fn test_input_is_not_modified() {
        let spans = vec![span(0, 10, Red), span(5, 15, Green)];
        let copy = spans.clone();
        let _ = merge_spans(&spans);
        assert_eq!(spans, copy);
    }
}
