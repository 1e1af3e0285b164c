use super::types::{MergedSpan, Segment};

/// Partition `document` into plain and highlighted segments.
///
/// `spans` must be sorted and non-overlapping. The result is never empty:
/// without spans it is a single plain segment holding the whole document,
/// even when the document is empty.
pub fn segment(document: &str, spans: &[MergedSpan]) -> Vec<Segment> {
    if spans.is_empty() {
        return vec![Segment::plain(document)];
    }

    let mut segments = Vec::with_capacity(spans.len() * 2 + 1);
    let mut cursor = 0;

    for span in spans {
        if span.start > cursor {
            segments.push(Segment::plain(&document[cursor..span.start]));
        }
        segments.push(Segment::highlighted(
            &document[span.start..span.end],
            span.color.clone(),
        ));
        cursor = span.end;
    }

    if cursor < document.len() {
        segments.push(Segment::plain(&document[cursor..]));
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::HighlightColor::{Green, Red};

    fn concat(segments: &[Segment]) -> String {
        segments.iter().map(|s| s.text.as_str()).collect()
    }

    #[test]
    fn test_no_spans_single_plain_segment() {
        let segments = segment("whole policy", &[]);
        assert_eq!(segments, vec![Segment::plain("whole policy")]);
    }

    #[test]
    fn test_empty_document_still_one_segment() {
        assert_eq!(segment("", &[]), vec![Segment::plain("")]);
    }

    #[test]
    fn test_gaps_become_plain_segments() {
        let document = "aa BB cc DD ee";
        let spans = vec![
            MergedSpan { start: 3, end: 5, color: Red },
            MergedSpan { start: 9, end: 11, color: Green },
        ];

        let segments = segment(document, &spans);
        assert_eq!(
            segments,
            vec![
                Segment::plain("aa "),
                Segment::highlighted("BB", Red),
                Segment::plain(" cc "),
                Segment::highlighted("DD", Green),
                Segment::plain(" ee"),
            ]
        );
        assert_eq!(concat(&segments), document);
    }

    #[test]
    fn test_spans_at_both_edges() {
        let document = "RISKnormalGOOD";
        let spans = vec![
            MergedSpan { start: 0, end: 4, color: Red },
            MergedSpan { start: 10, end: 14, color: Green },
        ];

        let segments = segment(document, &spans);
        assert_eq!(segments.len(), 3);
        assert!(segments[0].highlighted && segments[2].highlighted);
        assert_eq!(concat(&segments), document);
    }

    #[test]
    fn test_adjacent_spans_no_empty_plain_between() {
        let spans = vec![
            MergedSpan { start: 0, end: 2, color: Red },
            MergedSpan { start: 2, end: 4, color: Green },
        ];
        let segments = segment("abcd", &spans);
        assert_eq!(segments.len(), 2);
        assert!(segments.iter().all(|s| s.highlighted));
    }
}
