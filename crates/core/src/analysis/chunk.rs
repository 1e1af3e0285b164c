use std::collections::HashSet;

use super::types::ClassifiedSentence;

/// Characters of policy text per classification request.
pub const CHUNK_CHARS: usize = 8000;

/// The first `max_chars` characters of `text`.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte, _)) => &text[..byte],
        None => text,
    }
}

/// Split `text` into consecutive pieces of at most `max_chars` characters.
///
/// Text at or under the limit comes back as a single chunk, the empty
/// string included.
pub fn chunk_text(text: &str, max_chars: usize) -> Vec<&str> {
    let max_chars = max_chars.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    loop {
        let head = prefix_chars(rest, max_chars);
        chunks.push(head);
        rest = &rest[head.len()..];
        if rest.is_empty() {
            break;
        }
    }

    chunks
}

/// Keep the first occurrence of each sentence, dropping blanks.
pub fn dedupe_sentences(sentences: Vec<ClassifiedSentence>) -> Vec<ClassifiedSentence> {
    let mut seen = HashSet::new();
    sentences
        .into_iter()
        .filter(|s| {
            let key = s.sentence.trim();
            !key.is_empty() && seen.insert(key.to_string())
        })
        .collect()
}
