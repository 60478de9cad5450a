//! Bounding text to a character budget at sentence boundaries.
//!
//! Budgets count Unicode scalar values, not bytes.

/// Collapse every whitespace run to a single space and trim the ends.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Bound `text` to `max_chars`, keeping whole sentences where possible.
///
/// The text is whitespace-collapsed first. When it still exceeds the
/// budget it is clipped, then whole sentences of the clip are kept while
/// they fit. The clip is split untrimmed, so a sentence cut by the clip
/// never fits. A clip with no sentence that fits is returned as a raw
/// prefix.
/// Compacting an already-compacted string with the same budget is a no-op.
pub fn compact_text(text: &str, max_chars: usize) -> String {
    let collapsed = collapse_whitespace(text);
    if collapsed.chars().count() <= max_chars {
        return collapsed;
    }

    let clipped: String = collapsed.chars().take(max_chars).collect();

    let sentences = split_sentences(&clipped);
    if sentences.len() <= 1 {
        return clipped.trim_end().to_string();
    }

    let mut kept = Vec::new();
    let mut total = 0;
    for sentence in sentences {
        let len = sentence.chars().count();
        if total + len + 1 > max_chars {
            break;
        }
        kept.push(sentence);
        total += len + 1;
    }

    let joined = kept.join(" ");
    let joined = joined.trim_end();
    if joined.is_empty() {
        clipped.trim_end().to_string()
    } else {
        joined.to_string()
    }
}

/// Split after `.`, `!` or `?` when followed by whitespace. The separating
/// whitespace is dropped.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut start = 0;
    let mut after_terminal = false;
    for (i, c) in text.char_indices() {
        if after_terminal && c.is_whitespace() {
            parts.push(&text[start..i]);
            start = i + c.len_utf8();
        }
        after_terminal = matches!(c, '.' | '!' | '?');
    }
    parts.push(&text[start..]);
    parts
}
