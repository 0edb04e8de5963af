//! Removal of malformed tag spans from a draft.
//!
//! A span is one complete `[x]...[/x]` match. It is malformed when its text
//! carries the opening syntax of a different paired tag, e.g. an `[h]` that
//! was typed inside a section and never closed there. Malformed spans are
//! removed whole. Unterminated tags never form a span and are left alone.

use std::sync::LazyLock;

use regex::Regex;

use crate::tags::PairedTag;

static SPAN_PATTERNS: LazyLock<Vec<(PairedTag, Regex)>> = LazyLock::new(|| {
    PairedTag::ALL
        .iter()
        .map(|&tag| {
            let pattern = format!(
                "(?s){}.*?{}",
                regex::escape(tag.open()),
                regex::escape(tag.close())
            );
            (tag, Regex::new(&pattern).expect("span pattern is a valid regex"))
        })
        .collect()
});

/// A fragment counts only when the tag name is not the start of a longer
/// word, so `[here]` or `[link]` are ordinary text.
static FRAGMENT_PATTERNS: LazyLock<Vec<(PairedTag, Regex)>> = LazyLock::new(|| {
    PairedTag::ALL
        .iter()
        .map(|&tag| {
            let pattern = format!(r"{}(?:\W|$)", regex::escape(tag.fragment()));
            (tag, Regex::new(&pattern).expect("fragment pattern is a valid regex"))
        })
        .collect()
});

/// Strip every malformed span from `text`.
///
/// Passes run in declaration order and repeat until nothing changes, so
/// `sanitize(&sanitize(s)) == sanitize(s)` for every input.
pub fn sanitize(text: &str) -> String {
    let mut cleaned = text.to_string();
    loop {
        let mut changed = false;
        for (tag, pattern) in SPAN_PATTERNS.iter() {
            if let Some(next) = remove_broken_spans(&cleaned, *tag, pattern) {
                cleaned = next;
                changed = true;
            }
        }
        if !changed {
            return cleaned;
        }
    }
}

/// Whether a matched span holds a fragment of some other tag's opening syntax.
fn is_broken(span: &str) -> bool {
    FRAGMENT_PATTERNS
        .iter()
        .any(|(other, fragment)| !span.starts_with(other.open()) && fragment.is_match(span))
}

/// Returns `None` when no span of this tag is broken.
fn remove_broken_spans(text: &str, tag: PairedTag, pattern: &Regex) -> Option<String> {
    let mut out = String::with_capacity(text.len());
    let mut last = 0;

    for span in pattern.find_iter(text) {
        if !is_broken(span.as_str()) {
            continue;
        }
        log::debug!(
            "removing malformed {} span at byte {} ({} bytes)",
            tag.name(),
            span.start(),
            span.len()
        );
        out.push_str(&text[last..span.start()]);
        last = span.end();
    }

    if last == 0 {
        return None;
    }
    out.push_str(&text[last..]);
    Some(out)
}
