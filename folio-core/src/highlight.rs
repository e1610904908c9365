use std::ops::Range;

use crate::escape::escape_text;

/// Escape `text` and wrap every case-insensitive occurrence of `query` in a
/// `<mark class="match">`.
///
/// Matching runs over the unescaped text and is a literal substring search,
/// left to right, without overlaps. Matched and unmatched spans are escaped
/// individually. A query that is empty after trimming produces the plain
/// escaped text.
pub fn highlight_matches(text: &str, query: &str) -> String {
    let spans = match_spans(text, query);
    if spans.is_empty() {
        return escape_text(text);
    }

    let mut out = String::with_capacity(text.len() + 32 * spans.len());
    let mut last = 0;
    for span in spans {
        out.push_str(&escape_text(&text[last..span.start]));
        out.push_str("<mark class=\"match\">");
        out.push_str(&escape_text(&text[span.clone()]));
        out.push_str("</mark>");
        last = span.end;
    }
    out.push_str(&escape_text(&text[last..]));
    out
}

/// Lowercase each char on its own, with no context rules.
///
/// The one case folding shared by project filtering and highlighting.
pub fn fold_case(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Byte ranges of `text` holding each occurrence of the trimmed `query`,
/// compared after [`fold_case`].
///
/// A match that starts or ends inside the folded form of a char covers that
/// whole char. Ranges are left to right and never overlap.
pub fn match_spans(text: &str, query: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = fold_case(query.trim()).chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    // Folded chars, each tagged with the byte range of its source char
    let folded: Vec<(char, usize, usize)> = text
        .char_indices()
        .flat_map(|(i, c)| {
            let end = i + c.len_utf8();
            c.to_lowercase().map(move |lc| (lc, i, end))
        })
        .collect();

    let mut spans = Vec::new();
    let mut at = 0;
    while at + needle.len() <= folded.len() {
        let window = &folded[at..at + needle.len()];
        if !window.iter().map(|f| f.0).eq(needle.iter().copied()) {
            at += 1;
            continue;
        }

        let start = window[0].1;
        let end = window[needle.len() - 1].2;
        spans.push(start..end);
        at += needle.len();
        while at < folded.len() && folded[at].1 < end {
            at += 1;
        }
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marks_case_insensitive_match() {
        assert_eq!(
            highlight_matches("Hello World", "world"),
            "Hello <mark class=\"match\">World</mark>"
        );
    }

    #[test]
    fn test_empty_query_only_escapes() {
        assert_eq!(highlight_matches("a < b", ""), "a &lt; b");
        assert_eq!(highlight_matches("a < b", "   "), "a &lt; b");
    }

    #[test]
    fn test_escapes_inside_and_outside_marks() {
        let out = highlight_matches("<b>R&D</b> r&d", "r&d");
        assert_eq!(
            out,
            "&lt;b&gt;<mark class=\"match\">R&amp;D</mark>&lt;/b&gt; <mark class=\"match\">r&amp;d</mark>"
        );
    }

    #[test]
    fn test_query_matching_entity_text_is_not_matched_in_escaped_form() {
        // "amp" only occurs in the escaped form of "&", never in the source text
        assert_eq!(highlight_matches("Q&A", "amp"), "Q&amp;A");
    }

    #[test]
    fn test_multiple_non_overlapping_matches() {
        assert_eq!(
            highlight_matches("aaa", "aa"),
            "<mark class=\"match\">aa</mark>a"
        );
    }

    #[test]
    fn test_query_is_trimmed() {
        assert_eq!(
            highlight_matches("Rust tools", "  rust "),
            "<mark class=\"match\">Rust</mark> tools"
        );
    }

    #[test]
    fn test_non_ascii_text() {
        assert_eq!(
            highlight_matches("Café ÉTÉ", "été"),
            "Café <mark class=\"match\">ÉTÉ</mark>"
        );
    }

    #[test]
    fn test_chars_that_fold_to_several_are_marked_whole() {
        assert_eq!(
            highlight_matches("İstanbul", "i"),
            "<mark class=\"match\">İ</mark>stanbul"
        );
        assert_eq!(match_spans("İstanbul", "i"), vec![0..2]);
    }

    #[test]
    fn test_final_sigma_folds_like_any_sigma() {
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(
            highlight_matches("ΟΔΟΣ", "σ"),
            "ΟΔΟ<mark class=\"match\">Σ</mark>"
        );
    }
}
