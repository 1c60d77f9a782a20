// crates/search/src/highlight.rs
//! Case-insensitive match finding and injection-safe highlighting.
//!
//! Matches are located on the original text, then every segment is escaped
//! on its own and wrapped in `<mark>`. Escaping first and matching second
//! would let a query like `amp` hit the inside of `&amp;`.

use std::ops::Range;

pub const MARK_OPEN: &str = "<mark>";
pub const MARK_CLOSE: &str = "</mark>";

/// Characters kept on each side of a full-text match in the preview.
pub const PREVIEW_CONTEXT_CHARS: usize = 50;

/// Escape `& < > " '` for HTML text and attribute contexts.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Case fold of a single char.
///
/// Context-free: final sigma folds like any other sigma, so a string folds to
/// the same chars whether it is folded whole or char by char.
fn fold_char(c: char) -> impl Iterator<Item = char> {
    c.to_lowercase().map(|l| if l == 'ς' { 'σ' } else { l })
}

/// Case fold of `text`; the form queries and haystacks are compared in.
pub fn fold_case(text: &str) -> String {
    text.chars().flat_map(fold_char).collect()
}

/// Byte length of a match of `needle` starting at `text[start..]`, if any.
///
/// `needle` must already be folded; `text` is folded one char at a time so
/// the returned length is in terms of the original text.
fn match_len_at(text: &str, start: usize, needle: &[char]) -> Option<usize> {
    let mut matched = 0;
    for (offset, c) in text[start..].char_indices() {
        for lower in fold_char(c) {
            if needle.get(matched) != Some(&lower) {
                return None;
            }
            matched += 1;
        }
        if matched == needle.len() {
            return Some(offset + c.len_utf8());
        }
    }
    None
}

/// Non-overlapping case-insensitive matches of `needle_lower`, left to right.
///
/// `needle_lower` is expected in [`fold_case`] form.
pub fn find_matches(text: &str, needle_lower: &str) -> Vec<Range<usize>> {
    let needle: Vec<char> = needle_lower.chars().collect();
    if needle.is_empty() {
        return Vec::new();
    }

    let mut matches = Vec::new();
    let mut next_allowed = 0;
    for (start, _) in text.char_indices() {
        if start < next_allowed {
            continue;
        }
        if let Some(len) = match_len_at(text, start, &needle) {
            matches.push(start..start + len);
            next_allowed = start + len;
        }
    }
    matches
}

/// Escape `text` and wrap every match of `needle_lower` in `<mark>`.
pub fn highlight(text: &str, needle_lower: &str) -> String {
    let mut out = String::with_capacity(text.len() + 16);
    let mut cursor = 0;
    for range in find_matches(text, needle_lower) {
        out.push_str(&escape_html(&text[cursor..range.start]));
        out.push_str(MARK_OPEN);
        out.push_str(&escape_html(&text[range.clone()]));
        out.push_str(MARK_CLOSE);
        cursor = range.end;
    }
    out.push_str(&escape_html(&text[cursor..]));
    out
}

/// `...<context>...` around the first match, escaped and highlighted.
///
/// The window spans [`PREVIEW_CONTEXT_CHARS`] characters before the match
/// start and after the match end, clamped to the text.
pub fn content_preview(content: &str, needle_lower: &str) -> Option<String> {
    let first = find_matches(content, needle_lower).into_iter().next()?;

    let start = content[..first.start]
        .char_indices()
        .rev()
        .nth(PREVIEW_CONTEXT_CHARS - 1)
        .map(|(i, _)| i)
        .unwrap_or(0);
    let end = content[first.end..]
        .char_indices()
        .nth(PREVIEW_CONTEXT_CHARS)
        .map(|(i, _)| first.end + i)
        .unwrap_or(content.len());

    Some(format!("...{}...", highlight(&content[start..end], needle_lower)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & Jerry's</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; Jerry&#039;s&lt;/a&gt;"
        );
    }

    #[test]
    fn test_find_matches_case_insensitive() {
        assert_eq!(find_matches("Fix Auth and AUTH", "auth"), vec![4..8, 13..17]);
        assert_eq!(find_matches("aaaa", "aa"), vec![0..2, 2..4]);
        assert!(find_matches("abc", "").is_empty());
        assert!(find_matches("abc", "abcd").is_empty());
    }

    #[test]
    fn test_find_matches_multibyte() {
        let text = "検索機能の改善";
        let m = find_matches(text, "機能");
        assert_eq!(&text[m[0].clone()], "機能");
    }

    #[test]
    fn test_highlight_wraps_every_occurrence() {
        assert_eq!(highlight("Fix auth, then Auth again", "auth"),
            "Fix <mark>auth</mark>, then <mark>Auth</mark> again");
    }

    #[test]
    fn test_highlight_is_injection_safe() {
        let out = highlight("<script>alert(1)</script>", "script");
        assert_eq!(
            out,
            "&lt;<mark>script</mark>&gt;alert(1)&lt;/<mark>script</mark>&gt;"
        );
        assert!(!out.contains("<script>"));
    }

    #[test]
    fn test_highlight_does_not_match_inside_entities() {
        assert_eq!(highlight("a & b", "amp"), "a &amp; b");
        assert_eq!(highlight("a & b", "&"), "a <mark>&amp;</mark> b");
    }

    #[test]
    fn test_fold_case_treats_every_sigma_alike() {
        assert_eq!(fold_case("ΟΔΟΣ"), "οδοσ");
        assert_eq!(fold_case("οδος"), "οδοσ");
        assert_eq!(fold_case("AuTh"), "auth");
    }

    #[test]
    fn test_highlight_word_final_sigma() {
        assert_eq!(highlight("ΟΔΟΣ", &fold_case("ΟΔΟΣ")), "<mark>ΟΔΟΣ</mark>");
        assert_eq!(highlight("η οδός", &fold_case("ΟΔΌΣ")), "η <mark>οδός</mark>");
    }

    #[test]
    fn test_content_preview_window() {
        let content = format!("{}needle{}", "a".repeat(80), "b".repeat(80));
        let preview = content_preview(&content, "needle").unwrap();
        let expected = format!("...{}<mark>needle</mark>{}...", "a".repeat(50), "b".repeat(50));
        assert_eq!(preview, expected);
    }

    #[test]
    fn test_content_preview_clamps_at_edges() {
        assert_eq!(content_preview("short NEEDLE", "needle").unwrap(), "...short <mark>NEEDLE</mark>...");
        assert!(content_preview("nothing", "needle").is_none());
    }
}
