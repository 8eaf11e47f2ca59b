//! Markup stripping and word counting
//!
//! Document content is an opaque HTML blob; everything downstream
//! (context assembly, word counts) works on plain text derived here.

use std::sync::OnceLock;

use regex::Regex;

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\([^)]*\)").unwrap())
}

fn decoration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // emphasis, code spans, heading/quote/list markers at line start
    RE.get_or_init(|| Regex::new(r"(?m)^[#>\-*+ \t]+|[*_`]+").unwrap())
}

/// Derive plain text from a rich content blob
///
/// HTML is rewritten to markdown first, then markdown decoration is
/// stripped. Empty or whitespace-only input yields an empty string.
pub fn to_plain_text(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    let markdown = html2md::rewrite_html(html, false);
    let text = link_re().replace_all(&markdown, "$1");
    let text = decoration_re().replace_all(&text, "");
    text.trim().to_string()
}

/// Count words in plain text
///
/// A word is a whitespace-separated token containing at least one
/// alphanumeric character, so stray punctuation does not count.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace()
        .filter(|token| token.chars().any(char::is_alphanumeric))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_basic() {
        assert_eq!(word_count("It was a dark and stormy night."), 7);
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   \n\t  "), 0);
    }

    #[test]
    fn test_word_count_ignores_bare_punctuation() {
        assert_eq!(word_count("wait - no - stop"), 3);
        assert_eq!(word_count("one ... two"), 2);
    }

    #[test]
    fn test_to_plain_text_strips_tags() {
        let text = to_plain_text("<p>Hello <b>world</b></p>");
        assert!(text.contains("Hello"));
        assert!(text.contains("world"));
        assert!(!text.contains('<'));
        assert!(!text.contains('*'));
    }

    #[test]
    fn test_to_plain_text_empty() {
        assert_eq!(to_plain_text(""), "");
        assert_eq!(to_plain_text("   "), "");
    }

    #[test]
    fn test_to_plain_text_strips_links() {
        let text = to_plain_text(r#"<p>see <a href="https://example.com">the notes</a></p>"#);
        assert!(text.contains("the notes"));
        assert!(!text.contains("example.com"));
    }

    #[test]
    fn test_plain_text_word_count_roundtrip() {
        let html = "<h1>Chapter 1</h1><p>The rain <i>would not</i> stop.</p>";
        let text = to_plain_text(html);
        assert_eq!(word_count(&text), 7);
    }
}
