//! Derived document statistics.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use super::DocumentMeta;

fn count_words(content: &str) -> usize {
    content
        .chars()
        .map(|c| if "`*_>#-".contains(c) { ' ' } else { c })
        .collect::<String>()
        .split_whitespace()
        .count()
}

fn count_paragraphs(content: &str) -> usize {
    static PARAGRAPH_GAP: OnceLock<Regex> = OnceLock::new();
    let gap = PARAGRAPH_GAP.get_or_init(|| Regex::new(r"\n{2,}").expect("invalid paragraph regex"));

    gap.split(content)
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .count()
}

/// Recompute derived statistics from the full current content.
pub fn derive_meta(
    content: &str,
    block_count: usize,
    last_saved_at: Option<DateTime<Utc>>,
) -> DocumentMeta {
    DocumentMeta {
        last_saved_at,
        word_count: count_words(content),
        paragraph_count: count_paragraphs(content),
        block_count,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("", 0)]
    #[case("hello world", 2)]
    #[case("# Heading\n\n- item one\n- item two", 5)]
    #[case("`code` *emphasis* _underline_", 3)]
    fn test_word_count(#[case] content: &str, #[case] expected: usize) {
        assert_eq!(derive_meta(content, 0, None).word_count, expected);
    }

    #[rstest]
    #[case("", 0)]
    #[case("one paragraph", 1)]
    #[case("first\n\nsecond\n\n\nthird", 3)]
    #[case("\n\n  \n\ntext\n\n", 1)]
    fn test_paragraph_count(#[case] content: &str, #[case] expected: usize) {
        assert_eq!(derive_meta(content, 0, None).paragraph_count, expected);
    }

    #[test]
    fn test_meta_carries_block_count_and_saved_timestamp() {
        let saved = Utc::now();
        let meta = derive_meta("text", 4, Some(saved));
        assert_eq!(meta.block_count, 4);
        assert_eq!(meta.last_saved_at, Some(saved));
    }
}
