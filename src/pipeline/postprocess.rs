//! Post-processing: deterministic text cleanup on both sides of the model.
//!
//! Two small rules, each a pure `&str → String` function:
//!
//! 1. [`join_hyphenated_breaks`] runs on raw OCR output. Tesseract keeps the
//!    hyphen a typesetter used to split a word across lines (`exam-\nple`);
//!    deleting the hyphen together with the line break rejoins the word.
//! 2. [`strip_asterisks`] runs on the model's reply. The prompt asks for no
//!    markdown emphasis, but models emit `**bold**` anyway.
//!
//! [`page_block`] formats one page for the working-text file.

use once_cell::sync::Lazy;
use regex::Regex;

// ── Rule 1: Join words split by a hyphenated line break ──────────────────────

static RE_HYPHEN_BREAK: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\r?\n").unwrap());

/// Delete every hyphen immediately followed by a line break (`\n` or `\r\n`).
pub fn join_hyphenated_breaks(input: &str) -> String {
    RE_HYPHEN_BREAK.replace_all(input, "").into_owned()
}

// ── Rule 2: Strip markdown emphasis markers ──────────────────────────────────

/// Remove every literal `*`. Total and idempotent.
pub fn strip_asterisks(input: &str) -> String {
    input.replace('*', "")
}

// ── Working-file layout ──────────────────────────────────────────────────────

/// Render one page for the working file: delimiter line, text, blank line.
///
/// `page_num` is 1-indexed.
pub fn page_block(page_num: usize, text: &str) -> String {
    format!("--- Page {page_num} ---\n{text}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_hyphenated_word() {
        assert_eq!(join_hyphenated_breaks("exam-\nple"), "example");
    }

    #[test]
    fn test_join_crlf_hyphenated_word() {
        assert_eq!(join_hyphenated_breaks("judg-\r\nment"), "judgment");
    }

    #[test]
    fn test_plain_hyphens_and_breaks_untouched() {
        let input = "well-known\nfacts -\tnoted\nend-";
        assert_eq!(join_hyphenated_breaks(input), input);
    }

    #[test]
    fn test_multiple_breaks_on_one_page() {
        let input = "The appel-\nlant and the re-\nspondent";
        assert_eq!(
            join_hyphenated_breaks(input),
            "The appellant and the respondent"
        );
    }

    #[test]
    fn test_strip_asterisks_removes_all() {
        let out = strip_asterisks("**Fact** one\n* bullet *two*");
        assert!(!out.contains('*'));
        assert_eq!(out, "Fact one\n bullet two");
    }

    #[test]
    fn test_strip_asterisks_idempotent() {
        for input in ["", "***", "a*b", "no stars", "*x* **y** ***z***"] {
            let once = strip_asterisks(input);
            assert_eq!(strip_asterisks(&once), once, "input: {input:?}");
        }
    }

    #[test]
    fn test_page_block_format() {
        assert_eq!(
            page_block(1, "IN THE HIGH COURT"),
            "--- Page 1 ---\nIN THE HIGH COURT\n\n"
        );
    }

    #[test]
    fn test_page_block_empty_page() {
        assert_eq!(page_block(7, ""), "--- Page 7 ---\n\n\n");
    }
}
