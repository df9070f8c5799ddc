//! Cleanup pass for normalized text.
//!
//! The Vietnamese normalizer tends to leave duplicated punctuation behind
//! ("..", ". .", ", ,") and stray double quotes. This pass collapses any
//! run of same-class punctuation to a single mark, strips quotes and
//! normalizes whitespace. Runs of different classes (". ,") are left alone.

use once_cell::sync::Lazy;
use regex::Regex;

static PERIOD_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.(\s*\.)+").unwrap());
static COMMA_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r",(\s*,)+").unwrap());

/// Clean up normalized text: remove redundant punctuation, double quotes
/// and extra spaces. Idempotent on its own output.
pub fn clean(text: &str) -> String {
    let text = text.replace('"', "");
    let text = PERIOD_RUN.replace_all(&text, ".");
    let text = COMMA_RUN.replace_all(&text, ",");
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pinned_scenario() {
        assert_eq!(
            clean(r#"Xin " chào .. , , thế giới"#),
            "Xin chào . , thế giới"
        );
    }

    #[test]
    fn collapses_long_punctuation_runs() {
        assert_eq!(clean("chờ đã . . . ."), "chờ đã .");
        assert_eq!(clean("một .... hai"), "một . hai");
        assert_eq!(clean("a ,, ,, b"), "a , b");
    }

    #[test]
    fn mixed_runs_are_not_merged() {
        assert_eq!(clean("một . , hai"), "một . , hai");
    }

    #[test]
    fn strips_all_double_quotes() {
        let out = clean(r#"anh "nói" rằng "không""#);
        assert!(!out.contains('"'));
        assert_eq!(out, "anh nói rằng không");
    }

    #[test]
    fn normalizes_whitespace_runs_and_trims() {
        assert_eq!(clean("  xin \t chào \n thế   giới  "), "xin chào thế giới");
    }

    #[test]
    fn idempotent_on_clean_output() {
        let inputs = [
            r#"Xin " chào .. , , thế giới"#,
            "ngày 20 tháng 11 . . năm 2024",
            "   ,, .. ,, ..   ",
            "đã sạch sẵn rồi .",
        ];
        for input in inputs {
            let once = clean(input);
            assert_eq!(clean(&once), once, "not idempotent for {:?}", input);
        }
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(clean(""), "");
        assert_eq!(clean("  \"\"  "), "");
    }
}
