use crate::error::{Error, Result};
use regex::Regex;
use std::sync::LazyLock;

static CLEAN_TEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()\n\t*]").expect("static pattern"));

static CHANGE_COL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[()|%]").expect("static pattern"));

static NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("static pattern"));

/// Remove parentheses, tabs, newlines and asterisks, then trim.
pub fn clean_text(text: &str) -> String {
    CLEAN_TEXT_RE.replace_all(text, "").trim().to_string()
}

/// Tokenize a price-change cell such as `"(+1.5%) 2.3"` into `["+1.5", "2.3"]`.
pub fn split_change_col(text: &str) -> Vec<String> {
    CHANGE_COL_RE
        .replace_all(text, "")
        .split_whitespace()
        .map(String::from)
        .collect()
}

/// Extract the first contiguous run of digits as an integer.
pub fn extract_number(text: &str) -> Result<i64> {
    let digits = NUMBER_RE
        .find(text)
        .ok_or_else(|| Error::NoNumber(text.to_string()))?;

    digits
        .as_str()
        .parse()
        .map_err(|_| Error::OutOfRange(format!("number in {}", text)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  (Ngân hàng)\t*\n "), "Ngân hàng");
        assert_eq!(clean_text("VCB"), "VCB");
        assert_eq!(clean_text("\n\t"), "");
    }

    #[test]
    fn test_split_change_col() {
        assert_eq!(split_change_col("(+1.5%) 2.3"), vec!["+1.5", "2.3"]);
        assert_eq!(split_change_col("-0.2(-1.27 %)"), vec!["-0.2-1.27"]);
        assert_eq!(split_change_col("0 | 0%"), vec!["0", "0"]);
        assert!(split_change_col("  ").is_empty());
    }

    #[test]
    fn test_extract_number() {
        assert_eq!(extract_number("abc123xyz").unwrap(), 123);
        assert_eq!(extract_number("Page 4 of 17").unwrap(), 4);
        assert_eq!(extract_number("007").unwrap(), 7);
    }

    #[test]
    fn test_extract_number_failures() {
        assert!(matches!(extract_number("no digits"), Err(Error::NoNumber(_))));
        assert!(matches!(extract_number(""), Err(Error::NoNumber(_))));
        assert!(matches!(
            extract_number("99999999999999999999999"),
            Err(Error::OutOfRange(_))
        ));
    }
}
