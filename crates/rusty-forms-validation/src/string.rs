//! String checks
//!
//! Lengths are counted in Unicode scalar values, never bytes.

use regex::Regex;

/// Character count of `s`
pub fn char_count(s: &str) -> usize {
    s.chars().count()
}

pub fn exceeds_max_length(s: &str, max: usize) -> bool {
    char_count(s) > max
}

pub fn below_min_length(s: &str, min: usize) -> bool {
    char_count(s) < min
}

/// True when the value spans more than one line.
///
/// A single trailing line break does not start a new line.
pub fn is_multiline(s: &str) -> bool {
    s.lines().count() > 1
}

/// Regex pattern matching (unanchored unless the pattern anchors itself)
pub fn matches_pattern(value: &str, pattern: &Regex) -> bool {
    pattern.is_match(value)
}

/// Enum/value restriction
pub fn is_one_of<S: AsRef<str>>(value: &str, allowed: &[S]) -> bool {
    allowed.iter().any(|candidate| candidate.as_ref() == value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_length_counts_characters_not_bytes() {
        let value = "héllo wörld";
        assert_eq!(char_count(value), 11);
        assert!(value.len() > 11);

        assert!(!exceeds_max_length(value, 11));
        assert!(exceeds_max_length(value, 10));
        assert!(below_min_length("日本", 3));
        assert!(!below_min_length("日本語", 3));
    }

    #[rstest]
    #[case("one line", false)]
    #[case("trailing\n", false)]
    #[case("two\nlines", true)]
    #[case("windows\r\nlines", true)]
    #[case("\nleading", true)]
    fn test_multiline(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_multiline(input), expected);
    }

    #[test]
    fn test_pattern() {
        let digits = Regex::new(r"\A\d+\z").unwrap();
        assert!(matches_pattern("12345", &digits));
        assert!(!matches_pattern("notanumber", &digits));

        let loose = Regex::new(r"\d").unwrap();
        assert!(matches_pattern("abc1", &loose));
    }

    #[test]
    fn test_enum_variant() {
        let allowed = ["yes", "no"];
        assert!(is_one_of("yes", &allowed));
        assert!(!is_one_of("maybe", &allowed));

        let owned = vec!["admin".to_string(), "user".to_string()];
        assert!(is_one_of("user", &owned));
    }
}
