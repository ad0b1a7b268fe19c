//! Presence checks
//!
//! A value is "present" unless it is missing, an empty collection, or a
//! string without a single non-whitespace character.

use std::collections::{BTreeMap, HashMap};

/// Anything that can be meaningfully absent.
///
/// Whitespace is Unicode whitespace (`char::is_whitespace`), so a string of
/// ideographic spaces (U+3000) or no-break spaces is blank, not just ASCII blanks.
pub trait Presence {
    fn is_present(&self) -> bool;

    fn is_blank(&self) -> bool {
        !self.is_present()
    }
}

impl Presence for str {
    fn is_present(&self) -> bool {
        self.chars().any(|c| !c.is_whitespace())
    }
}

impl Presence for String {
    fn is_present(&self) -> bool {
        self.as_str().is_present()
    }
}

impl<T: Presence + ?Sized> Presence for &T {
    fn is_present(&self) -> bool {
        (**self).is_present()
    }
}

impl<T: Presence> Presence for Option<T> {
    fn is_present(&self) -> bool {
        self.as_ref().is_some_and(Presence::is_present)
    }
}

impl<T> Presence for [T] {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<T> Presence for Vec<T> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for HashMap<K, V> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

impl<K, V> Presence for BTreeMap<K, V> {
    fn is_present(&self) -> bool {
        !self.is_empty()
    }
}

/// Free-function form of [`Presence::is_present`]
pub fn is_present<T: Presence + ?Sized>(value: &T) -> bool {
    value.is_present()
}

/// Free-function form of [`Presence::is_blank`]
pub fn is_blank<T: Presence + ?Sized>(value: &T) -> bool {
    value.is_blank()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_none_is_blank() {
        let value: Option<String> = None;
        assert!(is_blank(&value));
        assert!(!is_present(&value));
    }

    #[test]
    fn test_empty_collections_are_blank() {
        let list: Vec<String> = Vec::new();
        let map: HashMap<String, String> = HashMap::new();

        assert!(is_blank(&list));
        assert!(is_blank(&map));
        assert!(is_present(&vec!["x".to_string()]));
    }

    #[rstest]
    #[case("", false)]
    #[case(" \t\r\n", false)]
    #[case("123", true)]
    #[case("  a  ", true)]
    #[case("\u{3000}", false)]
    #[case("\u{a0}\u{2003}", false)]
    fn test_string_presence(#[case] input: &str, #[case] expected: bool) {
        assert_eq!(is_present(input), expected);
    }

    #[test]
    fn test_option_delegates_to_inner_value() {
        assert!(is_blank(&Some("   ".to_string())));
        assert!(is_present(&Some("ok")));
    }
}
