//! Answer checking.
//!
//! Letter-pair answers are compared as *sets of characters*: whitespace is
//! ignored, case is folded, and order and repetition do not matter. The
//! learner recalls an unordered mnemonic image, so `"ab"`, `"B A"` and
//! `"aab"` all match a reference of `"AB"`.
//!
//! Edge identifiers are single tokens and use [`same_token`] instead.

use std::collections::BTreeSet;

/// Typed at any answer prompt to leave the session.
pub const CANCEL_SENTINEL: &str = "quit";

fn char_set(s: &str) -> BTreeSet<char> {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Order- and multiplicity-independent equality of two answers.
pub fn equivalent(reference: &str, candidate: &str) -> bool {
    char_set(reference) == char_set(candidate)
}

/// Case-insensitive exact match of two trimmed tokens.
pub fn same_token(reference: &str, candidate: &str) -> bool {
    reference.trim().to_lowercase() == candidate.trim().to_lowercase()
}

/// True when the learner asked to stop.
pub fn is_cancel(answer: &str) -> bool {
    answer.trim().eq_ignore_ascii_case(CANCEL_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_and_case_are_ignored() {
        assert!(equivalent("AB", "ba"));
        assert!(equivalent("ba", "AB"));
    }

    #[test]
    fn whitespace_is_ignored() {
        assert!(equivalent(" a b ", "ba"));
        assert!(equivalent("ice cream", "icecream"));
    }

    #[test]
    fn repetition_collapses() {
        assert!(equivalent("AAB", "AB"));
        assert!(equivalent("apple", "aple"));
    }

    #[test]
    fn extra_or_missing_chars_fail() {
        assert!(!equivalent("AB", "ABC"));
        assert!(!equivalent("ABC", "AB"));
        assert!(!equivalent("apple", ""));
    }

    #[test]
    fn tokens_match_exactly_modulo_case() {
        assert!(same_token("A", " a "));
        assert!(!same_token("A", "B"));
        assert!(!same_token("AB", "BA"));
    }

    #[test]
    fn cancel_is_case_insensitive() {
        assert!(is_cancel("quit"));
        assert!(is_cancel("  QUIT "));
        assert!(!is_cancel("quite"));
        assert!(!is_cancel("exit"));
    }
}
