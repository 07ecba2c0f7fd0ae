use calyx::distance::levenshtein;
use proptest::prelude::*;

#[test]
fn known_distances() {
    assert_eq!(levenshtein("kitten", "sitting"), 3);
    assert_eq!(levenshtein("saturday", "sunday"), 3);
    assert_eq!(levenshtein("rosettacode", "raisethysword"), 8);
    assert_eq!(levenshtein("flaw", "lawn"), 2);
    assert_eq!(levenshtein("apple", "apply"), 1);
}

#[test]
fn empty_strings() {
    assert_eq!(levenshtein("", ""), 0);
    assert_eq!(levenshtein("", "abc"), 3);
    assert_eq!(levenshtein("abc", ""), 3);
}

#[test]
fn identical_strings_have_zero_distance() {
    assert_eq!(levenshtein("test", "test"), 0);
}

#[test]
fn comparison_is_case_sensitive() {
    assert_eq!(levenshtein("Kitten", "kitten"), 1);
}

#[test]
fn distance_counts_codepoints() {
    // ü is one codepoint but two bytes in UTF-8.
    assert_eq!(levenshtein("über", "uber"), 1);
    assert_eq!(levenshtein("日本語", "日本"), 1);
    assert_eq!(levenshtein("日本語", ""), 3);
}

proptest! {
    /// Distance from a string to itself is always zero.
    #[test]
    fn prop_identity(s in ".*") {
        prop_assert_eq!(levenshtein(&s, &s), 0);
    }

    /// Distance from the empty string is the codepoint count.
    #[test]
    fn prop_empty_measures_length(s in ".*") {
        prop_assert_eq!(levenshtein("", &s), s.chars().count());
    }

    /// Argument order never changes the distance.
    #[test]
    fn prop_symmetry(a in ".*", b in ".*") {
        prop_assert_eq!(levenshtein(&a, &b), levenshtein(&b, &a));
    }

    /// Edit distance satisfies the triangle inequality.
    #[test]
    fn prop_triangle_inequality(
        a in "[a-z]{0,10}",
        b in "[a-z]{0,10}",
        c in "[a-z]{0,10}"
    ) {
        prop_assert!(levenshtein(&a, &c) <= levenshtein(&a, &b) + levenshtein(&b, &c));
    }

    /// Appending one codepoint costs exactly one edit.
    #[test]
    fn prop_single_insertion(s in "[a-z]{0,10}") {
        let longer = format!("{s}x");
        prop_assert_eq!(levenshtein(&s, &longer), 1);
    }
}
