// Copyright (c) 2025 TidyBooks contributors
//
// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0. If a copy
// of the MPL was not distributed with this file, You can obtain one at
// http://mozilla.org/MPL/2.0/.
//
// SPDX-License-Identifier: MPL-2.0

//! Fuzzy matching between folder names.
//!
//! Download folder names and library folder names rarely agree verbatim (release junk, articles,
//! punctuation, transliteration). Matching therefore works on a normalized form and accepts both
//! substring containment and near-miss spellings.

use itertools::Itertools;
use levenshtein::levenshtein;
use std::cmp;
use unidecode::unidecode;

/// Words that carry no signal for matching and are dropped during [`normalize`].
const STOPWORDS: [&str; 6] = ["the", "a", "an", "and", "of", "unabridged"];

/// Normalize a string slice value for comparison.
///
/// Transliterates to ASCII, lowercases, replaces punctuation with whitespace, collapses
/// whitespace runs and drops filler stopwords. The result of `normalize` is a fixpoint:
/// normalizing it again yields the same string.
#[must_use]
pub fn normalize(value: &str) -> String {
    let mut value = unidecode(value);
    value.make_ascii_lowercase();
    value
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect::<String>()
        .split_whitespace()
        .filter(|word| !STOPWORDS.contains(word))
        .join(" ")
}

/// Check whether one name contains the other after normalization.
///
/// The check runs in both directions ("Project Hail Mary" matches "Project Hail Mary
/// [Unabridged]" and vice versa). Both normalized sides must be at least `min_length` bytes long,
/// otherwise short names like "It" would match half the library.
#[must_use]
pub fn is_containment_match(lhs: &str, rhs: &str, min_length: usize) -> bool {
    let lhs = normalize(lhs);
    let rhs = normalize(rhs);
    if lhs.len() < min_length || rhs.len() < min_length {
        return false;
    }

    lhs.contains(&rhs) || rhs.contains(&lhs)
}

/// Calculate the similarity of two names, where 0.0 is no and 1.0 is full agreement.
#[expect(clippy::cast_precision_loss)]
#[must_use]
pub fn similarity(lhs: &str, rhs: &str) -> f64 {
    let lhs = normalize(lhs);
    let rhs = normalize(rhs);
    if lhs == rhs {
        return 1.0;
    }
    if lhs.is_empty() || rhs.is_empty() {
        return 0.0;
    }

    let levenshtein_distance = levenshtein(&lhs, &rhs);
    let max_possible_distance = cmp::max(lhs.len(), rhs.len());

    1.0 - (levenshtein_distance as f64 / max_possible_distance as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use float_eq::assert_float_eq;

    #[test]
    fn test_normalize_case_and_punctuation() {
        assert_eq!(normalize("FoO, bAr!"), "foo bar");
    }

    #[test]
    fn test_normalize_stopwords() {
        assert_eq!(
            normalize("The Name of the Wind [Unabridged]"),
            "name wind"
        );
    }

    #[test]
    fn test_normalize_ampersand() {
        assert_eq!(normalize("Good & Evil"), normalize("Good and Evil"));
    }

    #[test]
    fn test_normalize_unicode() {
        assert_eq!(normalize("Léviathan"), "leviathan");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let once = normalize("The Eye of the World (Wheel of Time, Book 1)");
        assert_eq!(normalize(&once), once);
    }

    #[test]
    fn test_containment_both_directions() {
        assert!(is_containment_match(
            "Project Hail Mary",
            "Project Hail Mary [2021] [64k]",
            8
        ));
        assert!(is_containment_match(
            "Andy Weir - Project Hail Mary",
            "Project Hail Mary",
            8
        ));
    }

    #[test]
    fn test_containment_min_length_guard() {
        // "It" is contained in almost everything; the guard must reject it.
        assert!(!is_containment_match("It", "It Ends With Us", 8));
        assert!(!is_containment_match("Dune", "Dune Messiah", 8));
    }

    #[test]
    fn test_containment_rejects_unrelated() {
        assert!(!is_containment_match(
            "The Martian",
            "Project Hail Mary",
            8
        ));
    }

    #[test]
    fn test_similarity_exact() {
        assert_float_eq!(similarity("foo", "foo"), 1.0, abs <= 0.000_1);
    }

    #[test]
    fn test_similarity_normalized_exact() {
        assert_float_eq!(
            similarity("The Hobbit!", "hobbit"),
            1.0,
            abs <= 0.000_1
        );
    }

    #[test]
    fn test_similarity_distinct() {
        assert_float_eq!(similarity("foo", "bar"), 0.0, abs <= 0.000_1);
    }

    #[test]
    fn test_similarity_near_miss() {
        let value = similarity("Boards of Canda", "Boards of Canada");
        assert!(value > 0.9, "similarity was {value}");
    }

    #[test]
    fn test_similarity_empty() {
        assert_float_eq!(similarity("", ""), 1.0, abs <= 0.000_1);
        assert_float_eq!(similarity("", "foo"), 0.0, abs <= 0.000_1);
    }
}
