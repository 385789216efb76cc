//! Similarity scoring between a query and a normalized title.
//!
//! Both inputs are expected to be normalized already (lowercase words
//! separated by single spaces). Scores are in `0.0..=100.0`.

use std::collections::BTreeSet;
use strsim::normalized_damerau_levenshtein;

const TOKEN_SET_WEIGHT: f64 = 0.85;
const TOKEN_SORT_WEIGHT: f64 = 0.15;

/// Score how well `title` matches `query`.
///
/// Mostly a token-set ratio, so a query that names a subset of the title's
/// words (`"iron"` against `"iron man"`) or names them in a different order
/// still scores high. A smaller token-sort component makes titles with
/// fewer unmatched words win ties between otherwise perfect matches.
pub fn score(query: &str, title: &str) -> f64 {
    if query.trim().is_empty() || title.trim().is_empty() {
        return 0.0;
    }
    TOKEN_SET_WEIGHT * token_set_ratio(query, title) + TOKEN_SORT_WEIGHT * token_sort_ratio(query, title)
}

fn ratio(a: &str, b: &str) -> f64 {
    normalized_damerau_levenshtein(a, b) * 100.0
}

fn tokens(value: &str) -> BTreeSet<&str> {
    value.split_whitespace().collect()
}

fn join<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    tokens.into_iter().collect::<Vec<_>>().join(" ")
}

pub(crate) fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut left: Vec<&str> = a.split_whitespace().collect();
    let mut right: Vec<&str> = b.split_whitespace().collect();
    left.sort_unstable();
    right.sort_unstable();
    ratio(&left.join(" "), &right.join(" "))
}

pub(crate) fn token_set_ratio(a: &str, b: &str) -> f64 {
    let (left, right) = (tokens(a), tokens(b));
    let shared = join(left.intersection(&right).copied());
    let only_left = join(left.difference(&right).copied());
    let only_right = join(right.difference(&left).copied());
    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }
    let with_left = format!("{shared} {only_left}").trim().to_string();
    let with_right = format!("{shared} {only_right}").trim().to_string();
    let mut best = ratio(&with_left, &with_right);
    if !shared.is_empty() {
        best = best.max(ratio(&shared, &with_left)).max(ratio(&shared, &with_right));
    }
    best
}
