//! Token-set similarity on a 0-100 scale.
//!
//! Follows the RapidFuzz `token_set_ratio` definition: whitespace tokens are
//! deduplicated into sets and the shared tokens are compared against each
//! side's extra tokens with an insertion/deletion (Indel) ratio.

use std::collections::BTreeSet;

use rapidfuzz::distance::indel;

/// Convert a distance over `lensum` characters to a 0-100 similarity.
fn score_from_distance(distance: usize, lensum: usize) -> f64 {
    if lensum == 0 {
        return 100.0;
    }
    100.0 - 100.0 * distance as f64 / lensum as f64
}

/// Token-set ratio on a 0-100 scale.
///
/// Returns 0 when either side has no tokens and 100 when one token set
/// contains the other.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let tokens_a: BTreeSet<&str> = a.split_whitespace().collect();
    let tokens_b: BTreeSet<&str> = b.split_whitespace().collect();
    if tokens_a.is_empty() || tokens_b.is_empty() {
        return 0.0;
    }

    let intersection: Vec<&str> = tokens_a.intersection(&tokens_b).copied().collect();
    let diff_ab: Vec<&str> = tokens_a.difference(&tokens_b).copied().collect();
    let diff_ba: Vec<&str> = tokens_b.difference(&tokens_a).copied().collect();

    if !intersection.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
        return 100.0;
    }

    // BTreeSet iteration is sorted, so the joins are the sorted token strings
    let diff_ab_joined = diff_ab.join(" ");
    let diff_ba_joined = diff_ba.join(" ");
    let diff_ab_len = diff_ab_joined.chars().count();
    let diff_ba_len = diff_ba_joined.chars().count();
    let sect_len = intersection.join(" ").chars().count();
    let separator = usize::from(sect_len != 0);

    let sect_ab_len = sect_len + separator + diff_ab_len;
    let sect_ba_len = sect_len + separator + diff_ba_len;

    // "sect + ab" vs "sect + ba" differ only in their tails
    let distance = indel::distance(diff_ab_joined.chars(), diff_ba_joined.chars());
    let result = score_from_distance(distance, sect_ab_len + sect_ba_len);
    if sect_len == 0 {
        return result;
    }

    // "sect" vs "sect + ab" differ only by the appended tokens
    let sect_ab_ratio = score_from_distance(separator + diff_ab_len, sect_len + sect_ab_len);
    let sect_ba_ratio = score_from_distance(separator + diff_ba_len, sect_len + sect_ba_len);

    result.max(sect_ab_ratio).max(sect_ba_ratio)
}
