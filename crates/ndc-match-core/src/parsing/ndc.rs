//! National Drug Code normalization.
//!
//! Source data carries NDCs in the 11-digit billing form, in the three
//! hyphenated 10-digit labeler-product-package shapes, or as bare digit runs
//! with leading zeros lost by spreadsheet tooling.

/// Length of a canonical NDC.
pub const NDC11_LEN: usize = 11;

/// Normalize an NDC to its 11-digit form, or `None` if it cannot be.
///
/// 1. Blank input → `None`.
/// 2. Exactly 11 digits once separators are stripped → those digits.
/// 3. Hyphenated `4-4-2`, `5-3-2` or `5-4-1` → a `0` is inserted in front of
///    the short segment.
/// 4. 10 or 9 bare digits → left-padded with zeros. Unlike step 3 this does not
///    know which segment lost its zero.
pub fn normalize_ndc(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let digits: String = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() == NDC11_LEN {
        return Some(digits);
    }

    if let Some(ndc) = normalize_segmented(value) {
        return Some(ndc);
    }

    match digits.len() {
        9 | 10 => Some(format!("{digits:0>11}")),
        _ => None,
    }
}

/// Expand a hyphenated 10-digit NDC by zero-padding its short segment.
fn normalize_segmented(value: &str) -> Option<String> {
    if !value.contains('-') {
        return None;
    }
    let parts: Vec<&str> = value.split('-').collect();
    let [labeler, product, package] = parts.as_slice() else {
        return None;
    };
    if !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        return None;
    }

    match (labeler.len(), product.len(), package.len()) {
        (4, 4, 2) => Some(format!("0{labeler}{product}{package}")),
        (5, 3, 2) => Some(format!("{labeler}0{product}{package}")),
        (5, 4, 1) => Some(format!("{labeler}{product}0{package}")),
        _ => None,
    }
}

/// Check if a value is already a canonical NDC.
pub fn is_ndc11(value: &str) -> bool {
    value.len() == NDC11_LEN && value.chars().all(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_digits_pass_through() {
        assert_eq!(normalize_ndc("00002322830"), Some("00002322830".into()));
        assert_eq!(normalize_ndc("00002-3228-30"), Some("00002322830".into()));
        assert_eq!(normalize_ndc(" 0000 2322 830 "), Some("00002322830".into()));
    }

    #[test]
    fn test_hyphenated_shapes() {
        assert_eq!(normalize_ndc("1234-5678-90"), Some("01234567890".into()));
        assert_eq!(normalize_ndc("12345-678-90"), Some("12345067890".into()));
        assert_eq!(normalize_ndc("12345-6789-0"), Some("12345678900".into()));
    }

    #[test]
    fn test_bare_digit_padding() {
        assert_eq!(normalize_ndc("2322830"), None);
        assert_eq!(normalize_ndc("1234567890"), Some("01234567890".into()));
        assert_eq!(normalize_ndc("123456789"), Some("00123456789".into()));
    }

    #[test]
    fn test_unparseable_is_none() {
        assert_eq!(normalize_ndc(""), None);
        assert_eq!(normalize_ndc("   "), None);
        assert_eq!(normalize_ndc("N/A"), None);
        assert_eq!(normalize_ndc("123"), None);
        assert_eq!(normalize_ndc("123456789012"), None);
        // Unknown hyphen shape with 10 digits falls back to plain padding
        assert_eq!(normalize_ndc("123-4567-890"), Some("01234567890".into()));
    }

    #[test]
    fn test_non_digit_segments_do_not_expand() {
        // 4-4-2 shape, but letters would leak into the code
        assert_eq!(normalize_ndc("ABCD-5678-90"), None);
    }

    #[test]
    fn test_is_ndc11() {
        assert!(is_ndc11("01234567890"));
        assert!(!is_ndc11("1234567890"));
        assert!(!is_ndc11("0123456789X"));
    }
}
