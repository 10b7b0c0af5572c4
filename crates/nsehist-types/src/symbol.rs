//! Index name normalization.

/// Index-family tokens NSE always spells in capitals.
const INDEX_FAMILIES: &[(&str, &str)] = &[
    ("nifty", "NIFTY"),
    ("sensex", "SENSEX"),
    ("bankex", "BANKEX"),
];

/// Canonicalizes a user-entered index name to NSE's capitalization.
///
/// Whole whitespace-separated tokens matching a known index family
/// (`nifty`, `sensex`, `bankex`, any casing) are upper-cased; every other
/// token keeps its casing. Tokens are re-joined with single spaces, so
/// `"nifty  Bank"` becomes `"NIFTY Bank"`. Blank input is returned as-is.
///
/// # Example
///
/// ```
/// use nsehist_types::normalize_index_name;
///
/// assert_eq!(normalize_index_name("Nifty Midcap 150"), "NIFTY Midcap 150");
/// assert_eq!(normalize_index_name("NIFTY 50"), "NIFTY 50");
/// ```
#[must_use]
pub fn normalize_index_name(name: &str) -> String {
    if name.trim().is_empty() {
        return name.to_string();
    }

    name.split_whitespace()
        .map(|word| {
            INDEX_FAMILIES
                .iter()
                .find(|(lower, _)| word.eq_ignore_ascii_case(lower))
                .map_or(word, |&(_, canonical)| canonical)
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Optional variant of [`normalize_index_name`]; `None` stays `None`.
#[must_use]
pub fn normalize_index_name_opt(name: Option<&str>) -> Option<String> {
    name.map(normalize_index_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_families_uppercased() {
        assert_eq!(normalize_index_name("nifty 50"), "NIFTY 50");
        assert_eq!(normalize_index_name("Nifty Bank"), "NIFTY Bank");
        assert_eq!(normalize_index_name("sensex"), "SENSEX");
        assert_eq!(normalize_index_name("BanKex"), "BANKEX");
    }

    #[test]
    fn test_other_tokens_keep_casing() {
        assert_eq!(
            normalize_index_name("nifty Smallcap 250"),
            "NIFTY Smallcap 250"
        );
        assert_eq!(normalize_index_name("India VIX"), "India VIX");
    }

    #[test]
    fn test_only_whole_tokens_match() {
        // "NIFTY50" is a token of its own, not the "nifty" family word
        assert_eq!(normalize_index_name("nifty50 value 20"), "nifty50 value 20");
    }

    #[test]
    fn test_idempotent() {
        for input in ["nifty bank", "Nifty Midcap 150", "sensex", "NIFTY IT", "abc"] {
            let once = normalize_index_name(input);
            assert_eq!(normalize_index_name(&once), once);
        }
    }

    #[test]
    fn test_empty_and_missing() {
        assert_eq!(normalize_index_name(""), "");
        assert_eq!(normalize_index_name("   "), "   ");
        assert_eq!(normalize_index_name_opt(None), None);
        assert_eq!(
            normalize_index_name_opt(Some("nifty it")),
            Some("NIFTY it".to_string())
        );
    }
}
