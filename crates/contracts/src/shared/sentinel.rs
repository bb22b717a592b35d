//! The "not applicable" placeholder the backend expects instead of absent
//! optional fields.

pub const NA: &str = "NA";

/// Default entry of the variety field before a concrete variety is known.
pub const DEFAULT_VARIETY_LABEL: &str = "NA - Default Variety";

/// True for empty strings and every spelling of the sentinel.
pub fn is_not_applicable(value: &str) -> bool {
    let v = value.trim();
    v.is_empty() || v.eq_ignore_ascii_case(NA) || v == DEFAULT_VARIETY_LABEL
}

/// `value` unless it is empty, in which case the sentinel.
pub fn or_na(value: &str) -> String {
    if value.trim().is_empty() {
        NA.to_string()
    } else {
        value.to_string()
    }
}

/// First value that is present and not blank.
pub fn first_filled<const N: usize>(values: [Option<String>; N]) -> Option<String> {
    values.into_iter().flatten().find(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_not_applicable() {
        assert!(is_not_applicable(""));
        assert!(is_not_applicable(" na "));
        assert!(is_not_applicable("NA - Default Variety"));
        assert!(!is_not_applicable("TMV-2"));
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(""), "NA");
        assert_eq!(or_na("  "), "NA");
        assert_eq!(or_na("Kharif"), "Kharif");
    }

    #[test]
    fn test_first_filled() {
        assert_eq!(first_filled([None, Some(" ".into()), Some("B".into())]), Some("B".into()));
        assert_eq!(first_filled([Some("A".into()), Some("B".into())]), Some("A".into()));
        assert_eq!(first_filled::<2>([None, None]), None);
    }
}
