/// Checks whether `value` is a locale tag this system accepts: two lowercase
/// ASCII letters, optionally followed by two uppercase ASCII letters (`en`,
/// `frBE`).
///
/// An absent or empty value is accepted only when `allow_empty` is set.
pub fn is_valid_locale(value: Option<&str>, allow_empty: bool) -> bool {
    let value = match value {
        Some(v) if !v.is_empty() => v.as_bytes(),
        _ => return allow_empty,
    };

    match value {
        [a, b] => a.is_ascii_lowercase() && b.is_ascii_lowercase(),
        [a, b, c, d] => {
            a.is_ascii_lowercase()
                && b.is_ascii_lowercase()
                && c.is_ascii_uppercase()
                && d.is_ascii_uppercase()
        }
        _ => false,
    }
}

/// Shorthand for a present value where empty is not allowed.
pub fn is_locale(value: &str) -> bool {
    is_valid_locale(Some(value), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_locales() {
        for locale in ["en", "da", "zh", "enUS", "frBE", "enJP"] {
            assert!(is_locale(locale), "{} should be valid", locale);
        }
    }

    #[test]
    fn test_invalid_locales() {
        for locale in ["e", "EN", "En", "eN", "enu", "enus", "ENUS", "en-US", "en_US", "enUSA", "é1", "1a", "ñe"] {
            assert!(!is_locale(locale), "{} should be invalid", locale);
        }
    }

    #[test]
    fn test_empty_follows_flag() {
        assert!(is_valid_locale(None, true));
        assert!(is_valid_locale(Some(""), true));
        assert!(!is_valid_locale(None, false));
        assert!(!is_valid_locale(Some(""), false));
        // the flag does not loosen the rule for non-empty values
        assert!(!is_valid_locale(Some("EN"), true));
    }
}
