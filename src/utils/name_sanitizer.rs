//! Leaf-name sanitization for new link items.

/// Characters SharePoint rejects in file and folder names.
const ILLEGAL_CHARS: &[char] = &['"', '*', ':', '<', '>', '?', '/', '\\', '|', '#', '%'];

/// Replacement for each illegal character.
const SUBSTITUTE: char = '_';

/// Used when a title sanitizes to nothing.
pub const FALLBACK_NAME: &str = "Link";

/// Turns an arbitrary display title into a base leaf name (no extension).
///
/// Every illegal or control character becomes `_`, surrounding whitespace is
/// trimmed, and an empty result becomes [`FALLBACK_NAME`].
///
/// # Examples
///
/// ```ignore
/// assert_eq!(sanitize("Q3: Plan/Budget"), "Q3_ Plan_Budget");
/// assert_eq!(sanitize("   "), "Link");
/// ```
pub fn sanitize(raw_title: &str) -> String {
    let replaced: String = raw_title
        .chars()
        .map(|c| {
            if is_illegal(c) {
                SUBSTITUTE
            } else {
                c
            }
        })
        .collect();

    let trimmed = replaced.trim();
    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Returns true if `c` may not appear in a leaf name.
pub fn is_illegal(c: char) -> bool {
    ILLEGAL_CHARS.contains(&c) || c.is_control()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_title_unchanged() {
        assert_eq!(sanitize("My Report"), "My Report");
    }

    #[test]
    fn test_illegal_chars_replaced() {
        assert_eq!(sanitize("Q3: Plan/Budget"), "Q3_ Plan_Budget");
        assert_eq!(sanitize(r#"a"b*c<d>e?f\g|h#i%j"#), "a_b_c_d_e_f_g_h_i_j");
    }

    #[test]
    fn test_control_chars_replaced() {
        assert_eq!(sanitize("tab\there"), "tab_here");
        assert_eq!(sanitize("nul\0"), "nul_");
    }

    #[test]
    fn test_whitespace_trimmed() {
        assert_eq!(sanitize("  Report  "), "Report");
    }

    #[test]
    fn test_empty_falls_back() {
        assert_eq!(sanitize(""), "Link");
        assert_eq!(sanitize("   "), "Link");
        assert_eq!(sanitize(""), sanitize("   "));
    }

    #[test]
    fn test_only_illegal_chars_kept_as_substitutes() {
        assert_eq!(sanitize("???"), "___");
    }

    #[test]
    fn test_output_never_contains_illegal_chars() {
        let titles = [
            "normal",
            "with/slash",
            "colon: and | pipe",
            "\"quoted\"",
            "percent 100%",
            "#hashtag",
            "line\nbreak",
            "ünïcödé ✓",
            "",
        ];

        for title in titles {
            let sanitized = sanitize(title);
            assert!(
                !sanitized.chars().any(is_illegal),
                "sanitize({title:?}) = {sanitized:?}"
            );
            assert!(!sanitized.is_empty());
        }
    }

    #[test]
    fn test_unicode_preserved() {
        assert_eq!(sanitize("Über Straße"), "Über Straße");
    }
}
