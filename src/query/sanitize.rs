//! Escaping of literal values placed inside remote queries.
//!
//! Every externally supplied string that reaches a query goes through
//! [`sanitize`] (or [`EscapeMode::sanitize`] when the order is configured).
//! The escaped form is what travels on the wire between single quotes.
//!
//! ```rust
//! use crm_contact_sync::query::sanitize;
//!
//! assert_eq!(sanitize("o'neil+test@example.com"), r"o\'neil%2Btest@example.com");
//! ```

use crate::config::EscapeMode;

impl EscapeMode {
    /// Escape `value` for inclusion in a quoted query literal.
    ///
    /// In [`EscapeMode::Strict`] backslashes are doubled first, then single
    /// quotes, double quotes and percent signs get a backslash, and finally
    /// `+` becomes `%2B` because the transport turns a bare `+` into a space.
    ///
    /// [`EscapeMode::Legacy`] escapes the quotes and percent signs first and
    /// doubles backslashes afterwards, so the backslash in front of a quote is
    /// doubled too. Kept only for wire compatibility with stored query text.
    pub fn sanitize(self, value: &str) -> String {
        match self {
            EscapeMode::Strict => {
                let escaped = value.replace('\\', r"\\");
                escape_quotes_and_percent(&escaped).replace('+', "%2B")
            }
            EscapeMode::Legacy => escape_quotes_and_percent(value)
                .replace('\\', r"\\")
                .replace('+', "%2B"),
        }
    }
}

fn escape_quotes_and_percent(value: &str) -> String {
    value
        .replace('\'', r"\'")
        .replace('"', r#"\""#)
        .replace('%', r"\%")
}

/// Escape `value` using the strict order.
pub fn sanitize(value: &str) -> String {
    EscapeMode::Strict.sanitize(value)
}

/// Escape `value` using the historic order.
pub fn sanitize_legacy(value: &str) -> String {
    EscapeMode::Legacy.sanitize(value)
}

/// Recover the original text from a strictly escaped literal.
///
/// This is how the remote query engine reads a literal: a backslash takes the
/// next character verbatim and an unescaped `%2B` is a plus sign.
pub(crate) fn unescape(literal: &str) -> String {
    let chars: Vec<char> = literal.chars().collect();
    let mut result = String::with_capacity(literal.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '\\' if i + 1 < chars.len() => {
                result.push(chars[i + 1]);
                i += 2;
            }
            '%' if chars.get(i + 1) == Some(&'2') && chars.get(i + 2) == Some(&'B') => {
                result.push('+');
                i += 3;
            }
            c => {
                result.push(c);
                i += 1;
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// True when every quote in `escaped` is preceded by an odd run of backslashes.
    fn quotes_are_escaped(escaped: &str) -> bool {
        let chars: Vec<char> = escaped.chars().collect();
        chars.iter().enumerate().all(|(i, c)| {
            if *c != '\'' && *c != '"' {
                return true;
            }
            let backslashes = chars[..i].iter().rev().take_while(|c| **c == '\\').count();
            backslashes % 2 == 1
        })
    }

    #[test]
    fn test_plain_email_is_unchanged() {
        assert_eq!(sanitize("jane.doe@example.com"), "jane.doe@example.com");
    }

    #[test]
    fn test_strict_escaping() {
        assert_eq!(sanitize("O'Brien"), r"O\'Brien");
        assert_eq!(sanitize(r#"say "hi""#), r#"say \"hi\""#);
        assert_eq!(sanitize("100%"), r"100\%");
        assert_eq!(sanitize(r"a\b"), r"a\\b");
        assert_eq!(sanitize("a+b@x.com"), "a%2Bb@x.com");
        assert_eq!(sanitize(r"\'"), r"\\\'");
    }

    #[test]
    fn test_legacy_escaping_doubles_inserted_backslashes() {
        assert_eq!(sanitize_legacy("O'Brien"), r"O\\'Brien");
        assert_eq!(sanitize_legacy("100%"), r"100\\%");
        assert_eq!(sanitize_legacy(r"a\b"), r"a\\b");
        assert_eq!(sanitize_legacy("a+b"), "a%2Bb");
    }

    #[test]
    fn test_plus_encoding_is_not_escaped_again() {
        // The percent of %2B is inserted after percent escaping.
        assert_eq!(sanitize("+"), "%2B");
        assert_eq!(sanitize("%2B"), r"\%2B");
        assert_eq!(unescape(&sanitize("%2B")), "%2B");
    }

    proptest! {
        #[test]
        fn prop_strict_output_has_no_unescaped_quotes_or_plus(value in ".*") {
            let escaped = sanitize(&value);
            prop_assert!(quotes_are_escaped(&escaped));
            prop_assert!(!escaped.contains('+'));
        }

        #[test]
        fn prop_strict_output_survives_mixed_quotes_and_backslashes(value in r#"[a-z'"\\%+@.]{0,24}"#) {
            let escaped = sanitize(&value);
            prop_assert!(quotes_are_escaped(&escaped));
            prop_assert_eq!(unescape(&escaped), value);
        }
    }
}
