//! Normalization of the multi-valued `patterns` option.
//!
//! A pattern value is free-form: tokens may be quoted, spread over several
//! lines, or separated by any amount of whitespace. [`normalize`] reduces it
//! to a canonical string with tokens joined by [`PATTERN_DELIMITER`], and
//! [`split`] / [`build_pattern_list`] turn that string into list items.
//! Line breaks and spacing of the raw value do not survive normalization.
use thiserror::Error;

use super::lexer::is_space;
use crate::list::{Item, ItemList};

/// Separator between tokens in a normalized pattern string.
pub const PATTERN_DELIMITER: &str = ";;";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("Normalized pattern list is {len} characters long (limit {max})")]
    TooLong { len: usize, max: usize },
}

/// Collapses a raw pattern value into `token;;token;;...`.
///
/// Quoted tokens (`"..."` or `'...'`) keep their inner whitespace with the
/// quotes removed; an unterminated quote runs to the end of the input.
/// Any other token is a maximal run of non-whitespace characters.
///
/// # Errors
///
/// [`PatternError::TooLong`] if the result is `max_len` characters or longer.
///
/// # Examples
///
/// ```
/// use feedwatch::config::normalize;
///
/// let canonical = normalize("  \"foo bar\"\n   baz  qux ", 2000).unwrap();
/// assert_eq!(canonical, "foo bar;;baz;;qux");
/// ```
pub fn normalize(raw: &str, max_len: usize) -> Result<String, PatternError> {
    let bytes = raw.as_bytes();
    let skip_space = |mut pos: usize| {
        while pos < bytes.len() && is_space(bytes[pos]) {
            pos += 1;
        }
        pos
    };

    let mut out = String::with_capacity(raw.len());
    let mut pos = skip_space(0);
    while pos < bytes.len() {
        if !out.is_empty() {
            out.push_str(PATTERN_DELIMITER);
        }

        let token = match bytes[pos] {
            quote @ (b'"' | b'\'') => {
                let start = pos + 1;
                let end = bytes[start..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(bytes.len(), |offset| start + offset);
                pos = (end + 1).min(bytes.len());
                &raw[start..end]
            }
            _ => {
                let start = pos;
                while pos < bytes.len() && !is_space(bytes[pos]) {
                    pos += 1;
                }
                &raw[start..pos]
            }
        };
        out.push_str(token);
        pos = skip_space(pos);
    }

    if out.len() >= max_len {
        return Err(PatternError::TooLong {
            len: out.len(),
            max: max_len,
        });
    }
    Ok(out)
}

/// Splits a normalized pattern string into its tokens. Empty tokens are dropped.
pub fn split(canonical: &str) -> Vec<&str> {
    canonical
        .split(PATTERN_DELIMITER)
        .filter(|token| !token.is_empty())
        .collect()
}

/// Builds a fresh list with one named item per token of `canonical`.
///
/// A token whose entry cannot be allocated is logged and skipped; the
/// remaining tokens are still added.
pub fn build_pattern_list(canonical: &str) -> ItemList {
    let mut list = ItemList::new();
    for token in split(canonical) {
        if let Err(e) = list.append(Item::named(token)) {
            tracing::error!(pattern = %token, error = %e, "Failed to store filter pattern");
        }
    }
    list
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAX: usize = 2000;

    #[test]
    fn test_normalize_mixed_tokens() {
        let got = normalize("\"foo bar\" baz qux", MAX).unwrap();
        assert_eq!(got, "foo bar;;baz;;qux");
    }

    #[test]
    fn test_normalize_ignores_layout() {
        let compact = normalize("a 'b c' d", MAX).unwrap();
        let spread = normalize("\n\t a\n\n   'b c'\r\n\t\td   \n", MAX).unwrap();
        assert_eq!(compact, spread);
    }

    #[test]
    fn test_normalize_empty_and_blank() {
        assert_eq!(normalize("", MAX).unwrap(), "");
        assert_eq!(normalize(" \n\t ", MAX).unwrap(), "");
    }

    #[test]
    fn test_normalize_unterminated_quote_runs_to_end() {
        assert_eq!(normalize("a \"b c", MAX).unwrap(), "a;;b c");
    }

    #[test]
    fn test_normalize_quote_inside_bare_token_is_literal() {
        assert_eq!(normalize("it's fine", MAX).unwrap(), "it's;;fine");
    }

    #[test]
    fn test_normalize_length_limit() {
        let raw = "a ".repeat(700);
        // 700 tokens + 699 delimiters of two characters
        assert_eq!(
            normalize(&raw, MAX),
            Err(PatternError::TooLong { len: 2098, max: MAX })
        );
        assert!(normalize(&raw, 3000).is_ok());
    }

    #[test]
    fn test_split_drops_empty_tokens() {
        assert_eq!(split("a;;b;;c"), vec!["a", "b", "c"]);
        assert_eq!(split(""), Vec::<&str>::new());
        assert_eq!(split(";;a;;;;b"), vec!["a", "b"]);
    }

    #[test]
    fn test_build_pattern_list() {
        let list = build_pattern_list("foo bar;;baz;;qux");
        let names: Vec<_> = list.names().collect();
        assert_eq!(names, vec!["foo bar", "baz", "qux"]);
        assert!(list.iter().all(|item| item.url.is_none()));
    }
}
