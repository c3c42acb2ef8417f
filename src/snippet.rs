//! Context windows around search matches.
//!
//! Offsets are counted in characters, not bytes, so windows never split a
//! UTF-8 sequence. Matching is case-insensitive; the returned text keeps the
//! original casing.

/// Characters of context kept on each side of a match.
pub const DEFAULT_CONTEXT_CHARS: usize = 150;

/// Characters returned when the query does not occur in the content.
const FALLBACK_CHARS: usize = 200;

const ELLIPSIS: &str = "...";

/// Window of up to `context_chars` characters either side of the first match.
///
/// Without a match, returns the first 200 characters followed by `...`.
pub fn extract_snippet(content: &str, query: &str, context_chars: usize) -> String {
    let chars: Vec<char> = content.chars().collect();

    let Some(index) = find_case_insensitive(&chars, query) else {
        let head: String = chars.iter().take(FALLBACK_CHARS).collect();
        return format!("{}{}", head, ELLIPSIS);
    };

    let query_len = query.chars().count();
    let start = index.saturating_sub(context_chars);
    let end = chars.len().min(index + query_len + context_chars);

    let mut snippet = String::new();
    if start > 0 {
        snippet.push_str(ELLIPSIS);
    }
    snippet.extend(&chars[start..end]);
    if end < chars.len() {
        snippet.push_str(ELLIPSIS);
    }
    snippet
}

/// Character index in `chars` where the lowercased `query` first occurs.
///
/// Some characters lowercase to several (e.g. `İ`), so the lowered text is
/// built alongside a map back to original character positions.
fn find_case_insensitive(chars: &[char], query: &str) -> Option<usize> {
    let mut lowered = String::with_capacity(chars.len());
    let mut origin = Vec::with_capacity(chars.len());
    for (i, c) in chars.iter().enumerate() {
        for lc in c.to_lowercase() {
            lowered.push(lc);
            origin.push(i);
        }
    }

    let byte_index = lowered.find(&query.to_lowercase())?;
    let lowered_char_index = lowered[..byte_index].chars().count();
    Some(origin.get(lowered_char_index).copied().unwrap_or(chars.len()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_with_both_ellipses() {
        assert_eq!(extract_snippet("0123456789", "5", 2), "...34567...");
    }

    #[test]
    fn test_window_touching_start() {
        assert_eq!(extract_snippet("0123456789", "1", 2), "0123...");
    }

    #[test]
    fn test_window_touching_end() {
        assert_eq!(extract_snippet("0123456789", "8", 2), "...6789");
    }

    #[test]
    fn test_window_covering_everything_has_no_ellipses() {
        assert_eq!(extract_snippet("0123456789", "5", 20), "0123456789");
    }

    #[test]
    fn test_case_insensitive_preserves_original_case() {
        assert_eq!(
            extract_snippet("The Quick Brown Fox", "brown", 3),
            "...ck Brown Fo..."
        );
    }

    #[test]
    fn test_no_match_returns_head() {
        let content = "a".repeat(300);
        let snippet = extract_snippet(&content, "zzz", DEFAULT_CONTEXT_CHARS);
        assert_eq!(snippet.len(), 203);
        assert!(snippet.ends_with("..."));

        assert_eq!(extract_snippet("short", "zzz", 150), "short...");
    }

    #[test]
    fn test_multibyte_content_is_sliced_on_char_boundaries() {
        let content = "café — naïve résumé";
        assert_eq!(extract_snippet(content, "NAÏVE", 2), "...— naïve r...");
    }

    #[test]
    fn test_expanding_lowercase_maps_back_to_original_offset() {
        // 'İ' lowercases to two chars, which must not shift the window.
        let content = "İİabc";
        assert_eq!(extract_snippet(content, "abc", 0), "...abc");
    }
}
