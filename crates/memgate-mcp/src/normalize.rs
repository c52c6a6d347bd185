//! Identifier normalization.
//!
//! Agents refer to webs and memories in several shorthand forms (`@web-42`,
//! `web-42`, `Web42`). The backend only understands the bare id. Each family
//! has one ordered prefix table, most specific prefix first. The first prefix
//! that matches (ASCII case-insensitively) is stripped, and the table is
//! applied again until no prefix matches, so normalizing twice never changes
//! the result of normalizing once.

/// Prefixes accepted in front of a web id.
pub const WEB_ID_PREFIXES: &[&str] = &["@web-", "web-", "web", "@"];

/// Prefixes accepted in front of a source (memory) id.
pub const SOURCE_ID_PREFIXES: &[&str] = &["@memory-", "memory-", "memory", "@"];

/// Strip known prefixes from a trimmed id until none match.
///
/// Never fails: input without a known prefix is returned trimmed, and input
/// made only of prefixes yields an empty string.
pub fn normalize_id(raw: &str, prefixes: &[&str]) -> String {
    let mut id = raw.trim();
    while let Some(rest) = prefixes
        .iter()
        .find_map(|prefix| strip_prefix_ignore_case(id, prefix))
    {
        // Every prefix is non-empty, so each pass shortens the id.
        id = rest.trim();
    }
    id.to_string()
}

/// Normalize an optional id, treating blank results as absent.
pub fn normalize_optional_id(raw: Option<&str>, prefixes: &[&str]) -> Option<String> {
    raw.map(|id| normalize_id(id, prefixes))
        .filter(|id| !id.is_empty())
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    // Prefixes are ASCII, so a byte-length split always lands on a char boundary
    // when the bytes match.
    let head = s.as_bytes().get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix.as_bytes())
        .then(|| &s[prefix.len()..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_web_id_forms_collapse() {
        for raw in ["@web-42", "web-42", "web42", "@42", "42", "@Web-42", "WEB-42", "  web-42 "] {
            assert_eq!(normalize_id(raw, WEB_ID_PREFIXES), "42", "input {raw:?}");
        }
    }

    #[test]
    fn test_source_id_forms_collapse() {
        for raw in ["@memory-9f", "memory-9f", "memory9f", "@9f", "9f", "@Memory-9f"] {
            assert_eq!(normalize_id(raw, SOURCE_ID_PREFIXES), "9f", "input {raw:?}");
        }
    }

    #[test]
    fn test_idempotent() {
        for raw in ["@web-42", "web-42", "web42", "42", "abc-123", "@web-@7", "web@web7", " @ web-9"] {
            let once = normalize_id(raw, WEB_ID_PREFIXES);
            assert_eq!(normalize_id(&once, WEB_ID_PREFIXES), once, "input {raw:?}");
        }
        for raw in ["memory-memory-3", "@memory-@3f", "Memory@3f"] {
            let once = normalize_id(raw, SOURCE_ID_PREFIXES);
            assert_eq!(normalize_id(&once, SOURCE_ID_PREFIXES), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_stacked_prefixes_fully_stripped() {
        assert_eq!(normalize_id("@web-@7", WEB_ID_PREFIXES), "7");
        assert_eq!(normalize_id("memory-memory-3", SOURCE_ID_PREFIXES), "3");
        assert_eq!(normalize_id("@memory-@3f", SOURCE_ID_PREFIXES), "3f");
    }

    #[test]
    fn test_degenerate_input() {
        assert_eq!(normalize_id("", WEB_ID_PREFIXES), "");
        assert_eq!(normalize_id("@web-", WEB_ID_PREFIXES), "");
        assert_eq!(normalize_id("wé", WEB_ID_PREFIXES), "wé");
        assert_eq!(normalize_optional_id(Some("web-"), WEB_ID_PREFIXES), None);
        assert_eq!(normalize_optional_id(None, WEB_ID_PREFIXES), None);
        assert_eq!(
            normalize_optional_id(Some("@web-7"), WEB_ID_PREFIXES).as_deref(),
            Some("7")
        );
    }
}
