//! URL normalization and validation.

use ctxscout_core::FetchError;
use regex_lite::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

/// Permissive URL-shaped substring: scheme plus anything up to whitespace,
/// angle brackets, or quotes.
pub(crate) static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)https?://[^\s<>'"`]+"#).expect("URL pattern is a valid regex")
});

const TRAILING_PUNCTUATION: [char; 4] = [')', ',', '.', ';'];

/// Trim whitespace and trailing sentence punctuation picked up from prose.
pub fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches(TRAILING_PUNCTUATION).to_string()
}

/// Parse `url` and require an `http` or `https` scheme.
pub fn validate_http_url(url: &str) -> Result<Url, FetchError> {
    let parsed = Url::parse(url).map_err(|e| FetchError::InvalidUrl(format!("{url}: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(FetchError::InvalidUrl(format!(
            "{url}: scheme '{other}' is not http/https"
        ))),
    }
}

/// Normalize every entry, silently drop empty or invalid ones, and dedupe
/// case-insensitively keeping the first spelling seen.
pub fn dedupe_urls<I, S>(urls: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for raw in urls {
        let url = normalize_url(raw.as_ref());
        if url.is_empty() || validate_http_url(&url).is_err() {
            continue;
        }
        if seen.insert(url.to_lowercase()) {
            out.push(url);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_trailing_punctuation() {
        assert_eq!(normalize_url(" https://x.com/a). "), "https://x.com/a");
        assert_eq!(normalize_url("https://x.com/a;,"), "https://x.com/a");
        assert_eq!(normalize_url("https://x.com/(a)b"), "https://x.com/(a)b");
    }

    #[test]
    fn validate_accepts_only_http_schemes() {
        assert!(validate_http_url("https://example.com").is_ok());
        assert!(validate_http_url("http://example.com/path?q=1").is_ok());
        assert!(matches!(
            validate_http_url("ftp://example.com"),
            Err(FetchError::InvalidUrl(_))
        ));
        assert!(validate_http_url("").is_err());
        assert!(validate_http_url("not a url").is_err());
    }

    #[test]
    fn dedupe_is_case_insensitive_and_ordered() {
        let urls = dedupe_urls([
            "https://B.com/x",
            "https://a.com",
            "https://b.com/X.",
            "mailto:someone@example.com",
            "",
            "https://a.com/",
        ]);
        assert_eq!(urls, vec!["https://B.com/x", "https://a.com", "https://a.com/"]);
    }

    #[test]
    fn pattern_stops_at_quotes_and_brackets() {
        let found: Vec<&str> = URL_PATTERN
            .find_iter(r#"see "https://a.com/x" and <HTTP://b.com/y>"#)
            .map(|m| m.as_str())
            .collect();
        assert_eq!(found, vec!["https://a.com/x", "HTTP://b.com/y"]);
    }
}
