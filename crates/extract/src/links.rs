//! Follow-up link discovery inside fetched text.

use std::collections::HashSet;
use url::Url;

use crate::urls::{URL_PATTERN, normalize_url};

/// Lowercased `host[:port]`, the unit of the same-host policy.
fn authority(url: &Url) -> String {
    let host = url.host_str().unwrap_or_default().to_lowercase();
    match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host,
    }
}

/// `host|path|query` with the trailing slash of the path ignored. Two URLs
/// with equal keys point at the same page.
pub fn identity_key(url: &Url) -> String {
    format!(
        "{}|{}|{}",
        authority(url),
        url.path().trim_end_matches('/'),
        url.query().unwrap_or_default()
    )
}

/// Collect up to `max_links` distinct links from `text`, in order of first
/// appearance, skipping the base page itself and, unless `allow_external`,
/// links to other hosts. Fragments are stripped.
pub fn extract_links(
    base_url: &str,
    text: &str,
    max_links: usize,
    allow_external: bool,
) -> Vec<String> {
    if max_links == 0 {
        return Vec::new();
    }

    let base = Url::parse(base_url).ok();
    let base_host = base.as_ref().map(authority).unwrap_or_default();
    let base_key = base.as_ref().map(identity_key).unwrap_or_default();

    let mut out = Vec::new();
    let mut seen = HashSet::new();

    for m in URL_PATTERN.find_iter(text) {
        let mut candidate = normalize_url(m.as_str());
        if let Some(hash) = candidate.find('#') {
            candidate.truncate(hash);
        }

        let Ok(parsed) = Url::parse(&candidate) else {
            continue;
        };
        if !matches!(parsed.scheme(), "http" | "https") {
            continue;
        }

        let host = authority(&parsed);
        if !allow_external && !base_host.is_empty() && !host.is_empty() && host != base_host {
            continue;
        }

        let key = identity_key(&parsed);
        if key == base_key {
            continue;
        }
        if !seen.insert(key.to_lowercase()) {
            continue;
        }

        out.push(candidate);
        if out.len() >= max_links {
            break;
        }
    }

    out
}
