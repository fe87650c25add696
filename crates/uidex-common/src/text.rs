//! Small text and URL helpers shared by the harvest and moderation paths.

use url::Url;

/// Collapse runs of whitespace (including newlines) into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop everything from the first `#` onward. In-page anchors are not distinct resources.
pub fn strip_fragment(url: &str) -> String {
    match url.split_once('#') {
        Some((head, _)) => head.trim().to_string(),
        None => url.trim().to_string(),
    }
}

/// Resolve `href` against `base` and strip its fragment.
///
/// Absolute hrefs are kept as-is apart from the fragment. Returns `None` when
/// neither the href nor the base can be parsed.
pub fn resolve_doc_url(base: &str, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    let resolved = match Url::parse(href) {
        Ok(absolute) => absolute,
        Err(_) => Url::parse(base).ok()?.join(href).ok()?,
    };
    http_without_fragment(resolved)
}

/// Canonical form of an absolute doc URL: parsed, http(s) only, no fragment.
///
/// `https://x.test` and `https://x.test/` come out the same, matching what
/// `resolve_doc_url` produces for scraped hrefs. Relative input is `None`.
pub fn canonical_doc_url(url: &str) -> Option<String> {
    http_without_fragment(Url::parse(url.trim()).ok()?)
}

fn http_without_fragment(mut url: Url) -> Option<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    url.set_fragment(None);
    Some(url.to_string())
}
