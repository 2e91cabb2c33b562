//! URL construction for provider pages and search templates.

use gamescrape_core::Error;

/// Error type for URL construction failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

impl From<UrlError> for Error {
    fn from(err: UrlError) -> Self {
        Error::InvalidUrl(err.to_string())
    }
}

/// Parse an absolute http(s) URL.
///
/// Normalization steps:
/// 1. Trim leading/trailing whitespace
/// 2. Lowercase the host
/// 3. Remove fragment (#...)
/// 4. Keep query string intact (do not reorder)
pub fn canonicalize(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if let Some(host) = parsed.host_str() {
        let host = host.to_lowercase();
        parsed
            .set_host(Some(&host))
            .map_err(|e| UrlError::InvalidUrl(e.to_string()))?;
    }

    parsed.set_fragment(None);

    Ok(parsed)
}

/// Build `base + path + suffix` for one category page of an entity.
///
/// A `path` that is already absolute replaces the base.
pub fn page_url(base: &str, path: &str, suffix: &str) -> Result<url::Url, UrlError> {
    let path = path.trim();

    let joined = if path.contains("://") {
        format!("{}{}", path.trim_end_matches('/'), suffix)
    } else {
        let base = base.trim().trim_end_matches('/');
        let path = path.trim_end_matches('/');
        let sep = if path.is_empty() || path.starts_with('/') { "" } else { "/" };
        format!("{base}{sep}{path}{suffix}")
    };

    canonicalize(&joined)
}

/// Normalize free query text: whitespace runs collapse to `separator` and
/// every word is form-urlencoded.
pub fn search_query(query: &str, separator: &str) -> String {
    query
        .split_whitespace()
        .map(|word| url::form_urlencoded::byte_serialize(word.as_bytes()).collect::<String>())
        .collect::<Vec<_>>()
        .join(separator)
}

/// Check a value that fills one path segment, such as a platform slug.
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so the value can
/// never add a segment or a query to the URL it is placed in.
pub fn path_segment(value: &str) -> Result<&str, UrlError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(UrlError::Empty);
    }
    if !value.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_') {
        return Err(UrlError::InvalidUrl(format!("invalid path segment: {value:?}")));
    }
    Ok(value)
}

/// Replace every `{name}` placeholder in `template`.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_string(), |acc, (name, value)| acc.replace(&format!("{{{name}}}"), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonicalize_lowercase_host() {
        let url = canonicalize("http://WWW.GameFAQs.com/pc/1-game").unwrap();
        assert_eq!(url.host_str(), Some("www.gamefaqs.com"));
        assert_eq!(url.path(), "/pc/1-game");
    }

    #[test]
    fn test_canonicalize_requires_scheme() {
        assert!(matches!(canonicalize("www.gamefaqs.com"), Err(UrlError::InvalidUrl(_))));
        assert!(matches!(canonicalize("ftp://gamefaqs.com"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(canonicalize("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_canonicalize_keeps_query_drops_fragment() {
        let url = canonicalize("http://www.gamefaqs.com/search?game=a+b&page=0#top").unwrap();
        assert_eq!(url.query(), Some("game=a+b&page=0"));
        assert_eq!(url.fragment(), None);
    }

    #[test]
    fn test_page_url_joins_parts() {
        let url = page_url("http://www.gamefaqs.com", "/pc/562826-monty-python", "/data").unwrap();
        assert_eq!(url.as_str(), "http://www.gamefaqs.com/pc/562826-monty-python/data");

        let url = page_url("http://www.gamefaqs.com/", "pc/562826-monty-python", "/").unwrap();
        assert_eq!(url.as_str(), "http://www.gamefaqs.com/pc/562826-monty-python/");
    }

    #[test]
    fn test_page_url_absolute_path_replaces_base() {
        let url = page_url("http://www.gamefaqs.com", "http://other.example/pc/1-game/", "/data").unwrap();
        assert_eq!(url.as_str(), "http://other.example/pc/1-game/data");
    }

    #[test]
    fn test_search_query_collapses_whitespace() {
        assert_eq!(search_query("  Monty   Python\tWaste ", "+"), "Monty+Python+Waste");
        assert_eq!(search_query("Monty Python's", "+"), "Monty+Python%27s");
        assert_eq!(search_query("   ", "+"), "");
    }

    #[test]
    fn test_path_segment() {
        assert_eq!(path_segment(" snes ").unwrap(), "snes");
        assert_eq!(path_segment("virtual-boy_2").unwrap(), "virtual-boy_2");
        assert!(matches!(path_segment(""), Err(UrlError::Empty)));
        for value in ["snes/../admin", "snes?page=9", "game boy", "pc#top", "sn%65s"] {
            assert!(matches!(path_segment(value), Err(UrlError::InvalidUrl(_))), "{value}");
        }
    }

    #[test]
    fn test_fill_template() {
        let url = fill_template("{base}/search?game={query}&page={page}", &[
            ("base", "http://www.gamefaqs.com"),
            ("query", "zelda"),
            ("page", "2"),
        ]);
        assert_eq!(url, "http://www.gamefaqs.com/search?game=zelda&page=2");
    }
}
