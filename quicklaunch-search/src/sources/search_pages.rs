//! Detection of search-engine result pages.
//!
//! History is full of result pages from the user's own searches. They
//! make poor launcher hits, so the history source can drop them.

use url::Url;

/// Returns `true` if `raw` is a result page of a well-known search engine.
///
/// Recognised (with or without a leading `www.`):
///
/// - Google: `google.<tld>/search`
/// - Bing: `bing.com/search`
/// - Yahoo: `search.yahoo.*`
/// - DuckDuckGo: `duckduckgo.com/?<query>`
/// - Baidu: `baidu.com/s`
pub fn is_search_engine_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(full_host) = url.host_str() else {
        return false;
    };
    if full_host.starts_with("search.yahoo.") {
        return true;
    }

    let host = full_host.strip_prefix("www.").unwrap_or(full_host);
    let path = url.path();

    if let Some(tld) = host.strip_prefix("google.") {
        let valid_tld = !tld.is_empty() && tld.chars().all(|c| c.is_ascii_lowercase() || c == '.');
        return valid_tld && path.starts_with("/search");
    }

    match host {
        "bing.com" => path.starts_with("/search"),
        "duckduckgo.com" => path == "/" && url.query().is_some(),
        "baidu.com" => path.starts_with("/s"),
        _ => false,
    }
}
