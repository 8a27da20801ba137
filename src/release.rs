//! Stage tarball URL discovery.
//!
//! Gentoo publishes autobuilds as a plain HTML directory listing. The first
//! link whose href contains the stage pattern wins, so the result depends on
//! the listing's order and on the pattern matching exactly.

use crate::error::{InstallError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

static ANCHOR_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?is)<a\b[^>]*?\bhref\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("anchor regex is valid")
});

/// Fetch the HTML listing at `index_url`.
pub fn fetch_index(index_url: &str, timeout: Duration) -> Result<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("gentoo-installer/", env!("CARGO_PKG_VERSION")))
        .build()?;

    log::info!("Fetching release index: {}", index_url);
    let response = client
        .get(index_url)
        .send()
        .map_err(|e| InstallError::network(format!("Error fetching latest URL: {}", e)))?;

    let status = response.status();
    if !status.is_success() {
        return Err(InstallError::discovery(format!(
            "{} returned HTTP {}",
            index_url, status
        )));
    }

    response
        .text()
        .map_err(|e| InstallError::network(format!("Error reading release index: {}", e)))
}

/// Every anchor `href` in document order. Anchors without one are skipped.
pub fn extract_hrefs(html: &str) -> Vec<String> {
    ANCHOR_HREF
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|m| decode_entities(m.as_str()))
        .collect()
}

fn decode_entities(href: &str) -> String {
    href.replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// `base_url` joined with the first href containing `pattern`.
pub fn discover_artifact_url(html: &str, base_url: &str, pattern: &str) -> Result<String> {
    let href = extract_hrefs(html)
        .into_iter()
        .find(|href| href.contains(pattern))
        .ok_or_else(|| {
            InstallError::discovery(format!(
                "Unable to find a link containing {:?} in the release index",
                pattern
            ))
        })?;

    log::debug!("Matched release href: {}", href);
    Ok(format!("{}{}", base_url, href))
}

/// Fetch the index and discover the stage URL in one go.
pub fn fetch_latest_url(
    index_url: &str,
    base_url: &str,
    pattern: &str,
    timeout: Duration,
) -> Result<String> {
    let html = fetch_index(index_url, timeout)?;
    let url = discover_artifact_url(&html, base_url, pattern)?;
    log::info!("Latest stage tarball: {}", url);
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "http://distfiles.gentoo.org/releases/amd64/autobuilds/current-stage3-amd64/";

    const LISTING: &str = r#"<html><head><title>Index of /</title></head><body>
<h1>Index of /releases/amd64/autobuilds/current-stage3-amd64/</h1>
<pre><a href="../">../</a>
<a name="top"></a>
<a href="latest-stage3.txt">latest-stage3.txt</a>            01-Jan-2024 00:00     1234
<a href="stage3-amd64-20240101T170000Z.tar.xz">stage3-amd64-20240101T170000Z.tar.xz</a> 01-Jan-2024 00:00 1
</pre></body></html>"#;

    #[test]
    fn test_extract_hrefs_skips_anchors_without_href() {
        let hrefs = extract_hrefs(LISTING);
        assert_eq!(
            hrefs,
            vec![
                "../",
                "latest-stage3.txt",
                "stage3-amd64-20240101T170000Z.tar.xz"
            ]
        );
    }

    #[test]
    fn test_extract_hrefs_quote_styles() {
        let html = r#"<A HREF='one'>1</A><a class="x" href=two>2</a><a href="a&amp;b">3</a>"#;
        assert_eq!(extract_hrefs(html), vec!["one", "two", "a&b"]);
    }

    #[test]
    fn test_discover_single_match() {
        let url = discover_artifact_url(LISTING, BASE, "stage3-amd64").expect("match");
        assert_eq!(url, format!("{}stage3-amd64-20240101T170000Z.tar.xz", BASE));
    }

    #[test]
    fn test_discover_first_match_wins() {
        let html = r#"<a href="stage3-amd64-a.tar.xz"></a><a href="stage3-amd64-b.tar.xz"></a>"#;
        let url = discover_artifact_url(html, "http://m/", "stage3-amd64").expect("match");
        assert_eq!(url, "http://m/stage3-amd64-a.tar.xz");
    }

    #[test]
    fn test_discover_no_match() {
        let err = discover_artifact_url(LISTING, BASE, "stage3-arm64").unwrap_err();
        assert!(matches!(err, InstallError::Discovery(_)));
    }

    #[test]
    fn test_discover_empty_page() {
        assert!(discover_artifact_url("", BASE, "stage3").is_err());
    }

    #[test]
    fn test_fetch_index_unreachable() {
        let err = fetch_index("http://127.0.0.1:9/", Duration::from_secs(2)).unwrap_err();
        assert!(matches!(err, InstallError::Network(_)));
    }
}
