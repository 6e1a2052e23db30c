//! Cache-busting version parameters for `url(...)` references.
//!
//! Every local, unversioned asset URL in a stylesheet gets a `v=<token>`
//! query parameter, so a new build forces browsers to re-fetch images and
//! fonts:
//!
//! ```text
//! background: url(img/bg.png);            -> url(img/bg.png?v=2817)
//! background: url('img/bg.png?x=1');      -> url('img/bg.png?x=1&v=2817')
//! background: url(//cdn.example.com/a);   -> unchanged (remote)
//! background: url(img/bg.png?v=2816);     -> unchanged (already versioned)
//! ```

use regex::{Captures, Regex};
use std::sync::LazyLock;

/// `url(` + whitespace, the value up to the first `)` on the line, then `)`.
static RE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(url\s*\(\s*)([^)\r\n]*)(\))").expect("url pattern is valid")
});

/// A single `url(...)` occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlReference<'a> {
    /// `url(` plus any whitespace before the value.
    pub prefix: &'a str,
    /// The value between the parens, untrimmed.
    pub value: &'a str,
    /// The closing paren.
    pub suffix: &'a str,
}

impl<'a> UrlReference<'a> {
    fn from_captures(caps: &Captures<'a>) -> Self {
        let group = |i| caps.get(i).map_or("", |m| m.as_str());
        Self {
            prefix: group(1),
            value: group(2),
            suffix: group(3),
        }
    }

    /// Rewrite this reference with `token`.
    ///
    /// Returns `None` when the URL is left alone: already versioned,
    /// remote (`//`), or empty.
    pub fn versioned(&self, token: &str) -> Option<String> {
        let url = self.value.trim();
        if url.is_empty() || url.contains("?v=") || url.contains("&v=") || url.contains("//") {
            return None;
        }

        let (url, close_quote) = match url.strip_suffix(['\'', '"']) {
            Some(stripped) => (stripped, &url[stripped.len()..]),
            None => (url, ""),
        };
        let separator = if url.contains('?') { '&' } else { '?' };

        Some(format!(
            "{}{url}{separator}v={token}{close_quote}{}",
            self.prefix, self.suffix
        ))
    }
}

/// Find every `url(...)` reference in `css`, in source order.
pub fn scan_urls(css: &str) -> Vec<UrlReference<'_>> {
    RE_URL
        .captures_iter(css)
        .map(|caps| UrlReference::from_captures(&caps))
        .collect()
}

/// Append `v=<token>` to every local, unversioned `url(...)` in `css`.
///
/// Applying this twice with the same token is the same as applying it once.
pub fn versionize_urls(css: &str, token: &str) -> String {
    versionize_urls_counted(css, token).0
}

/// Like [`versionize_urls`], also returning how many references changed.
pub fn versionize_urls_counted(css: &str, token: &str) -> (String, usize) {
    let mut changed = 0;
    let result = RE_URL.replace_all(css, |caps: &Captures| {
        let reference = UrlReference::from_captures(caps);
        match reference.versioned(token) {
            Some(rewritten) => {
                changed += 1;
                rewritten
            }
            None => caps[0].to_string(),
        }
    });
    (result.into_owned(), changed)
}

/// Derive the query parameter value from a dotted build version.
///
/// Only the last component is used (`"1.4.0.2817"` → `"2817"`), HTML-encoded.
/// A version without dots is returned as-is.
pub fn derive_version_token(raw: &str) -> String {
    match raw.rsplit_once('.') {
        Some((_, revision)) => html_escape::encode_quoted_attribute(revision).into_owned(),
        None => raw.to_string(),
    }
}
