//! Static response headers for deployed routes.
//!
//! Rules are ordered from most to least specific. When the routing layer
//! resolves the headers for a path, the first rule that sets a given header
//! key wins, so a broad rule listed later never overrides a narrower one.

use glob::Pattern;
use serde::Serialize;

pub const CACHE_CONTROL: &str = "Cache-Control";
pub const X_CONTENT_TYPE_OPTIONS: &str = "X-Content-Type-Options";
pub const REFERRER_POLICY: &str = "Referrer-Policy";

/// One year, for fonts.
pub const FONTS_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";
/// One hour, for every other static asset.
pub const STATIC_CACHE_CONTROL: &str = "public, max-age=3600, immutable";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEntry {
    pub key: String,
    pub value: String,
}

impl HeaderEntry {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

/// A path pattern and the headers applied to matching responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderRule {
    pub source: String,
    pub headers: Vec<HeaderEntry>,
}

impl HeaderRule {
    pub fn new(source: &str, headers: Vec<HeaderEntry>) -> Self {
        Self {
            source: source.to_string(),
            headers,
        }
    }

    /// `*` spans path separators, so `/*` covers every path including `/`.
    /// A source that is not a valid glob matches nothing.
    pub fn matches(&self, path: &str) -> bool {
        Pattern::new(&self.source)
            .map(|p| p.matches(path))
            .unwrap_or(false)
    }
}

/// The fixed rule table: fonts, static assets, then the two catch-all
/// security headers.
pub fn header_rules() -> Vec<HeaderRule> {
    vec![
        HeaderRule::new(
            "/static/fonts/*",
            vec![HeaderEntry::new(CACHE_CONTROL, FONTS_CACHE_CONTROL)],
        ),
        HeaderRule::new(
            "/static/*",
            vec![HeaderEntry::new(CACHE_CONTROL, STATIC_CACHE_CONTROL)],
        ),
        HeaderRule::new(
            "/*",
            vec![HeaderEntry::new(X_CONTENT_TYPE_OPTIONS, "nosniff")],
        ),
        HeaderRule::new(
            "/*",
            vec![HeaderEntry::new(
                REFERRER_POLICY,
                "no-referrer-when-downgrade",
            )],
        ),
    ]
}

/// Headers applied to `path`, in rule order. Header keys compare
/// case-insensitively and the first match for a key is kept.
pub fn resolve_headers<'a>(rules: &'a [HeaderRule], path: &str) -> Vec<&'a HeaderEntry> {
    let mut out: Vec<&HeaderEntry> = Vec::new();

    for rule in rules.iter().filter(|r| r.matches(path)) {
        for h in &rule.headers {
            if out.iter().any(|e| e.key.eq_ignore_ascii_case(&h.key)) {
                continue;
            }
            out.push(h);
        }
    }

    out
}
