//! Origin comparison for stored credentials
//!
//! An origin is either a URL (web) or an opaque app identifier such as an
//! Android package name. When only one side is a URL, the other side is
//! read as a bare host. Stored credentials apply to a query origin when
//! [`DomainMatcher::matches`] says so.
//!
//! Host comparison is deliberately coarse: two hosts match when one contains
//! the other. That covers subdomains without public-suffix logic, but also
//! matches unrelated hosts such as `notexample.com` against `example.com`.
//! The [`MatchTier`] of a match records how strong it is so callers can rank
//! suggestions.

mod host_pattern;

pub use host_pattern::HostPattern;

use serde::{Deserialize, Serialize};
use url::Url;

/// Strength of an origin match, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    None,
    /// Hosts only overlap by substring
    Related,
    /// Substring overlap within the same registrable domain
    SameSite,
    SameHost,
    /// Identical origin strings
    Exact,
}

impl MatchTier {
    pub fn confidence(&self) -> f64 {
        match self {
            MatchTier::Exact | MatchTier::SameHost => 1.0,
            MatchTier::SameSite => 0.8,
            MatchTier::Related => 0.5,
            MatchTier::None => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MatchTier::Exact => "exact",
            MatchTier::SameHost => "same host",
            MatchTier::SameSite => "same site",
            MatchTier::Related => "related",
            MatchTier::None => "none",
        }
    }
}

/// Result of comparing two origins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainMatch {
    pub tier: MatchTier,
}

impl DomainMatch {
    const NONE: DomainMatch = DomainMatch {
        tier: MatchTier::None,
    };

    fn of(tier: MatchTier) -> Self {
        Self { tier }
    }

    pub fn is_match(&self) -> bool {
        self.tier != MatchTier::None
    }

    pub fn confidence(&self) -> f64 {
        self.tier.confidence()
    }
}

pub struct DomainMatcher;

impl DomainMatcher {
    /// Check whether credentials stored for one origin apply to the other
    ///
    /// Symmetric in its arguments. Malformed URLs never match.
    pub fn matches(a: &str, b: &str) -> bool {
        Self::compare(a, b).is_match()
    }

    /// Compare two origins and grade the match
    pub fn compare(a: &str, b: &str) -> DomainMatch {
        if a == b {
            return DomainMatch::of(MatchTier::Exact);
        }

        if !is_url(a) && !is_url(b) {
            // Opaque identifiers only match exactly
            return DomainMatch::NONE;
        }

        // A bare host on one side is compared against the URL's host
        let (host_a, host_b) = match (origin_host(a), origin_host(b)) {
            (Some(host_a), Some(host_b)) => (host_a, host_b),
            _ => {
                tracing::debug!("Unparseable origin, no match: {} vs {}", a, b);
                return DomainMatch::NONE;
            }
        };

        if host_a == host_b {
            return DomainMatch::of(MatchTier::SameHost);
        }

        if !host_a.contains(&host_b) && !host_b.contains(&host_a) {
            return DomainMatch::NONE;
        }

        match (registrable_domain(&host_a), registrable_domain(&host_b)) {
            (Some(site_a), Some(site_b)) if site_a == site_b => {
                DomainMatch::of(MatchTier::SameSite)
            }
            _ => DomainMatch::of(MatchTier::Related),
        }
    }
}

/// Whether an origin should be treated as a URL rather than an app identifier
pub fn is_url(origin: &str) -> bool {
    origin
        .get(..4)
        .is_some_and(|prefix| prefix.eq_ignore_ascii_case("http"))
}

/// Host used for comparison: the URL host, or the bare identifier itself
pub(crate) fn origin_host(origin: &str) -> Option<String> {
    if is_url(origin) {
        return extract_host(origin);
    }

    let host = origin.trim().to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();
    if host.is_empty() { None } else { Some(host) }
}

/// Lower-cased host of a URL with any leading "www." removed
///
/// Returns `None` when the URL does not parse or has no host.
pub fn extract_host(origin: &str) -> Option<String> {
    let url = Url::parse(origin.trim()).ok()?;
    let host = url.host_str()?.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host).to_string();

    if host.is_empty() { None } else { Some(host) }
}

/// Registrable domain (eTLD+1) of a host using the Public Suffix List
pub fn registrable_domain(host: &str) -> Option<String> {
    if host.parse::<std::net::IpAddr>().is_ok() {
        return Some(host.to_string());
    }

    psl::domain(host.as_bytes()).map(|d| String::from_utf8_lossy(d.as_bytes()).to_string())
}

/// Human-friendly account name for an origin
///
/// App identifiers use their last segment, URLs the first label of the host.
/// Names are always derived from the origin, never from field contents.
pub fn friendly_name(origin: &str) -> String {
    const FALLBACK: &str = "New Account";

    if !is_url(origin) && origin.contains('.') && !origin.contains('/') {
        return origin
            .rsplit('.')
            .next()
            .filter(|segment| !segment.is_empty())
            .map(capitalize)
            .unwrap_or_else(|| FALLBACK.to_string());
    }

    extract_host(origin)
        .and_then(|host| host.split('.').next().map(capitalize))
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| FALLBACK.to_string())
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_package_names_match() {
        assert!(DomainMatcher::matches(
            "com.android.chrome",
            "com.android.chrome"
        ));
        assert_eq!(
            DomainMatcher::compare("com.android.chrome", "com.android.chrome").tier,
            MatchTier::Exact
        );
    }

    #[test]
    fn test_different_package_names_do_not_match() {
        assert!(!DomainMatcher::matches(
            "com.android.chrome",
            "com.android.chrome.beta"
        ));
    }

    #[test]
    fn test_package_name_does_not_match_unrelated_url() {
        assert!(!DomainMatcher::matches(
            "com.android.chrome",
            "https://example.com"
        ));
        assert!(!DomainMatcher::matches("com.example.app", "https://example.com"));
    }

    #[test]
    fn test_bare_host_compared_against_url_host() {
        assert!(DomainMatcher::matches("example.com", "https://example.com"));
        assert_eq!(
            DomainMatcher::compare("https://example.com", "WWW.Example.com").tier,
            MatchTier::SameHost
        );

        let result = DomainMatcher::compare("accounts.example.com", "https://www.example.com");
        assert!(result.is_match());
        assert_eq!(result.tier, MatchTier::SameSite);

        assert!(!DomainMatcher::matches("", "https://example.com"));
    }

    #[test]
    fn test_www_prefix_and_subdomain() {
        let result =
            DomainMatcher::compare("https://www.example.com", "https://accounts.example.com");
        assert!(result.is_match());
        assert_eq!(result.tier, MatchTier::SameSite);
        assert_eq!(result.confidence(), 0.8);
    }

    #[test]
    fn test_same_host_different_paths() {
        let result = DomainMatcher::compare(
            "https://example.com/login",
            "http://www.example.com/account/settings",
        );
        assert_eq!(result.tier, MatchTier::SameHost);
    }

    #[test]
    fn test_substring_false_positive_is_related() {
        // Known over-match of the substring rule
        let result = DomainMatcher::compare("https://notexample.com", "https://example.com");
        assert!(result.is_match());
        assert_eq!(result.tier, MatchTier::Related);
    }

    #[test]
    fn test_sibling_subdomains_do_not_match() {
        assert!(!DomainMatcher::matches(
            "https://mail.example.com",
            "https://accounts.example.com"
        ));
    }

    #[test]
    fn test_malformed_urls_fail_closed() {
        assert!(!DomainMatcher::matches("https://", "https://example.com"));
        assert!(!DomainMatcher::matches("http://exa mple.com", "https://example.com"));
        assert!(!DomainMatcher::matches("httpfoo", "https://example.com"));
    }

    #[test]
    fn test_symmetry() {
        let origins = [
            "https://example.com",
            "https://www.example.com/login",
            "https://accounts.example.com",
            "https://notexample.com",
            "http://192.168.1.1:8080",
            "com.example.app",
            "com.android.chrome",
            "example.com",
            "www.accounts.example.com",
            "https://",
            "",
            "HTTPS://EXAMPLE.COM",
        ];

        for a in origins {
            for b in origins {
                assert_eq!(
                    DomainMatcher::compare(a, b),
                    DomainMatcher::compare(b, a),
                    "asymmetric result for {:?} vs {:?}",
                    a,
                    b
                );
            }
        }
    }

    #[test]
    fn test_reflexive() {
        for origin in ["https://example.com", "com.example.app", "not a url", "https://"] {
            assert!(DomainMatcher::matches(origin, origin));
        }
    }

    #[test]
    fn test_extract_host() {
        assert_eq!(
            extract_host("https://WWW.Example.com/path?q=1"),
            Some("example.com".to_string())
        );
        assert_eq!(extract_host("not a url"), None);
        assert_eq!(extract_host("https://"), None);
    }

    #[test]
    fn test_friendly_name() {
        assert_eq!(friendly_name("https://www.github.com/login"), "Github");
        assert_eq!(friendly_name("https://accounts.google.com"), "Accounts");
        assert_eq!(friendly_name("com.example.twitter"), "Twitter");
        assert_eq!(friendly_name("not-an-origin"), "New Account");
        assert_eq!(friendly_name(""), "New Account");
    }
}
