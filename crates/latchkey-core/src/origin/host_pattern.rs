use super::{extract_host, origin_host};
use glob::Pattern;

/// A host pattern used to exclude sites from save prompts
#[derive(Debug, Clone)]
pub enum HostPattern {
    /// Exact host or app identifier (case-insensitive)
    Exact(String),
    /// Glob pattern match (e.g., *.example.com)
    Glob(Pattern),
}

impl HostPattern {
    /// Parse a host pattern string into a HostPattern
    ///
    /// A full URL is reduced to its host first, and a leading "www." is
    /// dropped either way. If the remainder contains
    /// '*' or '?', it's treated as a glob pattern, otherwise as an exact
    /// match. Both are case-insensitive.
    pub fn parse(pattern: &str) -> crate::Result<Self> {
        let trimmed = pattern.trim();
        if trimmed.is_empty() {
            return Err(crate::Error::InvalidPattern(
                "Host pattern is empty".to_string(),
            ));
        }

        let host = if trimmed.contains("://") {
            extract_host(trimmed)
        } else {
            origin_host(trimmed)
        };
        let host = host.ok_or_else(|| {
            crate::Error::InvalidPattern(format!("Invalid host pattern '{}'", pattern))
        })?;

        if host.contains('*') || host.contains('?') {
            let glob_pattern = Pattern::new(&host).map_err(|e| {
                crate::Error::InvalidPattern(format!("Invalid glob pattern '{}': {}", pattern, e))
            })?;
            Ok(HostPattern::Glob(glob_pattern))
        } else {
            Ok(HostPattern::Exact(host))
        }
    }

    /// Check if an origin (URL or app identifier) matches this pattern
    ///
    /// URLs are compared by host; anything else as a bare identifier. A
    /// "www." prefix is ignored on both.
    pub fn matches(&self, origin: &str) -> bool {
        let Some(candidate) = origin_host(origin) else {
            return false;
        };

        match self {
            HostPattern::Exact(host) => &candidate == host,
            HostPattern::Glob(pattern) => pattern.matches(&candidate),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            HostPattern::Exact(host) => host,
            HostPattern::Glob(pattern) => pattern.as_str(),
        }
    }
}
