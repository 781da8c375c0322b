//! Pattern parsing and URL matching
//!
//! Grammar: `[scheme://][[*.]]host[:port]`, where `*` stands in for an
//! unconstrained scheme, host, or port, and the bracketed `[*.]` marker
//! extends a host to all of its subdomains. A component the pattern does
//! not mention is unconstrained. Any path suffix is accepted and ignored;
//! path never participates in matching.

use url::Url;

use crate::error::PatternError;
use crate::Result;

/// A single content-settings URL pattern.
///
/// Parsing never fails the caller: [`Pattern::parse`] turns an
/// unparsable spec into a pattern that matches no URL at all. Use the
/// `FromStr` impl when the parse error itself is wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern {
    spec: String,
    parts: Option<Parts>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Parts {
    scheme: Option<String>,
    host: HostMatch,
    port: Option<u16>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum HostMatch {
    /// `*` - any host, including none at all
    Any,
    /// Exact host, stored lowercase without trailing dots
    Exact(String),
    /// `[*.]suffix` - the suffix itself or any subdomain of it
    Subdomains(String),
}

impl Pattern {
    /// Parse a pattern spec, mapping any parse failure to a pattern that
    /// matches nothing.
    pub fn parse(spec: &str) -> Pattern {
        spec.parse().unwrap_or_else(|_| Pattern {
            spec: spec.to_string(),
            parts: None,
        })
    }

    /// Whether the spec parsed; an invalid pattern never matches.
    pub fn is_valid(&self) -> bool {
        self.parts.is_some()
    }

    /// The spec string this pattern was built from.
    pub fn as_str(&self) -> &str {
        &self.spec
    }

    /// Test a URL against this pattern.
    pub fn matches(&self, url: &Url) -> bool {
        let Some(parts) = &self.parts else {
            return false;
        };

        if let Some(scheme) = &parts.scheme {
            if url.scheme() != scheme {
                return false;
            }
        }

        if let Some(port) = parts.port {
            if url.port_or_known_default() != Some(port) {
                return false;
            }
        }

        match &parts.host {
            HostMatch::Any => true,
            HostMatch::Exact(host) => match url.host_str() {
                Some(url_host) => normalize_host(url_host) == *host,
                None => false,
            },
            HostMatch::Subdomains(suffix) => match url.host_str() {
                Some(url_host) => {
                    let url_host = normalize_host(url_host);
                    // Label-boundary comparison: the suffix itself, or a
                    // subdomain separated by a dot.
                    url_host == *suffix || url_host.ends_with(&format!(".{}", suffix))
                }
                None => false,
            },
        }
    }
}

impl std::str::FromStr for Pattern {
    type Err = PatternError;

    fn from_str(spec: &str) -> Result<Self> {
        let parts = parse_parts(spec.trim())?;
        Ok(Pattern {
            spec: spec.to_string(),
            parts: Some(parts),
        })
    }
}

impl std::fmt::Display for Pattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.spec)
    }
}

fn parse_parts(spec: &str) -> Result<Parts> {
    if spec.is_empty() {
        return Err(PatternError::Empty);
    }

    if spec == "*" {
        return Ok(Parts {
            scheme: None,
            host: HostMatch::Any,
            port: None,
        });
    }

    let (scheme, rest) = match spec.split_once("://") {
        Some(("*", rest)) => (None, rest),
        Some((scheme, rest)) => {
            if !is_valid_scheme(scheme) {
                return Err(PatternError::InvalidScheme(scheme.to_string()));
            }
            (Some(scheme.to_ascii_lowercase()), rest)
        }
        None => (None, spec),
    };

    // Path, if any, is not part of the pattern.
    let rest = match rest.find('/') {
        Some(slash) => &rest[..slash],
        None => rest,
    };
    if rest.is_empty() {
        return Err(PatternError::MissingHost);
    }

    let (subdomains, host_port) = match rest.strip_prefix("[*.]") {
        Some(stripped) => (true, stripped),
        None => (false, rest),
    };

    let (host, port) = split_port(host_port)?;
    if host.is_empty() {
        return Err(PatternError::MissingHost);
    }

    let host = if host == "*" && !subdomains {
        HostMatch::Any
    } else if subdomains {
        HostMatch::Subdomains(normalize_host(host))
    } else {
        HostMatch::Exact(normalize_host(host))
    };

    Ok(Parts { scheme, host, port })
}

/// Split a trailing `:port` from the host, leaving bracketed IPv6
/// literals intact. A `*` port parses as unconstrained.
fn split_port(host_port: &str) -> Result<(&str, Option<u16>)> {
    if let Some(end) = host_port.rfind(']') {
        let after = &host_port[end + 1..];
        return match after.strip_prefix(':') {
            Some(port) => Ok((&host_port[..=end], parse_port(port)?)),
            None if after.is_empty() => Ok((host_port, None)),
            None => Err(PatternError::InvalidPort(after.to_string())),
        };
    }

    match host_port.rsplit_once(':') {
        Some((host, port)) => Ok((host, parse_port(port)?)),
        None => Ok((host_port, None)),
    }
}

fn parse_port(port: &str) -> Result<Option<u16>> {
    if port == "*" {
        return Ok(None);
    }
    port.parse::<u16>()
        .map(Some)
        .map_err(|_| PatternError::InvalidPort(port.to_string()))
}

fn is_valid_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

fn normalize_host(host: &str) -> String {
    host.trim_end_matches('.').to_ascii_lowercase()
}
