//! VELA Content Settings Patterns
//!
//! A pattern selects a set of URLs by host, with optional scheme and port
//! constraints: `"example.com"`, `"[*.]example.com"`,
//! `"https://example.com:8443"`, or the universal wildcard `"*"`.
//! Site rules and resource rules are both expressed with these patterns.

mod error;
mod pattern;

pub use error::PatternError;
pub use pattern::Pattern;

pub type Result<T> = std::result::Result<T, PatternError>;
