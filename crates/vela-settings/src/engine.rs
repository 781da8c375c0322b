//! Rule evaluation
//!
//! Decides the effective setting for one (content type, primary URL,
//! secondary URL) query against an immutable rule set.

use std::sync::Arc;

use url::Url;

use vela_pattern::Pattern;

use crate::rules::{RuleSet, SecondaryPattern};
use crate::setting::Setting;

/// Evaluates queries against one rule-set snapshot.
///
/// Cheap to clone; the underlying rules are shared.
#[derive(Debug, Clone, Default)]
pub struct PolicyEngine {
    rules: Arc<RuleSet>,
}

impl PolicyEngine {
    pub fn new(rules: Arc<RuleSet>) -> Self {
        PolicyEngine { rules }
    }

    pub fn rule_set(&self) -> &RuleSet {
        &self.rules
    }

    /// Resolve the setting for a content type.
    ///
    /// Starts from `default_allowed` and scans the content type's rules in
    /// insertion order. A rule applies when its primary pattern matches the
    /// primary URL and its secondary pattern, when present, matches the
    /// secondary URL. Every applying rule overwrites the result, so the
    /// last match wins; there is no specificity ranking and no early exit.
    pub fn evaluate(
        &self,
        content_type: &str,
        primary_url: &Url,
        secondary_url: &Url,
        default_allowed: bool,
    ) -> Setting {
        let mut result = if default_allowed {
            Setting::Allow
        } else {
            Setting::Block
        };

        let Some(rules) = self.rules.rules_for(content_type) else {
            return result;
        };

        for rule in rules {
            let secondary_matches = match &rule.secondary {
                SecondaryPattern::Unconstrained => true,
                SecondaryPattern::FirstParty => {
                    first_party_pattern(primary_url).matches(secondary_url)
                }
                SecondaryPattern::Pattern(pattern) => pattern.matches(secondary_url),
            };

            if rule.primary.matches(primary_url) && secondary_matches {
                result = rule.action.setting();
            }
        }

        result
    }
}

/// The `[firstParty]` placeholder as a concrete pattern: the primary URL's
/// host and all of its subdomains. Uses the literal host, not the
/// registrable domain. A primary URL without a host yields a pattern that
/// matches nothing.
fn first_party_pattern(primary_url: &Url) -> Pattern {
    let host = primary_url
        .host_str()
        .unwrap_or("")
        .trim_start_matches('[')
        .trim_end_matches(']');
    Pattern::parse(&format!("[*.]{}", host))
}
