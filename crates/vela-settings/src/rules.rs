//! Content setting rules
//!
//! Rules arrive from the browser process as a dictionary keyed by content
//! type, each value an ordered list of `{primaryPattern, secondaryPattern,
//! setting}` entries. Parsing happens once, at ingestion: entries missing a
//! required field are dropped and reported, and the surviving rules carry
//! pre-parsed patterns and a closed allow/block action.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use vela_pattern::Pattern;

use crate::error::RuleError;
use crate::setting::Setting;

/// Secondary-pattern placeholder resolved against the requesting page at
/// evaluation time.
pub const FIRST_PARTY_PLACEHOLDER: &str = "[firstParty]";

/// Wire shape of a single rule entry, as delivered by the update producer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RuleSpec {
    pub primary_pattern: Option<String>,
    pub secondary_pattern: Option<String>,
    pub setting: Option<String>,
}

impl RuleSpec {
    pub fn new(primary: &str, setting: &str) -> Self {
        RuleSpec {
            primary_pattern: Some(primary.to_string()),
            secondary_pattern: None,
            setting: Some(setting.to_string()),
        }
    }

    pub fn with_secondary(mut self, secondary: &str) -> Self {
        self.secondary_pattern = Some(secondary.to_string());
        self
    }
}

/// What a matching rule does. Freeform setting strings collapse here at
/// parse time: `"block"` and `"deny"` block, every other value allows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleAction {
    Allow,
    Block,
}

impl RuleAction {
    fn from_setting_str(setting: &str) -> Self {
        match setting {
            "block" | "deny" => RuleAction::Block,
            _ => RuleAction::Allow,
        }
    }

    pub fn setting(self) -> Setting {
        match self {
            RuleAction::Allow => Setting::Allow,
            RuleAction::Block => Setting::Block,
        }
    }
}

/// Constraint on the requested resource URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecondaryPattern {
    /// No secondary pattern; only the primary URL is consulted.
    Unconstrained,
    /// `[firstParty]` - rewritten to `[*.]<primary host>` per query.
    FirstParty,
    Pattern(Pattern),
}

/// A parsed rule, ready for evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub primary: Pattern,
    pub secondary: SecondaryPattern,
    pub action: RuleAction,
}

impl Rule {
    fn from_spec(spec: &RuleSpec) -> Result<Rule, RuleError> {
        let primary = spec
            .primary_pattern
            .as_deref()
            .ok_or(RuleError::MissingPrimaryPattern)?;
        let setting = spec.setting.as_deref().ok_or(RuleError::MissingSetting)?;

        // An empty secondary pattern string means unconstrained.
        let secondary = match spec.secondary_pattern.as_deref() {
            None | Some("") => SecondaryPattern::Unconstrained,
            Some(FIRST_PARTY_PLACEHOLDER) => SecondaryPattern::FirstParty,
            Some(other) => SecondaryPattern::Pattern(Pattern::parse(other)),
        };

        Ok(Rule {
            primary: Pattern::parse(primary),
            secondary,
            action: RuleAction::from_setting_str(setting),
        })
    }
}

/// One rule entry that was dropped during ingestion, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleDiagnostic {
    pub content_type: String,
    pub index: usize,
    pub error: RuleError,
}

/// Immutable mapping from content type to its ordered rule list.
///
/// Replaced wholesale on every update; insertion order within a list is
/// evaluation order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleSet {
    rules: HashMap<String, Vec<Rule>>,
}

impl RuleSet {
    /// Parse a full rule dictionary. Entries missing a required field are
    /// dropped, reported in the returned diagnostics, and logged; the
    /// remaining entries keep their relative order.
    pub fn from_specs(specs: &HashMap<String, Vec<RuleSpec>>) -> (RuleSet, Vec<RuleDiagnostic>) {
        let mut rules = HashMap::new();
        let mut diagnostics = Vec::new();

        for (content_type, entries) in specs {
            let mut parsed = Vec::with_capacity(entries.len());
            for (index, spec) in entries.iter().enumerate() {
                match Rule::from_spec(spec) {
                    Ok(rule) => parsed.push(rule),
                    Err(error) => {
                        tracing::warn!(
                            content_type = %content_type,
                            index,
                            %error,
                            "Dropping invalid content setting rule"
                        );
                        diagnostics.push(RuleDiagnostic {
                            content_type: content_type.clone(),
                            index,
                            error,
                        });
                    }
                }
            }
            rules.insert(content_type.clone(), parsed);
        }

        (RuleSet { rules }, diagnostics)
    }

    /// The ordered rules for a content type, if it has any.
    pub fn rules_for(&self, content_type: &str) -> Option<&[Rule]> {
        self.rules.get(content_type).map(|r| r.as_slice())
    }

    /// Content types present in this rule set. Order is unspecified.
    pub fn content_types(&self) -> Vec<String> {
        self.rules.keys().cloned().collect()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_rule() {
        let spec = RuleSpec::new("example.com", "allow").with_secondary("[*.]cdn.com");
        let rule = Rule::from_spec(&spec).unwrap();

        assert_eq!(rule.action, RuleAction::Allow);
        assert!(rule.primary.is_valid());
        assert!(matches!(rule.secondary, SecondaryPattern::Pattern(_)));
    }

    #[test]
    fn test_setting_strings_collapse_to_allow_or_block() {
        for setting in ["block", "deny"] {
            let rule = Rule::from_spec(&RuleSpec::new("*", setting)).unwrap();
            assert_eq!(rule.action, RuleAction::Block);
        }
        // Anything else allows, including states the engine never derives
        for setting in ["allow", "ask", "session", "nonsense"] {
            let rule = Rule::from_spec(&RuleSpec::new("*", setting)).unwrap();
            assert_eq!(rule.action, RuleAction::Allow);
        }
    }

    #[test]
    fn test_missing_fields_are_invalid() {
        let no_primary = RuleSpec {
            primary_pattern: None,
            secondary_pattern: None,
            setting: Some("allow".to_string()),
        };
        assert_eq!(
            Rule::from_spec(&no_primary).unwrap_err(),
            RuleError::MissingPrimaryPattern
        );

        let no_setting = RuleSpec {
            primary_pattern: Some("example.com".to_string()),
            secondary_pattern: None,
            setting: None,
        };
        assert_eq!(
            Rule::from_spec(&no_setting).unwrap_err(),
            RuleError::MissingSetting
        );
    }

    #[test]
    fn test_empty_primary_is_valid_but_matches_nothing() {
        let rule = Rule::from_spec(&RuleSpec::new("", "allow")).unwrap();
        assert!(!rule.primary.is_valid());
    }

    #[test]
    fn test_empty_secondary_is_unconstrained() {
        let rule =
            Rule::from_spec(&RuleSpec::new("example.com", "allow").with_secondary("")).unwrap();
        assert_eq!(rule.secondary, SecondaryPattern::Unconstrained);
    }

    #[test]
    fn test_first_party_placeholder() {
        let rule = Rule::from_spec(
            &RuleSpec::new("example.com", "block").with_secondary(FIRST_PARTY_PLACEHOLDER),
        )
        .unwrap();
        assert_eq!(rule.secondary, SecondaryPattern::FirstParty);
    }

    #[test]
    fn test_from_specs_drops_invalid_and_keeps_order() {
        let mut specs = HashMap::new();
        specs.insert(
            "cookies".to_string(),
            vec![
                RuleSpec::new("a.com", "allow"),
                RuleSpec {
                    setting: None,
                    ..RuleSpec::new("broken.com", "allow")
                },
                RuleSpec::new("b.com", "block"),
            ],
        );

        let (rules, diagnostics) = RuleSet::from_specs(&specs);

        let cookies = rules.rules_for("cookies").unwrap();
        assert_eq!(cookies.len(), 2);
        assert_eq!(cookies[0].primary.as_str(), "a.com");
        assert_eq!(cookies[1].primary.as_str(), "b.com");

        assert_eq!(
            diagnostics,
            vec![RuleDiagnostic {
                content_type: "cookies".to_string(),
                index: 1,
                error: RuleError::MissingSetting,
            }]
        );
    }

    #[test]
    fn test_rule_spec_wire_names() {
        let spec: RuleSpec = serde_json::from_str(
            r#"{"primaryPattern": "example.com", "secondaryPattern": "[firstParty]", "setting": "block"}"#,
        )
        .unwrap();

        assert_eq!(spec.primary_pattern.as_deref(), Some("example.com"));
        assert_eq!(spec.secondary_pattern.as_deref(), Some("[firstParty]"));
        assert_eq!(spec.setting.as_deref(), Some("block"));
    }

    #[test]
    fn test_content_types_are_rule_set_keys() {
        let mut specs = HashMap::new();
        specs.insert("cookies".to_string(), vec![RuleSpec::new("a.com", "allow")]);
        specs.insert("images".to_string(), vec![]);

        let (rules, _) = RuleSet::from_specs(&specs);
        let mut types = rules.content_types();
        types.sort();
        assert_eq!(types, vec!["cookies", "images"]);
    }
}
