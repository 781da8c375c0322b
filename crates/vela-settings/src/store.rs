//! Policy store
//!
//! Process-wide holder of the current rules and preference defaults. The
//! browser process pushes complete replacements in; script-facing callers
//! query synchronously. Construct one store per process and pass it to
//! whoever needs it; there is no global accessor.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use url::Url;

use crate::context::FrameContext;
use crate::engine::PolicyEngine;
use crate::error::RuleError;
use crate::prefs::{PreferenceDefaults, WebPreferences};
use crate::rules::{RuleDiagnostic, RuleSet, RuleSpec};
use crate::setting::Setting;

/// One complete rules + defaults pair. Updates swap whole snapshots, so a
/// query never sees a partially-applied replacement.
#[derive(Debug, Clone, Default)]
struct Snapshot {
    engine: PolicyEngine,
    defaults: PreferenceDefaults,
}

pub struct PolicyStore {
    snapshot: RwLock<Snapshot>,
}

impl PolicyStore {
    pub fn new() -> Self {
        PolicyStore {
            snapshot: RwLock::new(Snapshot::default()),
        }
    }

    /// Replace all rules with a parsed dictionary of specs.
    ///
    /// The swap is wholesale: a content type absent from `specs` has no
    /// rules afterwards, whatever it had before. Invalid entries are
    /// dropped and returned as diagnostics; the update itself never fails.
    pub fn replace_rules(&self, specs: &HashMap<String, Vec<RuleSpec>>) -> Vec<RuleDiagnostic> {
        let (rules, diagnostics) = RuleSet::from_specs(specs);
        tracing::debug!(
            content_types = rules.content_types().len(),
            dropped = diagnostics.len(),
            "Replacing content setting rules"
        );

        self.snapshot.write().engine = PolicyEngine::new(Arc::new(rules));
        diagnostics
    }

    /// Replace all rules from the transport-shaped JSON dictionary.
    ///
    /// Accepts whatever the update producer sent: entries that are not
    /// objects, or rule lists that are not arrays, become diagnostics like
    /// any other invalid entry.
    pub fn replace_rules_json(&self, payload: &serde_json::Value) -> Vec<RuleDiagnostic> {
        let mut specs: HashMap<String, Vec<RuleSpec>> = HashMap::new();
        let mut diagnostics = Vec::new();

        if let Some(dictionary) = payload.as_object() {
            for (content_type, value) in dictionary {
                let Some(entries) = value.as_array() else {
                    tracing::warn!(
                        content_type = %content_type,
                        "Dropping content setting rules: value is not an array"
                    );
                    diagnostics.push(RuleDiagnostic {
                        content_type: content_type.clone(),
                        index: 0,
                        error: RuleError::InvalidRuleList,
                    });
                    specs.insert(content_type.clone(), Vec::new());
                    continue;
                };

                let mut parsed = Vec::with_capacity(entries.len());
                for (index, entry) in entries.iter().enumerate() {
                    match serde_json::from_value::<RuleSpec>(entry.clone()) {
                        Ok(spec) => parsed.push(spec),
                        Err(_) => diagnostics.push(RuleDiagnostic {
                            content_type: content_type.clone(),
                            index,
                            error: RuleError::InvalidEntry,
                        }),
                    }
                }
                specs.insert(content_type.clone(), parsed);
            }
        }

        diagnostics.extend(self.replace_rules(&specs));
        diagnostics
    }

    /// Replace the preference-backed defaults.
    pub fn replace_preferences(&self, prefs: &WebPreferences) {
        let defaults = PreferenceDefaults::from_preferences(prefs);
        self.snapshot.write().defaults = defaults;
        tracing::debug!(?prefs, "Replaced content setting preference defaults");
    }

    /// Effective setting for a content type and URL pair.
    ///
    /// `incognito` is part of the query interface for callers that carry
    /// it, but it does not participate in resolution.
    pub fn get_setting(
        &self,
        content_type: &str,
        primary_url: &Url,
        secondary_url: &Url,
        incognito: bool,
    ) -> Setting {
        let snapshot = self.snapshot.read().clone();
        let default_allowed = snapshot.defaults.default_allowed(content_type);
        let setting =
            snapshot
                .engine
                .evaluate(content_type, primary_url, secondary_url, default_allowed);

        tracing::trace!(
            content_type,
            %primary_url,
            %secondary_url,
            incognito,
            setting = %setting,
            "Resolved content setting"
        );
        setting
    }

    /// Effective setting for a query originating from a frame.
    pub fn setting_for_frame(
        &self,
        frame: &FrameContext,
        content_type: &str,
        incognito: bool,
    ) -> Setting {
        self.get_setting(
            content_type,
            frame.primary_url(),
            frame.secondary_url(),
            incognito,
        )
    }

    /// Content types governed by the current rules. Types with only a
    /// preference default and no rules are not listed. Order is
    /// unspecified.
    pub fn content_types(&self) -> Vec<String> {
        self.snapshot.read().engine.rule_set().content_types()
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}
