//! Baseline defaults derived from renderer web preferences

use serde::{Deserialize, Serialize};

use crate::content_types;

/// The slice of the renderer's web preferences that seeds content-setting
/// defaults. Pushed wholesale by the browser process whenever preferences
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WebPreferences {
    pub cookie_enabled: bool,
    pub images_enabled: bool,
    pub javascript_enabled: bool,
    pub allow_running_insecure_content: bool,
}

impl Default for WebPreferences {
    fn default() -> Self {
        WebPreferences {
            cookie_enabled: true,
            images_enabled: true,
            javascript_enabled: true,
            allow_running_insecure_content: false,
        }
    }
}

/// Per-content-type baseline used when no rule matches.
///
/// Only the four preference-backed content types have configurable
/// baselines; every other content type defaults to allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferenceDefaults {
    cookies: bool,
    images: bool,
    javascript: bool,
    run_insecure_content: bool,
}

impl PreferenceDefaults {
    pub fn from_preferences(prefs: &WebPreferences) -> Self {
        PreferenceDefaults {
            cookies: prefs.cookie_enabled,
            images: prefs.images_enabled,
            javascript: prefs.javascript_enabled,
            run_insecure_content: prefs.allow_running_insecure_content,
        }
    }

    /// Whether a content type is allowed before any rule applies.
    pub fn default_allowed(&self, content_type: &str) -> bool {
        match content_type {
            content_types::COOKIES => self.cookies,
            content_types::IMAGES => self.images,
            content_types::JAVASCRIPT => self.javascript,
            content_types::RUN_INSECURE_CONTENT => self.run_insecure_content,
            _ => true,
        }
    }
}

impl Default for PreferenceDefaults {
    fn default() -> Self {
        PreferenceDefaults::from_preferences(&WebPreferences::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_preferences() {
        let defaults = PreferenceDefaults::from_preferences(&WebPreferences {
            cookie_enabled: false,
            images_enabled: true,
            javascript_enabled: false,
            allow_running_insecure_content: true,
        });

        assert!(!defaults.default_allowed(content_types::COOKIES));
        assert!(defaults.default_allowed(content_types::IMAGES));
        assert!(!defaults.default_allowed(content_types::JAVASCRIPT));
        assert!(defaults.default_allowed(content_types::RUN_INSECURE_CONTENT));
    }

    #[test]
    fn test_unknown_content_type_defaults_to_allowed() {
        let defaults = PreferenceDefaults::from_preferences(&WebPreferences {
            cookie_enabled: false,
            images_enabled: false,
            javascript_enabled: false,
            allow_running_insecure_content: false,
        });

        assert!(defaults.default_allowed("fingerprinting"));
        assert!(defaults.default_allowed("flash"));
    }

    #[test]
    fn test_initial_preferences() {
        let defaults = PreferenceDefaults::default();

        assert!(defaults.default_allowed(content_types::COOKIES));
        assert!(defaults.default_allowed(content_types::IMAGES));
        assert!(defaults.default_allowed(content_types::JAVASCRIPT));
        // Insecure content stays off until preferences enable it
        assert!(!defaults.default_allowed(content_types::RUN_INSECURE_CONTENT));
    }

    #[test]
    fn test_preferences_wire_names() {
        let prefs: WebPreferences = serde_json::from_str(
            r#"{"cookieEnabled": false, "allowRunningInsecureContent": true}"#,
        )
        .unwrap();

        assert!(!prefs.cookie_enabled);
        assert!(prefs.images_enabled);
        assert!(prefs.javascript_enabled);
        assert!(prefs.allow_running_insecure_content);
    }
}
