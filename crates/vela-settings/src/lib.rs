//! VELA Content Settings
//!
//! In-memory content-permission policy for the browser shell: ordered
//! per-content-type rules pushed down from the browser process, layered
//! over baseline defaults from the renderer web preferences. Queries are
//! synchronous and pure; updates swap complete snapshots.

mod context;
mod engine;
mod error;
mod prefs;
mod rules;
mod setting;
mod store;

pub use context::FrameContext;
pub use engine::PolicyEngine;
pub use error::RuleError;
pub use prefs::{PreferenceDefaults, WebPreferences};
pub use rules::{
    Rule, RuleAction, RuleDiagnostic, RuleSet, RuleSpec, SecondaryPattern,
    FIRST_PARTY_PLACEHOLDER,
};
pub use setting::Setting;
pub use store::PolicyStore;

// Re-export the pattern types alongside the rules that use them
pub use vela_pattern::{Pattern, PatternError};

/// Content types with a preference-backed default. Any other key is a
/// valid content type that simply defaults to allowed.
pub mod content_types {
    pub const COOKIES: &str = "cookies";
    pub const IMAGES: &str = "images";
    pub const JAVASCRIPT: &str = "javascript";
    pub const RUN_INSECURE_CONTENT: &str = "runInsecureContent";
}

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
