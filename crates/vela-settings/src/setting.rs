//! Content setting values

use serde::{Deserialize, Serialize};

/// Resolved value of a content setting.
///
/// Rule evaluation only ever derives `Allow` or `Block`; the remaining
/// values exist for callers that surface settings to script, where
/// `"ask"`, `"session"` and `"default"` are legal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Setting {
    Allow,
    Block,
    Ask,
    #[serde(rename = "session")]
    SessionOnly,
    Default,
}

impl Setting {
    pub fn as_str(&self) -> &'static str {
        match self {
            Setting::Allow => "allow",
            Setting::Block => "block",
            Setting::Ask => "ask",
            Setting::SessionOnly => "session",
            Setting::Default => "default",
        }
    }

    /// Whether the setting permits the governed behavior.
    pub fn is_allowed(&self) -> bool {
        matches!(self, Setting::Allow)
    }
}

impl std::fmt::Display for Setting {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Setting {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(Setting::Allow),
            "block" => Ok(Setting::Block),
            "ask" => Ok(Setting::Ask),
            "session" => Ok(Setting::SessionOnly),
            "default" => Ok(Setting::Default),
            _ => Err(format!("Unknown content setting: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_round_trip() {
        for setting in [
            Setting::Allow,
            Setting::Block,
            Setting::Ask,
            Setting::SessionOnly,
            Setting::Default,
        ] {
            assert_eq!(setting.as_str().parse::<Setting>().unwrap(), setting);
        }

        assert!("prompt".parse::<Setting>().is_err());
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(
            serde_json::to_string(&Setting::SessionOnly).unwrap(),
            "\"session\""
        );
        assert_eq!(serde_json::to_string(&Setting::Allow).unwrap(), "\"allow\"");
        assert_eq!(
            serde_json::from_str::<Setting>("\"default\"").unwrap(),
            Setting::Default
        );
    }

    #[test]
    fn test_is_allowed() {
        assert!(Setting::Allow.is_allowed());
        assert!(!Setting::Block.is_allowed());
        assert!(!Setting::Ask.is_allowed());
    }
}
