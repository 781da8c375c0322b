//! Content settings error types

use thiserror::Error;

/// Why a single rule entry was dropped during ingestion.
///
/// A dropped entry never fails the surrounding update; it is reported in
/// the diagnostics list and the remaining entries still apply.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    #[error("Rule entry is not an object")]
    InvalidEntry,

    #[error("Rule list is not an array")]
    InvalidRuleList,

    #[error("Rule is missing required field `primaryPattern`")]
    MissingPrimaryPattern,

    #[error("Rule is missing required field `setting`")]
    MissingSetting,
}
