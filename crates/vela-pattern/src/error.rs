//! Pattern error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PatternError {
    #[error("Pattern is empty")]
    Empty,

    #[error("Pattern has no host")]
    MissingHost,

    #[error("Pattern scheme is not valid: {0}")]
    InvalidScheme(String),

    #[error("Pattern port is not valid: {0}")]
    InvalidPort(String),
}
