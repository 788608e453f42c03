//! Failure taxonomy for option dispatch.
//!
//! Every failure the engine models is a malformed invocation, never a system
//! fault. There are exactly four kinds, each carrying the offending token.
//! The `Display` impl renders the one-line diagnostic printed by the
//! [`dispatch`](crate::dispatch) driver.

use std::fmt;

use thiserror::Error;

/// A malformed invocation detected while parsing, checking, or executing.
///
/// # Examples
///
/// ```
/// use optdispatch_core::{DispatchError, ErrorKind};
///
/// let err = DispatchError::InvalidOption("-z".into());
/// assert_eq!(err.kind(), ErrorKind::InvalidOption);
/// assert_eq!(err.token(), "-z");
/// assert_eq!(err.to_string(), "invalid option -- '-z'");
///
/// let err = DispatchError::MissingArgument("-t".into());
/// assert_eq!(err.to_string(), "MissingArgument: -t");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// A `-`-prefixed token that is not in the registry.
    #[error("invalid option -- '{0}'")]
    InvalidOption(String),
    /// An argument is present but semantically wrong.
    #[error("InvalidArgument: {0}")]
    InvalidArgument(String),
    /// Fewer arguments than the option requires. Carries the flag spelling.
    #[error("MissingArgument: {0}")]
    MissingArgument(String),
    /// More arguments than the option allows. Carries the first surplus token.
    #[error("UnexpectedArgument: {0}")]
    UnexpectedArgument(String),
}

impl DispatchError {
    /// Returns the kind of this failure.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidOption(_) => ErrorKind::InvalidOption,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::MissingArgument(_) => ErrorKind::MissingArgument,
            Self::UnexpectedArgument(_) => ErrorKind::UnexpectedArgument,
        }
    }

    /// Returns the offending token carried by this failure.
    pub fn token(&self) -> &str {
        match self {
            Self::InvalidOption(token)
            | Self::InvalidArgument(token)
            | Self::MissingArgument(token)
            | Self::UnexpectedArgument(token) => token,
        }
    }
}

/// Discriminant of a [`DispatchError`], without the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidOption,
    InvalidArgument,
    MissingArgument,
    UnexpectedArgument,
}

impl ErrorKind {
    /// Stable name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InvalidOption => "InvalidOption",
            Self::InvalidArgument => "InvalidArgument",
            Self::MissingArgument => "MissingArgument",
            Self::UnexpectedArgument => "UnexpectedArgument",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised while assembling a [`Parser`](crate::Parser) registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// A registry key that does not begin with `-` can never be matched.
    #[error("invalid flag spelling: {0:?}")]
    InvalidFlag(String),
    /// No default action was supplied.
    #[error("parser requires a default action")]
    MissingDefaultAction,
    /// No blank-input handler was supplied.
    #[error("parser requires a blank-input handler")]
    MissingBlankHandler,
}

/// Convenience alias for results with [`DispatchError`].
pub type Result<T> = std::result::Result<T, DispatchError>;
