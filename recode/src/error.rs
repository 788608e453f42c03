//! Error types for recoding operations.
//!
//! These cover the collaborators invoked by the recoder's options: file I/O,
//! configuration parsing, encoding lookup and conversion, and the atomic
//! rewrite. None of them reach the dispatch driver directly; options report
//! per-file failures and map setup failures onto dispatch errors.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while recoding files.
#[derive(Debug, Error)]
pub enum RecodeError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Label not known to the encoding registry.
    #[error("unknown encoding: {0}")]
    UnknownEncoding(String),

    /// Encoding that can be read but not written (e.g. UTF-16).
    #[error("cannot encode to {0}")]
    Unencodable(String),

    /// No detector verdict for a file.
    #[error("cannot detect encoding of {}", .0.display())]
    Undetectable(PathBuf),

    /// Bytes are not valid in the source encoding.
    #[error("content is not valid {0}")]
    Malformed(String),

    /// Text contains characters the target encoding cannot represent.
    #[error("content cannot be represented in {0}")]
    Unmappable(String),

    /// Newline name other than CR, LF or CRLF.
    #[error("invalid newline: {0}")]
    InvalidNewline(String),

    /// Detection sample size of zero.
    #[error("invalid detection size: {0}")]
    InvalidDetectSize(usize),

    /// Glob pattern that does not compile.
    #[error("invalid pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// Temp file could not replace the original.
    #[error("atomic rewrite failed: {0}")]
    Persist(#[from] tempfile::PersistError),
}

/// Convenience alias for results with [`RecodeError`].
pub type Result<T> = std::result::Result<T, RecodeError>;
