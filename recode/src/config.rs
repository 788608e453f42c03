//! YAML configuration for the recoder.
//!
//! A configuration file presets the same settings the environment options
//! control. Every field is optional; unset fields leave the context alone.
//!
//! # Example YAML
//!
//! ```yaml
//! to: UTF-8
//! sources: [GB2312, BIG5, UTF-8-SIG]
//! detect_size: 4096
//! recursive: true
//! newline: LF
//! include: ["*.txt", "*.md"]
//! exclude: ["*.min.*"]
//! ```

use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::context::RecodeContext;
use crate::encoding::{Newline, TextEncoding};
use crate::error::{RecodeError, Result};

/// Recoder settings loaded from YAML.
///
/// # Examples
///
/// ```
/// use optdispatch_recode::{RecodeConfig, RecodeContext};
///
/// let config: RecodeConfig = serde_yaml::from_str("to: gbk\nrecursive: true\n").unwrap();
/// let mut ctx = RecodeContext::default();
/// config.apply(&mut ctx).unwrap();
/// assert_eq!(ctx.to_encoding.name(), "GBK");
/// assert!(ctx.recursive);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecodeConfig {
    /// Target encoding label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// Forced source encoding label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Source encodings the auto mode converts when given none.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
    /// Bytes sampled for detection.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detect_size: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recursive: Option<bool>,
    /// `CR`, `LF` or `CRLF`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub newline: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

impl RecodeConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](RecodeError::IoError) if the file cannot be read,
    /// or [`YamlError`](RecodeError::YamlError) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Captures the settings currently held by `ctx`.
    pub fn from_context(ctx: &RecodeContext) -> Self {
        Self {
            to: Some(ctx.to_encoding.name()),
            from: ctx.from_encoding.map(|e| e.name()),
            sources: ctx.default_sources.iter().map(|e| e.name()).collect(),
            detect_size: Some(ctx.detect_size),
            recursive: Some(ctx.recursive),
            newline: ctx.newline.map(|n| n.as_str().to_string()),
            include: ctx.include.clone(),
            exclude: ctx.exclude.clone(),
        }
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Copies every set field into `ctx`.
    ///
    /// Nothing is applied unless every field is valid.
    ///
    /// # Errors
    ///
    /// Returns [`UnknownEncoding`](RecodeError::UnknownEncoding) or
    /// [`Unencodable`](RecodeError::Unencodable) for bad labels,
    /// [`InvalidNewline`](RecodeError::InvalidNewline) for a bad newline,
    /// [`InvalidDetectSize`](RecodeError::InvalidDetectSize) for a zero
    /// sample size, and [`Pattern`](RecodeError::Pattern) for a bad glob.
    pub fn apply(&self, ctx: &mut RecodeContext) -> Result<()> {
        let to = self.to.as_deref().map(resolve_target).transpose()?;
        let from = self.from.as_deref().map(resolve_label).transpose()?;
        let sources = self
            .sources
            .iter()
            .map(|label| resolve_label(label))
            .collect::<Result<Vec<_>>>()?;
        let newline = self
            .newline
            .as_deref()
            .map(str::parse::<Newline>)
            .transpose()?;
        if self.detect_size == Some(0) {
            return Err(RecodeError::InvalidDetectSize(0));
        }
        for pattern in self.include.iter().chain(&self.exclude) {
            crate::files::compile_pattern(pattern)?;
        }

        if let Some(to) = to {
            ctx.to_encoding = to;
        }
        if from.is_some() {
            ctx.from_encoding = from;
        }
        if !sources.is_empty() {
            ctx.default_sources = sources;
        }
        if let Some(size) = self.detect_size {
            ctx.detect_size = size;
        }
        if let Some(recursive) = self.recursive {
            ctx.recursive = recursive;
        }
        if newline.is_some() {
            ctx.newline = newline;
        }
        ctx.include.extend(self.include.iter().cloned());
        ctx.exclude.extend(self.exclude.iter().cloned());
        Ok(())
    }
}

pub(crate) fn resolve_label(label: &str) -> Result<TextEncoding> {
    TextEncoding::for_label(label).ok_or_else(|| RecodeError::UnknownEncoding(label.to_string()))
}

pub(crate) fn resolve_target(label: &str) -> Result<TextEncoding> {
    let encoding = resolve_label(label)?;
    if !encoding.can_encode() {
        return Err(RecodeError::Unencodable(encoding.name()));
    }
    Ok(encoding)
}
