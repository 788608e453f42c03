//! Shared recoder state.
//!
//! Environment options write their settings here; the list and auto actions
//! read them. The context lives outside the parser and survives across
//! dispatch cycles.

use std::collections::BTreeMap;
use std::fmt;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::detect::{EncodingDetector, SniffingDetector, detect_file};
use crate::encoding::{Newline, TextEncoding};
use crate::error::Result;
use crate::files::FileFilter;

/// Default number of bytes sampled for detection.
pub const DEFAULT_DETECT_SIZE: usize = 1024;

/// Recoder settings and per-run results.
pub struct RecodeContext {
    /// File or directory to operate on.
    pub path: PathBuf,
    pub detect_size: usize,
    /// Source encoding that bypasses detection.
    pub from_encoding: Option<TextEncoding>,
    pub to_encoding: TextEncoding,
    pub recursive: bool,
    /// Newline style to write; `None` keeps the file's own.
    pub newline: Option<Newline>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
    /// Encodings the auto mode converts when given none.
    pub default_sources: Vec<TextEncoding>,
    pub tally: Tally,
    pub(crate) detector: Box<dyn EncodingDetector>,
}

impl RecodeContext {
    /// Replaces the detector.
    pub fn with_detector(mut self, detector: impl EncodingDetector + 'static) -> Self {
        self.detector = Box::new(detector);
        self
    }

    /// Source encoding of `file`: the forced one, or the detected one.
    pub fn source_encoding(&self, file: &Path) -> Result<TextEncoding> {
        match self.from_encoding {
            Some(forced) => Ok(forced),
            None => detect_file(self.detector.as_ref(), file, self.detect_size),
        }
    }

    pub fn filter(&self) -> Result<FileFilter> {
        FileFilter::new(&self.include, &self.exclude)
    }
}

impl Default for RecodeContext {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            detect_size: DEFAULT_DETECT_SIZE,
            from_encoding: None,
            to_encoding: TextEncoding::utf8(),
            recursive: false,
            newline: None,
            include: Vec::new(),
            exclude: Vec::new(),
            default_sources: default_sources(),
            tally: Tally::default(),
            detector: Box::new(SniffingDetector),
        }
    }
}

impl fmt::Debug for RecodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecodeContext")
            .field("path", &self.path)
            .field("detect_size", &self.detect_size)
            .field("from_encoding", &self.from_encoding)
            .field("to_encoding", &self.to_encoding)
            .field("recursive", &self.recursive)
            .field("newline", &self.newline)
            .field("include", &self.include)
            .field("exclude", &self.exclude)
            .field("default_sources", &self.default_sources)
            .field("tally", &self.tally)
            .finish_non_exhaustive()
    }
}

/// `GB2312` (resolved to `GBK`) and `UTF-8-SIG`.
pub fn default_sources() -> Vec<TextEncoding> {
    ["GB2312", "UTF-8-SIG"]
        .into_iter()
        .filter_map(TextEncoding::for_label)
        .collect()
}

/// Per-run result counts.
///
/// # Examples
///
/// ```
/// use optdispatch_recode::Tally;
///
/// let mut tally = Tally::default();
/// tally.record("GBK");
/// tally.record("GBK");
/// tally.skip();
/// assert_eq!(tally.count("GBK"), 2);
/// assert_eq!(tally.render(), format!("Total:\n{:>16} = 1\n{:>16} = 2\n", "SKIPPED", "GBK"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tally {
    skipped: usize,
    counts: BTreeMap<String, usize>,
}

impl Tally {
    pub fn record(&mut self, key: impl Into<String>) {
        *self.counts.entry(key.into()).or_insert(0) += 1;
    }

    pub fn skip(&mut self) {
        self.skipped += 1;
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn count(&self, key: &str) -> usize {
        self.counts.get(key).copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.skipped == 0 && self.counts.is_empty()
    }

    /// `Total:` then one right-aligned line per key, `SKIPPED` first when
    /// non-zero.
    pub fn render(&self) -> String {
        let mut out = String::from("Total:\n");
        if self.skipped != 0 {
            let _ = writeln!(out, "{:>16} = {}", "SKIPPED", self.skipped);
        }
        for (key, count) in &self.counts {
            let _ = writeln!(out, "{key:>16} = {count}");
        }
        out
    }
}
