//! Target file selection.
//!
//! A target is either a single file or a directory. Directories are listed
//! one level deep, or walked recursively when asked. Include and exclude
//! glob patterns match file names; a name matching both is excluded.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use tracing::warn;
use walkdir::WalkDir;

use crate::error::{RecodeError, Result};

/// File-name filter built from include and exclude patterns.
///
/// # Examples
///
/// ```
/// use optdispatch_recode::FileFilter;
///
/// let filter = FileFilter::new(&["*.txt".to_string()], &["secret*".to_string()]).unwrap();
/// assert!(filter.matches("notes.txt".as_ref()));
/// assert!(!filter.matches("secret.txt".as_ref()));
/// assert!(!filter.matches("main.rs".as_ref()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct FileFilter {
    include: Option<GlobSet>,
    exclude: Option<GlobSet>,
}

impl FileFilter {
    /// Compiles the patterns. Empty pattern lists match everything.
    ///
    /// # Errors
    ///
    /// Returns [`RecodeError::Pattern`] for the first pattern that does not
    /// compile.
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self> {
        Ok(Self {
            include: build_globset(include)?,
            exclude: build_globset(exclude)?,
        })
    }

    pub fn matches(&self, name: &OsStr) -> bool {
        if self.exclude.as_ref().is_some_and(|set| set.is_match(name)) {
            return false;
        }
        self.include.as_ref().is_none_or(|set| set.is_match(name))
    }
}

/// Compiles one pattern, for argument checking.
pub fn compile_pattern(pattern: &str) -> Result<Glob> {
    Glob::new(pattern).map_err(|source| RecodeError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>> {
    let mut builder = GlobSetBuilder::new();
    let mut added = false;
    for pat in patterns {
        if pat.trim().is_empty() {
            continue;
        }
        builder.add(compile_pattern(pat)?);
        added = true;
    }
    if !added {
        return Ok(None);
    }
    builder
        .build()
        .map(Some)
        .map_err(|source| RecodeError::Pattern {
            pattern: patterns.join(" "),
            source,
        })
}

/// Collects the files under `target` that pass `filter`, in name order.
///
/// Unreadable directory entries are logged and skipped.
pub fn collect_files(target: &Path, recursive: bool, filter: &FileFilter) -> Vec<PathBuf> {
    if target.is_file() {
        let keep = target.file_name().is_some_and(|name| filter.matches(name));
        return if keep { vec![target.to_path_buf()] } else { Vec::new() };
    }

    if recursive {
        return WalkDir::new(target)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(err) => {
                    warn!(%err, "skipping unreadable entry");
                    None
                }
            })
            .filter(|entry| entry.file_type().is_file() && filter.matches(entry.file_name()))
            .map(|entry| entry.into_path())
            .collect();
    }

    let entries = match fs::read_dir(target) {
        Ok(entries) => entries,
        Err(err) => {
            warn!(path = %target.display(), %err, "cannot list directory");
            return Vec::new();
        }
    };
    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_file())
        .filter(|path| path.file_name().is_some_and(|name| filter.matches(name)))
        .collect();
    files.sort();
    files
}
