//! The list and auto-recode actions.
//!
//! Both walk the target selected by the context and report one line per
//! file. A file that fails is reported `[SKIPPED]` and counted; it never
//! aborts the run. Directory runs end with a summary.

use std::fs;
use std::path::Path;

use optdispatch_core::DispatchError;
use tracing::{debug, info};

use crate::context::RecodeContext;
use crate::encoding::{Newline, TextEncoding, describe_newlines};
use crate::error::{RecodeError, Result};
use crate::files::{FileFilter, collect_files};
use crate::rewrite::atomic_write;

/// What happened to one file during auto recoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Rewritten from `from` into the target encoding.
    Recoded {
        from: TextEncoding,
        newlines: Vec<Newline>,
    },
    /// Already in the target encoding with the requested newlines.
    Unchanged,
    /// Detected encoding is not one of the sources.
    NotSource(TextEncoding),
}

/// Prints the encoding of every selected file.
pub fn list(ctx: &mut RecodeContext) -> optdispatch_core::Result<()> {
    let filter = file_filter(ctx)?;
    let single = ctx.path.is_file();

    for file in collect_files(&ctx.path, ctx.recursive, &filter) {
        match ctx.source_encoding(&file) {
            Ok(encoding) => {
                println!("{encoding} - {}", file.display());
                ctx.tally.record(encoding.name());
            }
            Err(err) => {
                debug!(path = %file.display(), %err, "detection failed");
                println!("[SKIPPED] {}", file.display());
                ctx.tally.skip();
            }
        }
    }

    if !single {
        println!();
        print!("{}", ctx.tally.render());
    }
    Ok(())
}

/// Converts every selected file whose encoding is in `sources` into the
/// target encoding.
pub fn auto(ctx: &mut RecodeContext, sources: &[TextEncoding]) -> optdispatch_core::Result<()> {
    let filter = file_filter(ctx)?;
    let single = ctx.path.is_file();
    let to = ctx.to_encoding;
    info!(target_encoding = %to, sources = ?sources, path = %ctx.path.display(), "auto recode");

    for file in collect_files(&ctx.path, ctx.recursive, &filter) {
        match recode_file(ctx, &file, sources) {
            Ok(FileOutcome::Recoded { from, newlines }) => {
                if from == to {
                    let target = ctx.newline.map_or("NONE", Newline::as_str);
                    println!("[{} -> {target}] - {}", describe_newlines(&newlines), file.display());
                } else {
                    println!("{from} -> {to} - {}", file.display());
                }
                ctx.tally.record(from.name());
            }
            Ok(FileOutcome::Unchanged) => {
                println!("[SKIPPED] {}", file.display());
                ctx.tally.skip();
            }
            Ok(FileOutcome::NotSource(encoding)) => {
                if single {
                    println!("encoding \"{encoding}\" is not in from encodings.");
                    println!("nothing to do.");
                }
            }
            Err(err) => {
                debug!(path = %file.display(), %err, "recode failed");
                println!("[SKIPPED] {} ({err})", file.display());
                ctx.tally.skip();
            }
        }
    }

    if !single {
        println!();
        println!("Recode to: {to}");
        print!("{}", ctx.tally.render());
    }
    Ok(())
}

/// Rewrites `file` into the context's target encoding and newline style.
///
/// A file already in the target encoding is rewritten only when its
/// newlines differ from the requested ones. Otherwise the file must be in
/// one of `sources`.
pub fn recode_file(
    ctx: &RecodeContext,
    file: &Path,
    sources: &[TextEncoding],
) -> Result<FileOutcome> {
    let from = ctx.source_encoding(file)?;
    let to = ctx.to_encoding;
    if from != to && !sources.contains(&from) {
        return Ok(FileOutcome::NotSource(from));
    }

    let text = from.decode(&fs::read(file)?)?;
    let newlines = Newline::detect(&text);
    let reformat = ctx
        .newline
        .filter(|target| newlines.iter().any(|found| found != target));
    if from == to && reformat.is_none() {
        return Ok(FileOutcome::Unchanged);
    }

    let text = match reformat {
        Some(target) => target.apply(&text),
        None => text,
    };
    atomic_write(file, &to.encode(&text)?)?;
    Ok(FileOutcome::Recoded { from, newlines })
}

fn file_filter(ctx: &RecodeContext) -> optdispatch_core::Result<FileFilter> {
    ctx.filter().map_err(|err| match err {
        RecodeError::Pattern { pattern, .. } => DispatchError::InvalidArgument(pattern),
        other => DispatchError::InvalidArgument(other.to_string()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx_for(path: &Path) -> RecodeContext {
        RecodeContext {
            path: path.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_recode_gbk_to_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zh.txt");
        let gbk = TextEncoding::for_label("gbk").unwrap();
        fs::write(&path, gbk.encode("中文内容").unwrap()).unwrap();

        let mut ctx = ctx_for(&path);
        ctx.from_encoding = Some(gbk);
        let outcome = recode_file(&ctx, &path, &[gbk]).unwrap();

        assert!(matches!(outcome, FileOutcome::Recoded { from, .. } if from == gbk));
        assert_eq!(fs::read_to_string(&path).unwrap(), "中文内容");
    }

    #[test]
    fn test_target_encoding_file_is_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.txt");
        fs::write(&path, "already utf-8\n").unwrap();

        let ctx = ctx_for(&path);
        assert_eq!(recode_file(&ctx, &path, &[]).unwrap(), FileOutcome::Unchanged);
    }

    #[test]
    fn test_newline_only_reformat() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        fs::write(&path, "a\r\nb\r\n").unwrap();

        let mut ctx = ctx_for(&path);
        ctx.newline = Some(Newline::Lf);
        let outcome = recode_file(&ctx, &path, &[]).unwrap();

        assert_eq!(
            outcome,
            FileOutcome::Recoded {
                from: TextEncoding::utf8(),
                newlines: vec![Newline::CrLf],
            }
        );
        assert_eq!(fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_non_source_file_is_left_alone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sig.txt");
        fs::write(&path, b"\xEF\xBB\xBFbom").unwrap();

        let gbk = TextEncoding::for_label("gbk").unwrap();
        let ctx = ctx_for(&path);
        assert_eq!(
            recode_file(&ctx, &path, &[gbk]).unwrap(),
            FileOutcome::NotSource(TextEncoding::Utf8Sig)
        );
        assert_eq!(fs::read(&path).unwrap(), b"\xEF\xBB\xBFbom");
    }

    #[test]
    fn test_auto_over_directory_counts_results() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"\xEF\xBB\xBFone").unwrap();
        fs::write(dir.path().join("b.txt"), "two").unwrap();
        fs::write(dir.path().join("c.txt"), b"\xEF\xBB\xBFthree").unwrap();

        let mut ctx = ctx_for(dir.path());
        let sources = ctx.default_sources.clone();
        auto(&mut ctx, &sources).unwrap();

        assert_eq!(ctx.tally.count("UTF-8-SIG"), 2);
        assert_eq!(ctx.tally.skipped(), 1);
        assert_eq!(fs::read(dir.path().join("a.txt")).unwrap(), b"one");
        assert_eq!(fs::read(dir.path().join("c.txt")).unwrap(), b"three");
    }

    #[test]
    fn test_list_records_each_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), "plain").unwrap();
        fs::write(dir.path().join("b.txt"), b"\xEF\xBB\xBFsig").unwrap();

        let mut ctx = ctx_for(dir.path());
        list(&mut ctx).unwrap();

        assert_eq!(ctx.tally.count("UTF-8"), 1);
        assert_eq!(ctx.tally.count("UTF-8-SIG"), 1);
        assert_eq!(ctx.tally.skipped(), 0);
    }

    #[test]
    fn test_list_honors_include_patterns() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("keep.txt"), "k").unwrap();
        fs::write(dir.path().join("drop.log"), "d").unwrap();

        let mut ctx = ctx_for(dir.path());
        ctx.include.push("*.txt".into());
        list(&mut ctx).unwrap();
        assert_eq!(ctx.tally.count("UTF-8"), 1);
    }

    #[test]
    fn test_bad_pattern_becomes_invalid_argument() {
        let mut ctx = ctx_for(Path::new("."));
        ctx.exclude.push("[".into());
        assert_eq!(
            list(&mut ctx).unwrap_err(),
            DispatchError::InvalidArgument("[".into())
        );
    }
}
