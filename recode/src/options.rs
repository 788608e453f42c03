//! The recoder's option registry.
//!
//! | Flag  | Priority | Arguments | Effect |
//! |-------|----------|-----------|--------|
//! | `-`   | 0  | path?     | target file or directory |
//! | `-h`  | -1 | none      | help |
//! | `-c`  | 0  | file      | load a YAML configuration |
//! | `-f`  | 0  | encoding  | force the source encoding |
//! | `-t`  | 0  | encoding  | target encoding |
//! | `-r`  | 0  | none      | recurse into directories |
//! | `-ds` | 0  | bytes     | detection sample size |
//! | `-n`  | 0  | CR/LF/CRLF| target newline |
//! | `-i`  | 0  | pattern+  | include file names |
//! | `-x`  | 0  | pattern+  | exclude file names |
//! | `-l`  | 1  | none      | list encodings |
//! | `-C`  | 1  | file      | save the effective settings as YAML |
//! | `-a`  | 2  | encoding* | auto recode from the given (or default) sources |
//!
//! Without an action the forced source encoding is recoded, which requires
//! `-f`. A bare invocation prints the banner.

use std::path::{Path, PathBuf};

use optdispatch_core::{
    DispatchError, FnOption, Parser, RegistryError, Result, expect_at_least, expect_at_most,
    expect_exactly,
};
use tracing::warn;

use crate::actions;
use crate::config::{RecodeConfig, resolve_label, resolve_target};
use crate::context::RecodeContext;
use crate::encoding::{Newline, TextEncoding};
use crate::files::compile_pattern;

pub const HELP: &str = "\
Help for recode

A script tool for text file encoding.

Usage: recode [PATH] [OPTIONS]

Options:
    -h              show help.
    -c FILE         load settings from a YAML file.
    -f ENCODING     force source encoding.
    -t ENCODING     set target encoding (default: UTF-8).
    -r              recursive mode.
    -ds SIZE        set detection size (default: 1024).
    -n NEWLINE      rewrite newlines as CR, LF or CRLF.
    -i PATTERN...   only include matching file names.
    -x PATTERN...   exclude matching file names.
    -l              list encoding of a file or files in a folder.
    -C FILE         save the effective settings to a YAML file.
    -a [ENCODING...] auto mode: recode files in the given encodings
                    (default: GB2312 UTF-8-SIG).";

pub fn banner() -> String {
    format!(
        "recode v{}\nFor help, use option \"-h\".",
        env!("CARGO_PKG_VERSION")
    )
}

/// Builds the recoder's parser.
pub fn build_parser() -> std::result::Result<Parser<RecodeContext>, RegistryError> {
    Parser::builder()
        .leading(
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                if let Some(path) = args.first() {
                    ctx.path = PathBuf::from(path);
                }
                Ok(())
            })
            .with_check(check_target_path),
        )
        .option(
            "-h",
            FnOption::new(-1, |_: &mut RecodeContext, _: &[String]| {
                println!("{HELP}");
                Ok(())
            }),
        )
        .option(
            "-c",
            FnOption::new(0, load_config).with_check(|args| expect_exactly("-c", 1, args)),
        )
        .option(
            "-f",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.from_encoding = Some(label(&args[0])?);
                Ok(())
            })
            .with_check(|args| {
                expect_exactly("-f", 1, args)?;
                label(&args[0]).map(drop)
            }),
        )
        .option(
            "-t",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.to_encoding = target(&args[0])?;
                Ok(())
            })
            .with_check(|args| {
                expect_exactly("-t", 1, args)?;
                target(&args[0]).map(drop)
            }),
        )
        .option(
            "-r",
            FnOption::new(0, |ctx: &mut RecodeContext, _: &[String]| {
                ctx.recursive = true;
                Ok(())
            }),
        )
        .option(
            "-ds",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.detect_size = sample_size(&args[0])?;
                Ok(())
            })
            .with_check(|args| {
                expect_exactly("-ds", 1, args)?;
                sample_size(&args[0]).map(drop)
            }),
        )
        .option(
            "-n",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.newline = Some(newline(&args[0])?);
                Ok(())
            })
            .with_check(|args| {
                expect_exactly("-n", 1, args)?;
                newline(&args[0]).map(drop)
            }),
        )
        .option(
            "-i",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.include.extend_from_slice(args);
                Ok(())
            })
            .with_check(|args| check_patterns("-i", args)),
        )
        .option(
            "-x",
            FnOption::new(0, |ctx: &mut RecodeContext, args: &[String]| {
                ctx.exclude.extend_from_slice(args);
                Ok(())
            })
            .with_check(|args| check_patterns("-x", args)),
        )
        .option(
            "-l",
            FnOption::new(1, |ctx: &mut RecodeContext, _: &[String]| actions::list(ctx)),
        )
        .option(
            "-C",
            FnOption::new(1, save_config).with_check(|args| expect_exactly("-C", 1, args)),
        )
        .option(
            "-a",
            FnOption::new(2, |ctx: &mut RecodeContext, args: &[String]| {
                let sources = if args.is_empty() {
                    ctx.default_sources.clone()
                } else {
                    args.iter().map(|a| label(a)).collect::<Result<Vec<_>>>()?
                };
                actions::auto(ctx, &sources)
            })
            .with_check(|args| args.iter().try_for_each(|a| label(a).map(drop))),
        )
        .default_action(FnOption::new(1, |ctx: &mut RecodeContext, _: &[String]| {
            match ctx.from_encoding {
                Some(from) => actions::auto(ctx, &[from]),
                None => Err(DispatchError::MissingArgument("-f [encoding]".into())),
            }
        }))
        .on_blank(|_: &mut RecodeContext| println!("{}", banner()))
        .build()
}

fn check_target_path(args: &[String]) -> Result<()> {
    expect_at_most(1, args)?;
    match args.first() {
        Some(path) if !Path::new(path).exists() => {
            Err(DispatchError::InvalidArgument(path.clone()))
        }
        _ => Ok(()),
    }
}

fn check_patterns(flag: &str, args: &[String]) -> Result<()> {
    expect_at_least(flag, 1, args)?;
    for pattern in args {
        compile_pattern(pattern).map_err(|_| DispatchError::InvalidArgument(pattern.clone()))?;
    }
    Ok(())
}

fn load_config(ctx: &mut RecodeContext, args: &[String]) -> Result<()> {
    let path = &args[0];
    RecodeConfig::load(path)
        .and_then(|config| config.apply(ctx))
        .map_err(|err| {
            warn!(path = %path, %err, "cannot load configuration");
            DispatchError::InvalidArgument(path.clone())
        })
}

fn save_config(ctx: &mut RecodeContext, args: &[String]) -> Result<()> {
    let path = &args[0];
    RecodeConfig::from_context(ctx).save(path).map_err(|err| {
        warn!(path = %path, %err, "cannot save configuration");
        DispatchError::InvalidArgument(path.clone())
    })?;
    println!("Settings saved to: {path}");
    Ok(())
}

fn label(value: &str) -> Result<TextEncoding> {
    resolve_label(value).map_err(|_| DispatchError::InvalidArgument(value.to_string()))
}

fn target(value: &str) -> Result<TextEncoding> {
    resolve_target(value).map_err(|_| DispatchError::InvalidArgument(value.to_string()))
}

fn sample_size(value: &str) -> Result<usize> {
    match value.parse::<usize>() {
        Ok(size) if size > 0 => Ok(size),
        _ => Err(DispatchError::InvalidArgument(value.to_string())),
    }
}

fn newline(value: &str) -> Result<Newline> {
    value
        .parse()
        .map_err(|_| DispatchError::InvalidArgument(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(tokens: &[&str]) -> (Result<()>, RecodeContext) {
        let mut parser = build_parser().unwrap();
        let mut ctx = RecodeContext::default();
        let result = parser.run(&mut ctx, tokens.iter().copied());
        (result, ctx)
    }

    #[test]
    fn test_registry_builds() {
        let parser = build_parser().unwrap();
        for flag in [
            "-", "-h", "-c", "-f", "-t", "-r", "-ds", "-n", "-i", "-x", "-l", "-C", "-a",
        ] {
            assert!(parser.is_registered(flag), "{flag} missing");
        }
    }

    #[test]
    fn test_sample_size_must_be_integer() {
        let (result, _) = run(&["-ds", "lots"]);
        assert_eq!(result, Err(DispatchError::InvalidArgument("lots".into())));
        let (result, _) = run(&["-ds"]);
        assert_eq!(result, Err(DispatchError::MissingArgument("-ds".into())));
    }

    #[test]
    fn test_unknown_encoding_rejected_before_execution() {
        let (result, ctx) = run(&["-t", "klingon", "-r"]);
        assert_eq!(result, Err(DispatchError::InvalidArgument("klingon".into())));
        assert!(!ctx.recursive);
    }

    #[test]
    fn test_read_only_target_rejected() {
        let (result, _) = run(&["-t", "utf-16le"]);
        assert_eq!(result, Err(DispatchError::InvalidArgument("utf-16le".into())));
    }

    #[test]
    fn test_missing_path_rejected() {
        let (result, _) = run(&["/definitely/not/here", "-l"]);
        assert_eq!(
            result,
            Err(DispatchError::InvalidArgument("/definitely/not/here".into()))
        );
    }

    #[test]
    fn test_two_paths_rejected() {
        let (result, _) = run(&[".", "..", "-l"]);
        assert_eq!(result, Err(DispatchError::UnexpectedArgument("..".into())));
    }

    #[test]
    fn test_default_action_requires_forced_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let (result, _) = run(&[path, "-r"]);
        assert_eq!(
            result,
            Err(DispatchError::MissingArgument("-f [encoding]".into()))
        );
    }

    #[test]
    fn test_environment_options_configure_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_str().unwrap();
        let (result, ctx) = run(&[
            path, "-h", "-t", "gbk", "-ds", "64", "-n", "crlf", "-i", "*.txt", "-x", "a*", "b*",
        ]);
        // help is the first terminal option, so nothing configures
        assert!(result.is_ok());
        assert_eq!(ctx.detect_size, 1024);

        let (result, ctx) = run(&[
            path, "-t", "gbk", "-ds", "64", "-n", "crlf", "-i", "*.txt", "-x", "a*", "b*", "-l",
        ]);
        assert!(result.is_ok());
        assert_eq!(ctx.path, PathBuf::from(path));
        assert_eq!(ctx.to_encoding.name(), "GBK");
        assert_eq!(ctx.detect_size, 64);
        assert_eq!(ctx.newline, Some(Newline::CrLf));
        assert_eq!(ctx.include, vec!["*.txt"]);
        assert_eq!(ctx.exclude, vec!["a*", "b*"]);
    }

    #[test]
    fn test_pattern_options_need_an_argument() {
        let (result, _) = run(&["-x"]);
        assert_eq!(result, Err(DispatchError::MissingArgument("-x".into())));
        let (result, _) = run(&["-i", "ok", "bad["]);
        assert_eq!(result, Err(DispatchError::InvalidArgument("bad[".into())));
    }

    #[test]
    fn test_config_option_loads_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("recode.yml");
        std::fs::write(&config, "to: big5\ndetect_size: 256\n").unwrap();
        let data = dir.path().join("data");
        std::fs::create_dir(&data).unwrap();

        let (result, ctx) = run(&[
            data.to_str().unwrap(),
            "-c",
            config.to_str().unwrap(),
            "-l",
        ]);
        assert!(result.is_ok());
        assert_eq!(ctx.to_encoding.name(), "BIG5");
        assert_eq!(ctx.detect_size, 256);
    }

    #[test]
    fn test_bad_config_is_invalid_argument() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("broken.yml");
        std::fs::write(&config, "to: klingon\n").unwrap();
        let token = config.to_str().unwrap();

        let (result, _) = run(&["-c", token, "-l"]);
        assert_eq!(result, Err(DispatchError::InvalidArgument(token.into())));
    }

    #[test]
    fn test_saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let saved = dir.path().join("saved.yml");
        let token = saved.to_str().unwrap();

        let (result, _) = run(&["-t", "gbk", "-ds", "512", "-r", "-C", token]);
        assert!(result.is_ok());

        let config = RecodeConfig::load(&saved).unwrap();
        assert_eq!(config.to.as_deref(), Some("GBK"));
        assert_eq!(config.detect_size, Some(512));
        assert_eq!(config.recursive, Some(true));
    }

    #[test]
    fn test_config_with_zero_detect_size_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("zero.yml");
        std::fs::write(&config, "detect_size: 0\n").unwrap();
        let token = config.to_str().unwrap();

        let (result, ctx) = run(&["-c", token, "-l"]);
        assert_eq!(result, Err(DispatchError::InvalidArgument(token.into())));
        assert_eq!(ctx.detect_size, 1024);
    }
}
