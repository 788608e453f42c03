//! Priority-ordered command-line option dispatch.
//!
//! This crate turns a flat token sequence into at most one executed action
//! plus any number of environment options:
//!
//! - [`CliOption`]: the contract of one flag (a priority, a checker for its
//!   captured arguments and an executor run against a caller-owned context).
//! - [`OptionBlock`]: one flag paired with the tokens that followed it.
//! - [`Parser`]: the registry plus the parse → check → execute pipeline.
//! - [`dispatch`]: the driver that runs a cycle and prints diagnostics.
//!
//! Priorities drive execution. Blocks are stable-sorted by ascending
//! priority; zero-priority (environment) options run and the loop moves on,
//! while the first nonzero-priority option to run ends the cycle. When no
//! action appears, the default action runs with no arguments. An input with
//! nothing in it at all calls the blank-input handler instead.
//!
//! # Example
//!
//! ```
//! use optdispatch_core::*;
//!
//! #[derive(Default)]
//! struct Settings {
//!     target: String,
//!     log: Vec<String>,
//! }
//!
//! let mut parser = Parser::builder()
//!     .option(
//!         "-t",
//!         FnOption::new(0, |s: &mut Settings, args: &[String]| {
//!             s.target = args[0].clone();
//!             Ok(())
//!         })
//!         .with_check(|args| expect_exactly("-t", 1, args)),
//!     )
//!     .option(
//!         "-l",
//!         FnOption::new(1, |s: &mut Settings, _: &[String]| {
//!             s.log.push(format!("list {}", s.target));
//!             Ok(())
//!         }),
//!     )
//!     .default_action(FnOption::new(1, |s: &mut Settings, _: &[String]| {
//!         s.log.push(format!("convert to {}", s.target));
//!         Ok(())
//!     }))
//!     .on_blank(|s: &mut Settings| s.log.push("usage".into()))
//!     .build()
//!     .unwrap();
//!
//! let mut settings = Settings::default();
//! assert!(dispatch(&mut parser, &mut settings, ["-l", "-t", "utf-8"]).is_completed());
//! parser.clear();
//! assert!(dispatch(&mut parser, &mut settings, ["-t", "gbk"]).is_completed());
//! parser.clear();
//!
//! assert_eq!(settings.log, vec!["list utf-8", "convert to gbk"]);
//! ```

mod block;
mod driver;
mod error;
mod option;
mod parser;
mod validate;

pub use block::OptionBlock;
pub use driver::{Outcome, dispatch, dispatch_to, render_diagnostic};
pub use error::{DispatchError, ErrorKind, RegistryError, Result};
pub use option::{
    CliOption, FnOption, OptionKind, expect_at_least, expect_at_most, expect_exactly,
    expect_no_args,
};
pub use parser::{LEADING_KEY, OptionMap, Parser, ParserBuilder, ParserState};
pub use validate::validate_registry;
