//! Text file encoding recoder built on [`optdispatch_core`].
//!
//! The recoder is an ordinary client of the dispatch engine. Environment
//! options (`-t`, `-r`, `-n`, ...) write into a [`RecodeContext`]; the list
//! (`-l`) and auto (`-a`) actions, or the default forced-source action,
//! read it and walk the selected files.
//!
//! ```no_run
//! use optdispatch_core::dispatch;
//! use optdispatch_recode::{RecodeContext, build_parser};
//!
//! let mut parser = build_parser().unwrap();
//! let mut ctx = RecodeContext::default();
//! dispatch(&mut parser, &mut ctx, ["docs", "-r", "-t", "utf-8", "-a", "gbk"]);
//! ```

mod actions;
mod config;
mod context;
mod detect;
mod encoding;
mod error;
mod files;
mod options;
mod rewrite;

pub use actions::{FileOutcome, auto, list, recode_file};
pub use config::RecodeConfig;
pub use context::{DEFAULT_DETECT_SIZE, RecodeContext, Tally, default_sources};
pub use detect::{EncodingDetector, SniffingDetector, detect_file};
pub use encoding::{Newline, TextEncoding, UTF8_SIG, describe_newlines};
pub use error::{RecodeError, Result};
pub use files::{FileFilter, collect_files, compile_pattern};
pub use options::{HELP, banner, build_parser};
pub use rewrite::atomic_write;
