//! Dispatch driver: runs a full cycle and renders failures.
//!
//! The driver is the single boundary where the four [`DispatchError`] kinds
//! become user-visible text. It never lets one of them escape as an error;
//! it hands the rendered failure back as [`Outcome::Rejected`] so binaries
//! can pick an exit status.

use std::io::{self, Write};

use tracing::{debug, warn};

use crate::error::{DispatchError, ErrorKind};
use crate::parser::Parser;

/// Result of one dispatched invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The cycle executed.
    Completed,
    /// The cycle failed; its diagnostic has already been written.
    Rejected(DispatchError),
}

impl Outcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

/// Renders the one-line diagnostic for `err`.
///
/// # Examples
///
/// ```
/// use optdispatch_core::{DispatchError, render_diagnostic};
///
/// assert_eq!(
///     render_diagnostic(&DispatchError::InvalidOption("-z".into())),
///     "invalid option -- '-z'"
/// );
/// assert_eq!(
///     render_diagnostic(&DispatchError::InvalidArgument("abc".into())),
///     "InvalidArgument: abc"
/// );
/// ```
pub fn render_diagnostic(err: &DispatchError) -> String {
    match err.kind() {
        ErrorKind::InvalidOption => format!("invalid option -- '{}'", err.token()),
        kind @ (ErrorKind::InvalidArgument
        | ErrorKind::MissingArgument
        | ErrorKind::UnexpectedArgument) => format!("{kind}: {}", err.token()),
    }
}

/// Runs `tokens` through `parser`, printing any diagnostic to stdout.
///
/// The parser is not cleared; callers clear it after every cycle.
pub fn dispatch<C, I, S>(parser: &mut Parser<C>, ctx: &mut C, tokens: I) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let stdout = io::stdout();
    let mut out = stdout.lock();
    dispatch_to(parser, ctx, tokens, &mut out)
}

/// Runs `tokens` through `parser`, writing any diagnostic to `out`.
///
/// A diagnostic that cannot be written is logged; the invocation is still
/// [`Outcome::Rejected`].
pub fn dispatch_to<C, I, S, W>(
    parser: &mut Parser<C>,
    ctx: &mut C,
    tokens: I,
    out: &mut W,
) -> Outcome
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
    W: Write + ?Sized,
{
    match parser.run(ctx, tokens) {
        Ok(()) => Outcome::Completed,
        Err(err) => {
            debug!(kind = %err.kind(), token = err.token(), "invocation rejected");
            if let Err(io_err) = writeln!(out, "{}", render_diagnostic(&err)) {
                warn!(%io_err, "failed to write diagnostic");
            }
            Outcome::Rejected(err)
        }
    }
}
