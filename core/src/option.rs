//! The option contract and its closure-backed implementation.
//!
//! An option is a named flag's behavior: a fixed priority, a checker that
//! validates the arguments captured after the flag, and an executor that
//! performs the work against a caller-owned context.
//!
//! Priority classifies the option (see [`OptionKind`]):
//!
//! - negative: meta options such as help, sorted before everything else;
//! - zero: environment options that configure the context;
//! - positive: action options, at most one of which runs per invocation.

use std::fmt;

use crate::error::{DispatchError, Result};

/// Classification of an option by the sign of its priority.
///
/// # Examples
///
/// ```
/// use optdispatch_core::OptionKind;
///
/// assert_eq!(OptionKind::from_priority(-1), OptionKind::Meta);
/// assert_eq!(OptionKind::from_priority(0), OptionKind::Environment);
/// assert_eq!(OptionKind::from_priority(3), OptionKind::Action);
/// assert!(OptionKind::Meta.is_terminal());
/// assert!(!OptionKind::Environment.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKind {
    /// Negative priority.
    Meta,
    /// Zero priority.
    Environment,
    /// Positive priority.
    Action,
}

impl OptionKind {
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            p if p < 0 => Self::Meta,
            0 => Self::Environment,
            _ => Self::Action,
        }
    }

    /// Whether executing an option of this kind ends the run.
    pub fn is_terminal(self) -> bool {
        self != Self::Environment
    }
}

/// Behavior of one registered flag.
///
/// `C` is the context shared by every option of a parser. Environment
/// options typically mutate it; the eventual action reads it.
///
/// The default [`check`](CliOption::check) rejects any argument, which suits
/// flags that take none.
pub trait CliOption<C> {
    /// Sort key; fixed for the lifetime of the option.
    fn priority(&self) -> i32;

    /// Validates the arguments captured after this flag.
    fn check(&self, args: &[String]) -> Result<()> {
        expect_no_args(args)
    }

    /// Runs the option with its captured arguments.
    fn execute(&self, ctx: &mut C, args: &[String]) -> Result<()>;

    fn kind(&self) -> OptionKind {
        OptionKind::from_priority(self.priority())
    }
}

type Checker = Box<dyn Fn(&[String]) -> Result<()>>;
type Executor<C> = Box<dyn Fn(&mut C, &[String]) -> Result<()>>;

/// An option assembled from closures.
///
/// # Examples
///
/// ```
/// use optdispatch_core::{CliOption, FnOption, expect_exactly};
///
/// let write = FnOption::new(0, |value: &mut String, args: &[String]| {
///     *value = args[0].clone();
///     Ok(())
/// })
/// .with_check(|args| expect_exactly("-w", 1, args));
///
/// let mut value = String::new();
/// write.check(&["hello".to_string()]).unwrap();
/// write.execute(&mut value, &["hello".to_string()]).unwrap();
/// assert_eq!(value, "hello");
/// assert!(write.check(&[]).is_err());
/// ```
pub struct FnOption<C> {
    priority: i32,
    checker: Option<Checker>,
    executor: Executor<C>,
}

impl<C> FnOption<C> {
    /// Creates an option with the default no-arguments checker.
    pub fn new<F>(priority: i32, executor: F) -> Self
    where
        F: Fn(&mut C, &[String]) -> Result<()> + 'static,
    {
        Self {
            priority,
            checker: None,
            executor: Box::new(executor),
        }
    }

    /// Replaces the checker.
    pub fn with_check<F>(mut self, checker: F) -> Self
    where
        F: Fn(&[String]) -> Result<()> + 'static,
    {
        self.checker = Some(Box::new(checker));
        self
    }
}

impl<C> CliOption<C> for FnOption<C> {
    fn priority(&self) -> i32 {
        self.priority
    }

    fn check(&self, args: &[String]) -> Result<()> {
        match &self.checker {
            Some(checker) => checker(args),
            None => expect_no_args(args),
        }
    }

    fn execute(&self, ctx: &mut C, args: &[String]) -> Result<()> {
        (self.executor)(ctx, args)
    }
}

impl<C> fmt::Debug for FnOption<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FnOption")
            .field("priority", &self.priority)
            .field("custom_check", &self.checker.is_some())
            .finish()
    }
}

/// Fails with `UnexpectedArgument` naming the first token, if any.
pub fn expect_no_args(args: &[String]) -> Result<()> {
    expect_at_most(0, args)
}

/// Requires exactly `n` arguments.
///
/// Too few fails with `MissingArgument(flag)`; too many fails with
/// `UnexpectedArgument` naming the first surplus token.
///
/// # Examples
///
/// ```
/// use optdispatch_core::{DispatchError, expect_exactly};
///
/// let args = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();
///
/// assert_eq!(
///     expect_exactly("-t", 1, &args(&[])),
///     Err(DispatchError::MissingArgument("-t".into()))
/// );
/// assert_eq!(
///     expect_exactly("-t", 1, &args(&["utf-8", "gbk"])),
///     Err(DispatchError::UnexpectedArgument("gbk".into()))
/// );
/// assert!(expect_exactly("-t", 1, &args(&["utf-8"])).is_ok());
/// ```
pub fn expect_exactly(flag: &str, n: usize, args: &[String]) -> Result<()> {
    expect_at_least(flag, n, args)?;
    expect_at_most(n, args)
}

/// Requires at least `n` arguments.
pub fn expect_at_least(flag: &str, n: usize, args: &[String]) -> Result<()> {
    if args.len() < n {
        return Err(DispatchError::MissingArgument(flag.to_string()));
    }
    Ok(())
}

/// Allows at most `n` arguments.
pub fn expect_at_most(n: usize, args: &[String]) -> Result<()> {
    match args.get(n) {
        Some(surplus) => Err(DispatchError::UnexpectedArgument(surplus.clone())),
        None => Ok(()),
    }
}
