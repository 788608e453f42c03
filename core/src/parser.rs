//! The parse → check → execute pipeline.
//!
//! A [`Parser`] owns the option registry, the default action, the
//! blank-input handler, and the block sequence built by the current cycle.
//! It is meant for repeated use (a read-eval loop, say): callers run one
//! cycle and then call [`Parser::clear`] regardless of the outcome.
//!
//! # Example
//!
//! ```
//! use optdispatch_core::{FnOption, Parser, expect_exactly};
//!
//! #[derive(Default)]
//! struct Ctx {
//!     value: String,
//!     out: Vec<String>,
//! }
//!
//! let mut parser = Parser::builder()
//!     .option(
//!         "-w",
//!         FnOption::new(0, |ctx: &mut Ctx, args: &[String]| {
//!             ctx.value = args[0].clone();
//!             Ok(())
//!         })
//!         .with_check(|args| expect_exactly("-w", 1, args)),
//!     )
//!     .default_action(FnOption::new(1, |ctx: &mut Ctx, _: &[String]| {
//!         ctx.out.push(ctx.value.clone());
//!         Ok(())
//!     }))
//!     .on_blank(|ctx: &mut Ctx| ctx.out.push("blank".into()))
//!     .build()
//!     .unwrap();
//!
//! let mut ctx = Ctx::default();
//! parser.run(&mut ctx, ["-w", "hello"]).unwrap();
//! parser.clear();
//! parser.run(&mut ctx, Vec::<String>::new()).unwrap();
//! parser.clear();
//! assert_eq!(ctx.out, vec!["hello", "blank"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::block::OptionBlock;
use crate::error::{DispatchError, RegistryError, Result};
use crate::option::{CliOption, FnOption};
use crate::validate::validate_registry;

/// Registry key of the implicit group of tokens preceding the first flag.
pub const LEADING_KEY: &str = "-";

/// Flag spelling → option.
pub type OptionMap<C> = HashMap<String, Rc<dyn CliOption<C>>>;

/// Where the parser is in its cycle.
///
/// `Failed` is reachable from every transition; [`Parser::clear`] returns to
/// `Empty`. There is no rollback: a failed cycle keeps whatever blocks it
/// had built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserState {
    Empty,
    Parsing,
    Parsed,
    Checked,
    Executed,
    Failed,
}

/// Option dispatch engine.
pub struct Parser<C> {
    options: OptionMap<C>,
    leading: Rc<dyn CliOption<C>>,
    default_action: Rc<dyn CliOption<C>>,
    on_blank: Box<dyn Fn(&mut C)>,
    blocks: Vec<OptionBlock<C>>,
    state: ParserState,
}

impl<C> Parser<C> {
    pub fn builder() -> ParserBuilder<C> {
        ParserBuilder::new()
    }

    pub fn state(&self) -> ParserState {
        self.state
    }

    /// Blocks built by the current cycle, sorted by priority once parsing
    /// completes.
    pub fn blocks(&self) -> &[OptionBlock<C>] {
        &self.blocks
    }

    /// Whether `flag` is a registered spelling.
    pub fn is_registered(&self, flag: &str) -> bool {
        self.options.contains_key(flag)
    }

    /// Groups `tokens` into option blocks.
    ///
    /// Tokens before the first flag always form one block under
    /// [`LEADING_KEY`], even when there are none. Every `-`-prefixed token
    /// closes the current block and opens a new one; an unregistered flag
    /// fails with [`DispatchError::InvalidOption`] and aborts grouping.
    ///
    /// On success the blocks are stable-sorted by ascending priority, so
    /// equal priorities keep their input order.
    pub fn parse<I, S>(&mut self, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.state != ParserState::Empty {
            warn!(state = ?self.state, "parse called without clearing the previous cycle");
        }
        self.state = ParserState::Parsing;

        let mut current = OptionBlock::open(LEADING_KEY, Rc::clone(&self.leading));
        for token in tokens {
            let token = token.into();
            if !token.starts_with('-') {
                current.push(token);
                continue;
            }
            let Some(option) = self.options.get(&token) else {
                self.blocks.push(current);
                self.state = ParserState::Failed;
                return Err(DispatchError::InvalidOption(token));
            };
            let next = OptionBlock::open(&token, Rc::clone(option));
            self.blocks.push(std::mem::replace(&mut current, next));
        }
        self.blocks.push(current);

        self.blocks.sort_by_key(OptionBlock::priority);
        debug!(blocks = ?self.blocks, "parsed option blocks");
        self.state = ParserState::Parsed;
        Ok(())
    }

    /// Runs every block's checker in sorted order, stopping at the first
    /// failure.
    pub fn check(&mut self) -> Result<()> {
        for block in &self.blocks {
            if let Err(err) = block.option().check(block.args()) {
                debug!(flag = block.flag(), %err, "option check failed");
                self.state = ParserState::Failed;
                return Err(err);
            }
        }
        self.state = ParserState::Checked;
        Ok(())
    }

    /// Executes the parsed blocks.
    ///
    /// A lone, empty leading block means the user typed nothing: the blank
    /// handler runs and nothing else. Otherwise blocks execute in sorted
    /// order until the first one with nonzero priority has run. If none
    /// does, the default action runs with no arguments.
    pub fn execute(&mut self, ctx: &mut C) -> Result<()> {
        if self.is_blank() {
            debug!("blank invocation");
            (self.on_blank)(ctx);
            self.state = ParserState::Executed;
            return Ok(());
        }

        for block in &self.blocks {
            debug!(flag = block.flag(), priority = block.priority(), "executing option");
            if let Err(err) = block.option().execute(ctx, block.args()) {
                self.state = ParserState::Failed;
                return Err(err);
            }
            if block.option().kind().is_terminal() {
                self.state = ParserState::Executed;
                return Ok(());
            }
        }

        debug!("no action selected, running default action");
        let outcome = self.default_action.execute(ctx, &[]);
        self.state = match outcome {
            Ok(()) => ParserState::Executed,
            Err(_) => ParserState::Failed,
        };
        outcome
    }

    /// Parses, checks, and executes `tokens`, propagating the first failure.
    pub fn run<I, S>(&mut self, ctx: &mut C, tokens: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parse(tokens)?;
        self.check()?;
        self.execute(ctx)
    }

    /// Discards the blocks of the previous cycle.
    pub fn clear(&mut self) {
        self.blocks.clear();
        self.state = ParserState::Empty;
    }

    fn is_blank(&self) -> bool {
        match self.blocks.as_slice() {
            [] => {
                warn!("execute called before parse");
                true
            }
            [only] => only.args().is_empty() && only.flag() == LEADING_KEY,
            _ => false,
        }
    }
}

impl<C> fmt::Debug for Parser<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut flags: Vec<&str> = self.options.keys().map(String::as_str).collect();
        flags.sort_unstable();
        f.debug_struct("Parser")
            .field("flags", &flags)
            .field("state", &self.state)
            .field("blocks", &self.blocks)
            .finish()
    }
}

/// Assembles and validates a [`Parser`].
pub struct ParserBuilder<C> {
    options: OptionMap<C>,
    default_action: Option<Rc<dyn CliOption<C>>>,
    on_blank: Option<Box<dyn Fn(&mut C)>>,
}

impl<C> ParserBuilder<C> {
    pub fn new() -> Self {
        Self {
            options: HashMap::new(),
            default_action: None,
            on_blank: None,
        }
    }

    /// Registers `option` under `flag`. A later registration of the same
    /// spelling replaces the earlier one.
    pub fn option<O>(self, flag: impl Into<String>, option: O) -> Self
    where
        O: CliOption<C> + 'static,
    {
        self.shared(flag, Rc::new(option))
    }

    /// Registers an option that is also referenced elsewhere, typically as
    /// the default action.
    pub fn shared(mut self, flag: impl Into<String>, option: Rc<dyn CliOption<C>>) -> Self {
        self.options.insert(flag.into(), option);
        self
    }

    /// Sets the option for tokens preceding the first flag.
    ///
    /// Without one, leading tokens are rejected and the leading group does
    /// nothing.
    pub fn leading<O>(self, option: O) -> Self
    where
        O: CliOption<C> + 'static,
    {
        self.option(LEADING_KEY, option)
    }

    pub fn default_action<O>(self, option: O) -> Self
    where
        O: CliOption<C> + 'static,
    {
        self.default_shared(Rc::new(option))
    }

    pub fn default_shared(mut self, option: Rc<dyn CliOption<C>>) -> Self {
        self.default_action = Some(option);
        self
    }

    pub fn on_blank<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut C) + 'static,
    {
        self.on_blank = Some(Box::new(handler));
        self
    }

    /// Validates the registry and builds the parser.
    ///
    /// # Errors
    ///
    /// Returns the first [`RegistryError`] found: a flag spelling without a
    /// leading `-`, a missing default action, or a missing blank handler.
    pub fn build(self) -> std::result::Result<Parser<C>, RegistryError>
    where
        C: 'static,
    {
        if let Some(err) = validate_registry(&self.options).into_iter().next() {
            return Err(err);
        }
        let default_action = self.default_action.ok_or(RegistryError::MissingDefaultAction)?;
        let on_blank = self.on_blank.ok_or(RegistryError::MissingBlankHandler)?;

        let mut options = self.options;
        let leading = match options.get(LEADING_KEY) {
            Some(option) => Rc::clone(option),
            None => {
                let noop: Rc<dyn CliOption<C>> =
                    Rc::new(FnOption::new(0, |_: &mut C, _: &[String]| Ok(())));
                options.insert(LEADING_KEY.to_string(), Rc::clone(&noop));
                noop
            }
        };

        Ok(Parser {
            options,
            leading,
            default_action,
            on_blank,
            blocks: Vec::new(),
            state: ParserState::Empty,
        })
    }
}

impl<C> Default for ParserBuilder<C> {
    fn default() -> Self {
        Self::new()
    }
}
