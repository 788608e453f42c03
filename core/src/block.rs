use std::fmt;
use std::rc::Rc;

use crate::option::CliOption;

/// One option invocation: a registered option plus the non-flag tokens that
/// followed its flag in the input.
///
/// Blocks share their option with the registry and own their arguments.
/// They are immutable once the parser closes them.
pub struct OptionBlock<C> {
    flag: String,
    option: Rc<dyn CliOption<C>>,
    args: Vec<String>,
}

impl<C> OptionBlock<C> {
    pub(crate) fn open(flag: &str, option: Rc<dyn CliOption<C>>) -> Self {
        Self {
            flag: flag.to_string(),
            option,
            args: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, token: String) {
        self.args.push(token);
    }

    /// The flag spelling that opened this block (`"-"` for the leading group).
    pub fn flag(&self) -> &str {
        &self.flag
    }

    pub fn option(&self) -> &dyn CliOption<C> {
        self.option.as_ref()
    }

    pub fn priority(&self) -> i32 {
        self.option.priority()
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }
}

impl<C> fmt::Debug for OptionBlock<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OptionBlock")
            .field("flag", &self.flag)
            .field("priority", &self.priority())
            .field("args", &self.args)
            .finish()
    }
}
