//! Configures line editing behavior
//!
//! Settings are plain fields of `Config` and may also be read and assigned
//! by name, in the manner of readline variables:
//!
//! ```
//! use editline::variables::{Config, Variable};
//!
//! let mut config = Config::default();
//!
//! config.set_variable("echo-control-characters", "off");
//! config.set_variable("history-size", "1000");
//!
//! assert!(!config.echo_control_characters);
//! assert_eq!(config.history_size, 1000);
//!
//! match config.get_variable("primary-prompt") {
//!     Some(Variable::String(s)) => assert_eq!(s, "$ "),
//!     _ => unreachable!()
//! }
//! ```

use std::borrow::Cow::{self, Borrowed};
use std::fmt;
use std::mem::replace;

use crate::history::DEFAULT_HISTORY_SIZE;

/// Default primary prompt
pub const DEFAULT_PRIMARY_PROMPT: &str = "$ ";

/// Default continuation prompt
pub const DEFAULT_CONTINUATION_PROMPT: &str = "> ";

/// Default number of characters allocated for a new line
pub const DEFAULT_BUFFER_CAPACITY: usize = 64;

/// Default maximum number of characters in a line
pub const DEFAULT_MAX_LINE_LEN: usize = 4096;

/// Line editing settings
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Config {
    /// Prompt displayed when reading a new line
    pub primary_prompt: String,
    /// Prompt displayed when reading a continuation line
    pub continuation_prompt: String,
    /// Number of characters allocated up front for each line
    pub buffer_capacity: usize,
    /// Maximum number of characters in a line; longer input is rejected
    pub max_line_len: usize,
    /// Maximum number of history entries
    pub history_size: usize,
    /// Whether `^C` and `^D` are echoed when those keys are pressed
    pub echo_control_characters: bool,
}

impl Default for Config {
    fn default() -> Config {
        Config{
            primary_prompt: DEFAULT_PRIMARY_PROMPT.to_owned(),
            continuation_prompt: DEFAULT_CONTINUATION_PROMPT.to_owned(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            history_size: DEFAULT_HISTORY_SIZE,
            echo_control_characters: true,
        }
    }
}

impl Config {
    /// Returns the default configuration.
    pub fn new() -> Config {
        Config::default()
    }

    /// Returns the value of the named variable or `None`
    /// if no such variable exists.
    pub fn get_variable(&self, name: &str) -> Option<Variable> {
        self.get_variable_impl(name)
    }

    /// Sets the value of the named variable and returns the previous
    /// value.
    ///
    /// If `name` does not refer to a variable or the `value` is not
    /// a valid value for the variable, `None` is returned.
    pub fn set_variable(&mut self, name: &str, value: &str) -> Option<Variable<'static>> {
        self.set_variable_impl(name, value)
    }

    /// Returns an iterator over all variables and their current values.
    pub fn variables(&self) -> VariableIter {
        VariableIter{config: self, n: 0}
    }
}

/// Iterator over `Config` variables
pub struct VariableIter<'a> {
    config: &'a Config,
    n: usize,
}

/// Represents a `Config` variable of a given type
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Variable<'a> {
    /// Boolean variable
    Boolean(bool),
    /// Integer variable
    Integer(i32),
    /// String variable
    String(Cow<'a, str>),
}

macro_rules! define_variables {
    ( $( $name:literal => ( $ty:ident , $conv:ident ,
            |$gr:ident| $getter:expr , |$sr:ident, $v:ident| $setter:expr ) , )+ ) => {
        static VARIABLE_NAMES: &[&str] = &[ $( $name ),+ ];

        impl Config {
            fn get_variable_impl(&self, name: &str) -> Option<Variable> {
                match name {
                    $( $name => {
                        let $gr = self;
                        Some(Variable::$ty($getter))
                    } )+
                    _ => None
                }
            }

            fn set_variable_impl(&mut self, name: &str, value: &str)
                    -> Option<Variable<'static>> {
                match name {
                    $( $name => {
                        if let Some($v) = $conv(value) {
                            let $sr = self;
                            Some(Variable::$ty($setter))
                        } else {
                            None
                        }
                    } )+
                    _ => None
                }
            }
        }

        impl<'a> Iterator for VariableIter<'a> {
            type Item = (&'static str, Variable<'a>);

            fn next(&mut self) -> Option<Self::Item> {
                let res = match VARIABLE_NAMES.get(self.n).cloned() {
                    $( Some($name) => ($name, {
                        let $gr = self.config;
                        Variable::$ty($getter)
                    }) , )+
                    _ => return None
                };

                self.n += 1;
                Some(res)
            }
        }
    }
}

define_variables!{
    "continuation-prompt" => (String, parse_string,
        |c| Borrowed(&c.continuation_prompt[..]),
        |c, v| replace(&mut c.continuation_prompt, v).into()),
    "echo-control-characters" => (Boolean, parse_bool,
        |c| c.echo_control_characters,
        |c, v| replace(&mut c.echo_control_characters, v)),
    "history-size" => (Integer, parse_usize,
        |c| usize_as_i32(c.history_size),
        |c, v| usize_as_i32(replace(&mut c.history_size, v))),
    "max-line-length" => (Integer, parse_usize,
        |c| usize_as_i32(c.max_line_len),
        |c, v| usize_as_i32(replace(&mut c.max_line_len, v))),
    "primary-prompt" => (String, parse_string,
        |c| Borrowed(&c.primary_prompt[..]),
        |c, v| replace(&mut c.primary_prompt, v).into()),
}

impl<'a> fmt::Display for Variable<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Variable::Boolean(b) => f.write_str(if b { "on" } else { "off" }),
            Variable::Integer(n) => write!(f, "{}", n),
            Variable::String(ref s) => f.write_str(s),
        }
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s {
        "0" => Some(false),
        "1" => Some(true),
        s if s.eq_ignore_ascii_case("off") => Some(false),
        s if s.eq_ignore_ascii_case("on") => Some(true),
        _ => None
    }
}

fn parse_string(s: &str) -> Option<String> {
    Some(s.to_owned())
}

fn usize_as_i32(u: usize) -> i32 {
    match u {
        u if u > i32::max_value() as usize => -1,
        u => u as i32
    }
}

// Negative values mean "unlimited"
fn parse_usize(s: &str) -> Option<usize> {
    match s.parse::<i32>() {
        Ok(n) if n < 0 => Some(usize::max_value()),
        Ok(n) => Some(n as usize),
        Err(_) => None
    }
}
