//! Interactive line editor for raw-mode terminals
//!
//! # Basic example
//!
//! ```no_run
//! use editline::{Config, History, Line, ReadResult};
//!
//! let mut history = History::default();
//! let mut line = Line::new(Config::default(), Some(&mut history)).unwrap();
//!
//! while let Ok(ReadResult::Input(input)) = line.read() {
//!     println!("got input {:?}", input);
//! }
//!
//! line.restore().unwrap();
//! println!("Goodbye.");
//! ```

#![deny(missing_docs)]

pub use crate::buffer::LineBuffer;
pub use crate::decoder::{Command, Decoder};
pub use crate::error::{Error, Result};
pub use crate::history::History;
pub use crate::line::{Interrupted, Line, ReadResult};
pub use crate::terminal::{DefaultTerminal, Signal, Terminal};
pub use crate::variables::{Config, Variable};

pub mod buffer;
pub mod chars;
pub mod decoder;
pub mod error;
pub mod history;
pub mod line;
pub mod memory;
pub mod terminal;
pub mod util;
pub mod variables;
