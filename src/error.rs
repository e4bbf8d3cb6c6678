//! Error values produced while reading a line

use std::io;

use thiserror::Error;

/// An error encountered while editing a line
///
/// End of input (`Ctrl-D`) is not an error; it is reported as
/// [`ReadResult::Eof`](../line/enum.ReadResult.html).
#[derive(Debug, Error)]
pub enum Error {
    /// Reading from the terminal failed
    #[error("input error: {0}")]
    Input(#[source] io::Error),
    /// Writing to the terminal failed
    #[error("output error: {0}")]
    Output(#[source] io::Error),
    /// An insertion would grow the line beyond its maximum length
    #[error("line exceeds maximum length of {max} characters")]
    Capacity {
        /// Maximum number of characters in a line
        max: usize,
    },
    /// The terminal does not understand ANSI escape sequences
    #[error("terminal {0:?} does not support ANSI escape sequences")]
    UnsupportedTerminal(String),
}

/// Result of a line editing operation
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether the error leaves the editing session usable.
    pub fn is_recoverable(&self) -> bool {
        match *self {
            Error::Capacity{..} => true,
            _ => false
        }
    }
}

// Writes vastly outnumber reads, so bare I/O errors are output errors.
// Read paths map explicitly to `Error::Input`.
impl From<io::Error> for Error {
    fn from(e: io::Error) -> Error {
        Error::Output(e)
    }
}

impl From<Error> for io::Error {
    fn from(e: Error) -> io::Error {
        match e {
            Error::Input(e) | Error::Output(e) => e,
            e => io::Error::new(io::ErrorKind::Other, e.to_string())
        }
    }
}
