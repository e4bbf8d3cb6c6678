//! Provides a low-level terminal interface
//!
//! The line editor never touches the operating system directly. Raw mode,
//! window size queries and signal reporting are reached through the
//! `Terminal`, `TerminalReader` and `TerminalWriter` traits. The default
//! implementation delegates to `mortal`, which handles termios on Unix and
//! console modes on Windows.

use std::env::var;
use std::io;
use std::sync::{LockResult, PoisonError};

use mortal::{self, Event, PrepareConfig, PrepareState, TerminalReadGuard, TerminalWriteGuard};

#[cfg(unix)]
use mortal::unix::TerminalExt;
#[cfg(windows)]
use mortal::windows::TerminalExt;

pub use mortal::{Signal, SignalSet, Size};

/// Default number of lines, used when the terminal reports no size
pub const DEFAULT_LINES: usize = 24;

/// Default number of columns, used when the terminal reports no size
pub const DEFAULT_COLUMNS: usize = 80;

/// Values of `TERM` which are known not to support ANSI escape sequences
const UNSUPPORTED_TERMS: &[&str] = &["dumb", "cons25"];

// Maximum number of bytes requested by a single read
const MAX_READ: usize = 64;

/// Defines a low-level interface to the terminal
pub trait Terminal: Sized {
    /// Returned by `prepare`; passed to `restore` to restore state.
    type PrepareState;

    /// Returns the name of the terminal.
    fn name(&self) -> &str;

    /// Acquires a lock on terminal read operations and returns a value holding
    /// that lock and granting access to such operations.
    fn lock_read<'a>(&'a self) -> Box<dyn TerminalReader<Self> + 'a>;

    /// Acquires a lock on terminal write operations and returns a value holding
    /// that lock and granting access to such operations.
    fn lock_write<'a>(&'a self) -> Box<dyn TerminalWriter<Self> + 'a>;
}

/// Holds a lock on `Terminal` read operations
pub trait TerminalReader<Term: Terminal> {
    /// Places the terminal in raw mode, preparing it for line editing.
    ///
    /// The returned state must be passed to `restore` to return the terminal
    /// to its prior settings.
    ///
    /// If `block_signals` is `true`, keys which would normally generate a
    /// signal (e.g. `Ctrl-C`) are instead delivered as input.
    ///
    /// Signals contained in `report_signals` are reported by `read`.
    fn prepare(&mut self, block_signals: bool, report_signals: SignalSet)
        -> io::Result<Term::PrepareState>;

    /// Restores the terminal to the state prior to a call to `prepare`.
    fn restore(&mut self, state: Term::PrepareState) -> io::Result<()>;

    /// Reads some input from the terminal and appends it to the given buffer.
    ///
    /// A window resize or a reported signal interrupts the read and is
    /// returned instead of input.
    fn read(&mut self, buf: &mut Vec<u8>) -> io::Result<RawRead>;
}

/// Holds a lock on `Terminal` write operations
pub trait TerminalWriter<Term: Terminal> {
    /// Returns the size of the terminal window
    fn size(&self) -> io::Result<Size>;

    /// Presents a clear terminal screen, with cursor at first row, first column.
    fn clear_screen(&mut self) -> io::Result<()>;

    /// Clears characters on the line occupied by the cursor, beginning with the
    /// cursor and ending at the end of the line. Also clears all characters on
    /// all lines after the cursor.
    fn clear_to_screen_end(&mut self) -> io::Result<()>;

    /// Moves the cursor up `n` cells; `n` may be zero.
    fn move_up(&mut self, n: usize) -> io::Result<()>;
    /// Moves the cursor down `n` cells; `n` may be zero.
    fn move_down(&mut self, n: usize) -> io::Result<()>;
    /// Moves the cursor left `n` cells; `n` may be zero.
    fn move_left(&mut self, n: usize) -> io::Result<()>;
    /// Moves the cursor right `n` cells; `n` may be zero.
    fn move_right(&mut self, n: usize) -> io::Result<()>;

    /// Moves the cursor to the first column of the current line
    fn move_to_first_column(&mut self) -> io::Result<()>;

    /// Writes output to the terminal.
    ///
    /// `"\r"` returns the cursor to the first column; `"\r\n"` begins a new line.
    ///
    /// The terminal interface shall not automatically move the cursor to the next
    /// line when `write` causes a character to be written to the final column.
    fn write(&mut self, s: &str) -> io::Result<()>;

    /// Flushes any currently buffered output data.
    fn flush(&mut self) -> io::Result<()>;
}

/// Result of a raw read from the terminal
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RawRead {
    /// `n` bytes were read
    Bytes(usize),
    /// The terminal window was resized
    Resize(Size),
    /// A signal was received while waiting for input
    Signal(Signal),
}

/// Default `Terminal` interface
pub struct DefaultTerminal(mortal::Terminal);

impl DefaultTerminal {
    /// Opens access to the terminal device associated with standard output.
    pub fn new() -> io::Result<DefaultTerminal> {
        mortal::Terminal::new().map(DefaultTerminal)
    }
}

// A poisoned lock only means another thread panicked while holding it;
// the terminal state it guards remains usable.
fn recover<T>(res: LockResult<T>) -> T {
    res.unwrap_or_else(PoisonError::into_inner)
}

impl Terminal for DefaultTerminal {
    type PrepareState = PrepareState;

    fn name(&self) -> &str {
        self.0.name()
    }

    fn lock_read<'a>(&'a self) -> Box<dyn TerminalReader<Self> + 'a> {
        Box::new(recover(self.0.lock_read()))
    }

    fn lock_write<'a>(&'a self) -> Box<dyn TerminalWriter<Self> + 'a> {
        Box::new(recover(self.0.lock_write()))
    }
}

impl<'a> TerminalReader<DefaultTerminal> for TerminalReadGuard<'a> {
    fn prepare(&mut self, block_signals: bool, report_signals: SignalSet)
            -> io::Result<PrepareState> {
        self.prepare(PrepareConfig{
            block_signals,
            enable_control_flow: !block_signals,
            enable_keypad: false,
            report_signals,
            .. PrepareConfig::default()
        })
    }

    fn restore(&mut self, state: PrepareState) -> io::Result<()> {
        self.restore(state)
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> io::Result<RawRead> {
        let mut chunk = [0; MAX_READ];

        loop {
            match self.read_raw(&mut chunk, None)? {
                Some(Event::Raw(n)) => {
                    buf.extend_from_slice(&chunk[..n]);
                    return Ok(RawRead::Bytes(n));
                }
                Some(Event::Resize(size)) => return Ok(RawRead::Resize(size)),
                Some(Event::Signal(sig)) => return Ok(RawRead::Signal(sig)),
                Some(_) => continue,
                None => return Ok(RawRead::Bytes(0))
            }
        }
    }
}

impl<'a> TerminalWriter<DefaultTerminal> for TerminalWriteGuard<'a> {
    fn size(&self) -> io::Result<Size> {
        let size = self.size()?;

        if size.columns == 0 || size.lines == 0 {
            Ok(size_from_env())
        } else {
            Ok(size)
        }
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.clear_screen()
    }

    fn clear_to_screen_end(&mut self) -> io::Result<()> {
        self.clear_to_screen_end()
    }

    fn move_up(&mut self, n: usize) -> io::Result<()> {
        self.move_up(n)
    }

    fn move_down(&mut self, n: usize) -> io::Result<()> {
        self.move_down(n)
    }

    fn move_left(&mut self, n: usize) -> io::Result<()> {
        self.move_left(n)
    }

    fn move_right(&mut self, n: usize) -> io::Result<()> {
        self.move_right(n)
    }

    fn move_to_first_column(&mut self) -> io::Result<()> {
        self.move_to_first_column()
    }

    fn write(&mut self, s: &str) -> io::Result<()> {
        self.write_str(s)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush()
    }
}

/// Returns whether the terminal named by the `TERM` environment variable
/// is expected to support ANSI escape sequences.
pub fn check_ansi() -> bool {
    match var("TERM") {
        Ok(ref term) => check_ansi_name(term),
        Err(_) => false
    }
}

fn check_ansi_name(term: &str) -> bool {
    !term.is_empty() && !UNSUPPORTED_TERMS.contains(&term)
}

/// Returns the terminal size described by the `LINES` and `COLUMNS`
/// environment variables.
///
/// Missing or malformed values are replaced with `DEFAULT_LINES`
/// and `DEFAULT_COLUMNS`, respectively.
pub fn size_from_env() -> Size {
    Size{
        lines: env_dimension("LINES", DEFAULT_LINES),
        columns: env_dimension("COLUMNS", DEFAULT_COLUMNS),
    }
}

fn env_dimension(name: &str, default: usize) -> usize {
    parse_dimension(var(name).ok().as_ref().map(|s| &s[..]), default)
}

fn parse_dimension(value: Option<&str>, default: usize) -> usize {
    match value.and_then(|s| s.trim().parse().ok()) {
        Some(0) | None => default,
        Some(n) => n
    }
}
