//! Implements an in-memory `Terminal` interface
//!
//! The main purpose of the in-memory terminal is for internal testing

use std::cmp::min;
use std::collections::VecDeque;
use std::io;
use std::iter::repeat;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::terminal::{
    RawRead, Signal, SignalSet, Size,
    Terminal, TerminalReader, TerminalWriter,
};

/// Default size of a `MemoryTerminal` buffer
pub const DEFAULT_SIZE: Size = Size{
    columns: 80,
    lines: 24,
};

/// Implements an in-memory `Terminal` interface
///
/// The contents of a `MemoryTerminal` are shared. That is, cloning
/// a `MemoryTerminal` value will share the contained terminal buffer.
#[derive(Clone, Debug)]
pub struct MemoryTerminal {
    inner: Arc<Mutex<Inner>>,
}

#[derive(Debug)]
struct Inner {
    memory: Vec<char>,
    input: Vec<u8>,
    events: VecDeque<RawRead>,
    col: usize,
    line: usize,
    size: Size,
    raw_mode: bool,
    restore_count: usize,
    fail_read: bool,
    fail_write: bool,
    fail_size: bool,
}

/// Token returned by `MemoryTerminal` when entering raw mode
#[derive(Debug)]
#[must_use]
pub struct MemoryPrepareState(());

/// Holds a lock on `MemoryTerminal` read operations
pub struct MemoryReadGuard<'a>(&'a MemoryTerminal);

/// Holds a lock on `MemoryTerminal` write operations
pub struct MemoryWriteGuard<'a>(&'a MemoryTerminal);

impl MemoryTerminal {
    /// Returns a new `MemoryTerminal` with the default buffer size.
    pub fn new() -> MemoryTerminal {
        MemoryTerminal::default()
    }

    /// Returns a new `MemoryTerminal` with the given buffer size
    ///
    /// # Panics
    ///
    /// If either of the `lines` or `columns` fields are `0`.
    pub fn with_size(size: Size) -> MemoryTerminal {
        MemoryTerminal{
            inner: Arc::new(Mutex::new(Inner::new(size))),
        }
    }

    fn lock(&self) -> MutexGuard<Inner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Clears the terminal buffer and places the cursor at `(0, 0)`.
    pub fn clear_all(&self) {
        self.lock().clear_all();
    }

    /// Clears all characters beginning at the cursor and ending at buffer end.
    pub fn clear_to_end(&self) {
        self.lock().clear_to_end();
    }

    /// Clears the input buffer.
    pub fn clear_input(&self) {
        self.lock().input.clear();
    }

    /// Returns whether any input remains to be read.
    pub fn has_input(&self) -> bool {
        let inner = self.lock();
        !inner.input.is_empty() || !inner.events.is_empty()
    }

    /// Returns the lines of the buffer, with trailing spaces removed.
    pub fn lines(&self) -> Vec<String> {
        let inner = self.lock();

        inner.memory.chunks(inner.size.columns)
            .map(|line| line.iter().collect::<String>().trim_end().to_owned())
            .collect()
    }

    /// Returns the text of the given line, with trailing spaces removed.
    ///
    /// # Panics
    ///
    /// If `line` is out of bounds.
    pub fn line(&self, line: usize) -> String {
        self.lines().swap_remove(line)
    }

    /// Moves the cursor up `n` cells.
    pub fn move_up(&self, n: usize) {
        self.lock().move_up(n);
    }

    /// Moves the cursor down `n` cells.
    pub fn move_down(&self, n: usize) {
        self.lock().move_down(n);
    }

    /// Moves the cursor left `n` cells.
    pub fn move_left(&self, n: usize) {
        self.lock().move_left(n);
    }

    /// Moves the cursor right `n` cells.
    pub fn move_right(&self, n: usize) {
        self.lock().move_right(n);
    }

    /// Moves the cursor to the first column of the current line.
    pub fn move_to_first_column(&self) {
        self.lock().col = 0;
    }

    /// Pushes a character sequence to the back of the input queue.
    pub fn push_input(&self, s: &str) {
        self.push_bytes(s.as_bytes());
    }

    /// Pushes raw bytes to the back of the input queue.
    pub fn push_bytes(&self, bytes: &[u8]) {
        self.lock().input.extend(bytes);
    }

    /// Queues a resize notification which is delivered before remaining input.
    ///
    /// The buffer is resized when the notification is read.
    pub fn push_resize(&self, size: Size) {
        self.lock().events.push_back(RawRead::Resize(size));
    }

    /// Queues a signal notification which is delivered before remaining input.
    pub fn push_signal(&self, signal: Signal) {
        self.lock().events.push_back(RawRead::Signal(signal));
    }

    /// Causes subsequent reads to fail with an I/O error.
    pub fn set_fail_read(&self, fail: bool) {
        self.lock().fail_read = fail;
    }

    /// Causes subsequent writes to fail with an I/O error.
    pub fn set_fail_write(&self, fail: bool) {
        self.lock().fail_write = fail;
    }

    /// Causes subsequent window size queries to fail with an I/O error.
    pub fn set_fail_size(&self, fail: bool) {
        self.lock().fail_size = fail;
    }

    /// Reads some input from the input buffer.
    pub fn read_input(&self, buf: &mut [u8]) -> usize {
        self.lock().read_input(buf)
    }

    /// Changes the size of the terminal buffer.
    /// The buffer will be truncated or filled with spaces, as necessary.
    ///
    /// # Panics
    ///
    /// If either of the `lines` or `columns` fields are `0` or if the area
    /// exceeds `usize` maximum.
    pub fn resize(&self, new_size: Size) {
        self.lock().resize(new_size);
    }

    /// Moves the contents of the buffer up `n` lines.
    /// The first `n` lines of text will be erased.
    pub fn scroll_up(&self, n: usize) {
        self.lock().scroll_up(n);
    }

    /// Returns the `(line, column)` position of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        let r = self.lock();
        (r.line, r.col)
    }

    /// Returns the size of the terminal buffer.
    pub fn size(&self) -> Size {
        self.lock().size
    }

    /// Returns whether the terminal is currently in raw mode.
    pub fn is_raw_mode(&self) -> bool {
        self.lock().raw_mode
    }

    /// Returns the number of times raw mode has been exited.
    pub fn restore_count(&self) -> usize {
        self.lock().restore_count
    }

    /// Writes some text into the buffer.
    ///
    /// `'\r'` moves the cursor to the first column, `'\n'` to the next line.
    /// A character written past the final column wraps to the next line.
    pub fn write(&self, s: &str) {
        self.lock().write(s);
    }
}

impl Default for MemoryTerminal {
    fn default() -> MemoryTerminal {
        MemoryTerminal::with_size(DEFAULT_SIZE)
    }
}

impl Inner {
    fn new(size: Size) -> Inner {
        assert!(size.lines != 0 && size.columns != 0,
            "zero-area terminal buffer: {:?}", size);

        let n_chars = size.lines * size.columns;

        Inner{
            memory: vec![' '; n_chars],
            input: Vec::new(),
            events: VecDeque::new(),
            col: 0,
            line: 0,
            size,
            raw_mode: false,
            restore_count: 0,
            fail_read: false,
            fail_write: false,
            fail_size: false,
        }
    }

    fn clear_all(&mut self) {
        for ch in &mut self.memory {
            *ch = ' ';
        }
        self.col = 0;
        self.line = 0;
    }

    fn clear_to_end(&mut self) {
        let idx = min(self.index(), self.memory.len());

        for ch in &mut self.memory[idx..] {
            *ch = ' ';
        }
    }

    fn move_up(&mut self, n: usize) {
        self.line = self.line.saturating_sub(n);
    }

    fn move_down(&mut self, n: usize) {
        self.line = min(self.size.lines - 1, self.line + n);
    }

    fn move_left(&mut self, n: usize) {
        self.col = self.col.saturating_sub(n);
    }

    fn move_right(&mut self, n: usize) {
        self.col = min(self.size.columns - 1, self.col + n);
    }

    fn read_input(&mut self, buf: &mut [u8]) -> usize {
        let n = min(buf.len(), self.input.len());

        buf[..n].copy_from_slice(&self.input[..n]);
        let _ = self.input.drain(..n);
        n
    }

    fn resize(&mut self, new_size: Size) {
        if self.size != new_size {
            let n_chars = new_size.lines.checked_mul(new_size.columns)
                .unwrap_or_else(|| panic!("terminal size too large: {:?}", new_size));

            assert!(n_chars != 0, "zero-area terminal buffer: {:?}", new_size);

            let mut new_buf = Vec::with_capacity(n_chars);

            let (n_copy, n_extra) = if new_size.columns > self.size.columns {
                (self.size.columns, new_size.columns - self.size.columns)
            } else {
                (new_size.columns, 0)
            };

            for line in self.memory.chunks(self.size.columns).take(new_size.lines) {
                new_buf.extend(&line[..n_copy]);
                new_buf.extend(repeat(' ').take(n_extra));
            }

            if new_size.lines > self.size.lines {
                let n_lines = new_size.lines - self.size.lines;
                new_buf.extend(repeat(' ').take(n_lines * new_size.columns));
            }

            debug_assert_eq!(new_buf.len(), n_chars);

            self.col = min(self.col, new_size.columns - 1);
            self.line = min(self.line, new_size.lines - 1);
            self.size = new_size;
            self.memory = new_buf;
        }
    }

    fn scroll_up(&mut self, n: usize) {
        let chars = min(self.memory.len(), self.size.columns * n);
        self.memory.drain(..chars);
        self.memory.extend(repeat(' ').take(chars));
        self.line = self.line.saturating_sub(n);
    }

    fn write(&mut self, s: &str) {
        for ch in s.chars() {
            match ch {
                '\n' => self.advance_line(),
                '\r' => self.col = 0,
                ch => self.write_char(ch)
            }
        }
    }

    fn advance_line(&mut self) {
        self.line += 1;
        self.col = 0;
        if self.line == self.size.lines {
            self.scroll_up(1);
        }
    }

    fn write_char(&mut self, ch: char) {
        // The cursor rests past the final column until another character
        // is written; only then does the line wrap.
        if self.col >= self.size.columns {
            self.advance_line();
        }

        let idx = self.index();
        self.memory[idx] = ch;
        self.col += 1;
    }

    fn index(&self) -> usize {
        self.line * self.size.columns + min(self.col, self.size.columns)
    }

    fn check_write(&self) -> io::Result<()> {
        if self.fail_write {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "memory terminal write failure"))
        } else {
            Ok(())
        }
    }
}

impl Terminal for MemoryTerminal {
    type PrepareState = MemoryPrepareState;

    fn name(&self) -> &str {
        "memory-terminal"
    }

    fn lock_read<'a>(&'a self) -> Box<dyn TerminalReader<Self> + 'a> {
        Box::new(MemoryReadGuard(self))
    }

    fn lock_write<'a>(&'a self) -> Box<dyn TerminalWriter<Self> + 'a> {
        Box::new(MemoryWriteGuard(self))
    }
}

impl<'a> TerminalReader<MemoryTerminal> for MemoryReadGuard<'a> {
    fn prepare(&mut self, _block_signals: bool, _report_signals: SignalSet)
            -> io::Result<MemoryPrepareState> {
        self.0.lock().raw_mode = true;
        Ok(MemoryPrepareState(()))
    }

    fn restore(&mut self, _state: MemoryPrepareState) -> io::Result<()> {
        let mut inner = self.0.lock();
        inner.raw_mode = false;
        inner.restore_count += 1;
        Ok(())
    }

    fn read(&mut self, buf: &mut Vec<u8>) -> io::Result<RawRead> {
        let mut inner = self.0.lock();

        if inner.fail_read {
            return Err(io::Error::new(io::ErrorKind::UnexpectedEof,
                "memory terminal read failure"));
        }

        if let Some(event) = inner.events.pop_front() {
            if let RawRead::Resize(size) = event {
                inner.resize(size);
            }
            return Ok(event);
        }

        let mut chunk = [0; 16];
        let n = inner.read_input(&mut chunk);
        buf.extend_from_slice(&chunk[..n]);

        Ok(RawRead::Bytes(n))
    }
}

impl<'a> TerminalWriter<MemoryTerminal> for MemoryWriteGuard<'a> {
    fn size(&self) -> io::Result<Size> {
        let inner = self.0.lock();

        if inner.fail_size {
            Err(io::Error::new(io::ErrorKind::Other, "memory terminal size failure"))
        } else {
            Ok(inner.size)
        }
    }

    fn clear_screen(&mut self) -> io::Result<()> {
        self.0.lock().check_write()?;
        self.0.clear_all();
        Ok(())
    }

    fn clear_to_screen_end(&mut self) -> io::Result<()> {
        self.0.lock().check_write()?;
        self.0.clear_to_end();
        Ok(())
    }

    fn move_up(&mut self, n: usize) -> io::Result<()> {
        self.0.move_up(n);
        Ok(())
    }

    fn move_down(&mut self, n: usize) -> io::Result<()> {
        self.0.move_down(n);
        Ok(())
    }

    fn move_left(&mut self, n: usize) -> io::Result<()> {
        self.0.move_left(n);
        Ok(())
    }

    fn move_right(&mut self, n: usize) -> io::Result<()> {
        self.0.move_right(n);
        Ok(())
    }

    fn move_to_first_column(&mut self) -> io::Result<()> {
        self.0.move_to_first_column();
        Ok(())
    }

    fn write(&mut self, s: &str) -> io::Result<()> {
        let mut inner = self.0.lock();
        inner.check_write()?;
        inner.write(s);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.0.lock().check_write()
    }
}
